//! Filtering of the long table against the current selection.
//!
//! Year bounds compare as integers, never as strings: the source stores years
//! as column labels, and lexicographic comparison would silently misorder
//! them (`"9" > "10"`). Parsing happens once at load, so both sides of every
//! comparison here are already `i32`.

use crate::models::{LongRecord, Selection};
use std::cmp::Ordering;

/// Subset of `records` whose country is selected and whose year falls in the
/// inclusive `[lo, hi]` range, sorted ascending by (year, value) with missing
/// values last within a year. The base slice is never mutated; an empty
/// result is valid and renders an empty chart.
pub fn filter(records: &[LongRecord], selection: &Selection) -> Vec<LongRecord> {
    let mut out: Vec<LongRecord> = records
        .iter()
        .filter(|r| selection.countries.contains(&r.country))
        .filter(|r| selection.lo <= r.year && r.year <= selection.hi)
        .cloned()
        .collect();
    out.sort_by(|a, b| a.year.cmp(&b.year).then_with(|| cmp_value(a.value, b.value)));
    out
}

fn cmp_value(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::COUNTRY_SENTINEL;

    fn rec(country: &str, year: i32, value: Option<f64>) -> LongRecord {
        LongRecord {
            country: country.into(),
            year,
            value,
        }
    }

    #[test]
    fn keeps_only_selected_countries_in_range() {
        let records = vec![
            rec("A", 2000, Some(100.0)),
            rec("A", 2001, Some(200.0)),
            rec("A", 2002, Some(300.0)),
            rec("B", 2000, Some(150.0)),
            rec("B", 2001, Some(250.0)),
            rec("B", 2002, Some(50_000.0)),
        ];
        let sel = Selection::new(["A"], 2000, 2001);
        let got = filter(&records, &sel);
        assert_eq!(
            got,
            vec![rec("A", 2000, Some(100.0)), rec("A", 2001, Some(200.0))]
        );
    }

    #[test]
    fn sorts_by_year_then_value() {
        let records = vec![
            rec("B", 2000, Some(5.0)),
            rec("A", 2001, Some(1.0)),
            rec("A", 2000, Some(9.0)),
            rec("B", 2001, None),
        ];
        let sel = Selection::new(["A", "B"], 2000, 2001);
        let got = filter(&records, &sel);
        let keys: Vec<(i32, Option<f64>)> = got.iter().map(|r| (r.year, r.value)).collect();
        assert_eq!(
            keys,
            vec![
                (2000, Some(5.0)),
                (2000, Some(9.0)),
                (2001, Some(1.0)),
                (2001, None),
            ]
        );
    }

    #[test]
    fn year_bounds_compare_numerically() {
        // With string ordering, "9" > "10" and this range would come back empty.
        let records = vec![
            rec("A", 9, Some(1.0)),
            rec("A", 10, Some(2.0)),
            rec("A", 90, Some(3.0)),
            rec("A", 100, Some(4.0)),
        ];
        let sel = Selection::new(["A"], 9, 10);
        let got = filter(&records, &sel);
        let years: Vec<i32> = got.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![9, 10]);
    }

    #[test]
    fn sentinel_selection_matches_nothing() {
        let records = vec![rec("A", 2000, Some(1.0))];
        let sel = Selection::new([COUNTRY_SENTINEL], 2000, 2000);
        assert!(filter(&records, &sel).is_empty());
    }

    #[test]
    fn reversed_range_is_normalized() {
        let sel = Selection::new(["A"], 2010, 2000);
        assert_eq!((sel.lo, sel.hi), (2000, 2010));
    }
}
