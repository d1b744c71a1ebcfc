//! Wide-to-long reshaping and numeric coercion.
//!
//! The source table carries one column per year with opaque string cells
//! (plain numbers or shorthand like `1.19k`). Melting emits exactly one
//! [`LongRecord`] per (country, year column) pair; a cell that fails coercion
//! becomes a missing value rather than an error, so a single bad cell only
//! leaves a gap in its line.

use crate::models::{LongRecord, WideTable};
use tracing::warn;

/// Best-effort conversion of a raw cell to `f64`.
///
/// Accepts plain decimal numbers and magnitude suffixes (`k`, `M`, `B`, any
/// case) as used by Gapminder-style exports. Anything else, including values
/// that parse to a non-finite float, yields `None`.
pub fn coerce_numeric(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    let (digits, factor) = match s.chars().last() {
        Some('k') | Some('K') => (&s[..s.len() - 1], 1e3),
        Some('m') | Some('M') => (&s[..s.len() - 1], 1e6),
        Some('b') | Some('B') => (&s[..s.len() - 1], 1e9),
        _ => (s, 1.0),
    };
    let v = digits.trim().parse::<f64>().ok()? * factor;
    v.is_finite().then_some(v)
}

/// Melt a wide table into long form: one record per (country, year) pair,
/// in row-major source order. Never drops a pair; failed coercions are kept
/// with `value: None`.
pub fn melt(table: &WideTable) -> Vec<LongRecord> {
    let mut out = Vec::with_capacity(table.rows.len() * table.years.len());
    for row in &table.rows {
        for (year, cell) in table.years.iter().zip(&row.cells) {
            let value = coerce_numeric(cell);
            if value.is_none() && !cell.trim().is_empty() {
                warn!(country = %row.country, year, cell = %cell, "cell failed numeric coercion");
            }
            out.push(LongRecord {
                country: row.country.clone(),
                year: *year,
                value,
            });
        }
    }
    out
}

/// Integer min/max year across the whole long table (not per country).
/// `None` only when the table has no year columns at all.
pub fn year_extent(records: &[LongRecord]) -> Option<(i32, i32)> {
    let min = records.iter().map(|r| r.year).min()?;
    let max = records.iter().map(|r| r.year).max()?;
    Some((min, max))
}
