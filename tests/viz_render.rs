use gdp_dash::models::LongRecord;
use gdp_dash::ticks::TickSet;
use gdp_dash::viz;

fn sample_points() -> Vec<LongRecord> {
    let mut out = Vec::new();
    for (y, v) in [(2019, 1000.0), (2020, 2000.0), (2021, 3000.0)] {
        out.push(LongRecord {
            country: "Germany".into(),
            year: y,
            value: Some(v),
        });
    }
    for (y, v) in [(2019, 2000.0), (2020, 2500.0), (2021, 3500.0)] {
        out.push(LongRecord {
            country: "United States".into(),
            year: y,
            value: Some(v),
        });
    }
    out
}

fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

#[test]
fn one_polyline_per_country() {
    let points = sample_points();
    let ticks = TickSet::compute(&points).unwrap();

    let empty = viz::render_chart(&[], &ticks, (2019, 2021), "t", 800, 480).unwrap();
    let full = viz::render_chart(&points, &ticks, (2019, 2021), "t", 800, 480).unwrap();

    // two series add exactly two polylines on top of the axes/mesh baseline
    assert_eq!(
        count(&full, "<polyline"),
        count(&empty, "<polyline") + 2
    );
    assert!(full.contains("Germany"));
    assert!(full.contains("United States"));
}

#[test]
fn empty_subset_renders_axes_not_an_error() {
    let points = sample_points();
    let ticks = TickSet::compute(&points).unwrap();
    let svg = viz::render_chart(&[], &ticks, (2019, 2021), "t", 800, 480).unwrap();
    assert!(svg.contains("<svg"));
    // axis labels from the full dataset are still present
    assert!(svg.contains("4000")); // y max: ceil(3500) + 1000 -> 4500, last multiple is 4000
}

#[test]
fn missing_values_are_omitted_from_lines() {
    let points = vec![
        LongRecord {
            country: "A".into(),
            year: 2000,
            value: Some(100.0),
        },
        LongRecord {
            country: "A".into(),
            year: 2001,
            value: None,
        },
        LongRecord {
            country: "A".into(),
            year: 2002,
            value: Some(300.0),
        },
    ];
    let ticks = TickSet::compute(&points).unwrap();
    let svg = viz::render_chart(&points, &ticks, (2000, 2002), "t", 800, 480).unwrap();
    assert!(svg.contains("<svg"));
}

#[test]
fn tick_labels_appear_verbatim() {
    let points = sample_points();
    let ticks = TickSet::compute(&points).unwrap();
    let svg = viz::render_chart(&points, &ticks, (2019, 2021), "t", 800, 480).unwrap();
    for y in &ticks.y {
        assert!(svg.contains(&y.to_string()), "missing y tick {y}");
    }
    for x in &ticks.x {
        assert!(svg.contains(&x.to_string()), "missing x tick {x}");
    }
}

#[test]
fn wide_spans_label_every_25_year_tick() {
    // A two-century span must label each 25-year tick, not a subsample.
    let points: Vec<LongRecord> = (0..9)
        .map(|i| LongRecord {
            country: "A".into(),
            year: 1800 + i * 25,
            value: Some(40_000.0 + i as f64 * 1000.0),
        })
        .collect();
    let ticks = TickSet::compute(&points).unwrap();
    assert_eq!(ticks.x.len(), 9);
    let svg = viz::render_chart(&points, &ticks, (1800, 2000), "t", 1000, 600).unwrap();
    for x in &ticks.x {
        assert!(svg.contains(&x.to_string()), "missing x tick {x}");
    }
    // the padded top-of-axis label must appear verbatim as well
    assert!(svg.contains("49000"));
}

#[test]
fn degenerate_single_year_span_still_renders() {
    let points = vec![LongRecord {
        country: "A".into(),
        year: 2000,
        value: Some(10.0),
    }];
    let ticks = TickSet::compute(&points).unwrap();
    let svg = viz::render_chart(&points, &ticks, (2000, 2000), "t", 800, 480).unwrap();
    assert!(svg.contains("<svg"));
}
