//! Chart rendering: the filtered long table becomes a multi-series **SVG**
//! line chart, one line per country, with axis labels pinned to the
//! precomputed [`TickSet`] so the scale stays put while the user filters.
//!
//! Rendering goes to an in-memory string; the server embeds it straight into
//! the page, fully replacing whatever chart was shown before.

use crate::models::LongRecord;
use crate::ticks::TickSet;
use anyhow::Result;
use plotters::coord::ranged1d::{DefaultFormatting, KeyPointHint, Ranged};
use plotters::coord::types::{RangedCoordf64, RangedCoordi32};
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters_svg::SVGBackend;
use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::Once;

/// One-time registration for a fallback "sans-serif" font when using the
/// `ab_glyph` text path. Required because `ab_glyph` doesn't discover OS fonts.
static INIT_FONTS: Once = Once::new();

fn ensure_fonts_registered() {
    INIT_FONTS.call_once(|| {
        let _ = plotters::style::register_font(
            "sans-serif",
            plotters::style::FontStyle::Normal,
            include_bytes!("../assets/DejaVuSans.ttf"),
        );
    });
}

/// Microsoft Office (2013+) chart series palette.
const OFFICE10: [RGBColor; 10] = [
    RGBColor(68, 114, 196),  // blue      (#4472C4)
    RGBColor(237, 125, 49),  // orange    (#ED7D31)
    RGBColor(165, 165, 165), // gray      (#A5A5A5)
    RGBColor(255, 192, 0),   // gold      (#FFC000)
    RGBColor(91, 155, 213),  // light blue(#5B9BD5)
    RGBColor(112, 173, 71),  // green     (#70AD47)
    RGBColor(38, 68, 120),   // dark blue (#264478)
    RGBColor(158, 72, 14),   // dark org. (#9E480E)
    RGBColor(99, 99, 99),    // dark gray (#636363)
    RGBColor(153, 115, 0),   // brownish  (#997300)
];

#[inline]
fn office_color(idx: usize) -> RGBAColor {
    OFFICE10[idx % OFFICE10.len()].to_rgba()
}

/// Year axis whose labels sit exactly at the precomputed tick years, never
/// at positions plotters would pick on its own. Mapping delegates to the
/// plain integer coord.
struct YearAxis {
    inner: RangedCoordi32,
    ticks: Vec<i32>,
}

impl YearAxis {
    fn new(range: Range<i32>, ticks: Vec<i32>) -> Self {
        Self {
            inner: range.into(),
            ticks,
        }
    }
}

impl Ranged for YearAxis {
    type FormatOption = DefaultFormatting;
    type ValueType = i32;

    fn map(&self, value: &i32, limit: (i32, i32)) -> i32 {
        self.inner.map(value, limit)
    }

    fn key_points<Hint: KeyPointHint>(&self, _hint: Hint) -> Vec<i32> {
        self.ticks.clone()
    }

    fn range(&self) -> Range<i32> {
        self.inner.range()
    }
}

/// Value axis pinned to the precomputed tick values, same shape as
/// [`YearAxis`].
struct ValueAxis {
    inner: RangedCoordf64,
    ticks: Vec<f64>,
}

impl ValueAxis {
    fn new(range: Range<f64>, ticks: Vec<f64>) -> Self {
        Self {
            inner: range.into(),
            ticks,
        }
    }
}

impl Ranged for ValueAxis {
    type FormatOption = DefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        self.inner.map(value, limit)
    }

    fn key_points<Hint: KeyPointHint>(&self, _hint: Hint) -> Vec<f64> {
        self.ticks.clone()
    }

    fn range(&self) -> Range<f64> {
        self.inner.range()
    }
}

/// Heuristic text width; Plotters has no built-in text measuring.
fn estimate_text_width_px(text: &str, font_px: u32) -> u32 {
    ((text.chars().count() as f32) * (font_px as f32) * 0.60).ceil() as u32
}

/// Tight left label area for the widest y tick label, padded and clamped.
fn left_label_area_px(ticks: &TickSet, font_px: u32) -> u32 {
    let widest = ticks
        .y
        .iter()
        .map(|v| estimate_text_width_px(&v.to_string(), font_px))
        .max()
        .unwrap_or(0);
    widest.saturating_add(18).clamp(48, 140)
}

/// Render `points` as an SVG line chart string.
///
/// `ticks` must come from the full dataset (see [`TickSet::compute`]) and
/// `x_span` is the full dataset year extent; both are deliberately
/// independent of the current filter. An empty `points` slice is valid and
/// renders axes with no series (the startup state before any country is
/// picked).
pub fn render_chart(
    points: &[LongRecord],
    ticks: &TickSet,
    x_span: (i32, i32),
    title: &str,
    width: u32,
    height: u32,
) -> Result<String> {
    ensure_fonts_registered();

    let (mut min_year, mut max_year) = x_span;
    if min_year == max_year {
        min_year -= 1;
        max_year += 1;
    }

    // Group as country -> Vec<(year, value)>, missing points dropped so a
    // coercion gap shows as a gap in the line, not a crash.
    let mut groups: BTreeMap<String, Vec<(i32, f64)>> = BTreeMap::new();
    for p in points {
        if let Some(v) = p.value {
            groups.entry(p.country.clone()).or_default().push((p.year, v));
        }
    }
    for series in groups.values_mut() {
        series.sort_by_key(|(y, _)| *y);
    }

    let left_px = left_label_area_px(ticks, 12);
    // Pad past the last tick so key points on the boundary are still labeled.
    let y_top = (ticks.y_max() as f64 * 1.02).max(1.0);
    let x_end = max_year + 1;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| anyhow::anyhow!("{:?}", e))?;

        let mut chart = ChartBuilder::on(&root)
            .margin(16)
            .caption(title, (FontFamily::SansSerif, 24))
            .set_label_area_size(LabelAreaPosition::Left, left_px)
            .set_label_area_size(LabelAreaPosition::Bottom, 56)
            .build_cartesian_2d(
                YearAxis::new(min_year..x_end, ticks.x.clone()),
                ValueAxis::new(0f64..y_top, ticks.y.iter().map(|v| *v as f64).collect()),
            )
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;

        chart
            .configure_mesh()
            .x_desc("Year")
            .y_desc("GDP per capita")
            .x_label_formatter(&|x: &i32| x.to_string())
            .y_label_formatter(&|v: &f64| format!("{}", v.round() as i64))
            .label_style((FontFamily::SansSerif, 12))
            .axis_desc_style((FontFamily::SansSerif, 16))
            .draw()
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;

        for (idx, (country, series)) in groups.iter().enumerate() {
            let color = office_color(idx);
            let style = ShapeStyle {
                color,
                filled: false,
                stroke_width: 2,
            };
            let elem = chart
                .draw_series(LineSeries::new(series.iter().map(|(y, v)| (*y, *v)), style))
                .map_err(|e| anyhow::anyhow!("{:?}", e))?;
            let legend_color = color;
            let legend_text = country.clone();
            elem.label(country.clone()).legend(move |(x, y)| {
                EmptyElement::at((x, y))
                    + Circle::new((x + 8, y), 4, legend_color.filled())
                    + Text::new(legend_text.clone(), (x + 20, y), (FontFamily::SansSerif, 14))
            });
        }

        if !groups.is_empty() {
            chart
                .configure_series_labels()
                .border_style(BLACK)
                .position(SeriesLabelPosition::UpperLeft)
                .background_style(WHITE.mix(0.85))
                .label_font((FontFamily::SansSerif, 14))
                .draw()
                .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        }

        root.present().map_err(|e| anyhow::anyhow!("{:?}", e))?;
    }
    Ok(svg)
}
