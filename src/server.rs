//! HTTP surface: one page, one chart endpoint.
//!
//! `GET /` serves the dashboard page with a multi-select country control and
//! a year range control. A small script re-fetches `GET /chart` whenever
//! either control changes and swaps the returned SVG in wholesale. There is
//! no incremental patching and no state on the server beyond the immutable
//! [`Dataset`].

use crate::models::{COUNTRY_SENTINEL, Dataset, Selection};
use crate::{query, viz};
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{debug, warn};
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

/// Chart dimensions served to the page.
const CHART_WIDTH: u32 = 1000;
const CHART_HEIGHT: u32 = 600;

const TITLE_WITH_SERIES: &str = "GDP per Capita throughout the Years in Various Countries";
const TITLE_NO_SERIES: &str = "GDP vs. Years";

/// Query string for `GET /chart`. Country names may contain commas, so the
/// page joins them with `|`.
#[derive(Debug, Deserialize)]
struct ChartQuery {
    countries: Option<String>,
    from: Option<i32>,
    to: Option<i32>,
}

fn with_data(
    data: Arc<Dataset>,
) -> impl Filter<Extract = (Arc<Dataset>,), Error = Infallible> + Clone {
    warp::any().map(move || data.clone())
}

/// All routes of the dashboard.
pub fn routes(
    data: Arc<Dataset>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let page = warp::path::end()
        .and(warp::get())
        .and(with_data(data.clone()))
        .and_then(page);

    let chart = warp::path("chart")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<ChartQuery>())
        .and(with_data(data))
        .and_then(chart);

    page.or(chart)
}

async fn page(data: Arc<Dataset>) -> Result<impl Reply, Rejection> {
    Ok(warp::reply::html(render_page(&data)))
}

async fn chart(q: ChartQuery, data: Arc<Dataset>) -> Result<impl Reply, Rejection> {
    let countries: Vec<String> = q
        .countries
        .as_deref()
        .unwrap_or(COUNTRY_SENTINEL)
        .split('|')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(String::from)
        .collect();
    let selection = Selection::new(
        countries,
        q.from.unwrap_or(data.min_year),
        q.to.unwrap_or(data.max_year),
    );

    let subset = query::filter(&data.records, &selection);
    debug!(
        countries = selection.countries.len(),
        lo = selection.lo,
        hi = selection.hi,
        rows = subset.len(),
        "rendering chart"
    );

    let title = if subset.is_empty() {
        TITLE_NO_SERIES
    } else {
        TITLE_WITH_SERIES
    };

    // Axis span and ticks always come from the full dataset, never the subset.
    match viz::render_chart(
        &subset,
        &data.ticks,
        (data.min_year, data.max_year),
        title,
        CHART_WIDTH,
        CHART_HEIGHT,
    ) {
        Ok(svg) => Ok(warp::reply::with_header(svg, "content-type", "image/svg+xml")
            .into_response()),
        Err(e) => {
            warn!("chart rendering failed: {:?}", e);
            Ok(
                warp::reply::with_status("chart rendering failed", StatusCode::INTERNAL_SERVER_ERROR)
                    .into_response(),
            )
        }
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Build the dashboard page. The controls are bound to the full dataset
/// extent; the placeholder option is selected by default, so no lines show
/// until the user picks a real country.
fn render_page(data: &Dataset) -> String {
    let mut options = format!(
        "        <option value=\"{0}\" selected>{0}</option>\n",
        COUNTRY_SENTINEL
    );
    for country in &data.countries {
        let c = html_escape(country);
        options.push_str(&format!("        <option value=\"{c}\">{c}</option>\n"));
    }

    // Labeled marks every 50 years, matching the source dashboard's slider.
    let mut marks = String::new();
    for year in (data.min_year..=data.max_year).step_by(50) {
        marks.push_str(&format!(
            "        <option value=\"{year}\" label=\"{year}\"></option>\n"
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>GDP per Capita Analysis</title>
  <style>
    body {{ font-family: sans-serif; margin: 2em; }}
    h1 {{ text-align: center; }}
    .controls {{ display: flex; gap: 2em; padding: 10px; }}
    .controls > div {{ flex: 1; }}
    select {{ width: 100%; text-align: center; color: black; background-color: white; }}
    input[type=range] {{ width: 100%; }}
    #chart {{ padding: 50px 0; }}
  </style>
</head>
<body>
  <h1>GDP per Capita Analysis</h1>
  <p>Pick one or more countries and a year range; the chart redraws on every
  change, plotting one GDP-per-capita line per selected country over the
  selected years.</p>
  <div class="controls">
    <div>
      <label for="countries">Countries</label>
      <select id="countries" multiple size="8">
{options}      </select>
    </div>
    <div>
      <label>Years: <span id="year-label">{min_year}&ndash;{max_year}</span></label>
      <input type="range" id="year-lo" min="{min_year}" max="{max_year}" value="{min_year}" list="year-marks">
      <input type="range" id="year-hi" min="{min_year}" max="{max_year}" value="{max_year}" list="year-marks">
      <datalist id="year-marks">
{marks}      </datalist>
    </div>
  </div>
  <div id="chart"></div>
  <script>
    const sel = document.getElementById('countries');
    const lo = document.getElementById('year-lo');
    const hi = document.getElementById('year-hi');
    const label = document.getElementById('year-label');
    async function redraw() {{
      const from = Math.min(+lo.value, +hi.value);
      const to = Math.max(+lo.value, +hi.value);
      label.textContent = from + '–' + to;
      const countries = Array.from(sel.selectedOptions).map(o => o.value).join('|');
      const params = new URLSearchParams({{ countries, from, to }});
      const resp = await fetch('/chart?' + params);
      document.getElementById('chart').innerHTML = await resp.text();
    }}
    sel.addEventListener('change', redraw);
    lo.addEventListener('change', redraw);
    hi.addEventListener('change', redraw);
    redraw();
  </script>
</body>
</html>
"#,
        options = options,
        marks = marks,
        min_year = data.min_year,
        max_year = data.max_year,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{WideRecord, WideTable};

    fn dataset() -> Arc<Dataset> {
        let table = WideTable {
            years: vec![2000, 2001, 2002],
            rows: vec![
                WideRecord {
                    country: "A".into(),
                    cells: vec!["100".into(), "200".into(), "300".into()],
                },
                WideRecord {
                    country: "B".into(),
                    cells: vec!["150".into(), "250".into(), "50k".into()],
                },
            ],
        };
        Arc::new(Dataset::from_wide(&table).unwrap())
    }

    #[tokio::test]
    async fn page_lists_every_country_and_the_placeholder() {
        let resp = warp::test::request()
            .method("GET")
            .path("/")
            .reply(&routes(dataset()))
            .await;
        assert_eq!(resp.status(), 200);
        let body = String::from_utf8_lossy(resp.body());
        assert!(body.contains("<select"));
        assert!(body.contains(">A</option>"));
        assert!(body.contains(">B</option>"));
        assert!(body.contains(COUNTRY_SENTINEL));
        // slider bounded by the dataset extent
        assert!(body.contains("min=\"2000\""));
        assert!(body.contains("max=\"2002\""));
    }

    #[tokio::test]
    async fn chart_returns_svg_for_a_selection() {
        let resp = warp::test::request()
            .method("GET")
            .path("/chart?countries=A&from=2000&to=2001")
            .reply(&routes(dataset()))
            .await;
        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers().get("content-type").unwrap(),
            "image/svg+xml"
        );
        let body = String::from_utf8_lossy(resp.body());
        assert!(body.contains("<svg"));
        assert!(body.contains("A")); // legend entry
    }

    #[tokio::test]
    async fn filtered_chart_keeps_full_dataset_ticks() {
        // Max value is 50000, so the fixed y-axis must label 51000 even when
        // the filter excludes country B entirely.
        let resp = warp::test::request()
            .method("GET")
            .path("/chart?countries=A&from=2000&to=2001")
            .reply(&routes(dataset()))
            .await;
        let body = String::from_utf8_lossy(resp.body());
        assert!(body.contains("51000"));
    }

    #[tokio::test]
    async fn sentinel_selection_renders_axes_only() {
        let resp = warp::test::request()
            .method("GET")
            .path("/chart?countries=Select...&from=2000&to=2002")
            .reply(&routes(dataset()))
            .await;
        assert_eq!(resp.status(), 200);
        let body = String::from_utf8_lossy(resp.body());
        assert!(body.contains("<svg"));
        // no series, but the fixed axis labels are still there
        assert!(body.contains("51000"));
    }

    #[tokio::test]
    async fn chart_defaults_to_full_range() {
        let resp = warp::test::request()
            .method("GET")
            .path("/chart")
            .reply(&routes(dataset()))
            .await;
        assert_eq!(resp.status(), 200);
    }
}
