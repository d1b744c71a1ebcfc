use crate::ticks::TickSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Placeholder dropdown entry shown before the user picks a real country.
/// It never matches a row, so the initial chart draws axes only.
pub const COUNTRY_SENTINEL: &str = "Select...";

/// One source row: a country plus one raw cell per year column.
/// Cells stay as strings until the reshaper coerces them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WideRecord {
    pub country: String,
    pub cells: Vec<String>,
}

/// The wide table as loaded: year column labels (already parsed as integers,
/// in header order) plus one record per country. Immutable after load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WideTable {
    pub years: Vec<i32>,
    pub rows: Vec<WideRecord>,
}

/// Tidy structure used for filtering and plotting (one row = one observation).
/// `value` is `None` when the source cell failed numeric coercion; such points
/// are simply absent from the rendered line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LongRecord {
    pub country: String,
    pub year: i32,
    pub value: Option<f64>,
}

/// What the user currently has picked: a set of country names and an
/// inclusive year range. Lives only for the page session; the base tables
/// are never mutated by a selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub countries: BTreeSet<String>,
    pub lo: i32,
    pub hi: i32,
}

impl Selection {
    /// Build a selection, normalizing a reversed range.
    pub fn new<I, S>(countries: I, lo: i32, hi: i32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            countries: countries.into_iter().map(Into::into).collect(),
            lo: lo.min(hi),
            hi: lo.max(hi),
        }
    }
}

/// Everything the request handlers need, built once at startup and shared
/// read-only behind an `Arc`. Ticks come from the full dataset so axis labels
/// never shift as the user filters.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub records: Vec<LongRecord>,
    /// Distinct country names, once each, in first-seen order.
    pub countries: Vec<String>,
    pub min_year: i32,
    pub max_year: i32,
    pub ticks: TickSet,
}

impl Dataset {
    /// Reshape a loaded wide table and precompute everything derived from it.
    ///
    /// Errors when the table yields no plottable data at all (no years or no
    /// numeric value anywhere) since the dashboard cannot serve without axes.
    pub fn from_wide(table: &WideTable) -> anyhow::Result<Self> {
        let records = crate::reshape::melt(table);
        let (min_year, max_year) = crate::reshape::year_extent(&records)
            .ok_or_else(|| anyhow::anyhow!("dataset has no year columns"))?;
        let ticks = TickSet::compute(&records)?;

        let mut seen = BTreeSet::new();
        let mut countries = Vec::new();
        for row in &table.rows {
            if seen.insert(row.country.clone()) {
                countries.push(row.country.clone());
            }
        }

        Ok(Self {
            records,
            countries,
            min_year,
            max_year,
            ticks,
        })
    }
}
