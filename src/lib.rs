//! gdp_dash
//!
//! A small local dashboard that plots GDP-per-capita trends per country from
//! a static wide CSV (`country` column + one column per year). Pairs with the
//! `gdp-dash` binary, which serves the interactive page.
//!
//! ### Pipeline
//! - Load the wide table once at startup ([`loader`])
//! - Melt it into one (country, year, value) row per pair, coercing cells to
//!   numbers and keeping failures as missing ([`reshape`])
//! - Derive fixed axis ticks from the full table ([`ticks`])
//! - On every interaction, filter by country set and year range ([`query`])
//!   and re-render the SVG line chart wholesale ([`viz`], [`server`])
//!
//! ### Example
//! ```no_run
//! use gdp_dash::models::{Dataset, Selection};
//! use gdp_dash::{loader, query, viz};
//!
//! let table = loader::load_wide("gdp_pcap.csv")?;
//! let data = Dataset::from_wide(&table)?;
//! let subset = query::filter(&data.records, &Selection::new(["Sweden"], 1900, 2000));
//! let svg = viz::render_chart(
//!     &subset,
//!     &data.ticks,
//!     (data.min_year, data.max_year),
//!     "GDP per Capita",
//!     1000,
//!     600,
//! )?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod loader;
pub mod models;
pub mod query;
pub mod reshape;
pub mod server;
pub mod ticks;
pub mod viz;

pub use models::{COUNTRY_SENTINEL, Dataset, LongRecord, Selection, WideRecord, WideTable};
pub use ticks::TickSet;
