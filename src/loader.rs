//! Dataset loading: read the wide CSV (one row per country, one column per
//! year) into a [`WideTable`]. Loading happens once at process start; any
//! error here is fatal and the server never comes up.

use crate::models::{WideRecord, WideTable};
use csv::ReaderBuilder;
use std::path::Path;
use thiserror::Error;

/// Startup load failures. Per-cell parse problems are *not* errors; they are
/// handled later by coercion in the reshaper.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Missing or unreadable input file.
    #[error("cannot read dataset file: {0}")]
    File(#[from] std::io::Error),
    /// The table shape is wrong: no `country` header column, a year column
    /// label that is not an integer, or a malformed CSV row.
    #[error("malformed dataset: {0}")]
    Format(String),
}

impl From<csv::Error> for LoadError {
    fn from(e: csv::Error) -> Self {
        if e.is_io_error() {
            match e.into_kind() {
                csv::ErrorKind::Io(io) => LoadError::File(io),
                other => LoadError::Format(format!("{:?}", other)),
            }
        } else {
            LoadError::Format(e.to_string())
        }
    }
}

/// Read a wide table from `path`.
///
/// The header must start with a `country` column; every remaining column
/// label must parse as an integer year. Rows shorter than the header are
/// padded with empty cells (which coerce to missing later), so a ragged
/// trailing cell never aborts the load. Rows *longer* than the header are
/// rejected: a surplus cell means the columns are misaligned, and silently
/// dropping it would shift values between years.
pub fn load_wide<P: AsRef<Path>>(path: P) -> Result<WideTable, LoadError> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_path(path)?;

    let headers = rdr.headers()?.clone();
    let mut iter = headers.iter();
    match iter.next() {
        Some(first) if first.trim().eq_ignore_ascii_case("country") => {}
        other => {
            return Err(LoadError::Format(format!(
                "expected first column `country`, found {:?}",
                other.unwrap_or("")
            )));
        }
    }

    let mut years = Vec::new();
    for label in iter {
        let year = label.trim().parse::<i32>().map_err(|_| {
            LoadError::Format(format!("year column label `{}` is not an integer", label))
        })?;
        years.push(year);
    }

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        if record.len() > years.len() + 1 {
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            return Err(LoadError::Format(format!(
                "row at line {} has {} cells but the header declares {} year columns",
                line,
                record.len() - 1,
                years.len()
            )));
        }
        let mut fields = record.iter();
        let country = fields.next().unwrap_or("").trim().to_string();
        let mut cells: Vec<String> = fields.map(|c| c.to_string()).collect();
        cells.resize(years.len(), String::new());
        rows.push(WideRecord { country, cells });
    }

    Ok(WideTable { years, rows })
}
