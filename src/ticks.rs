//! Axis tick derivation. Ticks are computed once from the *full* long table
//! and reused for every render, filtered or not, so the axis scale never
//! shifts under the user while they interact.

use crate::models::LongRecord;
use anyhow::{Result, anyhow};

/// Spacing of year labels on the x-axis.
pub const X_STEP: i32 = 25;
/// Spacing of value labels on the y-axis.
pub const Y_STEP: i64 = 1000;
/// Ceiling on the y ladder length. Coercion accepts `B`-suffixed cells, so a
/// single billions-scale value must not materialize millions of labels.
const MAX_Y_TICKS: i64 = 1000;

/// Fixed axis label positions: `x` in years, `y` in value units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickSet {
    pub x: Vec<i32>,
    pub y: Vec<i64>,
}

impl TickSet {
    /// Derive ticks from the full dataset.
    ///
    /// x: `min_year..=max_year` stepping by 25; the last tick may fall short
    /// of `max_year` when the span is not a multiple of 25.
    /// y: `0..=ceil(max_value) + 1000` stepping by 1000 over non-missing
    /// values. When that ladder would exceed [`MAX_Y_TICKS`] entries the step
    /// widens to the smallest multiple of 1000 that fits, so one
    /// billions-scale cell cannot blow up the label count.
    ///
    /// Errors when there is no year column or no numeric value anywhere;
    /// both make the dashboard unservable and are fatal at startup.
    pub fn compute(records: &[LongRecord]) -> Result<Self> {
        let (min_year, max_year) = crate::reshape::year_extent(records)
            .ok_or_else(|| anyhow!("no years to derive x-axis ticks from"))?;
        let x: Vec<i32> = (min_year..=max_year).step_by(X_STEP as usize).collect();

        let max_value = records
            .iter()
            .filter_map(|r| r.value)
            .fold(f64::NEG_INFINITY, f64::max);
        if !max_value.is_finite() {
            return Err(anyhow!("no numeric values to derive y-axis ticks from"));
        }
        let upper = max_value.ceil() as i64 + Y_STEP;
        let ladder = Y_STEP * (MAX_Y_TICKS - 1);
        let step = Y_STEP * ((upper + ladder - 1) / ladder).max(1);
        let y: Vec<i64> = (0..=upper).step_by(step as usize).collect();

        Ok(Self { x, y })
    }

    /// Upper bound of the y-axis (the last tick; at least one tick always
    /// exists since the range starts at 0).
    pub fn y_max(&self) -> i64 {
        *self.y.last().unwrap_or(&Y_STEP)
    }
}
