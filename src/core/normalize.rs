//! Presentation normalization of summary records.
//!
//! Averages are rounded to [`AVERAGE_DECIMALS`] places using round-half-to-even,
//! matching the rounding of the reference numeric stack. Integral columns are
//! `i64` throughout the pipeline, so no fractional part can reach them.

use crate::core::summary::WindowSummary;

/// Decimal places kept on averaged fields.
pub const AVERAGE_DECIMALS: i32 = 2;

/// Round `value` to `decimals` places, ties to even.
pub fn round_half_even(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}

/// Return a normalized copy of `summaries`; the input is left untouched.
pub fn normalize(summaries: &[WindowSummary]) -> Vec<WindowSummary> {
    summaries
        .iter()
        .map(|s| s.map_averages(|v| round_half_even(v, AVERAGE_DECIMALS)))
        .collect()
}
