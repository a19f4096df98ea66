use chrono::{Days, NaiveDate};
use rand::Rng;

use medsynth_core::DateWindow;

/// Uniform pick from a closed code set. Code sets are never empty.
pub(crate) fn pick<T: Copy>(values: &[T], rng: &mut impl Rng) -> T {
    let idx = rng.random_range(0..values.len());
    values[idx]
}

/// Uniform date in the inclusive window.
pub(crate) fn date_in(window: &DateWindow, rng: &mut impl Rng) -> NaiveDate {
    let offset = rng.random_range(0..=window.span_days()) as u64;
    window
        .start()
        .checked_add_days(Days::new(offset))
        .unwrap_or(window.end())
}

/// Round half away from zero to `digits` fractional digits.
pub(crate) fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10_f64.powi(digits);
    (value * factor).round() / factor
}
