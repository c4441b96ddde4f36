//! Inclusive year-range filtering and observed-bound discovery.

use ev_core::error::Result;
use ev_core::models::{Yearly, YearRange};

/// Keep the rows whose year lies in `[min_year, max_year]`, in original order.
///
/// Rejects `min_year > max_year` with `InvalidRange` before looking at any
/// row. Bounds are taken as given; clamping them to the dataset is the
/// caller's job (see [`observed_year_bounds`]).
pub fn filter_years<T: Yearly + Clone>(
    records: &[T],
    min_year: i32,
    max_year: i32,
) -> Result<Vec<T>> {
    let range = YearRange::new(min_year, max_year)?;
    Ok(filter_range(records, range))
}

/// Keep the rows whose year lies in `range`, in original order.
pub fn filter_range<T: Yearly + Clone>(records: &[T], range: YearRange) -> Vec<T> {
    records
        .iter()
        .filter(|r| range.contains(r.year()))
        .cloned()
        .collect()
}

/// Smallest and largest year in `records`, or `None` when empty.
pub fn observed_year_bounds<T: Yearly>(records: &[T]) -> Option<YearRange> {
    let min = records.iter().map(T::year).min()?;
    let max = records.iter().map(T::year).max()?;
    YearRange::new(min, max).ok()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
