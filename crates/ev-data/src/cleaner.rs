//! Placeholder-row removal.

use ev_core::models::{Yearly, PLACEHOLDER_YEAR};
use tracing::debug;

/// Return the rows whose year is not the placeholder `0`, in original order.
///
/// Idempotent, and never fails: an empty result is a valid result.
pub fn clean<T: Yearly + Clone>(records: &[T]) -> Vec<T> {
    let kept: Vec<T> = records
        .iter()
        .filter(|r| r.year() != PLACEHOLDER_YEAR)
        .cloned()
        .collect();

    if kept.len() != records.len() {
        debug!("Removed {} placeholder rows", records.len() - kept.len());
    }
    kept
}

// ── Tests ─────────────────────────────────────────────────────────────────────
