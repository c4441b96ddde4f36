//! Wide-to-long reshaping (melt) of the category dataset.

use ev_core::models::{Observation, WideRecord};

/// Melt `records` into one observation per (record, category) pair.
///
/// Output is in record order, then in the order of `categories`. Zero counts
/// are emitted so every year carries the full category axis. Columns a
/// record has that are not in `categories` are never emitted; a declared
/// category missing from a record is emitted with count `0`.
///
/// For every record, the counts emitted for it sum to
/// `record.row_total(categories)`.
pub fn reshape(records: &[WideRecord], categories: &[String]) -> Vec<Observation> {
    let mut observations = Vec::with_capacity(records.len() * categories.len());
    for record in records {
        for category in categories {
            observations.push(Observation {
                year: record.year,
                category: category.clone(),
                count: record.count(category).unwrap_or(0),
            });
        }
    }
    observations
}

// ── Tests ─────────────────────────────────────────────────────────────────────
