//! Joining makers to state centroids for the map view.

use std::collections::{HashMap, HashSet};

use ev_core::geo::title_case;
use ev_core::models::{Coordinate, GeoRecord, Maker, PipelineWarning};
use serde::Serialize;
use tracing::{debug, warn};

/// Result of [`join_makers`]: matched points plus the makers that could not
/// be placed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GeoJoin {
    /// One point per matched maker, in maker order.
    pub records: Vec<GeoRecord>,
    /// Makers whose title-cased state has no entry in the coordinate table.
    pub unmatched: Vec<Maker>,
}

impl GeoJoin {
    pub fn mismatch_count(&self) -> usize {
        self.unmatched.len()
    }

    /// Distinct states present in the joined records.
    pub fn states(&self) -> HashSet<&str> {
        self.records.iter().map(|r| r.state.as_str()).collect()
    }

    /// The [`PipelineWarning::JoinMismatch`] for this join, if any maker was
    /// dropped.
    pub fn warning(&self) -> Option<PipelineWarning> {
        (!self.unmatched.is_empty()).then(|| PipelineWarning::JoinMismatch {
            unmatched: self.unmatched.clone(),
        })
    }
}

/// Title-case every maker's state, then inner-join on exact state name
/// against `coordinates`.
///
/// Unmatched makers are not an error; they are listed in
/// [`GeoJoin::unmatched`]. `coordinates` is only read.
pub fn join_makers(makers: &[Maker], coordinates: &[Coordinate]) -> GeoJoin {
    let table: HashMap<&str, &Coordinate> = coordinates.iter().map(|c| (c.state, c)).collect();

    let mut join = GeoJoin::default();
    for maker in makers {
        let state = title_case(&maker.state);
        match table.get(state.as_str()) {
            Some(coord) => join.records.push(GeoRecord {
                state,
                name: maker.name.clone(),
                lat: coord.lat,
                lon: coord.lon,
            }),
            None => join.unmatched.push(maker.clone()),
        }
    }

    debug!(
        "Joined {} of {} makers to state centroids",
        join.records.len(),
        makers.len()
    );
    if !join.unmatched.is_empty() {
        warn!(
            "{} maker(s) in states without coordinates were left off the map",
            join.unmatched.len()
        );
    }

    join
}

// ── Tests ─────────────────────────────────────────────────────────────────────
