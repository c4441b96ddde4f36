//! In-memory dashboard session.
//!
//! A [`DashboardSession`] holds one immutable [`DashboardData`] snapshot.
//! Filter changes never touch the files; only [`DashboardSession::reload`]
//! does, and it swaps the snapshot in one step so a failed reload leaves the
//! previous data in place.

use chrono::{DateTime, Utc};
use ev_core::error::Result;
use ev_core::models::{FilterConfig, YearRange};
use ev_data::cleaner::clean;
use ev_data::loader::{load_dashboard_data, DashboardData, DataSources};
use ev_data::range_filter::observed_year_bounds;
use ev_data::views::{build_views, DashboardViews};
use serde::Serialize;

// ── Status ────────────────────────────────────────────────────────────────────

/// Summary of the loaded snapshot, suitable for a status line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStatus {
    pub loaded_at: DateTime<Utc>,
    /// Observed year bounds of the cleaned category dataset.
    pub observed_bounds: Option<YearRange>,
    pub categories: usize,
    pub category_rows: usize,
    pub vehicle_class_rows: usize,
    pub makers: usize,
    pub company_rows: Option<usize>,
}

// ── DashboardSession ──────────────────────────────────────────────────────────

/// Loaded dataset plus the sources it came from.
///
/// # Example
/// ```no_run
/// use std::path::PathBuf;
/// use ev_runtime::session::DashboardSession;
/// use ev_data::loader::DataSources;
///
/// let sources = DataSources {
///     categories: PathBuf::from("ev_cat_01-24.csv"),
///     vehicle_classes: PathBuf::from("Vehicle Class - All.csv"),
///     makers: PathBuf::from("EV_Maker.csv"),
///     company_sales: None,
/// };
/// let session = DashboardSession::load(sources).unwrap();
/// println!("years: {:?}", session.observed_bounds());
/// ```
#[derive(Debug)]
pub struct DashboardSession {
    sources: DataSources,
    data: DashboardData,
    loaded_at: DateTime<Utc>,
    observed_bounds: Option<YearRange>,
}

impl DashboardSession {
    /// Load every source. Any load failure is returned unmodified.
    pub fn load(sources: DataSources) -> Result<Self> {
        let data = load_dashboard_data(&sources)?;
        let session = Self::from_data(sources, data);
        tracing::info!(
            categories = session.data.categories.categories.len(),
            rows = session.data.categories.records.len(),
            makers = session.data.makers.len(),
            "dashboard data loaded"
        );
        Ok(session)
    }

    /// Wrap an already loaded snapshot.
    pub fn from_data(sources: DataSources, data: DashboardData) -> Self {
        let observed_bounds = observed_year_bounds(&clean(&data.categories.records));
        Self {
            sources,
            data,
            loaded_at: Utc::now(),
            observed_bounds,
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Re-read every source and replace the snapshot.
    ///
    /// On failure the current snapshot is kept and the error is returned.
    pub fn reload(&mut self) -> Result<()> {
        match load_dashboard_data(&self.sources) {
            Ok(data) => {
                self.observed_bounds = observed_year_bounds(&clean(&data.categories.records));
                self.data = data;
                self.loaded_at = Utc::now();
                tracing::debug!("dashboard data reloaded");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "reload failed; keeping previous data");
                Err(e)
            }
        }
    }

    pub fn data(&self) -> &DashboardData {
        &self.data
    }

    pub fn sources(&self) -> &DataSources {
        &self.sources
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Min/max year of the cleaned category dataset, or `None` when it has
    /// no valid rows.
    pub fn observed_bounds(&self) -> Option<YearRange> {
        self.observed_bounds
    }

    /// Clamp `range` into the observed bounds. Returned unchanged when the
    /// dataset has no valid rows.
    pub fn clamp(&self, range: YearRange) -> YearRange {
        match self.observed_bounds {
            Some(bounds) => range.clamp_to(bounds),
            None => range,
        }
    }

    /// Recompute every view for `filter`, after clamping its year range.
    pub fn views(&self, filter: &FilterConfig) -> Result<DashboardViews> {
        let clamped = self.clamp(filter.year_range);
        if clamped != filter.year_range {
            tracing::debug!(
                requested = %filter.year_range,
                clamped = %clamped,
                "year range clamped to observed bounds"
            );
        }
        let filter = FilterConfig {
            year_range: clamped,
            ..filter.clone()
        };
        build_views(&self.data, &filter)
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            loaded_at: self.loaded_at,
            observed_bounds: self.observed_bounds,
            categories: self.data.categories.categories.len(),
            category_rows: self.data.categories.records.len(),
            vehicle_class_rows: self.data.vehicle_classes.len(),
            makers: self.data.makers.len(),
            company_rows: self.data.company_sales.as_ref().map(Vec::len),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
