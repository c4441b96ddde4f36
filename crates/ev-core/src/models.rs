use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{DashboardError, Result};

/// Year value used by upstream exports for placeholder rows.
pub const PLACEHOLDER_YEAR: i32 = 0;

/// Anything that carries a registration year.
///
/// Implemented by every record type that the cleaner and the range filter
/// operate on.
pub trait Yearly {
    fn year(&self) -> i32;
}

// ── Wide / long records ───────────────────────────────────────────────────────

/// One row of the category dataset: a year plus one count per category column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WideRecord {
    pub year: i32,
    /// Counts keyed by category column header.
    pub counts: BTreeMap<String, u64>,
}

impl WideRecord {
    pub fn new<I, S>(year: i32, counts: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        Self {
            year,
            counts: counts.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Count for `category`, or `None` when the column is not part of this row.
    pub fn count(&self, category: &str) -> Option<u64> {
        self.counts.get(category).copied()
    }

    /// Sum of the counts of every category in `categories`.
    pub fn row_total(&self, categories: &[String]) -> u64 {
        categories
            .iter()
            .filter_map(|c| self.count(c))
            .sum()
    }
}

impl Yearly for WideRecord {
    fn year(&self) -> i32 {
        self.year
    }
}

/// A single (Year, Category, Count) observation in long format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub year: i32,
    pub category: String,
    pub count: u64,
}

impl Observation {
    pub fn new(year: i32, category: impl Into<String>, count: u64) -> Self {
        Self {
            year,
            category: category.into(),
            count,
        }
    }
}

impl Yearly for Observation {
    fn year(&self) -> i32 {
        self.year
    }
}

/// The category dataset as loaded: declared category columns plus rows.
///
/// `categories` is discovered from the header once, in column order, and is
/// threaded through reshaping and aggregation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryDataset {
    pub categories: Vec<String>,
    pub records: Vec<WideRecord>,
}

// ── Aggregation ───────────────────────────────────────────────────────────────

/// Grouping key for [`AggregateRow`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    Year,
    YearCategory,
}

/// Sum of observation counts for one distinct key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub year: i32,
    /// Present only for [`GroupKey::YearCategory`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub total: u64,
}

impl Yearly for AggregateRow {
    fn year(&self) -> i32 {
        self.year
    }
}

// ── Makers and geography ──────────────────────────────────────────────────────

/// An EV manufacturer and the state it is registered in (raw casing).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maker {
    pub state: String,
    pub name: String,
}

impl Maker {
    pub fn new(state: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            name: name.into(),
        }
    }
}

/// Map centroid for a state. State names are canonical title case.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    pub state: &'static str,
    pub lat: f64,
    pub lon: f64,
}

/// A maker joined to its state's centroid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoRecord {
    pub state: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

// ── Filter parameters ─────────────────────────────────────────────────────────

/// Inclusive year interval. Construction guarantees `min_year <= max_year`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearRange {
    min_year: i32,
    max_year: i32,
}

impl YearRange {
    /// Fails with [`DashboardError::InvalidRange`] when `min_year > max_year`.
    pub fn new(min_year: i32, max_year: i32) -> Result<Self> {
        if min_year > max_year {
            return Err(DashboardError::InvalidRange { min_year, max_year });
        }
        Ok(Self { min_year, max_year })
    }

    pub fn min_year(&self) -> i32 {
        self.min_year
    }

    pub fn max_year(&self) -> i32 {
        self.max_year
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.min_year..=self.max_year).contains(&year)
    }

    /// Clamp both ends into `bounds` (the dataset's observed min/max years).
    pub fn clamp_to(&self, bounds: YearRange) -> YearRange {
        let min_year = self.min_year.clamp(bounds.min_year, bounds.max_year);
        let max_year = self.max_year.clamp(bounds.min_year, bounds.max_year);
        // Clamping an ordered pair into an ordered interval keeps it ordered.
        YearRange { min_year, max_year }
    }
}

impl std::fmt::Display for YearRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.min_year, self.max_year)
    }
}

/// Immutable filter parameters supplied by the presentation layer for one
/// recomputation of the dashboard views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterConfig {
    pub year_range: YearRange,
    /// Categories to include in the trend series.
    pub categories: Vec<String>,
    /// Vehicle classes to include; `None` selects every class.
    pub vehicle_classes: Option<Vec<String>>,
    /// Number of vehicle-class rows shown in the preview table.
    pub preview_rows: usize,
}

impl FilterConfig {
    pub const DEFAULT_PREVIEW_ROWS: usize = 10;

    pub fn new(year_range: YearRange) -> Self {
        Self {
            year_range,
            categories: Vec::new(),
            vehicle_classes: None,
            preview_rows: Self::DEFAULT_PREVIEW_ROWS,
        }
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_vehicle_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.vehicle_classes = Some(classes.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }
}

// ── Non-fatal outcomes ────────────────────────────────────────────────────────

/// Which user selection a warning refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionKind {
    Category,
    VehicleClass,
}

/// Non-fatal outcomes returned next to pipeline results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PipelineWarning {
    /// Nothing selected; the matching series is empty but well formed.
    EmptySelection { selection: SelectionKind },
    /// Selected names that the dataset does not declare; they were ignored.
    UnknownSelection {
        selection: SelectionKind,
        names: Vec<String>,
    },
    /// Makers whose state has no centroid; they are absent from the map.
    JoinMismatch { unmatched: Vec<Maker> },
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn cats(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    // ── WideRecord ────────────────────────────────────────────────────────────

    #[test]
    fn test_wide_record_row_total() {
        let record = WideRecord::new(2020, [("BUS", 3), ("TWO WHEELER(NT)", 100)]);
        assert_eq!(record.row_total(&cats(&["BUS", "TWO WHEELER(NT)"])), 103);
        assert_eq!(record.row_total(&cats(&["BUS"])), 3);
        assert_eq!(record.row_total(&cats(&["UNKNOWN"])), 0);
    }

    #[test]
    fn test_wide_record_count_missing_category() {
        let record = WideRecord::new(2020, [("BUS", 3)]);
        assert_eq!(record.count("BUS"), Some(3));
        assert_eq!(record.count("TRUCK"), None);
    }

    // ── YearRange ─────────────────────────────────────────────────────────────

    #[test]
    fn test_year_range_rejects_inverted_bounds() {
        let err = YearRange::new(2020, 2018).unwrap_err();
        assert!(matches!(
            err,
            DashboardError::InvalidRange {
                min_year: 2020,
                max_year: 2018
            }
        ));
    }

    #[test]
    fn test_year_range_single_year() {
        let range = YearRange::new(2019, 2019).unwrap();
        assert!(range.contains(2019));
        assert!(!range.contains(2018));
        assert!(!range.contains(2020));
    }

    #[test]
    fn test_year_range_contains_inclusive() {
        let range = YearRange::new(2018, 2020).unwrap();
        assert!(range.contains(2018));
        assert!(range.contains(2020));
        assert!(!range.contains(2021));
    }

    #[test]
    fn test_year_range_clamp_to_bounds() {
        let bounds = YearRange::new(2001, 2024).unwrap();
        let wide = YearRange::new(1990, 2030).unwrap();
        assert_eq!(wide.clamp_to(bounds), bounds);

        let inner = YearRange::new(2010, 2015).unwrap();
        assert_eq!(inner.clamp_to(bounds), inner);
    }

    #[test]
    fn test_year_range_clamp_outside_collapses_to_edge() {
        let bounds = YearRange::new(2001, 2024).unwrap();
        let before = YearRange::new(1990, 1995).unwrap();
        let clamped = before.clamp_to(bounds);
        assert_eq!(clamped.min_year(), 2001);
        assert_eq!(clamped.max_year(), 2001);
    }

    #[test]
    fn test_year_range_display() {
        let range = YearRange::new(2018, 2020).unwrap();
        assert_eq!(range.to_string(), "2018-2020");
    }

    // ── FilterConfig ──────────────────────────────────────────────────────────

    #[test]
    fn test_filter_config_builder() {
        let range = YearRange::new(2018, 2020).unwrap();
        let config = FilterConfig::new(range)
            .with_categories(["BUS"])
            .with_vehicle_classes(["M1"])
            .with_preview_rows(5);

        assert_eq!(config.categories, cats(&["BUS"]));
        assert_eq!(config.vehicle_classes, Some(cats(&["M1"])));
        assert_eq!(config.preview_rows, 5);
    }

    #[test]
    fn test_filter_config_defaults() {
        let config = FilterConfig::new(YearRange::new(2001, 2024).unwrap());
        assert!(config.categories.is_empty());
        assert!(config.vehicle_classes.is_none());
        assert_eq!(config.preview_rows, FilterConfig::DEFAULT_PREVIEW_ROWS);
    }

    // ── Serialisation ─────────────────────────────────────────────────────────

    #[test]
    fn test_aggregate_row_skips_missing_category() {
        let row = AggregateRow {
            year: 2020,
            category: None,
            total: 150,
        };
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"year":2020,"total":150}"#);
    }

    #[test]
    fn test_warning_is_tagged() {
        let warning = PipelineWarning::EmptySelection {
            selection: SelectionKind::Category,
        };
        let json = serde_json::to_value(&warning).unwrap();
        assert_eq!(json["kind"], "empty_selection");
        assert_eq!(json["selection"], "category");
    }
}
