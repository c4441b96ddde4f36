//! Dashboard view pipeline.
//!
//! Runs every stage for one [`FilterConfig`] and returns the structured
//! tables the presentation layer draws: bar-chart distribution, trend lines,
//! vehicle-class series, company series and map points.

use ev_core::error::Result;
use ev_core::geo::STATE_COORDINATES;
use ev_core::models::{
    AggregateRow, FilterConfig, GroupKey, Observation, PipelineWarning, SelectionKind, YearRange,
};
use serde::Serialize;
use tracing::debug;

use crate::aggregator::RegistrationAggregator;
use crate::cleaner::clean;
use crate::geo_joiner::{join_makers, GeoJoin};
use crate::loader::DashboardData;
use crate::range_filter::{filter_range, filter_years};
use crate::reshaper::reshape;
use crate::selection::{distinct_categories, resolve_selection, retain_categories};

/// Headroom added above the tallest bar so labels are not clipped.
pub const COUNT_AXIS_HEADROOM: u64 = 500;

// ── Public types ──────────────────────────────────────────────────────────────

/// Row counts describing one [`build_views`] run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewMetadata {
    /// Year range the views were computed for.
    pub year_range: YearRange,
    /// Category rows surviving the cleaner and the range filter.
    pub records_in_range: usize,
    /// Observations in `distribution`.
    pub observations: usize,
    /// Vehicle-class observations in range, before class selection.
    pub class_observations_in_range: usize,
    pub makers_joined: usize,
    pub makers_unmatched: usize,
}

/// Every table the dashboard renders for one set of filter parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardViews {
    /// Long observations for every declared category in range.
    pub distribution: Vec<Observation>,
    /// Upper extent of the count axis for `distribution`.
    pub count_axis_max: u64,
    /// Per-year totals for the selected categories.
    pub trend: Vec<AggregateRow>,
    /// Per-year totals for every declared category.
    pub category_totals: Vec<AggregateRow>,
    /// Per-year totals across all categories.
    pub yearly_totals: Vec<AggregateRow>,
    /// Per-year totals for the selected vehicle classes.
    pub class_series: Vec<AggregateRow>,
    /// Leading rows of the vehicle-class dataset as loaded.
    pub class_preview: Vec<Observation>,
    /// Per-year totals per company; `None` without a company source.
    pub company_series: Option<Vec<AggregateRow>>,
    pub company_yearly_totals: Option<Vec<AggregateRow>>,
    pub geo: GeoJoin,
    pub warnings: Vec<PipelineWarning>,
    pub metadata: ViewMetadata,
}

// ── Public function ───────────────────────────────────────────────────────────

/// Compute all dashboard views from `data` for `filter`.
///
/// 1. Clean, range-filter and reshape the category dataset.
/// 2. Aggregate the distribution and the selected categories.
/// 3. Clean, range-filter and aggregate the selected vehicle classes.
/// 4. Aggregate the company dataset when present.
/// 5. Join makers to state centroids.
///
/// Selections that match nothing and makers that cannot be placed are
/// reported in [`DashboardViews::warnings`], never as errors.
pub fn build_views(data: &DashboardData, filter: &FilterConfig) -> Result<DashboardViews> {
    let range = filter.year_range;
    let mut warnings = Vec::new();

    // ── Step 1: Category distribution ─────────────────────────────────────────
    let cleaned = clean(&data.categories.records);
    let in_range = filter_years(&cleaned, range.min_year(), range.max_year())?;
    let distribution = reshape(&in_range, &data.categories.categories);
    let count_axis_max =
        distribution.iter().map(|o| o.count).max().unwrap_or(0) + COUNT_AXIS_HEADROOM;

    // ── Step 2: Category aggregates ───────────────────────────────────────────
    let category_totals = RegistrationAggregator::aggregate(&distribution, GroupKey::YearCategory);
    let yearly_totals = RegistrationAggregator::aggregate(&distribution, GroupKey::Year);

    let selection = resolve_selection(
        &data.categories.categories,
        &filter.categories,
        SelectionKind::Category,
    );
    warnings.extend(selection.warnings);
    let selected = retain_categories(&distribution, &selection.names);
    let trend = RegistrationAggregator::by_year_category(&selected);

    // ── Step 3: Vehicle classes ───────────────────────────────────────────────
    let classes = clean(&data.vehicle_classes);
    let classes_in_range = filter_range(&classes, range);
    let declared_classes = distinct_categories(&classes);
    let selected_classes = match &filter.vehicle_classes {
        None => declared_classes,
        Some(requested) => {
            let selection =
                resolve_selection(&declared_classes, requested, SelectionKind::VehicleClass);
            warnings.extend(selection.warnings);
            selection.names
        }
    };
    let class_series = RegistrationAggregator::by_year_category(&retain_categories(
        &classes_in_range,
        &selected_classes,
    ));
    let class_preview: Vec<Observation> = data
        .vehicle_classes
        .iter()
        .take(filter.preview_rows)
        .cloned()
        .collect();

    // ── Step 4: Companies ─────────────────────────────────────────────────────
    let company_in_range = data
        .company_sales
        .as_deref()
        .map(|sales| filter_range(&clean(sales), range));
    let company_series = company_in_range
        .as_deref()
        .map(RegistrationAggregator::by_year_category);
    let company_yearly_totals = company_in_range
        .as_deref()
        .map(RegistrationAggregator::by_year);

    // ── Step 5: Map ───────────────────────────────────────────────────────────
    let geo = join_makers(&data.makers, &STATE_COORDINATES);
    warnings.extend(geo.warning());

    let metadata = ViewMetadata {
        year_range: range,
        records_in_range: in_range.len(),
        observations: distribution.len(),
        class_observations_in_range: classes_in_range.len(),
        makers_joined: geo.records.len(),
        makers_unmatched: geo.mismatch_count(),
    };

    debug!(
        "Built views for {}: {} observations, {} trend rows, {} class rows, {} warnings",
        range,
        distribution.len(),
        trend.len(),
        class_series.len(),
        warnings.len()
    );

    Ok(DashboardViews {
        distribution,
        count_axis_max,
        trend,
        category_totals,
        yearly_totals,
        class_series,
        class_preview,
        company_series,
        company_yearly_totals,
        geo,
        warnings,
        metadata,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
