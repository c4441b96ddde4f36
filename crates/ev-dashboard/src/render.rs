//! Plain-text rendering of [`DashboardViews`] for `--format table`.

use std::fmt::{self, Write};

use ev_core::formatting::{fit_width, format_count, format_lat_lon, share_percent};
use ev_core::models::{AggregateRow, Observation, PipelineWarning, SelectionKind};
use ev_data::aggregator::RegistrationAggregator;
use ev_data::views::DashboardViews;
use ev_runtime::session::SessionStatus;

const NAME_WIDTH: usize = 28;
const COUNT_WIDTH: usize = 12;

// ── Public API ────────────────────────────────────────────────────────────────

/// Render every view as a sequence of titled text tables.
pub fn render_views(
    views: &DashboardViews,
    status: &SessionStatus,
) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_views(&mut out, views, status)?;
    Ok(out)
}

fn write_views(out: &mut String, views: &DashboardViews, status: &SessionStatus) -> fmt::Result {
    writeln!(
        out,
        "EV registrations {}  (data loaded {})",
        views.metadata.year_range,
        status.loaded_at.format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    if let Some(bounds) = status.observed_bounds {
        writeln!(out, "Available years: {}", bounds)?;
    }

    section(out, "Yearly totals")?;
    yearly_table(out, &views.yearly_totals)?;

    section(out, "Trend (selected categories)")?;
    category_table(out, &views.trend)?;

    section(out, "Vehicle classes")?;
    category_table(out, &views.class_series)?;

    section(out, "Vehicle class preview")?;
    preview_table(out, &views.class_preview)?;

    if let Some(totals) = &views.company_yearly_totals {
        section(out, "Company sales by year")?;
        yearly_table(out, totals)?;
    }

    section(out, "Manufacturers by state")?;
    for record in &views.geo.records {
        writeln!(
            out,
            "{} {} {}",
            fit_width(&record.state, 16),
            fit_width(&record.name, NAME_WIDTH),
            format_lat_lon(record.lat, record.lon)
        )?;
    }

    if !views.warnings.is_empty() {
        section(out, "Warnings")?;
        for warning in &views.warnings {
            writeln!(out, "- {}", describe_warning(warning))?;
        }
    }

    Ok(())
}

/// One-line human description of a pipeline warning.
pub fn describe_warning(warning: &PipelineWarning) -> String {
    match warning {
        PipelineWarning::EmptySelection { selection } => {
            format!("no {} selected; that chart is empty", selection_name(*selection))
        }
        PipelineWarning::UnknownSelection { selection, names } => format!(
            "unknown {} ignored: {}",
            selection_name(*selection),
            names.join(", ")
        ),
        PipelineWarning::JoinMismatch { unmatched } => {
            let listed: Vec<String> = unmatched
                .iter()
                .map(|m| format!("{} ({})", m.name, m.state))
                .collect();
            format!(
                "{} maker(s) have no map coordinates: {}",
                unmatched.len(),
                listed.join(", ")
            )
        }
    }
}

// ── Private helpers ───────────────────────────────────────────────────────────

fn selection_name(kind: SelectionKind) -> &'static str {
    match kind {
        SelectionKind::Category => "category",
        SelectionKind::VehicleClass => "vehicle class",
    }
}

fn section(out: &mut String, title: &str) -> fmt::Result {
    writeln!(out)?;
    writeln!(out, "── {} {}", title, "─".repeat(60usize.saturating_sub(title.len())))
}

fn yearly_table(out: &mut String, rows: &[AggregateRow]) -> fmt::Result {
    if rows.is_empty() {
        return writeln!(out, "(no data)");
    }
    let grand = RegistrationAggregator::grand_total(rows);
    for row in rows {
        writeln!(
            out,
            "{}  {:>width$}  {:>5.1}%",
            row.year,
            format_count(row.total),
            share_percent(row.total, grand, 1),
            width = COUNT_WIDTH
        )?;
    }
    writeln!(out, "Total {:>width$}", format_count(grand), width = COUNT_WIDTH)?;
    writeln!(
        out,
        "Peak  {:>width$}",
        format_count(RegistrationAggregator::max_total(rows)),
        width = COUNT_WIDTH
    )
}

fn category_table(out: &mut String, rows: &[AggregateRow]) -> fmt::Result {
    if rows.is_empty() {
        return writeln!(out, "(no data)");
    }
    for row in rows {
        writeln!(
            out,
            "{}  {} {:>width$}",
            row.year,
            fit_width(row.category.as_deref().unwrap_or("-"), NAME_WIDTH),
            format_count(row.total),
            width = COUNT_WIDTH
        )?;
    }
    Ok(())
}

fn preview_table(out: &mut String, rows: &[Observation]) -> fmt::Result {
    if rows.is_empty() {
        return writeln!(out, "(no data)");
    }
    writeln!(
        out,
        "{} Year {:>width$}",
        fit_width("Vehicle_Class", NAME_WIDTH),
        "EV_Sales",
        width = COUNT_WIDTH
    )?;
    for row in rows {
        writeln!(
            out,
            "{} {} {:>width$}",
            fit_width(&row.category, NAME_WIDTH),
            row.year,
            format_count(row.count),
            width = COUNT_WIDTH
        )?;
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use ev_core::models::{CategoryDataset, FilterConfig, Maker, WideRecord, YearRange};
    use ev_data::loader::DashboardData;
    use ev_data::views::build_views;

    fn views() -> DashboardViews {
        let data = DashboardData {
            categories: CategoryDataset {
                categories: vec!["BUS".to_string(), "TWO WHEELER(NT)".to_string()],
                records: vec![
                    WideRecord::new(2019, [("BUS", 1_000), ("TWO WHEELER(NT)", 25_000)]),
                    WideRecord::new(2020, [("BUS", 2_000), ("TWO WHEELER(NT)", 72_000)]),
                ],
            },
            vehicle_classes: vec![Observation::new(2020, "M1", 1_234)],
            makers: vec![Maker::new("maharashtra", "Tata"), Maker::new("Goa", "Kinetic")],
            company_sales: None,
        };
        let filter = FilterConfig::new(YearRange::new(2019, 2020).unwrap()).with_categories(["BUS"]);
        build_views(&data, &filter).unwrap()
    }

    fn status() -> SessionStatus {
        SessionStatus {
            loaded_at: Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap(),
            observed_bounds: Some(YearRange::new(2019, 2020).unwrap()),
            categories: 2,
            category_rows: 2,
            vehicle_class_rows: 1,
            makers: 2,
            company_rows: None,
        }
    }

    #[test]
    fn test_render_views_header() {
        let text = render_views(&views(), &status()).unwrap();
        assert!(text.starts_with("EV registrations 2019-2020  (data loaded 2024-01-15 10:00:00 UTC)"));
        assert!(text.contains("Available years: 2019-2020"));
    }

    #[test]
    fn test_render_views_yearly_totals_formatted() {
        let text = render_views(&views(), &status()).unwrap();
        assert!(text.contains("26,000"));
        assert!(text.contains("74,000"));
        assert!(text.contains("100,000"));
        assert!(text.contains(&format!("Peak  {:>12}", "74,000")));
    }

    #[test]
    fn test_render_views_map_and_warning() {
        let text = render_views(&views(), &status()).unwrap();
        assert!(text.contains("19.7515°N, 75.7139°E"));
        assert!(text.contains("1 maker(s) have no map coordinates: Kinetic (Goa)"));
    }

    #[test]
    fn test_render_views_empty_tables() {
        let data = DashboardData::default();
        let filter = FilterConfig::new(YearRange::new(2030, 2031).unwrap());
        let empty = build_views(&data, &filter).unwrap();

        let text = render_views(&empty, &status()).unwrap();
        assert_eq!(text.matches("(no data)").count(), 4);
        assert!(text.contains("no category selected; that chart is empty"));
        assert!(!text.contains("Peak"));
    }

    #[test]
    fn test_render_views_skips_company_section_without_source() {
        let text = render_views(&views(), &status()).unwrap();
        assert!(!text.contains("Company sales by year"));
    }

    #[test]
    fn test_describe_warning_selection() {
        let empty = PipelineWarning::EmptySelection {
            selection: SelectionKind::VehicleClass,
        };
        assert_eq!(describe_warning(&empty), "no vehicle class selected; that chart is empty");

        let unknown = PipelineWarning::UnknownSelection {
            selection: SelectionKind::Category,
            names: vec!["A".to_string(), "B".to_string()],
        };
        assert_eq!(describe_warning(&unknown), "unknown category ignored: A, B");
    }
}
