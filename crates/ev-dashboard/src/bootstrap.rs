use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;

use ev_core::settings::Settings;
use ev_data::loader::DataSources;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `--log-level` name onto an [`EnvFilter`] directive.
fn level_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        other => other.to_lowercase(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Output goes to `log_file` (appended, no ANSI colours) when one is given,
/// and to stderr otherwise. Falls back to `"info"` if the level string is not
/// recognised.
pub fn setup_logging(log_level: &str, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(level_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                fmt::layer()
                    .with_writer(Arc::new(file))
                    .with_ansi(false)
                    .with_target(false),
            )
        }
        None => None,
    };
    let stderr_layer = log_file.is_none().then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}

// ── Source discovery ───────────────────────────────────────────────────────────

/// Resolve every configured source file against the data directory.
pub fn data_sources(settings: &Settings) -> DataSources {
    DataSources {
        categories: settings.source_path(&settings.category_file),
        vehicle_classes: settings.source_path(&settings.class_file),
        makers: settings.source_path(&settings.maker_file),
        company_sales: settings
            .company_file
            .as_deref()
            .map(|f| settings.source_path(f)),
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn test_level_directive_maps_level_names() {
        assert_eq!(level_directive("DEBUG"), "debug");
        assert_eq!(level_directive("info"), "info");
        assert_eq!(level_directive("WARNING"), "warn");
        assert_eq!(level_directive("ERROR"), "error");
        assert_eq!(level_directive("CRITICAL"), "error");
    }

    #[test]
    fn test_level_directive_passes_through_unknown() {
        assert_eq!(level_directive("ev_data=TRACE"), "ev_data=trace");
    }

    #[test]
    fn test_data_sources_default_files() {
        let settings = Settings::parse_from(["ev-dashboard", "--data-dir", "/srv/ev"]);
        let sources = data_sources(&settings);

        assert_eq!(sources.categories, PathBuf::from("/srv/ev/ev_cat_01-24.csv"));
        assert_eq!(
            sources.vehicle_classes,
            PathBuf::from("/srv/ev/Vehicle Class - All.csv")
        );
        assert_eq!(sources.makers, PathBuf::from("/srv/ev/EV_Maker.csv"));
        assert_eq!(sources.company_sales, None);
    }

    #[test]
    fn test_data_sources_company_file() {
        let settings = Settings::parse_from([
            "ev-dashboard",
            "--data-dir",
            "data",
            "--company-file",
            "EVIndia.csv",
        ]);
        let sources = data_sources(&settings);
        assert_eq!(
            sources.company_sales,
            Some(PathBuf::from("data").join("EVIndia.csv"))
        );
    }

    #[test]
    fn test_data_sources_absolute_file_wins() {
        let settings = Settings::parse_from(["ev-dashboard", "--maker-file", "/tmp/makers.csv"]);
        assert_eq!(data_sources(&settings).makers, PathBuf::from("/tmp/makers.csv"));
    }
}
