use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{DashboardError, Result};
use crate::models::{FilterConfig, YearRange};

/// Categories compared in the trend chart when none are chosen explicitly.
pub const DEFAULT_CATEGORIES: [&str; 2] = ["TWO WHEELER(NT)", "LIGHT GOODS VEHICLE"];

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Explore India's EV registrations by year, category, class and state
#[derive(Parser, Debug, Clone)]
#[command(
    name = "ev-dashboard",
    about = "Explore India's EV registrations by year, category, class and state",
    version
)]
pub struct Settings {
    /// Directory holding the source CSV exports
    #[arg(long, default_value = ".")]
    pub data_dir: PathBuf,

    /// Category-wise yearly registrations (wide format)
    #[arg(long, default_value = "ev_cat_01-24.csv")]
    pub category_file: PathBuf,

    /// Vehicle-class sales (Vehicle_Class, Year, EV_Sales)
    #[arg(long, default_value = "Vehicle Class - All.csv")]
    pub class_file: PathBuf,

    /// State-wise EV manufacturers (State, Maker)
    #[arg(long, default_value = "EV_Maker.csv")]
    pub maker_file: PathBuf,

    /// Optional company-wise sales (Company/Model, Year, EVSales)
    #[arg(long)]
    pub company_file: Option<PathBuf>,

    /// First year of the range (defaults to the earliest observed year)
    #[arg(long)]
    pub min_year: Option<i32>,

    /// Last year of the range (defaults to the latest observed year)
    #[arg(long)]
    pub max_year: Option<i32>,

    /// Category to compare in the trend series (repeatable)
    #[arg(long = "category", default_values_t = DEFAULT_CATEGORIES.map(String::from))]
    pub categories: Vec<String>,

    /// Vehicle class to include (repeatable; all classes when omitted)
    #[arg(long = "vehicle-class")]
    pub vehicle_classes: Vec<String>,

    /// Rows shown in the vehicle-class preview
    #[arg(long, default_value = "10")]
    pub preview_rows: usize,

    /// Output format
    #[arg(long, default_value = "table", value_parser = ["table", "json"])]
    pub format: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Forget the saved filters before running
    #[arg(long)]
    pub clear: bool,
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used filter parameters saved to `~/.ev-dashboard/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_classes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl LastUsedParams {
    /// `~/.ev-dashboard/last_used.json`.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// `last_used.json` under `base_dir/.ev-dashboard`.
    pub fn config_path_in(base_dir: &Path) -> PathBuf {
        base_dir.join(".ev-dashboard").join("last_used.json")
    }

    /// Read saved filters from `path`.
    /// A missing or unreadable file yields empty params, never an error.
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::debug!("ignoring unreadable {}: {}", path.display(), e);
            Self::default()
        })
    }

    /// Atomically write params to an explicit path, creating parent
    /// directories if needed.
    pub fn save_to(&self, path: &Path) -> std::result::Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Remove the saved filters at `path`; a missing file is fine.
    pub fn clear_at(path: &Path) -> std::result::Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the command line, fill unset filter flags from the saved
    /// filters, then save the merged filters for next time.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// [`Settings::load_with_last_used`] over explicit `args` and
    /// `config_path`.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &Path,
    ) -> Self {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            if let Err(e) = LastUsedParams::clear_at(config_path) {
                tracing::warn!("failed to clear {}: {}", config_path.display(), e);
            }
            return settings.apply_debug_flag();
        }

        let last = LastUsedParams::load_from(config_path);

        // CLI always wins; clap stores the arg id under the field name.
        if !is_arg_explicitly_set(&matches, "min_year") && settings.min_year.is_none() {
            settings.min_year = last.min_year;
        }
        if !is_arg_explicitly_set(&matches, "max_year") && settings.max_year.is_none() {
            settings.max_year = last.max_year;
        }
        if !is_arg_explicitly_set(&matches, "categories") {
            if let Some(v) = last.categories {
                settings.categories = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "vehicle_classes") {
            if let Some(v) = last.vehicle_classes {
                settings.vehicle_classes = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "format") {
            if let Some(v) = last.format {
                settings.format = v;
            }
        }

        settings = settings.apply_debug_flag();

        let params = LastUsedParams::from(&settings);
        if let Err(e) = params.save_to(config_path) {
            tracing::debug!("could not persist {}: {}", config_path.display(), e);
        }

        settings
    }

    /// Resolve a source file name against `data_dir` (absolute names win).
    pub fn source_path(&self, file: &Path) -> PathBuf {
        self.data_dir.join(file)
    }

    /// The requested year range.
    ///
    /// A missing end is completed from `observed` (the dataset bounds), after
    /// clamping the given end into those bounds; with neither end given the
    /// observed bounds are used as they are. Only two explicit, inverted ends
    /// are rejected.
    pub fn year_range(&self, observed: Option<YearRange>) -> Result<Option<YearRange>> {
        match (self.min_year, self.max_year, observed) {
            (Some(min), Some(max), _) => YearRange::new(min, max).map(Some),
            (Some(min), None, Some(b)) => {
                let min = min.clamp(b.min_year(), b.max_year());
                YearRange::new(min, b.max_year()).map(Some)
            }
            (None, Some(max), Some(b)) => {
                let max = max.clamp(b.min_year(), b.max_year());
                YearRange::new(b.min_year(), max).map(Some)
            }
            (None, None, b) => Ok(b),
            (_, _, None) => Ok(None),
        }
    }

    /// Build the pipeline filter for `year_range` from these settings.
    pub fn filter_config(&self, year_range: YearRange) -> Result<FilterConfig> {
        if self.preview_rows == 0 {
            return Err(DashboardError::Config(
                "preview rows must be positive".to_string(),
            ));
        }
        let mut config = FilterConfig::new(year_range)
            .with_categories(self.categories.iter().cloned())
            .with_preview_rows(self.preview_rows);
        if !self.vehicle_classes.is_empty() {
            config = config.with_vehicle_classes(self.vehicle_classes.iter().cloned());
        }
        Ok(config)
    }

    fn apply_debug_flag(mut self) -> Self {
        if self.debug {
            self.log_level = "DEBUG".to_string();
        }
        self
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            min_year: s.min_year,
            max_year: s.max_year,
            categories: Some(s.categories.clone()),
            vehicle_classes: if s.vehicle_classes.is_empty() {
                None
            } else {
                Some(s.vehicle_classes.clone())
            },
            format: Some(s.format.clone()),
        }
    }
}

/// Whether `name` came from the command line rather than a default.
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
