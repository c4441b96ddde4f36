//! CSV loading for the dashboard sources.
//!
//! Each loader reads one export into typed rows in source order and checks
//! the column set its dataset needs. Load failures are fatal and returned to
//! the caller unmodified; no partial dataset is ever substituted.

use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::path::{Path, PathBuf};

use csv::{Reader, ReaderBuilder, StringRecord, Trim};
use ev_core::error::{DashboardError, Result};
use ev_core::models::{CategoryDataset, Maker, Observation, WideRecord, PLACEHOLDER_YEAR};
use tracing::debug;

/// Header of the year column in the category dataset.
pub const YEAR_COLUMN: &str = "Year";

/// Names reported when a maker export has fewer than two columns.
const MAKER_COLUMNS: [&str; 2] = ["State", "EV_Maker"];

// ── Schemas and sources ───────────────────────────────────────────────────────

/// Column names of a source that is already in long format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongSchema {
    pub category_column: &'static str,
    pub year_column: &'static str,
    pub value_column: &'static str,
}

impl LongSchema {
    /// `Vehicle Class - All.csv`.
    pub const VEHICLE_CLASS: LongSchema = LongSchema {
        category_column: "Vehicle_Class",
        year_column: "Year",
        value_column: "EV_Sales",
    };

    /// `EVIndia.csv`: yearly sales per company or model.
    pub const COMPANY_SALES: LongSchema = LongSchema {
        category_column: "Company/Model",
        year_column: "Year",
        value_column: "EVSales",
    };

    fn columns(&self) -> [&'static str; 3] {
        [self.category_column, self.year_column, self.value_column]
    }
}

/// File locations for every dashboard source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSources {
    pub categories: PathBuf,
    pub vehicle_classes: PathBuf,
    pub makers: PathBuf,
    pub company_sales: Option<PathBuf>,
}

/// Every source loaded for one dashboard session. Immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardData {
    pub categories: CategoryDataset,
    pub vehicle_classes: Vec<Observation>,
    pub makers: Vec<Maker>,
    pub company_sales: Option<Vec<Observation>>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load every source in `sources`. The first failing source aborts the load.
pub fn load_dashboard_data(sources: &DataSources) -> Result<DashboardData> {
    let categories = load_categories(&sources.categories)?;
    let vehicle_classes = load_long(&sources.vehicle_classes, &LongSchema::VEHICLE_CLASS)?;
    let makers = load_makers(&sources.makers)?;
    let company_sales = sources
        .company_sales
        .as_deref()
        .map(|path| load_long(path, &LongSchema::COMPANY_SALES))
        .transpose()?;

    Ok(DashboardData {
        categories,
        vehicle_classes,
        makers,
        company_sales,
    })
}

/// Load the wide category dataset: a `Year` column plus one count column per
/// category.
///
/// The declared categories are every header other than `Year`, in column
/// order. A column with a blank header is kept as `Unnamed: <index>`. An empty `Year` cell becomes the placeholder year `0`; an
/// empty count cell is read as `0`.
pub fn load_categories(path: &Path) -> Result<CategoryDataset> {
    let mut reader = open_reader(path, false)?;
    let headers = read_headers(path, &mut reader)?;

    let year_idx = headers
        .iter()
        .position(|h| h == YEAR_COLUMN)
        .ok_or_else(|| schema_error(path, &[YEAR_COLUMN]))?;

    let category_columns: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != year_idx)
        .map(|(idx, name)| (idx, name.clone()))
        .collect();
    if category_columns.is_empty() {
        return Err(schema_error(path, &["<category column>"]));
    }

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| unavailable(path, e))?;
        let row = row_number(&record, idx);

        let year = parse_year(path, row, YEAR_COLUMN, field(&record, year_idx))?;
        let mut counts = BTreeMap::new();
        for (col_idx, name) in &category_columns {
            let count = parse_count(path, row, name, field(&record, *col_idx))?;
            counts.insert(name.clone(), count);
        }
        records.push(WideRecord { year, counts });
    }

    debug!(
        "Loaded {} rows x {} categories from {}",
        records.len(),
        category_columns.len(),
        path.display()
    );

    Ok(CategoryDataset {
        categories: category_columns.into_iter().map(|(_, name)| name).collect(),
        records,
    })
}

/// Load a long-format source described by `schema` into observations.
///
/// Rows with an empty category or value cell carry no observation and are
/// skipped. An empty year cell becomes the placeholder year `0`.
pub fn load_long(path: &Path, schema: &LongSchema) -> Result<Vec<Observation>> {
    let mut reader = open_reader(path, false)?;
    let headers = read_headers(path, &mut reader)?;

    let position = |name: &str| headers.iter().position(|h| h == name);
    let missing: Vec<&str> = schema
        .columns()
        .into_iter()
        .filter(|&c| position(c).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(schema_error(path, &missing));
    }
    let (Some(cat_idx), Some(year_idx), Some(value_idx)) = (
        position(schema.category_column),
        position(schema.year_column),
        position(schema.value_column),
    ) else {
        return Err(schema_error(path, &schema.columns()));
    };

    let mut observations = Vec::new();
    let mut skipped = 0usize;
    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| unavailable(path, e))?;
        let row = row_number(&record, idx);

        let category = field(&record, cat_idx);
        let value = field(&record, value_idx);
        if category.is_empty() || value.is_empty() {
            skipped += 1;
            continue;
        }

        let year = parse_year(path, row, schema.year_column, field(&record, year_idx))?;
        let count = parse_count(path, row, schema.value_column, value)?;
        observations.push(Observation::new(year, category, count));
    }

    debug!(
        "Loaded {} observations from {} ({} incomplete rows skipped)",
        observations.len(),
        path.display(),
        skipped
    );

    Ok(observations)
}

/// Load the maker list. The first two columns are read as state and maker
/// name whatever their headers say; further columns are ignored.
pub fn load_makers(path: &Path) -> Result<Vec<Maker>> {
    let mut reader = open_reader(path, true)?;
    let headers = read_headers(path, &mut reader)?;
    if headers.len() < MAKER_COLUMNS.len() {
        return Err(schema_error(path, &MAKER_COLUMNS[headers.len()..]));
    }

    let mut makers = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| unavailable(path, e))?;
        let state = field(&record, 0);
        let name = field(&record, 1);
        if state.is_empty() && name.is_empty() {
            continue;
        }
        makers.push(Maker::new(state, name));
    }

    debug!("Loaded {} makers from {}", makers.len(), path.display());
    Ok(makers)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn open_reader(path: &Path, flexible: bool) -> Result<Reader<File>> {
    ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(flexible)
        .from_path(path)
        .map_err(|e| unavailable(path, e))
}

/// Read the header row, giving every column a distinct name.
///
/// A blank header becomes `Unnamed: <index>`. A repeated name gets the first
/// free `.1`, `.2`, … suffix, skipping suffixed names the file already uses.
fn read_headers(path: &Path, reader: &mut Reader<File>) -> Result<Vec<String>> {
    let raw = reader.headers().map_err(|e| unavailable(path, e))?;

    let mut taken: HashSet<String> = HashSet::with_capacity(raw.len());
    let mut headers = Vec::with_capacity(raw.len());
    let mut unnamed = 0usize;
    for (idx, name) in raw.iter().enumerate() {
        let base = if name.is_empty() {
            unnamed += 1;
            format!("Unnamed: {}", idx)
        } else {
            name.to_string()
        };

        let mut unique = base.clone();
        let mut suffix = 0usize;
        while taken.contains(&unique) {
            suffix += 1;
            unique = format!("{}.{}", base, suffix);
        }
        taken.insert(unique.clone());
        headers.push(unique);
    }

    if unnamed > 0 {
        debug!("{} blank header(s) in {} named by column index", unnamed, path.display());
    }
    Ok(headers)
}

fn field(record: &StringRecord, idx: usize) -> &str {
    record.get(idx).unwrap_or("")
}

/// 1-based line number of `record` in the file (the header is line 1).
fn row_number(record: &StringRecord, idx: usize) -> usize {
    record
        .position()
        .map(|p| p.line() as usize)
        .unwrap_or(idx + 2)
}

/// Parse an integral cell. Accepts `"1234"`, `"1,234"` and `"1234.0"`.
fn parse_whole(value: &str) -> Option<i64> {
    let cleaned: String = value.chars().filter(|c| *c != ',').collect();
    if let Ok(n) = cleaned.parse::<i64>() {
        return Some(n);
    }
    let f = cleaned.parse::<f64>().ok()?;
    (f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64).then_some(f as i64)
}

fn parse_year(path: &Path, row: usize, column: &str, value: &str) -> Result<i32> {
    if value.is_empty() {
        return Ok(PLACEHOLDER_YEAR);
    }
    match parse_whole(value) {
        Some(0) => Ok(PLACEHOLDER_YEAR),
        Some(y) if (1000..=9999).contains(&y) => Ok(y as i32),
        _ => Err(invalid_value(path, row, column, value)),
    }
}

fn parse_count(path: &Path, row: usize, column: &str, value: &str) -> Result<u64> {
    if value.is_empty() {
        return Ok(0);
    }
    parse_whole(value)
        .and_then(|n| u64::try_from(n).ok())
        .ok_or_else(|| invalid_value(path, row, column, value))
}

fn schema_error(path: &Path, missing: &[&str]) -> DashboardError {
    DashboardError::Schema {
        path: path.to_path_buf(),
        missing: missing.iter().map(|s| s.to_string()).collect(),
    }
}

fn unavailable(path: &Path, source: csv::Error) -> DashboardError {
    DashboardError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    }
}

fn invalid_value(path: &Path, row: usize, column: &str, value: &str) -> DashboardError {
    DashboardError::InvalidValue {
        path: path.to_path_buf(),
        row,
        column: column.to_string(),
        value: value.to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
