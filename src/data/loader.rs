use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::model::{Feature, Observation, ObservationTable};
use crate::error::{DashboardError, Result};

// ---------------------------------------------------------------------------
// Load options
// ---------------------------------------------------------------------------

/// How to read one climate file. Every field has a default so a config
/// file only needs to mention what differs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    pub delimiter: char,
    pub date_column: String,
    /// `chrono` format string for the date column.
    pub date_format: String,
    /// Header renames applied after trimming, `source name → canonical name`.
    pub renames: BTreeMap<String, String>,
    /// Categorical column kept as the row status (required when set).
    pub status_column: Option<String>,
    /// Columns that must exist after renaming.
    pub required_columns: Vec<String>,
    /// Parse `0,25` as `0.25` (common in `;`-delimited exports).
    pub decimal_comma: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            date_column: "DATE".to_string(),
            date_format: "%d/%m/%Y".to_string(),
            renames: BTreeMap::new(),
            status_column: None,
            required_columns: Vec::new(),
            decimal_comma: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a climate table from a delimited file.
pub fn load_table(path: &Path, options: &LoadOptions) -> Result<ObservationTable> {
    let file = File::open(path).map_err(|source| DashboardError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table = read_table(file, options)?;
    log::info!(
        "Loaded {} rows from {} with features {:?}",
        table.len(),
        path.display(),
        table.features
    );
    Ok(table)
}

/// Parse a climate table from any reader.
///
/// Layout: a header row, one date column in `options.date_format`, any of
/// the known feature columns (see [`Feature::column`]) and optionally a
/// status column. Unknown columns are skipped.
pub fn read_table<R: Read>(reader: R, options: &LoadOptions) -> Result<ObservationTable> {
    let delimiter = u8::try_from(options.delimiter)
        .map_err(|_| DashboardError::InvalidDelimiter(options.delimiter))?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| {
            options
                .renames
                .get(h)
                .cloned()
                .unwrap_or_else(|| h.to_string())
        })
        .collect();

    let position = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| DashboardError::MissingColumn(name.to_string()))
    };

    let date_idx = position(&options.date_column)?;
    let status_idx = options
        .status_column
        .as_deref()
        .map(|name| position(name))
        .transpose()?;
    for required in &options.required_columns {
        position(required)?;
    }

    let mut seen = BTreeSet::new();
    let mut feature_cols: Vec<(usize, Feature)> = Vec::new();
    for (idx, name) in headers.iter().enumerate() {
        if idx == date_idx || Some(idx) == status_idx {
            continue;
        }
        match Feature::from_column(name) {
            Some(feature) if seen.insert(feature) => feature_cols.push((idx, feature)),
            Some(_) => log::warn!("Duplicate column '{name}' ignored"),
            None => log::warn!("Unknown column '{name}' ignored"),
        }
    }
    if feature_cols.is_empty() {
        return Err(DashboardError::NoFeatureColumns);
    }

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        let row = row_no + 1;

        let raw_date = record.get(date_idx).unwrap_or("").trim();
        let date = NaiveDate::parse_from_str(raw_date, &options.date_format).map_err(|_| {
            DashboardError::DateParse {
                row,
                value: raw_date.to_string(),
                format: options.date_format.clone(),
            }
        })?;

        let mut values = BTreeMap::new();
        for &(idx, feature) in &feature_cols {
            let raw = record.get(idx).unwrap_or("").trim();
            // Blank cells are missing values, not zeros.
            if raw.is_empty() {
                continue;
            }
            let value = parse_number(raw, options.decimal_comma).ok_or_else(|| {
                DashboardError::NumberParse {
                    row,
                    column: feature.column().to_string(),
                    value: raw.to_string(),
                }
            })?;
            values.insert(feature, value);
        }

        let status = status_idx
            .and_then(|idx| record.get(idx))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        rows.push(Observation {
            date,
            values,
            status,
        });
    }

    let mut features: Vec<Feature> = feature_cols.into_iter().map(|(_, f)| f).collect();
    features.sort();

    Ok(ObservationTable::new(
        rows,
        features,
        options.status_column.clone(),
    ))
}

/// Parse a numeric cell, optionally with a decimal comma.
pub fn parse_number(raw: &str, decimal_comma: bool) -> Option<f64> {
    let parsed = if decimal_comma {
        raw.replace(',', ".").parse::<f64>()
    } else {
        raw.parse::<f64>()
    };
    parsed.ok().filter(|v| v.is_finite())
}
