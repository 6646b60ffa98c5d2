use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};

use super::model::{format_date, Feature, ObservationTable, PredictionRecord};

/// Default file name offered when saving filtered climate rows.
pub const FILTERED_FILE_NAME: &str = "filtered_data.csv";

/// Default file name offered when saving prediction results.
pub const PREDICTIONS_FILE_NAME: &str = "predicted_results.csv";

// ---------------------------------------------------------------------------
// Serialisation
// ---------------------------------------------------------------------------

/// Serialise a climate table: `DATE`, its feature columns, then status.
///
/// Output only depends on the table, so exporting an unchanged table twice
/// gives identical bytes.
pub fn table_to_csv(table: &ObservationTable) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header: Vec<&str> = vec!["DATE"];
    header.extend(table.features.iter().map(|f| f.column()));
    if let Some(status) = &table.status_column {
        header.push(status);
    }
    writer.write_record(&header).context("writing CSV header")?;

    for row in &table.rows {
        let mut record = vec![format_date(row.date)];
        record.extend(
            table
                .features
                .iter()
                .map(|&f| row.value(f).map(|v| v.to_string()).unwrap_or_default()),
        );
        if table.status_column.is_some() {
            record.push(row.status.clone().unwrap_or_default());
        }
        writer.write_record(&record).context("writing CSV row")?;
    }

    writer.into_inner().context("flushing CSV buffer")
}

/// Serialise the prediction accumulator: `DATE`, every feature any record
/// carries (canonical order), then `Predictions`.
pub fn predictions_to_csv(records: &[PredictionRecord]) -> Result<Vec<u8>> {
    let features: Vec<Feature> = records
        .iter()
        .flat_map(|r| r.values.keys().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header: Vec<&str> = vec!["DATE"];
    header.extend(features.iter().map(|f| f.column()));
    header.push("Predictions");
    writer.write_record(&header).context("writing CSV header")?;

    for rec in records {
        let mut record = vec![format_date(rec.date)];
        record.extend(features.iter().map(|f| {
            rec.values
                .get(f)
                .map(|v| v.to_string())
                .unwrap_or_default()
        }));
        record.push(rec.label.to_string());
        writer.write_record(&record).context("writing CSV row")?;
    }

    writer.into_inner().context("flushing CSV buffer")
}

// ---------------------------------------------------------------------------
// Save dialog
// ---------------------------------------------------------------------------

/// Ask for a destination and write `bytes` there.
///
/// Returns `Ok(None)` when the user cancels the dialog.
pub fn save_with_dialog(default_name: &str, bytes: &[u8]) -> Result<Option<std::path::PathBuf>> {
    let Some(path) = rfd::FileDialog::new()
        .set_title("Save CSV")
        .set_file_name(default_name)
        .add_filter("CSV", &["csv"])
        .save_file()
    else {
        return Ok(None);
    };
    write_file(&path, bytes)?;
    Ok(Some(path))
}

pub fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
    log::info!("Exported {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::NaiveDate;

    use super::*;
    use crate::data::model::{Label, Observation};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn records() -> Vec<PredictionRecord> {
        vec![
            PredictionRecord {
                date: date(2024, 1, 1),
                values: BTreeMap::from([
                    (Feature::AllskyKt, 0.5),
                    (Feature::T2m, 20.0),
                    (Feature::Prectotcorr, 1.2),
                    (Feature::Ps, 88.0),
                    (Feature::Ws10m, 1.0),
                ]),
                label: Label::PotentialUpwelling,
            },
            PredictionRecord {
                date: date(2024, 1, 2),
                values: BTreeMap::from([
                    (Feature::AllskyKt, 0.61),
                    (Feature::T2m, 19.42),
                    (Feature::Prectotcorr, 0.0),
                    (Feature::Ps, 87.95),
                    (Feature::Ws10m, 1.37),
                ]),
                label: Label::NoPotentialUpwelling,
            },
        ]
    }

    #[test]
    fn prediction_export_layout() {
        let bytes = predictions_to_csv(&records()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "DATE,ALLSKY_KT,T2M,PRECTOTCORR,PS,WS10M,Predictions");
        assert_eq!(lines[1], "01/01/2024,0.5,20,1.2,88,1,potential upwelling");
        assert_eq!(lines[2], "02/01/2024,0.61,19.42,0,87.95,1.37,no potential upwelling");
    }

    #[test]
    fn repeated_export_is_byte_identical() {
        let recs = records();
        let first = predictions_to_csv(&recs).unwrap();
        let second = predictions_to_csv(&recs).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_accumulator_exports_header_only() {
        let text = String::from_utf8(predictions_to_csv(&[]).unwrap()).unwrap();
        assert_eq!(text, "DATE,Predictions\n");
    }

    #[test]
    fn table_export_keeps_status_and_blank_missing_values() {
        let table = ObservationTable::new(
            vec![Observation {
                date: date(2017, 7, 9),
                values: BTreeMap::from([(Feature::T2m, 18.5)]),
                status: Some("Upwelling".to_string()),
            }],
            vec![Feature::T2m, Feature::Ws10m],
            Some("Status".to_string()),
        );
        let text = String::from_utf8(table_to_csv(&table).unwrap()).unwrap();
        assert_eq!(text, "DATE,T2M,WS10M,Status\n09/07/2017,18.5,,Upwelling\n");
    }
}
