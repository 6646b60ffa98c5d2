use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Display and file format for dates (`dd/mm/yyyy`).
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

/// Format a date the way every table and export shows it.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

// ---------------------------------------------------------------------------
// Feature – one climate indicator column
// ---------------------------------------------------------------------------

/// The climate indicators that make up a feature vector.
///
/// Variant order is the canonical column order used for display and export.
/// It is *not* the order a classifier expects; that comes from the model
/// artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Feature {
    #[serde(rename = "ALLSKY_KT")]
    AllskyKt,
    #[serde(rename = "T2M")]
    T2m,
    #[serde(rename = "TS")]
    Ts,
    #[serde(rename = "PRECTOTCORR")]
    Prectotcorr,
    #[serde(rename = "PS")]
    Ps,
    #[serde(rename = "WS10M")]
    Ws10m,
}

impl Feature {
    pub const ALL: [Feature; 6] = [
        Feature::AllskyKt,
        Feature::T2m,
        Feature::Ts,
        Feature::Prectotcorr,
        Feature::Ps,
        Feature::Ws10m,
    ];

    /// Canonical CSV column name.
    pub fn column(self) -> &'static str {
        match self {
            Feature::AllskyKt => "ALLSKY_KT",
            Feature::T2m => "T2M",
            Feature::Ts => "TS",
            Feature::Prectotcorr => "PRECTOTCORR",
            Feature::Ps => "PS",
            Feature::Ws10m => "WS10M",
        }
    }

    pub fn from_column(name: &str) -> Option<Feature> {
        Feature::ALL.into_iter().find(|f| f.column() == name)
    }

    pub fn unit(self) -> &'static str {
        match self {
            Feature::AllskyKt => "",
            Feature::T2m | Feature::Ts => "°C",
            Feature::Prectotcorr => "mm",
            Feature::Ps => "kPa",
            Feature::Ws10m => "m/s",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Feature::AllskyKt => "All-sky insolation clearness index",
            Feature::T2m => "Mean air temperature at 2 metres",
            Feature::Ts => "Mean earth skin temperature",
            Feature::Prectotcorr => "Precipitation",
            Feature::Ps => "Mean surface pressure",
            Feature::Ws10m => "Mean wind speed at 10 metres",
        }
    }

    /// Axis label, e.g. `T2M (°C)`.
    pub fn axis_label(self) -> String {
        match self.unit() {
            "" => self.column().to_string(),
            unit => format!("{} ({unit})", self.column()),
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

// ---------------------------------------------------------------------------
// Label – classifier output
// ---------------------------------------------------------------------------

/// Binary upwelling label produced by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    PotentialUpwelling,
    NoPotentialUpwelling,
}

impl Label {
    pub fn as_str(self) -> &'static str {
        match self {
            Label::PotentialUpwelling => "potential upwelling",
            Label::NoPotentialUpwelling => "no potential upwelling",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Observation – one row of a climate table
// ---------------------------------------------------------------------------

/// One dated row of a historical or forecast table.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    pub values: BTreeMap<Feature, f64>,
    /// Categorical status (e.g. the historical upwelling class), if the file has one.
    pub status: Option<String>,
}

impl Observation {
    pub fn value(&self, feature: Feature) -> Option<f64> {
        self.values.get(&feature).copied()
    }
}

// ---------------------------------------------------------------------------
// ObservationTable – the complete loaded file
// ---------------------------------------------------------------------------

/// A loaded table with pre-computed column information.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationTable {
    pub rows: Vec<Observation>,
    /// Features present in the file, in canonical order.
    pub features: Vec<Feature>,
    /// Name of the status column, if the file has one.
    pub status_column: Option<String>,
    /// Sorted distinct status values.
    pub statuses: BTreeSet<String>,
}

impl ObservationTable {
    pub fn new(rows: Vec<Observation>, features: Vec<Feature>, status_column: Option<String>) -> Self {
        let statuses = rows.iter().filter_map(|r| r.status.clone()).collect();
        ObservationTable {
            rows,
            features,
            status_column,
            statuses,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Earliest and latest dates in the table.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.rows.iter().map(|r| r.date).min()?;
        let max = self.rows.iter().map(|r| r.date).max()?;
        Some((min, max))
    }

    /// First row recorded for `date`.
    pub fn find(&self, date: NaiveDate) -> Option<&Observation> {
        self.rows.iter().find(|r| r.date == date)
    }

    /// Copy of the table restricted to the rows at `indices`.
    pub fn subset(&self, indices: &[usize]) -> ObservationTable {
        let rows = indices
            .iter()
            .filter_map(|&i| self.rows.get(i).cloned())
            .collect();
        ObservationTable::new(rows, self.features.clone(), self.status_column.clone())
    }
}

// ---------------------------------------------------------------------------
// PredictionRecord – one row of the prediction accumulator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRecord {
    pub date: NaiveDate,
    pub values: BTreeMap<Feature, f64>,
    pub label: Label,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn feature_columns_resolve_back_to_features() {
        for f in Feature::ALL {
            assert_eq!(Feature::from_column(f.column()), Some(f));
        }
        assert_eq!(Feature::from_column("RH2M"), None);
    }

    #[test]
    fn feature_serde_uses_column_names() {
        let json = serde_json::to_string(&[Feature::Ws10m, Feature::AllskyKt]).unwrap();
        assert_eq!(json, r#"["WS10M","ALLSKY_KT"]"#);
    }

    #[test]
    fn labels_are_the_two_fixed_strings() {
        assert_eq!(Label::PotentialUpwelling.to_string(), "potential upwelling");
        assert_eq!(Label::NoPotentialUpwelling.to_string(), "no potential upwelling");
    }

    #[test]
    fn table_bounds_and_statuses() {
        let rows = vec![
            Observation {
                date: date(2024, 1, 3),
                values: BTreeMap::new(),
                status: Some("Upwelling".into()),
            },
            Observation {
                date: date(2024, 1, 1),
                values: BTreeMap::new(),
                status: Some("Normal".into()),
            },
        ];
        let table = ObservationTable::new(rows, vec![], Some("Status".into()));
        assert_eq!(table.date_bounds(), Some((date(2024, 1, 1), date(2024, 1, 3))));
        assert_eq!(table.statuses.len(), 2);
        assert_eq!(format_date(date(2024, 1, 3)), "03/01/2024");
    }
}
