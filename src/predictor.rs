use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::classifier::Classifier;
use crate::data::filter::{DateRange, DateSelection};
use crate::data::loader::parse_number;
use crate::data::model::{format_date, Feature, ObservationTable, PredictionRecord};
use crate::error::{DashboardError, Result};

/// Text shown in a manual field before the user types anything.
pub const MANUAL_DEFAULT: &str = "0.00";

/// Widest selection the Prediction page builds input rows for.
pub const MAX_PREDICTION_DAYS: usize = 366;

// ---------------------------------------------------------------------------
// Draft rows: per-date inputs waiting for the Predict button
// ---------------------------------------------------------------------------

/// Where one feature value of a draft row comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldInput {
    /// Copied from the source table; not editable.
    Filled(f64),
    /// Typed by the user; parsed only when predicting.
    Manual(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DraftField {
    pub feature: Feature,
    pub input: FieldInput,
}

/// Inputs for one date, one field per model feature in model order.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftRow {
    pub date: NaiveDate,
    pub fields: Vec<DraftField>,
}

/// A manual entry that is not a number.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub feature: Feature,
    pub value: String,
}

impl DraftRow {
    pub fn is_auto_filled(&self) -> bool {
        self.fields
            .iter()
            .all(|f| matches!(f.input, FieldInput::Filled(_)))
    }

    /// At least one value came from the source table.
    pub fn has_source_data(&self) -> bool {
        self.fields
            .iter()
            .any(|f| matches!(f.input, FieldInput::Filled(_)))
    }

    fn manual_text(&self, feature: Feature) -> Option<&str> {
        self.fields.iter().find_map(|f| match &f.input {
            FieldInput::Manual(text) if f.feature == feature => Some(text.as_str()),
            _ => None,
        })
    }

    /// Values in field order, or every field that failed to parse.
    pub fn resolve(&self) -> std::result::Result<Vec<f64>, Vec<FieldError>> {
        let mut values = Vec::with_capacity(self.fields.len());
        let mut errors = Vec::new();
        for field in &self.fields {
            match &field.input {
                FieldInput::Filled(v) => values.push(*v),
                FieldInput::Manual(text) => match parse_number(text.trim(), false) {
                    Some(v) => values.push(v),
                    None => errors.push(FieldError {
                        feature: field.feature,
                        value: text.clone(),
                    }),
                },
            }
        }
        if errors.is_empty() {
            Ok(values)
        } else {
            Err(errors)
        }
    }
}

/// Build one draft row per day of `range`.
///
/// A value present in `source` for that date is auto-filled. Everything else
/// is a manual field, keeping any text already typed for the same date and
/// feature in `previous`, or [`MANUAL_DEFAULT`] otherwise.
pub fn assemble_drafts(
    source: Option<&ObservationTable>,
    range: DateRange,
    features: &[Feature],
    previous: &[DraftRow],
) -> Vec<DraftRow> {
    range
        .map(|date| {
            let stored = source.and_then(|t| t.find(date));
            let earlier = previous.iter().find(|d| d.date == date);
            let fields = features
                .iter()
                .map(|&feature| {
                    let input = match stored.and_then(|row| row.value(feature)) {
                        Some(v) => FieldInput::Filled(v),
                        None => FieldInput::Manual(
                            earlier
                                .and_then(|d| d.manual_text(feature))
                                .unwrap_or(MANUAL_DEFAULT)
                                .to_string(),
                        ),
                    };
                    DraftField { feature, input }
                })
                .collect();
            DraftRow { date, fields }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Prediction
// ---------------------------------------------------------------------------

/// A draft row that produced no prediction, and why.
#[derive(Debug, Clone, PartialEq)]
pub struct RowFailure {
    pub date: NaiveDate,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct PredictionBatch {
    pub records: Vec<PredictionRecord>,
    pub failures: Vec<RowFailure>,
}

/// Classify every draft row. A row that cannot be turned into a valid vector
/// is recorded as a failure and the remaining rows still run.
pub fn predict_rows(classifier: &dyn Classifier, drafts: &[DraftRow]) -> PredictionBatch {
    let mut batch = PredictionBatch::default();

    for draft in drafts {
        let fail = |reason: String| RowFailure {
            date: draft.date,
            reason,
        };

        let values = match draft.resolve() {
            Ok(values) => values,
            Err(errors) => {
                let detail = errors
                    .iter()
                    .map(|e| format!("{} = '{}' is not a number", e.feature, e.value))
                    .collect::<Vec<_>>()
                    .join("; ");
                batch.failures.push(fail(detail));
                continue;
            }
        };
        let by_feature: BTreeMap<Feature, f64> = draft
            .fields
            .iter()
            .map(|f| f.feature)
            .zip(values)
            .collect();

        // Vector order is the model's training order, whatever the draft order.
        let vector: Option<Vec<f64>> = classifier
            .feature_order()
            .iter()
            .map(|f| by_feature.get(f).copied())
            .collect();
        let Some(vector) = vector else {
            batch
                .failures
                .push(fail("row does not provide every model feature".to_string()));
            continue;
        };

        match classifier.classify(&vector) {
            Ok(label) => batch.records.push(PredictionRecord {
                date: draft.date,
                values: by_feature,
                label,
            }),
            Err(e) => batch.failures.push(fail(e.to_string())),
        }
    }

    log::info!(
        "Predicted {} rows, {} skipped",
        batch.records.len(),
        batch.failures.len()
    );
    batch
}

// ---------------------------------------------------------------------------
// Accumulator
// ---------------------------------------------------------------------------

/// Predictions made during this session, sorted by date.
#[derive(Debug, Default, Clone)]
pub struct PredictionLog {
    records: Vec<PredictionRecord>,
}

impl PredictionLog {
    /// Add new predictions. A new prediction for a date replaces the old one.
    pub fn merge(&mut self, new: Vec<PredictionRecord>) {
        for rec in new {
            self.records.retain(|r| r.date != rec.date);
            self.records.push(rec);
        }
        self.records.sort_by_key(|r| r.date);
    }

    pub fn records(&self) -> &[PredictionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// Everything the Prediction page keeps between frames.
#[derive(Debug, Default)]
pub struct PredictionSession {
    pub selection: DateSelection,
    pub drafts: Vec<DraftRow>,
    drafts_key: Option<(DateRange, Vec<Feature>)>,
    pub log: PredictionLog,
    pub failures: Vec<RowFailure>,
    /// Number of rows predicted by the last click.
    pub last_run: Option<usize>,
}

impl PredictionSession {
    /// Make `drafts` match the current selection and model features.
    ///
    /// Fails (and leaves no drafts) while the selection is incomplete or
    /// wider than [`MAX_PREDICTION_DAYS`]. Outcomes of the last run are
    /// dropped whenever the drafts are rebuilt.
    pub fn sync_drafts(
        &mut self,
        source: Option<&ObservationTable>,
        features: &[Feature],
    ) -> Result<()> {
        let range = match self.selection.resolve().and_then(|range| {
            if range.days() > MAX_PREDICTION_DAYS {
                Err(DashboardError::RangeTooLong {
                    days: range.days(),
                    max: MAX_PREDICTION_DAYS,
                })
            } else {
                Ok(range)
            }
        }) {
            Ok(range) => range,
            Err(e) => {
                self.drafts.clear();
                self.drafts_key = None;
                self.clear_run();
                return Err(e);
            }
        };
        let key = (range, features.to_vec());
        if self.drafts_key.as_ref() != Some(&key) {
            self.drafts = assemble_drafts(source, range, features, &self.drafts);
            self.drafts_key = Some(key);
            self.clear_run();
        }
        Ok(())
    }

    fn clear_run(&mut self) {
        self.failures.clear();
        self.last_run = None;
    }

    /// Force the next [`sync_drafts`](Self::sync_drafts) to rebuild, e.g.
    /// after the source table was reloaded.
    pub fn invalidate_drafts(&mut self) {
        self.drafts_key = None;
    }

    /// Run the classifier over the current drafts and accumulate the results.
    pub fn predict(&mut self, classifier: &dyn Classifier) {
        let batch = predict_rows(classifier, &self.drafts);
        self.last_run = Some(batch.records.len());
        self.failures = batch.failures;
        self.log.merge(batch.records);
    }
}

impl RowFailure {
    pub fn message(&self) -> String {
        format!("{}: {}", format_date(self.date), self.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::svm::SvmModel;
    use crate::data::loader::{read_table, LoadOptions};
    use crate::data::model::Label;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const SOURCE: &str = "\
DATE,ALLSKY_KT,T2M,PRECTOTCORR,PS,WS10M
01/01/2024,0.5,20.0,1.2,88.0,1.0
03/01/2024,0.47,19.3,7.25,87.91,2.4
";

    /// Linear model trained on the five features in a non-canonical order.
    const MODEL: &str = r#"{
        "feature_order": ["ALLSKY_KT", "T2M", "WS10M", "PRECTOTCORR", "PS"],
        "kernel": { "type": "linear" },
        "support_vectors": [[0, 0, 1, 0, 0]],
        "dual_coef": [-1.0],
        "intercept": 1.5
    }"#;

    fn source() -> ObservationTable {
        read_table(SOURCE.as_bytes(), &LoadOptions::default()).unwrap()
    }

    fn model() -> SvmModel {
        SvmModel::from_json(MODEL).unwrap()
    }

    #[test]
    fn auto_fill_then_predict_single_day() {
        let table = source();
        let model = model();
        let mut session = PredictionSession {
            selection: DateSelection::new(date(2024, 1, 1), date(2024, 1, 1)),
            ..Default::default()
        };
        session.sync_drafts(Some(&table), model.feature_order()).unwrap();

        assert_eq!(session.drafts.len(), 1);
        let draft = &session.drafts[0];
        assert!(draft.is_auto_filled());
        let filled: Vec<(Feature, f64)> = draft
            .fields
            .iter()
            .map(|f| match f.input {
                FieldInput::Filled(v) => (f.feature, v),
                FieldInput::Manual(_) => panic!("{} not auto-filled", f.feature),
            })
            .collect();
        assert_eq!(
            filled,
            vec![
                (Feature::AllskyKt, 0.5),
                (Feature::T2m, 20.0),
                (Feature::Ws10m, 1.0),
                (Feature::Prectotcorr, 1.2),
                (Feature::Ps, 88.0),
            ]
        );

        session.predict(&model);
        assert_eq!(session.log.len(), 1);
        let rec = &session.log.records()[0];
        assert_eq!(rec.date, date(2024, 1, 1));
        assert_eq!(rec.values.get(&Feature::Prectotcorr), Some(&1.2));
        assert_eq!(rec.values.get(&Feature::Ws10m), Some(&1.0));
        // 1.5 - wind(1.0) > 0
        assert_eq!(rec.label, Label::PotentialUpwelling);
        assert!(session.failures.is_empty());
    }

    #[test]
    fn vector_follows_model_order() {
        let table = source();
        let model = model();
        // Drafts listed in another order must still put wind third.
        let drafts = vec![DraftRow {
            date: date(2024, 1, 1),
            fields: vec![
                DraftField { feature: Feature::Prectotcorr, input: FieldInput::Filled(1.2) },
                DraftField { feature: Feature::Ws10m, input: FieldInput::Filled(3.0) },
                DraftField { feature: Feature::AllskyKt, input: FieldInput::Filled(0.5) },
                DraftField { feature: Feature::T2m, input: FieldInput::Filled(20.0) },
                DraftField { feature: Feature::Ps, input: FieldInput::Filled(88.0) },
            ],
        }];
        let batch = predict_rows(&model, &drafts);
        assert_eq!(batch.records[0].label, Label::NoPotentialUpwelling);

        let auto = assemble_drafts(
            Some(&table),
            DateRange(date(2024, 1, 3), date(2024, 1, 3)),
            model.feature_order(),
            &[],
        );
        assert_eq!(predict_rows(&model, &auto).records[0].label, Label::NoPotentialUpwelling);
    }

    #[test]
    fn absent_date_defaults_to_zero() {
        let table = source();
        let model = model();
        let drafts = assemble_drafts(
            Some(&table),
            DateRange(date(2024, 1, 2), date(2024, 1, 2)),
            model.feature_order(),
            &[],
        );
        assert_eq!(drafts.len(), 1);
        assert!(drafts[0]
            .fields
            .iter()
            .all(|f| f.input == FieldInput::Manual(MANUAL_DEFAULT.to_string())));
        assert_eq!(drafts[0].resolve().unwrap(), vec![0.0; 5]);
    }

    #[test]
    fn feature_missing_from_source_is_manual() {
        let table = source();
        let drafts = assemble_drafts(
            Some(&table),
            DateRange(date(2024, 1, 1), date(2024, 1, 1)),
            &[Feature::T2m, Feature::Ts],
            &[],
        );
        assert_eq!(drafts[0].fields[0].input, FieldInput::Filled(20.0));
        assert_eq!(
            drafts[0].fields[1].input,
            FieldInput::Manual(MANUAL_DEFAULT.to_string())
        );
    }

    #[test]
    fn bad_manual_entry_skips_only_its_row() {
        let model = model();
        let mut session = PredictionSession {
            selection: DateSelection::new(date(2024, 5, 1), date(2024, 5, 3)),
            ..Default::default()
        };
        session.sync_drafts(None, model.feature_order()).unwrap();
        assert_eq!(session.drafts.len(), 3);
        session.drafts[1].fields[2].input = FieldInput::Manual("abc".to_string());

        session.predict(&model);
        assert_eq!(session.last_run, Some(2));
        assert_eq!(session.failures.len(), 1);
        assert_eq!(session.failures[0].date, date(2024, 5, 2));
        assert!(session.failures[0].reason.contains("WS10M"));
        let dates: Vec<_> = session.log.records().iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![date(2024, 5, 1), date(2024, 5, 3)]);
    }

    #[test]
    fn manual_text_survives_range_change() {
        let model = model();
        let mut session = PredictionSession {
            selection: DateSelection::new(date(2024, 5, 1), date(2024, 5, 2)),
            ..Default::default()
        };
        session.sync_drafts(None, model.feature_order()).unwrap();
        session.drafts[1].fields[0].input = FieldInput::Manual("0.42".to_string());

        session.selection = DateSelection::new(date(2024, 5, 2), date(2024, 5, 4));
        session.sync_drafts(None, model.feature_order()).unwrap();
        assert_eq!(session.drafts.len(), 3);
        assert_eq!(session.drafts[0].date, date(2024, 5, 2));
        assert_eq!(
            session.drafts[0].fields[0].input,
            FieldInput::Manual("0.42".to_string())
        );
    }

    #[test]
    fn incomplete_selection_clears_drafts() {
        let mut session = PredictionSession::default();
        let err = session.sync_drafts(None, &[Feature::Ps]).unwrap_err();
        assert!(matches!(err, DashboardError::IncompleteRange));
        assert!(session.drafts.is_empty());
    }

    #[test]
    fn log_merges_sorts_and_replaces_same_date() {
        let rec = |d: NaiveDate, label| PredictionRecord {
            date: d,
            values: BTreeMap::new(),
            label,
        };
        let mut log = PredictionLog::default();
        log.merge(vec![
            rec(date(2024, 1, 5), Label::PotentialUpwelling),
            rec(date(2024, 1, 2), Label::PotentialUpwelling),
        ]);
        log.merge(vec![
            rec(date(2024, 1, 3), Label::NoPotentialUpwelling),
            rec(date(2024, 1, 5), Label::NoPotentialUpwelling),
        ]);
        let summary: Vec<_> = log.records().iter().map(|r| (r.date, r.label)).collect();
        assert_eq!(
            summary,
            vec![
                (date(2024, 1, 2), Label::PotentialUpwelling),
                (date(2024, 1, 3), Label::NoPotentialUpwelling),
                (date(2024, 1, 5), Label::NoPotentialUpwelling),
            ]
        );
        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn classifier_errors_skip_the_row() {
        struct Broken;
        impl Classifier for Broken {
            fn feature_order(&self) -> &[Feature] {
                &[Feature::Ps]
            }
            fn classify(&self, _: &[f64]) -> Result<Label> {
                Err(DashboardError::NonFiniteFeature(0))
            }
        }
        let drafts = vec![DraftRow {
            date: date(2024, 1, 1),
            fields: vec![DraftField {
                feature: Feature::Ps,
                input: FieldInput::Filled(88.0),
            }],
        }];
        let batch = predict_rows(&Broken, &drafts);
        assert!(batch.records.is_empty());
        assert_eq!(batch.failures.len(), 1);
    }

    #[test]
    fn overly_wide_selection_is_rejected() {
        let mut session = PredictionSession {
            selection: DateSelection::new(date(1900, 1, 1), date(2100, 12, 31)),
            ..Default::default()
        };
        let err = session.sync_drafts(None, &[Feature::Ps]).unwrap_err();
        assert!(matches!(
            err,
            DashboardError::RangeTooLong { max: MAX_PREDICTION_DAYS, .. }
        ));
        assert!(session.drafts.is_empty());

        // A full leap year is still accepted.
        session.selection = DateSelection::new(date(2024, 1, 1), date(2024, 12, 31));
        session.sync_drafts(None, &[Feature::Ps]).unwrap();
        assert_eq!(session.drafts.len(), MAX_PREDICTION_DAYS);
    }

    #[test]
    fn new_selection_drops_previous_run_outcome() {
        let model = model();
        let mut session = PredictionSession {
            selection: DateSelection::new(date(2024, 5, 1), date(2024, 5, 2)),
            ..Default::default()
        };
        session.sync_drafts(None, model.feature_order()).unwrap();
        session.drafts[0].fields[0].input = FieldInput::Manual("x".to_string());
        session.predict(&model);
        assert_eq!(session.failures.len(), 1);
        assert_eq!(session.last_run, Some(1));

        // Same selection: nothing rebuilt, outcome kept.
        session.sync_drafts(None, model.feature_order()).unwrap();
        assert_eq!(session.failures.len(), 1);

        session.selection = DateSelection::new(date(2024, 6, 1), date(2024, 6, 1));
        session.sync_drafts(None, model.feature_order()).unwrap();
        assert!(session.failures.is_empty());
        assert_eq!(session.last_run, None);
        assert_eq!(session.log.len(), 1);
    }

    #[test]
    fn partial_source_row_counts_as_source_data() {
        let table = source();
        let drafts = assemble_drafts(
            Some(&table),
            DateRange(date(2024, 1, 1), date(2024, 1, 2)),
            &[Feature::T2m, Feature::Ts],
            &[],
        );
        assert!(drafts[0].has_source_data());
        assert!(!drafts[0].is_auto_filled());
        assert!(!drafts[1].has_source_data());
    }
}
