use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::classifier::Classifier;
use crate::data::export::{predictions_to_csv, PREDICTIONS_FILE_NAME};
use crate::data::loader::parse_number;
use crate::data::model::{format_date, Feature};
use crate::predictor::{FieldInput, PredictionSession};
use crate::state::{export_outcome, AppState, StatusMessage};
use crate::ui::table::prediction_table;
use crate::ui::widgets::{date_range_picker, error_label, success_label, warning_label};

const DRAFT_ROW_HEIGHT: f32 = 24.0;

const HELP: &str = "This tool predicts upwelling potential from daily climate indicators. Pick a \
date range of up to a year: dates found in the input data are filled in automatically, the \
others take the values you type. Click 'Predict Upwelling' to classify every date and add the \
results to the table below.";

pub fn show(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Upwelling Prediction");

    let model = match state.model() {
        Ok(model) => model,
        Err(e) => {
            error_label(ui, &format!("Model unavailable: {e}"));
            results(ui, &mut state.prediction, &mut state.status_message);
            return;
        }
    };

    state.refresh_prediction_source();
    let source = match state.prediction_source.get() {
        Ok(table) => {
            success_label(ui, &format!("Input data loaded ({} rows)", table.len()));
            table
        }
        Err(msg) => {
            error_label(ui, msg);
            results(ui, &mut state.prediction, &mut state.status_message);
            return;
        }
    };

    ui.add_space(8.0);
    ui.strong("Select dates");
    let suggested = source
        .date_bounds()
        .map(|(_, max)| max)
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    date_range_picker(ui, "predict_range", &mut state.prediction.selection, None, suggested);

    if let Err(e) = state
        .prediction
        .sync_drafts(Some(source), model.feature_order())
    {
        error_label(ui, &e.to_string());
        results(ui, &mut state.prediction, &mut state.status_message);
        return;
    }

    let total = state.prediction.drafts.len();
    let found = state
        .prediction
        .drafts
        .iter()
        .filter(|d| d.has_source_data())
        .count();
    let complete = state
        .prediction
        .drafts
        .iter()
        .filter(|d| d.is_auto_filled())
        .count();
    if complete == total {
        success_label(ui, "Data found for every selected date; fields were auto-filled.");
    } else if found == 0 {
        warning_label(ui, "No data found for the selected dates. Please enter the values manually.");
    } else {
        warning_label(
            ui,
            &format!(
                "Data found for {found} of {total} dates. Enter the remaining values manually."
            ),
        );
    }

    draft_grid(ui, &mut state.prediction, model.feature_order());

    ui.add_space(4.0);
    if ui.button(RichText::new("Predict Upwelling").strong()).clicked() {
        state.prediction.predict(&*model);
    }
    if let Some(n) = state.prediction.last_run {
        success_label(ui, &format!("{n} prediction(s) added"));
    }
    for failure in &state.prediction.failures {
        warning_label(ui, &format!("Skipped {}", failure.message()));
    }

    results(ui, &mut state.prediction, &mut state.status_message);
}

/// Input table: one row per date, one column per model feature in model
/// order. Only visible rows are laid out.
fn draft_grid(ui: &mut Ui, session: &mut PredictionSession, order: &[Feature]) {
    let drafts = &mut session.drafts;
    ui.push_id("draft_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::auto().at_least(90.0))
            .columns(Column::auto().at_least(70.0), order.len())
            .column(Column::remainder().at_least(80.0))
            .min_scrolled_height(0.0)
            .max_scroll_height(300.0)
            .header(DRAFT_ROW_HEIGHT, |mut header| {
                header.col(|ui| {
                    ui.strong("DATE");
                });
                for f in order {
                    header.col(|ui| {
                        ui.strong(f.column()).on_hover_text(f.description());
                    });
                }
                header.col(|ui| {
                    ui.strong("Source");
                });
            })
            .body(|body| {
                body.rows(DRAFT_ROW_HEIGHT, drafts.len(), |mut row| {
                    let draft = &mut drafts[row.index()];
                    let source = if draft.is_auto_filled() {
                        "auto-filled"
                    } else if draft.has_source_data() {
                        "partly filled"
                    } else {
                        "manual"
                    };
                    row.col(|ui| {
                        ui.label(format_date(draft.date));
                    });
                    for field in &mut draft.fields {
                        row.col(|ui| match &mut field.input {
                            FieldInput::Filled(v) => {
                                ui.label(format!("{v:.2}"));
                            }
                            FieldInput::Manual(text) => {
                                let valid = parse_number(text.trim(), false).is_some();
                                let mut edit =
                                    egui::TextEdit::singleline(text).desired_width(70.0);
                                if !valid {
                                    edit = edit.text_color(Color32::RED);
                                }
                                ui.add(edit);
                            }
                        });
                    }
                    row.col(|ui| {
                        ui.label(RichText::new(source).weak());
                    });
                });
            });
    });
}

/// Accumulated predictions with download and clear controls.
fn results(ui: &mut Ui, session: &mut PredictionSession, status: &mut Option<StatusMessage>) {
    ui.add_space(8.0);
    ui.heading(format!("Prediction results ({})", session.log.len()));
    if session.log.is_empty() {
        ui.label(RichText::new("No predictions yet.").weak());
    } else {
        prediction_table(ui, "prediction_results", session.log.records());
        ui.horizontal(|ui: &mut Ui| {
            if ui.button("Download CSV").clicked() {
                *status = export_outcome(
                    PREDICTIONS_FILE_NAME,
                    predictions_to_csv(session.log.records()),
                );
            }
            if ui.button("Clear results").clicked() {
                session.log.clear();
                session.failures.clear();
                session.last_run = None;
            }
        });
    }
    ui.add_space(8.0);
    ui.label(HELP);
}
