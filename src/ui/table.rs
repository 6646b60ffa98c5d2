use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{format_date, Feature, ObservationTable, PredictionRecord};

const ROW_HEIGHT: f32 = 18.0;
const MAX_HEIGHT: f32 = 320.0;

fn cell(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Climate rows
// ---------------------------------------------------------------------------

/// Table of `indices` rows from `table`, showing only `features` (plus the
/// status column when `with_status` is set).
pub fn observation_table(
    ui: &mut Ui,
    id: &str,
    table: &ObservationTable,
    indices: &[usize],
    features: &[Feature],
    with_status: bool,
) {
    let status_header = table
        .status_column
        .as_deref()
        .filter(|_| with_status);
    let n_cols = features.len() + usize::from(status_header.is_some());

    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::auto().at_least(90.0))
            .columns(Column::auto().at_least(70.0), n_cols)
            .min_scrolled_height(0.0)
            .max_scroll_height(MAX_HEIGHT)
            .header(ROW_HEIGHT + 2.0, |mut header| {
                header.col(|ui| {
                    ui.strong("DATE");
                });
                for f in features {
                    header.col(|ui| {
                        ui.strong(f.column()).on_hover_text(f.description());
                    });
                }
                if let Some(status) = status_header {
                    header.col(|ui| {
                        ui.strong(status);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, indices.len(), |mut row| {
                    let obs = &table.rows[indices[row.index()]];
                    row.col(|ui| {
                        ui.label(format_date(obs.date));
                    });
                    for &f in features {
                        row.col(|ui| {
                            ui.label(cell(obs.value(f)));
                        });
                    }
                    if status_header.is_some() {
                        row.col(|ui| {
                            ui.label(obs.status.as_deref().unwrap_or(""));
                        });
                    }
                });
            });
    });
}

// ---------------------------------------------------------------------------
// Prediction accumulator
// ---------------------------------------------------------------------------

pub fn prediction_table(ui: &mut Ui, id: &str, records: &[PredictionRecord]) {
    let features: Vec<Feature> = Feature::ALL
        .into_iter()
        .filter(|f| records.iter().any(|r| r.values.contains_key(f)))
        .collect();

    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::auto().at_least(90.0))
            .columns(Column::auto().at_least(70.0), features.len())
            .column(Column::remainder().at_least(160.0))
            .min_scrolled_height(0.0)
            .max_scroll_height(MAX_HEIGHT)
            .header(ROW_HEIGHT + 2.0, |mut header| {
                header.col(|ui| {
                    ui.strong("DATE");
                });
                for f in &features {
                    header.col(|ui| {
                        ui.strong(f.column());
                    });
                }
                header.col(|ui| {
                    ui.strong("Predictions");
                });
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, records.len(), |mut row| {
                    let rec = &records[row.index()];
                    row.col(|ui| {
                        ui.label(format_date(rec.date));
                    });
                    for f in &features {
                        row.col(|ui| {
                            ui.label(cell(rec.values.get(f).copied()));
                        });
                    }
                    row.col(|ui| {
                        ui.label(rec.label.as_str());
                    });
                });
            });
    });
}
