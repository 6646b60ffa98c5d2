use eframe::egui::{self, RichText, Ui};

use crate::data::export::{table_to_csv, FILTERED_FILE_NAME};
use crate::data::filter::{filtered_indices, DateRange, DateSelection};
use crate::data::model::Feature;
use crate::state::{export_outcome, AppState};
use crate::ui::plot::{feature_line_chart, status_scatter};
use crate::ui::table::observation_table;
use crate::ui::widgets::{combo, date_range_picker, error_label};

const TITLE: &str =
    "Upwelling Monitoring and Prediction Dashboard Based on Climate Indicators in Lake Laut Tawar";

const INTRO: &str = "Welcome to the upwelling monitoring and prediction dashboard for Lake Laut \
Tawar. Local communities rely on the lake as one of their main sources of livelihood: its yearly \
fish production potential reaches 196 tonnes, which makes it central to the local economy and \
food supply. Erratic climate conditions disturb that production, and upwelling is one of the \
causes. In 2017 an upwelling event cost floating net cage (KJA) farmers on the lake hundreds of \
millions of rupiah.";

pub fn show(ui: &mut Ui, state: &mut AppState) {
    ui.heading(TITLE);
    ui.label(INTRO);
    ui.add_space(8.0);

    state.historical.ensure_loaded();
    let generation = state.historical.generation();
    let table = match state.historical.get() {
        Ok(table) => table,
        Err(msg) => {
            error_label(ui, msg);
            return;
        }
    };
    let bounds = table.date_bounds().map(|(min, max)| DateRange(min, max));

    // The historical range starts out covering every row.
    if state.home.initialised_for != Some(generation) {
        if let Some(b) = bounds {
            state.home.selection = DateSelection::new(b.start(), b.end());
        }
        state.home.initialised_for = Some(generation);
    }

    ui.strong("Select time range");
    let suggested = bounds
        .map(|b| b.start())
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    date_range_picker(ui, "home_range", &mut state.home.selection, bounds, suggested);

    let range = match state.home.selection.resolve() {
        Ok(range) => range,
        Err(e) => {
            error_label(ui, &e.to_string());
            return;
        }
    };
    let indices = filtered_indices(table, range);

    ui.add_space(8.0);
    ui.heading("Historical climate indicators");
    ui.label(format!("{} of {} rows", indices.len(), table.len()));
    observation_table(ui, "home_table", table, &indices, &table.features, true);
    if ui.button("Download CSV").clicked() {
        state.status_message =
            export_outcome(FILTERED_FILE_NAME, table_to_csv(&table.subset(&indices)));
    }

    ui.add_space(8.0);
    ui.heading("Column descriptions");
    egui::Grid::new("column_descriptions")
        .striped(true)
        .show(ui, |ui: &mut Ui| {
            ui.monospace("DATE");
            ui.label("Date the climate indicators were recorded");
            ui.end_row();
            for f in &table.features {
                ui.monospace(f.column());
                match f.unit() {
                    "" => ui.label(f.description()),
                    unit => ui.label(format!("{} ({unit})", f.description())),
                };
                ui.end_row();
            }
            if let Some(status) = &table.status_column {
                ui.monospace(status.as_str());
                ui.label("Potential upwelling event");
                ui.end_row();
            }
        });

    ui.add_space(8.0);
    ui.heading("Potential upwelling vs no potential upwelling");
    let choices: Vec<(Feature, String)> = table
        .features
        .iter()
        .map(|f| (*f, f.column().to_string()))
        .collect();
    if !table.features.contains(&state.home.plot_feature) {
        if let Some(first) = table.features.first() {
            state.home.plot_feature = *first;
        }
    }
    combo(ui, "home_plot_feature", "Indicator", &mut state.home.plot_feature, &choices);

    if table.statuses.is_empty() {
        ui.label(RichText::new("No status column in this file; showing the series only.").weak());
        feature_line_chart(ui, "home_plot", table, &indices, state.home.plot_feature, 320.0);
    } else {
        status_scatter(ui, "home_plot", table, &indices, state.home.plot_feature, 320.0);
    }
}
