use eframe::egui::Ui;

use crate::data::export::{table_to_csv, FILTERED_FILE_NAME};
use crate::data::filter::filtered_indices;
use crate::data::model::format_date;
use crate::state::{export_outcome, AppState};
use crate::ui::plot::feature_line_chart;
use crate::ui::table::observation_table;
use crate::ui::widgets::{date_range_picker, error_label};

const NOTE: &str = "The forecast values can be used as input for the upwelling prediction. \
They estimate the climate indicators for the coming period and were produced with the SVARMA \
and VAR time-series models.";

pub fn show(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Forecast Data");

    state.forecast.ensure_loaded();
    let table = match state.forecast.get() {
        Ok(table) => table,
        Err(msg) => {
            error_label(ui, msg);
            return;
        }
    };

    let window = state.config.forecast_window();
    ui.strong("Select time range");
    date_range_picker(
        ui,
        "forecast_range",
        &mut state.forecast_view.selection,
        Some(window),
        window.start(),
    );

    // Nothing renders until both endpoints are picked.
    let range = match state.forecast_view.selection.resolve() {
        Ok(range) => range,
        Err(e) => {
            error_label(ui, &e.to_string());
            return;
        }
    };
    let Some(range) = range.clamp_to(window) else {
        error_label(ui, "The selected range lies outside the forecast period");
        return;
    };
    let indices = filtered_indices(table, range);

    ui.label(format!(
        "Showing forecast data from {} to {} ({} days, {} rows)",
        format_date(range.start()),
        format_date(range.end()),
        range.days(),
        indices.len()
    ));

    ui.add_space(8.0);
    ui.heading("Forecast indicators and plots");
    for &feature in &table.features {
        ui.add_space(4.0);
        ui.columns(2, |cols: &mut [Ui]| {
            cols[0].strong(feature.column());
            observation_table(
                &mut cols[0],
                &format!("forecast_{}", feature.column()),
                table,
                &indices,
                &[feature],
                false,
            );
            cols[1].strong(format!("Plot for {}", feature.column()));
            feature_line_chart(
                &mut cols[1],
                &format!("forecast_plot_{}", feature.column()),
                table,
                &indices,
                feature,
                220.0,
            );
        });
    }

    ui.add_space(8.0);
    ui.heading("All forecast indicators");
    observation_table(ui, "forecast_all", table, &indices, &table.features, false);
    if ui.button("Download CSV").clicked() {
        state.status_message =
            export_outcome(FILTERED_FILE_NAME, table_to_csv(&table.subset(&indices)));
    }

    ui.add_space(8.0);
    ui.label(NOTE);
}
