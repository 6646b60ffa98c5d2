use std::ops::RangeInclusive;

use chrono::{Datelike, NaiveDate};
use eframe::egui::Ui;
use egui_plot::{GridMark, Legend, Line, Plot, PlotPoints, Points};

use crate::color::{feature_color, StatusColors};
use crate::data::model::{format_date, Feature, ObservationTable};

// ---------------------------------------------------------------------------
// Date axis
// ---------------------------------------------------------------------------

/// Dates are plotted as days since the Common Era.
fn date_to_x(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn date_axis_label(mark: GridMark, _range: &RangeInclusive<f64>) -> String {
    NaiveDate::from_num_days_from_ce_opt(mark.value.round() as i32)
        .map(format_date)
        .unwrap_or_default()
}

fn base_plot(id: &str, y_label: String, height: f32) -> Plot {
    Plot::new(id)
        .height(height)
        .legend(Legend::default())
        .x_axis_label("Date")
        .y_axis_label(y_label)
        .x_axis_formatter(date_axis_label)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------

/// One feature over time as a line.
pub fn feature_line_chart(
    ui: &mut Ui,
    id: &str,
    table: &ObservationTable,
    indices: &[usize],
    feature: Feature,
    height: f32,
) {
    let points: PlotPoints = indices
        .iter()
        .filter_map(|&i| {
            let row = &table.rows[i];
            row.value(feature).map(|v| [date_to_x(row.date), v])
        })
        .collect();

    base_plot(id, feature.axis_label(), height).show(ui, |plot_ui| {
        plot_ui.line(
            Line::new(points)
                .name(feature.column())
                .color(feature_color(feature))
                .width(1.5),
        );
    });
}

/// One feature over time as markers, one series per status value.
pub fn status_scatter(
    ui: &mut Ui,
    id: &str,
    table: &ObservationTable,
    indices: &[usize],
    feature: Feature,
    height: f32,
) {
    let colors = StatusColors::new(&table.statuses);

    base_plot(id, feature.axis_label(), height).show(ui, |plot_ui| {
        for status in &table.statuses {
            let points: PlotPoints = indices
                .iter()
                .map(|&i| &table.rows[i])
                .filter(|row| row.status.as_deref() == Some(status.as_str()))
                .filter_map(|row| row.value(feature).map(|v| [date_to_x(row.date), v]))
                .collect();
            plot_ui.points(
                Points::new(points)
                    .name(status)
                    .color(colors.color_for(status))
                    .radius(3.0),
            );
        }
    });
}
