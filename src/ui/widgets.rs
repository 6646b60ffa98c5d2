use chrono::NaiveDate;
use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::DatePickerButton;

use crate::data::filter::{DateRange, DateSelection};

// ---------------------------------------------------------------------------
// Inline messages
// ---------------------------------------------------------------------------

pub fn error_label(ui: &mut Ui, msg: &str) {
    ui.label(RichText::new(msg).color(Color32::RED));
}

pub fn warning_label(ui: &mut Ui, msg: &str) {
    ui.label(RichText::new(msg).color(Color32::from_rgb(230, 160, 30)));
}

pub fn success_label(ui: &mut Ui, msg: &str) {
    ui.label(RichText::new(msg).color(Color32::from_rgb(2, 171, 33)));
}

// ---------------------------------------------------------------------------
// Date range picker
// ---------------------------------------------------------------------------

/// Start / end pickers for a [`DateSelection`].
///
/// An endpoint that has not been picked shows a button instead of a
/// calendar; clicking it starts from `suggested`. Picked dates are kept
/// inside `window` when one is given. Returns `true` when the selection
/// changed this frame.
pub fn date_range_picker(
    ui: &mut Ui,
    id: &str,
    selection: &mut DateSelection,
    window: Option<DateRange>,
    suggested: NaiveDate,
) -> bool {
    let before = *selection;
    ui.horizontal(|ui: &mut Ui| {
        endpoint(ui, &format!("{id}_start"), "From", &mut selection.start, suggested);
        endpoint(ui, &format!("{id}_end"), "To", &mut selection.end, suggested);
        if ui.small_button("Clear").clicked() {
            selection.clear();
        }
    });

    if let Some(window) = window {
        for date in [&mut selection.start, &mut selection.end].into_iter().flatten() {
            *date = (*date).clamp(window.start(), window.end());
        }
        ui.label(
            RichText::new(format!(
                "Available: {} – {}",
                window.start().format("%d/%m/%Y"),
                window.end().format("%d/%m/%Y")
            ))
            .weak(),
        );
    }

    *selection != before
}

fn endpoint(ui: &mut Ui, id: &str, label: &str, date: &mut Option<NaiveDate>, suggested: NaiveDate) {
    ui.strong(format!("{label}:"));
    match date {
        Some(d) => {
            ui.add(DatePickerButton::new(d).id_salt(id).format("%d/%m/%Y"));
        }
        None => {
            if ui
                .button(RichText::new("Pick a date").italics())
                .on_hover_text("No date selected yet")
                .clicked()
            {
                *date = Some(suggested);
            }
        }
    }
}

/// Dropdown over a fixed list of choices.
pub fn combo<T: PartialEq + Copy>(
    ui: &mut Ui,
    id: &str,
    label: &str,
    current: &mut T,
    choices: &[(T, String)],
) {
    let selected_text = choices
        .iter()
        .find(|(v, _)| v == current)
        .map(|(_, text)| text.clone())
        .unwrap_or_default();
    ui.horizontal(|ui: &mut Ui| {
        ui.strong(label);
        egui::ComboBox::from_id_salt(id)
            .selected_text(selected_text)
            .show_ui(ui, |ui: &mut Ui| {
                for (value, text) in choices {
                    ui.selectable_value(current, *value, text.as_str());
                }
            });
    });
}
