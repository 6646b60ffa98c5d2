pub mod about;
pub mod forecast;
pub mod home;
pub mod prediction;

use eframe::egui::Ui;

use crate::state::{AppState, Page};

/// Render the page currently selected in the side panel.
pub fn show(ui: &mut Ui, state: &mut AppState) {
    match state.page {
        Page::Home => home::show(ui, state),
        Page::Forecast => forecast::show(ui, state),
        Page::Prediction => prediction::show(ui, state),
        Page::About => about::show(ui, state),
    }
}
