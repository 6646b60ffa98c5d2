use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::{AppState, Page, StatusMessage};

// ---------------------------------------------------------------------------
// Left side panel – page menu
// ---------------------------------------------------------------------------

/// Render the sidebar: page menu and data source info.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.add_space(4.0);
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(RichText::new("🌊 Upwelling").strong());
        ui.label(RichText::new("Danau Laut Tawar").weak());
    });
    ui.add_space(4.0);

    ui.heading("Dashboard");
    ui.separator();

    for page in Page::ALL {
        let text = RichText::new(page.title()).size(18.0);
        if ui
            .add_sized(
                [ui.available_width(), 28.0],
                egui::SelectableLabel::new(state.page == page, text),
            )
            .clicked()
        {
            state.page = page;
        }
    }

    ui.separator();

    egui::CollapsingHeader::new(RichText::new("Data sources").strong())
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            for (name, path) in [
                ("Historical", state.historical.path()),
                ("Forecast", state.forecast.path()),
                ("Prediction input", state.prediction_source.path()),
                ("Model", state.config.model_path.as_path()),
            ] {
                ui.label(RichText::new(name).strong());
                ui.label(RichText::new(path.display().to_string()).monospace().small());
            }
            ui.add_space(4.0);
            if ui
                .button("Reload files")
                .on_hover_text("Read every data file and the model again")
                .clicked()
            {
                reload_all(state);
            }
        });
}

fn reload_all(state: &mut AppState) {
    log::info!("Reloading data files and model");
    state.historical.reload();
    state.forecast.reload();
    state.prediction_source.reload();
    state.models.invalidate(&state.config.model_path);
    state.status_message = Some(StatusMessage::Info("Data files reloaded".to_string()));
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the title bar and the status line.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Upwelling Monitoring & Prediction");
        ui.separator();
        ui.label(state.page.title());

        if let Some(msg) = &state.status_message {
            ui.separator();
            let (text, color) = match msg {
                StatusMessage::Info(text) => (text.as_str(), Color32::from_rgb(2, 171, 33)),
                StatusMessage::Error(text) => (text.as_str(), Color32::RED),
            };
            ui.label(RichText::new(text).color(color));
            if ui.small_button("✖").clicked() {
                state.status_message = None;
            }
        }
    });
}
