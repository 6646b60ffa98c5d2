use std::sync::Arc;

use crate::classifier::cache::ModelCache;
use crate::classifier::svm::SvmModel;
use crate::config::{DashboardConfig, DatasetConfig};
use crate::data::export;
use crate::data::filter::DateSelection;
use crate::data::loader::load_table;
use crate::data::model::{Feature, ObservationTable};
use crate::predictor::PredictionSession;

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Home,
    Forecast,
    Prediction,
    About,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Home, Page::Forecast, Page::Prediction, Page::About];

    pub fn title(self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Forecast => "Forecast",
            Page::Prediction => "Prediction",
            Page::About => "About",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    English,
    Indonesian,
}

// ---------------------------------------------------------------------------
// Lazily loaded tables
// ---------------------------------------------------------------------------

#[derive(Debug)]
enum Loaded {
    NotLoaded,
    Ready(ObservationTable),
    Failed(String),
}

/// A configured input file, loaded on first use and kept until reloaded.
#[derive(Debug)]
pub struct DatasetSlot {
    config: DatasetConfig,
    state: Loaded,
    /// Bumped on every (re)load so dependants can notice new data.
    generation: u64,
}

impl DatasetSlot {
    pub fn new(config: DatasetConfig) -> Self {
        Self {
            config,
            state: Loaded::NotLoaded,
            generation: 0,
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.config.path
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Read the file if it has not been read since the last reload.
    pub fn ensure_loaded(&mut self) {
        if !matches!(self.state, Loaded::NotLoaded) {
            return;
        }
        self.state = match load_table(&self.config.path, &self.config.options) {
            Ok(table) => Loaded::Ready(table),
            Err(e) => {
                log::error!("Failed to load {}: {e}", self.config.path.display());
                Loaded::Failed(format!("Error loading {}: {e}", self.config.path.display()))
            }
        };
        self.generation += 1;
    }

    /// The loaded table, or the load error as text so the page can show it
    /// on every frame without retrying.
    pub fn get(&self) -> Result<&ObservationTable, &str> {
        match &self.state {
            Loaded::Ready(table) => Ok(table),
            Loaded::Failed(msg) => Err(msg.as_str()),
            Loaded::NotLoaded => Err("not loaded yet"),
        }
    }

    /// Drop the loaded table; the next [`ensure_loaded`](Self::ensure_loaded) reads the file again.
    pub fn reload(&mut self) {
        self.state = Loaded::NotLoaded;
    }
}

// ---------------------------------------------------------------------------
// Per-page view state
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct HomeView {
    pub selection: DateSelection,
    /// Generation of the table the selection was initialised from.
    pub initialised_for: Option<u64>,
    pub plot_feature: Feature,
}

impl Default for HomeView {
    fn default() -> Self {
        Self {
            selection: DateSelection::default(),
            initialised_for: None,
            plot_feature: Feature::Prectotcorr,
        }
    }
}

#[derive(Debug, Default)]
pub struct ForecastView {
    pub selection: DateSelection,
}

// ---------------------------------------------------------------------------
// Status line
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum StatusMessage {
    Info(String),
    Error(String),
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,
    pub page: Page,
    pub language: Language,

    pub historical: DatasetSlot,
    pub forecast: DatasetSlot,
    pub prediction_source: DatasetSlot,

    /// Loaded classifier artifacts, shared by every interaction.
    pub models: ModelCache,

    pub home: HomeView,
    pub forecast_view: ForecastView,
    /// Session-scoped prediction inputs and accumulator.
    pub prediction: PredictionSession,
    /// Generation of the prediction source the drafts were built from.
    pub prediction_source_seen: u64,

    /// Status / error message shown in the top bar.
    pub status_message: Option<StatusMessage>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            historical: DatasetSlot::new(config.historical.clone()),
            forecast: DatasetSlot::new(config.forecast.clone()),
            prediction_source: DatasetSlot::new(config.prediction_source.clone()),
            models: ModelCache::new(),
            home: HomeView::default(),
            forecast_view: ForecastView::default(),
            prediction: PredictionSession::default(),
            prediction_source_seen: 0,
            page: Page::default(),
            language: Language::default(),
            status_message: None,
            config,
        }
    }

    /// Load the prediction source if needed. A new generation (first load or
    /// reload) forces the drafts to be rebuilt from it.
    pub fn refresh_prediction_source(&mut self) {
        self.prediction_source.ensure_loaded();
        let generation = self.prediction_source.generation();
        if self.prediction_source_seen != generation {
            self.prediction.invalidate_drafts();
            self.prediction_source_seen = generation;
        }
    }

    /// The configured classifier, loaded once and reused until the file changes.
    pub fn model(&mut self) -> crate::error::Result<Arc<SvmModel>> {
        self.models.get(&self.config.model_path)
    }
}

/// Save `bytes` through a dialog and describe the outcome for the status line.
///
/// `None` when the user cancelled the dialog.
pub fn export_outcome(default_name: &str, bytes: anyhow::Result<Vec<u8>>) -> Option<StatusMessage> {
    match bytes.and_then(|b| export::save_with_dialog(default_name, &b)) {
        Ok(Some(path)) => Some(StatusMessage::Info(format!("Saved {}", path.display()))),
        Ok(None) => None,
        Err(e) => {
            log::error!("Export failed: {e:#}");
            Some(StatusMessage::Error(format!("Export failed: {e:#}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use chrono::NaiveDate;

    use super::*;
    use crate::data::loader::LoadOptions;
    use crate::predictor::FieldInput;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("upwelling-state-{}-{name}", std::process::id()))
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn csv_slot(path: &PathBuf) -> DatasetSlot {
        DatasetSlot::new(DatasetConfig {
            path: path.clone(),
            options: LoadOptions::default(),
        })
    }

    #[test]
    fn table_is_read_once_until_reloaded() {
        let path = temp_path("once.csv");
        fs::write(&path, "DATE,PS\n01/01/2024,88.0\n").unwrap();

        let mut slot = csv_slot(&path);
        assert_eq!(slot.generation(), 0);
        slot.ensure_loaded();
        assert_eq!(slot.generation(), 1);
        assert_eq!(slot.get().unwrap().len(), 1);

        // The file is gone but the loaded table is kept.
        fs::remove_file(&path).unwrap();
        slot.ensure_loaded();
        assert_eq!(slot.generation(), 1);
        assert!(slot.get().is_ok());

        // A reload reads again, and the failure is kept without retrying.
        slot.reload();
        slot.ensure_loaded();
        assert_eq!(slot.generation(), 2);
        assert!(slot.get().unwrap_err().contains("once.csv"));
        slot.ensure_loaded();
        assert_eq!(slot.generation(), 2);
    }

    #[test]
    fn reloaded_source_reaches_the_drafts() {
        let path = temp_path("source.csv");
        fs::write(&path, "DATE,PS\n01/01/2024,88.0\n").unwrap();

        let mut config = DashboardConfig::default();
        config.prediction_source.path = path.clone();
        let mut state = AppState::new(config);
        state.prediction.selection = DateSelection::new(date(2024, 1, 1), date(2024, 1, 1));

        state.refresh_prediction_source();
        state
            .prediction
            .sync_drafts(state.prediction_source.get().ok(), &[Feature::Ps])
            .unwrap();
        assert_eq!(state.prediction.drafts[0].fields[0].input, FieldInput::Filled(88.0));

        fs::write(&path, "DATE,PS\n01/01/2024,87.5\n").unwrap();
        // Without a reload the cached table and drafts stay.
        state.refresh_prediction_source();
        state
            .prediction
            .sync_drafts(state.prediction_source.get().ok(), &[Feature::Ps])
            .unwrap();
        assert_eq!(state.prediction.drafts[0].fields[0].input, FieldInput::Filled(88.0));

        state.prediction_source.reload();
        state.refresh_prediction_source();
        state
            .prediction
            .sync_drafts(state.prediction_source.get().ok(), &[Feature::Ps])
            .unwrap();
        assert_eq!(state.prediction.drafts[0].fields[0].input, FieldInput::Filled(87.5));

        fs::remove_file(&path).unwrap();
    }
}
