use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use super::svm::SvmModel;
use crate::error::{DashboardError, Result};

struct CachedModel {
    modified: Option<SystemTime>,
    /// A failed load is remembered as its message so a broken version is
    /// reported without being parsed again on every frame.
    model: std::result::Result<Arc<SvmModel>, String>,
}

/// Loaded model artifacts keyed by path.
///
/// An entry is reused until the file's modification time changes, so the
/// artifact is parsed once per version instead of on every interaction.
#[derive(Default)]
pub struct ModelCache {
    entries: HashMap<PathBuf, CachedModel>,
}

impl ModelCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the model at `path`, loading it if it is not cached or the
    /// file changed since it was loaded.
    pub fn get(&mut self, path: &Path) -> Result<Arc<SvmModel>> {
        let modified = std::fs::metadata(path)
            .map_err(|source| DashboardError::Io {
                path: path.to_path_buf(),
                source,
            })?
            .modified()
            .ok();

        if let Some(entry) = self.entries.get(path) {
            if entry.modified == modified {
                log::debug!("Model cache hit for {}", path.display());
                return match &entry.model {
                    Ok(model) => Ok(Arc::clone(model)),
                    Err(msg) => Err(DashboardError::InvalidModel(msg.clone())),
                };
            }
            log::info!("Model artifact {} changed, reloading", path.display());
        }

        let loaded = SvmModel::from_file(path).map(Arc::new);
        let cached = match &loaded {
            Ok(model) => {
                log::info!(
                    "Loaded model {} ({} support vectors, features {:?})",
                    path.display(),
                    model.support_vectors.len(),
                    model.feature_order
                );
                Ok(Arc::clone(model))
            }
            Err(e) => {
                log::error!("Failed to load model {}: {e}", path.display());
                Err(e.to_string())
            }
        };
        self.entries.insert(
            path.to_path_buf(),
            CachedModel {
                modified,
                model: cached,
            },
        );
        loaded
    }

    pub fn invalidate(&mut self, path: &Path) {
        self.entries.remove(path);
    }
}
