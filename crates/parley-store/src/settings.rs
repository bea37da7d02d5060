use std::fs;
use std::path::{Path, PathBuf};

use parley_types::Settings;

use crate::error::{Result, StoreError};

const SETTINGS_FILE: &str = "settings.json";

/// Backend connection settings with durable persistence.
///
/// The persisted record is consulted once at startup to hydrate the store;
/// after that the in-memory value is the source of truth, written back on
/// every explicit save. A missing or corrupt record hydrates to defaults
/// with a warning, never an error.
#[derive(Debug)]
pub struct SettingsStore {
    settings: Settings,
    path: PathBuf,
}

impl SettingsStore {
    /// Open the store at the default location
    /// (`<config dir>/parley/settings.json`), hydrating from disk.
    pub fn open_default() -> Self {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::open(base.join("parley").join(SETTINGS_FILE))
    }

    /// Open the store at an explicit path, hydrating from disk.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let settings = hydrate(&path);
        Self { settings, path }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_backend_configured(&self) -> bool {
        self.settings.is_backend_configured()
    }

    /// Replace the whole connection tuple atomically and persist it.
    pub fn set(&mut self, settings: Settings) -> Result<()> {
        let json = serde_json::to_string_pretty(&settings)
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::Storage(e.to_string()))?;
        }
        fs::write(&self.path, json).map_err(|e| StoreError::Storage(e.to_string()))?;
        self.settings = settings;
        Ok(())
    }

    /// Reset to defaults and remove the persisted record.
    pub fn clear(&mut self) -> Result<()> {
        self.settings = Settings::default();
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Storage(e.to_string())),
        }
    }
}

fn hydrate(path: &Path) -> Settings {
    match fs::read_to_string(path) {
        Ok(raw) => match serde_json::from_str(&raw) {
            Ok(settings) => settings,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "corrupt settings record, using defaults");
                Settings::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Settings::default(),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "could not read settings, using defaults");
            Settings::default()
        }
    }
}
