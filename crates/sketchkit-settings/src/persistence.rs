//! Settings Persistence
//!
//! Loads and saves the hardware and calibration records. Loading never fails:
//! a missing, unreadable or invalid file is logged and replaced with the
//! documented defaults, so the plotter can always be constructed.

use crate::config::{ConfigSettings, HardwareSettings};
use crate::error::{SettingsError, SettingsResult};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Read/write access to the two persisted settings records
pub trait SettingsStore: Send + Sync {
    /// Load hardware settings, falling back to [`HardwareSettings::default`]
    fn get_hardware_settings(&self) -> HardwareSettings;

    /// Persist hardware settings
    fn set_hardware_settings(&self, settings: &HardwareSettings) -> SettingsResult<()>;

    /// Load calibration settings, falling back to [`ConfigSettings::default`]
    fn get_config_settings(&self) -> ConfigSettings;

    /// Persist calibration settings
    fn set_config_settings(&self, settings: &ConfigSettings) -> SettingsResult<()>;
}

/// File format, chosen from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

impl Format {
    fn from_path(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            _ => Err(SettingsError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Settings store backed by one file per record
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    hardware_path: PathBuf,
    config_path: PathBuf,
}

impl FileSettingsStore {
    /// Hardware settings file name used by [`FileSettingsStore::in_directory`]
    pub const HARDWARE_FILE: &'static str = "hardwareSettings.json";
    /// Calibration settings file name used by [`FileSettingsStore::in_directory`]
    pub const CONFIG_FILE: &'static str = "configSettings.json";

    /// Create a store over explicit file paths (`.json` or `.toml`)
    pub fn new(hardware_path: impl Into<PathBuf>, config_path: impl Into<PathBuf>) -> Self {
        Self {
            hardware_path: hardware_path.into(),
            config_path: config_path.into(),
        }
    }

    /// Create a store with the standard file names inside `dir`
    pub fn in_directory(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::new(dir.join(Self::HARDWARE_FILE), dir.join(Self::CONFIG_FILE))
    }

    /// Create a store in the platform config directory (`~/.config/sketchkit` on Linux)
    pub fn in_config_dir() -> SettingsResult<Self> {
        let dir = dirs::config_dir()
            .ok_or_else(|| SettingsError::ConfigDirectory("no config directory".to_string()))?
            .join("sketchkit");
        std::fs::create_dir_all(&dir)?;
        Ok(Self::in_directory(dir))
    }

    /// Path of the hardware settings file
    pub fn hardware_path(&self) -> &Path {
        &self.hardware_path
    }

    /// Path of the calibration settings file
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    fn load_record<T: DeserializeOwned>(path: &Path) -> SettingsResult<T> {
        let format = Format::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::LoadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let record = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };
        Ok(record)
    }

    fn save_record<T: Serialize>(path: &Path, record: &T) -> SettingsResult<()> {
        let content = match Format::from_path(path)? {
            Format::Json => serde_json::to_string_pretty(record)?,
            Format::Toml => toml::to_string_pretty(record)?,
        };

        std::fs::write(path, content).map_err(|e| SettingsError::SaveError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(())
    }

    /// Load hardware settings, reporting failures instead of falling back
    pub fn try_load_hardware_settings(&self) -> SettingsResult<HardwareSettings> {
        let settings: HardwareSettings = Self::load_record(&self.hardware_path)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load calibration settings, reporting failures instead of falling back
    pub fn try_load_config_settings(&self) -> SettingsResult<ConfigSettings> {
        let settings: ConfigSettings = Self::load_record(&self.config_path)?;
        settings.validate()?;
        Ok(settings)
    }
}

impl SettingsStore for FileSettingsStore {
    fn get_hardware_settings(&self) -> HardwareSettings {
        self.try_load_hardware_settings().unwrap_or_else(|e| {
            tracing::warn!(
                "Failed to load hardware settings. Filepath=[{}]: {}",
                self.hardware_path.display(),
                e
            );
            HardwareSettings::default()
        })
    }

    fn set_hardware_settings(&self, settings: &HardwareSettings) -> SettingsResult<()> {
        settings.validate()?;
        Self::save_record(&self.hardware_path, settings)
    }

    fn get_config_settings(&self) -> ConfigSettings {
        self.try_load_config_settings().unwrap_or_else(|e| {
            tracing::warn!(
                "Failed to load config settings. Filepath=[{}]: {}",
                self.config_path.display(),
                e
            );
            ConfigSettings::default()
        })
    }

    fn set_config_settings(&self, settings: &ConfigSettings) -> SettingsResult<()> {
        settings.validate()?;
        Self::save_record(&self.config_path, settings)
    }
}

/// In-memory settings store, for tests and for running without a writable disk
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    hardware: Mutex<HardwareSettings>,
    config: Mutex<ConfigSettings>,
}

impl MemorySettingsStore {
    /// Create a store seeded with the given records
    pub fn new(hardware: HardwareSettings, config: ConfigSettings) -> Self {
        Self {
            hardware: Mutex::new(hardware),
            config: Mutex::new(config),
        }
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get_hardware_settings(&self) -> HardwareSettings {
        self.hardware.lock().clone()
    }

    fn set_hardware_settings(&self, settings: &HardwareSettings) -> SettingsResult<()> {
        settings.validate()?;
        *self.hardware.lock() = settings.clone();
        Ok(())
    }

    fn get_config_settings(&self) -> ConfigSettings {
        self.config.lock().clone()
    }

    fn set_config_settings(&self, settings: &ConfigSettings) -> SettingsResult<()> {
        settings.validate()?;
        *self.config.lock() = settings.clone();
        Ok(())
    }
}
