//! SketchKit Settings Crate
//!
//! Holds the hardware pin mapping and the calibration records the plotter is
//! built from, and persists them to JSON (or TOML) files with documented
//! fallback defaults.

pub mod config;
pub mod error;
pub mod persistence;

pub use config::{ConfigSettings, HardwareSettings};
pub use error::{SettingsError, SettingsResult};
pub use persistence::{FileSettingsStore, MemorySettingsStore, SettingsStore};
