//! # SketchKit
//!
//! Draws raster images on an Etch-A-Sketch driven by two stepper motors.
//!
//! ## Architecture
//!
//! SketchKit is organized as a workspace with multiple crates:
//!
//! 1. **sketchkit-core** - Pixel geometry, error taxonomy, shared-state aliases
//! 2. **sketchkit-settings** - Pin mapping and calibration, JSON/TOML persistence
//! 3. **sketchkit-planner** - Image to continuous path to translation vectors
//! 4. **sketchkit-motion** - Pins, stepper axes, plotter, single-flight job queue
//! 5. **sketchkit** - [`Sketchbot`] composition root and the command line binary

pub mod sketchbot;

pub use sketchbot::{Sketchbot, SketchbotError, SketchbotResult};

pub use sketchkit_core::{Error, Point, Result, Vector, ORIGIN};
pub use sketchkit_motion::{
    Job, JobContext, MotionQueueConfig, NullPinController, PinController, PinLevel, PinMode,
    PlotterJob,
};
#[cfg(feature = "hardware")]
pub use sketchkit_motion::GpiodPinController;
pub use sketchkit_planner::{
    Bitmap, ImageBitmap, PixelMask, PlannerConfig, PlotterInstruction,
};
pub use sketchkit_settings::{
    ConfigSettings, FileSettingsStore, HardwareSettings, MemorySettingsStore, SettingsStore,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
