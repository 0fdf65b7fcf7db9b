//! Composition root
//!
//! [`Sketchbot`] wires the settings store, the plotter and the motion queue
//! together and exposes the operations a front end needs: plan an image,
//! queue it, nudge the stylus, home, stop, and reconfigure.

use sketchkit_core::{ConfigurationError, ValidationError, Vector};
use sketchkit_motion::{
    Job, MotionQueue, MotionQueueConfig, PinController, PinLevel, PinMode, PlotterJob,
    PlotterSlot, SharedPlotter, XyPlotter,
};
use sketchkit_planner::{Bitmap, InstructionAssembler, PlannerConfig, PlannerError, PlotterInstruction};
use sketchkit_settings::{ConfigSettings, HardwareSettings, SettingsError, SettingsStore};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced by [`Sketchbot`] operations
#[derive(Error, Debug)]
pub enum SketchbotError {
    /// A request carried invalid arguments
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// New settings failed validation
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Settings could not be persisted
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// An image could not be planned
    #[error(transparent)]
    Planner(#[from] PlannerError),

    /// The motion queue no longer accepts jobs
    #[error("Motion queue is shut down")]
    QueueClosed,
}

/// Result type alias for [`Sketchbot`] operations
pub type SketchbotResult<T> = Result<T, SketchbotError>;

/// The drawing robot: settings, plotter and job queue
pub struct Sketchbot {
    store: Arc<dyn SettingsStore>,
    pins: Arc<dyn PinController>,
    slot: PlotterSlot,
    queue: MotionQueue,
    assembler: InstructionAssembler,
}

impl std::fmt::Debug for Sketchbot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sketchbot")
            .field("pins", &self.pins)
            .field("queue", &self.queue)
            .field("planner", self.assembler.config())
            .finish()
    }
}

impl Sketchbot {
    /// Build with default planner and queue configuration
    pub fn new(store: Arc<dyn SettingsStore>, pins: Arc<dyn PinController>) -> Self {
        Self::with_config(store, pins, PlannerConfig::default(), MotionQueueConfig::default())
    }

    /// Build with explicit planner and queue configuration
    pub fn with_config(
        store: Arc<dyn SettingsStore>,
        pins: Arc<dyn PinController>,
        planner: PlannerConfig,
        queue: MotionQueueConfig,
    ) -> Self {
        let hardware = store.get_hardware_settings();
        let config = store.get_config_settings();
        let plotter = XyPlotter::from_settings(Arc::clone(&pins), &hardware, &config);
        tracing::info!("Plotter initialised");

        Self {
            store,
            pins,
            slot: PlotterSlot::new(plotter),
            queue: MotionQueue::new(queue),
            assembler: InstructionAssembler::new(planner),
        }
    }

    /// Handle to the current plotter
    pub fn plotter(&self) -> SharedPlotter {
        self.slot.current()
    }

    /// Plan a bitmap without moving anything
    pub fn get_plotter_instructions<B: Bitmap + ?Sized>(&self, bitmap: &B) -> PlotterInstruction {
        self.assembler.assemble(bitmap)
    }

    /// Decode and plan an image file without moving anything
    pub fn plan_image<P: AsRef<Path>>(&self, path: P) -> SketchbotResult<PlotterInstruction> {
        Ok(self.assembler.plan_image_file(path)?)
    }

    /// Append an arbitrary job. Returns `false` once the queue is shut down.
    pub fn queue_job(&self, job: Box<dyn Job>) -> bool {
        self.queue.queue_job(job)
    }

    /// Queue the moves of an already planned instruction
    pub fn queue_instruction(&self, instruction: &PlotterInstruction) -> SketchbotResult<()> {
        if instruction.is_empty() {
            return Err(ValidationError::Empty("instruction has no vectors".to_string()).into());
        }
        self.submit(PlotterJob::move_by(self.plotter(), instruction.vectors.clone()))
    }

    /// Plan an image file and queue the drawing
    pub fn sketch_image<P: AsRef<Path>>(&self, path: P) -> SketchbotResult<PlotterInstruction> {
        let instruction = self.plan_image(path)?;
        self.queue_instruction(&instruction)?;
        Ok(instruction)
    }

    /// Queue a relative move as an x job followed by a y job
    pub fn move_by(&self, x: i64, y: i64) -> SketchbotResult<()> {
        if x == 0 && y == 0 {
            return Err(ValidationError::Empty("move of (0, 0)".to_string()).into());
        }
        if x != 0 {
            self.submit(PlotterJob::move_by(self.plotter(), vec![Vector::new(x, 0)]))?;
        }
        if y != 0 {
            self.submit(PlotterJob::move_by(self.plotter(), vec![Vector::new(0, y)]))?;
        }
        Ok(())
    }

    /// Queue a rectangle outline starting and ending at the current position
    pub fn draw_rectangle(&self, width: i64, height: i64) -> SketchbotResult<()> {
        for (field, value) in [("width", width), ("height", height)] {
            if value <= 0 {
                return Err(ValidationError::NonPositive {
                    field: field.to_string(),
                }
                .into());
            }
        }

        let edges = [
            Vector::new(width, 0),
            Vector::new(0, height),
            Vector::new(-width, 0),
            Vector::new(0, -height),
        ];
        for edge in edges {
            self.submit(PlotterJob::move_by(self.plotter(), vec![edge]))?;
        }
        Ok(())
    }

    /// Queue a return to the origin followed by re-homing
    pub fn reset(&self) -> SketchbotResult<()> {
        self.submit(PlotterJob::clear_screen(self.plotter()))
    }

    /// Queue a return to the origin
    pub fn return_to_origin(&self) -> SketchbotResult<()> {
        self.submit(PlotterJob::return_to_origin(self.plotter()))
    }

    /// Stop the running job; see [`MotionQueue::stop_job`]
    pub fn stop_job(&self) -> bool {
        self.queue.stop_job()
    }

    pub fn is_job_active(&self) -> bool {
        self.queue.is_job_active()
    }

    pub fn pending_jobs(&self) -> usize {
        self.queue.pending_jobs()
    }

    /// Diagnostic: drive a pin directly
    pub fn set_pin(&self, pin: u32, level: PinLevel) -> bool {
        if self.pins.read_mode(pin) != Some(PinMode::Output)
            && !self.pins.configure(pin, PinMode::Output)
        {
            tracing::warn!("Pin {} could not be configured as output", pin);
            return false;
        }
        let ok = self.pins.write(pin, level);
        tracing::info!("Set pin {} {} (success={})", pin, level, ok);
        ok
    }

    /// Diagnostic: current mode of a pin
    pub fn pin_mode(&self, pin: u32) -> Option<PinMode> {
        self.pins.read_mode(pin)
    }

    pub fn hardware_settings(&self) -> HardwareSettings {
        self.store.get_hardware_settings()
    }

    pub fn config_settings(&self) -> ConfigSettings {
        self.store.get_config_settings()
    }

    /// Validate, persist and apply new settings.
    ///
    /// The plotter is rebuilt and swapped in; jobs already queued keep
    /// running on the previous plotter.
    pub fn update_settings(
        &self,
        hardware: &HardwareSettings,
        config: &ConfigSettings,
    ) -> SketchbotResult<()> {
        hardware.validate()?;
        config.validate()?;
        self.store.set_hardware_settings(hardware)?;
        self.store.set_config_settings(config)?;

        let plotter = XyPlotter::from_settings(Arc::clone(&self.pins), hardware, config);
        self.slot.swap(plotter);
        tracing::info!("Settings updated, plotter rebuilt");
        Ok(())
    }

    /// Stop the queue; further jobs are rejected
    pub fn shutdown(&self) {
        self.queue.shutdown();
    }

    fn submit(&self, job: PlotterJob) -> SketchbotResult<()> {
        if self.queue.queue_job(Box::new(job)) {
            Ok(())
        } else {
            Err(SketchbotError::QueueClosed)
        }
    }
}
