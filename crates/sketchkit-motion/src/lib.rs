//! # SketchKit Motion
//!
//! Drives the two knobs of the drawing toy.
//!
//! - **Pins**: [`PinController`] capability with a no-op implementation and,
//!   behind the `hardware` feature, a Linux GPIO character-device one
//! - **Axis**: backlash-aware stepper driver emitting chunked pulse trains
//! - **Plotter**: pixel vectors to per-axis rotations, position tracking, homing
//! - **Jobs**: move / return-to-origin / clear-screen units of work
//! - **Queue**: FIFO scheduler with at most one active job

pub mod axis;
pub mod job;
pub mod pin;
pub mod plotter;
pub mod queue;
pub mod slot;

pub use axis::{AxisDriver, AxisPins, Direction, RotationReport, MAX_STEPS_PER_TRAIN};
pub use job::{CancellationToken, Job, JobContext, PlotterJob};
pub use pin::{NullPinController, PinController, PinLevel, PinMode, Pulse, PulseTrainHandle};
#[cfg(feature = "hardware")]
pub use pin::{GpiodPinController, DEFAULT_GPIO_CHIP};
pub use plotter::{MoveReport, XyPlotter};
pub use queue::{MotionQueue, MotionQueueConfig};
pub use slot::{PlotterSlot, SharedPlotter};
