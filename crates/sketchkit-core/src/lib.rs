//! # SketchKit Core
//!
//! Core types shared by every SketchKit crate.
//! Provides integer pixel geometry, the error taxonomy used across the
//! planning and motion layers, and aliases for cross-thread shared state.

pub mod error;
pub mod geometry;
pub mod types;

pub use error::{
    ConfigurationError, Error, HardwareError, JobError, Result, ValidationError,
};
pub use geometry::{Point, Vector, ORIGIN};

pub use types::{thread_safe, thread_safe_rw, ThreadSafe, ThreadSafeRw};
