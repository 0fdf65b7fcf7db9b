//! Error handling for SketchKit
//!
//! Provides error types for every layer of the plotter:
//! - Configuration errors (invalid pin mapping or calibration)
//! - Hardware errors (a pin write or mode call reported failure)
//! - Job errors (a fault inside a motion job body)
//! - Validation errors (a malformed external request)
//!
//! Hardware errors are logged where they happen and never propagate past the
//! axis driver; the type exists so that log records and diagnostics share one
//! vocabulary.

use thiserror::Error;

/// Configuration error type
///
/// Raised while building a plotter from settings. The motor may remain
/// non-functional when one of these is logged at startup.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// A numeric setting is outside its valid range
    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue {
        /// The setting name.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// Two pins were mapped to the same GPIO line
    #[error("Pin {pin} is assigned more than once")]
    DuplicatePin {
        /// The duplicated GPIO pin number.
        pin: u32,
    },
}

/// Hardware I/O error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HardwareError {
    /// A pin write reported failure
    #[error("Failed to write {level} to pin {pin}")]
    WriteFailed {
        /// The GPIO pin number.
        pin: u32,
        /// The requested level, as text.
        level: String,
    },

    /// A pin mode call reported failure
    #[error("Failed to set mode of pin {pin}")]
    ModeFailed {
        /// The GPIO pin number.
        pin: u32,
    },

    /// The pulse train could not be handed to the hardware
    #[error("Pulse train rejected on pin {pin}")]
    PulseTrainRejected {
        /// The GPIO pin number.
        pin: u32,
    },
}

/// Job execution error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum JobError {
    /// The job body returned an error
    #[error("Job '{job}' failed: {reason}")]
    Failed {
        /// The job description.
        job: String,
        /// The failure reason.
        reason: String,
    },

    /// The job body panicked
    #[error("Job '{job}' panicked: {message}")]
    Panicked {
        /// The job description.
        job: String,
        /// The panic payload, when it was a string.
        message: String,
    },

    /// The job observed a stop request and returned early
    #[error("Job '{job}' cancelled after {completed} of {total} moves")]
    Cancelled {
        /// The job description.
        job: String,
        /// Moves executed before the stop request.
        completed: usize,
        /// Moves in the job.
        total: usize,
    },

    /// The execution thread could not be started
    #[error("Could not spawn execution thread: {reason}")]
    SpawnFailed {
        /// The OS error text.
        reason: String,
    },
}

/// Validation error type for external requests
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A dimension that must be positive was not
    #[error("{field} must be > 0")]
    NonPositive {
        /// The offending field name.
        field: String,
    },

    /// A request carried no usable data
    #[error("Empty request: {0}")]
    Empty(String),
}

/// Main error type for SketchKit
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Hardware error
    #[error(transparent)]
    Hardware(#[from] HardwareError),

    /// Job error
    #[error(transparent)]
    Job(#[from] JobError),

    /// Validation error
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl Error {
    /// Check if this is a configuration error
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }

    /// Check if this is a validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    /// Check if this is a cancelled job
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Job(JobError::Cancelled { .. }))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
