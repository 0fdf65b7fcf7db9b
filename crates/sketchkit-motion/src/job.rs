//! Motion jobs
//!
//! A job is a unit of work executed exactly once by the [`MotionQueue`]
//! worker. Plotter jobs capture the plotter handle current at construction
//! time, so a settings change never redirects a job that is already queued.
//!
//! [`MotionQueue`]: crate::queue::MotionQueue

use crate::slot::SharedPlotter;
use sketchkit_core::{JobError, Result, Vector};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative stop flag shared between the queue and a running job
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the job to stop at its next checkpoint
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Execution context handed to [`Job::execute`]
#[derive(Debug, Clone, Default)]
pub struct JobContext {
    token: CancellationToken,
}

impl JobContext {
    pub fn new(token: CancellationToken) -> Self {
        Self { token }
    }

    /// True once a stop was requested for this job
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// A unit of motion work
pub trait Job: Send + 'static {
    /// Short human readable description, used in logs
    fn description(&self) -> String;

    /// Run the job to completion (or until cancelled)
    fn execute(self: Box<Self>, ctx: &JobContext) -> Result<()>;
}

/// Built-in plotter jobs
pub enum PlotterJob {
    /// Draw a sequence of relative moves
    Move {
        plotter: SharedPlotter,
        vectors: Vec<Vector>,
    },
    /// Return the stylus to the homed position
    ReturnToOrigin { plotter: SharedPlotter },
    /// Return to the origin and re-home against the end stops
    ClearScreen { plotter: SharedPlotter },
}

impl PlotterJob {
    pub fn move_by(plotter: SharedPlotter, vectors: Vec<Vector>) -> Self {
        PlotterJob::Move { plotter, vectors }
    }

    pub fn return_to_origin(plotter: SharedPlotter) -> Self {
        PlotterJob::ReturnToOrigin { plotter }
    }

    pub fn clear_screen(plotter: SharedPlotter) -> Self {
        PlotterJob::ClearScreen { plotter }
    }
}

impl fmt::Debug for PlotterJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

impl Job for PlotterJob {
    fn description(&self) -> String {
        match self {
            PlotterJob::Move { vectors, .. } => format!("move ({} vectors)", vectors.len()),
            PlotterJob::ReturnToOrigin { .. } => "return to origin".to_string(),
            PlotterJob::ClearScreen { .. } => "clear screen".to_string(),
        }
    }

    fn execute(self: Box<Self>, ctx: &JobContext) -> Result<()> {
        let description = self.description();
        match *self {
            PlotterJob::Move { plotter, vectors } => {
                let total = vectors.len();
                for (completed, vector) in vectors.into_iter().enumerate() {
                    if ctx.is_cancelled() {
                        return Err(JobError::Cancelled {
                            job: description,
                            completed,
                            total,
                        }
                        .into());
                    }
                    plotter.lock().move_by(vector);
                }
            }
            PlotterJob::ReturnToOrigin { plotter } => {
                plotter.lock().move_to_origin();
            }
            PlotterJob::ClearScreen { plotter } => {
                let mut plotter = plotter.lock();
                plotter.move_to_origin();
                plotter.reset_cursor();
            }
        }
        Ok(())
    }
}
