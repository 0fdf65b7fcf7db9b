//! Swappable plotter handle

use crate::plotter::XyPlotter;
use sketchkit_core::{thread_safe, thread_safe_rw, ThreadSafe, ThreadSafeRw};

/// A plotter shared between jobs
pub type SharedPlotter = ThreadSafe<XyPlotter>;

/// Holds the current plotter.
///
/// Reconfiguration builds a new plotter and swaps it in; jobs already queued
/// keep the handle they captured.
#[derive(Debug, Clone)]
pub struct PlotterSlot {
    current: ThreadSafeRw<SharedPlotter>,
}

impl PlotterSlot {
    pub fn new(plotter: XyPlotter) -> Self {
        Self {
            current: thread_safe_rw(thread_safe(plotter)),
        }
    }

    /// Handle to the current plotter
    pub fn current(&self) -> SharedPlotter {
        self.current.read().clone()
    }

    /// Replace the plotter, returning the previous handle
    pub fn swap(&self, plotter: XyPlotter) -> SharedPlotter {
        let next = thread_safe(plotter);
        std::mem::replace(&mut *self.current.write(), next)
    }
}
