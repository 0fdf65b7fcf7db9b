//! Two-axis plotter
//!
//! Maps pixel vectors to knob rotations. The x knob always moves before the
//! y knob, so a diagonal vector is drawn as an L.

use crate::axis::{AxisDriver, AxisPins, Direction, RotationReport};
use crate::pin::PinController;
use sketchkit_core::{Point, Vector, ORIGIN};
use sketchkit_settings::{ConfigSettings, HardwareSettings};
use std::sync::Arc;

/// Result of one [`XyPlotter::move_by`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveReport {
    pub x: RotationReport,
    pub y: RotationReport,
}

/// Stepper-driven two-knob plotter
#[derive(Debug)]
pub struct XyPlotter {
    x_axis: AxisDriver,
    y_axis: AxisDriver,
    x_degrees_per_pixel: f64,
    y_degrees_per_pixel: f64,
    invert_x: bool,
    invert_y: bool,
    canvas: (u32, u32),
    position: Point,
}

impl XyPlotter {
    /// Build a plotter from the persisted settings
    pub fn from_settings(
        pins: Arc<dyn PinController>,
        hardware: &HardwareSettings,
        config: &ConfigSettings,
    ) -> Self {
        let spr = hardware.steps_per_rotation;
        let x_axis = AxisDriver::new(
            "x-motor",
            Arc::clone(&pins),
            AxisPins {
                step: hardware.x_step_pin,
                direction: hardware.x_direction_pin,
                enable: hardware.x_enable_pin,
            },
            spr,
            config.x_backlash_steps(spr),
            config.x_degrees_per_second(),
        );
        let y_axis = AxisDriver::new(
            "y-motor",
            pins,
            AxisPins {
                step: hardware.y_step_pin,
                direction: hardware.y_direction_pin,
                enable: hardware.y_enable_pin,
            },
            spr,
            config.y_backlash_steps(spr),
            config.y_degrees_per_second(),
        );

        Self {
            x_axis,
            y_axis,
            x_degrees_per_pixel: config.x_degrees_per_pixel,
            y_degrees_per_pixel: config.y_degrees_per_pixel,
            invert_x: config.invert_x,
            invert_y: config.invert_y,
            canvas: (config.canvas_width_pixels, config.canvas_height_pixels),
            position: ORIGIN,
        }
    }

    /// Stylus position relative to where it was last homed
    pub fn position(&self) -> Point {
        self.position
    }

    /// Drawable area in pixels
    pub fn canvas(&self) -> (u32, u32) {
        self.canvas
    }

    pub fn x_axis(&self) -> &AxisDriver {
        &self.x_axis
    }

    pub fn y_axis(&self) -> &AxisDriver {
        &self.y_axis
    }

    /// Knob rotation for `pixels` of x travel
    pub fn x_degrees(&self, pixels: f64) -> f64 {
        polarity(self.invert_x) * pixels * self.x_degrees_per_pixel
    }

    /// Knob rotation for `pixels` of y travel
    pub fn y_degrees(&self, pixels: f64) -> f64 {
        polarity(self.invert_y) * pixels * self.y_degrees_per_pixel
    }

    /// Move the stylus by a relative pixel vector, x first
    pub fn move_by(&mut self, vector: Vector) -> MoveReport {
        let mut report = MoveReport::default();
        if vector.x != 0 {
            report.x = self.x_axis.rotate(self.x_degrees(vector.x as f64));
        }
        if vector.y != 0 {
            report.y = self.y_axis.rotate(self.y_degrees(vector.y as f64));
        }
        self.position += vector;
        report
    }

    /// Return the stylus to the homed position
    pub fn move_to_origin(&mut self) -> MoveReport {
        tracing::info!("Moving to origin from {}", self.position);
        self.move_by(-self.position)
    }

    /// Re-home against the end stops.
    ///
    /// Drives both knobs a full canvas towards the origin corner, then takes up
    /// backlash in the drawing direction and zeroes the tracked position.
    pub fn reset_cursor(&mut self) {
        let (width, height) = self.canvas;
        tracing::info!("Resetting cursor against {}x{} end stops", width, height);

        self.x_axis.rotate(self.x_degrees(-(width as f64)));
        self.y_axis.rotate(self.y_degrees(-(height as f64)));

        let x_forward = Direction::of(self.x_degrees(1.0));
        let y_forward = Direction::of(self.y_degrees(1.0));
        self.x_axis.take_up_backlash(x_forward);
        self.y_axis.take_up_backlash(y_forward);

        self.position = ORIGIN;
    }
}

fn polarity(invert: bool) -> f64 {
    if invert {
        -1.0
    } else {
        1.0
    }
}
