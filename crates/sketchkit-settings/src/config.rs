//! Plotter configuration records
//!
//! Two records drive plotter construction:
//! - [`HardwareSettings`]: GPIO pin mapping and motor resolution
//! - [`ConfigSettings`]: calibration (backlash, degrees per pixel, draw speed)
//!
//! Field names are serialized in camelCase so existing settings files written
//! by the web service keep loading.

use serde::{Deserialize, Serialize};
use sketchkit_core::ConfigurationError;
use std::collections::HashSet;

/// GPIO pin mapping and motor resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardwareSettings {
    /// X axis step pin
    pub x_step_pin: u32,
    /// X axis enable pin
    pub x_enable_pin: u32,
    /// X axis direction pin
    pub x_direction_pin: u32,
    /// Y axis step pin
    pub y_step_pin: u32,
    /// Y axis enable pin
    pub y_enable_pin: u32,
    /// Y axis direction pin
    pub y_direction_pin: u32,
    /// Driver steps per full motor rotation (including microstepping)
    #[serde(rename = "stepsPerCycle")]
    pub steps_per_rotation: u32,
}

impl Default for HardwareSettings {
    fn default() -> Self {
        Self {
            x_step_pin: 27,
            x_enable_pin: 22,
            x_direction_pin: 17,
            y_step_pin: 24,
            y_enable_pin: 25,
            y_direction_pin: 23,
            steps_per_rotation: 3200,
        }
    }
}

impl HardwareSettings {
    /// All six pins, in x step/enable/direction then y step/enable/direction order
    pub fn pins(&self) -> [u32; 6] {
        [
            self.x_step_pin,
            self.x_enable_pin,
            self.x_direction_pin,
            self.y_step_pin,
            self.y_enable_pin,
            self.y_direction_pin,
        ]
    }

    /// Validate pin mapping and resolution
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.steps_per_rotation == 0 {
            return Err(ConfigurationError::InvalidValue {
                key: "stepsPerCycle".to_string(),
                reason: "must be > 0".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for pin in self.pins() {
            if !seen.insert(pin) {
                return Err(ConfigurationError::DuplicatePin { pin });
            }
        }
        Ok(())
    }
}

fn default_canvas_width() -> u32 {
    550
}

fn default_canvas_height() -> u32 {
    400
}

fn default_invert_x() -> bool {
    true
}

/// Calibration settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSettings {
    /// Pixels of slack taken up on an x direction reversal
    pub x_backlash_pixels: f64,
    /// Pixels of slack taken up on a y direction reversal
    pub y_backlash_pixels: f64,
    /// Knob rotation per pixel of x travel
    pub x_degrees_per_pixel: f64,
    /// Knob rotation per pixel of y travel
    pub y_degrees_per_pixel: f64,
    /// Stylus speed in pixels per second
    #[serde(rename = "drawSpeed_PixelsPerSec")]
    pub draw_speed_pixels_per_sec: f64,
    /// Extra pixels drawn past a line end; stored for the web UI, unused by motion
    #[serde(default, rename = "overdraw_pixels")]
    pub overdraw_pixels: f64,
    /// Negate x rotations (motor mounted mirrored)
    #[serde(default = "default_invert_x")]
    pub invert_x: bool,
    /// Negate y rotations
    #[serde(default)]
    pub invert_y: bool,
    /// Drawable width in pixels, used when homing against the end stops
    #[serde(default = "default_canvas_width")]
    pub canvas_width_pixels: u32,
    /// Drawable height in pixels
    #[serde(default = "default_canvas_height")]
    pub canvas_height_pixels: u32,
}

impl Default for ConfigSettings {
    fn default() -> Self {
        Self {
            x_backlash_pixels: 2.5,
            y_backlash_pixels: 2.5,
            x_degrees_per_pixel: 3.8,
            y_degrees_per_pixel: 3.4,
            draw_speed_pixels_per_sec: 200.0,
            overdraw_pixels: 0.0,
            invert_x: default_invert_x(),
            invert_y: false,
            canvas_width_pixels: default_canvas_width(),
            canvas_height_pixels: default_canvas_height(),
        }
    }
}

impl ConfigSettings {
    /// Validate calibration values
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let positive = [
            ("xDegreesPerPixel", self.x_degrees_per_pixel),
            ("yDegreesPerPixel", self.y_degrees_per_pixel),
            ("drawSpeed_PixelsPerSec", self.draw_speed_pixels_per_sec),
        ];
        for (key, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigurationError::InvalidValue {
                    key: key.to_string(),
                    reason: format!("must be > 0, got {}", value),
                });
            }
        }

        let non_negative = [
            ("xBacklashPixels", self.x_backlash_pixels),
            ("yBacklashPixels", self.y_backlash_pixels),
            ("overdraw_pixels", self.overdraw_pixels),
        ];
        for (key, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigurationError::InvalidValue {
                    key: key.to_string(),
                    reason: format!("must be >= 0, got {}", value),
                });
            }
        }

        if self.canvas_width_pixels == 0 || self.canvas_height_pixels == 0 {
            return Err(ConfigurationError::InvalidValue {
                key: "canvas".to_string(),
                reason: "dimensions must be > 0".to_string(),
            });
        }
        Ok(())
    }

    /// Motor steps needed to take up x backlash
    pub fn x_backlash_steps(&self, steps_per_rotation: u32) -> u32 {
        backlash_steps(
            self.x_backlash_pixels,
            self.x_degrees_per_pixel,
            steps_per_rotation,
        )
    }

    /// Motor steps needed to take up y backlash
    pub fn y_backlash_steps(&self, steps_per_rotation: u32) -> u32 {
        backlash_steps(
            self.y_backlash_pixels,
            self.y_degrees_per_pixel,
            steps_per_rotation,
        )
    }

    /// X knob speed in degrees per second
    pub fn x_degrees_per_second(&self) -> f64 {
        self.draw_speed_pixels_per_sec * self.x_degrees_per_pixel
    }

    /// Y knob speed in degrees per second
    pub fn y_degrees_per_second(&self) -> f64 {
        self.draw_speed_pixels_per_sec * self.y_degrees_per_pixel
    }
}

fn backlash_steps(backlash_pixels: f64, degrees_per_pixel: f64, steps_per_rotation: u32) -> u32 {
    (backlash_pixels * degrees_per_pixel / 360.0 * steps_per_rotation as f64) as u32
}
