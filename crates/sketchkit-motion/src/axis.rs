//! Stepper axis driver
//!
//! Converts knob rotations into step pulses for one stepper motor behind an
//! enable/direction/step driver. Backlash is compensated by adding extra
//! steps whenever the rotation direction reverses.

use crate::pin::{PinController, PinLevel, PinMode, Pulse};
use sketchkit_core::HardwareError;
use std::sync::Arc;

/// Largest number of steps handed to the pin controller in one pulse train
pub const MAX_STEPS_PER_TRAIN: u32 = 2000;

/// GPIO pins of one stepper driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisPins {
    pub step: u32,
    pub direction: u32,
    pub enable: u32,
}

/// Rotation direction, as written to the direction pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Positive degrees, direction pin high
    Forward,
    /// Negative degrees, direction pin low
    Reverse,
}

impl Direction {
    /// Direction of a rotation by `degrees`; zero counts as reverse
    pub fn of(degrees: f64) -> Self {
        if degrees > 0.0 {
            Direction::Forward
        } else {
            Direction::Reverse
        }
    }

    fn level(self) -> PinLevel {
        PinLevel::from(self == Direction::Forward)
    }
}

/// What a call to [`AxisDriver::rotate`] did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RotationReport {
    /// Steps requested, backlash included
    pub steps: u32,
    /// Of which backlash compensation
    pub backlash_steps: u32,
    /// Steps actually handed to the pin controller
    pub steps_sent: u32,
}

/// Driver for one stepper axis
#[derive(Debug)]
pub struct AxisDriver {
    name: String,
    pins: Arc<dyn PinController>,
    axis_pins: AxisPins,
    steps_per_rotation: u32,
    backlash_steps: u32,
    degrees_per_second: f64,
    last_direction: Option<Direction>,
    setup_failures: Vec<HardwareError>,
}

impl AxisDriver {
    /// Create a driver and configure its pins as outputs.
    ///
    /// Pin setup failures are logged; the axis stays usable but may not move.
    pub fn new(
        name: impl Into<String>,
        pins: Arc<dyn PinController>,
        axis_pins: AxisPins,
        steps_per_rotation: u32,
        backlash_steps: u32,
        degrees_per_second: f64,
    ) -> Self {
        let name = name.into();
        let mut setup_failures = Vec::new();
        for pin in [axis_pins.enable, axis_pins.direction, axis_pins.step] {
            if let Err(err) = configure_output(pins.as_ref(), pin) {
                tracing::warn!("Motor [{}] failed to config: {}", name, err);
                setup_failures.push(err);
            }
        }

        if setup_failures.is_empty() {
            tracing::info!(
                "Motor [{}] configured: stepPin={}, dirPin={}, enablePin={}, stepsPerRotation={}, backlashSteps={}",
                name,
                axis_pins.step,
                axis_pins.direction,
                axis_pins.enable,
                steps_per_rotation,
                backlash_steps
            );
        }

        Self {
            name,
            pins,
            axis_pins,
            steps_per_rotation,
            backlash_steps,
            degrees_per_second,
            last_direction: None,
            setup_failures,
        }
    }

    /// Pins that could not be put into output mode at construction
    pub fn setup_failures(&self) -> &[HardwareError] {
        &self.setup_failures
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn axis_pins(&self) -> AxisPins {
        self.axis_pins
    }

    pub fn steps_per_rotation(&self) -> u32 {
        self.steps_per_rotation
    }

    pub fn backlash_steps(&self) -> u32 {
        self.backlash_steps
    }

    pub fn degrees_per_second(&self) -> f64 {
        self.degrees_per_second
    }

    /// Rotate the knob by `degrees` (positive is forward).
    ///
    /// Zero rotations are skipped entirely. Backlash steps are added when the
    /// direction differs from the previous rotation; the first rotation never
    /// gets backlash.
    pub fn rotate(&mut self, degrees: f64) -> RotationReport {
        if degrees == 0.0 || !degrees.is_finite() {
            return RotationReport::default();
        }

        let direction = Direction::of(degrees);
        let backlash_steps = match self.last_direction {
            Some(last) if last != direction => self.backlash_steps,
            _ => 0,
        };
        let steps = (self.steps_per_rotation as f64 * degrees.abs() / 360.0) as u32 + backlash_steps;

        tracing::debug!(
            "Motor [{}] rotate: degrees={:.3}, steps={}, backlash={}, speed={:.2} deg/s",
            self.name,
            degrees,
            steps,
            backlash_steps,
            self.degrees_per_second
        );

        let steps_sent = self.drive(direction, steps);
        RotationReport {
            steps,
            backlash_steps,
            steps_sent,
        }
    }

    /// Step `backlash_steps` in `direction` without moving the drawing
    /// position, leaving the gears engaged for the next move that way.
    pub fn take_up_backlash(&mut self, direction: Direction) -> u32 {
        self.drive(direction, self.backlash_steps)
    }

    /// Per-transition delay for the configured speed
    pub fn pulse_delay_us(&self) -> u64 {
        let steps_per_second =
            (self.steps_per_rotation as f64 * self.degrees_per_second / 360.0) as u64;
        1_000_000 / steps_per_second.max(1) / 2
    }

    fn drive(&mut self, direction: Direction, steps: u32) -> u32 {
        self.write(self.axis_pins.enable, PinLevel::High);
        self.write(self.axis_pins.direction, direction.level());
        self.last_direction = Some(direction);

        let steps_sent = self.send_steps(steps);

        self.write(self.axis_pins.enable, PinLevel::Low);
        steps_sent
    }

    fn send_steps(&self, steps: u32) -> u32 {
        let delay_us = self.pulse_delay_us();
        let mut sent = 0;

        while sent < steps {
            let chunk = (steps - sent).min(MAX_STEPS_PER_TRAIN);
            let pulses: Vec<Pulse> = (0..chunk)
                .flat_map(|_| {
                    [
                        Pulse::new(PinLevel::High, delay_us),
                        Pulse::new(PinLevel::Low, delay_us),
                    ]
                })
                .collect();

            match self.pins.send_pulse_train(self.axis_pins.step, &pulses) {
                Some(handle) => {
                    self.pins.wait_for_completion(handle);
                    sent += chunk;
                }
                None => {
                    let err = HardwareError::PulseTrainRejected {
                        pin: self.axis_pins.step,
                    };
                    tracing::warn!(
                        "Motor [{}]: {}; abandoning {} of {} steps",
                        self.name,
                        err,
                        steps - sent,
                        steps
                    );
                    break;
                }
            }
        }
        sent
    }

    fn write(&self, pin: u32, level: PinLevel) {
        if !self.pins.write(pin, level) {
            let err = HardwareError::WriteFailed {
                pin,
                level: level.to_string(),
            };
            tracing::warn!("Motor [{}]: {}", self.name, err);
        }
    }
}

fn configure_output(pins: &dyn PinController, pin: u32) -> Result<(), HardwareError> {
    if pins.configure(pin, PinMode::Output) && pins.read_mode(pin) == Some(PinMode::Output) {
        Ok(())
    } else {
        Err(HardwareError::ModeFailed { pin })
    }
}
