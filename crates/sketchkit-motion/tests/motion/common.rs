use parking_lot::Mutex;
use sketchkit_motion::{PinController, PinLevel, PinMode, Pulse, PulseTrainHandle};
use std::collections::HashMap;

/// Everything a [`RecordingPins`] was asked to do
#[derive(Debug, Clone, PartialEq)]
pub enum PinEvent {
    Configure(u32, PinMode),
    Write(u32, PinLevel),
    PulseTrain { pin: u32, pulses: usize, delay_us: u64 },
    Wait(PulseTrainHandle),
}

/// Pin controller that records calls and can be told to fail
#[derive(Debug, Default)]
pub struct RecordingPins {
    events: Mutex<Vec<PinEvent>>,
    modes: Mutex<HashMap<u32, PinMode>>,
    /// Pulse trains accepted before every further one is rejected
    accept_trains: Mutex<Option<usize>>,
    fail_writes: Mutex<bool>,
    fail_configure: Mutex<Option<u32>>,
}

impl RecordingPins {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reject_trains_after(&self, accepted: usize) {
        *self.accept_trains.lock() = Some(accepted);
    }

    pub fn fail_writes(&self) {
        *self.fail_writes.lock() = true;
    }

    pub fn fail_configure(&self, pin: u32) {
        *self.fail_configure.lock() = Some(pin);
    }

    pub fn events(&self) -> Vec<PinEvent> {
        self.events.lock().clone()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    /// Sizes of every accepted pulse train, in pulses
    pub fn trains(&self) -> Vec<usize> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                PinEvent::PulseTrain { pulses, .. } => Some(pulses),
                _ => None,
            })
            .collect()
    }

    /// Levels written to `pin`, in order
    pub fn writes_to(&self, pin: u32) -> Vec<PinLevel> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                PinEvent::Write(p, level) if p == pin => Some(level),
                _ => None,
            })
            .collect()
    }
}

impl PinController for RecordingPins {
    fn configure(&self, pin: u32, mode: PinMode) -> bool {
        self.events.lock().push(PinEvent::Configure(pin, mode));
        if *self.fail_configure.lock() == Some(pin) {
            return false;
        }
        self.modes.lock().insert(pin, mode);
        true
    }

    fn write(&self, pin: u32, level: PinLevel) -> bool {
        self.events.lock().push(PinEvent::Write(pin, level));
        !*self.fail_writes.lock()
    }

    fn read_mode(&self, pin: u32) -> Option<PinMode> {
        self.modes.lock().get(&pin).copied()
    }

    fn send_pulse_train(&self, pin: u32, pulses: &[Pulse]) -> Option<PulseTrainHandle> {
        let mut accept = self.accept_trains.lock();
        if let Some(remaining) = accept.as_mut() {
            if *remaining == 0 {
                return None;
            }
            *remaining -= 1;
        }

        let mut events = self.events.lock();
        let id = events.len() as u64;
        events.push(PinEvent::PulseTrain {
            pin,
            pulses: pulses.len(),
            delay_us: pulses.first().map(|p| p.delay_us).unwrap_or(0),
        });
        Some(PulseTrainHandle(id))
    }

    fn wait_for_completion(&self, handle: PulseTrainHandle) {
        self.events.lock().push(PinEvent::Wait(handle));
    }
}
