//! GPIO pin control
//!
//! The axis drivers talk to the pins through [`PinController`]. Every call
//! reports success as a `bool`/`Option` rather than an error: a failed pin
//! write degrades the drawing but must never abort a job, so callers log and
//! continue.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Pin direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinMode {
    /// Pin is read
    Input,
    /// Pin is driven
    Output,
}

impl fmt::Display for PinMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinMode::Input => write!(f, "input"),
            PinMode::Output => write!(f, "output"),
        }
    }
}

/// Logic level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinLevel {
    Low,
    High,
}

impl PinLevel {
    /// `true` for [`PinLevel::High`]
    pub fn is_high(self) -> bool {
        self == PinLevel::High
    }
}

impl From<bool> for PinLevel {
    fn from(high: bool) -> Self {
        if high {
            PinLevel::High
        } else {
            PinLevel::Low
        }
    }
}

impl fmt::Display for PinLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinLevel::Low => write!(f, "LOW"),
            PinLevel::High => write!(f, "HIGH"),
        }
    }
}

/// One transition of a pulse train: drive `level`, then hold for `delay_us`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pulse {
    pub level: PinLevel,
    pub delay_us: u64,
}

impl Pulse {
    pub fn new(level: PinLevel, delay_us: u64) -> Self {
        Self { level, delay_us }
    }
}

/// Opaque id of a submitted pulse train
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PulseTrainHandle(pub u64);

/// Pin capability used by the axis drivers.
///
/// Implementations are shared between the plotter and diagnostics, so every
/// method takes `&self`.
pub trait PinController: Send + Sync + fmt::Debug {
    /// Put `pin` into `mode`. Returns `false` on failure.
    fn configure(&self, pin: u32, mode: PinMode) -> bool;

    /// Drive an output pin. Returns `false` on failure.
    fn write(&self, pin: u32, level: PinLevel) -> bool;

    /// Current mode of `pin`, `None` if unknown or unconfigured.
    fn read_mode(&self, pin: u32) -> Option<PinMode>;

    /// Hand a pulse train to the hardware. `None` if it was rejected.
    fn send_pulse_train(&self, pin: u32, pulses: &[Pulse]) -> Option<PulseTrainHandle>;

    /// Block until the pulse train has been fully emitted.
    fn wait_for_completion(&self, handle: PulseTrainHandle);
}

/// Pin controller that accepts every call and touches no hardware.
///
/// Used off-device; it remembers configured modes and written levels so the
/// diagnostics still report something meaningful.
#[derive(Debug, Default)]
pub struct NullPinController {
    modes: Mutex<HashMap<u32, PinMode>>,
    levels: Mutex<HashMap<u32, PinLevel>>,
    next_handle: AtomicU64,
}

impl NullPinController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last level written to `pin`
    pub fn level(&self, pin: u32) -> Option<PinLevel> {
        self.levels.lock().get(&pin).copied()
    }
}

impl PinController for NullPinController {
    fn configure(&self, pin: u32, mode: PinMode) -> bool {
        self.modes.lock().insert(pin, mode);
        true
    }

    fn write(&self, pin: u32, level: PinLevel) -> bool {
        self.levels.lock().insert(pin, level);
        true
    }

    fn read_mode(&self, pin: u32) -> Option<PinMode> {
        self.modes.lock().get(&pin).copied()
    }

    fn send_pulse_train(&self, pin: u32, pulses: &[Pulse]) -> Option<PulseTrainHandle> {
        if let Some(last) = pulses.last() {
            self.levels.lock().insert(pin, last.level);
        }
        Some(PulseTrainHandle(
            self.next_handle.fetch_add(1, Ordering::Relaxed),
        ))
    }

    fn wait_for_completion(&self, _handle: PulseTrainHandle) {}
}

#[cfg(feature = "hardware")]
pub use gpio::{GpiodPinController, DEFAULT_GPIO_CHIP};

#[cfg(feature = "hardware")]
mod gpio {
    use super::{PinController, PinLevel, PinMode, Pulse, PulseTrainHandle};
    use gpiod::{Chip, Input, Lines, Options, Output};
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::fmt;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;
    use std::thread::{self, JoinHandle};
    use std::time::Duration;

    /// Default GPIO character device on a Raspberry Pi
    pub const DEFAULT_GPIO_CHIP: &str = "gpiochip0";

    const CONSUMER: &str = "sketchkit";

    type SharedOutput = Arc<Mutex<Lines<Output>>>;

    /// Pin controller backed by the Linux GPIO character device.
    ///
    /// Pulse trains are software timed on a dedicated thread per train.
    pub struct GpiodPinController {
        chip_name: String,
        chip: Mutex<Chip>,
        outputs: Mutex<HashMap<u32, SharedOutput>>,
        inputs: Mutex<HashMap<u32, Lines<Input>>>,
        trains: Mutex<HashMap<u64, JoinHandle<bool>>>,
        next_handle: AtomicU64,
    }

    impl fmt::Debug for GpiodPinController {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("GpiodPinController")
                .field("chip", &self.chip_name)
                .field("outputs", &self.outputs.lock().keys().collect::<Vec<_>>())
                .finish()
        }
    }

    impl GpiodPinController {
        /// Open a GPIO chip, e.g. `gpiochip0`
        pub fn open(chip_name: &str) -> std::io::Result<Self> {
            let chip = Chip::new(chip_name)?;
            tracing::info!("Opened GPIO chip '{}'", chip_name);
            Ok(Self {
                chip_name: chip_name.to_string(),
                chip: Mutex::new(chip),
                outputs: Mutex::new(HashMap::new()),
                inputs: Mutex::new(HashMap::new()),
                trains: Mutex::new(HashMap::new()),
                next_handle: AtomicU64::new(0),
            })
        }

        /// Open [`DEFAULT_GPIO_CHIP`]
        pub fn open_default() -> std::io::Result<Self> {
            Self::open(DEFAULT_GPIO_CHIP)
        }

        fn output(&self, pin: u32) -> Option<SharedOutput> {
            self.outputs.lock().get(&pin).cloned()
        }
    }

    fn drive(lines: &Mutex<Lines<Output>>, level: PinLevel) -> bool {
        lines.lock().set_values([level.is_high()]).is_ok()
    }

    impl PinController for GpiodPinController {
        fn configure(&self, pin: u32, mode: PinMode) -> bool {
            // A line can only be requested once; drop any previous request.
            self.outputs.lock().remove(&pin);
            self.inputs.lock().remove(&pin);

            let chip = self.chip.lock();
            let result = match mode {
                PinMode::Output => chip
                    .request_lines(Options::output([pin]).values([false]).consumer(CONSUMER))
                    .map(|lines| {
                        self.outputs.lock().insert(pin, Arc::new(Mutex::new(lines)));
                    }),
                PinMode::Input => chip
                    .request_lines(Options::input([pin]).consumer(CONSUMER))
                    .map(|lines| {
                        self.inputs.lock().insert(pin, lines);
                    }),
            };

            if let Err(e) = &result {
                tracing::warn!("Failed to request GPIO line {} as {}: {}", pin, mode, e);
            }
            result.is_ok()
        }

        fn write(&self, pin: u32, level: PinLevel) -> bool {
            match self.output(pin) {
                Some(lines) => drive(&lines, level),
                None => false,
            }
        }

        fn read_mode(&self, pin: u32) -> Option<PinMode> {
            if self.outputs.lock().contains_key(&pin) {
                Some(PinMode::Output)
            } else if self.inputs.lock().contains_key(&pin) {
                Some(PinMode::Input)
            } else {
                None
            }
        }

        fn send_pulse_train(&self, pin: u32, pulses: &[Pulse]) -> Option<PulseTrainHandle> {
            let lines = self.output(pin)?;
            let pulses = pulses.to_vec();
            let id = self.next_handle.fetch_add(1, Ordering::Relaxed);

            let handle = thread::Builder::new()
                .name(format!("pulse-{}", pin))
                .spawn(move || {
                    for pulse in pulses {
                        if !drive(&lines, pulse.level) {
                            return false;
                        }
                        thread::sleep(Duration::from_micros(pulse.delay_us));
                    }
                    true
                })
                .ok()?;

            self.trains.lock().insert(id, handle);
            Some(PulseTrainHandle(id))
        }

        fn wait_for_completion(&self, handle: PulseTrainHandle) {
            let train = self.trains.lock().remove(&handle.0);
            if let Some(train) = train {
                match train.join() {
                    Ok(true) => {}
                    Ok(false) => tracing::warn!("Pulse train {} stopped on a failed write", handle.0),
                    Err(_) => tracing::warn!("Pulse train {} thread panicked", handle.0),
                }
            }
        }
    }
}
