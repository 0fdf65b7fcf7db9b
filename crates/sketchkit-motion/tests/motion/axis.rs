use crate::common::{PinEvent, RecordingPins};
use proptest::prelude::*;
use sketchkit_core::HardwareError;
use sketchkit_motion::{AxisDriver, AxisPins, PinLevel, PinMode, MAX_STEPS_PER_TRAIN};
use std::sync::Arc;

const PINS: AxisPins = AxisPins {
    step: 27,
    direction: 17,
    enable: 22,
};

fn axis(pins: &Arc<RecordingPins>, backlash_steps: u32) -> AxisDriver {
    AxisDriver::new("x-motor", pins.clone(), PINS, 3200, backlash_steps, 760.0)
}

#[test]
fn test_pins_configured_as_outputs() {
    let pins = Arc::new(RecordingPins::new());
    let _axis = axis(&pins, 0);
    assert_eq!(
        pins.events(),
        vec![
            PinEvent::Configure(22, PinMode::Output),
            PinEvent::Configure(17, PinMode::Output),
            PinEvent::Configure(27, PinMode::Output),
        ]
    );
}

#[test]
fn test_quarter_turn_pin_sequence() {
    let pins = Arc::new(RecordingPins::new());
    let mut axis = axis(&pins, 84);
    pins.clear();

    let report = axis.rotate(90.0);
    assert_eq!(report.steps, 800);
    assert_eq!(report.backlash_steps, 0);

    let events = pins.events();
    assert_eq!(events[0], PinEvent::Write(22, PinLevel::High));
    assert_eq!(events[1], PinEvent::Write(17, PinLevel::High));
    assert!(matches!(
        events[2],
        PinEvent::PulseTrain { pin: 27, pulses: 1600, .. }
    ));
    assert!(matches!(events[3], PinEvent::Wait(_)));
    assert_eq!(events[4], PinEvent::Write(22, PinLevel::Low));
    assert_eq!(events.len(), 5);
}

#[test]
fn test_negative_rotation_drives_direction_low() {
    let pins = Arc::new(RecordingPins::new());
    let mut axis = axis(&pins, 0);
    axis.rotate(-45.0);
    assert_eq!(pins.writes_to(17), vec![PinLevel::Low]);
}

#[test]
fn test_pulse_delay_from_speed() {
    let pins = Arc::new(RecordingPins::new());
    let mut axis = axis(&pins, 0);
    pins.clear();
    axis.rotate(1.0);
    // 3200 * 760 / 360 = 6755 steps/s -> 1e6 / 6755 / 2 = 74 us
    assert!(pins
        .events()
        .iter()
        .any(|e| matches!(e, PinEvent::PulseTrain { delay_us: 74, .. })));
}

#[test]
fn test_long_rotation_is_chunked() {
    let pins = Arc::new(RecordingPins::new());
    let mut axis = axis(&pins, 0);
    // 540 degrees = 4800 steps -> 2000 + 2000 + 800
    let report = axis.rotate(540.0);
    assert_eq!(report.steps, 4800);
    assert_eq!(report.steps_sent, 4800);
    assert_eq!(pins.trains(), vec![4000, 4000, 1600]);
}

#[test]
fn test_rejected_chunk_abandons_rest() {
    let pins = Arc::new(RecordingPins::new());
    let mut axis = axis(&pins, 0);
    pins.reject_trains_after(1);

    let report = axis.rotate(540.0);
    assert_eq!(report.steps, 4800);
    assert_eq!(report.steps_sent, MAX_STEPS_PER_TRAIN);
    assert_eq!(pins.trains().len(), 1);
    // Enable is still released.
    assert_eq!(pins.writes_to(22).last(), Some(&PinLevel::Low));
}

#[test]
fn test_write_failures_do_not_stop_rotation() {
    let pins = Arc::new(RecordingPins::new());
    let mut axis = axis(&pins, 0);
    pins.fail_writes();
    assert_eq!(axis.rotate(90.0).steps_sent, 800);
}

#[test]
fn test_configure_failure_still_builds_axis() {
    let pins = Arc::new(RecordingPins::new());
    pins.fail_configure(17);
    let mut axis = axis(&pins, 0);
    assert_eq!(axis.setup_failures(), &[HardwareError::ModeFailed { pin: 17 }]);
    assert_eq!(axis.rotate(90.0).steps, 800);
}

#[test]
fn test_clean_setup_has_no_failures() {
    let pins = Arc::new(RecordingPins::new());
    assert!(axis(&pins, 0).setup_failures().is_empty());
}

proptest! {
    #[test]
    fn prop_backlash_only_on_reversal(moves in proptest::collection::vec(-720.0f64..720.0, 1..20)) {
        let pins = Arc::new(RecordingPins::new());
        let mut axis = axis(&pins, 50);
        let mut last: Option<bool> = None;
        for degrees in moves {
            let report = axis.rotate(degrees);
            if degrees == 0.0 {
                prop_assert_eq!(report.steps, 0);
                continue;
            }
            let forward = degrees > 0.0;
            let expected = match last {
                Some(prev) if prev != forward => 50,
                _ => 0,
            };
            prop_assert_eq!(report.backlash_steps, expected);
            prop_assert_eq!(
                report.steps,
                (3200.0 * degrees.abs() / 360.0) as u32 + expected
            );
            last = Some(forward);
        }
    }
}
