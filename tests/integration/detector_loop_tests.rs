//! DetectorLoop against a scripted front end and stepping clock.

use std::time::Duration;

use muonwatch::config::DetectorConfig;
use muonwatch::error::ConfigError;
use muonwatch::events::EventChannel;
use muonwatch::sensors::SampleSource;
use muonwatch::sensors::sample::{ChannelId, Timestamp};
use muonwatch::trigger::TriggerState;
use muonwatch::trigger::record::{EventRecord, PulseKind};
use muonwatch::trigger::runner::DetectorLoop;

use super::mock_hw::{CountingDelay, ScriptedAnalog, StepClock};

const STEP_US: u64 = 10;

fn config() -> DetectorConfig {
    DetectorConfig {
        threshold: 1000,
        reset_threshold: 900,
        ..DetectorConfig::default()
    }
}

fn detector_loop(
    script: &[u16],
    cfg: &DetectorConfig,
) -> DetectorLoop<ScriptedAnalog, StepClock, CountingDelay> {
    let source = SampleSource::new(ScriptedAnalog::new(script, 2048), StepClock::new(0, STEP_US));
    DetectorLoop::new(source, CountingDelay::default(), cfg).unwrap()
}

/// Poll `n` times, collecting every completed record.
fn poll_n<A, C, D>(lp: &mut DetectorLoop<A, C, D>, n: usize) -> Vec<EventRecord>
where
    A: muonwatch::app::ports::AnalogPort,
    C: muonwatch::app::ports::ClockPort,
    D: embedded_hal::delay::DelayNs,
{
    (0..n).filter_map(|_| lp.poll()).collect()
}

#[test]
fn quiet_signal_emits_nothing() {
    let mut lp = detector_loop(&[0, 500, 999, 1000, 1000, 3], &config());
    let records = poll_n(&mut lp, 50);
    assert!(records.is_empty());
    assert_eq!(lp.detector().state(), TriggerState::Idle);
    assert_eq!(lp.detector().pulse_count(), 0);
}

#[test]
fn one_pulse_timed_from_crossing_to_decay() {
    // Reading i is stamped i * STEP_US.
    //   idx: 0    1    2     3    4     5    6    7 (aux)
    let mut lp = detector_loop(&[100, 200, 1200, 950, 1100, 950, 850], &config());
    let records = poll_n(&mut lp, 10);

    assert_eq!(records.len(), 1, "hysteresis must hold inside the band");
    let r = &records[0];
    assert_eq!(r.sequence, 1);
    assert_eq!(r.kind, PulseKind::Complete);
    assert_eq!(r.trigger_magnitude, 1200);
    assert_eq!(r.settle_magnitude, 850);
    assert_eq!(r.peak_magnitude, 1200);
    assert_eq!(r.auxiliary_magnitude, 2048);
    assert_eq!(r.trigger_time, Timestamp::from_micros(2 * STEP_US));
    assert_eq!(r.duration_above_reset, Duration::from_micros(4 * STEP_US));
}

#[test]
fn auxiliary_read_once_after_pulse() {
    let mut lp = detector_loop(&[1500, 1400, 1300, 10], &config());
    let records = poll_n(&mut lp, 3);
    assert_eq!(records.len(), 1);
    // Primary selected on first read, auxiliary once after the decay,
    // primary again on the next poll.
    assert_eq!(
        lp.source().analog().selects,
        vec![ChannelId::Primary, ChannelId::Auxiliary, ChannelId::Primary]
    );
}

#[test]
fn above_state_polls_are_delayed() {
    let cfg = DetectorConfig {
        poll_delay_us: 3,
        ..config()
    };
    let mut lp = detector_loop(&[1500, 1400, 1300, 10], &cfg);
    let _ = lp.poll();
    // Three Above-state polls after the crossing, each preceded by a delay.
    assert_eq!(lp.delay().calls, 3);
    assert_eq!(lp.delay().total_ns, 3 * 3_000);
}

#[test]
fn consecutive_pulses_are_sequenced() {
    let mut lp = detector_loop(&[1500, 10, 0, 0, 1600, 20], &config());
    let records = poll_n(&mut lp, 10);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].sequence, 1);
    assert_eq!(records[1].sequence, 2);
    assert_eq!(records[0].since_previous, None);
    // Crossings at readings 0 and 5; reading 2 is the auxiliary conversion.
    assert_eq!(records[1].since_previous, Some(Duration::from_micros(5 * STEP_US)));
}

#[test]
fn stuck_high_escape() {
    let cfg = DetectorConfig {
        max_pulse_us: Some(100),
        ..config()
    };
    let source = SampleSource::new(
        ScriptedAnalog::new(&[], 2048).with_rest_level(4000),
        StepClock::new(0, STEP_US),
    );
    let mut lp = DetectorLoop::new(source, CountingDelay::default(), &cfg).unwrap();

    let r = lp.poll().expect("stuck escape must end the spin");
    assert_eq!(r.kind, PulseKind::Stuck);
    assert_eq!(r.duration_above_reset, Duration::from_micros(100));
    assert_eq!(r.settle_magnitude, 4000);
    assert_eq!(lp.detector().stuck_count(), 1);
    assert_eq!(lp.detector().state(), TriggerState::Idle);
}

#[test]
fn invalid_band_constructs_no_loop() {
    let cfg = DetectorConfig {
        threshold: 900,
        reset_threshold: 950,
        ..DetectorConfig::default()
    };
    let source = SampleSource::new(ScriptedAnalog::new(&[], 0), StepClock::new(0, 1));
    let r = DetectorLoop::new(source, CountingDelay::default(), &cfg);
    assert!(matches!(
        r.err(),
        Some(ConfigError::ResetNotBelowThreshold {
            threshold: 900,
            reset_threshold: 950
        })
    ));
}

#[test]
fn bounded_push_drops_when_full() {
    let cfg = DetectorConfig {
        push_timeout_ms: Some(10),
        ..config()
    };
    let mut lp = detector_loop(&[1500, 10, 1500, 10], &cfg);
    let ch: EventChannel<1> = EventChannel::new();

    assert!(lp.poll_and_push(&ch).is_none());
    assert_eq!(ch.len(), 1);

    let dropped = lp.poll_and_push(&ch).expect("second record should be dropped");
    assert_eq!(dropped.sequence, 2);
    assert_eq!(ch.pop().map(|r| r.sequence), Some(1));
    assert!(ch.is_empty());
}
