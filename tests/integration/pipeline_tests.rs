//! Detector loop → channel → consumer, end to end.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use muonwatch::adapters::adc::{SimAnalog, SimLevels};
use muonwatch::adapters::delay::StdDelay;
use muonwatch::adapters::time::Esp32TimeAdapter;
use muonwatch::app::events::AppEvent;
use muonwatch::app::ports::EventSink;
use muonwatch::config::DetectorConfig;
use muonwatch::consumer::EventConsumer;
use muonwatch::events::EventChannel;
use muonwatch::sensors::SampleSource;
use muonwatch::sensors::sample::ChannelId;
use muonwatch::trigger::record::PulseKind;
use muonwatch::trigger::runner::DetectorLoop;

use super::mock_hw::{CountingDelay, RecordingSink, ScriptedAnalog, StepClock};

/// Long enough for a busy-polling thread to observe a level change.
const SETTLE: Duration = Duration::from_millis(50);

fn pulse(levels: &SimLevels) {
    levels.set(ChannelId::Primary, 2000);
    thread::sleep(SETTLE);
    levels.set(ChannelId::Primary, 0);
    thread::sleep(SETTLE);
}

#[test]
fn scripted_pulses_reach_the_sink() {
    let script = [0, 1500, 1200, 10, 0, 0, 1300, 5, 0, 1100, 950, 20];
    let source = SampleSource::new(ScriptedAnalog::new(&script, 1800), StepClock::new(0, 100));
    let mut lp = DetectorLoop::new(source, CountingDelay::default(), &DetectorConfig::default()).unwrap();

    let ch: EventChannel<8> = EventChannel::new();
    for _ in 0..script.len() {
        assert!(lp.poll_and_push(&ch).is_none());
    }
    assert_eq!(ch.len(), 3);

    let mut consumer = EventConsumer::new(&ch);
    let mut sink = RecordingSink::default();
    assert_eq!(consumer.service(&mut sink), 3);

    let pulses = sink.pulses();
    let seqs: Vec<u32> = pulses.iter().map(|r| r.sequence).collect();
    assert_eq!(seqs, vec![1, 2, 3]);
    assert!(pulses.iter().all(|r| r.kind == PulseKind::Complete));
    assert!(pulses.iter().all(|r| r.auxiliary_magnitude == 1800));

    let status = consumer.status(1000, 900, 60);
    assert_eq!(status.pulses, 3);
    assert_eq!(status.stuck, 0);
    assert!(status.rate_hz.is_some());
    assert!(status.to_json().unwrap().contains("\"pulses\":3"));
}

#[test]
fn concurrent_consumer_keeps_up() {
    let (analog, levels) = SimAnalog::new();
    levels.set(ChannelId::Auxiliary, 1234);
    let source = SampleSource::new(analog, Esp32TimeAdapter::new());
    let mut lp = DetectorLoop::new(source, StdDelay, &DetectorConfig::default()).unwrap();

    let ch: EventChannel<2> = EventChannel::new();
    let stop = AtomicBool::new(false);

    let sink = thread::scope(|s| {
        let detector = s.spawn(|| {
            while !stop.load(Ordering::SeqCst) {
                lp.poll_and_push(&ch);
            }
        });

        let consumer = s.spawn(|| {
            let mut consumer = EventConsumer::new(&ch);
            let mut sink = RecordingSink::default();
            while !stop.load(Ordering::SeqCst) || !ch.is_empty() {
                consumer.service(&mut sink);
                thread::sleep(Duration::from_millis(1));
            }
            sink
        });

        for _ in 0..4 {
            pulse(&levels);
        }
        stop.store(true, Ordering::SeqCst);
        detector.join().unwrap();
        consumer.join().unwrap()
    });

    let seqs: Vec<u32> = sink.pulses().iter().map(|r| r.sequence).collect();
    assert_eq!(seqs, vec![1, 2, 3, 4]);
    assert!(sink.pulses().iter().all(|r| r.auxiliary_magnitude == 1234));
}

/// A stalled consumer parks the detector; pulses during the stall are
/// never sampled and leave no trace.
#[test]
fn stalled_consumer_loses_pulses_silently() {
    let (analog, levels) = SimAnalog::new();
    let source = SampleSource::new(analog, Esp32TimeAdapter::new());
    let config = DetectorConfig::default();
    assert_eq!(config.push_timeout_ms, None);
    let mut lp = DetectorLoop::new(source, StdDelay, &config).unwrap();

    let ch: EventChannel<1> = EventChannel::new();
    let stop = AtomicBool::new(false);

    let lp = thread::scope(|s| {
        let detector = s.spawn(|| {
            while !stop.load(Ordering::SeqCst) {
                lp.poll_and_push(&ch);
            }
            lp
        });

        // A fills the channel, B parks the producer, C arrives while parked.
        pulse(&levels);
        assert!(ch.is_full());
        pulse(&levels);
        pulse(&levels);
        assert_eq!(ch.len(), 1);

        stop.store(true, Ordering::SeqCst);
        assert_eq!(ch.pop().map(|r| r.sequence), Some(1));
        detector.join().unwrap()
    });

    let rest: Vec<u32> = ch.drain().map(|r| r.sequence).collect();
    assert_eq!(rest, vec![2]);
    assert_eq!(lp.detector().pulse_count(), 2);
}

#[test]
fn started_event_carries_thresholds() {
    let mut sink = RecordingSink::default();
    let config = DetectorConfig::default();
    sink.emit(&AppEvent::Started {
        threshold: config.threshold,
        reset_threshold: config.reset_threshold,
    });
    assert!(matches!(
        sink.events.as_slice(),
        [AppEvent::Started {
            threshold: 1000,
            reset_threshold: 900
        }]
    ));
    assert!(sink.pulses().is_empty());
}
