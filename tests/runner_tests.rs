use std::cell::Cell;
use std::rc::Rc;
use steadyhand::classifier::StabilityRule;
use steadyhand::feedback::FeedbackSink;
use steadyhand::runner::{RoundRunner, RunnerOptions};
use steadyhand::sampler::SensorFeed;
use steadyhand::types::{MotionSample, RoundPhase, SensorEvent, SensorKind};
use steadyhand::ShResult;
use steadyhand::SteadyError;

/// Shared spy counters for one scripted feed.
#[derive(Clone, Default)]
struct FeedProbe {
    starts: Rc<Cell<u32>>,
    stops: Rc<Cell<u32>>,
    polls: Rc<Cell<u32>>,
}

/// Test double: replays a fixed script of deliveries.
struct ScriptedFeed {
    probe: FeedProbe,
    events: Vec<SensorEvent>,
    cursor: usize,
    running: bool,
    fail_start: bool,
}

impl ScriptedFeed {
    fn new(probe: FeedProbe, events: Vec<SensorEvent>) -> Self {
        Self {
            probe,
            events,
            cursor: 0,
            running: false,
            fail_start: false,
        }
    }

    fn failing(probe: FeedProbe) -> Self {
        let mut feed = Self::new(probe, Vec::new());
        feed.fail_start = true;
        feed
    }
}

impl SensorFeed for ScriptedFeed {
    fn start(&mut self, _interval_ms: u64) -> ShResult<()> {
        self.probe.starts.set(self.probe.starts.get() + 1);
        if self.fail_start {
            return Err(SteadyError::Sensor("listener refused to attach".to_string()));
        }
        self.running = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.probe.stops.set(self.probe.stops.get() + 1);
        self.running = false;
    }

    fn poll(&mut self, now_ms: u64) -> Vec<SensorEvent> {
        self.probe.polls.set(self.probe.polls.get() + 1);
        let mut out = Vec::new();
        if !self.running {
            return out;
        }
        while self.cursor < self.events.len() && self.events[self.cursor].at_ms <= now_ms {
            out.push(self.events[self.cursor]);
            self.cursor += 1;
        }
        out
    }
}

#[derive(Clone, Default)]
struct CountingFeedback {
    pulses: Rc<Cell<u32>>,
}

impl FeedbackSink for CountingFeedback {
    fn pulse(&mut self) {
        self.pulses.set(self.pulses.get() + 1);
    }
}

fn quiet_script(kind: SensorKind, upto_ms: u64) -> Vec<SensorEvent> {
    (1..=upto_ms / 100)
        .map(|i| SensorEvent {
            at_ms: i * 100,
            kind,
            sample: MotionSample::ZERO,
        })
        .collect()
}

fn opts(duration_secs: u32) -> RunnerOptions {
    RunnerOptions {
        duration_secs,
        tick_ms: 1000,
        sensor_interval_ms: 100,
        rule: StabilityRule::default(),
        silence_timeout_ms: 2000,
    }
}

#[test]
fn test_steady_feeds_score_full_duration() {
    let accel_probe = FeedProbe::default();
    let gyro_probe = FeedProbe::default();
    let feedback = CountingFeedback::default();
    let pulses = feedback.pulses.clone();

    let feeds: Vec<Box<dyn SensorFeed>> = vec![
        Box::new(ScriptedFeed::new(
            accel_probe.clone(),
            quiet_script(SensorKind::Accelerometer, 3000),
        )),
        Box::new(ScriptedFeed::new(
            gyro_probe.clone(),
            quiet_script(SensorKind::Gyroscope, 3000),
        )),
    ];

    let mut runner = RoundRunner::start(opts(3), feeds, Box::new(feedback)).unwrap();
    let summary = runner.advance_to(3000).expect("round should complete");

    assert_eq!(summary.score, 3);
    assert_eq!(summary.duration_secs, 3);
    assert!(!summary.degraded);
    assert_eq!(pulses.get(), 3);
    assert_eq!(runner.round().phase(), RoundPhase::Ended);

    // Both subscriptions released exactly once at the natural end.
    assert_eq!(accel_probe.stops.get(), 1);
    assert_eq!(gyro_probe.stops.get(), 1);
}

#[test]
fn test_silent_feeds_complete_degraded_with_zero_score() {
    let feedback = CountingFeedback::default();
    let pulses = feedback.pulses.clone();
    let feeds: Vec<Box<dyn SensorFeed>> =
        vec![Box::new(ScriptedFeed::new(FeedProbe::default(), Vec::new()))];

    let mut runner = RoundRunner::start(opts(3), feeds, Box::new(feedback)).unwrap();
    let summary = runner.advance_to(10_000).expect("round should complete");

    assert_eq!(summary.score, 0);
    assert!(summary.degraded);
    assert_eq!(pulses.get(), 0);
}

#[test]
fn test_incremental_advance_matches_one_shot() {
    let feedback = CountingFeedback::default();
    let feeds: Vec<Box<dyn SensorFeed>> = vec![
        Box::new(ScriptedFeed::new(
            FeedProbe::default(),
            quiet_script(SensorKind::Accelerometer, 5000),
        )),
        Box::new(ScriptedFeed::new(
            FeedProbe::default(),
            quiet_script(SensorKind::Gyroscope, 5000),
        )),
    ];

    let mut runner = RoundRunner::start(opts(5), feeds, Box::new(feedback)).unwrap();
    assert!(runner.advance_to(1500).is_none());
    assert_eq!(runner.round().score(), 1);
    assert_eq!(runner.round().time_left(), 4);

    assert!(runner.advance_to(4999).is_none());
    let summary = runner.advance_to(5000).expect("final tick ends the round");
    assert_eq!(summary.score, 5);
}

#[test]
fn test_final_second_scores_before_round_ends() {
    // Score and countdown land on the same instant; the last stable
    // second must count.
    let feedback = CountingFeedback::default();
    let feeds: Vec<Box<dyn SensorFeed>> = vec![
        Box::new(ScriptedFeed::new(
            FeedProbe::default(),
            quiet_script(SensorKind::Accelerometer, 1000),
        )),
        Box::new(ScriptedFeed::new(
            FeedProbe::default(),
            quiet_script(SensorKind::Gyroscope, 1000),
        )),
    ];

    let mut runner = RoundRunner::start(opts(1), feeds, Box::new(feedback)).unwrap();
    let summary = runner.advance_to(1000).unwrap();
    assert_eq!(summary.score, 1);
}

#[test]
fn test_teardown_stops_timers_and_subscriptions() {
    let accel_probe = FeedProbe::default();
    let gyro_probe = FeedProbe::default();
    let feedback = CountingFeedback::default();
    let pulses = feedback.pulses.clone();

    let feeds: Vec<Box<dyn SensorFeed>> = vec![
        Box::new(ScriptedFeed::new(
            accel_probe.clone(),
            quiet_script(SensorKind::Accelerometer, 30_000),
        )),
        Box::new(ScriptedFeed::new(
            gyro_probe.clone(),
            quiet_script(SensorKind::Gyroscope, 30_000),
        )),
    ];

    let mut runner = RoundRunner::start(opts(30), feeds, Box::new(feedback)).unwrap();
    runner.advance_to(2500);
    assert_eq!(pulses.get(), 2);

    runner.stop();
    assert!(runner.is_torn_down());
    assert_eq!(accel_probe.stops.get(), 1);
    assert_eq!(gyro_probe.stops.get(), 1);

    // Nothing fires after teardown: no pulses, no polls, no end.
    let polls_at_stop = accel_probe.polls.get();
    assert!(runner.advance_to(60_000).is_none());
    assert_eq!(pulses.get(), 2);
    assert_eq!(accel_probe.polls.get(), polls_at_stop);
    assert_eq!(runner.round().phase(), RoundPhase::Running);

    // Dropping after an explicit stop does not release twice.
    drop(runner);
    assert_eq!(accel_probe.stops.get(), 1);
}

#[test]
fn test_drop_releases_subscriptions() {
    let probe = FeedProbe::default();
    let feeds: Vec<Box<dyn SensorFeed>> =
        vec![Box::new(ScriptedFeed::new(probe.clone(), Vec::new()))];
    let runner = RoundRunner::start(opts(30), feeds, Box::new(CountingFeedback::default())).unwrap();
    drop(runner);
    assert_eq!(probe.stops.get(), 1);
}

#[test]
fn test_completed_round_stays_completed() {
    let feedback = CountingFeedback::default();
    let pulses = feedback.pulses.clone();
    let feeds: Vec<Box<dyn SensorFeed>> = vec![
        Box::new(ScriptedFeed::new(
            FeedProbe::default(),
            quiet_script(SensorKind::Accelerometer, 2000),
        )),
        Box::new(ScriptedFeed::new(
            FeedProbe::default(),
            quiet_script(SensorKind::Gyroscope, 2000),
        )),
    ];

    let mut runner = RoundRunner::start(opts(2), feeds, Box::new(feedback)).unwrap();
    let first = runner.advance_to(2000).unwrap();
    let after = runner.advance_to(90_000).unwrap();
    assert_eq!(first, after);
    assert_eq!(pulses.get(), first.score);
}

#[test]
fn test_feed_startup_failure_fails_the_round_and_releases() {
    let good_probe = FeedProbe::default();
    let bad_probe = FeedProbe::default();
    let feeds: Vec<Box<dyn SensorFeed>> = vec![
        Box::new(ScriptedFeed::new(good_probe.clone(), Vec::new())),
        Box::new(ScriptedFeed::failing(bad_probe.clone())),
    ];

    let result = RoundRunner::start(opts(30), feeds, Box::new(CountingFeedback::default()));
    assert!(result.is_err());
    // The feed that did attach is released again.
    assert_eq!(good_probe.starts.get(), 1);
    assert_eq!(good_probe.stops.get(), 1);
    assert_eq!(bad_probe.starts.get(), 1);
}

#[test]
fn test_realtime_smoke() {
    // Fast ticks so the wall-clock path finishes in milliseconds.
    let options = RunnerOptions {
        duration_secs: 3,
        tick_ms: 5,
        sensor_interval_ms: 1,
        rule: StabilityRule::default(),
        silence_timeout_ms: 1000,
    };
    let mut runner = RoundRunner::start(
        options,
        Vec::new(),
        Box::new(CountingFeedback::default()),
    )
    .unwrap();
    let summary = runner.run_realtime().unwrap();
    assert_eq!(summary.score, 0); // no feeds: never stable
    assert_eq!(summary.duration_secs, 3);
}
