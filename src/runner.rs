use crate::classifier::StabilityRule;
use crate::config::Config;
use crate::feedback::FeedbackSink;
use crate::round::{Round, RoundEffect, RoundEvent};
use crate::sampler::SensorFeed;
use crate::timer::Interval;
use crate::types::{RoundSummary, SensorEvent};
use crate::{ShResult, SteadyError};
use std::time::{Duration, Instant};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy)]
pub struct RunnerOptions {
    pub duration_secs: u32,
    pub tick_ms: u64,
    pub sensor_interval_ms: u64,
    pub rule: StabilityRule,
    pub silence_timeout_ms: u64,
}

impl From<&Config> for RunnerOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            duration_secs: cfg.game.duration_secs,
            tick_ms: cfg.game.tick_ms,
            sensor_interval_ms: cfg.game.sensor_interval_ms,
            rule: StabilityRule::new(cfg.game.stability_threshold),
            silence_timeout_ms: cfg.game.silence_timeout_ms,
        }
    }
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

/// Per-second progress hook, fired after each countdown tick.
pub trait RoundObserver {
    fn on_tick(&mut self, time_left: u32, score: u32, stable: bool) {
        let _ = (time_left, score, stable);
    }
}

/// Drives one round on a single logical-time event loop: polls the
/// sensor feeds, fires the scoring and countdown intervals in
/// timestamp order, and performs the round's effects (pulses, end).
///
/// Everything is serialized — feed deliveries, both 1 s timers, and
/// the end transition run on the caller's thread, so no locking and no
/// shared mutable state. Within one tick instant the scoring timer
/// fires before the countdown, so the final second is scored before
/// the round can end.
///
/// Teardown (natural completion, early `stop`, or drop) cancels both
/// intervals and stops both feed subscriptions; afterwards no pulse,
/// tick, or poll happens — a dangling timer writing into a dead round
/// is the failure mode this type exists to rule out.
pub struct RoundRunner {
    round: Round,
    score_timer: Interval,
    countdown: Interval,
    feeds: Vec<Box<dyn SensorFeed>>,
    feedback: Box<dyn FeedbackSink>,
    observer: Option<Box<dyn RoundObserver>>,
    opts: RunnerOptions,
    now_ms: u64,
    torn_down: bool,
    was_degraded: bool,
    summary: Option<RoundSummary>,
}

impl RoundRunner {
    /// Arms the round: subscribes every feed at the configured
    /// interval, then starts the state machine and both timers at
    /// logical zero. A feed that fails to attach is a startup failure
    /// of the whole round; feeds already started are released again.
    pub fn start(
        opts: RunnerOptions,
        mut feeds: Vec<Box<dyn SensorFeed>>,
        feedback: Box<dyn FeedbackSink>,
    ) -> ShResult<Self> {
        for i in 0..feeds.len() {
            if let Err(e) = feeds[i].start(opts.sensor_interval_ms) {
                for feed in feeds.iter_mut().take(i) {
                    feed.stop();
                }
                return Err(e);
            }
        }

        let mut round = Round::new(opts.duration_secs, opts.rule, opts.silence_timeout_ms);
        round.start();
        info!(
            duration_secs = opts.duration_secs,
            sensor_interval_ms = opts.sensor_interval_ms,
            "round armed"
        );

        Ok(Self {
            round,
            score_timer: Interval::starting_at(0, opts.tick_ms),
            countdown: Interval::starting_at(0, opts.tick_ms),
            feeds,
            feedback,
            observer: None,
            opts,
            now_ms: 0,
            torn_down: false,
            was_degraded: false,
            summary: None,
        })
    }

    pub fn with_observer(mut self, observer: Box<dyn RoundObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Advances logical time to `target_ms`, dispatching everything
    /// due on the way in timestamp order. Returns the round summary
    /// once the countdown has crossed zero.
    pub fn advance_to(&mut self, target_ms: u64) -> Option<RoundSummary> {
        while !self.torn_down {
            let due = match self.next_deadline_ms() {
                Some(t) if t <= target_ms => t,
                _ => break,
            };
            self.pump_sensors(due);
            self.check_degraded(due);

            // Score before countdown at the same instant.
            let score_fires = self.score_timer.fire_due(due);
            for _ in 0..score_fires {
                self.dispatch(RoundEvent::ScoreTick);
            }
            let countdown_fires = self.countdown.fire_due(due);
            for _ in 0..countdown_fires {
                self.dispatch(RoundEvent::CountdownTick);
            }

            if countdown_fires > 0 {
                if let Some(observer) = self.observer.as_mut() {
                    observer.on_tick(
                        self.round.time_left(),
                        self.round.score(),
                        self.round.is_stable(),
                    );
                }
            }
        }

        if !self.torn_down {
            self.pump_sensors(target_ms);
            self.check_degraded(target_ms);
        }
        self.now_ms = self.now_ms.max(target_ms);
        self.summary
    }

    /// Runs the round against the wall clock, sleeping between
    /// deadlines. Returns the final summary after the natural end.
    pub fn run_realtime(&mut self) -> ShResult<RoundSummary> {
        let epoch = Instant::now();
        loop {
            if let Some(summary) = self.summary {
                return Ok(summary);
            }
            let Some(next) = self.next_deadline_ms() else {
                return Err(SteadyError::Validation(
                    "round torn down before completion".to_string(),
                ));
            };
            let elapsed = epoch.elapsed().as_millis() as u64;
            if next > elapsed {
                std::thread::sleep(Duration::from_millis(next - elapsed));
            }
            let now = epoch.elapsed().as_millis() as u64;
            if let Some(summary) = self.advance_to(now) {
                return Ok(summary);
            }
        }
    }

    /// Early teardown: cancel both timers and release both feed
    /// subscriptions. Safe to call more than once; the round scores
    /// nothing further and never reaches `Ended`.
    pub fn stop(&mut self) {
        self.teardown();
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    fn next_deadline_ms(&self) -> Option<u64> {
        match (self.score_timer.next_fire_ms(), self.countdown.next_fire_ms()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (Some(a), None) => Some(a),
            (None, Some(b)) => Some(b),
            (None, None) => None,
        }
    }

    fn pump_sensors(&mut self, upto_ms: u64) {
        let mut batch: Vec<SensorEvent> = Vec::new();
        for feed in &mut self.feeds {
            batch.extend(feed.poll(upto_ms));
        }
        batch.sort_by_key(|e| e.at_ms);
        for ev in batch {
            self.dispatch(RoundEvent::Sensor(ev));
        }
    }

    fn check_degraded(&mut self, now_ms: u64) {
        if !self.was_degraded && self.round.is_degraded(now_ms) {
            self.was_degraded = true;
            warn!(
                now_ms,
                silence_timeout_ms = self.opts.silence_timeout_ms,
                "no sensor deliveries within the silence window; continuing degraded"
            );
        }
    }

    fn dispatch(&mut self, event: RoundEvent) {
        if self.torn_down {
            return;
        }
        for effect in self.round.handle(event) {
            match effect {
                RoundEffect::Pulse => self.feedback.pulse(),
                RoundEffect::Ended { final_score } => {
                    // Zero-crossing strictly precedes the store write,
                    // which the caller performs on the returned summary
                    // before showing results.
                    self.summary = Some(RoundSummary {
                        score: final_score,
                        duration_secs: self.opts.duration_secs,
                        degraded: self.was_degraded,
                    });
                    info!(final_score, degraded = self.was_degraded, "round complete");
                    self.teardown();
                }
            }
        }
    }

    fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.score_timer.cancel();
        self.countdown.cancel();
        for feed in &mut self.feeds {
            feed.stop();
        }
    }
}

impl Drop for RoundRunner {
    // Backstop only. Every exit path calls teardown explicitly.
    fn drop(&mut self) {
        self.teardown();
    }
}
