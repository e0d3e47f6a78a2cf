use crate::classifier::StabilityRule;
use crate::sampler::SensorSampler;
use crate::types::{RoundPhase, RoundSummary, SensorEvent};
use tracing::debug;

/// Everything that can happen to a running round, serialized on one
/// event loop. Sensor deliveries arrive at ~100 ms cadence, the two
/// ticks at 1 s — deliberately decoupled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RoundEvent {
    Sensor(SensorEvent),
    ScoreTick,
    CountdownTick,
}

/// Side effects a round asks its driver to perform. The round itself
/// stays pure state; pulses and persistence live at the edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundEffect {
    /// One-shot haptic/feedback pulse for a scored second.
    Pulse,
    /// The countdown crossed zero. Emitted exactly once per round.
    Ended { final_score: u32 },
}

/// The round state machine: `Idle → Running → Ended`.
///
/// Scoring samples the stability flag at tick time — a full second of
/// stillness is exactly one point regardless of how many sensor
/// deliveries landed in between, and a stable instant at the tick
/// scores even if the rest of the second was shaky.
///
/// `Ended` is terminal and idempotent: the phase guard makes raced or
/// duplicated countdown events no-ops, so the end transition (and the
/// save/navigation that follows it) fires at most once.
#[derive(Debug, Clone)]
pub struct Round {
    phase: RoundPhase,
    score: u32,
    time_left: u32,
    duration_secs: u32,
    sampler: SensorSampler,
}

impl Round {
    pub fn new(duration_secs: u32, rule: StabilityRule, silence_timeout_ms: u64) -> Self {
        Self {
            phase: RoundPhase::Idle,
            score: 0,
            time_left: duration_secs,
            duration_secs,
            sampler: SensorSampler::new(rule, silence_timeout_ms),
        }
    }

    /// Arms the round. Only meaningful from `Idle`.
    pub fn start(&mut self) {
        if self.phase == RoundPhase::Idle {
            self.phase = RoundPhase::Running;
            debug!(duration_secs = self.duration_secs, "round started");
        }
    }

    /// Feeds one event through the machine, returning the effects the
    /// driver must perform. Events outside `Running` are ignored.
    pub fn handle(&mut self, event: RoundEvent) -> Vec<RoundEffect> {
        let mut effects = Vec::new();
        if self.phase != RoundPhase::Running {
            return effects;
        }

        match event {
            RoundEvent::Sensor(ev) => {
                self.sampler.ingest(&ev);
            }
            RoundEvent::ScoreTick => {
                if self.sampler.is_stable() {
                    self.score += 1;
                    effects.push(RoundEffect::Pulse);
                }
            }
            RoundEvent::CountdownTick => {
                if self.time_left > 0 {
                    self.time_left -= 1;
                    if self.time_left == 0 {
                        self.phase = RoundPhase::Ended;
                        debug!(final_score = self.score, "round ended");
                        effects.push(RoundEffect::Ended {
                            final_score: self.score,
                        });
                    }
                }
            }
        }
        effects
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn is_stable(&self) -> bool {
        self.sampler.is_stable()
    }

    pub fn is_degraded(&self, now_ms: u64) -> bool {
        self.sampler.is_degraded(now_ms)
    }

    /// The hand-off value, available once the round has ended.
    pub fn summary(&self, degraded: bool) -> Option<RoundSummary> {
        if self.phase != RoundPhase::Ended {
            return None;
        }
        Some(RoundSummary {
            score: self.score,
            duration_secs: self.duration_secs,
            degraded,
        })
    }
}
