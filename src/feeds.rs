use crate::sampler::SensorFeed;
use crate::types::{MotionSample, SensorEvent, SensorKind};
use crate::{ShResult, SteadyError};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// Stand-in for a human holding the device: seeded planar jitter,
/// mostly calm with periodic shake bursts. Emits one accelerometer and
/// one gyroscope event per delivery interval.
#[derive(Debug)]
pub struct SyntheticFeed {
    rng: fastrand::Rng,
    calm_noise: f32,
    shake_noise: f32,
    shake_period_ms: u64,
    shake_duration_ms: u64,
    interval_ms: u64,
    next_due_ms: u64,
    running: bool,
}

impl SyntheticFeed {
    pub fn new(
        seed: Option<u64>,
        calm_noise: f32,
        shake_noise: f32,
        shake_period_ms: u64,
        shake_duration_ms: u64,
    ) -> Self {
        let rng = match seed {
            Some(s) => fastrand::Rng::with_seed(s),
            None => fastrand::Rng::new(),
        };
        Self {
            rng,
            calm_noise,
            shake_noise,
            shake_period_ms,
            shake_duration_ms,
            interval_ms: 0,
            next_due_ms: 0,
            running: false,
        }
    }

    /// A feed that never shakes. Handy for demos and tests.
    pub fn rock_steady(seed: Option<u64>) -> Self {
        Self::new(seed, 0.05, 0.05, 0, 0)
    }

    fn in_shake(&self, at_ms: u64) -> bool {
        self.shake_period_ms > 0 && at_ms % self.shake_period_ms < self.shake_duration_ms
    }

    fn jitter(&mut self, amplitude: f32) -> MotionSample {
        let mut axis = || (self.rng.f32() * 2.0 - 1.0) * amplitude;
        MotionSample::new(axis(), axis(), axis())
    }
}

impl SensorFeed for SyntheticFeed {
    fn start(&mut self, interval_ms: u64) -> ShResult<()> {
        if interval_ms == 0 {
            return Err(SteadyError::Config(
                "sensor interval must be positive".to_string(),
            ));
        }
        self.interval_ms = interval_ms;
        self.next_due_ms = interval_ms;
        self.running = true;
        debug!(interval_ms, "synthetic feed started");
        Ok(())
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn poll(&mut self, now_ms: u64) -> Vec<SensorEvent> {
        let mut events = Vec::new();
        if !self.running {
            return events;
        }
        while self.next_due_ms <= now_ms {
            let at_ms = self.next_due_ms;
            let amplitude = if self.in_shake(at_ms) {
                self.shake_noise
            } else {
                self.calm_noise
            };
            let accel = self.jitter(amplitude);
            let gyro = self.jitter(amplitude);
            events.push(SensorEvent {
                at_ms,
                kind: SensorKind::Accelerometer,
                sample: accel,
            });
            events.push(SensorEvent {
                at_ms,
                kind: SensorKind::Gyroscope,
                sample: gyro,
            });
            self.next_due_ms += self.interval_ms;
        }
        events
    }
}

#[derive(Debug, Deserialize)]
struct ReplayRow {
    at_ms: u64,
    sensor: String,
    x: f32,
    y: f32,
    z: f32,
}

/// Deterministic playback of a recorded sensor trace.
///
/// CSV layout: `at_ms,sensor,x,y,z` with sensor one of `accelerometer`
/// or `gyroscope`. The trace carries its own timing, so the configured
/// delivery interval is not used; rows are replayed at their recorded
/// timestamps regardless of order on disk.
#[derive(Debug)]
pub struct ReplayFeed {
    events: Vec<SensorEvent>,
    cursor: usize,
    running: bool,
}

impl ReplayFeed {
    pub fn from_path(path: impl AsRef<Path>) -> ShResult<Self> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path)?;
        let mut events = Vec::new();
        for (i, row) in reader.deserialize::<ReplayRow>().enumerate() {
            let row = row?;
            let kind = SensorKind::from_str(row.sensor.trim()).map_err(|_| {
                SteadyError::Validation(format!(
                    "row {}: unknown sensor '{}' (expected accelerometer or gyroscope)",
                    i + 1,
                    row.sensor
                ))
            })?;
            events.push(SensorEvent {
                at_ms: row.at_ms,
                kind,
                sample: MotionSample::new(row.x, row.y, row.z),
            });
        }
        events.sort_by_key(|e| e.at_ms);
        info!("loaded {} replay events from {}", events.len(), path.display());
        Ok(Self {
            events,
            cursor: 0,
            running: false,
        })
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl SensorFeed for ReplayFeed {
    fn start(&mut self, _interval_ms: u64) -> ShResult<()> {
        self.running = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn poll(&mut self, now_ms: u64) -> Vec<SensorEvent> {
        let mut events = Vec::new();
        if !self.running {
            return events;
        }
        while self.cursor < self.events.len() && self.events[self.cursor].at_ms <= now_ms {
            events.push(self.events[self.cursor]);
            self.cursor += 1;
        }
        events
    }
}
