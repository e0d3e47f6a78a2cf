use crate::classifier::StabilityRule;
use crate::types::{MotionSample, SensorEvent, SensorKind};
use crate::ShResult;

/// A push-based sensor stream delivering `SensorEvent`s at a fixed
/// interval. Implementations: synthetic jitter, CSV replay, scripted
/// fixtures in tests.
///
/// Feeds are polled by the round runner on its single event loop; a
/// feed that produces faster than the loop consumes simply hands over
/// more events on the next poll, and only the newest reading of each
/// kind survives in the sampler (last-value-wins).
pub trait SensorFeed {
    /// Begins delivery at `interval_ms`. A feed that cannot attach
    /// reports a startup failure here; the round must not start.
    fn start(&mut self, interval_ms: u64) -> ShResult<()>;

    /// Stops delivery. Idempotent; a stopped feed returns nothing from
    /// `poll`. Must be called on every exit path — the runner does this
    /// in its teardown and again from `Drop` as a backstop.
    fn stop(&mut self);

    /// Drains deliveries due at or before `now_ms`, in timestamp order.
    fn poll(&mut self, now_ms: u64) -> Vec<SensorEvent>;
}

/// Latest-reading holder for the two sensor streams.
///
/// Each delivery overwrites the previous sample of its kind — no
/// buffering, no back-pressure. The stability flag is recomputed on
/// every ingest so the scoring timer can read it point-in-time.
#[derive(Debug, Clone)]
pub struct SensorSampler {
    rule: StabilityRule,
    accel: MotionSample,
    gyro: MotionSample,
    stable: bool,
    last_delivery_ms: Option<u64>,
    silence_timeout_ms: u64,
}

impl SensorSampler {
    pub fn new(rule: StabilityRule, silence_timeout_ms: u64) -> Self {
        Self {
            rule,
            accel: MotionSample::ZERO,
            gyro: MotionSample::ZERO,
            // Unstable until sensors prove otherwise; a round with no
            // deliveries scores zero rather than a free maximum.
            stable: false,
            last_delivery_ms: None,
            silence_timeout_ms,
        }
    }

    pub fn ingest(&mut self, event: &SensorEvent) {
        match event.kind {
            SensorKind::Accelerometer => self.accel = event.sample,
            SensorKind::Gyroscope => self.gyro = event.sample,
        }
        self.stable = self.rule.classify(&self.accel, &self.gyro);
        self.last_delivery_ms = Some(event.at_ms);
    }

    /// Point-in-time stability, as of the most recent delivery.
    pub fn is_stable(&self) -> bool {
        self.stable
    }

    /// True when no delivery has arrived within the silence window.
    /// Degraded-but-continuing: the round keeps running, the condition
    /// is surfaced so a dead sensor never fails silently.
    pub fn is_degraded(&self, now_ms: u64) -> bool {
        let last = self.last_delivery_ms.unwrap_or(0);
        now_ms.saturating_sub(last) >= self.silence_timeout_ms
    }

    pub fn latest(&self, kind: SensorKind) -> MotionSample {
        match kind {
            SensorKind::Accelerometer => self.accel,
            SensorKind::Gyroscope => self.gyro,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(at_ms: u64, kind: SensorKind, x: f32, y: f32) -> SensorEvent {
        SensorEvent {
            at_ms,
            kind,
            sample: MotionSample::new(x, y, 0.0),
        }
    }

    #[test]
    fn test_starts_unstable() {
        let s = SensorSampler::new(StabilityRule::default(), 2000);
        assert!(!s.is_stable());
    }

    #[test]
    fn test_last_value_wins() {
        let mut s = SensorSampler::new(StabilityRule::default(), 2000);
        s.ingest(&ev(100, SensorKind::Accelerometer, 5.0, 0.0));
        s.ingest(&ev(200, SensorKind::Accelerometer, 0.1, 0.0));
        s.ingest(&ev(200, SensorKind::Gyroscope, 0.0, 0.0));
        assert_eq!(s.latest(SensorKind::Accelerometer).x, 0.1);
        assert!(s.is_stable());
    }

    #[test]
    fn test_one_noisy_sample_flips_state() {
        let mut s = SensorSampler::new(StabilityRule::default(), 2000);
        s.ingest(&ev(100, SensorKind::Accelerometer, 0.0, 0.0));
        s.ingest(&ev(100, SensorKind::Gyroscope, 0.0, 0.0));
        assert!(s.is_stable());
        s.ingest(&ev(200, SensorKind::Gyroscope, 1.0, 1.0));
        assert!(!s.is_stable());
    }

    #[test]
    fn test_degraded_after_silence() {
        let mut s = SensorSampler::new(StabilityRule::default(), 2000);
        assert!(!s.is_degraded(1999));
        assert!(s.is_degraded(2000));
        s.ingest(&ev(2500, SensorKind::Accelerometer, 0.0, 0.0));
        assert!(!s.is_degraded(3000));
        assert!(s.is_degraded(4500));
    }
}
