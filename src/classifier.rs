use crate::types::MotionSample;

/// Planar magnitude below which a sensor counts as still.
pub const DEFAULT_STABILITY_THRESHOLD: f32 = 0.3;

/// The stability rule: the device is stable iff BOTH feeds are quiet.
///
/// `stable = (|ax| + |ay| < threshold) && (|gx| + |gy| < threshold)`
///
/// The comparison is strict: a planar sum of exactly `threshold` is
/// unstable. The dual-sensor form is canonical here — an
/// accelerometer-only rule would ignore angular rate entirely, letting
/// a player spin the device on its z axis for free points.
///
/// Pure and stateless by contract: no hysteresis, no smoothing, so a
/// single noisy sample can flip the state. The scoring timer samples
/// the flag once per second, which bounds the damage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StabilityRule {
    pub threshold: f32,
}

impl Default for StabilityRule {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_STABILITY_THRESHOLD,
        }
    }
}

impl StabilityRule {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    pub fn classify(&self, accel: &MotionSample, gyro: &MotionSample) -> bool {
        accel.planar_sum() < self.threshold && gyro.planar_sum() < self.threshold
    }
}
