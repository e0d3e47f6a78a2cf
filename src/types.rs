use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// One raw reading from a motion sensor, in device axes.
///
/// Most-recent-wins: the sampler overwrites the previous sample on every
/// delivery and keeps no history. f32 is plenty for a threshold check.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MotionSample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl MotionSample {
    pub const ZERO: MotionSample = MotionSample {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// |x| + |y| — the quantity the stability rule thresholds.
    /// The z axis carries gravity (accelerometer) or roll (gyroscope)
    /// and is ignored, matching the scoring contract.
    pub fn planar_sum(&self) -> f32 {
        self.x.abs() + self.y.abs()
    }
}

/// The two independent sensor streams a round subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SensorKind {
    Accelerometer,
    Gyroscope,
}

/// One delivery from a sensor feed, stamped with logical milliseconds
/// since round start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorEvent {
    pub at_ms: u64,
    pub kind: SensorKind,
    pub sample: MotionSample,
}

/// Round lifecycle. `Ended` is terminal; a new round means a new
/// `Round` value, never a transition back to `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RoundPhase {
    Idle,
    Running,
    Ended,
}

/// Scores read back from the store. Absent means "never recorded",
/// which is distinct from zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub last_score: Option<u32>,
    pub high_score: Option<u32>,
}

/// The hand-off value carried from round end to the results display,
/// so results render without waiting on a store read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub score: u32,
    pub duration_secs: u32,
    /// True if the sensor feeds went silent at any point of the round.
    pub degraded: bool,
}
