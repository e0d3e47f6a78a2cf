use crate::classifier::DEFAULT_STABILITY_THRESHOLD;
use crate::{ShResult, SteadyError};
use clap::Args;
use serde::{Deserialize, Serialize};

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[command(flatten)]
    pub game: GameParams,
    #[command(flatten)]
    pub feed: FeedParams,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameParams {
    /// Round length in seconds.
    #[arg(long, default_value_t = 30)]
    pub duration_secs: u32,

    /// Cadence of the scoring and countdown timers. The scoring
    /// contract assumes one second; changing it mostly exists for
    /// fast-forwarded demos.
    #[arg(long, default_value_t = 1000)]
    pub tick_ms: u64,

    /// Sensor delivery interval, decoupled from the tick cadence.
    #[arg(long, default_value_t = 100)]
    pub sensor_interval_ms: u64,

    /// Planar-sum threshold below which the device counts as still.
    #[arg(long, default_value_t = DEFAULT_STABILITY_THRESHOLD)]
    pub stability_threshold: f32,

    /// Silence window after which the feeds count as degraded.
    #[arg(long, default_value_t = 2000)]
    pub silence_timeout_ms: u64,
}

impl Default for GameParams {
    fn default() -> Self {
        Self {
            duration_secs: 30,
            tick_ms: 1000,
            sensor_interval_ms: 100,
            stability_threshold: DEFAULT_STABILITY_THRESHOLD,
            silence_timeout_ms: 2000,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedParams {
    /// Replay a recorded CSV trace (at_ms,sensor,x,y,z) instead of the
    /// synthetic feed.
    #[arg(long)]
    pub replay: Option<String>,

    /// RNG seed for the synthetic feed. Omit for a fresh round.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Jitter amplitude while calm.
    #[arg(long, default_value_t = 0.08)]
    pub calm_noise: f32,

    /// Jitter amplitude during a shake burst.
    #[arg(long, default_value_t = 0.9)]
    pub shake_noise: f32,

    /// Seconds between shake bursts. 0 disables shaking.
    #[arg(long, default_value_t = 10)]
    pub shake_period_secs: u64,

    /// Length of each shake burst in seconds.
    #[arg(long, default_value_t = 2)]
    pub shake_secs: u64,
}

impl Default for FeedParams {
    fn default() -> Self {
        Self {
            replay: None,
            seed: None,
            calm_noise: 0.08,
            shake_noise: 0.9,
            shake_period_secs: 10,
            shake_secs: 2,
        }
    }
}

impl Config {
    pub fn validate(&self) -> ShResult<()> {
        if self.game.duration_secs == 0 {
            return Err(SteadyError::Validation(
                "duration_secs must be at least 1".to_string(),
            ));
        }
        if self.game.tick_ms == 0 {
            return Err(SteadyError::Validation(
                "tick_ms must be positive".to_string(),
            ));
        }
        if self.game.sensor_interval_ms == 0 {
            return Err(SteadyError::Validation(
                "sensor_interval_ms must be positive".to_string(),
            ));
        }
        if !(self.game.stability_threshold > 0.0) {
            return Err(SteadyError::Validation(
                "stability_threshold must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
