use serde::{Deserialize, Serialize};
use anyhow::{Result, anyhow};
use super::Validate;

/// Spawn cycles give up after this many rejected candidates.
pub const MAX_SPAWN_ATTEMPTS: u32 = 10;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TrafficConfig {
    #[serde(default)]
    pub speeds: SpeedRange,
    #[serde(default)]
    pub spawn: SpawnCadence,
    #[serde(default)]
    pub sprites: SpriteEdges,
    #[serde(default)]
    pub random: RandomConfig,
    #[serde(default)]
    pub performance: PerformanceConfig,
}

/// Pixels per second, drawn uniformly for each new enemy.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct SpeedRange {
    pub lower: f32,
    pub upper: f32,
}

impl Default for SpeedRange {
    fn default() -> Self {
        Self { lower: 200.0, upper: 500.0 }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct SpawnCadence {
    /// Average seconds between spawn cycles.
    pub mean_interval: f64,
    /// Fraction of `mean_interval` the countdown may deviate by. A variance of
    /// 1.0 yields countdowns anywhere between zero and twice the mean.
    pub variance: f64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_max_attempts() -> u32 {
    MAX_SPAWN_ATTEMPTS
}

impl Default for SpawnCadence {
    fn default() -> Self {
        Self {
            mean_interval: 0.3,
            variance: 0.5,
            max_attempts: MAX_SPAWN_ATTEMPTS,
        }
    }
}

/// Transparent margins of the sprites, in pixels. Enemies travel left to
/// right, so an enemy's lead edge is its right side and the player's trail
/// edge (relative to the enemy) is the player's left side.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct SpriteEdges {
    pub enemy_lead_edge: f32,
    pub enemy_trail_edge: f32,
    pub player_lead_edge: f32,
    pub player_trail_edge: f32,
    pub enemy_pixel_adjust: f32,
    pub player_pixel_adjust: f32,
}

impl Default for SpriteEdges {
    fn default() -> Self {
        Self {
            enemy_lead_edge: 5.0,
            enemy_trail_edge: 36.0,
            player_lead_edge: 29.0,
            player_trail_edge: 30.0,
            enemy_pixel_adjust: -20.0,
            player_pixel_adjust: -15.0,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RandomConfig {
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PerformanceConfig {
    pub timing_samples: u32,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self { timing_samples: 120 }
    }
}

impl Validate for TrafficConfig {
    fn validate(&self) -> Result<()> {
        let speeds = &self.speeds;
        if speeds.lower <= 0.0 {
            return Err(anyhow!("Lower speed bound must be positive, got {}", speeds.lower));
        }

        if speeds.lower > speeds.upper {
            return Err(anyhow!(
                "Lower speed bound {} exceeds upper bound {}",
                speeds.lower, speeds.upper
            ));
        }

        let spawn = &self.spawn;
        if spawn.mean_interval <= 0.0 {
            return Err(anyhow!("Mean spawn interval must be positive"));
        }

        if !(0.0..=1.0).contains(&spawn.variance) {
            return Err(anyhow!("Spawn variance must be in range [0, 1], got {}", spawn.variance));
        }

        if spawn.max_attempts == 0 {
            return Err(anyhow!("Max spawn attempts must be greater than zero"));
        }

        let sprites = &self.sprites;
        let edges = [
            sprites.enemy_lead_edge,
            sprites.enemy_trail_edge,
            sprites.player_lead_edge,
            sprites.player_trail_edge,
        ];
        if edges.iter().any(|edge| *edge < 0.0) {
            return Err(anyhow!("Sprite edge adjustments must be non-negative"));
        }

        if self.performance.timing_samples == 0 {
            return Err(anyhow!("Timing samples must be greater than zero"));
        }

        Ok(())
    }
}
