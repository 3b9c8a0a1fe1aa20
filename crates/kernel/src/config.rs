use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading a game configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Tunables for every moving entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Distance at or below which a destination counts as reached.
    pub stop_threshold: f32,
    /// Fraction of the remaining turn applied per second, capped at a full turn per tick.
    pub rotation_speed: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            stop_threshold: 0.15,
            rotation_speed: 10.0,
        }
    }
}

/// Fixed-angle isometric camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub alpha: f32,
    pub beta: f32,
    pub radius: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    /// Fraction of the gap to the player closed each frame.
    pub follow_lerp: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            alpha: -std::f32::consts::FRAC_PI_4,
            beta: std::f32::consts::FRAC_PI_4,
            radius: 30.0,
            min_radius: 10.0,
            max_radius: 60.0,
            follow_lerp: 0.05,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Name of the only surface clicks may target.
    pub ground_name: String,
    pub ground_size: f32,
    /// Seconds a dead monster lingers before it is disposed.
    pub monster_despawn_delay: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            ground_name: "world-ground".into(),
            ground_size: 50.0,
            monster_despawn_delay: 0.5,
        }
    }
}

/// Top-level configuration. Every section falls back to its defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub movement: MovementConfig,
    pub camera: CameraConfig,
    pub world: WorldConfig,
}

impl GameConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !non_negative(self.movement.stop_threshold) {
            return Err(ConfigError::Invalid {
                field: "movement.stop_threshold",
                reason: format!(
                    "{} is not a finite non-negative number",
                    self.movement.stop_threshold
                ),
            });
        }
        if !non_negative(self.movement.rotation_speed) {
            return Err(ConfigError::Invalid {
                field: "movement.rotation_speed",
                reason: format!(
                    "{} is not a finite non-negative number",
                    self.movement.rotation_speed
                ),
            });
        }
        if self.camera.min_radius > self.camera.max_radius {
            return Err(ConfigError::Invalid {
                field: "camera.min_radius",
                reason: format!(
                    "{} exceeds max_radius {}",
                    self.camera.min_radius, self.camera.max_radius
                ),
            });
        }
        Ok(())
    }
}

fn non_negative(v: f32) -> bool {
    v.is_finite() && v >= 0.0
}
