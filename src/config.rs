use std::path::Path;
use std::time::Duration;

use nalgebra::Vector3;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::constraints::ConstraintParams;
use crate::geodetic::{Boresight, IntersectionStrategy};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tracker: TrackerSettings,
    pub constraints: ConstraintParams,
    pub ground_track: GroundTrackSettings,
    pub simulator: SimulatorSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrackerSettings {
    /// Star tracker boresight in the ephemeris frame.
    pub boresight: [f64; 3],
    /// Slew rate assigned to the last sample of every pass, deg/s.
    pub terminal_slew_rate: f64,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            boresight: [1.0, 0.0, 0.0],
            terminal_slew_rate: 0.0,
        }
    }
}

impl TrackerSettings {
    pub fn boresight(&self) -> Vector3<f64> {
        Vector3::from(self.boresight)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum BoresightKeyword {
    Nadir,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
enum BoresightSetting {
    Keyword(BoresightKeyword),
    Vector([f64; 3]),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GroundTrackSettings {
    #[serde(deserialize_with = "humantime_duration")]
    pub sample_period: Duration,
    #[serde(deserialize_with = "boresight_setting")]
    pub boresight: Boresight,
    pub strategy: IntersectionStrategy,
}

impl Default for GroundTrackSettings {
    fn default() -> Self {
        Self {
            sample_period: Duration::from_millis(16),
            boresight: Boresight::Nadir,
            strategy: IntersectionStrategy::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulatorSettings {
    pub base_url: String,
    #[serde(deserialize_with = "humantime_duration")]
    pub poll_interval: Duration,
    #[serde(deserialize_with = "humantime_duration")]
    pub settle_delay: Duration,
    #[serde(deserialize_with = "humantime_duration")]
    pub timeout: Duration,
}

impl Default for SimulatorSettings {
    fn default() -> Self {
        Self {
            base_url: "https://testingtyf.tensortech.co".to_string(),
            poll_interval: Duration::from_secs(1),
            settle_delay: Duration::from_secs(5),
            timeout: Duration::from_secs(30 * 60),
        }
    }
}

fn humantime_duration<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    let text = String::deserialize(deserializer)?;
    humantime::parse_duration(text.trim()).map_err(serde::de::Error::custom)
}

fn boresight_setting<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Boresight, D::Error> {
    Ok(match BoresightSetting::deserialize(deserializer)? {
        BoresightSetting::Keyword(BoresightKeyword::Nadir) => Boresight::Nadir,
        BoresightSetting::Vector(v) => Boresight::Fixed(Vector3::from(v)),
    })
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if Vector3::from(self.tracker.boresight).norm() == 0.0 {
            return Err(ConfigError::Invalid("tracker.boresight is the zero vector".into()));
        }
        if let Boresight::Fixed(v) = self.ground_track.boresight {
            if v.norm() == 0.0 {
                return Err(ConfigError::Invalid("ground_track.boresight is the zero vector".into()));
            }
        }
        if self.ground_track.sample_period.is_zero() {
            return Err(ConfigError::Invalid("ground_track.sample_period must be positive".into()));
        }
        if let IntersectionStrategy::Marching {
            tolerance_m,
            max_distance_m,
        } = self.ground_track.strategy
        {
            if tolerance_m <= 0.0 || max_distance_m <= 0.0 {
                return Err(ConfigError::Invalid(
                    "marching tolerance and distance must be positive".into(),
                ));
            }
        }
        Ok(())
    }
}
