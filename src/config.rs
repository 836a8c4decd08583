//! Deployment configuration for a counting pipeline.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::counting::{BandPolicy, CountingPolicy, LinePolicy};
use crate::error::ConfigError;
use crate::integration::SchedulerConfig;
use crate::tracker::TrackerConfig;

/// Which crossing rule to count with. Unset thresholds are derived from the
/// frame height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PolicyConfig {
    /// Exit band, default `height - 100 ..= height - 20`.
    Band {
        #[serde(default)]
        zone_top: Option<i32>,
        #[serde(default)]
        zone_bottom: Option<i32>,
    },
    /// Entry/exit line, default `height / 2`.
    Line {
        #[serde(default)]
        line_y: Option<i32>,
    },
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self::Band {
            zone_top: None,
            zone_bottom: None,
        }
    }
}

impl PolicyConfig {
    pub fn band() -> Self {
        Self::default()
    }

    pub fn line() -> Self {
        Self::Line { line_y: None }
    }

    /// Resolve thresholds against `frame_height` and build the policy.
    pub fn build(&self, frame_height: u32) -> Result<CountingPolicy, ConfigError> {
        let policy: CountingPolicy = match *self {
            Self::Band {
                zone_top,
                zone_bottom,
            } => {
                let derived = BandPolicy::from_frame_height(frame_height)?;
                BandPolicy::new(
                    zone_top.unwrap_or(derived.zone_top()),
                    zone_bottom.unwrap_or(derived.zone_bottom()),
                )?
                .into()
            }
            Self::Line { line_y: Some(y) } => LinePolicy::new(y).into(),
            Self::Line { line_y: None } => LinePolicy::from_frame_height(frame_height)?.into(),
        };
        Ok(policy)
    }
}

/// Everything needed to build a [`CountingPipeline`](crate::integration::CountingPipeline).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub frame_height: u32,
    pub tracker: TrackerConfig,
    pub policy: PolicyConfig,
    pub scheduler: SchedulerConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            frame_height: 480,
            tracker: TrackerConfig::default(),
            policy: PolicyConfig::default(),
            scheduler: SchedulerConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load and validate from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    /// Parse and validate a JSON document. Missing fields take defaults.
    pub fn from_json_str(data: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_height == 0 {
            return Err(ConfigError::InvalidFrameHeight);
        }
        self.scheduler.validate()?;
        self.policy.build(self.frame_height)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::from_json_str("{}").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.tracker.max_disappeared, 40);
        assert_eq!(config.scheduler.process_every_n_frames, 3);
    }

    #[test]
    fn test_band_derived_from_height() {
        let policy = PolicyConfig::band().build(720).unwrap();
        assert_eq!(policy, CountingPolicy::Band(BandPolicy::new(620, 700).unwrap()));
    }

    #[test]
    fn test_band_partial_override() {
        let config = PipelineConfig::from_json_str(
            r#"{"frame_height": 480, "policy": {"kind": "band", "zone_top": 300}}"#,
        )
        .unwrap();
        let policy = config.policy.build(config.frame_height).unwrap();
        assert_eq!(policy, CountingPolicy::Band(BandPolicy::new(300, 460).unwrap()));
    }

    #[test]
    fn test_line_config() {
        let config = PipelineConfig::from_json_str(
            r#"{"frame_height": 600, "policy": {"kind": "line"}, "tracker": {"max_disappeared": 5}}"#,
        )
        .unwrap();
        assert_eq!(config.tracker.max_disappeared, 5);
        assert_eq!(
            config.policy.build(config.frame_height).unwrap(),
            CountingPolicy::Line(LinePolicy::new(300))
        );
    }

    #[test]
    fn test_rejects_invalid() {
        assert!(matches!(
            PipelineConfig::from_json_str(r#"{"scheduler": {"process_every_n_frames": 0}}"#),
            Err(ConfigError::InvalidProcessInterval(0))
        ));
        assert!(matches!(
            PipelineConfig::from_json_str(r#"{"frame_height": 0}"#),
            Err(ConfigError::InvalidFrameHeight)
        ));
        assert!(matches!(
            PipelineConfig::from_json_str(
                r#"{"policy": {"kind": "band", "zone_top": 400, "zone_bottom": 100}}"#
            ),
            Err(ConfigError::InvalidZone { .. })
        ));
        assert!(matches!(
            PipelineConfig::from_json_str(r#"{"tracker": {"max_disappeared": -1}}"#),
            Err(ConfigError::Parse(_))
        ));
    }
}
