//! Data-driven game balance
//!
//! Defaults match `consts`; a JSON document may override any subset.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::Rect;

/// Errors raised while loading a tuning document
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("tuning document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("`{field}` must be positive (got {value})")]
    NonPositive { field: &'static str, value: f32 },
    #[error("`{field}` ({value}) does not fit a playfield {limit} units wide")]
    TooWide {
        field: &'static str,
        value: f32,
        limit: f32,
    },
}

/// Tunable game constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub playfield_width: f32,
    pub playfield_height: f32,
    pub bucket_size: f32,
    pub bucket_y: f32,
    pub bucket_speed: f32,
    pub droplet_size: f32,
    pub fall_speed: f32,
    pub spawn_interval: f32,
    pub capture_band: f32,
    pub restart_size: f32,
    pub restart_margin_x: f32,
    pub restart_margin_y: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            playfield_width: PLAYFIELD_WIDTH,
            playfield_height: PLAYFIELD_HEIGHT,
            bucket_size: BUCKET_SIZE,
            bucket_y: BUCKET_Y,
            bucket_speed: BUCKET_SPEED,
            droplet_size: DROPLET_SIZE,
            fall_speed: FALL_SPEED,
            spawn_interval: SPAWN_INTERVAL,
            capture_band: CAPTURE_BAND,
            restart_size: RESTART_SIZE,
            restart_margin_x: RESTART_MARGIN_X,
            restart_margin_y: RESTART_MARGIN_Y,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("playfield_width", self.playfield_width),
            ("playfield_height", self.playfield_height),
            ("bucket_size", self.bucket_size),
            ("bucket_speed", self.bucket_speed),
            ("droplet_size", self.droplet_size),
            ("fall_speed", self.fall_speed),
            ("spawn_interval", self.spawn_interval),
            ("capture_band", self.capture_band),
            ("restart_size", self.restart_size),
        ];
        for (field, value) in positive {
            // NaN fails this check too
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        let wide = [
            ("bucket_size", self.bucket_size),
            ("droplet_size", self.droplet_size),
            ("restart_size", self.restart_size + self.restart_margin_x),
        ];
        for (field, value) in wide {
            if value > self.playfield_width {
                return Err(ConfigError::TooWide {
                    field,
                    value,
                    limit: self.playfield_width,
                });
            }
        }
        Ok(())
    }

    /// Rightmost x the bucket may occupy
    pub fn bucket_max_x(&self) -> f32 {
        self.playfield_width - self.bucket_size
    }

    /// Rightmost x a droplet may spawn at
    pub fn droplet_max_x(&self) -> f32 {
        self.playfield_width - self.droplet_size
    }

    /// Bucket x that centers it horizontally
    pub fn bucket_start_x(&self) -> f32 {
        self.playfield_width / 2.0 - self.bucket_size / 2.0
    }

    /// Bounds of the restart control in world space
    pub fn restart_bounds(&self) -> Rect {
        Rect::new(
            self.playfield_width - self.restart_size - self.restart_margin_x,
            self.restart_margin_y,
            self.restart_size,
            self.restart_size,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.bucket_start_x(), 29.0);
        assert_eq!(tuning.bucket_max_x(), 58.0);
        assert_eq!(tuning.restart_bounds(), Rect::new(52.0, 1.0, 10.0, 10.0));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "fall_speed": 12.0 }"#).unwrap();
        assert_eq!(tuning.fall_speed, 12.0);
        assert_eq!(tuning.playfield_width, PLAYFIELD_WIDTH);
        assert_eq!(tuning.capture_band, CAPTURE_BAND);
    }

    #[test]
    fn test_rejects_bad_json() {
        let err = Tuning::from_json("{ fall_speed: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_rejects_non_positive() {
        let err = Tuning::from_json(r#"{ "spawn_interval": 0.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NonPositive {
                field: "spawn_interval",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_bucket_wider_than_playfield() {
        let err = Tuning::from_json(r#"{ "bucket_size": 80.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::TooWide { field: "bucket_size", .. }));
    }
}
