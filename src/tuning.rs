//! Data-driven game balance
//!
//! Every gameplay constant that a designer might want to tweak lives here.
//! Missing fields fall back to the defaults, so a tuning file only needs to
//! list what it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    /// File could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid tuning JSON
    #[error("invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Mapping from device signals to launch force and spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TossTuning {
    /// Peak acceleration at or below which the minimum force applies
    pub min_acceleration: f32,
    /// Peak acceleration at or above which the maximum force applies
    pub max_acceleration: f32,
    /// Launch impulse for the weakest throw
    pub min_force: f32,
    /// Launch impulse for the strongest throw
    pub max_force: f32,
    /// Upward tilt of the launch direction (degrees)
    pub angle_offset: f32,
    /// Release headings are clamped to ±this many degrees
    pub heading_limit: f32,
    /// Headings within ±this many degrees produce no spin
    pub dead_zone: f32,
    /// Spin torque at the heading limit
    pub max_torque: f32,
}

impl Default for TossTuning {
    fn default() -> Self {
        Self {
            min_acceleration: 900.0,
            max_acceleration: 5000.0,
            min_force: 0.6,
            max_force: 2.4,
            angle_offset: 15.0,
            heading_limit: 70.0,
            dead_zone: 10.0,
            max_torque: 0.002,
        }
    }
}

/// Snowball lifecycle and bounce behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightTuning {
    /// Seconds a tossed snowball may fly before bursting on its own
    pub lifetime: f32,
    /// Seconds between expiry and destruction
    pub destroy_delay: f32,
    /// Environment impacts survived before the snowball must burst
    pub max_impacts: u32,
    /// Minimum seconds between two impacts for both to count
    pub debounce: f32,
    /// Fraction of the toss force used to re-launch after a bounce
    pub bounce_damping: f32,
    /// Maximum per-axis random offset added to the bounce direction
    pub bounce_jitter: f32,
}

impl Default for FlightTuning {
    fn default() -> Self {
        Self {
            lifetime: 3.0,
            destroy_delay: 5.0,
            max_impacts: 1,
            debounce: 0.125,
            bounce_damping: 0.5,
            bounce_jitter: 0.15,
        }
    }
}

/// Snowring spawning and scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingTuning {
    /// Rings alive at once
    pub max_active: usize,
    /// Seconds between spawns
    pub spawn_interval: f32,
    /// Seconds a ring stays before vanishing unscored
    pub lifetime: f32,
    /// Placement distance range from the player (meters)
    pub min_distance: f32,
    pub max_distance: f32,
    /// Placement height range (meters)
    pub min_height: f32,
    pub max_height: f32,
    /// Half-width of the placement cone around the player's forward (degrees)
    pub spread: f32,
    /// Minimum distance between two rings (meters)
    pub min_spacing: f32,
    /// Ring capture radius (meters)
    pub radius: f32,
    /// Candidate placements tried per tick before deferring
    pub placement_attempts: u32,
    /// Points for passing a snowball through a ring
    pub points: u32,
}

impl Default for RingTuning {
    fn default() -> Self {
        Self {
            max_active: 3,
            spawn_interval: 2.0,
            lifetime: 12.0,
            min_distance: 2.0,
            max_distance: 5.0,
            min_height: 0.8,
            max_height: 2.2,
            spread: 40.0,
            min_spacing: 1.0,
            radius: 0.35,
            placement_attempts: 8,
            points: 10,
        }
    }
}

/// All tuning tables
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub toss: TossTuning,
    pub flight: FlightTuning,
    pub rings: RingTuning,
}

impl Tuning {
    /// Parse tuning from a JSON string
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "flight": { "max_impacts": 3 } }"#).unwrap();
        assert_eq!(tuning.flight.max_impacts, 3);
        assert_eq!(tuning.flight.lifetime, 3.0);
        assert_eq!(tuning.toss, TossTuning::default());
        assert_eq!(tuning.rings, RingTuning::default());
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            Tuning::load("/definitely/not/here/tuning.json"),
            Err(TuningError::Io(_))
        ));
    }
}
