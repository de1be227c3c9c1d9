//! Snowtoss - A snowball toss minigame core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (toss kinematics, flight, impacts, snowrings)
//! - `input`: Controller edges, device signals and toss capture
//! - `effects` / `audio`: Service seams for VFX and sound
//! - `persistence`: Key-value settings store
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod effects;
pub mod highscore;
pub mod input;
pub mod persistence;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscore::ScoreBoard;
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (90 Hz, headset refresh rate)
    pub const SIM_DT: f32 = 1.0 / 90.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Surface layer with no special meaning; bursts here show secondary particles
    pub const LAYER_DEFAULT: u32 = 0;
    /// Reconstructed environment mesh (walls, furniture)
    pub const LAYER_ENVIRONMENT_MESH: u32 = 8;
    /// Detected environment plane (floor, tables)
    pub const LAYER_ENVIRONMENT_PLANE: u32 = 9;
    /// Snowring targets
    pub const LAYER_RING: u32 = 10;

    /// Held snowball offset from the controller anchor (meters)
    pub const HELD_OFFSET: [f32; 3] = [0.0, 0.02, -0.08];
    /// Snowball collision radius (meters)
    pub const SNOWBALL_RADIUS: f32 = 0.05;
    /// Snowball mass (kg)
    pub const SNOWBALL_MASS: f32 = 0.15;
    /// Gravity (m/s²)
    pub const GRAVITY: f32 = 9.81;
    /// Spin-induced lateral lift coefficient for `BallisticBody`
    pub const SPIN_LIFT: f32 = 0.0075;
}

/// Linear remap of `value` from `[in_min, in_max]` onto `[out_min, out_max]`.
///
/// Does not clamp: values outside the input range extrapolate. A degenerate
/// input range maps everything to `out_min`.
#[inline]
pub fn remap(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    let span = in_max - in_min;
    if span.abs() < f32::EPSILON {
        return out_min;
    }
    // Two-term form hits out_min and out_max exactly at the range ends
    let t = (value - in_min) / span;
    out_min * (1.0 - t) + out_max * t
}

/// Convert a heading in degrees (any range, usually [0, 360)) to (-180, 180]
#[inline]
pub fn signed_heading(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Reflect a vector off a surface with unit normal `normal`
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect(v: Vec3, normal: Vec3) -> Vec3 {
    v - 2.0 * v.dot(normal) * normal
}
