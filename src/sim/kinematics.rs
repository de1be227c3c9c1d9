//! Toss kinematics
//!
//! Pure mapping from what the controller felt at release (peak acceleration,
//! heading) to the snowball's launch force and spin. Inputs are clamped to
//! their valid domain so sensor spikes can't produce runaway launches.

use glam::{Quat, Vec3};

use crate::input::TossInput;
use crate::tuning::TossTuning;
use crate::{remap, signed_heading};

/// Launch parameters for one toss
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightParameters {
    /// Upward tilt applied to the forward direction (degrees)
    pub angle: f32,
    /// Launch impulse vector
    pub force: Vec3,
    /// Launch impulse magnitude (kept for bounce damping)
    pub force_magnitude: f32,
    /// Spin impulse vector (about world up)
    pub torque: Vec3,
    /// Signed spin magnitude
    pub torque_magnitude: f32,
}

/// Map peak acceleration to launch force
///
/// The acceleration is clamped to `[min_acceleration, max_acceleration]`
/// before the linear remap, so the result always lies in
/// `[min_force, max_force]`.
pub fn launch_force(tuning: &TossTuning, peak_acceleration: f32) -> f32 {
    let lo = tuning.min_acceleration.min(tuning.max_acceleration);
    let hi = tuning.min_acceleration.max(tuning.max_acceleration);
    let clamped = peak_acceleration.clamp(lo, hi);
    remap(
        clamped,
        tuning.min_acceleration,
        tuning.max_acceleration,
        tuning.min_force,
        tuning.max_force,
    )
}

/// Map release heading to signed curve torque
///
/// Headings are folded to (-180, 180] and clamped to ±`heading_limit`.
/// Inside ±`dead_zone` the torque is exactly zero; beyond it the magnitude
/// ramps linearly to `max_torque` at the limit. Negative headings spin
/// negative.
pub fn curve_torque(tuning: &TossTuning, heading: f32) -> f32 {
    let limit = tuning.heading_limit.abs();
    let h = signed_heading(heading).clamp(-limit, limit);
    let magnitude = h.abs();
    if magnitude < tuning.dead_zone || limit <= tuning.dead_zone {
        return 0.0;
    }
    let ramp = (magnitude - tuning.dead_zone) / (limit - tuning.dead_zone);
    tuning.max_torque * ramp * h.signum()
}

/// Tilt `forward` upward by `angle` degrees
pub fn launch_direction(forward: Vec3, angle: f32) -> Vec3 {
    let forward = forward.normalize_or(Vec3::NEG_Z);
    let right = forward.cross(Vec3::Y);
    if right.length_squared() < 1e-6 {
        // Throwing straight up or down: no horizontal axis to tilt around
        return forward;
    }
    Quat::from_axis_angle(right.normalize(), angle.to_radians()) * forward
}

/// Compute launch force and torque for a captured throw
pub fn flight_parameters(tuning: &TossTuning, input: &TossInput, forward: Vec3) -> FlightParameters {
    let force_magnitude = launch_force(tuning, input.peak_acceleration);
    let torque_magnitude = curve_torque(tuning, input.heading);
    let direction = launch_direction(forward, tuning.angle_offset);
    FlightParameters {
        angle: tuning.angle_offset,
        force: direction * force_magnitude,
        force_magnitude,
        torque: Vec3::Y * torque_magnitude,
        torque_magnitude,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn input(peak: f32, heading: f32) -> TossInput {
        TossInput {
            peak_acceleration: peak,
            peak_at: 0.0,
            released_at: 0.1,
            heading,
        }
    }

    #[test]
    fn test_force_at_configured_extremes() {
        let tuning = TossTuning::default();
        assert_eq!(launch_force(&tuning, 5000.0), tuning.max_force);
        assert_eq!(launch_force(&tuning, 900.0), tuning.min_force);
    }

    #[test]
    fn test_force_midpoint() {
        let tuning = TossTuning::default();
        let mid = launch_force(&tuning, 2950.0);
        assert!((mid - (tuning.min_force + tuning.max_force) / 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_torque_at_limits() {
        let tuning = TossTuning::default();
        assert_eq!(curve_torque(&tuning, 70.0), tuning.max_torque);
        assert_eq!(curve_torque(&tuning, 290.0), -tuning.max_torque);
        // Beyond the limit clamps to it
        assert_eq!(curve_torque(&tuning, 120.0), tuning.max_torque);
        assert_eq!(curve_torque(&tuning, 200.0), -tuning.max_torque);
    }

    #[test]
    fn test_torque_ramp() {
        let tuning = TossTuning::default();
        // Halfway between dead zone (10) and limit (70)
        let t = curve_torque(&tuning, 40.0);
        assert!((t - tuning.max_torque * 0.5).abs() < 1e-7);
        let t = curve_torque(&tuning, 320.0);
        assert!((t + tuning.max_torque * 0.5).abs() < 1e-7);
    }

    #[test]
    fn test_launch_direction_tilts_up() {
        for forward in [Vec3::NEG_Z, Vec3::Z, Vec3::X, Vec3::new(1.0, 0.0, -1.0)] {
            let dir = launch_direction(forward, 15.0);
            assert!((dir.length() - 1.0).abs() < 1e-5);
            assert!((dir.y - 15f32.to_radians().sin()).abs() < 1e-5);
            // Horizontal heading is unchanged
            let flat = Vec3::new(dir.x, 0.0, dir.z).normalize();
            assert!(flat.dot(forward.normalize()) > 0.999);
        }
    }

    #[test]
    fn test_launch_direction_vertical_forward() {
        assert_eq!(launch_direction(Vec3::Y, 15.0), Vec3::Y);
    }

    #[test]
    fn test_flight_parameters() {
        let tuning = TossTuning::default();
        let params = flight_parameters(&tuning, &input(5000.0, 70.0), Vec3::NEG_Z);
        assert_eq!(params.force_magnitude, tuning.max_force);
        assert!((params.force.length() - tuning.max_force).abs() < 1e-5);
        assert_eq!(params.torque, Vec3::Y * tuning.max_torque);
        assert_eq!(params.angle, tuning.angle_offset);
    }

    #[test]
    fn test_flight_parameters_deterministic() {
        let tuning = TossTuning::default();
        let a = flight_parameters(&tuning, &input(3210.0, 33.0), Vec3::X);
        let b = flight_parameters(&tuning, &input(3210.0, 33.0), Vec3::X);
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn prop_weak_throws_get_min_force(peak in -1000.0f32..900.0) {
            let tuning = TossTuning::default();
            prop_assert_eq!(launch_force(&tuning, peak), tuning.min_force);
        }

        #[test]
        fn prop_strong_throws_get_max_force(peak in 5000.0f32..100_000.0) {
            let tuning = TossTuning::default();
            prop_assert_eq!(launch_force(&tuning, peak), tuning.max_force);
        }

        #[test]
        fn prop_force_monotonic(a in 0.0f32..6000.0, b in 0.0f32..6000.0) {
            let tuning = TossTuning::default();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(launch_force(&tuning, lo) <= launch_force(&tuning, hi) + 1e-6);
        }

        #[test]
        fn prop_dead_zone_is_exactly_zero(h in -9.99f32..9.99) {
            let tuning = TossTuning::default();
            prop_assert_eq!(curve_torque(&tuning, h), 0.0);
            prop_assert_eq!(curve_torque(&tuning, h + 360.0), 0.0);
        }

        #[test]
        fn prop_torque_bounded(h in 0.0f32..360.0) {
            let tuning = TossTuning::default();
            prop_assert!(curve_torque(&tuning, h).abs() <= tuning.max_torque);
        }
    }
}
