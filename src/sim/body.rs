//! Rigid body seam
//!
//! The snowball drives its body only through `PhysicsBody`. An engine binding
//! implements it over the engine's rigid body; `BallisticBody` is a minimal
//! stand-in (gravity + impulses) for headless runs and tests.

use glam::Vec3;

use crate::consts::{GRAVITY, SNOWBALL_MASS, SNOWBALL_RADIUS, SPIN_LIFT};

/// Operations the flight controller needs from a rigid body
pub trait PhysicsBody {
    fn position(&self) -> Vec3;

    /// Teleport the body (used while held)
    fn set_position(&mut self, position: Vec3);

    fn velocity(&self) -> Vec3;

    fn set_velocity(&mut self, velocity: Vec3);

    /// Kinematic bodies ignore forces and gravity
    fn set_kinematic(&mut self, kinematic: bool);

    fn is_kinematic(&self) -> bool;

    /// Continuous collision detection for fast movers
    fn set_continuous_collision(&mut self, enabled: bool);

    /// Apply a linear impulse
    fn add_force(&mut self, force: Vec3);

    /// Apply an angular impulse
    fn add_torque(&mut self, torque: Vec3);

    /// Advance the body. Engine-backed bodies are integrated by the engine
    /// and keep the default no-op.
    fn integrate(&mut self, _dt: f32) {}
}

/// Point-mass sphere under gravity. Spin bends the path sideways.
#[derive(Debug, Clone, PartialEq)]
pub struct BallisticBody {
    pub position: Vec3,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    /// Lateral acceleration per unit of `angular_velocity × velocity`
    pub spin_lift: f32,
    pub mass: f32,
    pub radius: f32,
    pub gravity: Vec3,
    pub kinematic: bool,
    pub continuous_collision: bool,
}

impl BallisticBody {
    /// A kinematic snowball-sized body at `position`
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            spin_lift: SPIN_LIFT,
            mass: SNOWBALL_MASS,
            radius: SNOWBALL_RADIUS,
            gravity: Vec3::new(0.0, -GRAVITY, 0.0),
            kinematic: true,
            continuous_collision: false,
        }
    }

    /// Solid-sphere moment of inertia
    fn inertia(&self) -> f32 {
        0.4 * self.mass * self.radius * self.radius
    }
}

impl PhysicsBody for BallisticBody {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn set_kinematic(&mut self, kinematic: bool) {
        self.kinematic = kinematic;
        if kinematic {
            self.velocity = Vec3::ZERO;
            self.angular_velocity = Vec3::ZERO;
        }
    }

    fn is_kinematic(&self) -> bool {
        self.kinematic
    }

    fn set_continuous_collision(&mut self, enabled: bool) {
        self.continuous_collision = enabled;
    }

    fn add_force(&mut self, force: Vec3) {
        if self.kinematic {
            return;
        }
        self.velocity += force / self.mass;
    }

    fn add_torque(&mut self, torque: Vec3) {
        if self.kinematic {
            return;
        }
        self.angular_velocity += torque / self.inertia();
    }

    fn integrate(&mut self, dt: f32) {
        if self.kinematic {
            return;
        }
        // Semi-implicit Euler
        let curve = self.spin_lift * self.angular_velocity.cross(self.velocity);
        self.velocity += (self.gravity + curve) * dt;
        self.position += self.velocity * dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinematic_ignores_impulses() {
        let mut body = BallisticBody::new(Vec3::ZERO);
        body.add_force(Vec3::X);
        body.integrate(0.1);
        assert_eq!(body.velocity, Vec3::ZERO);
        assert_eq!(body.position, Vec3::ZERO);
    }

    #[test]
    fn test_impulse_and_gravity() {
        let mut body = BallisticBody::new(Vec3::ZERO);
        body.set_kinematic(false);
        body.add_force(Vec3::new(SNOWBALL_MASS * 2.0, 0.0, 0.0));
        assert!((body.velocity.x - 2.0).abs() < 1e-5);

        body.integrate(0.5);
        assert!((body.position.x - 1.0).abs() < 1e-5);
        assert!(body.velocity.y < 0.0);
        assert!(body.position.y < 0.0);
    }

    #[test]
    fn test_spin_curves_flight() {
        let launch = |torque: f32| {
            let mut body = BallisticBody::new(Vec3::ZERO);
            body.set_kinematic(false);
            body.add_force(Vec3::NEG_Z * 1.5);
            body.add_torque(Vec3::Y * torque);
            for _ in 0..45 {
                body.integrate(1.0 / 90.0);
            }
            body.position
        };

        let straight = launch(0.0);
        assert!(straight.x.abs() < 1e-6);
        let left = launch(0.002);
        let right = launch(-0.002);
        assert!(left.x < -0.01);
        assert!(right.x > 0.01);
        assert!((left.x + right.x).abs() < 1e-4);
        // Spin bends the path without adding range
        assert!(left.z >= straight.z - 1e-3);
    }

    #[test]
    fn test_torque_spins() {
        let mut body = BallisticBody::new(Vec3::ZERO);
        body.set_kinematic(false);
        body.add_torque(Vec3::Y * 0.001);
        assert!(body.angular_velocity.y > 0.0);
    }
}
