//! Snowring targets
//!
//! Rings appear in a cone in front of the player on a fixed cadence. A
//! placement that can't find a free spot within the attempt budget is
//! deferred to the next tick rather than dropped.

use glam::{Quat, Vec3};
use rand::Rng;

use crate::tuning::RingTuning;

/// A target ring
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    pub id: u32,
    pub position: Vec3,
    pub radius: f32,
    pub spawned_at: f32,
}

impl Ring {
    /// Whether a point lies inside the ring's capture sphere
    pub fn captures(&self, point: Vec3) -> bool {
        point.distance_squared(self.position) <= self.radius * self.radius
    }
}

/// Active rings plus the spawn schedule
#[derive(Debug, Clone, Default)]
pub struct RingField {
    pub rings: Vec<Ring>,
    /// Earliest time the next ring may appear
    next_spawn_at: f32,
    /// Ticks the current spawn has been deferred
    deferred: u32,
}

impl RingField {
    pub fn new(first_spawn_at: f32) -> Self {
        Self {
            rings: Vec::new(),
            next_spawn_at: first_spawn_at,
            deferred: 0,
        }
    }

    pub fn next_spawn_at(&self) -> f32 {
        self.next_spawn_at
    }

    pub fn deferred(&self) -> u32 {
        self.deferred
    }

    pub fn clear(&mut self, now: f32, tuning: &RingTuning) {
        self.rings.clear();
        self.deferred = 0;
        self.next_spawn_at = now + tuning.spawn_interval;
    }

    /// Try to spawn a ring if one is due. `id` is only consumed on success.
    pub fn update_spawn(
        &mut self,
        now: f32,
        origin: Vec3,
        forward: Vec3,
        tuning: &RingTuning,
        rng: &mut impl Rng,
        next_id: impl FnOnce() -> u32,
    ) -> Option<&Ring> {
        if now < self.next_spawn_at || self.rings.len() >= tuning.max_active {
            return None;
        }

        let Some(position) = self.find_placement(origin, forward, tuning, rng) else {
            self.deferred += 1;
            log::debug!("No free ring placement, deferring ({} ticks)", self.deferred);
            return None;
        };

        self.deferred = 0;
        self.next_spawn_at = now + tuning.spawn_interval;
        self.rings.push(Ring {
            id: next_id(),
            position,
            radius: tuning.radius,
            spawned_at: now,
        });
        self.rings.last()
    }

    /// Sample candidate spots until one clears every existing ring
    fn find_placement(
        &self,
        origin: Vec3,
        forward: Vec3,
        tuning: &RingTuning,
        rng: &mut impl Rng,
    ) -> Option<Vec3> {
        let flat = Vec3::new(forward.x, 0.0, forward.z).normalize_or(Vec3::NEG_Z);
        let spread = tuning.spread.abs().to_radians();
        let (min_d, max_d) = ordered(tuning.min_distance, tuning.max_distance);
        let (min_h, max_h) = ordered(tuning.min_height, tuning.max_height);

        for _ in 0..tuning.placement_attempts {
            let yaw = rng.random_range(-spread..=spread);
            let distance = rng.random_range(min_d..=max_d);
            let height = rng.random_range(min_h..=max_h);

            let dir = Quat::from_rotation_y(yaw) * flat;
            let candidate = Vec3::new(origin.x, height, origin.z) + dir * distance;

            let clear = self
                .rings
                .iter()
                .all(|r| r.position.distance(candidate) >= tuning.min_spacing);
            if clear {
                return Some(candidate);
            }
        }
        None
    }

    /// Remove rings past their lifetime, returning their ids
    pub fn expire_old(&mut self, now: f32, tuning: &RingTuning) -> Vec<u32> {
        let mut expired = Vec::new();
        self.rings.retain(|r| {
            if now - r.spawned_at >= tuning.lifetime {
                expired.push(r.id);
                false
            } else {
                true
            }
        });
        expired
    }

    /// Remove and return the first ring capturing `point`
    pub fn take_captured(&mut self, point: Vec3) -> Option<Ring> {
        let idx = self.rings.iter().position(|r| r.captures(point))?;
        Some(self.rings.remove(idx))
    }
}

fn ordered(a: f32, b: f32) -> (f32, f32) {
    if a <= b { (a, b) } else { (b, a) }
}
