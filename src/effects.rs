//! Visual effect seam
//!
//! Burst debris, splat decals and trail emission are authored elsewhere;
//! the simulation only asks for them through `EffectSpawner`.

use glam::Vec3;

/// Instantiates and toggles visual effects
pub trait EffectSpawner {
    /// Spawn a burst at `position`, oriented to the surface `normal`
    fn spawn_burst(&mut self, position: Vec3, normal: Vec3, secondary_particles: bool);

    /// Leave a splat decal at `position`, oriented to the surface `normal`
    fn spawn_splat(&mut self, position: Vec3, normal: Vec3);

    /// Toggle trail/spark emission for one snowball
    fn set_trails(&mut self, snowball: u32, enabled: bool);
}

/// A recorded effect request
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectCall {
    Burst {
        position: Vec3,
        normal: Vec3,
        secondary_particles: bool,
    },
    Splat {
        position: Vec3,
        normal: Vec3,
    },
    Trails {
        snowball: u32,
        enabled: bool,
    },
}

/// Effect spawner that records every request (headless runs and tests)
#[derive(Debug, Clone, Default)]
pub struct EffectLog {
    pub calls: Vec<EffectCall>,
}

impl EffectLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bursts(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, EffectCall::Burst { .. }))
            .count()
    }

    pub fn splats(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, EffectCall::Splat { .. }))
            .count()
    }
}

impl EffectSpawner for EffectLog {
    fn spawn_burst(&mut self, position: Vec3, normal: Vec3, secondary_particles: bool) {
        self.calls.push(EffectCall::Burst {
            position,
            normal,
            secondary_particles,
        });
    }

    fn spawn_splat(&mut self, position: Vec3, normal: Vec3) {
        self.calls.push(EffectCall::Splat { position, normal });
    }

    fn set_trails(&mut self, snowball: u32, enabled: bool) {
        self.calls.push(EffectCall::Trails { snowball, enabled });
    }
}
