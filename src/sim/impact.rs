//! Impact resolution
//!
//! Decides what a collision means for a snowball: bounce off the room, burst
//! on anything else, or ignore duplicate contacts from the same physical hit.
//! `resolve_impact` is pure; the snowball applies the outcome.

use glam::Vec3;
use rand::Rng;

use crate::consts::{LAYER_DEFAULT, LAYER_ENVIRONMENT_MESH, LAYER_ENVIRONMENT_PLANE};
use crate::reflect;

/// The struck surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Surface {
    /// Physics layer of the collider
    pub layer: u32,
    /// Whether a splat decal may be left on it
    pub splat_eligible: bool,
}

impl Surface {
    pub fn new(layer: u32, splat_eligible: bool) -> Self {
        Self {
            layer,
            splat_eligible,
        }
    }

    /// Exactly the reconstructed mesh and detected planes count as environment
    pub fn is_environment(&self) -> bool {
        matches!(self.layer, LAYER_ENVIRONMENT_MESH | LAYER_ENVIRONMENT_PLANE)
    }

    /// Bursts on the default layer throw secondary debris
    pub fn shows_secondary_particles(&self) -> bool {
        self.layer == LAYER_DEFAULT
    }
}

/// One collision reported by the physics engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactEvent {
    /// Surface normal at the contact
    pub normal: Vec3,
    /// Contact point
    pub point: Vec3,
    pub surface: Surface,
    /// Simulation time of the contact
    pub time: f32,
}

/// Snowball state the resolver needs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactContext {
    pub has_burst: bool,
    pub bounces_left: u32,
    pub last_impact: Option<f32>,
    /// Minimum time between two environment impacts
    pub debounce: f32,
}

/// Why an impact was ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    AlreadyBurst,
    Debounced,
}

/// What to do about an impact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactOutcome {
    /// No side effects at all
    Ignore(IgnoreReason),
    /// Spend one bounce and re-launch off the surface
    Rebound { splat: bool },
    /// Burst and expire
    Terminate {
        secondary_particles: bool,
        splat: bool,
    },
}

/// Classify an impact
pub fn resolve_impact(ctx: &ImpactContext, event: &ImpactEvent) -> ImpactOutcome {
    if ctx.has_burst {
        return ImpactOutcome::Ignore(IgnoreReason::AlreadyBurst);
    }

    // Anything that isn't the room ends the flight on first contact
    if !event.surface.is_environment() {
        return ImpactOutcome::Terminate {
            secondary_particles: event.surface.shows_secondary_particles(),
            splat: event.surface.splat_eligible,
        };
    }

    if let Some(last) = ctx.last_impact {
        if event.time - last < ctx.debounce {
            return ImpactOutcome::Ignore(IgnoreReason::Debounced);
        }
    }

    if ctx.bounces_left > 0 {
        ImpactOutcome::Rebound {
            splat: event.surface.splat_eligible,
        }
    } else {
        ImpactOutcome::Terminate {
            secondary_particles: true,
            splat: false,
        }
    }
}

/// Direction to re-launch along after a bounce
///
/// Reflects the inbound velocity off the surface and perturbs it by up to
/// `jitter` per axis. Falls back to the surface normal when the snowball
/// arrives at rest or the jitter cancels the reflection.
pub fn bounce_direction(inbound: Vec3, normal: Vec3, jitter: f32, rng: &mut impl Rng) -> Vec3 {
    let normal = normal.normalize_or(Vec3::Y);
    let reflected = match inbound.try_normalize() {
        Some(dir) => reflect(dir, normal),
        None => normal,
    };
    let jitter = jitter.abs();
    let offset = if jitter > 0.0 {
        Vec3::new(
            rng.random_range(-jitter..=jitter),
            rng.random_range(-jitter..=jitter),
            rng.random_range(-jitter..=jitter),
        )
    } else {
        Vec3::ZERO
    };
    (reflected + offset).normalize_or(normal)
}
