//! Snowball flight state machine
//!
//! A snowball is spawned in hand (`Held`), tossed exactly once (`Flying`),
//! may burst at most once and expires exactly once. Destruction follows
//! expiry after a grace delay so late observers still see the `Expired`
//! notification. Side effects the host must perform (effects, sounds) are
//! reported as `FlightEvent`s; the rigid body is driven directly.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::body::PhysicsBody;
use super::impact::{ImpactContext, ImpactEvent, ImpactOutcome, bounce_direction, resolve_impact};
use super::kinematics::FlightParameters;
use crate::tuning::FlightTuning;

/// Coarse lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Held,
    Flying,
    Expired,
}

/// Observable lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightState {
    /// In hand, following the controller
    Held,
    /// In free flight
    Flying,
    /// Burst but not yet expired
    Burst,
    /// Hidden and waiting for (or past) destruction
    Expired,
}

/// Side effects produced by a snowball
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlightEvent {
    Tossed {
        id: u32,
        position: Vec3,
        force: f32,
        torque: f32,
    },
    Bounced {
        id: u32,
        position: Vec3,
        bounces_left: u32,
    },
    Burst {
        id: u32,
        position: Vec3,
        normal: Vec3,
        secondary_particles: bool,
    },
    Splat {
        id: u32,
        position: Vec3,
        normal: Vec3,
    },
    Trails {
        id: u32,
        enabled: bool,
    },
    Expired {
        id: u32,
    },
    Destroyed {
        id: u32,
    },
}

/// A thrown projectile
pub struct Snowball {
    pub id: u32,
    /// Who spawned it (local player or a remote peer)
    pub tag: String,
    phase: Phase,
    has_burst: bool,
    bounces_left: u32,
    last_impact: Option<f32>,
    expires_at: Option<f32>,
    destroy_at: Option<f32>,
    destroyed: bool,
    visible: bool,
    trails: bool,
    /// Simulation time as last seen by this snowball
    now: f32,
    toss_force: f32,
    /// Controller anchor followed while held
    anchor: Vec3,
    held_offset: Vec3,
    tuning: FlightTuning,
    rng: Pcg32,
    body: Box<dyn PhysicsBody>,
}

impl std::fmt::Debug for Snowball {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snowball")
            .field("id", &self.id)
            .field("tag", &self.tag)
            .field("state", &self.state())
            .field("bounces_left", &self.bounces_left)
            .field("position", &self.body.position())
            .finish()
    }
}

impl Snowball {
    /// Spawn a held snowball. The body is switched to kinematic.
    pub fn new(
        id: u32,
        tag: impl Into<String>,
        now: f32,
        tuning: FlightTuning,
        mut body: Box<dyn PhysicsBody>,
        seed: u64,
    ) -> Self {
        body.set_kinematic(true);
        let anchor = body.position();
        Self {
            id,
            tag: tag.into(),
            phase: Phase::Held,
            has_burst: false,
            bounces_left: tuning.max_impacts,
            last_impact: None,
            expires_at: None,
            destroy_at: None,
            destroyed: false,
            visible: true,
            trails: false,
            now,
            toss_force: 0.0,
            anchor,
            held_offset: Vec3::ZERO,
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            body,
        }
    }

    /// Offset from the anchor kept while held
    pub fn with_held_offset(mut self, offset: Vec3) -> Self {
        self.held_offset = offset;
        self
    }

    pub fn state(&self) -> FlightState {
        match self.phase {
            Phase::Expired => FlightState::Expired,
            _ if self.has_burst => FlightState::Burst,
            Phase::Held => FlightState::Held,
            Phase::Flying => FlightState::Flying,
        }
    }

    pub fn has_burst(&self) -> bool {
        self.has_burst
    }

    pub fn is_flying(&self) -> bool {
        self.phase == Phase::Flying && !self.has_burst
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn trails_enabled(&self) -> bool {
        self.trails
    }

    /// True once the destruction delay has run out
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn bounces_left(&self) -> u32 {
        self.bounces_left
    }

    pub fn last_impact(&self) -> Option<f32> {
        self.last_impact
    }

    pub fn expires_at(&self) -> Option<f32> {
        self.expires_at
    }

    pub fn destroy_at(&self) -> Option<f32> {
        self.destroy_at
    }

    pub fn position(&self) -> Vec3 {
        self.body.position()
    }

    pub fn body(&self) -> &dyn PhysicsBody {
        self.body.as_ref()
    }

    pub fn body_mut(&mut self) -> &mut dyn PhysicsBody {
        self.body.as_mut()
    }

    /// Move the controller anchor the held snowball follows
    pub fn set_anchor(&mut self, anchor: Vec3) {
        self.anchor = anchor;
    }

    /// Release into free flight. Only valid while held; returns false otherwise.
    pub fn toss(&mut self, params: &FlightParameters, events: &mut Vec<FlightEvent>) -> bool {
        if self.phase != Phase::Held || self.has_burst {
            log::warn!(
                "Snowball {} tossed while {:?}, ignoring",
                self.id,
                self.state()
            );
            return false;
        }

        self.phase = Phase::Flying;
        self.toss_force = params.force_magnitude;
        self.body.set_kinematic(false);
        self.body.set_continuous_collision(true);
        self.body.add_force(params.force);
        self.body.add_torque(params.torque);
        self.expires_at = Some(self.now + self.tuning.lifetime);
        self.trails = true;

        log::debug!(
            "Snowball {} tossed: force {:.2}, torque {:.4}, angle {:.0}",
            self.id,
            params.force_magnitude,
            params.torque_magnitude,
            params.angle
        );
        events.push(FlightEvent::Trails {
            id: self.id,
            enabled: true,
        });
        events.push(FlightEvent::Tossed {
            id: self.id,
            position: self.body.position(),
            force: params.force_magnitude,
            torque: params.torque_magnitude,
        });
        true
    }

    /// Advance the snowball clock by `dt` and run any timers that came due
    pub fn advance(&mut self, dt: f32, events: &mut Vec<FlightEvent>) {
        self.now += dt;

        match self.phase {
            Phase::Held => {
                self.body.set_position(self.anchor + self.held_offset);
            }
            Phase::Flying => {
                if self.expires_at.is_some_and(|t| self.now >= t) {
                    log::debug!("Snowball {} lifetime over", self.id);
                    let position = self.body.position();
                    self.burst(position, Vec3::Y, false, events);
                    self.expire(true, events);
                }
            }
            Phase::Expired => {
                if !self.destroyed && self.destroy_at.is_some_and(|t| self.now >= t) {
                    self.destroyed = true;
                    events.push(FlightEvent::Destroyed { id: self.id });
                }
            }
        }
    }

    /// Handle one collision from the physics engine
    pub fn on_collision(&mut self, event: &ImpactEvent, events: &mut Vec<FlightEvent>) {
        match self.phase {
            Phase::Held => {
                log::trace!("Snowball {} collided while held, ignoring", self.id);
                return;
            }
            Phase::Expired => return,
            Phase::Flying => {}
        }

        let ctx = ImpactContext {
            has_burst: self.has_burst,
            bounces_left: self.bounces_left,
            last_impact: self.last_impact,
            debounce: self.tuning.debounce,
        };

        match resolve_impact(&ctx, event) {
            ImpactOutcome::Ignore(reason) => {
                log::trace!("Snowball {} impact ignored: {:?}", self.id, reason);
            }
            ImpactOutcome::Rebound { splat } => {
                self.bounces_left -= 1;
                self.last_impact = Some(event.time);

                let inbound = self.body.velocity();
                self.body.set_velocity(Vec3::ZERO);
                let direction =
                    bounce_direction(inbound, event.normal, self.tuning.bounce_jitter, &mut self.rng);
                self.body
                    .add_force(direction * self.toss_force * self.tuning.bounce_damping);

                if splat {
                    events.push(FlightEvent::Splat {
                        id: self.id,
                        position: event.point,
                        normal: event.normal,
                    });
                }
                events.push(FlightEvent::Bounced {
                    id: self.id,
                    position: event.point,
                    bounces_left: self.bounces_left,
                });
            }
            ImpactOutcome::Terminate {
                secondary_particles,
                splat,
            } => {
                self.last_impact = Some(event.time);
                self.burst(event.point, event.normal, secondary_particles, events);
                if splat {
                    events.push(FlightEvent::Splat {
                        id: self.id,
                        position: event.point,
                        normal: event.normal,
                    });
                }
                self.expire(true, events);
            }
        }
    }

    /// Burst at `position`, oriented to `normal`. Idempotent.
    pub fn burst(
        &mut self,
        position: Vec3,
        normal: Vec3,
        secondary_particles: bool,
        events: &mut Vec<FlightEvent>,
    ) {
        if self.has_burst {
            log::trace!("Snowball {} already burst", self.id);
            return;
        }
        self.has_burst = true;

        if self.trails {
            self.trails = false;
            events.push(FlightEvent::Trails {
                id: self.id,
                enabled: false,
            });
        }
        events.push(FlightEvent::Burst {
            id: self.id,
            position,
            normal,
            secondary_particles,
        });
    }

    /// Hide the snowball and optionally schedule its destruction. Idempotent.
    pub fn expire(&mut self, destroy: bool, events: &mut Vec<FlightEvent>) {
        if self.phase == Phase::Expired {
            return;
        }
        self.phase = Phase::Expired;
        self.visible = false;
        self.body.set_kinematic(true);

        if destroy {
            self.destroy_at = Some(self.now + self.tuning.destroy_delay);
        }
        log::debug!("Snowball {} expired", self.id);
        events.push(FlightEvent::Expired { id: self.id });
    }
}
