//! World state and core simulation types
//!
//! Everything the tick advances lives in `World`: snowballs, rings, score,
//! the toss capture and the player's pose.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::body::{BallisticBody, PhysicsBody};
use super::rings::RingField;
use super::snowball::{FlightEvent, Snowball};
use crate::consts::HELD_OFFSET;
use crate::highscore::ScoreBoard;
use crate::input::TossCapture;
use crate::persistence::SettingsStore;
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Spawn tag for snowballs thrown by this device
pub const LOCAL_TAG: &str = "local";

/// Creates rigid bodies for new snowballs
pub trait BodyFactory {
    fn create_body(&mut self, position: Vec3) -> Box<dyn PhysicsBody>;
}

/// Factory producing `BallisticBody`s
#[derive(Debug, Clone, Copy, Default)]
pub struct BallisticFactory;

impl BodyFactory for BallisticFactory {
    fn create_body(&mut self, position: Vec3) -> Box<dyn PhysicsBody> {
        Box::new(BallisticBody::new(position))
    }
}

/// Notable things that happened during a tick, for UI and network layers
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    SnowballSpawned { id: u32, tag: String },
    Thrown { id: u32, force: f32, torque: f32 },
    Bounced { id: u32, bounces_left: u32 },
    Burst { id: u32, position: Vec3 },
    Expired { id: u32 },
    Destroyed { id: u32 },
    RingSpawned { id: u32, position: Vec3 },
    RingScored { ring: u32, snowball: u32, points: u32 },
    RingTimedOut { ring: u32 },
    NewHighScore { score: u32 },
    TrailsToggled { enabled: bool },
    RoundRestarted,
}

/// Complete simulation state
pub struct World {
    /// Simulation time (seconds)
    pub time: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub tuning: Tuning,
    pub settings: Settings,
    /// Tag stamped on locally spawned snowballs
    pub spawn_tag: String,
    /// Controller position (hand anchor)
    pub hand: Vec3,
    /// Direction the player faces
    pub forward: Vec3,
    /// Live snowballs (sorted by id)
    pub snowballs: Vec<Snowball>,
    /// Id of the snowball currently in hand
    pub held: Option<u32>,
    pub rings: RingField,
    pub score: ScoreBoard,
    pub capture: TossCapture,
    /// Events from the last tick (cleared at the start of each tick)
    pub events: Vec<GameEvent>,
    bodies: Box<dyn BodyFactory>,
    rng: Pcg32,
    next_id: u32,
}

impl World {
    /// Create a world. The high score and settings are read from the store
    /// here, once, before any tick can write them.
    pub fn new(
        seed: u64,
        tuning: Tuning,
        store: &dyn SettingsStore,
        bodies: Box<dyn BodyFactory>,
    ) -> Self {
        let rings = RingField::new(tuning.rings.spawn_interval);
        Self {
            time: 0.0,
            time_ticks: 0,
            settings: Settings::load(store),
            score: ScoreBoard::load(store),
            tuning,
            spawn_tag: LOCAL_TAG.to_string(),
            hand: Vec3::new(0.2, 1.2, -0.3),
            forward: Vec3::NEG_Z,
            snowballs: Vec::new(),
            held: None,
            rings,
            capture: TossCapture::new(),
            events: Vec::new(),
            bodies,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn snowball(&self, id: u32) -> Option<&Snowball> {
        self.snowballs.iter().find(|s| s.id == id)
    }

    pub fn snowball_mut(&mut self, id: u32) -> Option<&mut Snowball> {
        self.snowballs.iter_mut().find(|s| s.id == id)
    }

    /// Spawn a snowball in hand, unless one is already held
    pub fn spawn_held(&mut self) -> Option<u32> {
        if let Some(id) = self.held {
            log::debug!("Snowball {} already in hand", id);
            return None;
        }

        let id = self.next_entity_id();
        let seed: u64 = self.rng.random();
        let body = self.bodies.create_body(self.hand + Vec3::from(HELD_OFFSET));
        let mut snowball = Snowball::new(
            id,
            self.spawn_tag.clone(),
            self.time,
            self.tuning.flight.clone(),
            body,
            seed,
        )
        .with_held_offset(Vec3::from(HELD_OFFSET));
        snowball.set_anchor(self.hand);
        self.snowballs.push(snowball);
        self.held = Some(id);

        self.events.push(GameEvent::SnowballSpawned {
            id,
            tag: self.spawn_tag.clone(),
        });
        Some(id)
    }

    /// Clear score, rings and any snowball in hand.
    ///
    /// The held snowball is expired like any other, so it is reclaimed only
    /// after its `Expired` and `Destroyed` notifications.
    pub fn restart_round(&mut self, flight_events: &mut Vec<FlightEvent>) {
        self.score.reset_round();
        self.rings.clear(self.time, &self.tuning.rings);
        self.capture.cancel();
        if let Some(id) = self.held.take() {
            if let Some(ball) = self.snowball_mut(id) {
                ball.expire(true, flight_events);
            }
        }
        self.events.push(GameEvent::RoundRestarted);
    }

    /// Time out old rings and spawn a new one if due.
    ///
    /// Returns timed-out ring ids and the spawned ring, if any.
    pub fn update_rings(&mut self) -> (Vec<u32>, Option<(u32, Vec3)>) {
        let removed = self.rings.expire_old(self.time, &self.tuning.rings);

        let next_id = &mut self.next_id;
        let spawned = self
            .rings
            .update_spawn(
                self.time,
                self.hand,
                self.forward,
                &self.tuning.rings,
                &mut self.rng,
                || {
                    let id = *next_id;
                    *next_id += 1;
                    id
                },
            )
            .map(|ring| (ring.id, ring.position));
        (removed, spawned)
    }

    /// Remove destroyed snowballs
    pub fn reclaim(&mut self) {
        self.snowballs.retain(|s| !s.is_destroyed());
    }
}
