//! Fixed timestep simulation tick
//!
//! Core game loop that advances the world in a fixed order:
//! collisions, snowball timers, body integration, input edges, ring
//! scoring, acceleration sampling, ring spawning, then effect dispatch.

use glam::Vec3;

use super::impact::ImpactEvent;
use super::kinematics::flight_parameters;
use super::snowball::FlightEvent;
use super::state::{GameEvent, World};
use crate::audio::{AudioService, SoundEffect};
use crate::effects::EffectSpawner;
use crate::input::{ButtonEdge, DeviceSignals, InputAction};
use crate::persistence::SettingsStore;

/// A collision reported for one snowball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub snowball: u32,
    pub impact: ImpactEvent,
}

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Button transitions since the last tick, in order
    pub edges: Vec<ButtonEdge>,
    /// Collisions reported by the physics engine since the last tick
    pub contacts: Vec<Contact>,
    /// Controller position, if tracked this frame
    pub hand: Option<Vec3>,
    /// Player facing, if tracked this frame
    pub forward: Option<Vec3>,
}

/// External services the tick calls into
pub struct Services<'a> {
    pub signals: &'a dyn DeviceSignals,
    pub effects: &'a mut dyn EffectSpawner,
    pub audio: &'a mut dyn AudioService,
    pub store: &'a mut dyn SettingsStore,
}

/// Advance the world by one fixed timestep
pub fn tick(world: &mut World, input: &TickInput, dt: f32, services: &mut Services) {
    world.events.clear();
    world.time += dt;
    world.time_ticks += 1;

    if let Some(hand) = input.hand {
        world.hand = hand;
    }
    if let Some(forward) = input.forward {
        world.forward = forward;
    }
    if let Some(id) = world.held {
        let hand = world.hand;
        if let Some(ball) = world.snowball_mut(id) {
            ball.set_anchor(hand);
        }
    }

    let mut flight_events = Vec::new();

    for contact in &input.contacts {
        match world.snowball_mut(contact.snowball) {
            Some(ball) => ball.on_collision(&contact.impact, &mut flight_events),
            None => log::warn!("Contact for unknown snowball {}", contact.snowball),
        }
    }

    for ball in &mut world.snowballs {
        ball.advance(dt, &mut flight_events);
    }
    for ball in &mut world.snowballs {
        ball.body_mut().integrate(dt);
    }

    // After the timers, so a snowball spawned or tossed this tick starts
    // its clock at the current time
    for edge in &input.edges {
        if let Some(action) = edge.action() {
            handle_action(world, action, services, &mut flight_events);
        }
    }

    score_rings(world, services);

    world.capture.sample(services.signals.acceleration(), world.time);

    let (removed, spawned) = world.update_rings();
    for ring in removed {
        world.events.push(GameEvent::RingTimedOut { ring });
    }
    if let Some((id, position)) = spawned {
        log::debug!("Ring {} spawned at {:?}", id, position);
        services.audio.play_at(SoundEffect::RingSpawn, position);
        world.events.push(GameEvent::RingSpawned { id, position });
    }

    dispatch(world, flight_events, services);
    world.reclaim();
}

fn handle_action(
    world: &mut World,
    action: InputAction,
    services: &mut Services,
    flight_events: &mut Vec<FlightEvent>,
) {
    match action {
        InputAction::BeginThrow => {
            world.spawn_held();
            world.capture.press(world.time);
        }
        InputAction::ReleaseThrow => {
            let Some(toss) = world.capture.release(world.time, services.signals.heading()) else {
                return;
            };
            let Some(id) = world.held.take() else {
                log::warn!("Release with no snowball in hand");
                return;
            };
            let params = flight_parameters(&world.tuning.toss, &toss, world.forward);
            let tossed = world
                .snowball_mut(id)
                .is_some_and(|ball| ball.toss(&params, flight_events));
            if tossed {
                world.score.record_throw();
            }
        }
        InputAction::ToggleTrails => {
            let enabled = world.settings.toggle_trails();
            world.settings.save(services.store);
            for ball in world.snowballs.iter().filter(|b| b.trails_enabled()) {
                services.effects.set_trails(ball.id, enabled);
            }
            world.events.push(GameEvent::TrailsToggled { enabled });
        }
        InputAction::RestartRound => world.restart_round(flight_events),
    }
}

/// Score flying snowballs that entered a ring
fn score_rings(world: &mut World, services: &mut Services) {
    let flying: Vec<(u32, Vec3)> = world
        .snowballs
        .iter()
        .filter(|b| b.is_flying())
        .map(|b| (b.id, b.position()))
        .collect();

    let points = world.tuning.rings.points;
    for (snowball, position) in flying {
        let Some(ring) = world.rings.take_captured(position) else {
            continue;
        };
        log::info!("Snowball {} scored ring {}", snowball, ring.id);
        services.audio.play_at(SoundEffect::RingScore, ring.position);
        world.events.push(GameEvent::RingScored {
            ring: ring.id,
            snowball,
            points,
        });

        if world.score.record_ring(points) {
            world.score.save(services.store);
            services.audio.play_at(SoundEffect::HighScore, ring.position);
            world.events.push(GameEvent::NewHighScore {
                score: world.score.high_score,
            });
        }
    }
}

/// Route snowball side effects to the effect/audio services
fn dispatch(world: &mut World, flight_events: Vec<FlightEvent>, services: &mut Services) {
    let settings = &world.settings;
    for event in flight_events {
        match event {
            FlightEvent::Tossed {
                id,
                position,
                force,
                torque,
            } => {
                services.audio.play_at(SoundEffect::Toss, position);
                world.events.push(GameEvent::Thrown { id, force, torque });
            }
            FlightEvent::Bounced {
                id,
                position,
                bounces_left,
            } => {
                services.audio.play_at(SoundEffect::Bounce, position);
                world.events.push(GameEvent::Bounced { id, bounces_left });
            }
            FlightEvent::Burst {
                id,
                position,
                normal,
                secondary_particles,
            } => {
                services.effects.spawn_burst(
                    position,
                    normal,
                    secondary_particles && settings.secondary_particles,
                );
                services.audio.play_at(SoundEffect::Burst, position);
                world.events.push(GameEvent::Burst { id, position });
            }
            FlightEvent::Splat {
                position, normal, ..
            } => {
                if settings.splats {
                    services.effects.spawn_splat(position, normal);
                    services.audio.play_at(SoundEffect::Splat, position);
                }
            }
            FlightEvent::Trails { id, enabled } => {
                services.effects.set_trails(id, enabled && settings.trails);
            }
            FlightEvent::Expired { id } => world.events.push(GameEvent::Expired { id }),
            FlightEvent::Destroyed { id } => world.events.push(GameEvent::Destroyed { id }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioManager;
    use crate::consts::{LAYER_DEFAULT, LAYER_ENVIRONMENT_PLANE, SIM_DT};
    use crate::effects::{EffectCall, EffectLog};
    use crate::input::{Button, FixedSignals};
    use crate::persistence::MemoryStore;
    use crate::sim::impact::Surface;
    use crate::sim::rings::Ring;
    use crate::sim::state::BallisticFactory;
    use crate::sim::FlightState;
    use crate::tuning::Tuning;

    struct Harness {
        world: World,
        signals: FixedSignals,
        effects: EffectLog,
        audio: AudioManager,
        store: MemoryStore,
    }

    impl Harness {
        fn new() -> Self {
            let store = MemoryStore::new();
            let mut tuning = Tuning::default();
            // Keep rings out of the way unless a test places one
            tuning.rings.spawn_interval = 1000.0;
            Self {
                world: World::new(12345, tuning, &store, Box::new(BallisticFactory)),
                signals: FixedSignals::default(),
                effects: EffectLog::new(),
                audio: AudioManager::new(),
                store,
            }
        }

        fn step(&mut self, input: &TickInput) {
            let mut services = Services {
                signals: &self.signals,
                effects: &mut self.effects,
                audio: &mut self.audio,
                store: &mut self.store,
            };
            tick(&mut self.world, input, SIM_DT, &mut services);
        }

        fn press(&mut self, button: Button) {
            self.step(&TickInput {
                edges: vec![ButtonEdge::Pressed(button)],
                ..Default::default()
            });
        }

        fn release(&mut self, button: Button) {
            self.step(&TickInput {
                edges: vec![ButtonEdge::Released(button)],
                ..Default::default()
            });
        }

        /// Press, shake, release; returns the thrown snowball id
        fn throw(&mut self, peak: f32, heading: f32) -> u32 {
            self.press(Button::Trigger);
            let id = self.world.held.unwrap();
            self.signals.acceleration = peak;
            self.step(&TickInput::default());
            self.signals.acceleration = 0.0;
            self.signals.heading = heading;
            self.release(Button::Trigger);
            id
        }
    }

    fn contact(snowball: u32, layer: u32, splat: bool, time: f32) -> TickInput {
        TickInput {
            contacts: vec![Contact {
                snowball,
                impact: ImpactEvent {
                    normal: Vec3::Y,
                    point: Vec3::new(0.0, 0.0, -2.0),
                    surface: Surface::new(layer, splat),
                    time,
                },
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_press_spawns_held_snowball() {
        let mut h = Harness::new();
        h.press(Button::Trigger);
        let id = h.world.held.unwrap();
        assert_eq!(h.world.snowball(id).unwrap().state(), FlightState::Held);
        assert!(h.world.events.contains(&GameEvent::SnowballSpawned {
            id,
            tag: "local".to_string()
        }));
    }

    #[test]
    fn test_throw_flies_with_max_force() {
        let mut h = Harness::new();
        let id = h.throw(5000.0, 0.0);

        let ball = h.world.snowball(id).unwrap();
        assert_eq!(ball.state(), FlightState::Flying);
        assert_eq!(h.world.held, None);
        assert_eq!(h.world.score.throws, 1);
        assert!(h.world.events.iter().any(|e| matches!(
            e,
            GameEvent::Thrown { id: thrown, force, torque }
                if *thrown == id && *force == h.world.tuning.toss.max_force && *torque == 0.0
        )));
        assert_eq!(h.audio.count(SoundEffect::Toss), 1);
        assert!(h.effects.calls.contains(&EffectCall::Trails {
            snowball: id,
            enabled: true
        }));
    }

    #[test]
    fn test_release_without_press_does_nothing() {
        let mut h = Harness::new();
        h.release(Button::Trigger);
        assert!(h.world.snowballs.is_empty());
        assert_eq!(h.world.score.throws, 0);
    }

    #[test]
    fn test_default_layer_hit_bursts_and_is_reclaimed() {
        let mut h = Harness::new();
        let id = h.throw(3000.0, 0.0);

        let now = h.world.time;
        h.step(&contact(id, LAYER_DEFAULT, true, now));
        assert_eq!(h.effects.bursts(), 1);
        assert_eq!(h.effects.splats(), 1);
        assert!(h.effects.calls.iter().any(|c| matches!(
            c,
            EffectCall::Burst {
                secondary_particles: true,
                ..
            }
        )));
        assert!(h.world.events.contains(&GameEvent::Expired { id }));
        assert_eq!(h.world.snowball(id).unwrap().state(), FlightState::Expired);

        // Still observable until the grace delay passes
        let ticks = (h.world.tuning.flight.destroy_delay / SIM_DT).ceil() as usize + 1;
        let mut destroyed = false;
        for _ in 0..ticks {
            h.step(&TickInput::default());
            destroyed |= h.world.events.contains(&GameEvent::Destroyed { id });
        }
        assert!(destroyed);
        assert!(h.world.snowball(id).is_none());
        assert_eq!(h.effects.bursts(), 1);
    }

    #[test]
    fn test_environment_bounce_then_burst() {
        let mut h = Harness::new();
        let id = h.throw(3000.0, 0.0);

        let t0 = h.world.time;
        h.step(&contact(id, LAYER_ENVIRONMENT_PLANE, false, t0));
        assert!(h.world.events.contains(&GameEvent::Bounced { id, bounces_left: 0 }));
        assert_eq!(h.effects.bursts(), 0);
        assert_eq!(h.audio.count(SoundEffect::Bounce), 1);

        // Duplicate contact inside the debounce window
        let t1 = h.world.time;
        h.step(&contact(id, LAYER_ENVIRONMENT_PLANE, false, t1));
        assert_eq!(h.effects.bursts(), 0);
        assert_eq!(h.world.snowball(id).unwrap().state(), FlightState::Flying);

        for _ in 0..20 {
            h.step(&TickInput::default());
        }
        let t2 = h.world.time;
        h.step(&contact(id, LAYER_ENVIRONMENT_PLANE, true, t2));
        assert_eq!(h.effects.bursts(), 1);
        assert_eq!(h.effects.splats(), 0);
        assert_eq!(h.world.snowball(id).unwrap().state(), FlightState::Expired);
    }

    #[test]
    fn test_lifetime_timeout_bursts() {
        let mut h = Harness::new();
        let id = h.throw(900.0, 0.0);
        let ticks = (h.world.tuning.flight.lifetime / SIM_DT).ceil() as usize + 1;
        for _ in 0..ticks {
            h.step(&TickInput::default());
        }
        assert_eq!(h.world.snowball(id).unwrap().state(), FlightState::Expired);
        assert_eq!(h.effects.bursts(), 1);
    }

    #[test]
    fn test_ring_scoring_saves_high_score() {
        let mut h = Harness::new();
        let id = h.throw(3000.0, 0.0);
        let position = h.world.snowball(id).unwrap().position();
        h.world.rings.rings.push(Ring {
            id: 500,
            position,
            radius: 1.0,
            spawned_at: h.world.time,
        });

        h.step(&TickInput::default());
        assert!(h.world.events.contains(&GameEvent::RingScored {
            ring: 500,
            snowball: id,
            points: 10
        }));
        assert!(h.world.events.contains(&GameEvent::NewHighScore { score: 10 }));
        assert_eq!(h.world.score.score, 10);
        assert_eq!(
            h.store.get_int(crate::highscore::HIGH_SCORE_KEY),
            Some(10)
        );
        assert_eq!(h.audio.count(SoundEffect::RingScore), 1);
        assert!(h.world.rings.rings.is_empty());
    }

    #[test]
    fn test_toggle_trails_persists() {
        let mut h = Harness::new();
        let id = h.throw(3000.0, 0.0);
        h.press(Button::Touchpad);
        assert!(h.world.events.contains(&GameEvent::TrailsToggled { enabled: false }));
        assert!(!h.world.settings.trails);
        assert!(h.effects.calls.contains(&EffectCall::Trails {
            snowball: id,
            enabled: false
        }));
        assert!(!crate::Settings::load(&h.store).trails);
    }

    #[test]
    fn test_restart_round() {
        let mut h = Harness::new();
        h.world.score.add_points(20);
        h.press(Button::Trigger);
        let id = h.world.held.unwrap();
        h.press(Button::Back);
        assert!(h.world.events.contains(&GameEvent::RoundRestarted));
        assert!(h.world.events.contains(&GameEvent::Expired { id }));
        assert_eq!(h.world.score.score, 0);
        assert_eq!(h.world.held, None);
        assert!(!h.world.capture.is_capturing());

        // The dropped snowball is destroyed and reclaimed after the delay
        let ticks = (h.world.tuning.flight.destroy_delay / SIM_DT).ceil() as usize + 1;
        let mut destroyed = 0;
        for _ in 0..ticks {
            h.step(&TickInput::default());
            destroyed += h
                .world
                .events
                .iter()
                .filter(|e| **e == GameEvent::Destroyed { id })
                .count();
        }
        assert_eq!(destroyed, 1);
        assert!(h.world.snowball(id).is_none());
        assert_eq!(h.effects.bursts(), 0);
    }

    #[test]
    fn test_rings_spawn_on_schedule() {
        let store = MemoryStore::new();
        let mut world = World::new(3, Tuning::default(), &store, Box::new(BallisticFactory));
        let signals = FixedSignals::default();
        let mut effects = EffectLog::new();
        let mut audio = AudioManager::new();
        let mut store = store;
        let mut services = Services {
            signals: &signals,
            effects: &mut effects,
            audio: &mut audio,
            store: &mut store,
        };

        let mut spawned = 0;
        let ticks = (2.5 / SIM_DT) as usize;
        for _ in 0..ticks {
            tick(&mut world, &TickInput::default(), SIM_DT, &mut services);
            spawned += world
                .events
                .iter()
                .filter(|e| matches!(e, GameEvent::RingSpawned { .. }))
                .count();
        }
        assert_eq!(spawned, 1);
        assert_eq!(world.rings.rings.len(), 1);
        assert_eq!(world.time_ticks, ticks as u64);
    }

    #[test]
    fn test_determinism() {
        let run = || {
            let mut h = Harness::new();
            let id = h.throw(4200.0, 30.0);
            let t = h.world.time;
            h.step(&contact(id, LAYER_ENVIRONMENT_PLANE, false, t));
            for _ in 0..10 {
                h.step(&TickInput::default());
            }
            h.world.snowball(id).unwrap().position()
        };
        assert_eq!(run(), run());
    }
}
