//! Snowtoss entry point
//!
//! Runs a headless session: a scripted player throws snowballs at the
//! snowrings in an empty room (floor plus a back wall) and the results are
//! logged. Set `RUST_LOG=debug` for per-throw detail.
//!
//! Usage: snowtoss [--tuning <file.json>] [--store <file.json>] [--seconds <n>]

use glam::Vec3;

use snowtoss::Tuning;
use snowtoss::audio::AudioManager;
use snowtoss::consts::*;
use snowtoss::effects::EffectLog;
use snowtoss::input::{Button, ButtonEdge, FixedSignals};
use snowtoss::persistence::JsonFileStore;
use snowtoss::sim::{
    BallisticFactory, Contact, GameEvent, ImpactEvent, Services, Surface, TickInput, World, tick,
};

/// Distance of the back wall in front of the player (meters)
const WALL_Z: f32 = -6.0;
/// Headset frame time driving the loop
const FRAME_DT: f32 = 1.0 / 72.0;
/// Seconds between scripted throws
const THROW_EVERY: f32 = 2.5;
/// Seconds the trigger is held per throw
const WIND_UP: f32 = 0.35;
/// Release headings cycled by the scripted player (degrees)
const HEADINGS: [f32; 5] = [0.0, 30.0, 330.0, 65.0, 5.0];

struct Options {
    tuning: Option<String>,
    store: String,
    seconds: f32,
}

fn parse_args() -> Options {
    let mut options = Options {
        tuning: None,
        store: "snowtoss_store.json".to_string(),
        seconds: 30.0,
    };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--tuning" => options.tuning = args.next(),
            "--store" => {
                if let Some(path) = args.next() {
                    options.store = path;
                }
            }
            "--seconds" => {
                if let Some(secs) = args.next().and_then(|s| s.parse().ok()) {
                    options.seconds = secs;
                }
            }
            other => log::warn!("Ignoring unknown argument {}", other),
        }
    }
    options
}

/// Scripted player driving the trigger and motion signals
struct Player {
    next_throw: f32,
    release_at: Option<f32>,
    throws: usize,
}

impl Player {
    fn new() -> Self {
        Self {
            next_throw: 1.0,
            release_at: None,
            throws: 0,
        }
    }

    /// Produce this frame's button edges and update the motion signals
    fn update(&mut self, time: f32, signals: &mut FixedSignals) -> Vec<ButtonEdge> {
        let mut edges = Vec::new();
        match self.release_at {
            None if time >= self.next_throw => {
                edges.push(ButtonEdge::Pressed(Button::Trigger));
                self.release_at = Some(time + WIND_UP);
            }
            Some(release) if time >= release => {
                edges.push(ButtonEdge::Released(Button::Trigger));
                signals.heading = HEADINGS[self.throws % HEADINGS.len()];
                self.release_at = None;
                self.next_throw = time + THROW_EVERY;
                self.throws += 1;
            }
            Some(release) => {
                // Arm swing: acceleration peaks mid wind-up, harder every throw
                let progress = 1.0 - (release - time) / WIND_UP;
                let strength = 1800.0 + 700.0 * (self.throws % 5) as f32;
                signals.acceleration = strength * (progress * std::f32::consts::PI).sin();
            }
            None => signals.acceleration = 0.0,
        }
        edges
    }
}

/// Report floor and wall contacts for snowballs that crossed them
fn room_contacts(world: &World) -> Vec<Contact> {
    let mut contacts = Vec::new();
    for ball in world.snowballs.iter().filter(|b| b.is_flying()) {
        let pos = ball.position();
        let vel = ball.body().velocity();
        if pos.y <= SNOWBALL_RADIUS && vel.y < 0.0 {
            contacts.push(Contact {
                snowball: ball.id,
                impact: ImpactEvent {
                    normal: Vec3::Y,
                    point: Vec3::new(pos.x, 0.0, pos.z),
                    surface: Surface::new(LAYER_ENVIRONMENT_PLANE, true),
                    time: world.time,
                },
            });
        } else if pos.z <= WALL_Z + SNOWBALL_RADIUS && vel.z < 0.0 {
            contacts.push(Contact {
                snowball: ball.id,
                impact: ImpactEvent {
                    normal: Vec3::Z,
                    point: Vec3::new(pos.x, pos.y, WALL_Z),
                    surface: Surface::new(LAYER_ENVIRONMENT_MESH, true),
                    time: world.time,
                },
            });
        }
    }
    contacts
}

/// Session holding the world, its services and the fixed-step accumulator
struct Game {
    world: World,
    signals: FixedSignals,
    effects: EffectLog,
    audio: AudioManager,
    store: JsonFileStore,
    player: Player,
    accumulator: f32,
}

impl Game {
    fn new(seed: u64, tuning: Tuning, store: JsonFileStore) -> Self {
        let world = World::new(seed, tuning, &store, Box::new(BallisticFactory));
        let audio = AudioManager::from_settings(&world.settings);
        Self {
            world,
            signals: FixedSignals::default(),
            effects: EffectLog::new(),
            audio,
            store,
            player: Player::new(),
            accumulator: 0.0,
        }
    }

    /// Run simulation ticks for one frame
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut input = TickInput {
            edges: self.player.update(self.world.time, &mut self.signals),
            ..Default::default()
        };

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            input.contacts = room_contacts(&self.world);
            let mut services = Services {
                signals: &self.signals,
                effects: &mut self.effects,
                audio: &mut self.audio,
                store: &mut self.store,
            };
            tick(&mut self.world, &input, SIM_DT, &mut services);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            input.edges.clear();

            for event in &self.world.events {
                log_event(event);
            }
        }
    }
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::Thrown { id, force, torque } => {
            log::info!("Snowball {} thrown (force {:.2}, spin {:+.4})", id, force, torque)
        }
        GameEvent::Bounced { id, bounces_left } => {
            log::info!("Snowball {} bounced ({} left)", id, bounces_left)
        }
        GameEvent::Burst { id, position } => log::info!("Snowball {} burst at {:.2}", id, position),
        GameEvent::RingSpawned { id, position } => {
            log::info!("Ring {} appeared at {:.2}", id, position)
        }
        GameEvent::RingScored { ring, points, .. } => {
            log::info!("Ring {} hit! +{}", ring, points)
        }
        GameEvent::NewHighScore { score } => log::info!("New high score: {}", score),
        other => log::debug!("{:?}", other),
    }
}

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = parse_args();
    let tuning = match &options.tuning {
        Some(path) => Tuning::load(path).unwrap_or_else(|e| {
            log::warn!("Falling back to default tuning: {}", e);
            Tuning::default()
        }),
        None => Tuning::default(),
    };
    let store = JsonFileStore::open_or_empty(&options.store);

    let seed = 20_241_218;
    log::info!("Snowtoss headless session, seed {}", seed);
    let mut game = Game::new(seed, tuning, store);

    let frames = (options.seconds / FRAME_DT).ceil() as u32;
    for _ in 0..frames {
        game.update(FRAME_DT);
    }

    let score = &game.world.score;
    log::info!(
        "Session over after {} ticks ({:.1}s simulated)",
        game.world.time_ticks,
        game.world.time
    );
    log::info!(
        "{} throws, {} rings, score {} (best {}), {} bursts, {} splats, {} sounds",
        score.throws,
        score.rings_scored,
        score.score,
        score.high_score,
        game.effects.bursts(),
        game.effects.splats(),
        game.audio.played.len()
    );
    log::info!("Store: {}", game.store.path().display());
}
