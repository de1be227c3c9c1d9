//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies (reached through traits)

pub mod body;
pub mod impact;
pub mod kinematics;
pub mod rings;
pub mod snowball;
pub mod state;
pub mod tick;

pub use body::{BallisticBody, PhysicsBody};
pub use impact::{
    IgnoreReason, ImpactContext, ImpactEvent, ImpactOutcome, Surface, bounce_direction,
    resolve_impact,
};
pub use kinematics::{
    FlightParameters, curve_torque, flight_parameters, launch_direction, launch_force,
};
pub use rings::{Ring, RingField};
pub use snowball::{FlightEvent, FlightState, Snowball};
pub use state::{BallisticFactory, BodyFactory, GameEvent, LOCAL_TAG, World};
pub use tick::{Contact, Services, TickInput, tick};
