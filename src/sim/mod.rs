//! Deterministic soil simulation module
//!
//! All soil gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (particles by slot, pits by registration)
//! - No rendering or platform dependencies

pub mod effects;
pub mod physics;
pub mod pickup;
pub mod state;
pub mod tick;
pub mod zones;

pub use effects::{BurstShape, EffectEmitter, EffectParticle};
pub use physics::integrate_free;
pub use pickup::{PickupRules, Transition};
pub use state::{
    DigEvent, EffectorState, FailReason, GameEvent, ParticleId, ParticleState, RngState,
    SoilColor, SoilParticle, SoilWorld, Zone,
};
pub use tick::step;
pub use zones::{count_correct, detect_failure, zone_progress};
