//! Fixed timestep simulation step
//!
//! Advances the soil world one frame. The order is fixed:
//! 1. free particles fall
//! 2. the scoop picks up, carries and drops
//! 3. digs throw debris and are queued for the audio collaborator
//! 4. debris ages
//!
//! Scoring is read afterwards through [`SoilWorld::count_correct`] and
//! [`SoilWorld::detect_failure`].

use super::effects::BurstShape;
use super::physics::integrate_free;
use super::pickup::{PickupRules, resolve};
use super::state::{EffectorState, GameEvent, SoilWorld};

/// Advance the soil world by one timestep
pub fn step(world: &mut SoilWorld, effector: &EffectorState, dt: f32) {
    let tuning = &world.tuning;
    integrate_free(&mut world.particles, tuning.gravity, tuning.floor_y, dt);

    let rules = PickupRules::from_tuning(tuning);
    let digs = resolve(&mut world.particles, effector, &rules, &mut world.rng);

    let shape = BurstShape::from_tuning(&world.tuning);
    let gravity = world.tuning.gravity;
    for dig in digs {
        world.effects.burst(&dig, &shape, &mut world.rng);
        world.push_event(GameEvent::Dig(dig));
    }
    world.effects.update(dt, gravity);

    world.time_ticks += 1;
}
