//! Gravity integration for free soil
//!
//! Explicit Euler with a hard floor. A step that would carry a particle
//! through the floor snaps it onto the floor and kills its velocity; there is
//! no bounce and no sub-step refinement.

use glam::Vec3;

use super::state::{ParticleState, SoilParticle};

/// Advance every free particle above the floor by one step
pub fn integrate_free(particles: &mut [SoilParticle], gravity: f32, floor_y: f32, dt: f32) {
    for particle in particles.iter_mut() {
        let SoilParticle {
            position, state, ..
        } = particle;

        let ParticleState::Free { velocity, grounded } = state else {
            continue;
        };

        if position.y <= floor_y {
            continue;
        }

        velocity.y += gravity * dt;
        *position += *velocity * dt;

        if position.y < floor_y {
            position.y = floor_y;
            *velocity = Vec3::ZERO;
            *grounded = true;
        }
    }
}
