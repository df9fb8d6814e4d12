//! Dig debris
//!
//! Purely cosmetic: a handful of small chunks thrown up when the bucket bites.
//! Nothing in the scoring or failure logic looks at these.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{DigEvent, SoilColor};
use crate::consts::MAX_EFFECTS;
use crate::tuning::Tuning;

/// How a dig scatters its debris, copied out of [`Tuning`] once per step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurstShape {
    pub count: usize,
    pub lifetime: f32,
    /// Half-width of the horizontal scatter around the dig site
    pub spread: f32,
    pub max_horizontal_speed: f32,
    pub max_up_speed: f32,
}

impl BurstShape {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            count: tuning.effect_burst,
            lifetime: tuning.effect_lifetime,
            spread: tuning.effect_spread,
            max_horizontal_speed: tuning.effect_max_horizontal_speed,
            max_up_speed: tuning.effect_max_up_speed,
        }
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectParticle {
    pub pos: Vec3,
    pub vel: Vec3,
    pub color: SoilColor,
    /// Seconds left before removal
    pub life: f32,
    /// Render scale, follows remaining life
    pub size: f32,
}

/// Owns the debris pool
#[derive(Debug, Clone, Default)]
pub struct EffectEmitter {
    particles: Vec<EffectParticle>,
    max_particles: usize,
}

impl EffectEmitter {
    pub fn new(max_particles: usize) -> Self {
        Self {
            particles: Vec::with_capacity(max_particles.min(MAX_EFFECTS)),
            max_particles,
        }
    }

    /// Throw up `shape.count` chunks around the dig site
    pub fn burst<R: Rng>(&mut self, dig: &DigEvent, shape: &BurstShape, rng: &mut R) {
        for _ in 0..shape.count {
            if self.max_particles == 0 {
                return;
            }
            if self.particles.len() >= self.max_particles {
                // Remove oldest particles to make room
                self.particles.remove(0);
            }

            let mut pos = dig.position;
            pos.x += (rng.random::<f32>() - 0.5) * 2.0 * shape.spread;
            pos.z += (rng.random::<f32>() - 0.5) * 2.0 * shape.spread;

            let vel = Vec3::new(
                (rng.random::<f32>() - 0.5) * 2.0 * shape.max_horizontal_speed,
                rng.random::<f32>() * shape.max_up_speed,
                (rng.random::<f32>() - 0.5) * 2.0 * shape.max_horizontal_speed,
            );

            self.particles.push(EffectParticle {
                pos,
                vel,
                color: dig.color,
                life: shape.lifetime,
                size: shape.lifetime,
            });
        }
    }

    /// Age, cull and move the debris. No floor: chunks fall through the ground.
    pub fn update(&mut self, dt: f32, gravity: f32) {
        self.particles.retain_mut(|p| {
            p.life -= dt;
            if p.life <= 0.0 {
                return false;
            }
            p.vel.y += gravity * dt;
            p.pos += p.vel * dt;
            p.size = p.life;
            true
        });
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EffectParticle> {
        self.particles.iter()
    }
}
