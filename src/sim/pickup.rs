//! Scoop pickup and release
//!
//! Two states, two transitions:
//! - `Free -> Attached` when the scoop is active, the particle is within the
//!   pickup radius of the bucket and below the pickup height.
//! - `Attached -> Free` when the scoop is released. Velocity restarts at zero.
//!
//! A carried particle is re-placed at the bucket every frame with a small
//! per-axis wobble instead of being simulated.

use glam::Vec3;
use rand::Rng;

use super::state::{DigEvent, EffectorState, ParticleState, SoilParticle};
use crate::tuning::Tuning;

/// Thresholds for the scoop, copied out of [`Tuning`] once per step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickupRules {
    pub radius: f32,
    pub max_height: f32,
    pub jitter: f32,
    pub effect_chance: f64,
    pub floor_y: f32,
}

impl PickupRules {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            radius: tuning.pickup_radius,
            max_height: tuning.pickup_max_height,
            jitter: tuning.carry_jitter,
            effect_chance: tuning.dig_effect_chance,
            floor_y: tuning.floor_y,
        }
    }

    /// Whether a free particle at `pos` can be scooped by `effector`
    pub fn can_scoop(&self, pos: Vec3, effector: &EffectorState) -> bool {
        effector.scoop_active
            && pos.distance(effector.position) < self.radius
            && pos.y < self.max_height
    }
}

/// What happened to one particle this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    /// Picked up; `dig` is set when the pickup should be seen and heard
    Attached { dig: Option<DigEvent> },
    /// Dropped from the bucket
    Released,
    /// Still riding in the bucket
    Carried,
}

/// Apply the pickup/release rules to every particle, returning the dig events
pub fn resolve<R: Rng>(
    particles: &mut [SoilParticle],
    effector: &EffectorState,
    rules: &PickupRules,
    rng: &mut R,
) -> Vec<DigEvent> {
    let mut digs = Vec::new();
    let mut attached = 0usize;
    let mut released = 0usize;

    for particle in particles.iter_mut() {
        match update_particle(particle, effector, rules, rng) {
            Some(Transition::Attached { dig }) => {
                attached += 1;
                digs.extend(dig);
            }
            Some(Transition::Released) => released += 1,
            Some(Transition::Carried) | None => {}
        }
    }

    if attached > 0 || released > 0 {
        log::debug!("Scoop: {} picked up, {} released", attached, released);
    }
    digs
}

/// Run the state machine for one particle
pub fn update_particle<R: Rng>(
    particle: &mut SoilParticle,
    effector: &EffectorState,
    rules: &PickupRules,
    rng: &mut R,
) -> Option<Transition> {
    match particle.state {
        ParticleState::Attached if !effector.scoop_active => {
            release(particle, rules.floor_y);
            Some(Transition::Released)
        }
        ParticleState::Attached => {
            particle.position = effector.position + jitter(rng, rules.jitter);
            Some(Transition::Carried)
        }
        ParticleState::Free { .. } if rules.can_scoop(particle.position, effector) => {
            particle.state = ParticleState::Attached;
            let dig = (rng.random::<f64>() < rules.effect_chance).then_some(DigEvent {
                position: particle.position,
                color: particle.color,
            });
            Some(Transition::Attached { dig })
        }
        ParticleState::Free { .. } => None,
    }
}

/// Drop a carried particle where it is, at rest
fn release(particle: &mut SoilParticle, floor_y: f32) {
    // The bucket can dip below ground; a dropped particle must not stay there
    let grounded = particle.position.y <= floor_y;
    if grounded {
        particle.position.y = floor_y;
    }
    particle.state = ParticleState::Free {
        velocity: Vec3::ZERO,
        grounded,
    };
}

/// Independent uniform offset in [-half, half] per axis
fn jitter<R: Rng>(rng: &mut R, half: f32) -> Vec3 {
    Vec3::new(
        (rng.random::<f32>() - 0.5) * 2.0 * half,
        (rng.random::<f32>() - 0.5) * 2.0 * half,
        (rng.random::<f32>() - 0.5) * 2.0 * half,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::SoilColor;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rules(chance: f64) -> PickupRules {
        PickupRules {
            effect_chance: chance,
            ..PickupRules::from_tuning(&Tuning::default())
        }
    }

    fn particle_at(x: f32, y: f32, z: f32) -> SoilParticle {
        SoilParticle::new(Vec3::new(x, y, z), SoilColor::Brown)
    }

    #[test]
    fn test_attach_when_close_low_and_active() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut p = particle_at(1.0, 0.5, 0.0);
        let effector = EffectorState::new(Vec3::new(0.0, 0.5, 0.0), true);

        let t = update_particle(&mut p, &effector, &rules(1.0), &mut rng);
        assert!(matches!(t, Some(Transition::Attached { dig: Some(_) })));
        assert!(p.is_attached());
    }

    #[test]
    fn test_never_attaches_without_intent() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut p = particle_at(0.0, 0.5, 0.0);
        let effector = EffectorState::new(Vec3::new(0.0, 0.5, 0.0), false);
        assert_eq!(update_particle(&mut p, &effector, &rules(1.0), &mut rng), None);
        assert!(!p.is_attached());
    }

    #[test]
    fn test_no_attach_at_radius_or_height_limit() {
        let mut rng = Pcg32::seed_from_u64(1);
        let r = rules(0.0);

        let mut far = particle_at(1.5, 0.5, 0.0);
        let effector = EffectorState::new(Vec3::new(0.0, 0.5, 0.0), true);
        assert_eq!(update_particle(&mut far, &effector, &r, &mut rng), None);

        let mut high = particle_at(0.0, 2.0, 0.0);
        let effector = EffectorState::new(Vec3::new(0.0, 2.0, 0.0), true);
        assert_eq!(update_particle(&mut high, &effector, &r, &mut rng), None);
    }

    #[test]
    fn test_dig_event_respects_chance() {
        let mut rng = Pcg32::seed_from_u64(3);
        let effector = EffectorState::new(Vec3::ZERO, true);

        let mut p = particle_at(0.0, 0.2, 0.0);
        let t = update_particle(&mut p, &effector, &rules(0.0), &mut rng);
        assert_eq!(t, Some(Transition::Attached { dig: None }));

        let mut p = particle_at(0.0, 0.2, 0.0);
        let t = update_particle(&mut p, &effector, &rules(1.0), &mut rng);
        let Some(Transition::Attached { dig: Some(dig) }) = t else {
            panic!("expected a dig event, got {:?}", t);
        };
        assert_eq!(dig.position, Vec3::new(0.0, 0.2, 0.0));
        assert_eq!(dig.color, SoilColor::Brown);
    }

    #[test]
    fn test_pickup_distance_includes_height() {
        let mut rng = Pcg32::seed_from_u64(1);
        // Directly under the bucket but 1.6 below it
        let mut p = particle_at(0.0, 0.2, 0.0);
        let effector = EffectorState::new(Vec3::new(0.0, 1.8, 0.0), true);
        assert_eq!(update_particle(&mut p, &effector, &rules(1.0), &mut rng), None);
        assert!(!p.is_attached());

        let effector = EffectorState::new(Vec3::new(0.0, 1.6, 0.0), true);
        assert!(matches!(
            update_particle(&mut p, &effector, &rules(1.0), &mut rng),
            Some(Transition::Attached { .. })
        ));
    }

    #[test]
    fn test_dig_event_frequency_at_default_chance() {
        let mut rng = Pcg32::seed_from_u64(2024);
        let r = PickupRules::from_tuning(&Tuning::default());
        let effector = EffectorState::new(Vec3::ZERO, true);

        let trials = 10_000;
        let mut digs = 0;
        for _ in 0..trials {
            let mut p = particle_at(0.0, 0.2, 0.0);
            if let Some(Transition::Attached { dig: Some(_) }) =
                update_particle(&mut p, &effector, &r, &mut rng)
            {
                digs += 1;
            }
        }
        let rate = digs as f64 / trials as f64;
        assert!((rate - 0.3).abs() < 0.02, "dig rate {}", rate);
    }

    #[test]
    fn test_carried_particle_tracks_bucket_with_jitter() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut p = particle_at(0.0, 0.5, 0.0);
        p.state = ParticleState::Attached;

        let bucket = Vec3::new(4.0, 3.0, -2.0);
        let effector = EffectorState::new(bucket, true);
        for _ in 0..50 {
            let t = update_particle(&mut p, &effector, &rules(0.0), &mut rng);
            assert_eq!(t, Some(Transition::Carried));
            let offset = p.position - bucket;
            assert!(offset.abs().max_element() <= 0.25 + 1e-5);
        }
    }

    #[test]
    fn test_release_resets_velocity() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut p = particle_at(2.0, 3.0, 1.0);
        p.state = ParticleState::Attached;

        let effector = EffectorState::new(Vec3::ZERO, false);
        let t = update_particle(&mut p, &effector, &rules(0.0), &mut rng);
        assert_eq!(t, Some(Transition::Released));
        assert_eq!(p.velocity(), Some(Vec3::ZERO));
        assert_eq!(p.position, Vec3::new(2.0, 3.0, 1.0));
        assert!(!p.is_grounded());
    }

    #[test]
    fn test_release_below_floor_lands_on_floor() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut p = particle_at(0.0, -1.2, 0.0);
        p.state = ParticleState::Attached;

        let effector = EffectorState::new(Vec3::ZERO, false);
        update_particle(&mut p, &effector, &rules(0.0), &mut rng);
        assert_eq!(p.position.y, 0.15);
        assert!(p.is_grounded());
    }

    #[test]
    fn test_resolve_collects_digs() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut particles = vec![
            particle_at(0.0, 0.2, 0.0),
            particle_at(0.5, 0.2, 0.0),
            particle_at(10.0, 0.2, 0.0),
        ];
        let effector = EffectorState::new(Vec3::ZERO, true);
        let digs = resolve(&mut particles, &effector, &rules(1.0), &mut rng);

        assert_eq!(digs.len(), 2);
        assert!(particles[0].is_attached());
        assert!(particles[1].is_attached());
        assert!(!particles[2].is_attached());
    }
}
