//! Soil world state and core simulation types
//!
//! The particle arena and the pit registry live here. Nothing outside this
//! module holds a particle across frames; everything else addresses particles
//! by [`ParticleId`].

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::effects::EffectEmitter;
use super::zones;
use crate::tuning::Tuning;

/// Soil colors in the level palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoilColor {
    #[default]
    Brown,
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
}

impl SoilColor {
    pub const ALL: [SoilColor; 6] = [
        SoilColor::Brown,
        SoilColor::Red,
        SoilColor::Blue,
        SoilColor::Green,
        SoilColor::Yellow,
        SoilColor::Purple,
    ];

    /// 0xRRGGBB value
    pub fn hex(&self) -> u32 {
        match self {
            SoilColor::Brown => 0x8b4513,
            SoilColor::Red => 0xff0000,
            SoilColor::Blue => 0x0000ff,
            SoilColor::Green => 0x00ff00,
            SoilColor::Yellow => 0xffff00,
            SoilColor::Purple => 0x800080,
        }
    }

    pub fn rgba(&self) -> [f32; 4] {
        let hex = self.hex();
        [
            ((hex >> 16) & 0xff) as f32 / 255.0,
            ((hex >> 8) & 0xff) as f32 / 255.0,
            (hex & 0xff) as f32 / 255.0,
            1.0,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SoilColor::Brown => "brown",
            SoilColor::Red => "red",
            SoilColor::Blue => "blue",
            SoilColor::Green => "green",
            SoilColor::Yellow => "yellow",
            SoilColor::Purple => "purple",
        }
    }
}

/// Soil particle state - resting/falling or carried in the bucket
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ParticleState {
    /// Subject to gravity until it reaches the floor
    Free { velocity: Vec3, grounded: bool },
    /// Riding in the bucket; gravity suspended
    Attached,
}

impl ParticleState {
    pub fn at_rest() -> Self {
        ParticleState::Free {
            velocity: Vec3::ZERO,
            grounded: false,
        }
    }
}

/// Stable handle of a particle slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParticleId(pub usize);

impl ParticleId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A unit of soil
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoilParticle {
    pub position: Vec3,
    pub color: SoilColor,
    pub state: ParticleState,
}

impl SoilParticle {
    pub fn new(position: Vec3, color: SoilColor) -> Self {
        Self {
            position,
            color,
            state: ParticleState::at_rest(),
        }
    }

    pub fn is_attached(&self) -> bool {
        matches!(self.state, ParticleState::Attached)
    }

    pub fn is_grounded(&self) -> bool {
        matches!(self.state, ParticleState::Free { grounded: true, .. })
    }

    /// Velocity while free; attached particles have none
    pub fn velocity(&self) -> Option<Vec3> {
        match self.state {
            ParticleState::Free { velocity, .. } => Some(velocity),
            ParticleState::Attached => None,
        }
    }
}

/// A pit that only accepts one color of soil
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    /// Ground-plane center (x, z)
    pub center: Vec2,
    pub radius: f32,
    pub color: SoilColor,
}

impl Zone {
    pub fn new(x: f32, z: f32, radius: f32, color: SoilColor) -> Self {
        Self {
            center: Vec2::new(x, z),
            radius,
            color,
        }
    }

    /// Whether a world position lies over the pit (height ignored)
    pub fn contains(&self, pos: Vec3) -> bool {
        crate::planar_distance(pos, self.center) < self.radius
    }
}

/// Scoop pose for one frame, produced by the arm kinematics
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EffectorState {
    /// World position of the pickup point
    pub position: Vec3,
    /// Operator is holding the scoop control
    pub scoop_active: bool,
}

impl EffectorState {
    pub fn new(position: Vec3, scoop_active: bool) -> Self {
        Self {
            position,
            scoop_active,
        }
    }
}

/// A scoop that picked up soil loudly enough to be seen and heard
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DigEvent {
    pub position: Vec3,
    pub color: SoilColor,
}

/// Why a level run ended in failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailReason {
    /// The timer ran out
    TimeUp,
    /// Soil rests in a pit of another color
    WrongColor,
    /// The excavator left the road
    OffRoad,
}

impl FailReason {
    pub fn message(&self) -> &'static str {
        match self {
            FailReason::TimeUp => "Time's up!",
            FailReason::WrongColor => "Failed! Wrong color in a pit!",
            FailReason::OffRoad => "Failed! Drove off the road!",
        }
    }
}

/// Notifications for the audio and UI collaborators, drained once per frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Dig(DigEvent),
    EngineRev,
    EngineIdle,
    Hydraulic,
    Countdown { seconds_left: u32 },
    LevelComplete { level: u32 },
    LevelFailed { level: u32, reason: FailReason },
}

/// RNG state wrapper so a world can be rebuilt with the same seed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Particle store and pit registry
#[derive(Debug, Clone)]
pub struct SoilWorld {
    pub tuning: Tuning,
    pub rng_state: RngState,
    pub(crate) rng: Pcg32,
    /// Simulation step counter
    pub time_ticks: u64,
    pub(crate) particles: Vec<SoilParticle>,
    zones: Vec<Zone>,
    /// Cosmetic debris (never evaluated)
    pub effects: EffectEmitter,
    pub(crate) events: Vec<GameEvent>,
}

impl SoilWorld {
    /// Create an empty world with the given seed and default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let rng_state = RngState::new(seed);
        Self {
            rng: rng_state.to_rng(),
            rng_state,
            effects: EffectEmitter::new(tuning.max_effects()),
            tuning,
            time_ticks: 0,
            particles: Vec::new(),
            zones: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Scatter `count` particles over a disc around (x, z)
    pub fn spawn_pile(&mut self, x: f32, z: f32, count: usize, color: SoilColor) {
        let radius = self.tuning.pile_radius;
        let height = self.tuning.pile_height;
        let floor_y = self.tuning.floor_y;

        self.particles.reserve(count);
        for _ in 0..count {
            let angle = self.rng.random::<f32>() * std::f32::consts::TAU;
            let r = self.rng.random::<f32>() * radius;
            let y = floor_y + self.rng.random::<f32>() * height;
            let position = Vec3::new(x + angle.cos() * r, y, z + angle.sin() * r);
            let mut particle = SoilParticle::new(position, color);
            if y <= floor_y {
                particle.state = ParticleState::Free {
                    velocity: Vec3::ZERO,
                    grounded: true,
                };
            }
            self.particles.push(particle);
        }
        log::debug!(
            "Spawned {} {} particles at ({}, {})",
            count,
            color.as_str(),
            x,
            z
        );
    }

    /// Place a single resting particle (scripted scenes and tests).
    /// Anything at or under the floor is put on it, grounded.
    pub fn place_particle(&mut self, mut position: Vec3, color: SoilColor) -> ParticleId {
        let id = ParticleId(self.particles.len());
        let grounded = position.y <= self.tuning.floor_y;
        if grounded {
            position.y = self.tuning.floor_y;
        }
        let mut particle = SoilParticle::new(position, color);
        if grounded {
            particle.state = ParticleState::Free {
                velocity: Vec3::ZERO,
                grounded: true,
            };
        }
        self.particles.push(particle);
        id
    }

    /// Register a pit with the default radius
    pub fn spawn_zone(&mut self, x: f32, z: f32, color: SoilColor) {
        self.zones.push(Zone::new(x, z, self.tuning.zone_radius, color));
    }

    /// Drop every particle, pit and debris particle
    pub fn clear(&mut self) {
        self.particles.clear();
        self.zones.clear();
        self.effects.clear();
        self.events.clear();
    }

    pub fn particles(&self) -> &[SoilParticle] {
        &self.particles
    }

    pub fn particle(&self, id: ParticleId) -> Option<&SoilParticle> {
        self.particles.get(id.index())
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Number of particles currently in the bucket
    pub fn carried_count(&self) -> usize {
        self.particles.iter().filter(|p| p.is_attached()).count()
    }

    /// Particles resting in a pit of their own color
    pub fn count_correct(&self) -> usize {
        zones::count_correct(&self.zones, &self.particles)
    }

    /// Whether any free particle sits in a pit of another color
    pub fn detect_failure(&self) -> bool {
        zones::detect_failure(&self.zones, &self.particles)
    }

    /// Correct count per pit, in registration order
    pub fn zone_progress(&self) -> Vec<usize> {
        zones::zone_progress(&self.zones, &self.particles)
    }

    /// Take this frame's notifications
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_pile_shape() {
        let mut world = SoilWorld::new(7);
        world.spawn_pile(5.0, -3.0, 200, SoilColor::Red);
        assert_eq!(world.particles().len(), 200);

        for p in world.particles() {
            let d = crate::planar_distance(p.position, Vec2::new(5.0, -3.0));
            assert!(d < 1.5 + 1e-4, "particle outside pile disc: {}", d);
            assert!(p.position.y >= 0.15 && p.position.y < 1.15);
            assert_eq!(p.color, SoilColor::Red);
            assert_eq!(p.velocity(), Some(Vec3::ZERO));
            assert!(!p.is_attached());
        }
    }

    #[test]
    fn test_spawn_is_seeded() {
        let mut a = SoilWorld::new(42);
        let mut b = SoilWorld::new(42);
        a.spawn_pile(0.0, 0.0, 10, SoilColor::Brown);
        b.spawn_pile(0.0, 0.0, 10, SoilColor::Brown);
        for (pa, pb) in a.particles().iter().zip(b.particles()) {
            assert_eq!(pa.position, pb.position);
        }
    }

    #[test]
    fn test_clear_empties_everything() {
        let mut world = SoilWorld::new(1);
        world.spawn_pile(0.0, 0.0, 10, SoilColor::Brown);
        world.spawn_zone(3.0, 3.0, SoilColor::Brown);
        world.clear();
        assert!(world.particles().is_empty());
        assert!(world.zones().is_empty());
        assert_eq!(world.count_correct(), 0);
        assert!(!world.detect_failure());
    }

    #[test]
    fn test_place_particle_on_floor_is_grounded() {
        let mut world = SoilWorld::new(1);
        let id = world.place_particle(Vec3::new(0.0, 0.15, 0.0), SoilColor::Blue);
        assert_eq!(id, ParticleId(0));
        assert!(world.particle(id).unwrap().is_grounded());
        let high = world.place_particle(Vec3::new(0.0, 3.0, 0.0), SoilColor::Blue);
        assert!(!world.particle(high).unwrap().is_grounded());
    }

    #[test]
    fn test_place_particle_below_floor_is_lifted() {
        let mut world = SoilWorld::new(1);
        let id = world.place_particle(Vec3::new(2.0, -1.0, 3.0), SoilColor::Red);
        let p = world.particle(id).unwrap();
        assert_eq!(p.position, Vec3::new(2.0, 0.15, 3.0));
        assert!(p.is_grounded());

        let effector = EffectorState::new(Vec3::new(30.0, 5.0, 30.0), false);
        for _ in 0..10 {
            crate::sim::step(&mut world, &effector, 0.016);
        }
        assert_eq!(world.particle(id).unwrap().position.y, 0.15);
    }

    #[test]
    fn test_particle_ids_are_slot_indices() {
        let mut world = SoilWorld::new(1);
        world.spawn_pile(0.0, 0.0, 3, SoilColor::Brown);
        let id = world.place_particle(Vec3::new(0.0, 1.0, 0.0), SoilColor::Green);
        assert_eq!(id, ParticleId(3));
        assert_eq!(world.particle(id).unwrap().color, SoilColor::Green);
        assert!(world.particle(ParticleId(4)).is_none());
    }

    #[test]
    fn test_zone_contains_ignores_height() {
        let zone = Zone::new(-5.0, 5.0, 2.0, SoilColor::Brown);
        assert!(zone.contains(Vec3::new(-5.0, 40.0, 5.0)));
        assert!(zone.contains(Vec3::new(-3.5, 0.15, 5.0)));
        assert!(!zone.contains(Vec3::new(-3.0, 0.15, 5.0)));
    }

    #[test]
    fn test_palette_rgba() {
        assert_eq!(SoilColor::Red.rgba(), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(SoilColor::Brown.hex(), 0x8b4513);
    }
}
