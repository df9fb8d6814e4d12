//! Dig Sort - An excavator soil-sorting arcade game
//!
//! Core modules:
//! - `sim`: Deterministic soil simulation (particles, pickup, zones, effects)
//! - `excavator`: Arm kinematics that drive the scoop position
//! - `road`: Static road network and the road-adherence test
//! - `level`: Level table, timer and win/fail decisions
//! - `tuning`: Data-driven simulation constants
//! - `render`: GPU-ready instance data for the renderer
//! - `audio`: Sound cues for the audio backend

pub mod audio;
pub mod error;
pub mod excavator;
pub mod level;
pub mod render;
pub mod road;
pub mod sim;
pub mod tuning;

pub use error::ConfigError;
pub use excavator::{Excavator, ExcavatorControls};
pub use level::{FailReason, LevelController, LevelDef, LevelPhase, LevelSet};
pub use road::RoadNetwork;
pub use tuning::Tuning;

use glam::{Vec2, Vec3};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (the browser build ran at ~60 Hz)
    pub const SIM_DT: f32 = 0.016;

    /// Gravity acceleration on the y axis (units/s²)
    pub const GRAVITY: f32 = -9.8;
    /// Resting height of a soil particle's center above the ground plane
    pub const FLOOR_Y: f32 = 0.15;

    /// Soil piles
    pub const PILE_RADIUS: f32 = 1.5;
    pub const PILE_HEIGHT: f32 = 1.0;

    /// Scoop interaction
    pub const PICKUP_RADIUS: f32 = 1.5;
    /// Particles at or above this height can't be scooped (arm raised away)
    pub const PICKUP_MAX_HEIGHT: f32 = 2.0;
    /// Half-extent of the per-axis wobble of a carried particle
    pub const CARRY_JITTER: f32 = 0.25;
    /// Chance that a pickup spawns debris and a dig sound
    pub const DIG_EFFECT_CHANCE: f64 = 0.3;

    /// Pits
    pub const ZONE_RADIUS: f32 = 2.0;

    /// Dig debris
    pub const EFFECT_BURST: usize = 5;
    pub const EFFECT_LIFETIME: f32 = 1.0;
    pub const EFFECT_SPREAD: f32 = 0.25;
    pub const EFFECT_MAX_HORIZONTAL_SPEED: f32 = 1.0;
    pub const EFFECT_MAX_UP_SPEED: f32 = 3.0;
    pub const MAX_EFFECTS: usize = 256;

    /// Excavator drive
    pub const DRIVE_SPEED: f32 = 5.0;
    pub const TURN_SPEED: f32 = 2.0;
    pub const ARM_SPEED: f32 = 2.0;
    /// Base may not leave [-WORLD_LIMIT, WORLD_LIMIT] on x and z
    pub const WORLD_LIMIT: f32 = 45.0;
    /// Chance per frame of a hydraulic hiss while the arm moves
    pub const HYDRAULIC_SOUND_CHANCE: f64 = 0.2;

    /// Countdown cues start when this many whole seconds remain
    pub const COUNTDOWN_SECONDS: u32 = 10;
}

/// Distance between two points on the ground plane, ignoring height
#[inline]
pub fn planar_distance(a: Vec3, center: Vec2) -> f32 {
    Vec2::new(a.x - center.x, a.z - center.y).length()
}

/// Project a world position onto the ground plane as (x, z)
#[inline]
pub fn ground_point(pos: Vec3) -> Vec2 {
    Vec2::new(pos.x, pos.z)
}
