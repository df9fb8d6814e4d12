//! Excavator drive and arm kinematics
//!
//! The excavator is a chain of rigid joints: tracked base (yaw) → cab (yaw)
//! → boom (pitch) → stick (pitch) → bucket (pitch). The scoop point handed to
//! the soil simulation is found by composing the joint transforms.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use glam::{Affine3A, Quat, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::sim::{EffectorState, GameEvent};
use crate::tuning::Tuning;

/// Height of the base pivot above the ground
pub const BASE_HEIGHT: f32 = 0.5;
/// Cab pivot relative to the base
pub const CAB_OFFSET: Vec3 = Vec3::new(0.0, 0.6, 0.0);
/// Boom pivot relative to the cab
pub const BOOM_OFFSET: Vec3 = Vec3::new(0.4, 0.5, 0.8);
/// Stick pivot relative to the boom
pub const STICK_OFFSET: Vec3 = Vec3::new(0.0, 4.2, 0.8);
/// Bucket pivot relative to the stick
pub const BUCKET_OFFSET: Vec3 = Vec3::new(0.0, -2.8, 0.0);
/// Scoop point relative to the bucket pivot
pub const SCOOP_OFFSET: Vec3 = Vec3::new(0.0, 0.0, 0.5);

pub const BOOM_MIN: f32 = 0.0;
pub const BOOM_MAX: f32 = FRAC_PI_2;
pub const STICK_MIN: f32 = -PI;
pub const STICK_MAX: f32 = 0.0;
pub const BUCKET_MAX: f32 = PI;

/// Operator controls for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcavatorControls {
    pub forward: bool,
    pub backward: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    /// Swing the cab on the tracks
    pub swing_left: bool,
    pub swing_right: bool,
    pub boom_up: bool,
    pub boom_down: bool,
    pub stick_out: bool,
    pub stick_in: bool,
    /// Hold to scoop; release to drop the load
    pub scoop: bool,
}

impl ExcavatorControls {
    pub fn is_driving(&self) -> bool {
        self.forward || self.backward || self.turn_left || self.turn_right
    }

    pub fn is_arm_moving(&self) -> bool {
        self.boom_up
            || self.boom_down
            || self.stick_out
            || self.stick_in
            || self.swing_left
            || self.swing_right
            || self.scoop
    }
}

/// The player's excavator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Excavator {
    /// Base pivot in world space
    pub position: Vec3,
    /// Base yaw (radians)
    pub heading: f32,
    /// Cab yaw relative to the base
    pub cab_yaw: f32,
    pub boom_pitch: f32,
    pub stick_pitch: f32,
    pub bucket_curl: f32,
    scooping: bool,
    engine_revving: bool,
    drive_speed: f32,
    turn_speed: f32,
    arm_speed: f32,
    world_limit: f32,
    hydraulic_chance: f64,
}

impl Default for Excavator {
    fn default() -> Self {
        Self::from_tuning(&Tuning::default())
    }
}

impl Excavator {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            position: Vec3::new(0.0, BASE_HEIGHT, 0.0),
            heading: 0.0,
            cab_yaw: 0.0,
            boom_pitch: FRAC_PI_4,
            stick_pitch: -FRAC_PI_2,
            bucket_curl: FRAC_PI_4,
            scooping: false,
            engine_revving: false,
            drive_speed: tuning.drive_speed,
            turn_speed: tuning.turn_speed,
            arm_speed: tuning.arm_speed,
            world_limit: tuning.world_limit,
            hydraulic_chance: tuning.hydraulic_sound_chance,
        }
    }

    /// Put the tracks back at the origin facing +z; the arm keeps its pose
    pub fn reset_base(&mut self) {
        self.position = Vec3::new(0.0, BASE_HEIGHT, 0.0);
        self.heading = 0.0;
    }

    /// Apply one frame of operator input
    pub fn update<R: Rng>(
        &mut self,
        controls: &ExcavatorControls,
        dt: f32,
        rng: &mut R,
        events: &mut Vec<GameEvent>,
    ) {
        // Drive along the current heading
        let mut drive = 0.0;
        if controls.forward {
            drive += self.drive_speed * dt;
        }
        if controls.backward {
            drive -= self.drive_speed * dt;
        }
        self.position += self.forward_dir() * drive;
        self.position.x = self.position.x.clamp(-self.world_limit, self.world_limit);
        self.position.z = self.position.z.clamp(-self.world_limit, self.world_limit);

        if controls.turn_left {
            self.heading += self.turn_speed * dt;
        }
        if controls.turn_right {
            self.heading -= self.turn_speed * dt;
        }

        if controls.swing_left {
            self.cab_yaw += self.turn_speed * dt;
        }
        if controls.swing_right {
            self.cab_yaw -= self.turn_speed * dt;
        }

        if controls.boom_up {
            self.boom_pitch -= self.arm_speed * dt;
        }
        if controls.boom_down {
            self.boom_pitch += self.arm_speed * dt;
        }
        if controls.stick_out {
            self.stick_pitch += self.arm_speed * dt;
        }
        if controls.stick_in {
            self.stick_pitch -= self.arm_speed * dt;
        }

        // Bucket curls twice as fast as the other joints and springs back when released
        let curl = self.arm_speed * dt * 2.0;
        if controls.scoop {
            self.bucket_curl += curl;
        } else if self.bucket_curl > 0.0 {
            self.bucket_curl -= curl;
        }

        self.boom_pitch = self.boom_pitch.clamp(BOOM_MIN, BOOM_MAX);
        self.stick_pitch = self.stick_pitch.clamp(STICK_MIN, STICK_MAX);
        self.bucket_curl = self.bucket_curl.clamp(0.0, BUCKET_MAX);
        self.scooping = controls.scoop;

        let driving = controls.is_driving();
        if driving != self.engine_revving {
            self.engine_revving = driving;
            events.push(if driving {
                GameEvent::EngineRev
            } else {
                GameEvent::EngineIdle
            });
        }

        if controls.is_arm_moving() && rng.random::<f64>() < self.hydraulic_chance {
            events.push(GameEvent::Hydraulic);
        }
    }

    /// Drop the engine to idle, cueing it only if it was revving
    pub fn idle_engine(&mut self, events: &mut Vec<GameEvent>) {
        if self.engine_revving {
            self.engine_revving = false;
            events.push(GameEvent::EngineIdle);
        }
    }

    /// Unit vector the tracks drive along
    pub fn forward_dir(&self) -> Vec3 {
        Vec3::new(self.heading.sin(), 0.0, self.heading.cos())
    }

    /// World transform of the bucket pivot
    pub fn bucket_transform(&self) -> Affine3A {
        let base = Affine3A::from_rotation_translation(Quat::from_rotation_y(self.heading), self.position);
        let cab = Affine3A::from_rotation_translation(Quat::from_rotation_y(self.cab_yaw), CAB_OFFSET);
        let boom = Affine3A::from_rotation_translation(Quat::from_rotation_x(self.boom_pitch), BOOM_OFFSET);
        let stick =
            Affine3A::from_rotation_translation(Quat::from_rotation_x(self.stick_pitch), STICK_OFFSET);
        let bucket =
            Affine3A::from_rotation_translation(Quat::from_rotation_x(self.bucket_curl), BUCKET_OFFSET);
        base * cab * boom * stick * bucket
    }

    /// World position of the scoop point
    pub fn bucket_world_position(&self) -> Vec3 {
        self.bucket_transform().transform_point3(SCOOP_OFFSET)
    }

    /// Pose handed to the soil simulation
    pub fn effector(&self) -> EffectorState {
        EffectorState::new(self.bucket_world_position(), self.scooping)
    }

    pub fn is_scooping(&self) -> bool {
        self.scooping
    }
}
