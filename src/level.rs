//! Levels and the per-frame win/fail decision
//!
//! A level is a list of soil piles, a list of pits, a time limit and a target
//! number of correctly placed particles. [`LevelController`] owns the soil
//! world, the excavator and the roads for the level being played.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::COUNTDOWN_SECONDS;
use crate::error::ConfigError;
use crate::excavator::{Excavator, ExcavatorControls};
use crate::road::RoadNetwork;
use crate::sim::{GameEvent, SoilColor, SoilWorld, step};
use crate::tuning::Tuning;

pub use crate::sim::FailReason;

/// A pile of soil to spawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PileDef {
    pub x: f32,
    pub z: f32,
    pub count: usize,
    pub color: SoilColor,
}

/// A pit to dig into
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitDef {
    pub x: f32,
    pub z: f32,
    pub color: SoilColor,
}

/// Layout and rules of one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDef {
    pub objective: String,
    /// Seconds on the clock
    pub time_limit: f32,
    /// Correctly placed particles needed to win
    pub target_count: usize,
    pub piles: Vec<PileDef>,
    pub pits: Vec<PitDef>,
}

fn pile(x: f32, z: f32, count: usize, color: SoilColor) -> PileDef {
    PileDef { x, z, count, color }
}

fn pit(x: f32, z: f32, color: SoilColor) -> PitDef {
    PitDef { x, z, color }
}

impl LevelDef {
    /// One pile, one pit
    pub fn level_one() -> Self {
        Self {
            objective: "Dig up the pile and dump it in the pit!".into(),
            time_limit: 60.0,
            target_count: 20,
            piles: vec![pile(5.0, 5.0, 30, SoilColor::Brown)],
            pits: vec![pit(-5.0, 5.0, SoilColor::Brown)],
        }
    }

    /// Three piles, one pit
    pub fn level_two() -> Self {
        Self {
            objective: "Clear all three piles!".into(),
            time_limit: 90.0,
            target_count: 85,
            piles: vec![
                pile(5.0, 5.0, 30, SoilColor::Brown),
                pile(5.0, -5.0, 30, SoilColor::Brown),
                pile(10.0, 0.0, 30, SoilColor::Brown),
            ],
            pits: vec![pit(-5.0, 0.0, SoilColor::Brown)],
        }
    }

    /// Sort five colors into five pits
    pub fn level_three() -> Self {
        Self {
            objective: "Sort by color! Each color goes in its own pit.".into(),
            time_limit: 150.0,
            target_count: 95,
            piles: vec![
                pile(5.0, 5.0, 20, SoilColor::Red),
                pile(5.0, -5.0, 20, SoilColor::Blue),
                pile(10.0, 0.0, 20, SoilColor::Green),
                pile(8.0, 8.0, 20, SoilColor::Yellow),
                pile(8.0, -8.0, 20, SoilColor::Purple),
            ],
            pits: vec![
                pit(-5.0, 5.0, SoilColor::Red),
                pit(-5.0, -5.0, SoilColor::Blue),
                pit(-8.0, 0.0, SoilColor::Green),
                pit(-5.0, 8.0, SoilColor::Yellow),
                pit(-5.0, -8.0, SoilColor::Purple),
            ],
        }
    }

    pub fn total_particles(&self) -> usize {
        self.piles.iter().map(|p| p.count).sum()
    }
}

/// Ordered list of levels; level numbers are 1-based
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSet {
    pub levels: Vec<LevelDef>,
}

impl Default for LevelSet {
    fn default() -> Self {
        Self {
            levels: vec![
                LevelDef::level_one(),
                LevelDef::level_two(),
                LevelDef::level_three(),
            ],
        }
    }
}

impl LevelSet {
    /// Parse a level pack
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let set: LevelSet = serde_json::from_str(json)?;
        if set.levels.is_empty() {
            return Err(ConfigError::EmptyLevelSet);
        }
        for level in &set.levels {
            if !(level.time_limit > 0.0) {
                return Err(ConfigError::OutOfRange {
                    field: "time_limit",
                    value: level.time_limit as f64,
                    expected: "> 0.0",
                });
            }
        }
        log::info!("Loaded level set with {} levels", set.levels.len());
        Ok(set)
    }

    /// Layout for a level number; numbers past the end replay the first layout
    pub fn get(&self, level: u32) -> Option<&LevelDef> {
        level
            .checked_sub(1)
            .and_then(|i| self.levels.get(i as usize))
            .or_else(|| self.levels.first())
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Current phase of a level run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelPhase {
    Playing,
    Complete,
    Failed(FailReason),
}

/// Runs one level at a time
#[derive(Debug, Clone)]
pub struct LevelController {
    pub levels: LevelSet,
    pub world: SoilWorld,
    pub excavator: Excavator,
    pub roads: RoadNetwork,
    level: u32,
    phase: LevelPhase,
    time_left: f32,
    target_count: usize,
    rng: Pcg32,
    events: Vec<GameEvent>,
}

impl LevelController {
    /// Start at level 1 with the built-in levels
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, Tuning::default(), LevelSet::default())
    }

    pub fn with_config(seed: u64, tuning: Tuning, levels: LevelSet) -> Self {
        let mut controller = Self {
            excavator: Excavator::from_tuning(&tuning),
            world: SoilWorld::with_tuning(seed, tuning),
            levels,
            roads: RoadNetwork::default(),
            level: 1,
            phase: LevelPhase::Playing,
            time_left: 0.0,
            target_count: 0,
            // Separate stream so excavator sounds don't shift the soil RNG
            rng: Pcg32::seed_from_u64(seed ^ 0x9e37_79b9_7f4a_7c15),
            events: Vec::new(),
        };
        controller.load_level(1);
        controller
    }

    /// Tear down the current level and build level `level`
    pub fn load_level(&mut self, level: u32) {
        let def = self
            .levels
            .get(level)
            .cloned()
            .unwrap_or_else(LevelDef::level_one);

        self.level = level;
        self.phase = LevelPhase::Playing;
        self.time_left = def.time_limit;
        self.target_count = def.target_count;
        self.events.clear();

        self.world.clear();
        self.excavator.reset_base();

        for p in &def.piles {
            self.world.spawn_pile(p.x, p.z, p.count, p.color);
        }
        for p in &def.pits {
            self.world.spawn_zone(p.x, p.z, p.color);
        }

        log::info!(
            "Level {}: {} ({} particles, target {}, {}s)",
            level,
            def.objective,
            def.total_particles(),
            def.target_count,
            def.time_limit
        );
    }

    pub fn restart(&mut self) {
        self.load_level(self.level);
    }

    pub fn next_level(&mut self) {
        self.load_level(self.level + 1);
    }

    /// Advance one frame. Does nothing once the level is won or lost.
    pub fn update(&mut self, controls: &ExcavatorControls, dt: f32) {
        if self.phase != LevelPhase::Playing {
            return;
        }

        self.excavator.update(controls, dt, &mut self.rng, &mut self.events);
        let effector = self.excavator.effector();
        step(&mut self.world, &effector, dt);
        self.events.extend(self.world.drain_events());

        self.tick_timer(dt);
        if self.time_left <= 0.0 {
            self.time_left = 0.0;
            self.fail(FailReason::TimeUp);
            return;
        }

        if self.world.detect_failure() {
            self.fail(FailReason::WrongColor);
            return;
        }

        let base = self.excavator.position;
        if !self.roads.is_on_road(base.x, base.z) {
            self.fail(FailReason::OffRoad);
            return;
        }

        if self.world.count_correct() >= self.target_count {
            self.excavator.idle_engine(&mut self.events);
            self.phase = LevelPhase::Complete;
            log::info!("Level {} complete!", self.level);
            self.events.push(GameEvent::LevelComplete { level: self.level });
        }
    }

    fn tick_timer(&mut self, dt: f32) {
        let prev = self.seconds_left();
        self.time_left -= dt;
        let curr = self.seconds_left();

        if curr != prev && curr > 0 && curr <= COUNTDOWN_SECONDS {
            self.events.push(GameEvent::Countdown { seconds_left: curr });
        }
    }

    fn fail(&mut self, reason: FailReason) {
        self.excavator.idle_engine(&mut self.events);
        self.phase = LevelPhase::Failed(reason);
        log::info!("Level {} failed: {}", self.level, reason.message());
        self.events.push(GameEvent::LevelFailed {
            level: self.level,
            reason,
        });
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn phase(&self) -> LevelPhase {
        self.phase
    }

    pub fn objective(&self) -> &str {
        self.levels
            .get(self.level)
            .map(|def| def.objective.as_str())
            .unwrap_or_default()
    }

    pub fn target_count(&self) -> usize {
        self.target_count
    }

    pub fn time_left(&self) -> f32 {
        self.time_left
    }

    /// Whole seconds shown on the timer
    pub fn seconds_left(&self) -> u32 {
        self.time_left.max(0.0).ceil() as u32
    }

    /// Take this frame's notifications
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
