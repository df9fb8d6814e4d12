//! Dig Sort entry point
//!
//! Native builds run headless: a scripted operator plays a level at the fixed
//! timestep and the outcome is logged. Usage: `dig-sort [seed] [level] [tuning.json]`.

use dig_sort::audio::{LogSink, play_events};
use dig_sort::consts::SIM_DT;
use dig_sort::render::RenderSnapshot;
use dig_sort::sim::{GameEvent, SoilColor};
use dig_sort::{ExcavatorControls, LevelController, LevelPhase, LevelSet, Tuning, ground_point};
use glam::Vec2;

/// Upper bound on frames per run (a few minutes of game time)
const MAX_FRAMES: u32 = 20_000;

/// What the scripted operator is doing
#[derive(Debug, Clone, Copy, PartialEq)]
enum Stage {
    AimAtPile,
    Lower,
    Bite { frames: u32 },
    Raise,
    AimAtPit,
    Dump { frames: u32 },
}

/// Swings the arm between one pile and its pit without driving
struct Operator {
    stage: Stage,
    pile: Vec2,
    pit: Vec2,
}

impl Operator {
    fn for_level(game: &LevelController, color: SoilColor) -> Option<Self> {
        let pit = game.world.zones().iter().find(|z| z.color == color)?.center;
        let pile = game
            .world
            .particles()
            .iter()
            .filter(|p| p.color == color && !game.world.zones().iter().any(|z| z.contains(p.position)))
            .map(|p| ground_point(p.position))
            .next()?;
        Some(Self {
            stage: Stage::AimAtPile,
            pile,
            pit,
        })
    }

    fn controls(&mut self, game: &LevelController) -> ExcavatorControls {
        let bucket = game.excavator.bucket_world_position();
        let base = game.excavator.position;
        let bearing = |p: Vec2| (p.x - base.x).atan2(p.y - base.z);
        let current = bearing(ground_point(bucket));
        let aim = |target: Vec2, scoop: bool| {
            let diff = bearing(target) - current;
            ExcavatorControls {
                swing_left: diff > 0.02,
                swing_right: diff < -0.02,
                scoop,
                ..Default::default()
            }
        };

        let (controls, next) = match self.stage {
            Stage::AimAtPile => {
                let c = aim(self.pile, false);
                let done = !c.swing_left && !c.swing_right;
                (c, done.then_some(Stage::Lower))
            }
            Stage::Lower => {
                let low = bucket.y < 0.35 || game.excavator.boom_pitch >= dig_sort::excavator::BOOM_MAX;
                (
                    ExcavatorControls {
                        boom_down: !low,
                        ..Default::default()
                    },
                    low.then_some(Stage::Bite { frames: 0 }),
                )
            }
            Stage::Bite { frames } => (
                ExcavatorControls {
                    scoop: true,
                    ..Default::default()
                },
                Some(if frames >= 30 {
                    Stage::Raise
                } else {
                    Stage::Bite { frames: frames + 1 }
                }),
            ),
            Stage::Raise => {
                let high = bucket.y > 2.5 || game.excavator.boom_pitch <= 0.0;
                (
                    ExcavatorControls {
                        boom_up: !high,
                        scoop: true,
                        ..Default::default()
                    },
                    high.then_some(Stage::AimAtPit),
                )
            }
            Stage::AimAtPit => {
                let c = aim(self.pit, true);
                let done = !c.swing_left && !c.swing_right;
                (c, done.then_some(Stage::Dump { frames: 0 }))
            }
            Stage::Dump { frames } => (
                ExcavatorControls::default(),
                Some(if frames >= 60 {
                    Stage::AimAtPile
                } else {
                    Stage::Dump { frames: frames + 1 }
                }),
            ),
        };

        if let Some(next) = next {
            self.stage = next;
        }
        controls
    }
}

fn parse_args() -> Result<(u64, u32, Tuning), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let seed = args.first().map(|s| s.parse::<u64>()).transpose()?.unwrap_or(12345);
    let level = args.get(1).map(|s| s.parse::<u32>()).transpose()?.unwrap_or(1);
    let tuning = match args.get(2) {
        Some(path) => Tuning::from_json(&std::fs::read_to_string(path)?)?,
        None => Tuning::default(),
    };
    Ok((seed, level, tuning))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    log::info!("Dig Sort (headless) starting...");

    let (seed, level, tuning) = parse_args()?;
    let mut game = LevelController::with_config(seed, tuning, LevelSet::default());
    game.load_level(level);
    log::info!("Objective: {}", game.objective());

    let Some(mut operator) = Operator::for_level(&game, SoilColor::Brown) else {
        log::warn!("Level {} has no brown pile and pit to demo", level);
        return Ok(());
    };

    let mut sink = LogSink::new();
    let mut digs = 0u32;
    for frame in 0..MAX_FRAMES {
        let controls = operator.controls(&game);
        game.update(&controls, SIM_DT);

        let events = game.drain_events();
        digs += events
            .iter()
            .filter(|e| matches!(e, GameEvent::Dig(_)))
            .count() as u32;
        play_events(&mut sink, &events);

        if frame % 250 == 0 {
            log::info!(
                "t={:>3}s placed {}/{} carrying {} debris {}",
                game.seconds_left(),
                game.world.count_correct(),
                game.target_count(),
                game.world.carried_count(),
                game.world.effects.len()
            );
        }

        if game.phase() != LevelPhase::Playing {
            break;
        }
    }

    let snapshot = RenderSnapshot::capture(&game.world);
    log::info!(
        "Final frame: {} soil instances ({} bytes), {} pits",
        snapshot.soil.len(),
        snapshot.soil_bytes().len(),
        snapshot.pits.len()
    );

    match game.phase() {
        LevelPhase::Complete => println!("Level {} complete ({} loud digs)", game.level(), digs),
        LevelPhase::Failed(reason) => println!("Level {} failed: {}", game.level(), reason.message()),
        LevelPhase::Playing => println!(
            "Stopped after {} frames with {}/{} placed",
            MAX_FRAMES,
            game.world.count_correct(),
            game.target_count()
        ),
    }
    Ok(())
}
