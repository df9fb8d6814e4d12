//! Sound cues
//!
//! Synthesis lives in the platform layer. The core only decides which cue to
//! play; a [`SoundSink`] turns cues into noise.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Bucket bit into soil
    Dig,
    /// Tracks engaged
    EngineRev,
    /// Tracks released
    EngineIdle,
    /// Arm cylinders moving
    Hydraulic,
    /// One of the last ten seconds ticked away
    CountdownTick,
    /// Level cleared
    Success,
    /// Level lost
    Failure,
}

impl SoundEffect {
    /// Cue for a simulation event, if it makes a sound
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Dig(_) => Some(SoundEffect::Dig),
            GameEvent::EngineRev => Some(SoundEffect::EngineRev),
            GameEvent::EngineIdle => Some(SoundEffect::EngineIdle),
            GameEvent::Hydraulic => Some(SoundEffect::Hydraulic),
            GameEvent::Countdown { .. } => Some(SoundEffect::CountdownTick),
            GameEvent::LevelComplete { .. } => Some(SoundEffect::Success),
            GameEvent::LevelFailed { .. } => Some(SoundEffect::Failure),
        }
    }
}

/// Anything that can play a cue
pub trait SoundSink {
    fn play(&mut self, effect: SoundEffect);
}

/// Play every cue carried by `events`
pub fn play_events<S: SoundSink + ?Sized>(sink: &mut S, events: &[GameEvent]) {
    for effect in events.iter().filter_map(SoundEffect::for_event) {
        sink.play(effect);
    }
}

/// Sink that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogSink {
    muted: bool,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }
}

impl SoundSink for LogSink {
    fn play(&mut self, effect: SoundEffect) {
        if !self.muted {
            log::trace!("sfx: {:?}", effect);
        }
    }
}

/// Sink that records cues, useful for tests and replays
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub played: Vec<SoundEffect>,
}

impl SoundSink for RecordingSink {
    fn play(&mut self, effect: SoundEffect) {
        self.played.push(effect);
    }
}
