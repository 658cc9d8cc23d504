//! Player state machine, per-level session state, and frame events

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::audio::{AudioChannel, CHANNEL_COUNT};
use super::body::PlayerBody;
use super::collision::Coverage;
use super::grid::TileGrid;
use crate::level::LevelRecord;

/// Player lifecycle within one level session. Transitions are one-way:
/// `Playing` can become `Exploding` or `Winning`, and both of those only
/// end by signalling a [`Terminal`] to the caller. Nothing returns to
/// `Playing` within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    /// Accepting input, physics active
    Playing,
    /// Hull destroyed; explosion animation running
    Exploding,
    /// Goal reached; coasting to rest
    Winning,
}

/// Caller-visible end-of-session signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    LevelLost,
    LevelWon,
}

/// Visual particle categories (the core spawns them, the renderer owns them)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    ThrusterExhaust,
    ForceSpark,
    Explosion,
}

/// One-shot sound effects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OneShot {
    Explosion,
    Win,
}

/// Side effects of one simulation step, consumed by the presentation
/// layer. Generated fresh each frame, never retained by the core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameEvent {
    ParticleSpawn {
        kind: ParticleKind,
        pos: Vec2,
        vel: Vec2,
        size: f32,
    },
    /// A looping channel changed play state or volume
    AudioCue {
        channel: AudioChannel,
        playing: bool,
        volume: f32,
    },
    /// Stop every looping channel immediately
    HaltAllAudio,
    PlayOneShot(OneShot),
    /// Background music volume hint, 0..=1
    MusicVolume(f32),
    StateChanged {
        from: PlayerState,
        to: PlayerState,
    },
}

/// Mutable state for one level attempt, from spawn to win/lose/abort.
///
/// Owns the grid and body exclusively; the simulation is single-threaded
/// and frame-stepped, so nothing here is shared or locked.
#[derive(Debug, Clone)]
pub struct GameSession {
    pub grid: TileGrid,
    pub body: PlayerBody,
    pub state: PlayerState,
    /// Tile coverage from the most recent sample (shared per-frame cache)
    pub coverage: Coverage,

    /// Elapsed attempt time; only advances while the body is in motion
    pub elapsed: f32,
    /// Best time on record for this level (+inf when never won)
    pub record: f32,

    /// Accumulated explosion animation time
    pub(crate) explosion_timer: f32,
    /// Spawn cadence accumulators for exhaust and force-spark particles
    pub(crate) exhaust_timer: f32,
    pub(crate) spark_timer: f32,

    /// Looping channels currently playing, and the volume last reported
    pub(crate) channel_playing: [bool; CHANNEL_COUNT],
    pub(crate) channel_volume: [f32; CHANNEL_COUNT],

    pub(crate) rng: Pcg32,
}

impl GameSession {
    /// Start a session at a level's spawn pose. The seed drives only
    /// particle cosmetics; identical seeds and inputs replay identically.
    pub fn new(level: &LevelRecord, seed: u64) -> Self {
        log::info!(
            "session start: level '{}', spawn ({}, {}), record {}",
            level.name,
            level.spawn_pos.x,
            level.spawn_pos.y,
            level.record
        );
        Self {
            grid: level.grid.clone(),
            body: PlayerBody::at_spawn(level.spawn_pos, level.spawn_rot),
            state: PlayerState::Playing,
            coverage: Coverage::default(),
            elapsed: 0.0,
            record: level.record,
            explosion_timer: 0.0,
            exhaust_timer: 0.0,
            spark_timer: 0.0,
            channel_playing: [false; CHANNEL_COUNT],
            channel_volume: [0.0; CHANNEL_COUNT],
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Session ended in a new best time?
    pub fn beat_record(&self) -> bool {
        self.state == PlayerState::Winning && self.elapsed < self.record
    }
}
