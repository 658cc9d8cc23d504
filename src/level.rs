//! Level records and the binary level file format
//!
//! A level file is one fixed-size little-endian blob, no version field:
//!
//! | offset | field     | type                          |
//! |--------|-----------|-------------------------------|
//! | 0      | name      | 32 bytes, NUL-terminated text |
//! | 32     | spawn_x   | f32                           |
//! | 36     | spawn_y   | f32                           |
//! | 40     | spawn_rot | f32                           |
//! | 44     | best time | f32 (+inf = never won)        |
//! | 48     | tile grid | 32x48 bytes, row-major        |
//!
//! Encoding and decoding are explicit field-by-field with bounds checks; a
//! tile ordinal outside the enum range is corrupt data, not undefined
//! behavior. Writes are one-shot - a crash mid-write corrupts the record,
//! which is accepted.

use std::fs::OpenOptions;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use glam::Vec2;
use thiserror::Error;

use crate::consts::{MAP_H, MAP_W};
use crate::sim::{PlayerState, TileGrid, TileKind};

/// Encoded size of one level record
pub const RECORD_SIZE: usize = NAME_SIZE + 4 * 4 + MAP_H * MAP_W;

/// Name field width, including the NUL terminator
pub const NAME_SIZE: usize = 32;

const SPAWN_X_OFFSET: usize = 32;
const SPAWN_Y_OFFSET: usize = 36;
const SPAWN_ROT_OFFSET: usize = 40;
const BEST_TIME_OFFSET: usize = 44;
const GRID_OFFSET: usize = 48;

/// Level file failures. Out-of-bounds grid access is never an error (the
/// boundary reads as `Solid`); everything here is about the file itself.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("file is {actual} bytes, expected {expected}")]
    BadLength { expected: usize, actual: usize },
    #[error("invalid tile ordinal {value} at byte offset {offset}")]
    BadTileKind { offset: usize, value: u8 },
}

/// The persisted unit of level data
#[derive(Debug, Clone, PartialEq)]
pub struct LevelRecord {
    /// Display name, at most 31 bytes
    pub name: String,
    pub spawn_pos: Vec2,
    pub spawn_rot: f32,
    /// Best completion time; `+inf` means the level was never won
    pub record: f32,
    pub grid: TileGrid,
}

impl LevelRecord {
    /// Fresh custom level: unnamed, empty map, spawn in the bottom-left
    /// cell, no record
    pub fn new_custom() -> Self {
        Self {
            name: "Unnamed".to_string(),
            spawn_pos: Vec2::new(0.5, 0.5),
            spawn_rot: 0.0,
            record: f32::INFINITY,
            grid: TileGrid::empty(),
        }
    }

    /// Serialize to the fixed wire layout
    pub fn encode(&self) -> [u8; RECORD_SIZE] {
        let mut buf = [0u8; RECORD_SIZE];

        let name_bytes = self.name.as_bytes();
        let len = name_bytes.len().min(NAME_SIZE - 1);
        buf[..len].copy_from_slice(&name_bytes[..len]);
        // bytes len..NAME_SIZE stay zero: terminator plus zero padding

        buf[SPAWN_X_OFFSET..SPAWN_X_OFFSET + 4].copy_from_slice(&self.spawn_pos.x.to_le_bytes());
        buf[SPAWN_Y_OFFSET..SPAWN_Y_OFFSET + 4].copy_from_slice(&self.spawn_pos.y.to_le_bytes());
        buf[SPAWN_ROT_OFFSET..SPAWN_ROT_OFFSET + 4].copy_from_slice(&self.spawn_rot.to_le_bytes());
        buf[BEST_TIME_OFFSET..BEST_TIME_OFFSET + 4].copy_from_slice(&self.record.to_le_bytes());

        for (row, col, kind) in self.grid.cells() {
            buf[GRID_OFFSET + row * MAP_W + col] = kind.ordinal();
        }

        buf
    }

    /// Deserialize from the fixed wire layout, validating length and every
    /// tile ordinal.
    pub fn decode(bytes: &[u8]) -> Result<Self, LevelError> {
        if bytes.len() != RECORD_SIZE {
            return Err(LevelError::BadLength {
                expected: RECORD_SIZE,
                actual: bytes.len(),
            });
        }

        let name_field = &bytes[..NAME_SIZE];
        let name_len = name_field.iter().position(|&b| b == 0).unwrap_or(NAME_SIZE - 1);
        let name = String::from_utf8_lossy(&name_field[..name_len]).into_owned();

        let read_f32 = |offset: usize| {
            let mut raw = [0u8; 4];
            raw.copy_from_slice(&bytes[offset..offset + 4]);
            f32::from_le_bytes(raw)
        };

        let mut grid = TileGrid::empty();
        for row in 0..MAP_H {
            for col in 0..MAP_W {
                let offset = GRID_OFFSET + row * MAP_W + col;
                let value = bytes[offset];
                let kind = TileKind::from_ordinal(value)
                    .ok_or(LevelError::BadTileKind { offset, value })?;
                grid.set(row, col, kind);
            }
        }

        Ok(Self {
            name,
            spawn_pos: Vec2::new(read_f32(SPAWN_X_OFFSET), read_f32(SPAWN_Y_OFFSET)),
            spawn_rot: read_f32(SPAWN_ROT_OFFSET),
            record: read_f32(BEST_TIME_OFFSET),
            grid,
        })
    }

    /// Read a record from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let record = Self::decode(&bytes)?;
        log::debug!("loaded level '{}' from {}", record.name, path.display());
        Ok(record)
    }

    /// Write the full record to disk, replacing any existing file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), LevelError> {
        std::fs::write(path.as_ref(), self.encode())?;
        log::debug!("saved level '{}' to {}", self.name, path.as_ref().display());
        Ok(())
    }

    /// Editor save: writes this record, but if the spawn pose or the tile
    /// grid differ from what is stored on disk, the best time no longer
    /// means anything and resets to unset. Renames alone keep the record.
    pub fn save_edited(&self, path: impl AsRef<Path>) -> Result<(), LevelError> {
        let path = path.as_ref();
        let mut out = self.clone();
        match std::fs::read(path) {
            Ok(bytes) => {
                let old = Self::decode(&bytes)?;
                out.record = if old.spawn_pos != self.spawn_pos
                    || old.spawn_rot != self.spawn_rot
                    || old.grid != self.grid
                {
                    f32::INFINITY
                } else {
                    old.record
                };
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        out.save(path)
    }
}

/// Rewrite the stored best time in place if the session ended in `Winning`
/// and beat it. `+inf` compares greater than any finite time, so a first
/// win always takes the record. Returns whether the file changed.
pub fn maybe_update_record(
    path: impl AsRef<Path>,
    state: PlayerState,
    elapsed: f32,
) -> Result<bool, LevelError> {
    if state != PlayerState::Winning {
        return Ok(false);
    }

    let mut file = OpenOptions::new().read(true).write(true).open(path.as_ref())?;
    file.seek(SeekFrom::Start(BEST_TIME_OFFSET as u64))?;
    let mut raw = [0u8; 4];
    file.read_exact(&mut raw)?;
    let stored = f32::from_le_bytes(raw);

    if elapsed >= stored {
        return Ok(false);
    }

    file.seek(SeekFrom::Start(BEST_TIME_OFFSET as u64))?;
    file.write_all(&elapsed.to_le_bytes())?;
    log::info!("new record {:.1}s (was {:.1}s)", elapsed, stored);
    Ok(true)
}
