//! Player progress metadata
//!
//! A tiny binary file of three little-endian `u32` counters: official
//! levels completed (gates sequential unlocks), custom levels in existence,
//! and the next custom level id. Custom ids only ever grow - deleting a
//! level never frees its id, so filenames stay unique.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::level::LevelError;

/// Encoded size of the progress file
pub const PROGRESS_SIZE: usize = 12;

/// Number of official levels shipped with the game
pub const NUM_OFFICIAL_LEVELS: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Progress {
    /// Official levels completed; level `n` unlocks once this reaches `n`
    pub num_completed: u32,
    /// Custom levels currently in existence
    pub num_custom: u32,
    /// Id to hand out for the next created custom level
    pub next_custom_id: u32,
}

impl Progress {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let bytes = std::fs::read(path)?;
        if bytes.len() != PROGRESS_SIZE {
            return Err(LevelError::BadLength {
                expected: PROGRESS_SIZE,
                actual: bytes.len(),
            });
        }
        let word = |i: usize| {
            let mut raw = [0u8; 4];
            raw.copy_from_slice(&bytes[i * 4..i * 4 + 4]);
            u32::from_le_bytes(raw)
        };
        Ok(Self {
            num_completed: word(0),
            num_custom: word(1),
            next_custom_id: word(2),
        })
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), LevelError> {
        let mut bytes = [0u8; PROGRESS_SIZE];
        bytes[0..4].copy_from_slice(&self.num_completed.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.num_custom.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.next_custom_id.to_le_bytes());
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Record a win on an official level. Only beating the frontier level
    /// (the lowest not-yet-completed one) advances the unlock counter;
    /// replaying earlier levels changes nothing. Returns whether a new
    /// level was unlocked.
    pub fn record_official_win(&mut self, level_id: u32) -> bool {
        if level_id == self.num_completed && self.num_completed < NUM_OFFICIAL_LEVELS {
            self.num_completed += 1;
            log::info!("official level {level_id} completed, {} unlocked", self.num_completed);
            true
        } else {
            false
        }
    }

    /// Is this official level playable?
    pub fn is_unlocked(&self, level_id: u32) -> bool {
        level_id <= self.num_completed && level_id < NUM_OFFICIAL_LEVELS
    }

    /// Allocate an id for a newly created custom level
    pub fn allocate_custom_id(&mut self) -> u32 {
        let id = self.next_custom_id;
        self.next_custom_id += 1;
        self.num_custom += 1;
        id
    }

    /// A custom level was deleted
    pub fn remove_custom(&mut self) {
        self.num_custom = self.num_custom.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(tag: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("rolleron_progress_{tag}_{}.dat", std::process::id()))
    }

    #[test]
    fn test_save_load_round_trip() {
        let path = scratch("round_trip");
        let progress = Progress {
            num_completed: 3,
            num_custom: 5,
            next_custom_id: 9,
        };
        progress.save(&path).unwrap();
        let loaded = Progress::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, progress);
    }

    #[test]
    fn test_short_file_rejected() {
        let path = scratch("short");
        std::fs::write(&path, [0u8; 8]).unwrap();
        let err = Progress::load(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(err, LevelError::BadLength { expected: 12, actual: 8 }));
    }

    #[test]
    fn test_sequential_unlock() {
        let mut progress = Progress::default();
        assert!(progress.is_unlocked(0));
        assert!(!progress.is_unlocked(1));

        // Winning the frontier level unlocks the next
        assert!(progress.record_official_win(0));
        assert!(progress.is_unlocked(1));

        // Replaying an already-beaten level changes nothing
        assert!(!progress.record_official_win(0));
        assert_eq!(progress.num_completed, 1);

        // Skipping ahead is not possible
        assert!(!progress.record_official_win(5));
        assert_eq!(progress.num_completed, 1);
    }

    #[test]
    fn test_unlock_counter_caps_at_official_count() {
        let mut progress = Progress {
            num_completed: NUM_OFFICIAL_LEVELS,
            ..Default::default()
        };
        assert!(!progress.record_official_win(NUM_OFFICIAL_LEVELS));
        assert_eq!(progress.num_completed, NUM_OFFICIAL_LEVELS);
    }

    #[test]
    fn test_custom_ids_never_reused() {
        let mut progress = Progress::default();
        let a = progress.allocate_custom_id();
        let b = progress.allocate_custom_id();
        assert_eq!((a, b), (0, 1));
        assert_eq!(progress.num_custom, 2);

        progress.remove_custom();
        assert_eq!(progress.num_custom, 1);
        // The freed slot's id is gone for good
        assert_eq!(progress.allocate_custom_id(), 2);
    }
}
