//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame-stepped only, no hidden clocks
//! - Seeded RNG only (particle cosmetics)
//! - Coverage sampled once per frame and shared, never recomputed ad hoc
//! - No rendering, audio-device, or platform dependencies

pub mod audio;
pub mod body;
pub mod collision;
pub mod forces;
pub mod grid;
pub mod state;
pub mod tick;

pub use audio::{AudioChannel, ChannelState, desired_channels};
pub use body::PlayerBody;
pub use collision::{Coverage, SAMPLE_OFFSETS};
pub use forces::{accumulate, thrust_power, thruster_firing};
pub use grid::{TILE_KIND_COUNT, TileGrid, TileKind};
pub use state::{FrameEvent, GameSession, OneShot, ParticleKind, PlayerState, Terminal};
pub use tick::{FrameOutput, TickInput, tick};
