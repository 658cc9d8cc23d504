//! Rolleron - a tile-field thruster arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (rigid body, tile effects, state machine)
//! - `level`: Binary level file format and best-time records
//! - `progress`: Level-unlock and custom-level counters
//! - `settings`: User preferences
//!
//! The simulation core is presentation-free: one [`sim::tick`] call per frame
//! consumes operator input and yields the updated player state plus a list of
//! side-effect events (particle spawns, audio cues, terminal signals) for a
//! renderer/mixer to consume.

pub mod level;
pub mod progress;
pub mod settings;
pub mod sim;

pub use level::{LevelError, LevelRecord};
pub use progress::Progress;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Map dimensions in tiles
    pub const MAP_W: usize = 48;
    pub const MAP_H: usize = 32;

    /// Player mass (translational inertia)
    pub const MASS: f32 = 1.0;
    /// Moment of inertia. Deliberately low so rotational control feels
    /// responsive relative to translation.
    pub const MOMENT_OF_INERTIA: f32 = 0.05;

    /// Thrust force per firing thruster at normal power
    pub const THRUST_FORCE: f32 = 1.0;
    /// Torque contributed by one firing thruster (right positive, left negative)
    pub const THRUST_TORQUE: f32 = 0.25;

    /// Drag/boost force coefficient (per unit velocity)
    pub const DRAG_COEFF: f32 = 0.75;
    /// Drag/boost torque coefficient (per unit angular velocity)
    pub const DRAG_TORQUE_COEFF: f32 = 0.075;

    /// Directional force tile magnitude
    pub const FIELD_FORCE: f32 = 1.75;
    /// Torque field tile magnitude
    pub const FIELD_TORQUE: f32 = 0.2;

    /// Gravity well strength (inverse-square numerator)
    pub const GRAVITY_STRENGTH: f32 = 3.0;
    /// Gravity wells act within this tile radius of the player
    pub const GRAVITY_RADIUS: f32 = 8.0;

    /// Explosion animation length before the level-lost signal
    pub const EXPLOSION_DURATION: f32 = 0.9;

    /// Winning-state velocity decay base (applied as base^dt)
    pub const WIN_VEL_DECAY: f32 = 0.25;
    /// Winning-state angular velocity decay base
    pub const WIN_ROT_DECAY: f32 = 0.025;
    /// Speed and angular speed must both drop below this to finish a win
    pub const WIN_REST_THRESHOLD: f32 = 0.1;

    /// Seconds between thruster/force particle spawns
    pub const PARTICLE_INTERVAL: f32 = 0.025;
    /// Particles in an explosion burst
    pub const EXPLOSION_PARTICLES: usize = 64;
}

/// Rotate a local-frame offset into the world frame (standard 2D rotation)
#[inline]
pub fn rotate_offset(offset: Vec2, rot: f32) -> Vec2 {
    let (sin, cos) = rot.sin_cos();
    Vec2::new(
        offset.x * cos - offset.y * sin,
        offset.x * sin + offset.y * cos,
    )
}

/// Unit heading vector for an orientation angle
#[inline]
pub fn heading(rot: f32) -> Vec2 {
    Vec2::new(rot.cos(), rot.sin())
}
