//! Player rigid body and numeric integration
//!
//! Semi-implicit Euler: velocity is updated from force first, then position
//! from the updated velocity. More stable than naive explicit Euler at the
//! frame rates the game runs at.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{MASS, MOMENT_OF_INERTIA};

/// Player kinematic state plus operator thruster flags.
///
/// Positions and velocities are in tile units; `rot` is radians with 0
/// facing +x. The thruster flags are operator input, distinct from thrust
/// forced by `ThrustersOn` tiles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerBody {
    pub pos: Vec2,
    pub vel: Vec2,
    pub rot: f32,
    pub rot_vel: f32,
    pub left_thruster: bool,
    pub right_thruster: bool,
}

impl PlayerBody {
    /// Body at rest at a spawn pose
    pub fn at_spawn(pos: Vec2, rot: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            rot,
            rot_vel: 0.0,
            left_thruster: false,
            right_thruster: false,
        }
    }

    /// Advance one step under a net force and torque.
    ///
    /// `dt` is expected in `(0, ~0.1]` seconds; the caller's loop clamps
    /// frame time, this function does not. No velocity or position clamping
    /// is performed - unbounded values are a valid state.
    pub fn integrate(&mut self, force: Vec2, torque: f32, dt: f32) {
        self.vel += force / MASS * dt;
        self.pos += self.vel * dt;
        self.rot_vel += torque / MOMENT_OF_INERTIA * dt;
        self.rot += self.rot_vel * dt;
    }

    /// True while any component of motion is nonzero (drives the level timer)
    #[inline]
    pub fn in_motion(&self) -> bool {
        self.vel != Vec2::ZERO || self.rot_vel != 0.0
    }

    /// Linear speed
    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}
