//! Layered force and torque accumulation
//!
//! Every tile effect the hull touches this frame contributes additively to
//! one net (force, torque) pair; nothing is normalized or capped before it
//! reaches the integrator. The only override rules are the thrust gates
//! (`ThrustersOff` beats everything, `StrongerThrusters` beats
//! `WeakerThrusters`).

use glam::Vec2;

use super::body::PlayerBody;
use super::collision::Coverage;
use super::grid::TileKind;
use crate::consts::{
    DRAG_COEFF, DRAG_TORQUE_COEFF, FIELD_FORCE, FIELD_TORQUE, THRUST_FORCE, THRUST_TORQUE,
};
use crate::heading;

/// Does each thruster fire this frame? Operator input or a `ThrustersOn`
/// tile lights a side; a `ThrustersOff` tile suppresses both. Returned as
/// (left, right); shared by force accumulation, exhaust particles, and the
/// thruster audio channels.
pub fn thruster_firing(cov: &Coverage, body: &PlayerBody) -> (bool, bool) {
    if cov.contains(TileKind::ThrustersOff) {
        return (false, false);
    }
    let forced = cov.contains(TileKind::ThrustersOn);
    (body.left_thruster || forced, body.right_thruster || forced)
}

/// Thrust magnitude multiplier from power tiles. `StrongerThrusters` takes
/// precedence if both are somehow present.
pub fn thrust_power(cov: &Coverage) -> f32 {
    if cov.contains(TileKind::StrongerThrusters) {
        2.0
    } else if cov.contains(TileKind::WeakerThrusters) {
        0.5
    } else {
        1.0
    }
}

/// Net (force, torque) for the frame from coverage, operator input, and the
/// body's current motion.
pub fn accumulate(cov: &Coverage, body: &PlayerBody) -> (Vec2, f32) {
    let mut force = Vec2::ZERO;
    let mut torque = 0.0;

    // Thrusters: each firing side pushes along the heading and twists the
    // body toward the opposite side (right thruster yaws left-positive).
    let (left, right) = thruster_firing(cov, body);
    let power = thrust_power(cov);
    if right {
        force += heading(body.rot) * THRUST_FORCE * power;
        torque += THRUST_TORQUE * power;
    }
    if left {
        force += heading(body.rot) * THRUST_FORCE * power;
        torque -= THRUST_TORQUE * power;
    }

    // Gravity wells: precomputed field force, added verbatim
    force += cov.gravity;

    // Drag damps, boost anti-damps. Both applied as forces proportional to
    // the current motion, not as direct velocity scales.
    if cov.contains(TileKind::Drag) {
        force -= DRAG_COEFF * body.vel;
        torque -= DRAG_TORQUE_COEFF * body.rot_vel;
    }
    if cov.contains(TileKind::Boost) {
        force += DRAG_COEFF * body.vel;
        torque += DRAG_TORQUE_COEFF * body.rot_vel;
    }

    // Directional force tiles, independently additive
    if cov.contains(TileKind::DownForce) {
        force.y -= FIELD_FORCE;
    }
    if cov.contains(TileKind::UpForce) {
        force.y += FIELD_FORCE;
    }
    if cov.contains(TileKind::LeftForce) {
        force.x -= FIELD_FORCE;
    }
    if cov.contains(TileKind::RightForce) {
        force.x += FIELD_FORCE;
    }

    // Torque fields
    if cov.contains(TileKind::ClockwiseTorque) {
        torque -= FIELD_TORQUE;
    }
    if cov.contains(TileKind::CounterClockwiseTorque) {
        torque += FIELD_TORQUE;
    }

    (force, torque)
}
