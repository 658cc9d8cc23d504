//! Per-frame collision sampling against the tile grid
//!
//! The player's hull is approximated by six fixed body-relative sample
//! points. Each point maps to one grid cell; the set of tile kinds touched
//! this frame (plus the summed long-range gravity force) is the
//! [`Coverage`], recomputed once per frame and shared by force
//! accumulation, the state machine, and audio volume logic - never
//! recomputed ad hoc.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::PlayerBody;
use super::grid::{TileGrid, TileKind};
use crate::consts::{GRAVITY_RADIUS, GRAVITY_STRENGTH};
use crate::rotate_offset;

/// Local-frame hull sample offsets: nose, tail, rear thruster mounts,
/// front canard mounts. Tuned to the ship sprite's silhouette.
pub const SAMPLE_OFFSETS: [Vec2; 6] = [
    Vec2::new(0.375, 0.0),           // nose
    Vec2::new(-11.0 / 128.0, 0.0),   // tail
    Vec2::new(-0.125, 0.25),         // rear left thruster
    Vec2::new(-0.125, -0.25),        // rear right thruster
    Vec2::new(0.125, 27.0 / 128.0),  // front left canard
    Vec2::new(0.125, -27.0 / 128.0), // front right canard
];

/// Which tile kinds the hull touches this frame, plus the summed
/// gravity-well force acting on the player.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coverage {
    /// Membership bitset keyed by tile-kind ordinal
    bits: u32,
    /// Net long-range gravity/anti-gravity force
    pub gravity: Vec2,
}

impl Coverage {
    /// Sample the grid at the body's current pose.
    ///
    /// Out-of-bounds sample points contribute `Solid` unconditionally -
    /// this is how the boundary wall is enforced.
    pub fn sample(grid: &TileGrid, body: &PlayerBody) -> Self {
        let mut cov = Self::default();

        for offset in SAMPLE_OFFSETS {
            let point = body.pos + rotate_offset(offset, body.rot);
            cov.insert(grid.sample(point.x, point.y));
        }

        cov.gravity = gravity_field(grid, body.pos);
        cov
    }

    #[inline]
    fn insert(&mut self, kind: TileKind) {
        self.bits |= 1 << kind.ordinal();
    }

    /// Is this tile kind touched by any sample point?
    #[inline]
    pub fn contains(&self, kind: TileKind) -> bool {
        self.bits & (1 << kind.ordinal()) != 0
    }

    /// Hull touches a wall or gravity-well core
    #[inline]
    pub fn any_lethal(&self) -> bool {
        self.contains(TileKind::Solid)
            || self.contains(TileKind::Gravity)
            || self.contains(TileKind::AntiGravity)
    }

    /// Hull touches any directional-force or torque tile
    #[inline]
    pub fn any_force_field(&self) -> bool {
        self.contains(TileKind::DownForce)
            || self.contains(TileKind::UpForce)
            || self.contains(TileKind::LeftForce)
            || self.contains(TileKind::RightForce)
            || self.contains(TileKind::CounterClockwiseTorque)
            || self.contains(TileKind::ClockwiseTorque)
    }
}

/// Sum the inverse-square pull of every gravity/anti-gravity cell within
/// an 8-tile radius of `pos` (17x17 cell window clipped to bounds,
/// Euclidean cutoff at radius²).
fn gravity_field(grid: &TileGrid, pos: Vec2) -> Vec2 {
    let mut field = Vec2::ZERO;
    let radius_sq = GRAVITY_RADIUS * GRAVITY_RADIUS;

    let row_min = (pos.y - GRAVITY_RADIUS).floor() as i32;
    let row_max = (pos.y + GRAVITY_RADIUS).floor() as i32;
    let col_min = (pos.x - GRAVITY_RADIUS).floor() as i32;
    let col_max = (pos.x + GRAVITY_RADIUS).floor() as i32;

    for row in row_min..=row_max {
        for col in col_min..=col_max {
            let kind = match grid.get_in_bounds(row, col) {
                Some(k @ (TileKind::Gravity | TileKind::AntiGravity)) => k,
                _ => continue,
            };
            let center = Vec2::new(col as f32 + 0.5, row as f32 + 0.5);
            let delta = center - pos;
            let dist_sq = delta.length_squared();
            if dist_sq > radius_sq {
                continue;
            }
            let dist = dist_sq.sqrt();
            let sign = if kind == TileKind::AntiGravity { -1.0 } else { 1.0 };
            // attractive inverse-square: 3 * delta / dist^3
            field += delta / dist * (GRAVITY_STRENGTH / dist_sq) * sign;
        }
    }

    field
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn body_at(x: f32, y: f32, rot: f32) -> PlayerBody {
        PlayerBody::at_spawn(Vec2::new(x, y), rot)
    }

    #[test]
    fn test_empty_grid_center_coverage() {
        let grid = TileGrid::empty();
        let cov = Coverage::sample(&grid, &body_at(24.0, 16.0, 0.0));
        assert!(!cov.any_lethal());
        assert!(!cov.contains(TileKind::Win));
        assert_eq!(cov.gravity, Vec2::ZERO);
    }

    #[test]
    fn test_out_of_bounds_sample_forces_solid() {
        let grid = TileGrid::empty();
        // Nose pokes past the left edge; everything just inside is None
        let cov = Coverage::sample(&grid, &body_at(0.2, 16.5, PI));
        assert!(cov.contains(TileKind::Solid));
    }

    #[test]
    fn test_nose_reaches_ahead() {
        let mut grid = TileGrid::empty();
        grid.set(16, 25, TileKind::Win);
        // Nose offset is 0.375 tiles: from x=24.7 facing +x it crosses into col 25
        let cov = Coverage::sample(&grid, &body_at(24.7, 16.5, 0.0));
        assert!(cov.contains(TileKind::Win));
        // From further left it does not reach
        let cov = Coverage::sample(&grid, &body_at(24.1, 16.5, 0.0));
        assert!(!cov.contains(TileKind::Win));
    }

    #[test]
    fn test_rotation_swings_sample_points() {
        let mut grid = TileGrid::empty();
        grid.set(17, 24, TileKind::Drag);
        // Facing +y, the nose points into row 17
        let cov = Coverage::sample(&grid, &body_at(24.5, 16.7, FRAC_PI_2));
        assert!(cov.contains(TileKind::Drag));
        // Facing +x it stays in row 16
        let cov = Coverage::sample(&grid, &body_at(24.5, 16.7, 0.0));
        assert!(!cov.contains(TileKind::Drag));
    }

    #[test]
    fn test_gravity_field_attracts_toward_cell() {
        let mut grid = TileGrid::empty();
        grid.set(16, 28, TileKind::Gravity);
        let cov = Coverage::sample(&grid, &body_at(24.0, 16.5, 0.0));
        // Cell center (28.5, 16.5) is 4.5 tiles to the +x side
        assert!(cov.gravity.x > 0.0);
        assert!(cov.gravity.y.abs() < 1e-6);
        let dist: f32 = 4.5;
        let expected = GRAVITY_STRENGTH / (dist * dist);
        assert!((cov.gravity.x - expected).abs() < 1e-5);
    }

    #[test]
    fn test_anti_gravity_repels() {
        let mut grid = TileGrid::empty();
        grid.set(16, 28, TileKind::AntiGravity);
        let cov = Coverage::sample(&grid, &body_at(24.0, 16.5, 0.0));
        assert!(cov.gravity.x < 0.0);
    }

    #[test]
    fn test_gravity_cutoff_radius() {
        let mut grid = TileGrid::empty();
        // Cell center (40.5, 16.5) is 8.5 tiles from the player: inside the
        // square scan window but past the Euclidean cutoff
        grid.set(16, 40, TileKind::Gravity);
        let cov = Coverage::sample(&grid, &body_at(32.0, 16.5, 0.0));
        assert_eq!(cov.gravity, Vec2::ZERO);
    }

    #[test]
    fn test_opposed_wells_cancel() {
        let mut grid = TileGrid::empty();
        grid.set(16, 20, TileKind::Gravity);
        grid.set(16, 28, TileKind::Gravity);
        let cov = Coverage::sample(&grid, &body_at(24.5, 16.5, 0.0));
        assert!(cov.gravity.length() < 1e-5);
    }
}
