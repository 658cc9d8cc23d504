//! Tile kinds and the level tile grid
//!
//! The grid is a fixed 48x32 array of tile kinds. Anything outside the grid
//! is treated as `Solid` for collision purposes - the boundary wall is
//! implicit, never stored.

use serde::{Deserialize, Serialize};

use crate::consts::{MAP_H, MAP_W};

/// One cell's behavior. The discriminant order is the on-disk ordinal and
/// must not be rearranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum TileKind {
    #[default]
    None,
    Solid,
    Win,
    Gravity,
    AntiGravity,
    Drag,
    Boost,
    ThrustersOn,
    ThrustersOff,
    StrongerThrusters,
    WeakerThrusters,
    DownForce,
    UpForce,
    LeftForce,
    RightForce,
    CounterClockwiseTorque,
    ClockwiseTorque,
}

/// Number of tile kinds (valid ordinals are 0..COUNT)
pub const TILE_KIND_COUNT: u8 = 17;

impl TileKind {
    /// Wire-format ordinal
    #[inline]
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// Decode a wire-format ordinal; `None` for out-of-range values
    pub fn from_ordinal(value: u8) -> Option<Self> {
        Some(match value {
            0 => Self::None,
            1 => Self::Solid,
            2 => Self::Win,
            3 => Self::Gravity,
            4 => Self::AntiGravity,
            5 => Self::Drag,
            6 => Self::Boost,
            7 => Self::ThrustersOn,
            8 => Self::ThrustersOff,
            9 => Self::StrongerThrusters,
            10 => Self::WeakerThrusters,
            11 => Self::DownForce,
            12 => Self::UpForce,
            13 => Self::LeftForce,
            14 => Self::RightForce,
            15 => Self::CounterClockwiseTorque,
            16 => Self::ClockwiseTorque,
            _ => return None,
        })
    }

    /// Touching this tile destroys the player (and culls particles)
    #[inline]
    pub fn is_lethal(self) -> bool {
        matches!(self, TileKind::Solid | TileKind::Gravity | TileKind::AntiGravity)
    }

    /// Directional push or torque field tile
    #[inline]
    pub fn is_force_field(self) -> bool {
        matches!(
            self,
            TileKind::DownForce
                | TileKind::UpForce
                | TileKind::LeftForce
                | TileKind::RightForce
                | TileKind::CounterClockwiseTorque
                | TileKind::ClockwiseTorque
        )
    }
}

/// Fixed-size tile grid, row-major
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    #[serde(with = "serde_rows")]
    tiles: [[TileKind; MAP_W]; MAP_H],
}

impl Default for TileGrid {
    fn default() -> Self {
        Self::empty()
    }
}

impl TileGrid {
    /// All-`None` grid
    pub fn empty() -> Self {
        Self {
            tiles: [[TileKind::None; MAP_W]; MAP_H],
        }
    }

    /// Tile at (row, col). Out-of-range indices read as `Solid`.
    #[inline]
    pub fn get(&self, row: i32, col: i32) -> TileKind {
        if row >= 0 && (row as usize) < MAP_H && col >= 0 && (col as usize) < MAP_W {
            self.tiles[row as usize][col as usize]
        } else {
            TileKind::Solid
        }
    }

    /// Tile at (row, col) without the boundary rule; `None` if out of range.
    /// Used by the gravity-field scan, which clips to bounds instead.
    #[inline]
    pub fn get_in_bounds(&self, row: i32, col: i32) -> Option<TileKind> {
        if row >= 0 && (row as usize) < MAP_H && col >= 0 && (col as usize) < MAP_W {
            Some(self.tiles[row as usize][col as usize])
        } else {
            None
        }
    }

    /// Tile under a world-space point (coordinates floored to a cell).
    /// Out-of-bounds points sample as `Solid` - this is the boundary wall.
    #[inline]
    pub fn sample(&self, x: f32, y: f32) -> TileKind {
        self.get(y.floor() as i32, x.floor() as i32)
    }

    /// Place a tile. Out-of-range placement is ignored.
    pub fn set(&mut self, row: usize, col: usize, kind: TileKind) {
        if row < MAP_H && col < MAP_W {
            self.tiles[row][col] = kind;
        }
    }

    /// Row-major iteration over all cells
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, TileKind)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .flat_map(|(row, r)| r.iter().enumerate().map(move |(col, &t)| (row, col, t)))
    }
}

/// Serde helper: serialize the 2D array as nested sequences (arrays larger
/// than 32 have no built-in impls)
mod serde_rows {
    use super::*;
    use serde::de::Error;
    use serde::ser::SerializeSeq;

    pub fn serialize<S: serde::Serializer>(
        tiles: &[[TileKind; MAP_W]; MAP_H],
        ser: S,
    ) -> Result<S::Ok, S::Error> {
        let mut seq = ser.serialize_seq(Some(MAP_H * MAP_W))?;
        for row in tiles {
            for tile in row {
                seq.serialize_element(tile)?;
            }
        }
        seq.end()
    }

    pub fn deserialize<'de, D: serde::Deserializer<'de>>(
        de: D,
    ) -> Result<[[TileKind; MAP_W]; MAP_H], D::Error> {
        let flat: Vec<TileKind> = Vec::deserialize(de)?;
        if flat.len() != MAP_H * MAP_W {
            return Err(D::Error::invalid_length(flat.len(), &"48*32 tiles"));
        }
        let mut tiles = [[TileKind::None; MAP_W]; MAP_H];
        for (i, t) in flat.into_iter().enumerate() {
            tiles[i / MAP_W][i % MAP_W] = t;
        }
        Ok(tiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinal_round_trip() {
        for ord in 0..TILE_KIND_COUNT {
            let kind = TileKind::from_ordinal(ord).unwrap();
            assert_eq!(kind.ordinal(), ord);
        }
        assert_eq!(TileKind::from_ordinal(TILE_KIND_COUNT), None);
        assert_eq!(TileKind::from_ordinal(255), None);
    }

    #[test]
    fn test_out_of_bounds_reads_solid() {
        let grid = TileGrid::empty();
        assert_eq!(grid.get(-1, 0), TileKind::Solid);
        assert_eq!(grid.get(0, -1), TileKind::Solid);
        assert_eq!(grid.get(MAP_H as i32, 0), TileKind::Solid);
        assert_eq!(grid.get(0, MAP_W as i32), TileKind::Solid);
        assert_eq!(grid.get(0, 0), TileKind::None);
    }

    #[test]
    fn test_sample_floors_world_coords() {
        let mut grid = TileGrid::empty();
        grid.set(16, 24, TileKind::Win);
        assert_eq!(grid.sample(24.9, 16.1), TileKind::Win);
        assert_eq!(grid.sample(24.0, 16.0), TileKind::Win);
        assert_eq!(grid.sample(25.0, 16.5), TileKind::None);
        // Negative fractional coords floor past the edge
        assert_eq!(grid.sample(-0.1, 5.0), TileKind::Solid);
    }

    #[test]
    fn test_lethal_classification() {
        assert!(TileKind::Solid.is_lethal());
        assert!(TileKind::Gravity.is_lethal());
        assert!(TileKind::AntiGravity.is_lethal());
        assert!(!TileKind::Win.is_lethal());
        assert!(!TileKind::Drag.is_lethal());
    }
}
