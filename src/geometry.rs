//! Direction encoding and quarter-turn rotations on the integer grid.
//!
//! All coordinates are `[row, column]`: `IVec2::x` is the row, `IVec2::y` the
//! column. Turning left increments the direction index, turning right
//! decrements it.

use crate::error::{LocalizeError, Result};
use glam::IVec2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four grid headings, stored as its canonical index `0..4`.
///
/// | index | vector    | arrow |
/// |-------|-----------|-------|
/// | 0     | `(1, 0)`  | ↓     |
/// | 1     | `(0, 1)`  | →     |
/// | 2     | `(-1, 0)` | ↑     |
/// | 3     | `(0, -1)` | ←     |
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Direction(u8);

/// The heading every relative frame starts with.
pub const INITIAL_DIRECTION: Direction = Direction(0);

const UNIT_VECTORS: [IVec2; 4] = [IVec2::X, IVec2::Y, IVec2::NEG_X, IVec2::NEG_Y];

impl Direction {
    /// All four headings in index order. Doubles as the 4-neighbourhood.
    pub const ALL: [Direction; 4] = [Direction(0), Direction(1), Direction(2), Direction(3)];

    /// Builds a direction from any integer index, wrapping modulo 4.
    pub fn new(index: i32) -> Self {
        Self(index.rem_euclid(4) as u8)
    }

    /// Canonical index in `0..4`.
    pub fn index(self) -> i32 {
        i32::from(self.0)
    }

    /// Unit vector of this heading.
    pub fn vector(self) -> IVec2 {
        UNIT_VECTORS[usize::from(self.0)]
    }

    /// Heading after a quarter turn to `side`.
    pub fn turned(self, side: Side) -> Self {
        match side {
            Side::Left => Self::new(self.index() + 1),
            Side::Right => Self::new(self.index() - 1),
        }
    }

    /// Sums two headings as rotation counts.
    pub fn combined(self, other: Direction) -> Self {
        Self::new(self.index() + other.index())
    }

    /// Minimal number of quarter turns (0, 1 or 2) to face `other`.
    pub fn turns_to(self, other: Direction) -> u32 {
        let diff = (other.index() - self.index()).rem_euclid(4) as u32;
        diff.min(4 - diff)
    }

    /// Unicode arrow used by the terminal renderer.
    pub fn arrow(self) -> char {
        match self.0 {
            0 => '↓',
            1 => '→',
            2 => '↑',
            _ => '←',
        }
    }
}

impl TryFrom<IVec2> for Direction {
    type Error = LocalizeError;

    fn try_from(vector: IVec2) -> Result<Self> {
        direction_to_index(vector).map(Direction::new)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.arrow())
    }
}

/// Side of a quarter turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl FromStr for Side {
    type Err = LocalizeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(Side::Left),
            "right" => Ok(Side::Right),
            _ => Err(LocalizeError::InvalidArgument(format!(
                "unknown rotation side '{s}', expected left or right"
            ))),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

/// Rotates `vector` by `count` quarter turns towards `side`.
///
/// Any integer count is accepted; it is reduced modulo 4 so that a left turn
/// by `n` equals a right turn by `4 - n`.
pub fn rotate(vector: IVec2, side: Side, count: i32) -> IVec2 {
    let lefts = match side {
        Side::Left => count.rem_euclid(4),
        Side::Right => (-count).rem_euclid(4),
    };
    match lefts {
        0 => vector,
        1 => IVec2::new(-vector.y, vector.x),
        2 => -vector,
        _ => IVec2::new(vector.y, -vector.x),
    }
}

/// Maps an axis-aligned vector to its direction index.
///
/// The vector only has to point along an axis; its length is irrelevant
/// (`(2, 0)` is index 0). Zero and diagonal vectors are rejected.
pub fn direction_to_index(vector: IVec2) -> Result<i32> {
    match (vector.x.signum(), vector.y.signum()) {
        (1, 0) => Ok(0),
        (0, 1) => Ok(1),
        (-1, 0) => Ok(2),
        (0, -1) => Ok(3),
        (0, 0) => Err(LocalizeError::InvalidArgument(
            "direction vector has zero length".into(),
        )),
        _ => Err(LocalizeError::InvalidArgument(format!(
            "({}, {}) is not aligned with a grid axis",
            vector.x, vector.y
        ))),
    }
}

/// Unit vector for a direction index, taken modulo 4.
pub fn index_to_direction(index: i32) -> IVec2 {
    Direction::new(index).vector()
}

/// Converts caller-supplied coordinates into a grid vector.
pub fn vector_from_slice(coords: &[i32]) -> Result<IVec2> {
    match coords {
        [row, col] => Ok(IVec2::new(*row, *col)),
        _ => Err(LocalizeError::InvalidArgument(format!(
            "expected 2 coordinates, got {}",
            coords.len()
        ))),
    }
}
