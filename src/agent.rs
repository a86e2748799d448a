//! Robot-side state: the self-tracked relative pose and the actions it can take.

use crate::geometry::{Direction, INITIAL_DIRECTION, Side};
use glam::IVec2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the robot believes it is relative to its own starting point.
///
/// The frame is anchored at the start: origin `(0, 0)`, facing
/// [`INITIAL_DIRECTION`]. It is never reset during a run and is kept apart
/// from [`TruePose`](crate::environment::TruePose) on purpose.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelativePose {
    /// Displacement from the start, in the start frame.
    pub position: IVec2,

    /// Current heading, in the start frame.
    pub direction: Direction,
}

impl Default for RelativePose {
    fn default() -> Self {
        Self {
            position: IVec2::ZERO,
            direction: INITIAL_DIRECTION,
        }
    }
}

impl RelativePose {
    /// Quarter turn in place.
    pub fn rotate(&mut self, side: Side) {
        self.direction = self.direction.turned(side);
    }

    /// One cell along the current heading.
    pub fn advance(&mut self) {
        self.position += self.direction.vector();
    }
}

/// A single physical command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Step one cell forward (a no-op against a wall).
    Forward,
    /// Quarter turn left.
    TurnLeft,
    /// Quarter turn right.
    TurnRight,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Forward => f.write_str("move"),
            Action::TurnLeft => f.write_str("left"),
            Action::TurnRight => f.write_str("right"),
        }
    }
}
