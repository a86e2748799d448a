//! Ground-truth simulator: the real map and where the robot actually is.
//!
//! The localization logic never reads the true pose. It only drives the
//! robot through [`Environment::rotate`] and [`Environment::attempt_move`]
//! and reads its surroundings through [`Environment::sense`].

use crate::error::{LocalizeError, Result};
use crate::finder::CandidatePose;
use crate::geometry::{Direction, INITIAL_DIRECTION, Side};
use crate::grid::{Cell, GridMap};
use glam::IVec2;
use log::{debug, trace, warn};
use rand::Rng;
use rand::seq::IteratorRandom;
use serde::{Deserialize, Serialize};

/// Position and heading in true map coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TruePose {
    pub position: IVec2,
    pub direction: Direction,
}

impl TruePose {
    /// Pose at `position` facing `direction`.
    pub fn new(position: IVec2, direction: Direction) -> Self {
        Self {
            position,
            direction,
        }
    }
}

/// The simulated world the robot lives in.
#[derive(Clone, Debug)]
pub struct Environment {
    map: GridMap,
    pose: TruePose,
    initial: TruePose,
}

impl Environment {
    /// Places the robot at `pose`. The cell must be open.
    pub fn new(map: GridMap, pose: TruePose) -> Result<Self> {
        if !map.is_open(pose.position) {
            return Err(LocalizeError::InvalidPose(format!(
                "({}, {}) is not an open cell of the {}x{} map",
                pose.position.x,
                pose.position.y,
                map.rows(),
                map.cols()
            )));
        }
        Ok(Self {
            map,
            pose,
            initial: pose,
        })
    }

    /// Places the robot on a uniformly random open cell facing a random direction.
    pub fn with_random_pose<R: Rng>(map: GridMap, rng: &mut R) -> Result<Self> {
        Self::with_partial_pose(map, None, None, rng)
    }

    /// Places the robot using whatever part of the pose is usable.
    ///
    /// A missing position, or one that is not an open cell, is replaced by a
    /// uniformly random open cell. A missing direction is drawn at random.
    /// The two halves are decided independently.
    pub fn with_partial_pose<R: Rng>(
        map: GridMap,
        position: Option<IVec2>,
        direction: Option<Direction>,
        rng: &mut R,
    ) -> Result<Self> {
        let position = match position {
            Some(p) if map.is_open(p) => p,
            requested => {
                if let Some(p) = requested {
                    warn!(
                        "({}, {}) is not an open cell, choosing a random position",
                        p.x, p.y
                    );
                }
                let p = map
                    .open_cells()
                    .choose(rng)
                    .ok_or_else(|| LocalizeError::InvalidPose("map has no open cell".into()))?;
                debug!("random start position ({}, {})", p.x, p.y);
                p
            }
        };
        let direction = direction.unwrap_or_else(|| {
            let d = Direction::new(rng.gen_range(0..4));
            debug!("random start direction {d}");
            d
        });
        Self::new(map, TruePose::new(position, direction))
    }

    /// The true map.
    pub fn map(&self) -> &GridMap {
        &self.map
    }

    /// Current true pose.
    pub fn pose(&self) -> TruePose {
        self.pose
    }

    /// Pose the robot started in.
    pub fn initial_pose(&self) -> TruePose {
        self.initial
    }

    /// Turns the robot a quarter turn in place.
    pub fn rotate(&mut self, side: Side) {
        self.pose.direction = self.pose.direction.turned(side);
    }

    /// Steps one cell forward unless a wall or the map edge is in the way.
    ///
    /// Returns whether the robot actually moved.
    pub fn attempt_move(&mut self) -> bool {
        let next = self.pose.position + self.pose.direction.vector();
        if !self.map.is_open(next) {
            trace!("move blocked at ({}, {})", next.x, next.y);
            return false;
        }
        self.pose.position = next;
        true
    }

    /// Cells within Chebyshev distance `sight_range` of the robot.
    ///
    /// Offsets are in the true map frame. Cells past the map edge read as
    /// walls, so the whole window is always returned. Callers align the
    /// offsets to their own frame with [`Environment::frame_offset`].
    pub fn sense(&self, sight_range: u32) -> Vec<(IVec2, Cell)> {
        let r = sight_range as i32;
        let mut seen = Vec::with_capacity(((2 * r + 1) * (2 * r + 1)) as usize);
        for dx in -r..=r {
            for dy in -r..=r {
                let delta = IVec2::new(dx, dy);
                seen.push((delta, self.map.cell_or_wall(self.pose.position + delta)));
            }
        }
        seen
    }

    /// Quarter turns between the true starting heading and [`INITIAL_DIRECTION`].
    pub fn frame_offset(&self) -> i32 {
        (self.initial.direction.index() - INITIAL_DIRECTION.index()).rem_euclid(4)
    }

    /// Whether `candidate` is the pose the robot really started in.
    pub fn check_position(&self, candidate: &CandidatePose) -> bool {
        candidate.position == self.initial.position && candidate.rotation == self.initial.direction
    }
}
