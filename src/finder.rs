//! Candidate-pose finder.
//!
//! Matches the observation map against the known map under all four
//! rotations. Every placement where each known observed cell equals the
//! map cell below it is a candidate starting pose. Past the map edge the
//! world reads as wall, the same way the robot senses it. Candidates are
//! recomputed from scratch each time; nothing depends on earlier results.

use crate::agent::RelativePose;
use crate::geometry::{Direction, INITIAL_DIRECTION, Side, rotate};
use crate::grid::{Cell, GridMap};
use crate::observation::ObservationMap;
use glam::IVec2;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A hypothesis for the robot's true starting pose.
///
/// `rotation` is the true heading at the start; it is also the number of
/// left quarter turns that take the relative frame onto the map frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidatePose {
    /// Starting position in map coordinates.
    pub position: IVec2,

    /// Starting heading in map coordinates.
    pub rotation: Direction,
}

impl CandidatePose {
    /// Hypothesis that the robot started at `position` facing `rotation`.
    pub fn new(position: IVec2, rotation: Direction) -> Self {
        Self { position, rotation }
    }

    /// Map coordinates of a relative-frame position under this hypothesis.
    pub fn project(&self, relative: IVec2) -> IVec2 {
        self.position + rotate(relative, Side::Left, self.rotation.index())
    }

    /// Where the robot would be now, if this hypothesis holds.
    pub fn current(&self, pose: &RelativePose) -> CandidatePose {
        CandidatePose {
            position: self.project(pose.position),
            rotation: self.rotation.combined(pose.direction),
        }
    }
}

impl fmt::Display for CandidatePose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "([{}, {}] {})",
            self.position.x, self.position.y, self.rotation
        )
    }
}

/// The observation map rotated and cropped to its known cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    rows: usize,
    cols: usize,
    cells: Vec<Option<Cell>>,
    /// Position of the relative origin inside the pattern.
    origin: IVec2,
}

impl Pattern {
    /// Rotates the observations `rotation` quarter turns left and crops them
    /// to the bounding box of known cells. `None` if nothing is known yet.
    pub fn from_observations(observations: &ObservationMap, rotation: Direction) -> Option<Self> {
        let known: Vec<(IVec2, Cell)> = observations
            .known_cells()
            .map(|(rel, cell)| (rotate(rel, Side::Left, rotation.index()), cell))
            .collect();

        let min = known.iter().map(|(p, _)| *p).reduce(IVec2::min)?;
        let max = known.iter().map(|(p, _)| *p).reduce(IVec2::max)?;
        let extent = max - min + IVec2::ONE;
        let (rows, cols) = (extent.x as usize, extent.y as usize);

        let mut cells = vec![None; rows * cols];
        for (p, cell) in known {
            let local = p - min;
            cells[local.x as usize * cols + local.y as usize] = Some(cell);
        }

        Some(Self {
            rows,
            cols,
            cells,
            origin: -min,
        })
    }

    /// Height of the cropped pattern.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Width of the cropped pattern.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Offset of the relative origin from the pattern's top-left corner.
    pub fn origin(&self) -> IVec2 {
        self.origin
    }

    /// Whether the pattern agrees with `map` when its top-left sits at `top_left`.
    /// Unknown cells match anything; cells off the map must be walls.
    pub fn matches_at(&self, map: &GridMap, top_left: IVec2) -> bool {
        self.cells.iter().enumerate().all(|(i, cell)| match cell {
            None => true,
            Some(expected) => {
                let at = top_left + IVec2::new((i / self.cols) as i32, (i % self.cols) as i32);
                map.cell_or_wall(at) == *expected
            }
        })
    }

    /// Every top-left offset that puts the relative origin on `map` and
    /// matches it. The rest of the pattern may hang over the edge.
    pub fn placements(&self, map: &GridMap) -> Vec<IVec2> {
        let mut found = Vec::new();
        for row in 0..map.rows() as i32 {
            for col in 0..map.cols() as i32 {
                let top_left = IVec2::new(row, col) - self.origin;
                if self.matches_at(map, top_left) {
                    found.push(top_left);
                }
            }
        }
        found
    }
}

/// Every starting pose consistent with everything observed so far.
///
/// Candidates are ordered by rotation, then row-major by position. An empty
/// observation map yields no candidates; the control loop always observes
/// before asking.
pub fn find_candidates(map: &GridMap, observations: &ObservationMap) -> Vec<CandidatePose> {
    let mut candidates = Vec::new();
    for rotation in Direction::ALL {
        let Some(pattern) = Pattern::from_observations(observations, rotation) else {
            debug!("no observations yet, no candidates");
            return candidates;
        };
        let placements = pattern.placements(map);
        trace!(
            "rotation {}: {}x{} pattern, {} placements",
            rotation.index(),
            pattern.rows(),
            pattern.cols(),
            placements.len()
        );
        candidates.extend(placements.into_iter().map(|top_left| {
            CandidatePose::new(top_left + pattern.origin(), INITIAL_DIRECTION.combined(rotation))
        }));
    }
    debug!("{} candidate poses", candidates.len());
    candidates
}
