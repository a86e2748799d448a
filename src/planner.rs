//! Move planning: where to go next to tell the remaining candidates apart.
//!
//! The search runs over relative displacements from the robot's current
//! position, expressed in the robot's current heading frame (`(1, 0)` is
//! straight ahead). It never needs to know which candidate is the true one:
//! a displacement is explored if any candidate says it is walkable, and the
//! search stops at the first displacement where the candidates disagree
//! about what the robot would see.

use crate::agent::{Action, RelativePose};
use crate::finder::CandidatePose;
use crate::geometry::{Direction, INITIAL_DIRECTION, Side, rotate};
use crate::grid::{Cell, GridMap};
use glam::IVec2;
use log::{debug, trace};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

/// A pluggable localization strategy.
///
/// Given what the robot knows, propose the next batch of actions. An empty
/// plan means no further progress is possible.
pub trait LocalizationStrategy {
    /// Human-readable strategy name for logs.
    fn name(&self) -> &str;

    /// Plans the next actions from `pose` given the surviving `candidates`.
    fn plan(&self, pose: &RelativePose, candidates: &[CandidatePose], map: &GridMap) -> Vec<Action>;
}

/// Greedy best-first search for the nearest disambiguating displacement.
///
/// Edge cost is one step plus the quarter turns needed to face the step
/// from the heading the robot arrived with, so straight paths win over
/// zig-zags of the same length.
#[derive(Clone, Debug)]
pub struct GreedyDisambiguation {
    sight_range: u32,
}

impl Default for GreedyDisambiguation {
    fn default() -> Self {
        Self { sight_range: 1 }
    }
}

/// What a candidate would see at a displacement, in its own frame.
type Fingerprint = Vec<Cell>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct SearchNode {
    cost: u32,
    delta: IVec2,
}

impl Ord for SearchNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior; ties go to the smaller delta
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| (other.delta.x, other.delta.y).cmp(&(self.delta.x, self.delta.y)))
    }
}

impl PartialOrd for SearchNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl GreedyDisambiguation {
    /// `sight_range` is the Chebyshev radius compared between candidates.
    pub fn new(sight_range: u32) -> Self {
        Self { sight_range }
    }

    /// Radius of the window compared between candidates.
    pub fn sight_range(&self) -> u32 {
        self.sight_range
    }

    /// Map position of displacement `delta` if `candidate` is the true start.
    fn project(candidate: &CandidatePose, pose: &RelativePose, delta: IVec2) -> IVec2 {
        candidate.project(pose.position)
            + rotate(
                delta,
                Side::Left,
                candidate.rotation.combined(pose.direction).index(),
            )
    }

    /// The sensing window at `at`, with the map edge read as wall exactly
    /// like [`Environment::sense`](crate::environment::Environment::sense).
    fn fingerprint(&self, map: &GridMap, candidate: &CandidatePose, at: IVec2) -> Fingerprint {
        let r = self.sight_range as i32;
        let mut seen = Vec::with_capacity(((2 * r + 1) * (2 * r + 1)) as usize);
        for dx in -r..=r {
            for dy in -r..=r {
                let offset = rotate(IVec2::new(dx, dy), Side::Left, candidate.rotation.index());
                seen.push(map.cell_or_wall(at + offset));
            }
        }
        seen
    }

    /// A displacement disambiguates if at least two candidates would see
    /// different surroundings there. The current position never does: it
    /// has already been observed and every candidate agrees with it.
    fn is_disambiguating(
        &self,
        pose: &RelativePose,
        candidates: &[CandidatePose],
        map: &GridMap,
        delta: IVec2,
    ) -> bool {
        if delta == IVec2::ZERO {
            return false;
        }
        let mut fingerprints = HashSet::new();
        for candidate in candidates {
            let at = Self::project(candidate, pose, delta);
            fingerprints.insert(self.fingerprint(map, candidate, at));
            if fingerprints.len() > 1 {
                return true;
            }
        }
        false
    }

    /// Walkable for at least one candidate.
    fn is_walkable(
        pose: &RelativePose,
        candidates: &[CandidatePose],
        map: &GridMap,
        delta: IVec2,
    ) -> bool {
        candidates
            .iter()
            .any(|c| map.is_open(Self::project(c, pose, delta)))
    }

    /// Shortest (by moves plus turns) action sequence to the nearest
    /// disambiguating displacement, or an empty plan if none is reachable.
    pub fn plan_path(
        &self,
        pose: &RelativePose,
        candidates: &[CandidatePose],
        map: &GridMap,
    ) -> Vec<Action> {
        // delta -> (parent delta, heading of the step that reached it)
        let mut parents: HashMap<IVec2, Option<(IVec2, Direction)>> =
            HashMap::from([(IVec2::ZERO, None)]);
        let mut open_set = BinaryHeap::from([SearchNode {
            cost: 0,
            delta: IVec2::ZERO,
        }]);
        let mut target = None;
        let mut nodes_expanded = 0usize;

        while let Some(SearchNode { cost, delta }) = open_set.pop() {
            nodes_expanded += 1;

            if self.is_disambiguating(pose, candidates, map, delta) {
                target = Some(delta);
                break;
            }

            let heading = parents
                .get(&delta)
                .copied()
                .flatten()
                .map_or(INITIAL_DIRECTION, |(_, step)| step);

            for step in Direction::ALL {
                let next = delta + step.vector();
                if parents.contains_key(&next) {
                    continue;
                }
                parents.insert(next, Some((delta, step)));

                if Self::is_walkable(pose, candidates, map, next) {
                    open_set.push(SearchNode {
                        cost: cost + 1 + heading.turns_to(step),
                        delta: next,
                    });
                }
            }
        }

        let Some(target) = target else {
            debug!(
                "no disambiguating move among {} candidates after {} nodes",
                candidates.len(),
                nodes_expanded
            );
            return Vec::new();
        };
        trace!(
            "disambiguating delta ({}, {}) after {} nodes",
            target.x, target.y, nodes_expanded
        );

        let mut moves = Vec::new();
        let mut current = target;
        while let Some(Some((parent, step))) = parents.get(&current).copied() {
            moves.push(step);
            current = parent;
        }
        moves.reverse();

        commands_from_moves(&moves)
    }
}

impl LocalizationStrategy for GreedyDisambiguation {
    fn name(&self) -> &str {
        "greedy-disambiguation"
    }

    fn plan(&self, pose: &RelativePose, candidates: &[CandidatePose], map: &GridMap) -> Vec<Action> {
        self.plan_path(pose, candidates, map)
    }
}

/// Turns a chain of step headings into turn-and-move commands.
///
/// Headings are in the robot's current frame, so the chain starts facing
/// [`INITIAL_DIRECTION`]. A reversal is two right turns.
pub fn commands_from_moves(moves: &[Direction]) -> Vec<Action> {
    let mut commands = Vec::with_capacity(moves.len() * 2);
    let mut previous = INITIAL_DIRECTION;

    for &step in moves {
        match (step.index() - previous.index()).rem_euclid(4) {
            0 => {}
            1 => commands.push(Action::TurnLeft),
            2 => commands.extend([Action::TurnRight, Action::TurnRight]),
            _ => commands.push(Action::TurnRight),
        }
        commands.push(Action::Forward);
        previous = step;
    }

    commands
}
