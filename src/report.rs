//! Read-only views of a localization run: loop phases, per-step snapshots
//! and the final report.

use crate::agent::{Action, RelativePose};
use crate::finder::CandidatePose;
use serde::{Deserialize, Serialize};

/// Control-loop state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Nothing observed yet.
    Init,
    /// Recomputing candidates and asking the strategy for a plan.
    Planning,
    /// Working through a planned action queue.
    Executing,
    /// Exactly one candidate left.
    Found,
    /// Several candidates left and no move can separate them.
    Stuck,
}

impl Phase {
    /// `Found` and `Stuck` end the run.
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Found | Phase::Stuck)
    }
}

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The starting pose is known.
    Found,
    /// The remaining candidates are indistinguishable by exploration.
    Stuck,
}

/// Read-only view of the loop after a planning cycle or an executed action.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StepSnapshot {
    /// Loop state when the snapshot was taken.
    pub phase: Phase,
    /// Actions executed so far, failed moves included.
    pub steps: usize,
    /// Pose in the robot's own frame.
    pub relative_pose: RelativePose,
    /// Actions still queued from the current plan.
    pub pending: Vec<Action>,
    /// Known cells in the observation map.
    pub discovered_tiles: usize,
    /// Starting-pose candidates from the latest planning cycle.
    pub candidates: Vec<CandidatePose>,
}

impl StepSnapshot {
    /// Candidates projected to where the robot would be now.
    pub fn current_candidates(&self) -> Vec<CandidatePose> {
        self.candidates
            .iter()
            .map(|c| c.current(&self.relative_pose))
            .collect()
    }
}

/// Final result of [`Localizer::run`](crate::localizer::Localizer::run).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunReport {
    /// Whether the start pose was pinned down.
    pub outcome: Outcome,
    /// Surviving starting-pose candidates. Exactly one when `outcome` is `Found`.
    pub candidates: Vec<CandidatePose>,
    /// Actions executed, failed moves included.
    pub steps: usize,
    /// Known cells in the observation map at the end.
    pub discovered_tiles: usize,
    /// Final pose in the robot's own frame.
    pub relative_pose: RelativePose,
}

impl RunReport {
    /// Exactly one candidate is left.
    pub fn is_found(&self) -> bool {
        self.outcome == Outcome::Found
    }

    /// `(final candidates, step count)`.
    pub fn into_parts(self) -> (Vec<CandidatePose>, usize) {
        (self.candidates, self.steps)
    }
}
