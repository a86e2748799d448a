//! The control loop that drives a robot until it knows where it started.
//!
//! The entry point is [`Localizer`]. Build it from an [`Environment`] and a
//! [`LocalizerConfig`], optionally plug in a different
//! [`LocalizationStrategy`] via [`Localizer::with_strategy`], then call
//! [`Localizer::run`] or [`Localizer::run_with`].

use crate::agent::{Action, RelativePose};
use crate::environment::Environment;
use crate::error::{LocalizeError, Result};
use crate::finder::{CandidatePose, find_candidates};
use crate::geometry::{Side, rotate};
use crate::observation::ObservationMap;
use crate::planner::{GreedyDisambiguation, LocalizationStrategy};
use crate::render;
use crate::report::{Outcome, Phase, RunReport, StepSnapshot};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use std::thread;
use std::time::Duration;

/// Configuration for a localization run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalizerConfig {
    /// Chebyshev radius the robot senses around itself. Must be at least 1.
    pub sight_range: u32,
    /// Pause between printed steps, in milliseconds. Display only.
    pub step_delay_ms: u64,
    /// Print the map and stats after every step.
    pub print_map: bool,
}

impl Default for LocalizerConfig {
    fn default() -> Self {
        Self {
            sight_range: 1,
            step_delay_ms: 0,
            print_map: false,
        }
    }
}

impl LocalizerConfig {
    /// Parses a JSON configuration. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    /// Rejects settings the search cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.sight_range == 0 {
            return Err(LocalizeError::Config(
                "sight_range must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Display pause between printed steps.
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }
}

/// Drives the robot: observe, find candidates, plan, execute, repeat.
pub struct Localizer<S = GreedyDisambiguation> {
    environment: Environment,
    strategy: S,
    config: LocalizerConfig,
    pose: RelativePose,
    observations: ObservationMap,
    /// Quarter turns from true-frame sensing to the relative frame, fixed at start.
    frame_offset: i32,
    candidates: Vec<CandidatePose>,
    steps: usize,
    phase: Phase,
}

impl Localizer<GreedyDisambiguation> {
    /// Creates a localizer with the default greedy strategy.
    pub fn new(environment: Environment, config: LocalizerConfig) -> Result<Self> {
        let strategy = GreedyDisambiguation::new(config.sight_range);
        Self::with_strategy(environment, strategy, config)
    }
}

impl<S: LocalizationStrategy> Localizer<S> {
    /// Creates a localizer driven by `strategy`.
    pub fn with_strategy(environment: Environment, strategy: S, config: LocalizerConfig) -> Result<Self> {
        config.validate()?;
        let observations = ObservationMap::for_map(environment.map(), config.sight_range);
        let frame_offset = environment.frame_offset();
        Ok(Self {
            environment,
            strategy,
            config,
            pose: RelativePose::default(),
            observations,
            frame_offset,
            candidates: Vec::new(),
            steps: 0,
            phase: Phase::Init,
        })
    }

    /// The simulated world, including the hidden true pose.
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// The validated configuration this run uses.
    pub fn config(&self) -> &LocalizerConfig {
        &self.config
    }

    /// Pose in the robot's own frame.
    pub fn relative_pose(&self) -> RelativePose {
        self.pose
    }

    /// Everything seen so far, in the robot's own frame.
    pub fn observations(&self) -> &ObservationMap {
        &self.observations
    }

    /// Starting-pose candidates from the latest planning cycle.
    pub fn candidates(&self) -> &[CandidatePose] {
        &self.candidates
    }

    /// Candidates projected to the robot's current pose.
    pub fn current_candidates(&self) -> Vec<CandidatePose> {
        self.candidates.iter().map(|c| c.current(&self.pose)).collect()
    }

    /// Actions executed so far, failed moves included.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Current state of the control loop.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of cells the robot has seen.
    pub fn discovered_tiles(&self) -> usize {
        self.observations.discovered_count()
    }

    /// Copies what the robot currently senses into the observation map.
    pub fn observe(&mut self) {
        let sensed = self.environment.sense(self.config.sight_range);
        let mut fresh = 0;
        for (delta, cell) in sensed {
            let rel = self.pose.position + rotate(delta, Side::Right, self.frame_offset);
            if self.observations.record(rel, cell) {
                fresh += 1;
            }
        }
        debug!(
            "observed {} new tiles at ({}, {})",
            fresh, self.pose.position.x, self.pose.position.y
        );
    }

    /// Turns the robot in both the world and its own frame.
    pub fn rotate(&mut self, side: Side) {
        self.environment.rotate(side);
        self.pose.rotate(side);
    }

    /// Tries to step forward. On success the relative pose follows and the
    /// robot looks around; against a wall nothing changes.
    pub fn advance(&mut self) -> bool {
        if !self.environment.attempt_move() {
            debug!("move blocked, relative pose unchanged");
            return false;
        }
        self.pose.advance();
        self.observe();
        true
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::Forward => {
                self.advance();
            }
            Action::TurnLeft => self.rotate(Side::Left),
            Action::TurnRight => self.rotate(Side::Right),
        }
    }

    fn snapshot(&self, pending: &VecDeque<Action>) -> StepSnapshot {
        StepSnapshot {
            phase: self.phase,
            steps: self.steps,
            relative_pose: self.pose,
            pending: pending.iter().copied().collect(),
            discovered_tiles: self.discovered_tiles(),
            candidates: self.candidates.clone(),
        }
    }

    /// Recomputes candidates and asks for a plan. Moves to a terminal phase
    /// when one candidate is left or the plan comes back empty.
    fn plan(&mut self) -> VecDeque<Action> {
        self.phase = Phase::Planning;
        let previous = self.candidates.len();
        self.candidates = find_candidates(self.environment.map(), &self.observations);
        if previous > 0 && self.candidates.len() > previous {
            warn!(
                "candidate set grew from {} to {}",
                previous,
                self.candidates.len()
            );
        }

        if self.candidates.len() == 1 {
            self.phase = Phase::Found;
            return VecDeque::new();
        }
        if self.candidates.is_empty() {
            warn!("no pose is consistent with the observations");
        }

        let plan: VecDeque<Action> = self
            .strategy
            .plan(&self.pose, &self.candidates, self.environment.map())
            .into();
        debug!(
            "{} planned {} actions for {} candidates",
            self.strategy.name(),
            plan.len(),
            self.candidates.len()
        );

        self.phase = if plan.is_empty() {
            Phase::Stuck
        } else {
            Phase::Executing
        };
        plan
    }

    fn drive(&mut self, on_step: &mut dyn FnMut(&Self, &StepSnapshot)) -> RunReport {
        self.phase = Phase::Init;
        self.observe();

        let mut queue = self.plan();
        on_step(&*self, &self.snapshot(&queue));

        while !self.phase.is_terminal() {
            match queue.pop_front() {
                Some(action) => {
                    self.apply(action);
                    self.steps += 1;
                    on_step(&*self, &self.snapshot(&queue));
                }
                None => queue = self.plan(),
            }
        }

        let outcome = if self.phase == Phase::Found {
            Outcome::Found
        } else {
            Outcome::Stuck
        };
        info!(
            "search finished: {:?} with {} candidates after {} steps",
            outcome,
            self.candidates.len(),
            self.steps
        );

        RunReport {
            outcome,
            candidates: self.candidates.clone(),
            steps: self.steps,
            discovered_tiles: self.discovered_tiles(),
            relative_pose: self.pose,
        }
    }

    /// Runs to completion, calling `observer` after the first planning
    /// cycle and after every executed action.
    pub fn run_with<F: FnMut(&StepSnapshot)>(&mut self, mut observer: F) -> RunReport {
        self.drive(&mut |_: &Self, snapshot: &StepSnapshot| observer(snapshot))
    }

    /// Runs to completion. With `print_intermediate` every step is drawn to
    /// stdout followed by `step_delay`; the delay never affects the search.
    pub fn run(&mut self, print_intermediate: bool, step_delay: Duration) -> RunReport {
        let report = self.drive(&mut |this: &Self, snapshot: &StepSnapshot| {
            if print_intermediate {
                println!("{}", this.render_step(snapshot));
                if !step_delay.is_zero() {
                    thread::sleep(step_delay);
                }
            }
        });

        if print_intermediate {
            println!("{}", render::summary(&self.environment, &report));
        }
        report
    }

    /// Map with the robot and its possible current positions, plus stats.
    pub fn render_step(&self, snapshot: &StepSnapshot) -> String {
        let current = snapshot.current_candidates();
        format!(
            "{}{}",
            render::map_frame(
                self.environment.map(),
                self.environment.pose(),
                &current
            ),
            render::stats(self.environment.pose(), snapshot)
        )
    }
}
