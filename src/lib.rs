//! # grid-localizer
//!
//! Self-localization of a robot dropped at an unknown pose on a known
//! discrete grid map. The robot sees the cells around it, moves, and keeps
//! narrowing down the set of starting poses consistent with what it has
//! seen until one is left or the remaining ones are indistinguishable.
//!
//! It separates the *simulated world* ([`Environment`], which knows the true
//! pose) from the *robot's reasoning* ([`ObservationMap`],
//! [`find_candidates`], a [`LocalizationStrategy`]), which only ever works
//! in the robot's own relative frame. [`Localizer`] ties the two together.

pub mod agent;
pub mod environment;
pub mod error;
pub mod finder;
pub mod geometry;
pub mod grid;
pub mod localizer;
pub mod observation;
pub mod planner;
pub mod render;
pub mod report;

pub use agent::*;
pub use environment::*;
pub use error::*;
pub use finder::*;
pub use geometry::*;
pub use grid::*;
pub use localizer::*;
pub use observation::*;
pub use planner::*;
pub use report::*;
