//! Terminal rendering of the map, the robot and the search state.
//!
//! Purely cosmetic: nothing here feeds back into the search.

use crate::environment::{Environment, TruePose};
use crate::error::{LocalizeError, Result};
use crate::finder::CandidatePose;
use crate::grid::{Cell, GridMap};
use crate::report::{RunReport, StepSnapshot};
use crossterm::style::{Color, ContentStyle};
use glam::IVec2;
use std::collections::HashSet;

/// Wall glyphs indexed by neighbour mask (up 1, down 2, left 4, right 8).
const WALL_GLYPHS: [char; 16] = [
    '·', '╵', '╷', '│', '╴', '┘', '┐', '┤', '╶', '└', '┌', '├', '─', '┴', '┬', '┼',
];

/// Looks up a terminal colour by name (`red`, `dark_blue`, `grey`, ...).
pub fn parse_color(name: &str) -> Result<Color> {
    Color::try_from(name)
        .map_err(|_| LocalizeError::InvalidArgument(format!("unknown color '{name}'")))
}

/// Box-drawing glyph for a wall with the given neighbour mask.
pub fn wall_glyph(mask: u8) -> Result<char> {
    WALL_GLYPHS
        .get(usize::from(mask))
        .copied()
        .ok_or_else(|| LocalizeError::InvalidArgument(format!("unsupported wall mask {mask}")))
}

/// Styles `text` for the terminal. Without colours the text is left as is.
pub fn paint(text: &str, fg: Option<Color>, bg: Option<Color>) -> String {
    let mut style = ContentStyle::new();
    style.foreground_color = fg;
    style.background_color = bg;
    style.apply(text).to_string()
}

fn wall_mask(map: &GridMap, pos: IVec2) -> u8 {
    let is_wall = |offset: IVec2| map.get(pos + offset) == Some(Cell::Wall);
    u8::from(is_wall(IVec2::NEG_X))
        | u8::from(is_wall(IVec2::X)) << 1
        | u8::from(is_wall(IVec2::NEG_Y)) << 2
        | u8::from(is_wall(IVec2::Y)) << 3
}

/// Draws the map with the robot arrow at `robot` and every `highlight`
/// position on a yellow background, followed by a legend.
pub fn map_frame(map: &GridMap, robot: TruePose, highlights: &[CandidatePose]) -> String {
    let marked: HashSet<IVec2> = highlights.iter().map(|c| c.position).collect();
    let mut out = String::new();

    for row in 0..map.rows() as i32 {
        for col in 0..map.cols() as i32 {
            let pos = IVec2::new(row, col);
            let (tile, fg) = match map.get(pos) {
                Some(Cell::Wall) => (wall_glyph(wall_mask(map, pos)).unwrap_or('#'), None),
                _ if pos == robot.position => (robot.direction.arrow(), Some(Color::Black)),
                _ => (' ', None),
            };
            let bg = marked.contains(&pos).then_some(Color::Yellow);
            out.push_str(&paint(&tile.to_string(), fg, bg));
        }
        out.push('\n');
    }

    out.push_str("Legend:\n");
    out.push_str(&format!(
        "{} - robot\n",
        paint(
            &robot.direction.arrow().to_string(),
            Some(Color::Black),
            Some(Color::Yellow)
        )
    ));
    out.push_str(&format!(
        "{} - possible robot position\n",
        paint(" ", Some(Color::Black), Some(Color::Yellow))
    ));
    out
}

/// Semicolon-separated candidate list, e.g. `([1, 1] ↓); ([3, 2] ←)`.
pub fn describe_candidates(candidates: &[CandidatePose]) -> String {
    candidates
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Stats block printed under each frame.
pub fn stats(robot: TruePose, snapshot: &StepSnapshot) -> String {
    let pending: Vec<String> = snapshot.pending.iter().map(ToString::to_string).collect();
    format!(
        "Robot\nPosition and direction: ([{}, {}] {})\nMoves to do: [{}]\nSteps: {}\nPossible current positions: {}\nDiscovered tiles: {}\n{}\n",
        robot.position.x,
        robot.position.y,
        robot.direction,
        pending.join(", "),
        snapshot.steps,
        describe_candidates(&snapshot.current_candidates()),
        snapshot.discovered_tiles,
        "-".repeat(80)
    )
}

/// Closing summary of a run, checked against the simulator's ground truth.
pub fn summary(environment: &Environment, report: &RunReport) -> String {
    let mut out = String::from("Search finished\n");
    let current: Vec<CandidatePose> = report
        .candidates
        .iter()
        .map(|c| c.current(&report.relative_pose))
        .collect();

    if report.is_found() {
        let correct = report
            .candidates
            .first()
            .is_some_and(|c| environment.check_position(c));
        out.push_str(&format!(
            "Robot is found. Current position: {}. Starting position: {}\n\
             Is found position correct: {correct}\n",
            describe_candidates(&current),
            describe_candidates(&report.candidates)
        ));
    } else {
        let initial = environment.initial_pose();
        out.push_str(&format!(
            "Starting position cannot be definitely found. Possible starting positions are: {}\n\
             Is one of those positions starting position: {} ([{}, {}] {})\n",
            describe_candidates(&report.candidates),
            report.candidates.iter().any(|c| environment.check_position(c)),
            initial.position.x,
            initial.position.y,
            initial.direction
        ));
    }

    out.push_str(&format!(
        "Steps: {}\nDiscovered tiles: {}",
        report.steps, report.discovered_tiles
    ));
    out
}
