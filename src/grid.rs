//! The known map: a fixed rectangle of wall and open cells.

use crate::error::{LocalizeError, Result};
use glam::IVec2;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Character that marks a wall in map files. Everything else is open floor.
pub const WALL_CHAR: char = 'X';

/// A single map cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Blocks movement (`0` in the numeric encoding).
    Wall,
    /// Traversable floor (`1` in the numeric encoding).
    Open,
}

impl Cell {
    /// Decodes a map file character: [`WALL_CHAR`] is a wall, anything else is floor.
    pub fn from_char(c: char) -> Self {
        if c == WALL_CHAR { Cell::Wall } else { Cell::Open }
    }

    /// Whether the robot can stand on this cell.
    pub fn is_open(self) -> bool {
        self == Cell::Open
    }
}

/// Row-major grid of cells. Dimensions never change after construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridMap {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl GridMap {
    /// Builds a map from explicit rows. All rows must be non-empty and equally long.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self> {
        let Some(first) = rows.first() else {
            return Err(LocalizeError::MapFormat("map has no rows".into()));
        };
        let cols = first.len();
        if cols == 0 {
            return Err(LocalizeError::MapFormat("map row 0 is empty".into()));
        }
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != cols) {
            return Err(LocalizeError::MapFormat(format!(
                "row {i} has {} cells, expected {cols}",
                row.len()
            )));
        }

        Ok(Self {
            rows: rows.len(),
            cols,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// Parses the textual map format: one row per line, [`WALL_CHAR`] for walls.
    pub fn parse(text: &str) -> Result<Self> {
        let rows = text
            .lines()
            .map(|line| {
                line.trim_end_matches('\r')
                    .chars()
                    .map(Cell::from_char)
                    .collect::<Vec<_>>()
            })
            .collect();
        Self::from_rows(rows)
    }

    /// Reads and parses a map file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The longer of the two sides.
    pub fn max_dimension(&self) -> usize {
        self.rows.max(self.cols)
    }

    /// Whether `pos` lies inside the map.
    pub fn contains(&self, pos: IVec2) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.rows && (pos.y as usize) < self.cols
    }

    /// Cell at `pos`, or `None` outside the map.
    pub fn get(&self, pos: IVec2) -> Option<Cell> {
        self.contains(pos)
            .then(|| self.cells[pos.x as usize * self.cols + pos.y as usize])
    }

    /// Cell at `pos`, treating everything outside the map as wall.
    ///
    /// This is the world the robot senses and the finder and planner
    /// reason about: a map without a wall border is still closed off.
    pub fn cell_or_wall(&self, pos: IVec2) -> Cell {
        self.get(pos).unwrap_or(Cell::Wall)
    }

    /// Open and inside the map.
    pub fn is_open(&self, pos: IVec2) -> bool {
        self.get(pos) == Some(Cell::Open)
    }

    /// Every open cell, row-major.
    pub fn open_cells(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_open())
            .map(|(i, _)| IVec2::new((i / self.cols) as i32, (i % self.cols) as i32))
    }
}
