//! Everything the robot has seen so far, in its own relative frame.

use crate::grid::{Cell, GridMap};
use glam::IVec2;
use log::warn;

/// Square grid of sensed cells centred on the relative origin.
///
/// Cells start unknown (`None`). Once a cell is known its value never
/// changes, so the set of known cells only grows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObservationMap {
    size: usize,
    cells: Vec<Option<Cell>>,
}

impl ObservationMap {
    /// Allocates a map large enough to hold a `map_dimension` wide map seen
    /// from any corner with the given sight range.
    pub fn new(map_dimension: usize, sight_range: u32) -> Self {
        let size = (map_dimension + sight_range as usize) * 2 + 1;
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    /// Sized for `map`.
    pub fn for_map(map: &GridMap, sight_range: u32) -> Self {
        Self::new(map.max_dimension(), sight_range)
    }

    /// Side length of the square.
    pub fn size(&self) -> usize {
        self.size
    }

    fn half(&self) -> i32 {
        (self.size / 2) as i32
    }

    fn index_of(&self, rel: IVec2) -> Option<usize> {
        let half = self.half();
        let (row, col) = (rel.x + half, rel.y + half);
        let size = self.size as i32;
        (row >= 0 && col >= 0 && row < size && col < size)
            .then(|| row as usize * self.size + col as usize)
    }

    /// Known value at a relative coordinate; `None` if unknown or out of range.
    pub fn get(&self, rel: IVec2) -> Option<Cell> {
        self.index_of(rel).and_then(|i| self.cells[i])
    }

    /// Records a sensed cell. Returns `true` if the cell was previously unknown.
    ///
    /// Re-recording a known cell leaves it untouched.
    pub fn record(&mut self, rel: IVec2, cell: Cell) -> bool {
        let Some(i) = self.index_of(rel) else {
            warn!(
                "observation at ({}, {}) outside {}x{} map, dropped",
                rel.x, rel.y, self.size, self.size
            );
            return false;
        };
        match self.cells[i] {
            None => {
                self.cells[i] = Some(cell);
                true
            }
            Some(known) => {
                if known != cell {
                    warn!(
                        "conflicting observation at ({}, {}): kept {:?}, saw {:?}",
                        rel.x, rel.y, known, cell
                    );
                }
                false
            }
        }
    }

    /// Number of known cells.
    pub fn discovered_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Whether nothing has been observed yet.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// Known cells as `(relative offset, value)`, row-major.
    pub fn known_cells(&self) -> impl Iterator<Item = (IVec2, Cell)> + '_ {
        let half = self.half();
        let size = self.size;
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            cell.map(|c| {
                (
                    IVec2::new((i / size) as i32 - half, (i % size) as i32 - half),
                    c,
                )
            })
        })
    }
}
