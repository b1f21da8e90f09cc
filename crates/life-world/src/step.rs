//! Generation transition under Conway's rules (B3/S23).

use crate::grid::Grid;
use life_core::{BoundaryPolicy, Cell, SimulationConfig};
use serde::{Deserialize, Serialize};

/// A cell whose state differs between two generations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellChange {
    pub x: usize,
    pub y: usize,
    pub state: Cell,
}

/// Survive on 2 or 3 neighbors, birth on exactly 3
pub fn apply_rule(cell: Cell, alive_neighbors: u8) -> Cell {
    match (cell, alive_neighbors) {
        (Cell::Alive, 2) | (Cell::Alive, 3) => Cell::Alive,
        (Cell::Dead, 3) => Cell::Alive,
        _ => Cell::Dead,
    }
}

/// Pure transition function over whole grids
#[derive(Debug, Clone, Copy, Default)]
pub struct StepEngine {
    boundary: BoundaryPolicy,
}

impl StepEngine {
    pub fn new(boundary: BoundaryPolicy) -> Self {
        Self { boundary }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.boundary)
    }

    pub fn boundary(&self) -> BoundaryPolicy {
        self.boundary
    }

    /// Compute the next generation into fresh storage.
    ///
    /// Returns the new grid and every cell whose state changed, in row-major
    /// order. Cells that stay alive or stay dead are not reported.
    pub fn next(&self, grid: &Grid) -> (Grid, Vec<CellChange>) {
        let size = grid.size();
        let mut next = Grid::new(size);
        let mut changes = Vec::new();

        for y in 0..size {
            for x in 0..size {
                let current = grid.get(x, y);
                let state = apply_rule(current, grid.alive_neighbors(x, y, self.boundary));
                if state.is_alive() {
                    next.set(x, y, state);
                }
                if state != current {
                    changes.push(CellChange { x, y, state });
                }
            }
        }

        (next, changes)
    }
}
