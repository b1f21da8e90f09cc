//! Square cell grid.

use life_core::{BoundaryPolicy, Cell, Coordinate, Error, Result, MOORE_OFFSETS};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A square grid stored row-major. Size 0 means nothing is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Dead; size * size],
        }
    }

    pub fn empty() -> Self {
        Self::new(0)
    }

    /// Build a grid with the given cells alive; duplicates are harmless
    pub fn from_alive(size: usize, alive: &[Coordinate]) -> Result<Self> {
        let mut grid = Self::new(size);
        for coord in alive {
            if !coord.in_bounds(size) {
                return Err(Error::OutOfRange {
                    x: coord.x,
                    y: coord.y,
                    size,
                });
            }
            grid.set(coord.x as usize, coord.y as usize, Cell::Alive);
        }
        Ok(grid)
    }

    /// Fill each cell independently, alive with the given probability
    pub fn random<R: Rng + ?Sized>(size: usize, alive_probability: f64, rng: &mut R) -> Self {
        let mut grid = Self::new(size);
        for cell in &mut grid.cells {
            let roll = rng.gen::<f64>();
            if roll < alive_probability {
                *cell = Cell::Alive;
            }
        }
        grid
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Cell at an in-range position. Panics when out of range.
    pub fn get(&self, x: usize, y: usize) -> Cell {
        self.cells[self.index(x, y)]
    }

    /// Cell at a coordinate, or None outside the grid
    pub fn cell_at(&self, coord: Coordinate) -> Option<Cell> {
        if coord.in_bounds(self.size) {
            Some(self.get(coord.x as usize, coord.y as usize))
        } else {
            None
        }
    }

    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        let index = self.index(x, y);
        self.cells[index] = cell;
    }

    /// Flip a cell and return its new state
    pub fn toggle(&mut self, x: usize, y: usize) -> Cell {
        let index = self.index(x, y);
        let cell = self.cells[index].toggled();
        self.cells[index] = cell;
        cell
    }

    /// Count live cells in the Moore neighborhood, excluding the cell itself
    pub fn alive_neighbors(&self, x: usize, y: usize, boundary: BoundaryPolicy) -> u8 {
        let size = self.size as i32;
        let center = Coordinate::new(x as i32, y as i32);
        let mut count = 0;

        for (dx, dy) in MOORE_OFFSETS {
            let neighbor = center.add(dx, dy);
            let neighbor = match boundary {
                BoundaryPolicy::Toroidal => neighbor.wrap(size),
                BoundaryPolicy::Bounded if neighbor.in_bounds(self.size) => neighbor,
                BoundaryPolicy::Bounded => continue,
            };
            if self.get(neighbor.x as usize, neighbor.y as usize).is_alive() {
                count += 1;
            }
        }

        count
    }

    /// Live cells in row-major order
    pub fn alive_cells(&self) -> Vec<Coordinate> {
        self.iter()
            .filter(|(_, cell)| cell.is_alive())
            .map(|(coord, _)| coord)
            .collect()
    }

    pub fn alive_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_alive()).count()
    }

    fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.size && y < self.size,
            "cell ({}, {}) outside grid of size {}",
            x,
            y,
            self.size
        );
        y * self.size + x
    }

    fn index_to_coord(&self, index: usize) -> Coordinate {
        Coordinate::new((index % self.size) as i32, (index / self.size) as i32)
    }

    /// Iterator over all cells with positions
    pub fn iter(&self) -> impl Iterator<Item = (Coordinate, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (self.index_to_coord(i), *cell))
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn coords(pairs: &[(i32, i32)]) -> Vec<Coordinate> {
        pairs.iter().map(|&p| Coordinate::from(p)).collect()
    }

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(10);
        assert_eq!(grid.size(), 10);
        assert_eq!(grid.cells.len(), 100);
        assert_eq!(grid.alive_count(), 0);
        assert!(Grid::empty().is_empty());
    }

    #[test]
    fn test_from_alive() {
        let grid = Grid::from_alive(4, &coords(&[(3, 0), (0, 2), (3, 0)])).unwrap();
        assert_eq!(grid.alive_cells(), coords(&[(3, 0), (0, 2)]));
        assert_eq!(grid.get(3, 0), Cell::Alive);
        assert_eq!(grid.get(0, 3), Cell::Dead);
    }

    #[test]
    fn test_from_alive_out_of_range() {
        let err = Grid::from_alive(4, &coords(&[(4, 0)])).unwrap_err();
        assert!(matches!(err, Error::OutOfRange { x: 4, y: 0, size: 4 }));
    }

    #[test]
    fn test_cell_at() {
        let grid = Grid::from_alive(3, &coords(&[(1, 2)])).unwrap();
        assert_eq!(grid.cell_at(Coordinate::new(1, 2)), Some(Cell::Alive));
        assert_eq!(grid.cell_at(Coordinate::new(2, 1)), Some(Cell::Dead));
        assert_eq!(grid.cell_at(Coordinate::new(3, 0)), None);
        assert_eq!(grid.cell_at(Coordinate::new(0, -1)), None);
    }

    #[test]
    fn test_toggle() {
        let mut grid = Grid::new(2);
        assert_eq!(grid.toggle(1, 0), Cell::Alive);
        assert_eq!(grid.toggle(1, 0), Cell::Dead);
    }

    #[test]
    fn test_neighbors_toroidal_wraps_corners() {
        // Opposite corners touch through the wrap
        let grid = Grid::from_alive(5, &coords(&[(4, 4), (4, 0), (0, 4)])).unwrap();
        assert_eq!(grid.alive_neighbors(0, 0, BoundaryPolicy::Toroidal), 3);
        assert_eq!(grid.alive_neighbors(0, 0, BoundaryPolicy::Bounded), 0);
    }

    #[test]
    fn test_neighbors_exclude_self() {
        let grid = Grid::from_alive(3, &coords(&[(1, 1)])).unwrap();
        assert_eq!(grid.alive_neighbors(1, 1, BoundaryPolicy::Bounded), 0);
        assert_eq!(grid.alive_neighbors(0, 0, BoundaryPolicy::Bounded), 1);
    }

    #[test]
    fn test_neighbors_on_tiny_torus() {
        // On a 1x1 torus every offset wraps back onto the only cell
        let grid = Grid::from_alive(1, &coords(&[(0, 0)])).unwrap();
        assert_eq!(grid.alive_neighbors(0, 0, BoundaryPolicy::Toroidal), 8);
        assert_eq!(grid.alive_neighbors(0, 0, BoundaryPolicy::Bounded), 0);
    }

    #[test]
    fn test_random_grid_is_reproducible() {
        let a = Grid::random(16, 0.5, &mut ChaCha8Rng::seed_from_u64(42));
        let b = Grid::random(16, 0.5, &mut ChaCha8Rng::seed_from_u64(42));
        assert_eq!(a, b);
        assert!(a.alive_count() > 0);
        assert!(a.alive_count() < 256);

        let none = Grid::random(16, 0.0, &mut ChaCha8Rng::seed_from_u64(1));
        assert_eq!(none.alive_count(), 0);
        let all = Grid::random(16, 1.0, &mut ChaCha8Rng::seed_from_u64(1));
        assert_eq!(all.alive_count(), 256);
    }
}
