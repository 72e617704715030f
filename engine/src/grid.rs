use rand::Rng;

use crate::error::GridError;
use CellState::{Alive, Dead};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellState {
    #[default]
    Dead,
    Alive,
}

impl CellState {
    pub fn flipped(self) -> Self {
        match self {
            Dead => Alive,
            Alive => Dead,
        }
    }

    pub fn is_alive(self) -> bool {
        self == Alive
    }
}

/// Fixed-size cell matrix stored row-major: cell `(x, y)` lives at
/// `y * cols + x`. Dimensions never change after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cols: usize,
    rows: usize,
    cells: Vec<CellState>,
}

impl Grid {
    /// All cells start dead.
    ///
    /// # Panics
    ///
    /// If either dimension is zero.
    pub fn new(cols: usize, rows: usize) -> Self {
        assert!(cols >= 1 && rows >= 1, "grid must be at least 1x1, got {cols}x{rows}");
        Grid {
            cols,
            rows,
            cells: vec![Dead; cols * rows],
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.cols && y < self.rows
    }

    fn index(&self, x: usize, y: usize) -> Result<usize, GridError> {
        if !self.contains(x, y) {
            return Err(GridError::OutOfBounds {
                x,
                y,
                cols: self.cols,
                rows: self.rows,
            });
        }
        Ok(y * self.cols + x)
    }

    pub fn get(&self, x: usize, y: usize) -> Result<CellState, GridError> {
        Ok(self.cells[self.index(x, y)?])
    }

    pub fn set(&mut self, x: usize, y: usize, state: CellState) -> Result<(), GridError> {
        let index = self.index(x, y)?;
        self.cells[index] = state;
        Ok(())
    }

    /// Flips the cell and returns its new state. Whether a toggle is allowed
    /// at all (only while paused) is decided by the caller.
    pub fn toggle(&mut self, x: usize, y: usize) -> Result<CellState, GridError> {
        let index = self.index(x, y)?;
        let next = self.cells[index].flipped();
        self.cells[index] = next;
        Ok(next)
    }

    /// Immutable copy of the current state.
    pub fn snapshot(&self) -> Grid {
        self.clone()
    }

    /// True for cells on the outer ring.
    pub fn is_border(&self, x: usize, y: usize) -> bool {
        x == 0 || y == 0 || x == self.cols - 1 || y == self.rows - 1
    }

    pub fn population(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_alive()).count()
    }

    /// Row-major cell slice, `cols` entries per row.
    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [CellState] {
        &mut self.cells
    }

    /// Yields `(x, y, state)` for every cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, CellState)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(index, cell)| (index % cols, index / cols, *cell))
    }

    pub fn randomize(&mut self) {
        self.randomize_with(&mut rand::rng());
    }

    /// Every cell becomes alive with probability one half.
    pub fn randomize_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for cell in self.cells.iter_mut() {
            *cell = if rng.random_bool(0.5) { Alive } else { Dead };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn new_grid_is_all_dead() {
        let grid = Grid::new(4, 3);
        assert_eq!(grid.cells().len(), 12);
        assert_eq!(grid.population(), 0);
    }

    #[test]
    #[should_panic]
    fn zero_sized_grid_panics() {
        Grid::new(0, 3);
    }

    #[test]
    fn set_then_get() -> Result<(), GridError> {
        let mut grid = Grid::new(4, 3);
        grid.set(3, 2, Alive)?;
        assert_eq!(grid.get(3, 2)?, Alive);
        assert_eq!(grid.cells()[2 * 4 + 3], Alive);
        assert_eq!(grid.population(), 1);
        Ok(())
    }

    #[test]
    fn out_of_bounds_access_is_reported() {
        let mut grid = Grid::new(4, 3);
        let expected = GridError::OutOfBounds { x: 4, y: 0, cols: 4, rows: 3 };
        assert_eq!(grid.get(4, 0), Err(expected));
        assert_eq!(grid.set(4, 0, Alive), Err(expected));
        assert_eq!(grid.toggle(4, 0), Err(expected));
        assert!(grid.get(0, 3).is_err());
        assert_eq!(grid.population(), 0);
    }

    #[test]
    fn toggle_flips_back_and_forth() -> Result<(), GridError> {
        let mut grid = Grid::new(3, 3);
        assert_eq!(grid.toggle(1, 1)?, Alive);
        assert_eq!(grid.toggle(1, 1)?, Dead);
        assert_eq!(grid.population(), 0);
        Ok(())
    }

    #[test]
    fn snapshot_is_detached() -> Result<(), GridError> {
        let mut grid = Grid::new(3, 3);
        let snapshot = grid.snapshot();
        grid.toggle(0, 0)?;
        assert_eq!(snapshot.get(0, 0)?, Dead);
        Ok(())
    }

    #[test]
    fn border_ring() {
        let grid = Grid::new(4, 3);
        let border: Vec<_> = grid.iter().filter(|(x, y, _)| grid.is_border(*x, *y)).collect();
        assert_eq!(border.len(), 10);
        assert!(!grid.is_border(1, 1));
        assert!(!grid.is_border(2, 1));
    }

    #[test]
    fn iter_is_row_major() {
        let grid = Grid::new(3, 2);
        let coords: Vec<_> = grid.iter().map(|(x, y, _)| (x, y)).collect();
        assert_eq!(coords, vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]);
    }

    #[test]
    fn randomize_is_reproducible_with_seed() {
        let mut a = Grid::new(16, 16);
        let mut b = Grid::new(16, 16);
        a.randomize_with(&mut StdRng::seed_from_u64(7));
        b.randomize_with(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
        assert!(a.population() > 0 && a.population() < 256);
    }
}
