use crate::grid::CellState::{self, Alive, Dead};
use crate::grid::Grid;

/// Compute the next generation into a fresh grid. The input is never touched,
/// so neighbor counts always read the previous generation.
///
/// The outer ring is dead in every output, whatever it held before.
pub fn next_generation(grid: &Grid) -> Grid {
    let mut next = Grid::new(grid.cols(), grid.rows());
    let cells = grid.cells();
    let cols = grid.cols();
    let next_cells = next.cells_mut();

    for y in 1..grid.rows().saturating_sub(1) {
        for x in 1..cols.saturating_sub(1) {
            let state = cells[y * cols + x];
            let neighbors = live_neighbors(grid, x, y);

            next_cells[y * cols + x] = match (state, neighbors) {
                (Dead, 3) => Alive, // Becomes alive
                (Alive, 0..=1 | 4..) => Dead, // Dies
                (state, _) => state, // Survives or stays dead
            };
        }
    }

    next
}

/// Live cells among the Moore neighbors of `(x, y)`. Neighbors that would
/// fall outside the grid are not counted, so corners have at most 3 and
/// edge cells at most 5; a position past the grid counts 0.
pub fn live_neighbors(grid: &Grid, x: usize, y: usize) -> usize {
    let cols = grid.cols();
    let cells = grid.cells();
    let x_range = x.saturating_sub(1)..=x.saturating_add(1).min(cols - 1);
    let y_range = y.saturating_sub(1)..=y.saturating_add(1).min(grid.rows() - 1);
    let mut count = 0;

    for ny in y_range {
        for nx in x_range.clone() {
            if nx == x && ny == y {
                continue;
            }
            if cells[ny * cols + nx] == CellState::Alive {
                count += 1;
            }
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GridError;

    fn grid_with(cols: usize, rows: usize, alive: &[(usize, usize)]) -> Grid {
        let mut grid = Grid::new(cols, rows);
        for &(x, y) in alive {
            grid.set(x, y, Alive).expect("test cell in bounds");
        }
        grid
    }

    fn alive_cells(grid: &Grid) -> Vec<(usize, usize)> {
        grid.iter().filter(|(_, _, cell)| cell.is_alive()).map(|(x, y, _)| (x, y)).collect()
    }

    #[test]
    fn empty_grid_stays_empty() {
        let grid = Grid::new(8, 6);
        assert_eq!(next_generation(&grid), grid);
    }

    #[test]
    fn dimensions_are_preserved() {
        let next = next_generation(&Grid::new(7, 4));
        assert_eq!((next.cols(), next.rows()), (7, 4));
    }

    #[test]
    fn neighbor_count_excludes_self() {
        let grid = grid_with(3, 3, &[(0, 0), (1, 0), (2, 0), (1, 1)]);
        assert_eq!(live_neighbors(&grid, 1, 1), 3);
    }

    #[test]
    fn corner_cells_count_only_in_grid_neighbors() {
        let grid = grid_with(4, 4, &[(1, 1)]);
        assert_eq!(live_neighbors(&grid, 0, 0), 1);
        assert_eq!(live_neighbors(&grid, 3, 3), 0);
        assert_eq!(live_neighbors(&grid, 2, 0), 1);

        let full = grid_with(4, 4, &[(0, 0), (1, 0), (2, 0), (3, 0), (0, 1), (1, 1), (2, 1), (3, 1)]);
        assert_eq!(live_neighbors(&full, 3, 0), 3);
        assert_eq!(live_neighbors(&full, 0, 1), 3);
        assert_eq!(live_neighbors(&full, 1, 1), 5);
    }

    #[test]
    fn cells_past_the_grid_have_no_neighbors() {
        let grid = grid_with(4, 4, &[(3, 3)]);
        assert_eq!(live_neighbors(&grid, 10, 10), 0);
    }

    #[test]
    fn dead_cell_with_three_neighbors_is_born() -> Result<(), GridError> {
        let next = next_generation(&grid_with(5, 5, &[(1, 1), (2, 1), (3, 1)]));
        assert_eq!(next.get(2, 2)?, Alive);
        Ok(())
    }

    #[test]
    fn lonely_cell_dies() -> Result<(), GridError> {
        let next = next_generation(&grid_with(5, 5, &[(2, 2), (1, 1)]));
        assert_eq!(next.get(2, 2)?, Dead);
        Ok(())
    }

    #[test]
    fn overcrowded_cell_dies() -> Result<(), GridError> {
        let grid = grid_with(5, 5, &[(2, 2), (1, 1), (2, 1), (3, 1), (1, 2)]);
        assert_eq!(live_neighbors(&grid, 2, 2), 4);
        assert_eq!(next_generation(&grid).get(2, 2)?, Dead);
        Ok(())
    }

    #[test]
    fn border_cells_are_killed() {
        // a full border ring would feed births at the corners of the interior
        let mut grid = Grid::new(5, 5);
        let border: Vec<_> = grid.iter().filter(|(x, y, _)| grid.is_border(*x, *y)).collect();
        for (x, y, _) in border {
            grid.set(x, y, Alive).expect("border cell in bounds");
        }
        let next = next_generation(&grid);
        assert!(next.iter().all(|(x, y, cell)| !next.is_border(x, y) || cell == Dead));
    }

    #[test]
    fn tiny_grids_have_no_interior() {
        for (cols, rows) in [(1, 1), (2, 5), (5, 2)] {
            let mut grid = Grid::new(cols, rows);
            grid.randomize();
            assert_eq!(next_generation(&grid).population(), 0);
        }
    }

    #[test]
    fn block_is_a_still_life() {
        let grid = grid_with(6, 6, &[(2, 2), (3, 2), (2, 3), (3, 3)]);
        assert_eq!(next_generation(&grid), grid);
    }

    #[test]
    fn blinker_oscillates() {
        let horizontal = grid_with(5, 5, &[(2, 1), (2, 2), (2, 3)]);
        let vertical = next_generation(&horizontal);
        assert_eq!(alive_cells(&vertical), vec![(1, 2), (2, 2), (3, 2)]);
        assert_eq!(next_generation(&vertical), horizontal);
    }
}
