use std::hash::{Hash, Hasher};

use metrohash::MetroHash64;

use crate::{pos, Cell, GridError, Pos, Region};

/// Moore neighborhood, the center excluded.
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// A fixed size, non wrapping game of life universe.
///
/// `generation` and `population` are only ever changed by the grid's own
/// mutation methods, so `population` always matches the live cell count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
    generation: u64,
    population: u64,
}

impl Grid {
    /// creates a grid with every cell dead.
    pub fn new(rows: usize, cols: usize) -> Result<Self, GridError> {
        if rows == 0 || cols == 0 {
            return Err(GridError::InvalidDimensions { rows, cols });
        }
        Ok(Self {
            rows,
            cols,
            cells: vec![Cell::dead(); rows * cols],
            generation: 0,
            population: 0,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn population(&self) -> u64 {
        self.population
    }

    /// the region covering every cell.
    pub fn region(&self) -> Region {
        Region::new(0, 0, self.rows - 1, self.cols - 1)
    }

    pub fn contains(&self, Pos { row, col }: Pos) -> bool {
        row < self.rows && col < self.cols
    }

    pub(crate) fn check(&self, pos: Pos) -> Result<(), GridError> {
        if self.contains(pos) {
            Ok(())
        } else {
            Err(GridError::OutOfBounds {
                pos,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    pub(crate) fn check_region(&self, region: Region) -> Result<(), GridError> {
        if region.is_inverted() || region.bottom >= self.rows || region.right >= self.cols {
            return Err(GridError::RegionOutOfBounds {
                region,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }

    fn index(&self, Pos { row, col }: Pos) -> usize {
        row * self.cols + col
    }

    pub fn cell(&self, pos: Pos) -> Result<&Cell, GridError> {
        self.check(pos)?;
        Ok(&self.cells[self.index(pos)])
    }

    pub fn is_alive(&self, pos: Pos) -> Result<bool, GridError> {
        self.cell(pos).map(Cell::is_alive)
    }

    /// flips the cell, returning its new state.
    pub fn toggle(&mut self, pos: Pos) -> Result<bool, GridError> {
        let alive = !self.is_alive(pos)?;
        self.set_alive(pos, alive)?;
        Ok(alive)
    }

    /// sets the cell state, returning whether it changed.
    pub fn set_alive(&mut self, pos: Pos, alive: bool) -> Result<bool, GridError> {
        self.check(pos)?;
        let index = self.index(pos);
        let cell = &mut self.cells[index];
        if cell.is_alive() == alive {
            return Ok(false);
        }
        cell.set_alive(alive);
        if alive {
            self.population += 1;
        } else {
            self.population -= 1;
        }
        Ok(true)
    }

    /// same as replacing the grid with a fresh one of the same dimensions.
    pub fn reset(&mut self) {
        self.cells.fill(Cell::dead());
        self.generation = 0;
        self.population = 0;
    }

    /// every cell as `(row, col, alive)`, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, bool)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(index, cell)| (index / cols, index % cols, cell.is_alive()))
    }

    /// positions of the live cells, row-major.
    pub fn actives(&self) -> impl Iterator<Item = Pos> + '_ {
        self.cells()
            .filter_map(|(row, col, alive)| alive.then_some(pos!(row, col)))
    }

    /// in-bounds Moore neighbors of `pos`, without wraparound.
    pub fn neighbors(&self, pos: Pos) -> Result<impl Iterator<Item = Pos> + '_, GridError> {
        self.check(pos)?;
        Ok(self.neighbors_of(pos))
    }

    pub fn neighbor_count(&self, pos: Pos) -> Result<u8, GridError> {
        self.check(pos)?;
        Ok(self.live_neighbor_count(pos))
    }

    fn neighbors_of(&self, pos: Pos) -> impl Iterator<Item = Pos> + '_ {
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(move |&(d_row, d_col)| pos.offset(d_row, d_col))
            .filter(move |&neighbor| self.contains(neighbor))
    }

    fn live_neighbor_count(&self, pos: Pos) -> u8 {
        self.neighbors_of(pos)
            .filter(|&neighbor| self.cells[self.index(neighbor)].is_alive())
            .count() as u8
    }

    /// computes and commits one generation.
    ///
    /// Every cell is marked against the committed state before any of them
    /// is changed, so the step is synchronous.
    pub fn advance_generation(&mut self) {
        for index in 0..self.cells.len() {
            let pos = pos!(index / self.cols, index % self.cols);
            let count = self.live_neighbor_count(pos);
            self.cells[index].mark(count);
        }

        let mut population = self.population as i64;
        for cell in self.cells.iter_mut() {
            population += cell.commit() as i64;
        }
        self.population = population as u64;
        self.generation += 1;
    }

    /// hash of the dimensions and cell states, blind to the counters.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = MetroHash64::default();
        self.rows.hash(&mut hasher);
        self.cols.hash(&mut hasher);
        for cell in &self.cells {
            cell.is_alive().hash(&mut hasher);
        }
        hasher.finish()
    }

    /// recounts the live cells after a bulk change.
    pub(crate) fn recount(&mut self) {
        self.population = self.cells.iter().filter(|cell| cell.is_alive()).count() as u64;
    }

    pub(crate) fn cell_mut(&mut self, pos: Pos) -> &mut Cell {
        let index = self.index(pos);
        &mut self.cells[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with(rows: usize, cols: usize, actives: &[(usize, usize)]) -> Grid {
        let mut grid = Grid::new(rows, cols).unwrap();
        for &(row, col) in actives {
            grid.set_alive(pos!(row, col), true).unwrap();
        }
        grid
    }

    fn actives(grid: &Grid) -> Vec<(usize, usize)> {
        grid.actives().map(|Pos { row, col }| (row, col)).collect()
    }

    fn assert_consistent(grid: &Grid) {
        let counted = grid.cells().filter(|&(_, _, alive)| alive).count() as u64;
        assert_eq!(grid.population(), counted);
        assert!(grid.cells.iter().all(|cell| !cell.is_pending()));
    }

    #[test]
    fn rejects_empty_dimensions() {
        assert_eq!(
            Grid::new(0, 4),
            Err(GridError::InvalidDimensions { rows: 0, cols: 4 })
        );
        assert_eq!(
            Grid::new(4, 0),
            Err(GridError::InvalidDimensions { rows: 4, cols: 0 })
        );
        assert!(Grid::new(1, 1).is_ok());
    }

    #[test]
    fn new_grid_is_empty() {
        let grid = Grid::new(4, 7).unwrap();
        assert_eq!(grid.rows(), 4);
        assert_eq!(grid.cols(), 7);
        assert_eq!(grid.generation(), 0);
        assert_eq!(grid.population(), 0);
        assert_eq!(grid.cells().count(), 28);
        assert!(grid.cells().all(|(_, _, alive)| !alive));
    }

    #[test]
    fn cells_are_row_major() {
        let grid = grid_with(2, 3, &[(1, 0)]);
        let cells: Vec<_> = grid.cells().collect();
        assert_eq!(
            cells,
            vec![
                (0, 0, false),
                (0, 1, false),
                (0, 2, false),
                (1, 0, true),
                (1, 1, false),
                (1, 2, false),
            ]
        );
    }

    #[test]
    fn toggle_updates_population() {
        let mut grid = Grid::new(3, 3).unwrap();
        assert_eq!(grid.toggle(pos!(1, 2)), Ok(true));
        assert_eq!(grid.population(), 1);
        assert_eq!(grid.is_alive(pos!(1, 2)), Ok(true));
        assert_eq!(grid.toggle(pos!(1, 2)), Ok(false));
        assert_eq!(grid.population(), 0);
        assert_eq!(grid.generation(), 0);
        assert_consistent(&grid);
    }

    #[test]
    fn set_alive_is_idempotent() {
        let mut grid = Grid::new(3, 3).unwrap();
        assert_eq!(grid.set_alive(pos!(0, 0), true), Ok(true));
        assert_eq!(grid.set_alive(pos!(0, 0), true), Ok(false));
        assert_eq!(grid.population(), 1);
        assert_eq!(grid.set_alive(pos!(0, 0), false), Ok(true));
        assert_eq!(grid.set_alive(pos!(0, 0), false), Ok(false));
        assert_eq!(grid.population(), 0);
    }

    #[test]
    fn out_of_bounds_is_rejected() {
        let mut grid = Grid::new(3, 4).unwrap();
        let expected = Err(GridError::OutOfBounds {
            pos: pos!(3, 0),
            rows: 3,
            cols: 4,
        });
        assert_eq!(grid.is_alive(pos!(3, 0)), expected);
        assert_eq!(grid.toggle(pos!(3, 0)), expected);
        assert_eq!(grid.set_alive(pos!(3, 0), true), expected);
        assert!(grid.is_alive(pos!(0, 4)).is_err());
        assert!(grid.neighbor_count(pos!(0, 4)).is_err());
        assert!(grid.neighbors(pos!(9, 9)).is_err());
        assert_eq!(grid.population(), 0);
    }

    #[test]
    fn counts_neighbors_around_center() {
        let grid = grid_with(3, 3, &[(1, 1)]);
        for (row, col, _) in grid.cells() {
            let expected = if (row, col) == (1, 1) { 0 } else { 1 };
            assert_eq!(grid.neighbor_count(pos!(row, col)), Ok(expected));
        }
    }

    #[test]
    fn corners_do_not_wrap() {
        for (rows, cols) in [(1, 1), (2, 2), (3, 5), (40, 40)] {
            let grid = Grid::new(rows, cols).unwrap();
            assert!(grid.neighbors(pos!(0, 0)).unwrap().count() <= 3);
            assert!(grid.neighbors(pos!(rows - 1, cols - 1)).unwrap().count() <= 3);
        }
        let grid = Grid::new(5, 5).unwrap();
        assert_eq!(grid.neighbors(pos!(0, 0)).unwrap().count(), 3);
        assert_eq!(grid.neighbors(pos!(0, 2)).unwrap().count(), 5);
        assert_eq!(grid.neighbors(pos!(2, 2)).unwrap().count(), 8);

        // a full opposite edge must not leak into the corner.
        let grid = grid_with(4, 4, &[(3, 0), (3, 1), (3, 3), (0, 3), (1, 3)]);
        assert_eq!(grid.neighbor_count(pos!(0, 0)), Ok(0));
    }

    #[test]
    fn block_is_still() {
        let block = [(1, 1), (1, 2), (2, 1), (2, 2)];
        let mut grid = grid_with(4, 4, &block);
        for generation in 1..=5 {
            grid.advance_generation();
            assert_eq!(actives(&grid), block);
            assert_eq!(grid.population(), 4);
            assert_eq!(grid.generation(), generation);
            assert_consistent(&grid);
        }
    }

    #[test]
    fn blinker_oscillates() {
        let horizontal = [(2, 1), (2, 2), (2, 3)];
        let vertical = [(1, 2), (2, 2), (3, 2)];
        let mut grid = grid_with(5, 5, &horizontal);

        grid.advance_generation();
        assert_eq!(actives(&grid), vertical);
        assert_eq!(grid.population(), 3);

        grid.advance_generation();
        assert_eq!(actives(&grid), horizontal);
        assert_eq!(grid.population(), 3);
        assert_eq!(grid.generation(), 2);
        assert_consistent(&grid);
    }

    #[test]
    fn step_is_synchronous() {
        // updating in place, (2, 1) would see the birth at (1, 2) and survive.
        let mut grid = grid_with(5, 5, &[(2, 1), (2, 2), (2, 3)]);
        grid.advance_generation();
        assert_eq!(grid.is_alive(pos!(2, 1)), Ok(false));
        assert_eq!(grid.is_alive(pos!(2, 3)), Ok(false));
    }

    #[test]
    fn tromino_becomes_block() {
        let mut grid = grid_with(4, 4, &[(0, 0), (0, 1), (1, 0)]);
        grid.advance_generation();
        assert_eq!(actives(&grid), [(0, 0), (0, 1), (1, 0), (1, 1)]);
        assert_consistent(&grid);
    }

    #[test]
    fn glider_hits_the_wall_without_wrapping() {
        let mut grid = grid_with(6, 6, &[(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)]);
        for _ in 0..40 {
            grid.advance_generation();
            assert_consistent(&grid);
        }
        // a glider crashing into the corner settles into a block.
        assert_eq!(actives(&grid), [(4, 4), (4, 5), (5, 4), (5, 5)]);
    }

    #[test]
    fn lone_cells_die() {
        let mut grid = grid_with(1, 1, &[(0, 0)]);
        grid.advance_generation();
        assert_eq!(grid.population(), 0);
        assert_eq!(grid.generation(), 1);
        grid.advance_generation();
        assert_eq!(grid.generation(), 2);
    }

    #[test]
    fn reset_matches_fresh_grid() {
        let mut grid = grid_with(5, 6, &[(2, 1), (2, 2), (2, 3)]);
        grid.advance_generation();
        grid.advance_generation();
        grid.reset();
        assert_eq!(grid, Grid::new(5, 6).unwrap());
    }

    #[test]
    fn fingerprint_follows_cells() {
        let horizontal = grid_with(5, 5, &[(2, 1), (2, 2), (2, 3)]);
        let mut grid = horizontal.clone();
        grid.advance_generation();
        assert_ne!(grid.fingerprint(), horizontal.fingerprint());
        grid.advance_generation();
        assert_eq!(grid.fingerprint(), horizontal.fingerprint());
        assert_ne!(
            Grid::new(2, 8).unwrap().fingerprint(),
            Grid::new(4, 4).unwrap().fingerprint()
        );
    }
}
