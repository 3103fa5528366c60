use crate::{pos, Grid, GridError, PatternError, Pos};

/// A set of live cells relative to the pattern's top left corner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    cells: Vec<Pos>,
    height: usize,
    width: usize,
}

const GLIDER: &str = "\
.#.
..#
###";

const BLINKER: &str = "###";

const TOAD: &str = "\
.###
###.";

const BEACON: &str = "\
##..
##..
..##
..##";

const PULSAR: &str = "\
..###...###..
.............
#....#.#....#
#....#.#....#
#....#.#....#
..###...###..
.............
..###...###..
#....#.#....#
#....#.#....#
#....#.#....#
.............
..###...###..";

const R_PENTOMINO: &str = "\
.##
##.
.#.";

const GOSPER_GLIDER_GUN: &str = "\
........................#...........
......................#.#...........
............##......##............##
...........#...#....##............##
##........#.....#...##..............
##........#...#.##....#.#...........
..........#.....#.......#...........
...........#...#....................
............##......................";

pub const PATTERNS: &[(&str, &str)] = &[
    ("glider", GLIDER),
    ("blinker", BLINKER),
    ("toad", TOAD),
    ("beacon", BEACON),
    ("pulsar", PULSAR),
    ("r-pentomino", R_PENTOMINO),
    ("gosper-glider-gun", GOSPER_GLIDER_GUN),
];

impl Pattern {
    /// Reads a plain text pattern: `#` or `O` is a live cell, any other
    /// character a dead one, lines starting with `!` are comments.
    pub fn parse(text: &str) -> Result<Self, PatternError> {
        let cells: Vec<Pos> = text
            .lines()
            .filter(|line| !line.starts_with('!'))
            .enumerate()
            .flat_map(|(row, line)| {
                line.chars()
                    .enumerate()
                    .filter(|&(_, c)| c == '#' || c == 'O')
                    .map(move |(col, _)| pos!(row, col))
            })
            .collect();
        Self::from_cells(cells)
    }

    pub fn named(name: &str) -> Result<Self, PatternError> {
        let (_, text) = PATTERNS
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(name))
            .ok_or_else(|| PatternError::Unknown(name.to_string()))?;
        Self::parse(text)
    }

    /// trims empty leading rows and columns.
    fn from_cells(cells: Vec<Pos>) -> Result<Self, PatternError> {
        let top = cells.iter().map(|p| p.row).min().ok_or(PatternError::Empty)?;
        let left = cells.iter().map(|p| p.col).min().ok_or(PatternError::Empty)?;
        let cells: Vec<Pos> = cells
            .into_iter()
            .map(|p| pos!(p.row - top, p.col - left))
            .collect();
        let height = cells.iter().map(|p| p.row + 1).max().unwrap_or(0);
        let width = cells.iter().map(|p| p.col + 1).max().unwrap_or(0);
        Ok(Self {
            cells,
            height,
            width,
        })
    }

    pub fn cells(&self) -> &[Pos] {
        &self.cells
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// origin placing the pattern in the middle of `grid`.
    pub fn centered_in(&self, grid: &Grid) -> Result<Pos, PatternError> {
        if self.height > grid.rows() || self.width > grid.cols() {
            return Err(PatternError::TooLarge {
                height: self.height,
                width: self.width,
                rows: grid.rows(),
                cols: grid.cols(),
            });
        }
        Ok(pos!(
            (grid.rows() - self.height) / 2,
            (grid.cols() - self.width) / 2
        ))
    }

    /// Sets the pattern's cells alive with its corner at `origin`. Other
    /// cells are left as they are. The grid is untouched when the pattern
    /// does not fit.
    pub fn stamp(&self, grid: &mut Grid, origin: Pos) -> Result<(), GridError> {
        let placed: Vec<Pos> = self
            .cells
            .iter()
            .map(|p| pos!(origin.row + p.row, origin.col + p.col))
            .collect();
        if let Some(&outside) = placed.iter().find(|&&p| !grid.contains(p)) {
            return Err(GridError::OutOfBounds {
                pos: outside,
                rows: grid.rows(),
                cols: grid.cols(),
            });
        }
        for pos in placed {
            grid.set_alive(pos, true)?;
        }
        Ok(())
    }
}

#[test]
fn test_parse() {
    let pattern = Pattern::parse("!comment\n..#\n\n.O.").unwrap();
    assert_eq!(pattern.cells(), &[pos!(0, 1), pos!(2, 0)]);
    assert_eq!((pattern.height(), pattern.width()), (3, 2));
    assert_eq!(Pattern::parse("...\n.."), Err(PatternError::Empty));
}

#[test]
fn test_named() {
    for (name, _) in PATTERNS {
        assert!(Pattern::named(name).is_ok(), "{name}");
    }
    assert_eq!(Pattern::named("Glider").unwrap().cells().len(), 5);
    assert_eq!(Pattern::named("pulsar").unwrap().cells().len(), 48);
    assert_eq!(Pattern::named("gosper-glider-gun").unwrap().cells().len(), 36);
    assert_eq!(
        Pattern::named("spaceship"),
        Err(PatternError::Unknown("spaceship".to_string()))
    );
}

#[test]
fn test_stamp() {
    let mut grid = Grid::new(5, 5).unwrap();
    let blinker = Pattern::named("blinker").unwrap();
    let origin = blinker.centered_in(&grid).unwrap();
    assert_eq!(origin, pos!(2, 1));
    blinker.stamp(&mut grid, origin).unwrap();
    assert_eq!(grid.population(), 3);

    let mut grid = Grid::new(5, 5).unwrap();
    assert!(blinker.stamp(&mut grid, pos!(0, 3)).is_err());
    assert_eq!(grid.population(), 0);
    assert!(matches!(
        Pattern::named("pulsar").unwrap().centered_in(&grid),
        Err(PatternError::TooLarge { .. })
    ));
}

#[test]
fn test_pulsar_period() {
    let mut grid = Grid::new(17, 17).unwrap();
    let pulsar = Pattern::named("pulsar").unwrap();
    let origin = pulsar.centered_in(&grid).unwrap();
    pulsar.stamp(&mut grid, origin).unwrap();
    let start = grid.fingerprint();
    grid.advance_generation();
    assert_ne!(grid.fingerprint(), start);
    grid.advance_generation();
    grid.advance_generation();
    assert_eq!(grid.fingerprint(), start);
}
