use std::fmt;

/// Cell coordinate, 0-based, row-major.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Default)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

#[macro_export]
macro_rules! pos {
    ($row:expr, $col:expr) => {
        $crate::Pos {
            row: $row,
            col: $col,
        }
    };
}

impl Pos {
    /// shifts the position, `None` when it would fall below zero.
    pub fn offset(self, d_row: isize, d_col: isize) -> Option<Pos> {
        let row = self.row.checked_add_signed(d_row)?;
        let col = self.col.checked_add_signed(d_col)?;
        Some(pos!(row, col))
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Inclusive rectangle of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    pub top: usize,
    pub left: usize,
    pub bottom: usize,
    pub right: usize,
}

impl Region {
    pub fn new(top: usize, left: usize, bottom: usize, right: usize) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// the whole of a `rows` x `cols` grid, `None` when either is zero.
    pub fn whole(rows: usize, cols: usize) -> Option<Self> {
        Some(Self::new(0, 0, rows.checked_sub(1)?, cols.checked_sub(1)?))
    }

    /// zero for an inverted region.
    pub fn height(&self) -> usize {
        (self.bottom + 1).saturating_sub(self.top)
    }

    /// zero for an inverted region.
    pub fn width(&self) -> usize {
        (self.right + 1).saturating_sub(self.left)
    }

    pub fn is_inverted(&self) -> bool {
        self.top > self.bottom || self.left > self.right
    }

    pub fn contains(&self, Pos { row, col }: Pos) -> bool {
        (self.top..=self.bottom).contains(&row) && (self.left..=self.right).contains(&col)
    }

    /// positions of the region, row-major.
    pub fn positions(&self) -> impl Iterator<Item = Pos> {
        let Region {
            top,
            left,
            bottom,
            right,
        } = *self;
        (top..=bottom).flat_map(move |row| (left..=right).map(move |col| pos!(row, col)))
    }
}

#[test]
fn test_offset() {
    assert_eq!(pos!(1, 1).offset(-1, -1), Some(pos!(0, 0)));
    assert_eq!(pos!(0, 3).offset(-1, 0), None);
    assert_eq!(pos!(0, 0).offset(0, -1), None);
    assert_eq!(pos!(2, 2).offset(1, 0), Some(pos!(3, 2)));
}

#[test]
fn test_region_positions() {
    let region = Region::new(1, 2, 2, 4);
    let positions: Vec<_> = region.positions().collect();
    assert_eq!(positions.len(), region.height() * region.width());
    assert_eq!(positions.first(), Some(&pos!(1, 2)));
    assert_eq!(positions.last(), Some(&pos!(2, 4)));
    assert!(region.contains(pos!(2, 3)));
    assert!(!region.contains(pos!(0, 3)));
    assert!(!region.contains(pos!(1, 5)));
}

#[test]
fn test_region_whole() {
    let region = Region::whole(3, 5).unwrap();
    assert_eq!(region, Region::new(0, 0, 2, 4));
    assert_eq!(region.positions().count(), 15);
    assert!(!region.is_inverted());
    assert!(Region::new(3, 0, 2, 4).is_inverted());
}

#[test]
fn test_degenerate_regions() {
    assert_eq!(Region::whole(0, 5), None);
    assert_eq!(Region::whole(5, 0), None);
    let inverted = Region::new(3, 4, 1, 2);
    assert_eq!(inverted.height(), 0);
    assert_eq!(inverted.width(), 0);
    assert_eq!(inverted.positions().count(), 0);
}
