#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Cell {
    alive: bool,
    // working storage of `Grid::advance_generation`, always cleared on return.
    pending_death: bool,
    pending_birth: bool,
}

impl Cell {
    pub fn alive() -> Self {
        Self {
            alive: true,
            ..Self::default()
        }
    }

    pub fn dead() -> Self {
        Self::default()
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// whether a transition is marked but not yet committed.
    pub fn is_pending(&self) -> bool {
        self.pending_death || self.pending_birth
    }

    pub(crate) fn set_alive(&mut self, alive: bool) {
        self.alive = alive;
    }

    /// marks the transition implied by the live neighbor count (B3/S23).
    pub(crate) fn mark(&mut self, neighbor_count: u8) {
        match (self.alive, neighbor_count) {
            (true, count) if count < 2 || count > 3 => self.pending_death = true,
            (false, 3) => self.pending_birth = true,
            _ => (),
        }
    }

    /// applies the marked transition, returning the population delta.
    pub(crate) fn commit(&mut self) -> i8 {
        if self.pending_death {
            self.pending_death = false;
            self.alive = false;
            -1
        } else if self.pending_birth {
            self.pending_birth = false;
            self.alive = true;
            1
        } else {
            0
        }
    }
}

pub use grid::Grid;
mod grid;

pub use seed::MAX_DENSITY;
mod seed;

#[test]
fn test_cell_rules() {
    let cases = [
        (true, 0, false),
        (true, 1, false),
        (true, 2, true),
        (true, 3, true),
        (true, 4, false),
        (true, 8, false),
        (false, 2, false),
        (false, 3, true),
        (false, 4, false),
    ];
    for (alive, count, expected) in cases {
        let mut cell = if alive { Cell::alive() } else { Cell::dead() };
        cell.mark(count);
        assert!(!(cell.pending_birth && cell.pending_death));
        let delta = cell.commit();
        assert_eq!(cell.is_alive(), expected, "alive={alive} count={count}");
        assert_eq!(delta, expected as i8 - alive as i8);
        assert!(!cell.is_pending());
    }
}
