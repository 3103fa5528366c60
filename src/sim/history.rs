use std::collections::VecDeque;

use crate::Grid;

pub const HISTORY_LEN: usize = 10;

/// The latest generations, used to notice when the simulation keeps
/// revisiting the same states. Fingerprints narrow the search, cell states
/// confirm a match.
#[derive(Debug, Clone, Default)]
pub struct History {
    states: VecDeque<(u64, Vec<bool>)>,
}

impl History {
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// remembers the grid's cells, returns whether they were already known.
    pub fn record(&mut self, grid: &Grid) -> bool {
        let cells = grid.cells().map(|(_, _, alive)| alive).collect();
        self.record_state(grid.fingerprint(), cells)
    }

    fn record_state(&mut self, fingerprint: u64, cells: Vec<bool>) -> bool {
        let known = self
            .states
            .iter()
            .any(|(known, known_cells)| *known == fingerprint && *known_cells == cells);
        if self.states.len() == HISTORY_LEN {
            self.states.pop_front();
        }
        self.states.push_back((fingerprint, cells));
        known
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pos;

    #[test]
    fn test_record() {
        let mut grid = Grid::new(3, 3).unwrap();
        let mut history = History::default();
        assert!(history.is_empty());
        assert!(!history.record(&grid));
        grid.toggle(pos!(1, 1)).unwrap();
        assert!(!history.record(&grid));
        grid.toggle(pos!(1, 1)).unwrap();
        assert!(history.record(&grid));
        history.clear();
        assert!(!history.record(&grid));
    }

    #[test]
    fn test_colliding_fingerprints() {
        let mut history = History::default();
        assert!(!history.record_state(7, vec![true, false]));
        assert!(!history.record_state(7, vec![false, true]));
        assert!(history.record_state(7, vec![true, false]));
    }

    #[test]
    fn test_forgets_oldest() {
        let mut history = History::default();
        for fingerprint in 0..=HISTORY_LEN as u64 {
            assert!(!history.record_state(fingerprint, vec![]));
        }
        assert!(!history.record_state(0, vec![]));
        assert!(history.record_state(HISTORY_LEN as u64, vec![]));
    }
}
