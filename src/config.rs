use std::{fmt, str::FromStr, time::Duration};

use crate::Region;

pub const DEFAULT_ROWS: usize = 70;
pub const DEFAULT_COLS: usize = 156;
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(200);
pub const DEFAULT_DENSITY: u32 = 50;

/// Settings of the driver, the grid itself knows none of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub rows: usize,
    pub cols: usize,
    pub tick_interval: Duration,
    pub density: u32,
    pub population_size: PopulationSize,
    /// seeds the generator used for random populations, entropy when `None`.
    pub seed: Option<u64>,
    pub stop_on_cycle: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            tick_interval: DEFAULT_TICK_INTERVAL,
            density: DEFAULT_DENSITY,
            population_size: PopulationSize::default(),
            seed: None,
            stop_on_cycle: true,
        }
    }
}

/// Area covered by a generated population, centered on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PopulationSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl PopulationSize {
    pub const ALL: [PopulationSize; 3] = [Self::Small, Self::Medium, Self::Large];

    /// share of each dimension covered, as a divisor.
    fn divisor(self) -> usize {
        match self {
            Self::Small => 8,
            Self::Medium => 4,
            Self::Large => 1,
        }
    }

    /// the preset's region on a `rows` x `cols` grid, never empty. On a zero
    /// sized grid it is a single cell the grid rejects as out of bounds.
    pub fn region(self, rows: usize, cols: usize) -> Region {
        let (top, bottom) = centered_span(rows, self.divisor());
        let (left, right) = centered_span(cols, self.divisor());
        Region::new(top, left, bottom, right)
    }
}

fn centered_span(len: usize, divisor: usize) -> (usize, usize) {
    let span = (len / divisor).max(1);
    let start = len.saturating_sub(span) / 2;
    (start, start + span - 1)
}

impl fmt::Display for PopulationSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        };
        f.write_str(name)
    }
}

impl FromStr for PopulationSize {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "s" | "small" => Ok(Self::Small),
            "m" | "medium" => Ok(Self::Medium),
            "l" | "large" => Ok(Self::Large),
            other => Err(format!(
                "unknown population size `{other}`, expected small, medium or large"
            )),
        }
    }
}

#[test]
fn test_preset_regions() {
    assert_eq!(PopulationSize::Large.region(70, 156), Region::new(0, 0, 69, 155));
    assert_eq!(PopulationSize::Medium.region(70, 156), Region::new(26, 58, 42, 96));
    assert_eq!(PopulationSize::Small.region(70, 156), Region::new(31, 68, 38, 86));
    for size in PopulationSize::ALL {
        let region = size.region(1, 3);
        assert_eq!(region.height(), 1);
        assert!(region.bottom < 1 && region.right < 3);
        assert_eq!(size.region(0, 0), Region::new(0, 0, 0, 0));
    }
}

#[test]
fn test_preset_names() {
    for size in PopulationSize::ALL {
        assert_eq!(size.to_string().parse(), Ok(size));
    }
    assert_eq!("S".parse(), Ok(PopulationSize::Small));
    assert!("huge".parse::<PopulationSize>().is_err());
}
