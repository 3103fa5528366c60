use thiserror::Error;

use crate::{Pos, Region};

/// Rejections raised by the grid itself.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    #[error("grid dimensions must be positive, got {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },
    #[error("position {pos} is outside of the {rows}x{cols} grid")]
    OutOfBounds { pos: Pos, rows: usize, cols: usize },
    #[error("region {region:?} does not fit in the {rows}x{cols} grid")]
    RegionOutOfBounds {
        region: Region,
        rows: usize,
        cols: usize,
    },
    #[error("density must be between 0 and 100 percent, got {0}")]
    InvalidDensity(u32),
}

/// Failures of a request sent to a running simulation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimError {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("cells cannot be edited while the simulation is running")]
    Running,
    #[error("the simulation loop has stopped")]
    Disconnected,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("unknown pattern `{0}`")]
    Unknown(String),
    #[error("pattern has no live cell")]
    Empty,
    #[error("a {height}x{width} pattern does not fit in a {rows}x{cols} grid")]
    TooLarge {
        height: usize,
        width: usize,
        rows: usize,
        cols: usize,
    },
}
