//! A game of life engine on a fixed, non wrapping grid.
//!
//! [`Grid`] holds the cells and the generation / population counters and
//! advances them with the standard B3/S23 rule. Everything deciding *when*
//! to step lives outside of it: [`Sim`] drives a grid from its own thread,
//! the binary puts a terminal view on top.

pub use utils::{Pos, Region};
mod utils;

pub use error::{GridError, PatternError, SimError};
mod error;

pub use world::{Cell, Grid};
pub mod world;

pub use pattern::{Pattern, PATTERNS};
pub mod pattern;

pub use config::{Config, PopulationSize};
pub mod config;

pub use sim::{Sim, SimCmd, SimHandle, Snapshot};
pub mod sim;
