//! Simulation engine.
//!
//! This module implements the square cell grid, the generation step under
//! Conway's rules, and the command surface external drivers use.

pub mod grid;
pub mod step;
pub mod simulation;

pub use grid::Grid;
pub use step::{CellChange, StepEngine};
pub use simulation::{Simulation, StepReport};
