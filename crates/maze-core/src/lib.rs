//! Core maze engine.
//!
//! Builds rectangular perfect mazes (exactly one path between any two
//! cells) with a row-by-row Eller generator, solves them with a
//! right-hand wall follower, and reads/writes the two-matrix text
//! format. Rendering and input live in the shell crates; this crate
//! only exposes the model and the algorithms.

pub mod format;
mod generator;
mod grid;
mod solver;

pub use format::{FormatError, FormatResult};
pub use generator::{Generator, MAX_DIM};
pub use grid::{Grid, GridError, GridResult, Position};
pub use solver::{Solution, SolveBudget, SolveError, SolveResult, Solver};
