//! Error types for grid construction and action parsing.

use crate::environment::Pos;

/// Errors raised while building a grid world or interpreting driver input.
///
/// Moves that hit a wall or an obstacle are not errors: they are rejected
/// silently by [`GridWorld::r#move`](crate::GridWorld::r#move).
#[derive(thiserror::Error, Debug)]
pub enum GridError {
    #[error("grid must have at least one row and one column")]
    EmptyGrid,
    #[error("layout infeasible: {cells} cells cannot hold {required} distinct special cells")]
    LayoutInfeasible { cells: usize, required: usize },
    #[error("invalid action: {0:?} (expected one of U, D, L, R)")]
    InvalidAction(String),
    #[error("position {pos} is outside a {width}x{height} grid")]
    OutOfBounds { pos: Pos, width: usize, height: usize },
    #[error("position {0} is used by more than one special cell")]
    Overlap(Pos),
    #[error("layout has {actual} obstacles, config asks for {expected}")]
    ObstacleCount { expected: usize, actual: usize },
    #[error("per-cell data has shape {actual:?}, grid is {expected:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },
    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),
}

/// Convenience alias for results using GridError.
pub type Result<T> = std::result::Result<T, GridError>;
