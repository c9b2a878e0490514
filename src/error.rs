//! Engine error kinds.
//!
//! All of these are local and recoverable; none leave a [`GameSession`]
//! in a partially-updated state.
//!
//! [`GameSession`]: crate::session::GameSession

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("cell ({row}, {col}) is outside the 4x4 grid")]
    OutOfBounds { row: usize, col: usize },
    #[error("no empty cell to spawn a tile into")]
    NoEmptyCell,
    #[error("no legal move available")]
    NoLegalMove,
    /// `cols` is the length of the first offending row (or of the flat input).
    #[error("expected a 4x4 grid, got {rows} rows with a row of {cols} cells")]
    InvalidGridShape { rows: usize, cols: usize },
    #[error("invalid tile value {value} at ({row}, {col}); tiles are powers of two from 2 to 32768")]
    InvalidTileValue { row: usize, col: usize, value: u32 },
}
