//! Board engine: grid storage, move resolution, spawning and terminal detection.
//!
//! Line moves come from lookup tables built once per process on first use,
//! so there is nothing to initialise. [`warm`] builds them eagerly, which is
//! handy before timing anything.

mod grid;
mod ops;
mod spawn;
pub(crate) mod tables;

pub use grid::{Grid, GridValues, CELLS, MAX_EXPONENT, MAX_TILE, SIZE};
pub use ops::{is_game_over, resolve, Move, MoveOutcome, ParseMoveError};
pub use spawn::{Spawned, Spawner, TWO_PROBABILITY};

/// Build the move lookup tables now instead of on the first move.
pub fn warm() {
    let _ = tables::tables();
}
