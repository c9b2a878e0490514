//! Move advice for a grid.
//!
//! [`HeuristicAdvisor`] scores the grid each legal direction would produce
//! (empty cells, monotonic lines, max tile in a corner) and recommends the
//! best one. It only reads the grid it is given: no tile is spawned and no
//! move is committed.
//!
//! ```
//! use slide_2048::advisor::HeuristicAdvisor;
//! use slide_2048::engine::{Grid, GridValues};
//!
//! let rows: GridValues = [
//!     [None, None, None, None],
//!     [None, None, None, None],
//!     [None, None, None, None],
//!     [Some(2), Some(2), None, None],
//! ];
//! let g = Grid::from_values(&rows).unwrap();
//! let advisor = HeuristicAdvisor::new();
//! let dir = advisor.best_move(g).unwrap();
//! assert!(g.resolve(dir).changed);
//! ```
//!
//! The [`external`] module covers optional third-party advisors, which are
//! consulted only on request and never override this one.

pub mod external;
mod heuristic;

use crate::engine::{self, Grid, Move};
use crate::error::EngineError;

pub use heuristic::{HeuristicWeights, Terms, CORNER_WEIGHT, EMPTY_WEIGHT, MONOTONICITY_WEIGHT};

/// Heuristic value for one direction at the root.
///
/// - `score` is the weighted heuristic of the grid after taking `dir`.
/// - `legal` is false when the move is a no-op for the current grid; such
///   branches carry a score of 0 and are never recommended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchEval {
    pub dir: Move,
    pub score: f64,
    pub legal: bool,
}

/// One-ply heuristic advisor.
#[derive(Debug, Clone, Default)]
pub struct HeuristicAdvisor {
    weights: HeuristicWeights,
}

impl HeuristicAdvisor {
    pub fn new() -> Self { Self::with_weights(HeuristicWeights::default()) }

    pub fn with_weights(weights: HeuristicWeights) -> Self {
        engine::warm();
        heuristic::warm();
        Self { weights }
    }

    #[inline]
    pub fn weights(&self) -> &HeuristicWeights { &self.weights }

    /// Unweighted heuristic terms for `grid`.
    #[inline]
    pub fn terms(&self, grid: Grid) -> Terms { heuristic::terms(grid) }

    /// Weighted heuristic value of `grid` itself.
    #[inline]
    pub fn evaluate(&self, grid: Grid) -> f64 { heuristic::terms(grid).weighted(&self.weights) }

    /// Score each direction.
    ///
    /// Returns a fixed array in order: `[Up, Down, Left, Right]` and marks
    /// illegal moves as `legal=false`.
    pub fn branch_evals(&self, grid: Grid) -> [BranchEval; 4] {
        Move::ALL.map(|dir| {
            let outcome = grid.resolve(dir);
            if outcome.changed {
                BranchEval { dir, score: self.evaluate(outcome.grid), legal: true }
            } else {
                BranchEval { dir, score: 0.0, legal: false }
            }
        })
    }

    /// Best legal direction, ties going to the earlier entry of
    /// [`Move::PREFERENCE`]. Fails with `NoLegalMove` on a terminal grid.
    pub fn best_move(&self, grid: Grid) -> Result<Move, EngineError> {
        let evals = self.branch_evals(grid);
        let mut best: Option<(Move, f64)> = None;
        for dir in Move::PREFERENCE {
            let eval = evals[dir.index()];
            if !eval.legal {
                continue;
            }
            match best {
                Some((_, score)) if eval.score <= score => {}
                _ => best = Some((dir, eval.score)),
            }
        }
        best.map(|(dir, _)| dir).ok_or(EngineError::NoLegalMove)
    }
}
