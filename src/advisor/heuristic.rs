use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::engine::tables::line_to_exponents;
use crate::engine::{Grid, SIZE};

pub const EMPTY_WEIGHT: f64 = 10.0;
pub const MONOTONICITY_WEIGHT: f64 = 4.0;
pub const CORNER_WEIGHT: f64 = 1.0;

/// Relative weights of the three heuristic terms.
///
/// Defaults rank empty cells first, then monotonic lines, then the corner
/// bonus. The exact ratios are tuning knobs, not a contract.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicWeights {
    pub empty: f64,
    pub monotonicity: f64,
    pub corner: f64,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self { empty: EMPTY_WEIGHT, monotonicity: MONOTONICITY_WEIGHT, corner: CORNER_WEIGHT }
    }
}

/// The unweighted terms for one grid.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Terms {
    /// Empty cells, 0..=16.
    pub empty: f64,
    /// Monotonic rows plus monotonic columns, 0..=8.
    pub monotonicity: f64,
    /// log2 of the max tile when it sits in a corner, else 0.
    pub corner: f64,
}

impl Terms {
    #[inline]
    pub fn weighted(&self, w: &HeuristicWeights) -> f64 {
        w.empty * self.empty + w.monotonicity * self.monotonicity + w.corner * self.corner
    }
}

static MONOTONE_LINES: OnceLock<Box<[bool]>> = OnceLock::new();

pub(crate) fn warm() {
    let _ = monotone_lines();
}

fn monotone_lines() -> &'static [bool] {
    MONOTONE_LINES
        .get_or_init(|| {
            let mut v = vec![false; 0x1_0000];
            for (i, slot) in v.iter_mut().enumerate() {
                *slot = is_monotone(line_to_exponents(i as u16));
            }
            v.into_boxed_slice()
        })
        .as_ref()
}

/// Non-decreasing or non-increasing end to end, empty cells counting as 0.
fn is_monotone(tiles: [u8; 4]) -> bool {
    let ascending = tiles.windows(2).all(|w| w[0] <= w[1]);
    let descending = tiles.windows(2).all(|w| w[0] >= w[1]);
    ascending || descending
}

pub(crate) fn terms(grid: Grid) -> Terms {
    let table = monotone_lines();
    let transposed = grid.transpose();
    let monotone = (0..SIZE).fold(0usize, |acc, idx| {
        acc + table[grid.line(idx) as usize] as usize + table[transposed.line(idx) as usize] as usize
    });
    Terms {
        empty: grid.count_empty() as f64,
        monotonicity: monotone as f64,
        corner: corner_term(grid),
    }
}

fn corner_term(grid: Grid) -> f64 {
    let max = grid.max_exponent();
    if max == 0 {
        return 0.0;
    }
    let last = SIZE * SIZE - 1;
    let in_corner = [0, SIZE - 1, last - (SIZE - 1), last]
        .iter()
        .any(|&idx| grid.exponent(idx) == max);
    if in_corner { max as f64 } else { 0.0 }
}
