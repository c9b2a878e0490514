use rand::Rng;

use super::grid::{Grid, SIZE};
use crate::error::EngineError;

/// Default probability that a spawned tile is a 2 (otherwise a 4).
pub const TWO_PROBABILITY: f64 = 0.9;

/// A tile placed by [`Spawner::spawn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spawned {
    pub grid: Grid,
    pub row: usize,
    pub col: usize,
    pub value: u32,
}

/// Inserts one 2 (or, less often, 4) tile into a uniformly chosen empty cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spawner {
    two_probability: f64,
}

impl Default for Spawner {
    fn default() -> Self { Self { two_probability: TWO_PROBABILITY } }
}

impl Spawner {
    /// Spawner that places a 2 with probability `two_probability`.
    ///
    /// Returns `None` unless the probability lies in `[0, 1]` (NaN included).
    pub fn new(two_probability: f64) -> Option<Self> {
        (0.0..=1.0).contains(&two_probability).then_some(Self { two_probability })
    }

    /// Probability of spawning a 2; a 4 is spawned otherwise.
    #[inline]
    pub fn two_probability(&self) -> f64 { self.two_probability }

    /// Place a random tile using the provided RNG. The score is untouched.
    ///
    /// ```
    /// use slide_2048::engine::{Grid, Spawner};
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut rng = StdRng::seed_from_u64(123);
    /// let s = Spawner::default().spawn(Grid::EMPTY, &mut rng).unwrap();
    /// assert_eq!(s.grid.count_empty(), 15);
    /// assert!(s.value == 2 || s.value == 4);
    /// ```
    pub fn spawn<R: Rng + ?Sized>(&self, grid: Grid, rng: &mut R) -> Result<Spawned, EngineError> {
        let empty = grid.empty_cells();
        if empty.is_empty() {
            return Err(EngineError::NoEmptyCell);
        }
        let (row, col) = empty[rng.gen_range(0..empty.len())];
        let exponent = if rng.gen_bool(self.two_probability) { 1 } else { 2 };
        Ok(Spawned {
            grid: grid.with_exponent(row * SIZE + col, exponent),
            row,
            col,
            value: 1 << exponent,
        })
    }
}
