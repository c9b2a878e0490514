use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::grid::{Grid, Line, SIZE};
use super::tables::tables;

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// Every direction, in the order used by [`BranchEval`] arrays.
    ///
    /// [`BranchEval`]: crate::advisor::BranchEval
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// Tie-break order when two directions score the same: earlier wins.
    pub const PREFERENCE: [Move; 4] = [Move::Up, Move::Left, Move::Down, Move::Right];

    /// Position of this direction within [`Move::ALL`].
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Move::Up => 0,
            Move::Down => 1,
            Move::Left => 2,
            Move::Right => 3,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Move::Up => "up",
            Move::Down => "down",
            Move::Left => "left",
            Move::Right => "right",
        };
        f.write_str(s)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognised direction {0:?}")]
pub struct ParseMoveError(pub String);

impl FromStr for Move {
    type Err = ParseMoveError;

    /// Accepts direction names in any case and the WASD keys.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "w" => Ok(Move::Up),
            "down" | "s" => Ok(Move::Down),
            "left" | "a" => Ok(Move::Left),
            "right" | "d" => Ok(Move::Right),
            _ => Err(ParseMoveError(s.to_string())),
        }
    }
}

/// Result of resolving one direction against a grid.
///
/// `changed` is true iff `grid` differs from the input in any cell; a pure
/// slide with no merge still counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub grid: Grid,
    pub score_delta: u64,
    pub changed: bool,
}

/// Slide/merge tiles in the given direction. No randomness.
///
/// Every direction is computed as a left slide: rows are reversed for
/// `Right`, and the grid is transposed for `Up`/`Down`.
///
/// ```
/// use slide_2048::engine::{resolve, Grid, GridValues, Move};
/// let rows: GridValues = [
///     [Some(2), Some(2), Some(2), None],
///     [None; 4],
///     [None; 4],
///     [None; 4],
/// ];
/// let g = Grid::from_values(&rows).unwrap();
/// let out = resolve(g, Move::Left);
/// assert_eq!(out.grid.values()[0], [Some(4), Some(2), None, None]);
/// assert_eq!(out.score_delta, 4);
/// assert!(out.changed);
/// ```
pub fn resolve(grid: Grid, direction: Move) -> MoveOutcome {
    let (moved, score_delta) = match direction {
        Move::Left | Move::Right => shift_rows(grid, direction),
        Move::Up | Move::Down => {
            let (g, delta) = shift_rows(grid.transpose(), column_as_row(direction));
            (g.transpose(), delta)
        }
    };
    MoveOutcome { grid: moved, score_delta, changed: moved != grid }
}

/// True if no direction changes the grid.
///
/// Always recomputed from the grid; nothing is cached between spawns.
pub fn is_game_over(grid: Grid) -> bool {
    if !grid.is_full() {
        return false;
    }
    Move::ALL.iter().all(|&dir| !resolve(grid, dir).changed)
}

impl Grid {
    /// Return the grid resulting from sliding/merging tiles in `dir`.
    #[inline]
    pub fn slide(self, dir: Move) -> Self { resolve(self, dir).grid }

    /// Full [`MoveOutcome`] for `dir`.
    #[inline]
    pub fn resolve(self, dir: Move) -> MoveOutcome { resolve(self, dir) }

    /// Return true if no legal moves remain.
    #[inline]
    pub fn is_game_over(self) -> bool { is_game_over(self) }

    /// Directions that would change this grid, in [`Move::ALL`] order.
    pub fn legal_moves(self) -> Vec<Move> {
        Move::ALL.into_iter().filter(|&dir| resolve(self, dir).changed).collect()
    }
}

#[inline]
fn column_as_row(direction: Move) -> Move {
    match direction {
        Move::Up => Move::Left,
        Move::Down => Move::Right,
        other => other,
    }
}

fn shift_rows(grid: Grid, direction: Move) -> (Grid, u64) {
    let t = tables();
    let (table, deltas): (&[Line], &[u32]) = match direction {
        Move::Left => (&t.left[..], &t.left_delta[..]),
        Move::Right => (&t.right[..], &t.right_delta[..]),
        Move::Up | Move::Down => unreachable!("columns are transposed into rows before shifting"),
    };
    let mut lines = [0 as Line; SIZE];
    let mut delta = 0u64;
    for (idx, slot) in lines.iter_mut().enumerate() {
        let line = grid.line(idx) as usize;
        *slot = table[line];
        delta += deltas[line] as u64;
    }
    (Grid::from_lines(lines), delta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::GridValues;

    fn row_grid(row: [Option<u32>; 4]) -> Grid {
        Grid::from_values(&[row, [None; 4], [None; 4], [None; 4]]).unwrap()
    }

    #[test]
    fn test_shift_left() {
        assert_eq!(Grid::from_raw(0x0000).slide(Move::Left), Grid::from_raw(0x0000));
        assert_eq!(Grid::from_raw(0x0002).slide(Move::Left), Grid::from_raw(0x2000));
        assert_eq!(Grid::from_raw(0x2020).slide(Move::Left), Grid::from_raw(0x3000));
        assert_eq!(Grid::from_raw(0x1332).slide(Move::Left), Grid::from_raw(0x1420));
        assert_eq!(Grid::from_raw(0x1234).slide(Move::Left), Grid::from_raw(0x1234));
        assert_eq!(Grid::from_raw(0x1002).slide(Move::Left), Grid::from_raw(0x1200));
    }

    #[test]
    fn test_shift_right() {
        assert_eq!(Grid::from_raw(0x2000).slide(Move::Right), Grid::from_raw(0x0002));
        assert_eq!(Grid::from_raw(0x2020).slide(Move::Right), Grid::from_raw(0x0003));
        assert_eq!(Grid::from_raw(0x1332).slide(Move::Right), Grid::from_raw(0x0142));
        assert_eq!(Grid::from_raw(0x1002).slide(Move::Right), Grid::from_raw(0x0012));
    }

    #[test]
    fn test_move_left() {
        let g = Grid::from_raw(0x1234133220021002);
        assert_eq!(g.slide(Move::Left), Grid::from_raw(0x1234142030001200));
    }

    #[test]
    fn test_move_up() {
        let g = Grid::from_raw(0x1121230033004222);
        assert_eq!(g.slide(Move::Up), Grid::from_raw(0x1131240232004000));
    }

    #[test]
    fn test_move_right() {
        let g = Grid::from_raw(0x1234133220021002);
        assert_eq!(g.slide(Move::Right), Grid::from_raw(0x1234014200030012));
    }

    #[test]
    fn test_move_down() {
        let g = Grid::from_raw(0x1121230033004222);
        assert_eq!(g.slide(Move::Down), Grid::from_raw(0x1000210034014232));
    }

    #[test]
    fn four_equal_tiles_merge_pairwise() {
        let out = resolve(row_grid([Some(2); 4]), Move::Left);
        assert_eq!(out.grid.values()[0], [Some(4), Some(4), None, None]);
        assert_eq!(out.score_delta, 8);
    }

    #[test]
    fn three_in_a_row_merges_leading_pair() {
        let out = resolve(row_grid([Some(2), Some(2), Some(2), None]), Move::Left);
        assert_eq!(out.grid.values()[0], [Some(4), Some(2), None, None]);
        assert_eq!(out.score_delta, 4);

        let out = resolve(row_grid([None, Some(2), Some(2), Some(2)]), Move::Right);
        assert_eq!(out.grid.values()[0], [None, None, Some(2), Some(4)]);
        assert_eq!(out.score_delta, 4);
    }

    #[test]
    fn pure_slide_counts_as_changed() {
        let out = resolve(row_grid([None, None, None, Some(8)]), Move::Left);
        assert!(out.changed);
        assert_eq!(out.score_delta, 0);
    }

    #[test]
    fn unchanged_move_is_identity() {
        let g = row_grid([Some(2), Some(4), Some(8), Some(16)]);
        let out = resolve(g, Move::Left);
        assert!(!out.changed);
        assert_eq!(out.grid, g);
        assert_eq!(out.score_delta, 0);
        assert!(!resolve(g, Move::Up).changed);
        assert!(resolve(g, Move::Down).changed);
    }

    #[test]
    fn replaying_a_direction_settles() {
        let g = Grid::from_raw(0x1121230033004222);
        for dir in Move::ALL {
            let once = resolve(g, dir);
            let twice = resolve(once.grid, dir);
            if !once.changed {
                assert!(!twice.changed);
            }
            assert_ne!(once.changed, once.grid == g);
        }
    }

    #[test]
    fn column_moves_report_delta() {
        let rows: GridValues = [
            [Some(4), None, None, None],
            [Some(4), None, None, None],
            [Some(8), None, None, None],
            [Some(8), None, None, None],
        ];
        let g = Grid::from_values(&rows).unwrap();
        let out = resolve(g, Move::Up);
        assert_eq!(out.score_delta, 24);
        assert_eq!(out.grid.cell_at(0, 0).unwrap(), Some(8));
        assert_eq!(out.grid.cell_at(1, 0).unwrap(), Some(16));
        assert_eq!(out.grid.cell_at(2, 0).unwrap(), None);
    }

    #[test]
    fn game_over_detection() {
        // Checkerboard of 2s and 4s: full, nothing adjacent is equal.
        let stuck = Grid::from_raw(0x1212212112122121);
        assert!(is_game_over(stuck));
        assert!(stuck.legal_moves().is_empty());

        // Same board with one adjacent equal pair.
        let mergeable = Grid::from_raw(0x1112212112122121);
        assert!(!is_game_over(mergeable));

        // An empty cell always leaves a move.
        let gap = Grid::from_raw(0x0212212112122121);
        assert!(!is_game_over(gap));
        assert!(!is_game_over(Grid::from_raw(0x1)));
    }

    #[test]
    fn parse_directions() {
        assert_eq!("Up".parse::<Move>().unwrap(), Move::Up);
        assert_eq!(" left\n".parse::<Move>().unwrap(), Move::Left);
        assert_eq!("S".parse::<Move>().unwrap(), Move::Down);
        assert_eq!("d".parse::<Move>().unwrap(), Move::Right);
        assert!("sideways".parse::<Move>().is_err());
        for dir in Move::ALL {
            assert_eq!(dir.to_string().parse::<Move>().unwrap(), dir);
            assert_eq!(Move::ALL[dir.index()], dir);
        }
    }
}
