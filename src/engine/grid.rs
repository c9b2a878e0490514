use std::fmt;

use crate::error::EngineError;

pub(crate) type GridRaw = u64;
pub(crate) type Line = u16;

/// Side length of the board.
pub const SIZE: usize = 4;
/// Number of cells on the board.
pub const CELLS: usize = SIZE * SIZE;
/// Largest storable exponent; 2^15 = 32768 is the biggest tile.
pub const MAX_EXPONENT: u8 = 15;
/// Largest tile value a [`Grid`] can hold.
pub const MAX_TILE: u32 = 1 << MAX_EXPONENT;

/// The exported form of a grid: row-major, `None` for empty cells.
pub type GridValues = [[Option<u32>; SIZE]; SIZE];

/// Packed 4x4 board as 16 4-bit exponents in a `u64`.
///
/// Cell `(0, 0)` lives in the most significant nibble. An exponent of 0
/// marks an empty cell, `k` marks a tile of value `2^k`.
///
/// `Grid` is `Copy`; every transformation returns a new value and equality
/// is cell-wise.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Grid(GridRaw);

impl Grid {
    /// A constant empty grid (all zeros).
    pub const EMPTY: Grid = Grid(0);

    /// Construct a `Grid` from its raw packed representation.
    #[inline]
    pub fn from_raw(raw: u64) -> Self { Grid(raw) }

    /// The raw packed `u64` for this `Grid`.
    #[inline]
    pub fn raw(&self) -> u64 { self.0 }

    /// Build a grid from rows of optional tile values.
    ///
    /// Fails with `InvalidGridShape` unless there are exactly four rows of
    /// four cells, and with `InvalidTileValue` for anything that is not a
    /// power of two in `2..=32768`.
    ///
    /// ```
    /// use slide_2048::engine::{Grid, GridValues};
    /// let rows: GridValues = [
    ///     [Some(2), None, None, Some(4)],
    ///     [None; 4],
    ///     [None; 4],
    ///     [None, None, Some(2048), None],
    /// ];
    /// let g = Grid::from_values(&rows).unwrap();
    /// assert_eq!(g.cell_at(3, 2).unwrap(), Some(2048));
    /// assert_eq!(g.count_empty(), 13);
    /// ```
    pub fn from_values<Row: AsRef<[Option<u32>]>>(rows: &[Row]) -> Result<Self, EngineError> {
        if rows.len() != SIZE {
            let cols = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
            return Err(EngineError::InvalidGridShape { rows: rows.len(), cols });
        }
        if let Some(bad) = rows.iter().find(|r| r.as_ref().len() != SIZE) {
            return Err(EngineError::InvalidGridShape { rows: rows.len(), cols: bad.as_ref().len() });
        }
        let mut raw: GridRaw = 0;
        for (row, cells) in rows.iter().enumerate() {
            for (col, &cell) in cells.as_ref().iter().enumerate() {
                let exponent = match cell {
                    None => 0,
                    Some(value) => exponent_of(value)
                        .ok_or(EngineError::InvalidTileValue { row, col, value })?,
                };
                raw |= (exponent as GridRaw) << shift_for(row * SIZE + col);
            }
        }
        Ok(Grid(raw))
    }

    /// Build a grid from 16 cells in row-major order.
    pub fn from_flat(cells: &[Option<u32>]) -> Result<Self, EngineError> {
        if cells.len() != CELLS {
            return Err(EngineError::InvalidGridShape { rows: 1, cols: cells.len() });
        }
        let rows: Vec<&[Option<u32>]> = cells.chunks(SIZE).collect();
        Self::from_values(&rows)
    }

    /// The tile at `(row, col)`, or `None` if the cell is empty.
    #[inline]
    pub fn cell_at(&self, row: usize, col: usize) -> Result<Option<u32>, EngineError> {
        if row >= SIZE || col >= SIZE {
            return Err(EngineError::OutOfBounds { row, col });
        }
        Ok(value_of(self.exponent(row * SIZE + col)))
    }

    /// True if no cell is empty.
    #[inline]
    pub fn is_full(&self) -> bool { self.count_empty() == 0 }

    /// Count the number of empty cells.
    #[inline]
    pub fn count_empty(&self) -> usize { CELLS - count_non_empty(self.0) }

    /// Coordinates of every empty cell, row-major.
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        (0..CELLS)
            .filter(|&idx| self.exponent(idx) == 0)
            .map(|idx| (idx / SIZE, idx % SIZE))
            .collect()
    }

    /// Highest tile value on the grid, 0 when empty.
    pub fn highest_tile(&self) -> u32 {
        value_of(self.max_exponent()).unwrap_or(0)
    }

    /// True if any tile equals or exceeds `value`.
    pub fn has_tile_at_least(&self, value: u32) -> bool {
        self.highest_tile() >= value
    }

    /// Export as rows of optional tile values.
    pub fn values(&self) -> GridValues {
        let mut out = [[None; SIZE]; SIZE];
        for (idx, cell) in out.iter_mut().flatten().enumerate() {
            *cell = value_of(self.exponent(idx));
        }
        out
    }

    /// Return a copy with the cell at row-major `idx` set to `exponent`.
    #[inline]
    pub(crate) fn with_exponent(self, idx: usize, exponent: u8) -> Self {
        debug_assert!(idx < CELLS && exponent <= MAX_EXPONENT);
        let shift = shift_for(idx);
        Grid((self.0 & !(0xf << shift)) | ((exponent as GridRaw) << shift))
    }

    #[inline]
    pub(crate) fn exponent(&self, idx: usize) -> u8 {
        ((self.0 >> shift_for(idx)) & 0xf) as u8
    }

    pub(crate) fn max_exponent(&self) -> u8 {
        (0..CELLS).map(|idx| self.exponent(idx)).max().unwrap_or(0)
    }

    #[inline]
    pub(crate) fn line(&self, idx: usize) -> Line {
        ((self.0 >> ((3 - idx) * 16)) & 0xffff) as Line
    }

    #[inline]
    pub(crate) fn from_lines(lines: [Line; SIZE]) -> Self {
        Grid(lines.iter().fold(0, |acc, &line| (acc << 16) | line as GridRaw))
    }

    /// Swap rows and columns.
    // Credit to Nneonneo
    #[inline]
    pub(crate) fn transpose(self) -> Self {
        let x = self.0;
        let a1 = x & 0xF0F00F0FF0F00F0F;
        let a2 = x & 0x0000F0F00000F0F0;
        let a3 = x & 0x0F0F00000F0F0000;
        let a = a1 | (a2 << 12) | (a3 >> 12);
        let b1 = a & 0xFF00FF0000FF00FF;
        let b2 = a & 0x00FF00FF00000000;
        let b3 = a & 0x00000000FF00FF00;
        Grid(b1 | (b2 >> 24) | (b3 << 24))
    }
}

#[inline(always)]
fn shift_for(idx: usize) -> usize { 60 - 4 * idx }

/// Exponent for a valid tile value, `None` otherwise.
pub(crate) fn exponent_of(value: u32) -> Option<u8> {
    if value >= 2 && value <= MAX_TILE && value.is_power_of_two() {
        Some(value.trailing_zeros() as u8)
    } else {
        None
    }
}

#[inline]
fn value_of(exponent: u8) -> Option<u32> {
    if exponent == 0 { None } else { Some(1 << exponent) }
}

// https://stackoverflow.com/questions/38225571/count-number-of-zero-nibbles-in-an-unsigned-64-bit-integer
fn count_non_empty(raw: GridRaw) -> usize {
    let mut x = raw;
    x |= x >> 1;
    x |= x >> 2;
    x &= 0x1111111111111111;
    x.count_ones() as usize
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Grid({:#018x})", self.0)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const SEPARATOR: &str = "+-------+-------+-------+-------+";
        writeln!(f, "{SEPARATOR}")?;
        for row in self.values() {
            for cell in row {
                match cell {
                    Some(v) => write!(f, "|{v:^7}")?,
                    None => write!(f, "|{:7}", "")?,
                }
            }
            writeln!(f, "|")?;
            writeln!(f, "{SEPARATOR}")?;
        }
        Ok(())
    }
}

impl From<u64> for Grid { fn from(v: u64) -> Self { Grid::from_raw(v) } }
impl From<Grid> for u64 { fn from(g: Grid) -> Self { g.raw() } }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_at_reads_row_major() {
        let g = Grid::from_raw(0x0123456789abcdef);
        assert_eq!(g.cell_at(0, 0).unwrap(), None);
        assert_eq!(g.cell_at(0, 3).unwrap(), Some(8));
        assert_eq!(g.cell_at(2, 2).unwrap(), Some(1024));
        assert_eq!(g.cell_at(3, 3).unwrap(), Some(32768));
    }

    #[test]
    fn cell_at_rejects_out_of_bounds() {
        assert_eq!(Grid::EMPTY.cell_at(4, 0), Err(EngineError::OutOfBounds { row: 4, col: 0 }));
        assert_eq!(Grid::EMPTY.cell_at(0, 7), Err(EngineError::OutOfBounds { row: 0, col: 7 }));
    }

    #[test]
    fn count_and_list_empty_cells() {
        let g = Grid::from_raw(0x1111000011110000);
        assert_eq!(g.count_empty(), 8);
        assert!(!g.is_full());
        let empties = g.empty_cells();
        assert_eq!(empties.len(), 8);
        assert_eq!(empties[0], (1, 0));
        assert_eq!(empties[7], (3, 3));

        let full = Grid::from_raw(0x1212212112122121);
        assert!(full.is_full());
        assert!(full.empty_cells().is_empty());
        assert_eq!(Grid::EMPTY.count_empty(), 16);
    }

    #[test]
    fn from_values_validates_shape() {
        let three_rows: Vec<Vec<Option<u32>>> = vec![vec![None; 4]; 3];
        assert_eq!(
            Grid::from_values(&three_rows),
            Err(EngineError::InvalidGridShape { rows: 3, cols: 4 })
        );
        let short_row: Vec<Vec<Option<u32>>> =
            vec![vec![None; 4], vec![None; 4], vec![None; 3], vec![None; 4]];
        assert_eq!(
            Grid::from_values(&short_row),
            Err(EngineError::InvalidGridShape { rows: 4, cols: 3 })
        );
        assert!(Grid::from_flat(&[None; 9]).is_err());
    }

    #[test]
    fn from_values_validates_tiles() {
        let mut rows: GridValues = [[None; 4]; 4];
        rows[1][2] = Some(3);
        assert_eq!(
            Grid::from_values(&rows),
            Err(EngineError::InvalidTileValue { row: 1, col: 2, value: 3 })
        );
        rows[1][2] = Some(1);
        assert!(Grid::from_values(&rows).is_err());
        rows[1][2] = Some(0);
        assert!(Grid::from_values(&rows).is_err());
        rows[1][2] = Some(65536);
        assert!(Grid::from_values(&rows).is_err());
        rows[1][2] = Some(32768);
        assert!(Grid::from_values(&rows).is_ok());
    }

    #[test]
    fn values_round_trip() {
        let rows: GridValues = [
            [Some(2), Some(4), Some(8), Some(16)],
            [Some(32), Some(64), Some(128), Some(256)],
            [Some(512), Some(1024), None, Some(2)],
            [Some(4), Some(8), Some(16), Some(32)],
        ];
        let g = Grid::from_values(&rows).unwrap();
        assert_eq!(g.values(), rows);
        let flat: Vec<Option<u32>> = rows.iter().flatten().copied().collect();
        assert_eq!(Grid::from_flat(&flat).unwrap(), g);
        assert_eq!(g.highest_tile(), 1024);
    }

    #[test]
    fn transpose_swaps_rows_and_columns() {
        let g = Grid::from_raw(0x1234_0000_0000_0000);
        assert_eq!(g.transpose(), Grid::from_raw(0x1000_2000_3000_4000));
        assert_eq!(g.transpose().transpose(), g);
    }

    #[test]
    fn lines_round_trip() {
        let g = Grid::from_raw(0x1234_5678_9abc_def0);
        let lines = [g.line(0), g.line(1), g.line(2), g.line(3)];
        assert_eq!(lines[1], 0x5678);
        assert_eq!(Grid::from_lines(lines), g);
    }

    #[test]
    fn with_exponent_sets_one_cell() {
        let g = Grid::EMPTY.with_exponent(5, 3).with_exponent(15, 1);
        assert_eq!(g.cell_at(1, 1).unwrap(), Some(8));
        assert_eq!(g.cell_at(3, 3).unwrap(), Some(2));
        assert_eq!(g.with_exponent(5, 0).count_empty(), 15);
    }

    #[test]
    fn display_renders_tiles() {
        let g = Grid::from_raw(0xb000_0000_0000_0001);
        let text = g.to_string();
        assert!(text.contains("2048"));
        assert_eq!(text.lines().count(), 9);
    }
}
