use std::sync::OnceLock;

use super::grid::{Line, MAX_EXPONENT};

const LINE_TABLE_SIZE: usize = 0x1_0000; // 65,536 possible 16-bit lines

pub(crate) struct Tables {
    pub(crate) left: Box<[Line]>,
    pub(crate) right: Box<[Line]>,
    pub(crate) left_delta: Box<[u32]>,
    pub(crate) right_delta: Box<[u32]>,
}

static TABLES: OnceLock<Tables> = OnceLock::new();

#[inline(always)]
pub(crate) fn tables() -> &'static Tables {
    TABLES.get_or_init(create_tables)
}

fn create_tables() -> Tables {
    // Allocate on the heap to avoid large stack frames
    let mut left = vec![0u16; LINE_TABLE_SIZE];
    let mut right = vec![0u16; LINE_TABLE_SIZE];
    let mut left_delta = vec![0u32; LINE_TABLE_SIZE];
    let mut right_delta = vec![0u32; LINE_TABLE_SIZE];

    for val in 0..LINE_TABLE_SIZE {
        let line = val as Line;
        let (l, ld) = slide_line_left(line);
        left[val] = l;
        left_delta[val] = ld;

        let (r, rd) = slide_line_left(reverse_line(line));
        right[val] = reverse_line(r);
        right_delta[val] = rd;
    }

    Tables {
        left: left.into_boxed_slice(),
        right: right.into_boxed_slice(),
        left_delta: left_delta.into_boxed_slice(),
        right_delta: right_delta.into_boxed_slice(),
    }
}

/// Unpack a line into its four exponents, leftmost cell first.
#[inline]
pub(crate) fn line_to_exponents(line: Line) -> [u8; 4] {
    [
        ((line >> 12) & 0xf) as u8,
        ((line >> 8) & 0xf) as u8,
        ((line >> 4) & 0xf) as u8,
        (line & 0xf) as u8,
    ]
}

#[inline]
pub(crate) fn exponents_to_line(tiles: [u8; 4]) -> Line {
    (tiles[0] as Line) << 12 | (tiles[1] as Line) << 8 | (tiles[2] as Line) << 4 | tiles[3] as Line
}

#[inline]
pub(crate) fn reverse_line(line: Line) -> Line {
    (line & 0xf) << 12 | (line & 0xf0) << 4 | (line >> 4) & 0xf0 | line >> 12
}

/// Slide one line towards index 0, merging each equal pair at most once.
///
/// Pairs are taken strictly left to right, so `[2, 2, 2, _]` becomes
/// `[4, 2, _, _]`. Returns the new line and the sum of merged tile values.
pub(crate) fn slide_line_left(line: Line) -> (Line, u32) {
    let mut packed = [0u8; 4];
    let mut n = 0;
    for tile in line_to_exponents(line) {
        if tile != 0 {
            packed[n] = tile;
            n += 1;
        }
    }

    let mut out = [0u8; 4];
    let mut delta = 0u32;
    let mut len = 0;
    let mut i = 0;
    while i < n {
        let tile = packed[i];
        // 32768 + 32768 has no nibble to live in; leave the pair alone.
        if i + 1 < n && packed[i + 1] == tile && tile < MAX_EXPONENT {
            out[len] = tile + 1;
            delta += 1 << (tile + 1);
            i += 2;
        } else {
            out[len] = tile;
            i += 1;
        }
        len += 1;
    }
    (exponents_to_line(out), delta)
}
