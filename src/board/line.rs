//! Full-board lines and their packed encoding
//!
//! Every cell belongs to exactly four lines (row, column, diagonal and
//! anti-diagonal). Pattern matching works on a [`LineCode`]: a whole line packed
//! two bits per cell, relative to one player, with an edge sentinel on each end.

use super::{Board, Pos, Stone};

/// Direction vectors for line scanning (4 directions)
pub const DIRECTIONS: [(i32, i32); 4] = [
    (0, 1),  // Horizontal →
    (1, 0),  // Vertical ↓
    (1, 1),  // Diagonal ↘
    (1, -1), // Diagonal ↙
];

/// Cell codes inside a [`LineCode`]
pub const CELL_EMPTY: u64 = 0;
pub const CELL_OWN: u64 = 1;
pub const CELL_OPP: u64 = 2;
pub const CELL_EDGE: u64 = 3;

const LOW_BITS: u64 = 0x5555_5555_5555_5555;

/// One full line of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineId {
    /// Index into [`DIRECTIONS`]
    pub dir: u8,
    /// Line number within the direction
    pub index: u8,
}

impl LineId {
    /// Line through `pos` in direction `dir`, with the offset of `pos` along it.
    #[inline]
    pub fn through(pos: Pos, dir: usize, size: usize) -> (LineId, usize) {
        let (r, c) = (pos.row as usize, pos.col as usize);
        let (index, offset) = match dir {
            0 => (r, c),
            1 => (c, r),
            2 => (c + size - 1 - r, r.min(c)),
            _ => {
                let s = r + c;
                let start_row = s.saturating_sub(size - 1);
                (s, r - start_row)
            }
        };
        (
            LineId {
                dir: dir as u8,
                index: index as u8,
            },
            offset,
        )
    }

    /// The four lines through `pos`.
    #[inline]
    pub fn all_through(pos: Pos, size: usize) -> [LineId; 4] {
        [0, 1, 2, 3].map(|d| Self::through(pos, d, size).0)
    }

    /// First cell of the line and its length.
    #[inline]
    pub fn start_and_len(self, size: usize) -> (Pos, usize) {
        let i = self.index as usize;
        match self.dir {
            0 => (Pos::new(i as u8, 0), size),
            1 => (Pos::new(0, i as u8), size),
            2 => {
                // i = col - row + size - 1
                if i >= size - 1 {
                    let d = i - (size - 1);
                    (Pos::new(0, d as u8), size - d)
                } else {
                    let d = size - 1 - i;
                    (Pos::new(d as u8, 0), size - d)
                }
            }
            _ => {
                // i = row + col
                if i < size {
                    (Pos::new(0, i as u8), i + 1)
                } else {
                    let start_row = i - (size - 1);
                    (Pos::new(start_row as u8, (size - 1) as u8), 2 * size - 1 - i)
                }
            }
        }
    }

    /// Cells of the line in order.
    pub fn cells(self, size: usize) -> impl Iterator<Item = Pos> {
        let (start, len) = self.start_and_len(size);
        let (dr, dc) = DIRECTIONS[self.dir as usize];
        (0..len as i32).map(move |k| {
            Pos::new(
                (start.row as i32 + dr * k) as u8,
                (start.col as i32 + dc * k) as u8,
            )
        })
    }

    /// Number of lines in one direction.
    #[inline]
    pub fn count_in(dir: usize, size: usize) -> usize {
        if dir < 2 {
            size
        } else {
            2 * size - 1
        }
    }

    /// Every line of a `size` board (`6 * size - 2` of them).
    pub fn all(size: usize) -> impl Iterator<Item = LineId> {
        (0..4usize).flat_map(move |dir| {
            (0..Self::count_in(dir, size)).map(move |index| LineId {
                dir: dir as u8,
                index: index as u8,
            })
        })
    }
}

/// A line packed two bits per cell, seen from one player.
///
/// Cell 0 and the last cell are edge sentinels; board cell `k` of the line is
/// stored at index `k + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineCode {
    bits: u64,
    cells: u8,
}

impl LineCode {
    /// Encode `line` from `perspective`'s point of view.
    pub fn read(board: &Board, line: LineId, perspective: Stone) -> Self {
        let size = board.size();
        let (_, len) = line.start_and_len(size);
        let mut bits = CELL_EDGE;
        for (k, pos) in line.cells(size).enumerate() {
            let code = match board.get(pos) {
                Stone::Empty => CELL_EMPTY,
                s if s == perspective => CELL_OWN,
                _ => CELL_OPP,
            };
            bits |= code << (2 * (k + 1));
        }
        bits |= CELL_EDGE << (2 * (len + 1));
        Self {
            bits,
            cells: (len + 2) as u8,
        }
    }

    /// Build a code from a string such as `".XXX.O"`.
    ///
    /// `.` empty, `X` own, `O` opponent, `#` edge. Edge sentinels are added on
    /// both ends.
    pub fn parse(cells: &str) -> Self {
        let mut bits = CELL_EDGE;
        let mut n = 1;
        for ch in cells.chars() {
            let code = match ch {
                'X' | 'x' => CELL_OWN,
                'O' | 'o' => CELL_OPP,
                '#' => CELL_EDGE,
                _ => CELL_EMPTY,
            };
            bits |= code << (2 * n);
            n += 1;
        }
        bits |= CELL_EDGE << (2 * n);
        Self {
            bits,
            cells: (n + 1) as u8,
        }
    }

    #[inline]
    pub fn bits(self) -> u64 {
        self.bits
    }

    /// Number of cells including both sentinels.
    #[inline]
    pub fn len(self) -> usize {
        self.cells as usize
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.cells <= 2
    }

    #[inline]
    pub fn cell(self, i: usize) -> u64 {
        (self.bits >> (2 * i)) & 0b11
    }

    /// The same line seen by the other player.
    #[inline]
    pub fn swapped(self) -> Self {
        let bits = ((self.bits & LOW_BITS) << 1) | ((self.bits >> 1) & LOW_BITS);
        Self {
            bits,
            cells: self.cells,
        }
    }

    /// Whether any cell holds an own stone.
    #[inline]
    pub fn has_own(self) -> bool {
        self.bits & !(self.bits >> 1) & LOW_BITS != 0
    }

    /// Whether any board cell (sentinels excluded) holds a stone.
    #[inline]
    pub fn has_stones(self) -> bool {
        let last = 2 * (self.cells as u64 - 1);
        self.bits & !0b11 & !(0b11 << last) != 0
    }
}
