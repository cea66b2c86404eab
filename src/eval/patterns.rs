//! Line patterns for Gomoku evaluation
//!
//! Patterns are fixed-width windows compiled at build time into a value/mask
//! pair over the 2-bit cells of a [`LineCode`]. Shape letters:
//!
//! - `P` own stone, `O` opponent stone, `E` empty
//! - `B` blocked: opponent stone or board edge
//!
//! Matching walks [`PATTERNS`] from the most specific shape to the least. A
//! match claims the stones it uses, and a later (weaker) pattern cannot reuse
//! a claimed stone, so `_XXXX_` counts as one open four and not also as
//! threes and twos. Capture patterns claim opponent stones in a separate set.

use crate::board::LineCode;
use crate::config::PatternWeights;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternKind {
    Five,
    OpenFour,
    BrokenFour,
    ClosedFour,
    OpenThree,
    BrokenThree,
    ClosedThree,
    OpenTwo,
    ClosedTwo,
    CaptureThreat,
    CaptureSetup,
}

impl PatternKind {
    pub const COUNT: usize = 11;

    pub const ALL: [PatternKind; Self::COUNT] = [
        PatternKind::Five,
        PatternKind::OpenFour,
        PatternKind::BrokenFour,
        PatternKind::ClosedFour,
        PatternKind::OpenThree,
        PatternKind::BrokenThree,
        PatternKind::ClosedThree,
        PatternKind::OpenTwo,
        PatternKind::ClosedTwo,
        PatternKind::CaptureThreat,
        PatternKind::CaptureSetup,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    const fn is_capture(self) -> bool {
        matches!(self, PatternKind::CaptureThreat | PatternKind::CaptureSetup)
    }

    /// Weight of this pattern, in points.
    pub fn weight(self, w: &PatternWeights) -> i64 {
        match self {
            PatternKind::Five => w.pending_win_score,
            PatternKind::OpenFour => w.open_four,
            PatternKind::BrokenFour => w.broken_four,
            PatternKind::ClosedFour => w.closed_four,
            PatternKind::OpenThree => w.open_three,
            PatternKind::BrokenThree => w.broken_three,
            PatternKind::ClosedThree => w.closed_three,
            PatternKind::OpenTwo => w.open_two,
            PatternKind::ClosedTwo => w.closed_two,
            PatternKind::CaptureThreat => w.capture_threat,
            PatternKind::CaptureSetup => w.capture_setup,
        }
    }
}

/// A fixed-width window over a line.
#[derive(Debug, Clone, Copy)]
pub struct Window {
    pub width: u8,
    pub value: u64,
    pub mask: u64,
}

impl Window {
    const fn compile(shape: &[u8]) -> Window {
        let mut value = 0u64;
        let mut mask = 0u64;
        let mut i = 0;
        while i < shape.len() {
            let (v, m) = match shape[i] {
                b'E' => (0b00, 0b11),
                b'P' => (0b01, 0b11),
                b'O' => (0b10, 0b11),
                b'B' => (0b10, 0b10),
                _ => (0b00, 0b00),
            };
            value |= v << (2 * i);
            mask |= m << (2 * i);
            i += 1;
        }
        Window {
            width: shape.len() as u8,
            value,
            mask,
        }
    }

    #[inline]
    fn matches_at(&self, bits: u64, offset: usize) -> bool {
        (bits >> (2 * offset)) & self.mask == self.value
    }

    /// Number of offsets where the window matches.
    pub fn count(&self, code: LineCode) -> u32 {
        let (n, w) = (code.len(), self.width as usize);
        if w > n {
            return 0;
        }
        (0..=n - w)
            .filter(|&o| self.matches_at(code.bits(), o))
            .count() as u32
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Pattern {
    pub kind: PatternKind,
    pub window: Window,
    /// Cells claimed by a match, relative to the window start
    claim: u32,
}

impl Pattern {
    const fn compile(kind: PatternKind, shape: &[u8]) -> Pattern {
        let claimed = if kind.is_capture() { b'O' } else { b'P' };
        let mut claim = 0u32;
        let mut i = 0;
        while i < shape.len() {
            if shape[i] == claimed {
                claim |= 1 << i;
            }
            i += 1;
        }
        Pattern {
            kind,
            window: Window::compile(shape),
            claim,
        }
    }
}

use PatternKind::*;

/// Pattern table, most specific first.
pub const PATTERNS: [Pattern; 25] = [
    Pattern::compile(Five, b"PPPPP"),
    Pattern::compile(OpenFour, b"EPPPPE"),
    Pattern::compile(BrokenFour, b"PEPPP"),
    Pattern::compile(BrokenFour, b"PPEPP"),
    Pattern::compile(BrokenFour, b"PPPEP"),
    Pattern::compile(ClosedFour, b"BPPPPE"),
    Pattern::compile(ClosedFour, b"EPPPPB"),
    Pattern::compile(OpenThree, b"EPPPE"),
    Pattern::compile(BrokenThree, b"EPPEPE"),
    Pattern::compile(BrokenThree, b"EPEPPE"),
    Pattern::compile(ClosedThree, b"BPPPEE"),
    Pattern::compile(ClosedThree, b"EEPPPB"),
    Pattern::compile(ClosedThree, b"BPPEPE"),
    Pattern::compile(ClosedThree, b"EPEPPB"),
    Pattern::compile(ClosedThree, b"BPEPPE"),
    Pattern::compile(ClosedThree, b"EPPEPB"),
    Pattern::compile(OpenTwo, b"EPPE"),
    Pattern::compile(OpenTwo, b"EPEPE"),
    Pattern::compile(ClosedTwo, b"BPPEE"),
    Pattern::compile(ClosedTwo, b"EEPPB"),
    Pattern::compile(ClosedTwo, b"BPEPE"),
    Pattern::compile(ClosedTwo, b"EPEPB"),
    Pattern::compile(CaptureThreat, b"POOE"),
    Pattern::compile(CaptureThreat, b"EOOP"),
    Pattern::compile(CaptureSetup, b"EOOE"),
];

/// Own pairs the opponent can capture next move: `_XXO` and `OXX_`.
pub const VULNERABLE_PAIRS: [Window; 2] = [Window::compile(b"EPPO"), Window::compile(b"OPPE")];

/// Matches per pattern kind on one line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatternCounts(pub [u8; PatternKind::COUNT]);

impl PatternCounts {
    #[inline]
    pub fn get(&self, kind: PatternKind) -> u8 {
        self.0[kind.index()]
    }

    /// Weighted sum with per-kind weights.
    #[inline]
    pub fn score(&self, weights: &[i64; PatternKind::COUNT]) -> i64 {
        self.0
            .iter()
            .zip(weights.iter())
            .map(|(&n, &w)| n as i64 * w)
            .sum()
    }
}

/// Match the pattern table against one line, seen by the own player.
pub fn match_line(code: LineCode) -> PatternCounts {
    let mut counts = PatternCounts::default();
    if !code.has_stones() {
        return counts;
    }
    let bits = code.bits();
    let n = code.len();
    let mut own_claimed = 0u32;
    let mut opp_claimed = 0u32;

    for p in PATTERNS.iter() {
        let w = p.window.width as usize;
        if w > n {
            continue;
        }
        for o in 0..=n - w {
            if !p.window.matches_at(bits, o) {
                continue;
            }
            let claim = p.claim << o;
            let claimed = if p.kind.is_capture() {
                &mut opp_claimed
            } else {
                &mut own_claimed
            };
            if *claimed & claim != 0 {
                continue;
            }
            *claimed |= claim;
            counts.0[p.kind.index()] += 1;
        }
    }
    counts
}

/// Count own pairs exposed to capture on one line.
#[inline]
pub fn count_vulnerable_pairs(code: LineCode) -> u32 {
    if !code.has_own() {
        return 0;
    }
    VULNERABLE_PAIRS.iter().map(|w| w.count(code)).sum()
}
