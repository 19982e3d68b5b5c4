//! Recording per-cell decisions of the recursion, and walking them back.

use crate::{is_reachable, nw::JRange};
use pa_affine_types::{Cigar, CigarOp, Coordinate, Score, Seq};
use serde::{Deserialize, Serialize};

// Layout of a trace byte.
// The low two bits say where the best score `H` came from.
pub(crate) const DIAG: u8 = 0;
pub(crate) const LEFT: u8 = 1;
pub(crate) const UP: u8 = 2;
pub(crate) const START: u8 = 3;
const SOURCE: u8 = 0b11;
/// The gap-in-sequence-1 state `E` extends an earlier gap instead of opening one.
pub(crate) const E_EXTEND: u8 = 0b100;
/// The gap-in-sequence-2 state `F` extends an earlier gap instead of opening one.
pub(crate) const F_EXTEND: u8 = 0b1000;

/// The candidates of one interior cell, as seen by lane 0.
#[derive(Clone, Copy, Debug)]
pub struct Cell {
    pub h: Score,
    pub diag: Score,
    pub e: Score,
    pub e_open: Score,
    pub e_extend: Score,
    pub f: Score,
    pub f_open: Score,
    pub f_extend: Score,
}

impl Cell {
    /// Diagonal is preferred over `E`, `E` over `F`, and opening over extending.
    /// In local alignments every cell of score 0 is a start.
    pub fn direction(&self, local: bool) -> u8 {
        let source = if local && self.h <= 0 {
            START
        } else if self.diag == self.h {
            DIAG
        } else if self.e == self.h {
            LEFT
        } else {
            UP
        };
        let mut t = source;
        if self.e_extend > self.e_open {
            t |= E_EXTEND;
        }
        if self.f_extend > self.f_open {
            t |= F_EXTEND;
        }
        t
    }
}

/// Receives the cells of a single-lane sweep.
pub trait Sink {
    const ENABLED: bool;
    /// Called before the sweep of every pair, with the column range of each row.
    fn reset(&mut self, _n: usize, _m: usize, _rows: &dyn Fn(usize) -> JRange) {}
    fn border(&mut self, _i: usize, _j: usize, _h: Score, _t: u8) {}
    fn cell(&mut self, _i: usize, _j: usize, _cell: &Cell, _local: bool) {}
}

/// Records nothing.
pub struct NoSink;

impl Sink for NoSink {
    const ENABLED: bool = false;
}

impl<K: Sink> Sink for &mut K {
    const ENABLED: bool = K::ENABLED;
    fn reset(&mut self, n: usize, m: usize, rows: &dyn Fn(usize) -> JRange) {
        (**self).reset(n, m, rows);
    }
    fn border(&mut self, i: usize, j: usize, h: Score, t: u8) {
        (**self).border(i, j, h, t);
    }
    fn cell(&mut self, i: usize, j: usize, cell: &Cell, local: bool) {
        (**self).cell(i, j, cell, local);
    }
}

impl<A: Sink, B: Sink> Sink for (A, B) {
    const ENABLED: bool = A::ENABLED || B::ENABLED;
    fn reset(&mut self, n: usize, m: usize, rows: &dyn Fn(usize) -> JRange) {
        self.0.reset(n, m, rows);
        self.1.reset(n, m, rows);
    }
    fn border(&mut self, i: usize, j: usize, h: Score, t: u8) {
        self.0.border(i, j, h, t);
        self.1.border(i, j, h, t);
    }
    fn cell(&mut self, i: usize, j: usize, cell: &Cell, local: bool) {
        self.0.cell(i, j, cell, local);
        self.1.cell(i, j, cell, local);
    }
}

/// Trace bytes of all cells in the band, reused between pairs.
///
/// Only the column range of each row is stored, so a banded sweep needs
/// `O(n * bandwidth)` memory.
#[derive(Clone, Default, Debug)]
pub struct TraceMatrix {
    n: usize,
    m: usize,
    /// The column range of each row and the index of its first cell in `data`.
    rows: Vec<(JRange, usize)>,
    data: Vec<u8>,
}

impl TraceMatrix {
    fn index(&self, i: usize, j: usize) -> Option<usize> {
        let &(range, start) = self.rows.get(i)?;
        range.contains(j).then(|| start + (j - range.0))
    }

    pub fn get(&self, i: usize, j: usize) -> Option<u8> {
        self.index(i, j).map(|idx| self.data[idx])
    }

    fn set(&mut self, i: usize, j: usize, t: u8) {
        let idx = self
            .index(i, j)
            .expect("Trace cell outside of the stored band.");
        self.data[idx] = t;
    }

    /// Walk back from `end` to the start of the alignment.
    ///
    /// Returns the begin coordinate and the cigar of the aligned parts
    /// `a[begin.first..end.first]` and `b[begin.second..end.second]`.
    pub fn traceback(&self, a: Seq, b: Seq, end: Coordinate) -> (Coordinate, Cigar) {
        enum State {
            H,
            E,
            F,
        }
        let (mut i, mut j) = (end.first, end.second);
        let mut state = State::H;
        let mut cigar = Cigar::default();
        loop {
            let t = self.get(i, j).expect("Traceback left the stored band.");
            match state {
                State::H => match t & SOURCE {
                    DIAG => {
                        cigar.push_diagonal(a[i - 1], b[j - 1]);
                        i -= 1;
                        j -= 1;
                    }
                    LEFT => state = State::E,
                    UP => state = State::F,
                    _ => break,
                },
                State::E => {
                    cigar.push_op(CigarOp::Ins);
                    if t & E_EXTEND == 0 {
                        state = State::H;
                    }
                    j -= 1;
                }
                State::F => {
                    cigar.push_op(CigarOp::Del);
                    if t & F_EXTEND == 0 {
                        state = State::H;
                    }
                    i -= 1;
                }
            }
        }
        cigar.reverse();
        (Coordinate::new(i, j), cigar)
    }

    /// One character per cell: `D`iagonal, `L`eft, `U`p, or `N` for start
    /// and cells outside the band.
    pub fn directions(&self) -> Vec<String> {
        (0..=self.n)
            .map(|i| {
                (0..=self.m)
                    .map(|j| match self.get(i, j).map(|t| t & SOURCE) {
                        Some(DIAG) => 'D',
                        Some(LEFT) => 'L',
                        Some(UP) => 'U',
                        _ => 'N',
                    })
                    .collect()
            })
            .collect()
    }
}

impl Sink for TraceMatrix {
    const ENABLED: bool = true;

    fn reset(&mut self, n: usize, m: usize, rows: &dyn Fn(usize) -> JRange) {
        self.n = n;
        self.m = m;
        self.rows.clear();
        let mut len = 0;
        for i in 0..=n {
            let range = rows(i);
            self.rows.push((range, len));
            len += range.len();
        }
        self.data.clear();
        self.data.resize(len, START);
    }

    fn border(&mut self, i: usize, j: usize, _h: Score, t: u8) {
        self.set(i, j, t);
    }

    fn cell(&mut self, i: usize, j: usize, cell: &Cell, local: bool) {
        self.set(i, j, cell.direction(local));
    }
}

/// Scores of all cells, `None` where unreachable or outside the band.
#[derive(Clone, Default, Debug)]
pub struct ScoreMatrix {
    pub scores: Vec<Vec<Option<Score>>>,
}

impl Sink for ScoreMatrix {
    const ENABLED: bool = true;

    fn reset(&mut self, n: usize, m: usize, _rows: &dyn Fn(usize) -> JRange) {
        self.scores = vec![vec![None; m + 1]; n + 1];
    }

    fn border(&mut self, i: usize, j: usize, h: Score, _t: u8) {
        self.scores[i][j] = is_reachable(h).then_some(h);
    }

    fn cell(&mut self, i: usize, j: usize, cell: &Cell, _local: bool) {
        self.scores[i][j] = is_reachable(cell.h).then_some(cell.h);
    }
}

/// The matrices of a single alignment, as returned in debug mode.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugMatrices {
    /// Best score per cell.
    pub scores: Vec<Vec<Option<Score>>>,
    /// Trace direction per cell, one string per row. Absent for the
    /// edit distance aligner, which does not store directions.
    pub trace: Option<Vec<String>>,
}
