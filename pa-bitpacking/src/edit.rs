//! Global and semi-global edit distance with optional traceback.

use crate::{compute_block, Cost, Profile, H, V, W};
use pa_affine_types::{Cigar, CigarOp, Coordinate, Seq};

/// Unit cost alignment of sequence 1 (packed vertically) against sequence 2.
///
/// With `semi_global`, sequence 1 may be placed anywhere inside sequence 2:
/// the first row is free and the alignment ends at the best cell of the last
/// row. Ties are broken towards the smallest column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EditDistance {
    pub semi_global: bool,
    /// Store all columns, so that a traceback and the full cost matrix are available.
    pub trace: bool,
}

/// Vertical differences of every column, plus the first row.
#[derive(Clone, Debug)]
pub struct Columns {
    len1: usize,
    words: usize,
    top: Vec<Cost>,
    /// `vs[j * words + block]`.
    vs: Vec<V>,
}

impl Columns {
    /// The cost `D[i][j]` of cell `(i, j)`.
    pub fn value(&self, i: usize, j: usize) -> Cost {
        debug_assert!(i <= self.len1);
        let col = &self.vs[j * self.words..(j + 1) * self.words];
        let (full, rem) = (i / W, i % W);
        let mut d = self.top[j] + col[..full].iter().map(V::value).sum::<Cost>();
        if rem > 0 {
            d += col[full].value_of_prefix(rem);
        }
        d
    }

    /// All costs, row by row.
    pub fn matrix(&self) -> Vec<Vec<Cost>> {
        (0..=self.len1)
            .map(|i| (0..self.top.len()).map(|j| self.value(i, j)).collect())
            .collect()
    }
}

#[derive(Clone, Debug)]
pub struct EditDistanceResult {
    pub distance: Cost,
    pub begin: Option<Coordinate>,
    pub end: Coordinate,
    pub cigar: Option<Cigar>,
    pub columns: Option<Columns>,
}

impl EditDistance {
    pub fn global() -> Self {
        Self::default()
    }

    pub fn semi_global() -> Self {
        Self {
            semi_global: true,
            trace: false,
        }
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn distance(&self, a: Seq, b: Seq) -> Cost {
        self.align(a, b).distance
    }

    pub fn align(&self, a: Seq, b: Seq) -> EditDistanceResult {
        let profile = Profile::new(a);
        let words = profile.words();
        // Row of the last symbol of `a` inside the last block.
        let last_out = a.len().wrapping_sub(1) % W;

        // In the first column, vertical deltas are all +1.
        let mut col = vec![V::one(); words];
        let mut columns = self.trace.then(|| Columns {
            len1: a.len(),
            words,
            top: Vec::with_capacity(b.len() + 1),
            vs: Vec::with_capacity((b.len() + 1) * words),
        });
        if let Some(columns) = &mut columns {
            columns.top.push(0);
            columns.vs.extend_from_slice(&col);
        }

        let mut bottom = a.len() as Cost;
        let mut best = (bottom, 0);
        for (j, &c) in b.iter().enumerate() {
            // In the first row, horizontal deltas are +1, or 0 when it is free.
            let mut h = if self.semi_global { H::zero() } else { H::one() };
            let eq = profile.eq(c);
            for (block, (v, &eq)) in col.iter_mut().zip(eq).enumerate() {
                let out = if block + 1 == words { last_out } else { W - 1 };
                compute_block(&mut h, v, eq, out);
            }
            // Without blocks, the bottom row is the top row.
            bottom += h.value();
            if self.semi_global && bottom < best.0 {
                best = (bottom, j + 1);
            }
            if let Some(columns) = &mut columns {
                columns
                    .top
                    .push(if self.semi_global { 0 } else { j as Cost + 1 });
                columns.vs.extend_from_slice(&col);
            }
        }
        if !self.semi_global {
            best = (bottom, b.len());
        }

        let (distance, end_j) = best;
        let end = Coordinate::new(a.len(), end_j);
        let (begin, cigar) = match &columns {
            Some(columns) => {
                let (begin, cigar) = self.traceback(columns, a, b, end);
                (Some(begin), Some(cigar))
            }
            None if !self.semi_global => (Some(Coordinate::new(0, 0)), None),
            None => (None, None),
        };
        log::trace!(
            "edit distance {distance} for lengths {} x {}, end {end}",
            a.len(),
            b.len()
        );
        EditDistanceResult {
            distance,
            begin,
            end,
            cigar,
            columns,
        }
    }

    /// Walk back from `end`, preferring diagonal over left over up moves.
    fn traceback(&self, columns: &Columns, a: Seq, b: Seq, end: Coordinate) -> (Coordinate, Cigar) {
        let (mut i, mut j) = (end.first, end.second);
        let mut cigar = Cigar::default();
        loop {
            if i == 0 {
                if self.semi_global || j == 0 {
                    break;
                }
                cigar.push_op(CigarOp::Ins);
                j -= 1;
                continue;
            }
            if j == 0 {
                cigar.push_op(CigarOp::Del);
                i -= 1;
                continue;
            }
            let d = columns.value(i, j);
            if columns.value(i - 1, j - 1) + (a[i - 1] != b[j - 1]) as Cost == d {
                cigar.push_diagonal(a[i - 1], b[j - 1]);
                i -= 1;
                j -= 1;
            } else if columns.value(i, j - 1) + 1 == d {
                cigar.push_op(CigarOp::Ins);
                j -= 1;
            } else {
                debug_assert_eq!(columns.value(i - 1, j) + 1, d);
                cigar.push_op(CigarOp::Del);
                i -= 1;
            }
        }
        cigar.reverse();
        (Coordinate::new(i, j), cigar)
    }
}
