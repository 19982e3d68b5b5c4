//! Affine gap alignment (Gotoh) over rows of sequence 1.
//!
//! Cells `(i, j)` hold the best score `H` of aligning `a[..i]` and `b[..j]`,
//! together with the best score `E` of ending in a gap in `a` (coming from
//! the left) and `F` of ending in a gap in `b` (coming from above):
//!
//! ```text
//! H[i][j] = max(H[i-1][j-1] + s(a_i, b_j), E[i][j], F[i][j] [, 0 if local])
//! E[i][j] = max(H[i][j-1] + open + extend, E[i][j-1] + extend)
//! F[i][j] = max(H[i-1][j] + open + extend, F[i-1][j] + extend)
//! ```
//!
//! Only one row of `H` and `F` is kept in memory; the recorded decisions go to
//! a [`Sink`] when a traceback or the debug matrices are needed.

use crate::{
    trace::{Cell, Sink, E_EXTEND, F_EXTEND, LEFT, START, UP},
    Lanes,
};
use pa_affine_types::{Band, Coordinate, FreeEndGaps, GapScheme, Score, ScoringScheme, Seq, NEG_INF};
use std::{array::from_fn, cmp::min};

/// Inclusive range of columns computed in a row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JRange(pub usize, pub usize);

impl JRange {
    pub fn empty() -> Self {
        JRange(1, 0)
    }
    pub fn is_empty(&self) -> bool {
        self.0 > self.1
    }
    pub fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.1 - self.0 + 1
        }
    }
    pub fn contains(&self, j: usize) -> bool {
        self.0 <= j && j <= self.1
    }
}

/// Everything that defines the recursion, except the substitution scores.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NwParams {
    pub gap: GapScheme,
    pub ends: FreeEndGaps,
    pub local: bool,
    pub band: Option<Band>,
}

impl NwParams {
    pub fn global(gap: GapScheme) -> Self {
        Self {
            gap,
            ends: FreeEndGaps::none(),
            local: false,
            band: None,
        }
    }

    pub fn local(gap: GapScheme) -> Self {
        Self {
            local: true,
            ..Self::global(gap)
        }
    }

    /// The same alignment with the roles of the sequences swapped.
    pub fn transpose(self) -> Self {
        Self {
            ends: self.ends.transpose(),
            band: self.band.map(Band::transpose),
            ..self
        }
    }

    /// Columns of row `i` inside the band, including the border column 0.
    pub fn j_range(&self, i: usize, m: usize) -> JRange {
        let Some(band) = self.band else {
            return JRange(0, m);
        };
        let lo = (i as isize + band.lower).max(0);
        let hi = (i as isize + band.upper).min(m as isize);
        if lo > hi {
            JRange::empty()
        } else {
            JRange(lo as usize, hi as usize)
        }
    }

    /// Borders that are not free are gaps starting at `(0, 0)`, so they are
    /// only reachable when the band contains the main diagonal.
    fn origin_in_band(&self) -> bool {
        self.band.map_or(true, |b| b.contains_diagonal(0))
    }

    fn row_border(&self, j: usize) -> (Score, u8) {
        if j == 0 || self.local || self.ends.first_leading {
            (0, START)
        } else if !self.origin_in_band() {
            (NEG_INF, START)
        } else {
            let extend = if j > 1 { E_EXTEND } else { 0 };
            (self.gap.score(j), LEFT | extend)
        }
    }

    fn col_border(&self, i: usize) -> (Score, u8) {
        if self.local || self.ends.second_leading {
            (0, START)
        } else if !self.origin_in_band() {
            (NEG_INF, START)
        } else {
            let extend = if i > 1 { F_EXTEND } else { 0 };
            (self.gap.score(i), UP | extend)
        }
    }
}

/// The best cell of one lane. Unreachable when no allowed end cell is reachable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Optimum {
    pub score: Score,
    pub end: Coordinate,
}

impl Optimum {
    fn none() -> Self {
        Optimum {
            score: NEG_INF,
            end: Coordinate::default(),
        }
    }

    pub fn is_reachable(&self) -> bool {
        crate::is_reachable(self.score)
    }
}

/// The DP engine for `L` pairs at a time, with buffers reused between calls.
#[derive(Clone, Debug)]
pub struct Nw<const L: usize> {
    params: NwParams,
    /// `H` of the previous row, updated in place to the current row.
    h: Vec<Lanes<L>>,
    /// `F` of the previous row, updated in place to the current row.
    f: Vec<Lanes<L>>,
    /// Sequence 1 of all lanes, padded to the longest length.
    a: Vec<[u8; L]>,
    /// Sequence 2 of all lanes, padded to the longest length.
    b: Vec<[u8; L]>,
}

impl<const L: usize> Nw<L> {
    pub fn new(params: NwParams) -> Self {
        assert!(L > 0);
        assert!(
            L == 1 || params.band.is_none(),
            "Bands are only supported for single pairs."
        );
        Self {
            params,
            h: vec![],
            f: vec![],
            a: vec![],
            b: vec![],
        }
    }

    pub fn params(&self) -> &NwParams {
        &self.params
    }

    /// Pack the sequences of all lanes column-wise. Missing lanes are empty.
    fn load(&mut self, pairs: &[(Seq, Seq)]) -> ([usize; L], [usize; L]) {
        assert!(pairs.len() <= L, "At most {L} pairs fit in a batch.");
        let n: [usize; L] = from_fn(|k| pairs.get(k).map_or(0, |p| p.0.len()));
        let m: [usize; L] = from_fn(|k| pairs.get(k).map_or(0, |p| p.1.len()));
        Self::pack(&mut self.a, pairs.iter().map(|p| p.0));
        Self::pack(&mut self.b, pairs.iter().map(|p| p.1));
        (n, m)
    }

    /// Lanes shorter than the longest sequence are padded with the first
    /// symbol of the batch, so the scoring scheme only sees input symbols.
    /// Padded cells lie outside their lane's matrix and are never tracked.
    fn pack<'s>(v: &mut Vec<[u8; L]>, seqs: impl Iterator<Item = Seq<'s>> + Clone) {
        let len = seqs.clone().map(|s| s.len()).max().unwrap_or(0);
        let fill = seqs.clone().find_map(|s| s.first().copied()).unwrap_or(0);
        v.clear();
        v.resize(len, [fill; L]);
        for (k, seq) in seqs.enumerate() {
            for (x, &c) in v.iter_mut().zip(seq) {
                x[k] = c;
            }
        }
    }

    /// Align up to `L` pairs at once and return the optimum of every lane.
    ///
    /// Lanes beyond `pairs.len()` hold empty sequences. When the sink records
    /// anything, exactly one lane must be used.
    pub fn align<S: ScoringScheme + ?Sized, K: Sink>(
        &mut self,
        pairs: &[(Seq, Seq)],
        scoring: &S,
        sink: &mut K,
    ) -> [Optimum; L] {
        assert!(!K::ENABLED || L == 1, "Only single lanes can be traced.");
        let (n, m) = self.load(pairs);
        let n_max = self.a.len();
        let m_max = self.b.len();
        let p = self.params;
        sink.reset(n_max, m_max, &|i| p.j_range(i, m_max));

        let neg = Lanes::splat(NEG_INF);
        let zero = Lanes::splat(0);
        let goe = Lanes::splat(p.gap.open_extend());
        let ge = Lanes::splat(p.gap.extend);

        self.h.clear();
        self.h.resize(m_max + 1, neg);
        self.f.clear();
        self.f.resize(m_max + 1, neg);

        let mut best = [Optimum::none(); L];

        // Row 0.
        let mut prev = p.j_range(0, m_max);
        if !prev.is_empty() {
            for j in prev.0..=prev.1 {
                let (h, t) = p.row_border(j);
                self.h[j] = Lanes::splat(h);
                sink.border(0, j, h, t);
            }
            self.track(0, prev, &n, &m, &mut best);
        }

        for i in 1..=n_max {
            let range = p.j_range(i, m_max);
            if range.is_empty() {
                self.invalidate(prev.0, min(prev.1 + 1, m_max + 1));
                prev = range;
                continue;
            }
            let lo = range.0.max(1);
            // H[i-1][lo-1]; must be read before the left part is invalidated.
            let mut diag = self.h[lo - 1];
            if !prev.is_empty() {
                self.invalidate(prev.0, min(range.0, prev.1 + 1));
            }

            let mut h_left = neg;
            if range.0 == 0 {
                let (h, t) = p.col_border(i);
                h_left = Lanes::splat(h);
                self.h[0] = h_left;
                self.f[0] = neg;
                sink.border(i, 0, h, t);
            }
            let mut e = neg;

            let ai = self.a[i - 1];
            for j in lo..=range.1 {
                let bj = self.b[j - 1];
                let s = Lanes::from_fn(|k| scoring.score(ai[k], bj[k]));

                let up = self.h[j];
                let f_open = up + goe;
                let f_extend = self.f[j] + ge;
                let f = f_open.max(f_extend).max(neg);

                let e_open = h_left + goe;
                let e_extend = e + ge;
                e = e_open.max(e_extend).max(neg);

                let d = diag + s;
                let mut h = d.max(e).max(f).max(neg);
                if p.local {
                    h = h.max(zero);
                }

                if K::ENABLED {
                    let cell = Cell {
                        h: h.lane(0),
                        diag: d.lane(0),
                        e: e.lane(0),
                        e_open: e_open.lane(0),
                        e_extend: e_extend.lane(0),
                        f: f.lane(0),
                        f_open: f_open.lane(0),
                        f_extend: f_extend.lane(0),
                    };
                    sink.cell(i, j, &cell, p.local);
                }

                diag = up;
                self.h[j] = h;
                self.f[j] = f;
                h_left = h;
            }
            self.track(i, range, &n, &m, &mut best);
            prev = range;
        }

        log::trace!(
            "Aligned {} pair(s) of at most {n_max} x {m_max}: {:?}",
            pairs.len(),
            best.iter().map(|o| o.score).collect::<Vec<_>>()
        );
        best
    }

    fn invalidate(&mut self, from: usize, to: usize) {
        let neg = Lanes::splat(NEG_INF);
        for j in from..to {
            self.h[j] = neg;
            self.f[j] = neg;
        }
    }

    /// Update the optimum of every lane with the cells of row `i` that may end an alignment.
    /// Cells are visited in increasing `j`, and only strictly better cells replace the optimum.
    fn track(
        &self,
        i: usize,
        range: JRange,
        n: &[usize; L],
        m: &[usize; L],
        best: &mut [Optimum; L],
    ) {
        let ends = self.params.ends;
        for k in 0..L {
            if i > n[k] || range.0 > m[k] {
                continue;
            }
            let hi = min(range.1, m[k]);
            let mut consider = |j: usize| {
                let s = self.h[j].lane(k);
                if s > best[k].score {
                    best[k] = Optimum {
                        score: s,
                        end: Coordinate::new(i, j),
                    };
                }
            };
            if self.params.local || (i == n[k] && ends.first_trailing) {
                (range.0..=hi).for_each(&mut consider);
            } else if (i == n[k] || ends.second_trailing) && hi == m[k] {
                consider(m[k]);
            }
        }
    }
}
