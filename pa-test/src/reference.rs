//! A textbook three-matrix implementation of affine alignment.
//!
//! It stores every cell as an `Option` (unreachable cells are `None`) and is
//! only meant as an oracle for tests.

use pa_affine_types::{Band, Coordinate, FreeEndGaps, GapScheme, Score, ScoringScheme, Seq};

#[derive(Clone, Copy, Debug)]
pub struct Reference {
    pub gap: GapScheme,
    pub ends: FreeEndGaps,
    pub local: bool,
    pub band: Option<Band>,
}

fn max(a: Option<Score>, b: Option<Score>) -> Option<Score> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

fn add(a: Option<Score>, b: Score) -> Option<Score> {
    a.map(|a| a + b)
}

impl Reference {
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

    /// The full matrix of best scores, `None` outside the band.
    pub fn matrix(&self, a: Seq, b: Seq, scoring: &impl ScoringScheme) -> Vec<Vec<Option<Score>>> {
        let (n, m) = (a.len(), b.len());
        let in_band = |i: usize, j: usize| {
            self.band
                .map_or(true, |band| band.contains(Coordinate::new(i, j)))
        };
        let (go, ge) = (self.gap.open, self.gap.extend);

        let mut h = vec![vec![None; m + 1]; n + 1];
        let mut e = vec![vec![None; m + 1]; n + 1];
        let mut f = vec![vec![None; m + 1]; n + 1];
        for i in 0..=n {
            for j in 0..=m {
                if !in_band(i, j) {
                    continue;
                }
                if i == 0 && j == 0 {
                    h[0][0] = Some(0);
                    continue;
                }
                if j > 0 {
                    e[i][j] = max(add(h[i][j - 1], go + ge), add(e[i][j - 1], ge));
                }
                if i > 0 {
                    f[i][j] = max(add(h[i - 1][j], go + ge), add(f[i - 1][j], ge));
                }
                let mut best = max(e[i][j], f[i][j]);
                if i > 0 && j > 0 {
                    best = max(best, add(h[i - 1][j - 1], scoring.score(a[i - 1], b[j - 1])));
                }
                let free_start = self.local
                    || (i == 0 && self.ends.first_leading)
                    || (j == 0 && self.ends.second_leading);
                if free_start {
                    best = max(best, Some(0));
                }
                h[i][j] = best;
            }
        }
        h
    }

    /// The optimal score, or `None` when no alignment fits in the band.
    pub fn score(&self, a: Seq, b: Seq, scoring: &impl ScoringScheme) -> Option<Score> {
        let (n, m) = (a.len(), b.len());
        let h = self.matrix(a, b, scoring);
        if self.local {
            return h.iter().flatten().fold(None, |acc, &x| max(acc, x));
        }
        let mut best = h[n][m];
        if self.ends.first_trailing {
            best = h[n].iter().fold(best, |acc, &x| max(acc, x));
        }
        if self.ends.second_trailing {
            best = h.iter().fold(best, |acc, row| max(acc, row[m]));
        }
        best
    }
}
