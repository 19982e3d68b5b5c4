//! Substitution scores and affine gap scores.

use crate::Score;
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};

/// A pairwise substitution score over byte symbols.
pub trait ScoringScheme: fmt::Debug + Send + Sync {
    fn score(&self, a: u8, b: u8) -> Score;

    /// `Some` when the score only depends on whether the two symbols are equal.
    fn as_match_mismatch(&self) -> Option<MatchMismatch> {
        None
    }
}

impl<S: ScoringScheme + ?Sized> ScoringScheme for &S {
    fn score(&self, a: u8, b: u8) -> Score {
        (**self).score(a, b)
    }
    fn as_match_mismatch(&self) -> Option<MatchMismatch> {
        (**self).as_match_mismatch()
    }
}

impl<S: ScoringScheme + ?Sized> ScoringScheme for Arc<S> {
    fn score(&self, a: u8, b: u8) -> Score {
        (**self).score(a, b)
    }
    fn as_match_mismatch(&self) -> Option<MatchMismatch> {
        (**self).as_match_mismatch()
    }
}

/// Scores `s(b, a)` instead of `s(a, b)`, for sweeping with the sequences swapped.
#[derive(Debug, Clone, Copy)]
pub struct Transposed<S>(pub S);

impl<S: ScoringScheme> ScoringScheme for Transposed<S> {
    #[inline]
    fn score(&self, a: u8, b: u8) -> Score {
        self.0.score(b, a)
    }
    fn as_match_mismatch(&self) -> Option<MatchMismatch> {
        self.0.as_match_mismatch()
    }
}

/// Scores depending only on symbol equality, as used for nucleotides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchMismatch {
    pub match_score: Score,
    pub mismatch_score: Score,
}

impl MatchMismatch {
    pub const fn new(match_score: Score, mismatch_score: Score) -> Self {
        Self {
            match_score,
            mismatch_score,
        }
    }

    /// Match 0, mismatch -1: the edit distance convention.
    pub const fn unit() -> Self {
        Self::new(0, -1)
    }

    pub fn is_unit(&self) -> bool {
        *self == Self::unit()
    }
}

impl ScoringScheme for MatchMismatch {
    #[inline]
    fn score(&self, a: u8, b: u8) -> Score {
        if a == b {
            self.match_score
        } else {
            self.mismatch_score
        }
    }
    fn as_match_mismatch(&self) -> Option<MatchMismatch> {
        Some(*self)
    }
}

/// A full substitution table, e.g. BLOSUM62 for amino acids.
///
/// The named tables come from `bio::scores` and expect upper case amino acid
/// letters (plus `B`, `Z`, `X` and `*`). Symbols are passed to the table
/// unchecked: any other byte panics inside `bio` (or indexes out of bounds in
/// release builds), so sequences must be validated before alignment.
#[derive(Clone, Copy)]
pub struct SubstitutionMatrix {
    name: &'static str,
    table: fn(u8, u8) -> i32,
}

impl SubstitutionMatrix {
    pub fn from_fn(name: &'static str, table: fn(u8, u8) -> i32) -> Self {
        Self { name, table }
    }
    pub fn blosum62() -> Self {
        Self::from_fn("BLOSUM62", bio::scores::blosum62)
    }
    pub fn pam40() -> Self {
        Self::from_fn("PAM40", bio::scores::pam40)
    }
    pub fn pam120() -> Self {
        Self::from_fn("PAM120", bio::scores::pam120)
    }
    pub fn pam250() -> Self {
        Self::from_fn("PAM250", bio::scores::pam250)
    }
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for SubstitutionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SubstitutionMatrix").field(&self.name).finish()
    }
}

impl ScoringScheme for SubstitutionMatrix {
    #[inline]
    fn score(&self, a: u8, b: u8) -> Score {
        (self.table)(a, b)
    }
}

/// Affine gap scores: a gap of length `l > 0` scores `open + l * extend`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapScheme {
    pub open: Score,
    pub extend: Score,
}

impl GapScheme {
    pub const fn affine(open: Score, extend: Score) -> Self {
        Self { open, extend }
    }

    /// Every gap symbol costs `extend`; there is no separate opening cost.
    pub const fn linear(extend: Score) -> Self {
        Self::affine(0, extend)
    }

    /// Score of the first symbol of a gap.
    pub const fn open_extend(&self) -> Score {
        self.open + self.extend
    }

    pub fn score(&self, len: usize) -> Score {
        if len == 0 {
            0
        } else {
            self.open + self.extend * len as Score
        }
    }

    pub fn is_linear(&self) -> bool {
        self.open == 0
    }
}

impl Default for GapScheme {
    fn default() -> Self {
        Self::linear(-1)
    }
}
