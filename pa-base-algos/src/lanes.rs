use pa_affine_types::Score;
use std::{array::from_fn, ops::Add};

/// `L` independent scores that are updated in lockstep.
///
/// All operations are lane-wise loops over a fixed size array, which the
/// compiler turns into vector instructions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Lanes<const L: usize>(pub [Score; L]);

impl<const L: usize> Lanes<L> {
    #[inline(always)]
    pub fn splat(x: Score) -> Self {
        Lanes([x; L])
    }

    #[inline(always)]
    pub fn from_fn(f: impl FnMut(usize) -> Score) -> Self {
        Lanes(from_fn(f))
    }

    #[inline(always)]
    pub fn max(self, other: Self) -> Self {
        Lanes(from_fn(|k| self.0[k].max(other.0[k])))
    }

    #[inline(always)]
    pub fn lane(&self, k: usize) -> Score {
        self.0[k]
    }
}

impl<const L: usize> Add for Lanes<L> {
    type Output = Self;

    #[inline(always)]
    fn add(self, other: Self) -> Self {
        Lanes(from_fn(|k| self.0[k] + other.0[k]))
    }
}
