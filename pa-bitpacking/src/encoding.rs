use crate::{Cost, B, W};

/// Vertical differences of one block, as indicator bits of `+1` and `-1`.
/// Bit `k` holds `D[k+1] - D[k]`, counted from the top of the block.
#[derive(Clone, Default, Copy, PartialEq, Eq, Debug)]
pub struct V(B, B);

impl V {
    /// All vertical differences `+1`, as in the first column.
    #[inline(always)]
    pub fn one() -> Self {
        V(B::MAX, 0)
    }
    #[inline(always)]
    pub fn from(p: B, m: B) -> Self {
        V(p, m)
    }
    #[inline(always)]
    pub fn value(&self) -> Cost {
        self.0.count_ones() as Cost - self.1.count_ones() as Cost
    }
    /// Value of the first `j` bits.
    /// NOTE: Requires `j < W`.
    #[inline(always)]
    pub fn value_of_prefix(&self, j: usize) -> Cost {
        debug_assert!(j < W);
        let mask = ((1 as B) << j) - 1;
        (self.0 & mask).count_ones() as Cost - (self.1 & mask).count_ones() as Cost
    }
    #[inline(always)]
    pub fn pm(&self) -> (B, B) {
        (self.0, self.1)
    }
    #[inline(always)]
    pub fn p(&self) -> B {
        self.0
    }
    #[inline(always)]
    pub fn m(&self) -> B {
        self.1
    }
}

/// A single horizontal difference in `{-1, 0, 1}`, encoded as two indicator
/// bits in the lowest position so it can be shifted into a block directly.
#[derive(Clone, Default, Copy, PartialEq, Eq, Debug)]
pub struct H(B, B);

impl H {
    #[inline(always)]
    pub fn zero() -> Self {
        H(0, 0)
    }
    #[inline(always)]
    pub fn one() -> Self {
        H(1, 0)
    }
    #[inline(always)]
    pub fn from(p: B, m: B) -> Self {
        debug_assert!(p <= 1 && m <= 1 && p & m == 0);
        H(p, m)
    }
    #[inline(always)]
    pub fn value(&self) -> Cost {
        self.0 as Cost - self.1 as Cost
    }
    #[inline(always)]
    pub fn p(&self) -> B {
        self.0
    }
    #[inline(always)]
    pub fn m(&self) -> B {
        self.1
    }
}
