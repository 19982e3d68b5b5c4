use crate::{B, W};
use pa_affine_types::Seq;

/// Bitpacked equality profile of a sequence over an arbitrary byte alphabet.
///
/// Every distinct symbol of the sequence gets a rank `1..`, and for each rank
/// and each block of `W` positions a bitvector marks where that symbol occurs.
/// Rank `0` is shared by all symbols absent from the sequence and never matches.
pub struct Profile {
    ranks: [u16; 256],
    words: usize,
    /// `eq[rank * words + block]`.
    eq: Vec<B>,
}

impl Profile {
    pub fn new(seq: Seq) -> Self {
        let words = seq.len().div_ceil(W);
        let mut ranks = [0u16; 256];
        let mut sigma = 0;
        for &c in seq {
            if ranks[c as usize] == 0 {
                sigma += 1;
                ranks[c as usize] = sigma;
            }
        }
        let mut eq = vec![0; (sigma as usize + 1) * words];
        for (i, &c) in seq.iter().enumerate() {
            eq[ranks[c as usize] as usize * words + i / W] |= 1 << (i % W);
        }
        Profile { ranks, words, eq }
    }

    pub fn words(&self) -> usize {
        self.words
    }

    /// The equality bits of `c` for all blocks.
    #[inline(always)]
    pub fn eq(&self, c: u8) -> &[B] {
        let r = self.ranks[c as usize] as usize;
        &self.eq[r * self.words..(r + 1) * self.words]
    }
}
