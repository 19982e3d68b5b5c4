//! Shared test tooling: hardcoded tricky pairs, seeded random pairs, and
//! slow but obviously correct reference aligners to compare against.

mod generate;
pub mod reference;

pub use generate::*;

use pa_affine_types::{Seq, Sequence};

/// Hardcoded pairs that have caught bugs before.
pub fn test_sequences() -> Vec<(Sequence, Sequence)> {
    let pairs: [(Seq, Seq); 10] = [
        (b"", b""),
        (b"A", b""),
        (b"", b"ACGT"),
        (b"TTGGGTCAATCAGCCAGTTTTTA", b"TTTGAGTGGGTCATCACCGATTTTAT"),
        (b"ACTGACCAGT", b"CCGACAGGA"),
        (b"AGTTTTAT", b"ACCGATTTTTA"),
        (b"CTCTCTTCTCTCTCTA", b"CCTCTCTCTCTCCTCTC"),
        (b"AGTGGGTTGCCTTCATTCCG", b"AGTGGTGTCTTCAGGCCTTCATTCCG"),
        (b"GCACGTCGCCCCCCGCCCGCG", b"GCCCGCCCGCCCGCCCCCGCCCCC"),
        (b"TTTTTACGTATGTCCCCC", b"ACGTAAAACGTAGTAGAT"),
    ];
    pairs
        .into_iter()
        .map(|(a, b)| (a.to_vec(), b.to_vec()))
        .collect()
}

/// Unit cost edit distance, as computed by `triple_accel`.
pub fn edit_distance(a: Seq, b: Seq) -> u32 {
    triple_accel::levenshtein_exp(a, b)
}

pub fn seq_to_string(seq: Seq) -> String {
    String::from_utf8_lossy(seq).into_owned()
}
