//! The affine gap DP engine.
//!
//! One implementation of the recursion serves both single pairs and batches:
//! it runs over [`Lanes<L>`] of scores, one lane per pair. `L = 1` supports
//! bands, traceback and debug matrices; wider lanes compute scores and end
//! positions only.

mod lanes;
pub mod nw;
pub mod trace;

#[cfg(test)]
mod tests;

pub use lanes::Lanes;
pub use nw::{JRange, Nw, NwParams, Optimum};
pub use trace::{Cell, DebugMatrices, NoSink, ScoreMatrix, Sink, TraceMatrix};

use pa_affine_types::{Score, NEG_INF};

/// Number of lanes used for batches of pairs.
#[cfg(target_feature = "avx512f")]
pub const SIMD_LANES: usize = 16;
#[cfg(not(target_feature = "avx512f"))]
pub const SIMD_LANES: usize = 8;

/// Unreachable cells start at `NEG_INF` and may grow by a few substitution
/// scores; anything below this threshold is unreachable.
pub fn is_reachable(s: Score) -> bool {
    s > NEG_INF / 2
}
