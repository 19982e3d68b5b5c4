//! Pairwise alignment of streams of sequence pairs.
//!
//! An [`AlignmentConfig`] describes what to compute. [`compile`] validates it
//! once and selects a kernel: the bit-parallel edit distance for unit costs,
//! or the affine engine of `pa-base-algos`, on one pair at a time (optionally
//! banded) or on a batch of pairs in lockstep. The resulting
//! [`AlignmentPlan`] aligns chunks of pairs, and [`align_pairwise`] wraps it
//! in a lazy, optionally parallel, stream of [`AlignmentResult`]s.
//!
//! ```
//! use pa_affine_types::{GapScheme, MatchMismatch};
//! use pa_align::{align_pairwise, AlignmentConfig};
//!
//! let config = AlignmentConfig::new()
//!     .method_global()
//!     .gap(GapScheme::linear(-1))
//!     .scoring(MatchMismatch::unit());
//! let pairs = [("ACGT", "AGGT")];
//! for result in align_pairwise(pairs, config).unwrap() {
//!     let result = result.unwrap();
//!     assert_eq!(result.score(), Some(-1));
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
mod executor;
mod plan;
mod resolve;
mod result;

pub use config::{AlignmentConfig, Method, OutputFields};
pub use error::{AlignmentError, ContractViolation, InvalidAlignmentConfiguration};
pub use executor::{align_pairwise, AlignmentStream};
pub use plan::{compile, AlignmentPlan, Kernel, MatrixPolicy, ScoringPolicy};
pub use resolve::{ResolvedTraits, ScoreRepresentation, TraceRepresentation};
pub use result::AlignmentResult;

use pa_affine_types::Seq;

/// The two sequences of one pair.
pub trait SequencePair {
    fn first(&self) -> Seq<'_>;
    fn second(&self) -> Seq<'_>;
}

impl<A: AsRef<[u8]>, B: AsRef<[u8]>> SequencePair for (A, B) {
    fn first(&self) -> Seq<'_> {
        self.0.as_ref()
    }
    fn second(&self) -> Seq<'_> {
        self.1.as_ref()
    }
}

impl<T: SequencePair + ?Sized> SequencePair for &T {
    fn first(&self) -> Seq<'_> {
        (**self).first()
    }
    fn second(&self) -> Seq<'_> {
        (**self).second()
    }
}
