//! Bit-parallel unit cost alignment.
//!
//! Sequence 1 is packed vertically into blocks of `W` bits, and sequence 2 is
//! processed one column at a time. Each block of a column is computed with
//! Myers' bit-parallel algorithm from the vertical differences of the block to
//! the left and the horizontal difference entering at the top.
//!
//! Costs here are edit distances: `0` for a match, `1` for each substitution,
//! insertion or deletion.

mod edit;
mod encoding;
mod myers;
mod profile;

pub use edit::{Columns, EditDistance, EditDistanceResult};
pub use encoding::{H, V};
pub use myers::compute_block;
pub use profile::Profile;

/// The type used for all bitvectors.
pub type B = u64;
/// The length of each bitvector.
pub const W: usize = B::BITS as usize;
/// Edit distance, always non-negative.
pub type Cost = i32;
