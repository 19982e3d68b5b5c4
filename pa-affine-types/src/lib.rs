//! Types shared by all aligners in this workspace.
//!
//! Scores are *maximized*: matches are usually positive, while mismatches and
//! gaps are non-positive. Coordinates index the DP matrix, where `first`
//! (the row) runs over sequence 1 and `second` (the column) over sequence 2.

pub mod cigar;
pub mod cost_model;

// Re-export types for convenience of `use pa_affine_types::*;`.
pub use cigar::*;
pub use cost_model::*;

use serde::{Deserialize, Serialize};
use std::fmt;

pub type Score = i32;
pub type Seq<'a> = &'a [u8];
pub type Sequence = Vec<u8>;

/// Value of unreachable cells.
/// Half the minimum, so that adding any number of gap costs can not wrap around.
pub const NEG_INF: Score = Score::MIN / 2;

/// A position `(row, column)` in the DP matrix.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Coordinate {
    pub first: usize,
    pub second: usize,
}

impl Coordinate {
    pub const fn new(first: usize, second: usize) -> Self {
        Self { first, second }
    }

    pub const fn transpose(self) -> Self {
        Self::new(self.second, self.first)
    }

    /// The diagonal `second - first` this coordinate lies on.
    pub fn diagonal(&self) -> isize {
        self.second as isize - self.first as isize
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.first, self.second)
    }
}

/// A diagonal corridor of the DP matrix.
///
/// Row `i` contains the columns `j` with `lower <= j - i <= upper`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Band {
    pub lower: isize,
    pub upper: isize,
}

impl Band {
    pub const fn new(lower: isize, upper: isize) -> Self {
        Self { lower, upper }
    }

    pub fn is_inverted(&self) -> bool {
        self.lower > self.upper
    }

    pub fn contains_diagonal(&self, d: isize) -> bool {
        self.lower <= d && d <= self.upper
    }

    pub fn contains(&self, c: Coordinate) -> bool {
        self.contains_diagonal(c.diagonal())
    }

    /// The number of diagonals in the band.
    pub fn width(&self) -> usize {
        (self.upper - self.lower + 1).max(0) as usize
    }

    /// The same band after swapping the roles of the two sequences.
    pub fn transpose(self) -> Self {
        Self::new(-self.upper, -self.lower)
    }
}

/// Which end gaps are free of cost.
///
/// The flags name the sequence that *receives* the gaps:
/// - `first_leading`: row 0 is free, so a prefix of sequence 2 may be skipped.
/// - `second_leading`: column 0 is free, so a prefix of sequence 1 may be skipped.
/// - `first_trailing`: the alignment may end anywhere in the last row.
/// - `second_trailing`: the alignment may end anywhere in the last column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeEndGaps {
    pub first_leading: bool,
    pub second_leading: bool,
    pub first_trailing: bool,
    pub second_trailing: bool,
}

impl FreeEndGaps {
    pub const fn none() -> Self {
        Self {
            first_leading: false,
            second_leading: false,
            first_trailing: false,
            second_trailing: false,
        }
    }

    pub const fn all() -> Self {
        Self {
            first_leading: true,
            second_leading: true,
            first_trailing: true,
            second_trailing: true,
        }
    }

    /// Sequence 1 may be placed anywhere inside sequence 2.
    pub const fn first_in_second() -> Self {
        Self {
            first_leading: true,
            second_leading: false,
            first_trailing: true,
            second_trailing: false,
        }
    }

    pub fn any(&self) -> bool {
        self.first_leading || self.second_leading || self.first_trailing || self.second_trailing
    }

    pub fn transpose(self) -> Self {
        Self {
            first_leading: self.second_leading,
            second_leading: self.first_leading,
            first_trailing: self.second_trailing,
            second_trailing: self.first_trailing,
        }
    }
}
