//! The declarative description of an alignment.

use pa_affine_types::{Band, FreeEndGaps, GapScheme, Score, ScoringScheme};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::{ops::BitOr, sync::Arc};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Method {
    /// Needleman-Wunsch, optionally with free end gaps.
    Global,
    /// Smith-Waterman.
    Local,
}

/// The fields an [`AlignmentResult`](crate::AlignmentResult) is asked to carry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputFields {
    pub score: bool,
    pub begin_position: bool,
    pub end_position: bool,
    pub alignment: bool,
    pub sequence1_id: bool,
    pub sequence2_id: bool,
}

impl OutputFields {
    pub const NONE: Self = Self {
        score: false,
        begin_position: false,
        end_position: false,
        alignment: false,
        sequence1_id: false,
        sequence2_id: false,
    };
    pub const SCORE: Self = Self {
        score: true,
        ..Self::NONE
    };
    pub const BEGIN_POSITION: Self = Self {
        begin_position: true,
        ..Self::NONE
    };
    pub const END_POSITION: Self = Self {
        end_position: true,
        ..Self::NONE
    };
    pub const ALIGNMENT: Self = Self {
        alignment: true,
        ..Self::NONE
    };
    pub const SEQUENCE1_ID: Self = Self {
        sequence1_id: true,
        ..Self::NONE
    };
    pub const SEQUENCE2_ID: Self = Self {
        sequence2_id: true,
        ..Self::NONE
    };
    pub const ALL: Self = Self {
        score: true,
        begin_position: true,
        end_position: true,
        alignment: true,
        sequence1_id: true,
        sequence2_id: true,
    };

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

impl BitOr for OutputFields {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            score: self.score || rhs.score,
            begin_position: self.begin_position || rhs.begin_position,
            end_position: self.end_position || rhs.end_position,
            alignment: self.alignment || rhs.alignment,
            sequence1_id: self.sequence1_id || rhs.sequence1_id,
            sequence2_id: self.sequence2_id || rhs.sequence2_id,
        }
    }
}

/// Builder for the options of an alignment.
///
/// Nothing is validated while building; [`compile`](crate::compile) checks
/// the whole configuration at once and fills in the defaults.
///
/// ```
/// use pa_affine_types::{GapScheme, MatchMismatch};
/// use pa_align::{AlignmentConfig, OutputFields};
///
/// let config = AlignmentConfig::new()
///     .method_global()
///     .gap(GapScheme::affine(-10, -1))
///     .scoring(MatchMismatch::new(4, -5))
///     .output(OutputFields::SCORE | OutputFields::END_POSITION);
/// ```
#[derive(Clone, Debug, Default)]
pub struct AlignmentConfig {
    pub(crate) methods: SmallVec<[Method; 1]>,
    pub(crate) free_end_gaps: Option<FreeEndGaps>,
    pub(crate) gap: Option<GapScheme>,
    pub(crate) scoring: Option<Arc<dyn ScoringScheme>>,
    pub(crate) band: Option<Band>,
    pub(crate) output: Option<OutputFields>,
    pub(crate) vectorised: bool,
    pub(crate) debug: bool,
    pub(crate) min_score: Option<Score>,
    pub(crate) threads: Option<usize>,
}

impl AlignmentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.methods.push(method);
        self
    }

    pub fn method_global(self) -> Self {
        self.method(Method::Global)
    }

    pub fn method_local(self) -> Self {
        self.method(Method::Local)
    }

    pub fn free_end_gaps(mut self, ends: FreeEndGaps) -> Self {
        self.free_end_gaps = Some(ends);
        self
    }

    pub fn gap(mut self, gap: GapScheme) -> Self {
        self.gap = Some(gap);
        self
    }

    pub fn scoring(mut self, scoring: impl ScoringScheme + 'static) -> Self {
        self.scoring = Some(Arc::new(scoring));
        self
    }

    pub fn scoring_arc(mut self, scoring: Arc<dyn ScoringScheme>) -> Self {
        self.scoring = Some(scoring);
        self
    }

    pub fn band(mut self, band: Band) -> Self {
        self.band = Some(band);
        self
    }

    /// Repeated calls accumulate.
    pub fn output(mut self, fields: OutputFields) -> Self {
        self.output = Some(self.output.unwrap_or(OutputFields::NONE) | fields);
        self
    }

    /// Align batches of pairs in lockstep, one pair per lane.
    pub fn vectorised(mut self) -> Self {
        self.vectorised = true;
        self
    }

    /// Also return the score and trace matrices of every pair.
    pub fn debug(mut self) -> Self {
        self.debug = true;
        self
    }

    /// Do not report alignments scoring below `min_score`.
    /// Only supported when the configuration reduces to edit distance.
    pub fn min_score(mut self, min_score: Score) -> Self {
        self.min_score = Some(min_score);
        self
    }

    /// Evaluate chunks of pairs on a pool of `threads` workers.
    pub fn parallel(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// The unique method, once the configuration is valid.
    pub fn get_method(&self) -> Option<Method> {
        match self.methods.as_slice() {
            [m] => Some(*m),
            _ => None,
        }
    }

    pub fn get_free_end_gaps(&self) -> FreeEndGaps {
        self.free_end_gaps.unwrap_or_default()
    }

    pub fn get_gap(&self) -> Option<GapScheme> {
        self.gap
    }

    pub fn get_scoring(&self) -> Option<&Arc<dyn ScoringScheme>> {
        self.scoring.as_ref()
    }

    pub fn get_band(&self) -> Option<Band> {
        self.band
    }

    pub fn get_output(&self) -> Option<OutputFields> {
        self.output
    }

    pub fn is_vectorised(&self) -> bool {
        self.vectorised
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn get_min_score(&self) -> Option<Score> {
        self.min_score
    }

    pub fn get_threads(&self) -> Option<usize> {
        self.threads
    }
}
