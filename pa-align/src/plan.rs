//! Selecting a kernel for a configuration, and running it on chunks of pairs.
//!
//! All choices are made once in [`compile`]; running a plan only dispatches
//! on the selected [`Kernel`] per chunk.

use crate::{
    config::AlignmentConfig,
    error::{ContractViolation, InvalidAlignmentConfiguration, Result},
    resolve::{resolve, ResolvedTraits, ScoreRepresentation, TraceRepresentation},
    result::{AlignmentResult, RawAlignment, ResultBuilder},
    SequencePair,
};
use pa_affine_types::{
    Coordinate, FreeEndGaps, MatchMismatch, Score, ScoringScheme, Seq, Transposed,
};
use pa_base_algos::{
    DebugMatrices, NoSink, Nw, NwParams, Optimum, ScoreMatrix, TraceMatrix, SIMD_LANES,
};
use pa_bitpacking::EditDistance;
use smallvec::SmallVec;
use std::{marker::PhantomData, sync::Arc};

/// How substitution scores are looked up.
///
/// Match/mismatch scores are passed by value so that the inner loop is
/// monomorphised for them; other schemes go through a vtable.
#[derive(Clone, Debug)]
pub enum ScoringPolicy {
    MatchMismatch(MatchMismatch),
    Table(Arc<dyn ScoringScheme>),
}

impl ScoringPolicy {
    fn new(scoring: Arc<dyn ScoringScheme>) -> Self {
        match scoring.as_match_mismatch() {
            Some(s) => ScoringPolicy::MatchMismatch(s),
            None => ScoringPolicy::Table(scoring),
        }
    }
}

/// Call `$body` with `$s` bound to the concrete scoring scheme of a policy.
macro_rules! with_scoring {
    ($policy:expr, |$s:ident| $body:expr) => {
        match $policy {
            ScoringPolicy::MatchMismatch(s) => {
                let $s = s;
                $body
            }
            ScoringPolicy::Table(s) => {
                let $s = &**s;
                $body
            }
        }
    };
}

/// What the scalar engine keeps of the matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatrixPolicy {
    /// Only one row. With `transpose`, the longer sequence runs along the
    /// rows so that the row has the length of the shorter one.
    ScoreOnly { transpose: bool },
    /// A trace byte per cell, for the traceback.
    Trace,
    /// Trace bytes and scores of every cell.
    Debug,
}

#[derive(Clone, Debug)]
pub struct EditDistanceKernel {
    ed: EditDistance,
    min_score: Option<Score>,
    debug: bool,
}

impl EditDistanceKernel {
    fn align(&self, a: Seq, b: Seq) -> RawAlignment {
        let r = self.ed.align(a, b);
        let score = -r.distance;
        let debug = match (self.debug, &r.columns) {
            (true, Some(columns)) => Some(DebugMatrices {
                scores: columns
                    .matrix()
                    .into_iter()
                    .map(|row| row.into_iter().map(|d| Some(-d)).collect())
                    .collect(),
                trace: None,
            }),
            _ => None,
        };
        RawAlignment {
            score: match self.min_score {
                Some(min) if score < min => None,
                _ => Some(score),
            },
            begin: r.begin,
            end: r.end,
            cigar: r.cigar,
            debug,
        }
    }
}

/// The affine engine on one pair at a time, with or without a band.
#[derive(Clone, Debug)]
pub struct ScalarKernel {
    nw: Nw<1>,
    /// The same engine with the sequences swapped, for `ScoreOnly { transpose: true }`.
    transposed: Nw<1>,
    matrix: MatrixPolicy,
    trace: TraceMatrix,
    scores: ScoreMatrix,
}

impl ScalarKernel {
    fn new(params: NwParams, matrix: MatrixPolicy) -> Self {
        Self {
            nw: Nw::new(params),
            transposed: Nw::new(params.transpose()),
            matrix,
            trace: TraceMatrix::default(),
            scores: ScoreMatrix::default(),
        }
    }

    fn align<S: ScoringScheme + ?Sized>(
        &mut self,
        a: Seq,
        b: Seq,
        scoring: &S,
    ) -> Result<RawAlignment> {
        let params = *self.nw.params();
        check_band(&params, a.len(), b.len())?;

        let mut begin = None;
        let mut cigar = None;
        let mut debug = None;
        let opt = match self.matrix {
            MatrixPolicy::ScoreOnly { transpose: true } if b.len() > a.len() => {
                let [opt] = self
                    .transposed
                    .align(&[(b, a)], &Transposed(scoring), &mut NoSink);
                Optimum {
                    end: opt.end.transpose(),
                    ..opt
                }
            }
            MatrixPolicy::ScoreOnly { .. } => self.nw.align(&[(a, b)], scoring, &mut NoSink)[0],
            MatrixPolicy::Trace => self.nw.align(&[(a, b)], scoring, &mut self.trace)[0],
            MatrixPolicy::Debug => {
                let [opt] = self
                    .nw
                    .align(&[(a, b)], scoring, &mut (&mut self.trace, &mut self.scores));
                debug = Some(DebugMatrices {
                    scores: self.scores.scores.clone(),
                    trace: Some(self.trace.directions()),
                });
                opt
            }
        };
        if !opt.is_reachable() {
            return Err(InvalidAlignmentConfiguration::new(format!(
                "the band {:?} excludes every alignment of sequences of lengths {} and {}",
                params.band,
                a.len(),
                b.len()
            ))
            .into());
        }

        if matches!(self.matrix, MatrixPolicy::Trace | MatrixPolicy::Debug) {
            let (start, path) = self.trace.traceback(a, b, opt.end);
            begin = Some(start);
            cigar = Some(path);
        } else if !params.local && !params.ends.first_leading && !params.ends.second_leading {
            begin = Some(Coordinate::new(0, 0));
        }
        Ok(RawAlignment {
            score: Some(opt.score),
            begin,
            end: opt.end,
            cigar,
            debug,
        })
    }
}

/// The affine engine on [`SIMD_LANES`] pairs at a time. Scores and end positions only.
#[derive(Clone, Debug)]
pub struct VectorisedKernel {
    nw: Nw<SIMD_LANES>,
}

#[derive(Clone, Debug)]
pub enum Kernel {
    EditDistance(EditDistanceKernel),
    Scalar(ScalarKernel),
    Banded(ScalarKernel),
    Vectorised(VectorisedKernel),
}

impl Kernel {
    pub fn name(&self) -> &'static str {
        match self {
            Kernel::EditDistance(k) if k.ed.semi_global => "semi-global edit distance",
            Kernel::EditDistance(_) => "edit distance",
            Kernel::Scalar(_) => "scalar",
            Kernel::Banded(_) => "banded",
            Kernel::Vectorised(_) => "vectorised",
        }
    }
}

/// A band must contain a cell where an alignment of an `n` by `m` pair can
/// start, and one where it can end.
fn check_band(params: &NwParams, n: usize, m: usize) -> Result<(), InvalidAlignmentConfiguration> {
    let Some(band) = params.band else {
        return Ok(());
    };
    let (n, m) = (n as isize, m as isize);
    let overlaps = |lo: isize, hi: isize| band.lower.max(lo) <= band.upper.min(hi);
    let FreeEndGaps {
        first_leading,
        second_leading,
        first_trailing,
        second_trailing,
    } = params.ends;
    let (start, end) = if params.local {
        (overlaps(-n, m), overlaps(-n, m))
    } else {
        (
            overlaps(0, 0)
                || (first_leading && overlaps(0, m))
                || (second_leading && overlaps(-n, 0)),
            overlaps(m - n, m - n)
                || (first_trailing && overlaps(-n, m - n))
                || (second_trailing && overlaps(m - n, m)),
        )
    };
    let missing = match (start, end) {
        (true, true) => return Ok(()),
        (false, _) => "start",
        (true, false) => "end",
    };
    Err(InvalidAlignmentConfiguration::new(format!(
        "the band [{}, {}] contains no {missing} cell for sequences of lengths {n} and {m}",
        band.lower, band.upper
    )))
}

/// A compiled configuration, able to align chunks of pairs of type `P`.
///
/// A plan owns the buffers of its kernel and reuses them for every pair.
/// Clone it to align on several threads.
pub struct AlignmentPlan<P> {
    traits: ResolvedTraits,
    kernel: Kernel,
    scoring: ScoringPolicy,
    builder: ResultBuilder,
    _pair: PhantomData<fn(&P)>,
}

impl<P> Clone for AlignmentPlan<P> {
    fn clone(&self) -> Self {
        Self {
            traits: self.traits,
            kernel: self.kernel.clone(),
            scoring: self.scoring.clone(),
            builder: self.builder,
            _pair: PhantomData,
        }
    }
}

impl<P> std::fmt::Debug for AlignmentPlan<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlignmentPlan")
            .field("kernel", &self.kernel.name())
            .field("scoring", &self.scoring)
            .field("traits", &self.traits)
            .finish()
    }
}

/// Validate `config` and select the kernel that runs it.
///
/// Returns the plan and the configuration with its defaults filled in.
pub fn compile<P: SequencePair>(
    config: AlignmentConfig,
) -> Result<(AlignmentPlan<P>, AlignmentConfig)> {
    let (traits, config) = resolve(config)?;
    let scoring = config
        .get_scoring()
        .cloned()
        .ok_or(ContractViolation::MissingScoringScheme)?;
    let plan = AlignmentPlan::new(traits, &config, scoring);
    log::debug!("Compiled {} alignment plan.", plan.kernel().name());
    Ok((plan, config))
}

impl<P> AlignmentPlan<P> {
    fn new(
        traits: ResolvedTraits,
        config: &AlignmentConfig,
        scoring: Arc<dyn ScoringScheme>,
    ) -> Self {
        let ends = config.get_free_end_gaps();
        let tracing = traits.trace_representation != TraceRepresentation::None;
        let kernel = if traits.is_edit_distance {
            let ed = if ends.first_leading {
                EditDistance::semi_global()
            } else {
                EditDistance::global()
            };
            Kernel::EditDistance(EditDistanceKernel {
                ed: ed.with_trace(tracing),
                min_score: config.get_min_score(),
                debug: traits.is_debug,
            })
        } else {
            let params = NwParams {
                gap: config.get_gap().unwrap_or_default(),
                ends,
                local: traits.is_local,
                band: config.get_band(),
            };
            match traits.score_representation {
                ScoreRepresentation::Lanes(_) => Kernel::Vectorised(VectorisedKernel {
                    nw: Nw::new(params),
                }),
                ScoreRepresentation::Scalar => {
                    let matrix = if traits.is_debug {
                        MatrixPolicy::Debug
                    } else if tracing {
                        MatrixPolicy::Trace
                    } else {
                        // Swapping the sequences may change which of several
                        // optimal end cells is reported.
                        MatrixPolicy::ScoreOnly {
                            transpose: !traits.compute_end_positions
                                && !traits.compute_begin_positions,
                        }
                    };
                    let kernel = ScalarKernel::new(params, matrix);
                    if traits.is_banded {
                        Kernel::Banded(kernel)
                    } else {
                        Kernel::Scalar(kernel)
                    }
                }
            }
        };
        Self {
            traits,
            kernel,
            scoring: ScoringPolicy::new(scoring),
            builder: ResultBuilder {
                output: traits.output(),
            },
            _pair: PhantomData,
        }
    }

    pub fn traits(&self) -> &ResolvedTraits {
        &self.traits
    }

    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    pub fn scoring(&self) -> &ScoringPolicy {
        &self.scoring
    }

    /// The number of pairs the kernel aligns at once.
    pub fn lanes(&self) -> usize {
        match self.kernel {
            Kernel::Vectorised(_) => SIMD_LANES,
            _ => 1,
        }
    }
}

impl<P: SequencePair> AlignmentPlan<P> {
    /// Align every `(id, pair)` of `chunk` and pass the results to `callback`
    /// in order.
    ///
    /// Stops at the first pair that can not be aligned under this configuration.
    pub fn run(
        &mut self,
        chunk: &[(usize, P)],
        mut callback: impl FnMut(AlignmentResult),
    ) -> Result<()> {
        log::trace!("Aligning a chunk of {} pair(s).", chunk.len());
        match &mut self.kernel {
            Kernel::EditDistance(k) => {
                for (id, pair) in chunk {
                    let (a, b) = (pair.first(), pair.second());
                    callback(self.builder.build(*id, a, b, k.align(a, b)));
                }
            }
            Kernel::Scalar(k) | Kernel::Banded(k) => {
                for (id, pair) in chunk {
                    let (a, b) = (pair.first(), pair.second());
                    let raw = with_scoring!(&self.scoring, |s| k.align(a, b, s))?;
                    callback(self.builder.build(*id, a, b, raw));
                }
            }
            Kernel::Vectorised(k) => {
                for batch in chunk.chunks(SIMD_LANES) {
                    let seqs: SmallVec<[(Seq, Seq); SIMD_LANES]> =
                        batch.iter().map(|(_, p)| (p.first(), p.second())).collect();
                    let opts = with_scoring!(&self.scoring, |s| k.nw.align(&seqs, s, &mut NoSink));
                    for (((id, _), &(a, b)), opt) in batch.iter().zip(&seqs).zip(opts) {
                        let raw = RawAlignment {
                            score: Some(opt.score),
                            begin: None,
                            end: opt.end,
                            cigar: None,
                            debug: None,
                        };
                        callback(self.builder.build(*id, a, b, raw));
                    }
                }
            }
        }
        Ok(())
    }

    /// Align a single pair with identifier `id`.
    pub fn align(&mut self, id: usize, pair: P) -> Result<AlignmentResult> {
        let mut result = None;
        self.run(&[(id, pair)], |r| result = Some(r))?;
        Ok(result.expect("One result per pair."))
    }
}
