//! Validation of a configuration, and the traits that decide which kernel runs.

use crate::{
    config::{AlignmentConfig, Method, OutputFields},
    error::{ContractViolation, InvalidAlignmentConfiguration, Result},
};
use pa_affine_types::{Band, FreeEndGaps, GapScheme, ScoringScheme};
use pa_base_algos::SIMD_LANES;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ScoreRepresentation {
    /// One pair at a time.
    Scalar,
    /// This many pairs in lockstep.
    Lanes(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TraceRepresentation {
    /// Only the optimum is kept.
    None,
    /// One trace cell per cell of the matrix.
    Full,
    /// One trace cell per cell of the band.
    Banded,
}

/// Everything derived from a configuration that selects the kernel.
/// Computed once by [`compile`](crate::compile).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ResolvedTraits {
    pub method: Method,
    pub is_banded: bool,
    pub is_local: bool,
    pub is_vectorised: bool,
    pub is_debug: bool,
    /// Unit costs: the bit-parallel edit distance kernel runs.
    pub is_edit_distance: bool,
    pub compute_score: bool,
    pub compute_begin_positions: bool,
    pub compute_end_positions: bool,
    pub compute_sequence_alignment: bool,
    pub compute_sequence1_id: bool,
    pub compute_sequence2_id: bool,
    pub score_representation: ScoreRepresentation,
    pub trace_representation: TraceRepresentation,
}

impl ResolvedTraits {
    pub fn output(&self) -> OutputFields {
        OutputFields {
            score: self.compute_score,
            begin_position: self.compute_begin_positions,
            end_position: self.compute_end_positions,
            alignment: self.compute_sequence_alignment,
            sequence1_id: self.compute_sequence1_id,
            sequence2_id: self.compute_sequence2_id,
        }
    }
}

/// Global alignment with unit costs is edit distance. With free leading and
/// trailing gaps in sequence 1 (and none in sequence 2) it is the
/// semi-global variant that finds sequence 1 inside sequence 2.
fn is_edit_distance(
    method: Method,
    gap: GapScheme,
    scoring: &dyn ScoringScheme,
    ends: FreeEndGaps,
) -> bool {
    method == Method::Global
        && gap == GapScheme::linear(-1)
        && scoring.as_match_mismatch().map_or(false, |s| s.is_unit())
        && !ends.second_leading
        && !ends.second_trailing
        && ends.first_leading == ends.first_trailing
}

/// Bands that exclude every start cell, whatever the sequence lengths.
fn check_band(
    band: Band,
    method: Method,
    ends: FreeEndGaps,
) -> Result<(), InvalidAlignmentConfiguration> {
    if band.is_inverted() {
        return Err(InvalidAlignmentConfiguration::new(format!(
            "the lower diagonal {} of the band exceeds the upper diagonal {}",
            band.lower, band.upper
        )));
    }
    if method == Method::Local {
        return Ok(());
    }
    if band.lower > 0 && !ends.first_leading {
        return Err(InvalidAlignmentConfiguration::new(format!(
            "the band [{}, {}] lies above the main diagonal, so it needs free leading gaps in sequence 1",
            band.lower, band.upper
        )));
    }
    if band.upper < 0 && !ends.second_leading {
        return Err(InvalidAlignmentConfiguration::new(format!(
            "the band [{}, {}] lies below the main diagonal, so it needs free leading gaps in sequence 2",
            band.lower, band.upper
        )));
    }
    Ok(())
}

/// Check `config` and derive its traits.
///
/// Returns the configuration with all defaults filled in.
pub(crate) fn resolve(mut config: AlignmentConfig) -> Result<(ResolvedTraits, AlignmentConfig)> {
    // Contracts.
    let method = match config.methods.as_slice() {
        [] => return Err(ContractViolation::MissingMethod.into()),
        [m] => *m,
        ms => return Err(ContractViolation::ConflictingMethods(ms.len()).into()),
    };
    let Some(scoring) = config.scoring.clone() else {
        return Err(ContractViolation::MissingScoringScheme.into());
    };
    if method == Method::Local && config.free_end_gaps.map_or(false, |e| e.any()) {
        return Err(ContractViolation::FreeEndGapsWithLocal.into());
    }

    // Defaults.
    let ends = config.get_free_end_gaps();
    config.free_end_gaps = Some(ends);
    let gap = *config.gap.get_or_insert_with(GapScheme::default);
    let output = match config.output {
        Some(o) if !o.is_empty() => o,
        _ => OutputFields::ALL,
    };
    config.output = Some(output);

    // Semantics.
    if gap.open > 0 || gap.extend > 0 {
        return Err(InvalidAlignmentConfiguration::new(format!(
            "gap scores must not be positive, got open {} and extend {}",
            gap.open, gap.extend
        ))
        .into());
    }
    if config.threads == Some(0) {
        return Err(InvalidAlignmentConfiguration::new("at least one thread is needed").into());
    }
    if let Some(band) = config.band {
        check_band(band, method, ends)?;
    }
    let is_edit_distance = is_edit_distance(method, gap, &*scoring, ends);
    if is_edit_distance && config.band.is_some() {
        return Err(InvalidAlignmentConfiguration::new(
            "banded alignment is not supported for unit costs (edit distance)",
        )
        .into());
    }
    if config.min_score.is_some() && !is_edit_distance {
        return Err(InvalidAlignmentConfiguration::new(
            "min_score is only supported for edit distance: global alignment, gap open 0 and extend -1, match 0 and mismatch -1",
        )
        .into());
    }

    let is_local = method == Method::Local;
    let is_banded = config.band.is_some();
    // Without free leading gaps a global alignment starts at (0, 0).
    let trivial_begin = !is_local && !ends.first_leading && !ends.second_leading;
    let needs_trace = output.alignment || config.debug || (output.begin_position && !trivial_begin);
    let trace_representation = match (needs_trace, is_banded) {
        (false, _) => TraceRepresentation::None,
        (true, false) => TraceRepresentation::Full,
        (true, true) => TraceRepresentation::Banded,
    };

    let mut score_representation = ScoreRepresentation::Scalar;
    if config.vectorised && is_edit_distance {
        log::warn!(
            "Vectorised alignment is not used for unit costs; using the bit-parallel edit distance."
        );
    } else if config.vectorised {
        if is_banded || output.begin_position || output.alignment || config.debug {
            log::warn!(
                "Vectorised alignment does not support bands, begin positions, alignments or debug matrices; using the scalar engine."
            );
        } else {
            score_representation = ScoreRepresentation::Lanes(SIMD_LANES);
        }
    }

    let traits = ResolvedTraits {
        method,
        is_banded,
        is_local,
        is_vectorised: config.vectorised,
        is_debug: config.debug,
        is_edit_distance,
        compute_score: output.score,
        compute_begin_positions: output.begin_position,
        compute_end_positions: output.end_position,
        compute_sequence_alignment: output.alignment,
        compute_sequence1_id: output.sequence1_id,
        compute_sequence2_id: output.sequence2_id,
        score_representation,
        trace_representation,
    };
    log::debug!("Resolved alignment traits: {traits:?}");
    Ok((traits, config))
}
