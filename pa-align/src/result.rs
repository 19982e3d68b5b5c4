use crate::config::OutputFields;
use pa_affine_types::{Alignment, Cigar, Coordinate, Score, Seq};
use pa_base_algos::DebugMatrices;
use serde::{Serialize, Serializer};
use std::fmt;

/// The requested outputs for one pair. Fields that were not requested are `None`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AlignmentResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    sequence1_id: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sequence2_id: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<Score>,
    #[serde(skip_serializing_if = "Option::is_none")]
    begin: Option<Coordinate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end: Option<Coordinate>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_alignment"
    )]
    alignment: Option<Alignment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    debug: Option<DebugMatrices>,
}

/// Alignments are written as two gapped strings and a cigar.
fn serialize_alignment<S: Serializer>(
    alignment: &Option<Alignment>,
    s: S,
) -> Result<S::Ok, S::Error> {
    #[derive(Serialize)]
    struct Rows {
        first: String,
        second: String,
        cigar: String,
    }
    alignment
        .as_ref()
        .map(|a| Rows {
            first: a.first_string(),
            second: a.second_string(),
            cigar: a.cigar.to_string(),
        })
        .serialize(s)
}

impl AlignmentResult {
    pub fn sequence1_id(&self) -> Option<usize> {
        self.sequence1_id
    }
    pub fn sequence2_id(&self) -> Option<usize> {
        self.sequence2_id
    }
    pub fn score(&self) -> Option<Score> {
        self.score
    }
    pub fn begin_position(&self) -> Option<Coordinate> {
        self.begin
    }
    pub fn end_position(&self) -> Option<Coordinate> {
        self.end
    }
    pub fn alignment(&self) -> Option<&Alignment> {
        self.alignment.as_ref()
    }
    pub fn cigar(&self) -> Option<&Cigar> {
        self.alignment.as_ref().map(|a| &a.cigar)
    }
    pub fn debug_matrices(&self) -> Option<&DebugMatrices> {
        self.debug.as_ref()
    }
}

impl fmt::Display for AlignmentResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields = vec![];
        if let Some(id) = self.sequence1_id {
            fields.push(format!("sequence1 id: {id}"));
        }
        if let Some(id) = self.sequence2_id {
            fields.push(format!("sequence2 id: {id}"));
        }
        if let Some(score) = self.score {
            fields.push(format!("score: {score}"));
        }
        if let Some(begin) = self.begin {
            fields.push(format!("begin: {begin}"));
        }
        if let Some(end) = self.end {
            fields.push(format!("end: {end}"));
        }
        if let Some(alignment) = &self.alignment {
            fields.push(format!("alignment:\n{alignment}"));
        }
        write!(f, "{{{}}}", fields.join(", "))
    }
}

/// What a kernel found for one pair.
#[derive(Debug)]
pub(crate) struct RawAlignment {
    /// `None` when the pair scores below `min_score`.
    pub score: Option<Score>,
    pub begin: Option<Coordinate>,
    pub end: Coordinate,
    pub cigar: Option<Cigar>,
    pub debug: Option<DebugMatrices>,
}

/// Picks the requested fields out of a [`RawAlignment`].
#[derive(Clone, Copy, Debug)]
pub(crate) struct ResultBuilder {
    pub output: OutputFields,
}

impl ResultBuilder {
    /// Both sequences of pair `id` get identifier `id`.
    pub fn build(&self, id: usize, a: Seq, b: Seq, raw: RawAlignment) -> AlignmentResult {
        let o = self.output;
        let found = raw.score.is_some();
        let alignment = match (o.alignment && found, raw.cigar, raw.begin) {
            (true, Some(cigar), Some(begin)) => Some(Alignment::from_cigar(
                cigar,
                &a[begin.first..raw.end.first],
                &b[begin.second..raw.end.second],
            )),
            _ => None,
        };
        AlignmentResult {
            sequence1_id: o.sequence1_id.then_some(id),
            sequence2_id: o.sequence2_id.then_some(id),
            score: raw.score.filter(|_| o.score),
            begin: raw.begin.filter(|_| o.begin_position && found),
            end: (o.end_position && found).then_some(raw.end),
            alignment,
            debug: raw.debug,
        }
    }
}
