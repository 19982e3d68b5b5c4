use crate::{GapScheme, Score, ScoringScheme, Seq};
use serde::{Deserialize, Serialize};
use std::{fmt, slice};

/// An edit operation. `Ins` consumes a symbol of sequence 2 only (a gap in
/// sequence 1), `Del` consumes a symbol of sequence 1 only (a gap in sequence 2).
#[derive(PartialEq, Eq, Clone, Copy, Debug, Serialize, Deserialize)]
pub enum CigarOp {
    Match,
    Sub,
    Ins,
    Del,
}

impl CigarOp {
    pub fn to_char(self) -> char {
        match self {
            CigarOp::Match => '=',
            CigarOp::Sub => 'X',
            CigarOp::Ins => 'I',
            CigarOp::Del => 'D',
        }
    }

    /// How far this operation moves in `(sequence 1, sequence 2)`.
    pub fn delta(self) -> (usize, usize) {
        match self {
            CigarOp::Match | CigarOp::Sub => (1, 1),
            CigarOp::Ins => (0, 1),
            CigarOp::Del => (1, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct CigarElem {
    pub op: CigarOp,
    pub cnt: usize,
}

/// Run-length encoded edit script.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cigar {
    ops: Vec<CigarElem>,
}

impl fmt::Display for Cigar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for elem in &self.ops {
            write!(f, "{}{}", elem.cnt, elem.op.to_char())?;
        }
        Ok(())
    }
}

impl Cigar {
    pub fn ops(&self) -> &[CigarElem] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn push_op(&mut self, op: CigarOp) {
        self.push_elem(CigarElem { op, cnt: 1 });
    }

    pub fn push_elem(&mut self, elem: CigarElem) {
        if elem.cnt == 0 {
            return;
        }
        if let Some(s) = self.ops.last_mut() {
            if s.op == elem.op {
                s.cnt += elem.cnt;
                return;
            }
        }
        self.ops.push(elem);
    }

    /// Push a match or substitution depending on the two symbols.
    pub fn push_diagonal(&mut self, a: u8, b: u8) {
        self.push_op(if a == b { CigarOp::Match } else { CigarOp::Sub });
    }

    /// Reverse the cigar string.
    /// Tracebacks build the cigar from the end, and call this once at the end.
    pub fn reverse(&mut self) {
        self.ops.reverse()
    }

    /// Append another cigar to this one.
    pub fn append(&mut self, other: &mut Self) {
        let Some(first) = other.ops.first_mut() else {
            return;
        };
        if let Some(s) = self.ops.last() {
            if s.op == first.op {
                first.cnt += s.cnt;
                self.ops.pop();
            }
        }
        self.ops.append(&mut other.ops);
    }

    /// Number of symbols consumed from `(sequence 1, sequence 2)`.
    pub fn lengths(&self) -> (usize, usize) {
        self.ops.iter().fold((0, 0), |(i, j), elem| {
            let (di, dj) = elem.op.delta();
            (i + di * elem.cnt, j + dj * elem.cnt)
        })
    }

    /// Recompute the score of the alignment of `a` and `b` described by this cigar.
    ///
    /// Panics when the cigar does not consume exactly `a` and `b`, or when a
    /// `Match`/`Sub` operation disagrees with the symbols it covers.
    pub fn score(&self, scoring: &impl ScoringScheme, gap: GapScheme, a: Seq, b: Seq) -> Score {
        let (mut i, mut j) = (0, 0);
        let mut score = 0;
        for &CigarElem { op, cnt } in self {
            match op {
                CigarOp::Match | CigarOp::Sub => {
                    for _ in 0..cnt {
                        assert_eq!(op == CigarOp::Match, a[i] == b[j]);
                        score += scoring.score(a[i], b[j]);
                        i += 1;
                        j += 1;
                    }
                }
                CigarOp::Ins => {
                    score += gap.score(cnt);
                    j += cnt;
                }
                CigarOp::Del => {
                    score += gap.score(cnt);
                    i += cnt;
                }
            }
        }
        assert_eq!((i, j), (a.len(), b.len()), "Cigar does not cover both sequences.");
        score
    }
}

impl<'a> IntoIterator for &'a Cigar {
    type Item = &'a CigarElem;

    type IntoIter = slice::Iter<'a, CigarElem>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}

/// A symbol of a gapped sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gapped {
    Symbol(u8),
    Gap,
}

impl Gapped {
    pub fn to_char(self) -> char {
        match self {
            Gapped::Symbol(c) => c as char,
            Gapped::Gap => '-',
        }
    }
}

/// The pair of gapped sequences of a traced alignment.
///
/// Both rows have equal length. Removing the gaps gives back the aligned
/// parts of sequence 1 and sequence 2.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alignment {
    pub first: Vec<Gapped>,
    pub second: Vec<Gapped>,
    pub cigar: Cigar,
}

impl Alignment {
    /// Expand `cigar` over the aligned parts `a` and `b` of the two sequences.
    pub fn from_cigar(cigar: Cigar, a: Seq, b: Seq) -> Self {
        let (mut i, mut j) = (0, 0);
        let mut first = vec![];
        let mut second = vec![];
        for &CigarElem { op, cnt } in &cigar {
            for _ in 0..cnt {
                match op {
                    CigarOp::Match | CigarOp::Sub => {
                        first.push(Gapped::Symbol(a[i]));
                        second.push(Gapped::Symbol(b[j]));
                        i += 1;
                        j += 1;
                    }
                    CigarOp::Ins => {
                        first.push(Gapped::Gap);
                        second.push(Gapped::Symbol(b[j]));
                        j += 1;
                    }
                    CigarOp::Del => {
                        first.push(Gapped::Symbol(a[i]));
                        second.push(Gapped::Gap);
                        i += 1;
                    }
                }
            }
        }
        debug_assert_eq!((i, j), (a.len(), b.len()));
        Self {
            first,
            second,
            cigar,
        }
    }

    fn ungapped(row: &[Gapped]) -> Vec<u8> {
        row.iter()
            .filter_map(|g| match g {
                Gapped::Symbol(c) => Some(*c),
                Gapped::Gap => None,
            })
            .collect()
    }

    pub fn ungapped_first(&self) -> Vec<u8> {
        Self::ungapped(&self.first)
    }

    pub fn ungapped_second(&self) -> Vec<u8> {
        Self::ungapped(&self.second)
    }

    pub fn first_string(&self) -> String {
        self.first.iter().map(|g| g.to_char()).collect()
    }

    pub fn second_string(&self) -> String {
        self.second.iter().map(|g| g.to_char()).collect()
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.first_string())?;
        write!(f, "{}", self.second_string())
    }
}
