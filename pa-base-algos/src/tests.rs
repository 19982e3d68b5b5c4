use crate::*;
use pa_affine_types::*;
use pa_test::reference::Reference;

fn pair<'a>(a: &'a [u8], b: &'a [u8]) -> [(Seq<'a>, Seq<'a>); 1] {
    [(a, b)]
}

fn reference(p: &NwParams) -> Reference {
    Reference {
        gap: p.gap,
        ends: p.ends,
        local: p.local,
        band: p.band,
    }
}

fn all_ends() -> impl Iterator<Item = FreeEndGaps> {
    (0..16).map(|x| FreeEndGaps {
        first_leading: x & 1 != 0,
        second_leading: x & 2 != 0,
        first_trailing: x & 4 != 0,
        second_trailing: x & 8 != 0,
    })
}

fn params() -> Vec<NwParams> {
    let gaps = [
        GapScheme::linear(-1),
        GapScheme::affine(-10, -1),
        GapScheme::affine(-3, -2),
    ];
    let mut ps = vec![];
    for gap in gaps {
        for ends in all_ends() {
            ps.push(NwParams {
                ends,
                ..NwParams::global(gap)
            });
        }
        ps.push(NwParams::local(gap));
    }
    ps
}

/// Score, end position and traceback of a single pair against the reference.
fn check_pair(p: NwParams, a: Seq, b: Seq, scoring: &impl ScoringScheme) {
    let mut nw = Nw::<1>::new(p);
    let mut trace = TraceMatrix::default();
    let [opt] = nw.align(&pair(a, b), scoring, &mut trace);
    let expected = reference(&p).score(a, b, scoring);
    let ctx = format!(
        "{p:?}\na {}\nb {}",
        pa_test::seq_to_string(a),
        pa_test::seq_to_string(b)
    );
    assert_eq!(opt.is_reachable().then_some(opt.score), expected, "{ctx}");
    if !opt.is_reachable() {
        return;
    }

    // The end cell must itself have the optimal score.
    let matrix = reference(&p).matrix(a, b, scoring);
    assert_eq!(matrix[opt.end.first][opt.end.second], Some(opt.score), "{ctx}");

    let (begin, cigar) = trace.traceback(a, b, opt.end);
    let (a_part, b_part) = (
        &a[begin.first..opt.end.first],
        &b[begin.second..opt.end.second],
    );
    assert_eq!(cigar.score(scoring, p.gap, a_part, b_part), opt.score, "{ctx}");
    let aln = Alignment::from_cigar(cigar, a_part, b_part);
    assert_eq!(aln.ungapped_first(), a_part, "{ctx}");
    assert_eq!(aln.ungapped_second(), b_part, "{ctx}");

    if !p.local && !p.ends.any() {
        assert_eq!(begin, Coordinate::new(0, 0));
        assert_eq!(opt.end, Coordinate::new(a.len(), b.len()));
    }
    if !p.local && !p.ends.first_leading && !p.ends.second_leading {
        assert_eq!(begin, Coordinate::new(0, 0), "{ctx}");
    }
    if p.local {
        assert!(opt.score >= 0);
    }
}

#[test]
fn fixed_sequences() {
    let scoring = MatchMismatch::new(4, -5);
    for p in params() {
        for (a, b) in pa_test::test_sequences() {
            check_pair(p, &a, &b, &scoring);
        }
    }
}

#[test]
fn random_sequences() {
    let scoring = MatchMismatch::new(2, -3);
    for p in params() {
        for ((a, b), _) in pa_test::gen_pairs(65) {
            check_pair(p, &a, &b, &scoring);
        }
    }
}

#[test]
fn blosum62() {
    let scoring = SubstitutionMatrix::blosum62();
    for p in [
        NwParams::global(GapScheme::affine(-10, -1)),
        NwParams::local(GapScheme::affine(-11, -1)),
    ] {
        for seed in 0..10 {
            let (a, b) = pa_test::gen_protein_seqs(40 + seed as usize, 0.3, seed);
            check_pair(p, &a, &b, &scoring);
        }
    }
}

#[test]
fn unit_scores_equal_edit_distance() {
    let p = NwParams::global(GapScheme::linear(-1));
    for ((a, b), params) in pa_test::gen_pairs(300) {
        let [opt] = Nw::<1>::new(p).align(&pair(&a, &b), &MatchMismatch::unit(), &mut NoSink);
        assert_eq!(
            opt.score,
            -(pa_test::edit_distance(&a, &b) as Score),
            "{params:?}"
        );
    }
}

#[test]
fn bands() {
    let scoring = MatchMismatch::new(4, -5);
    let bands = [(-3, 3), (0, 0), (-1, 5), (-5, 1), (-20, -2), (2, 20), (-2, 40)];
    for (lower, upper) in bands {
        for ends in all_ends() {
            for gap in [GapScheme::linear(-1), GapScheme::affine(-10, -1)] {
                let p = NwParams {
                    gap,
                    ends,
                    local: false,
                    band: Some(Band::new(lower, upper)),
                };
                for (a, b) in pa_test::test_sequences() {
                    check_pair(p, &a, &b, &scoring);
                }
                for seed in 0..5 {
                    let (a, b) = pa_test::gen_seqs(30, 0.2, seed);
                    check_pair(p, &a, &b, &scoring);
                }
            }
        }
        let p = NwParams {
            band: Some(Band::new(lower, upper)),
            ..NwParams::local(GapScheme::affine(-3, -1))
        };
        for seed in 0..5 {
            let (a, b) = pa_test::gen_seqs(30, 0.2, seed);
            check_pair(p, &a, &b, &scoring);
        }
    }
}

#[test]
fn wide_band_equals_unbanded() {
    let scoring = MatchMismatch::new(1, -1);
    let (a, b) = pa_test::gen_seqs(100, 0.2, 42);
    let p = NwParams::global(GapScheme::affine(-5, -1));
    let [full] = Nw::<1>::new(p).align(&pair(&a, &b), &scoring, &mut NoSink);
    let banded = NwParams {
        band: Some(Band::new(-1000, 1000)),
        ..p
    };
    let [band] = Nw::<1>::new(banded).align(&pair(&a, &b), &scoring, &mut NoSink);
    assert_eq!(full, band);
}

#[test]
fn lanes_equal_single_pairs() {
    let scoring = MatchMismatch::new(4, -5);
    let pairs: Vec<_> = pa_test::gen_pairs(128).map(|(pair, _)| pair).collect();
    for p in params() {
        let mut single = Nw::<1>::new(p);
        let mut batch = Nw::<SIMD_LANES>::new(p);
        for chunk in pairs.chunks(SIMD_LANES) {
            let seqs: Vec<(Seq, Seq)> = chunk.iter().map(|(a, b)| (&a[..], &b[..])).collect();
            let lanes = batch.align(&seqs, &scoring, &mut NoSink);
            for (k, pair) in seqs.iter().enumerate() {
                let [expected] = single.align(&[*pair], &scoring, &mut NoSink);
                assert_eq!(lanes[k], expected, "{p:?} lane {k}");
            }
        }
    }
}

/// Protein tables reject bytes outside the amino acid alphabet, so short lanes
/// must not be padded with arbitrary bytes.
#[test]
fn protein_lanes_of_unequal_length() {
    let scoring = SubstitutionMatrix::blosum62();
    let pairs: [(Seq, Seq); 4] = [
        (b"HEAGAWGHEE", b"PAWHEAE"),
        (b"MKV", b"MKVL"),
        (b"", b"WW"),
        (b"ACDEFGHIKLMNPQRSTVWY", b""),
    ];
    for p in [
        NwParams::global(GapScheme::affine(-11, -1)),
        NwParams::local(GapScheme::affine(-11, -1)),
    ] {
        let lanes = Nw::<SIMD_LANES>::new(p).align(&pairs, &scoring, &mut NoSink);
        for (k, pair) in pairs.iter().enumerate() {
            let [expected] = Nw::<1>::new(p).align(&[*pair], &scoring, &mut NoSink);
            assert_eq!(lanes[k], expected, "{p:?} lane {k}");
        }
    }
}

#[test]
fn transposed_scores_agree() {
    let scoring = SubstitutionMatrix::blosum62();
    for p in params() {
        for seed in 0..4 {
            let (a, b) = pa_test::gen_protein_seqs(30, 0.3, seed);
            let b = &b[..b.len() / 2];
            let [x] = Nw::<1>::new(p).align(&pair(&a, b), &scoring, &mut NoSink);
            let [y] = Nw::<1>::new(p.transpose()).align(
                &pair(b, &a),
                &Transposed(scoring),
                &mut NoSink,
            );
            assert_eq!(x.score, y.score, "{p:?}");
        }
    }
}

#[test]
fn debug_matrices() {
    let p = NwParams::global(GapScheme::linear(-1));
    let mut sink = (TraceMatrix::default(), ScoreMatrix::default());
    let [opt] = Nw::<1>::new(p).align(&pair(b"AC", b"AGC"), &MatchMismatch::unit(), &mut sink);
    assert_eq!(opt.score, -1);
    let scores = &sink.1.scores;
    assert_eq!(scores[0], vec![Some(0), Some(-1), Some(-2), Some(-3)]);
    assert_eq!(scores[1], vec![Some(-1), Some(0), Some(-1), Some(-2)]);
    assert_eq!(scores[2], vec![Some(-2), Some(-1), Some(-1), Some(-1)]);
    let dirs = sink.0.directions();
    assert_eq!(dirs[0], "NLLL");
    assert_eq!(dirs[1], "UDLL");
    assert_eq!(dirs[2], "UUDD");
}

#[test]
fn banded_debug_matrix_marks_outside() {
    let p = NwParams {
        band: Some(Band::new(0, 1)),
        ..NwParams::global(GapScheme::linear(-1))
    };
    let mut sink = ScoreMatrix::default();
    Nw::<1>::new(p).align(&pair(b"AAA", b"AAA"), &MatchMismatch::unit(), &mut sink);
    assert_eq!(sink.scores[0], vec![Some(0), Some(-1), None, None]);
    assert_eq!(sink.scores[3], vec![None, None, None, Some(0)]);
}

#[test]
fn local_finds_common_substring() {
    let p = NwParams::local(GapScheme::affine(-10, -1));
    let mut trace = TraceMatrix::default();
    let a = b"TTTTTACGTAC";
    let b = b"GGACGTACGG";
    let [opt] = Nw::<1>::new(p).align(&pair(a, b), &MatchMismatch::new(4, -5), &mut trace);
    assert_eq!(opt.score, 6 * 4);
    assert_eq!(opt.end, Coordinate::new(11, 8));
    let (begin, cigar) = trace.traceback(a, b, opt.end);
    assert_eq!(begin, Coordinate::new(5, 2));
    assert_eq!(cigar.to_string(), "6=");
}

#[test]
fn local_of_unrelated_is_empty() {
    let p = NwParams::local(GapScheme::affine(-10, -1));
    let scoring = MatchMismatch::new(4, -5);
    let [opt] = Nw::<1>::new(p).align(&pair(b"AAAA", b"CCCC"), &scoring, &mut NoSink);
    assert_eq!(opt.score, 0);
    assert_eq!(opt.end, Coordinate::new(0, 0));
}
