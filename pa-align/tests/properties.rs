use pa_affine_types::{
    Band, FreeEndGaps, GapScheme, MatchMismatch, Score, Sequence, SubstitutionMatrix,
};
use pa_align::*;
use pa_test::reference::Reference;

fn all_ends() -> impl Iterator<Item = FreeEndGaps> {
    (0..16).map(|x| FreeEndGaps {
        first_leading: x & 1 != 0,
        second_leading: x & 2 != 0,
        first_trailing: x & 4 != 0,
        second_trailing: x & 8 != 0,
    })
}

fn pairs() -> Vec<(Sequence, Sequence)> {
    let mut pairs = pa_test::test_sequences();
    pairs.extend(pa_test::gen_pairs(100).map(|(pair, _)| pair));
    pairs
}

fn run(pairs: &[(Sequence, Sequence)], config: AlignmentConfig) -> Vec<AlignmentResult> {
    align_pairwise(pairs, config)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap()
}

#[test]
fn edit_distance_equals_general_path() {
    let unit = SubstitutionMatrix::from_fn("unit", |a, b| if a == b { 0 } else { -1 });
    let pairs = pairs();
    for ends in [FreeEndGaps::none(), FreeEndGaps::first_in_second()] {
        let fast = AlignmentConfig::new()
            .method_global()
            .free_end_gaps(ends)
            .gap(GapScheme::linear(-1))
            .scoring(MatchMismatch::unit());
        let general = fast.clone().scoring(unit);
        assert!(compile::<&(Sequence, Sequence)>(fast.clone())
            .unwrap()
            .0
            .traits()
            .is_edit_distance);
        assert_eq!(run(&pairs, fast), run(&pairs, general), "{ends:?}");
    }
}

#[test]
fn edit_distance_matches_levenshtein() {
    let config = AlignmentConfig::new()
        .method_global()
        .scoring(MatchMismatch::unit())
        .output(OutputFields::SCORE);
    let pairs = pairs();
    for (r, (a, b)) in run(&pairs, config).iter().zip(&pairs) {
        assert_eq!(r.score(), Some(-(pa_test::edit_distance(a, b) as Score)));
    }
}

#[test]
fn local_scores_are_not_negative() {
    let pairs = pairs();
    for gap in [GapScheme::linear(-1), GapScheme::affine(-5, -2)] {
        let config = AlignmentConfig::new()
            .method_local()
            .gap(gap)
            .scoring(MatchMismatch::new(1, -4));
        for r in run(&pairs, config) {
            assert!(r.score().unwrap() >= 0);
        }
    }
}

#[test]
fn round_trip() {
    let pairs = pairs();
    let mut configs = vec![AlignmentConfig::new()
        .method_local()
        .gap(GapScheme::affine(-10, -1))
        .scoring(MatchMismatch::new(4, -5))];
    for ends in all_ends() {
        configs.push(
            AlignmentConfig::new()
                .method_global()
                .free_end_gaps(ends)
                .gap(GapScheme::affine(-10, -1))
                .scoring(MatchMismatch::new(4, -5)),
        );
    }
    for config in configs {
        let full =
            config.get_method() == Some(Method::Global) && !config.get_free_end_gaps().any();
        for (r, (a, b)) in run(&pairs, config).iter().zip(&pairs) {
            let (begin, end) = (r.begin_position().unwrap(), r.end_position().unwrap());
            let alignment = r.alignment().unwrap();
            assert_eq!(alignment.first.len(), alignment.second.len());
            assert_eq!(alignment.ungapped_first(), &a[begin.first..end.first]);
            assert_eq!(alignment.ungapped_second(), &b[begin.second..end.second]);
            if full {
                assert_eq!(&alignment.ungapped_first(), a);
                assert_eq!(&alignment.ungapped_second(), b);
            }
        }
    }
}

#[test]
fn scores_match_reference() {
    let scoring = MatchMismatch::new(4, -5);
    let gap = GapScheme::affine(-10, -1);
    let pairs = pairs();
    for ends in all_ends() {
        let config = AlignmentConfig::new()
            .method_global()
            .free_end_gaps(ends)
            .gap(gap)
            .scoring(scoring)
            .output(OutputFields::SCORE);
        let reference = Reference {
            ends,
            ..Reference::global(gap)
        };
        for (r, (a, b)) in run(&pairs, config).iter().zip(&pairs) {
            assert_eq!(r.score(), reference.score(a, b, &scoring), "{ends:?}");
        }
    }
}

#[test]
fn vectorised_equals_scalar() {
    let pairs = pairs();
    let scoring = MatchMismatch::new(4, -5);
    let mut configs = vec![];
    for gap in [GapScheme::linear(-2), GapScheme::affine(-10, -1)] {
        for ends in all_ends() {
            configs.push(
                AlignmentConfig::new()
                    .method_global()
                    .free_end_gaps(ends)
                    .gap(gap)
                    .scoring(scoring),
            );
        }
        configs.push(AlignmentConfig::new().method_local().gap(gap).scoring(scoring));
    }
    configs.push(
        AlignmentConfig::new()
            .method_global()
            .gap(GapScheme::affine(-11, -1))
            .scoring(SubstitutionMatrix::blosum62()),
    );
    for config in configs {
        let config = config.output(
            OutputFields::SCORE | OutputFields::END_POSITION | OutputFields::SEQUENCE1_ID,
        );
        let vectorised = config.clone().vectorised();
        assert_eq!(
            compile::<&(Sequence, Sequence)>(vectorised.clone())
                .unwrap()
                .0
                .kernel()
                .name(),
            "vectorised"
        );
        assert_eq!(run(&pairs, config), run(&pairs, vectorised));
    }
}

#[test]
fn vectorised_protein_pairs_of_unequal_length() {
    let pairs: Vec<(Sequence, Sequence)> = [
        ("HEAGAWGHEE", "PAWHEAE"),
        ("MKV", "MKVL"),
        ("W", ""),
        ("", "PAW"),
    ]
    .iter()
    .map(|(a, b)| (a.as_bytes().to_vec(), b.as_bytes().to_vec()))
    .collect();
    let config = AlignmentConfig::new()
        .method_global()
        .gap(GapScheme::affine(-11, -1))
        .scoring(SubstitutionMatrix::blosum62())
        .output(OutputFields::SCORE);
    let scalar = run(&pairs, config.clone());
    assert_eq!(scalar[0].score(), Some(1));
    assert_eq!(scalar[1].score(), Some(2));
    assert_eq!(run(&pairs, config.vectorised()), scalar);
}

#[test]
fn vectorised_in_parallel() {
    let pairs = pairs();
    let config = AlignmentConfig::new()
        .method_global()
        .gap(GapScheme::affine(-10, -1))
        .scoring(MatchMismatch::new(4, -5))
        .output(OutputFields::SCORE | OutputFields::SEQUENCE1_ID);
    let expected = run(&pairs, config.clone());
    assert_eq!(run(&pairs, config.vectorised().parallel(3)), expected);
}

#[test]
fn vectorised_falls_back_to_scalar() {
    let config = AlignmentConfig::new()
        .method_global()
        .scoring(MatchMismatch::new(4, -5))
        .vectorised();
    let (plan, _) = compile::<&(Sequence, Sequence)>(config.clone()).unwrap();
    assert_eq!(plan.kernel().name(), "scalar");
    let pairs = pairs();
    let alignments = run(&pairs, config);
    assert!(alignments.iter().all(|r| r.alignment().is_some()));
}

#[test]
fn score_only_is_transposed() {
    let pairs: Vec<_> = (0..10u64)
        .map(|seed| {
            let (a, b) = pa_test::gen_seqs(60, 0.3, seed);
            (a[..20].to_vec(), b)
        })
        .collect();
    let scoring = SubstitutionMatrix::from_fn("asymmetric", |a, b| {
        if a == b {
            3
        } else if a < b {
            -1
        } else {
            -4
        }
    });
    for ends in all_ends() {
        let base = AlignmentConfig::new()
            .method_global()
            .free_end_gaps(ends)
            .gap(GapScheme::affine(-3, -1))
            .scoring(scoring);
        let score_only = base.clone().output(OutputFields::SCORE);
        let (plan, _) = compile::<&(Sequence, Sequence)>(score_only.clone()).unwrap();
        assert!(matches!(plan.kernel(), Kernel::Scalar(_)));
        let with_end = base.output(OutputFields::SCORE | OutputFields::END_POSITION);
        let x: Vec<_> = run(&pairs, score_only).iter().map(|r| r.score()).collect();
        let y: Vec<_> = run(&pairs, with_end).iter().map(|r| r.score()).collect();
        assert_eq!(x, y, "{ends:?}");
    }
}

#[test]
fn banded_scores_match_reference() {
    let scoring = MatchMismatch::new(4, -5);
    let gap = GapScheme::affine(-10, -1);
    let pairs: Vec<_> = (0..20u64)
        .map(|seed| pa_test::gen_seqs(30 + seed as usize % 5, 0.2, seed))
        .collect();
    for band in [Band::new(-3, 3), Band::new(-10, 10), Band::new(0, 5)] {
        for ends in all_ends() {
            let config = AlignmentConfig::new()
                .method_global()
                .free_end_gaps(ends)
                .gap(gap)
                .scoring(scoring)
                .band(band);
            let Ok((mut plan, _)) = compile::<&(Sequence, Sequence)>(config) else {
                continue;
            };
            let reference = Reference {
                ends,
                band: Some(band),
                ..Reference::global(gap)
            };
            for (k, pair) in pairs.iter().enumerate() {
                let expected = reference.score(&pair.0, &pair.1, &scoring);
                match plan.align(k, pair) {
                    Ok(r) => {
                        assert_eq!(r.score(), expected, "{band:?} {ends:?}");
                        let alignment = r.alignment().unwrap();
                        let begin = r.begin_position().unwrap();
                        let end = r.end_position().unwrap();
                        assert_eq!(alignment.ungapped_first(), &pair.0[begin.first..end.first]);
                        assert!(band.contains(begin) && band.contains(end));
                    }
                    Err(e) => {
                        assert!(e.is_invalid_configuration());
                        assert_eq!(expected, None, "{band:?} {ends:?}");
                    }
                }
            }
        }
    }
}

#[test]
fn protein_local_alignment() {
    let pairs: Vec<_> = (0..10u64)
        .map(|seed| pa_test::gen_protein_seqs(50, 0.3, seed))
        .collect();
    let scoring = SubstitutionMatrix::blosum62();
    let gap = GapScheme::affine(-11, -1);
    let config = AlignmentConfig::new().method_local().gap(gap).scoring(scoring);
    let reference = Reference::local(gap);
    for (r, (a, b)) in run(&pairs, config).iter().zip(&pairs) {
        assert_eq!(r.score(), reference.score(a, b, &scoring));
        let alignment = r.alignment().unwrap();
        let (a_part, b_part) = (alignment.ungapped_first(), alignment.ungapped_second());
        assert_eq!(
            alignment.cigar.score(&scoring, gap, &a_part, &b_part),
            r.score().unwrap()
        );
    }
}
