use crate::{config::AlignmentConfig, OutputFields};
use clap::{Parser, ValueEnum};
use pa_affine_types::{Band, FreeEndGaps, GapScheme, MatchMismatch, Score, SubstitutionMatrix};
use serde::{Deserialize, Serialize};

#[derive(ValueEnum, Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MethodArg {
    #[default]
    Global,
    Local,
}

#[derive(ValueEnum, Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ScoringArg {
    /// `--match-score` for equal symbols, `--mismatch-score` otherwise.
    #[default]
    MatchMismatch,
    Blosum62,
    Pam40,
    Pam120,
    Pam250,
}

#[derive(ValueEnum, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OutputArg {
    Score,
    Begin,
    End,
    Alignment,
    Id1,
    Id2,
    All,
}

impl OutputArg {
    fn fields(self) -> OutputFields {
        match self {
            OutputArg::Score => OutputFields::SCORE,
            OutputArg::Begin => OutputFields::BEGIN_POSITION,
            OutputArg::End => OutputFields::END_POSITION,
            OutputArg::Alignment => OutputFields::ALIGNMENT,
            OutputArg::Id1 => OutputFields::SEQUENCE1_ID,
            OutputArg::Id2 => OutputFields::SEQUENCE2_ID,
            OutputArg::All => OutputFields::ALL,
        }
    }
}

#[derive(Parser, Debug, Clone, Serialize, Deserialize)]
#[clap(next_help_heading = "Alignment")]
pub struct AlignArgs {
    #[clap(long, value_enum, default_value_t)]
    pub method: MethodArg,

    /// Score of opening a gap, added once per gap.
    #[clap(long, default_value_t = 0, allow_negative_numbers = true)]
    pub gap_open: Score,

    /// Score of every gap symbol.
    #[clap(long, default_value_t = -1, allow_negative_numbers = true)]
    pub gap_extend: Score,

    #[clap(long, value_enum, default_value_t)]
    pub scoring: ScoringArg,

    #[clap(long, default_value_t = 0, allow_negative_numbers = true)]
    pub match_score: Score,

    #[clap(long, default_value_t = -1, allow_negative_numbers = true)]
    pub mismatch_score: Score,

    /// Leading gaps in sequence 1 are free.
    #[clap(long, hide_short_help = true)]
    pub free_first_leading: bool,
    /// Leading gaps in sequence 2 are free.
    #[clap(long, hide_short_help = true)]
    pub free_second_leading: bool,
    /// Trailing gaps in sequence 1 are free.
    #[clap(long, hide_short_help = true)]
    pub free_first_trailing: bool,
    /// Trailing gaps in sequence 2 are free.
    #[clap(long, hide_short_help = true)]
    pub free_second_trailing: bool,

    /// Lowest diagonal `j - i` of the band.
    #[clap(long, requires = "band_upper", allow_negative_numbers = true)]
    pub band_lower: Option<isize>,
    /// Highest diagonal `j - i` of the band.
    #[clap(long, requires = "band_lower", allow_negative_numbers = true)]
    pub band_upper: Option<isize>,

    /// Align batches of pairs in SIMD lanes.
    #[clap(long)]
    pub vectorised: bool,

    /// Also output the score and trace matrices.
    #[clap(long, hide_short_help = true)]
    pub debug: bool,

    /// Skip alignments scoring below this. Edit distance only.
    #[clap(long, allow_negative_numbers = true)]
    pub min_score: Option<Score>,

    /// Number of threads. Sequential when not given.
    #[clap(short = 'j', long)]
    pub threads: Option<usize>,

    /// Comma separated fields to output. All when not given.
    #[clap(long, value_enum, value_delimiter = ',')]
    pub fields: Vec<OutputArg>,
}

impl AlignArgs {
    pub fn to_config(&self) -> AlignmentConfig {
        let mut config = match self.method {
            MethodArg::Global => AlignmentConfig::new().method_global(),
            MethodArg::Local => AlignmentConfig::new().method_local(),
        }
        .gap(GapScheme::affine(self.gap_open, self.gap_extend));

        config = match self.scoring {
            ScoringArg::MatchMismatch => {
                config.scoring(MatchMismatch::new(self.match_score, self.mismatch_score))
            }
            ScoringArg::Blosum62 => config.scoring(SubstitutionMatrix::blosum62()),
            ScoringArg::Pam40 => config.scoring(SubstitutionMatrix::pam40()),
            ScoringArg::Pam120 => config.scoring(SubstitutionMatrix::pam120()),
            ScoringArg::Pam250 => config.scoring(SubstitutionMatrix::pam250()),
        };

        let ends = FreeEndGaps {
            first_leading: self.free_first_leading,
            second_leading: self.free_second_leading,
            first_trailing: self.free_first_trailing,
            second_trailing: self.free_second_trailing,
        };
        if ends.any() {
            config = config.free_end_gaps(ends);
        }
        if let (Some(lower), Some(upper)) = (self.band_lower, self.band_upper) {
            config = config.band(Band::new(lower, upper));
        }
        if self.vectorised {
            config = config.vectorised();
        }
        if self.debug {
            config = config.debug();
        }
        if let Some(min_score) = self.min_score {
            config = config.min_score(min_score);
        }
        if let Some(threads) = self.threads {
            config = config.parallel(threads);
        }
        for o in &self.fields {
            config = config.output(o.fields());
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[derive(Parser)]
    struct Cli {
        #[clap(flatten)]
        align: AlignArgs,
    }

    #[test]
    fn cli_test() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_arguments() {
        let cli = Cli::parse_from([
            "align",
            "--gap-open",
            "-10",
            "--match-score",
            "4",
            "--mismatch-score",
            "-5",
            "--band-lower",
            "-3",
            "--band-upper",
            "3",
            "--fields",
            "score,end",
        ]);
        let config = cli.align.to_config();
        assert_eq!(config.get_gap(), Some(GapScheme::affine(-10, -1)));
        assert_eq!(config.get_band(), Some(Band::new(-3, 3)));
        assert_eq!(
            config.get_output(),
            Some(OutputFields::SCORE | OutputFields::END_POSITION)
        );
        assert_eq!(
            config.get_scoring().unwrap().as_match_mismatch(),
            Some(MatchMismatch::new(4, -5))
        );
    }

    #[test]
    fn band_needs_both_bounds() {
        assert!(Cli::try_parse_from(["align", "--band-lower", "2"]).is_err());
    }
}
