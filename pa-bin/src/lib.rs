use bio::io::fasta;
use clap::{value_parser, Parser};
use itertools::Itertools;
use pa_affine_types::Sequence;
use pa_align::cli::AlignArgs;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InputError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{path}:{line}: expected a line starting with '{expected}'")]
    Prefix {
        path: PathBuf,
        line: usize,
        expected: char,
    },
    #[error("{path} has an odd number of sequences")]
    Unpaired { path: PathBuf },
    #[error("unknown file extension of {0}, must be one of seq, txt, fa, fna, fasta")]
    Extension(PathBuf),
}

/// Align pairs of sequences with affine gap costs.
#[derive(Parser, Serialize, Deserialize)]
#[clap(author, about, disable_version_flag(true))]
pub struct Cli {
    /// A .seq, .txt, or Fasta file (or a directory of them) with sequence pairs to align.
    #[clap(short, long, value_parser = value_parser!(PathBuf), display_order = 1)]
    pub input: Option<PathBuf>,

    /// Two sequences to align, instead of `--input`.
    #[clap(num_args = 2, value_names = ["SEQ1", "SEQ2"], conflicts_with = "input")]
    pub sequences: Vec<String>,

    /// Write the results to this file instead of stdout.
    #[clap(short, long, value_parser = value_parser!(PathBuf), display_order = 1)]
    pub output: Option<PathBuf>,

    /// Print one JSON object per pair.
    #[clap(long)]
    pub json: bool,

    /// Only print the summary.
    #[clap(short, long)]
    pub silent: bool,

    #[clap(flatten)]
    pub align: AlignArgs,

    /// Options to generate random input pairs.
    #[clap(flatten, next_help_heading = "Generated input")]
    pub generate: Generate,
}

#[derive(Parser, Debug, Clone, Serialize, Deserialize)]
pub struct Generate {
    /// Number of generated pairs.
    #[clap(long, default_value_t = 1, hide_short_help = true)]
    pub cnt: usize,

    /// Length of the generated sequences.
    #[clap(short = 'n', long, default_value_t = 1000)]
    pub length: usize,

    /// Fraction of positions with a substitution, insertion or deletion.
    #[clap(short, long, default_value_t = 0.1)]
    pub error_rate: f32,

    /// Seed of the generator. Random when not given.
    #[clap(long, hide_short_help = true)]
    pub seed: Option<u64>,
}

impl Cli {
    /// The pairs to align: the literal sequences, the input files, or generated pairs.
    pub fn input_pairs(&self) -> Result<Vec<(Sequence, Sequence)>, InputError> {
        if let [a, b] = self.sequences.as_slice() {
            return Ok(vec![(a.clone().into_bytes(), b.clone().into_bytes())]);
        }
        let Some(input) = &self.input else {
            return Ok(self.generate.pairs());
        };
        let io_error = |source| InputError::Io {
            path: input.clone(),
            source,
        };
        let files = if input.is_file() {
            vec![input.clone()]
        } else {
            let mut files = input
                .read_dir()
                .map_err(io_error)?
                .map_ok(|entry| entry.path())
                .collect::<Result<Vec<_>, _>>()
                .map_err(io_error)?;
            files.sort();
            files
        };
        let mut pairs = vec![];
        for f in files {
            pairs.extend(read_pairs(&f)?);
        }
        Ok(pairs)
    }
}

impl Generate {
    pub fn pairs(&self) -> Vec<(Sequence, Sequence)> {
        let seed = self.seed.unwrap_or_else(|| {
            let seed = rand_chacha::ChaCha8Rng::from_entropy().gen_range(0..1_000);
            log::info!("Seed: {seed}");
            seed
        });
        (0..self.cnt as u64)
            .map(|k| pa_test::gen_seqs(self.length, self.error_rate, seed + k))
            .collect()
    }
}

/// Read the pairs of a single file, based on its extension.
pub fn read_pairs(path: &Path) -> Result<Vec<(Sequence, Sequence)>, InputError> {
    let io_error = |source| InputError::Io {
        path: path.to_path_buf(),
        source,
    };
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    let seqs: Vec<Sequence> = match ext {
        "seq" | "txt" => {
            let f = BufReader::new(File::open(path).map_err(io_error)?);
            let mut seqs = vec![];
            for (idx, line) in f.lines().enumerate() {
                let mut line = line.map_err(io_error)?.into_bytes();
                if ext == "seq" {
                    let expected = if idx % 2 == 0 { '>' } else { '<' };
                    if line.first() != Some(&(expected as u8)) {
                        return Err(InputError::Prefix {
                            path: path.to_path_buf(),
                            line: idx + 1,
                            expected,
                        });
                    }
                    line.remove(0);
                }
                seqs.push(line);
            }
            seqs
        }
        "fa" | "fna" | "fasta" => {
            let f = BufReader::new(File::open(path).map_err(io_error)?);
            fasta::Reader::new(f)
                .records()
                .map_ok(|record| record.seq().to_vec())
                .collect::<Result<_, _>>()
                .map_err(io_error)?
        }
        _ => return Err(InputError::Extension(path.to_path_buf())),
    };
    if seqs.len() % 2 != 0 {
        return Err(InputError::Unpaired {
            path: path.to_path_buf(),
        });
    }
    Ok(seqs.into_iter().tuples().collect())
}
