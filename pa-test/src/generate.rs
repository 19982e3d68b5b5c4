use itertools::Itertools;
use pa_affine_types::Sequence;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub const DNA: &[u8] = b"ACGT";
pub const PROTEIN: &[u8] = b"ACDEFGHIKLMNPQRSTVWY";

/// How edits are spread over the mutated sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorModel {
    /// Substitutions, insertions and deletions with equal probability.
    Uniform,
    /// Edits are mostly insertions of random symbols.
    NoisyInsert,
    /// Edits are mostly deletions.
    NoisyDelete,
}

pub fn random_sequence(n: usize, alphabet: &[u8], rng: &mut impl Rng) -> Sequence {
    (0..n)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
        .collect()
}

/// Apply `round(e * n)` random edits to `a`.
pub fn mutate(
    a: &[u8],
    e: f32,
    model: ErrorModel,
    alphabet: &[u8],
    rng: &mut impl Rng,
) -> Sequence {
    let mut b = a.to_vec();
    let edits = (e * a.len() as f32).round() as usize;
    for _ in 0..edits {
        let kind = match model {
            ErrorModel::Uniform => rng.gen_range(0..3),
            ErrorModel::NoisyInsert => [0, 1, 1, 1][rng.gen_range(0..4)],
            ErrorModel::NoisyDelete => [0, 2, 2, 2][rng.gen_range(0..4)],
        };
        let c = alphabet[rng.gen_range(0..alphabet.len())];
        match kind {
            0 if !b.is_empty() => {
                let i = rng.gen_range(0..b.len());
                b[i] = c;
            }
            2 if !b.is_empty() => {
                b.remove(rng.gen_range(0..b.len()));
            }
            _ => b.insert(rng.gen_range(0..=b.len()), c),
        }
    }
    b
}

/// A random DNA sequence of length `n` and a copy with uniform noise at rate `e`.
pub fn gen_seqs(n: usize, e: f32, seed: u64) -> (Sequence, Sequence) {
    generate_model(n, e, ErrorModel::Uniform, DNA, seed)
}

/// As `gen_seqs`, over the twenty amino acids.
pub fn gen_protein_seqs(n: usize, e: f32, seed: u64) -> (Sequence, Sequence) {
    generate_model(n, e, ErrorModel::Uniform, PROTEIN, seed)
}

pub fn generate_model(
    n: usize,
    e: f32,
    model: ErrorModel,
    alphabet: &[u8],
    seed: u64,
) -> (Sequence, Sequence) {
    let rng = &mut ChaCha8Rng::seed_from_u64(seed);
    let a = random_sequence(n, alphabet, rng);
    let b = mutate(&a, e, model, alphabet, rng);
    (a, b)
}

/// Parameters of a generated pair, for error messages.
#[derive(Clone, Copy, Debug)]
pub struct PairParams {
    pub n: usize,
    pub e: f32,
    pub model: ErrorModel,
    pub seed: u64,
}

/// A fixed grid of lengths, error rates and error models with deterministic seeds.
pub fn gen_pairs(max_n: usize) -> impl Iterator<Item = ((Sequence, Sequence), PairParams)> {
    let ns = [0usize, 1, 2, 3, 5, 8, 13, 20, 31, 63, 64, 65, 100, 127, 128, 129, 200, 300];
    let es = [0.0f32, 0.01, 0.05, 0.10, 0.20, 0.50, 1.0];
    let models = [
        ErrorModel::Uniform,
        ErrorModel::NoisyInsert,
        ErrorModel::NoisyDelete,
    ];
    ns.into_iter()
        .filter(move |&n| n <= max_n)
        .cartesian_product(es)
        .cartesian_product(models)
        .enumerate()
        .map(|(seed, ((n, e), model))| {
            let seed = seed as u64;
            let pair = generate_model(n, e, model, DNA, seed);
            (pair, PairParams { n, e, model, seed })
        })
}
