//! Streams of pairs in, streams of results out.

use crate::{
    config::AlignmentConfig,
    error::{AlignmentError, Result},
    plan::{compile, AlignmentPlan},
    result::AlignmentResult,
    SequencePair,
};
use rayon::prelude::*;
use std::{collections::VecDeque, iter::Enumerate};

/// Chunks handed to each worker of the thread pool per refill.
const CHUNKS_PER_THREAD: usize = 4;

/// Results of [`align_pairwise`], computed lazily one chunk at a time.
///
/// Results come in input order. After the first error the stream ends.
pub struct AlignmentStream<I: Iterator>
where
    I::Item: SequencePair,
{
    plan: AlignmentPlan<I::Item>,
    pairs: Enumerate<I>,
    pool: Option<rayon::ThreadPool>,
    chunk: Vec<(usize, I::Item)>,
    results: VecDeque<AlignmentResult>,
    /// Returned once the results before it are drained.
    error: Option<AlignmentError>,
    done: bool,
}

/// Align every pair of `pairs` under `config`.
///
/// The configuration is compiled once, up front; contract violations and
/// invalid configurations that do not depend on the sequences are returned
/// here. Pair `k` of the input gets identifier `k`.
pub fn align_pairwise<I>(pairs: I, config: AlignmentConfig) -> Result<AlignmentStream<I::IntoIter>>
where
    I: IntoIterator,
    I::Item: SequencePair + Send + Sync,
{
    let threads = config.get_threads();
    let (plan, _config) = compile(config)?;
    let pool = match threads {
        Some(threads) => Some(rayon::ThreadPoolBuilder::new().num_threads(threads).build()?),
        None => None,
    };
    Ok(AlignmentStream {
        plan,
        pairs: pairs.into_iter().enumerate(),
        pool,
        chunk: vec![],
        results: VecDeque::new(),
        error: None,
        done: false,
    })
}

impl<I: Iterator> AlignmentStream<I>
where
    I::Item: SequencePair + Send + Sync,
{
    /// The number of pairs pulled from the input per refill.
    fn refill_size(&self) -> usize {
        let lanes = self.plan.lanes();
        match &self.pool {
            Some(pool) => lanes * pool.current_num_threads() * CHUNKS_PER_THREAD,
            None => lanes,
        }
    }

    /// Align the next chunk of pairs. The results of all pairs before the
    /// first failing one are queued, followed by its error.
    fn refill(&mut self) {
        let n = self.refill_size();
        self.chunk.clear();
        self.chunk.extend(self.pairs.by_ref().take(n));
        if self.chunk.is_empty() {
            self.done = true;
            return;
        }
        let result = match &self.pool {
            None => {
                let results = &mut self.results;
                self.plan.run(&self.chunk, |r| results.push_back(r))
            }
            Some(pool) => {
                let lanes = self.plan.lanes();
                let plan = &self.plan;
                let chunk = &self.chunk;
                // One plan per worker; `collect` keeps the input order.
                let outputs: Vec<(Vec<AlignmentResult>, Result<()>)> = pool.install(|| {
                    chunk
                        .par_chunks(lanes)
                        .map_init(
                            || plan.clone(),
                            |plan, part| {
                                let mut out = Vec::with_capacity(part.len());
                                let status = plan.run(part, |r| out.push(r));
                                (out, status)
                            },
                        )
                        .collect()
                });
                let mut status = Ok(());
                for (out, part_status) in outputs {
                    self.results.extend(out);
                    if part_status.is_err() {
                        status = part_status;
                        break;
                    }
                }
                status
            }
        };
        if let Err(e) = result {
            self.error = Some(e);
            self.done = true;
        }
    }
}

impl<I: Iterator> Iterator for AlignmentStream<I>
where
    I::Item: SequencePair + Send + Sync,
{
    type Item = Result<AlignmentResult>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(r) = self.results.pop_front() {
                return Some(Ok(r));
            }
            if let Some(e) = self.error.take() {
                return Some(Err(e));
            }
            if self.done {
                return None;
            }
            self.refill();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pa_affine_types::{Band, GapScheme, MatchMismatch};

    fn config() -> AlignmentConfig {
        AlignmentConfig::new()
            .method_global()
            .gap(GapScheme::affine(-10, -1))
            .scoring(MatchMismatch::new(4, -5))
    }

    #[test]
    fn stream_is_lazy_and_ordered() {
        let pairs: Vec<_> = (0..20u64).map(|seed| pa_test::gen_seqs(50, 0.1, seed)).collect();
        let mut pulled = 0;
        let input = pairs.iter().inspect(|_| pulled += 1);
        let mut stream = align_pairwise(input, config()).unwrap();
        let first = stream.next().unwrap().unwrap();
        assert_eq!(first.sequence1_id(), Some(0));
        let ids: Vec<_> = stream.map(|r| r.unwrap().sequence1_id().unwrap()).collect();
        assert_eq!(ids, (1..20).collect::<Vec<_>>());
        assert_eq!(pulled, 20);
    }

    #[test]
    fn first_pull_aligns_one_chunk() {
        let pairs: Vec<_> = (0..20u64).map(|seed| pa_test::gen_seqs(50, 0.1, seed)).collect();
        let pulled = std::cell::Cell::new(0);
        let input = pairs.iter().inspect(|_| pulled.set(pulled.get() + 1));
        let mut stream = align_pairwise(input, config()).unwrap();
        assert_eq!(pulled.get(), 0);
        stream.next().unwrap().unwrap();
        assert_eq!(pulled.get(), 1);
    }

    #[test]
    fn results_before_an_error_are_kept() {
        let pairs = [("ACGT", "ACGT"), ("ACGT", "AGGT"), ("A", "ACGTAC"), ("AC", "AC")];
        let config = config().band(Band::new(-1, 1));
        let oks = |config: AlignmentConfig| -> Vec<bool> {
            align_pairwise(pairs, config)
                .unwrap()
                .map(|r| r.is_ok())
                .collect()
        };
        assert_eq!(oks(config.clone()), [true, true, false]);
        assert_eq!(oks(config.parallel(2)), [true, true, false]);
    }

    #[test]
    fn parallel_equals_sequential() {
        let pairs: Vec<_> = (0..100u64)
            .map(|seed| pa_test::gen_seqs(40 + seed as usize, 0.2, seed))
            .collect();
        let seq: Vec<_> = align_pairwise(&pairs, config())
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        let par: Vec<_> = align_pairwise(&pairs, config().parallel(4))
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(seq, par);
    }
}
