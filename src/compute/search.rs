//! Population search: many independent lineages reduced to one winner.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Instant;

#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;

use crate::schema::{
    Representation, SearchConfig, SearchConfigError, SearchInput, SearchProgress, SearchResult,
    SearchStats, StopReason,
};

use super::alphabet::Alphabet;
use super::candidate::Candidate;
use super::fitness::{Corpus, FitnessEvaluator, is_perfect};
use super::genotype::Genotype;
use super::lineage::{Lineage, LineageContext, LineageResult};
use super::mutation::{MutationRng, OperatorTable};
use super::tree::PatternTree;

/// Progress callback type.
pub type ProgressCallback = Box<dyn Fn(&SearchProgress) + Send + Sync>;

/// Runs lineage searches for a fixed configuration.
pub struct PatternSearch {
    config: SearchConfig,
    operators: OperatorTable,
    cancelled: Arc<AtomicBool>,
}

impl PatternSearch {
    /// Create a search engine, validating the configuration.
    pub fn new(config: SearchConfig) -> Result<Self, SearchConfigError> {
        config.validate()?;
        let operators = OperatorTable::new(&config.mutation_weights)?;
        Ok(Self {
            config,
            operators,
            cancelled: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Get cancellation handle.
    ///
    /// Lineages check it between generations; a cancelled run still returns
    /// the best candidate found so far.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    /// Run the search (blocking).
    pub fn run(&self, input: &SearchInput) -> SearchResult {
        self.run_with_callback(input, |_| {})
    }

    /// Run the search, reporting each finished lineage to `callback`.
    pub fn run_with_callback<F>(&self, input: &SearchInput, callback: F) -> SearchResult
    where
        F: Fn(&SearchProgress) + Sync,
    {
        match self.config.representation {
            Representation::Sequence => self.search::<Candidate>(input, &callback),
            Representation::Tree => self.search::<PatternTree>(input, &callback),
        }
    }

    fn search<G: Genotype>(
        &self,
        input: &SearchInput,
        callback: &(dyn Fn(&SearchProgress) + Sync),
    ) -> SearchResult {
        let start_time = Instant::now();
        let alphabet = Alphabet::new(&input.alphabet);
        let vocabulary = G::vocabulary(&alphabet);
        let evaluator = FitnessEvaluator::new(self.config.fitness.clone(), Corpus::from(input));
        let ctx = LineageContext::<G> {
            evaluator: &evaluator,
            vocabulary: &vocabulary,
            operators: &self.operators,
            mutations: self.config.mutations_per_generation,
            policy: self.config.policy,
        };

        let lineages = self.config.lineages;
        let generations = self.config.generations_per_lineage;
        log::info!(
            "searching: {} lineages x {} generations, {} symbols, {} positive / {} negative",
            lineages,
            generations,
            alphabet.len(),
            input.good.len(),
            input.bad.len()
        );

        let mut master = match self.config.random_seed {
            Some(seed) => MutationRng::new(seed),
            None => MutationRng::random(),
        };
        let seeds: Vec<u64> = (0..lineages).map(|_| master.next_seed()).collect();

        let solved = AtomicBool::new(false);
        let completed = AtomicUsize::new(0);
        let stop_on_perfect = self.config.stop_on_perfect;

        let run_lineage = |seed: u64| -> LineageResult<G> {
            let halt = || {
                self.cancelled.load(Ordering::Relaxed)
                    || (stop_on_perfect && solved.load(Ordering::Relaxed))
            };
            let result = Lineage::new(&ctx, MutationRng::new(seed)).run(generations, halt);
            if result.perfect {
                solved.store(true, Ordering::Relaxed);
            }

            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            log::debug!(
                "lineage {}/{} finished after {} generations: {:.2} {:?}",
                done,
                lineages,
                result.generations,
                result.fitness,
                result.best.to_pattern()
            );
            callback(&SearchProgress {
                lineages_completed: done,
                lineages_total: lineages,
                best_fitness: result.fitness,
            });
            result
        };

        // Parallel lineages
        #[cfg(not(target_arch = "wasm32"))]
        let results: Vec<LineageResult<G>> = seeds.into_par_iter().map(run_lineage).collect();

        // Sequential lineages for WASM
        #[cfg(target_arch = "wasm32")]
        let results: Vec<LineageResult<G>> = seeds.into_iter().map(run_lineage).collect();

        let winner = reduce_winner(&results);
        let pattern = winner.to_pattern();
        let fitness_score = evaluator.score_pattern(&pattern);
        let percent_correct = evaluator.percent_correct_pattern(&pattern);

        let perfect = results.iter().any(|r| r.perfect);
        let stop_reason = if self.cancelled.load(Ordering::Relaxed) {
            StopReason::Cancelled
        } else if perfect {
            StopReason::PerfectMatch
        } else {
            StopReason::Completed
        };
        let generations_run: u64 = results.iter().map(|r| r.generations as u64).sum();

        log::info!(
            "winner {:?}: fitness {}, {}% correct ({:?})",
            pattern,
            fitness_score,
            percent_correct,
            stop_reason
        );

        SearchResult {
            pattern,
            fitness_score,
            percent_correct,
            stats: SearchStats {
                lineages: results.len(),
                generations: generations_run,
                evaluations: evaluator.evaluations(),
                perfect: is_perfect(fitness_score),
                stop_reason,
                elapsed_seconds: start_time.elapsed().as_secs_f64(),
            },
        }
    }
}

/// Fold lineage results with a strict comparison: later lineages only win
/// with strictly greater fitness, so ties keep the earlier one.
pub fn reduce_winner<G: Genotype>(results: &[LineageResult<G>]) -> G {
    let mut best = G::empty();
    let mut best_fitness = f64::NEG_INFINITY;
    for result in results {
        if result.fitness > best_fitness {
            best = result.best.clone();
            best_fitness = result.fitness;
        }
    }
    best
}

/// Validate `config` and run one search over `input`.
pub fn compute(
    input: &SearchInput,
    config: &SearchConfig,
) -> Result<SearchResult, SearchConfigError> {
    Ok(PatternSearch::new(config.clone())?.run(input))
}
