//! A single lineage: one independent randomized walk toward higher fitness.

use crate::schema::LineagePolicy;

use super::fitness::{FitnessEvaluator, is_perfect};
use super::genotype::Genotype;
use super::mutation::{MutationRng, OperatorTable};

/// Read-only state shared by every lineage of a search.
pub struct LineageContext<'a, G: Genotype> {
    pub evaluator: &'a FitnessEvaluator,
    pub vocabulary: &'a G::Vocabulary,
    pub operators: &'a OperatorTable,
    /// Inclusive (min, max) mutation steps per generation.
    pub mutations: (usize, usize),
    pub policy: LineagePolicy,
}

/// What happened during one generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// The trial beat the lineage's best.
    Improved,
    /// The trial was discarded.
    Unchanged,
    /// The trial is a perfect classifier; the lineage is done.
    Perfect,
}

/// Final state of a lineage.
#[derive(Debug, Clone)]
pub struct LineageResult<G> {
    pub best: G,
    pub fitness: f64,
    pub generations: usize,
    pub perfect: bool,
}

/// One running lineage.
pub struct Lineage<'a, G: Genotype> {
    ctx: &'a LineageContext<'a, G>,
    rng: MutationRng,
    best: G,
    best_fitness: f64,
    /// Drifting mutation base, only used under [`LineagePolicy::Drift`].
    current: G,
    generation: usize,
    perfect: bool,
}

impl<'a, G: Genotype> Lineage<'a, G> {
    /// Start from the empty candidate.
    pub fn new(ctx: &'a LineageContext<'a, G>, rng: MutationRng) -> Self {
        Self {
            ctx,
            rng,
            best: G::empty(),
            best_fitness: f64::NEG_INFINITY,
            current: G::empty(),
            generation: 0,
            perfect: false,
        }
    }

    pub fn best(&self) -> &G {
        &self.best
    }

    pub fn best_fitness(&self) -> f64 {
        self.best_fitness
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn is_perfect(&self) -> bool {
        self.perfect
    }

    /// Run one generation: mutate, score, keep if strictly better.
    pub fn step(&mut self) -> GenerationOutcome {
        let count = self.rng.mutation_count(self.ctx.mutations);
        let base = match self.ctx.policy {
            LineagePolicy::HillClimb => &self.best,
            LineagePolicy::Drift => &self.current,
        };
        let trial = self
            .rng
            .mutate_many(base, count, self.ctx.operators, self.ctx.vocabulary);
        let fitness = self.ctx.evaluator.fitness(&trial);
        self.generation += 1;

        if self.ctx.policy == LineagePolicy::Drift {
            self.current = trial.clone();
        }

        if is_perfect(fitness) {
            self.best = trial;
            self.best_fitness = fitness;
            self.perfect = true;
            return GenerationOutcome::Perfect;
        }

        if fitness > self.best_fitness {
            log::trace!(
                "generation {}: {:.2} -> {:.2} ({})",
                self.generation,
                self.best_fitness,
                fitness,
                trial.to_pattern()
            );
            self.best = trial;
            self.best_fitness = fitness;
            GenerationOutcome::Improved
        } else {
            GenerationOutcome::Unchanged
        }
    }

    /// Run until the generation budget is spent, a perfect classifier is
    /// found, or `halt` reports true between generations.
    pub fn run<F>(mut self, generations: usize, halt: F) -> LineageResult<G>
    where
        F: Fn() -> bool,
    {
        while self.generation < generations && !halt() {
            if self.step() == GenerationOutcome::Perfect {
                break;
            }
        }
        self.finish()
    }

    pub fn finish(self) -> LineageResult<G> {
        LineageResult {
            best: self.best,
            fitness: self.best_fitness,
            generations: self.generation,
            perfect: self.perfect,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::{Alphabet, Candidate, Corpus};
    use crate::schema::{FitnessConfig, MutationWeights};

    fn evaluator(good: &[&str], bad: &[&str]) -> FitnessEvaluator {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        FitnessEvaluator::new(FitnessConfig::default(), Corpus::new(owned(good), owned(bad)))
    }

    #[test]
    fn test_hill_climb_is_monotonic() {
        let evaluator = evaluator(&["101010"], &["111111", "000000"]);
        let alphabet = Alphabet::new(["0", "1"]);
        let operators = OperatorTable::new(&MutationWeights::default()).unwrap();
        let ctx = LineageContext::<Candidate> {
            evaluator: &evaluator,
            vocabulary: &alphabet,
            operators: &operators,
            mutations: (1, 3),
            policy: LineagePolicy::HillClimb,
        };

        let mut lineage = Lineage::new(&ctx, MutationRng::new(17));
        let mut previous = lineage.best_fitness();
        for _ in 0..300 {
            if lineage.step() == GenerationOutcome::Perfect {
                break;
            }
            assert!(lineage.best_fitness() >= previous);
            assert_eq!(evaluator.fitness(lineage.best()), lineage.best_fitness());
            previous = lineage.best_fitness();
        }
        assert!(lineage.best_fitness() > f64::NEG_INFINITY);
    }

    #[test]
    fn test_perfect_short_circuits() {
        let evaluator = evaluator(&["1"], &["0"]);
        let alphabet = Alphabet::new(["1"]);
        let operators = OperatorTable::new(&MutationWeights {
            insert: 1.0,
            delete: 0.0,
            replace: 0.0,
            duplicate: 0.0,
        })
        .unwrap();
        let ctx = LineageContext::<Candidate> {
            evaluator: &evaluator,
            vocabulary: &alphabet,
            operators: &operators,
            mutations: (1, 1),
            policy: LineagePolicy::HillClimb,
        };

        let result = Lineage::new(&ctx, MutationRng::new(1)).run(100, || false);
        assert!(result.perfect);
        assert_eq!(result.generations, 1);
        assert_eq!(result.best.to_pattern(), "1");
        assert_eq!(result.fitness, f64::INFINITY);
    }

    #[test]
    fn test_budget_and_halt() {
        let evaluator = evaluator(&["abc"], &["abc"]);
        let alphabet = Alphabet::new(["a", "b", "c"]);
        let operators = OperatorTable::new(&MutationWeights::default()).unwrap();
        let ctx = LineageContext::<Candidate> {
            evaluator: &evaluator,
            vocabulary: &alphabet,
            operators: &operators,
            mutations: (1, 2),
            policy: LineagePolicy::HillClimb,
        };

        let result = Lineage::new(&ctx, MutationRng::new(2)).run(40, || false);
        assert_eq!(result.generations, 40);
        assert!(!result.perfect);
        assert!(result.fitness.is_finite());

        let halted = Lineage::new(&ctx, MutationRng::new(2)).run(40, || true);
        assert_eq!(halted.generations, 0);
        assert!(halted.best.is_empty());
        assert_eq!(halted.fitness, f64::NEG_INFINITY);
    }

    #[test]
    fn test_drift_policy_keeps_best_record() {
        let evaluator = evaluator(&["111111"], &["000000"]);
        let alphabet = Alphabet::new(["0", "1"]);
        let operators = OperatorTable::new(&MutationWeights::default()).unwrap();
        let ctx = LineageContext::<Candidate> {
            evaluator: &evaluator,
            vocabulary: &alphabet,
            operators: &operators,
            mutations: (1, 2),
            policy: LineagePolicy::Drift,
        };

        let mut lineage = Lineage::new(&ctx, MutationRng::new(5));
        let mut previous = lineage.best_fitness();
        for _ in 0..200 {
            if lineage.step() == GenerationOutcome::Perfect {
                break;
            }
            assert!(lineage.best_fitness() >= previous);
            previous = lineage.best_fitness();
        }
        assert_eq!(evaluator.fitness(lineage.best()), lineage.best_fitness());
    }

    #[test]
    fn test_seeded_lineages_repeat() {
        let evaluator = evaluator(&["123456"], &["abcdefg"]);
        let alphabet = Alphabet::new(["1", "2", "3", "4", "5", "6", "a", "b", "c"]);
        let operators = OperatorTable::new(&MutationWeights::default()).unwrap();
        let ctx = LineageContext::<Candidate> {
            evaluator: &evaluator,
            vocabulary: &alphabet,
            operators: &operators,
            mutations: (1, 3),
            policy: LineagePolicy::HillClimb,
        };

        let a = Lineage::new(&ctx, MutationRng::new(99)).run(150, || false);
        let b = Lineage::new(&ctx, MutationRng::new(99)).run(150, || false);
        assert_eq!(a.best, b.best);
        assert_eq!(a.generations, b.generations);
    }
}
