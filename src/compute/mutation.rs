//! Mutation operator selection and the seeded random source behind it.

use rand::distributions::{Distribution, WeightedIndex};
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::{MutationWeights, SearchConfigError};

use super::genotype::Genotype;

/// The four structural operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MutationOp {
    /// Insert a freshly drawn element at a position in `[0, len]`.
    Insert,
    /// Remove the element at a position in `[0, len - 1]`.
    Delete,
    /// Swap the element at a position for a different one of the same kind.
    Replace,
    /// Copy the element at a position next to itself.
    Duplicate,
}

impl MutationOp {
    /// All operators, in weight-table order.
    pub const ALL: [MutationOp; 4] = [
        MutationOp::Insert,
        MutationOp::Delete,
        MutationOp::Replace,
        MutationOp::Duplicate,
    ];
}

/// Weighted roll over the operator table.
#[derive(Debug, Clone)]
pub struct OperatorTable {
    index: WeightedIndex<f64>,
}

impl OperatorTable {
    pub fn new(weights: &MutationWeights) -> Result<Self, SearchConfigError> {
        let index = WeightedIndex::new(weights.as_array())
            .map_err(|e| SearchConfigError::InvalidWeight(e.to_string()))?;
        Ok(Self { index })
    }

    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> MutationOp {
        MutationOp::ALL[self.index.sample(rng)]
    }
}

/// Random source for one lineage.
pub struct MutationRng {
    rng: StdRng,
}

impl MutationRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create with random seed.
    pub fn random() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Uniform draw from an inclusive range.
    pub fn mutation_count(&mut self, (min, max): (usize, usize)) -> usize {
        self.rng.gen_range(min..=max)
    }

    /// Apply `count` operator rolls in sequence to `base`.
    pub fn mutate_many<G: Genotype>(
        &mut self,
        base: &G,
        count: usize,
        table: &OperatorTable,
        vocabulary: &G::Vocabulary,
    ) -> G {
        let mut trial = base.clone();
        for _ in 0..count {
            let op = table.roll(&mut self.rng);
            trial = trial.mutate(op, vocabulary, &mut self.rng);
        }
        trial
    }

    /// Generate next u64 for seeding child RNGs.
    pub fn next_seed(&mut self) -> u64 {
        self.rng.r#gen()
    }

    /// Underlying generator.
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_roll_respects_zero_weight() {
        let table = OperatorTable::new(&MutationWeights {
            insert: 1.0,
            delete: 0.0,
            replace: 1.0,
            duplicate: 0.0,
        })
        .unwrap();
        let mut rng = MutationRng::new(3);
        for _ in 0..500 {
            let op = table.roll(rng.rng());
            assert!(matches!(op, MutationOp::Insert | MutationOp::Replace));
        }
    }

    #[test]
    fn test_roll_follows_weights() {
        let table = OperatorTable::new(&MutationWeights::default()).unwrap();
        let mut rng = MutationRng::new(11);
        let mut counts: HashMap<MutationOp, usize> = HashMap::new();
        for _ in 0..10_000 {
            *counts.entry(table.roll(rng.rng())).or_default() += 1;
        }
        // default replace weight is 0.55
        let replace = counts[&MutationOp::Replace] as f64 / 10_000.0;
        assert!((replace - 0.55).abs() < 0.05, "replace share {replace}");
        assert!(counts[&MutationOp::Duplicate] < counts[&MutationOp::Insert]);
    }

    #[test]
    fn test_all_zero_weights_rejected() {
        let weights = MutationWeights {
            insert: 0.0,
            delete: 0.0,
            replace: 0.0,
            duplicate: 0.0,
        };
        assert!(OperatorTable::new(&weights).is_err());
    }

    #[test]
    fn test_mutation_count_inclusive() {
        let mut rng = MutationRng::new(5);
        let mut seen = [false; 4];
        for _ in 0..200 {
            let n = rng.mutation_count((1, 3));
            assert!((1..=3).contains(&n));
            seen[n] = true;
        }
        assert!(seen[1] && seen[2] && seen[3]);
    }

    #[test]
    fn test_seeded_streams_repeat() {
        let mut a = MutationRng::new(42);
        let mut b = MutationRng::new(42);
        for _ in 0..10 {
            assert_eq!(a.next_seed(), b.next_seed());
        }
    }
}
