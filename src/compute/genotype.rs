//! Representation-agnostic view of a candidate pattern.

use std::fmt;

use rand::Rng;

use super::alphabet::Alphabet;
use super::mutation::MutationOp;

/// A candidate representation the lineage search can evolve.
///
/// Implementations are immutable values: [`Genotype::mutate`] returns a new
/// candidate and leaves `self` untouched.
pub trait Genotype: Clone + fmt::Debug + Send + Sync {
    /// Value sets the mutation operators draw from.
    type Vocabulary: Send + Sync;

    /// Derive the vocabulary from the caller's alphabet.
    fn vocabulary(alphabet: &Alphabet) -> Self::Vocabulary;

    /// The empty candidate every lineage starts from.
    fn empty() -> Self;

    /// Number of top-level elements.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serialized regex text.
    fn to_pattern(&self) -> String;

    /// Apply one structural operator.
    fn mutate<R: Rng + ?Sized>(
        &self,
        op: MutationOp,
        vocabulary: &Self::Vocabulary,
        rng: &mut R,
    ) -> Self;
}
