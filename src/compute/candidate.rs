//! Symbol-sequence candidates and their structural edits.

use std::fmt;

use rand::Rng;

use super::alphabet::{Alphabet, Symbol};
use super::genotype::Genotype;
use super::mutation::MutationOp;

/// An ordered sequence of alphabet symbols.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Candidate {
    symbols: Vec<Symbol>,
}

impl Candidate {
    pub fn new(symbols: Vec<Symbol>) -> Self {
        Self { symbols }
    }

    /// Parse each token with [`Symbol::parse`].
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            symbols: tokens.into_iter().map(|t| Symbol::parse(t.as_ref())).collect(),
        }
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Insert a drawn symbol at `index` (clamped to `len`).
    pub fn insert_at<R: Rng + ?Sized>(
        &self,
        index: usize,
        alphabet: &Alphabet,
        rng: &mut R,
    ) -> Self {
        let index = index.min(self.symbols.len());
        let Some(symbol) = alphabet.sample_other(self.symbols.get(index), rng) else {
            return self.clone();
        };
        let mut symbols = self.symbols.clone();
        symbols.insert(index, symbol.clone());
        Self { symbols }
    }

    /// Remove the symbol at `index`; no-op when out of range.
    pub fn delete_at(&self, index: usize) -> Self {
        let mut symbols = self.symbols.clone();
        if index < symbols.len() {
            symbols.remove(index);
        }
        Self { symbols }
    }

    /// Swap the symbol at `index` for a different drawn one; no-op when out of range.
    pub fn replace_at<R: Rng + ?Sized>(
        &self,
        index: usize,
        alphabet: &Alphabet,
        rng: &mut R,
    ) -> Self {
        let mut symbols = self.symbols.clone();
        if let Some(slot) = symbols.get_mut(index)
            && let Some(symbol) = alphabet.sample_other(Some(&*slot), rng)
        {
            *slot = symbol.clone();
        }
        Self { symbols }
    }

    /// Copy the symbol at `index` next to itself; no-op when out of range.
    pub fn duplicate_at(&self, index: usize) -> Self {
        let mut symbols = self.symbols.clone();
        if let Some(symbol) = symbols.get(index).cloned() {
            symbols.insert(index, symbol);
        }
        Self { symbols }
    }
}

impl Genotype for Candidate {
    type Vocabulary = Alphabet;

    fn vocabulary(alphabet: &Alphabet) -> Alphabet {
        alphabet.clone()
    }

    fn empty() -> Self {
        Self::default()
    }

    fn len(&self) -> usize {
        self.symbols.len()
    }

    fn to_pattern(&self) -> String {
        self.symbols.iter().map(Symbol::to_pattern).collect()
    }

    fn mutate<R: Rng + ?Sized>(&self, op: MutationOp, alphabet: &Alphabet, rng: &mut R) -> Self {
        let len = self.symbols.len();
        if len == 0 {
            return match op {
                MutationOp::Insert | MutationOp::Duplicate => self.insert_at(0, alphabet, rng),
                MutationOp::Delete | MutationOp::Replace => self.clone(),
            };
        }
        match op {
            MutationOp::Insert => {
                let index = rng.gen_range(0..=len);
                self.insert_at(index, alphabet, rng)
            }
            MutationOp::Delete => self.delete_at(rng.gen_range(0..len)),
            MutationOp::Replace => {
                let index = rng.gen_range(0..len);
                self.replace_at(index, alphabet, rng)
            }
            MutationOp::Duplicate => self.duplicate_at(rng.gen_range(0..len)),
        }
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_pattern())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn binary() -> Alphabet {
        Alphabet::new(["0", "1"])
    }

    #[test]
    fn test_serialization_joins_fragments() {
        let candidate = Candidate::from_tokens(["\\w", "+", "@", "\\w", "+", ".", "com"]);
        assert_eq!(candidate.to_pattern(), "\\w+@\\w+.com");
        assert_eq!(Candidate::empty().to_pattern(), "");
    }

    #[test]
    fn test_edits_do_not_touch_original() {
        let mut rng = StdRng::seed_from_u64(1);
        let original = Candidate::from_tokens(["1", "0"]);
        let _ = original.insert_at(1, &binary(), &mut rng);
        let _ = original.delete_at(0);
        let _ = original.duplicate_at(1);
        assert_eq!(original, Candidate::from_tokens(["1", "0"]));
    }

    #[test]
    fn test_positional_edits() {
        let mut rng = StdRng::seed_from_u64(1);
        let base = Candidate::from_tokens(["1", "0"]);
        assert_eq!(base.delete_at(0), Candidate::from_tokens(["0"]));
        assert_eq!(base.duplicate_at(1), Candidate::from_tokens(["1", "0", "0"]));
        assert_eq!(
            base.replace_at(0, &binary(), &mut rng),
            Candidate::from_tokens(["0", "0"])
        );
        // appended symbol differs from nothing, so either digit is fine
        assert_eq!(base.insert_at(2, &binary(), &mut rng).len(), 3);
    }

    #[test]
    fn test_empty_candidate_fallbacks() {
        let mut rng = StdRng::seed_from_u64(9);
        let empty = Candidate::empty();
        assert_eq!(empty.mutate(MutationOp::Delete, &binary(), &mut rng).len(), 0);
        assert_eq!(empty.mutate(MutationOp::Replace, &binary(), &mut rng).len(), 0);
        assert_eq!(empty.mutate(MutationOp::Insert, &binary(), &mut rng).len(), 1);
        assert_eq!(empty.mutate(MutationOp::Duplicate, &binary(), &mut rng).len(), 1);
    }

    #[test]
    fn test_insert_with_empty_alphabet_is_noop() {
        let mut rng = StdRng::seed_from_u64(9);
        let base = Candidate::from_tokens(["a"]);
        let next = base.mutate(MutationOp::Insert, &Alphabet::default(), &mut rng);
        assert_eq!(next, base);
    }

    fn arb_candidate() -> impl Strategy<Value = Candidate> {
        let token = prop_oneof![Just("0"), Just("1"), Just("\\d"), Just("+")];
        proptest::collection::vec(token, 0..12).prop_map(Candidate::from_tokens)
    }

    proptest! {
        #[test]
        fn prop_operator_length_contract(candidate in arb_candidate(), seed in any::<u64>()) {
            let alphabet = Alphabet::new(["0", "1", "\\d", "+"]);
            let mut rng = StdRng::seed_from_u64(seed);
            let len = candidate.len();

            let inserted = candidate.mutate(MutationOp::Insert, &alphabet, &mut rng);
            prop_assert_eq!(inserted.len(), len + 1);

            let duplicated = candidate.mutate(MutationOp::Duplicate, &alphabet, &mut rng);
            prop_assert_eq!(duplicated.len(), len + 1);

            let deleted = candidate.mutate(MutationOp::Delete, &alphabet, &mut rng);
            prop_assert_eq!(deleted.len(), len.saturating_sub(1));

            let replaced = candidate.mutate(MutationOp::Replace, &alphabet, &mut rng);
            prop_assert_eq!(replaced.len(), len);
            if len > 0 {
                prop_assert_ne!(replaced, candidate);
            }
        }
    }
}
