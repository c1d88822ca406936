//! Symbols and the alphabet they are drawn from.

use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;

/// Single-character tokens that are regex syntax rather than literals.
const META_CHARS: &[char] = &['*', '+', '?', '.', '^', '$', '|', '(', ')', '[', ']', '{', '}'];

/// Atomic unit of a candidate pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// Literal text, escaped on serialization.
    Literal(String),
    /// Regex syntax emitted verbatim (quantifier, class shorthand, anchor, wildcard).
    Meta(String),
}

impl Symbol {
    /// Classify an alphabet entry.
    ///
    /// Anything starting with a backslash or consisting of a single regex
    /// metacharacter is a meta-token; everything else is literal text. A token
    /// whose trailing escape is unfinished (a lone backslash included) is literal,
    /// so it cannot fuse with whatever symbol follows it.
    pub fn parse(token: &str) -> Self {
        let mut chars = token.chars();
        let is_meta = match (chars.next(), chars.next()) {
            (Some('\\'), Some(_)) => !ends_with_open_escape(token),
            (Some(c), None) => META_CHARS.contains(&c),
            _ => false,
        };
        if is_meta {
            Self::Meta(token.to_string())
        } else {
            Self::Literal(token.to_string())
        }
    }

    /// Serialized pattern fragment.
    pub fn to_pattern(&self) -> String {
        match self {
            Self::Literal(text) => text
                .chars()
                .map(|c| regex::escape(c.encode_utf8(&mut [0; 4])))
                .collect(),
            Self::Meta(token) => token.clone(),
        }
    }

    /// The raw token text.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Literal(text) | Self::Meta(text) => text,
        }
    }

}

/// Odd number of trailing backslashes.
fn ends_with_open_escape(token: &str) -> bool {
    token.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_pattern())
    }
}

/// Ordered, deduplicated set of symbols usable during mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<Symbol>,
}

impl Alphabet {
    /// Build from raw tokens, keeping first occurrences in order.
    /// Empty tokens are dropped.
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut symbols: Vec<Symbol> = Vec::new();
        for token in tokens {
            let token = token.as_ref();
            if token.is_empty() {
                continue;
            }
            let symbol = Symbol::parse(token);
            if !symbols.contains(&symbol) {
                symbols.push(symbol);
            }
        }
        Self { symbols }
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Draw a symbol uniformly.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Symbol> {
        self.symbols.choose(rng)
    }

    /// Draw a symbol different from `current` whenever the alphabet offers one.
    pub fn sample_other<R: Rng + ?Sized>(
        &self,
        current: Option<&Symbol>,
        rng: &mut R,
    ) -> Option<&Symbol> {
        match current {
            Some(current) if self.symbols.len() > 1 => {
                let others: Vec<&Symbol> = self.symbols.iter().filter(|s| *s != current).collect();
                if others.is_empty() {
                    self.sample(rng)
                } else {
                    others.choose(rng).copied()
                }
            }
            _ => self.sample(rng),
        }
    }
}
