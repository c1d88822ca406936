//! Pattern syntax trees: the structured candidate representation.
//!
//! A [`PatternTree`] is the root sequence. Its children are [`Node`]s, and
//! only [`Node::CharSet`] nests further children, so a root can never appear
//! below another node.

use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::alphabet::{Alphabet, Symbol};
use super::genotype::Genotype;
use super::mutation::MutationOp;

/// Literal characters drawn when the alphabet offers none.
const DEFAULT_LITERALS: &str = ".@abcdefghijkmnopqrstuvwxyz0123456789";

/// Single-token character classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharClass {
    Any,
    Boundary,
    Digit,
    Space,
    Word,
}

impl CharClass {
    pub const ALL: [CharClass; 5] = [
        CharClass::Any,
        CharClass::Boundary,
        CharClass::Digit,
        CharClass::Space,
        CharClass::Word,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Any => ".",
            Self::Boundary => "\\b",
            Self::Digit => "\\d",
            Self::Space => "\\s",
            Self::Word => "\\w",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == token)
    }
}

/// Repetition operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quantifier {
    OneOrMore,
    ZeroOrMore,
}

impl Quantifier {
    pub const ALL: [Quantifier; 2] = [Quantifier::OneOrMore, Quantifier::ZeroOrMore];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneOrMore => "+",
            Self::ZeroOrMore => "*",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|q| q.as_str() == token)
    }
}

/// A non-root tree node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Node {
    Char(CharClass),
    Literal(String),
    /// Applies to the preceding sibling once serialized.
    Quantifier(Quantifier),
    CharSet(Vec<Node>),
}

/// Discriminant of [`Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Char,
    Literal,
    Quantifier,
    CharSet,
}

impl Node {
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Char(_) => NodeKind::Char,
            Self::Literal(_) => NodeKind::Literal,
            Self::Quantifier(_) => NodeKind::Quantifier,
            Self::CharSet(_) => NodeKind::CharSet,
        }
    }

    fn write_pattern(&self, out: &mut String) {
        match self {
            Self::Char(class) => out.push_str(class.as_str()),
            Self::Literal(text) => {
                for c in text.chars() {
                    out.push_str(&regex::escape(c.encode_utf8(&mut [0; 4])));
                }
            }
            Self::Quantifier(q) => out.push_str(q.as_str()),
            Self::CharSet(children) => {
                out.push('[');
                for child in children {
                    child.write_pattern(out);
                }
                out.push(']');
            }
        }
    }
}

/// Root of a pattern tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatternTree {
    children: Vec<Node>,
}

impl PatternTree {
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Paths (child indices from the root) of every parent node; the root is `[]`.
    fn parent_paths(&self) -> Vec<Vec<usize>> {
        let mut out = vec![Vec::new()];
        collect_parent_paths(&self.children, &mut Vec::new(), &mut out);
        out
    }
}

fn collect_parent_paths(children: &[Node], prefix: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
    for (i, node) in children.iter().enumerate() {
        if let Node::CharSet(inner) = node {
            prefix.push(i);
            out.push(prefix.clone());
            collect_parent_paths(inner, prefix, out);
            prefix.pop();
        }
    }
}

fn children_at_mut<'a>(
    mut children: &'a mut Vec<Node>,
    path: &[usize],
) -> Option<&'a mut Vec<Node>> {
    for &i in path {
        children = match children.get_mut(i)? {
            Node::CharSet(inner) => inner,
            _ => return None,
        };
    }
    Some(children)
}

/// Per-kind value sets for drawing fresh nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeVocabulary {
    pub chars: Vec<CharClass>,
    pub literals: Vec<String>,
    pub quantifiers: Vec<Quantifier>,
}

impl Default for TreeVocabulary {
    fn default() -> Self {
        Self {
            chars: CharClass::ALL.to_vec(),
            literals: DEFAULT_LITERALS.chars().map(String::from).collect(),
            quantifiers: Quantifier::ALL.to_vec(),
        }
    }
}

impl TreeVocabulary {
    /// Restrict value sets to what the alphabet offers.
    ///
    /// An empty alphabet yields the default vocabulary. Meta-tokens that are
    /// neither a character class nor `+`/`*` are ignored.
    pub fn from_alphabet(alphabet: &Alphabet) -> Self {
        if alphabet.is_empty() {
            return Self::default();
        }
        let mut vocabulary = Self {
            chars: Vec::new(),
            literals: Vec::new(),
            quantifiers: Vec::new(),
        };
        for symbol in alphabet.symbols() {
            match symbol {
                Symbol::Literal(text) => vocabulary.literals.push(text.clone()),
                Symbol::Meta(token) => {
                    if let Some(class) = CharClass::from_token(token) {
                        vocabulary.chars.push(class);
                    } else if let Some(q) = Quantifier::from_token(token) {
                        vocabulary.quantifiers.push(q);
                    }
                }
            }
        }
        vocabulary
    }

    /// Kinds that can currently be drawn.
    pub fn kinds(&self) -> Vec<NodeKind> {
        let mut kinds = Vec::with_capacity(4);
        if !self.chars.is_empty() {
            kinds.push(NodeKind::Char);
        }
        if !self.literals.is_empty() {
            kinds.push(NodeKind::Literal);
        }
        if !self.quantifiers.is_empty() {
            kinds.push(NodeKind::Quantifier);
        }
        if !self.chars.is_empty() || !self.literals.is_empty() {
            kinds.push(NodeKind::CharSet);
        }
        kinds
    }

    /// Draw a node of a random available kind.
    pub fn random_node<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Node> {
        let kind = *self.kinds().choose(rng)?;
        self.random_node_of_kind(kind, None, rng)
    }

    /// Draw a node of `kind`, differing from `current` when the value set allows.
    fn random_node_of_kind<R: Rng + ?Sized>(
        &self,
        kind: NodeKind,
        current: Option<&Node>,
        rng: &mut R,
    ) -> Option<Node> {
        match kind {
            NodeKind::Char => {
                let current = match current {
                    Some(Node::Char(c)) => Some(c),
                    _ => None,
                };
                pick_other(&self.chars, current, rng).map(|c| Node::Char(*c))
            }
            NodeKind::Literal => {
                let current = match current {
                    Some(Node::Literal(text)) => Some(text),
                    _ => None,
                };
                pick_other(&self.literals, current, rng).map(|t| Node::Literal(t.clone()))
            }
            NodeKind::Quantifier => {
                let current = match current {
                    Some(Node::Quantifier(q)) => Some(q),
                    _ => None,
                };
                pick_other(&self.quantifiers, current, rng).map(|q| Node::Quantifier(*q))
            }
            NodeKind::CharSet => Some(Node::CharSet(Vec::new())),
        }
    }
}

fn pick_other<'a, T: PartialEq, R: Rng + ?Sized>(
    values: &'a [T],
    current: Option<&T>,
    rng: &mut R,
) -> Option<&'a T> {
    match current {
        Some(current) if values.len() > 1 => {
            let others: Vec<&T> = values.iter().filter(|v| *v != current).collect();
            others.choose(rng).copied().or_else(|| values.choose(rng))
        }
        _ => values.choose(rng),
    }
}

/// Apply one operator to a parent's child list.
fn edit_children<R: Rng + ?Sized>(
    children: &mut Vec<Node>,
    op: MutationOp,
    vocabulary: &TreeVocabulary,
    rng: &mut R,
) {
    let len = children.len();
    match op {
        MutationOp::Insert => {
            let index = rng.gen_range(0..=len);
            if let Some(node) = vocabulary.random_node(rng) {
                children.insert(index, node);
            }
        }
        MutationOp::Duplicate if len == 0 => {
            edit_children(children, MutationOp::Insert, vocabulary, rng);
        }
        MutationOp::Delete | MutationOp::Replace | MutationOp::Duplicate if len == 0 => {}
        MutationOp::Delete => {
            children.remove(rng.gen_range(0..len));
        }
        MutationOp::Replace => {
            let index = rng.gen_range(0..len);
            let current = &children[index];
            if let Some(node) = vocabulary.random_node_of_kind(current.kind(), Some(current), rng) {
                children[index] = node;
            }
        }
        MutationOp::Duplicate => {
            let index = rng.gen_range(0..len);
            let copy = children[index].clone();
            children.insert(index, copy);
        }
    }
}

impl Genotype for PatternTree {
    type Vocabulary = TreeVocabulary;

    fn vocabulary(alphabet: &Alphabet) -> TreeVocabulary {
        TreeVocabulary::from_alphabet(alphabet)
    }

    fn empty() -> Self {
        Self::default()
    }

    fn len(&self) -> usize {
        self.children.len()
    }

    fn to_pattern(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.write_pattern(&mut out);
        }
        out
    }

    fn mutate<R: Rng + ?Sized>(
        &self,
        op: MutationOp,
        vocabulary: &TreeVocabulary,
        rng: &mut R,
    ) -> Self {
        let paths = self.parent_paths();
        let mut next = self.clone();
        if let Some(path) = paths.choose(rng)
            && let Some(children) = children_at_mut(&mut next.children, path)
        {
            edit_children(children, op, vocabulary, rng);
        }
        next
    }
}

impl fmt::Display for PatternTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_pattern())
    }
}
