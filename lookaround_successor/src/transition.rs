use crate::charset::CharSet;

/// An AST node ID, assigned by the parser
pub type NodeId = usize;

/// What an AST node is, as far as transition matching is concerned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// A character class leaf; consumes one symbol from its set
    CharacterClass(CharSet),
    /// Entry or exit of a group
    Group,
    /// `^`, `$`, word boundaries and similar zero-width anchors
    PositionAssertion,
    /// The final state of the pattern (or of a lookaround body)
    MatchFound,
}

/// The target of a transition: an AST node and its kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AstNode {
    pub id: NodeId,
    pub kind: NodeKind,
}

impl AstNode {
    pub fn new(id: NodeId, kind: NodeKind) -> Self {
        Self { id, kind }
    }

    /// A character class leaf matching `class`
    pub fn class(id: NodeId, class: CharSet) -> Self {
        Self::new(id, NodeKind::CharacterClass(class))
    }

    /// The set of symbols a transition into this node accepts.
    ///
    /// Only character classes restrict input; structural nodes accept
    /// everything.
    pub fn matcher(&self) -> CharSet {
        match &self.kind {
            NodeKind::CharacterClass(class) => class.clone(),
            NodeKind::Group | NodeKind::PositionAssertion | NodeKind::MatchFound => CharSet::full(),
        }
    }
}

/// One AST-derived edge from a branch point to a target node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionEdge {
    source: NodeId,
    target: AstNode,
}

impl TransitionEdge {
    pub fn new(source: NodeId, target: AstNode) -> Self {
        Self { source, target }
    }

    pub fn source(&self) -> NodeId {
        self.source
    }

    pub fn target(&self) -> &AstNode {
        &self.target
    }

    pub fn matcher(&self) -> CharSet {
        self.target.matcher()
    }
}

/// An ordered list of transitions.
///
/// Duplicates are kept: each entry is a distinct reachable AST position, and
/// the order is alternation priority.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionSet {
    transitions: Vec<TransitionEdge>,
}

impl TransitionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(edge: TransitionEdge) -> Self {
        Self {
            transitions: vec![edge],
        }
    }

    pub fn push(&mut self, edge: TransitionEdge) {
        self.transitions.push(edge);
    }

    pub fn extend_from(&mut self, other: &TransitionSet) {
        self.transitions.extend_from_slice(&other.transitions);
    }

    /// `self` followed by `other`
    pub fn concat(&self, other: &TransitionSet) -> TransitionSet {
        let mut transitions = Vec::with_capacity(self.len() + other.len());
        transitions.extend_from_slice(&self.transitions);
        transitions.extend_from_slice(&other.transitions);
        Self { transitions }
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TransitionEdge> {
        self.transitions.iter()
    }

    /// Target node IDs in order
    pub fn targets(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.transitions.iter().map(|edge| edge.target.id)
    }

    pub fn as_slice(&self) -> &[TransitionEdge] {
        &self.transitions
    }
}

impl<'a> IntoIterator for &'a TransitionSet {
    type Item = &'a TransitionEdge;
    type IntoIter = std::slice::Iter<'a, TransitionEdge>;

    fn into_iter(self) -> Self::IntoIter {
        self.transitions.iter()
    }
}

impl FromIterator<TransitionEdge> for TransitionSet {
    fn from_iter<I: IntoIterator<Item = TransitionEdge>>(iter: I) -> Self {
        Self {
            transitions: iter.into_iter().collect(),
        }
    }
}

/// A transition set together with the character set it applies under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionSetBuilder {
    matcher: CharSet,
    transitions: TransitionSet,
}

impl TransitionSetBuilder {
    pub fn new(matcher: CharSet, transitions: TransitionSet) -> Self {
        Self {
            matcher,
            transitions,
        }
    }

    /// A builder holding just `edge`, under the edge's own matcher
    pub fn singleton(edge: TransitionEdge) -> Self {
        Self {
            matcher: edge.matcher(),
            transitions: TransitionSet::single(edge),
        }
    }

    /// Combine `self` and `other` under an already computed `intersection` of
    /// their matchers. Transitions of `self` come first. Neither operand is
    /// modified.
    pub fn merge_with(&self, other: &TransitionSetBuilder, intersection: CharSet) -> Self {
        Self {
            matcher: intersection,
            transitions: self.transitions.concat(&other.transitions),
        }
    }

    pub fn matcher(&self) -> &CharSet {
        &self.matcher
    }

    pub fn transitions(&self) -> &TransitionSet {
        &self.transitions
    }

    pub fn into_parts(self) -> (CharSet, TransitionSet) {
        (self.matcher, self.transitions)
    }
}

impl std::fmt::Display for TransitionSetBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ->", self.matcher)?;
        for edge in &self.transitions {
            write!(f, " {}:{}", edge.source, edge.target.id)?;
        }
        Ok(())
    }
}
