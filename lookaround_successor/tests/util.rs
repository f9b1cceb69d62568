use lookaround_successor::{
    AstNode, CharSet, NodeId, StepId, SuccessorGraph, SuccessorId, TransitionEdge,
    TransitionSetBuilder,
};
use quickcheck::{Arbitrary, Gen};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn class_edge(source: NodeId, target: NodeId, class: CharSet) -> TransitionEdge {
    TransitionEdge::new(source, AstNode::class(target, class))
}

/// Add a lookaround step whose alternatives are character class leaves.
pub fn class_step(
    graph: &mut SuccessorGraph,
    root: NodeId,
    classes: &[(NodeId, CharSet)],
) -> anyhow::Result<(StepId, Vec<SuccessorId>)> {
    let alternatives: Vec<SuccessorId> = classes
        .iter()
        .map(|(target, class)| graph.new_successor_with(class_edge(root, *target, class.clone())))
        .collect();
    let step = graph.new_lookaround(root, alternatives.clone())?;
    Ok((step, alternatives))
}

pub fn targets(builder: &TransitionSetBuilder) -> Vec<NodeId> {
    builder.transitions().targets().collect()
}

/// Map an arbitrary byte onto a lowercase ASCII letter.
pub fn letter(byte: u8) -> char {
    char::from(b'a' + byte % 26)
}

pub fn letter_range((lo, hi): (u8, u8)) -> CharSet {
    CharSet::range(letter(lo), letter(hi))
}

pub fn union(sets: impl IntoIterator<Item = CharSet>) -> CharSet {
    sets.into_iter().fold(CharSet::empty(), |acc, set| acc.union(&set))
}

/// True when both sets hold the same scalar values, regardless of how their
/// ranges are laid out.
pub fn same_symbols(a: &CharSet, b: &CharSet) -> bool {
    a.difference(b).is_empty() && b.difference(a).is_empty()
}

/// Scalar values next to the edges of the code space and the surrogate gap.
const EDGES: [char; 8] = [
    '\0',
    '\u{1}',
    '\u{D7FE}',
    '\u{D7FF}',
    '\u{E000}',
    '\u{E001}',
    '\u{10FFFE}',
    char::MAX,
];

/// Any scalar value, picked from `EDGES` half of the time.
#[derive(Clone, Copy, Debug)]
pub struct Scalar(pub char);

impl Arbitrary for Scalar {
    fn arbitrary(g: &mut Gen) -> Self {
        if bool::arbitrary(g) {
            Scalar(*g.choose(&EDGES).unwrap_or(&'\0'))
        } else {
            Scalar(char::arbitrary(g))
        }
    }
}

/// An inclusive range between two arbitrary scalar values
#[derive(Clone, Copy, Debug)]
pub struct ScalarRange(pub Scalar, pub Scalar);

impl Arbitrary for ScalarRange {
    fn arbitrary(g: &mut Gen) -> Self {
        ScalarRange(Scalar::arbitrary(g), Scalar::arbitrary(g))
    }
}

impl ScalarRange {
    pub fn set(self) -> CharSet {
        CharSet::range(self.0 .0, self.1 .0)
    }
}
