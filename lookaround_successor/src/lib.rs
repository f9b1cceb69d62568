//! Lookaround-aware successor merging for a regex NFA compiler
//!
//! Lookahead and lookbehind assertions do not consume input, so they cannot
//! become ordinary automaton edges. This crate resolves them at compile time:
//! every branch point of the pattern's AST gets a [`Successor`], and resolving
//! it intersects the character sets reachable from the main continuation with
//! the character sets reachable from every attached assertion, recursively.
//!
//! The result of [`SuccessorGraph::resolve`] is a list of
//! [`TransitionSetBuilder`]s, each pairing a [`CharSet`] with the AST
//! positions reachable under it. Branches whose intersection is empty are
//! pruned. Lookbehind contributions are canonicalized into pairwise disjoint
//! character sets before lookaheads are folded in.
//!
//! ```
//! use lookaround_successor::{AstNode, CharSet, CompilationBuffer, SuccessorGraph, TransitionEdge};
//!
//! let mut graph = SuccessorGraph::new();
//! let main = graph.new_successor_with(TransitionEdge::new(0, AstNode::class(1, CharSet::range('a', 'z'))));
//! let inner = graph.new_successor_with(TransitionEdge::new(2, AstNode::class(3, CharSet::range('a', 'a'))));
//! let ahead = graph.new_lookaround(2, vec![inner]).unwrap();
//! graph.set_lookaheads(main, vec![ahead]).unwrap();
//!
//! let mut buffer = CompilationBuffer::new();
//! let states = graph.resolve(main, &mut buffer).unwrap();
//! assert_eq!(states.len(), 1);
//! assert_eq!(states[0].matcher(), &CharSet::range('a', 'a'));
//! ```

#[macro_use]
mod macros;

pub mod canonicalize;
pub mod charset;
pub mod config;
pub mod successor;
pub mod transition;

pub use canonicalize::{canonicalize, CompilationBuffer};
pub use charset::CharSet;
pub use config::Config;
pub use successor::{Direction, LookaroundStep, Obligation, StepId, Successor, SuccessorGraph, SuccessorId};
pub use transition::{AstNode, NodeId, NodeKind, TransitionEdge, TransitionSet, TransitionSetBuilder};

/// The result of building or resolving a successor graph
pub type CompileResult<T> = Result<T, CompileError>;

/// Internal invariant violations detected while merging lookarounds.
///
/// None of these describe a problem with the user's pattern. Each one means
/// the AST walker drove the successor graph in an order it does not support,
/// and the compilation must be abandoned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// `resolve` was called on a successor that was never seeded
    Unseeded(SuccessorId),
    /// `seed` was called twice on the same successor
    AlreadySeeded(SuccessorId),
    /// Obligations were changed after the successor was resolved
    ObligationsFrozen(SuccessorId),
    /// A successor was reached again while its own resolution was in flight
    Cycle(SuccessorId),
    /// The id does not name a successor in this graph
    UnknownSuccessor(SuccessorId),
    /// The id does not name a lookaround step in this graph
    UnknownStep(StepId),
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileError::Unseeded(id) => write!(f, "successor {} resolved before it was seeded", id),
            CompileError::AlreadySeeded(id) => write!(f, "successor {} was seeded twice", id),
            CompileError::ObligationsFrozen(id) => {
                write!(f, "lookarounds of successor {} changed after resolution", id)
            }
            CompileError::Cycle(id) => write!(f, "successor {} depends on its own resolution", id),
            CompileError::UnknownSuccessor(id) => write!(f, "unknown successor {}", id),
            CompileError::UnknownStep(id) => write!(f, "unknown lookaround step {}", id),
        }
    }
}

impl std::error::Error for CompileError {}
