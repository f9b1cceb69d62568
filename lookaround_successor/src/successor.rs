//! Successors and the lookaround obligations attached to them.
//!
//! The AST walker creates one [`Successor`] per branch point, seeds it with
//! the edge leaving that point and attaches the lookahead and lookbehind
//! steps that must hold there. Later, [`SuccessorGraph::resolve`] folds the
//! assertions into the seed:
//!
//! 1. Each lookbehind alternative is intersected with the *original* seed.
//!    All of these contributions are collected side by side and then
//!    canonicalized into pairwise disjoint builders, since every lookbehind
//!    is evaluated at the same position.
//! 2. Lookaheads are folded one after another. Every current builder is
//!    intersected with every alternative of the next lookahead, and the
//!    products become the new working list.
//!
//! Empty intersections are dropped in both phases; that is how branches that
//! can never satisfy their assertions disappear from the automaton.
//!
//! Successors and steps live in one arena per compilation. A step may be
//! referenced by many successors, and each successor is resolved at most
//! once; every later request reads the cached result.

use std::cell::{Cell, OnceCell};

use crate::canonicalize::{canonicalize, CompilationBuffer};
use crate::config::Config;
use crate::transition::{NodeId, TransitionEdge, TransitionSetBuilder};
use crate::{CompileError, CompileResult};

/// A successor ID in a [`SuccessorGraph`]
pub type SuccessorId = usize;

/// A lookaround step ID in a [`SuccessorGraph`]
pub type StepId = usize;

/// Which side of the current position a lookaround step inspects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Folded into every builder after lookbehinds, without canonicalization
    LookAhead,
    /// Intersected with the seed and canonicalized into disjoint builders
    LookBehind,
}

/// A lookaround step attached to a successor, with its direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Obligation {
    pub step: StepId,
    pub direction: Direction,
}

/// One lookaround sub-expression.
///
/// Its alternatives are the branch points at the start of the assertion's
/// body.
#[derive(Debug, Clone)]
pub struct LookaroundStep {
    root: NodeId,
    alternatives: Vec<SuccessorId>,
}

impl LookaroundStep {
    /// The AST node of the assertion itself
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The successors at the start of each alternative of the body
    pub fn alternatives(&self) -> &[SuccessorId] {
        &self.alternatives
    }
}

/// The continuations reachable from one branch point
#[derive(Debug, Default)]
pub struct Successor {
    seed: Option<TransitionSetBuilder>,
    look_aheads: Vec<StepId>,
    look_behinds: Vec<StepId>,
    merged: OnceCell<Vec<TransitionSetBuilder>>,
    in_flight: Cell<bool>,
    merge_count: Cell<usize>,
}

impl Successor {
    /// The builder for the main continuation, once seeded
    pub fn seed(&self) -> Option<&TransitionSetBuilder> {
        self.seed.as_ref()
    }

    /// Lookahead steps in the order they are folded
    pub fn look_aheads(&self) -> &[StepId] {
        &self.look_aheads
    }

    /// Lookbehind steps in the order they are folded
    pub fn look_behinds(&self) -> &[StepId] {
        &self.look_behinds
    }

    /// The resolved transition sets, if `resolve` already ran
    pub fn merged_states(&self) -> Option<&[TransitionSetBuilder]> {
        self.merged.get().map(Vec::as_slice)
    }

    pub fn is_resolved(&self) -> bool {
        self.merged.get().is_some()
    }
}

/// All successors and lookaround steps of one pattern compilation
#[derive(Debug, Default)]
pub struct SuccessorGraph {
    successors: Vec<Successor>,
    steps: Vec<LookaroundStep>,
    config: Config,
}

impl SuccessorGraph {
    /// Create an empty graph with the default [`Config`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty graph that resolves with `config`
    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// The options used by `resolve`
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of successors in the graph
    pub fn len(&self) -> usize {
        self.successors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.successors.is_empty()
    }

    /// Add an unseeded successor
    pub fn new_successor(&mut self) -> SuccessorId {
        let id = self.successors.len();
        self.successors.push(Successor::default());
        id
    }

    /// Add a successor seeded with `initial`
    pub fn new_successor_with(&mut self, initial: TransitionEdge) -> SuccessorId {
        let id = self.successors.len();
        self.successors.push(Successor {
            seed: Some(TransitionSetBuilder::singleton(initial)),
            ..Successor::default()
        });
        id
    }

    /// Set the initial transition of `id`. May only happen once.
    pub fn seed(&mut self, id: SuccessorId, initial: TransitionEdge) -> CompileResult<()> {
        let successor = self.successor_mut(id)?;
        if successor.seed.is_some() {
            return Err(CompileError::AlreadySeeded(id));
        }
        successor.seed = Some(TransitionSetBuilder::singleton(initial));
        Ok(())
    }

    /// Add a lookaround step whose body starts at the given successors
    pub fn new_lookaround(
        &mut self,
        root: NodeId,
        alternatives: Vec<SuccessorId>,
    ) -> CompileResult<StepId> {
        if let Some(&unknown) = alternatives.iter().find(|&&alt| alt >= self.successors.len()) {
            return Err(CompileError::UnknownSuccessor(unknown));
        }
        let id = self.steps.len();
        self.steps.push(LookaroundStep { root, alternatives });
        Ok(id)
    }

    /// Replace the lookahead obligations of `id`
    pub fn set_lookaheads(&mut self, id: SuccessorId, steps: Vec<StepId>) -> CompileResult<()> {
        self.check_steps(&steps)?;
        self.unresolved_mut(id)?.look_aheads = steps;
        Ok(())
    }

    /// Replace the lookbehind obligations of `id`
    pub fn set_lookbehinds(&mut self, id: SuccessorId, steps: Vec<StepId>) -> CompileResult<()> {
        self.check_steps(&steps)?;
        self.unresolved_mut(id)?.look_behinds = steps;
        Ok(())
    }

    /// Append to the lookbehind obligations of `id`
    pub fn add_lookbehinds<I>(&mut self, id: SuccessorId, steps: I) -> CompileResult<()>
    where
        I: IntoIterator<Item = StepId>,
    {
        let steps: Vec<StepId> = steps.into_iter().collect();
        self.check_steps(&steps)?;
        self.unresolved_mut(id)?.look_behinds.extend(steps);
        Ok(())
    }

    pub fn successor(&self, id: SuccessorId) -> Option<&Successor> {
        self.successors.get(id)
    }

    pub fn lookaround(&self, id: StepId) -> Option<&LookaroundStep> {
        self.steps.get(id)
    }

    /// The obligations of `id`: lookbehinds first, then lookaheads, each in
    /// declared order.
    pub fn obligations(&self, id: SuccessorId) -> CompileResult<Vec<Obligation>> {
        let successor = self.get(id)?;
        let behind = successor.look_behinds.iter().map(|&step| Obligation {
            step,
            direction: Direction::LookBehind,
        });
        let ahead = successor.look_aheads.iter().map(|&step| Obligation {
            step,
            direction: Direction::LookAhead,
        });
        Ok(behind.chain(ahead).collect())
    }

    pub fn is_resolved(&self, id: SuccessorId) -> bool {
        self.successors.get(id).map_or(false, Successor::is_resolved)
    }

    /// How many times the merge of `id` actually ran: 0 before the first
    /// `resolve`, 1 afterwards.
    pub fn merge_count(&self, id: SuccessorId) -> usize {
        self.successors.get(id).map_or(0, |s| s.merge_count.get())
    }

    /// The merged transition sets of `id`.
    ///
    /// The first call folds all lookarounds (resolving the lookarounds'
    /// own successors as needed) and caches the result. Later calls return
    /// the cached result.
    pub fn resolve(
        &self,
        id: SuccessorId,
        buffer: &mut CompilationBuffer,
    ) -> CompileResult<&[TransitionSetBuilder]> {
        let successor = self.get(id)?;
        if let Some(merged) = successor.merged.get() {
            return Ok(merged.as_slice());
        }
        if successor.in_flight.replace(true) {
            return Err(CompileError::Cycle(id));
        }
        let result = self.merge_lookarounds(id, successor, buffer);
        successor.in_flight.set(false);
        let merged = result?;

        successor.merge_count.set(successor.merge_count.get() + 1);
        debug!(
            "successor {} resolved: {} look-behinds, {} look-aheads, {} transition sets",
            id,
            successor.look_behinds.len(),
            successor.look_aheads.len(),
            merged.len()
        );
        Ok(successor.merged.get_or_init(|| merged).as_slice())
    }

    fn merge_lookarounds(
        &self,
        id: SuccessorId,
        successor: &Successor,
        buffer: &mut CompilationBuffer,
    ) -> CompileResult<Vec<TransitionSetBuilder>> {
        let seed = successor.seed.as_ref().ok_or(CompileError::Unseeded(id))?;

        let mut merged_states = if successor.look_behinds.is_empty() {
            vec![seed.clone()]
        } else {
            let mut behind = Vec::new();
            for &step in &successor.look_behinds {
                self.add_all_intersecting(seed, step, &mut behind, buffer)?;
            }
            canonicalize(&behind, buffer)
        };

        let mut next_states = Vec::new();
        for &step in &successor.look_aheads {
            for state in &merged_states {
                self.add_all_intersecting(state, step, &mut next_states, buffer)?;
            }
            std::mem::swap(&mut merged_states, &mut next_states);
            next_states.clear();
        }

        if self.config.get_canonicalize_lookaheads() && !successor.look_aheads.is_empty() {
            merged_states = canonicalize(&merged_states, buffer);
        }
        Ok(merged_states)
    }

    /// Push `state` merged with every resolved alternative of `step` whose
    /// matcher overlaps it.
    fn add_all_intersecting(
        &self,
        state: &TransitionSetBuilder,
        step: StepId,
        result: &mut Vec<TransitionSetBuilder>,
        buffer: &mut CompilationBuffer,
    ) -> CompileResult<()> {
        let lookaround = self.steps.get(step).ok_or(CompileError::UnknownStep(step))?;
        for &alternative in &lookaround.alternatives {
            for other in self.resolve(alternative, buffer)? {
                let intersection = state.matcher().intersect(other.matcher());
                if !intersection.is_empty() {
                    result.push(state.merge_with(other, intersection));
                }
            }
        }
        Ok(())
    }

    fn get(&self, id: SuccessorId) -> CompileResult<&Successor> {
        self.successors.get(id).ok_or(CompileError::UnknownSuccessor(id))
    }

    fn successor_mut(&mut self, id: SuccessorId) -> CompileResult<&mut Successor> {
        self.successors.get_mut(id).ok_or(CompileError::UnknownSuccessor(id))
    }

    fn unresolved_mut(&mut self, id: SuccessorId) -> CompileResult<&mut Successor> {
        let successor = self.successor_mut(id)?;
        if successor.is_resolved() {
            return Err(CompileError::ObligationsFrozen(id));
        }
        Ok(successor)
    }

    fn check_steps(&self, steps: &[StepId]) -> CompileResult<()> {
        match steps.iter().find(|&&step| step >= self.steps.len()) {
            Some(&unknown) => Err(CompileError::UnknownStep(unknown)),
            None => Ok(()),
        }
    }
}
