//! The boundary between the search engine and whatever scores its states.

use std::fmt::Debug;
use std::hash::Hash;

/// One proposed successor of an evaluated state.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<M, S> {
    /// Identifier of the transition; unique within one evaluation.
    pub mv: M,
    /// Relative weight used by the exploration term. Must be finite.
    pub prior: f64,
    pub state: S,
}

impl<M, S> Candidate<M, S> {
    pub fn new(mv: M, prior: f64, state: S) -> Self {
        Self { mv, prior, state }
    }
}

/// Result of a single oracle call.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation<M, S, C> {
    /// Successors in the order they should be attached (and tie-broken).
    pub candidates: Vec<Candidate<M, S>>,
    /// Scalar value estimate of the evaluated state. Must be finite.
    pub value: f64,
    /// Token to hand back on the next call.
    pub continuation: C,
}

/// A scoring capability consulted once per search iteration.
///
/// The engine never inspects states, moves, or continuations beyond the bounds
/// below. The continuation is moved into each call and returned with the
/// evaluation, so the oracle can carry cached work from one call to the next.
pub trait Oracle {
    type State;
    type Move: Clone + Eq + Hash + Debug;
    type Continuation;
    type Error: std::error::Error + Send + Sync + 'static;

    fn evaluate(
        &mut self,
        state: &Self::State,
        continuation: Self::Continuation,
    ) -> Result<Evaluation<Self::Move, Self::State, Self::Continuation>, Self::Error>;
}
