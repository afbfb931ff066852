use thiserror::Error;

use crate::engine::variables::DomainId;

/// The result of invoking a propagator. The propagation can either succeed or identify a reason
/// why the current node of the search tree cannot contain a solution.
pub(crate) type PropagationStatusCP = Result<(), Inconsistency>;

/// Whether a propagator call removed values from at least one domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Narrowing {
    Unchanged,
    Narrowed,
}

/// Signals that a narrowing emptied the domain of a variable.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash)]
#[error("the domain of a variable became empty")]
pub struct EmptyDomain;

/// Signals that a propagator attempted to replace a domain by one which is not a subset of it.
///
/// This never indicates infeasibility; it means the propagator is unsound and the solve must be
/// aborted.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash)]
#[error("attempted to widen the domain of {variable:?}")]
pub struct InvalidNarrowing {
    pub variable: DomainId,
}

/// The ways in which propagation can fail.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash)]
pub enum Inconsistency {
    /// A domain became empty.
    #[error(transparent)]
    EmptyDomain(#[from] EmptyDomain),
    /// A propagator detected that its constraint cannot be satisfied.
    #[error("a constraint cannot be satisfied")]
    Conflict,
    /// 64-bit arithmetic overflowed while reasoning; treated as a conflict for the current node.
    #[error("arithmetic overflow during propagation")]
    Overflow,
    /// A propagator tried to widen a domain.
    #[error(transparent)]
    InvalidNarrowing(#[from] InvalidNarrowing),
}

impl Inconsistency {
    /// Whether the failure only closes the current branch of the search, as opposed to aborting
    /// the solve.
    pub fn is_conflict(&self) -> bool {
        !matches!(self, Inconsistency::InvalidNarrowing(_))
    }
}

/// Shorthand for turning a `None` produced by checked arithmetic into [`Inconsistency::Overflow`].
pub(crate) trait OrOverflow<T> {
    fn or_overflow(self) -> Result<T, Inconsistency>;
}

impl<T> OrOverflow<T> for Option<T> {
    fn or_overflow(self) -> Result<T, Inconsistency> {
        self.ok_or(Inconsistency::Overflow)
    }
}
