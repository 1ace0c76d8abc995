//! Terminal outcomes of a convergence poll

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a poll for an expected remote state ended.
///
/// `GaveUp` and `Cancelled` are not failures: the resource may still
/// converge after the poll stops watching it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PollOutcome<S, E> {
    /// The fetched state matched the expected state.
    Converged(S),
    /// The backoff saturated or the attempt budget ran out first.
    GaveUp,
    /// The caller cancelled the poll.
    Cancelled,
    /// A fetch failed; polling stopped without retrying.
    Failed(E),
}

impl<S, E> PollOutcome<S, E> {
    /// True for [`PollOutcome::Converged`].
    pub fn is_converged(&self) -> bool {
        matches!(self, Self::Converged(_))
    }

    /// The converged state, if any.
    pub fn converged(self) -> Option<S> {
        match self {
            Self::Converged(state) => Some(state),
            _ => None,
        }
    }

    /// Short label used in logs and presentation.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Converged(_) => "converged",
            Self::GaveUp => "gave-up",
            Self::Cancelled => "cancelled",
            Self::Failed(_) => "failed",
        }
    }

    /// Map the error type, keeping every other variant.
    pub fn map_err<F, E2>(self, f: F) -> PollOutcome<S, E2>
    where
        F: FnOnce(E) -> E2,
    {
        match self {
            Self::Converged(state) => PollOutcome::Converged(state),
            Self::GaveUp => PollOutcome::GaveUp,
            Self::Cancelled => PollOutcome::Cancelled,
            Self::Failed(err) => PollOutcome::Failed(f(err)),
        }
    }
}

impl<S: fmt::Display, E: fmt::Display> fmt::Display for PollOutcome<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Converged(state) => write!(f, "converged to {state}"),
            Self::GaveUp => write!(f, "gave up waiting"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Failed(err) => write!(f, "failed: {err}"),
        }
    }
}
