//! Bounded rejection sampling for any strategy.
//!
//! `prop_filter` retries until the runner's global reject budget runs out. The
//! strategies here carry their own attempt budget and report exhaustion as a
//! distinct failure, while still counting each rejection against the runner.

use std::fmt;
use std::sync::Arc;

use proptest::strategy::{NewTree, Strategy, ValueTree};
use proptest::test_runner::{Reason, TestRunner};
use thiserror::Error;

/// Default number of draws before giving up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 1000;

/// Predicate deciding whether a generated value is acceptable.
pub trait Acceptance<T> {
    /// True if `value` may be produced.
    fn accepts(&self, value: &T) -> bool;
}

impl<T, F> Acceptance<T> for F
where
    F: Fn(&T) -> bool,
{
    fn accepts(&self, value: &T) -> bool {
        self(value)
    }
}

/// No acceptable value was drawn within the attempt budget.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("generation exhausted after {attempts} attempts: {whence}")]
pub struct GenerationExhausted {
    /// Description of the rejecting predicate.
    pub whence: String,
    /// Number of draws made.
    pub attempts: usize,
}

impl From<GenerationExhausted> for Reason {
    fn from(err: GenerationExhausted) -> Self {
        Reason::from(err.to_string())
    }
}

/// Strategy that redraws from `source` until `predicate` accepts.
///
/// Created by [`RejectExt::reject_unless`].
pub struct Rejecting<S, P> {
    source: S,
    whence: String,
    max_attempts: usize,
    predicate: Arc<P>,
}

impl<S, P> Rejecting<S, P> {
    /// Attempt budget per generated value.
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// The wrapped strategy.
    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S: Clone, P> Clone for Rejecting<S, P> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            whence: self.whence.clone(),
            max_attempts: self.max_attempts,
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<S: fmt::Debug, P> fmt::Debug for Rejecting<S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rejecting")
            .field("source", &self.source)
            .field("whence", &self.whence)
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}

impl<S, P> Strategy for Rejecting<S, P>
where
    S: Strategy,
    P: Acceptance<S::Value>,
{
    type Tree = RejectingValueTree<S::Tree, P>;
    type Value = S::Value;

    fn new_tree(&self, runner: &mut TestRunner) -> NewTree<Self> {
        for attempt in 1..=self.max_attempts {
            let source = self.source.new_tree(runner)?;
            if self.predicate.accepts(&source.current()) {
                if attempt > 1 {
                    tracing::debug!(whence = %self.whence, attempt, "accepted value after rejections");
                }
                return Ok(RejectingValueTree {
                    source,
                    predicate: Arc::clone(&self.predicate),
                });
            }
            tracing::trace!(whence = %self.whence, attempt, "rejected generated value");
            runner.reject_local(self.whence.clone())?;
        }

        tracing::warn!(
            whence = %self.whence,
            attempts = self.max_attempts,
            "generation exhausted"
        );
        Err(GenerationExhausted {
            whence: self.whence.clone(),
            attempts: self.max_attempts,
        }
        .into())
    }
}

/// `ValueTree` for [`Rejecting`].
///
/// A shrink step landing on an unacceptable value is complicated back until the
/// value is acceptable again; a step that cannot be restored is skipped.
pub struct RejectingValueTree<V, P> {
    source: V,
    predicate: Arc<P>,
}

impl<V, P> RejectingValueTree<V, P>
where
    V: ValueTree,
    P: Acceptance<V::Value>,
{
    fn ensure_acceptable(&mut self) -> bool {
        while !self.predicate.accepts(&self.source.current()) {
            if !self.source.complicate() {
                return false;
            }
        }
        true
    }
}

impl<V, P> ValueTree for RejectingValueTree<V, P>
where
    V: ValueTree,
    P: Acceptance<V::Value>,
{
    type Value = V::Value;

    fn current(&self) -> V::Value {
        self.source.current()
    }

    fn simplify(&mut self) -> bool {
        while self.source.simplify() {
            if self.ensure_acceptable() {
                return true;
            }
        }
        false
    }

    fn complicate(&mut self) -> bool {
        self.source.complicate() && self.ensure_acceptable()
    }
}

impl<V: fmt::Debug, P> fmt::Debug for RejectingValueTree<V, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RejectingValueTree")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

/// Bounded rejection sampling on any strategy.
pub trait RejectExt: Strategy + Sized {
    /// Redraw up to `max_attempts` times until `predicate` accepts the value.
    ///
    /// ```rust
    /// use kitchensink_unique::generators::filter::RejectExt;
    /// use proptest::prelude::*;
    ///
    /// let evens = (0u32..100).reject_unless("even", 64, |v: &u32| v % 2 == 0);
    /// # let _ = evens;
    /// ```
    fn reject_unless<P>(
        self,
        whence: impl Into<String>,
        max_attempts: usize,
        predicate: P,
    ) -> Rejecting<Self, P>
    where
        P: Acceptance<Self::Value>,
    {
        Rejecting {
            source: self,
            whence: whence.into(),
            max_attempts,
            predicate: Arc::new(predicate),
        }
    }
}

impl<S: Strategy> RejectExt for S {}
