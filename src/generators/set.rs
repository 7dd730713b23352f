//! Collections of unique values.
//!
//! [`set`] and its variants produce `Vec`s in which no two elements are equal
//! under a comparator, keeping the first occurrence of every value in generation
//! order. Duplicates are removed on every generated and every shrunk candidate.
//!
//! The six accepted argument shapes are the variants of [`SetArgs`]; they
//! resolve into a [`SetConfig`] with named optional fields, which in turn
//! resolves into a [`ResolvedSet`].

use std::fmt;
use std::sync::Arc;

use proptest::strategy::{NewTree, Strategy, ValueTree};
use proptest::test_runner::TestRunner;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::array::{ArrayStrategy, ArrayValueTree, array_of};
use super::filter::{Acceptance, DEFAULT_MAX_ATTEMPTS, RejectExt, Rejecting, RejectingValueTree};
use super::unique::{Compare, UniqueFilter, build_compare_filter, default_compare};

/// Length bounds and retry budget for a set strategy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LengthBounds {
    /// Minimum length; unspecified means 0.
    pub min_length: Option<usize>,
    /// Maximum raw length; unspecified defers to the array engine default.
    pub max_length: Option<usize>,
    /// Draws allowed before generation fails when `min_length` is positive.
    pub max_attempts: usize,
}

impl Default for LengthBounds {
    fn default() -> Self {
        Self {
            min_length: None,
            max_length: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl LengthBounds {
    /// Set minimum length.
    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = Some(min_length);
        self
    }

    /// Set maximum length.
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Set retry budget.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }
}

/// The legal argument shapes of the set combinator.
pub enum SetArgs<T> {
    /// No bounds, default equality.
    Unbounded,
    /// Maximum length only.
    Max(usize),
    /// Minimum and maximum length; `None` leaves a bound unspecified.
    MinMax(Option<usize>, Option<usize>),
    /// Comparator only.
    Compare(Compare<T>),
    /// Maximum length and comparator.
    MaxCompare(usize, Compare<T>),
    /// Minimum length, maximum length and comparator.
    MinMaxCompare(Option<usize>, Option<usize>, Compare<T>),
}

impl<T> SetArgs<T> {
    /// Comparator-only shape.
    pub fn compare<F>(compare: F) -> Self
    where
        F: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        Self::Compare(Arc::new(compare))
    }

    /// Maximum length and comparator.
    pub fn max_compare<F>(max_length: usize, compare: F) -> Self
    where
        F: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        Self::MaxCompare(max_length, Arc::new(compare))
    }

    /// Both bounds and comparator.
    pub fn min_max_compare<F>(min_length: usize, max_length: usize, compare: F) -> Self
    where
        F: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        Self::MinMaxCompare(Some(min_length), Some(max_length), Arc::new(compare))
    }
}

impl<T> fmt::Debug for SetArgs<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbounded => f.write_str("Unbounded"),
            Self::Max(max) => f.debug_tuple("Max").field(max).finish(),
            Self::MinMax(min, max) => f.debug_tuple("MinMax").field(min).field(max).finish(),
            Self::Compare(_) => f.write_str("Compare(..)"),
            Self::MaxCompare(max, _) => f.debug_tuple("MaxCompare").field(max).finish_non_exhaustive(),
            Self::MinMaxCompare(min, max, _) => f
                .debug_tuple("MinMaxCompare")
                .field(min)
                .field(max)
                .finish_non_exhaustive(),
        }
    }
}

impl<T> From<usize> for SetArgs<T> {
    fn from(max_length: usize) -> Self {
        Self::Max(max_length)
    }
}

impl<T> From<(usize, usize)> for SetArgs<T> {
    fn from((min_length, max_length): (usize, usize)) -> Self {
        Self::MinMax(Some(min_length), Some(max_length))
    }
}

impl<T> From<(Option<usize>, Option<usize>)> for SetArgs<T> {
    fn from((min_length, max_length): (Option<usize>, Option<usize>)) -> Self {
        Self::MinMax(min_length, max_length)
    }
}

impl<T> From<Compare<T>> for SetArgs<T> {
    fn from(compare: Compare<T>) -> Self {
        Self::Compare(compare)
    }
}

/// Named-field configuration of a set strategy.
pub struct SetConfig<T> {
    /// Length bounds and retry budget.
    pub bounds: LengthBounds,
    /// Comparator; `None` means exact equality.
    pub compare: Option<Compare<T>>,
}

impl<T> Default for SetConfig<T> {
    fn default() -> Self {
        Self {
            bounds: LengthBounds::default(),
            compare: None,
        }
    }
}

impl<T> Clone for SetConfig<T> {
    fn clone(&self) -> Self {
        Self {
            bounds: self.bounds,
            compare: self.compare.clone(),
        }
    }
}

impl<T> fmt::Debug for SetConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetConfig")
            .field("bounds", &self.bounds)
            .field("compare", &self.compare.as_ref().map(|_| ".."))
            .finish()
    }
}

impl<T> SetConfig<T> {
    /// Set minimum length.
    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.bounds = self.bounds.with_min_length(min_length);
        self
    }

    /// Set maximum length.
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.bounds = self.bounds.with_max_length(max_length);
        self
    }

    /// Set retry budget.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.bounds = self.bounds.with_max_attempts(max_attempts);
        self
    }

    /// Set comparator.
    pub fn with_compare<F>(mut self, compare: F) -> Self
    where
        F: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        self.compare = Some(Arc::new(compare));
        self
    }

    /// Resolve into canonical form, defaulting to exact equality.
    pub fn resolve(self) -> Result<ResolvedSet<T>, SetError>
    where
        T: PartialEq + 'static,
    {
        self.resolve_or_else(default_compare)
    }

    /// Resolve into canonical form, calling `default` when no comparator is set.
    pub fn resolve_or_else(
        self,
        default: impl FnOnce() -> Compare<T>,
    ) -> Result<ResolvedSet<T>, SetError> {
        let LengthBounds {
            min_length,
            max_length,
            max_attempts,
        } = self.bounds;
        let min_length = min_length.unwrap_or(0);

        if let Some(max_length) = max_length {
            if min_length > max_length {
                return Err(SetError::InvertedBounds {
                    min_length,
                    max_length,
                });
            }
        }
        if max_attempts == 0 {
            return Err(SetError::ZeroAttempts);
        }

        Ok(ResolvedSet {
            min_length,
            max_length,
            compare: self.compare.unwrap_or_else(default),
            max_attempts,
        })
    }
}

impl<T> From<SetArgs<T>> for SetConfig<T> {
    fn from(args: SetArgs<T>) -> Self {
        let (min_length, max_length, compare) = match args {
            SetArgs::Unbounded => (None, None, None),
            SetArgs::Max(max) => (None, Some(max), None),
            SetArgs::MinMax(min, max) => (min, max, None),
            SetArgs::Compare(compare) => (None, None, Some(compare)),
            SetArgs::MaxCompare(max, compare) => (None, Some(max), Some(compare)),
            SetArgs::MinMaxCompare(min, max, compare) => (min, max, Some(compare)),
        };
        Self {
            bounds: LengthBounds {
                min_length,
                max_length,
                ..LengthBounds::default()
            },
            compare,
        }
    }
}

impl<T> From<LengthBounds> for SetConfig<T> {
    fn from(bounds: LengthBounds) -> Self {
        Self {
            bounds,
            compare: None,
        }
    }
}

impl<T> From<usize> for SetConfig<T> {
    fn from(max_length: usize) -> Self {
        SetArgs::from(max_length).into()
    }
}

impl<T> From<(usize, usize)> for SetConfig<T> {
    fn from(bounds: (usize, usize)) -> Self {
        SetArgs::from(bounds).into()
    }
}

impl<T> From<(Option<usize>, Option<usize>)> for SetConfig<T> {
    fn from(bounds: (Option<usize>, Option<usize>)) -> Self {
        SetArgs::from(bounds).into()
    }
}

impl<T> From<Compare<T>> for SetConfig<T> {
    fn from(compare: Compare<T>) -> Self {
        SetArgs::from(compare).into()
    }
}

/// Canonical configuration, fixed once per strategy.
pub struct ResolvedSet<T> {
    min_length: usize,
    max_length: Option<usize>,
    compare: Compare<T>,
    max_attempts: usize,
}

impl<T> ResolvedSet<T> {
    /// Minimum length after removing duplicates.
    pub fn min_length(&self) -> usize {
        self.min_length
    }

    /// Maximum raw length, `None` when left to the array engine.
    pub fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    /// Comparator deciding duplicates.
    pub fn compare(&self) -> &Compare<T> {
        &self.compare
    }

    /// Retry budget for the minimum-length guard.
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }
}

impl<T> fmt::Debug for ResolvedSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedSet")
            .field("min_length", &self.min_length)
            .field("max_length", &self.max_length)
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}

/// Set configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SetError {
    /// Minimum length above maximum length.
    #[error("min_length {min_length} exceeds max_length {max_length}")]
    InvertedBounds {
        /// Resolved minimum.
        min_length: usize,
        /// Resolved maximum.
        max_length: usize,
    },
    /// A zero retry budget can never produce a value.
    #[error("max_attempts must be at least 1")]
    ZeroAttempts,
}

/// Accepts arrays holding at least this many elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinLength(
    /// Minimum element count.
    pub usize,
);

impl<T> Acceptance<Vec<T>> for MinLength {
    fn accepts(&self, value: &Vec<T>) -> bool {
        value.len() >= self.0
    }
}

type UniqueArray<S> = ArrayStrategy<S, UniqueFilter<<S as Strategy>::Value>>;
type UniqueArrayTree<V> = ArrayValueTree<V, UniqueFilter<<V as ValueTree>::Value>>;

/// Strategy producing `Vec`s of unique values.
///
/// Created by [`set`], [`set_with`], [`try_set_with`] and [`set_by`].
#[derive(Debug)]
pub enum SetStrategy<S: Strategy> {
    /// Zero minimum length: the filtered array is used as is.
    Unguarded(UniqueArray<S>),
    /// Positive minimum length: arrays left too short are redrawn.
    Guarded(Rejecting<UniqueArray<S>, MinLength>),
}

impl<S: Strategy + Clone> Clone for SetStrategy<S> {
    fn clone(&self) -> Self {
        match self {
            Self::Unguarded(strategy) => Self::Unguarded(strategy.clone()),
            Self::Guarded(strategy) => Self::Guarded(strategy.clone()),
        }
    }
}

/// `ValueTree` for [`SetStrategy`].
pub enum SetValueTree<V: ValueTree> {
    /// See [`SetStrategy::Unguarded`].
    Unguarded(UniqueArrayTree<V>),
    /// See [`SetStrategy::Guarded`].
    Guarded(RejectingValueTree<UniqueArrayTree<V>, MinLength>),
}

impl<V> fmt::Debug for SetValueTree<V>
where
    V: ValueTree + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unguarded(tree) => f.debug_tuple("Unguarded").field(tree).finish(),
            Self::Guarded(tree) => f.debug_tuple("Guarded").field(tree).finish(),
        }
    }
}

impl<S> Strategy for SetStrategy<S>
where
    S: Strategy,
    S::Value: Clone,
{
    type Tree = SetValueTree<S::Tree>;
    type Value = Vec<S::Value>;

    fn new_tree(&self, runner: &mut TestRunner) -> NewTree<Self> {
        match self {
            Self::Unguarded(strategy) => strategy.new_tree(runner).map(SetValueTree::Unguarded),
            Self::Guarded(strategy) => strategy.new_tree(runner).map(SetValueTree::Guarded),
        }
    }
}

impl<V> ValueTree for SetValueTree<V>
where
    V: ValueTree,
    V::Value: Clone,
{
    type Value = Vec<V::Value>;

    fn current(&self) -> Vec<V::Value> {
        match self {
            Self::Unguarded(tree) => tree.current(),
            Self::Guarded(tree) => tree.current(),
        }
    }

    fn simplify(&mut self) -> bool {
        match self {
            Self::Unguarded(tree) => tree.simplify(),
            Self::Guarded(tree) => tree.simplify(),
        }
    }

    fn complicate(&mut self) -> bool {
        match self {
            Self::Unguarded(tree) => tree.complicate(),
            Self::Guarded(tree) => tree.complicate(),
        }
    }
}

/// Wire a resolved configuration into the array engine.
pub fn from_resolved<S>(element: S, resolved: ResolvedSet<S::Value>) -> SetStrategy<S>
where
    S: Strategy,
    S::Value: Clone,
{
    let ResolvedSet {
        min_length,
        max_length,
        compare,
        max_attempts,
    } = resolved;
    let array = array_of(element, min_length, max_length, build_compare_filter(compare));
    if min_length == 0 {
        return SetStrategy::Unguarded(array);
    }

    SetStrategy::Guarded(array.reject_unless(
        format!("fewer than {min_length} unique elements"),
        max_attempts,
        MinLength(min_length),
    ))
}

/// Generate `Vec`s of values from `element` with no two equal.
///
/// ```rust
/// use kitchensink_unique::generators::set::set;
/// use proptest::prelude::*;
///
/// proptest!(|(values in set(0u8..16))| {
///     let mut sorted = values.clone();
///     sorted.sort_unstable();
///     sorted.dedup();
///     prop_assert_eq!(sorted.len(), values.len());
/// });
/// ```
pub fn set<S>(element: S) -> SetStrategy<S>
where
    S: Strategy,
    S::Value: Clone + PartialEq + 'static,
{
    set_with(element, SetArgs::Unbounded)
}

/// Generate unique `Vec`s using any accepted argument shape.
///
/// # Panics
///
/// Panics if the configuration does not resolve; see [`try_set_with`].
pub fn set_with<S>(element: S, args: impl Into<SetConfig<S::Value>>) -> SetStrategy<S>
where
    S: Strategy,
    S::Value: Clone + PartialEq + 'static,
{
    try_set_with(element, args).unwrap_or_else(|err| panic!("invalid set configuration: {err}"))
}

/// Generate unique `Vec`s, reporting configuration errors.
pub fn try_set_with<S>(
    element: S,
    args: impl Into<SetConfig<S::Value>>,
) -> Result<SetStrategy<S>, SetError>
where
    S: Strategy,
    S::Value: Clone + PartialEq + 'static,
{
    let resolved = args.into().resolve()?;
    Ok(from_resolved(element, resolved))
}

/// Generate unique `Vec`s under `compare`, for values without `PartialEq`.
pub fn set_by<S, F>(element: S, bounds: LengthBounds, compare: F) -> Result<SetStrategy<S>, SetError>
where
    S: Strategy,
    S::Value: Clone,
    F: Fn(&S::Value, &S::Value) -> bool + Send + Sync + 'static,
{
    let compare: Compare<S::Value> = Arc::new(compare);
    let resolved = SetConfig::from(bounds).resolve_or_else(|| compare)?;
    Ok(from_resolved(element, resolved))
}
