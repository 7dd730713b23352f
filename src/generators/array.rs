//! Array strategy whose candidate filter runs on every generated and shrunk value.
//!
//! `proptest::collection::vec` has no hook between the element value trees and the
//! produced `Vec`, so a filter applied with `prop_map` would only see plain values
//! and would lose track of which element each value came from while shrinking.
//! [`ArrayStrategy`] keeps the element trees itself and hands the filter the
//! currently included candidates each time a value is observed.

use std::fmt;

use proptest::strategy::{NewTree, Strategy, ValueTree};
use proptest::test_runner::TestRunner;

/// Upper length bound used when the caller leaves it unspecified.
pub const DEFAULT_MAX_LENGTH: usize = 10;

/// Read-only view of a generated value.
pub trait Candidate {
    /// Wrapped value type.
    type Value;

    /// Borrow the wrapped value.
    fn value(&self) -> &Self::Value;
}

impl<C: Candidate + ?Sized> Candidate for &C {
    type Value = C::Value;

    fn value(&self) -> &C::Value {
        (**self).value()
    }
}

/// A value tree paired with a cached copy of its current value.
///
/// Only the array engine mutates a `Shrinkable`; filters see it through
/// [`Candidate`].
pub struct Shrinkable<V: ValueTree> {
    tree: V,
    value: V::Value,
}

impl<V> Shrinkable<V>
where
    V: ValueTree,
    V::Value: Clone,
{
    /// Wrap a freshly generated value tree.
    pub fn new(tree: V) -> Self {
        let value = tree.current();
        Self { tree, value }
    }

    fn simplify(&mut self) -> bool {
        let changed = self.tree.simplify();
        self.value = self.tree.current();
        changed
    }

    fn complicate(&mut self) -> bool {
        let changed = self.tree.complicate();
        self.value = self.tree.current();
        changed
    }
}

impl<V: ValueTree> Candidate for Shrinkable<V> {
    type Value = V::Value;

    fn value(&self) -> &V::Value {
        &self.value
    }
}

impl<V> fmt::Debug for Shrinkable<V>
where
    V: ValueTree + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shrinkable")
            .field("tree", &self.tree)
            .field("value", &self.value)
            .finish()
    }
}

/// Post-generation transform over the candidates of one array.
///
/// The engine passes a freshly built buffer it does not observe again, so a
/// filter may reorder or truncate it freely.
pub trait ArrayFilter<T> {
    /// Return the candidates that make up the produced array.
    fn filter<C: Candidate<Value = T>>(&self, candidates: Vec<C>) -> Vec<C>;
}

/// Identity filter: every candidate is kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Unfiltered;

impl<T> ArrayFilter<T> for Unfiltered {
    fn filter<C: Candidate<Value = T>>(&self, candidates: Vec<C>) -> Vec<C> {
        candidates
    }
}

/// Strategy producing `Vec`s of `element` values passed through `filter`.
///
/// Created by [`array_of`].
#[derive(Debug, Clone)]
pub struct ArrayStrategy<S, F> {
    element: S,
    min_length: usize,
    max_length: Option<usize>,
    filter: F,
}

/// Generate arrays of `element` values whose raw length lies in
/// `[min_length, max_length]`, filtered by `filter` on every observation.
///
/// An unspecified `max_length` resolves to `max(min_length, DEFAULT_MAX_LENGTH)`.
pub fn array_of<S, F>(
    element: S,
    min_length: usize,
    max_length: Option<usize>,
    filter: F,
) -> ArrayStrategy<S, F>
where
    S: Strategy,
    F: ArrayFilter<S::Value>,
{
    if let Some(max_length) = max_length {
        assert!(max_length >= min_length, "max_length must be >= min_length");
    }
    ArrayStrategy {
        element,
        min_length,
        max_length,
        filter,
    }
}

impl<S, F> ArrayStrategy<S, F> {
    /// Lower bound on the raw length.
    pub fn min_length(&self) -> usize {
        self.min_length
    }

    /// Upper bound on the raw length, with the engine default applied.
    pub fn max_length(&self) -> usize {
        self.max_length
            .unwrap_or_else(|| self.min_length.max(DEFAULT_MAX_LENGTH))
    }

    /// The candidate filter.
    pub fn filter(&self) -> &F {
        &self.filter
    }
}

impl<S, F> Strategy for ArrayStrategy<S, F>
where
    S: Strategy,
    S::Value: Clone,
    F: ArrayFilter<S::Value> + Clone + fmt::Debug,
{
    type Tree = ArrayValueTree<S::Tree, F>;
    type Value = Vec<S::Value>;

    fn new_tree(&self, runner: &mut TestRunner) -> NewTree<Self> {
        let length = (self.min_length..=self.max_length())
            .new_tree(runner)?
            .current();
        let mut elements = Vec::with_capacity(length);
        while elements.len() < length {
            elements.push(Shrinkable::new(self.element.new_tree(runner)?));
        }

        Ok(ArrayValueTree {
            included: vec![true; length],
            elements,
            min_length: self.min_length,
            filter: self.filter.clone(),
            shrink: Shrink::DeleteElement(0),
            prev_shrink: None,
        })
    }
}

#[derive(Clone, Copy, Debug)]
enum Shrink {
    DeleteElement(usize),
    ShrinkElement(usize),
}

/// `ValueTree` for [`ArrayStrategy`].
///
/// Shrinks by deleting elements one at a time (never below the raw minimum
/// length), then by simplifying each remaining element in order. `complicate`
/// undoes the last step.
pub struct ArrayValueTree<V: ValueTree, F> {
    elements: Vec<Shrinkable<V>>,
    included: Vec<bool>,
    min_length: usize,
    filter: F,
    shrink: Shrink,
    prev_shrink: Option<Shrink>,
}

impl<V, F> ArrayValueTree<V, F>
where
    V: ValueTree,
    F: ArrayFilter<V::Value>,
{
    fn kept(&self) -> Vec<&Shrinkable<V>> {
        let scratch: Vec<&Shrinkable<V>> = self
            .elements
            .iter()
            .zip(&self.included)
            .filter(|(_, included)| **included)
            .map(|(element, _)| element)
            .collect();
        self.filter.filter(scratch)
    }

    fn included_count(&self) -> usize {
        self.included.iter().filter(|included| **included).count()
    }
}

impl<V, F> ValueTree for ArrayValueTree<V, F>
where
    V: ValueTree,
    V::Value: Clone,
    F: ArrayFilter<V::Value>,
{
    type Value = Vec<V::Value>;

    fn current(&self) -> Vec<V::Value> {
        self.kept()
            .into_iter()
            .map(|candidate| candidate.value().clone())
            .collect()
    }

    fn simplify(&mut self) -> bool {
        if let Shrink::DeleteElement(ix) = self.shrink {
            if ix >= self.elements.len() || self.included_count() == self.min_length {
                self.shrink = Shrink::ShrinkElement(0);
            } else {
                self.included[ix] = false;
                self.prev_shrink = Some(self.shrink);
                self.shrink = Shrink::DeleteElement(ix + 1);
                return true;
            }
        }

        while let Shrink::ShrinkElement(ix) = self.shrink {
            if ix >= self.elements.len() {
                return false;
            }

            if !self.included[ix] || !self.elements[ix].simplify() {
                self.shrink = Shrink::ShrinkElement(ix + 1);
            } else {
                self.prev_shrink = Some(self.shrink);
                return true;
            }
        }

        false
    }

    fn complicate(&mut self) -> bool {
        match self.prev_shrink {
            None => false,
            Some(Shrink::DeleteElement(ix)) => {
                self.included[ix] = true;
                self.prev_shrink = None;
                true
            }
            Some(Shrink::ShrinkElement(ix)) => {
                if self.elements[ix].complicate() {
                    true
                } else {
                    self.prev_shrink = None;
                    false
                }
            }
        }
    }
}

impl<V, F> fmt::Debug for ArrayValueTree<V, F>
where
    V: ValueTree + fmt::Debug,
    F: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayValueTree")
            .field("elements", &self.elements)
            .field("included", &self.included)
            .field("min_length", &self.min_length)
            .field("filter", &self.filter)
            .field("shrink", &self.shrink)
            .field("prev_shrink", &self.prev_shrink)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use proptest::prop_assert;
    use proptest::test_runner::TestError;

    use super::*;
    use crate::generators::unique::UniqueFilter;
    use crate::law::invariants::{assert_length_within, assert_unique_by};

    #[test]
    fn unfiltered_lengths_stay_in_bounds() {
        let strategy = array_of(0u32..100, 2, Some(6), Unfiltered);
        let mut runner = TestRunner::deterministic();
        for _ in 0..256 {
            let values = strategy.new_tree(&mut runner).unwrap().current();
            assert_length_within(&values, 2, 6);
        }
    }

    #[test]
    fn unspecified_max_uses_engine_default() {
        let strategy = array_of(0u32..100, 0, None, Unfiltered);
        assert_eq!(strategy.max_length(), DEFAULT_MAX_LENGTH);

        let strategy = array_of(0u32..100, 25, None, Unfiltered);
        assert_eq!(strategy.max_length(), 25);
    }

    #[test]
    #[should_panic]
    fn inverted_bounds_are_rejected() {
        let _ = array_of(0u32..100, 5, Some(2), Unfiltered);
    }

    #[test]
    fn filter_runs_on_every_shrink_step() {
        let strategy = array_of(0u8..6, 0, Some(10), UniqueFilter::<u8>::default());
        let mut runner = TestRunner::deterministic();
        for _ in 0..32 {
            let mut tree = strategy.new_tree(&mut runner).unwrap();
            assert_unique_by(&tree.current(), |a, b| a == b);
            while tree.simplify() {
                assert_unique_by(&tree.current(), |a, b| a == b);
            }
        }
    }

    #[test]
    fn shrinking_reports_only_filtered_values() {
        let strategy = array_of(0u32..1000, 0, Some(10), UniqueFilter::<u32>::default());
        let seen = RefCell::new(Vec::new());
        let mut runner = TestRunner::deterministic();

        let result = runner.run(&strategy, |values| {
            seen.borrow_mut().push(values.clone());
            prop_assert!(values.iter().sum::<u32>() < 500);
            Ok(())
        });

        match result {
            Err(TestError::Fail(_, minimal)) => {
                assert!(minimal.iter().sum::<u32>() >= 500);
                assert_unique_by(&minimal, |a, b| a == b);
            }
            other => panic!("expected a failing case, got {:?}", other),
        }
        for values in seen.borrow().iter() {
            assert_unique_by(values, |a, b| a == b);
        }
    }

    #[test]
    fn deletion_respects_raw_minimum() {
        let strategy = array_of(0u32..10, 3, Some(8), Unfiltered);
        let mut runner = TestRunner::deterministic();
        let mut tree = strategy.new_tree(&mut runner).unwrap();
        while tree.simplify() {
            assert!(tree.current().len() >= 3);
        }
        assert_eq!(tree.current().len(), 3);
    }
}
