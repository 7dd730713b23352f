//! First-occurrence partitioning and the uniqueness filter built on it.

use std::fmt;
use std::sync::Arc;

use super::array::{ArrayFilter, Candidate};

/// Equality predicate deciding whether two values count as duplicates.
pub type Compare<T> = Arc<dyn Fn(&T, &T) -> bool + Send + Sync>;

/// Exact equality via `PartialEq`.
pub fn default_compare<T>() -> Compare<T>
where
    T: PartialEq + 'static,
{
    Arc::new(|a: &T, b: &T| a == b)
}

/// Values are duplicates when their keys are equal.
pub fn compare_by_key<T, K, F>(key: F) -> Compare<T>
where
    F: Fn(&T) -> K + Send + Sync + 'static,
    K: PartialEq,
{
    Arc::new(move |a: &T, b: &T| key(a) == key(b))
}

/// Keep only the first occurrence of every value, in original order.
///
/// The buffer is consumed and reused as scratch space: the scan walks from the
/// tail towards the head, and every element that has an equal element at a lower
/// index is rotated past the end of the kept region. Elements below the scan
/// position are never moved, so duplicates are always detected against the
/// original prefix.
///
/// ```rust
/// use kitchensink_unique::generators::unique::partition_first_occurrences;
///
/// let kept = partition_first_occurrences(vec![1, 2, 1, 3, 2], |v| v, |a, b| a == b);
/// assert_eq!(kept, vec![1, 2, 3]);
/// ```
pub fn partition_first_occurrences<C, T, P, E>(mut buf: Vec<C>, project: P, compare: E) -> Vec<C>
where
    T: ?Sized,
    P: Fn(&C) -> &T,
    E: Fn(&T, &T) -> bool,
{
    let mut final_len = buf.len();
    for ix in (0..buf.len()).rev() {
        let current = project(&buf[ix]);
        let duplicated = buf[..ix]
            .iter()
            .any(|earlier| compare(project(earlier), current));
        if duplicated {
            buf[ix..final_len].rotate_left(1);
            final_len -= 1;
        }
    }

    if final_len < buf.len() {
        tracing::trace!(
            dropped = buf.len() - final_len,
            kept = final_len,
            "dropped duplicate candidates"
        );
    }
    buf.truncate(final_len);
    buf
}

/// Filter keeping the first occurrence of every value under a [`Compare`].
pub struct UniqueFilter<T> {
    compare: Compare<T>,
}

impl<T> UniqueFilter<T> {
    /// Build a filter from an equality predicate.
    pub fn new(compare: Compare<T>) -> Self {
        Self { compare }
    }

    /// Borrow the predicate.
    pub fn compare(&self) -> &Compare<T> {
        &self.compare
    }

    /// Run the filter over plain values.
    pub fn apply_values(&self, values: &[T]) -> Vec<T>
    where
        T: Clone,
    {
        partition_first_occurrences(values.to_vec(), |v| v, |a, b| (self.compare)(a, b))
    }
}

impl<T: PartialEq + 'static> Default for UniqueFilter<T> {
    fn default() -> Self {
        Self::new(default_compare())
    }
}

impl<T> Clone for UniqueFilter<T> {
    fn clone(&self) -> Self {
        Self {
            compare: Arc::clone(&self.compare),
        }
    }
}

impl<T> fmt::Debug for UniqueFilter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UniqueFilter").finish_non_exhaustive()
    }
}

impl<T> ArrayFilter<T> for UniqueFilter<T> {
    fn filter<C: Candidate<Value = T>>(&self, candidates: Vec<C>) -> Vec<C> {
        partition_first_occurrences(candidates, |c| c.value(), |a, b| (self.compare)(a, b))
    }
}

/// Wrap an equality predicate into the filter handed to the array engine.
pub fn build_compare_filter<T>(compare: Compare<T>) -> UniqueFilter<T> {
    UniqueFilter::new(compare)
}
