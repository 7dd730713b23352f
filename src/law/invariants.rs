//! Invariant assertions for deduplicated collections.

use std::fmt::Debug;

/// Assert no two elements are equal under `compare`.
pub fn assert_unique_by<T, F>(values: &[T], compare: F)
where
    T: Debug,
    F: Fn(&T, &T) -> bool,
{
    for (ix, left) in values.iter().enumerate() {
        for right in &values[ix + 1..] {
            assert!(
                !compare(left, right),
                "collection contains duplicates {:?} and {:?}: {:?}",
                left,
                right,
                values
            );
        }
    }
}

/// Assert length lies inside `[min, max]`.
pub fn assert_length_within<T>(values: &[T], min: usize, max: usize)
where
    T: Debug,
{
    assert!(
        values.len() >= min && values.len() <= max,
        "length {} outside [{}, {}]: {:?}",
        values.len(),
        min,
        max,
        values
    );
}

/// Assert `output` is exactly the first occurrences of `input`, in input order.
///
/// An element of `input` is a first occurrence when no element before it is
/// equal under `compare`.
pub fn assert_first_occurrences<T, F>(input: &[T], output: &[T], compare: F)
where
    T: PartialEq + Debug,
    F: Fn(&T, &T) -> bool,
{
    let expected: Vec<&T> = input
        .iter()
        .enumerate()
        .filter(|(ix, value)| !input[..*ix].iter().any(|earlier| compare(earlier, *value)))
        .map(|(_, value)| value)
        .collect();
    let actual: Vec<&T> = output.iter().collect();
    assert_eq!(
        actual, expected,
        "output is not the first occurrences of {:?}",
        input
    );
}

/// Assert a filter is idempotent: `f(f(x)) == f(x)`.
pub fn assert_filter_idempotent<T, F>(value: T, f: F)
where
    T: Clone + PartialEq + Debug,
    F: Fn(T) -> T,
{
    let once = f(value);
    let twice = f(once.clone());
    assert_eq!(once, twice, "filter should be idempotent");
}
