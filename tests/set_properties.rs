use std::cell::RefCell;

use kitchensink_unique::prelude::*;
use proptest::strategy::ValueTree;
use proptest::test_runner::{TestError, TestRunner};

proptest! {
    #[test]
    fn integers_are_never_repeated(values in set(0u16..20)) {
        assert_unique_by(&values, |a, b| a == b);
    }

    #[test]
    fn bounded_sets_respect_length(values in set_with(0u16..50, (2usize, 8usize))) {
        assert_unique_by(&values, |a, b| a == b);
        assert_length_within(&values, 2, 8);
    }

    #[test]
    fn max_only_sets_respect_length(values in set_with(any::<u32>(), 4usize)) {
        assert_length_within(&values, 0, 4);
    }

    #[test]
    fn custom_comparator_defines_duplicates(
        values in set_with(0u32..100, SetArgs::max_compare(6, |a: &u32, b: &u32| a % 7 == b % 7))
    ) {
        assert_unique_by(&values, |a, b| a % 7 == b % 7);
        assert_length_within(&values, 0, 6);
    }

    #[test]
    fn comparator_without_partial_eq(
        values in set_by(
            (0u8..10).prop_map(Opaque),
            LengthBounds::default().with_min_length(1).with_max_length(5),
            |a: &Opaque, b: &Opaque| a.0 == b.0,
        ).unwrap()
    ) {
        assert_unique_by(&values, |a, b| a.0 == b.0);
        assert_length_within(&values, 1, 5);
    }
}

#[derive(Debug, Clone)]
struct Opaque(u8);

#[test]
fn never_equal_comparator_matches_plain_arrays() {
    let unique = set_with(0u8..4, SetArgs::min_max_compare(0, 5, |_: &u8, _: &u8| false));
    let plain = array_of(0u8..4, 0, Some(5), Unfiltered);

    let mut left = TestRunner::deterministic();
    let mut right = TestRunner::deterministic();
    for _ in 0..128 {
        assert_eq!(
            unique.new_tree(&mut left).unwrap().current(),
            plain.new_tree(&mut right).unwrap().current()
        );
    }
}

#[test]
fn infeasible_minimum_reports_exhaustion() {
    let strategy = set_with(
        0u8..2,
        SetConfig::<u8>::default()
            .with_min_length(3)
            .with_max_length(5)
            .with_max_attempts(25),
    );
    let mut runner = TestRunner::deterministic();
    let reason = strategy.new_tree(&mut runner).unwrap_err();
    assert_eq!(
        reason.message(),
        "generation exhausted after 25 attempts: fewer than 3 unique elements"
    );
}

#[test]
fn infeasible_minimum_fails_the_run() {
    let strategy = set_with(0u8..2, (3usize, 5usize));
    let mut runner = TestRunner::deterministic();
    let result = runner.run(&strategy, |_| Ok(()));
    match result {
        Err(TestError::Abort(reason)) => {
            assert!(reason.message().contains("generation exhausted"));
        }
        other => panic!("expected an aborted run, got {:?}", other),
    }
}

#[test]
fn shrunk_candidates_keep_minimum_and_uniqueness() {
    let strategy = set_with(0u32..50, (3usize, 8usize));
    let seen = RefCell::new(Vec::new());
    let mut runner = TestRunner::deterministic();

    let result = runner.run(&strategy, |values| {
        seen.borrow_mut().push(values.clone());
        prop_assert!(values.iter().sum::<u32>() < 40);
        Ok(())
    });

    match result {
        Err(TestError::Fail(_, minimal)) => {
            assert!(minimal.iter().sum::<u32>() >= 40);
            assert_unique_by(&minimal, |a, b| a == b);
            assert_length_within(&minimal, 3, 8);
        }
        other => panic!("expected a failing case, got {:?}", other),
    }
    for values in seen.borrow().iter() {
        assert_unique_by(values, |a, b| a == b);
        assert_length_within(values, 3, 8);
    }
}

#[test]
fn inverted_bounds_are_a_configuration_error() {
    let err = try_set_with(0u8..10, (6usize, 2usize)).unwrap_err();
    assert_eq!(
        err,
        SetError::InvertedBounds {
            min_length: 6,
            max_length: 2
        }
    );
}

#[test]
fn filtering_scenario_keeps_first_occurrences() {
    let filter = UniqueFilter::<i32>::default();
    let input = [1, 2, 1, 3, 2];
    let kept = filter.apply_values(&input);
    assert_eq!(kept, vec![1, 2, 3]);
    assert_first_occurrences(&input, &kept, |a, b| a == b);
}
