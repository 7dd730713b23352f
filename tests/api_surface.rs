use kitchensink_unique::prelude::*;

#[test]
fn prelude_compiles_and_exports_core() {
    let _ = set(0u8..10);
    let _ = set_with(0u8..10, 4usize);
    let _ = try_set_with(0u8..10, (1usize, 3usize)).unwrap();
    let _ = array_of(0u8..10, 0, Some(4), Unfiltered);
    let filter = build_compare_filter(compare_by_key(|v: &u8| v / 2));
    assert_eq!(filter.apply_values(&[0, 1, 2, 3]), vec![0, 2]);
    assert_unique_by(&[1, 2, 3], |a, b| a == b);
}
