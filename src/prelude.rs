//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used items from this crate.
//!
//! # Example
//!
//! ```rust
//! use kitchensink_unique::prelude::*;
//!
//! let _strategy = set_with(0u8..10, (1usize, 5usize));
//! ```

// Re-export proptest
pub use proptest::prelude::*;

pub use crate::generators::array::{ArrayFilter, Candidate, Unfiltered, array_of};
pub use crate::generators::filter::{GenerationExhausted, RejectExt};
pub use crate::generators::set::{
    LengthBounds, SetArgs, SetConfig, SetError, SetStrategy, set, set_by, set_with, try_set_with,
};
pub use crate::generators::unique::{
    Compare, UniqueFilter, build_compare_filter, compare_by_key, default_compare,
};

pub use crate::law::invariants::{
    assert_filter_idempotent, assert_first_occurrences, assert_length_within, assert_unique_by,
};
