//! Law/invariant assertion helpers.

pub mod invariants;
