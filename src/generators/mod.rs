//! Strategy generators.

pub mod array;
pub mod filter;
pub mod set;
pub mod unique;
