//! # kitchensink-unique
//!
//! `kitchensink-unique` is a property-based testing toolkit for collections of unique values,
//! organized around:
//! - `generators::set`: the `set` combinator and its configuration
//! - `generators::unique`: first-occurrence partitioning and comparators
//! - `generators::array`: an array strategy that filters every generated and shrunk candidate
//! - `generators::filter`: bounded rejection sampling
//! - `law`: reusable invariant assertions for deduplicated collections

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

pub mod generators;
pub mod law;
pub mod prelude;

/// Re-export `proptest` for convenience.
pub use proptest;
