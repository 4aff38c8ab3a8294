//! Analysis modules.
//!
//! Derived views over a table snapshot.

pub mod aggregator;

pub use aggregator::*;
