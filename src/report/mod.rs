//! Dashboard output formats.

pub mod generator;

pub use generator::*;
