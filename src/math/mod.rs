//! Float bit-pattern utilities.

pub mod bits;

pub use bits::*;
