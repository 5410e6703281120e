//! Brute-force search orchestration.
//!
//! Responsibilities:
//!
//! - generate the offset grid around a base coefficient set (`grid`)
//! - scan every candidate on a bounded worker pool (`pool`)

pub mod grid;
pub mod pool;

pub use grid::*;
pub use pool::*;
