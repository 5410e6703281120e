//! Input/output helpers.
//!
//! - result files written by the search (`export`)
//! - result files read back by the analyzer (`ingest`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
