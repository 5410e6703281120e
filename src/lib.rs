//! `sinf-search` library crate.
//!
//! The binary (`sinf-search`) is a thin wrapper around this library so that:
//!
//! - the scanner and the pool are testable without spawning processes
//! - kernels and report sinks can be swapped from other code

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod kernel;
pub mod math;
pub mod report;
pub mod scan;
pub mod search;
