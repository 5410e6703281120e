//! Domain types used throughout the search.
//!
//! This module defines:
//!
//! - coefficient tables and grid offsets (`CoefficientSet`, `Offsets`, `AxisRange`)
//! - scan inputs and outputs (`ScanDomain`, `ErrorReport`, `ScanOutcome`)
//! - the resolved run configuration (`SearchConfig`)
//! - compile-time constants (`constants`)

pub mod constants;
pub mod types;

pub use constants::*;
pub use types::*;
