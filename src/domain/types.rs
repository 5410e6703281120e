//! Shared domain types.
//!
//! These types are intentionally small and `Copy` where possible so each worker
//! can own its inputs outright:
//!
//! - coefficient tables and offset vectors
//! - scan inputs (`ScanDomain`, `ApproxOrder`) and outputs (`ErrorReport`)
//! - the resolved run configuration (`SearchConfig`)

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::domain::constants::{
    DEFAULT_AXIS_LOWER, DEFAULT_AXIS_STEP, DEFAULT_AXIS_UPPER, DEFAULT_DOMAIN_BOUND, EXACT_COEFS,
    REFERENCE_COEFS,
};
use crate::error::AppError;

/// Number of polynomial coefficients (and grid axes).
pub const COEF_COUNT: usize = 6;

/// Coefficients of the polynomial in `x²`; index 0 is the constant term.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoefficientSet(pub [f32; COEF_COUNT]);

impl CoefficientSet {
    pub fn as_array(&self) -> &[f32; COEF_COUNT] {
        &self.0
    }
}

/// One signed bit-pattern offset per coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Offsets(pub [i32; COEF_COUNT]);

/// Number of leading series terms retained by the kernel, minus one.
///
/// Order `k` evaluates coefficients `0..=k`: order 0 is the cheapest (constant
/// term only), order 5 is the full series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ApproxOrder(u8);

impl ApproxOrder {
    pub const MAX: u8 = (COEF_COUNT - 1) as u8;
    pub const FULL: ApproxOrder = ApproxOrder(Self::MAX);

    pub fn new(order: u8) -> Result<Self, AppError> {
        if order > Self::MAX {
            return Err(AppError::config(format!(
                "Invalid approximation order {order} (must be 0..={}).",
                Self::MAX
            )));
        }
        Ok(Self(order))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Highest coefficient index evaluated at this order.
    pub fn last_index(self) -> usize {
        self.0 as usize
    }

    /// Number of trailing terms skipped, the "approx level" of the legacy
    /// console output (level 0 is the full series).
    pub fn legacy_level(self) -> u8 {
        Self::MAX - self.0
    }
}

impl std::fmt::Display for ApproxOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Inclusive offset interval for a single grid axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisRange {
    pub lower: i32,
    pub upper: i32,
    pub step: i32,
}

impl AxisRange {
    pub fn new(lower: i32, upper: i32, step: i32) -> Result<Self, AppError> {
        if step <= 0 {
            return Err(AppError::config(format!("Invalid axis step {step} (must be > 0).")));
        }
        if lower > upper {
            return Err(AppError::config(format!(
                "Invalid axis range [{lower}, {upper}] (lower must be <= upper)."
            )));
        }
        let steps = (i64::from(upper) - i64::from(lower)) / i64::from(step);
        if usize::try_from(steps).ok().and_then(|n| n.checked_add(1)).is_none() {
            return Err(AppError::config(format!(
                "Axis range [{lower}, {upper}] step {step} has too many values."
            )));
        }
        Ok(Self { lower, upper, step })
    }

    /// Number of offsets on this axis.
    pub fn count(&self) -> usize {
        ((i64::from(self.upper) - i64::from(self.lower)) / i64::from(self.step)) as usize + 1
    }

    /// The `index`-th offset (`index < count()`).
    ///
    /// Computed in `i64`: `step * index` alone can leave the `i32` range even
    /// though the resulting offset never exceeds `upper`.
    pub fn value(&self, index: usize) -> i32 {
        (i64::from(self.lower) + i64::from(self.step) * index as i64) as i32
    }

    /// Position of `offset` relative to `lower`.
    pub fn position(&self, offset: i32) -> i64 {
        i64::from(offset) - i64::from(self.lower)
    }
}

impl Default for AxisRange {
    fn default() -> Self {
        Self {
            lower: DEFAULT_AXIS_LOWER,
            upper: DEFAULT_AXIS_UPPER,
            step: DEFAULT_AXIS_STEP,
        }
    }
}

/// Bit patterns to walk and the magnitude bound applied to their float values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanDomain {
    pub bound: f32,
    pub first: u32,
    pub last: u32,
}

impl ScanDomain {
    /// Every 32-bit pattern, restricted to `|x| <= bound`.
    pub fn full(bound: f32) -> Self {
        Self {
            bound,
            first: 0,
            last: u32::MAX,
        }
    }

    /// A contiguous slice of bit patterns (inclusive on both ends).
    pub fn slice(bound: f32, first: u32, last: u32) -> Self {
        Self { bound, first, last }
    }
}

impl Default for ScanDomain {
    fn default() -> Self {
        Self::full(DEFAULT_DOMAIN_BOUND)
    }
}

/// Error statistics of one completed scan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Square root of the summed squared differences.
    pub rmsd: f64,
    pub max_abs_error: f64,
    /// Largest distance between result and reference bit patterns.
    pub max_bits_error: i64,
    /// Number of inputs that passed the domain bound.
    pub samples: u64,
}

/// Result of scanning one coefficient set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScanOutcome {
    Completed(ErrorReport),
    /// The kernel left `[-1, 1]`; `value` is the offending output at input `at`.
    Aborted { at: f32, value: f32 },
}

impl ScanOutcome {
    pub fn is_aborted(&self) -> bool {
        matches!(self, ScanOutcome::Aborted { .. })
    }

    pub fn report(&self) -> Option<&ErrorReport> {
        match self {
            ScanOutcome::Completed(report) => Some(report),
            ScanOutcome::Aborted { .. } => None,
        }
    }
}

/// One unit of work: a candidate coefficient set at a given order.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanTask {
    /// Per-axis index offsets (offset minus axis lower bound) joined by `_`.
    pub id: String,
    pub order: ApproxOrder,
    pub coefs: CoefficientSet,
    pub offsets: Offsets,
}

/// Which compiled-in coefficient table to perturb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CoefBase {
    Exact,
    Reference,
}

impl CoefBase {
    pub fn coefs(self) -> CoefficientSet {
        match self {
            CoefBase::Exact => EXACT_COEFS,
            CoefBase::Reference => REFERENCE_COEFS,
        }
    }
}

/// Where completed reports are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkMode {
    /// One text file per task inside the output directory.
    Files,
    /// A single shared stdout stream.
    Stdout,
}

/// A full search run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus compile-time defaults).
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub base: CoefBase,
    pub axes: [AxisRange; COEF_COUNT],
    pub order_min: ApproxOrder,
    pub order_max: ApproxOrder,
    pub max_workers: usize,
    pub output_dir: PathBuf,
    pub sink: SinkMode,
    pub domain: ScanDomain,
}

impl SearchConfig {
    pub fn orders(&self) -> impl Iterator<Item = ApproxOrder> + use<> {
        (self.order_min.get()..=self.order_max.get()).map(ApproxOrder)
    }

    /// Whether results of different orders need separate directories.
    pub fn multi_order(&self) -> bool {
        self.order_max > self.order_min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_axis_has_eleven_values() {
        let axis = AxisRange::default();
        assert_eq!(axis.count(), 11);
        assert_eq!(axis.value(0), -10);
        assert_eq!(axis.value(10), 10);
    }

    #[test]
    fn axis_count_ignores_unreachable_upper() {
        let axis = AxisRange::new(0, 5, 2).unwrap();
        assert_eq!(axis.count(), 3);
        assert_eq!(axis.value(2), 4);
    }

    #[test]
    fn axis_rejects_bad_step_and_inverted_bounds() {
        assert!(AxisRange::new(-1, 1, 0).is_err());
        assert!(AxisRange::new(3, 1, 1).is_err());
    }

    #[test]
    fn wide_axis_values_do_not_overflow() {
        let axis = AxisRange::new(-2_000_000_000, 2_000_000_000, 1).unwrap();
        assert_eq!(axis.count(), 4_000_000_001);
        assert_eq!(axis.value(3_000_000_000), 1_000_000_000);
        assert_eq!(axis.value(axis.count() - 1), 2_000_000_000);
        assert_eq!(axis.position(2_000_000_000), 4_000_000_000);

        let coarse = AxisRange::new(-2_000_000_000, 2_000_000_000, 1_000_000_000).unwrap();
        assert_eq!(coarse.count(), 5);
        assert_eq!(coarse.value(4), 2_000_000_000);

        let full = AxisRange::new(i32::MIN, i32::MAX, 1).unwrap();
        assert_eq!(full.value(full.count() - 1), i32::MAX);
    }

    #[test]
    fn approx_order_is_bounded() {
        assert!(ApproxOrder::new(5).is_ok());
        assert_eq!(ApproxOrder::FULL.legacy_level(), 0);
        assert_eq!(ApproxOrder::new(0).unwrap().legacy_level(), 5);
        assert_eq!(ApproxOrder::new(6).unwrap_err().exit_code(), crate::error::EXIT_CONFIG);
    }
}
