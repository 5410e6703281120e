//! Approximation kernels.
//!
//! Kernels are small, pure functions so the scanner and the search code can
//! stay generic; `SineKernel` is the seam the scanner evaluates through.

pub mod atan2;
pub mod sine;

pub use atan2::*;
pub use sine::*;

use crate::domain::{ApproxOrder, CoefficientSet};

/// A candidate sine implementation evaluated by the domain scanner.
pub trait SineKernel: Sync {
    fn eval(&self, x: f32) -> f32;
}

/// The range-reduced polynomial kernel for one coefficient set and order.
#[derive(Debug, Clone, Copy)]
pub struct PolynomialKernel {
    pub order: ApproxOrder,
    pub coefs: CoefficientSet,
}

impl PolynomialKernel {
    pub fn new(order: ApproxOrder, coefs: CoefficientSet) -> Self {
        Self { order, coefs }
    }
}

impl SineKernel for PolynomialKernel {
    fn eval(&self, x: f32) -> f32 {
        sinf_approx(x, self.order, &self.coefs)
    }
}

impl<F> SineKernel for F
where
    F: Fn(f32) -> f32 + Sync,
{
    fn eval(&self, x: f32) -> f32 {
        self(x)
    }
}
