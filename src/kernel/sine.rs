//! Chebyshev sine approximation, evaluated to a configurable order.
//!
//! The approximation has the form
//!
//! ```text
//! sin(x) ≈ x · (x − π) · (x + π) · P(x²),   x ∈ [−π, π]
//! ```
//!
//! so the zero crossings sit at `±π` regardless of the coefficients.
//! `P` is evaluated by Horner's scheme using only the leading `order + 1`
//! coefficients.
//!
//! All arithmetic is plain `f32` in a fixed order (no fused multiply-add), so
//! results are bit-reproducible across runs.

use crate::domain::{ApproxOrder, CoefficientSet, PI_HI, PI_LO};

/// Core evaluation on `[-π, π]` (no range reduction).
pub fn sinf_core(x: f32, order: ApproxOrder, coefs: &CoefficientSet) -> f32 {
    let c = coefs.as_array();
    let s = x * x;
    let mut p = 0.0_f32;
    for i in (1..=order.last_index()).rev() {
        p += c[i];
        p *= s;
    }
    p += c[0];
    x * ((x - PI_HI) - PI_LO) * ((x + PI_HI) + PI_LO) * p
}

/// `x - floor(x / y) * y`, computed with a reciprocal multiply.
pub fn fmodf(x: f32, y: f32) -> f32 {
    x - (x * (1.0 / y)).floor() * y
}

/// Map an arbitrary input into `[-π, π]`.
///
/// The shift by π costs precision for tiny inputs and the reduction is coarse
/// for large ones; both show up as extra error on top of the polynomial's.
pub fn reduce(x: f32) -> f32 {
    fmodf(x + PI_HI, 2.0 * PI_HI) - PI_HI
}

/// Range-reduced sine approximation.
pub fn sinf_approx(x: f32, order: ApproxOrder, coefs: &CoefficientSet) -> f32 {
    sinf_core(reduce(x), order, coefs)
}
