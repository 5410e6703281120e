//! Bit-level float perturbation.
//!
//! A coefficient is nudged by treating its IEEE-754 representation as a signed
//! 32-bit integer and adding an offset. For finite, non-zero values of
//! the same sign this moves the float by exactly `offset` representable steps.

use crate::domain::{CoefficientSet, Offsets};

/// Signed integer view of a float's bit pattern.
pub fn as_signed_bits(x: f32) -> i32 {
    x.to_bits() as i32
}

/// Float whose bit pattern is `bits`.
pub fn from_signed_bits(bits: i32) -> f32 {
    f32::from_bits(bits as u32)
}

/// Add `offset` to the bit pattern of `base` (wrapping).
pub fn perturb(base: f32, offset: i32) -> f32 {
    from_signed_bits(as_signed_bits(base).wrapping_add(offset))
}

/// Apply one offset per coefficient.
pub fn perturb_set(base: &CoefficientSet, offsets: &Offsets) -> CoefficientSet {
    let mut out = *base;
    for (c, &o) in out.0.iter_mut().zip(offsets.0.iter()) {
        *c = perturb(*c, o);
    }
    out
}

/// Distance between two bit patterns, as signed integers.
pub fn bits_distance(a: f32, b: f32) -> i64 {
    (i64::from(as_signed_bits(a)) - i64::from(as_signed_bits(b))).abs()
}
