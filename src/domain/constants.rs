//! Compile-time constants: coefficient tables, π pieces and search defaults.

use crate::domain::CoefficientSet;

/// Coefficients shipped with the libdragon 5 ULP sine routine.
///
/// Index 0 is the constant term of the polynomial in `x²`.
pub const REFERENCE_COEFS: CoefficientSet = CoefficientSet([
    -1.0132116824e-1,
    6.6208802163e-3,
    -1.7350520647e-4,
    2.5222900603e-6,
    -2.3317808128e-8,
    1.3291330536e-10,
]);

/// Higher-precision refit of the same Chebyshev coefficients; base of every perturbation.
///
/// Terms 1..=5 are the refit rounded to nearest. The constant term is rounded
/// one ULP toward zero (`0xbdcf817a`): the nearest value `-1.01321183e-1`
/// evaluates to `1.0000001` just below `±π/2`, above the valid output range.
///
/// See <http://mooooo.ooo/chebyshev-sine-approximation/>.
pub const EXACT_COEFS: CoefficientSet = CoefficientSet([
    -1.01321175694e-1,
    6.62087952180793343e-3,
    -1.73505057912483501e-4,
    2.52229235749396866e-6,
    -2.33177897192836082e-8,
    1.32913446369766718e-10,
]);

pub const PI_HI: f32 = 3.14159274e+00; // 0x1.921fb6p+01
pub const PI_LO: f32 = -8.74227766e-08; // -0x1.777a5cp-24
pub const HALF_PI_HI: f32 = 1.57079637e+0; // 0x1.921fb6p+0

/// Inputs with a magnitude above this are not scanned.
pub const DEFAULT_DOMAIN_BOUND: f32 = std::f32::consts::FRAC_PI_2;

pub const DEFAULT_AXIS_LOWER: i32 = -10;
pub const DEFAULT_AXIS_UPPER: i32 = 10;
pub const DEFAULT_AXIS_STEP: i32 = 2;

pub const MAX_WORKERS: usize = 10;

/// Only the full series is searched by default.
pub const DEFAULT_ORDER_MIN: u8 = 5;
pub const DEFAULT_ORDER_MAX: u8 = 5;

pub const DEFAULT_OUTPUT_DIR: &str = "results";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_constant_term_is_one_ulp_toward_zero() {
        let nearest = -1.01321183346709073e-1_f32;
        assert_eq!(EXACT_COEFS.0[0].to_bits(), 0xbdcf_817a);
        assert_eq!(EXACT_COEFS.0[0].to_bits() + 1, nearest.to_bits());
        assert!(EXACT_COEFS.0[0].abs() < nearest.abs());
    }
}
