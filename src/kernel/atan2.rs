//! Two-argument arctangent approximation.
//!
//! A minimax polynomial for `atan(a)` on `[0, 1]` (Remez, max error ≈ 6.14e-4)
//! plus octant/quadrant correction. Good to about three decimal digits, which
//! is enough for angles; used as a validation utility next to the sine kernel.

use crate::domain::{HALF_PI_HI, PI_HI};

pub fn atan2_approx(y: f32, x: f32) -> f32 {
    let ay = y.abs();
    let ax = x.abs();
    let a = if ay < ax { ay / ax } else { ax / ay };
    let s = a * a;
    let mut r = ((-0.0464964749 * s + 0.15931422) * s - 0.327622764) * s * a + a;
    if ay > ax {
        r = HALF_PI_HI - r;
    }
    if x.is_sign_negative() {
        r = PI_HI - r;
    }
    r.copysign(y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_std_atan2_in_every_quadrant() {
        let mut worst = 0.0_f32;
        for i in -40..=40 {
            for j in -40..=40 {
                if i == 0 && j == 0 {
                    continue;
                }
                let (y, x) = (i as f32 * 0.37, j as f32 * 0.53);
                let err = (atan2_approx(y, x) - y.atan2(x)).abs();
                worst = worst.max(err);
            }
        }
        assert!(worst < 7e-4, "worst error {worst}");
    }

    #[test]
    fn axes_map_to_exact_angles() {
        assert_eq!(atan2_approx(0.0, 1.0), 0.0);
        assert!((atan2_approx(1.0, 0.0) - HALF_PI_HI).abs() < 1e-6);
        assert!((atan2_approx(0.0, -1.0) - PI_HI).abs() < 1e-6);
        assert!(atan2_approx(-0.0, -1.0) < 0.0);
    }
}
