//! Exhaustive error measurement over the float32 domain.
//!
//! For every bit pattern in the domain we:
//! - reinterpret it as a float and keep it only if `|x| <= bound`
//! - evaluate the candidate kernel and `f32::sin`
//! - accumulate the squared error, the maximum absolute error and the maximum
//!   bit-pattern distance
//!
//! A kernel output outside `[-1, 1]` aborts the scan on the spot: that point is
//! not accumulated and nothing collected so far is reported.

use crate::domain::{ErrorReport, ScanDomain, ScanOutcome};
use crate::kernel::SineKernel;
use crate::math::{as_signed_bits, bits_distance};

const POSITIVE_ZERO_BITS: i32 = 0x0000_0000;
const NEGATIVE_ZERO_BITS: i32 = 0x8000_0000_u32 as i32;

#[derive(Debug, Default)]
struct Accumulator {
    sum_sq: f64,
    max_abs: f64,
    max_bits: i64,
    samples: u64,
}

impl Accumulator {
    fn push(&mut self, result: f32, reference: f32) {
        let result_bits = as_signed_bits(result);
        // Either signed zero counts as a match in bit distance.
        if result_bits != POSITIVE_ZERO_BITS && result_bits != NEGATIVE_ZERO_BITS {
            self.max_bits = self.max_bits.max(bits_distance(result, reference));
        }

        let diff = result - reference;
        let diff_abs = f64::from(diff.abs());
        if diff_abs > self.max_abs {
            self.max_abs = diff_abs;
        }
        self.sum_sq += f64::from(diff * diff);
        self.samples += 1;
    }

    fn finish(self) -> ErrorReport {
        ErrorReport {
            rmsd: self.sum_sq.sqrt(),
            max_abs_error: self.max_abs,
            max_bits_error: self.max_bits,
            samples: self.samples,
        }
    }
}

/// Scan `domain` with `kernel` against `f32::sin`.
pub fn scan<K: SineKernel + ?Sized>(kernel: &K, domain: &ScanDomain) -> ScanOutcome {
    let mut acc = Accumulator::default();

    for bits in domain.first..=domain.last {
        let x = f32::from_bits(bits);
        // Written so NaN inputs fall outside the bound too.
        if !(x.abs() <= domain.bound) {
            continue;
        }

        let result = kernel.eval(x);
        if result > 1.0 || result < -1.0 {
            return ScanOutcome::Aborted { at: x, value: result };
        }

        acc.push(result, x.sin());
    }

    ScanOutcome::Completed(acc.finish())
}
