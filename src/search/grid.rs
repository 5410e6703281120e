//! Offset grid generation.
//!
//! The search walks a deterministic 6-dimensional grid of bit-pattern offsets,
//! one axis per coefficient. The grid is produced lazily by an odometer so the
//! ~1.8M reference grid points are never materialized at once.
//!
//! Order is row-major: axis 0 varies slowest and axis 5 fastest, matching a
//! nest of six loops. Identifiers derive from that position, so logs and
//! result file names are reproducible between runs.

use std::iter::FusedIterator;

use crate::domain::{ApproxOrder, AxisRange, COEF_COUNT, CoefficientSet, Offsets, ScanTask};
use crate::error::AppError;
use crate::math::perturb_set;

/// Number of grid points spanned by `axes`, or `None` if it does not fit a `usize`.
pub fn grid_len(axes: &[AxisRange; COEF_COUNT]) -> Option<usize> {
    axes.iter().try_fold(1usize, |acc, axis| acc.checked_mul(axis.count()))
}

/// Cartesian product of per-axis offsets, applied to a base coefficient set.
#[derive(Debug, Clone)]
pub struct OffsetGrid {
    axes: [AxisRange; COEF_COUNT],
    base: CoefficientSet,
    len: usize,
}

impl OffsetGrid {
    pub fn new(axes: [AxisRange; COEF_COUNT], base: CoefficientSet) -> Result<Self, AppError> {
        let len = grid_len(&axes)
            .ok_or_else(|| AppError::config("Offset grid is too large to enumerate."))?;
        Ok(Self { axes, base, len })
    }

    pub fn axes(&self) -> &[AxisRange; COEF_COUNT] {
        &self.axes
    }

    /// Total number of grid points.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A fresh pass over every offset vector.
    pub fn iter(&self) -> OffsetIter {
        OffsetIter {
            axes: self.axes,
            indices: [0; COEF_COUNT],
            remaining: self.len(),
        }
    }

    /// Per-axis positions relative to the lower bound, joined by `_`.
    pub fn identifier(&self, offsets: &Offsets) -> String {
        let parts: Vec<String> = offsets
            .0
            .iter()
            .zip(self.axes.iter())
            .map(|(&o, axis)| axis.position(o).to_string())
            .collect();
        parts.join("_")
    }

    pub fn coefficients(&self, offsets: &Offsets) -> CoefficientSet {
        perturb_set(&self.base, offsets)
    }

    /// One scan task per grid point, in grid order.
    pub fn tasks(&self, order: ApproxOrder) -> impl ExactSizeIterator<Item = ScanTask> + '_ {
        self.iter().map(move |offsets| ScanTask {
            id: self.identifier(&offsets),
            order,
            coefs: self.coefficients(&offsets),
            offsets,
        })
    }
}

impl<'a> IntoIterator for &'a OffsetGrid {
    type Item = Offsets;
    type IntoIter = OffsetIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Multi-radix odometer over the grid axes.
#[derive(Debug, Clone)]
pub struct OffsetIter {
    axes: [AxisRange; COEF_COUNT],
    indices: [usize; COEF_COUNT],
    remaining: usize,
}

impl Iterator for OffsetIter {
    type Item = Offsets;

    fn next(&mut self) -> Option<Offsets> {
        if self.remaining == 0 {
            return None;
        }

        let mut current = [0i32; COEF_COUNT];
        for (axis, slot) in current.iter_mut().enumerate() {
            *slot = self.axes[axis].value(self.indices[axis]);
        }

        self.remaining -= 1;
        for axis in (0..COEF_COUNT).rev() {
            self.indices[axis] += 1;
            if self.indices[axis] < self.axes[axis].count() {
                break;
            }
            self.indices[axis] = 0;
        }

        Some(Offsets(current))
    }

    /// Jumps the odometer by `n` positions instead of stepping through them.
    fn nth(&mut self, n: usize) -> Option<Offsets> {
        if n >= self.remaining {
            self.remaining = 0;
            return None;
        }

        let mut carry = n;
        for axis in (0..COEF_COUNT).rev() {
            if carry == 0 {
                break;
            }
            let count = self.axes[axis].count();
            let sum = self.indices[axis] + carry % count;
            self.indices[axis] = sum % count;
            carry = carry / count + sum / count;
        }
        self.remaining -= n;
        self.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for OffsetIter {}

impl FusedIterator for OffsetIter {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use crate::domain::EXACT_COEFS;
    use crate::math::as_signed_bits;

    fn reference_grid() -> OffsetGrid {
        OffsetGrid::new([AxisRange::default(); COEF_COUNT], EXACT_COEFS).unwrap()
    }

    fn axis(lower: i32, upper: i32, step: i32) -> AxisRange {
        AxisRange::new(lower, upper, step).unwrap()
    }

    #[test]
    fn reference_grid_has_every_point_once() {
        let grid = reference_grid();
        assert_eq!(grid.len(), 1_771_561);

        let mut seen = HashSet::with_capacity(grid.len());
        let mut count = 0usize;
        for offsets in &grid {
            for (o, a) in offsets.0.iter().zip(grid.axes()) {
                assert!(*o >= a.lower && *o <= a.upper);
            }
            assert!(seen.insert(offsets));
            count += 1;
        }
        assert_eq!(count, 1_771_561);
    }

    #[test]
    fn last_axis_varies_fastest() {
        let grid = reference_grid();
        let first: Vec<Offsets> = grid.iter().take(12).collect();
        assert_eq!(first[0], Offsets([-10; COEF_COUNT]));
        assert_eq!(first[1], Offsets([-10, -10, -10, -10, -10, -8]));
        assert_eq!(first[10], Offsets([-10, -10, -10, -10, -10, 10]));
        assert_eq!(first[11], Offsets([-10, -10, -10, -10, -8, -10]));
        assert_eq!(grid.iter().last(), Some(Offsets([10; COEF_COUNT])));
    }

    #[test]
    fn iteration_is_restartable() {
        let grid = OffsetGrid::new(
            [axis(0, 1, 1), axis(0, 0, 1), axis(-2, 2, 2), axis(0, 0, 1), axis(0, 0, 1), axis(5, 6, 1)],
            EXACT_COEFS,
        )
        .unwrap();
        let a: Vec<Offsets> = grid.iter().collect();
        let b: Vec<Offsets> = grid.iter().collect();
        assert_eq!(a.len(), 12);
        assert_eq!(a, b);
        assert_eq!(grid.iter().len(), 12);
    }

    #[test]
    fn nth_matches_stepping() {
        let grid = reference_grid();
        let stepped: Vec<Offsets> = grid.iter().collect();
        for n in [0, 1, 10, 11, 12, 1_000, 161_050, 1_771_560] {
            assert_eq!(grid.iter().nth(n), Some(stepped[n]), "n={n}");
        }
        assert_eq!(grid.iter().nth(1_771_561), None);

        let mut it = grid.iter();
        assert_eq!(it.nth(120), Some(stepped[120]));
        assert_eq!(it.nth(5), Some(stepped[126]));
        assert_eq!(it.next(), Some(stepped[127]));
        assert_eq!(it.len(), 1_771_561 - 128);
    }

    #[test]
    fn identifiers_count_from_lower_bound() {
        let grid = reference_grid();
        assert_eq!(grid.identifier(&Offsets([-10; COEF_COUNT])), "0_0_0_0_0_0");
        assert_eq!(grid.identifier(&Offsets([0, -10, -8, 10, -10, -10])), "10_0_2_20_0_0");
    }

    #[test]
    fn tasks_carry_perturbed_coefficients() {
        let grid = reference_grid();
        let task = grid.tasks(ApproxOrder::FULL).nth(1).unwrap();
        assert_eq!(task.id, "0_0_0_0_0_2");
        assert_eq!(task.order, ApproxOrder::FULL);
        for i in 0..COEF_COUNT {
            let expected = as_signed_bits(EXACT_COEFS.0[i]) + task.offsets.0[i];
            assert_eq!(as_signed_bits(task.coefs.0[i]), expected);
        }
    }

    #[test]
    fn wide_axes_enumerate_without_overflow() {
        let mut axes = [axis(0, 0, 1); COEF_COUNT];
        axes[0] = axis(-2_000_000_000, 2_000_000_000, 1_000_000_000);
        let grid = OffsetGrid::new(axes, EXACT_COEFS).unwrap();
        let ids: Vec<String> = grid.tasks(ApproxOrder::FULL).map(|t| t.id).collect();
        assert_eq!(ids.len(), 5);
        assert_eq!(ids[4], "4_0_0_0_0_0");

        axes[0] = axis(-2_000_000_000, 2_000_000_000, 1);
        let grid = OffsetGrid::new(axes, EXACT_COEFS).unwrap();
        let last = grid.iter().nth(4_000_000_000).unwrap();
        assert_eq!(last.0[0], 2_000_000_000);
        assert_eq!(grid.identifier(&last), "4000000000_0_0_0_0_0");
    }

    #[test]
    fn oversized_grid_is_rejected() {
        let axes = [axis(i32::MIN, i32::MAX, 1); COEF_COUNT];
        assert_eq!(grid_len(&axes), None);
        let err = OffsetGrid::new(axes, EXACT_COEFS).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_CONFIG);
    }

    #[test]
    fn single_point_grid() {
        let grid = OffsetGrid::new([axis(0, 0, 2); COEF_COUNT], EXACT_COEFS).unwrap();
        let tasks: Vec<ScanTask> = grid.tasks(ApproxOrder::FULL).collect();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].coefs, EXACT_COEFS);
        assert_eq!(tasks[0].id, "0_0_0_0_0_0");
    }
}
