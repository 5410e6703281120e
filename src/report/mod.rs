//! Reporting: result formatting, sinks, and best-candidate selection.

pub mod format;
pub mod sink;

pub use format::*;
pub use sink::*;

use serde::Serialize;

use crate::io::ingest::StoredReport;

/// The winners of an analyzer pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BestReports {
    pub lowest_rmsd: Option<StoredReport>,
    pub lowest_max_error: Option<StoredReport>,
}

/// Pick the lowest RMSD and the lowest maximum absolute error.
///
/// Ties keep the earlier report, so callers should pass reports in a stable
/// order. NaN metrics never win.
pub fn select_best(reports: &[StoredReport]) -> BestReports {
    let mut best = BestReports::default();
    let mut best_rmsd = f64::INFINITY;
    let mut best_error = f64::INFINITY;

    for r in reports {
        if r.rmsd < best_rmsd {
            best_rmsd = r.rmsd;
            best.lowest_rmsd = Some(r.clone());
        }
        if r.max_abs_error < best_error {
            best_error = r.max_abs_error;
            best.lowest_max_error = Some(r.clone());
        }
    }

    best
}
