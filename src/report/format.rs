//! Text formatting for result files and terminal output.
//!
//! We keep formatting code in one place so:
//! - the scan/search code stays clean and testable
//! - the result file layout, which the analyzer parses back, is defined once

use crate::domain::{CoefficientSet, ErrorReport};
use crate::io::ingest::StoredReport;
use crate::math::as_signed_bits;
use crate::report::BestReports;

pub const RMSD_PREFIX: &str = "RMSD: ";
pub const MAX_ERROR_PREFIX: &str = "maximum measured error: ";
pub const MAX_BITS_ERROR_PREFIX: &str = "maximum measured error (int): ";

/// One line per coefficient: decimal value, hex bit pattern, signed bit pattern.
pub fn format_coefficients(coefs: &CoefficientSet) -> String {
    let mut out = String::new();
    for (i, &c) in coefs.as_array().iter().enumerate() {
        out.push_str(&format!(
            "coef {i}: {c:.20} [0x{:x}] ({})\n",
            c.to_bits(),
            as_signed_bits(c)
        ));
    }
    out
}

/// Full result file body for a completed scan.
pub fn format_report(coefs: &CoefficientSet, report: &ErrorReport) -> String {
    let mut out = format_coefficients(coefs);
    out.push_str(&format!("{RMSD_PREFIX}{:.20}\n", report.rmsd));
    out.push_str(&format!("{MAX_ERROR_PREFIX}{:.20}\n", report.max_abs_error));
    out.push_str(&format!("{MAX_BITS_ERROR_PREFIX}{}\n", report.max_bits_error));
    out
}

/// Banner printed before the search starts.
pub fn format_run_header(coefs: &CoefficientSet) -> String {
    let mut out = String::new();
    out.push_str("Initial coefs:\n");
    out.push_str(&format_coefficients(coefs));
    out.push_str("------------------------------------");
    out
}

/// Analyzer output: the lowest-RMSD and lowest-max-error files with their coefficients.
pub fn format_best(best: &BestReports) -> String {
    let mut out = String::new();
    if let Some(r) = &best.lowest_rmsd {
        out.push_str(&format!("Lowest RMSD: {} from file {}\n", r.rmsd, r.path.display()));
        push_coef_lines(&mut out, r);
    }
    if let Some(r) = &best.lowest_max_error {
        out.push_str(&format!(
            "Lowest maximum measured error: {} from file {}\n",
            r.max_abs_error,
            r.path.display()
        ));
        push_coef_lines(&mut out, r);
    }
    if best.lowest_rmsd.is_none() && best.lowest_max_error.is_none() {
        out.push_str("No readable reports found.\n");
    }
    out
}

fn push_coef_lines(out: &mut String, report: &StoredReport) {
    for line in &report.coef_lines {
        out.push_str(line);
        out.push('\n');
    }
}
