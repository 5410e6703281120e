//! Result directory ingest for the analyzer.
//!
//! This module turns a directory of result files back into structured records:
//! - every regular file is a candidate (no extension filter)
//! - files are read and parsed in parallel
//! - unreadable or incomplete files are skipped, but reported

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;

use crate::domain::COEF_COUNT;
use crate::error::AppError;
use crate::report::{MAX_BITS_ERROR_PREFIX, MAX_ERROR_PREFIX, RMSD_PREFIX};

/// A result file parsed back from disk.
#[derive(Debug, Clone, Serialize)]
pub struct StoredReport {
    pub path: PathBuf,
    /// The leading coefficient lines, verbatim.
    pub coef_lines: Vec<String>,
    pub rmsd: f64,
    pub max_abs_error: f64,
    pub max_bits_error: Option<i64>,
}

/// A file that could not be used.
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Ingest output: parsed reports (sorted by path) + skipped files.
#[derive(Debug, Clone, Default)]
pub struct IngestedReports {
    pub reports: Vec<StoredReport>,
    pub skipped: Vec<SkippedFile>,
}

/// Parse one result file body. Returns `None` unless both RMSD and the
/// maximum error line are present and numeric.
pub fn parse_report(path: &Path, content: &str) -> Option<StoredReport> {
    let coef_lines: Vec<String> = content.lines().take(COEF_COUNT).map(str::to_string).collect();

    let mut rmsd = None;
    let mut max_abs_error = None;
    let mut max_bits_error = None;
    for line in content.lines() {
        let line = line.trim();
        if let Some(v) = line.strip_prefix(RMSD_PREFIX) {
            rmsd = rmsd.or_else(|| v.trim().parse::<f64>().ok());
        } else if let Some(v) = line.strip_prefix(MAX_ERROR_PREFIX) {
            max_abs_error = max_abs_error.or_else(|| v.trim().parse::<f64>().ok());
        } else if let Some(v) = line.strip_prefix(MAX_BITS_ERROR_PREFIX) {
            max_bits_error = max_bits_error.or_else(|| v.trim().parse::<i64>().ok());
        }
    }

    Some(StoredReport {
        path: path.to_path_buf(),
        coef_lines,
        rmsd: rmsd?,
        max_abs_error: max_abs_error?,
        max_bits_error,
    })
}

/// Read every regular file in `dir`.
pub fn load_reports(dir: &Path) -> Result<IngestedReports, AppError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| AppError::io(format!("Failed to read results directory '{}': {e}", dir.display())))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            AppError::io(format!("Failed to list results directory '{}': {e}", dir.display()))
        })?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    let parsed: Vec<Result<StoredReport, SkippedFile>> = files
        .par_iter()
        .map(|path| {
            let content = fs::read_to_string(path).map_err(|e| SkippedFile {
                path: path.clone(),
                reason: e.to_string(),
            })?;
            parse_report(path, &content).ok_or_else(|| SkippedFile {
                path: path.clone(),
                reason: "missing RMSD or maximum error line".to_string(),
            })
        })
        .collect();

    let mut out = IngestedReports::default();
    for item in parsed {
        match item {
            Ok(report) => out.reports.push(report),
            Err(skipped) => out.skipped.push(skipped),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorReport, EXACT_COEFS};
    use crate::report::format_report;

    #[test]
    fn parses_what_the_sink_writes() {
        let report = ErrorReport {
            rmsd: 0.000123,
            max_abs_error: 2.5e-7,
            max_bits_error: 4,
            samples: 1,
        };
        let text = format_report(&EXACT_COEFS, &report);
        let parsed = parse_report(Path::new("x.txt"), &text).unwrap();
        assert_eq!(parsed.coef_lines.len(), 6);
        assert!(parsed.coef_lines[0].starts_with("coef 0: -0.1013211"));
        assert!((parsed.rmsd - 0.000123).abs() < 1e-15);
        assert!((parsed.max_abs_error - 2.5e-7).abs() < 1e-18);
        assert_eq!(parsed.max_bits_error, Some(4));
    }

    #[test]
    fn incomplete_files_are_rejected() {
        assert!(parse_report(Path::new("x"), "coef 0: 1\nRMSD: 0.5\n").is_none());
        assert!(parse_report(Path::new("x"), "RMSD: abc\nmaximum measured error: 0.1\n").is_none());
    }

    #[test]
    fn load_reports_skips_garbage_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        let report = ErrorReport { rmsd: 0.5, max_abs_error: 0.1, max_bits_error: 1, samples: 1 };
        fs::write(dir.path().join("b.txt"), format_report(&EXACT_COEFS, &report)).unwrap();
        fs::write(dir.path().join("a.txt"), format_report(&EXACT_COEFS, &report)).unwrap();
        fs::write(dir.path().join("junk.txt"), "hello").unwrap();
        fs::create_dir(dir.path().join("order_5")).unwrap();

        let ingested = load_reports(dir.path()).unwrap();
        let names: Vec<String> = ingested
            .reports
            .iter()
            .map(|r| r.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
        assert_eq!(ingested.skipped.len(), 1);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_reports(&dir.path().join("nope")).is_err());
    }
}
