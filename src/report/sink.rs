//! Destinations for completed scan reports.
//!
//! Sinks are shared by every worker, so implementations must serialize their
//! own writes. The file sink (see `io::export`) writes one distinct file per
//! task and needs no locking.

use std::io::Write;
use std::sync::Mutex;

use crate::domain::{ErrorReport, ScanTask};
use crate::error::AppError;
use crate::report::format_report;

pub trait ReportSink: Sync {
    fn persist(&self, task: &ScanTask, report: &ErrorReport) -> Result<(), AppError>;
}

/// Writes every report to stdout, one whole report per write.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl ReportSink for ConsoleSink {
    fn persist(&self, task: &ScanTask, report: &ErrorReport) -> Result<(), AppError> {
        let text = format_report(&task.coefs, report);
        let mut out = std::io::stdout().lock();
        out.write_all(text.as_bytes())
            .and_then(|()| out.flush())
            .map_err(|e| AppError::io(format!("Failed to write report {} to stdout: {e}", task.id)))
    }
}

/// Keeps reports in memory (library use and tests).
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<(ScanTask, ErrorReport)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collected reports, sorted by task id.
    pub fn into_entries(self) -> Vec<(ScanTask, ErrorReport)> {
        let mut entries = self.entries.into_inner().unwrap_or_else(|e| e.into_inner());
        entries.sort_by(|a, b| a.0.id.cmp(&b.0.id));
        entries
    }
}

impl ReportSink for MemorySink {
    fn persist(&self, task: &ScanTask, report: &ErrorReport) -> Result<(), AppError> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((task.clone(), *report));
        Ok(())
    }
}
