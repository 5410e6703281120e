//! Result files: one human-readable text report per task.

use std::fs::{File, create_dir_all};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::domain::{ErrorReport, ScanTask};
use crate::error::AppError;
use crate::report::{ReportSink, format_report};

/// Create the output directory (and parents). An existing directory is fine.
pub fn ensure_output_dir(path: &Path) -> Result<(), AppError> {
    create_dir_all(path).map_err(|e| {
        AppError::io(format!("Failed to create output directory '{}': {e}", path.display()))
    })
}

/// Writes `<dir>/<task id>.txt` for every completed task.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, task: &ScanTask) -> PathBuf {
        self.dir.join(format!("{}.txt", task.id))
    }
}

impl ReportSink for FileSink {
    fn persist(&self, task: &ScanTask, report: &ErrorReport) -> Result<(), AppError> {
        let path = self.path_for(task);
        let mut file = File::create(&path)
            .map_err(|e| AppError::io(format!("Failed to create report '{}': {e}", path.display())))?;
        file.write_all(format_report(&task.coefs, report).as_bytes())
            .map_err(|e| AppError::io(format!("Failed to write report '{}': {e}", path.display())))?;
        Ok(())
    }
}
