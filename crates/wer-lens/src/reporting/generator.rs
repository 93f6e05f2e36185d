use crate::error::{AnalysisError, Result};
use crate::reporting::TermErrorReport;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes term error reports to disk as pretty-printed JSON.
///
/// Writes are whole-file: the report is fully serialized before the file is
/// created, and any failure aborts the run without leaving partial output
/// behind a successful exit.
pub struct ReportGenerator {
    output_path: PathBuf,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("term_error_analysis.json"),
        }
    }
}

impl ReportGenerator {
    /// Create a generator targeting a specific output path.
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }

    /// Path the report will be written to.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Serialize the report and write it to the output path.
    ///
    /// Parent directories are created as needed. Any failure along the way
    /// surfaces as [`AnalysisError::ReportGenerationFailed`].
    pub fn write(&self, report: &TermErrorReport) -> Result<PathBuf> {
        let serialized = serde_json::to_string_pretty(report)
            .map_err(|e| AnalysisError::ReportGenerationFailed(e.to_string()))?;

        if let Some(parent) = self.output_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| self.write_failure(e))?;
        }

        let mut file = File::create(&self.output_path).map_err(|e| self.write_failure(e))?;
        file.write_all(serialized.as_bytes())
            .map_err(|e| self.write_failure(e))?;

        info!("Report saved: {}", self.output_path.display());

        Ok(self.output_path.clone())
    }

    fn write_failure(&self, e: std::io::Error) -> AnalysisError {
        AnalysisError::ReportGenerationFailed(format!(
            "cannot write {}: {}",
            self.output_path.display(),
            e
        ))
    }
}
