//! Output formatting module

mod json;
mod text;

use std::path::PathBuf;

use miette::Result;

use criticlint_core::LintDiagnostic;

use crate::cli::OutputFormat;

/// Diagnostics reported for one file.
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub diagnostics: Vec<LintDiagnostic>,
}

pub fn output_reports(reports: &[FileReport], format: OutputFormat) -> Result<bool> {
    let has_violations = reports.iter().any(|r| !r.diagnostics.is_empty());

    match format {
        OutputFormat::Json => json::output_json(reports)?,
        OutputFormat::Text => text::output_text(reports),
    }

    Ok(has_violations)
}
