//! Check command implementation

use std::path::{Path, PathBuf};

use miette::{IntoDiagnostic, Result};
use tracing::{debug, info};

use criticlint_core::{CriticError, CriticInvocation, LintConfig, LintDiagnostic};

use crate::cli::{Cli, OutputFormat};
use crate::output::{FileReport, output_reports};
use crate::utils::create_tokio_runtime;

/// Runs Perl::Critic on every file in turn. Returns true if any violation
/// was reported.
pub fn run_check(cli: &Cli, files: &[PathBuf], format: OutputFormat) -> Result<bool> {
    let cwd = std::env::current_dir().into_diagnostic()?;
    let config = load_config(cli.config.as_deref(), &cwd)?;

    if !config.enabled {
        info!("Linting is disabled by configuration");
        return Ok(false);
    }

    let runtime = create_tokio_runtime()?;
    let reports = runtime
        .block_on(check_files(&config, files, &cwd))
        .into_diagnostic()?;

    output_reports(&reports, format)
}

fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<LintConfig> {
    if let Some(path) = explicit {
        return LintConfig::from_file(path).into_diagnostic();
    }

    match LintConfig::discover(cwd) {
        Some(path) => {
            info!("Using config file: {}", path.display());
            LintConfig::from_file(&path).into_diagnostic()
        }
        None => {
            debug!("No config file found, using defaults");
            Ok(LintConfig::default())
        }
    }
}

async fn check_files(
    config: &LintConfig,
    files: &[PathBuf],
    cwd: &Path,
) -> Result<Vec<FileReport>, CriticError> {
    let mut reports = Vec::with_capacity(files.len());

    for file in files {
        let invocation = CriticInvocation::new(config, file, Some(cwd));
        debug!("Running: {}", invocation.shell_line());

        let output = criticlint_core::run(&invocation).await?;
        if output.discarded_lines > 0 {
            debug!(
                "Ignored {} unrecognized output line(s) for {}",
                output.discarded_lines,
                file.display()
            );
        }

        let diagnostics = output
            .violations
            .iter()
            .map(|record| LintDiagnostic::from_violation(record, config))
            .collect();
        reports.push(FileReport {
            path: file.clone(),
            diagnostics,
        });
    }

    Ok(reports)
}
