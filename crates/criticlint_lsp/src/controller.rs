//! Lint invocation control.
//!
//! One call to [`lint_document`] is one invocation: guard checks, a ticket
//! from the store, one Perl::Critic process, and a publish that the store
//! may reject if a newer invocation already finished.

use std::path::Path;

use tower_lsp::lsp_types::Url;
use tracing::{debug, error};

use criticlint_core::{CriticError, CriticInvocation, LintConfig, LintDiagnostic};

use crate::state::BackendState;
use crate::store::PublishOutcome;

/// Language identifier of documents this server lints.
pub const PERL_LANGUAGE_ID: &str = "perl";

/// Extensions treated as Perl when the language identifier is unknown.
const PERL_EXTENSIONS: &[&str] = &["pl", "pm", "t", "psgi", "cgi"];

/// Why an invocation was not made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NotPerl,
    Disabled,
    NotAFile,
}

/// Result of one lint request.
#[derive(Debug)]
pub enum LintOutcome {
    /// No process was spawned.
    Skipped(SkipReason),
    /// The store accepted a new set of `count` diagnostics.
    Published { count: usize },
    /// The results were dropped in favour of a newer invocation or a close.
    Superseded(PublishOutcome),
    /// The tool could not be run; the previous set is untouched.
    Failed(CriticError),
}

/// Returns true if the document should be linted.
pub fn is_perl_document(language_id: Option<&str>, uri: &Url) -> bool {
    match language_id {
        Some(id) => id == PERL_LANGUAGE_ID,
        None => Path::new(uri.path())
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| PERL_EXTENSIONS.contains(&ext)),
    }
}

/// Lints `uri` and records the result in the store.
pub(crate) async fn lint_document(
    state: &BackendState,
    uri: &Url,
    language_id: Option<&str>,
) -> LintOutcome {
    if !is_perl_document(language_id, uri) {
        debug!("Skipping non-Perl document: {}", uri);
        return LintOutcome::Skipped(SkipReason::NotPerl);
    }

    let config = match state.config.read() {
        Ok(guard) => guard.clone(),
        Err(e) => {
            error!("Config lock poisoned: {}", e);
            return LintOutcome::Skipped(SkipReason::Disabled);
        }
    };
    if !config.enabled {
        debug!("Linting disabled, skipping {}", uri);
        return LintOutcome::Skipped(SkipReason::Disabled);
    }

    let path = match uri.to_file_path() {
        Ok(p) => p,
        Err(_) => {
            debug!("Skipping validation for non-file URI: {}", uri);
            return LintOutcome::Skipped(SkipReason::NotAFile);
        }
    };

    let workspace_root = match state.workspace_root.read() {
        Ok(guard) => guard.clone(),
        Err(e) => {
            error!("Workspace root lock poisoned: {}", e);
            None
        }
    };

    let ticket = state.store.begin(uri);
    debug!("Linting {} (invocation {})", ticket.uri(), ticket.seq());

    let invocation = CriticInvocation::new(&config, &path, workspace_root.as_deref());
    let output = match criticlint_core::run(&invocation).await {
        Ok(output) => output,
        Err(e) => return LintOutcome::Failed(e),
    };

    let diagnostics = to_diagnostics(&output.violations, &config);
    let count = diagnostics.len();
    match state.store.publish(&ticket, diagnostics) {
        PublishOutcome::Published => LintOutcome::Published { count },
        other => {
            debug!(
                "Discarding invocation {} for {}: {:?}",
                ticket.seq(),
                ticket.uri(),
                other
            );
            LintOutcome::Superseded(other)
        }
    }
}

fn to_diagnostics(
    violations: &[criticlint_core::ViolationRecord],
    config: &LintConfig,
) -> Vec<LintDiagnostic> {
    violations
        .iter()
        .map(|record| LintDiagnostic::from_violation(record, config))
        .collect()
}
