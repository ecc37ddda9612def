//! LSP type conversion utilities.

use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, NumberOrString, Position, Range};

use criticlint_core::{DisplayLevel, LineRange, LintDiagnostic};

/// Value of the `source` field on every published diagnostic.
pub const DIAGNOSTIC_SOURCE: &str = "perlcritic";

/// Converts a CriticLint diagnostic to an LSP diagnostic.
pub fn to_lsp_diagnostic(diag: &LintDiagnostic) -> Diagnostic {
    Diagnostic {
        range: to_lsp_range(&diag.range),
        severity: Some(to_lsp_severity(diag.level)),
        code: (!diag.policy.is_empty()).then(|| NumberOrString::String(diag.policy.clone())),
        source: Some(DIAGNOSTIC_SOURCE.to_string()),
        message: diag.message.clone(),
        ..Default::default()
    }
}

pub fn to_lsp_range(range: &LineRange) -> Range {
    Range::new(
        Position::new(range.start.line, range.start.column),
        Position::new(range.end.line, range.end.column),
    )
}

pub fn to_lsp_severity(level: DisplayLevel) -> DiagnosticSeverity {
    match level {
        DisplayLevel::Error => DiagnosticSeverity::ERROR,
        DisplayLevel::Warning => DiagnosticSeverity::WARNING,
        DisplayLevel::Information => DiagnosticSeverity::INFORMATION,
        DisplayLevel::Hint => DiagnosticSeverity::HINT,
    }
}
