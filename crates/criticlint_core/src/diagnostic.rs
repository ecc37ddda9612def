//! Diagnostics built from violation records.

use serde::{Deserialize, Serialize};

use crate::severity::{DisplayLevel, SeverityTier, level_of};
use crate::violation::{ViolationRecord, parse_output};
use crate::LintConfig;

/// End column used for every diagnostic range.
///
/// Perl::Critic reports only where a violation starts, so the range runs
/// from the reported column to this column on the same line.
pub const END_COLUMN_SENTINEL: u32 = 300;

/// Zero-based line/column position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// Zero-based range within a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineRange {
    pub start: Position,
    pub end: Position,
}

impl LineRange {
    /// Range for a violation reported at a 1-based `line` and `column`.
    ///
    /// Missing or non-positive numbers clamp to the first line or column.
    pub fn for_violation(line: Option<i64>, column: Option<i64>) -> Self {
        let line = to_zero_based(line);
        let column = to_zero_based(column);
        Self {
            start: Position::new(line, column),
            end: Position::new(line, END_COLUMN_SENTINEL),
        }
    }
}

fn to_zero_based(value: Option<i64>) -> u32 {
    value
        .and_then(|n| u32::try_from(n.saturating_sub(1)).ok())
        .unwrap_or(0)
}

/// A positioned, leveled diagnostic ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LintDiagnostic {
    /// Location in the document.
    pub range: LineRange,

    /// Message prefixed with the uppercased tier name, e.g. `GENTLE: ...`.
    pub message: String,

    /// Display level chosen by the configuration for the tier.
    pub level: DisplayLevel,

    /// Perl::Critic tier of the violation.
    pub tier: SeverityTier,

    /// Policy that reported the violation.
    pub policy: String,
}

impl LintDiagnostic {
    /// Builds a diagnostic from a parsed record.
    pub fn from_violation(record: &ViolationRecord, config: &LintConfig) -> Self {
        let tier = SeverityTier::from_parsed_code(record.severity_code);
        Self {
            range: LineRange::for_violation(record.line, record.column),
            message: format!("{}: {}", tier.as_str().to_uppercase(), record.message),
            level: level_of(tier, config),
            tier,
            policy: record.policy.clone(),
        }
    }

    /// 1-based line number, as shown in reports.
    pub fn display_line(&self) -> u32 {
        self.range.start.line + 1
    }

    /// 1-based column number, as shown in reports.
    pub fn display_column(&self) -> u32 {
        self.range.start.column + 1
    }
}

/// Builds the diagnostic set for a complete output buffer, in output order.
pub fn build_diagnostics(output: &str, config: &LintConfig) -> Vec<LintDiagnostic> {
    parse_output(output)
        .map(|record| LintDiagnostic::from_violation(&record, config))
        .collect()
}
