//! # criticlint_core
//!
//! Turns Perl::Critic output into editor diagnostics.
//!
//! This crate provides:
//! - Parsing of the tool's line-oriented violation records
//! - Severity tier and display level mapping
//! - Diagnostic construction
//! - Configuration loading
//! - Command-line construction and process execution
//!
//! ## Example
//!
//! ```rust,ignore
//! use criticlint_core::{CriticInvocation, LintConfig, LintDiagnostic};
//!
//! let config = LintConfig::from_file(".criticlint.json")?;
//! let invocation = CriticInvocation::new(&config, Path::new("lib/Foo.pm"), None);
//! let output = criticlint_core::run(&invocation).await?;
//! for record in &output.violations {
//!     let diag = LintDiagnostic::from_violation(record, &config);
//!     println!("{}: {}", diag.display_line(), diag.message);
//! }
//! ```

mod command;
mod config;
mod diagnostic;
mod error;
mod runner;
mod severity;
mod violation;

pub use command::{CriticInvocation, build_arguments};
pub use config::LintConfig;
pub use diagnostic::{END_COLUMN_SENTINEL, LineRange, LintDiagnostic, Position, build_diagnostics};
pub use error::CriticError;
pub use runner::{CriticOutput, collect_violations, run};
pub use severity::{DisplayLevel, SeverityTier, level_of};
pub use violation::{END_MARKER, FIELD_SEPARATOR, OUTPUT_TEMPLATE, ViolationRecord, parse_output};
