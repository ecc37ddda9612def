//! Severity tiers and display levels.
//!
//! Perl::Critic scores every violation from 1 (brutal) to 5 (gentle).
//! Editors show diagnostics at one of four levels, and the user decides
//! which level each tier maps to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CriticError, LintConfig};

/// Perl::Critic severity tier, ordered from most to least severe.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum SeverityTier {
    /// Code 1 and anything unrecognized.
    Brutal,
    /// Code 2.
    Cruel,
    /// Code 3.
    Harsh,
    /// Code 4.
    Stern,
    /// Code 5, the mildest tier.
    #[default]
    Gentle,
}

impl SeverityTier {
    /// All tiers, most severe first.
    pub const ALL: [SeverityTier; 5] = [
        SeverityTier::Brutal,
        SeverityTier::Cruel,
        SeverityTier::Harsh,
        SeverityTier::Stern,
        SeverityTier::Gentle,
    ];

    /// Maps a numeric severity code to its tier.
    ///
    /// Only 2 through 5 have a dedicated tier; every other value is brutal.
    pub fn from_code(code: i64) -> Self {
        match code {
            5 => SeverityTier::Gentle,
            4 => SeverityTier::Stern,
            3 => SeverityTier::Harsh,
            2 => SeverityTier::Cruel,
            _ => SeverityTier::Brutal,
        }
    }

    /// Maps an optional code, as parsed from tool output, to its tier.
    pub fn from_parsed_code(code: Option<i64>) -> Self {
        code.map_or(SeverityTier::Brutal, Self::from_code)
    }

    /// Lowercase tier name, also the name of the matching command-line flag.
    pub fn as_str(self) -> &'static str {
        match self {
            SeverityTier::Brutal => "brutal",
            SeverityTier::Cruel => "cruel",
            SeverityTier::Harsh => "harsh",
            SeverityTier::Stern => "stern",
            SeverityTier::Gentle => "gentle",
        }
    }

    /// Command-line flag selecting this tier as the reporting threshold.
    pub fn threshold_flag(self) -> String {
        format!("--{}", self.as_str())
    }
}

impl fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeverityTier {
    type Err = CriticError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_tier(s).map_err(CriticError::config)
    }
}

impl TryFrom<String> for SeverityTier {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parse_tier(&value)
    }
}

/// Accepts a tier name in any case or a code from 1 to 5.
fn parse_tier(s: &str) -> Result<SeverityTier, String> {
    let s = s.trim();
    if let Some(tier) = SeverityTier::ALL
        .into_iter()
        .find(|tier| tier.as_str().eq_ignore_ascii_case(s))
    {
        return Ok(tier);
    }
    match s.parse::<i64>() {
        Ok(code @ 1..=5) => Ok(SeverityTier::from_code(code)),
        _ => Err(format!(
            "unknown severity '{}': expected one of brutal, cruel, harsh, stern, gentle or 1-5",
            s
        )),
    }
}

/// Editor-facing severity of a diagnostic.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DisplayLevel {
    #[default]
    Error,
    Warning,
    Information,
    Hint,
}

impl DisplayLevel {
    /// Interprets a configured display-level string.
    ///
    /// `"hint"`, `"info"` and `"warning"` are recognized; any other value,
    /// including the empty string, is `Error`.
    pub fn from_setting(value: &str) -> Self {
        match value {
            "hint" => DisplayLevel::Hint,
            "info" => DisplayLevel::Information,
            "warning" => DisplayLevel::Warning,
            _ => DisplayLevel::Error,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DisplayLevel::Error => "error",
            DisplayLevel::Warning => "warning",
            DisplayLevel::Information => "info",
            DisplayLevel::Hint => "hint",
        }
    }
}

impl fmt::Display for DisplayLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves the display level the configuration assigns to `tier`.
pub fn level_of(tier: SeverityTier, config: &LintConfig) -> DisplayLevel {
    DisplayLevel::from_setting(config.level_setting(tier))
}
