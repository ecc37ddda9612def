//! Lint configuration.

use std::fs;
use std::path::{Path, PathBuf};

use jsonc_parser::ParseOptions;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{CriticError, SeverityTier};

/// Configuration for Perl::Critic invocations.
///
/// Keys are camelCase on the wire, matching editor settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LintConfig {
    /// Whether linting runs at all.
    pub enabled: bool,

    /// Minimum tier to report.
    pub severity: SeverityTier,

    /// Whether to honour the user's `.perlcriticrc`.
    pub use_profile: bool,

    /// Policies passed to `--exclude`, in order.
    pub excluded_policies: Vec<String>,

    /// Working directory for the tool. Empty means the workspace root.
    pub path: String,

    /// Program to run.
    pub executable: String,

    /// Display level for brutal violations.
    #[serde(deserialize_with = "lenient_level")]
    pub brutal: String,
    /// Display level for cruel violations.
    #[serde(deserialize_with = "lenient_level")]
    pub cruel: String,
    /// Display level for harsh violations.
    #[serde(deserialize_with = "lenient_level")]
    pub harsh: String,
    /// Display level for stern violations.
    #[serde(deserialize_with = "lenient_level")]
    pub stern: String,
    /// Display level for gentle violations.
    #[serde(deserialize_with = "lenient_level")]
    pub gentle: String,
}

impl LintConfig {
    /// Configuration file names, in discovery order.
    pub const CONFIG_FILES: &'static [&'static str] = &[".criticlint.jsonc", ".criticlint.json"];

    /// Default program name.
    pub const DEFAULT_EXECUTABLE: &'static str = "perlcritic";

    /// Creates the default configuration.
    pub fn new() -> Self {
        Self {
            enabled: true,
            severity: SeverityTier::Gentle,
            use_profile: true,
            excluded_policies: Vec::new(),
            path: String::new(),
            executable: Self::DEFAULT_EXECUTABLE.to_string(),
            brutal: "error".to_string(),
            cruel: "error".to_string(),
            harsh: "warning".to_string(),
            stern: "warning".to_string(),
            gentle: "info".to_string(),
        }
    }

    /// Finds a configuration file in `dir`.
    pub fn discover(dir: impl AsRef<Path>) -> Option<PathBuf> {
        let dir = dir.as_ref();
        Self::CONFIG_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Loads configuration from a JSON (comments allowed) file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CriticError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| CriticError::config(format!("Failed to read config: {}", e)))?;
        Self::from_json(&content)
    }

    /// Parses configuration from JSON text. Comments and trailing commas are accepted.
    pub fn from_json(json: &str) -> Result<Self, CriticError> {
        let value = jsonc_parser::parse_to_serde_value(json, &ParseOptions::default())
            .map_err(|e| CriticError::config(format!("Invalid JSON: {}", e)))?
            .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()));

        Self::new().merged_with(&value)
    }

    /// Builds configuration from editor settings on top of the defaults.
    pub fn from_settings(settings: &serde_json::Value) -> Result<Self, CriticError> {
        Self::new().merged_with(settings)
    }

    /// Returns a copy with the keys present in `settings` overriding `self`.
    ///
    /// `settings` may be the configuration object itself or editor settings
    /// holding it under `criticlint`, `perl-toolbox.lint` or
    /// `perl-toolbox` / `lint`. Null settings leave the configuration unchanged.
    pub fn merged_with(&self, settings: &serde_json::Value) -> Result<Self, CriticError> {
        let overrides = match settings_section(settings) {
            serde_json::Value::Null => return Ok(self.clone()),
            serde_json::Value::Object(map) => map,
            other => {
                return Err(CriticError::config(format!(
                    "Expected a settings object, got {}",
                    other
                )));
            }
        };

        let mut merged = serde_json::to_value(self)
            .map_err(|e| CriticError::config(format!("Invalid config: {}", e)))?;
        if let serde_json::Value::Object(base) = &mut merged {
            for (key, value) in overrides {
                base.insert(key.clone(), value.clone());
            }
        }

        serde_json::from_value(merged)
            .map_err(|e| CriticError::config(format!("Invalid config: {}", e)))
    }

    /// Configured display-level string for `tier`.
    pub fn level_setting(&self, tier: SeverityTier) -> &str {
        match tier {
            SeverityTier::Brutal => &self.brutal,
            SeverityTier::Cruel => &self.cruel,
            SeverityTier::Harsh => &self.harsh,
            SeverityTier::Stern => &self.stern,
            SeverityTier::Gentle => &self.gentle,
        }
    }

    /// Working directory for an invocation, falling back to `fallback`
    /// when no path is configured.
    pub fn working_directory(&self, fallback: Option<&Path>) -> Option<PathBuf> {
        if self.path.trim().is_empty() {
            fallback.map(Path::to_path_buf)
        } else {
            Some(PathBuf::from(&self.path))
        }
    }
}

impl Default for LintConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Accepts any JSON value for a display level. Non-strings become the
/// empty string, which displays as an error.
fn lenient_level<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(level) => Ok(level),
        _ => Ok(String::new()),
    }
}

fn settings_section(settings: &serde_json::Value) -> &serde_json::Value {
    if let Some(section) = settings.get("criticlint") {
        return section;
    }
    if let Some(section) = settings.get("perl-toolbox.lint") {
        return section;
    }
    if let Some(section) = settings.get("perl-toolbox").and_then(|v| v.get("lint")) {
        return section;
    }
    settings
}
