//! CriticLint error types.

use thiserror::Error;

/// Errors that can occur while configuring or invoking Perl::Critic.
#[derive(Debug, Error)]
pub enum CriticError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The external tool could not be started.
    #[error("Failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CriticError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a spawn error for `program`.
    pub fn spawn(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::Spawn {
            program: program.into(),
            source,
        }
    }

    /// Returns true if this error means the tool never ran.
    pub fn is_spawn_failure(&self) -> bool {
        matches!(self, Self::Spawn { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_error_message_names_program() {
        let err = CriticError::spawn(
            "perlcritic",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        assert!(err.is_spawn_failure());
        assert_eq!(err.to_string(), "Failed to start `perlcritic`: not found");
    }

    #[test]
    fn test_config_error_is_not_spawn_failure() {
        let err = CriticError::config("bad severity");
        assert!(!err.is_spawn_failure());
        assert_eq!(err.to_string(), "Configuration error: bad severity");
    }
}
