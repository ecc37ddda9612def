//! Perl::Critic command-line construction.

use std::path::{Path, PathBuf};

use crate::LintConfig;
use crate::violation::OUTPUT_TEMPLATE;

/// A fully resolved Perl::Critic invocation for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriticInvocation {
    program: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl CriticInvocation {
    /// Builds the invocation for `file`.
    ///
    /// `fallback_dir` is used as working directory when the configuration
    /// does not name one.
    pub fn new(config: &LintConfig, file: &Path, fallback_dir: Option<&Path>) -> Self {
        Self {
            program: config.executable.clone(),
            args: build_arguments(config, file),
            working_dir: config.working_directory(fallback_dir),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    /// The invocation as one shell command line, every word quoted.
    pub fn shell_line(&self) -> String {
        shell_words::join(
            std::iter::once(self.program.as_str()).chain(self.args.iter().map(String::as_str)),
        )
    }
}

/// Builds the argument list for linting `file`.
///
/// Order: severity threshold, `--noprofile` when profiles are disabled,
/// one `--exclude <policy>` pair per excluded policy, `--verbose` with the
/// output template, then the file path.
pub fn build_arguments(config: &LintConfig, file: &Path) -> Vec<String> {
    let mut args = vec![config.severity.threshold_flag()];

    if !config.use_profile {
        args.push("--noprofile".to_string());
    }

    for policy in &config.excluded_policies {
        args.push("--exclude".to_string());
        args.push(policy.clone());
    }

    args.push("--verbose".to_string());
    args.push(OUTPUT_TEMPLATE.to_string());
    args.push(file.to_string_lossy().into_owned());

    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SeverityTier;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_arguments() {
        let args = build_arguments(&LintConfig::default(), Path::new("lib/Foo.pm"));
        assert_eq!(
            args,
            vec!["--gentle", "--verbose", OUTPUT_TEMPLATE, "lib/Foo.pm"]
        );
    }

    #[test]
    fn test_full_arguments_in_order() {
        let config = LintConfig {
            severity: SeverityTier::Harsh,
            use_profile: false,
            excluded_policies: vec!["Foo::Bar".to_string(), "Baz::Qux".to_string()],
            ..LintConfig::default()
        };
        let args = build_arguments(&config, Path::new("/tmp/script.pl"));
        assert_eq!(
            args,
            vec![
                "--harsh",
                "--noprofile",
                "--exclude",
                "Foo::Bar",
                "--exclude",
                "Baz::Qux",
                "--verbose",
                OUTPUT_TEMPLATE,
                "/tmp/script.pl",
            ]
        );
    }

    #[test]
    fn test_no_exclude_flags_for_empty_list() {
        let args = build_arguments(&LintConfig::default(), Path::new("a.pl"));
        assert!(!args.iter().any(|a| a == "--exclude"));
    }

    #[test]
    fn test_invocation_working_dir() {
        let config = LintConfig::default();
        let invocation = CriticInvocation::new(&config, Path::new("a.pl"), Some(Path::new("/ws")));
        assert_eq!(invocation.program(), "perlcritic");
        assert_eq!(invocation.working_dir(), Some(Path::new("/ws")));

        let config = LintConfig {
            path: "/elsewhere".to_string(),
            ..LintConfig::default()
        };
        let invocation = CriticInvocation::new(&config, Path::new("a.pl"), Some(Path::new("/ws")));
        assert_eq!(invocation.working_dir(), Some(Path::new("/elsewhere")));
    }

    #[test]
    fn test_shell_line_survives_shell_splitting() {
        let config = LintConfig {
            excluded_policies: vec!["Foo::Bar".to_string()],
            ..LintConfig::default()
        };
        let invocation =
            CriticInvocation::new(&config, Path::new("/tmp/my script; rm -rf.pl"), None);
        let words = shell_words::split(&invocation.shell_line()).unwrap();

        assert_eq!(words[0], "perlcritic");
        assert_eq!(&words[1..], invocation.args());
        assert_eq!(words.last().unwrap(), "/tmp/my script; rm -rf.pl");
    }
}
