//! Text output formatter

use criticlint_core::LintDiagnostic;

use super::FileReport;

pub fn output_text(reports: &[FileReport]) {
    for report in reports {
        for diag in &report.diagnostics {
            println!("{}", format_line(&report.path.display().to_string(), diag));
        }
    }

    let total_files = reports.len();
    let total_issues: usize = reports.iter().map(|r| r.diagnostics.len()).sum();

    println!();
    println!("Checked {} files, found {} issues", total_files, total_issues);
}

fn format_line(path: &str, diag: &LintDiagnostic) -> String {
    let policy = if diag.policy.is_empty() {
        String::new()
    } else {
        format!(" [{}]", diag.policy)
    };
    format!(
        "{}:{}:{} {}{}: {}",
        path,
        diag.display_line(),
        diag.display_column(),
        diag.level.as_str(),
        policy,
        diag.message
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use criticlint_core::{LintConfig, build_diagnostics};

    #[test]
    fn test_format_line() {
        let diags = build_diagnostics(
            "5~|~9~|~2~|~Useless use of a variable~|~e~|~Variables::ProhibitUseless~||~",
            &LintConfig::default(),
        );
        assert_eq!(
            format_line("lib/Foo.pm", &diags[0]),
            "lib/Foo.pm:9:2 info [Variables::ProhibitUseless]: GENTLE: Useless use of a variable"
        );
    }

    #[test]
    fn test_format_line_without_policy() {
        let diags = build_diagnostics("1~|~1~|~1~|~Bad~|~~|~~||~", &LintConfig::default());
        assert_eq!(format_line("a.pl", &diags[0]), "a.pl:1:1 error: BRUTAL: Bad");
    }
}
