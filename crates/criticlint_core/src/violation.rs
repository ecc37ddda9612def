//! Perl::Critic violation records.
//!
//! Perl::Critic is asked to print every violation on one line using
//! [`OUTPUT_TEMPLATE`]. Fields are joined by [`FIELD_SEPARATOR`] and the
//! record ends with [`END_MARKER`]:
//!
//! ```text
//! 5~|~10~|~3~|~Useless use of a variable~|~See page 208 of PBP~|~Variables::Foo~||~
//! ```
//!
//! A line that does not split into exactly six fields is dropped without
//! error. A message containing the separator is therefore lost.

use serde::Serialize;

/// Separator between fields of one record.
pub const FIELD_SEPARATOR: &str = "~|~";

/// Token terminating a record.
pub const END_MARKER: &str = "~||~";

/// `--verbose` format handed to Perl::Critic: severity, line, column,
/// message, explanation and policy name, then the end marker and a newline.
pub const OUTPUT_TEMPLATE: &str = "%s~|~%l~|~%c~|~%m~|~%e~|~%p~||~%n";

/// One violation as printed by Perl::Critic.
///
/// Numeric fields are parsed best-effort and are `None` when the tool
/// printed something that is not a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViolationRecord {
    /// Severity code, 1 (brutal) to 5 (gentle).
    pub severity_code: Option<i64>,
    /// 1-based line number.
    pub line: Option<i64>,
    /// 1-based column number.
    pub column: Option<i64>,
    /// Violation description.
    pub message: String,
    /// Explanation or book reference.
    pub explanation: String,
    /// Name of the policy that reported the violation.
    pub policy: String,
}

impl ViolationRecord {
    /// Parses a single output line.
    ///
    /// Returns `None` for blank, truncated or otherwise malformed lines.
    pub fn parse_line(line: &str) -> Option<Self> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let body = line.replacen(END_MARKER, "", 1);
        let fields: Vec<&str> = body.split(FIELD_SEPARATOR).collect();

        let [severity, line_no, column, message, explanation, policy] = fields.as_slice() else {
            return None;
        };

        Some(Self {
            severity_code: parse_leading_int(severity),
            line: parse_leading_int(line_no),
            column: parse_leading_int(column),
            message: (*message).to_string(),
            explanation: (*explanation).to_string(),
            policy: (*policy).to_string(),
        })
    }
}

/// Lazily parses a complete output buffer, one record per valid line.
///
/// Records are yielded in output order.
pub fn parse_output(output: &str) -> impl Iterator<Item = ViolationRecord> + '_ {
    output.lines().filter_map(ViolationRecord::parse_line)
}

/// Parses the leading integer of `s`, skipping leading whitespace.
///
/// Trailing garbage after the digits is ignored, so `"12abc"` is 12 and
/// `"abc"` is `None`.
fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, digits) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}
