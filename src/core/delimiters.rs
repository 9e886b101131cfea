//! Delimiter definitions for the balance checker
//!
//! This module holds the two EJS tag delimiters and the small text helpers
//! used to count them, scan lines and truncate diagnostic output.

use serde::Serialize;

/// Opening delimiter of an embedded template expression
pub const OPEN_DELIMITER: &str = "<%";

/// Closing delimiter of an embedded template expression
pub const CLOSE_DELIMITER: &str = "%>";

/// Maximum number of characters shown for a flagged line
pub const LINE_PREVIEW_CHARS: usize = 80;

/// A line containing at least one delimiter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlaggedLine {
    /// 1-based line number
    pub number: usize,
    /// First `LINE_PREVIEW_CHARS` characters of the line
    pub text: String,
    /// Running balance after this line
    pub balance: i64,
}

/// A UTF-16 code unit outside printable ASCII
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnusualChar {
    /// 1-based line number
    pub line: usize,
    /// 1-based column, counted in UTF-16 code units
    pub column: usize,
    pub code: u16,
}

/// Count non-overlapping occurrences of `needle` in `haystack`.
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

/// Count opening and closing delimiters in a piece of text.
///
/// # Returns
///
/// `(opens, closes)`
pub fn count_delimiters(text: &str) -> (usize, usize) {
    (
        count_occurrences(text, OPEN_DELIMITER),
        count_occurrences(text, CLOSE_DELIMITER),
    )
}

/// Convert `\r\n` and lone `\r` line endings to `\n`.
pub fn normalize_newlines(content: String) -> String {
    if !content.contains('\r') {
        return content;
    }
    content.replace("\r\n", "\n").replace('\r', "\n")
}

/// Truncate a line to at most `max_chars` characters.
///
/// Works on characters rather than bytes so multi-byte text is never cut
/// inside a code point.
pub fn preview(line: &str, max_chars: usize) -> &str {
    match line.char_indices().nth(max_chars) {
        Some((idx, _)) => &line[..idx],
        None => line,
    }
}

/// Walk the content line by line and collect every line that mentions a
/// delimiter.
///
/// Lines are split on `'\n'`; callers normalize other line endings first
/// (see `normalize_newlines`). The running balance is tracked for every
/// line and recorded on flagged ones, but it never decides which lines are
/// flagged.
pub fn flag_lines(content: &str) -> Vec<FlaggedLine> {
    let mut balance: i64 = 0;
    let mut flagged = Vec::new();

    for (idx, line) in content.split('\n').enumerate() {
        let (opens, closes) = count_delimiters(line);
        balance += opens as i64;
        balance -= closes as i64;

        if line.contains(OPEN_DELIMITER) || line.contains(CLOSE_DELIMITER) {
            flagged.push(FlaggedLine {
                number: idx + 1,
                text: preview(line, LINE_PREVIEW_CHARS).to_string(),
                balance,
            });
        }
    }

    flagged
}

/// Whether a UTF-16 code unit is worth reporting in a template.
///
/// Anything above ASCII, plus control characters other than tab, LF and CR.
/// Characters outside the BMP show up as two surrogate units.
pub fn is_unusual(code: u16) -> bool {
    code > 127 || (code < 32 && !matches!(code, 0x09 | 0x0a | 0x0d))
}

/// Find all unusual code units in the content.
pub fn find_unusual_chars(content: &str) -> Vec<UnusualChar> {
    content
        .split('\n')
        .enumerate()
        .flat_map(|(line_idx, line)| {
            line.encode_utf16()
                .enumerate()
                .filter(|(_, code)| is_unusual(*code))
                .map(move |(col_idx, code)| UnusualChar {
                    line: line_idx + 1,
                    column: col_idx + 1,
                    code,
                })
        })
        .collect()
}
