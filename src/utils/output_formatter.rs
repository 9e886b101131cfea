//! Output formatter for check results
//!
//! This module renders the per-file diagnostic blocks printed to stdout and
//! exports failing reports as JSON.

use std::fs::File;
use std::path::Path;

use colored::Colorize;
use serde_json::json;

use crate::core::checker::{CheckError, FileReport};

/// Printed once when every checked file is balanced
pub const SUCCESS_MESSAGE: &str = "Barcha fayllar to'g'ri!";

/// Header prefix of a failing file's block
pub const FAILURE_HEADER: &str = "XATO:";

/// Format the diagnostic block for an unbalanced file
///
/// # Arguments
///
/// * `report` - Report of an unbalanced file
/// * `colorize` - Whether to color the header
///
/// # Returns
///
/// The block, one line per entry, each terminated by a newline. The blank
/// separator line is not included.
pub fn format_failure(report: &FileReport, colorize: bool) -> String {
    let mut output = String::new();

    let header = if colorize {
        FAILURE_HEADER.red().bold().to_string()
    } else {
        FAILURE_HEADER.to_string()
    };
    output.push_str(&format!("{} {}\n", header, report.path.display()));
    output.push_str(&format!(
        "  Ochilgan: {}, Yopilgan: {}\n",
        report.opens, report.closes
    ));
    output.push_str(&format!("  Farq: {}\n", report.difference()));

    for line in &report.lines {
        output.push_str(&format!("  {}: {}\n", line.number, line.text));
    }

    output
}

/// Format the unusual characters found in a file
///
/// Returns an empty string when the report has none.
pub fn format_unusual_chars(report: &FileReport) -> String {
    if report.unusual_chars.is_empty() {
        return String::new();
    }

    let mut output = format!("Unusual characters: {}\n", report.path.display());
    for found in &report.unusual_chars {
        output.push_str(&format!(
            "  Line {}, col {}: unusual char code={} char={}\n",
            found.line,
            found.column,
            found.code,
            quote_code_unit(found.code)
        ));
    }

    output
}

/// JSON-quote a single UTF-16 code unit. Lone surrogates are written as
/// `\uXXXX` escapes.
fn quote_code_unit(code: u16) -> String {
    match char::from_u32(u32::from(code)) {
        Some(ch) => serde_json::to_string(&ch).unwrap_or_else(|_| format!("{:?}", ch)),
        None => format!("\"\\u{:04x}\"", code),
    }
}

/// Format the final success line
pub fn format_success(colorize: bool) -> String {
    if colorize {
        format!("{}\n", SUCCESS_MESSAGE.green())
    } else {
        format!("{}\n", SUCCESS_MESSAGE)
    }
}

/// Export failing reports to a JSON file
///
/// # Arguments
///
/// * `failures` - Reports of unbalanced files
/// * `output_path` - Path where the JSON file will be written
pub fn export_results_json(failures: &[FileReport], output_path: &Path) -> Result<(), CheckError> {
    let entries: Vec<_> = failures
        .iter()
        .map(|report| {
            json!({
                "path": report.path.to_string_lossy(),
                "opens": report.opens,
                "closes": report.closes,
                "difference": report.difference(),
                "lines": report.lines,
            })
        })
        .collect();

    let to_export_error = |source: std::io::Error| CheckError::Export {
        path: output_path.to_path_buf(),
        source,
    };

    let file = File::create(output_path).map_err(to_export_error)?;
    serde_json::to_writer_pretty(file, &entries).map_err(|e| to_export_error(e.into()))?;

    Ok(())
}
