//! Core balance checker implementation
//!
//! This file contains the BalanceChecker which reads a template file once and
//! compares its opening and closing delimiter counts.

use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Serialize;

use crate::core::delimiters::{self, FlaggedLine, UnusualChar};
use crate::utils::file_utils::read_template;

/// Errors that stop a run
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// A template could not be read as UTF-8 text
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is missing or malformed
    #[error("Invalid configuration in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    /// Diagnostics could not be written
    #[error("Failed to write output: {0}")]
    Output(#[source] std::io::Error),

    /// Writing an exported report failed
    #[error("Failed to export report to {}: {source}", path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result of checking a single template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub opens: usize,
    pub closes: usize,
    /// Lines mentioning a delimiter, only collected for unbalanced files
    pub lines: Vec<FlaggedLine>,
    /// Only collected when the unusual character scan is enabled
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unusual_chars: Vec<UnusualChar>,
}

impl FileReport {
    /// Build a report from already loaded content
    ///
    /// # Arguments
    ///
    /// * `path` - Path the content was read from
    /// * `content` - Full text of the template
    /// * `scan_unusual` - Whether to collect unusual characters
    pub fn from_content(path: &Path, content: &str, scan_unusual: bool) -> Self {
        let (opens, closes) = delimiters::count_delimiters(content);

        let lines = if opens != closes {
            delimiters::flag_lines(content)
        } else {
            Vec::new()
        };

        let unusual_chars = if scan_unusual {
            delimiters::find_unusual_chars(content)
        } else {
            Vec::new()
        };

        Self {
            path: path.to_path_buf(),
            opens,
            closes,
            lines,
            unusual_chars,
        }
    }

    /// Whether both delimiter counts match
    pub fn is_balanced(&self) -> bool {
        self.opens == self.closes
    }

    /// Opens minus closes
    pub fn difference(&self) -> i64 {
        self.opens as i64 - self.closes as i64
    }
}

/// Checks templates one at a time
#[derive(Debug, Clone, Default)]
pub struct BalanceChecker {
    scan_unusual: bool,
}

impl BalanceChecker {
    /// Create a new BalanceChecker
    ///
    /// # Arguments
    ///
    /// * `scan_unusual` - Also report characters outside printable ASCII
    pub fn new(scan_unusual: bool) -> Self {
        Self { scan_unusual }
    }

    /// Read a template and compare its delimiter counts
    ///
    /// # Arguments
    ///
    /// * `file_path` - Path to the template
    ///
    /// # Returns
    ///
    /// The file's report, or a read error that should abort the run
    pub fn check_file(&self, file_path: &Path) -> Result<FileReport, CheckError> {
        debug!("Checking file: {}", file_path.display());

        let content = read_template(file_path)?;
        let report = FileReport::from_content(file_path, &content, self.scan_unusual);

        if report.is_balanced() {
            debug!("{} is balanced ({} tags)", file_path.display(), report.opens);
        } else {
            info!(
                "{} is unbalanced: {} opened, {} closed",
                file_path.display(),
                report.opens,
                report.closes
            );
        }

        Ok(report)
    }
}
