//! File handling utilities
//!
//! This module provides the recursive template discovery and the single read
//! each template gets.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use regex::Regex;
use walkdir::WalkDir;

use crate::core::checker::CheckError;
use crate::core::delimiters::normalize_newlines;

/// Read a template's full content as UTF-8 text.
///
/// `\r\n` and lone `\r` line endings are converted to `\n`. Missing files,
/// permission problems and invalid UTF-8 all surface as `CheckError::Read`.
pub fn read_template(file_path: &Path) -> Result<String, CheckError> {
    fs::read_to_string(file_path)
        .map(normalize_newlines)
        .map_err(|source| CheckError::Read {
            path: file_path.to_path_buf(),
            source,
        })
}

/// Compiled exclusion patterns (glob syntax with `*` and `?`)
#[derive(Debug, Default)]
pub struct ExcludeSet {
    patterns: Vec<Regex>,
}

impl ExcludeSet {
    /// Compile glob patterns. Patterns that fail to compile are logged and
    /// skipped.
    pub fn new<S: AsRef<str>>(globs: &[S]) -> Self {
        let patterns = globs
            .iter()
            .filter_map(|glob| match glob_to_regex(glob.as_ref()) {
                Ok(re) => Some(re),
                Err(e) => {
                    warn!("Ignoring invalid exclude pattern '{}': {}", glob.as_ref(), e);
                    None
                }
            })
            .collect();

        Self { patterns }
    }

    /// Whether the path matches any exclusion pattern
    pub fn is_excluded(&self, path: &Path) -> bool {
        let text = path.to_string_lossy();
        self.patterns.iter().any(|re| re.is_match(&text))
    }
}

/// Translate a simple glob into an anchored regex.
fn glob_to_regex(glob: &str) -> Result<Regex, regex::Error> {
    let mut pattern = String::with_capacity(glob.len() + 2);
    pattern.push('^');
    for ch in glob.chars() {
        match ch {
            '*' => pattern.push_str(".*"),
            '?' => pattern.push('.'),
            other => pattern.push_str(&regex::escape(&other.to_string())),
        }
    }
    pattern.push('$');
    Regex::new(&pattern)
}

/// Collect every template under `root` whose file name ends with `extension`.
///
/// # Arguments
///
/// * `root` - Directory to walk recursively
/// * `extension` - File name suffix, e.g. `.ejs`
/// * `exclude` - Paths to skip
///
/// # Returns
///
/// Matching file paths in walk order: within each directory, files by name
/// first, then each subdirectory by name.
/// Walk errors, including a missing root, are logged and skipped.
pub fn find_templates(root: &Path, extension: &str, exclude: &ExcludeSet) -> Vec<PathBuf> {
    let mut templates = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(false)
        .sort_by(|a, b| {
            a.file_type()
                .is_dir()
                .cmp(&b.file_type().is_dir())
                .then_with(|| a.file_name().cmp(b.file_name()))
        })
        .into_iter()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };

        let file_path = entry.path();
        if !file_path.is_file() {
            continue;
        }

        if !entry
            .file_name()
            .as_encoded_bytes()
            .ends_with(extension.as_bytes())
        {
            continue;
        }

        if exclude.is_excluded(file_path) {
            debug!("Excluded: {}", file_path.display());
            continue;
        }

        templates.push(file_path.to_path_buf());
    }

    templates
}
