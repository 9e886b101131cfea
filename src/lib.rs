//! EJS Balance - checks that template delimiters are balanced
//!
//! This library walks a directory of EJS templates and compares the number of
//! `<%` and `%>` delimiters in each file, reporting the lines involved when
//! they differ.

pub mod core;
pub mod utils;

pub use crate::core::checker::{BalanceChecker, CheckError, FileReport};
pub use crate::core::delimiters::{FlaggedLine, UnusualChar};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Check a single template and return its report
///
/// This is a convenience function for simple use cases.
///
/// # Arguments
///
/// * `file_path` - Path to the template
pub fn check_file<P: AsRef<std::path::Path>>(file_path: P) -> Result<FileReport, CheckError> {
    BalanceChecker::default().check_file(file_path.as_ref())
}

/// Library configuration
pub mod config {
    use std::path::{Path, PathBuf};

    use log::info;
    use serde::Deserialize;

    use crate::core::checker::CheckError;

    /// Default directory holding the templates
    pub const DEFAULT_ROOT: &str = "src/views";

    /// Default template file suffix
    pub const DEFAULT_EXTENSION: &str = ".ejs";

    /// Settings for a run. Every key is optional in the JSON file.
    #[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
    #[serde(default, deny_unknown_fields)]
    pub struct CheckerConfig {
        pub root_directory: PathBuf,
        pub extension: String,
        pub exclude: Vec<String>,
        /// Exit with a failure status when any file is unbalanced
        pub strict: bool,
        pub unusual_chars: bool,
    }

    impl Default for CheckerConfig {
        fn default() -> Self {
            Self {
                root_directory: PathBuf::from(DEFAULT_ROOT),
                extension: DEFAULT_EXTENSION.to_string(),
                exclude: Vec::new(),
                strict: false,
                unusual_chars: false,
            }
        }
    }

    impl CheckerConfig {
        /// Load configuration from a JSON file
        pub fn from_file(path: &Path) -> Result<Self, CheckError> {
            let config_error = |message: String| CheckError::Config {
                path: path.to_path_buf(),
                message,
            };

            let config_str = std::fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
            let config: Self =
                serde_json::from_str(&config_str).map_err(|e| config_error(e.to_string()))?;

            if config.extension.is_empty() {
                return Err(config_error("extension must not be empty".to_string()));
            }

            info!("Loaded configuration from {}", path.display());
            Ok(config)
        }
    }
}

/// Command-line application functionality
pub mod app {
    use std::io::Write;

    use log::info;

    use crate::config::CheckerConfig;
    use crate::core::checker::{BalanceChecker, CheckError, FileReport};
    use crate::utils::file_utils::{find_templates, ExcludeSet};
    use crate::utils::output_formatter;

    /// Outcome of a whole run
    #[derive(Debug, Default)]
    pub struct RunSummary {
        pub files_checked: usize,
        /// Reports of unbalanced files, in walk order
        pub failures: Vec<FileReport>,
    }

    impl RunSummary {
        /// True unless any file was unbalanced
        pub fn all_ok(&self) -> bool {
            self.failures.is_empty()
        }

        /// Process exit status for this run
        ///
        /// Always 0 unless `strict` is set, in which case any unbalanced
        /// file gives 1.
        pub fn exit_code(&self, strict: bool) -> i32 {
            if strict && !self.all_ok() {
                1
            } else {
                0
            }
        }
    }

    /// Check every template under the configured root, writing diagnostics
    /// to `out` as they are found
    ///
    /// # Arguments
    ///
    /// * `config` - Run settings
    /// * `out` - Destination of the diagnostic text
    /// * `colorize` - Whether to color headers and the success line
    ///
    /// # Returns
    ///
    /// The run summary. The first unreadable template aborts the run.
    pub fn run_checker<W: Write>(
        config: &CheckerConfig,
        out: &mut W,
        colorize: bool,
    ) -> Result<RunSummary, CheckError> {
        let exclude = ExcludeSet::new(&config.exclude);
        let templates = find_templates(&config.root_directory, &config.extension, &exclude);
        info!(
            "Found {} template(s) under {}",
            templates.len(),
            config.root_directory.display()
        );

        let checker = BalanceChecker::new(config.unusual_chars);
        let mut summary = RunSummary::default();

        for path in &templates {
            let report = checker.check_file(path)?;
            summary.files_checked += 1;

            if !report.is_balanced() {
                let block = output_formatter::format_failure(&report, colorize);
                writeln!(out, "{}", block).map_err(CheckError::Output)?;
            }

            let unusual = output_formatter::format_unusual_chars(&report);
            if !unusual.is_empty() {
                writeln!(out, "{}", unusual).map_err(CheckError::Output)?;
            }

            if !report.is_balanced() {
                summary.failures.push(report);
            }
        }

        if summary.all_ok() {
            write!(out, "{}", output_formatter::format_success(colorize))
                .map_err(CheckError::Output)?;
        }

        info!(
            "Checked {} file(s), {} unbalanced",
            summary.files_checked,
            summary.failures.len()
        );

        Ok(summary)
    }

}
