//! EJS Balance - checks that template delimiters are balanced
//!
//! The main entry point of the checker. It parses command-line arguments,
//! merges them with the optional configuration file and runs the check.

use anyhow::Result;
use clap::{ArgAction, Parser};
use log::{debug, LevelFilter};
use std::fs::File;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process;

use ejs_balance::app::run_checker;
use ejs_balance::config::CheckerConfig;
use ejs_balance::utils::output_formatter;

/// Command line argument structure
#[derive(Parser, Debug)]
#[command(
    name = "ejs_balance",
    version,
    about = "Checks that <% and %> delimiters are balanced in EJS templates",
    long_about = "Walks a directory of templates and, for every file whose opening and closing
delimiter counts differ, prints the counts, their difference and every line that
mentions a delimiter."
)]
struct Args {
    /// Directory to scan (default: src/views)
    #[arg(name = "root")]
    root: Option<PathBuf>,

    /// Template file name suffix (default: .ejs)
    #[arg(long = "ext")]
    ext: Option<String>,

    /// Exclude file pattern (glob syntax, can be used multiple times)
    #[arg(long = "exclude", action = ArgAction::Append)]
    exclude: Option<Vec<String>>,

    /// Exit with status 1 when any file is unbalanced
    #[arg(long = "strict", action = ArgAction::SetTrue)]
    strict: bool,

    /// Also report characters outside printable ASCII
    #[arg(long = "unusual-chars", action = ArgAction::SetTrue)]
    unusual_chars: bool,

    /// Export unbalanced files to a JSON file
    #[arg(long = "json")]
    json: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long = "no-color", action = ArgAction::SetTrue)]
    no_color: bool,

    /// Set logging level (default: WARN)
    #[arg(long = "log-level", default_value = "warn")]
    log_level: LevelFilter,

    /// Write logs to this file instead of stderr
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

/// Main entry point function
fn main() -> Result<()> {
    let args = Args::parse();

    setup_logging(&args);

    let config = load_config(&args)?;
    debug!("Effective configuration: {:?}", config);

    let colorize = !args.no_color && io::stdout().is_terminal();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let summary = run_checker(&config, &mut out, colorize)?;

    if let Some(json_path) = &args.json {
        output_formatter::export_results_json(&summary.failures, json_path)?;
    }

    let code = summary.exit_code(config.strict);
    if code != 0 {
        out.flush()?;
        process::exit(code);
    }

    Ok(())
}

/// Set up logging to stderr or a log file
fn setup_logging(args: &Args) {
    let mut builder = env_logger::Builder::new();

    builder.filter_level(args.log_level);

    builder.format(|buf, record| {
        use chrono::Local;
        writeln!(
            buf,
            "{} - {} - {} - {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.target(),
            record.args()
        )
    });

    if let Some(log_file) = &args.log_file {
        match File::create(log_file) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => eprintln!("Cannot open log file {}: {}", log_file.display(), e),
        }
    }

    builder.init();
}

/// Build the effective configuration: file values first, then CLI overrides
fn load_config(args: &Args) -> Result<CheckerConfig> {
    let mut config = match &args.config {
        Some(path) => CheckerConfig::from_file(path)?,
        None => CheckerConfig::default(),
    };

    if let Some(root) = &args.root {
        config.root_directory = root.clone();
    }
    if let Some(ext) = &args.ext {
        config.extension = ext.clone();
    }
    if let Some(exclude) = &args.exclude {
        config.exclude.extend(exclude.iter().cloned());
    }
    config.strict |= args.strict;
    config.unusual_chars |= args.unusual_chars;

    Ok(config)
}
