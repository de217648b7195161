//! Rendering run results and errors for `--output`.

use serde::Serialize;
use std::fmt;

use elf_align::{AlignReport, Outcome, PatchMode};

/// Value of `--output`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// The serialized `RunOutput`, one line.
    Json,
    /// One line per file plus a totals line.
    #[default]
    Human,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Human => write!(f, "human"),
        }
    }
}

/// Print `value` to stdout as JSON or through its `Display` impl. Empty
/// human text prints nothing.
pub fn emit<T: Serialize + fmt::Display>(format: OutputFormat, value: &T) -> Result<(), std::io::Error> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string(value)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
            println!("{json}");
        }
        OutputFormat::Human => {
            let text = value.to_string();
            if !text.is_empty() {
                println!("{text}");
            }
        }
    }
    Ok(())
}

/// Print one error. JSON mode writes `{"error", "exit_code"}` to stdout,
/// where a normal result would have gone; human mode writes to stderr.
pub fn emit_error(format: OutputFormat, exit_code: u8, message: &str) {
    match format {
        OutputFormat::Json => {
            let obj = serde_json::json!({
                "error": message,
                "exit_code": exit_code,
            });
            println!("{obj}");
        }
        OutputFormat::Human => {
            eprintln!("error: {message}");
        }
    }
}

/// One-line human summary of a successful pass.
pub fn describe(report: &AlignReport) -> String {
    let loads = report.segments.len();
    let changed = report.changed_count();
    match (report.outcome(), report.mode) {
        (Outcome::AlreadyAligned, _) => format!(
            "already aligned: {loads} LOAD segments at {} ({})",
            report.target, report.format
        ),
        (Outcome::Modified, PatchMode::Write) => format!(
            "aligned {changed} of {loads} LOAD segments to {} ({})",
            report.target, report.format
        ),
        (Outcome::Modified, PatchMode::DryRun) => format!(
            "would align {changed} of {loads} LOAD segments to {} ({})",
            report.target, report.format
        ),
    }
}
