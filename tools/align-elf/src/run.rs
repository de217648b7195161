//! Per-file driver.
//!
//! Files are aligned in argument order. A failure on one file is recorded
//! and the run moves on; the first failure decides the exit code.

use std::fmt;
use std::path::{Path, PathBuf};

use elf_align::{align_file, AlignOptions, AlignReport};
use serde::Serialize;

use crate::config::AlignConfig;
use crate::error::AlignElfError;
use crate::output;

/// Result for one input file.
#[derive(Serialize, Debug)]
pub struct FileResult {
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<AlignReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<u8>,
}

/// Result of a whole invocation.
#[derive(Serialize, Debug)]
pub struct RunOutput {
    pub page_size: u64,
    pub dry_run: bool,
    pub files: Vec<FileResult>,
}

impl RunOutput {
    pub fn failed(&self) -> usize {
        self.files.iter().filter(|f| f.error.is_some()).count()
    }
}

impl fmt::Display for RunOutput {
    /// Successful files only; failures are reported on stderr.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for file in &self.files {
            if let Some(report) = &file.report {
                if !first {
                    writeln!(f)?;
                }
                write!(f, "{}: {}", file.path.display(), output::describe(report))?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Everything `main` needs after the files have been processed.
#[derive(Debug)]
pub struct RunSummary {
    pub output: RunOutput,
    pub first_error: Option<AlignElfError>,
}

/// Align a single file, checking that it exists first.
pub fn align_one(path: &Path, options: AlignOptions) -> Result<AlignReport, AlignElfError> {
    if !path.exists() {
        return Err(AlignElfError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    align_file(path, options).map_err(|source| AlignElfError::Align {
        path: path.to_path_buf(),
        source,
    })
}

/// Align every file in order.
pub fn run(files: &[PathBuf], config: &AlignConfig, dry_run: bool) -> RunSummary {
    let options = config.options(dry_run);
    let mut results = Vec::with_capacity(files.len());
    let mut first_error = None;

    for path in files {
        match align_one(path, options) {
            Ok(report) => {
                log::debug!("[align-elf] {}: {:?}", path.display(), report.outcome());
                results.push(FileResult {
                    path: path.clone(),
                    report: Some(report),
                    error: None,
                    exit_code: None,
                });
            }
            Err(e) => {
                log::warn!("[align-elf] {e}");
                results.push(FileResult {
                    path: path.clone(),
                    report: None,
                    error: Some(e.to_string()),
                    exit_code: Some(e.exit_code_num()),
                });
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    RunSummary {
        output: RunOutput {
            page_size: config.page_size,
            dry_run,
            files: results,
        },
        first_error,
    }
}
