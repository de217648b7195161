use std::path::PathBuf;
use std::process::ExitCode;

use elf_align::AlignError;

/// All errors produced by align-elf.
///
/// Variants are split into two categories:
/// - **Infrastructure errors** (exit code 2): bad config, I/O failures outside the target file
/// - **Operational errors** (exit code 1): the target file could not be aligned
#[derive(thiserror::Error, Debug)]
pub enum AlignElfError {
    // ── Infrastructure errors (exit code 2) ──────────────────────────

    #[error("Config parse error: {0}")]
    ConfigParse(String),

    #[error("Invalid config: {0}")]
    ConfigInvalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ── Operational errors (exit code 1) ─────────────────────────────

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("{path}: {source}")]
    Align {
        path: PathBuf,
        #[source]
        source: AlignError,
    },
}

impl AlignElfError {
    /// Map each error variant to its process exit code.
    ///
    /// - `2` — infrastructure error (bad config, I/O outside the target)
    /// - `1` — operational failure (missing, non-ELF, malformed or unwritable target)
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_code_num())
    }

    /// Raw numeric form of [`exit_code`](Self::exit_code).
    pub fn exit_code_num(&self) -> u8 {
        match self {
            Self::ConfigParse(_) | Self::ConfigInvalid(_) | Self::Io(_) | Self::Json(_) => 2,

            Self::FileNotFound { .. } | Self::Align { .. } => 1,
        }
    }

    /// Whether retrying the same invocation could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Io(_) => true,
            Self::Align { source, .. } => !source.is_permanent(),
            _ => false,
        }
    }
}
