use std::fmt;

use crate::ident::WordSize;

/// Which `e_ident` byte carried an unrecognized value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdentField {
    /// `EI_CLASS` (offset 4).
    Class,
    /// `EI_DATA` (offset 5).
    Data,
}

impl fmt::Display for IdentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class => write!(f, "class"),
            Self::Data => write!(f, "byte-order"),
        }
    }
}

/// All errors produced while aligning an ELF file.
///
/// Every variant except [`AlignError::Io`] describes the file or the request
/// itself and will fail identically on retry.
#[derive(thiserror::Error, Debug)]
pub enum AlignError {
    // ── Structural errors ────────────────────────────────────────────

    #[error("Not an ELF file (magic {magic:02x?})")]
    NotElfFile { magic: [u8; 4] },

    #[error("Unsupported ELF {field} marker: {value}")]
    UnsupportedFormat { field: IdentField, value: u8 },

    #[error("Truncated file: need {required} bytes, file has {file_len}")]
    TruncatedFile { required: u64, file_len: u64 },

    #[error("Program header entry size {entry_size} is smaller than {required}")]
    InvalidEntrySize { entry_size: u16, required: u16 },

    // ── Request errors ───────────────────────────────────────────────

    #[error("Invalid alignment: {value}")]
    InvalidAlignment { value: u64 },

    #[error("Alignment {value} does not fit a {word_size} alignment field")]
    AlignmentOutOfRange { value: u64, word_size: WordSize },

    // ── I/O ──────────────────────────────────────────────────────────

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AlignError {
    /// Whether running the operation again on the same input is pointless.
    ///
    /// Only I/O failures (permissions, disk full, vanished device) may clear
    /// up on their own.
    pub fn is_permanent(&self) -> bool {
        !matches!(self, Self::Io(_))
    }
}
