//! Program header table location
//!
//! Reads `e_phoff`, `e_phentsize` and `e_phnum` out of the file header and
//! checks that the table they describe lies inside the file.

use serde::Serialize;

use crate::error::AlignError;
use crate::ident::{FormatInfo, WordSize, HEADER_PROBE_LEN};

/// Program header type: loadable segment
pub const PT_LOAD: u32 = 1;

impl WordSize {
    /// Offset of `e_phoff` in the file header.
    pub fn phoff_offset(self) -> usize {
        match self {
            Self::Elf32 => 28,
            Self::Elf64 => 32,
        }
    }

    /// Offset of `e_phentsize` in the file header.
    pub fn phentsize_offset(self) -> usize {
        match self {
            Self::Elf32 => 42,
            Self::Elf64 => 54,
        }
    }

    /// Offset of `e_phnum` in the file header.
    pub fn phnum_offset(self) -> usize {
        match self {
            Self::Elf32 => 44,
            Self::Elf64 => 56,
        }
    }

    /// Offset of `p_align` within a program header entry.
    pub fn align_offset(self) -> u64 {
        match self {
            Self::Elf32 => 28,
            Self::Elf64 => 48,
        }
    }

    /// Width in bytes of pointer-sized fields (`e_phoff`, `p_align`).
    pub fn word_bytes(self) -> u64 {
        match self {
            Self::Elf32 => 4,
            Self::Elf64 => 8,
        }
    }

    /// Smallest entry size that still contains `p_align`.
    pub fn min_entry_size(self) -> u16 {
        (self.align_offset() + self.word_bytes()) as u16
    }

    /// Largest value a `p_align` field of this width can hold.
    pub fn max_alignment(self) -> u64 {
        match self {
            Self::Elf32 => u64::from(u32::MAX),
            Self::Elf64 => u64::MAX,
        }
    }
}

/// Where the program header table lives and how it is strided.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TableDescriptor {
    /// `e_phoff`: byte offset of the table in the file.
    pub table_file_offset: u64,
    /// `e_phentsize`: size of one entry.
    pub entry_size: u16,
    /// `e_phnum`: number of entries.
    pub entry_count: u16,
}

impl TableDescriptor {
    /// Byte offset of entry `index` in the file.
    pub fn entry_offset(&self, index: u16) -> u64 {
        self.table_file_offset + u64::from(index) * u64::from(self.entry_size)
    }

    /// Total size of the table in bytes.
    pub fn table_len(&self) -> u64 {
        u64::from(self.entry_count) * u64::from(self.entry_size)
    }

    /// One past the last byte of the table, or `None` on overflow.
    pub fn table_end(&self) -> Option<u64> {
        self.table_file_offset.checked_add(self.table_len())
    }
}

/// Decode the program header table descriptor from the file header and
/// validate it against the file length.
///
/// `header` must hold at least the first 64 bytes of the file, as accepted by
/// [`identify_format`](crate::identify_format).
pub fn locate_program_headers(
    header: &[u8],
    format: FormatInfo,
    file_len: u64,
) -> Result<TableDescriptor, AlignError> {
    if header.len() < HEADER_PROBE_LEN {
        return Err(AlignError::TruncatedFile {
            required: HEADER_PROBE_LEN as u64,
            file_len: header.len() as u64,
        });
    }

    let word = format.word_size;
    let endian = format.endian;

    let phoff = word.phoff_offset();
    let phentsize = word.phentsize_offset();
    let phnum = word.phnum_offset();

    let table = TableDescriptor {
        table_file_offset: endian.read_word(&header[phoff..], word),
        entry_size: endian.read_u16(&header[phentsize..phentsize + 2]),
        entry_count: endian.read_u16(&header[phnum..phnum + 2]),
    };

    if table.entry_count == 0 {
        return Ok(table);
    }

    if table.entry_size < word.min_entry_size() {
        return Err(AlignError::InvalidEntrySize {
            entry_size: table.entry_size,
            required: word.min_entry_size(),
        });
    }

    match table.table_end() {
        Some(end) if end <= file_len => Ok(table),
        Some(end) => Err(AlignError::TruncatedFile {
            required: end,
            file_len,
        }),
        None => Err(AlignError::TruncatedFile {
            required: u64::MAX,
            file_len,
        }),
    }
}
