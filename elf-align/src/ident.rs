//! ELF identification
//!
//! Decodes the `e_ident` bytes at the start of the file into the word size
//! and byte order every later offset and integer depends on.

use std::fmt;
use std::io::{self, Read, Write};

use byteorder::{BigEndian, ByteOrder, LittleEndian, ReadBytesExt, WriteBytesExt};
use serde::Serialize;

use crate::error::{AlignError, IdentField};

/// ELF magic number: 0x7F 'E' 'L' 'F'
pub const ELF_MAGIC: [u8; 4] = [0x7F, b'E', b'L', b'F'];

/// Offset of `EI_CLASS` in `e_ident`
pub const EI_CLASS: usize = 4;

/// Offset of `EI_DATA` in `e_ident`
pub const EI_DATA: usize = 5;

/// ELF class: 32-bit
pub const ELFCLASS32: u8 = 1;

/// ELF class: 64-bit
pub const ELFCLASS64: u8 = 2;

/// ELF data encoding: little endian
pub const ELFDATA2LSB: u8 = 1;

/// ELF data encoding: big endian
pub const ELFDATA2MSB: u8 = 2;

/// Number of leading bytes read to identify a file and find its
/// program header table.
pub const HEADER_PROBE_LEN: usize = 64;

/// ELF word size, from `EI_CLASS`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WordSize {
    Elf32,
    Elf64,
}

impl fmt::Display for WordSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Elf32 => write!(f, "32-bit"),
            Self::Elf64 => write!(f, "64-bit"),
        }
    }
}

/// ELF byte order, from `EI_DATA`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Endian {
    Little,
    Big,
}

impl fmt::Display for Endian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Little => write!(f, "little-endian"),
            Self::Big => write!(f, "big-endian"),
        }
    }
}

impl Endian {
    pub fn read_u16(self, buf: &[u8]) -> u16 {
        match self {
            Self::Little => LittleEndian::read_u16(buf),
            Self::Big => BigEndian::read_u16(buf),
        }
    }

    pub fn read_u32(self, buf: &[u8]) -> u32 {
        match self {
            Self::Little => LittleEndian::read_u32(buf),
            Self::Big => BigEndian::read_u32(buf),
        }
    }

    pub fn read_u64(self, buf: &[u8]) -> u64 {
        match self {
            Self::Little => LittleEndian::read_u64(buf),
            Self::Big => BigEndian::read_u64(buf),
        }
    }

    /// Read a pointer-sized field: 4 bytes for ELF32, 8 bytes for ELF64.
    pub fn read_word(self, buf: &[u8], word_size: WordSize) -> u64 {
        match word_size {
            WordSize::Elf32 => u64::from(self.read_u32(buf)),
            WordSize::Elf64 => self.read_u64(buf),
        }
    }

    /// Stream counterpart of [`Endian::read_u32`].
    pub fn read_u32_from<R: Read>(self, reader: &mut R) -> io::Result<u32> {
        match self {
            Self::Little => reader.read_u32::<LittleEndian>(),
            Self::Big => reader.read_u32::<BigEndian>(),
        }
    }

    /// Stream counterpart of [`Endian::read_word`].
    pub fn read_word_from<R: Read>(self, reader: &mut R, word_size: WordSize) -> io::Result<u64> {
        match (word_size, self) {
            (WordSize::Elf32, _) => self.read_u32_from(reader).map(u64::from),
            (WordSize::Elf64, Self::Little) => reader.read_u64::<LittleEndian>(),
            (WordSize::Elf64, Self::Big) => reader.read_u64::<BigEndian>(),
        }
    }

    /// Encode `value` as a pointer-sized field.
    ///
    /// For ELF32 the caller must have checked that `value` fits in `u32`.
    pub fn write_word_to<W: Write>(
        self,
        writer: &mut W,
        word_size: WordSize,
        value: u64,
    ) -> io::Result<()> {
        match (word_size, self) {
            (WordSize::Elf32, Self::Little) => writer.write_u32::<LittleEndian>(value as u32),
            (WordSize::Elf32, Self::Big) => writer.write_u32::<BigEndian>(value as u32),
            (WordSize::Elf64, Self::Little) => writer.write_u64::<LittleEndian>(value),
            (WordSize::Elf64, Self::Big) => writer.write_u64::<BigEndian>(value),
        }
    }
}

/// Word size and byte order of an ELF file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FormatInfo {
    pub word_size: WordSize,
    pub endian: Endian,
}

impl fmt::Display for FormatInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ELF {} {}", self.word_size, self.endian)
    }
}

/// Identify an ELF file from its first bytes.
///
/// `header` is whatever could be read from the start of the file, up to
/// [`HEADER_PROBE_LEN`] bytes. A wrong magic is reported before a short
/// header so that small non-ELF files are named as such.
pub fn identify_format(header: &[u8]) -> Result<FormatInfo, AlignError> {
    if header.len() >= ELF_MAGIC.len() && header[..ELF_MAGIC.len()] != ELF_MAGIC {
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&header[..ELF_MAGIC.len()]);
        return Err(AlignError::NotElfFile { magic });
    }

    if header.len() < HEADER_PROBE_LEN {
        return Err(AlignError::TruncatedFile {
            required: HEADER_PROBE_LEN as u64,
            file_len: header.len() as u64,
        });
    }

    let word_size = match header[EI_CLASS] {
        ELFCLASS32 => WordSize::Elf32,
        ELFCLASS64 => WordSize::Elf64,
        value => {
            return Err(AlignError::UnsupportedFormat {
                field: IdentField::Class,
                value,
            })
        }
    };

    let endian = match header[EI_DATA] {
        ELFDATA2LSB => Endian::Little,
        ELFDATA2MSB => Endian::Big,
        value => {
            return Err(AlignError::UnsupportedFormat {
                field: IdentField::Data,
                value,
            })
        }
    };

    Ok(FormatInfo { word_size, endian })
}
