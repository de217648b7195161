//! `p_align` rewriting
//!
//! Walks the program header table in order and rewrites the alignment field
//! of every `PT_LOAD` entry that does not already hold the target value.
//! Each rewrite is a single positioned write of exactly the field width, so
//! an I/O failure can leave some segments converged and others untouched,
//! never a half-written field.

use std::io::{Read, Seek, SeekFrom, Write};

use serde::Serialize;

use crate::error::AlignError;
use crate::ident::{FormatInfo, WordSize};
use crate::phdr::{TableDescriptor, PT_LOAD};

/// Whether matching fields are actually written back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatchMode {
    /// Rewrite mismatching alignment fields in place.
    #[default]
    Write,
    /// Inspect only; report what `Write` would change.
    DryRun,
}

/// Overall result of a successful pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    /// At least one loadable segment had a different alignment
    /// (and, unless dry-running, was rewritten).
    Modified,
    /// Every loadable segment already matched the target.
    AlreadyAligned,
}

/// What happened to one `PT_LOAD` entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SegmentPatch {
    /// Position in the program header table.
    pub index: u16,
    /// File offset of the entry.
    pub entry_offset: u64,
    /// File offset of its `p_align` field.
    pub field_offset: u64,
    /// `p_align` before the pass.
    pub previous: u64,
    /// `p_align` after the pass: the target if it was written, otherwise
    /// `previous`.
    pub current: u64,
    /// `previous` differed from the target.
    pub changed: bool,
}

/// Everything learned and done during one pass over a file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AlignReport {
    pub format: FormatInfo,
    pub table: TableDescriptor,
    pub target: u64,
    pub mode: PatchMode,
    /// One record per `PT_LOAD` entry, in table order.
    pub segments: Vec<SegmentPatch>,
}

impl AlignReport {
    pub fn outcome(&self) -> Outcome {
        if self.segments.iter().any(|s| s.changed) {
            Outcome::Modified
        } else {
            Outcome::AlreadyAligned
        }
    }

    pub fn changed_count(&self) -> usize {
        self.segments.iter().filter(|s| s.changed).count()
    }

    /// True if bytes on disk were actually rewritten.
    pub fn wrote(&self) -> bool {
        self.mode == PatchMode::Write && self.outcome() == Outcome::Modified
    }
}

/// A zero alignment is meaningless for any word size.
pub(crate) fn check_nonzero(target: u64) -> Result<(), AlignError> {
    if target == 0 {
        return Err(AlignError::InvalidAlignment { value: target });
    }
    Ok(())
}

/// Reject targets that cannot be stored in this file's alignment fields.
pub(crate) fn check_target(target: u64, word_size: WordSize) -> Result<(), AlignError> {
    check_nonzero(target)?;
    if target > word_size.max_alignment() {
        return Err(AlignError::AlignmentOutOfRange {
            value: target,
            word_size,
        });
    }
    Ok(())
}

/// Rewrite `p_align` of every `PT_LOAD` entry described by `table` to
/// `target`.
///
/// Entries are visited in ascending table order. Non-loadable entries are
/// only read. The first I/O error aborts the pass; fields rewritten before it
/// stay rewritten.
pub fn align_segments<F: Read + Write + Seek>(
    file: &mut F,
    table: &TableDescriptor,
    format: FormatInfo,
    target: u64,
    mode: PatchMode,
) -> Result<AlignReport, AlignError> {
    check_target(target, format.word_size)?;

    let word = format.word_size;
    let endian = format.endian;
    let mut segments = Vec::new();
    let mut dirty = false;

    for index in 0..table.entry_count {
        let entry_offset = table.entry_offset(index);

        file.seek(SeekFrom::Start(entry_offset))?;
        let p_type = endian.read_u32_from(file)?;
        if p_type != PT_LOAD {
            log::trace!("[elf-align] phdr {index}: type {p_type:#x}, skipped");
            continue;
        }

        let field_offset = entry_offset + word.align_offset();
        file.seek(SeekFrom::Start(field_offset))?;
        let previous = endian.read_word_from(file, word)?;
        let changed = previous != target;
        let mut current = previous;

        if changed && mode == PatchMode::Write {
            file.seek(SeekFrom::Start(field_offset))?;
            endian.write_word_to(file, word, target)?;
            current = target;
            dirty = true;
            log::info!("[elf-align] phdr {index}: p_align {previous:#x} -> {target:#x}");
        } else if changed {
            log::info!("[elf-align] phdr {index}: p_align {previous:#x} would become {target:#x}");
        } else {
            log::debug!("[elf-align] phdr {index}: p_align already {target:#x}");
        }

        segments.push(SegmentPatch {
            index,
            entry_offset,
            field_offset,
            previous,
            current,
            changed,
        });
    }

    if dirty {
        file.flush()?;
    }

    Ok(AlignReport {
        format,
        table: *table,
        target,
        mode,
        segments,
    })
}
