//! Whole-file entry points composing identification, table location and
//! patching.

use std::fs::OpenOptions;
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;

use crate::error::AlignError;
use crate::ident::{identify_format, HEADER_PROBE_LEN};
use crate::patch::{align_segments, check_nonzero, AlignReport, PatchMode};
use crate::phdr::locate_program_headers;

/// Default target alignment: 16 KiB pages.
pub const DEFAULT_PAGE_SIZE: u64 = 16384;

/// Parameters for one alignment pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AlignOptions {
    /// Target `p_align` value in bytes.
    pub page_size: u64,
    pub mode: PatchMode,
}

impl Default for AlignOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            mode: PatchMode::Write,
        }
    }
}

impl AlignOptions {
    pub fn new(page_size: u64) -> Self {
        Self {
            page_size,
            ..Self::default()
        }
    }

    pub fn dry_run(mut self) -> Self {
        self.mode = PatchMode::DryRun;
        self
    }
}

/// Align the `PT_LOAD` segments of the ELF file at `path` in place.
///
/// The file is opened read-write (read-only for a dry run) and closed before
/// returning, whatever the outcome. Non-ELF and structurally broken files are
/// rejected before anything is written.
pub fn align_file<P: AsRef<Path>>(path: P, options: AlignOptions) -> Result<AlignReport, AlignError> {
    let path = path.as_ref();
    check_page_size(options.page_size)?;

    let mut file = OpenOptions::new()
        .read(true)
        .write(options.mode == PatchMode::Write)
        .open(path)?;
    let file_len = file.metadata()?.len();

    log::debug!("[elf-align] {}: {} bytes", path.display(), file_len);
    align_stream(&mut file, file_len, options)
}

/// In-memory counterpart of [`align_file`]: patches `image` in place.
pub fn align_image(image: &mut [u8], options: AlignOptions) -> Result<AlignReport, AlignError> {
    check_page_size(options.page_size)?;
    let file_len = image.len() as u64;
    align_stream(&mut Cursor::new(image), file_len, options)
}

fn check_page_size(page_size: u64) -> Result<(), AlignError> {
    check_nonzero(page_size)?;
    if !page_size.is_power_of_two() {
        log::warn!("[elf-align] target alignment {page_size} is not a power of two");
    }
    Ok(())
}

fn align_stream<F: Read + Write + Seek>(
    stream: &mut F,
    file_len: u64,
    options: AlignOptions,
) -> Result<AlignReport, AlignError> {
    let mut header = Vec::with_capacity(HEADER_PROBE_LEN);
    Read::by_ref(stream)
        .take(HEADER_PROBE_LEN as u64)
        .read_to_end(&mut header)?;

    let format = identify_format(&header)?;
    let table = locate_program_headers(&header, format, file_len)?;
    log::debug!(
        "[elf-align] {format}: {} program headers of {} bytes at {:#x}",
        table.entry_count,
        table.entry_size,
        table.table_file_offset
    );

    align_segments(stream, &table, format, options.page_size, options.mode)
}
