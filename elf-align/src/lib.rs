//! ELF Segment Aligner
//!
//! Rewrites the `p_align` field of every `PT_LOAD` program header in an ELF
//! file so the file advertises a given page alignment (for example the 16 KiB
//! pages some Android devices require). Only that field is touched: segment
//! offsets, sizes and addresses stay where they are, and the file length does
//! not change.
//!
//! 32-bit and 64-bit files of either byte order are supported. The pass is
//! not transactional, but it is idempotent, so re-running it after an I/O
//! failure converges the file.
//!
//! ```no_run
//! use elf_align::{align_file, AlignOptions, Outcome};
//!
//! let report = align_file("libnative.so", AlignOptions::default())?;
//! if report.outcome() == Outcome::Modified {
//!     println!("rewrote {} segments", report.changed_count());
//! }
//! # Ok::<(), elf_align::AlignError>(())
//! ```

pub mod error;
pub mod file;
pub mod ident;
pub mod patch;
pub mod phdr;

pub use error::{AlignError, IdentField};
pub use file::{align_file, align_image, AlignOptions, DEFAULT_PAGE_SIZE};
pub use ident::{identify_format, Endian, FormatInfo, WordSize};
pub use patch::{align_segments, AlignReport, Outcome, PatchMode, SegmentPatch};
pub use phdr::{locate_program_headers, TableDescriptor, PT_LOAD};
