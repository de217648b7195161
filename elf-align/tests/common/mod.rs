//! Test-only ELF image builder shared by the property tests.

#![allow(dead_code)]

use std::ops::Range;

use elf_align::{Endian, WordSize, PT_LOAD};
use proptest::prelude::*;

/// Program header type: note segment
pub const PT_NOTE: u32 = 4;

/// Program header type: program header table
pub const PT_PHDR: u32 = 6;

/// Description of a synthetic ELF image.
#[derive(Clone, Debug)]
pub struct ElfSpec {
    pub word_size: WordSize,
    pub endian: Endian,
    /// `(p_type, p_align)` per program header entry.
    pub entries: Vec<(u32, u64)>,
    /// Byte used for every field the aligner must not touch.
    pub filler: u8,
    /// Bytes appended after the program header table.
    pub trailer: Vec<u8>,
    /// Filler bytes between the file header and the table.
    pub phoff_gap: usize,
    /// Extra bytes past the standard entry size, so `e_phentsize` exceeds
    /// the minimum.
    pub entry_padding: usize,
}

impl ElfSpec {
    pub fn new(word_size: WordSize, endian: Endian, entries: Vec<(u32, u64)>) -> Self {
        Self {
            word_size,
            endian,
            entries,
            filler: 0xA5,
            trailer: vec![0xCC; 64],
            phoff_gap: 0,
            entry_padding: 0,
        }
    }

    pub fn ehsize(&self) -> usize {
        match self.word_size {
            WordSize::Elf32 => 52,
            WordSize::Elf64 => 64,
        }
    }

    pub fn phentsize(&self) -> usize {
        let standard = match self.word_size {
            WordSize::Elf32 => 32,
            WordSize::Elf64 => 56,
        };
        standard + self.entry_padding
    }

    /// `e_phoff`: where the program header table starts.
    pub fn phoff(&self) -> usize {
        self.ehsize() + self.phoff_gap
    }

    /// Byte range of entry `index`'s `p_align` field.
    pub fn align_range(&self, index: usize) -> Range<usize> {
        let (offset, width) = match self.word_size {
            WordSize::Elf32 => (28, 4),
            WordSize::Elf64 => (48, 8),
        };
        let start = self.phoff() + index * self.phentsize() + offset;
        start..start + width
    }

    /// Ranges of every loadable entry's `p_align` field.
    pub fn load_align_ranges(&self) -> Vec<Range<usize>> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, (p_type, _))| *p_type == PT_LOAD)
            .map(|(i, _)| self.align_range(i))
            .collect()
    }

    pub fn build(&self) -> Vec<u8> {
        let ehsize = self.ehsize();
        let phentsize = self.phentsize();
        let word = self.word_size;
        let endian = self.endian;

        let mut image = vec![self.filler; ehsize];
        image[..4].copy_from_slice(b"\x7fELF");
        image[4] = match word {
            WordSize::Elf32 => 1,
            WordSize::Elf64 => 2,
        };
        image[5] = match endian {
            Endian::Little => 1,
            Endian::Big => 2,
        };

        let (phoff_at, phentsize_at, phnum_at) = match word {
            WordSize::Elf32 => (28, 42, 44),
            WordSize::Elf64 => (32, 54, 56),
        };
        put_word(&mut image, phoff_at, word, endian, self.phoff() as u64);
        put(&mut image, phentsize_at, endian, &(phentsize as u16).to_be_bytes());
        put(&mut image, phnum_at, endian, &(self.entries.len() as u16).to_be_bytes());

        image.extend(std::iter::repeat(self.filler.rotate_left(1)).take(self.phoff_gap));

        for (i, (p_type, p_align)) in self.entries.iter().enumerate() {
            let base = image.len();
            image.extend(std::iter::repeat(self.filler.wrapping_add(i as u8 + 1)).take(phentsize));
            put(&mut image, base, endian, &p_type.to_be_bytes());
            let align_at = self.align_range(i).start;
            put_word(&mut image, align_at, word, endian, *p_align);
        }

        image.extend_from_slice(&self.trailer);
        if image.len() < 64 {
            image.resize(64, 0);
        }
        image
    }
}

/// Write big-endian `bytes` at `offset`, byte-swapped for little-endian.
fn put(image: &mut [u8], offset: usize, endian: Endian, bytes: &[u8]) {
    let dst = &mut image[offset..offset + bytes.len()];
    dst.copy_from_slice(bytes);
    if endian == Endian::Little {
        dst.reverse();
    }
}

fn put_word(image: &mut [u8], offset: usize, word: WordSize, endian: Endian, value: u64) {
    match word {
        WordSize::Elf32 => put(image, offset, endian, &(value as u32).to_be_bytes()),
        WordSize::Elf64 => put(image, offset, endian, &value.to_be_bytes()),
    }
}

/// Decode the unsigned integer stored in `image[range]`.
pub fn read_field(image: &[u8], range: Range<usize>, endian: Endian) -> u64 {
    let mut bytes = image[range].to_vec();
    if endian == Endian::Little {
        bytes.reverse();
    }
    bytes.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b))
}

// ── Strategies ───────────────────────────────────────────────────────

pub fn arb_word_size() -> impl Strategy<Value = WordSize> {
    prop_oneof![Just(WordSize::Elf32), Just(WordSize::Elf64)]
}

pub fn arb_endian() -> impl Strategy<Value = Endian> {
    prop_oneof![Just(Endian::Little), Just(Endian::Big)]
}

/// Segment types biased towards `PT_LOAD`.
pub fn arb_p_type() -> impl Strategy<Value = u32> {
    prop_oneof![
        3 => Just(PT_LOAD),
        1 => Just(PT_NOTE),
        1 => Just(PT_PHDR),
        1 => Just(0x6474_e551u32),
        1 => any::<u32>(),
    ]
}

/// Alignment values that fit a 32-bit field.
pub fn arb_p_align() -> impl Strategy<Value = u64> {
    prop_oneof![
        Just(0u64),
        Just(1),
        Just(4096),
        Just(16384),
        Just(65536),
        any::<u32>().prop_map(u64::from),
    ]
}

/// Power-of-two targets from 4 KiB to 64 KiB.
pub fn arb_target() -> impl Strategy<Value = u64> {
    (12u32..=16).prop_map(|shift| 1u64 << shift)
}

pub fn arb_elf() -> impl Strategy<Value = ElfSpec> {
    (
        arb_word_size(),
        arb_endian(),
        proptest::collection::vec((arb_p_type(), arb_p_align()), 0..12),
        any::<u8>(),
        proptest::collection::vec(any::<u8>(), 0..256),
        prop_oneof![Just(0usize), 1usize..96],
        prop_oneof![Just(0usize), 1usize..24],
    )
        .prop_map(
            |(word_size, endian, entries, filler, trailer, phoff_gap, entry_padding)| ElfSpec {
                word_size,
                endian,
                entries,
                filler,
                trailer,
                phoff_gap,
                entry_padding,
            },
        )
}
