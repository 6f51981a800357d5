//! On-disk records of a wide font file
//!
//! ```text
//! header       8 bytes   format, max width, height, baseline, codepage, block count
//! blocks       12 bytes  start codepoint, codepoint count, glyph table offset (each)
//! per block    u32 glyph offsets relative to the glyph table (0 = absent),
//!              then length-prefixed glyph records
//! ```
//! All multi-byte fields are little endian.

use byteorder::{ByteOrder, LittleEndian};

use crate::constants::font::*;

/// The font header found at the start of the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontHeader {
    /// One of the `FONT_FMT_WIDE_*` tags
    pub format: u8,

    /// Width of the widest glyph
    pub max_width: u8,

    /// Height of every glyph
    pub height: u8,

    /// Offset from the top of the glyph to the baseline
    pub baseline: u8,

    /// Codepage identifier for the codepoints held in the blocks
    pub codepage: u16,

    /// Number of block records following the header
    pub num_blocks: u16,
}

impl FontHeader {
    pub fn parse(raw: &[u8; FONT_HEADER_SIZE]) -> Self {
        FontHeader {
            format: raw[0],
            max_width: raw[1],
            height: raw[2],
            baseline: raw[3],
            codepage: LittleEndian::read_u16(&raw[4..6]),
            num_blocks: LittleEndian::read_u16(&raw[6..8]),
        }
    }

    /// Only wide fonts can be served from a file
    pub fn is_supported(&self) -> bool {
        matches!(
            self.format,
            FONT_FMT_WIDE_UNCOMPRESSED | FONT_FMT_WIDE_PIXEL_RLE
        )
    }
}

/// A run of consecutive codepoints sharing one glyph table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontBlock {
    pub start_codepoint: u32,
    pub num_codepoints: u32,
    /// File offset of the block's glyph table
    pub glyph_table_offset: u32,
}

impl FontBlock {
    pub fn parse(raw: &[u8; FONT_BLOCK_SIZE]) -> Self {
        FontBlock {
            start_codepoint: LittleEndian::read_u32(&raw[0..4]),
            num_codepoints: LittleEndian::read_u32(&raw[4..8]),
            glyph_table_offset: LittleEndian::read_u32(&raw[8..12]),
        }
    }

    pub fn contains(&self, codepoint: u32) -> bool {
        codepoint >= self.start_codepoint && codepoint - self.start_codepoint < self.num_codepoints
    }

    /// File offset of the glyph table entry for `codepoint`
    pub fn table_entry_offset(&self, codepoint: u32) -> u64 {
        self.glyph_table_offset as u64
            + (codepoint - self.start_codepoint) as u64 * GLYPH_OFFSET_SIZE as u64
    }

    /// File offset of a glyph record, given its block-relative offset
    pub fn record_offset(&self, glyph_offset: u32) -> u64 {
        self.glyph_table_offset as u64 + glyph_offset as u64
    }
}

/// Metrics reported by [`FontFile::font_info`](super::FontFile::font_info)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontInfo {
    pub format: u8,
    pub max_width: u8,
    pub height: u8,
    pub baseline: u8,
}

/// Byte offset of block record `index`
pub fn block_record_offset(index: u16) -> u64 {
    (FONT_HEADER_SIZE + index as usize * FONT_BLOCK_SIZE) as u64
}
