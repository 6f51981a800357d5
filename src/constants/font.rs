//! Wide font file format and font store limits.

/// Number of font block headers cached when a font is loaded.
/// Blocks past this are read from the file each time they are needed.
pub const MAX_CACHED_BLOCKS: usize = 16;

/// Space set aside for the compressed data of a single glyph.
/// Glyph records carry a one-byte length so they never exceed 255 bytes.
pub const MAX_GLYPH_SIZE: usize = 256;

/// Size of the font header at the start of the file
pub const FONT_HEADER_SIZE: usize = 8;

/// Size of one block record in the table following the header
pub const FONT_BLOCK_SIZE: usize = 12;

/// Size of one glyph table entry
pub const GLYPH_OFFSET_SIZE: usize = 4;

/// Marks a font as using 32-bit codepoint blocks
pub const FONT_WIDE_MARKER: u8 = 0x40;

/// Wide font, uncompressed glyph bitmaps
pub const FONT_FMT_WIDE_UNCOMPRESSED: u8 = FONT_WIDE_MARKER;

/// Wide font, pixel run-length encoded glyphs
pub const FONT_FMT_WIDE_PIXEL_RLE: u8 = 0x01 | FONT_WIDE_MARKER;
