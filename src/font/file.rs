//! A loaded font and its glyph lookup

use arrayvec::ArrayVec;
use byteorder::{ByteOrder, LittleEndian};
use log::debug;

use super::format::{block_record_offset, FontBlock, FontHeader, FontInfo};
use super::FontError;
use crate::constants::font::*;
use crate::filesys::{File, FsError, SeekFrom};

/// Compressed (or raw) data for one glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph<'a> {
    /// The whole record, starting with its length byte
    pub data: &'a [u8],
    /// Glyph width in pixels, the record's second byte
    pub width: u8,
}

/// A font file opened for glyph lookups
pub struct FontFile<F: File> {
    /// Backing file, closed when the font is dropped
    file: F,

    /// The font header as read from the file
    header: FontHeader,

    /// The first `MAX_CACHED_BLOCKS` block records
    blocks: ArrayVec<FontBlock, MAX_CACHED_BLOCKS>,

    /// Codepoint whose record is in `glyph_store`, 0 when empty
    current_glyph: u32,

    /// Record of the most recently resolved glyph
    glyph_store: ArrayVec<u8, MAX_GLYPH_SIZE>,
}

/// Short reads while loading mean the file is cut off
fn truncated(err: FsError) -> FontError {
    match err {
        FsError::UnexpectedEof => FontError::TruncatedHeader,
        err => FontError::Io(err),
    }
}

impl<F: File> FontFile<F> {
    /// Reads and validates the header and block table of `file`
    pub fn open(mut file: F) -> Result<Self, FontError> {
        let mut raw = [0u8; FONT_HEADER_SIZE];
        file.read_exact(&mut raw).map_err(truncated)?;

        let header = FontHeader::parse(&raw);
        if !header.is_supported() {
            return Err(FontError::UnsupportedFormat(header.format));
        }

        let mut blocks = ArrayVec::new();
        let cached = (header.num_blocks as usize).min(MAX_CACHED_BLOCKS);
        for _ in 0..cached {
            let mut record = [0u8; FONT_BLOCK_SIZE];
            file.read_exact(&mut record).map_err(truncated)?;
            blocks.push(FontBlock::parse(&record));
        }

        Ok(FontFile {
            file,
            header,
            blocks,
            current_glyph: 0,
            glyph_store: ArrayVec::new(),
        })
    }

    pub fn header(&self) -> &FontHeader {
        &self.header
    }

    pub fn font_info(&self) -> FontInfo {
        FontInfo {
            format: self.header.format,
            max_width: self.header.max_width,
            height: self.header.height,
            baseline: self.header.baseline,
        }
    }

    pub fn codepage(&self) -> u16 {
        self.header.codepage
    }

    pub fn num_blocks(&self) -> u16 {
        self.header.num_blocks
    }

    /// Codepoint currently held in the glyph cache
    pub fn cached_codepoint(&self) -> Option<u32> {
        match self.current_glyph {
            0 => None,
            codepoint => Some(codepoint),
        }
    }

    /// Block record `index`, from the cache when possible
    fn block(&mut self, index: u16) -> Result<FontBlock, FontError> {
        if let Some(block) = self.blocks.get(index as usize) {
            return Ok(*block);
        }

        let mut record = [0u8; FONT_BLOCK_SIZE];
        self.file.seek(SeekFrom::Start(block_record_offset(index)))?;
        self.file.read_exact(&mut record)?;
        Ok(FontBlock::parse(&record))
    }

    /// Returns the first codepoint and codepoint count of block `index`, or
    /// `None` if the font has no such block.
    pub fn block_codepoints(&mut self, index: u16) -> Result<Option<(u32, u32)>, FontError> {
        if index >= self.header.num_blocks {
            return Ok(None);
        }
        let block = self.block(index)?;
        Ok(Some((block.start_codepoint, block.num_codepoints)))
    }

    fn find_block(&mut self, codepoint: u32) -> Result<Option<FontBlock>, FontError> {
        for index in 0..self.header.num_blocks {
            let block = self.block(index)?;
            if block.contains(codepoint) {
                return Ok(Some(block));
            }
        }
        Ok(None)
    }

    fn cached_glyph(&self) -> Glyph<'_> {
        Glyph {
            data: &self.glyph_store,
            width: self.glyph_store[1],
        }
    }

    /// Looks up the glyph record for `codepoint`.
    ///
    /// Returns `None` for codepoint 0 and for codepoints the font does not
    /// contain. Asking again for the most recent codepoint does no I/O. A
    /// failed lookup leaves the previously cached glyph intact.
    pub fn glyph_data(&mut self, codepoint: u32) -> Result<Option<Glyph<'_>>, FontError> {
        if codepoint == 0 {
            return Ok(None);
        }

        if self.current_glyph == codepoint {
            return Ok(Some(self.cached_glyph()));
        }

        let Some(block) = self.find_block(codepoint)? else {
            return Ok(None);
        };

        let mut offset = [0u8; GLYPH_OFFSET_SIZE];
        self.file.seek(SeekFrom::Start(block.table_entry_offset(codepoint)))?;
        self.file.read_exact(&mut offset)?;

        let glyph_offset = LittleEndian::read_u32(&offset);
        if glyph_offset == 0 {
            return Ok(None);
        }

        // Staged so that a failure part way through keeps the cache consistent
        let mut record = [0u8; MAX_GLYPH_SIZE];
        self.file.seek(SeekFrom::Start(block.record_offset(glyph_offset)))?;
        self.file.read_exact(&mut record[..1])?;

        let length = record[0] as usize;
        if !(2..=MAX_GLYPH_SIZE).contains(&length) {
            return Err(FontError::CorruptGlyph);
        }
        self.file.read_exact(&mut record[1..length])?;

        self.glyph_store.clear();
        self.glyph_store
            .try_extend_from_slice(&record[..length])
            .map_err(|_| FontError::CorruptGlyph)?;
        self.current_glyph = codepoint;

        debug!("Glyph {:#x}: {} byte record", codepoint, length);
        Ok(Some(self.cached_glyph()))
    }
}
