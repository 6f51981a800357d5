//! Font images and an in-memory file system for font store tests

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::cell::Cell;

use crate::constants::font::*;
use crate::filesys::{File, FileSystem, FsError, SeekFrom};

/// Glyph record with the given width and pixel bytes
pub fn record(width: u8, pixels: &[u8]) -> Vec<u8> {
    let mut record = vec![(pixels.len() + 2) as u8, width];
    record.extend_from_slice(pixels);
    record
}

/// Lays out a font file. Each block's glyph table is followed by its records.
pub struct FontBuilder {
    header: [u8; FONT_HEADER_SIZE],
    blocks: Vec<(u32, Vec<Option<Vec<u8>>>)>,
}

impl FontBuilder {
    pub fn new(format: u8) -> Self {
        FontBuilder {
            header: [format, 8, 12, 10, 0x01, 0x00, 0, 0],
            blocks: Vec::new(),
        }
    }

    pub fn metrics(mut self, max_width: u8, height: u8, baseline: u8) -> Self {
        self.header[1..4].copy_from_slice(&[max_width, height, baseline]);
        self
    }

    pub fn codepage(mut self, codepage: u16) -> Self {
        self.header[4..6].copy_from_slice(&codepage.to_le_bytes());
        self
    }

    /// Adds a block starting at `start`, `None` marking an absent glyph
    pub fn block(mut self, start: u32, glyphs: &[Option<&[u8]>]) -> Self {
        let glyphs = glyphs.iter().map(|g| g.map(|g| g.to_vec())).collect();
        self.blocks.push((start, glyphs));
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut header = self.header;
        header[6..8].copy_from_slice(&(self.blocks.len() as u16).to_le_bytes());

        let mut image = header.to_vec();
        let mut tables = Vec::new();
        let mut table_offset = FONT_HEADER_SIZE + self.blocks.len() * FONT_BLOCK_SIZE;

        for (start, glyphs) in &self.blocks {
            image.extend_from_slice(&start.to_le_bytes());
            image.extend_from_slice(&(glyphs.len() as u32).to_le_bytes());
            image.extend_from_slice(&(table_offset as u32).to_le_bytes());

            let mut table = Vec::new();
            let mut records = Vec::new();
            let mut next = glyphs.len() * GLYPH_OFFSET_SIZE;
            for glyph in glyphs {
                match glyph {
                    Some(glyph) => {
                        table.extend_from_slice(&(next as u32).to_le_bytes());
                        records.extend_from_slice(glyph);
                        next += glyph.len();
                    }
                    None => table.extend_from_slice(&0u32.to_le_bytes()),
                }
            }

            table_offset += table.len() + records.len();
            tables.extend_from_slice(&table);
            tables.extend_from_slice(&records);
        }

        image.extend_from_slice(&tables);
        image
    }
}

/// Counters shared between a [`MemoryFs`] and the files it opens
#[derive(Clone, Default)]
pub struct Counters {
    pub reads: Rc<Cell<usize>>,
    pub open: Rc<Cell<usize>>,
    pub fail: Rc<Cell<bool>>,
}

pub struct MemoryFile {
    data: Rc<Vec<u8>>,
    position: u64,
    counters: Counters,
}

impl File for MemoryFile {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, FsError> {
        self.counters.reads.set(self.counters.reads.get() + 1);
        if self.counters.fail.get() {
            return Err(FsError::IOError);
        }

        let start = (self.position as usize).min(self.data.len());
        let n = buf.len().min(self.data.len() - start);
        buf[..n].copy_from_slice(&self.data[start..start + n]);
        self.position += n as u64;
        Ok(n)
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64, FsError> {
        self.position = pos.resolve(self.position, self.size())?;
        Ok(self.position)
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

impl Drop for MemoryFile {
    fn drop(&mut self) {
        self.counters.open.set(self.counters.open.get() - 1);
    }
}

#[derive(Default)]
pub struct MemoryFs {
    files: Vec<(String, Rc<Vec<u8>>)>,
    pub counters: Counters,
}

impl MemoryFs {
    pub fn with_file(mut self, name: &str, data: Vec<u8>) -> Self {
        self.files.push((String::from(name), Rc::new(data)));
        self
    }

    pub fn reads(&self) -> usize {
        self.counters.reads.get()
    }

    pub fn open_files(&self) -> usize {
        self.counters.open.get()
    }

    pub fn fail(&self, fail: bool) {
        self.counters.fail.set(fail);
    }
}

impl FileSystem for MemoryFs {
    type File = MemoryFile;

    fn open_file(&mut self, name: &str) -> Result<MemoryFile, FsError> {
        let (_, data) = self
            .files
            .iter()
            .find(|(file, _)| file == name)
            .ok_or(FsError::NotFound)?;

        self.counters.open.set(self.counters.open.get() + 1);
        Ok(MemoryFile {
            data: Rc::clone(data),
            position: 0,
            counters: self.counters.clone(),
        })
    }
}
