//! Slot holding at most one loaded font

use log::{info, warn};

use super::{FontError, FontFile, FontInfo, Glyph};
use crate::filesys::{File, FileSystem};

/// Holds at most one font file open for glyph lookups.
///
/// A store starts out unloaded. [`load`](FontStore::load) fills it and
/// [`unload`](FontStore::unload) closes the file again.
pub struct FontStore<F: File> {
    font: Option<FontFile<F>>,
}

impl<F: File> Default for FontStore<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: File> FontStore<F> {
    pub const fn new() -> Self {
        FontStore { font: None }
    }

    /// Opens `name` on `fs` and reads its header and block table.
    ///
    /// Fails with [`FontError::AlreadyOpen`] if this store already holds a
    /// font, leaving that font as it was. On any other failure the file is
    /// closed and the store stays unloaded.
    pub fn load<S>(&mut self, fs: &mut S, name: &str) -> Result<&mut FontFile<F>, FontError>
    where
        S: FileSystem<File = F>,
    {
        if self.font.is_some() {
            warn!("Font {} not loaded: a font is already open", name);
            return Err(FontError::AlreadyOpen);
        }

        let font = fs
            .open_file(name)
            .map_err(FontError::from)
            .and_then(FontFile::open)
            .inspect_err(|err| warn!("Font {} not loaded: {}", name, err))?;

        info!(
            "Loaded font {}: format {:#04x}, {}x{}, {} blocks",
            name,
            font.header().format,
            font.header().max_width,
            font.header().height,
            font.num_blocks()
        );
        Ok(self.font.insert(font))
    }

    /// Closes the loaded font, if any
    pub fn unload(&mut self) {
        if self.font.take().is_some() {
            info!("Font unloaded");
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.font.is_some()
    }

    pub fn font(&self) -> Option<&FontFile<F>> {
        self.font.as_ref()
    }

    pub fn font_mut(&mut self) -> Option<&mut FontFile<F>> {
        self.font.as_mut()
    }

    fn loaded(&self) -> Result<&FontFile<F>, FontError> {
        self.font.as_ref().ok_or(FontError::NotLoaded)
    }

    fn loaded_mut(&mut self) -> Result<&mut FontFile<F>, FontError> {
        self.font.as_mut().ok_or(FontError::NotLoaded)
    }

    pub fn num_blocks(&self) -> Result<u16, FontError> {
        self.loaded().map(FontFile::num_blocks)
    }

    pub fn codepage(&self) -> Result<u16, FontError> {
        self.loaded().map(FontFile::codepage)
    }

    pub fn font_info(&self) -> Result<FontInfo, FontError> {
        self.loaded().map(FontFile::font_info)
    }

    pub fn block_codepoints(&mut self, index: u16) -> Result<Option<(u32, u32)>, FontError> {
        self.loaded_mut()?.block_codepoints(index)
    }

    pub fn glyph_data(&mut self, codepoint: u32) -> Result<Option<Glyph<'_>>, FontError> {
        self.loaded_mut()?.glyph_data(codepoint)
    }
}
