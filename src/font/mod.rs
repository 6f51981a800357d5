use crate::filesys::FsError;

mod file;
pub mod format;
mod store;

#[cfg(test)]
pub(crate) mod test_font;

pub use file::{FontFile, Glyph};
pub use format::{FontBlock, FontHeader, FontInfo};
pub use store::FontStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontError {
    /// The store already holds a font
    AlreadyOpen,
    /// The store holds no font
    NotLoaded,
    /// The header carries a format tag other than a wide font
    UnsupportedFormat(u8),
    /// The file ends inside the header or block table
    TruncatedHeader,
    /// A glyph record length is outside `2..=MAX_GLYPH_SIZE`
    CorruptGlyph,
    Io(FsError),
}

impl From<FsError> for FontError {
    fn from(err: FsError) -> Self {
        FontError::Io(err)
    }
}

impl core::fmt::Display for FontError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FontError::AlreadyOpen => write!(f, "A font is already loaded"),
            FontError::NotLoaded => write!(f, "No font loaded"),
            FontError::UnsupportedFormat(tag) => write!(f, "Unsupported font format {:#04x}", tag),
            FontError::TruncatedHeader => write!(f, "Font header is truncated"),
            FontError::CorruptGlyph => write!(f, "Corrupt glyph record"),
            FontError::Io(err) => write!(f, "Font file error: {}", err),
        }
    }
}
