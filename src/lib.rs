//! Read-only FAT16/FAT32 volume access and a file-backed wide font store
//! for small targets.
#![cfg_attr(not(test), no_std)]
#![cfg_attr(feature = "strict", deny(warnings))]
extern crate alloc;

pub mod constants;
pub mod filesys;
pub mod font;
pub mod logging;

pub mod prelude {
    pub use crate::filesys::fat::{FileCursor, FileInfo, FileStream, MountError, ShortName, Volume};
    pub use crate::filesys::{File, FileSystem, FsError, SectorBuf, SectorDevice, SeekFrom};
    pub use crate::font::{FontError, FontFile, FontStore, Glyph};
}
