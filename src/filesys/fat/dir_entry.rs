//! Short (8.3) directory entries and names

use byteorder::{ByteOrder, LittleEndian};

use super::geometry::FatType;
use crate::constants::fat::*;
use crate::filesys::FsError;

/// An 11-byte, space padded 8.3 name as stored on disk. Case is preserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortName(pub [u8; SHORT_NAME_LENGTH]);

impl ShortName {
    /// Accepts either the raw 11-character form (`"FOO     TXT"`) or a
    /// dotted name (`"FOO.TXT"`), which is padded with spaces.
    pub fn parse(name: &str) -> Result<Self, FsError> {
        let bytes = name.as_bytes();
        if bytes.len() == SHORT_NAME_LENGTH && !bytes.contains(&b'.') {
            let mut raw = [0u8; SHORT_NAME_LENGTH];
            raw.copy_from_slice(bytes);
            return Ok(ShortName(raw));
        }

        let (base, ext) = match name.rfind('.') {
            Some(pos) => (&bytes[..pos], &bytes[pos + 1..]),
            None => (bytes, &b""[..]),
        };

        if base.is_empty()
            || base.len() > MAX_BASE_LENGTH
            || ext.len() > MAX_EXTENSION_LENGTH
            || base.contains(&b'.')
        {
            return Err(FsError::InvalidName);
        }

        let mut raw = [b' '; SHORT_NAME_LENGTH];
        raw[..base.len()].copy_from_slice(base);
        raw[MAX_BASE_LENGTH..MAX_BASE_LENGTH + ext.len()].copy_from_slice(ext);
        Ok(ShortName(raw))
    }

    pub fn as_bytes(&self) -> &[u8; SHORT_NAME_LENGTH] {
        &self.0
    }
}

const MAX_BASE_LENGTH: usize = 8;
const MAX_EXTENSION_LENGTH: usize = 3;

/// 8.3 format directory entry (32 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirEntry83 {
    /// Base name and extension, space padded
    pub name: [u8; SHORT_NAME_LENGTH],

    /// File attributes (read-only, directory, etc)
    pub attributes: u8,

    /// High half of the first cluster, FAT32 only
    pub start_cluster_hi: u16,

    /// Low half of the first cluster
    pub start_cluster_lo: u16,

    /// File size in bytes
    pub file_size: u32,
}

impl DirEntry83 {
    /// Decodes one 32-byte directory record
    pub fn parse(raw: &[u8]) -> Self {
        let mut name = [0u8; SHORT_NAME_LENGTH];
        name.copy_from_slice(&raw[..SHORT_NAME_LENGTH]);
        DirEntry83 {
            name,
            attributes: raw[11],
            start_cluster_hi: LittleEndian::read_u16(&raw[20..22]),
            start_cluster_lo: LittleEndian::read_u16(&raw[26..28]),
            file_size: LittleEndian::read_u32(&raw[28..32]),
        }
    }

    /// Returns true if entry is marked as deleted
    pub fn is_deleted(&self) -> bool {
        self.name[0] == DELETED_ENTRY_MARKER
    }

    /// Returns true if this and every later entry is unused
    pub fn is_end_marker(&self) -> bool {
        self.name[0] == END_OF_DIRECTORY_MARKER
    }

    /// Long file name fragments and the volume label are not files
    pub fn is_special(&self) -> bool {
        self.attributes & ATTR_LONG_NAME == ATTR_LONG_NAME || self.attributes & ATTR_VOLUME_ID != 0
    }

    /// Returns true if entry is a directory
    pub fn is_directory(&self) -> bool {
        self.attributes & ATTR_DIRECTORY != 0
    }

    /// True for a live short entry whose raw name equals `name` byte for byte
    pub fn matches(&self, name: &ShortName) -> bool {
        !self.is_deleted() && !self.is_special() && self.name == name.0
    }

    /// First cluster of the file. The high half is only meaningful on FAT32.
    pub fn start_cluster(&self, fat_type: FatType) -> u32 {
        match fat_type {
            FatType::Fat16 => self.start_cluster_lo as u32,
            FatType::Fat32 => ((self.start_cluster_hi as u32) << 16) | self.start_cluster_lo as u32,
        }
    }
}
