use core::result::Result;

use crate::constants::fat::SECTOR_SIZE;

pub mod block;
pub mod fat;

/// One device sector
pub type SectorBuf = [u8; SECTOR_SIZE];

// Define error types for the filesystem operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsError {
    NotFound,
    InvalidName,
    IOError,
    NotSupported,
    InvalidOffset,
    /// A cluster number outside the data area, either requested or found in the FAT
    InvalidCluster,
    /// The data ran out before the requested byte count was reached
    UnexpectedEof,
}

impl core::fmt::Display for FsError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FsError::NotFound => write!(f, "File not found"),
            FsError::InvalidName => write!(f, "Invalid 8.3 file name"),
            FsError::IOError => write!(f, "Device I/O error"),
            FsError::NotSupported => write!(f, "Operation not supported"),
            FsError::InvalidOffset => write!(f, "Seek past end of file"),
            FsError::InvalidCluster => write!(f, "Cluster number out of range"),
            FsError::UnexpectedEof => write!(f, "Unexpected end of data"),
        }
    }
}

// Core traits for filesystem abstraction

/// Represents a sector-addressed storage device (SD card, serial flash, ...)
pub trait SectorDevice {
    fn read_sector(&self, sector: u32, buf: &mut SectorBuf) -> Result<(), FsError>;
}

impl<F> SectorDevice for F
where
    F: Fn(u32, &mut SectorBuf) -> Result<(), FsError>,
{
    fn read_sector(&self, sector: u32, buf: &mut SectorBuf) -> Result<(), FsError> {
        self(sector, buf)
    }
}

/// Represents a readable, seekable file
pub trait File {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, FsError>;
    fn seek(&mut self, pos: SeekFrom) -> Result<u64, FsError>;
    fn size(&self) -> u64;

    /// Fills `buf` completely or fails with [`FsError::UnexpectedEof`]
    fn read_exact(&mut self, mut buf: &mut [u8]) -> Result<(), FsError> {
        while !buf.is_empty() {
            match self.read(buf)? {
                0 => return Err(FsError::UnexpectedEof),
                n => buf = &mut buf[n..],
            }
        }
        Ok(())
    }
}

/// Seek positions for file operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekFrom {
    Start(u64),
    Current(i64),
    End(i64),
}

impl SeekFrom {
    /// Resolves the target position for a file at `position` of `size` bytes.
    /// Positions past the end of the file are rejected.
    pub fn resolve(self, position: u64, size: u64) -> Result<u64, FsError> {
        let (base, offset) = match self {
            SeekFrom::Start(offset) => return checked_in_file(offset, size),
            SeekFrom::Current(offset) => (position, offset),
            SeekFrom::End(offset) => (size, offset),
        };

        let target = if offset < 0 {
            base.checked_sub(offset.unsigned_abs())
        } else {
            base.checked_add(offset as u64)
        };

        checked_in_file(target.ok_or(FsError::InvalidOffset)?, size)
    }
}

fn checked_in_file(pos: u64, size: u64) -> Result<u64, FsError> {
    if pos > size {
        return Err(FsError::InvalidOffset);
    }
    Ok(pos)
}

/// Something that can open files by name
pub trait FileSystem {
    type File: File;

    fn open_file(&mut self, name: &str) -> Result<Self::File, FsError>;
}
