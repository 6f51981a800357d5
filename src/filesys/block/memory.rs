//! In-memory sector device implementation

use crate::constants::fat::SECTOR_SIZE;
use crate::filesys::{FsError, SectorBuf, SectorDevice};
use alloc::vec;
use alloc::vec::Vec;
use core::cell::Cell;
use core::result::Result;

/// Sector device backed by a disk image held in memory
pub struct MemorySectorDevice {
    /// Raw image, a whole number of sectors
    image: Vec<u8>,

    /// Number of successful and failed reads issued so far
    reads: Cell<usize>,

    /// Sector whose reads fail with an I/O error
    failing_sector: Cell<Option<u32>>,
}

impl MemorySectorDevice {
    /// Creates a zero-filled device with the given number of sectors
    pub fn new(total_sectors: u32) -> Self {
        Self::from_image(vec![0; total_sectors as usize * SECTOR_SIZE])
    }

    /// Wraps an existing image. A trailing partial sector is zero padded.
    pub fn from_image(mut image: Vec<u8>) -> Self {
        let padded = image.len().div_ceil(SECTOR_SIZE) * SECTOR_SIZE;
        image.resize(padded, 0);
        Self {
            image,
            reads: Cell::new(0),
            failing_sector: Cell::new(None),
        }
    }

    /// Returns number of sectors on the device
    pub fn total_sectors(&self) -> u32 {
        (self.image.len() / SECTOR_SIZE) as u32
    }

    /// Returns how many reads have been issued
    pub fn reads(&self) -> usize {
        self.reads.get()
    }

    /// Makes every read of `sector` fail, or clears the fault with `None`
    pub fn fail_sector(&self, sector: Option<u32>) {
        self.failing_sector.set(sector);
    }

    /// Mutable view of one sector of the image
    pub fn sector_mut(&mut self, sector: u32) -> &mut [u8] {
        let start = sector as usize * SECTOR_SIZE;
        &mut self.image[start..start + SECTOR_SIZE]
    }

    /// Validates sector number is within bounds
    fn validate_sector(&self, sector: u32) -> Result<usize, FsError> {
        if sector >= self.total_sectors() || self.failing_sector.get() == Some(sector) {
            return Err(FsError::IOError);
        }
        Ok(sector as usize * SECTOR_SIZE)
    }
}

impl SectorDevice for MemorySectorDevice {
    /// Reads sector into buffer
    fn read_sector(&self, sector: u32, buf: &mut SectorBuf) -> Result<(), FsError> {
        self.reads.set(self.reads.get() + 1);
        let start = self.validate_sector(sector)?;
        buf.copy_from_slice(&self.image[start..start + SECTOR_SIZE]);
        Ok(())
    }
}
