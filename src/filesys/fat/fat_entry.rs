//! File allocation table entries and the single-sector FAT cache

use byteorder::{ByteOrder, LittleEndian};

use super::geometry::FatType;
use crate::constants::fat::*;
use crate::filesys::{FsError, SectorBuf, SectorDevice};

/// A FAT entry pointing to the next cluster in a chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FatEntry {
    /// Cluster number or special value (0=free, >=end-of-chain marker)
    pub cluster: u32,
    pub fat_type: FatType,
}

impl FatEntry {
    /// Decodes entry `index` of a FAT sector
    pub fn read(sector: &SectorBuf, index: usize, fat_type: FatType) -> Self {
        let cluster = match fat_type {
            FatType::Fat16 => LittleEndian::read_u16(&sector[index * 2..index * 2 + 2]) as u32,
            FatType::Fat32 => {
                LittleEndian::read_u32(&sector[index * 4..index * 4 + 4]) & FAT32_ENTRY_MASK
            }
        };
        FatEntry { cluster, fat_type }
    }

    /// Returns true if this entry marks the end of a cluster chain
    pub fn is_end_of_chain(&self) -> bool {
        match self.fat_type {
            FatType::Fat16 => self.cluster >= FAT16_END_OF_CHAIN,
            FatType::Fat32 => self.cluster >= FAT32_END_OF_CHAIN,
        }
    }

    /// Returns true if this cluster is unused/free
    pub fn is_free(&self) -> bool {
        self.cluster == 0
    }
}

/// Holds the most recently read FAT sector
pub struct FatCache {
    buf: SectorBuf,
    /// Absolute sector held in `buf`, `None` when the buffer is not valid
    sector: Option<u32>,
}

impl Default for FatCache {
    fn default() -> Self {
        Self::new()
    }
}

impl FatCache {
    pub const fn new() -> Self {
        FatCache {
            buf: [0; SECTOR_SIZE],
            sector: None,
        }
    }

    /// Absolute sector currently cached
    pub fn cached_sector(&self) -> Option<u32> {
        self.sector
    }

    /// Returns `sector`, reading it from `device` only on a miss.
    /// A failed read leaves the cache invalid.
    pub fn load<D: SectorDevice>(&mut self, device: &D, sector: u32) -> Result<&SectorBuf, FsError> {
        if self.sector != Some(sector) {
            self.sector = None;
            device.read_sector(sector, &mut self.buf)?;
            self.sector = Some(sector);
        }
        Ok(&self.buf)
    }
}
