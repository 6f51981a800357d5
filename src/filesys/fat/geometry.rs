//! Partition geometry derived at mount time

use log::{debug, info};

use super::boot_sector::{signature, BootSector, PartitionEntry};
use crate::constants::fat::*;
use crate::filesys::{FsError, SectorDevice};

/// The two supported FAT variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatType {
    Fat16,
    Fat32,
}

impl FatType {
    /// FAT entries held by one FAT sector
    pub fn entries_per_sector(self) -> u32 {
        match self {
            FatType::Fat16 => FAT16_ENTRIES_PER_SECTOR,
            FatType::Fat32 => FAT32_ENTRIES_PER_SECTOR,
        }
    }

    /// Width of a FAT entry in bits
    pub fn bits(self) -> u32 {
        match self {
            FatType::Fat16 => 16,
            FatType::Fat32 => 32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountError {
    Io(FsError),
    /// Missing 0xAA55 on the MBR or boot sector
    BadSignature,
    /// Sector size other than 512 bytes
    UnsupportedSectorSize(u16),
    /// Neither a FAT16 nor a FAT32 boot sector
    UnrecognizedFilesystem,
}

impl From<FsError> for MountError {
    fn from(err: FsError) -> Self {
        MountError::Io(err)
    }
}

impl core::fmt::Display for MountError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MountError::Io(err) => write!(f, "I/O error during mount: {}", err),
            MountError::BadSignature => write!(f, "Missing 0xAA55 sector signature"),
            MountError::UnsupportedSectorSize(size) => {
                write!(f, "Unsupported sector size {} (must be 512)", size)
            }
            MountError::UnrecognizedFilesystem => write!(f, "Not a FAT16 or FAT32 volume"),
        }
    }
}

/// Sector positions derived from boot sector fields
struct Layout {
    sectors_per_fat: u32,
    first_fat_sector: u32,
    last_fat_sector: u32,
    first_data_sector: u32,
    root_dir_start: u32,
}

impl Layout {
    /// `None` when the fields do not describe a layout within 32-bit sector numbers
    fn compute(boot: &BootSector, first_sector: u32, fat_type: FatType) -> Option<Self> {
        let first_fat_sector = first_sector.checked_add(boot.reserved_sectors as u32)?;
        let sectors_per_fat = match fat_type {
            FatType::Fat16 => boot.sectors_per_fat_16 as u32,
            FatType::Fat32 => boot.sectors_per_fat_32,
        };
        let last_fat_sector = first_fat_sector
            .checked_add(sectors_per_fat)?
            .saturating_sub(1);
        let fats_end =
            first_fat_sector.checked_add(sectors_per_fat.checked_mul(boot.fat_count as u32)?)?;

        let (root_dir_start, first_data_sector) = match fat_type {
            FatType::Fat16 => {
                let root_dir_sectors = (boot.root_dir_entries as u32 * DIR_ENTRY_SIZE as u32)
                    .div_ceil(SECTOR_SIZE as u32);
                (fats_end, fats_end.checked_add(root_dir_sectors)?)
            }
            FatType::Fat32 => (boot.root_cluster, fats_end),
        };

        Some(Layout {
            sectors_per_fat,
            first_fat_sector,
            last_fat_sector,
            first_data_sector,
            root_dir_start,
        })
    }
}

/// Layout of the mounted partition, in absolute sectors unless noted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub first_sector: u32,
    pub block_count: u32,
    pub sectors_per_cluster: u32,
    /// Zero on FAT32
    pub max_root_entries: u32,
    pub sectors_per_fat: u32,
    pub first_fat_sector: u32,
    pub last_fat_sector: u32,
    pub first_data_sector: u32,
    pub fat_type: FatType,
    /// Absolute sector on FAT16, starting cluster on FAT32
    pub root_dir_start: u32,
}

impl Geometry {
    /// Locates the first FAT16/FAT32 partition on `device`.
    ///
    /// Sector 0 may either be a boot sector (unpartitioned media) or an MBR,
    /// in which case the first partition table entry is followed.
    pub fn probe<D: SectorDevice>(device: &D) -> Result<Self, MountError> {
        let mut sector = [0u8; SECTOR_SIZE];
        device.read_sector(0, &mut sector)?;

        if signature(&sector) != BOOT_SIGNATURE {
            return Err(MountError::BadSignature);
        }

        let mut boot = BootSector::parse(&sector);
        let (first_sector, block_count) = if boot.names_fat_filesystem() {
            (0, boot.total_sectors())
        } else {
            let part = PartitionEntry::parse(&sector, 0);
            debug!(
                "MBR partition 0: type {:#04x} at sector {} ({} sectors)",
                part.partition_type, part.first_sector, part.sector_count
            );
            device.read_sector(part.first_sector, &mut sector)?;
            boot = BootSector::parse(&sector);
            (part.first_sector, part.sector_count)
        };

        if boot.signature != BOOT_SIGNATURE {
            return Err(MountError::BadSignature);
        }

        if boot.bytes_per_sector as usize != SECTOR_SIZE {
            return Err(MountError::UnsupportedSectorSize(boot.bytes_per_sector));
        }

        if boot.sectors_per_cluster == 0 {
            return Err(MountError::UnrecognizedFilesystem);
        }

        let fat_type = if boot.root_dir_entries == 0 {
            if &boot.fs_type_32 != b"FAT32   " {
                return Err(MountError::UnrecognizedFilesystem);
            }
            FatType::Fat32
        } else {
            if &boot.fs_type_16 != b"FAT16   " {
                return Err(MountError::UnrecognizedFilesystem);
            }
            FatType::Fat16
        };

        let layout = Layout::compute(&boot, first_sector, fat_type)
            .ok_or(MountError::UnrecognizedFilesystem)?;

        let geometry = Geometry {
            first_sector,
            block_count,
            sectors_per_cluster: boot.sectors_per_cluster as u32,
            max_root_entries: boot.root_dir_entries as u32,
            sectors_per_fat: layout.sectors_per_fat,
            first_fat_sector: layout.first_fat_sector,
            last_fat_sector: layout.last_fat_sector,
            first_data_sector: layout.first_data_sector,
            fat_type,
            root_dir_start: layout.root_dir_start,
        };

        // Every cluster in range must map to a data sector and a FAT sector
        let max_cluster = geometry.max_cluster();
        if geometry.cluster_to_sector(max_cluster).is_none()
            || geometry.fat_sector(max_cluster).is_none()
        {
            return Err(MountError::UnrecognizedFilesystem);
        }

        info!(
            "Mounted FAT{} volume: {} sectors at {}, {} sectors/cluster, data at {}",
            fat_type.bits(),
            block_count,
            first_sector,
            geometry.sectors_per_cluster,
            geometry.first_data_sector
        );

        Ok(geometry)
    }

    /// Highest cluster number considered valid
    pub fn max_cluster(&self) -> u32 {
        self.block_count / self.sectors_per_cluster
    }

    /// True if `cluster` addresses the data area
    pub fn is_valid_cluster(&self, cluster: u32) -> bool {
        (FIRST_DATA_CLUSTER..=self.max_cluster()).contains(&cluster)
    }

    /// FAT sector holding the entry for `cluster`, and the entry's index in it
    pub fn fat_sector(&self, cluster: u32) -> Option<(u32, usize)> {
        let per_sector = self.fat_type.entries_per_sector();
        let sector = self.first_fat_sector.checked_add(cluster / per_sector)?;
        Some((sector, (cluster % per_sector) as usize))
    }

    /// Converts cluster number to absolute sector number, `None` if the
    /// sector falls outside the 32-bit sector space
    pub fn cluster_to_sector(&self, cluster: u32) -> Option<u32> {
        cluster
            .checked_sub(FIRST_DATA_CLUSTER)?
            .checked_mul(self.sectors_per_cluster)?
            .checked_add(self.first_data_sector)
    }
}
