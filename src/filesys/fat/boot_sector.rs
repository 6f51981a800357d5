//! FAT16/FAT32 boot sector and MBR partition table

use byteorder::{ByteOrder, LittleEndian};

use crate::constants::fat::{PARTITION_ENTRY_SIZE, PARTITION_TABLE_OFFSET};
use crate::filesys::SectorBuf;

/// The boot sector fields needed to locate the FAT, root directory and data area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootSector {
    /// Number of bytes per sector
    pub bytes_per_sector: u16,

    /// Number of sectors per cluster
    pub sectors_per_cluster: u8,

    /// Number of reserved sectors at start of volume, including the boot sector
    pub reserved_sectors: u16,

    /// Number of FAT copies
    pub fat_count: u8,

    /// Maximum number of root directory entries. Zero on FAT32.
    pub root_dir_entries: u16,

    /// Total number of sectors (16-bit), zero when the volume needs the 32-bit field
    pub total_sectors_16: u16,

    /// Sectors per FAT for FAT16
    pub sectors_per_fat_16: u16,

    /// Total number of sectors (32-bit)
    pub total_sectors_32: u32,

    /// Sectors per FAT for FAT32
    pub sectors_per_fat_32: u32,

    /// First cluster of the FAT32 root directory
    pub root_cluster: u32,

    /// Filesystem type string in the FAT16 extended BPB
    pub fs_type_16: [u8; 8],

    /// Filesystem type string in the FAT32 extended BPB
    pub fs_type_32: [u8; 8],

    /// Trailing 0xAA55 signature
    pub signature: u16,
}

impl BootSector {
    pub fn parse(sector: &SectorBuf) -> Self {
        let mut fs_type_16 = [0u8; 8];
        fs_type_16.copy_from_slice(&sector[54..62]);
        let mut fs_type_32 = [0u8; 8];
        fs_type_32.copy_from_slice(&sector[82..90]);

        BootSector {
            bytes_per_sector: LittleEndian::read_u16(&sector[11..13]),
            sectors_per_cluster: sector[13],
            reserved_sectors: LittleEndian::read_u16(&sector[14..16]),
            fat_count: sector[16],
            root_dir_entries: LittleEndian::read_u16(&sector[17..19]),
            total_sectors_16: LittleEndian::read_u16(&sector[19..21]),
            sectors_per_fat_16: LittleEndian::read_u16(&sector[22..24]),
            total_sectors_32: LittleEndian::read_u32(&sector[32..36]),
            sectors_per_fat_32: LittleEndian::read_u32(&sector[36..40]),
            root_cluster: LittleEndian::read_u32(&sector[44..48]),
            fs_type_16,
            fs_type_32,
            signature: signature(sector),
        }
    }

    /// True when this looks like a boot sector rather than an MBR
    pub fn names_fat_filesystem(&self) -> bool {
        self.fs_type_16.starts_with(b"FAT") || self.fs_type_32.starts_with(b"FAT32")
    }

    /// Total sectors on the volume, taken from whichever field is in use
    pub fn total_sectors(&self) -> u32 {
        if self.total_sectors_16 == 0 {
            self.total_sectors_32
        } else {
            self.total_sectors_16 as u32
        }
    }
}

/// One entry of the MBR partition table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionEntry {
    pub partition_type: u8,
    pub first_sector: u32,
    pub sector_count: u32,
}

impl PartitionEntry {
    /// Reads entry `index` (0..4) of the partition table in an MBR sector
    pub fn parse(mbr: &SectorBuf, index: usize) -> Self {
        let start = PARTITION_TABLE_OFFSET + index * PARTITION_ENTRY_SIZE;
        let entry = &mbr[start..start + PARTITION_ENTRY_SIZE];
        PartitionEntry {
            partition_type: entry[4],
            first_sector: LittleEndian::read_u32(&entry[8..12]),
            sector_count: LittleEndian::read_u32(&entry[12..16]),
        }
    }
}

/// Trailing signature of an MBR or boot sector
pub fn signature(sector: &SectorBuf) -> u16 {
    LittleEndian::read_u16(&sector[510..512])
}
