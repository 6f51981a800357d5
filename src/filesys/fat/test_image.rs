//! Synthetic FAT16/FAT32 images for unit tests

use alloc::vec;
use alloc::vec::Vec;

use super::geometry::FatType;
use crate::constants::fat::*;
use crate::filesys::block::MemorySectorDevice;

/// Builds a small formatted volume, optionally behind an MBR
pub struct ImageBuilder {
    fat_type: FatType,
    sectors_per_cluster: u32,
    partition_offset: Option<u32>,
    root_clusters: Vec<u32>,
    entries: Vec<[u8; DIR_ENTRY_SIZE]>,
    fat: Vec<(u32, u32)>,
    data: Vec<(u32, Vec<u8>)>,
}

impl ImageBuilder {
    pub const DEFAULT_SECTORS: u32 = 4096;
    const FAT_COUNT: u32 = 2;
    const SECTORS_PER_FAT: u32 = 16;
    const FAT16_ROOT_ENTRIES: u32 = 512;
    const FAT32_RESERVED: u32 = 32;

    fn new(fat_type: FatType) -> Self {
        ImageBuilder {
            fat_type,
            sectors_per_cluster: 1,
            partition_offset: None,
            root_clusters: vec![2],
            entries: Vec::new(),
            fat: Vec::new(),
            data: Vec::new(),
        }
    }

    pub fn fat16() -> Self {
        Self::new(FatType::Fat16)
    }

    pub fn fat32() -> Self {
        Self::new(FatType::Fat32)
    }

    pub fn sectors_per_cluster(mut self, count: u32) -> Self {
        self.sectors_per_cluster = count;
        self
    }

    /// Places the volume behind an MBR whose first partition starts at `offset`
    pub fn partition_offset(mut self, offset: u32) -> Self {
        self.partition_offset = Some(offset);
        self
    }

    /// Clusters making up the FAT32 root directory
    pub fn root_chain(mut self, clusters: &[u32]) -> Self {
        self.root_clusters = clusters.to_vec();
        self
    }

    /// Sets one raw FAT entry
    pub fn fat_entry(mut self, cluster: u32, value: u32) -> Self {
        self.fat.push((cluster, value));
        self
    }

    /// Links `clusters` in order and ends the chain after the last one
    pub fn chain(mut self, clusters: &[u32]) -> Self {
        let eoc = self.end_of_chain();
        for pair in clusters.windows(2) {
            self.fat.push((pair[0], pair[1]));
        }
        if let Some(&last) = clusters.last() {
            self.fat.push((last, eoc));
        }
        self
    }

    /// Appends a root directory entry
    pub fn dir_entry(mut self, name: &[u8; SHORT_NAME_LENGTH], attr: u8, cluster: u32, size: u32) -> Self {
        let mut entry = [0u8; DIR_ENTRY_SIZE];
        entry[..SHORT_NAME_LENGTH].copy_from_slice(name);
        entry[11] = attr;
        entry[20..22].copy_from_slice(&((cluster >> 16) as u16).to_le_bytes());
        entry[26..28].copy_from_slice(&(cluster as u16).to_le_bytes());
        entry[28..32].copy_from_slice(&size.to_le_bytes());
        self.entries.push(entry);
        self
    }

    /// Writes `bytes` starting at the first sector of `cluster`
    pub fn cluster_data(mut self, cluster: u32, bytes: &[u8]) -> Self {
        self.data.push((cluster, bytes.to_vec()));
        self
    }

    /// Adds a complete file: directory entry, chain and contents split over `clusters`
    pub fn file(self, name: &[u8; SHORT_NAME_LENGTH], clusters: &[u32], contents: &[u8]) -> Self {
        let cluster_bytes = self.sectors_per_cluster as usize * SECTOR_SIZE;
        let start = clusters.first().copied().unwrap_or(0);
        let mut builder = self
            .dir_entry(name, ATTR_ARCHIVE, start, contents.len() as u32)
            .chain(clusters);
        for (cluster, chunk) in clusters.iter().zip(contents.chunks(cluster_bytes)) {
            builder = builder.cluster_data(*cluster, chunk);
        }
        builder
    }

    fn end_of_chain(&self) -> u32 {
        match self.fat_type {
            FatType::Fat16 => 0xFFFF,
            FatType::Fat32 => 0x0FFF_FFFF,
        }
    }

    fn reserved_sectors(&self) -> u32 {
        match self.fat_type {
            FatType::Fat16 => 1,
            FatType::Fat32 => Self::FAT32_RESERVED,
        }
    }

    fn root_dir_sectors(&self) -> u32 {
        match self.fat_type {
            FatType::Fat16 => Self::FAT16_ROOT_ENTRIES * DIR_ENTRY_SIZE as u32 / SECTOR_SIZE as u32,
            FatType::Fat32 => 0,
        }
    }

    fn first_data_sector(&self) -> u32 {
        self.reserved_sectors() + Self::FAT_COUNT * Self::SECTORS_PER_FAT + self.root_dir_sectors()
    }

    fn cluster_offset(&self, cluster: u32) -> usize {
        let sector = self.first_data_sector() + (cluster - 2) * self.sectors_per_cluster;
        sector as usize * SECTOR_SIZE
    }

    fn boot_sector(&self) -> [u8; SECTOR_SIZE] {
        let mut bs = [0u8; SECTOR_SIZE];
        bs[0..3].copy_from_slice(&[0xEB, 0x3C, 0x90]);
        bs[3..11].copy_from_slice(b"FATFONT ");
        bs[11..13].copy_from_slice(&(SECTOR_SIZE as u16).to_le_bytes());
        bs[13] = self.sectors_per_cluster as u8;
        bs[14..16].copy_from_slice(&(self.reserved_sectors() as u16).to_le_bytes());
        bs[16] = Self::FAT_COUNT as u8;
        bs[21] = 0xF8;

        match self.fat_type {
            FatType::Fat16 => {
                bs[17..19].copy_from_slice(&(Self::FAT16_ROOT_ENTRIES as u16).to_le_bytes());
                bs[19..21].copy_from_slice(&(Self::DEFAULT_SECTORS as u16).to_le_bytes());
                bs[22..24].copy_from_slice(&(Self::SECTORS_PER_FAT as u16).to_le_bytes());
                bs[38] = 0x29;
                bs[43..54].copy_from_slice(b"NO NAME    ");
                bs[54..62].copy_from_slice(b"FAT16   ");
            }
            FatType::Fat32 => {
                bs[32..36].copy_from_slice(&Self::DEFAULT_SECTORS.to_le_bytes());
                bs[36..40].copy_from_slice(&Self::SECTORS_PER_FAT.to_le_bytes());
                bs[44..48].copy_from_slice(&self.root_clusters[0].to_le_bytes());
                bs[66] = 0x29;
                bs[71..82].copy_from_slice(b"NO NAME    ");
                bs[82..90].copy_from_slice(b"FAT32   ");
            }
        }

        bs[510] = 0x55;
        bs[511] = 0xAA;
        bs
    }

    fn write_fat(&self, volume: &mut [u8], cluster: u32, value: u32) {
        let fat_bytes = Self::SECTORS_PER_FAT as usize * SECTOR_SIZE;
        for copy in 0..Self::FAT_COUNT as usize {
            let base = self.reserved_sectors() as usize * SECTOR_SIZE + copy * fat_bytes;
            match self.fat_type {
                FatType::Fat16 => {
                    let at = base + cluster as usize * 2;
                    volume[at..at + 2].copy_from_slice(&(value as u16).to_le_bytes());
                }
                FatType::Fat32 => {
                    let at = base + cluster as usize * 4;
                    volume[at..at + 4].copy_from_slice(&value.to_le_bytes());
                }
            }
        }
    }

    pub fn build(self) -> MemorySectorDevice {
        let mut volume = vec![0u8; Self::DEFAULT_SECTORS as usize * SECTOR_SIZE];
        volume[..SECTOR_SIZE].copy_from_slice(&self.boot_sector());

        let eoc = self.end_of_chain();
        self.write_fat(&mut volume, 0, 0xFFFF_FFF8);
        self.write_fat(&mut volume, 1, eoc);

        if self.fat_type == FatType::Fat32 {
            for pair in self.root_clusters.windows(2) {
                self.write_fat(&mut volume, pair[0], pair[1]);
            }
            if let Some(&last) = self.root_clusters.last() {
                self.write_fat(&mut volume, last, eoc);
            }
        }

        for &(cluster, value) in &self.fat {
            self.write_fat(&mut volume, cluster, value);
        }

        let root_bytes = self.sectors_per_cluster as usize * SECTOR_SIZE;
        for (i, entry) in self.entries.iter().enumerate() {
            let at = match self.fat_type {
                FatType::Fat16 => {
                    let root = self.reserved_sectors() + Self::FAT_COUNT * Self::SECTORS_PER_FAT;
                    root as usize * SECTOR_SIZE + i * DIR_ENTRY_SIZE
                }
                FatType::Fat32 => {
                    let byte = i * DIR_ENTRY_SIZE;
                    let cluster = self.root_clusters[byte / root_bytes];
                    self.cluster_offset(cluster) + byte % root_bytes
                }
            };
            volume[at..at + DIR_ENTRY_SIZE].copy_from_slice(entry);
        }

        for (cluster, bytes) in &self.data {
            let at = self.cluster_offset(*cluster);
            volume[at..at + bytes.len()].copy_from_slice(bytes);
        }

        let image = match self.partition_offset {
            None => volume,
            Some(offset) => {
                let mut disk = vec![0u8; offset as usize * SECTOR_SIZE];
                let entry = PARTITION_TABLE_OFFSET;
                disk[entry] = 0x80;
                disk[entry + 4] = match self.fat_type {
                    FatType::Fat16 => 0x06,
                    FatType::Fat32 => 0x0C,
                };
                disk[entry + 8..entry + 12].copy_from_slice(&offset.to_le_bytes());
                disk[entry + 12..entry + 16].copy_from_slice(&Self::DEFAULT_SECTORS.to_le_bytes());
                disk[510] = 0x55;
                disk[511] = 0xAA;
                disk.extend_from_slice(&volume);
                disk
            }
        };

        MemorySectorDevice::from_image(image)
    }
}
