//! Read-only FAT16/FAT32 volume reader
//!
//! Locates the first FAT partition of a sector device, follows cluster
//! chains through a one-sector FAT cache and streams the sectors of files
//! found in the root directory. Directory traversal below the root, long
//! file names and writing are not supported.

use log::{debug, warn};

use super::*;

mod boot_sector;
mod cursor;
mod dir_entry;
mod fat_entry;
mod file;
mod geometry;
#[cfg(test)]
pub(crate) mod test_image;

pub use boot_sector::{BootSector, PartitionEntry};
use crate::constants::fat::*;
pub use cursor::FileCursor;
pub use dir_entry::{DirEntry83, ShortName};
pub use fat_entry::{FatCache, FatEntry};
pub use file::FileStream;
pub use geometry::{FatType, Geometry, MountError};

/// Size and location of a file found in the root directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileInfo {
    pub size: u32,
    /// First cluster of the file, 0 for an empty file
    pub start_cluster: u32,
    pub attributes: u8,
}

impl FileInfo {
    pub fn is_directory(&self) -> bool {
        self.attributes & ATTR_DIRECTORY != 0
    }
}

/// Outcome of scanning one directory sector
enum DirScan {
    Found(DirEntry83),
    /// Hit the end-of-directory marker
    End,
    /// Nothing in this sector, keep going
    More,
}

fn scan_dir_sector(sector: &SectorBuf, name: &ShortName) -> DirScan {
    for raw in sector.chunks_exact(DIR_ENTRY_SIZE) {
        let entry = DirEntry83::parse(raw);
        if entry.is_end_marker() {
            return DirScan::End;
        }
        if entry.matches(name) {
            return DirScan::Found(entry);
        }
    }
    DirScan::More
}

/// A mounted FAT volume
pub struct Volume<D: SectorDevice> {
    /// Underlying sector device
    device: D,
    /// Layout of the partition, fixed at mount
    geometry: Geometry,
    /// Most recently read FAT sector
    fat_cache: FatCache,
}

impl<D: SectorDevice> Volume<D> {
    /// Reads the MBR and boot sector of `device` and derives the volume layout
    pub fn mount(device: D) -> Result<Self, MountError> {
        let geometry = Geometry::probe(&device)?;
        Ok(Volume {
            device,
            geometry,
            fat_cache: FatCache::new(),
        })
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    /// Looks up the cluster following `cluster` in the FAT.
    ///
    /// Returns `Ok(None)` at the end of the chain. Cluster numbers outside the
    /// data area, whether passed in or read from the FAT, are
    /// [`FsError::InvalidCluster`], as is a link to a free cluster.
    pub fn next_cluster(&mut self, cluster: u32) -> Result<Option<u32>, FsError> {
        if !self.geometry.is_valid_cluster(cluster) {
            return Err(FsError::InvalidCluster);
        }

        let fat_type = self.geometry.fat_type;
        let (fat_sector, index) = self
            .geometry
            .fat_sector(cluster)
            .ok_or(FsError::InvalidCluster)?;

        let sector = match self.fat_cache.load(&self.device, fat_sector) {
            Ok(sector) => sector,
            Err(err) => {
                warn!("FAT sector {} unreadable: {}", fat_sector, err);
                return Err(err);
            }
        };

        let entry = FatEntry::read(sector, index, fat_type);
        if entry.is_end_of_chain() {
            return Ok(None);
        }

        if entry.is_free() {
            warn!("Cluster {} links to a free cluster", cluster);
            return Err(FsError::InvalidCluster);
        }

        if !self.geometry.is_valid_cluster(entry.cluster) {
            warn!("Cluster {} links to invalid cluster {}", cluster, entry.cluster);
            return Err(FsError::InvalidCluster);
        }

        Ok(Some(entry.cluster))
    }

    /// Returns a cursor positioned at the first sector of `cluster`. No I/O.
    pub fn start_file(&self, cluster: u32) -> FileCursor {
        let mut cursor = FileCursor::idle();
        cursor.arm(cluster);
        cursor
    }

    /// Reads the sector at `cursor` into `buf` and advances the cursor.
    ///
    /// Returns `Ok(None)` once the chain is exhausted. Any error leaves the
    /// cursor idle, after which it only returns `Ok(None)` until re-armed.
    pub fn next_file_sector<'b>(
        &mut self,
        cursor: &mut FileCursor,
        buf: &'b mut SectorBuf,
    ) -> Result<Option<&'b SectorBuf>, FsError> {
        if cursor.is_idle() {
            return Ok(None);
        }

        if cursor.working_sector == self.geometry.sectors_per_cluster {
            match self.next_cluster(cursor.working_cluster) {
                Ok(Some(next)) => cursor.arm(next),
                Ok(None) => {
                    debug!("End of chain after cluster {}", cursor.working_cluster);
                    cursor.stop();
                    return Ok(None);
                }
                Err(err) => {
                    cursor.stop();
                    return Err(err);
                }
            }
        }

        let sector = match self.geometry.cluster_to_sector(cursor.working_cluster) {
            Some(first) if self.geometry.is_valid_cluster(cursor.working_cluster) => {
                first.checked_add(cursor.working_sector)
            }
            _ => None,
        };
        let Some(sector) = sector else {
            cursor.stop();
            return Err(FsError::InvalidCluster);
        };

        if let Err(err) = self.device.read_sector(sector, buf) {
            warn!("Data sector {} unreadable: {}", sector, err);
            cursor.stop();
            return Err(err);
        }

        cursor.working_sector += 1;
        Ok(Some(buf))
    }

    /// Finds `name` in the root directory and arms `cursor` on its first cluster.
    ///
    /// Names are compared byte for byte, so `"foo     txt"` does not find
    /// `"FOO     TXT"`. On failure `cursor` is left idle.
    pub fn open(&mut self, name: &ShortName, cursor: &mut FileCursor) -> Result<FileInfo, FsError> {
        let mut buf = [0u8; SECTOR_SIZE];
        cursor.stop();

        match self.geometry.fat_type {
            FatType::Fat16 => {
                let mut sector = self.geometry.root_dir_start;
                let mut remaining = self.geometry.max_root_entries;
                while remaining > 0 {
                    self.device.read_sector(sector, &mut buf)?;
                    match scan_dir_sector(&buf, name) {
                        DirScan::Found(entry) => return Ok(self.open_entry(&entry, cursor)),
                        DirScan::End => break,
                        DirScan::More => {}
                    }
                    remaining = remaining.saturating_sub(DIR_ENTRIES_PER_SECTOR as u32);
                    sector += 1;
                }
            }
            FatType::Fat32 => {
                // The FAT32 root directory is itself a cluster chain
                cursor.arm(self.geometry.root_dir_start);
                while let Some(sector) = self.next_file_sector(cursor, &mut buf)? {
                    match scan_dir_sector(sector, name) {
                        DirScan::Found(entry) => return Ok(self.open_entry(&entry, cursor)),
                        DirScan::End => break,
                        DirScan::More => {}
                    }
                }
                cursor.stop();
            }
        }

        Err(FsError::NotFound)
    }

    fn open_entry(&self, entry: &DirEntry83, cursor: &mut FileCursor) -> FileInfo {
        let info = FileInfo {
            size: entry.file_size,
            start_cluster: entry.start_cluster(self.geometry.fat_type),
            attributes: entry.attributes,
        };

        if info.start_cluster == 0 {
            cursor.stop();
        } else {
            cursor.arm(info.start_cluster);
        }

        debug!(
            "Opened {:?}: {} bytes from cluster {}",
            core::str::from_utf8(&entry.name).unwrap_or("?"),
            info.size,
            info.start_cluster
        );
        info
    }
}
