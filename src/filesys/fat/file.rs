//! Byte-level reads over a root directory file's cluster chain

use core::cmp::min;

use spin::Mutex;

use super::{FileCursor, FileInfo, ShortName, Volume};
use crate::constants::fat::SECTOR_SIZE;
use crate::filesys::{File, FileSystem, FsError, SectorBuf, SectorDevice, SeekFrom};

/// An open file on a shared FAT volume.
///
/// Each stream has its own cursor, so several may be open on one volume.
/// The volume lock is only held for the duration of a single `read`.
pub struct FileStream<'v, D: SectorDevice> {
    /// Volume the file lives on
    volume: &'v Mutex<Volume<D>>,

    /// Directory entry data
    info: FileInfo,

    /// Position of the next sector pulled from the chain
    cursor: FileCursor,

    /// File sector index the cursor will produce next
    next_sector: u64,

    /// File sector index currently held in `buf`
    loaded: Option<u64>,

    /// Current position in file
    position: u64,

    buf: SectorBuf,
}

impl<'v, D: SectorDevice> FileStream<'v, D> {
    /// Opens `name` from the root directory of `volume`
    pub fn open(volume: &'v Mutex<Volume<D>>, name: &ShortName) -> Result<Self, FsError> {
        let mut cursor = FileCursor::idle();
        let info = volume.lock().open(name, &mut cursor)?;

        if info.is_directory() {
            return Err(FsError::NotSupported);
        }

        Ok(FileStream {
            volume,
            info,
            cursor,
            next_sector: 0,
            loaded: None,
            position: 0,
            buf: [0; SECTOR_SIZE],
        })
    }

    pub fn info(&self) -> &FileInfo {
        &self.info
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    /// Returns to the start of the chain. No I/O.
    fn rewind(&mut self) {
        self.cursor.arm(self.info.start_cluster);
        self.next_sector = 0;
        self.loaded = None;
    }

    /// Makes `buf` hold file sector `index`, walking the chain as needed
    fn load_sector(&mut self, volume: &mut Volume<D>, index: u64) -> Result<(), FsError> {
        if self.loaded == Some(index) {
            return Ok(());
        }

        if self.next_sector > index {
            self.rewind();
        }

        while self.next_sector <= index {
            match volume.next_file_sector(&mut self.cursor, &mut self.buf) {
                Ok(Some(_)) => {
                    self.loaded = Some(self.next_sector);
                    self.next_sector += 1;
                }
                Ok(None) => {
                    // Chain is shorter than the size in the directory entry
                    self.rewind();
                    return Err(FsError::UnexpectedEof);
                }
                Err(err) => {
                    self.rewind();
                    return Err(err);
                }
            }
        }

        Ok(())
    }
}

impl<D: SectorDevice> File for FileStream<'_, D> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, FsError> {
        let size = self.size();
        if self.position >= size {
            return Ok(0);
        }

        let bytes_to_read = min(buf.len() as u64, size - self.position) as usize;
        let mut bytes_read = 0;

        let volume = self.volume;
        let mut volume = volume.lock();

        while bytes_read < bytes_to_read {
            let index = self.position / SECTOR_SIZE as u64;
            let sector_offset = (self.position % SECTOR_SIZE as u64) as usize;
            if let Err(err) = self.load_sector(&mut volume, index) {
                // Report what was copied; the next read retries this sector
                if bytes_read > 0 {
                    return Ok(bytes_read);
                }
                return Err(err);
            }

            let chunk_size = min(SECTOR_SIZE - sector_offset, bytes_to_read - bytes_read);
            buf[bytes_read..bytes_read + chunk_size]
                .copy_from_slice(&self.buf[sector_offset..sector_offset + chunk_size]);

            bytes_read += chunk_size;
            self.position += chunk_size as u64;
        }

        Ok(bytes_read)
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64, FsError> {
        self.position = pos.resolve(self.position, self.size())?;
        Ok(self.position)
    }

    fn size(&self) -> u64 {
        self.info.size as u64
    }
}

impl<'v, D: SectorDevice> FileSystem for &'v Mutex<Volume<D>> {
    type File = FileStream<'v, D>;

    fn open_file(&mut self, name: &str) -> Result<Self::File, FsError> {
        FileStream::open(self, &ShortName::parse(name)?)
    }
}
