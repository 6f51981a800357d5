//! FAT16/FAT32 on-disk layout constants.

/// Size of a disk sector in bytes. Nothing else is supported.
pub const SECTOR_SIZE: usize = 512;

/// Size of a short (8.3) directory entry in bytes
pub const DIR_ENTRY_SIZE: usize = 32;

/// Directory entries held by one sector
pub const DIR_ENTRIES_PER_SECTOR: usize = SECTOR_SIZE / DIR_ENTRY_SIZE;

/// Length of a raw 8.3 name: 8 base characters plus 3 extension characters
pub const SHORT_NAME_LENGTH: usize = 11;

/// Boot sector / MBR trailing signature, read little endian from bytes 510..512
pub const BOOT_SIGNATURE: u16 = 0xAA55;

/// Offset of the first MBR partition table entry
pub const PARTITION_TABLE_OFFSET: usize = 446;

/// Size of an MBR partition table entry
pub const PARTITION_ENTRY_SIZE: usize = 16;

/// FAT16 entries per FAT sector
pub const FAT16_ENTRIES_PER_SECTOR: u32 = (SECTOR_SIZE / 2) as u32;

/// FAT32 entries per FAT sector
pub const FAT32_ENTRIES_PER_SECTOR: u32 = (SECTOR_SIZE / 4) as u32;

/// FAT16 values at or above this mark the end of a chain
pub const FAT16_END_OF_CHAIN: u32 = 0xFFF8;

/// FAT32 values at or above this mark the end of a chain
pub const FAT32_END_OF_CHAIN: u32 = 0x0FFF_FFF8;

/// Only the low 28 bits of a FAT32 entry are meaningful
pub const FAT32_ENTRY_MASK: u32 = 0x0FFF_FFFF;

/// First cluster number that addresses the data area
pub const FIRST_DATA_CLUSTER: u32 = 2;

/// File attribute: Volume label
pub const ATTR_VOLUME_ID: u8 = 0x08;

/// File attribute: Directory
pub const ATTR_DIRECTORY: u8 = 0x10;

/// File attribute: Archive
pub const ATTR_ARCHIVE: u8 = 0x20;

/// Attribute combination used by long file name entries
pub const ATTR_LONG_NAME: u8 = 0x0F;

/// Marker for deleted directory entries
pub const DELETED_ENTRY_MARKER: u8 = 0xE5;

/// Marker for the first unused entry; nothing follows it
pub const END_OF_DIRECTORY_MARKER: u8 = 0x00;
