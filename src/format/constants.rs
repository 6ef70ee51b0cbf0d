/// D88 container layout constants

/// Size of the image header in bytes (title, flags, size, offset table)
pub const HEADER_SIZE: usize = 688;

/// Size of the title field in the image header
pub const TITLE_SIZE: usize = 17;

/// Size of the reserved field in the image header
pub const HEADER_RESERVED_SIZE: usize = 9;

/// Number of entries in the track offset table
pub const MAX_TRACKS: usize = 164;

/// Size of one sector record header in bytes
pub const SECTOR_HEADER_SIZE: usize = 16;

/// Size of the reserved field in a sector record header
pub const SECTOR_RESERVED_SIZE: usize = 5;

/// Maximum number of sectors a single track can carry
/// (2HD at 300rpm, 128 bytes/sector, no GAP3 and no GAP4b)
pub const MAX_SECTORS_PER_TRACK: usize = 66;

/// Write protect flag byte: protection off
pub const WRITE_PROTECT_OFF: u8 = 0x00;

/// Write protect flag byte: protection on
pub const WRITE_PROTECT_ON: u8 = 0x10;

/// Convert a sector size code to its byte length.
///
/// Size codes above 8 saturate at 32768 bytes.
#[inline]
pub fn size_code_to_bytes(size_code: u8) -> usize {
    128 << size_code.min(8)
}

/// Convert a byte length to its sector size code
#[inline]
pub fn bytes_to_size_code(bytes: usize) -> Option<u8> {
    match bytes {
        128 => Some(0),
        256 => Some(1),
        512 => Some(2),
        1024 => Some(3),
        2048 => Some(4),
        4096 => Some(5),
        8192 => Some(6),
        16384 => Some(7),
        32768 => Some(8),
        _ => None,
    }
}
