/// Container header and track offset table

use crate::error::{FdmError, Result};
use crate::format::constants::{
    HEADER_RESERVED_SIZE, HEADER_SIZE, MAX_TRACKS, TITLE_SIZE, WRITE_PROTECT_OFF, WRITE_PROTECT_ON,
};
use crate::format::MediaType;

/// The fixed-size container header: title, flags, total size and the
/// 164-entry track offset table.
///
/// An offset-table entry is the byte position of the track's first sector
/// record, or 0 for a track that was never recorded (unformatted).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHeader {
    /// Title field, raw bytes (conventionally NUL-padded)
    pub title: [u8; TITLE_SIZE],
    /// Reserved bytes, preserved verbatim
    pub reserved: [u8; HEADER_RESERVED_SIZE],
    /// Write protect flag
    pub write_protect: bool,
    /// Media type of the imaged disk
    pub media_type: MediaType,
    /// Total container length in bytes, finalized last
    pub total_size: u32,
    /// Byte offset of each track's first sector record; 0 = unformatted
    pub track_offsets: [u32; MAX_TRACKS],
}

impl ImageHeader {
    /// Create a header with an empty title and no recorded tracks
    pub fn new(media_type: MediaType, write_protect: bool) -> Self {
        Self {
            title: [0; TITLE_SIZE],
            reserved: [0; HEADER_RESERVED_SIZE],
            write_protect,
            media_type,
            total_size: 0,
            track_offsets: [0; MAX_TRACKS],
        }
    }

    /// The title as a string, trimmed of NUL padding
    pub fn title_str(&self) -> String {
        let end = self
            .title
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(TITLE_SIZE);
        String::from_utf8_lossy(&self.title[..end]).into_owned()
    }

    /// Set the title, truncating to the field size
    pub fn set_title(&mut self, title: &str) {
        self.title = [0; TITLE_SIZE];
        let bytes = title.as_bytes();
        let len = bytes.len().min(TITLE_SIZE);
        self.title[..len].copy_from_slice(&bytes[..len]);
    }

    /// Check if a track has recorded sector data
    pub fn is_track_formatted(&self, track: usize) -> bool {
        track < MAX_TRACKS && self.track_offsets[track] != 0
    }

    /// Number of tracks with recorded sector data
    pub fn formatted_track_count(&self) -> usize {
        self.track_offsets.iter().filter(|&&o| o != 0).count()
    }

    /// Serialize the header into its fixed byte layout (little-endian)
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[..TITLE_SIZE].copy_from_slice(&self.title);
        buf[TITLE_SIZE..TITLE_SIZE + HEADER_RESERVED_SIZE].copy_from_slice(&self.reserved);
        buf[26] = if self.write_protect {
            WRITE_PROTECT_ON
        } else {
            WRITE_PROTECT_OFF
        };
        buf[27] = self.media_type.byte();
        buf[28..32].copy_from_slice(&self.total_size.to_le_bytes());
        for (i, offset) in self.track_offsets.iter().enumerate() {
            let pos = 32 + i * 4;
            buf[pos..pos + 4].copy_from_slice(&offset.to_le_bytes());
        }
        buf
    }

    /// Parse a header from its fixed byte layout
    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        if buf.len() < HEADER_SIZE {
            return Err(FdmError::parse(0, "Header truncated"));
        }

        let mut title = [0u8; TITLE_SIZE];
        title.copy_from_slice(&buf[..TITLE_SIZE]);

        let mut reserved = [0u8; HEADER_RESERVED_SIZE];
        reserved.copy_from_slice(&buf[TITLE_SIZE..TITLE_SIZE + HEADER_RESERVED_SIZE]);

        let media_type = MediaType::from_byte(buf[27]).ok_or_else(|| {
            FdmError::invalid_image(format!("Unknown media type byte 0x{:02X}", buf[27]))
        })?;

        let total_size = u32::from_le_bytes([buf[28], buf[29], buf[30], buf[31]]);

        let mut track_offsets = [0u32; MAX_TRACKS];
        for (i, offset) in track_offsets.iter_mut().enumerate() {
            let pos = 32 + i * 4;
            *offset = u32::from_le_bytes([buf[pos], buf[pos + 1], buf[pos + 2], buf[pos + 3]]);
        }

        Ok(Self {
            title,
            reserved,
            write_protect: buf[26] != WRITE_PROTECT_OFF,
            media_type,
            total_size,
            track_offsets,
        })
    }
}
