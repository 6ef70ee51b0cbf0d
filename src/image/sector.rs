/// Sector data structures and status decoding

use crate::fdc::command::CommandResult;
use crate::fdc::OPT_MFM;
use crate::format::constants::{size_code_to_bytes, SECTOR_RESERVED_SIZE};
use std::fmt;

/// Sector identifier (C,H,R,N) - addressing information for one physical sector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectorId {
    /// C - Cylinder number
    pub cylinder: u8,
    /// H - Head number
    pub head: u8,
    /// R - Record (sector) number
    pub record: u8,
    /// N - Size code (0=128, 1=256, 2=512, 3=1024, ...)
    pub size_code: u8,
}

impl SectorId {
    /// Create a new sector identifier
    pub fn new(cylinder: u8, head: u8, record: u8, size_code: u8) -> Self {
        Self {
            cylinder,
            head,
            record,
            size_code,
        }
    }

    /// Sector byte length implied by the size code
    pub fn size_bytes(&self) -> usize {
        size_code_to_bytes(self.size_code)
    }

    /// The identifier as the four command/container bytes C,H,R,N
    pub fn to_bytes(self) -> [u8; 4] {
        [self.cylinder, self.head, self.record, self.size_code]
    }

    /// Build an identifier from the four bytes C,H,R,N
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2], bytes[3])
    }
}

impl fmt::Display for SectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02X} {:02X} {:02X} {:02X}",
            self.cylinder, self.head, self.record, self.size_code
        )
    }
}

/// Low-level recording encoding of a track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// MFM (Modified Frequency Modulation) - double density
    Mfm,
    /// FM (Frequency Modulation) - single density
    Fm,
    /// Unrecognized encoding byte
    Unknown,
}

impl Encoding {
    /// The container encoding byte
    pub fn byte(&self) -> u8 {
        match self {
            Encoding::Mfm => 0x00,
            Encoding::Fm => 0x40,
            Encoding::Unknown => 0xFF,
        }
    }

    /// The controller command option bits selecting this encoding
    pub fn command_option(&self) -> u8 {
        match self {
            Encoding::Mfm => OPT_MFM,
            _ => 0,
        }
    }
}

impl From<u8> for Encoding {
    fn from(value: u8) -> Self {
        match value {
            0x00 => Encoding::Mfm,
            0x40 => Encoding::Fm,
            _ => Encoding::Unknown,
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Mfm => write!(f, "MFM"),
            Encoding::Fm => write!(f, "FM"),
            Encoding::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Data address mark variant of a sector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressMark {
    /// Normal data address mark
    Normal,
    /// Deleted data address mark
    Deleted,
}

impl AddressMark {
    /// The container address mark byte
    pub fn byte(&self) -> u8 {
        match self {
            AddressMark::Normal => 0x00,
            AddressMark::Deleted => 0x10,
        }
    }

    /// Check if this is the deleted mark
    pub fn is_deleted(&self) -> bool {
        matches!(self, AddressMark::Deleted)
    }
}

impl From<u8> for AddressMark {
    fn from(value: u8) -> Self {
        if value == 0x10 {
            AddressMark::Deleted
        } else {
            AddressMark::Normal
        }
    }
}

/// Container result status of one sector transfer.
///
/// The high nibble carries the status code; `decode` derives it from the
/// controller status registers. Codes this tool never produces (such as
/// timeout or DMA boundary) still round-trip through the container
/// unchanged so foreign images keep their fault records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectorStatus(pub u8);

impl SectorStatus {
    /// Transfer completed without fault
    pub const NORMAL: u8 = 0x00;
    /// Control mark - sector carries a deleted data address mark
    pub const CONTROL_MARK: u8 = 0x10;
    /// DMA boundary fault
    pub const DMA_BOUNDARY: u8 = 0x20;
    /// End of cylinder reached
    pub const END_OF_CYLINDER: u8 = 0x30;
    /// Equipment check
    pub const EQUIPMENT_CHECK: u8 = 0x40;
    /// Overrun
    pub const OVERRUN: u8 = 0x50;
    /// Drive not ready
    pub const NOT_READY: u8 = 0x60;
    /// Media not writable
    pub const NOT_WRITABLE: u8 = 0x70;
    /// Generic error
    pub const ERROR: u8 = 0x80;
    /// Timeout
    pub const TIMEOUT: u8 = 0x90;
    /// CRC error in the identifier field
    pub const DATA_ERROR_ID: u8 = 0xA0;
    /// CRC error in the data field
    pub const DATA_ERROR_DATA: u8 = 0xB0;
    /// Sector not found
    pub const NO_DATA: u8 = 0xC0;
    /// Bad cylinder mark
    pub const BAD_CYLINDER: u8 = 0xD0;
    /// Missing address mark in the identifier field
    pub const MISSING_MARK_ID: u8 = 0xE0;
    /// Missing address mark in the data field
    pub const MISSING_MARK_DATA: u8 = 0xF0;

    /// Create a status from its raw container byte
    #[inline]
    pub fn new(value: u8) -> Self {
        SectorStatus(value)
    }

    /// Derive the status code from a command reply.
    ///
    /// Every condition is evaluated and later conditions overwrite earlier
    /// ones; the order below is a fixed precedence table, not a first-match
    /// scan.
    pub fn decode(result: &CommandResult) -> Self {
        let mut code = Self::NORMAL;
        if result.st2.control_mark() {
            code = Self::CONTROL_MARK;
        }
        if result.st1.end_of_cylinder() {
            code = Self::END_OF_CYLINDER;
        }
        if result.st0.equipment_check() {
            code = Self::EQUIPMENT_CHECK;
        }
        if result.st1.overrun() {
            code = Self::OVERRUN;
        }
        if result.st0.not_ready() {
            code = Self::NOT_READY;
        }
        if result.st1.not_writable() {
            code = Self::NOT_WRITABLE;
        }
        if result.st1.data_error() {
            if result.st2.data_field_error() {
                code = Self::DATA_ERROR_DATA;
            } else {
                code = Self::DATA_ERROR_ID;
            }
        }
        if result.st1.no_data() {
            code = Self::NO_DATA;
        }
        if result.st1.missing_address_mark() {
            if result.st2.missing_data_mark() {
                code = Self::MISSING_MARK_DATA;
            } else {
                code = Self::MISSING_MARK_ID;
            }
        }
        SectorStatus(code)
    }

    /// Check if the status signals a clean transfer
    #[inline]
    pub fn is_ok(&self) -> bool {
        self.0 == Self::NORMAL
    }

    /// Check if the status records a genuine fault. A control mark alone is
    /// a property of the sector, not an error.
    #[inline]
    pub fn is_fault(&self) -> bool {
        !matches!(self.0, Self::NORMAL | Self::CONTROL_MARK)
    }

    /// Check if the status byte carries the control-mark bit.
    ///
    /// This is a bit test, not an equality test: the deleted address mark is
    /// derived from it even when a fault code shares the bit.
    #[inline]
    pub fn has_control_mark(&self) -> bool {
        (self.0 & Self::CONTROL_MARK) != 0
    }

    /// Human-readable name of the status code
    pub fn name(&self) -> &'static str {
        match self.0 {
            Self::NORMAL => "OK",
            Self::CONTROL_MARK => "Control Mark",
            Self::DMA_BOUNDARY => "DMA Boundary",
            Self::END_OF_CYLINDER => "End of Cylinder",
            Self::EQUIPMENT_CHECK => "Equipment Check",
            Self::OVERRUN => "Overrun",
            Self::NOT_READY => "Not Ready",
            Self::NOT_WRITABLE => "Not Writable",
            Self::ERROR => "Error",
            Self::TIMEOUT => "Timeout",
            Self::DATA_ERROR_ID => "Data Error (ID)",
            Self::DATA_ERROR_DATA => "Data Error (Data)",
            Self::NO_DATA => "No Data",
            Self::BAD_CYLINDER => "Bad Cylinder",
            Self::MISSING_MARK_ID => "Missing Address Mark (ID)",
            Self::MISSING_MARK_DATA => "Missing Address Mark (Data)",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for SectorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One sector's container record: addressing, track context, fault status
/// and the data payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectorRecord {
    /// Sector addressing (C,H,R,N)
    pub id: SectorId,
    /// Number of sectors in this record's track (duplicated on every record)
    pub sectors_in_track: u16,
    /// Recording encoding of the track
    pub encoding: Encoding,
    /// Data address mark variant
    pub address_mark: AddressMark,
    /// Result status of the transfer that produced this record
    pub status: SectorStatus,
    /// Reserved header bytes, preserved verbatim
    pub reserved: [u8; SECTOR_RESERVED_SIZE],
    data: Vec<u8>,
}

impl SectorRecord {
    /// Create a record with a clean status and normal address mark
    pub fn new(id: SectorId, sectors_in_track: u16, encoding: Encoding, data: Vec<u8>) -> Self {
        Self {
            id,
            sectors_in_track,
            encoding,
            address_mark: AddressMark::Normal,
            status: SectorStatus::default(),
            reserved: [0; SECTOR_RESERVED_SIZE],
            data,
        }
    }

    /// Create a record carrying a transfer status; the address mark is
    /// derived from the status byte's control-mark bit
    pub fn with_status(
        id: SectorId,
        sectors_in_track: u16,
        encoding: Encoding,
        status: SectorStatus,
        data: Vec<u8>,
    ) -> Self {
        let address_mark = if status.has_control_mark() {
            AddressMark::Deleted
        } else {
            AddressMark::Normal
        };
        Self {
            id,
            sectors_in_track,
            encoding,
            address_mark,
            status,
            reserved: [0; SECTOR_RESERVED_SIZE],
            data,
        }
    }

    /// Build a record from every stored field, as read from a container
    pub fn from_parts(
        id: SectorId,
        sectors_in_track: u16,
        encoding: Encoding,
        address_mark: AddressMark,
        status: SectorStatus,
        reserved: [u8; SECTOR_RESERVED_SIZE],
        data: Vec<u8>,
    ) -> Self {
        Self {
            id,
            sectors_in_track,
            encoding,
            address_mark,
            status,
            reserved,
            data,
        }
    }

    /// Get a reference to the sector data
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get a mutable reference to the sector data
    pub fn data_mut(&mut self) -> &mut Vec<u8> {
        &mut self.data
    }

    /// Stored data length
    pub fn data_len(&self) -> u16 {
        self.data.len() as u16
    }

    /// Byte length implied by the identifier's size code
    pub fn advertised_size(&self) -> usize {
        self.id.size_bytes()
    }

    /// Check if the stored length matches the advertised size
    pub fn has_size_mismatch(&self) -> bool {
        self.data.len() != self.advertised_size()
    }

    /// Check if this record is marked as deleted data
    pub fn is_deleted(&self) -> bool {
        self.address_mark.is_deleted()
    }
}
