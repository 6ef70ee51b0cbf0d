/// Floppy Disk Controller (FDC) status register definitions
///
/// Based on the NEC uPD765 family driven through the raw command channel.

use std::fmt;

/// FDC Status Register 0 (ST0)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FdcStatus0(pub u8);

impl FdcStatus0 {
    /// Interrupt Code (IC) - Bits 7-6
    /// 00 = normal termination, 01 = abnormal, 10 = invalid command
    pub const IC: u8 = 0xC0;

    /// Seek End (SE) - Bit 5
    /// Set when a seek or recalibrate command completes
    pub const SE: u8 = 0x20;

    /// Equipment Check (EC) - Bit 4
    /// Set if the drive fault signal is active or track 0 was not found
    pub const EC: u8 = 0x10;

    /// Not Ready (NR) - Bit 3
    /// Set when the drive is not ready
    pub const NR: u8 = 0x08;

    /// Head Select (HS) - Bit 2
    pub const HS: u8 = 0x04;

    /// Unit Select 1 (US1) - Bit 1
    pub const US1: u8 = 0x02;

    /// Unit Select 0 (US0) - Bit 0
    pub const US0: u8 = 0x01;

    /// Create a new FdcStatus0 from a raw byte
    #[inline]
    pub fn new(value: u8) -> Self {
        FdcStatus0(value)
    }

    /// Interrupt code field (0-3)
    #[inline]
    pub fn interrupt_code(&self) -> u8 {
        (self.0 & Self::IC) >> 6
    }

    /// Check if the seek end bit is set
    #[inline]
    pub fn seek_end(&self) -> bool {
        (self.0 & Self::SE) != 0
    }

    /// Check if the equipment check bit is set
    #[inline]
    pub fn equipment_check(&self) -> bool {
        (self.0 & Self::EC) != 0
    }

    /// Check if the not ready bit is set
    #[inline]
    pub fn not_ready(&self) -> bool {
        (self.0 & Self::NR) != 0
    }
}

impl fmt::Display for FdcStatus0 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return write!(f, "OK");
        }
        let mut flags = Vec::new();
        if self.interrupt_code() != 0 {
            flags.push("IC");
        }
        if self.seek_end() {
            flags.push("SE");
        }
        if self.equipment_check() {
            flags.push("EC");
        }
        if self.not_ready() {
            flags.push("NR");
        }
        if flags.is_empty() {
            write!(f, "-")
        } else {
            write!(f, "{}", flags.join("|"))
        }
    }
}

/// FDC Status Register 1 (ST1)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FdcStatus1(pub u8);

impl FdcStatus1 {
    /// End of Cylinder (EN) - Bit 7
    /// Set when the FDC tries to access a sector beyond the final sector of a track
    pub const EN: u8 = 0x80;

    /// Data Error (DE) - Bit 5
    /// Set when a CRC error occurs in either the ID field or data field
    pub const DE: u8 = 0x20;

    /// Overrun (OR) - Bit 4
    /// Set if the FDC did not receive service within the required time
    pub const OR: u8 = 0x10;

    /// No Data (ND) - Bit 2
    /// Set if the FDC cannot find the specified sector
    pub const ND: u8 = 0x04;

    /// Not Writable (NW) - Bit 1
    /// Set during a write command if the disk is write-protected
    pub const NW: u8 = 0x02;

    /// Missing Address Mark (MA) - Bit 0
    /// Set if the FDC does not detect an ID address mark
    pub const MA: u8 = 0x01;

    /// Create a new FdcStatus1 from a raw byte
    #[inline]
    pub fn new(value: u8) -> Self {
        FdcStatus1(value)
    }

    /// Check if end of cylinder bit is set
    #[inline]
    pub fn end_of_cylinder(&self) -> bool {
        (self.0 & Self::EN) != 0
    }

    /// Check if data error bit is set
    #[inline]
    pub fn data_error(&self) -> bool {
        (self.0 & Self::DE) != 0
    }

    /// Check if overrun bit is set
    #[inline]
    pub fn overrun(&self) -> bool {
        (self.0 & Self::OR) != 0
    }

    /// Check if no data bit is set
    #[inline]
    pub fn no_data(&self) -> bool {
        (self.0 & Self::ND) != 0
    }

    /// Check if not writable bit is set
    #[inline]
    pub fn not_writable(&self) -> bool {
        (self.0 & Self::NW) != 0
    }

    /// Check if missing address mark bit is set
    #[inline]
    pub fn missing_address_mark(&self) -> bool {
        (self.0 & Self::MA) != 0
    }

    /// Check if any error flag is set
    #[inline]
    pub fn has_error(&self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for FdcStatus1 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            write!(f, "OK")?;
        } else {
            let mut flags = Vec::new();
            if self.end_of_cylinder() {
                flags.push("EN");
            }
            if self.data_error() {
                flags.push("DE");
            }
            if self.overrun() {
                flags.push("OR");
            }
            if self.no_data() {
                flags.push("ND");
            }
            if self.not_writable() {
                flags.push("NW");
            }
            if self.missing_address_mark() {
                flags.push("MA");
            }
            write!(f, "{}", flags.join("|"))?;
        }
        Ok(())
    }
}

/// FDC Status Register 2 (ST2)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FdcStatus2(pub u8);

impl FdcStatus2 {
    /// Control Mark (CM) - Bit 6
    /// Set if a sector with deleted data address mark is read
    pub const CM: u8 = 0x40;

    /// Data Error in Data Field (DD) - Bit 5
    /// Set when a CRC error occurs in the data field
    pub const DD: u8 = 0x20;

    /// Wrong Cylinder (WC) - Bit 4
    /// Set if the cylinder address in the ID field does not match
    pub const WC: u8 = 0x10;

    /// Scan Equal Hit (SH) - Bit 3
    pub const SH: u8 = 0x08;

    /// Scan Not Satisfied (SN) - Bit 2
    pub const SN: u8 = 0x04;

    /// Bad Cylinder (BC) - Bit 1
    /// Set if the cylinder address is 0xFF (bad track mark)
    pub const BC: u8 = 0x02;

    /// Missing Address Mark in Data Field (MD) - Bit 0
    /// Set if no data address mark is found
    pub const MD: u8 = 0x01;

    /// Create a new FdcStatus2 from a raw byte
    #[inline]
    pub fn new(value: u8) -> Self {
        FdcStatus2(value)
    }

    /// Check if control mark (deleted data) bit is set
    #[inline]
    pub fn control_mark(&self) -> bool {
        (self.0 & Self::CM) != 0
    }

    /// Check if data field error bit is set
    #[inline]
    pub fn data_field_error(&self) -> bool {
        (self.0 & Self::DD) != 0
    }

    /// Check if wrong cylinder bit is set
    #[inline]
    pub fn wrong_cylinder(&self) -> bool {
        (self.0 & Self::WC) != 0
    }

    /// Check if bad cylinder bit is set
    #[inline]
    pub fn bad_cylinder(&self) -> bool {
        (self.0 & Self::BC) != 0
    }

    /// Check if missing data mark bit is set
    #[inline]
    pub fn missing_data_mark(&self) -> bool {
        (self.0 & Self::MD) != 0
    }

    /// Check if any error flag is set (excluding deleted data mark)
    #[inline]
    pub fn has_error(&self) -> bool {
        (self.0 & !Self::CM) != 0
    }
}

impl fmt::Display for FdcStatus2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            write!(f, "OK")?;
        } else {
            let mut flags = Vec::new();
            if self.control_mark() {
                flags.push("CM");
            }
            if self.data_field_error() {
                flags.push("DD");
            }
            if self.wrong_cylinder() {
                flags.push("WC");
            }
            if self.bad_cylinder() {
                flags.push("BC");
            }
            if self.missing_data_mark() {
                flags.push("MD");
            }
            write!(f, "{}", flags.join("|"))?;
        }
        Ok(())
    }
}

/// FDC Status Register 3 (ST3) - drive state from the sense-drive command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FdcStatus3(pub u8);

impl FdcStatus3 {
    /// Fault (FT) - Bit 7
    pub const FT: u8 = 0x80;

    /// Write Protect (WP) - Bit 6
    pub const WP: u8 = 0x40;

    /// Ready (RY) - Bit 5
    pub const RY: u8 = 0x20;

    /// Track Zero (T0) - Bit 4
    pub const T0: u8 = 0x10;

    /// Two Side (TS) - Bit 3
    pub const TS: u8 = 0x08;

    /// Head Select (HS) - Bit 2
    pub const HS: u8 = 0x04;

    /// Create a new FdcStatus3 from a raw byte
    #[inline]
    pub fn new(value: u8) -> Self {
        FdcStatus3(value)
    }

    /// Check if the drive fault bit is set
    #[inline]
    pub fn fault(&self) -> bool {
        (self.0 & Self::FT) != 0
    }

    /// Check if the write protect bit is set
    #[inline]
    pub fn write_protected(&self) -> bool {
        (self.0 & Self::WP) != 0
    }

    /// Check if the drive ready bit is set
    #[inline]
    pub fn ready(&self) -> bool {
        (self.0 & Self::RY) != 0
    }

    /// Check if the head rests on track zero
    #[inline]
    pub fn track_zero(&self) -> bool {
        (self.0 & Self::T0) != 0
    }

    /// Check if the drive reports two-sided media
    #[inline]
    pub fn two_side(&self) -> bool {
        (self.0 & Self::TS) != 0
    }
}

impl fmt::Display for FdcStatus3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut flags = Vec::new();
        if self.fault() {
            flags.push("FT");
        }
        if self.write_protected() {
            flags.push("WP");
        }
        if self.ready() {
            flags.push("RY");
        }
        if self.track_zero() {
            flags.push("T0");
        }
        if self.two_side() {
            flags.push("TS");
        }
        if flags.is_empty() {
            write!(f, "-")
        } else {
            write!(f, "{}", flags.join("|"))
        }
    }
}
