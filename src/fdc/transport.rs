/// Raw controller command transport seam

use thiserror::Error;

/// Maximum number of command bytes in one controller command frame
pub const MAX_COMMAND_BYTES: usize = 9;

/// Maximum number of reply bytes the controller returns
pub const MAX_REPLY_BYTES: usize = 7;

/// Wait for the completion interrupt before collecting the reply
pub const FLAG_INTR: u8 = 0x01;

/// The command has a device-to-host data phase
pub const FLAG_READ: u8 = 0x02;

/// The command has a host-to-device data phase
pub const FLAG_WRITE: u8 = 0x04;

/// One raw command frame handed to the transport.
///
/// `bytes[..len]` are the opcode and parameter bytes exactly as the
/// controller expects them. `length` is the size of the data phase in bytes
/// (zero when there is none), and `rate` is the data-rate register value the
/// transport must program before issuing the command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawCommand {
    /// Opcode and parameter bytes
    pub bytes: [u8; MAX_COMMAND_BYTES],
    /// Number of valid bytes in `bytes`
    pub len: usize,
    /// Execution flags (`FLAG_INTR`, `FLAG_READ`, `FLAG_WRITE`)
    pub flags: u8,
    /// Data-rate register value
    pub rate: u8,
    /// Data phase transfer length in bytes
    pub length: usize,
}

impl RawCommand {
    /// Build a command frame from its raw bytes
    pub fn new(bytes: &[u8], flags: u8, rate: u8, length: usize) -> Self {
        let mut buf = [0u8; MAX_COMMAND_BYTES];
        buf[..bytes.len()].copy_from_slice(bytes);
        Self {
            bytes: buf,
            len: bytes.len(),
            flags,
            rate,
            length,
        }
    }

    /// The opcode byte, including any option bits
    #[inline]
    pub fn opcode(&self) -> u8 {
        self.bytes[0]
    }

    /// The valid command bytes
    #[inline]
    pub fn frame(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

/// Data phase of a command: none, a read into the buffer, or a write from it
#[derive(Debug)]
pub enum DataPhase<'a> {
    /// No data phase
    None,
    /// Device-to-host transfer into the buffer
    Read(&'a mut [u8]),
    /// Host-to-device transfer from the buffer
    Write(&'a [u8]),
}

/// Raw reply bytes collected after command completion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reply {
    /// Reply bytes as returned by the controller
    pub bytes: [u8; MAX_REPLY_BYTES],
    /// Number of valid bytes in `bytes`
    pub len: usize,
}

impl Reply {
    /// Build a reply from raw bytes
    pub fn new(bytes: &[u8]) -> Self {
        let mut buf = [0u8; MAX_REPLY_BYTES];
        buf[..bytes.len()].copy_from_slice(bytes);
        Self {
            bytes: buf,
            len: bytes.len(),
        }
    }
}

/// Errors raised by the device transport
#[derive(Debug, Error)]
pub enum TransportError {
    /// The underlying device call failed
    #[error("device I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The device refused or could not execute the command
    #[error("device rejected command: {0}")]
    Rejected(String),

    /// The controller returned fewer reply bytes than the command defines
    #[error("short reply: expected {expected} bytes, got {actual}")]
    ShortReply {
        /// Reply bytes the command result requires
        expected: usize,
        /// Reply bytes actually returned
        actual: usize,
    },
}

/// A raw hardware-command channel to the floppy controller.
///
/// Implementations own the physical device handle. `submit` blocks until the
/// controller signals completion (honouring `FLAG_INTR`) or the underlying
/// channel fails, then returns the raw reply bytes. The command layer decodes
/// replies; a transport adds no interpretation of its own.
pub trait Transport {
    /// Issue one command frame and collect its reply
    fn submit(
        &mut self,
        command: &RawCommand,
        data: DataPhase<'_>,
    ) -> std::result::Result<Reply, TransportError>;
}
