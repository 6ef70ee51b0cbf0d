/// Floppy disk controller command layer

/// Command builders and typed replies
pub mod command;
/// FDC status register definitions
pub mod status;
/// Raw command transport seam
pub mod transport;

pub use command::{
    CommandResult, DriveSenseResult, Fdc, InterruptResult, OPT_MFM, OPT_MT, OPT_NONE, OPT_SK,
};
pub use status::{FdcStatus0, FdcStatus1, FdcStatus2, FdcStatus3};
pub use transport::{DataPhase, RawCommand, Reply, Transport, TransportError};
