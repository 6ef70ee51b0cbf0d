/// Controller command builders and typed replies
///
/// One method per raw controller operation. Each method issues exactly one
/// blocking transport call and copies the raw reply into a typed result;
/// interpretation of status bits is left to the caller.

use crate::fdc::status::{FdcStatus0, FdcStatus1, FdcStatus2, FdcStatus3};
use crate::fdc::transport::{
    DataPhase, RawCommand, Reply, Transport, TransportError, FLAG_INTR, FLAG_READ, FLAG_WRITE,
};
use crate::image::sector::SectorId;

/// Read sector data
const CMD_READ_DATA: u8 = 0x06;
/// Read sector data with deleted address mark
const CMD_READ_DELETED_DATA: u8 = 0x0C;
/// Read the entire data field continuously (read diagnostic)
const CMD_READ_TRACK: u8 = 0x02;
/// Read the next sector identifier
const CMD_READ_ID: u8 = 0x0A;
/// Write sector data
const CMD_WRITE_DATA: u8 = 0x05;
/// Write sector data with deleted address mark
const CMD_WRITE_DELETED_DATA: u8 = 0x09;
/// Format an entire track
const CMD_FORMAT_TRACK: u8 = 0x0D;
/// Verify sector (no data transfer)
const CMD_VERIFY: u8 = 0x16;
/// Seek to a cylinder
const CMD_SEEK: u8 = 0x0F;
/// Retract the head to track 0
const CMD_RECALIBRATE: u8 = 0x07;
/// Sense drive status
const CMD_SENSE_DRIVE: u8 = 0x04;

/// No command option bits
pub const OPT_NONE: u8 = 0x00;
/// Multi-track option bit
pub const OPT_MT: u8 = 0x80;
/// MFM (double density) option bit; clear means FM
pub const OPT_MFM: u8 = 0x40;
/// Skip deleted data address mark option bit
pub const OPT_SK: u8 = 0x20;

/// Gap-skip length written into data transfer command frames
const GAP_SKIP: u8 = 8;
/// Final frame byte for data transfer commands
const DTL_FILLER: u8 = 0xFF;

/// Reply of a data, format, verify or read-identifier operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommandResult {
    /// Status register 0
    pub st0: FdcStatus0,
    /// Status register 1
    pub st1: FdcStatus1,
    /// Status register 2
    pub st2: FdcStatus2,
    /// Echoed cylinder address
    pub cylinder: u8,
    /// Echoed head address
    pub head: u8,
    /// Echoed record number
    pub record: u8,
    /// Echoed size code
    pub size_code: u8,
}

impl CommandResult {
    /// The echoed sector addressing as a `SectorId`
    pub fn echoed_id(&self) -> SectorId {
        SectorId::new(self.cylinder, self.head, self.record, self.size_code)
    }

    fn from_reply(reply: &Reply) -> Result<Self, TransportError> {
        if reply.len < 7 {
            return Err(TransportError::ShortReply {
                expected: 7,
                actual: reply.len,
            });
        }
        Ok(Self {
            st0: FdcStatus0::new(reply.bytes[0]),
            st1: FdcStatus1::new(reply.bytes[1]),
            st2: FdcStatus2::new(reply.bytes[2]),
            cylinder: reply.bytes[3],
            head: reply.bytes[4],
            record: reply.bytes[5],
            size_code: reply.bytes[6],
        })
    }
}

/// Reply of a seek or recalibrate operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InterruptResult {
    /// Status register 0
    pub st0: FdcStatus0,
    /// Present cylinder number after the head movement
    pub present_cylinder: u8,
}

impl InterruptResult {
    fn from_reply(reply: &Reply) -> Result<Self, TransportError> {
        if reply.len < 2 {
            return Err(TransportError::ShortReply {
                expected: 2,
                actual: reply.len,
            });
        }
        Ok(Self {
            st0: FdcStatus0::new(reply.bytes[0]),
            present_cylinder: reply.bytes[1],
        })
    }
}

/// Reply of a sense-drive operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriveSenseResult {
    /// Status register 3
    pub st3: FdcStatus3,
}

impl DriveSenseResult {
    fn from_reply(reply: &Reply) -> Result<Self, TransportError> {
        if reply.len < 1 {
            return Err(TransportError::ShortReply {
                expected: 1,
                actual: reply.len,
            });
        }
        Ok(Self {
            st3: FdcStatus3::new(reply.bytes[0]),
        })
    }
}

/// The controller command layer over a device transport.
///
/// Owns the session data-rate register value: set once per run, stamped onto
/// every data transfer command frame.
pub struct Fdc<T: Transport> {
    transport: T,
    data_rate: u8,
}

impl<T: Transport> Fdc<T> {
    /// Wrap a transport with data rate 0
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            data_rate: 0,
        }
    }

    /// Set the data-rate register value used by subsequent commands
    pub fn set_data_rate(&mut self, rate: u8) {
        self.data_rate = rate;
    }

    /// The currently configured data-rate register value
    pub fn data_rate(&self) -> u8 {
        self.data_rate
    }

    /// Consume the layer and return the transport
    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Sense drive status (write protect, ready, track zero)
    pub fn sense_drive(&mut self, unit: u8) -> Result<DriveSenseResult, TransportError> {
        let cmd = RawCommand::new(&[CMD_SENSE_DRIVE, unit], 0, 0, 0);
        let reply = self.transport.submit(&cmd, DataPhase::None)?;
        DriveSenseResult::from_reply(&reply)
    }

    /// Retract the head to track 0
    pub fn recalibrate(&mut self, unit: u8) -> Result<InterruptResult, TransportError> {
        let cmd = RawCommand::new(&[CMD_RECALIBRATE, unit], FLAG_INTR, 0, 0);
        let reply = self.transport.submit(&cmd, DataPhase::None)?;
        InterruptResult::from_reply(&reply)
    }

    /// Seek to a physical cylinder
    pub fn seek(&mut self, unit: u8, cylinder: u8) -> Result<InterruptResult, TransportError> {
        let cmd = RawCommand::new(&[CMD_SEEK, unit, cylinder], FLAG_INTR, 0, 0);
        let reply = self.transport.submit(&cmd, DataPhase::None)?;
        InterruptResult::from_reply(&reply)
    }

    /// Read the next sector identifier passing under the head
    pub fn read_id(
        &mut self,
        unit: u8,
        head: u8,
        options: u8,
    ) -> Result<CommandResult, TransportError> {
        let cmd = RawCommand::new(
            &[CMD_READ_ID | options, select(unit, head)],
            FLAG_INTR,
            self.data_rate,
            0,
        );
        let reply = self.transport.submit(&cmd, DataPhase::None)?;
        CommandResult::from_reply(&reply)
    }

    /// Read one sector's data into `data`.
    ///
    /// `data` must hold at least the byte length implied by `id.size_code`.
    pub fn read_data(
        &mut self,
        unit: u8,
        head: u8,
        options: u8,
        id: SectorId,
        deleted: bool,
        data: &mut [u8],
    ) -> Result<CommandResult, TransportError> {
        let opcode = if deleted {
            CMD_READ_DELETED_DATA
        } else {
            CMD_READ_DATA
        };
        let cmd = RawCommand::new(
            &transfer_frame(opcode | options, unit, head, id),
            FLAG_INTR | FLAG_READ,
            self.data_rate,
            id.size_bytes(),
        );
        let reply = self.transport.submit(&cmd, DataPhase::Read(data))?;
        CommandResult::from_reply(&reply)
    }

    /// Verify one sector without transferring data
    pub fn verify(
        &mut self,
        unit: u8,
        head: u8,
        options: u8,
        id: SectorId,
    ) -> Result<CommandResult, TransportError> {
        let cmd = RawCommand::new(
            &transfer_frame(CMD_VERIFY | options, unit, head, id),
            FLAG_INTR,
            self.data_rate,
            0,
        );
        let reply = self.transport.submit(&cmd, DataPhase::None)?;
        CommandResult::from_reply(&reply)
    }

    /// Write one sector's data.
    ///
    /// `data` must hold at least the byte length implied by `id.size_code`.
    pub fn write_data(
        &mut self,
        unit: u8,
        head: u8,
        options: u8,
        id: SectorId,
        deleted: bool,
        data: &[u8],
    ) -> Result<CommandResult, TransportError> {
        let opcode = if deleted {
            CMD_WRITE_DELETED_DATA
        } else {
            CMD_WRITE_DATA
        };
        let cmd = RawCommand::new(
            &transfer_frame(opcode | options, unit, head, id),
            FLAG_INTR | FLAG_WRITE,
            self.data_rate,
            id.size_bytes(),
        );
        let reply = self.transport.submit(&cmd, DataPhase::Write(data))?;
        CommandResult::from_reply(&reply)
    }

    /// Format an entire track.
    ///
    /// The data phase carries the C/H/R/N array of the sectors to lay down,
    /// four bytes per sector in physical order. `filler` is the byte the
    /// controller writes into every data field.
    pub fn format_track(
        &mut self,
        unit: u8,
        head: u8,
        options: u8,
        size_code: u8,
        sector_count: u8,
        gap_length: u8,
        filler: u8,
        ids: &[SectorId],
    ) -> Result<CommandResult, TransportError> {
        let cmd = RawCommand::new(
            &[
                CMD_FORMAT_TRACK | options,
                select(unit, head),
                size_code,
                sector_count,
                gap_length,
                filler,
            ],
            FLAG_INTR | FLAG_WRITE,
            self.data_rate,
            ids.len() * 4,
        );
        let mut buf = Vec::with_capacity(ids.len() * 4);
        for id in ids {
            buf.extend_from_slice(&id.to_bytes());
        }
        let reply = self.transport.submit(&cmd, DataPhase::Write(&buf))?;
        CommandResult::from_reply(&reply)
    }

    /// Read a track's data fields continuously starting at `id`.
    ///
    /// Unlike `read_data` the transfer length is taken from `size_code`
    /// rather than the target identifier. `data` must hold at least that
    /// many bytes.
    pub fn read_diagnostic(
        &mut self,
        unit: u8,
        head: u8,
        options: u8,
        id: SectorId,
        size_code: u8,
        data: &mut [u8],
    ) -> Result<CommandResult, TransportError> {
        let cmd = RawCommand::new(
            &transfer_frame(CMD_READ_TRACK | options, unit, head, id),
            FLAG_INTR | FLAG_READ,
            self.data_rate,
            crate::format::constants::size_code_to_bytes(size_code),
        );
        let reply = self.transport.submit(&cmd, DataPhase::Read(data))?;
        CommandResult::from_reply(&reply)
    }
}

/// Unit/head select byte shared by all addressed commands
#[inline]
fn select(unit: u8, head: u8) -> u8 {
    unit | (head << 2)
}

/// The nine-byte frame shared by read, write, verify and read-diagnostic
fn transfer_frame(opcode: u8, unit: u8, head: u8, id: SectorId) -> [u8; 9] {
    [
        opcode,
        select(unit, head),
        id.cylinder,
        id.head,
        id.record,
        id.size_code,
        1,
        GAP_SKIP,
        DTL_FILLER,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Transport that records each submitted frame and plays back canned replies
    struct Scripted {
        submitted: Vec<(RawCommand, Option<Vec<u8>>)>,
        replies: Vec<Reply>,
    }

    impl Scripted {
        fn new(replies: Vec<Reply>) -> Self {
            Self {
                submitted: Vec::new(),
                replies,
            }
        }
    }

    impl Transport for Scripted {
        fn submit(
            &mut self,
            command: &RawCommand,
            data: DataPhase<'_>,
        ) -> Result<Reply, TransportError> {
            let written = match data {
                DataPhase::Write(buf) => Some(buf.to_vec()),
                DataPhase::Read(buf) => {
                    buf.fill(0xAA);
                    None
                }
                DataPhase::None => None,
            };
            self.submitted.push((*command, written));
            Ok(self.replies.remove(0))
        }
    }

    fn cmd_reply() -> Reply {
        Reply::new(&[0x00, 0x00, 0x40, 1, 0, 3, 2])
    }

    #[test]
    fn test_seek_frame() {
        let mut fdc = Fdc::new(Scripted::new(vec![Reply::new(&[0x20, 40])]));
        let res = fdc.seek(0, 40).unwrap();
        assert_eq!(res.present_cylinder, 40);
        assert!(res.st0.seek_end());

        let (cmd, _) = &fdc.transport.submitted[0];
        assert_eq!(cmd.frame(), &[0x0F, 0x00, 40]);
        assert_eq!(cmd.flags, FLAG_INTR);
        assert_eq!(cmd.length, 0);
    }

    #[test]
    fn test_recalibrate_frame() {
        let mut fdc = Fdc::new(Scripted::new(vec![Reply::new(&[0x20, 0])]));
        fdc.recalibrate(1).unwrap();

        let (cmd, _) = &fdc.transport.submitted[0];
        assert_eq!(cmd.frame(), &[0x07, 0x01]);
        assert_eq!(cmd.flags, FLAG_INTR);
    }

    #[test]
    fn test_sense_drive_frame() {
        let mut fdc = Fdc::new(Scripted::new(vec![Reply::new(&[0x60])]));
        let res = fdc.sense_drive(0).unwrap();
        assert!(res.st3.write_protected());
        assert!(res.st3.ready());

        let (cmd, _) = &fdc.transport.submitted[0];
        assert_eq!(cmd.frame(), &[0x04, 0x00]);
        assert_eq!(cmd.flags, 0);
    }

    #[test]
    fn test_read_id_frame_carries_rate_and_head() {
        let mut fdc = Fdc::new(Scripted::new(vec![cmd_reply()]));
        fdc.set_data_rate(1);
        let res = fdc.read_id(0, 1, OPT_MFM).unwrap();
        assert_eq!(res.echoed_id(), SectorId::new(1, 0, 3, 2));
        assert!(res.st2.control_mark());

        let (cmd, _) = &fdc.transport.submitted[0];
        assert_eq!(cmd.frame(), &[0x0A | 0x40, 0x04]);
        assert_eq!(cmd.rate, 1);
    }

    #[test]
    fn test_read_data_frame() {
        let mut fdc = Fdc::new(Scripted::new(vec![cmd_reply()]));
        let id = SectorId::new(2, 0, 5, 1);
        let mut buf = vec![0u8; 256];
        fdc.read_data(0, 0, OPT_MFM, id, false, &mut buf).unwrap();
        assert!(buf.iter().all(|&b| b == 0xAA));

        let (cmd, _) = &fdc.transport.submitted[0];
        assert_eq!(cmd.frame(), &[0x46, 0x00, 2, 0, 5, 1, 1, 8, 0xFF]);
        assert_eq!(cmd.flags, FLAG_INTR | FLAG_READ);
        assert_eq!(cmd.length, 256);
    }

    #[test]
    fn test_read_deleted_data_opcode() {
        let mut fdc = Fdc::new(Scripted::new(vec![cmd_reply()]));
        let id = SectorId::new(0, 0, 1, 1);
        let mut buf = vec![0u8; 256];
        fdc.read_data(0, 0, OPT_NONE, id, true, &mut buf).unwrap();

        let (cmd, _) = &fdc.transport.submitted[0];
        assert_eq!(cmd.opcode(), 0x0C);
    }

    #[test]
    fn test_write_data_frame() {
        let mut fdc = Fdc::new(Scripted::new(vec![cmd_reply()]));
        let id = SectorId::new(0, 1, 2, 1);
        let data = vec![0x55u8; 256];
        fdc.write_data(0, 1, OPT_MFM, id, true, &data).unwrap();

        let (cmd, written) = &fdc.transport.submitted[0];
        assert_eq!(cmd.frame(), &[0x49, 0x04, 0, 1, 2, 1, 1, 8, 0xFF]);
        assert_eq!(cmd.flags, FLAG_INTR | FLAG_WRITE);
        assert_eq!(written.as_deref(), Some(&data[..]));
    }

    #[test]
    fn test_verify_has_no_data_phase() {
        let mut fdc = Fdc::new(Scripted::new(vec![cmd_reply()]));
        let id = SectorId::new(0, 0, 1, 2);
        fdc.verify(0, 0, OPT_MFM, id).unwrap();

        let (cmd, written) = &fdc.transport.submitted[0];
        assert_eq!(cmd.opcode(), 0x56);
        assert_eq!(cmd.flags, FLAG_INTR);
        assert_eq!(cmd.length, 0);
        assert!(written.is_none());
    }

    #[test]
    fn test_format_track_id_array() {
        let mut fdc = Fdc::new(Scripted::new(vec![cmd_reply()]));
        let ids = [SectorId::new(0, 0, 1, 1), SectorId::new(0, 0, 2, 1)];
        fdc.format_track(0, 0, OPT_MFM, 1, 2, 0x1B, 0x00, &ids)
            .unwrap();

        let (cmd, written) = &fdc.transport.submitted[0];
        assert_eq!(cmd.frame(), &[0x4D, 0x00, 1, 2, 0x1B, 0x00]);
        assert_eq!(cmd.length, 8);
        assert_eq!(
            written.as_deref(),
            Some(&[0, 0, 1, 1, 0, 0, 2, 1][..])
        );
    }

    #[test]
    fn test_read_diagnostic_length_from_size_code() {
        let mut fdc = Fdc::new(Scripted::new(vec![cmd_reply()]));
        let id = SectorId::new(0, 0, 1, 1);
        let mut buf = vec![0u8; 16384];
        fdc.read_diagnostic(0, 0, OPT_MFM, id, 7, &mut buf).unwrap();

        let (cmd, _) = &fdc.transport.submitted[0];
        assert_eq!(cmd.opcode(), 0x42);
        assert_eq!(cmd.length, 16384);
    }

    #[test]
    fn test_short_reply_is_an_error() {
        let mut fdc = Fdc::new(Scripted::new(vec![Reply::new(&[0x00, 0x00])]));
        let err = fdc.read_id(0, 0, OPT_NONE).unwrap_err();
        assert!(matches!(
            err,
            TransportError::ShortReply {
                expected: 7,
                actual: 2
            }
        ));
    }
}
