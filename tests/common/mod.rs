/// Simulated floppy drive for exercising the transfer orchestration
///
/// Implements the raw transport seam over an in-memory disk: tracks keyed by
/// physical (cylinder, head), a rotation position advanced by identifier
/// reads, and injectable faults.

use std::collections::{HashMap, HashSet};

use fdmanager::{
    DataPhase, Encoding, RawCommand, Reply, SectorId, Transport, TransportError,
};

/// One simulated physical sector
#[derive(Debug, Clone)]
pub struct SimSector {
    pub id: SectorId,
    pub data: Vec<u8>,
    pub deleted: bool,
    pub data_error: bool,
}

impl SimSector {
    pub fn new(id: SectorId, fill: u8) -> Self {
        let size = id.size_bytes();
        Self {
            id,
            data: vec![fill; size],
            deleted: false,
            data_error: false,
        }
    }
}

/// One simulated formatted track
#[derive(Debug, Clone)]
pub struct SimTrack {
    pub encoding: Encoding,
    pub gap3: u8,
    pub sectors: Vec<SimSector>,
}

impl SimTrack {
    pub fn new(encoding: Encoding, sectors: Vec<SimSector>) -> Self {
        Self {
            encoding,
            gap3: 0,
            sectors,
        }
    }

    /// A track of `count` sectors with records 1..=count and patterned data
    pub fn uniform(encoding: Encoding, cylinder: u8, head: u8, count: u8, size_code: u8) -> Self {
        let sectors = (1..=count)
            .map(|record| {
                SimSector::new(
                    SectorId::new(cylinder, head, record, size_code),
                    record.wrapping_mul(3),
                )
            })
            .collect();
        Self::new(encoding, sectors)
    }
}

/// In-memory drive behind the transport seam
pub struct SimDrive {
    pub tracks: HashMap<(u8, u8), SimTrack>,
    pub cylinder: u8,
    pub write_protected: bool,
    rotation: usize,
    /// (cylinder, head, record) triples whose data read fails at the transport
    pub fail_reads: HashSet<(u8, u8, u8)>,
    /// Every data write fails at the transport
    pub fail_writes: bool,
    /// Every seek fails at the transport
    pub fail_seeks: bool,
    /// Seek targets observed, for assertions
    pub seeks: Vec<u8>,
}

impl SimDrive {
    pub fn new() -> Self {
        Self {
            tracks: HashMap::new(),
            cylinder: 0,
            write_protected: false,
            rotation: 0,
            fail_reads: HashSet::new(),
            fail_writes: false,
            fail_seeks: false,
            seeks: Vec::new(),
        }
    }

    pub fn add_track(&mut self, cylinder: u8, head: u8, track: SimTrack) {
        self.tracks.insert((cylinder, head), track);
    }

    pub fn track(&self, cylinder: u8, head: u8) -> Option<&SimTrack> {
        self.tracks.get(&(cylinder, head))
    }

    fn head_of(command: &RawCommand) -> u8 {
        (command.bytes[1] >> 2) & 1
    }

    fn wants_mfm(command: &RawCommand) -> bool {
        command.opcode() & 0x40 != 0
    }

    fn encoding_matches(&self, command: &RawCommand, head: u8) -> Option<&SimTrack> {
        let track = self.tracks.get(&(self.cylinder, head))?;
        let matches = match track.encoding {
            Encoding::Mfm => Self::wants_mfm(command),
            Encoding::Fm => !Self::wants_mfm(command),
            Encoding::Unknown => false,
        };
        if matches && !track.sectors.is_empty() {
            Some(track)
        } else {
            None
        }
    }

    fn error_reply() -> Reply {
        // Abnormal termination with no-data in ST1
        Reply::new(&[0x40, 0x04, 0x00, 0, 0, 0, 0])
    }
}

impl Default for SimDrive {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for SimDrive {
    fn submit(
        &mut self,
        command: &RawCommand,
        data: DataPhase<'_>,
    ) -> Result<Reply, TransportError> {
        let head = Self::head_of(command);
        match command.opcode() & 0x1F {
            // Sense drive
            0x04 => {
                let mut st3 = 0x20; // ready
                if self.write_protected {
                    st3 |= 0x40;
                }
                Ok(Reply::new(&[st3]))
            }
            // Recalibrate
            0x07 => {
                self.cylinder = 0;
                self.rotation = 0;
                Ok(Reply::new(&[0x20, 0]))
            }
            // Seek
            0x0F => {
                if self.fail_seeks {
                    return Err(TransportError::Rejected("seek failed".into()));
                }
                self.cylinder = command.bytes[2];
                self.rotation = 0;
                self.seeks.push(self.cylinder);
                Ok(Reply::new(&[0x20, self.cylinder]))
            }
            // Read identifier: returns successive sectors; a mismatched
            // probe loses the rotation position
            0x0A => match self.encoding_matches(command, head) {
                Some(track) => {
                    let sector = &track.sectors[self.rotation % track.sectors.len()];
                    let id = sector.id;
                    self.rotation += 1;
                    Ok(Reply::new(&[
                        0,
                        0,
                        0,
                        id.cylinder,
                        id.head,
                        id.record,
                        id.size_code,
                    ]))
                }
                None => {
                    self.rotation = 0;
                    Ok(Self::error_reply())
                }
            },
            // Read data (normal or deleted)
            0x06 | 0x0C => {
                let requested = SectorId::new(
                    command.bytes[2],
                    command.bytes[3],
                    command.bytes[4],
                    command.bytes[5],
                );
                if self.fail_reads.contains(&(self.cylinder, head, requested.record)) {
                    return Err(TransportError::Rejected("read failed".into()));
                }
                let track = match self.encoding_matches(command, head) {
                    Some(track) => track,
                    None => return Ok(Self::error_reply()),
                };
                match track.sectors.iter().find(|s| s.id == requested) {
                    Some(sector) => {
                        let (mut st0, mut st1, mut st2) = (0u8, 0u8, 0u8);
                        if sector.deleted {
                            st2 |= 0x40;
                        }
                        if sector.data_error {
                            st0 |= 0x40;
                            st1 |= 0x20;
                            st2 |= 0x20;
                        }
                        if let DataPhase::Read(buf) = data {
                            let len = buf.len().min(sector.data.len());
                            buf[..len].copy_from_slice(&sector.data[..len]);
                        }
                        Ok(Reply::new(&[
                            st0,
                            st1,
                            st2,
                            requested.cylinder,
                            requested.head,
                            requested.record,
                            requested.size_code,
                        ]))
                    }
                    None => Ok(Self::error_reply()),
                }
            }
            // Write data (normal or deleted)
            0x05 | 0x09 => {
                if self.fail_writes {
                    return Err(TransportError::Rejected("write failed".into()));
                }
                let deleted = command.opcode() & 0x1F == 0x09;
                let requested = SectorId::new(
                    command.bytes[2],
                    command.bytes[3],
                    command.bytes[4],
                    command.bytes[5],
                );
                let cylinder = self.cylinder;
                let track = match self.tracks.get_mut(&(cylinder, head)) {
                    Some(track) => track,
                    None => return Ok(Self::error_reply()),
                };
                match track.sectors.iter_mut().find(|s| s.id == requested) {
                    Some(sector) => {
                        if let DataPhase::Write(buf) = data {
                            let len = buf.len().min(sector.data.len());
                            sector.data[..len].copy_from_slice(&buf[..len]);
                        }
                        sector.deleted = deleted;
                        Ok(Reply::new(&[
                            0,
                            0,
                            0,
                            requested.cylinder,
                            requested.head,
                            requested.record,
                            requested.size_code,
                        ]))
                    }
                    None => Ok(Self::error_reply()),
                }
            }
            // Format track: replaces the track with fresh sectors
            0x0D => {
                let encoding = if Self::wants_mfm(command) {
                    Encoding::Mfm
                } else {
                    Encoding::Fm
                };
                let gap3 = command.bytes[4];
                let filler = command.bytes[5];
                let mut sectors = Vec::new();
                if let DataPhase::Write(buf) = data {
                    for chunk in buf.chunks_exact(4) {
                        let id = SectorId::from_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
                        sectors.push(SimSector::new(id, filler));
                    }
                }
                let first = sectors
                    .first()
                    .map(|s| s.id)
                    .unwrap_or(SectorId::new(0, 0, 0, 0));
                self.tracks.insert(
                    (self.cylinder, head),
                    SimTrack {
                        encoding,
                        gap3,
                        sectors,
                    },
                );
                self.rotation = 0;
                Ok(Reply::new(&[
                    0,
                    0,
                    0,
                    first.cylinder,
                    first.head,
                    first.record,
                    first.size_code,
                ]))
            }
            opcode => Err(TransportError::Rejected(format!(
                "unsupported opcode 0x{:02X}",
                opcode
            ))),
        }
    }
}
