/// D88 container reader

use crate::error::{FdmError, Result};
use crate::format::constants::{MAX_SECTORS_PER_TRACK, MAX_TRACKS, SECTOR_HEADER_SIZE};
use crate::image::header::ImageHeader;
use crate::image::sector::{AddressMark, Encoding, SectorId, SectorRecord, SectorStatus};
use crate::image::track::Track;
use crate::image::D88Image;
use std::io::{Read, Seek, SeekFrom};

/// Container reader over any seekable stream.
///
/// Parses the header up front; track record runs are read on demand by
/// seeking to their offset-table position.
pub struct ImageReader<R: Read + Seek> {
    inner: R,
    header: ImageHeader,
}

impl<R: Read + Seek> ImageReader<R> {
    /// Open a container and parse its header
    pub fn new(mut inner: R) -> Result<Self> {
        let mut buf = [0u8; crate::format::constants::HEADER_SIZE];
        inner.read_exact(&mut buf)?;
        let header = ImageHeader::from_bytes(&buf)?;
        Ok(Self { inner, header })
    }

    /// The parsed container header
    pub fn header(&self) -> &ImageHeader {
        &self.header
    }

    /// Read one track's record run.
    ///
    /// Returns `None` for an offset-table entry of 0 (unformatted track, no
    /// records present). Otherwise seeks to the stored offset and reads
    /// consecutive records until the first record's declared sector count
    /// has been consumed; at least one record is always read.
    pub fn read_track(&mut self, track: usize) -> Result<Option<Track>> {
        if track >= MAX_TRACKS {
            return Err(FdmError::InvalidTrack {
                track,
                max: MAX_TRACKS - 1,
            });
        }

        let offset = self.header.track_offsets[track];
        if offset == 0 {
            return Ok(None);
        }

        self.inner.seek(SeekFrom::Start(offset as u64))?;

        let first = self.read_record()?;
        let declared = first.sectors_in_track as usize;
        if declared > MAX_SECTORS_PER_TRACK {
            return Err(FdmError::invalid_image(format!(
                "Track {} declares {} sectors (max: {})",
                track, declared, MAX_SECTORS_PER_TRACK
            )));
        }

        let mut records = Vec::with_capacity(declared.max(1));
        records.push(first);
        while records.len() < declared {
            records.push(self.read_record()?);
        }

        Ok(Some(Track::from_records(records)))
    }

    /// Read every track and assemble the whole container in memory
    pub fn load(mut self) -> Result<D88Image> {
        let mut tracks = Vec::with_capacity(MAX_TRACKS);
        for track in 0..MAX_TRACKS {
            tracks.push(self.read_track(track)?);
        }
        Ok(D88Image::from_parts(self.header, tracks))
    }

    /// One fixed-size sector header immediately followed by its data payload
    fn read_record(&mut self) -> Result<SectorRecord> {
        let mut header = [0u8; SECTOR_HEADER_SIZE];
        self.inner.read_exact(&mut header)?;

        let id = SectorId::from_bytes([header[0], header[1], header[2], header[3]]);
        let sectors_in_track = u16::from_le_bytes([header[4], header[5]]);
        let encoding = Encoding::from(header[6]);
        let address_mark = AddressMark::from(header[7]);
        let status = SectorStatus::new(header[8]);
        let mut reserved = [0u8; 5];
        reserved.copy_from_slice(&header[9..14]);
        let data_length = u16::from_le_bytes([header[14], header[15]]);

        let mut data = vec![0u8; data_length as usize];
        self.inner.read_exact(&mut data)?;

        Ok(SectorRecord::from_parts(
            id,
            sectors_in_track,
            encoding,
            address_mark,
            status,
            reserved,
            data,
        ))
    }
}
