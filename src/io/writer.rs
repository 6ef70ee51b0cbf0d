/// D88 container writer
///
/// Streams sector records behind a placeholder header while tracking the
/// running file offset, then rewrites the header in place once the total
/// size and the complete offset table are known.

use crate::error::{FdmError, Result};
use crate::format::constants::{HEADER_SIZE, MAX_TRACKS, SECTOR_HEADER_SIZE};
use crate::format::MediaType;
use crate::image::header::ImageHeader;
use crate::image::sector::SectorRecord;
use std::io::{Seek, SeekFrom, Write};

/// Incremental container writer over any seekable stream
pub struct ImageWriter<W: Write + Seek> {
    inner: W,
    header: ImageHeader,
    offset: u32,
}

impl<W: Write + Seek> ImageWriter<W> {
    /// Start a container: writes the placeholder header immediately so
    /// record appends land past it
    pub fn create(mut inner: W, media_type: MediaType, write_protect: bool) -> Result<Self> {
        let header = ImageHeader::new(media_type, write_protect);
        inner.write_all(&header.to_bytes())?;
        Ok(Self {
            inner,
            header,
            offset: HEADER_SIZE as u32,
        })
    }

    /// Set the title recorded at finalization
    pub fn set_title(&mut self, title: &str) {
        self.header.set_title(title);
    }

    /// The header as it will be finalized
    pub fn header(&self) -> &ImageHeader {
        &self.header
    }

    /// The running file offset where the next record will land
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Commit the current offset as a track's first-record position.
    ///
    /// Call before appending the track's records; a track that gets no
    /// records must not be marked, leaving its table entry 0 (unformatted).
    pub fn mark_track(&mut self, track: usize) -> Result<()> {
        if track >= MAX_TRACKS {
            return Err(FdmError::InvalidTrack {
                track,
                max: MAX_TRACKS - 1,
            });
        }
        self.header.track_offsets[track] = self.offset;
        Ok(())
    }

    /// Append one sector record (fixed header immediately followed by its
    /// data payload) and advance the running offset
    pub fn write_record(&mut self, record: &SectorRecord) -> Result<()> {
        let mut header = [0u8; SECTOR_HEADER_SIZE];
        header[..4].copy_from_slice(&record.id.to_bytes());
        header[4..6].copy_from_slice(&record.sectors_in_track.to_le_bytes());
        header[6] = record.encoding.byte();
        header[7] = record.address_mark.byte();
        header[8] = record.status.0;
        header[9..14].copy_from_slice(&record.reserved);
        header[14..16].copy_from_slice(&record.data_len().to_le_bytes());

        self.inner.write_all(&header)?;
        self.inner.write_all(record.data())?;
        self.offset += (header.len() + record.data().len()) as u32;
        Ok(())
    }

    /// Rewrite the header in place with the final total size and offset
    /// table, and flush the stream
    pub fn finalize(&mut self) -> Result<()> {
        self.header.total_size = self.offset;
        self.inner.seek(SeekFrom::Start(0))?;
        self.inner.write_all(&self.header.to_bytes())?;
        self.inner.flush()?;
        Ok(())
    }

    /// Consume the writer and return the underlying stream
    pub fn into_inner(self) -> W {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::constants::SECTOR_HEADER_SIZE;
    use crate::image::sector::{Encoding, SectorId, SectorRecord, SectorStatus};
    use std::io::Cursor;

    fn record(record_number: u8) -> SectorRecord {
        SectorRecord::new(
            SectorId::new(0, 0, record_number, 1),
            2,
            Encoding::Mfm,
            vec![record_number; 256],
        )
    }

    #[test]
    fn test_create_writes_placeholder_header() {
        let writer =
            ImageWriter::create(Cursor::new(Vec::new()), MediaType::TwoHD, false).unwrap();
        assert_eq!(writer.offset(), HEADER_SIZE as u32);

        let buf = writer.into_inner().into_inner();
        assert_eq!(buf.len(), HEADER_SIZE);
        assert_eq!(buf[27], 0x20);
    }

    #[test]
    fn test_offset_advances_per_record() {
        let mut writer =
            ImageWriter::create(Cursor::new(Vec::new()), MediaType::TwoHD, false).unwrap();
        writer.mark_track(0).unwrap();
        writer.write_record(&record(1)).unwrap();
        assert_eq!(
            writer.offset(),
            (HEADER_SIZE + SECTOR_HEADER_SIZE + 256) as u32
        );
        writer.write_record(&record(2)).unwrap();
        assert_eq!(
            writer.offset(),
            (HEADER_SIZE + 2 * (SECTOR_HEADER_SIZE + 256)) as u32
        );
    }

    #[test]
    fn test_record_byte_layout() {
        let mut writer =
            ImageWriter::create(Cursor::new(Vec::new()), MediaType::TwoHD, false).unwrap();
        let mut rec = SectorRecord::with_status(
            SectorId::new(3, 1, 7, 1),
            9,
            Encoding::Fm,
            SectorStatus::new(SectorStatus::CONTROL_MARK),
            vec![0x42; 256],
        );
        rec.reserved = [0xA, 0xB, 0xC, 0xD, 0xE];
        writer.write_record(&rec).unwrap();

        let buf = writer.into_inner().into_inner();
        let hdr = &buf[HEADER_SIZE..HEADER_SIZE + SECTOR_HEADER_SIZE];
        assert_eq!(&hdr[..4], &[3, 1, 7, 1]);
        assert_eq!(&hdr[4..6], &[9, 0]);
        assert_eq!(hdr[6], 0x40); // FM
        assert_eq!(hdr[7], 0x10); // deleted mark derived from status
        assert_eq!(hdr[8], 0x10);
        assert_eq!(&hdr[9..14], &[0xA, 0xB, 0xC, 0xD, 0xE]);
        assert_eq!(&hdr[14..16], &[0x00, 0x01]); // 256 little-endian
        assert_eq!(&buf[HEADER_SIZE + SECTOR_HEADER_SIZE..], &[0x42; 256][..]);
    }

    #[test]
    fn test_finalize_rewrites_header() {
        let mut writer =
            ImageWriter::create(Cursor::new(Vec::new()), MediaType::TwoDD, true).unwrap();
        writer.mark_track(2).unwrap();
        writer.write_record(&record(1)).unwrap();
        writer.finalize().unwrap();

        let total = writer.offset();
        let buf = writer.into_inner().into_inner();
        let header = ImageHeader::from_bytes(&buf).unwrap();
        assert_eq!(header.total_size, total);
        assert_eq!(header.track_offsets[2], HEADER_SIZE as u32);
        assert_eq!(header.track_offsets[3], 0);
        assert!(header.write_protect);
    }

    #[test]
    fn test_mark_track_out_of_range() {
        let mut writer =
            ImageWriter::create(Cursor::new(Vec::new()), MediaType::TwoHD, false).unwrap();
        assert!(matches!(
            writer.mark_track(164),
            Err(FdmError::InvalidTrack { track: 164, .. })
        ));
    }
}
