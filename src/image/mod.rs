/// D88 image data structures

/// Container header and track offset table
pub mod header;
/// Sector definitions and status decoding
pub mod sector;
/// Track definition
pub mod track;

pub use header::ImageHeader;
pub use sector::{AddressMark, Encoding, SectorId, SectorRecord, SectorStatus};
pub use track::Track;

use crate::error::Result;
use crate::format::constants::MAX_TRACKS;
use crate::format::MediaType;
use std::fs::File;
use std::io::{Read, Seek, Write};
use std::path::Path;

/// An entire D88 container held in memory.
///
/// Each of the 164 track slots is either `None` (unformatted, offset-table
/// entry 0) or the track's sector records in physical order. Used for
/// inspection and for building images in tests; transfer runs stream through
/// the `io` reader and writer instead.
#[derive(Debug, Clone)]
pub struct D88Image {
    header: ImageHeader,
    tracks: Vec<Option<Track>>,
}

impl D88Image {
    /// Create an image with no recorded tracks
    pub fn new(media_type: MediaType, write_protect: bool) -> Self {
        Self {
            header: ImageHeader::new(media_type, write_protect),
            tracks: vec![None; MAX_TRACKS],
        }
    }

    /// Build an image from an already-parsed header and track list
    pub(crate) fn from_parts(header: ImageHeader, tracks: Vec<Option<Track>>) -> Self {
        Self { header, tracks }
    }

    /// Open and load a container file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        crate::io::reader::ImageReader::new(file)?.load()
    }

    /// Read a container from any seekable stream
    pub fn read_from<R: Read + Seek>(reader: R) -> Result<Self> {
        crate::io::reader::ImageReader::new(reader)?.load()
    }

    /// Write the container to any seekable stream, rebuilding the offset
    /// table and total size
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let mut out = crate::io::writer::ImageWriter::create(
            writer,
            self.header.media_type,
            self.header.write_protect,
        )?;
        out.set_title(&self.header.title_str());
        for (index, track) in self.tracks.iter().enumerate() {
            if let Some(track) = track {
                if !track.is_empty() {
                    out.mark_track(index)?;
                    for record in track.records() {
                        out.write_record(record)?;
                    }
                }
            }
        }
        out.finalize()?;
        Ok(())
    }

    /// Save the container to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.write_to(File::create(path)?)
    }

    /// The container header
    pub fn header(&self) -> &ImageHeader {
        &self.header
    }

    /// The image title
    pub fn title(&self) -> String {
        self.header.title_str()
    }

    /// The media type
    pub fn media_type(&self) -> MediaType {
        self.header.media_type
    }

    /// The write protect flag
    pub fn write_protect(&self) -> bool {
        self.header.write_protect
    }

    /// All track slots in container order
    pub fn tracks(&self) -> &[Option<Track>] {
        &self.tracks
    }

    /// A track's records, if the track was recorded
    pub fn track(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index).and_then(|t| t.as_ref())
    }

    /// Replace a track slot
    pub fn set_track(&mut self, index: usize, track: Track) {
        if index < MAX_TRACKS {
            self.tracks[index] = Some(track);
        }
    }

    /// Number of recorded tracks
    pub fn formatted_track_count(&self) -> usize {
        self.tracks.iter().filter(|t| t.is_some()).count()
    }

    /// Total number of sector records across all tracks
    pub fn sector_count(&self) -> usize {
        self.tracks
            .iter()
            .flatten()
            .map(|t| t.sector_count())
            .sum()
    }

    /// Number of sector records carrying a fault status
    pub fn fault_count(&self) -> usize {
        self.tracks.iter().flatten().map(|t| t.fault_count()).sum()
    }
}
