/// Restore orchestration: write a container back onto physical media

use crate::error::{FdmError, Result};
use crate::fdc::{Fdc, Transport};
use crate::format::geometry::{format_gap_length, unformatted_size_code};
use crate::image::sector::{Encoding, SectorId};
use crate::io::reader::ImageReader;
use crate::transfer::TransferParams;
use std::io::{Read, Seek};

/// Filler byte the controller writes into freshly formatted data fields
const FORMAT_FILLER: u8 = 0x00;

/// Counters of one completed restore run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// Tracks formatted from recorded sector runs
    pub tracks: usize,
    /// Tracks formatted as unformatted placeholders (offset-table entry 0)
    pub unformatted: usize,
    /// Sectors written back
    pub sectors: usize,
}

/// Restore a container stream onto the selected cylinder/head range.
///
/// A track with an offset-table entry of 0 is laid down as a single
/// unformatted-capacity sector (MFM, gap 0) and gets no data writes.
/// Otherwise the track's records are read, the track is formatted with
/// their identifier sequence and computed GAP3, and every record's data is
/// written back with its address mark. Seek, format and write failures are
/// all fatal; there is no per-sector tolerance on this path.
pub fn restore<T, R>(fdc: &mut Fdc<T>, params: &TransferParams, input: R) -> Result<RestoreReport>
where
    T: Transport,
    R: Read + Seek,
{
    params.validate()?;
    fdc.set_data_rate(params.data_rate);

    let mut reader = ImageReader::new(input)?;
    log::info!(
        "restore started: title \"{}\" / media {} / protect {:02X} / cylinders {}-{}",
        reader.header().title_str(),
        reader.header().media_type,
        if reader.header().write_protect { 0x10 } else { 0x00 },
        params.start_cylinder,
        params.end_cylinder
    );

    let mut report = RestoreReport::default();

    for cylinder in params.start_cylinder..=params.end_cylinder {
        for &head in params.sides.heads() {
            let index = params.track_index(cylinder, head);
            let track = reader.read_track(index)?;

            let (encoding, size_code, sector_count, gap, ids) = match &track {
                None => {
                    let size_code = unformatted_size_code(params.track_duration, Encoding::Mfm);
                    let ids = vec![SectorId::new(0, 0, 0, size_code)];
                    (Encoding::Mfm, size_code, 1u16, 0i32, ids)
                }
                Some(track) => {
                    let first = track
                        .first()
                        .ok_or_else(|| FdmError::invalid_image("Empty track record run"))?;
                    let gap = format_gap_length(
                        params.track_duration,
                        first.id.size_code,
                        first.sectors_in_track as usize,
                        first.encoding,
                    );
                    let ids = track.records().iter().map(|r| r.id).collect();
                    (
                        first.encoding,
                        first.id.size_code,
                        first.sectors_in_track,
                        gap,
                        ids,
                    )
                }
            };

            log::info!(
                "track {}: seek cylinder {} (step {})",
                index,
                cylinder,
                params.step
            );
            fdc.seek(params.unit, params.seek_target(cylinder))?;

            log::info!(
                "track {}: format head {} / encoding {} / size {:02X} / sectors {} / gap3 {}",
                index,
                head,
                encoding,
                size_code,
                sector_count,
                gap
            );
            fdc.format_track(
                params.unit,
                head,
                encoding.command_option(),
                size_code,
                sector_count as u8,
                gap as u8,
                FORMAT_FILLER,
                &ids,
            )?;

            match track {
                Some(track) => {
                    for record in track.records() {
                        log::debug!(
                            " {} {:02X}",
                            record.id,
                            record.address_mark.byte()
                        );
                        fdc.write_data(
                            params.unit,
                            head,
                            record.encoding.command_option(),
                            record.id,
                            record.is_deleted(),
                            record.data(),
                        )?;
                        report.sectors += 1;
                    }
                    report.tracks += 1;
                }
                None => report.unformatted += 1,
            }
        }
    }

    log::info!(
        "restore ended: {} tracks, {} unformatted, {} sectors",
        report.tracks,
        report.unformatted,
        report.sectors
    );
    Ok(report)
}
