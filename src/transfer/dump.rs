/// Dump orchestration: archive physical media into a container

use crate::error::Result;
use crate::fdc::{CommandResult, Fdc, Transport};
use crate::image::sector::{SectorRecord, SectorStatus};
use crate::io::writer::ImageWriter;
use crate::scan::{detect_encoding, scan_sector_sequence};
use crate::transfer::TransferParams;
use std::io::{Seek, Write};

/// Counters of one completed dump run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DumpReport {
    /// Tracks with at least one recorded sector
    pub tracks: usize,
    /// Sector records written
    pub sectors: usize,
    /// Sectors that reported a fault or failed to read
    pub faults: usize,
    /// Final container size in bytes
    pub total_size: u32,
}

/// Dump the selected cylinder/head range into a container stream.
///
/// Per track: seek (fatal on failure), detect encoding, scan the sector
/// sequence, then read and append every sector in physical order. A track
/// whose encoding is undetermined or whose scan comes back empty keeps an
/// offset-table entry of 0 and advances nothing. Individual sector read
/// faults are tolerated: the record keeps its decoded status and the data is
/// replaced with zeroes. The header is rewritten in place at the end.
pub fn dump<T, W>(fdc: &mut Fdc<T>, params: &TransferParams, output: W) -> Result<DumpReport>
where
    T: Transport,
    W: Write + Seek,
{
    params.validate()?;
    fdc.set_data_rate(params.data_rate);

    log::info!(
        "dump started: cylinders {}-{}, step {}, side {}, media {}",
        params.start_cylinder,
        params.end_cylinder,
        params.step,
        params.sides.number(),
        params.media_type
    );

    let mut writer = ImageWriter::create(output, params.media_type, params.write_protect)?;
    let mut report = DumpReport::default();

    for cylinder in params.start_cylinder..=params.end_cylinder {
        for &head in params.sides.heads() {
            let track = params.track_index(cylinder, head);
            log::info!(
                "track {}: seek cylinder {} (step {}) / offset 0x{:08X}",
                track,
                cylinder,
                params.step,
                writer.offset()
            );

            fdc.seek(params.unit, params.seek_target(cylinder))?;

            let encoding = match detect_encoding(fdc, params.unit, head) {
                Some(encoding) => encoding,
                None => {
                    log::warn!("track {}: encoding undetermined, skipped", track);
                    continue;
                }
            };
            let sequence = scan_sector_sequence(fdc, params.unit, head, encoding);
            if sequence.is_empty() {
                log::warn!("track {}: no readable sector sequence, skipped", track);
                continue;
            }

            writer.mark_track(track)?;
            log::info!(
                "track {}: head {} / encoding {} / {} sectors",
                track,
                head,
                encoding,
                sequence.len()
            );

            for id in &sequence {
                let mut data = vec![0u8; id.size_bytes()];
                let mut transfer_failed = false;
                let result = match fdc.read_data(
                    params.unit,
                    head,
                    encoding.command_option(),
                    *id,
                    false,
                    &mut data,
                ) {
                    Ok(result) => result,
                    Err(err) => {
                        log::error!("track {}: sector {} read failed: {}", track, id, err);
                        data.fill(0);
                        transfer_failed = true;
                        CommandResult::default()
                    }
                };

                let status = SectorStatus::decode(&result);
                if transfer_failed || status.is_fault() {
                    report.faults += 1;
                }
                log::debug!(
                    " {} : {:02X} ({:02X} {:02X} {:02X}) : {:02X}",
                    id,
                    status.0,
                    result.st0.0,
                    result.st1.0,
                    result.st2.0,
                    data.first().copied().unwrap_or(0)
                );

                let record =
                    SectorRecord::with_status(*id, sequence.len() as u16, encoding, status, data);
                writer.write_record(&record)?;
                report.sectors += 1;
            }
            report.tracks += 1;
        }
    }

    writer.finalize()?;
    report.total_size = writer.offset();
    log::info!(
        "dump ended: {} tracks, {} sectors ({} faulty), {} bytes",
        report.tracks,
        report.sectors,
        report.faults,
        report.total_size
    );
    Ok(report)
}
