/// Per-track encoding detection and sector sequence scanning

use crate::fdc::{Fdc, Transport, OPT_MFM, OPT_NONE};
use crate::format::constants::MAX_SECTORS_PER_TRACK;
use crate::image::sector::{Encoding, SectorId, SectorStatus};

/// Detect the recording encoding of the track under the head.
///
/// Probes with a read-identifier in FM first, then in MFM; whichever probe
/// completes with a clean status wins (so MFM overrides an earlier FM hit).
/// Returns `None` when both probes fail - the track is undetermined and
/// should be skipped. Transport failures count as failed probes.
pub fn detect_encoding<T: Transport>(fdc: &mut Fdc<T>, unit: u8, head: u8) -> Option<Encoding> {
    let mut detected = None;

    if let Ok(result) = fdc.read_id(unit, head, OPT_NONE) {
        if SectorStatus::decode(&result).is_ok() {
            detected = Some(Encoding::Fm);
        }
    }
    if let Ok(result) = fdc.read_id(unit, head, OPT_MFM) {
        if SectorStatus::decode(&result).is_ok() {
            detected = Some(Encoding::Mfm);
        }
    }

    if detected.is_none() {
        log::debug!("head {}: encoding undetermined", head);
    }
    detected
}

/// Enumerate the physical sector identifier sequence of one revolution.
///
/// A throwaway read-identifier with the opposite encoding repositions onto a
/// sector boundary; identifiers are then collected until the first entry's
/// record number repeats (one full revolution) or the sector bound is
/// reached. Any failed read or fault status makes the track unscannable and
/// yields an empty sequence.
pub fn scan_sector_sequence<T: Transport>(
    fdc: &mut Fdc<T>,
    unit: u8,
    head: u8,
    encoding: Encoding,
) -> Vec<SectorId> {
    let opposite = if encoding == Encoding::Mfm {
        OPT_NONE
    } else {
        OPT_MFM
    };
    let _ = fdc.read_id(unit, head, opposite);

    let mut sequence: Vec<SectorId> = Vec::new();
    while sequence.len() < MAX_SECTORS_PER_TRACK {
        let result = match fdc.read_id(unit, head, encoding.command_option()) {
            Ok(result) => result,
            Err(err) => {
                log::warn!("head {}: identifier read failed: {}", head, err);
                return Vec::new();
            }
        };
        if !SectorStatus::decode(&result).is_ok() {
            log::debug!(
                "head {}: identifier read status {}",
                head,
                SectorStatus::decode(&result)
            );
            return Vec::new();
        }

        let id = result.echoed_id();
        if let Some(first) = sequence.first() {
            if first.record == id.record {
                break;
            }
        }
        sequence.push(id);
    }
    sequence
}
