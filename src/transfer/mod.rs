/// Dump and restore orchestration

/// Dump state machine
pub mod dump;
/// Restore state machine
pub mod restore;

pub use dump::{dump, DumpReport};
pub use restore::{restore, RestoreReport};

use crate::error::{FdmError, Result};
use crate::fdc::{Fdc, InterruptResult, Transport};
use crate::format::constants::MAX_TRACKS;
use crate::format::spec::{MediaSpec, SideSelect};
use crate::format::MediaType;

/// Attempts `recalibrate_drive` makes before giving up on a drive that
/// keeps reporting equipment-check
const RECALIBRATE_ATTEMPTS: usize = 4;

/// Resolved parameters of one dump or restore run.
///
/// Derived from a `MediaSpec` preset and whatever overrides the caller
/// applies; handed to the orchestrator as plain values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferParams {
    /// Drive unit number (0 or 1)
    pub unit: u8,
    /// Media type recorded in a dumped container's header
    pub media_type: MediaType,
    /// Write protect flag recorded in a dumped container's header
    pub write_protect: bool,
    /// First cylinder of the sweep
    pub start_cylinder: u8,
    /// Last cylinder of the sweep (inclusive)
    pub end_cylinder: u8,
    /// Physical seek step multiplier (e.g. 2 for 40-track media in an
    /// 80-track drive)
    pub step: u8,
    /// Sides visited per cylinder
    pub sides: SideSelect,
    /// Unformatted track duration in controller byte times
    pub track_duration: usize,
    /// Controller data-rate register value for the whole run
    pub data_rate: u8,
}

impl TransferParams {
    /// Resolve run parameters from a media preset
    pub fn from_spec(spec: &MediaSpec) -> Self {
        Self {
            unit: 0,
            media_type: spec.media_type,
            write_protect: false,
            start_cylinder: spec.start_cylinder,
            end_cylinder: spec.end_cylinder,
            step: 1,
            sides: spec.sides,
            track_duration: spec.track_duration(),
            data_rate: spec.data_rate,
        }
    }

    /// Check the sweep maps onto the offset table and the seek range
    pub fn validate(&self) -> Result<()> {
        if self.start_cylinder > self.end_cylinder {
            return Err(FdmError::parameters(format!(
                "Cylinder range {} - {} is reversed",
                self.start_cylinder, self.end_cylinder
            )));
        }
        if self.step == 0 {
            return Err(FdmError::parameters("Step multiplier must be at least 1"));
        }
        if self.end_cylinder as u32 * self.step as u32 > u8::MAX as u32 {
            return Err(FdmError::parameters(format!(
                "Cylinder {} with step {} exceeds the seek range",
                self.end_cylinder, self.step
            )));
        }
        let last_track = self.track_index(self.end_cylinder, self.last_head());
        if last_track >= MAX_TRACKS {
            return Err(FdmError::InvalidTrack {
                track: last_track,
                max: MAX_TRACKS - 1,
            });
        }
        Ok(())
    }

    /// Container track index of a cylinder/head pair under this sweep:
    /// `cylinder * 2 + head` when both sides are swept, `cylinder` otherwise
    pub fn track_index(&self, cylinder: u8, head: u8) -> usize {
        match self.sides {
            SideSelect::Both => cylinder as usize * 2 + head as usize,
            _ => cylinder as usize,
        }
    }

    /// Physical cylinder the drive seeks for a sweep cylinder
    pub fn seek_target(&self, cylinder: u8) -> u8 {
        (cylinder as u32 * self.step as u32) as u8
    }

    fn last_head(&self) -> u8 {
        *self.sides.heads().last().unwrap_or(&0)
    }
}

/// Sense the drive and report whether the inserted media is write-protected
pub fn sense_write_protect<T: Transport>(fdc: &mut Fdc<T>, unit: u8) -> Result<bool> {
    let result = fdc.sense_drive(unit)?;
    Ok(result.st3.write_protected())
}

/// Retract the head to track 0, retrying while the controller reports
/// equipment-check. Returns the final interrupt result for inspection.
pub fn recalibrate_drive<T: Transport>(fdc: &mut Fdc<T>, unit: u8) -> Result<InterruptResult> {
    let mut result = fdc.recalibrate(unit)?;
    let mut attempts = 1;
    while result.st0.equipment_check() && attempts < RECALIBRATE_ATTEMPTS {
        log::debug!("recalibrate attempt {} reported equipment check", attempts);
        result = fdc.recalibrate(unit)?;
        attempts += 1;
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_from_spec() {
        let params = TransferParams::from_spec(&MediaSpec::two_hd());
        assert_eq!(params.media_type, MediaType::TwoHD);
        assert_eq!(params.start_cylinder, 0);
        assert_eq!(params.end_cylinder, 81);
        assert_eq!(params.step, 1);
        assert_eq!(params.sides, SideSelect::Both);
        assert_eq!(params.track_duration, 10416);
        assert_eq!(params.data_rate, 0);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_track_index_both_sides() {
        let params = TransferParams::from_spec(&MediaSpec::two_hd());
        assert_eq!(params.track_index(0, 0), 0);
        assert_eq!(params.track_index(0, 1), 1);
        assert_eq!(params.track_index(40, 1), 81);
        assert_eq!(params.track_index(81, 1), 163);
    }

    #[test]
    fn test_track_index_single_side() {
        let params = TransferParams::from_spec(&MediaSpec::one_dd());
        assert_eq!(params.track_index(0, 0), 0);
        assert_eq!(params.track_index(41, 0), 41);
    }

    #[test]
    fn test_seek_target_applies_step() {
        let mut params = TransferParams::from_spec(&MediaSpec::two_d());
        params.step = 2;
        assert_eq!(params.seek_target(21), 42);
    }

    #[test]
    fn test_validate_rejects_reversed_range() {
        let mut params = TransferParams::from_spec(&MediaSpec::two_hd());
        params.start_cylinder = 10;
        params.end_cylinder = 5;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_step() {
        let mut params = TransferParams::from_spec(&MediaSpec::two_hd());
        params.step = 0;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_seek_overflow() {
        let mut params = TransferParams::from_spec(&MediaSpec::two_hd());
        params.step = 4;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_track_overflow() {
        let mut params = TransferParams::from_spec(&MediaSpec::one_dd());
        params.end_cylinder = 170;
        assert!(params.validate().is_err());
    }
}
