/// Media format presets and drive parameter resolution

use crate::format::MediaType;

/// Which physical sides of the media a run sweeps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideSelect {
    /// Head 0 only (single-sided media)
    First,
    /// Head 1 only
    Second,
    /// Head 0 then head 1 on every cylinder
    Both,
}

impl SideSelect {
    /// Heads visited per cylinder, in sweep order
    pub fn heads(&self) -> &'static [u8] {
        match self {
            SideSelect::First => &[0],
            SideSelect::Second => &[1],
            SideSelect::Both => &[0, 1],
        }
    }

    /// Number of heads visited per cylinder
    pub fn heads_per_cylinder(&self) -> usize {
        self.heads().len()
    }

    /// Map the conventional side number (0, 1 or 2 for both)
    pub fn from_number(side: u8) -> Option<Self> {
        match side {
            0 => Some(SideSelect::First),
            1 => Some(SideSelect::Second),
            2 => Some(SideSelect::Both),
            _ => None,
        }
    }

    /// The conventional side number (0, 1 or 2 for both)
    pub fn number(&self) -> u8 {
        match self {
            SideSelect::First => 0,
            SideSelect::Second => 1,
            SideSelect::Both => 2,
        }
    }
}

/// Drive and sweep parameters for one media format.
///
/// Each preset fixes the default cylinder range, side selection, rotation
/// speed, transfer rate and controller data-rate register value for that
/// media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSpec {
    /// Container media type byte this format produces
    pub media_type: MediaType,
    /// First cylinder of the sweep
    pub start_cylinder: u8,
    /// Last cylinder of the sweep (inclusive)
    pub end_cylinder: u8,
    /// Sides visited per cylinder
    pub sides: SideSelect,
    /// Rotation speed in revolutions per minute
    pub rpm: u32,
    /// Transfer rate in kilobits per second
    pub kbps: u32,
    /// Controller data-rate register value
    pub data_rate: u8,
}

impl MediaSpec {
    /// 2D: double-sided single-density, 42 cylinders
    pub fn two_d() -> Self {
        Self {
            media_type: MediaType::TwoD,
            start_cylinder: 0,
            end_cylinder: 41,
            sides: SideSelect::Both,
            rpm: 360,
            kbps: 300,
            data_rate: 1,
        }
    }

    /// 2DD: double-sided double-density, 82 cylinders
    pub fn two_dd() -> Self {
        Self {
            media_type: MediaType::TwoDD,
            start_cylinder: 0,
            end_cylinder: 81,
            sides: SideSelect::Both,
            rpm: 360,
            kbps: 300,
            data_rate: 1,
        }
    }

    /// 2HD: double-sided high-density, 82 cylinders
    pub fn two_hd() -> Self {
        Self {
            media_type: MediaType::TwoHD,
            start_cylinder: 0,
            end_cylinder: 81,
            sides: SideSelect::Both,
            rpm: 360,
            kbps: 500,
            data_rate: 0,
        }
    }

    /// 1D: single-sided single-density, 42 cylinders
    pub fn one_d() -> Self {
        Self {
            media_type: MediaType::OneD,
            start_cylinder: 0,
            end_cylinder: 41,
            sides: SideSelect::First,
            rpm: 360,
            kbps: 300,
            data_rate: 1,
        }
    }

    /// 1DD: single-sided double-density, 82 cylinders
    pub fn one_dd() -> Self {
        Self {
            media_type: MediaType::OneDD,
            start_cylinder: 0,
            end_cylinder: 81,
            sides: SideSelect::First,
            rpm: 360,
            kbps: 300,
            data_rate: 1,
        }
    }

    /// The preset for a media type
    pub fn for_media(media_type: MediaType) -> Self {
        match media_type {
            MediaType::TwoD => Self::two_d(),
            MediaType::TwoDD => Self::two_dd(),
            MediaType::TwoHD => Self::two_hd(),
            MediaType::OneD => Self::one_d(),
            MediaType::OneDD => Self::one_dd(),
        }
    }

    /// Unformatted track duration in controller byte times.
    ///
    /// One revolution at `rpm` carries `kbps` kilobits per second of cell
    /// clock, eight cells per byte; integer truncation is intentional.
    pub fn track_duration(&self) -> usize {
        (60 * self.kbps as usize * 1000) / (self.rpm as usize * 8)
    }

    /// Override the rotation speed and transfer rate
    pub fn with_drive_parameters(mut self, rpm: u32, kbps: u32) -> Self {
        self.rpm = rpm;
        self.kbps = kbps;
        self
    }

    /// Override the cylinder range
    pub fn with_cylinders(mut self, start: u8, end: u8) -> Self {
        self.start_cylinder = start;
        self.end_cylinder = end;
        self
    }

    /// Override the side selection
    pub fn with_sides(mut self, sides: SideSelect) -> Self {
        self.sides = sides;
        self
    }

    /// Override the data-rate register value
    pub fn with_data_rate(mut self, data_rate: u8) -> Self {
        self.data_rate = data_rate;
        self
    }
}
