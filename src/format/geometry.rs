/// Track timing and geometry calculations
///
/// Pure functions deriving unformatted track capacity and format GAP3
/// lengths from the drive parameters. These reproduce the controller timing
/// model exactly; the results drive physical formatting.

use crate::format::constants::size_code_to_bytes;
use crate::image::sector::Encoding;

/// Size code of a single sector spanning an unformatted track.
///
/// Picks the smallest size code whose sector length covers the whole track
/// duration. FM packs at half the bit density of MFM, so the duration is
/// halved first. An unknown encoding yields the largest size code.
pub fn unformatted_size_code(track_duration: usize, encoding: Encoding) -> u8 {
    let length = match encoding {
        Encoding::Mfm => track_duration,
        Encoding::Fm => track_duration / 2,
        Encoding::Unknown => return 8,
    };
    let mut code = 0u8;
    while code < 8 && size_code_to_bytes(code) < length {
        code += 1;
    }
    code
}

/// GAP3 length for formatting a track.
///
/// The track capacity minus the fixed per-track and per-sector overhead is
/// divided evenly across the sectors. Three per-track overhead candidates are
/// tried in order, shrinking GAP4a/GAP4b assumptions each time; the first
/// candidate reaching the minimum usable gap wins, and the last computed
/// value is kept even when it stays below the minimum (it may be negative,
/// mirroring the source arithmetic; callers truncate to a command byte).
pub fn format_gap_length(
    track_duration: usize,
    size_code: u8,
    sector_count: usize,
    encoding: Encoding,
) -> i32 {
    match encoding {
        Encoding::Mfm => gap_from_candidates(
            track_duration as i32,
            size_code,
            sector_count,
            62,
            &[274, 146, 66],
            22,
        ),
        Encoding::Fm => gap_from_candidates(
            (track_duration / 2) as i32,
            size_code,
            sector_count,
            33,
            &[137, 73, 33],
            11,
        ),
        Encoding::Unknown => 0,
    }
}

fn gap_from_candidates(
    track_length: i32,
    size_code: u8,
    sector_count: usize,
    sector_overhead: i32,
    track_overheads: &[i32],
    minimum: i32,
) -> i32 {
    let sectors = (sector_overhead + size_code_to_bytes(size_code) as i32) * sector_count as i32;
    let mut gap = 0;
    for overhead in track_overheads {
        gap = (track_length - (overhead + sectors)) / sector_count as i32;
        if gap >= minimum {
            break;
        }
    }
    gap
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_unformatted_size_code_2hd() {
        // 360rpm at 500kbps: (60 * 500 * 1000) / (360 * 8) = 10416
        assert_eq!(unformatted_size_code(10416, Encoding::Mfm), 7);
        // 128<<6 = 8192 < 10416, 128<<7 = 16384 >= 10416
        assert_eq!(unformatted_size_code(8192, Encoding::Mfm), 6);
        assert_eq!(unformatted_size_code(8193, Encoding::Mfm), 7);
    }

    #[test]
    fn test_unformatted_size_code_fm_halves_duration() {
        assert_eq!(
            unformatted_size_code(10416, Encoding::Fm),
            unformatted_size_code(5208, Encoding::Mfm)
        );
    }

    #[test]
    fn test_unformatted_size_code_unknown_encoding() {
        assert_eq!(unformatted_size_code(10416, Encoding::Unknown), 8);
    }

    #[test]
    fn test_unformatted_size_code_saturates_at_8() {
        assert_eq!(unformatted_size_code(1_000_000, Encoding::Mfm), 8);
    }

    #[test]
    fn test_gap_length_2hd_256_byte_sectors() {
        // First candidate already clears the minimum:
        // (10416 - (274 + (62 + 256) * 26)) / 26 = 72
        assert_eq!(format_gap_length(10416, 1, 26, Encoding::Mfm), 72);
    }

    #[test]
    fn test_gap_length_falls_back_to_smaller_overheads() {
        // 2DD duration: (60 * 300 * 1000) / (360 * 8) = 6250.
        // Sixteen 256-byte sectors: first candidate gives
        // (6250 - (274 + 318 * 16)) / 16 = 55 >= 22, accepted.
        assert_eq!(format_gap_length(6250, 1, 16, Encoding::Mfm), 55);
        // Crowd the track so the first candidate is too small:
        // 19 sectors: (6250 - (274 + 318*19))/19 = -3, (6250 - (146 + 318*19))/19 = 3,
        // (6250 - (66 + 318*19))/19 = 7; all below 22, last value kept.
        assert_eq!(format_gap_length(6250, 1, 19, Encoding::Mfm), 7);
    }

    #[test]
    fn test_gap_length_fm() {
        // FM halves the duration: (6250/2 - (137 + (33 + 128) * 16)) / 16 = 25
        assert_eq!(format_gap_length(6250, 0, 16, Encoding::Fm), 25);
    }

    #[test]
    fn test_gap_length_can_go_negative() {
        let gap = format_gap_length(6250, 3, 26, Encoding::Mfm);
        assert!(gap < 0);
    }

    #[test]
    fn test_gap_length_unknown_encoding() {
        assert_eq!(format_gap_length(10416, 1, 26, Encoding::Unknown), 0);
    }

    proptest! {
        #[test]
        fn prop_unformatted_size_code_monotonic(a in 0usize..40000, b in 0usize..40000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(
                unformatted_size_code(lo, Encoding::Mfm)
                    <= unformatted_size_code(hi, Encoding::Mfm)
            );
            prop_assert!(
                unformatted_size_code(lo, Encoding::Fm)
                    <= unformatted_size_code(hi, Encoding::Fm)
            );
        }

        #[test]
        fn prop_unformatted_size_code_covers_duration(duration in 0usize..32768) {
            let code = unformatted_size_code(duration, Encoding::Mfm);
            prop_assert!(crate::format::constants::size_code_to_bytes(code) >= duration);
        }
    }
}
