/// Sector map visualization

use crate::image::D88Image;

/// ANSI color codes for sector map
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BRIGHT_WHITE: &str = "\x1b[97m";
    pub const DARK_WHITE: &str = "\x1b[37m";
    pub const BRIGHT_RED: &str = "\x1b[91m";
    pub const DARK_RED: &str = "\x1b[2;31m";
    pub const BRIGHT_YELLOW: &str = "\x1b[93m";
    pub const DARK_YELLOW: &str = "\x1b[2;33m";
}

/// Draw a visual sector map of the container's recorded tracks
pub fn draw_sector_map(image: &D88Image) {
    // Columns cover container tracks up to the last recorded one
    let num_tracks = match image
        .tracks()
        .iter()
        .rposition(|t| t.as_ref().is_some_and(|t| !t.is_empty()))
    {
        Some(last) => last + 1,
        None => {
            println!("No recorded tracks in this image.");
            return;
        }
    };

    let max_sectors = image
        .tracks()
        .iter()
        .flatten()
        .map(|t| t.sector_count())
        .max()
        .unwrap_or(0);

    const BLOCK_NO_DATA: &str = "\u{2591}"; // ░ - Light shade (zero-filled)
    const BLOCK_HAS_DATA: &str = "\u{2593}"; // ▓ - Dark shade (carries data)

    println!("=== Sector Map ===");
    println!(
        "Legend: {}Data{} {}Zero-filled{} {}Fault{} {}Deleted{}",
        colors::BRIGHT_WHITE,
        colors::RESET,
        colors::DARK_WHITE,
        colors::RESET,
        colors::BRIGHT_RED,
        colors::RESET,
        colors::BRIGHT_YELLOW,
        colors::RESET
    );
    println!();

    // Draw each row (physical sector position), bottom to top
    for sector_pos in (0..max_sectors).rev() {
        print!("{:>2} ", sector_pos);

        for track_num in 0..num_tracks {
            match image.track(track_num).and_then(|t| t.records().get(sector_pos)) {
                Some(record) => {
                    let in_use = record.data().iter().any(|&b| b != 0);
                    let block = if in_use { BLOCK_HAS_DATA } else { BLOCK_NO_DATA };

                    let color = if record.status.is_fault() {
                        if in_use {
                            colors::BRIGHT_RED
                        } else {
                            colors::DARK_RED
                        }
                    } else if record.is_deleted() {
                        if in_use {
                            colors::BRIGHT_YELLOW
                        } else {
                            colors::DARK_YELLOW
                        }
                    } else if in_use {
                        colors::BRIGHT_WHITE
                    } else {
                        colors::DARK_WHITE
                    };

                    print!("{}{}{}", color, block, colors::RESET);
                }
                None => {
                    // No record at this position
                    print!(" ");
                }
            }
        }
        println!();
    }

    // Draw track number axis (horizontally)
    print!("   "); // Align with sector labels

    // Track which columns we've already printed (for multi-digit numbers)
    let mut printed_cols = vec![false; num_tracks];

    for track_num in 0..num_tracks {
        if track_num % 5 == 0 && !printed_cols[track_num] {
            let track_str = track_num.to_string();
            let digits: Vec<char> = track_str.chars().collect();

            for (i, digit) in digits.iter().enumerate() {
                let col = track_num + i;
                if col < num_tracks {
                    print!("{}", digit);
                    printed_cols[col] = true;
                }
            }
        } else if !printed_cols[track_num] {
            print!(" ");
        }
    }
    println!();
}
