/// D88 disk image console tool

use docopt::Docopt;
use serde::Deserialize;

use fdmanager::map::draw_sector_map;
use fdmanager::{D88Image, Result, Track};

const USAGE: &str = "
Usage:
  fdm -h
  fdm info <image>
  fdm tracks <image>
  fdm sectors <image> <track>
  fdm map <image>

Options:
  -h --help    Show this screen.

 info:
   Print the container header and summary counts.

 tracks:
   List every recorded track with its sector count, encoding and data size.

 sectors:
   List one track's sector records with their result status codes.

 map:
   Draw a visual per-track sector status map.
";

#[derive(Debug, Deserialize)]
struct Args {
    arg_image: String,
    arg_track: Option<usize>,
    cmd_info: bool,
    cmd_tracks: bool,
    cmd_sectors: bool,
    cmd_map: bool,
}

fn main() {
    let args: Args = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());

    if let Err(err) = run(&args) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let image = D88Image::open(&args.arg_image)?;

    if args.cmd_info {
        print_info(&args.arg_image, &image);
    } else if args.cmd_tracks {
        print_tracks(&image);
    } else if args.cmd_sectors {
        print_sectors(&image, args.arg_track.unwrap_or(0));
    } else if args.cmd_map {
        draw_sector_map(&image);
    }

    Ok(())
}

fn print_info(path: &str, image: &D88Image) {
    println!("=== {} ===", path);
    println!("Title        : {}", image.title());
    println!("Media type   : {}", image.media_type());
    println!(
        "Write protect: {}",
        if image.write_protect() { "on" } else { "off" }
    );
    println!("Total size   : {} bytes", image.header().total_size);
    println!("Tracks       : {} recorded", image.formatted_track_count());
    println!("Sectors      : {}", image.sector_count());
    println!("Faulty       : {}", image.fault_count());
}

fn print_tracks(image: &D88Image) {
    println!("Track  Sectors  Encoding  Data     Faults");
    for (index, track) in image.tracks().iter().enumerate() {
        if let Some(track) = track {
            println!(
                "{:>5}  {:>7}  {:<8}  {:>7}  {:>6}",
                index,
                track.sector_count(),
                track.encoding().to_string(),
                track.data_size(),
                track.fault_count()
            );
        }
    }
}

fn print_sectors(image: &D88Image, index: usize) {
    let track: &Track = match image.track(index) {
        Some(track) => track,
        None => {
            println!("Track {} is unformatted.", index);
            return;
        }
    };

    println!("Track {} ({} sectors)", index, track.sector_count());
    println!(" C  H  R  N   Count  Enc  DAM  Length  Status");
    for record in track.records() {
        println!(
            " {}  {:>5}  {:<3}  {:>3}  {:>6}  {}",
            record.id,
            record.sectors_in_track,
            record.encoding.to_string(),
            if record.is_deleted() { "DEL" } else { "-" },
            record.data_len(),
            record.status
        );
    }
}
