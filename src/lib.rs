/*!
# fdmanager

A Rust library for archiving floppy disks into D88 disk image containers and
restoring them, by driving a floppy controller through its raw command set.

## Features

- The full raw controller command set (seek, recalibrate, sense, read-id,
  read/write data, verify, format, read-diagnostic) over a pluggable
  `Transport` seam
- Byte-exact D88 container reader and writer with per-sector fault status
- Track geometry calculations (unformatted capacity, format GAP3 length)
- Per-track encoding detection and sector sequence scanning
- Dump and restore orchestration tolerant of partial media faults
- Idiomatic Rust API with comprehensive error handling

## Quick Start

```rust,no_run
use fdmanager::{dump, D88Image, Fdc, MediaSpec, TransferParams};
# use fdmanager::{DataPhase, RawCommand, Reply, Transport, TransportError};
# struct MyTransport;
# impl Transport for MyTransport {
#     fn submit(&mut self, _c: &RawCommand, _d: DataPhase<'_>) -> Result<Reply, TransportError> {
#         unimplemented!()
#     }
# }

// Wrap a platform raw-command channel in the controller layer
let mut fdc = Fdc::new(MyTransport);

// Archive a 2HD disk into a container file
let params = TransferParams::from_spec(&MediaSpec::two_hd());
let file = std::fs::File::create("disk.d88")?;
let report = dump(&mut fdc, &params, file)?;
println!("{} sectors archived", report.sectors);

// Inspect an existing container
let image = D88Image::open("disk.d88")?;
println!("{}: {} tracks", image.media_type(), image.formatted_track_count());
# Ok::<(), fdmanager::FdmError>(())
```

## Container format

The D88 container stores a fixed 688-byte header (title, write-protect and
media-type flags, total size, and a 164-entry track offset table) followed by
per-track runs of sector records, each a 16-byte header plus its data
payload. An offset-table entry of 0 marks an unformatted track. All
multi-byte fields are little-endian.

## Modules

- `fdc`: controller command layer, status registers and the transport seam
- `format`: media presets, container constants and track geometry
- `image`: container data structures (D88Image, Track, SectorRecord)
- `io`: streaming container reader and writer
- `scan`: per-track encoding detection and sector sequence scanning
- `transfer`: dump and restore orchestration
- `map`: sector map visualization
- `error`: error types and Result alias
*/

#![warn(missing_docs)]

/// Error types and Result alias
pub mod error;
/// Controller command layer, status registers and the transport seam
pub mod fdc;
/// Media presets, container constants and track geometry
pub mod format;
/// Container data structures (D88Image, Track, SectorRecord)
pub mod image;
/// I/O operations for reading and writing D88 container files
pub mod io;
/// Sector map visualization
pub mod map;
/// Per-track encoding detection and sector sequence scanning
pub mod scan;
/// Dump and restore orchestration
pub mod transfer;

// Re-export common types
pub use error::{FdmError, Result};
pub use fdc::{
    CommandResult, DataPhase, DriveSenseResult, Fdc, FdcStatus0, FdcStatus1, FdcStatus2,
    FdcStatus3, InterruptResult, RawCommand, Reply, Transport, TransportError,
};
pub use format::{
    format_gap_length, unformatted_size_code, MediaSpec, MediaType, SideSelect,
};
pub use image::{
    AddressMark, D88Image, Encoding, ImageHeader, SectorId, SectorRecord, SectorStatus, Track,
};
pub use io::{ImageReader, ImageWriter};
pub use scan::{detect_encoding, scan_sector_sequence};
pub use transfer::{
    dump, recalibrate_drive, restore, sense_write_protect, DumpReport, RestoreReport,
    TransferParams,
};
