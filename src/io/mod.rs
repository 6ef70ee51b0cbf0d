/// I/O operations for reading and writing D88 container files

/// Reader implementation for D88 containers
pub mod reader;
/// Writer implementation for D88 containers
pub mod writer;

pub use reader::ImageReader;
pub use writer::ImageWriter;
