//! Export module for tessel
//!
//! Everything between a finished [`RunCanvas`](tessel_core::types::RunCanvas)
//! and a PNG file: the palette decision, chunk framing, zlib wrapping and
//! the two checksums PNG needs. Deflate itself comes from `flate2`.

pub mod checksum;
pub mod palette;
pub mod png;
pub mod zlib;

pub use checksum::{adler32, crc32, Adler32, Crc32};
pub use palette::{Palette, MAX_PALETTE_SIZE};
pub use png::{PngEncoder, PngExporter, PngParams, DEFAULT_GAMMA, PNG_SIGNATURE};
pub use zlib::{zlib_compress, ZlibStream};
