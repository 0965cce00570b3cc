//! zlib framing around a raw Deflate stream
//!
//! `flate2` does the compressing; this module adds the two header bytes in
//! front and the Adler-32 of the uncompressed input behind, which is all
//! zlib (RFC 1950) is.

// this_file: crates/tessel-export/src/zlib.rs

use std::io::{self, Write};

use flate2::{write::DeflateEncoder, Compression};

use crate::checksum::Adler32;

/// CM = 8 (Deflate), CINFO = 7 (32K window)
pub const ZLIB_CMF: u8 = 0x78;

/// FLEVEL value for "default algorithm"
const FLEVEL_DEFAULT: u8 = 2;

/// The two header bytes: CMF, then FLG with FCHECK filled in
///
/// FDICT is clear (no preset dictionary), and FCHECK makes
/// `(CMF * 256 + FLG) % 31 == 0`.
pub const fn zlib_header() -> [u8; 2] {
    let flg = FLEVEL_DEFAULT << 6;
    let remainder = ((ZLIB_CMF as u16) * 256 + flg as u16) % 31;
    let fcheck = if remainder == 0 { 0 } else { 31 - remainder as u8 };
    [ZLIB_CMF, flg | fcheck]
}

/// A writer that zlib-compresses everything written to it
///
/// The header goes out on construction; [`ZlibStream::finish`] flushes the
/// Deflate stream and appends the big-endian Adler-32 trailer.
pub struct ZlibStream<W: Write> {
    deflate: DeflateEncoder<W>,
    adler: Adler32,
}

impl<W: Write> ZlibStream<W> {
    /// Start a stream at Deflate `level` (0 = store, 9 = smallest)
    pub fn new(mut inner: W, level: u32) -> io::Result<Self> {
        inner.write_all(&zlib_header())?;
        Ok(Self {
            deflate: DeflateEncoder::new(inner, Compression::new(level)),
            adler: Adler32::new(),
        })
    }

    /// Close the stream and get the inner writer back
    pub fn finish(self) -> io::Result<W> {
        let checksum = self.adler.value();
        let mut inner = self.deflate.finish()?;
        inner.write_all(&checksum.to_be_bytes())?;
        Ok(inner)
    }
}

impl<W: Write> Write for ZlibStream<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.deflate.write(buf)?;
        self.adler.update(&buf[..written]);
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.deflate.flush()
    }
}

/// Compress a whole buffer into a zlib stream
pub fn zlib_compress(data: &[u8], level: u32) -> io::Result<Vec<u8>> {
    let mut stream = ZlibStream::new(Vec::new(), level)?;
    stream.write_all(data)?;
    stream.finish()
}
