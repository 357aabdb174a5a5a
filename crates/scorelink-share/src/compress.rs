//! Binary compressor adapter over zlib.
//!
//! Wire payloads are zlib streams (deflate with a zlib header), matching
//! every compressed token this system has ever emitted. Decompressing bytes
//! that are not such a stream is a decode failure, never a panic.

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::error::ShareError;

/// Compress a byte sequence into a zlib stream.
pub fn compress(bytes: &[u8]) -> Result<Vec<u8>, ShareError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes)?;
    Ok(encoder.finish()?)
}

/// Decompress a zlib stream produced by `compress`.
pub fn decompress(bytes: &[u8]) -> Result<Vec<u8>, ShareError> {
    let mut decoder = ZlibDecoder::new(bytes);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}
