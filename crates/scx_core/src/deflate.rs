//! Raw DEFLATE (no zlib or gzip envelope) for the scenario body.

use std::io::Write;

use flate2::write::DeflateEncoder;
use flate2::{Compression, Decompress, FlushDecompress, Status};
use tracing::warn;

use crate::error::{Result, ScxError};

const MIN_GROWTH: usize = 64 * 1024;

/// Inflate a complete raw DEFLATE stream.
///
/// The stream must reach its final block; input that ends early fails with
/// `Decompression` rather than yielding a partial body. Output grows on
/// demand, so the body size is not bounded by the compression ratio.
pub fn inflate(input: &[u8]) -> Result<Vec<u8>> {
    let mut inflater = Decompress::new(false);
    let mut out = Vec::with_capacity(input.len().saturating_mul(4).max(MIN_GROWTH));

    loop {
        if out.len() == out.capacity() {
            out.reserve(out.capacity().max(MIN_GROWTH));
        }
        let consumed = inflater.total_in() as usize;
        let produced = out.len();

        let status = inflater
            .decompress_vec(&input[consumed..], &mut out, FlushDecompress::None)
            .map_err(|e| ScxError::Decompression(e.to_string()))?;

        match status {
            Status::StreamEnd => break,
            Status::Ok | Status::BufError => {
                let progressed =
                    inflater.total_in() as usize != consumed || out.len() != produced;
                // No progress with room to spare: the input ran out mid-stream.
                if !progressed && out.len() < out.capacity() {
                    return Err(ScxError::Decompression(format!(
                        "stream ended without a final block after {} of {} bytes",
                        inflater.total_in(),
                        input.len()
                    )));
                }
            }
        }
    }

    let consumed = inflater.total_in() as usize;
    if consumed < input.len() {
        warn!(
            trailing = input.len() - consumed,
            "ignoring bytes after the end of the deflate stream"
        );
    }
    Ok(out)
}

pub fn deflate(body: &[u8], level: Compression) -> Result<Vec<u8>> {
    let mut encoder = DeflateEncoder::new(Vec::with_capacity(body.len() / 2), level);
    encoder.write_all(body)?;
    Ok(encoder.finish()?)
}
