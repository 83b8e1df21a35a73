//! Decompression of stored blobs (build logs, cache files).

use std::io::Read;

use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;

use crate::{Error, Result};

/// Decompress `data` with the named method.
///
/// Supported methods: `none` (or empty), `bzip2`, `gzip`.
pub fn decompress(method: &str, data: &[u8]) -> Result<Vec<u8>> {
  let mut out = Vec::new();
  let read = match method {
    "" | "none" => return Ok(data.to_vec()),
    "bzip2" => BzDecoder::new(data).read_to_end(&mut out),
    "gzip" => GzDecoder::new(data).read_to_end(&mut out),
    other => return Err(Error::UnknownCompression(other.to_string())),
  };

  read.map_err(|e| Error::Decompression {
    method: method.to_string(),
    message: e.to_string(),
  })?;
  Ok(out)
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Write;

  fn bzip2_bytes(data: &[u8]) -> Vec<u8> {
    let mut encoder = bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
  }

  fn gzip_bytes(data: &[u8]) -> Vec<u8> {
    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
  }

  #[test]
  fn decompresses_bzip2() {
    let compressed = bzip2_bytes(b"build output\n");
    assert_eq!(decompress("bzip2", &compressed).unwrap(), b"build output\n");
  }

  #[test]
  fn decompresses_gzip() {
    let compressed = gzip_bytes(b"build output\n");
    assert_eq!(decompress("gzip", &compressed).unwrap(), b"build output\n");
  }

  #[test]
  fn none_passes_data_through() {
    assert_eq!(decompress("none", b"raw").unwrap(), b"raw");
    assert_eq!(decompress("", b"raw").unwrap(), b"raw");
  }

  #[test]
  fn malformed_input_is_an_error() {
    assert!(matches!(
      decompress("bzip2", b"definitely not bzip2"),
      Err(Error::Decompression { .. })
    ));
  }

  #[test]
  fn unknown_method_is_an_error() {
    assert!(matches!(decompress("zstd", b""), Err(Error::UnknownCompression(_))));
  }
}
