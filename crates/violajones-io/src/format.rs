//! Image format detection
//!
//! Formats are told apart by their leading magic bytes.

use crate::{IoError, IoResult};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use violajones_core::ImageFormat;

const BMP_MAGIC: &[u8] = b"BM";
const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];
/// PGM and PPM, ASCII and binary
const PNM_MAGIC: [&[u8]; 4] = [b"P2", b"P3", b"P5", b"P6"];

/// Detect the format of an image file from its first bytes.
pub fn detect_format<P: AsRef<Path>>(path: P) -> IoResult<ImageFormat> {
    let mut head = Vec::with_capacity(PNG_MAGIC.len());
    File::open(path)?
        .take(PNG_MAGIC.len() as u64)
        .read_to_end(&mut head)?;
    detect_format_from_bytes(&head)
}

/// Detect the format of in-memory image data.
pub fn detect_format_from_bytes(data: &[u8]) -> IoResult<ImageFormat> {
    if data.len() < 2 {
        return Err(IoError::InvalidData(format!(
            "{} bytes are too few to detect a format",
            data.len()
        )));
    }
    if data.starts_with(BMP_MAGIC) {
        Ok(ImageFormat::Bmp)
    } else if data.starts_with(PNG_MAGIC) {
        Ok(ImageFormat::Png)
    } else if PNM_MAGIC.iter().any(|m| data.starts_with(m)) {
        Ok(ImageFormat::Pnm)
    } else {
        Err(IoError::UnsupportedFormat("unknown image format".to_string()))
    }
}
