//! violajones-io - Image I/O for the violajones workspace
//!
//! Loads training images into [`Pix`] buffers and writes them back.
//!
//! | Format | Read | Write | Feature |
//! |---|---|---|---|
//! | BMP | 8-bit palette, 24-bit, 32-bit | 8 bpp, 32 bpp (as 24-bit) | `bmp` |
//! | PNM | P2, P3, P5, P6 | P5, P6 | `pnm` |
//! | PNG | gray, RGB, RGBA | gray, RGB, RGBA | `png-format` |
//!
//! The format of an input is detected from its magic bytes.

#[cfg(feature = "bmp")]
pub mod bmp;
mod error;
pub mod format;
#[cfg(feature = "png-format")]
pub mod png;
#[cfg(feature = "pnm")]
pub mod pnm;

pub use error::{IoError, IoResult};
pub use format::{detect_format, detect_format_from_bytes};
pub use violajones_core::ImageFormat;

use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Cursor, Seek, Write};
use std::path::Path;
use violajones_core::Pix;

/// Read an image from a file path, detecting its format.
pub fn read_image<P: AsRef<Path>>(path: P) -> IoResult<Pix> {
    let path = path.as_ref();
    let format = detect_format(path)?;
    let reader = BufReader::new(File::open(path)?);
    let pix = read_image_format(reader, format)?;
    debug!(
        "read {} as {:?}: {}x{} {} bpp",
        path.display(),
        format,
        pix.width(),
        pix.height(),
        pix.depth().bits()
    );
    Ok(pix)
}

/// Read an image from memory, detecting its format.
pub fn read_image_mem(data: &[u8]) -> IoResult<Pix> {
    let format = detect_format_from_bytes(data)?;
    read_image_format(Cursor::new(data), format)
}

/// Read an image of a known format from a reader.
pub fn read_image_format<R: BufRead + Seek>(reader: R, format: ImageFormat) -> IoResult<Pix> {
    match format {
        #[cfg(feature = "bmp")]
        ImageFormat::Bmp => bmp::read_bmp(reader),
        #[cfg(feature = "pnm")]
        ImageFormat::Pnm => pnm::read_pnm(reader),
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::read_png(reader),
        ImageFormat::Unknown => Err(IoError::UnsupportedFormat(
            "unknown image format".to_string(),
        )),
        #[allow(unreachable_patterns)]
        other => Err(IoError::FormatDisabled(other)),
    }
}

/// Write an image to a file path in the given format.
pub fn write_image<P: AsRef<Path>>(pix: &Pix, path: P, format: ImageFormat) -> IoResult<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    write_image_format(pix, &mut writer, format)?;
    writer.flush()?;
    Ok(())
}

/// Encode an image into memory in the given format.
pub fn write_image_mem(pix: &Pix, format: ImageFormat) -> IoResult<Vec<u8>> {
    let mut buf = Vec::new();
    write_image_format(pix, &mut buf, format)?;
    Ok(buf)
}

/// Write an image to a writer in the given format.
pub fn write_image_format<W: Write>(pix: &Pix, writer: W, format: ImageFormat) -> IoResult<()> {
    match format {
        #[cfg(feature = "bmp")]
        ImageFormat::Bmp => bmp::write_bmp(pix, writer),
        #[cfg(feature = "pnm")]
        ImageFormat::Pnm => pnm::write_pnm(pix, writer),
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::write_png(pix, writer),
        ImageFormat::Unknown => Err(IoError::UnsupportedFormat(
            "cannot write unknown format".to_string(),
        )),
        #[allow(unreachable_patterns)]
        other => Err(IoError::FormatDisabled(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use violajones_core::{PixMut, PixelDepth};

    fn gray_3x2() -> Pix {
        Pix::from_gray_values(3, 2, &[0, 50, 100, 150, 200, 250]).unwrap()
    }

    #[test]
    fn test_mem_roundtrip_all_formats() {
        let pix = gray_3x2();
        for format in [ImageFormat::Bmp, ImageFormat::Pnm, ImageFormat::Png] {
            let bytes = write_image_mem(&pix, format).unwrap();
            assert_eq!(detect_format_from_bytes(&bytes).unwrap(), format);
            let back = read_image_mem(&bytes).unwrap();
            assert_eq!(back.informat(), format);
            assert_eq!(back.data(), pix.data());
        }
    }

    #[test]
    fn test_unknown_format() {
        let pix = gray_3x2();
        assert!(write_image_mem(&pix, ImageFormat::Unknown).is_err());
        assert!(read_image_mem(b"????").is_err());
    }

    #[test]
    fn test_file_roundtrip() {
        let mut pix = PixMut::new(4, 3, PixelDepth::Bit32).unwrap();
        pix.set_rgb(3, 2, 9, 8, 7).unwrap();
        let pix: Pix = pix.into();

        let path = std::env::temp_dir().join(format!("violajones_io_{}.bmp", std::process::id()));
        write_image(&pix, &path, ImageFormat::Bmp).unwrap();
        let back = read_image(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(back.get_rgb(3, 2), Some((9, 8, 7)));
    }
}
