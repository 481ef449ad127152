//! PNM (Portable Any Map) format support
//!
//! Reads PGM (P2 ASCII, P5 binary) and PPM (P3 ASCII, P6 binary) images.
//! Gray images with a maxval above 255 load as 16 bpp. Writes binary P5
//! for 8/16 bpp and P6 for 32 bpp.

use crate::{IoError, IoResult};
use std::io::{BufRead, Write};
use violajones_core::{ImageFormat, Pix, PixMut, PixelDepth, color};

/// Read one header token, skipping whitespace and `#` comments.
///
/// Consumes the single whitespace byte that ends the token.
fn read_token<R: BufRead>(reader: &mut R) -> IoResult<String> {
    let mut token = Vec::new();
    let mut in_comment = false;
    loop {
        let byte = {
            let buf = reader.fill_buf()?;
            match buf.first() {
                Some(&b) => b,
                None if token.is_empty() => {
                    return Err(IoError::InvalidData("PNM header truncated".to_string()));
                }
                None => break,
            }
        };
        reader.consume(1);

        if in_comment {
            in_comment = byte != b'\n' && byte != b'\r';
            continue;
        }
        if byte == b'#' && token.is_empty() {
            in_comment = true;
        } else if byte.is_ascii_whitespace() {
            if !token.is_empty() {
                break;
            }
        } else {
            token.push(byte);
        }
    }
    String::from_utf8(token).map_err(|_| IoError::InvalidData("non-ASCII PNM header".to_string()))
}

fn read_number<R: BufRead>(reader: &mut R, what: &str) -> IoResult<u32> {
    let token = read_token(reader)?;
    token
        .parse::<u32>()
        .map_err(|_| IoError::InvalidData(format!("bad PNM {}: {:?}", what, token)))
}

/// Read a PNM image (P2/P3/P5/P6) from a reader.
///
/// # Returns
/// A `Pix` at 8 or 16 bpp (PGM) or 32 bpp (PPM).
pub fn read_pnm<R: BufRead>(mut reader: R) -> IoResult<Pix> {
    let magic = read_token(&mut reader)?;
    let (ascii, rgb) = match magic.as_str() {
        "P2" => (true, false),
        "P3" => (true, true),
        "P5" => (false, false),
        "P6" => (false, true),
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported PNM type: {}",
                other
            )));
        }
    };

    let width = read_number(&mut reader, "width")?;
    let height = read_number(&mut reader, "height")?;
    let maxval = read_number(&mut reader, "maxval")?;
    if maxval == 0 || maxval > 65535 {
        return Err(IoError::InvalidData(format!("bad PNM maxval: {}", maxval)));
    }
    let wide = maxval > 255;
    if rgb && wide {
        return Err(IoError::UnsupportedFormat(
            "16-bit PPM is not supported".to_string(),
        ));
    }

    let depth = match (rgb, wide) {
        (true, _) => PixelDepth::Bit32,
        (false, true) => PixelDepth::Bit16,
        (false, false) => PixelDepth::Bit8,
    };
    let mut pix_mut = PixMut::new(width, height, depth)?;
    pix_mut.set_informat(ImageFormat::Pnm);

    let samples_per_pixel = if rgb { 3 } else { 1 };
    let bytes_per_sample = if wide { 2 } else { 1 };
    let mut row = vec![0u32; width as usize * samples_per_pixel];
    let mut raw = vec![0u8; row.len() * bytes_per_sample];

    for y in 0..height {
        if ascii {
            for v in row.iter_mut() {
                *v = read_number(&mut reader, "sample")?;
            }
        } else {
            reader.read_exact(&mut raw)?;
            if wide {
                for (v, b) in row.iter_mut().zip(raw.chunks_exact(2)) {
                    *v = u16::from_be_bytes([b[0], b[1]]) as u32;
                }
            } else {
                for (v, &b) in row.iter_mut().zip(raw.iter()) {
                    *v = b as u32;
                }
            }
        }
        if let Some(&bad) = row.iter().find(|&&v| v > maxval) {
            return Err(IoError::InvalidData(format!(
                "PNM sample {} exceeds maxval {}",
                bad, maxval
            )));
        }

        for x in 0..width {
            let i = x as usize * samples_per_pixel;
            let val = if rgb {
                color::compose_rgb(row[i] as u8, row[i + 1] as u8, row[i + 2] as u8)
            } else {
                row[i]
            };
            pix_mut.set_pixel_unchecked(x, y, val);
        }
    }

    Ok(pix_mut.into())
}

/// Write a `Pix` as binary PNM to a writer.
///
/// Chooses P5 (8 or 16 bpp grayscale) or P6 (32 bpp RGB) based on the
/// pixel depth.
pub fn write_pnm<W: Write>(pix: &Pix, mut writer: W) -> IoResult<()> {
    let (width, height) = pix.dimensions();
    let (magic, maxval) = match pix.depth() {
        PixelDepth::Bit8 => ("P5", 255),
        PixelDepth::Bit16 => ("P5", 65535),
        PixelDepth::Bit32 => ("P6", 255),
    };
    write!(writer, "{}\n{} {}\n{}\n", magic, width, height, maxval)?;

    let mut line = Vec::new();
    for y in 0..height {
        line.clear();
        for x in 0..width {
            let val = pix.get_pixel_unchecked(x, y);
            match pix.depth() {
                PixelDepth::Bit8 => line.push(val as u8),
                PixelDepth::Bit16 => line.extend_from_slice(&(val as u16).to_be_bytes()),
                PixelDepth::Bit32 => {
                    let (r, g, b) = color::extract_rgb(val);
                    line.extend_from_slice(&[r, g, b]);
                }
            }
        }
        writer.write_all(&line)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_ascii_pgm_with_comments() {
        let data = b"P2\n# made by hand\n3 2\n# max\n9\n0 1 2\n3 4 9\n";
        let pix = read_pnm(Cursor::new(&data[..])).unwrap();
        assert_eq!(pix.dimensions(), (3, 2));
        assert_eq!(pix.depth(), PixelDepth::Bit8);
        assert_eq!(pix.get_pixel(2, 1), Some(9));
        assert_eq!(pix.get_pixel(1, 0), Some(1));
    }

    #[test]
    fn test_read_ascii_ppm() {
        let data = b"P3 2 1 255 255 0 0  0 0 255";
        let pix = read_pnm(Cursor::new(&data[..])).unwrap();
        assert_eq!(pix.get_rgb(0, 0), Some((255, 0, 0)));
        assert_eq!(pix.get_rgb(1, 0), Some((0, 0, 255)));
    }

    #[test]
    fn test_pgm_16bit_roundtrip() {
        let mut pix_mut = PixMut::new(3, 2, PixelDepth::Bit16).unwrap();
        pix_mut.set_pixel(0, 0, 65535).unwrap();
        pix_mut.set_pixel(2, 1, 300).unwrap();
        let pix: Pix = pix_mut.into();

        let mut buf = Vec::new();
        write_pnm(&pix, &mut buf).unwrap();
        assert!(buf.starts_with(b"P5\n3 2\n65535\n"));
        let pix2 = read_pnm(Cursor::new(buf)).unwrap();
        assert_eq!(pix2.depth(), PixelDepth::Bit16);
        assert_eq!(pix2.get_pixel(0, 0), Some(65535));
        assert_eq!(pix2.get_pixel(2, 1), Some(300));
    }

    #[test]
    fn test_ppm_roundtrip() {
        let mut pix_mut = PixMut::new(2, 2, PixelDepth::Bit32).unwrap();
        pix_mut.set_rgb(1, 0, 10, 20, 30).unwrap();
        let pix: Pix = pix_mut.into();

        let mut buf = Vec::new();
        write_pnm(&pix, &mut buf).unwrap();
        let pix2 = read_pnm(Cursor::new(buf)).unwrap();
        assert_eq!(pix2.get_rgb(1, 0), Some((10, 20, 30)));
        assert_eq!(pix2.get_rgb(0, 1), Some((0, 0, 0)));
    }

    #[test]
    fn test_read_errors() {
        assert!(read_pnm(Cursor::new(&b"P4\n1 1\n"[..])).is_err());
        assert!(read_pnm(Cursor::new(&b"P5\n2 2\n255\n\x01"[..])).is_err());
        assert!(read_pnm(Cursor::new(&b"P2\n1 1\n5\n6\n"[..])).is_err());
        assert!(read_pnm(Cursor::new(&b"P2\n0 1\n5\n"[..])).is_err());
    }
}
