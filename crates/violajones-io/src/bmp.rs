//! BMP (Windows bitmap) support
//!
//! Read: uncompressed 8-bit palette images, which load as gray through
//! the luminance of each palette entry, plus 24-bit BGR and 32-bit BGRA.
//! Rows run bottom to top unless the stored height is negative.
//!
//! Write: 8 bpp with a linear gray palette, 32 bpp as 24-bit BGR.

use crate::{IoError, IoResult};
use std::io::{Read, Write};
use violajones_core::pix::{L_BLUE_WEIGHT, L_GREEN_WEIGHT, L_RED_WEIGHT};
use violajones_core::{ImageFormat, Pix, PixMut, PixelDepth, color};

const FILE_HEADER_LEN: usize = 14;
const INFO_HEADER_LEN: usize = 40;

/// Fields of BITMAPFILEHEADER + BITMAPINFOHEADER that matter here.
#[derive(Debug)]
struct BmpHeader {
    pixel_offset: usize,
    info_len: usize,
    width: u32,
    height: u32,
    top_down: bool,
    bits_per_pixel: u16,
    colors_used: usize,
}

impl BmpHeader {
    fn parse(file: &[u8; FILE_HEADER_LEN], info: &[u8; INFO_HEADER_LEN]) -> IoResult<Self> {
        let u16_at = |b: &[u8], i: usize| u16::from_le_bytes([b[i], b[i + 1]]);
        let u32_at = |b: &[u8], i: usize| u32::from_le_bytes([b[i], b[i + 1], b[i + 2], b[i + 3]]);

        if &file[..2] != b"BM" {
            return Err(IoError::InvalidData("missing BM signature".to_string()));
        }
        let info_len = u32_at(info, 0) as usize;
        if info_len < INFO_HEADER_LEN {
            return Err(IoError::InvalidData(format!(
                "BMP info header of {} bytes is too short",
                info_len
            )));
        }
        if u16_at(info, 12) != 1 {
            return Err(IoError::InvalidData("BMP must have one plane".to_string()));
        }
        // BI_RGB, or BI_BITFIELDS with the default masks
        let compression = u32_at(info, 16);
        if compression != 0 && compression != 3 {
            return Err(IoError::UnsupportedFormat(format!(
                "compressed BMP (method {})",
                compression
            )));
        }
        let bits_per_pixel = u16_at(info, 14);
        if !matches!(bits_per_pixel, 8 | 24 | 32) {
            return Err(IoError::UnsupportedFormat(format!(
                "{}-bit BMP",
                bits_per_pixel
            )));
        }

        let width = u32_at(info, 4) as i32;
        let height = u32_at(info, 8) as i32;
        if width <= 0 || height == 0 {
            return Err(IoError::InvalidData(format!(
                "BMP size {}x{}",
                width, height
            )));
        }

        Ok(BmpHeader {
            pixel_offset: u32_at(file, 10) as usize,
            info_len,
            width: width.unsigned_abs(),
            height: height.unsigned_abs(),
            top_down: height < 0,
            bits_per_pixel,
            colors_used: u32_at(info, 32) as usize,
        })
    }

    /// Stored bytes per row, a multiple of 4.
    fn stride(&self) -> usize {
        row_stride(self.width, self.bits_per_pixel)
    }

    /// Palette entries for 8-bit images; 0 means a full palette.
    fn palette_len(&self) -> usize {
        match self.colors_used {
            0 => 256,
            n => n.min(256),
        }
    }
}

#[inline]
fn row_stride(width: u32, bits_per_pixel: u16) -> usize {
    (width as usize * bits_per_pixel as usize).div_ceil(32) * 4
}

fn discard<R: Read>(reader: &mut R, n: usize) -> IoResult<()> {
    let skipped = std::io::copy(&mut reader.by_ref().take(n as u64), &mut std::io::sink())?;
    if skipped != n as u64 {
        return Err(IoError::InvalidData("BMP file truncated".to_string()));
    }
    Ok(())
}

fn luminance(r: u8, g: u8, b: u8) -> u8 {
    let val = L_RED_WEIGHT * r as f32 + L_GREEN_WEIGHT * g as f32 + L_BLUE_WEIGHT * b as f32;
    (val + 0.5).min(255.0) as u8
}

/// Read a BMP image.
pub fn read_bmp<R: Read>(mut reader: R) -> IoResult<Pix> {
    let mut file = [0u8; FILE_HEADER_LEN];
    let mut info = [0u8; INFO_HEADER_LEN];
    reader.read_exact(&mut file)?;
    reader.read_exact(&mut info)?;
    let header = BmpHeader::parse(&file, &info)?;
    discard(&mut reader, header.info_len - INFO_HEADER_LEN)?;
    let mut consumed = FILE_HEADER_LEN + header.info_len;

    // Palette entries are B, G, R, reserved
    let mut gray_of = [0u8; 256];
    if header.bits_per_pixel == 8 {
        let mut palette = vec![0u8; header.palette_len() * 4];
        reader.read_exact(&mut palette)?;
        consumed += palette.len();
        for (gray, bgrx) in gray_of.iter_mut().zip(palette.chunks_exact(4)) {
            *gray = luminance(bgrx[2], bgrx[1], bgrx[0]);
        }
    }

    let gap = header.pixel_offset.checked_sub(consumed).ok_or_else(|| {
        IoError::InvalidData(format!(
            "BMP pixel data at {} overlaps the header",
            header.pixel_offset
        ))
    })?;
    discard(&mut reader, gap)?;

    let depth = if header.bits_per_pixel == 8 {
        PixelDepth::Bit8
    } else {
        PixelDepth::Bit32
    };
    let mut pix_mut = PixMut::new(header.width, header.height, depth)?;
    pix_mut.set_informat(ImageFormat::Bmp);
    if header.bits_per_pixel == 32 {
        pix_mut.set_spp(4);
    }

    let bytes_per_pixel = header.bits_per_pixel as usize / 8;
    let mut line = vec![0u8; header.stride()];
    for stored in 0..header.height {
        reader.read_exact(&mut line)?;
        let y = if header.top_down {
            stored
        } else {
            header.height - 1 - stored
        };
        let pixels = line.chunks_exact(bytes_per_pixel).take(header.width as usize);
        for (x, px) in (0..header.width).zip(pixels) {
            let val = match px {
                &[index] => gray_of[index as usize] as u32,
                &[b, g, r] => color::compose_rgb(r, g, b),
                &[b, g, r, a] => color::compose_rgba(r, g, b, a),
                _ => continue,
            };
            pix_mut.set_pixel_unchecked(x, y, val);
        }
    }

    Ok(pix_mut.into())
}

/// Write a BMP image.
///
/// 16 bpp images have no BMP form and are rejected.
pub fn write_bmp<W: Write>(pix: &Pix, mut writer: W) -> IoResult<()> {
    let (width, height) = pix.dimensions();
    let bits_per_pixel: u16 = match pix.depth() {
        PixelDepth::Bit8 => 8,
        PixelDepth::Bit32 => 24,
        PixelDepth::Bit16 => {
            return Err(IoError::UnsupportedFormat(
                "16 bpp images cannot be written as BMP".to_string(),
            ));
        }
    };

    let stride = row_stride(width, bits_per_pixel);
    let image_len = stride * height as usize;
    let palette_len = if bits_per_pixel == 8 { 256 * 4 } else { 0 };
    let pixel_offset = FILE_HEADER_LEN + INFO_HEADER_LEN + palette_len;

    let mut head = Vec::with_capacity(pixel_offset);
    head.extend_from_slice(b"BM");
    head.extend_from_slice(&((pixel_offset + image_len) as u32).to_le_bytes());
    head.extend_from_slice(&[0; 4]);
    head.extend_from_slice(&(pixel_offset as u32).to_le_bytes());
    head.extend_from_slice(&(INFO_HEADER_LEN as u32).to_le_bytes());
    head.extend_from_slice(&(width as i32).to_le_bytes());
    // Positive height: bottom row first
    head.extend_from_slice(&(height as i32).to_le_bytes());
    head.extend_from_slice(&1u16.to_le_bytes());
    head.extend_from_slice(&bits_per_pixel.to_le_bytes());
    head.extend_from_slice(&0u32.to_le_bytes());
    head.extend_from_slice(&(image_len as u32).to_le_bytes());
    // Resolution, colors used, important colors
    head.extend_from_slice(&[0; 16]);
    if bits_per_pixel == 8 {
        for level in 0..=255u8 {
            head.extend_from_slice(&[level, level, level, 0]);
        }
    }
    writer.write_all(&head)?;

    let mut line = vec![0u8; stride];
    for y in (0..height).rev() {
        if bits_per_pixel == 8 {
            for (x, byte) in (0..width).zip(line.iter_mut()) {
                *byte = pix.get_pixel_unchecked(x, y) as u8;
            }
        } else {
            for (x, bgr) in (0..width).zip(line.chunks_exact_mut(3)) {
                let (r, g, b) = color::extract_rgb(pix.get_pixel_unchecked(x, y));
                bgr.copy_from_slice(&[b, g, r]);
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
    fn test_gray_roundtrip_and_size() {
        let values: Vec<u8> = (0..50).map(|v| v * 5).collect();
        let pix = Pix::from_gray_values(10, 5, &values).unwrap();

        let mut bytes = Vec::new();
        write_bmp(&pix, &mut bytes).unwrap();
        // 10 pixels pad to 12 bytes per row
        assert_eq!(bytes.len(), 14 + 40 + 1024 + 12 * 5);

        let back = read_bmp(Cursor::new(bytes)).unwrap();
        assert_eq!(back.depth(), PixelDepth::Bit8);
        assert_eq!(back.informat(), ImageFormat::Bmp);
        assert_eq!(back.data(), pix.data());
    }

    #[test]
    fn test_color_roundtrip() {
        let mut pix_mut = PixMut::new(3, 2, PixelDepth::Bit32).unwrap();
        pix_mut.set_rgb(0, 0, 200, 10, 20).unwrap();
        pix_mut.set_rgb(2, 1, 1, 2, 3).unwrap();
        let pix: Pix = pix_mut.into();

        let mut bytes = Vec::new();
        write_bmp(&pix, &mut bytes).unwrap();
        let back = read_bmp(Cursor::new(bytes)).unwrap();
        assert_eq!(back.get_rgb(0, 0), Some((200, 10, 20)));
        assert_eq!(back.get_rgb(2, 1), Some((1, 2, 3)));
        assert_eq!(back.get_rgb(1, 0), Some((0, 0, 0)));
    }

    #[test]
    fn test_rejects_16bpp_write() {
        let pix = Pix::new(2, 2, PixelDepth::Bit16).unwrap();
        assert!(matches!(
            write_bmp(&pix, Vec::new()),
            Err(IoError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_truncated_and_garbage() {
        let pix = Pix::new(4, 4, PixelDepth::Bit32).unwrap();
        let mut bytes = Vec::new();
        write_bmp(&pix, &mut bytes).unwrap();
        bytes.truncate(bytes.len() - 3);
        assert!(read_bmp(Cursor::new(bytes)).is_err());
        assert!(read_bmp(Cursor::new(vec![b'X'; 60])).is_err());
    }

    #[test]
    fn test_stride() {
        assert_eq!(row_stride(1, 24), 4);
        assert_eq!(row_stride(4, 24), 12);
        assert_eq!(row_stride(5, 8), 8);
        assert_eq!(row_stride(3, 32), 12);
    }
}
