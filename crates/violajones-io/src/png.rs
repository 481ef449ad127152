//! PNG support via the `png` crate
//!
//! Palette and low-bit gray images are expanded by the decoder, so every
//! PNG lands as 8 bpp gray, 16 bpp gray, or 32 bpp color.

use crate::{IoError, IoResult};
use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};
use std::io::{BufRead, Seek, Write};
use violajones_core::{ImageFormat, Pix, PixMut, PixelDepth, color};

fn decode_err(e: png::DecodingError) -> IoError {
    IoError::DecodeError(format!("PNG: {}", e))
}

fn encode_err(e: png::EncodingError) -> IoError {
    IoError::EncodeError(format!("PNG: {}", e))
}

/// Read a PNG image.
pub fn read_png<R: BufRead + Seek>(source: R) -> IoResult<Pix> {
    let mut decoder = Decoder::new(source);
    decoder.set_transformations(Transformations::EXPAND);
    let mut frames = decoder.read_info().map_err(decode_err)?;

    let (width, height) = (frames.info().width, frames.info().height);
    let (color_type, bit_depth) = frames.output_color_type();
    let (depth, spp) = match color_type {
        ColorType::Grayscale if bit_depth == BitDepth::Sixteen => (PixelDepth::Bit16, 1),
        ColorType::Grayscale if bit_depth == BitDepth::Eight => (PixelDepth::Bit8, 1),
        ColorType::Rgb => (PixelDepth::Bit32, 3),
        ColorType::GrayscaleAlpha | ColorType::Rgba => (PixelDepth::Bit32, 4),
        _ => {
            return Err(IoError::UnsupportedFormat(format!(
                "PNG output {:?} at {:?}",
                color_type, bit_depth
            )));
        }
    };

    let mut buf = vec![
        0;
        frames
            .output_buffer_size()
            .ok_or_else(|| IoError::DecodeError("PNG frame too large".to_string()))?
    ];
    let frame = frames.next_frame(&mut buf).map_err(decode_err)?;

    let mut pix_mut = PixMut::new(width, height, depth)?;
    pix_mut.set_spp(spp);
    pix_mut.set_informat(ImageFormat::Png);

    let data = &buf[..frame.buffer_size()];
    let sample_len = if bit_depth == BitDepth::Sixteen { 2 } else { 1 };
    let pixel_len = color_type.samples() * sample_len;

    for (y, row) in (0..height).zip(data.chunks_exact(frame.line_size)) {
        for (x, px) in (0..width).zip(row.chunks_exact(pixel_len)) {
            // Color samples keep their high byte
            let s = |i: usize| px[i * sample_len];
            let val = match color_type {
                ColorType::Grayscale if sample_len == 2 => {
                    u32::from(u16::from_be_bytes([px[0], px[1]]))
                }
                ColorType::Grayscale => u32::from(px[0]),
                ColorType::GrayscaleAlpha => color::compose_rgba(s(0), s(0), s(0), s(1)),
                ColorType::Rgb => color::compose_rgb(s(0), s(1), s(2)),
                _ => color::compose_rgba(s(0), s(1), s(2), s(3)),
            };
            pix_mut.set_pixel_unchecked(x, y, val);
        }
    }

    Ok(pix_mut.into())
}

/// Write a PNG image.
///
/// 8 and 16 bpp images are written as gray; 32 bpp images as RGB, or
/// RGBA when the image carries an alpha sample.
pub fn write_png<W: Write>(pix: &Pix, sink: W) -> IoResult<()> {
    let (width, height) = pix.dimensions();
    let (color_type, bit_depth, bytes_per_pixel) = match pix.depth() {
        PixelDepth::Bit8 => (ColorType::Grayscale, BitDepth::Eight, 1),
        PixelDepth::Bit16 => (ColorType::Grayscale, BitDepth::Sixteen, 2),
        PixelDepth::Bit32 if pix.spp() == 4 => (ColorType::Rgba, BitDepth::Eight, 4),
        PixelDepth::Bit32 => (ColorType::Rgb, BitDepth::Eight, 3),
    };

    let mut data = vec![0u8; width as usize * height as usize * bytes_per_pixel];
    let mut pixels = data.chunks_exact_mut(bytes_per_pixel);
    for y in 0..height {
        for (x, px) in (0..width).zip(pixels.by_ref()) {
            let val = pix.get_pixel_unchecked(x, y);
            match px.len() {
                1 => px[0] = val as u8,
                2 => px.copy_from_slice(&(val as u16).to_be_bytes()),
                3 => {
                    let (r, g, b) = color::extract_rgb(val);
                    px.copy_from_slice(&[r, g, b]);
                }
                _ => px.copy_from_slice(&val.to_be_bytes()),
            }
        }
    }

    let mut encoder = Encoder::new(sink, width, height);
    encoder.set_color(color_type);
    encoder.set_depth(bit_depth);
    let mut png_writer = encoder.write_header().map_err(encode_err)?;
    png_writer.write_image_data(&data).map_err(encode_err)?;
    png_writer.finish().map_err(encode_err)
}
