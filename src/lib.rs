#![doc(html_root_url = "https://docs.rs/pico8_cartextract/0.1.0")]
#![doc = include_str!("../README.md")]
#![forbid(missing_docs)]
use std::io;
pub mod cart;
pub mod emit;
pub mod p8;

pub use cart::{Cart, Cartridge, Sprite};

/// Extract the two least significant bits from PNG RGBA frame data.
///
/// Every pixel yields one byte: A, R, G and B contribute bits 7-6, 5-4, 3-2
/// and 1-0 respectively.
pub fn extract_bits(bytes: &[u8]) -> Vec<u8> {
    let mut v = Vec::with_capacity(bytes.len() / 4);
    let mut accum = 0;
    for (i, (byte, offset)) in bytes.iter().zip([2, 1, 0, 3].iter().cycle()).enumerate() {
        let semi_nybble_index = i % 4;
        let semi_nybble = *byte & 0b11;
        accum |= semi_nybble << (offset * 2);
        if semi_nybble_index == 3 {
            v.push(accum);
            accum = 0;
        }
    }
    v
}

/// Errors
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Reading the cartridge failed
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    /// The PNG container could not be decoded
    #[cfg(feature = "png")]
    #[error("png decoding error: {0}")]
    Png(#[from] png::DecodingError),
    /// The image is not RGBA, so it carries no cartridge bytes
    #[cfg(feature = "png")]
    #[error("expected an RGBA image, found {0:?}")]
    ColorType(png::ColorType),
    /// Text cartridge error
    #[error("p8 parse error: {0}")]
    P8(#[from] p8::P8Error),
    /// Fewer bytes than the cartridge ROM region
    #[error("cartridge data too short: {len} bytes, expected at least {expected}")]
    Truncated {
        /// Bytes decoded
        len: usize,
        /// Bytes required
        expected: usize,
    },
    /// Neither a PNG nor a text cartridge
    #[error("unrecognized cartridge format")]
    UnknownFormat,
}

/// Extract two least significant bits from PNG file contents directly.
#[cfg(feature = "png")]
pub fn extract_bits_from_png(png: impl io::Read) -> Result<Vec<u8>, Error> {
    let mut decoder = png::Decoder::new(png);
    // Palette and low bit depth images come out as 8-bit samples.
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder.read_info()?;
    let mut buf = vec![0; reader.output_buffer_size()];
    // Only the first frame of an APNG holds cartridge data.
    let info = reader.next_frame(&mut buf)?;
    if info.color_type != png::ColorType::Rgba {
        return Err(Error::ColorType(info.color_type));
    }
    buf.truncate(info.buffer_size());
    log::debug!("png frame {}x{}, {} bytes", info.width, info.height, buf.len());
    Ok(extract_bits(&buf))
}
