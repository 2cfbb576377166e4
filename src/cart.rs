//! Decoded cartridge memory and the read interface the emitter consumes.
use std::{fs, path::Path};

use log::debug;

use crate::{Error, p8};

/// Width and height of one sprite in pixels.
pub const SPRITE_SIZE: usize = 8;
/// Sprites addressable on the sheet.
pub const SPRITE_COUNT: usize = 256;
/// Width of the sprite sheet in pixels.
pub const SHEET_WIDTH: usize = 128;
/// Width of the tile map in cells.
pub const MAP_WIDTH: usize = 128;
/// Height of the tile map in cells, including the half shared with the sheet.
pub const MAP_HEIGHT: usize = 64;

/// Start of the sprite sheet, two pixels per byte.
pub const GFX_START: usize = 0x0000;
/// Start of the map rows shared with the lower half of the sprite sheet.
pub const SHARED_MAP_START: usize = 0x1000;
/// Start of the upper 32 map rows.
pub const MAP_START: usize = 0x2000;
/// Size of the ROM region: gfx, map, flags, music and sfx.
pub const ROM_SIZE: usize = 0x4300;

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Rows of one sprite, top to bottom, each row left to right.
pub type Sprite = [[u8; SPRITE_SIZE]; SPRITE_SIZE];

/// Read access to decoded sprite and map data.
pub trait Cart {
    /// Pixel rows of sprite `index`. Panics if `index` is past the sheet.
    fn sprite_rows(&self, index: usize) -> Sprite;
    /// Map cell at column `x`, row `y`. Panics outside the map.
    fn map_cell(&self, x: usize, y: usize) -> u8;
}

/// A cartridge's ROM region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cartridge {
    rom: Vec<u8>,
}

impl Cartridge {
    /// Read and decode a `.p8.png` or `.p8` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        debug!("read {} bytes from {}", bytes.len(), path.display());
        Self::from_bytes(&bytes)
    }

    /// Decode file contents, choosing the format from its leading bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.starts_with(PNG_SIGNATURE) {
            debug!("detected png cartridge");
            return Self::from_png(bytes);
        }
        match std::str::from_utf8(bytes) {
            Ok(text) if text.starts_with(p8::HEADER) => {
                debug!("detected text cartridge");
                Self::from_p8(text)
            }
            _ => Err(Error::UnknownFormat),
        }
    }

    #[cfg(feature = "png")]
    fn from_png(bytes: &[u8]) -> Result<Self, Error> {
        Self::from_rom(&crate::extract_bits_from_png(bytes)?)
    }

    #[cfg(not(feature = "png"))]
    fn from_png(_bytes: &[u8]) -> Result<Self, Error> {
        Err(Error::UnknownFormat)
    }

    /// Decode a plain text cartridge.
    pub fn from_p8(text: &str) -> Result<Self, Error> {
        Self::from_rom(&p8::parse(text)?)
    }

    /// Wrap raw cartridge memory. Bytes past the ROM region are ignored.
    pub fn from_rom(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() < ROM_SIZE {
            return Err(Error::Truncated {
                len: bytes.len(),
                expected: ROM_SIZE,
            });
        }
        Ok(Cartridge {
            rom: bytes[..ROM_SIZE].to_vec(),
        })
    }

    /// The ROM region as loaded.
    pub fn rom(&self) -> &[u8] {
        &self.rom
    }

    fn pixel(&self, x: usize, y: usize) -> u8 {
        let byte = self.rom[GFX_START + y * SHEET_WIDTH / 2 + x / 2];
        // Left pixel lives in the low nibble.
        if x % 2 == 0 { byte & 0x0f } else { byte >> 4 }
    }
}

impl Cart for Cartridge {
    fn sprite_rows(&self, index: usize) -> Sprite {
        assert!(index < SPRITE_COUNT, "sprite index {index} out of range");
        let per_row = SHEET_WIDTH / SPRITE_SIZE;
        let left = (index % per_row) * SPRITE_SIZE;
        let top = (index / per_row) * SPRITE_SIZE;
        let mut sprite = [[0; SPRITE_SIZE]; SPRITE_SIZE];
        for (dy, row) in sprite.iter_mut().enumerate() {
            for (dx, pixel) in row.iter_mut().enumerate() {
                *pixel = self.pixel(left + dx, top + dy);
            }
        }
        sprite
    }

    fn map_cell(&self, x: usize, y: usize) -> u8 {
        assert!(x < MAP_WIDTH && y < MAP_HEIGHT, "map cell ({x}, {y}) out of range");
        if y < MAP_HEIGHT / 2 {
            self.rom[MAP_START + y * MAP_WIDTH + x]
        } else {
            self.rom[SHARED_MAP_START + (y - MAP_HEIGHT / 2) * MAP_WIDTH + x]
        }
    }
}
