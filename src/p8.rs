//! Plain text `.p8` cartridges.
//!
//! Only the `__gfx__` and `__map__` sections are decoded; every other section
//! is skipped. The result is the same ROM layout a `.p8.png` image carries, so
//! both formats go through [`Cartridge::from_rom`](crate::Cartridge::from_rom).
use log::debug;

use crate::cart::{GFX_START, MAP_START, MAP_WIDTH, ROM_SIZE, SHEET_WIDTH};

/// First line prefix of every text cartridge.
pub const HEADER: &str = "pico-8 cartridge";

const GFX_ROWS: usize = 128;
const MAP_ROWS: usize = 32;

/// Text cartridge errors
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum P8Error {
    /// First line is not the cartridge header
    #[error("Missing cartridge header")]
    MissingHeader,
    /// A data line holds something other than a hex digit
    #[error("Invalid hex digit {found:?} on line {line}")]
    InvalidDigit {
        /// One-based line number
        line: usize,
        /// Offending character
        found: char,
    },
    /// A section has more rows or columns than its memory region
    #[error("Section __{section}__ overflows on line {line}")]
    Overflow {
        /// Section name
        section: &'static str,
        /// One-based line number
        line: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Gfx,
    Map,
    Skipped,
}

/// Parse a text cartridge into ROM bytes.
pub fn parse(text: &str) -> Result<Vec<u8>, P8Error> {
    let mut lines = text.lines().enumerate();
    match lines.next() {
        Some((_, first)) if first.starts_with(HEADER) => {}
        _ => return Err(P8Error::MissingHeader),
    }

    let mut rom = vec![0; ROM_SIZE];
    let mut section = Section::Skipped;
    let mut row = 0;
    for (i, line) in lines {
        let line_no = i + 1;
        let line = line.trim_end();
        if let Some(name) = line.strip_prefix("__").and_then(|s| s.strip_suffix("__")) {
            section = match name {
                "gfx" => Section::Gfx,
                "map" => Section::Map,
                _ => Section::Skipped,
            };
            debug!("section __{name}__ at line {line_no}");
            row = 0;
            continue;
        }
        if line.is_empty() {
            continue;
        }
        match section {
            Section::Gfx => gfx_row(&mut rom, row, line, line_no)?,
            Section::Map => map_row(&mut rom, row, line, line_no)?,
            Section::Skipped => continue,
        }
        row += 1;
    }
    Ok(rom)
}

fn hex(c: char, line: usize) -> Result<u8, P8Error> {
    c.to_digit(16)
        .map(|d| d as u8)
        .ok_or(P8Error::InvalidDigit { line, found: c })
}

fn gfx_row(rom: &mut [u8], row: usize, text: &str, line: usize) -> Result<(), P8Error> {
    let overflow = P8Error::Overflow { section: "gfx", line };
    if row >= GFX_ROWS {
        return Err(overflow);
    }
    let base = GFX_START + row * SHEET_WIDTH / 2;
    for (x, c) in text.chars().enumerate() {
        if x >= SHEET_WIDTH {
            return Err(overflow);
        }
        let pixel = hex(c, line)?;
        // One digit per pixel, left pixel in the low nibble.
        rom[base + x / 2] |= if x % 2 == 0 { pixel } else { pixel << 4 };
    }
    Ok(())
}

fn map_row(rom: &mut [u8], row: usize, text: &str, line: usize) -> Result<(), P8Error> {
    let overflow = P8Error::Overflow { section: "map", line };
    if row >= MAP_ROWS {
        return Err(overflow);
    }
    let base = MAP_START + row * MAP_WIDTH;
    for (i, c) in text.chars().enumerate() {
        if i / 2 >= MAP_WIDTH {
            return Err(overflow);
        }
        let nibble = hex(c, line)?;
        // Two digits per cell, high nibble first.
        rom[base + i / 2] |= if i % 2 == 0 { nibble << 4 } else { nibble };
    }
    Ok(())
}
