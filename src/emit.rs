//! C source output.
//!
//! The sprite array holds one `uint32_t` per sprite row, one hex digit per
//! pixel. The map array holds the upper 32 rows of the tile map.
use std::io::{self, Write};

use crate::cart::{Cart, MAP_WIDTH};

/// Sprites written to the `sprites` array.
pub const SPRITES: usize = 128;
/// Map rows written to the `map` array.
pub const MAP_ROWS: usize = 32;

/// Write `const uint32_t sprites[]`.
pub fn write_sprites<W: Write, C: Cart + ?Sized>(out: &mut W, cart: &C) -> io::Result<()> {
    writeln!(out, "const uint32_t sprites[] = {{")?;
    for index in 0..SPRITES {
        for row in cart.sprite_rows(index) {
            write!(out, "  0x")?;
            for pixel in row {
                write!(out, "{pixel:x}")?;
            }
            writeln!(out, ", /* {index} */")?;
        }
    }
    writeln!(out, "}};")
}

/// Write `const uint8_t map[32][128]`.
pub fn write_map<W: Write, C: Cart + ?Sized>(out: &mut W, cart: &C) -> io::Result<()> {
    writeln!(out, "const uint8_t map[{MAP_ROWS}][{MAP_WIDTH}] = {{")?;
    for y in 0..MAP_ROWS {
        write!(out, "  {{")?;
        for x in 0..MAP_WIDTH {
            write!(out, "{}, ", cart.map_cell(x, y))?;
        }
        writeln!(out, "}},")?;
    }
    writeln!(out, "}};")
}

/// Write the sprite array followed by the map array.
pub fn write_c_source<W: Write, C: Cart + ?Sized>(out: &mut W, cart: &C) -> io::Result<()> {
    write_sprites(out, cart)?;
    write_map(out, cart)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{SPRITE_SIZE, Sprite};

    /// Sprite `i` is filled with `i % 16`, cell (x, y) holds `x + y`.
    struct Mock;

    impl Cart for Mock {
        fn sprite_rows(&self, index: usize) -> Sprite {
            [[(index % 16) as u8; SPRITE_SIZE]; SPRITE_SIZE]
        }

        fn map_cell(&self, x: usize, y: usize) -> u8 {
            (x + y) as u8
        }
    }

    fn render() -> String {
        let mut out = Vec::new();
        write_c_source(&mut out, &Mock).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn sprite_section() {
        let out = render();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "const uint32_t sprites[] = {");
        assert_eq!(lines[1], "  0x00000000, /* 0 */");
        assert_eq!(lines[8], "  0x00000000, /* 0 */");
        assert_eq!(lines[9], "  0x11111111, /* 1 */");
        assert_eq!(lines[8 * 11 + 1], "  0xbbbbbbbb, /* 11 */");
        assert_eq!(lines[SPRITES * SPRITE_SIZE], "  0xffffffff, /* 127 */");
        assert_eq!(lines[SPRITES * SPRITE_SIZE + 1], "};");
    }

    #[test]
    fn map_section() {
        let out = render();
        let lines: Vec<_> = out.lines().skip(SPRITES * SPRITE_SIZE + 2).collect();
        assert_eq!(lines[0], "const uint8_t map[32][128] = {");
        assert_eq!(lines.len(), MAP_ROWS + 2);
        assert!(lines[1].starts_with("  {0, 1, 2, "));
        assert!(lines[32].starts_with("  {31, 32, "));
        assert!(lines[32].ends_with("157, 158, },"));
        for line in &lines[1..=MAP_ROWS] {
            let inner = line.trim().strip_prefix('{').unwrap().strip_suffix("},").unwrap();
            assert_eq!(inner.split(", ").filter(|v| !v.is_empty()).count(), MAP_WIDTH);
        }
        assert_eq!(lines[MAP_ROWS + 1], "};");
        assert!(out.ends_with("};\n"));
    }

    #[test]
    fn pixel_digits_are_unpadded() {
        struct Wide;
        impl Cart for Wide {
            fn sprite_rows(&self, _: usize) -> Sprite {
                [[0x1f; SPRITE_SIZE]; SPRITE_SIZE]
            }
            fn map_cell(&self, _: usize, _: usize) -> u8 {
                0
            }
        }
        let mut out = Vec::new();
        write_sprites(&mut out, &Wide).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.lines().nth(1), Some("  0x1f1f1f1f1f1f1f1f, /* 0 */"));
    }

    #[test]
    fn output_is_deterministic() {
        assert_eq!(render(), render());
    }
}
