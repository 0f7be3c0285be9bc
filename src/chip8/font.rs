pub const MEMORY_SIZE: usize = 4096;
pub const PROGRAM_START: u16 = 0x200; // programs start at 0x200

// CHIP-8 systems had the interpreter in the first 512 bytes of memory
// since we're emulating that we can just store the fontset there
pub const SMALL_FONT_ADDR: u16 = 0x050;
pub const SMALL_GLYPH_SIZE: u16 = 5;
pub const LARGE_FONT_ADDR: u16 = SMALL_FONT_ADDR + SMALL_FONT.len() as u16;
pub const LARGE_GLYPH_SIZE: u16 = 10;

pub const SMALL_FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

// SuperChip 8x10 digits, only 0-9 exist
pub const LARGE_FONT: [u8; 100] = [
    0x3C, 0x7E, 0xE7, 0xC3, 0xC3, 0xC3, 0xC3, 0xE7, 0x7E, 0x3C, // 0
    0x18, 0x38, 0x58, 0x18, 0x18, 0x18, 0x18, 0x18, 0x18, 0x3C, // 1
    0x3E, 0x7F, 0xC3, 0x06, 0x0C, 0x18, 0x30, 0x60, 0xFF, 0xFF, // 2
    0x3C, 0x7E, 0xC3, 0x03, 0x0E, 0x0E, 0x03, 0xC3, 0x7E, 0x3C, // 3
    0x06, 0x0E, 0x1E, 0x36, 0x66, 0xC6, 0xFF, 0xFF, 0x06, 0x06, // 4
    0xFF, 0xFF, 0xC0, 0xC0, 0xFC, 0xFE, 0x03, 0xC3, 0x7E, 0x3C, // 5
    0x3E, 0x7C, 0xC0, 0xC0, 0xFC, 0xFE, 0xC3, 0xC3, 0x7E, 0x3C, // 6
    0xFF, 0xFF, 0x03, 0x06, 0x0C, 0x18, 0x30, 0x60, 0x60, 0x60, // 7
    0x3C, 0x7E, 0xC3, 0xC3, 0x7E, 0x7E, 0xC3, 0xC3, 0x7E, 0x3C, // 8
    0x3C, 0x7E, 0xC3, 0xC3, 0x7F, 0x3F, 0x03, 0x03, 0x3E, 0x7C, // 9
];

/// Address of the 5-byte glyph for the low nibble of `digit`.
pub fn small_glyph_addr(digit: u8) -> u16 {
    SMALL_FONT_ADDR + SMALL_GLYPH_SIZE * u16::from(digit & 0xF)
}

/// Address of the 10-byte glyph for the low nibble of `digit`. Nibbles above 9
/// land in the zeroed reserved area after the table.
pub fn large_glyph_addr(digit: u8) -> u16 {
    LARGE_FONT_ADDR + LARGE_GLYPH_SIZE * u16::from(digit & 0xF)
}

/// Copy both glyph tables into reserved low memory.
pub fn install(memory: &mut [u8; MEMORY_SIZE]) {
    let small = SMALL_FONT_ADDR as usize;
    let large = LARGE_FONT_ADDR as usize;
    memory[small..small + SMALL_FONT.len()].copy_from_slice(&SMALL_FONT);
    memory[large..large + LARGE_FONT.len()].copy_from_slice(&LARGE_FONT);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fonts_fit_below_program_start() {
        assert!(LARGE_FONT_ADDR as usize + LARGE_FONT.len() <= PROGRAM_START as usize);
    }

    #[test]
    fn glyph_addresses() {
        assert_eq!(small_glyph_addr(0), 0x50);
        assert_eq!(small_glyph_addr(0xA), 0x50 + 50);
        assert_eq!(small_glyph_addr(0x1F), 0x50 + 75); // high nibble ignored
        assert_eq!(large_glyph_addr(0), 0xA0);
        assert_eq!(large_glyph_addr(9), 0xA0 + 90);
    }

    #[test]
    fn install_places_both_tables() {
        let mut memory = [0; MEMORY_SIZE];
        install(&mut memory);
        assert_eq!(memory[0x50..0x55], [0xF0, 0x90, 0x90, 0x90, 0xF0]);
        assert_eq!(memory[0xA0], 0x3C);
        assert_eq!(memory[0xA0 + 99], 0x7C);
        assert!(memory[..0x50].iter().all(|b| *b == 0));
    }
}
