/// Compatibility toggles that change specific opcodes without changing their
/// encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Quirks {
    /// 8XY6/8XYE shift VY into VX instead of shifting VX in place.
    pub shift_uses_vy: bool,
    /// FX55/FX65 leave I pointing just past the transferred registers.
    pub bulk_transfer_advances_index: bool,
    /// Low-res sprites on an upscaled surface draw one dot per logical pixel
    /// instead of a 2x2 block.
    pub lores_as_dots: bool,
}

/// Dialect used for encodings that different extensions assign differently.
/// SuperChip opcodes that do not collide decode under every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Variant {
    SuperChip,
    /// Colour opcodes, second keypad, I/O ports.
    Chip8X,
    /// Extra comparisons, MUL/DIV, 16-bit BCD, I/O ports.
    Chip8E,
}

impl Default for Variant {
    fn default() -> Self {
        Variant::SuperChip
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Config {
    pub quirks: Quirks,
    pub variant: Variant,
    /// Back the low-res surface with a 128x64 buffer and scale low-res sprites
    /// by two.
    pub upscale_lores: bool,
    /// Seed for CXNN; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Config {
    pub fn with_quirks(mut self, quirks: Quirks) -> Self {
        self.quirks = quirks;
        self
    }

    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_upscaled_lores(mut self, upscale: bool) -> Self {
        self.upscale_lores = upscale;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
