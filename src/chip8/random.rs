use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform byte generator behind `CXNN`.
pub struct ByteSource {
    rng: StdRng,
}

impl ByteSource {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic stream, same seed gives the same bytes.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn next_byte(&mut self) -> u8 {
        self.rng.gen_range(0, 256) as u8
    }
}

impl Default for ByteSource {
    fn default() -> Self {
        Self::from_entropy()
    }
}
