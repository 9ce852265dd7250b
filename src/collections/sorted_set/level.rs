//! Level sampling for new skip list nodes.

/// Maximum number of levels a node (and the header) can have.
///
/// Enough for 2^64 elements at p = 1/4.
pub const MAX_LEVEL: usize = 32;

const DEFAULT_SEED: u64 = 0x1234_5678;

/// Simple Xorshift RNG for level generation.
#[derive(Debug, Clone)]
pub(crate) struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 0xDEAD_BEEF_CAFE } else { seed },
        }
    }

    pub(crate) fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

impl Default for XorShift64 {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

/// Draws a level in `1..=MAX_LEVEL`, advancing with probability 1/4.
pub(crate) fn random_level(rng: &mut XorShift64) -> usize {
    let mut level = 1;
    // p=0.25
    while level < MAX_LEVEL && (rng.next() & 0x3) == 0 {
        level += 1;
    }
    level
}
