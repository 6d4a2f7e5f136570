use rand::{CryptoRng, RngCore};

/// Commitment keys are 256 bits.
pub const KEY_LEN: usize = 32;

/// Unbiased integer draws over a cryptographically secure source.
///
/// The game holds a single instance for its whole lifetime and routes every
/// fair decision and every commitment key through it.
pub struct FairRandom<R> {
    rng: R,
}

impl FairRandom<rand::rngs::OsRng> {
    /// The production source: the operating system CSPRNG.
    pub fn from_os() -> Self {
        Self {
            rng: rand::rngs::OsRng,
        }
    }
}

impl<R: RngCore + CryptoRng> FairRandom<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Uniform integer in `min..=max`.
    ///
    /// Draws above the largest multiple of the range width are rejected and
    /// redrawn; without that, `draw % range` over-represents the low
    /// residues whenever the range does not divide the source width evenly.
    pub fn uniform(&mut self, min: u64, max: u64) -> u64 {
        debug_assert!(max >= min);
        let range = (max - min).wrapping_add(1);
        if range == 0 {
            // min..=max spans the whole u64 domain, nothing to reject
            return self.rng.next_u64();
        }
        let limit = (u64::MAX / range) * range;
        loop {
            let draw = self.rng.next_u64();
            if draw < limit {
                return min + draw % range;
            }
        }
    }

    /// Fresh 256-bit commitment key.
    pub fn secret_key(&mut self) -> [u8; KEY_LEN] {
        let mut key = [0u8; KEY_LEN];
        self.rng.fill_bytes(&mut key);
        key
    }
}
