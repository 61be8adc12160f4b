use sha2::{Digest, Sha256};

// Deterministic Mersenne Twister (MT19937) bit generator.
// seed -> 624-word state -> twist every 624 draws -> tempered u32 -> float in [0,1]

pub const STATE_LEN: usize = 624;
const SHIFT: usize = 397;

const INIT_MULTIPLIER: u32 = 1_812_433_253; // 0x6c078965
const MATRIX_A: u32 = 0x9908_b0df;
const UPPER_MASK: u32 = 0x8000_0000;
const LOWER_MASK: u32 = 0x7fff_ffff;
const TEMPER_B: u32 = 0x9d2c_5680;
const TEMPER_C: u32 = 0xefc6_0000;

/// Divisor for mapping a tempered word onto `[0, 1]`; both ends are reachable.
const SCALE: f64 = u32::MAX as f64;

#[derive(Debug, Clone)]
pub struct MersenneTwister {
    state: [u32; STATE_LEN],
    index: usize,
    regenerations: u64,
}

impl MersenneTwister {
    pub fn new(seed: u32) -> Self {
        let mut state = [0u32; STATE_LEN];
        state[0] = seed;
        for i in 1..STATE_LEN {
            let prev = state[i - 1];
            state[i] = INIT_MULTIPLIER
                .wrapping_mul(prev ^ (prev >> 30))
                .wrapping_add(i as u32);
        }
        Self {
            state,
            index: 0,
            regenerations: 0,
        }
    }

    /// Next tempered 32-bit word. Twists the whole state first whenever the
    /// cursor has wrapped back to 0.
    pub fn next_u32(&mut self) -> u32 {
        if self.index == 0 {
            self.regenerate();
        }
        let mut y = self.state[self.index];
        y ^= y >> 11;
        y ^= (y << 7) & TEMPER_B;
        y ^= (y << 15) & TEMPER_C;
        y ^= y >> 18;
        self.index = (self.index + 1) % STATE_LEN;
        y
    }

    /// Uniform draw in `[0, 1]`, the tempered word divided by `2^32 - 1`.
    pub fn extract(&mut self) -> f64 {
        self.next_u32() as f64 / SCALE
    }

    /// Discard `draws` values, used right after seeding.
    pub fn warm_up(&mut self, draws: usize) {
        for _ in 0..draws {
            self.next_u32();
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of full-state twists performed so far.
    pub fn regenerations(&self) -> u64 {
        self.regenerations
    }

    fn regenerate(&mut self) {
        for i in 0..STATE_LEN {
            let y = (self.state[i] & UPPER_MASK)
                .wrapping_add(self.state[(i + 1) % STATE_LEN] & LOWER_MASK);
            let mut next = self.state[(i + SHIFT) % STATE_LEN] ^ (y >> 1);
            if y & 1 == 1 {
                next ^= MATRIX_A;
            }
            self.state[i] = next;
        }
        self.regenerations += 1;
    }
}

pub fn derive_hash_hex(input: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input);
    hex::encode(hasher.finalize())
}

/// SHA-256 over the big-endian bytes of the next `draws` extractions.
/// Two generators agree on the digest iff they agree on every draw.
pub fn transcript_digest(rng: &mut MersenneTwister, draws: usize) -> String {
    let mut bytes = Vec::with_capacity(draws * 8);
    for _ in 0..draws {
        bytes.extend_from_slice(&rng.extract().to_be_bytes());
    }
    derive_hash_hex(&bytes)
}
