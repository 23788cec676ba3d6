// Deterministic, portable pseudo-random number generator.
//
// Implements xoshiro256++ (Blackman & Vigna, 2019) with SplitMix64 seeding,
// plus the weighted sampling helpers the effect selector draws from. The
// generator is hand-rolled so that a given seed produces the same lighting
// program on every platform and toolchain.
//
// Every engine instance owns its own `ShowRng`. There is no global or
// thread-local generator anywhere in the workspace: two tracks assembled
// concurrently can never interleave their random streams.
//
// **Critical constraint: determinism.** Every method here must produce
// identical output given the same prior state. The core generator uses only
// integer arithmetic; the float helpers derive their values from the integer
// stream with fixed bit widths.

/// Xoshiro256++ PRNG, the workspace's sole source of randomness.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShowRng {
    s: [u64; 4],
}

impl ShowRng {
    /// Create a new PRNG seeded from a `u64`.
    ///
    /// Uses SplitMix64 to expand the seed into the 256-bit internal state.
    /// Two `ShowRng` instances created with the same seed produce identical
    /// output sequences.
    pub fn new(seed: u64) -> Self {
        let mut sm = seed;
        Self {
            s: [
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
            ],
        }
    }

    /// Generate the next `u64` in the sequence.
    pub fn next_u64(&mut self) -> u64 {
        let result = (self.s[0].wrapping_add(self.s[3]))
            .rotate_left(23)
            .wrapping_add(self.s[0]);

        let t = self.s[1] << 17;

        self.s[2] ^= self.s[0];
        self.s[3] ^= self.s[1];
        self.s[1] ^= self.s[2];
        self.s[0] ^= self.s[3];

        self.s[2] ^= t;
        self.s[3] = self.s[3].rotate_left(45);

        result
    }

    /// Generate a uniform `f64` in [0, 1) from the upper 53 bits.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Return `true` with probability `p`.
    ///
    /// `p <= 0.0` always returns false, `p >= 1.0` always returns true.
    pub fn random_bool(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Pick an index into `weights` with probability proportional to its
    /// weight.
    ///
    /// Candidates are scanned in slice order, so callers that list values in
    /// ascending order get the lowest value whenever the draw lands on a
    /// boundary between equal weights. Negative and non-finite weights count
    /// as zero. Returns `None` when no weight is positive; the generator is
    /// not advanced in that case.
    pub fn weighted_index(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights.iter().map(|&w| sanitize(w)).sum();
        if total <= 0.0 {
            return None;
        }

        let target = self.next_f64() * total;
        let mut cumulative = 0.0;
        let mut last_positive = None;
        for (i, &w) in weights.iter().enumerate() {
            let w = sanitize(w);
            if w <= 0.0 {
                continue;
            }
            cumulative += w;
            last_positive = Some(i);
            if cumulative > target {
                return Some(i);
            }
        }
        // Float accumulation can leave `cumulative` a hair under `target`.
        last_positive
    }
}

fn sanitize(w: f64) -> f64 {
    if w.is_finite() && w > 0.0 { w } else { 0.0 }
}

/// SplitMix64, used only for seeding xoshiro256++ from a single `u64`.
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
