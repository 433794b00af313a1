//! Hit resolution.
//!
//! Decides where a hit ball bounces on the table. The message text perturbs the
//! seed so that what a player writes "affects" their shot, while a draw from the
//! resolver's entropy source keeps identical messages from always producing the
//! same outcome.
//!
//! Bounce positions are percentages along the table's length. The second bounce
//! is shifted past the net (50) and counts as on the table below 100.

use std::hash::Hasher;

use fxhash::FxHasher;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Scales the integer rolls; higher values make landing a hit easier.
pub const HIT_EASINESS: u32 = 3;

/// Upper bound of the first roll.
pub const FIRST_ROLL_MAX: u32 = 100 * HIT_EASINESS;

/// First rolls at or above this overshoot the table.
pub const TOO_FAR_THRESHOLD: u32 = 75 * HIT_EASINESS;

/// Upper bound of the second roll.
pub const SECOND_ROLL_MAX: u32 = 75 * HIT_EASINESS;

/// Second rolls below this land on the table.
pub const LANDING_THRESHOLD: u32 = 50 * HIT_EASINESS;

/// Result of a single hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitOutcome {
    /// First bounce, percent of table length in (0, 100]
    pub first_bounce: f32,
    /// Second bounce in (50, 125], or 0 when the ball went too far on the first
    pub second_bounce: f32,
    pub success: bool,
}

impl HitOutcome {
    /// Map raw rolls to an outcome.
    ///
    /// `second_roll` is ignored when the first roll already overshoots.
    pub fn from_rolls(first_roll: u32, second_roll: u32) -> Self {
        let easiness = HIT_EASINESS as f32;
        let first_bounce = first_roll as f32 / easiness;

        if first_roll >= TOO_FAR_THRESHOLD {
            return Self {
                first_bounce,
                second_bounce: 0.0,
                success: false,
            };
        }

        Self {
            first_bounce,
            second_bounce: 50.0 + second_roll as f32 / easiness,
            success: second_roll < LANDING_THRESHOLD,
        }
    }

    /// Ball overshot on the first bounce.
    pub fn is_too_far(&self) -> bool {
        self.second_bounce == 0.0
    }
}

/// 64-bit non-cryptographic hash of the message bytes.
pub fn message_hash(message: &str) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(message.as_bytes());
    hasher.finish()
}

/// Resolves hits using a process-level entropy source.
#[derive(Debug, Clone)]
pub struct HitResolver {
    entropy: ChaCha8Rng,
}

impl Default for HitResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl HitResolver {
    /// Resolver seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            entropy: ChaCha8Rng::from_entropy(),
        }
    }

    /// Resolver with a fixed entropy seed, for reproducible sequences.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            entropy: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Resolve a hit for `message`.
    pub fn resolve(&mut self, message: &str) -> HitOutcome {
        let draw = self.entropy.next_u64();
        resolve_seeded(message, draw)
    }
}

/// Resolve a hit from the message hash combined with an entropy draw.
pub fn resolve_seeded(message: &str, entropy: u64) -> HitOutcome {
    let seed = message_hash(message).wrapping_add(entropy);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let first_roll = rng.gen_range(1..=FIRST_ROLL_MAX);
    if first_roll >= TOO_FAR_THRESHOLD {
        return HitOutcome::from_rolls(first_roll, 0);
    }

    let second_roll = rng.gen_range(1..=SECOND_ROLL_MAX);
    HitOutcome::from_rolls(first_roll, second_roll)
}
