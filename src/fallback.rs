//! Local fallback code generation.
//!
//! When the remote allocator is unreachable (or the controller is not
//! connected), a code is drawn uniformly at random. `0000`, `7000` and
//! `1000` are never drawn: they mean unassigned, VFR and Mode-S, and the
//! collector does not report them as collisions. This is a last resort:
//! there is **no** collision check against codes already in use, and two
//! calls may return the same code.
//!
//! The generator is seeded once, at construction, and shared behind a lock
//! so concurrent callers do not reseed per call.
//!
//! ```rust
//! use neo_ccams::fallback::FallbackGenerator;
//!
//! let generator = FallbackGenerator::from_seed(7);
//! let code = generator.generate();
//! assert!(!code.is_conspicuity());
//! assert!(code.as_str().chars().all(|c| ('0'..='7').contains(&c)));
//! ```

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::squawk::{SquawkCode, SQUAWK_LEN};

/// Uniform random squawk code generator.
#[derive(Debug)]
pub struct FallbackGenerator {
    rng: Mutex<StdRng>,
}

impl Default for FallbackGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl FallbackGenerator {
    /// Generator seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Generator with a fixed seed (reproducible sequence).
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Generator seeded from `seed` if given, entropy otherwise.
    pub fn with_optional_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::new, Self::from_seed)
    }

    /// Draw a code with four independent digits in `0..=7`.
    ///
    /// Conspicuity codes are redrawn.
    pub fn generate(&self) -> SquawkCode {
        let mut rng = self.rng.lock();
        loop {
            let mut digits = [0u8; SQUAWK_LEN];
            for d in &mut digits {
                *d = rng.gen_range(0..8);
            }
            match SquawkCode::from_digits(digits) {
                Some(code) if !code.is_conspicuity() => return code,
                _ => continue,
            }
        }
    }
}
