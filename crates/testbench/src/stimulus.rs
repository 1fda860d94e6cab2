//! Randomized operand generation.
//!
//! Each generator method produces one [`FloatValue`] drawn from a single
//! category. The only state is a seeded ChaCha stream, so a run is fully
//! reproducible from its seed and the generator can be invoked indefinitely.

use std::fmt;
use std::str::FromStr;

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::common::constants::{
    EXPONENT_MAX, EXPONENT_SHIFT, MANTISSA_MASK, MAX_NORMAL_EXPONENT, MIN_NORMAL_EXPONENT,
    SIGN_MASK,
};
use crate::float::FloatValue;

/// Operand category a generator is biased towards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StimulusKind {
    /// Uniformly random 32-bit pattern (any category).
    Random,
    /// Normal number, uniform over exponent and mantissa.
    Normal,
    /// NaN with a random payload, quiet or signaling.
    Nan,
    /// Denormal number.
    Denormal,
    /// Signed zero.
    Zero,
    /// Signed infinity.
    Infinity,
}

impl StimulusKind {
    /// All kinds, in test-matrix order.
    pub const ALL: [Self; 6] = [
        Self::Random,
        Self::Normal,
        Self::Nan,
        Self::Denormal,
        Self::Zero,
        Self::Infinity,
    ];

    /// Short lowercase name used in case names and on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Normal => "normal",
            Self::Nan => "nan",
            Self::Denormal => "denormal",
            Self::Zero => "zero",
            Self::Infinity => "infinity",
        }
    }
}

impl fmt::Display for StimulusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StimulusKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "unknown stimulus kind '{s}' \
                     (expected random, normal, nan, denormal, zero or infinity)"
                )
            })
    }
}

/// Seeded source of random floating-point operands.
#[derive(Debug, Clone)]
pub struct StimulusGenerator {
    rng: ChaCha8Rng,
}

impl StimulusGenerator {
    /// Creates a generator whose stream is determined by `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Draws one value of the requested kind.
    pub fn generate(&mut self, kind: StimulusKind) -> FloatValue {
        match kind {
            StimulusKind::Random => self.random_float(),
            StimulusKind::Normal => self.random_normal(),
            StimulusKind::Nan => self.random_nan(),
            StimulusKind::Denormal => self.random_denormal(),
            StimulusKind::Zero => self.random_zero(),
            StimulusKind::Infinity => self.random_infinity(),
        }
    }

    /// Draws an operand pair, `a` from `a_kind` and `b` from `b_kind`.
    pub fn generate_pair(
        &mut self,
        a_kind: StimulusKind,
        b_kind: StimulusKind,
    ) -> (FloatValue, FloatValue) {
        let a = self.generate(a_kind);
        let b = self.generate(b_kind);
        (a, b)
    }

    /// Any 32-bit pattern, uniformly.
    pub fn random_float(&mut self) -> FloatValue {
        FloatValue::from_bits(self.rng.next_u32())
    }

    /// A normal number with uniform exponent and mantissa.
    pub fn random_normal(&mut self) -> FloatValue {
        let exponent = self
            .rng
            .gen_range(u32::from(MIN_NORMAL_EXPONENT)..=u32::from(MAX_NORMAL_EXPONENT));
        let mantissa = self.rng.gen_range(0..=MANTISSA_MASK);
        self.assemble(exponent, mantissa)
    }

    /// A NaN with a nonzero random payload.
    pub fn random_nan(&mut self) -> FloatValue {
        let payload = self.rng.gen_range(1..=MANTISSA_MASK);
        self.assemble(EXPONENT_MAX, payload)
    }

    /// A denormal number with a nonzero random mantissa.
    pub fn random_denormal(&mut self) -> FloatValue {
        let mantissa = self.rng.gen_range(1..=MANTISSA_MASK);
        self.assemble(0, mantissa)
    }

    /// A zero of random sign.
    pub fn random_zero(&mut self) -> FloatValue {
        self.assemble(0, 0)
    }

    /// An infinity of random sign.
    pub fn random_infinity(&mut self) -> FloatValue {
        self.assemble(EXPONENT_MAX, 0)
    }

    /// Packs the fields with a random sign. Callers keep `exponent` and
    /// `mantissa` inside the ranges of the category they want.
    fn assemble(&mut self, exponent: u32, mantissa: u32) -> FloatValue {
        let sign = if self.rng.gen_bool(0.5) { SIGN_MASK } else { 0 };
        FloatValue::from_bits(sign | (exponent << EXPONENT_SHIFT) | mantissa)
    }
}
