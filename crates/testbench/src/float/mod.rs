//! IEEE-754 binary32 value representation.
//!
//! [`FloatValue`] is the semantic view of the 32-bit words exchanged with the
//! device under test. Each value carries its category tag alongside the raw
//! sign, exponent and mantissa fields:
//!
//! | Category   | Biased exponent | Mantissa  |
//! |------------|-----------------|-----------|
//! | Zero       | 0               | 0         |
//! | Denormal   | 0               | nonzero   |
//! | Normal     | 1..=254         | any       |
//! | Infinity   | 255             | 0         |
//! | NaN        | 255             | nonzero   |
//!
//! The fields are private. Every constructor either derives the category from
//! the encoding or validates the requested fields, so the tag and the bits can
//! never disagree.
//!
//! Submodules:
//! - [`nan_handling`]: canonical NaN, signaling detection and NaN-aware equality.

/// Canonical NaN, signaling detection and NaN-equivalence.
pub mod nan_handling;

use std::fmt;

use serde::Serialize;

use crate::common::FloatError;
use crate::common::constants::{
    EXPONENT_MAX, EXPONENT_SHIFT, MANTISSA_MASK, MAX_NORMAL_EXPONENT, MIN_NORMAL_EXPONENT,
    SIGN_MASK,
};

/// Classification of a binary32 encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FloatCategory {
    /// Normalized number with an implicit leading one.
    Normal,
    /// Subnormal number (biased exponent zero, nonzero mantissa).
    Denormal,
    /// Signed zero.
    Zero,
    /// Signed infinity.
    Infinity,
    /// Not-a-number, quiet or signaling, any payload.
    Nan,
}

impl FloatCategory {
    /// Derives the category from a biased exponent and mantissa.
    const fn classify(exponent: u8, mantissa: u32) -> Self {
        match (exponent, mantissa) {
            (0, 0) => Self::Zero,
            (0, _) => Self::Denormal,
            (0xFF, 0) => Self::Infinity,
            (0xFF, _) => Self::Nan,
            _ => Self::Normal,
        }
    }
}

impl fmt::Display for FloatCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Normal => "normal",
            Self::Denormal => "denormal",
            Self::Zero => "zero",
            Self::Infinity => "infinity",
            Self::Nan => "nan",
        };
        f.write_str(name)
    }
}

/// A binary32 floating-point value tagged with its category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct FloatValue {
    category: FloatCategory,
    sign: bool,
    exponent: u8,
    mantissa: u32,
}

impl FloatValue {
    /// Decodes a 32-bit wire encoding.
    ///
    /// Total: every bit pattern decodes to exactly one value.
    pub const fn from_bits(bits: u32) -> Self {
        let sign = bits & SIGN_MASK != 0;
        let exponent = ((bits >> EXPONENT_SHIFT) & EXPONENT_MAX) as u8;
        let mantissa = bits & MANTISSA_MASK;
        Self {
            category: FloatCategory::classify(exponent, mantissa),
            sign,
            exponent,
            mantissa,
        }
    }

    /// Encodes the value into its 32-bit wire format.
    pub const fn to_bits(self) -> u32 {
        let sign = if self.sign { SIGN_MASK } else { 0 };
        sign | ((self.exponent as u32) << EXPONENT_SHIFT) | self.mantissa
    }

    /// Converts from a native `f32`, preserving the exact encoding.
    pub const fn from_f32(value: f32) -> Self {
        Self::from_bits(value.to_bits())
    }

    /// Converts to a native `f32` with the same encoding.
    pub const fn to_f32(self) -> f32 {
        f32::from_bits(self.to_bits())
    }

    /// Signed zero.
    pub const fn zero(sign: bool) -> Self {
        Self {
            category: FloatCategory::Zero,
            sign,
            exponent: 0,
            mantissa: 0,
        }
    }

    /// Signed infinity.
    pub const fn infinity(sign: bool) -> Self {
        Self {
            category: FloatCategory::Infinity,
            sign,
            exponent: 0xFF,
            mantissa: 0,
        }
    }

    /// A NaN with the given 23-bit payload.
    ///
    /// # Errors
    ///
    /// Returns [`FloatError::ZeroNanPayload`] for a zero payload (that
    /// encoding is infinity) and [`FloatError::MantissaTooWide`] when the
    /// payload exceeds 23 bits.
    pub const fn nan(sign: bool, payload: u32) -> Result<Self, FloatError> {
        if payload & !MANTISSA_MASK != 0 {
            return Err(FloatError::MantissaTooWide(payload));
        }
        if payload == 0 {
            return Err(FloatError::ZeroNanPayload);
        }
        Ok(Self {
            category: FloatCategory::Nan,
            sign,
            exponent: 0xFF,
            mantissa: payload,
        })
    }

    /// A normal number from its raw fields.
    ///
    /// # Errors
    ///
    /// Returns [`FloatError::ExponentOutOfRange`] unless `exponent` is in
    /// `1..=254`, and [`FloatError::MantissaTooWide`] for an oversized mantissa.
    pub const fn normal(sign: bool, exponent: u8, mantissa: u32) -> Result<Self, FloatError> {
        if mantissa & !MANTISSA_MASK != 0 {
            return Err(FloatError::MantissaTooWide(mantissa));
        }
        if exponent < MIN_NORMAL_EXPONENT || exponent > MAX_NORMAL_EXPONENT {
            return Err(FloatError::ExponentOutOfRange(exponent));
        }
        Ok(Self {
            category: FloatCategory::Normal,
            sign,
            exponent,
            mantissa,
        })
    }

    /// A denormal number from its mantissa.
    ///
    /// # Errors
    ///
    /// Returns [`FloatError::ZeroDenormalMantissa`] for a zero mantissa and
    /// [`FloatError::MantissaTooWide`] for an oversized one.
    pub const fn denormal(sign: bool, mantissa: u32) -> Result<Self, FloatError> {
        if mantissa & !MANTISSA_MASK != 0 {
            return Err(FloatError::MantissaTooWide(mantissa));
        }
        if mantissa == 0 {
            return Err(FloatError::ZeroDenormalMantissa);
        }
        Ok(Self {
            category: FloatCategory::Denormal,
            sign,
            exponent: 0,
            mantissa,
        })
    }

    /// Category tag.
    pub const fn category(self) -> FloatCategory {
        self.category
    }

    /// Sign bit (`true` for negative).
    pub const fn sign(self) -> bool {
        self.sign
    }

    /// Biased exponent field.
    pub const fn exponent(self) -> u8 {
        self.exponent
    }

    /// 23-bit mantissa field.
    pub const fn mantissa(self) -> u32 {
        self.mantissa
    }

    /// Returns true for any NaN encoding.
    pub const fn is_nan(self) -> bool {
        matches!(self.category, FloatCategory::Nan)
    }

    /// Returns true for either signed zero.
    pub const fn is_zero(self) -> bool {
        matches!(self.category, FloatCategory::Zero)
    }

    /// Returns true for either signed infinity.
    pub const fn is_infinite(self) -> bool {
        matches!(self.category, FloatCategory::Infinity)
    }

    /// Returns true for zero, denormal and normal values.
    pub const fn is_finite(self) -> bool {
        matches!(
            self.category,
            FloatCategory::Zero | FloatCategory::Denormal | FloatCategory::Normal
        )
    }

    /// Same magnitude with the given sign.
    ///
    /// The category is unaffected by the sign bit.
    pub const fn with_sign(self, sign: bool) -> Self {
        Self { sign, ..self }
    }
}

impl From<f32> for FloatValue {
    fn from(value: f32) -> Self {
        Self::from_f32(value)
    }
}

impl From<u32> for FloatValue {
    fn from(bits: u32) -> Self {
        Self::from_bits(bits)
    }
}

impl From<FloatValue> for u32 {
    fn from(value: FloatValue) -> Self {
        value.to_bits()
    }
}

impl fmt::Display for FloatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.category {
            FloatCategory::Nan => write!(f, "{:#010x} (nan)", self.to_bits()),
            category => write!(
                f,
                "{:#010x} ({category} {:e})",
                self.to_bits(),
                self.to_f32()
            ),
        }
    }
}
