//! Reference (golden) multiply model.
//!
//! This module computes the result the device under test is expected to
//! produce for an operand pair, independently of the DUT. The special cases
//! are resolved in this order:
//!
//! 1. Any NaN operand yields the canonical quiet NaN (NV if signaling).
//! 2. Infinity × zero yields the canonical quiet NaN and raises NV.
//! 3. Infinity × anything else yields infinity with sign = XOR of the signs.
//! 4. Zero × finite yields zero with sign = XOR of the signs.
//! 5. Otherwise the exact binary64 product is rounded to binary32 in the
//!    configured mode, with gradual underflow into the denormal range.
//!
//! Submodules:
//! - [`rounding_modes`]: rounding attribute and exact-to-binary32 rounding.
//! - [`exception_flags`]: the accrued exception flag word.

/// Rounding mode definitions and support.
pub mod rounding_modes;

/// Floating-point exception flag types.
pub mod exception_flags;

use self::exception_flags::FpFlags;
use self::rounding_modes::RoundingMode;
use crate::float::FloatValue;
use crate::float::nan_handling::{canonical_nan, is_signaling};

/// 2^128: the smallest magnitude that overflows binary32 in every rounding mode.
const TWO_POW_128: f64 = f64::from_bits(0x47F0_0000_0000_0000);

/// Smallest positive normal binary32 magnitude, as binary64.
const MIN_NORMAL: f64 = f32::MIN_POSITIVE as f64;

/// Golden IEEE-754 binary32 multiplier.
///
/// Pure and deterministic: the same operands and rounding mode always give the
/// same result, and no operand pair produces an error.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReferenceModel {
    rounding: RoundingMode,
}

impl ReferenceModel {
    /// Creates a model rounding in the given mode.
    pub const fn new(rounding: RoundingMode) -> Self {
        Self { rounding }
    }

    /// Rounding mode applied to inexact products.
    pub const fn rounding(&self) -> RoundingMode {
        self.rounding
    }

    /// Computes `a × b`.
    ///
    /// # Examples
    ///
    /// ```
    /// use fpmul_tb::float::FloatValue;
    /// use fpmul_tb::model::ReferenceModel;
    ///
    /// let model = ReferenceModel::default();
    /// let product = model.compute(FloatValue::from_f32(2.5), FloatValue::from_f32(-4.0));
    /// assert_eq!(product.to_f32(), -10.0);
    ///
    /// let invalid = model.compute(FloatValue::infinity(false), FloatValue::zero(true));
    /// assert!(invalid.is_nan());
    /// ```
    pub fn compute(&self, a: FloatValue, b: FloatValue) -> FloatValue {
        self.compute_with_flags(a, b).0
    }

    /// Computes `a × b` and the exception flags the operation raises.
    pub fn compute_with_flags(&self, a: FloatValue, b: FloatValue) -> (FloatValue, FpFlags) {
        let mut flags = FpFlags::NONE;
        if is_signaling(a) || is_signaling(b) {
            flags |= FpFlags::NV;
        }
        if a.is_nan() || b.is_nan() {
            return (canonical_nan(), flags);
        }

        let sign = a.sign() ^ b.sign();
        if (a.is_infinite() && b.is_zero()) || (a.is_zero() && b.is_infinite()) {
            return (canonical_nan(), flags | FpFlags::NV);
        }
        if a.is_infinite() || b.is_infinite() {
            return (FloatValue::infinity(sign), flags);
        }
        if a.is_zero() || b.is_zero() {
            return (FloatValue::zero(sign), flags);
        }

        // Both operands finite and nonzero: the binary64 product is exact.
        let exact = f64::from(a.to_f32()) * f64::from(b.to_f32());
        let rounded = self.rounding.round_to_f32(exact);
        let result = FloatValue::from_f32(rounded);

        let overflow = result.is_infinite() || exact.abs() >= TWO_POW_128;
        let inexact = overflow || f64::from(rounded) != exact;
        if overflow {
            flags |= FpFlags::OF;
        }
        if inexact {
            flags |= FpFlags::NX;
            if exact.abs() < MIN_NORMAL {
                flags |= FpFlags::UF;
            }
        }
        (result, flags)
    }
}

/// Computes `a × b` with round-to-nearest-even.
///
/// Shorthand for `ReferenceModel::default().compute(a, b)`.
pub fn compute(a: FloatValue, b: FloatValue) -> FloatValue {
    ReferenceModel::default().compute(a, b)
}
