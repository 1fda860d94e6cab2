//! NaN handling for the reference model and the scoreboard.
//!
//! IEEE-754 does not define a single NaN bit pattern. The hardware under test
//! is free to return any NaN encoding, so:
//!
//! - **Canonical NaN** ([`canonical_nan`]): the reference model returns
//!   this single encoding (`0x7fc00000`) for every NaN result.
//! - **Equivalence** ([`nan_equivalent`]): the scoreboard treats any two NaN
//!   encodings as equal, regardless of sign and payload.
//! - **Signaling detection** ([`is_signaling`]): a NaN with the quiet bit
//!   clear raises the invalid-operation flag when consumed.

use super::FloatValue;
use crate::common::constants::{CANONICAL_NAN, QUIET_BIT};

/// The canonical quiet NaN (positive, quiet, zero payload).
#[inline]
pub const fn canonical_nan() -> FloatValue {
    FloatValue::from_bits(CANONICAL_NAN)
}

/// Returns true for a signaling NaN (quiet bit clear, nonzero payload).
#[inline]
pub const fn is_signaling(value: FloatValue) -> bool {
    value.is_nan() && value.mantissa() & QUIET_BIT == 0
}

/// Result equality used by the scoreboard.
///
/// Two values are equivalent if their encodings are bit-identical, or if both
/// are NaN (any payload, any sign).
#[inline]
pub const fn nan_equivalent(expected: FloatValue, actual: FloatValue) -> bool {
    (expected.is_nan() && actual.is_nan()) || expected.to_bits() == actual.to_bits()
}
