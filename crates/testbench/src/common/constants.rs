//! Global Constants.
//!
//! This module defines the constants used across the harness. It includes:
//! 1. **Format Constants:** Field positions and masks of IEEE-754 binary32.
//! 2. **Special Encodings:** The canonical quiet NaN.
//! 3. **Simulation Constants:** The default clock period.

/// Bit mask for the sign bit (bit 31).
pub const SIGN_MASK: u32 = 0x8000_0000;

/// Bit position of the least significant exponent bit.
pub const EXPONENT_SHIFT: u32 = 23;

/// Mask for the biased exponent field after shifting.
pub const EXPONENT_MAX: u32 = 0xFF;

/// Mask for the 23-bit mantissa (fraction) field.
pub const MANTISSA_MASK: u32 = 0x007F_FFFF;

/// Quiet bit of a NaN mantissa (most significant fraction bit).
pub const QUIET_BIT: u32 = 0x0040_0000;

/// Smallest biased exponent of a normal number.
pub const MIN_NORMAL_EXPONENT: u8 = 1;

/// Largest biased exponent of a normal number.
pub const MAX_NORMAL_EXPONENT: u8 = 254;

/// Canonical quiet NaN (positive, quiet, zero payload).
pub const CANONICAL_NAN: u32 = 0x7FC0_0000;

/// Default clock period in picoseconds (100 MHz).
pub const DEFAULT_CLOCK_PERIOD_PS: u64 = 10_000;
