//! Rounding mode support for the reference model.
//!
//! IEEE-754 defines five rounding attributes:
//!
//! | Mode | Description                             |
//! |------|-----------------------------------------|
//! | RNE  | Round to Nearest, ties to Even          |
//! | RTZ  | Round towards Zero                      |
//! | RDN  | Round Down (towards −∞)                 |
//! | RUP  | Round Up (towards +∞)                   |
//! | RMM  | Round to Nearest, ties to Max Magnitude |
//!
//! The product of two binary32 values is always exact in binary64 (48
//! significand bits, exponent range well inside binary64's), so rounding the
//! binary64 product once in the requested mode yields a correctly rounded
//! binary32 result.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// IEEE-754 rounding mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundingMode {
    /// Round to Nearest, ties to Even (default IEEE mode).
    #[default]
    #[serde(alias = "RNE")]
    Rne,
    /// Round towards Zero.
    #[serde(alias = "RTZ")]
    Rtz,
    /// Round Down (towards −∞).
    #[serde(alias = "RDN")]
    Rdn,
    /// Round Up (towards +∞).
    #[serde(alias = "RUP")]
    Rup,
    /// Round to Nearest, ties to Max Magnitude.
    #[serde(alias = "RMM")]
    Rmm,
}

impl RoundingMode {
    /// All modes in encoding order.
    pub const ALL: [Self; 5] = [Self::Rne, Self::Rtz, Self::Rdn, Self::Rup, Self::Rmm];

    /// Rounds an exact binary64 value to binary32.
    ///
    /// `exact` must be the exact mathematical result (as it is for a
    /// binary32 product); NaN and infinity pass through.
    pub fn round_to_f32(self, exact: f64) -> f32 {
        let nearest = exact as f32;
        if self == Self::Rne || exact.is_nan() || exact.is_infinite() {
            return nearest;
        }
        if f64::from(nearest) == exact {
            return nearest;
        }

        // `nearest` is one of the two binary32 neighbours of `exact`.
        let (down, up) = if f64::from(nearest) < exact {
            (nearest, next_up(nearest))
        } else {
            (next_down(nearest), nearest)
        };

        match self {
            Self::Rne => nearest,
            Self::Rtz => {
                if exact > 0.0 {
                    down
                } else {
                    up
                }
            }
            Self::Rdn => down,
            Self::Rup => up,
            Self::Rmm => {
                // Overflow thresholds of RMM and RNE coincide: f32::MAX has an
                // odd significand, so the tie above it rounds away in both.
                if nearest.is_infinite() {
                    return nearest;
                }
                let below = exact - f64::from(down);
                let above = f64::from(up) - exact;
                if below < above {
                    down
                } else if above < below {
                    up
                } else if exact > 0.0 {
                    up
                } else {
                    down
                }
            }
        }
    }
}

/// Next representable binary32 towards +∞.
fn next_up(x: f32) -> f32 {
    if x.is_nan() || x == f32::INFINITY {
        return x;
    }
    if x == 0.0 {
        return f32::from_bits(1);
    }
    let bits = x.to_bits();
    if x > 0.0 {
        f32::from_bits(bits + 1)
    } else {
        f32::from_bits(bits - 1)
    }
}

/// Next representable binary32 towards −∞.
fn next_down(x: f32) -> f32 {
    -next_up(-x)
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Rne => "rne",
            Self::Rtz => "rtz",
            Self::Rdn => "rdn",
            Self::Rup => "rup",
            Self::Rmm => "rmm",
        };
        f.write_str(name)
    }
}

impl FromStr for RoundingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!("unknown rounding mode '{s}' (expected rne, rtz, rdn, rup or rmm)")
            })
    }
}
