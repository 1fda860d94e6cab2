//! Fault injection for the behavioral multiplier.
//!
//! A checker that never fails proves nothing. These modes make the
//! behavioral DUT misbehave in specific, recognizable ways so the scoreboard's
//! mismatch and protocol-violation paths can be exercised end to end.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Deliberate defect injected into [`PipelinedMultiplier`](super::PipelinedMultiplier).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultMode {
    /// Correct behavior.
    #[default]
    None,
    /// Denormal operands and results are replaced by signed zero.
    FlushDenormals,
    /// Infinity × zero returns zero instead of NaN.
    InvalidAsZero,
    /// Every result has its sign bit inverted.
    SignFlip,
    /// Two operations in flight together complete in reverse order.
    SwapAdjacent,
    /// Every n-th result never raises `done`.
    DropEvery(u32),
}

impl fmt::Display for FaultMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::FlushDenormals => f.write_str("flush-denormals"),
            Self::InvalidAsZero => f.write_str("invalid-as-zero"),
            Self::SignFlip => f.write_str("sign-flip"),
            Self::SwapAdjacent => f.write_str("swap-adjacent"),
            Self::DropEvery(n) => write!(f, "drop-every:{n}"),
        }
    }
}

impl FromStr for FaultMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_ascii_lowercase().replace('_', "-");
        if let Some(n) = normalized.strip_prefix("drop-every:") {
            return match n.parse::<u32>() {
                Ok(n) if n > 0 => Ok(Self::DropEvery(n)),
                _ => Err(format!("drop-every needs a positive period, got '{n}'")),
            };
        }
        match normalized.as_str() {
            "none" => Ok(Self::None),
            "flush-denormals" => Ok(Self::FlushDenormals),
            "invalid-as-zero" => Ok(Self::InvalidAsZero),
            "sign-flip" => Ok(Self::SignFlip),
            "swap-adjacent" => Ok(Self::SwapAdjacent),
            _ => Err(format!(
                "unknown fault '{s}' (expected none, flush-denormals, invalid-as-zero, \
                 sign-flip, swap-adjacent or drop-every:N)"
            )),
        }
    }
}
