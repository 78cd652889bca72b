use ethers::types::{U256, U512};
use serde::{Deserialize, Serialize};

use crate::error::CoreError::Arithmetic;
use crate::error::Result;
use crate::util::BPS_DENOMINATOR;

/// Tolerated price movement between quote and execution, 2%.
pub const ALLOWED_SLIPPAGE_BPS: u64 = 200;

/// Worst acceptable execution band around a quoted amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlippageBounds {
  pub minimum: U256,
  pub maximum: U256,
}

impl SlippageBounds {
  /// Bounds at the default [`ALLOWED_SLIPPAGE_BPS`].
  pub fn new(value: U256) -> Result<SlippageBounds> {
    SlippageBounds::with_tolerance(value, ALLOWED_SLIPPAGE_BPS)
  }

  /// Computes `value ± value * bps / 10000`, clamped to `[0, U256::MAX]`.
  pub fn with_tolerance(value: U256, bps: u64) -> Result<SlippageBounds> {
    let offset = value.full_mul(U256::from(bps)) / U512::from(BPS_DENOMINATOR);
    let offset = U256::try_from(offset).map_err(|_| Arithmetic)?;
    Ok(SlippageBounds {
      minimum: value.saturating_sub(offset),
      maximum: value.saturating_add(offset),
    })
  }

  /// Whether an executed amount falls inside the band.
  #[must_use]
  pub fn contains(&self, amount: U256) -> bool {
    amount >= self.minimum && amount <= self.maximum
  }
}
