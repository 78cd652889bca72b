//! Gas limit margin and gas price markup applied to every submitted
//! transaction.
//!
//! The two adjustments are independent: the limit margin is expressed in
//! basis points of the estimate, the price markup in percent of the network
//! price.

use ethers::types::{U256, U512};

use crate::util::BPS_DENOMINATOR;

/// Extra gas on top of the node's estimate, 10%.
pub const GAS_MARGIN_BPS: u64 = 1_000;

/// Gas price paid relative to the current network price, 150%.
pub const GAS_PRICE_MARKUP_PERCENT: u64 = 150;

fn saturate(value: U512) -> U256 {
  U256::try_from(value).unwrap_or(U256::MAX)
}

/// Adds `margin_bps` of `gas` on top of itself.
#[must_use]
pub fn calculate_gas_margin(gas: U256, margin_bps: u64) -> U256 {
  let offset =
    gas.full_mul(U256::from(margin_bps)) / U512::from(BPS_DENOMINATOR);
  gas.saturating_add(saturate(offset))
}

/// Gas limit submitted for an estimate, using [`GAS_MARGIN_BPS`].
#[must_use]
pub fn gas_limit(estimate: U256) -> U256 {
  calculate_gas_margin(estimate, GAS_MARGIN_BPS)
}

/// Gas price submitted for the current network price.
#[must_use]
pub fn marked_up_gas_price(network_price: U256) -> U256 {
  saturate(
    network_price.full_mul(U256::from(GAS_PRICE_MARKUP_PERCENT))
      / U512::from(100u64),
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn ten_percent_limit_margin() {
    assert_eq!(gas_limit(U256::from(1000)), U256::from(1100));
    assert_eq!(gas_limit(U256::from(21_001)), U256::from(23_101));
  }

  #[test]
  fn price_markup() {
    let gwei = U256::exp10(9);
    assert_eq!(marked_up_gas_price(gwei * 20), gwei * 30);
    assert_eq!(marked_up_gas_price(U256::from(3)), U256::from(4));
  }

  #[test]
  fn margins_saturate() {
    assert_eq!(gas_limit(U256::MAX), U256::MAX);
    assert_eq!(marked_up_gas_price(U256::MAX), U256::MAX);
  }

  #[test]
  fn custom_margin() {
    assert_eq!(
      calculate_gas_margin(U256::from(200), 2_500),
      U256::from(250)
    );
  }
}
