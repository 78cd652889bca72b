//! Sizes swag token trades against the base pool, optionally routing the
//! payment side through a second pool.

use ethers::types::U256;
use serde::{Deserialize, Serialize};

use crate::amm_math::{input_from_output, output_from_input};
use crate::error::CoreError::InvalidTrade;
use crate::error::Result;

/// Point-in-time reserves of a token/base pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservePair {
  pub base: U256,
  pub token: U256,
}

impl ReservePair {
  #[must_use]
  pub fn new(base: U256, token: U256) -> ReservePair {
    ReservePair { base, token }
  }
}

/// Direction of a trade from the swag token's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeSide {
  /// Exact swag output, payment asset input is computed.
  Buy,
  /// Exact swag input, payment asset output is computed.
  Sell,
}

/// How the payment side of a trade reaches the base asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentRoute {
  /// Paying with the base asset (or the native coin it wraps): one hop.
  Base,
  /// Paying with another token: two hops through its base pool.
  Token(ReservePair),
}

/// Rejects amounts a pool can never settle.
pub fn check_trade_amount(amount: U256) -> Result<U256> {
  if amount.is_zero() || amount == U256::MAX {
    Err(InvalidTrade)
  } else {
    Ok(amount)
  }
}

/// Computes the counter amount of a swag trade.
///
/// For a [`TradeSide::Buy`] `amount` is the swag output and the result is
/// the payment input; for a [`TradeSide::Sell`] `amount` is the swag input
/// and the result is the payment output. Multi-hop routes propagate the
/// intermediate base amount and range check every hop.
pub fn calculate_amount(
  side: TradeSide,
  amount: U256,
  swag_pool: &ReservePair,
  route: &PaymentRoute,
) -> Result<U256> {
  match (side, route) {
    (TradeSide::Buy, PaymentRoute::Base) => check_trade_amount(
      input_from_output(amount, swag_pool.base, swag_pool.token)?,
    ),
    (TradeSide::Sell, PaymentRoute::Base) => check_trade_amount(
      output_from_input(amount, swag_pool.token, swag_pool.base)?,
    ),
    (TradeSide::Buy, PaymentRoute::Token(payment_pool)) => {
      // base needed for the swag, then payment token needed for that base
      let base_needed = check_trade_amount(input_from_output(
        amount,
        swag_pool.base,
        swag_pool.token,
      )?)?;
      check_trade_amount(input_from_output(
        base_needed,
        payment_pool.token,
        payment_pool.base,
      )?)
    }
    (TradeSide::Sell, PaymentRoute::Token(payment_pool)) => {
      let base_received = check_trade_amount(output_from_input(
        amount,
        swag_pool.token,
        swag_pool.base,
      )?)?;
      check_trade_amount(output_from_input(
        base_received,
        payment_pool.base,
        payment_pool.token,
      )?)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn pool(base: u64, token: u64) -> ReservePair {
    ReservePair::new(U256::from(base), U256::from(token))
  }

  #[test]
  fn buy_with_base() {
    let amount = calculate_amount(
      TradeSide::Buy,
      U256::from(10),
      &pool(1000, 1000),
      &PaymentRoute::Base,
    );
    assert_eq!(amount, Ok(U256::from(11)));
  }

  #[test]
  fn sell_for_base() {
    let amount = calculate_amount(
      TradeSide::Sell,
      U256::from(10),
      &pool(1000, 1000),
      &PaymentRoute::Base,
    );
    assert_eq!(amount, Ok(U256::from(9)));
  }

  #[test]
  fn buy_with_token_chains_two_hops() {
    // 11 base needed, then 1000 * 11 * 1000 / ((2000 - 11) * 997) + 1 = 6
    let amount = calculate_amount(
      TradeSide::Buy,
      U256::from(10),
      &pool(1000, 1000),
      &PaymentRoute::Token(pool(2000, 1000)),
    );
    assert_eq!(amount, Ok(U256::from(6)));
  }

  #[test]
  fn sell_for_token_chains_two_hops() {
    // 9 base received, then 9 * 997 * 1000 / (2000 * 1000 + 9 * 997) = 4
    let amount = calculate_amount(
      TradeSide::Sell,
      U256::from(10),
      &pool(1000, 1000),
      &PaymentRoute::Token(pool(2000, 1000)),
    );
    assert_eq!(amount, Ok(U256::from(4)));
  }

  #[test]
  fn dust_sell_is_invalid() {
    // 1 * 997 * 1000 / (1000 * 1000 + 997) rounds to zero
    let amount = calculate_amount(
      TradeSide::Sell,
      U256::one(),
      &pool(1000, 1000),
      &PaymentRoute::Base,
    );
    assert_eq!(amount, Err(InvalidTrade));
  }

  #[test]
  fn buying_whole_reserve_is_invalid() {
    let amount = calculate_amount(
      TradeSide::Buy,
      U256::from(1000),
      &pool(1000, 1000),
      &PaymentRoute::Base,
    );
    assert_eq!(amount, Err(InvalidTrade));
  }

  #[test]
  fn range_check() {
    assert_eq!(check_trade_amount(U256::zero()), Err(InvalidTrade));
    assert_eq!(check_trade_amount(U256::MAX), Err(InvalidTrade));
    assert_eq!(check_trade_amount(U256::one()), Ok(U256::one()));
  }
}
