//! Buy and sell validation.
//!
//! Parsing and pricing failures are returned as errors. Balance, gas and
//! allowance shortfalls still produce a quote and are reported through
//! [`QuoteResult::error`], first failing check wins.

use ethers::types::U256;
use swag_core::amount::parse_amount;
use swag_core::error::CoreError::{
  InsufficientAllowance, InsufficientGasBalance, InsufficientTokenBalance,
  InvalidTrade,
};
use swag_core::error::{CoreError, Result};
use swag_core::slippage::SlippageBounds;
use swag_core::trade::{calculate_amount, TradeSide};
use swag_core::util::one_token;

use crate::market_snapshot::MarketSnapshot;
use crate::trade_context::TradeContext;

/// Native balance below which a buy is flagged, 0.01.
#[must_use]
pub fn buy_gas_floor() -> U256 {
  one_token() / 100
}

/// Native balance below which a sell is flagged, 0.001.
#[must_use]
pub fn sell_gas_floor() -> U256 {
  one_token() / 1000
}

/// Sized trade plus the first non-breaking validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteResult {
  pub input_value: U256,
  pub output_value: U256,
  /// Maximum input for a buy, minimum output for a sell.
  pub bound: U256,
  pub error: Option<CoreError>,
}

/// `Some(error)` when a known value is below `required`. Unknown values
/// pass.
fn shortfall(
  available: Option<U256>,
  required: U256,
  error: CoreError,
) -> Option<CoreError> {
  available.filter(|value| *value < required).map(|_| error)
}

/// Quotes buying `amount` swag tokens with the context's payment asset.
///
/// # Errors
/// - `InvalidAmount` when `amount` does not parse
/// - `InvalidTrade` when reserves are missing or the trade is out of range
pub fn validate_buy(
  context: &TradeContext,
  amount: &str,
  snapshot: &MarketSnapshot,
) -> Result<QuoteResult> {
  let output_value = parse_amount(amount)?;
  let swag_pool = snapshot.swag_pool.ok_or(InvalidTrade)?;
  let route = snapshot.route(context)?;
  let input_value =
    calculate_amount(TradeSide::Buy, output_value, &swag_pool, &route)?;
  let SlippageBounds { maximum, .. } =
    SlippageBounds::with_tolerance(input_value, context.slippage_bps)?;

  // native payments need no approval
  let allowance = context.payment_token().and_then(|_| {
    shortfall(snapshot.payment_allowance, maximum, InsufficientAllowance)
  });
  let error = [
    shortfall(
      snapshot.native_balance,
      buy_gas_floor(),
      InsufficientGasBalance,
    ),
    shortfall(snapshot.payment_balance, maximum, InsufficientTokenBalance),
    allowance,
  ]
  .into_iter()
  .flatten()
  .next();

  Ok(QuoteResult {
    input_value,
    output_value,
    bound: maximum,
    error,
  })
}

/// Quotes selling `amount` swag tokens for the context's payment asset.
///
/// # Errors
/// - `InvalidAmount` when `amount` does not parse
/// - `InvalidTrade` when reserves are missing or the trade is out of range
pub fn validate_sell(
  context: &TradeContext,
  amount: &str,
  snapshot: &MarketSnapshot,
) -> Result<QuoteResult> {
  let input_value = parse_amount(amount)?;
  let swag_pool = snapshot.swag_pool.ok_or(InvalidTrade)?;
  let route = snapshot.route(context)?;
  let output_value =
    calculate_amount(TradeSide::Sell, input_value, &swag_pool, &route)?;
  let SlippageBounds { minimum, .. } =
    SlippageBounds::with_tolerance(output_value, context.slippage_bps)?;

  let error = [
    shortfall(
      snapshot.native_balance,
      sell_gas_floor(),
      InsufficientGasBalance,
    ),
    shortfall(snapshot.swag_balance, input_value, InsufficientTokenBalance),
    shortfall(snapshot.swag_allowance, input_value, InsufficientAllowance),
  ]
  .into_iter()
  .flatten()
  .next();

  Ok(QuoteResult {
    input_value,
    output_value,
    bound: minimum,
    error,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  use ethers::types::Address;
  use swag_core::error::CoreError::InvalidAmount;
  use swag_core::tokens::{Asset, SwagToken};
  use swag_core::trade::ReservePair;

  fn native() -> TradeContext {
    TradeContext::new(SwagToken::Alvin, Asset::Native, Address::repeat_byte(1))
  }

  fn pool() -> Option<ReservePair> {
    Some(ReservePair::new(one_token() * 1000, one_token() * 1000))
  }

  #[test]
  fn buy_without_account_data_has_no_error() {
    let snapshot = MarketSnapshot {
      swag_pool: pool(),
      ..MarketSnapshot::default()
    };
    let quote = validate_buy(&native(), "10", &snapshot).unwrap();
    assert_eq!(quote.output_value, one_token() * 10);
    assert!(quote.input_value > quote.output_value);
    assert!(quote.bound > quote.input_value);
    assert_eq!(quote.error, None);
  }

  #[test]
  fn unparsable_amount_is_an_error() {
    let snapshot = MarketSnapshot {
      swag_pool: pool(),
      ..MarketSnapshot::default()
    };
    assert_eq!(
      validate_buy(&native(), "ten", &snapshot),
      Err(InvalidAmount)
    );
    assert_eq!(validate_sell(&native(), "", &snapshot), Err(InvalidAmount));
  }

  #[test]
  fn missing_reserves_is_invalid_trade() {
    let snapshot = MarketSnapshot::default();
    assert_eq!(validate_buy(&native(), "1", &snapshot), Err(InvalidTrade));
  }

  #[test]
  fn gas_check_comes_first() {
    let snapshot = MarketSnapshot {
      swag_pool: pool(),
      native_balance: Some(U256::zero()),
      payment_balance: Some(U256::zero()),
      ..MarketSnapshot::default()
    };
    let quote = validate_buy(&native(), "1", &snapshot).unwrap();
    assert_eq!(quote.error, Some(InsufficientGasBalance));
  }

  #[test]
  fn sell_floors_differ_from_buy() {
    let balance = one_token() / 200;
    let snapshot = MarketSnapshot {
      swag_pool: pool(),
      native_balance: Some(balance),
      swag_balance: Some(one_token() * 5),
      swag_allowance: Some(U256::MAX),
      ..MarketSnapshot::default()
    };
    let sell = validate_sell(&native(), "1", &snapshot).unwrap();
    assert_eq!(sell.error, None);
    let buy = validate_buy(&native(), "1", &snapshot).unwrap();
    assert_eq!(buy.error, Some(InsufficientGasBalance));
  }
}
