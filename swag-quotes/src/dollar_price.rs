//! Dollar denominated views of quotes and pools.

use ethers::types::U256;
use rust_decimal::Decimal;
use swag_core::error::Result;
use swag_core::exchange_rate::{
  dollar_price, dollarize, to_decimal, usd_exchange_rate,
};
use swag_core::trade::ReservePair;

use crate::market_snapshot::MarketSnapshot;
use crate::trade_context::TradeContext;

/// Dollar price of one swag token from its base pool.
#[must_use]
pub fn swag_dollar_price(pool: &ReservePair) -> Option<U256> {
  dollar_price(pool.token, pool.base)
}

/// Dollar value of one unit of the context's payment asset.
#[must_use]
pub fn payment_usd_rate(
  context: &TradeContext,
  snapshot: &MarketSnapshot,
) -> Option<U256> {
  if context.pays_with_base() {
    usd_exchange_rate(None)
  } else {
    let pool = snapshot.payment_pool?;
    usd_exchange_rate(Some((pool.base, pool.token)))
  }
}

/// Dollar value of `amount` of the payment asset, `None` while the rate is
/// unknown.
pub fn payment_in_dollars(
  context: &TradeContext,
  snapshot: &MarketSnapshot,
  amount: U256,
) -> Result<Option<Decimal>> {
  payment_usd_rate(context, snapshot)
    .map(|rate| dollarize(amount, rate).and_then(to_decimal))
    .transpose()
}

#[cfg(test)]
mod tests {
  use super::*;

  use std::str::FromStr;

  use ethers::types::Address;
  use swag_core::tokens::{Asset, SwagToken};
  use swag_core::util::one_token;

  #[test]
  fn swag_price_from_pool() {
    let pool = ReservePair::new(one_token() * 30, one_token() * 10);
    assert_eq!(swag_dollar_price(&pool), Some(one_token() * 3));
  }

  #[test]
  fn token_payment_is_priced_through_its_pool() {
    let base = Address::repeat_byte(1);
    let context = TradeContext::new(
      SwagToken::Alvin,
      Asset::Erc20(Address::repeat_byte(2)),
      base,
    );
    let mut snapshot = MarketSnapshot::default();
    assert_eq!(
      payment_in_dollars(&context, &snapshot, one_token()),
      Ok(None)
    );

    // one payment token trades for half a base token
    snapshot.payment_pool =
      Some(ReservePair::new(one_token() * 50, one_token() * 100));
    assert_eq!(
      payment_in_dollars(&context, &snapshot, one_token() * 4),
      Ok(Some(Decimal::from_str("2").unwrap()))
    );
  }
}
