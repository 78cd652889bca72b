//! Pool-implied exchange rates and dollar prices.
//!
//! Rates are 18-decimal fixed point numbers. Both sides of every pool use
//! 18 decimals, so the decimal adjustment factor is always one.

use ethers::types::{U256, U512};
use rust_decimal::Decimal;

use crate::error::CoreError::Arithmetic;
use crate::error::Result;
use crate::util::{one_token, TOKEN_DECIMALS};

fn mul_div(a: U256, b: U256, denominator: U256) -> Result<U256> {
  if denominator.is_zero() {
    return Err(Arithmetic);
  }
  U256::try_from(a.full_mul(b) / U512::from(denominator))
    .map_err(|_| Arithmetic)
}

/// Units of `output` per unit of `input`, `output * 10^18 / input`.
///
/// `None` while either side is zero, i.e. the pool is empty or not loaded.
#[must_use]
pub fn exchange_rate(input: U256, output: U256) -> Option<U256> {
  if input.is_zero() || output.is_zero() {
    None
  } else {
    mul_div(output, one_token(), input).ok()
  }
}

/// Inverse of [`exchange_rate`], `input * 10^18 / output`.
#[must_use]
pub fn inverted_exchange_rate(input: U256, output: U256) -> Option<U256> {
  exchange_rate(output, input)
}

/// Dollar value of one unit of the selected payment asset.
///
/// The base asset is a dollar stablecoin, so paying with it (or the native
/// coin it wraps) is worth exactly one dollar. Any other token is priced
/// through its base pool.
#[must_use]
pub fn usd_exchange_rate(
  token_pool: Option<(U256, U256)>,
) -> Option<U256> {
  match token_pool {
    None => Some(one_token()),
    Some((reserve_base, reserve_token)) => {
      let rate = exchange_rate(reserve_base, reserve_token)?;
      mul_div(one_token(), one_token(), rate).ok()
    }
  }
}

/// Dollar price of a swag token from its base pool reserves.
#[must_use]
pub fn dollar_price(reserve_token: U256, reserve_base: U256) -> Option<U256> {
  exchange_rate(reserve_token, reserve_base)
}

/// Converts an amount of the payment asset into dollars.
pub fn dollarize(amount: U256, usd_rate: U256) -> Result<U256> {
  mul_div(amount, usd_rate, one_token())
}

/// Reward tokens released per second by a staking drip.
#[must_use]
pub fn drip_rate(supply: U256, active_time: U256) -> Option<U256> {
  supply.checked_div(active_time)
}

/// Renders an 18-decimal fixed point value as a [`Decimal`].
///
/// Values beyond `Decimal`'s 96-bit mantissa are reported as arithmetic
/// errors rather than rounded.
pub fn to_decimal(value: U256) -> Result<Decimal> {
  if value.bits() > 96 {
    return Err(Arithmetic);
  }
  let mantissa = i128::try_from(value.as_u128()).map_err(|_| Arithmetic)?;
  Decimal::try_from_i128_with_scale(mantissa, TOKEN_DECIMALS)
    .map(|d| d.normalize())
    .map_err(|_| Arithmetic)
}
