//! Constant product pool math with the 0.3% swap fee.
//!
//! Numerators reach roughly 522 bits (`input * 997 * reserve`), so
//! intermediates live in a 768-bit integer and results match unbounded
//! integer arithmetic whenever the final amount fits in 256 bits.

use ethers::types::U256;

use crate::error::CoreError::InvalidTrade;
use crate::error::Result;

pub use wide::U768;

mod wide {
  use uint::construct_uint;

  construct_uint! {
    /// Wide intermediate for pool products.
    pub struct U768(12);
  }
}

/// Fee-adjusted numerator of the pool fee, `997 / 1000`.
pub const FEE_NUMERATOR: u64 = 997;

/// Denominator of the pool fee.
pub const FEE_DENOMINATOR: u64 = 1000;

fn widen(value: U256) -> U768 {
  let mut bytes = [0u8; 32];
  value.to_little_endian(&mut bytes);
  U768::from_little_endian(&bytes)
}

fn narrow(value: U768) -> Result<U256> {
  if value.bits() > 256 {
    return Err(InvalidTrade);
  }
  let mut bytes = [0u8; 96];
  value.to_little_endian(&mut bytes);
  Ok(U256::from_little_endian(&bytes[..32]))
}

/// Amount of output token received for an exact input.
///
/// ```txt
///                input * 997 * output_reserve
/// output = -----------------------------------
///          input_reserve * 1000 + input * 997
/// ```
pub fn output_from_input(
  input: U256,
  input_reserve: U256,
  output_reserve: U256,
) -> Result<U256> {
  let input_with_fee = widen(input) * U768::from(FEE_NUMERATOR);
  let numerator = input_with_fee * widen(output_reserve);
  let denominator =
    widen(input_reserve) * U768::from(FEE_DENOMINATOR) + input_with_fee;
  if denominator.is_zero() {
    Err(InvalidTrade)
  } else {
    narrow(numerator / denominator)
  }
}

/// Amount of input token required for an exact output, rounded up by one
/// unit in the pool's favour.
///
/// ```txt
///              input_reserve * output * 1000
/// input = ------------------------------------- + 1
///         (output_reserve - output) * 997
/// ```
///
/// Draining the whole output reserve (or more) is not a valid trade.
pub fn input_from_output(
  output: U256,
  input_reserve: U256,
  output_reserve: U256,
) -> Result<U256> {
  let numerator =
    widen(input_reserve) * widen(output) * U768::from(FEE_DENOMINATOR);
  let denominator = output_reserve
    .checked_sub(output)
    .filter(|remaining| !remaining.is_zero())
    .map(|remaining| widen(remaining) * U768::from(FEE_NUMERATOR))
    .ok_or(InvalidTrade)?;
  narrow(numerator / denominator + U768::one())
}

#[cfg(test)]
mod tests {
  use super::*;

  use crate::util::proptest::{input_amount, reserve};

  use more_asserts::assert_ge;
  use proptest::prelude::*;

  #[test]
  fn buy_ten_from_even_pool() {
    let out = input_from_output(
      U256::from(10),
      U256::from(1000),
      U256::from(1000),
    );
    // (1000 * 10 * 1000) / ((1000 - 10) * 997) + 1
    assert_eq!(out, Ok(U256::from(11)));
  }

  #[test]
  fn sell_ten_into_even_pool() {
    let out = output_from_input(
      U256::from(10),
      U256::from(1000),
      U256::from(1000),
    );
    // 10 * 997 * 1000 / (1000 * 1000 + 10 * 997) = 9.87...
    assert_eq!(out, Ok(U256::from(9)));
  }

  #[test]
  fn empty_pool_is_invalid() {
    assert_eq!(
      output_from_input(U256::zero(), U256::zero(), U256::from(5)),
      Err(InvalidTrade)
    );
  }

  #[test]
  fn draining_reserve_is_invalid() {
    let reserve = U256::from(1000);
    assert_eq!(
      input_from_output(reserve, reserve, reserve),
      Err(InvalidTrade)
    );
    assert_eq!(
      input_from_output(reserve + 1, reserve, reserve),
      Err(InvalidTrade)
    );
  }

  #[test]
  fn wide_intermediate_still_fits() {
    // input * 997 * reserve needs more than 512 bits, the quotient does not
    let big = U256::MAX / 2;
    let out = output_from_input(big, big, big);
    assert!(out.is_ok());

    let half = U256::one() << 255;
    let quarter = U256::one() << 254;
    // 2^254 * 997 * 2^255 / (2^255 * 1000 + 2^254 * 997)
    let input_with_fee = widen(quarter) * U768::from(997u64);
    let expected = input_with_fee * widen(half)
      / (widen(half) * U768::from(1000u64) + input_with_fee);
    assert_eq!(output_from_input(quarter, half, half), narrow(expected));
    assert!(expected.bits() <= 254);
  }

  #[test]
  fn wide_input_from_output_still_fits() {
    let half = U256::one() << 255;
    let input = input_from_output(half, half, U256::MAX).unwrap();
    // 2^255 * 2^255 * 1000 / ((2^256 - 1 - 2^255) * 997) + 1, just over 2^255
    assert!(input > half);
    assert!(input < half + (half >> 8));
  }

  #[test]
  fn quotient_above_256_bits_is_invalid() {
    let out = input_from_output(U256::MAX - 1, U256::MAX, U256::MAX);
    assert_eq!(out, Err(InvalidTrade));
  }

  /// Marginal input price stays below one unit across the truncated output,
  /// so truncation costs less than one input unit.
  fn sub_unit_price(out: U256, r_in: U256, r_out: U256) -> bool {
    let remaining = match r_out.checked_sub(out + U256::one()) {
      Some(r) if !r.is_zero() => widen(r),
      _ => return false,
    };
    let lhs = widen(r_in) * widen(r_out) * U768::from(1000u64);
    let rhs = remaining * remaining * U768::from(997u64);
    lhs < rhs
  }

  proptest! {
    #[test]
    fn round_trip_favours_pool(
      x in input_amount(),
      r_in in reserve(),
      r_out in reserve(),
    ) {
      let out = output_from_input(x, r_in, r_out)?;
      prop_assume!(!out.is_zero() && sub_unit_price(out, r_in, r_out));
      let back = input_from_output(out, r_in, r_out)?;
      assert_ge!(back, x);
    }

    #[test]
    fn quoted_input_buys_requested_output(
      y in input_amount(),
      r_in in reserve(),
      r_out in reserve(),
    ) {
      prop_assume!(y < r_out);
      let required = input_from_output(y, r_in, r_out)?;
      let received = output_from_input(required, r_in, r_out)?;
      assert_ge!(received, y);
    }
  }
}
