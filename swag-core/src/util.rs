use ethers::types::U256;

/// Every swag, staking and base token uses 18 decimals.
pub const TOKEN_DECIMALS: u32 = 18;

/// `10^18`, one whole token in base units.
#[must_use]
pub fn one_token() -> U256 {
  U256::exp10(TOKEN_DECIMALS as usize)
}

/// Basis point denominator used by slippage and gas margins.
pub const BPS_DENOMINATOR: u64 = 10_000;

#[cfg(test)]
pub mod proptest {
  use ethers::types::U256;
  use proptest::prelude::*;

  /// Pool reserves between one and a trillion whole tokens.
  pub fn reserve() -> BoxedStrategy<U256> {
    (1_000_000_000_000_000_000u128..1_000_000_000_000_000_000_000_000_000_000)
      .prop_map(U256::from)
      .boxed()
  }

  /// Trade sizes from one wei up to a million whole tokens.
  pub fn input_amount() -> BoxedStrategy<U256> {
    (1u128..1_000_000_000_000_000_000_000_000)
      .prop_map(U256::from)
      .boxed()
  }

  /// Any 256-bit value, built from four random limbs.
  pub fn any_u256() -> BoxedStrategy<U256> {
    any::<[u64; 4]>().prop_map(U256).boxed()
  }
}
