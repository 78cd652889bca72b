//! Quotes computed from state fetched through a mocked chain reader.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use ethers::types::{Address, U256};
use proptest::prelude::*;
use swag_clients::prelude::*;
use swag_core::error::CoreError;
use swag_core::util::one_token;
use swag_quotes::prelude::*;
use tokio_test::assert_ok;

const ACCOUNT: Address = Address::repeat_byte(0xaa);

/// Chain with fixed pools: every token trades in a pair at `pair_of(token)`.
struct FixedChain {
  addresses: ContractAddresses,
  balances: HashMap<(Address, Address), U256>,
  allowances: HashMap<Address, U256>,
  native: U256,
}

fn pair_of(token: Address) -> Address {
  let mut bytes = token.to_fixed_bytes();
  bytes[0] ^= 0xff;
  Address::from(bytes)
}

impl FixedChain {
  fn new() -> FixedChain {
    FixedChain {
      addresses: ContractAddresses::xdai().unwrap(),
      balances: HashMap::new(),
      allowances: HashMap::new(),
      native: one_token(),
    }
  }

  fn with_pool(mut self, token: Address, base: u64, reserve: u64) -> Self {
    let pair = pair_of(token);
    let wxdai = self.addresses.wxdai;
    self.balances.insert((wxdai, pair), one_token() * base);
    self.balances.insert((token, pair), one_token() * reserve);
    self
  }

  fn with_balance(mut self, token: Address, amount: U256) -> Self {
    self.balances.insert((token, ACCOUNT), amount);
    self
  }

  fn with_allowance(mut self, token: Address, amount: U256) -> Self {
    self.allowances.insert(token, amount);
    self
  }
}

#[async_trait]
impl ChainReader for FixedChain {
  async fn block_number(&self) -> Result<u64> {
    Ok(1)
  }

  async fn native_balance(&self, _owner: Address) -> Result<U256> {
    Ok(self.native)
  }

  async fn token_balance(
    &self,
    token: Address,
    owner: Address,
  ) -> Result<U256> {
    self
      .balances
      .get(&(token, owner))
      .copied()
      .ok_or_else(|| anyhow!("no balance"))
  }

  async fn allowance(
    &self,
    token: Address,
    _owner: Address,
    spender: Address,
  ) -> Result<U256> {
    assert_eq!(spender, self.addresses.router);
    Ok(self.allowances.get(&token).copied().unwrap_or_default())
  }

  async fn total_supply(&self, _token: Address) -> Result<U256> {
    Err(anyhow!("unused"))
  }

  async fn pair_address(
    &self,
    _factory: Address,
    token_a: Address,
    _token_b: Address,
  ) -> Result<Address> {
    let pair = pair_of(token_a);
    if self.balances.contains_key(&(token_a, pair)) {
      Ok(pair)
    } else {
      Err(anyhow!("no pair"))
    }
  }

  async fn staked(
    &self,
    _staking: Address,
    _token: Address,
    _account: Address,
    _liquidity: bool,
  ) -> Result<U256> {
    Err(anyhow!("unused"))
  }

  async fn total_staked(
    &self,
    _staking: Address,
    _token: Address,
  ) -> Result<U256> {
    Err(anyhow!("unused"))
  }

  async fn reward(
    &self,
    _staking: Address,
    _account: Address,
    _token: Address,
  ) -> Result<U256> {
    Err(anyhow!("unused"))
  }

  async fn dripp(
    &self,
    _staking: Address,
    _token: Address,
  ) -> Result<(U256, U256)> {
    Err(anyhow!("unused"))
  }
}

fn provider(chain: FixedChain) -> RpcStateProvider<FixedChain> {
  let addresses = chain.addresses.clone();
  RpcStateProvider::new(Arc::new(chain), addresses, Some(ACCOUNT))
}

#[tokio::test]
async fn native_buy_is_fully_funded() {
  let addresses = ContractAddresses::xdai().unwrap();
  let chain = FixedChain::new().with_pool(addresses.alvin, 1000, 1000);
  let state = provider(chain);
  let context =
    TradeContext::new(SwagToken::Alvin, Asset::Native, addresses.wxdai);

  let snapshot = assert_ok!(state.fetch_snapshot(&context).await);
  assert_eq!(snapshot.payment_pool, None);
  assert_eq!(snapshot.payment_balance, Some(one_token()));

  // 0.1 swag costs a little over 0.1 base
  let quote = validate_buy(&context, "0.1", &snapshot).unwrap();
  assert_eq!(quote.error, None);
  assert_eq!(quote.output_value, one_token() / 10);
}

#[tokio::test]
async fn token_buy_needs_router_allowance() {
  let addresses = ContractAddresses::xdai().unwrap();
  let chain = FixedChain::new()
    .with_pool(addresses.alvin, 1000, 1000)
    .with_pool(addresses.hny, 2000, 1000)
    .with_balance(addresses.hny, one_token() * 100);
  let state = provider(chain);
  let context = TradeContext::new(
    SwagToken::Alvin,
    Asset::Erc20(addresses.hny),
    addresses.wxdai,
  );

  let snapshot = assert_ok!(state.fetch_snapshot(&context).await);
  assert!(snapshot.payment_pool.is_some());
  let quote = validate_buy(&context, "1", &snapshot).unwrap();
  assert_eq!(quote.error, Some(CoreError::InsufficientAllowance));
  // two hops through a pool where one token buys two base
  assert!(quote.input_value < one_token());
}

#[tokio::test]
async fn sell_flags_missing_balance_before_allowance() {
  let addresses = ContractAddresses::xdai().unwrap();
  let chain = FixedChain::new()
    .with_pool(addresses.shweatpants, 1000, 1000)
    .with_balance(addresses.shweatpants, one_token() / 2);
  let state = provider(chain);
  let context =
    TradeContext::new(SwagToken::Shweatpants, Asset::Native, addresses.wxdai);

  let snapshot = assert_ok!(state.fetch_snapshot(&context).await);
  let quote = validate_sell(&context, "1", &snapshot).unwrap();
  assert_eq!(quote.error, Some(CoreError::InsufficientTokenBalance));
  assert!(quote.bound < quote.output_value);
}

#[tokio::test]
async fn sell_flags_allowance_below_amount() {
  let addresses = ContractAddresses::xdai().unwrap();
  let chain = FixedChain::new()
    .with_pool(addresses.shweatpants, 1000, 1000)
    .with_balance(addresses.shweatpants, one_token() * 5)
    .with_allowance(addresses.shweatpants, one_token() / 2);
  let state = provider(chain);
  let context =
    TradeContext::new(SwagToken::Shweatpants, Asset::Native, addresses.wxdai);

  let snapshot = assert_ok!(state.fetch_snapshot(&context).await);
  assert_eq!(snapshot.swag_allowance, Some(one_token() / 2));
  let quote = validate_sell(&context, "1", &snapshot).unwrap();
  assert_eq!(quote.error, Some(CoreError::InsufficientAllowance));

  // the same balance covers a sell within the allowance
  let quote = validate_sell(&context, "0.5", &snapshot).unwrap();
  assert_eq!(quote.error, None);
}

#[tokio::test]
async fn approved_token_buy_is_fully_funded() {
  let addresses = ContractAddresses::xdai().unwrap();
  let chain = FixedChain::new()
    .with_pool(addresses.alvin, 1000, 1000)
    .with_pool(addresses.hny, 2000, 1000)
    .with_balance(addresses.hny, one_token() * 100)
    .with_allowance(addresses.hny, U256::MAX);
  let state = provider(chain);
  let context = TradeContext::new(
    SwagToken::Alvin,
    Asset::Erc20(addresses.hny),
    addresses.wxdai,
  );

  let snapshot = assert_ok!(state.fetch_snapshot(&context).await);
  assert_eq!(snapshot.payment_allowance, Some(U256::MAX));
  let quote = validate_buy(&context, "1", &snapshot).unwrap();
  assert_eq!(quote.error, None);
  assert!(quote.bound > quote.input_value);
}

#[tokio::test]
async fn missing_pool_is_invalid_trade() {
  let addresses = ContractAddresses::xdai().unwrap();
  let state = provider(FixedChain::new());
  let context =
    TradeContext::new(SwagToken::Alvin, Asset::Native, addresses.wxdai);
  let snapshot = assert_ok!(state.fetch_snapshot(&context).await);
  assert_eq!(snapshot.swag_pool, None);
  assert_eq!(
    validate_sell(&context, "1", &snapshot),
    Err(CoreError::InvalidTrade)
  );
}

#[tokio::test]
async fn dollar_price_of_swag() {
  let addresses = ContractAddresses::xdai().unwrap();
  let chain = FixedChain::new().with_pool(addresses.alvin, 300, 100);
  let state = provider(chain);
  let context =
    TradeContext::new(SwagToken::Alvin, Asset::Native, addresses.wxdai);
  let snapshot = assert_ok!(state.fetch_snapshot(&context).await);
  let pool = snapshot.swag_pool.unwrap();
  assert_eq!(swag_dollar_price(&pool), Some(one_token() * 3));
}

proptest! {
  #[test]
  fn buy_bound_covers_quoted_input(
    base in 1_000u64..1_000_000,
    reserve in 1_000u64..1_000_000,
    milli in 1u64..900,
  ) {
    let context = TradeContext::new(
      SwagToken::Alvin,
      Asset::Native,
      Address::repeat_byte(1),
    );
    let snapshot = MarketSnapshot {
      swag_pool: Some(ReservePair::new(
        one_token() * base,
        one_token() * reserve,
      )),
      ..MarketSnapshot::default()
    };
    let amount = format!("0.{milli:03}");
    let quote = validate_buy(&context, &amount, &snapshot).unwrap();
    prop_assert!(quote.bound >= quote.input_value);
    let sell = validate_sell(&context, &amount, &snapshot).unwrap();
    prop_assert!(sell.bound <= sell.output_value);
  }
}
