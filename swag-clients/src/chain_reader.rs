//! Read side of the chain collaborator.

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use ethers::providers::Middleware;
use ethers::types::{Address, U256};

use crate::contracts::{Erc20, PairFactory, StakingPool};

/// Read-only chain queries the watchers are built on.
#[async_trait]
pub trait ChainReader: Send + Sync {
  /// Latest block number.
  ///
  /// # Errors
  /// Returns error if the node request fails.
  async fn block_number(&self) -> Result<u64>;

  async fn native_balance(&self, owner: Address) -> Result<U256>;

  async fn token_balance(&self, token: Address, owner: Address)
    -> Result<U256>;

  async fn allowance(
    &self,
    token: Address,
    owner: Address,
    spender: Address,
  ) -> Result<U256>;

  async fn total_supply(&self, token: Address) -> Result<U256>;

  /// Pair contract for two tokens.
  ///
  /// # Errors
  /// Returns error if the factory has no such pair.
  async fn pair_address(
    &self,
    factory: Address,
    token_a: Address,
    token_b: Address,
  ) -> Result<Address>;

  /// Amount of `token` staked by `account`; `liquidity` selects the LP
  /// ledger of the staking contract.
  async fn staked(
    &self,
    staking: Address,
    token: Address,
    account: Address,
    liquidity: bool,
  ) -> Result<U256>;

  async fn total_staked(&self, staking: Address, token: Address)
    -> Result<U256>;

  async fn reward(
    &self,
    staking: Address,
    account: Address,
    token: Address,
  ) -> Result<U256>;

  /// Reward drip of `token` as `(supply, active_time)`.
  async fn dripp(
    &self,
    staking: Address,
    token: Address,
  ) -> Result<(U256, U256)>;
}

#[async_trait]
impl<T: ChainReader> ChainReader for Arc<T> {
  async fn block_number(&self) -> Result<u64> {
    (**self).block_number().await
  }

  async fn native_balance(&self, owner: Address) -> Result<U256> {
    (**self).native_balance(owner).await
  }

  async fn token_balance(
    &self,
    token: Address,
    owner: Address,
  ) -> Result<U256> {
    (**self).token_balance(token, owner).await
  }

  async fn allowance(
    &self,
    token: Address,
    owner: Address,
    spender: Address,
  ) -> Result<U256> {
    (**self).allowance(token, owner, spender).await
  }

  async fn total_supply(&self, token: Address) -> Result<U256> {
    (**self).total_supply(token).await
  }

  async fn pair_address(
    &self,
    factory: Address,
    token_a: Address,
    token_b: Address,
  ) -> Result<Address> {
    (**self).pair_address(factory, token_a, token_b).await
  }

  async fn staked(
    &self,
    staking: Address,
    token: Address,
    account: Address,
    liquidity: bool,
  ) -> Result<U256> {
    (**self).staked(staking, token, account, liquidity).await
  }

  async fn total_staked(
    &self,
    staking: Address,
    token: Address,
  ) -> Result<U256> {
    (**self).total_staked(staking, token).await
  }

  async fn reward(
    &self,
    staking: Address,
    account: Address,
    token: Address,
  ) -> Result<U256> {
    (**self).reward(staking, account, token).await
  }

  async fn dripp(
    &self,
    staking: Address,
    token: Address,
  ) -> Result<(U256, U256)> {
    (**self).dripp(staking, token).await
  }
}

// ============================================================================
// RPC CHAIN
// ============================================================================

/// [`ChainReader`] (and [`crate::transaction::TransactionSender`]) over an
/// `ethers` middleware.
pub struct RpcChain<M> {
  client: Arc<M>,
}

impl<M> Clone for RpcChain<M> {
  fn clone(&self) -> Self {
    RpcChain {
      client: self.client.clone(),
    }
  }
}

impl<M: Middleware> RpcChain<M> {
  #[must_use]
  pub fn new(client: Arc<M>) -> RpcChain<M> {
    RpcChain { client }
  }

  #[must_use]
  pub fn client(&self) -> &Arc<M> {
    &self.client
  }
}

#[async_trait]
impl<M: Middleware + 'static> ChainReader for RpcChain<M> {
  async fn block_number(&self) -> Result<u64> {
    let block = self
      .client
      .get_block_number()
      .await
      .map_err(|e| anyhow!("Failed to fetch block number: {e}"))?;
    Ok(block.as_u64())
  }

  async fn native_balance(&self, owner: Address) -> Result<U256> {
    self
      .client
      .get_balance(owner, None)
      .await
      .map_err(|e| anyhow!("Failed to fetch balance of {owner:?}: {e}"))
  }

  async fn token_balance(
    &self,
    token: Address,
    owner: Address,
  ) -> Result<U256> {
    Erc20::new(token, self.client.clone())
      .balance_of(owner)
      .call()
      .await
      .with_context(|| format!("balanceOf({owner:?}) on {token:?}"))
  }

  async fn allowance(
    &self,
    token: Address,
    owner: Address,
    spender: Address,
  ) -> Result<U256> {
    Erc20::new(token, self.client.clone())
      .allowance(owner, spender)
      .call()
      .await
      .with_context(|| {
        format!("allowance({owner:?}, {spender:?}) on {token:?}")
      })
  }

  async fn total_supply(&self, token: Address) -> Result<U256> {
    Erc20::new(token, self.client.clone())
      .total_supply()
      .call()
      .await
      .with_context(|| format!("totalSupply() on {token:?}"))
  }

  async fn pair_address(
    &self,
    factory: Address,
    token_a: Address,
    token_b: Address,
  ) -> Result<Address> {
    let pair = PairFactory::new(factory, self.client.clone())
      .get_pair(token_a, token_b)
      .call()
      .await
      .with_context(|| format!("getPair({token_a:?}, {token_b:?})"))?;
    if pair.is_zero() {
      Err(anyhow!("No pair for {token_a:?} and {token_b:?}"))
    } else {
      Ok(pair)
    }
  }

  async fn staked(
    &self,
    staking: Address,
    token: Address,
    account: Address,
    liquidity: bool,
  ) -> Result<U256> {
    let pool = StakingPool::new(staking, self.client.clone());
    let call = if liquidity {
      pool.account_lp_staked(token, account)
    } else {
      pool.account_token_staked(token, account)
    };
    call
      .call()
      .await
      .with_context(|| format!("staked {token:?} of {account:?}"))
  }

  async fn total_staked(
    &self,
    staking: Address,
    token: Address,
  ) -> Result<U256> {
    StakingPool::new(staking, self.client.clone())
      .total_staked(token)
      .call()
      .await
      .with_context(|| format!("totalStaked({token:?})"))
  }

  async fn reward(
    &self,
    staking: Address,
    account: Address,
    token: Address,
  ) -> Result<U256> {
    StakingPool::new(staking, self.client.clone())
      .reward(account, token)
      .call()
      .await
      .with_context(|| format!("reward({account:?}, {token:?})"))
  }

  async fn dripp(
    &self,
    staking: Address,
    token: Address,
  ) -> Result<(U256, U256)> {
    StakingPool::new(staking, self.client.clone())
      .get_dripp(token)
      .call()
      .await
      .with_context(|| format!("getDripp({token:?})"))
  }
}
