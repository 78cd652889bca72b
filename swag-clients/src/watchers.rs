//! Block-driven watchers over chain reads.
//!
//! Every watcher reads once when spawned and again on each new block. Each
//! read runs on its own task so a slow node response never holds up the
//! next block's read; results land through [`Tracked`], so only the latest
//! issued read is ever visible.

use std::future::Future;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use ethers::types::{Address, U256};
use log::{debug, trace};
use swag_core::exchange_rate::{drip_rate, usd_exchange_rate};
use swag_core::tokens::{Asset, StakingGeneration, StakingToken, SwagToken};
use swag_core::trade::ReservePair;
use tokio::sync::{watch, OnceCell};
use tokio::task::JoinHandle;

use crate::block_notifier::BlockNotifier;
use crate::chain_reader::ChainReader;
use crate::config::ContractAddresses;
use crate::tracked::{Fetched, Tracked};

/// Live watcher. Dropping it stops block refreshes and discards any reads
/// still in flight.
#[derive(Debug)]
pub struct WatchHandle<T> {
  tracked: Arc<Tracked<T>>,
  driver: JoinHandle<()>,
}

impl<T: Clone + Send + Sync + 'static> WatchHandle<T> {
  #[must_use]
  pub fn get(&self) -> Fetched<T> {
    self.tracked.get()
  }

  #[must_use]
  pub fn receiver(&self) -> watch::Receiver<Fetched<T>> {
    self.tracked.subscribe()
  }
}

impl<T> Drop for WatchHandle<T> {
  fn drop(&mut self) {
    self.driver.abort();
    self.tracked.invalidate();
  }
}

/// Starts a watcher that runs `fetch` now and on every block published by
/// `notifier`.
pub fn spawn_watcher<T, F, Fut>(
  notifier: &BlockNotifier,
  label: &'static str,
  fetch: F,
) -> WatchHandle<T>
where
  T: Send + Sync + 'static,
  F: Fn() -> Fut + Send + Sync + 'static,
  Fut: Future<Output = Result<T>> + Send + 'static,
{
  let tracked = Tracked::new();
  let mut subscription = notifier.subscribe();
  let refresh = {
    let tracked = tracked.clone();
    move || {
      let ticket = tracked.begin();
      let tracked = tracked.clone();
      let read = fetch();
      tokio::spawn(async move {
        let result = read.await;
        if let Err(e) = &result {
          debug!("{label} read failed: {e:#}");
        }
        if !tracked.commit(ticket, result.into()) {
          trace!("{label} discarded stale read {ticket:?}");
        }
      });
    }
  };
  let driver = tokio::spawn(async move {
    refresh();
    while let Some(block) = subscription.next().await {
      trace!("{label} refresh at block {block}");
      refresh();
    }
  });
  WatchHandle { tracked, driver }
}

/// Watcher factory for every chain fact the SDK tracks.
pub struct ChainWatchers<R> {
  reader: Arc<R>,
  notifier: BlockNotifier,
  addresses: Arc<ContractAddresses>,
}

impl<R> Clone for ChainWatchers<R> {
  fn clone(&self) -> Self {
    ChainWatchers {
      reader: self.reader.clone(),
      notifier: self.notifier.clone(),
      addresses: self.addresses.clone(),
    }
  }
}

impl<R: ChainReader + 'static> ChainWatchers<R> {
  #[must_use]
  pub fn new(
    reader: Arc<R>,
    notifier: BlockNotifier,
    addresses: ContractAddresses,
  ) -> ChainWatchers<R> {
    ChainWatchers {
      reader,
      notifier,
      addresses: Arc::new(addresses),
    }
  }

  #[must_use]
  pub fn addresses(&self) -> &ContractAddresses {
    &self.addresses
  }

  #[must_use]
  pub fn notifier(&self) -> &BlockNotifier {
    &self.notifier
  }

  fn watch<T, F, Fut>(&self, label: &'static str, fetch: F) -> WatchHandle<T>
  where
    T: Send + Sync + 'static,
    F: Fn(Arc<R>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
  {
    let reader = self.reader.clone();
    spawn_watcher(&self.notifier, label, move || fetch(reader.clone()))
  }

  #[must_use]
  pub fn native_balance(&self, owner: Address) -> WatchHandle<U256> {
    self.watch("native balance", move |reader| async move {
      reader.native_balance(owner).await
    })
  }

  #[must_use]
  pub fn token_balance(
    &self,
    token: Address,
    owner: Address,
  ) -> WatchHandle<U256> {
    self.watch("token balance", move |reader| async move {
      reader.token_balance(token, owner).await
    })
  }

  #[must_use]
  pub fn balance(&self, asset: Asset, owner: Address) -> WatchHandle<U256> {
    match asset {
      Asset::Native => self.native_balance(owner),
      Asset::Erc20(token) => self.token_balance(token, owner),
    }
  }

  #[must_use]
  pub fn allowance(
    &self,
    token: Address,
    owner: Address,
    spender: Address,
  ) -> WatchHandle<U256> {
    self.watch("allowance", move |reader| async move {
      reader.allowance(token, owner, spender).await
    })
  }

  /// Allowance granted to the swap router.
  #[must_use]
  pub fn router_allowance(
    &self,
    token: Address,
    owner: Address,
  ) -> WatchHandle<U256> {
    self.allowance(token, owner, self.addresses.router)
  }

  /// Allowance granted to the current staking contract.
  #[must_use]
  pub fn staking_allowance(
    &self,
    token: StakingToken,
    owner: Address,
  ) -> WatchHandle<U256> {
    self.allowance(
      self.addresses.staking_token(token),
      owner,
      self.addresses.staking,
    )
  }

  #[must_use]
  pub fn staked(
    &self,
    generation: StakingGeneration,
    token: StakingToken,
    account: Address,
  ) -> WatchHandle<U256> {
    let staking = self.addresses.staking_contract(generation);
    let token_address = self.addresses.staking_token(token);
    let liquidity = token.is_liquidity();
    self.watch("staked", move |reader| async move {
      reader
        .staked(staking, token_address, account, liquidity)
        .await
    })
  }

  #[must_use]
  pub fn total_staked(
    &self,
    generation: StakingGeneration,
    token: StakingToken,
  ) -> WatchHandle<U256> {
    let staking = self.addresses.staking_contract(generation);
    let token_address = self.addresses.staking_token(token);
    self.watch("total staked", move |reader| async move {
      reader.total_staked(staking, token_address).await
    })
  }

  /// Unclaimed `token` rewards of `account`.
  #[must_use]
  pub fn reward(
    &self,
    generation: StakingGeneration,
    account: Address,
    token: SwagToken,
  ) -> WatchHandle<U256> {
    let staking = self.addresses.staking_contract(generation);
    let token_address = self.addresses.swag_token(token);
    self.watch("reward", move |reader| async move {
      reader.reward(staking, account, token_address).await
    })
  }

  /// Reward tokens dripped per second on the current staking contract.
  #[must_use]
  pub fn drip_rate(&self, token: SwagToken) -> WatchHandle<U256> {
    let staking = self.addresses.staking;
    let token_address = self.addresses.swag_token(token);
    self.watch("drip rate", move |reader| async move {
      let (supply, active_time) = reader.dripp(staking, token_address).await?;
      drip_rate(supply, active_time)
        .ok_or_else(|| anyhow!("{token} drip has no active time"))
    })
  }

  #[must_use]
  pub fn total_supply(&self, token: Address) -> WatchHandle<U256> {
    self.watch("total supply", move |reader| async move {
      reader.total_supply(token).await
    })
  }

  /// Address of `token`'s pool against the base asset.
  #[must_use]
  pub fn pair_address(&self, token: Address) -> WatchHandle<Address> {
    let factory = self.addresses.factory;
    let base = self.addresses.wxdai;
    self.watch("pair address", move |reader| async move {
      reader.pair_address(factory, token, base).await
    })
  }

  /// Reserves of `token`'s pool against the base asset, read as the pair
  /// contract's balances of both tokens.
  #[must_use]
  pub fn pair_reserves(&self, token: Address) -> WatchHandle<ReservePair> {
    let factory = self.addresses.factory;
    let base = self.addresses.wxdai;
    let pair = Arc::new(OnceCell::new());
    self.watch("pair reserves", move |reader| {
      let pair = pair.clone();
      async move {
        let pair = *pair
          .get_or_try_init(|| reader.pair_address(factory, token, base))
          .await?;
        read_reserves(reader.as_ref(), pair, base, token).await
      }
    })
  }

  /// Dollar value of one unit of `asset`.
  #[must_use]
  pub fn usd_exchange_rate(&self, asset: Asset) -> WatchHandle<U256> {
    let base = self.addresses.wxdai;
    let token = match asset {
      Asset::Erc20(token) if token != base => Some(token),
      Asset::Native | Asset::Erc20(_) => None,
    };
    let factory = self.addresses.factory;
    self.watch("usd exchange rate", move |reader| async move {
      let pool = match token {
        None => None,
        Some(token) => {
          let pair = reader.pair_address(factory, token, base).await?;
          let reserves =
            read_reserves(reader.as_ref(), pair, base, token).await?;
          Some((reserves.base, reserves.token))
        }
      };
      usd_exchange_rate(pool).ok_or_else(|| anyhow!("empty pool"))
    })
  }
}

async fn read_reserves<R: ChainReader + ?Sized>(
  reader: &R,
  pair: Address,
  base: Address,
  token: Address,
) -> Result<ReservePair> {
  let (base_reserve, token_reserve) = futures::try_join!(
    reader.token_balance(base, pair),
    reader.token_balance(token, pair)
  )?;
  Ok(ReservePair::new(base_reserve, token_reserve))
}
