use anyhow::{anyhow, Result};
use async_trait::async_trait;
use ethers::types::{Address, U256};
use swag_clients::chain_reader::ChainReader;
use swag_clients::tracked::Fetched;
use swag_clients::watchers::{ChainWatchers, WatchHandle};
use swag_core::trade::ReservePair;
use tokio::sync::watch;

use crate::market_snapshot::{MarketSnapshot, StateProvider};
use crate::trade_context::TradeContext;

/// Account-scoped watchers kept alive for one [`TradeContext`].
struct AccountWatch {
  native_balance: WatchHandle<U256>,
  payment_balance: WatchHandle<U256>,
  payment_allowance: Option<WatchHandle<U256>>,
  swag_balance: WatchHandle<U256>,
  swag_allowance: WatchHandle<U256>,
}

/// Block-driven [`MarketSnapshot`] for one trade selection.
///
/// Dropping it releases every underlying watcher.
pub struct MarketWatch {
  context: TradeContext,
  swag_pool: WatchHandle<ReservePair>,
  swag_pool_updates: watch::Receiver<Fetched<ReservePair>>,
  payment_pool: Option<WatchHandle<ReservePair>>,
  account: Option<AccountWatch>,
}

impl MarketWatch {
  /// Starts the pool watchers for `context`, plus balance and allowance
  /// watchers when an account is given.
  #[must_use]
  pub fn spawn<R: ChainReader + 'static>(
    watchers: &ChainWatchers<R>,
    context: TradeContext,
    account: Option<Address>,
  ) -> MarketWatch {
    let swag = watchers.addresses().swag_token(context.token);
    let swag_pool = watchers.pair_reserves(swag);
    let swag_pool_updates = swag_pool.receiver();
    let payment_pool = context
      .payment_token()
      .filter(|_| !context.pays_with_base())
      .map(|token| watchers.pair_reserves(token));
    let account = account.map(|owner| AccountWatch {
      native_balance: watchers.native_balance(owner),
      payment_balance: watchers.balance(context.payment, owner),
      payment_allowance: context
        .payment_token()
        .map(|token| watchers.router_allowance(token, owner)),
      swag_balance: watchers.token_balance(swag, owner),
      swag_allowance: watchers.router_allowance(swag, owner),
    });
    MarketWatch {
      context,
      swag_pool,
      swag_pool_updates,
      payment_pool,
      account,
    }
  }

  #[must_use]
  pub fn context(&self) -> &TradeContext {
    &self.context
  }

  /// Current values of every watcher.
  #[must_use]
  pub fn snapshot(&self) -> MarketSnapshot {
    let value = |handle: &WatchHandle<U256>| handle.get().value();
    let mut snapshot = MarketSnapshot {
      swag_pool: self.swag_pool.get().value(),
      payment_pool: self.payment_pool.as_ref().and_then(|h| h.get().value()),
      ..MarketSnapshot::default()
    };
    if let Some(account) = &self.account {
      snapshot.native_balance = value(&account.native_balance);
      snapshot.payment_balance = value(&account.payment_balance);
      snapshot.payment_allowance =
        account.payment_allowance.as_ref().and_then(value);
      snapshot.swag_balance = value(&account.swag_balance);
      snapshot.swag_allowance = value(&account.swag_allowance);
    }
    snapshot
  }

  /// Waits until the swag pool reserves change.
  ///
  /// # Errors
  /// - Watcher shut down
  pub async fn changed(&mut self) -> Result<()> {
    self
      .swag_pool_updates
      .changed()
      .await
      .map_err(|_| anyhow!("{} pool watcher closed", self.context.token))
  }
}

#[async_trait]
impl StateProvider for MarketWatch {
  async fn fetch_snapshot(
    &self,
    context: &TradeContext,
  ) -> Result<MarketSnapshot> {
    if *context == self.context {
      Ok(self.snapshot())
    } else {
      Err(anyhow!("MarketWatch is bound to another trade selection"))
    }
  }
}
