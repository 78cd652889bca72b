//! Market state a quote is computed from, and providers for it.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use ethers::types::{Address, U256};
use serde::{Deserialize, Serialize};
use swag_clients::chain_reader::ChainReader;
use swag_clients::config::ContractAddresses;
use swag_core::error::CoreError::InvalidTrade;
use swag_core::trade::{PaymentRoute, ReservePair};

use crate::trade_context::TradeContext;

/// Point-in-time view of everything a buy or sell is validated against.
///
/// `None` marks a fact that is not available yet; checks depending on it
/// are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketSnapshot {
  /// Reserves of the swag token's base pool.
  pub swag_pool: Option<ReservePair>,
  /// Reserves of the payment token's base pool; unused when paying with the
  /// base asset.
  pub payment_pool: Option<ReservePair>,
  pub native_balance: Option<U256>,
  /// Balance of the payment asset.
  pub payment_balance: Option<U256>,
  /// Router allowance of the payment token.
  pub payment_allowance: Option<U256>,
  pub swag_balance: Option<U256>,
  /// Router allowance of the swag token.
  pub swag_allowance: Option<U256>,
}

impl MarketSnapshot {
  /// How the payment side reaches the base pool.
  ///
  /// # Errors
  /// - Payment pool reserves missing for a token payment
  pub fn route(
    &self,
    context: &TradeContext,
  ) -> swag_core::error::Result<PaymentRoute> {
    if context.pays_with_base() {
      Ok(PaymentRoute::Base)
    } else {
      self.payment_pool.map(PaymentRoute::Token).ok_or(InvalidTrade)
    }
  }
}

/// Source of market snapshots.
#[async_trait]
pub trait StateProvider: Send + Sync {
  /// Fetch the current snapshot for `context`
  ///
  /// # Errors
  /// Returns error if state fetching fails.
  async fn fetch_snapshot(
    &self,
    context: &TradeContext,
  ) -> Result<MarketSnapshot>;
}

// Implement StateProvider for Arc<T> where T: StateProvider
#[async_trait]
impl<T: StateProvider> StateProvider for Arc<T> {
  async fn fetch_snapshot(
    &self,
    context: &TradeContext,
  ) -> Result<MarketSnapshot> {
    (**self).fetch_snapshot(context).await
  }
}

// ============================================================================
// RPC STATE PROVIDER
// ============================================================================

/// State provider issuing one round of chain reads per snapshot.
pub struct RpcStateProvider<R> {
  reader: Arc<R>,
  addresses: ContractAddresses,
  account: Option<Address>,
}

impl<R: ChainReader> RpcStateProvider<R> {
  #[must_use]
  pub fn new(
    reader: Arc<R>,
    addresses: ContractAddresses,
    account: Option<Address>,
  ) -> Self {
    Self {
      reader,
      addresses,
      account,
    }
  }

  async fn pool(&self, token: Address) -> Option<ReservePair> {
    let base = self.addresses.wxdai;
    let pair = self
      .reader
      .pair_address(self.addresses.factory, token, base)
      .await
      .ok()?;
    let (base_reserve, token_reserve) = futures::join!(
      self.reader.token_balance(base, pair),
      self.reader.token_balance(token, pair)
    );
    Some(ReservePair::new(base_reserve.ok()?, token_reserve.ok()?))
  }

  async fn balance(&self, token: Option<Address>) -> Option<U256> {
    let owner = self.account?;
    match token {
      None => self.reader.native_balance(owner).await.ok(),
      Some(token) => self.reader.token_balance(token, owner).await.ok(),
    }
  }

  async fn router_allowance(&self, token: Option<Address>) -> Option<U256> {
    let owner = self.account?;
    self
      .reader
      .allowance(token?, owner, self.addresses.router)
      .await
      .ok()
  }
}

#[async_trait]
impl<R: ChainReader> StateProvider for RpcStateProvider<R> {
  async fn fetch_snapshot(
    &self,
    context: &TradeContext,
  ) -> Result<MarketSnapshot> {
    let swag = self.addresses.swag_token(context.token);
    let payment = context.payment_token();
    let payment_pool = async {
      match payment {
        Some(token) if !context.pays_with_base() => self.pool(token).await,
        _ => None,
      }
    };
    let (
      swag_pool,
      payment_pool,
      native_balance,
      payment_balance,
      payment_allowance,
      swag_balance,
      swag_allowance,
    ) = futures::join!(
      self.pool(swag),
      payment_pool,
      self.balance(None),
      self.balance(payment),
      self.router_allowance(payment),
      self.balance(Some(swag)),
      self.router_allowance(Some(swag)),
    );
    Ok(MarketSnapshot {
      swag_pool,
      payment_pool,
      native_balance,
      payment_balance,
      payment_allowance,
      swag_balance,
      swag_allowance,
    })
  }
}
