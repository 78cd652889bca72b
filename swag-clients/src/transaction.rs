use std::fmt;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use ethers::providers::Middleware;
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, Bytes, TransactionRequest, TxHash, U256};
use log::info;
use serde::{Deserialize, Serialize};
use swag_core::gas::{gas_limit, marked_up_gas_price};
use swag_core::tokens::{MigrationVersion, StakingGeneration, StakingToken};

use crate::chain_reader::RpcChain;

/// Write side of the chain collaborator.
#[async_trait]
pub trait TransactionSender: Send + Sync {
  /// Current network gas price.
  async fn gas_price(&self) -> Result<U256>;

  async fn estimate_gas(&self, tx: &TypedTransaction) -> Result<U256>;

  /// Broadcasts `tx` and returns its hash without waiting for inclusion.
  async fn send_transaction(&self, tx: TypedTransaction) -> Result<TxHash>;
}

#[async_trait]
impl<T: TransactionSender> TransactionSender for std::sync::Arc<T> {
  async fn gas_price(&self) -> Result<U256> {
    (**self).gas_price().await
  }

  async fn estimate_gas(&self, tx: &TypedTransaction) -> Result<U256> {
    (**self).estimate_gas(tx).await
  }

  async fn send_transaction(&self, tx: TypedTransaction) -> Result<TxHash> {
    (**self).send_transaction(tx).await
  }
}

#[async_trait]
impl<M: Middleware + 'static> TransactionSender for RpcChain<M> {
  async fn gas_price(&self) -> Result<U256> {
    self
      .client()
      .get_gas_price()
      .await
      .map_err(|e| anyhow!("Failed to fetch gas price: {e}"))
  }

  async fn estimate_gas(&self, tx: &TypedTransaction) -> Result<U256> {
    self
      .client()
      .estimate_gas(tx, None)
      .await
      .map_err(|e| anyhow!("Gas estimation failed: {e}"))
  }

  async fn send_transaction(&self, tx: TypedTransaction) -> Result<TxHash> {
    let pending = self
      .client()
      .send_transaction(tx, None)
      .await
      .map_err(|e| anyhow!("Failed to send transaction: {e}"))?;
    Ok(pending.tx_hash())
  }
}

/// User action a transaction performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
  Approve,
  Buy,
  Sell,
  Stake(StakingToken),
  Withdraw(StakingGeneration, StakingToken),
  Claim(StakingGeneration),
  Migrate(MigrationVersion),
  Burn,
}

impl ActionKind {
  #[must_use]
  pub const fn as_str(&self) -> &'static str {
    match self {
      ActionKind::Approve => "approve",
      ActionKind::Buy => "buy",
      ActionKind::Sell => "sell",
      ActionKind::Stake(_) => "stake",
      ActionKind::Withdraw(..) => "withdraw",
      ActionKind::Claim(_) => "claim",
      ActionKind::Migrate(_) => "migrate",
      ActionKind::Burn => "burn",
    }
  }
}

impl fmt::Display for ActionKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// The in-flight user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAction {
  pub hash: TxHash,
  pub kind: ActionKind,
  pub amount: Option<U256>,
}

/// Unsigned call produced by a builder, before gas is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionArgs {
  pub kind: ActionKind,
  pub to: Address,
  pub data: Bytes,
  /// Native coin attached to the call.
  pub value: Option<U256>,
  /// Amount reported on the resulting [`PendingAction`].
  pub amount: Option<U256>,
}

impl TransactionArgs {
  /// Legacy transaction request from `from`, without gas fields.
  #[must_use]
  pub fn request(&self, from: Address) -> TypedTransaction {
    let mut request = TransactionRequest::new()
      .from(from)
      .to(self.to)
      .data(self.data.clone());
    if let Some(value) = self.value {
      request = request.value(value);
    }
    request.into()
  }
}

/// Estimates gas, applies the gas limit margin and gas price markup, then
/// broadcasts. Estimation and submission errors propagate as they are.
///
/// # Errors
/// - Gas price or estimate unavailable
/// - Node rejects the transaction
pub async fn submit<S: TransactionSender + ?Sized>(
  sender: &S,
  from: Address,
  args: TransactionArgs,
) -> Result<PendingAction> {
  let mut tx = args.request(from);
  let estimate = sender.estimate_gas(&tx).await?;
  let network_price = sender.gas_price().await?;
  tx.set_gas(gas_limit(estimate));
  tx.set_gas_price(marked_up_gas_price(network_price));
  let hash = sender.send_transaction(tx).await?;
  info!(
    "{} sent: {hash:?} (estimate {estimate}, gas price {network_price})",
    args.kind
  );
  Ok(PendingAction {
    hash,
    kind: args.kind,
    amount: args.amount,
  })
}
