use std::sync::Arc;

use anyhow::{anyhow, Result};
use ethers::abi::Tokenize;
use ethers::contract::BaseContract;
use ethers::types::{Address, Bytes, TxHash, U256};
use log::debug;
use swag_core::tokens::{
  Asset, MigrationVersion, StakingGeneration, StakingToken, SwagToken,
};
use tokio::sync::watch;

use crate::config::ContractAddresses;
use crate::contracts::ContractInterfaces;
use crate::transaction::{
  submit, ActionKind, PendingAction, TransactionArgs, TransactionSender,
};
use crate::util::swap_deadline;

fn encode<T: Tokenize>(
  contract: &BaseContract,
  name: &str,
  args: T,
) -> Result<Bytes> {
  contract
    .encode(name, args)
    .map_err(|e| anyhow!("Failed to encode {name}: {e}"))
}

/// Client for every swag write action.
///
/// Each action comes in two forms: `*_args` builds the unsigned call, and
/// the plain method submits it with the gas margin and price markup and
/// records it as the pending action.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
///
/// use ethers::providers::{Http, Provider};
/// use swag_clients::prelude::*;
///
/// # async fn example(account: Address) -> Result<()> {
/// let provider = Provider::<Http>::try_from("http://localhost:8545")?;
/// let chain = RpcChain::new(Arc::new(provider));
/// let client =
///   SwagClient::new(Arc::new(chain), account, ContractAddresses::xdai()?)?;
/// let amount = parse_amount("1.5")?;
/// let pending = client
///   .buy(SwagToken::Alvin, Asset::Native, amount, amount * 2)
///   .await?;
/// # Ok(())
/// # }
/// ```
pub struct SwagClient<S> {
  sender: Arc<S>,
  account: Address,
  addresses: ContractAddresses,
  interfaces: ContractInterfaces,
  pending: watch::Sender<Option<PendingAction>>,
}

impl<S: TransactionSender> SwagClient<S> {
  /// # Errors
  /// - Contract interfaces fail to parse
  pub fn new(
    sender: Arc<S>,
    account: Address,
    addresses: ContractAddresses,
  ) -> Result<SwagClient<S>> {
    let (pending, _) = watch::channel(None);
    Ok(SwagClient {
      sender,
      account,
      addresses,
      interfaces: ContractInterfaces::load()?,
      pending,
    })
  }

  #[must_use]
  pub fn account(&self) -> Address {
    self.account
  }

  #[must_use]
  pub fn addresses(&self) -> &ContractAddresses {
    &self.addresses
  }

  /// The current in-flight action, if any.
  #[must_use]
  pub fn pending(&self) -> Option<PendingAction> {
    *self.pending.borrow()
  }

  #[must_use]
  pub fn subscribe_pending(&self) -> watch::Receiver<Option<PendingAction>> {
    self.pending.subscribe()
  }

  /// Clears the pending action once `hash` has completed. A newer action
  /// that already replaced it is left in place.
  pub fn complete(&self, hash: TxHash) -> bool {
    self.pending.send_if_modified(|pending| match pending {
      Some(action) if action.hash == hash => {
        *pending = None;
        true
      }
      _ => false,
    })
  }

  /// Submits `args` and makes it the pending action.
  ///
  /// # Errors
  /// - Gas estimation or submission failure
  pub async fn run(&self, args: TransactionArgs) -> Result<PendingAction> {
    let action = submit(self.sender.as_ref(), self.account, args).await?;
    self.pending.send_replace(Some(action));
    Ok(action)
  }

  // ==========================================================================
  // Approvals
  // ==========================================================================

  /// Unlimited approval of `spender` on `token`.
  ///
  /// # Errors
  /// - Calldata encoding
  pub fn approve_args(
    &self,
    token: Address,
    spender: Address,
  ) -> Result<TransactionArgs> {
    Ok(TransactionArgs {
      kind: ActionKind::Approve,
      to: token,
      data: encode(&self.interfaces.erc20, "approve", (spender, U256::MAX))?,
      value: None,
      amount: None,
    })
  }

  /// # Errors
  /// - Gas estimation or submission failure
  pub async fn approve(
    &self,
    token: Address,
    spender: Address,
  ) -> Result<PendingAction> {
    self.run(self.approve_args(token, spender)?).await
  }

  /// Lets the router spend `token` for swaps.
  ///
  /// # Errors
  /// - Gas estimation or submission failure
  pub async fn unlock_router(&self, token: Address) -> Result<PendingAction> {
    self.approve(token, self.addresses.router).await
  }

  /// Lets the current staking contract take `token`.
  ///
  /// # Errors
  /// - Gas estimation or submission failure
  pub async fn unlock_staking(
    &self,
    token: StakingToken,
  ) -> Result<PendingAction> {
    self
      .approve(self.addresses.staking_token(token), self.addresses.staking)
      .await
  }

  /// Lets the migration to `version` pull the previous version of `token`.
  ///
  /// # Errors
  /// - Gas estimation or submission failure
  pub async fn unlock_migration(
    &self,
    token: SwagToken,
    version: MigrationVersion,
  ) -> Result<PendingAction> {
    self
      .approve(
        self.addresses.migration_source(token, version),
        self.addresses.migration(token, version),
      )
      .await
  }

  // ==========================================================================
  // Swaps
  // ==========================================================================

  fn buy_path(&self, token: SwagToken, payment: Asset) -> Vec<Address> {
    let base = self.addresses.wxdai;
    let swag = self.addresses.swag_token(token);
    match payment.address() {
      Some(pay) if pay != base => vec![pay, base, swag],
      _ => vec![base, swag],
    }
  }

  fn sell_path(&self, token: SwagToken, payout: Asset) -> Vec<Address> {
    let mut path = self.buy_path(token, payout);
    path.reverse();
    path
  }

  /// Buys exactly `amount_out` of `token`, paying at most `maximum_input`
  /// of `payment`.
  ///
  /// Native payments attach `maximum_input` as value and the router refunds
  /// the excess; token payments spend `maximum_input` for at least
  /// `amount_out`.
  ///
  /// # Errors
  /// - Calldata encoding
  pub fn buy_args(
    &self,
    token: SwagToken,
    payment: Asset,
    amount_out: U256,
    maximum_input: U256,
    deadline: U256,
  ) -> Result<TransactionArgs> {
    let path = self.buy_path(token, payment);
    let router = &self.interfaces.router;
    let (data, value) = match payment {
      Asset::Native => (
        encode(
          router,
          "swapETHForExactTokens",
          (amount_out, path, self.account, deadline),
        )?,
        Some(maximum_input),
      ),
      Asset::Erc20(_) => (
        encode(
          router,
          "swapExactTokensForTokens",
          (maximum_input, amount_out, path, self.account, deadline),
        )?,
        None,
      ),
    };
    Ok(TransactionArgs {
      kind: ActionKind::Buy,
      to: self.addresses.router,
      data,
      value,
      amount: Some(amount_out),
    })
  }

  /// # Errors
  /// - Gas estimation or submission failure
  pub async fn buy(
    &self,
    token: SwagToken,
    payment: Asset,
    amount_out: U256,
    maximum_input: U256,
  ) -> Result<PendingAction> {
    let args = self.buy_args(
      token,
      payment,
      amount_out,
      maximum_input,
      swap_deadline()?,
    )?;
    self.run(args).await
  }

  /// Sells exactly `amount_in` of `token` for at least `minimum_output` of
  /// `payout`.
  ///
  /// # Errors
  /// - Calldata encoding
  pub fn sell_args(
    &self,
    token: SwagToken,
    payout: Asset,
    amount_in: U256,
    minimum_output: U256,
    deadline: U256,
  ) -> Result<TransactionArgs> {
    let path = self.sell_path(token, payout);
    let name = match payout {
      Asset::Native => "swapExactTokensForETH",
      Asset::Erc20(_) => "swapExactTokensForTokens",
    };
    Ok(TransactionArgs {
      kind: ActionKind::Sell,
      to: self.addresses.router,
      data: encode(
        &self.interfaces.router,
        name,
        (amount_in, minimum_output, path, self.account, deadline),
      )?,
      value: None,
      amount: Some(amount_in),
    })
  }

  /// # Errors
  /// - Gas estimation or submission failure
  pub async fn sell(
    &self,
    token: SwagToken,
    payout: Asset,
    amount_in: U256,
    minimum_output: U256,
  ) -> Result<PendingAction> {
    let args = self.sell_args(
      token,
      payout,
      amount_in,
      minimum_output,
      swap_deadline()?,
    )?;
    self.run(args).await
  }

  // ==========================================================================
  // Staking
  // ==========================================================================

  /// # Errors
  /// - Calldata encoding
  pub fn stake_args(
    &self,
    token: StakingToken,
    amount: U256,
  ) -> Result<TransactionArgs> {
    let name = if token.is_liquidity() {
      "stakeLP"
    } else {
      "stake"
    };
    let token_address = self.addresses.staking_token(token);
    Ok(TransactionArgs {
      kind: ActionKind::Stake(token),
      to: self.addresses.staking,
      data: encode(&self.interfaces.staking, name, (token_address, amount))?,
      value: None,
      amount: Some(amount),
    })
  }

  /// # Errors
  /// - Gas estimation or submission failure
  pub async fn stake(
    &self,
    token: StakingToken,
    amount: U256,
  ) -> Result<PendingAction> {
    self.run(self.stake_args(token, amount)?).await
  }

  /// Withdraws the whole stake of `token` from either staking deployment.
  ///
  /// # Errors
  /// - Calldata encoding
  pub fn withdraw_args(
    &self,
    generation: StakingGeneration,
    token: StakingToken,
  ) -> Result<TransactionArgs> {
    let name = if token.is_liquidity() {
      "withdrawAllLiquidityStake"
    } else {
      "withdrawAllTokenStake"
    };
    let token_address = self.addresses.staking_token(token);
    Ok(TransactionArgs {
      kind: ActionKind::Withdraw(generation, token),
      to: self.addresses.staking_contract(generation),
      data: encode(&self.interfaces.staking, name, token_address)?,
      value: None,
      amount: None,
    })
  }

  /// # Errors
  /// - Gas estimation or submission failure
  pub async fn withdraw(
    &self,
    generation: StakingGeneration,
    token: StakingToken,
  ) -> Result<PendingAction> {
    self.run(self.withdraw_args(generation, token)?).await
  }

  /// Claims the `token` rewards accrued on either staking deployment.
  ///
  /// # Errors
  /// - Calldata encoding
  pub fn claim_args(
    &self,
    generation: StakingGeneration,
    token: SwagToken,
  ) -> Result<TransactionArgs> {
    Ok(TransactionArgs {
      kind: ActionKind::Claim(generation),
      to: self.addresses.staking_contract(generation),
      data: encode(
        &self.interfaces.staking,
        "claim",
        self.addresses.swag_token(token),
      )?,
      value: None,
      amount: None,
    })
  }

  /// # Errors
  /// - Gas estimation or submission failure
  pub async fn claim(
    &self,
    generation: StakingGeneration,
    token: SwagToken,
  ) -> Result<PendingAction> {
    self.run(self.claim_args(generation, token)?).await
  }

  // ==========================================================================
  // Migration and burn
  // ==========================================================================

  /// # Errors
  /// - Calldata encoding
  pub fn migrate_args(
    &self,
    token: SwagToken,
    version: MigrationVersion,
    amount: U256,
  ) -> Result<TransactionArgs> {
    Ok(TransactionArgs {
      kind: ActionKind::Migrate(version),
      to: self.addresses.migration(token, version),
      data: encode(
        &self.interfaces.migration,
        "migrate",
        (self.account, amount),
      )?,
      value: None,
      amount: Some(amount),
    })
  }

  /// # Errors
  /// - Gas estimation or submission failure
  pub async fn migrate(
    &self,
    token: SwagToken,
    version: MigrationVersion,
    amount: U256,
  ) -> Result<PendingAction> {
    debug!("migrating {amount} {token} to {version:?}");
    self.run(self.migrate_args(token, version, amount)?).await
  }

  /// Redeems `amount` of `token` by burning it.
  ///
  /// # Errors
  /// - Calldata encoding
  pub fn burn_args(
    &self,
    token: SwagToken,
    amount: U256,
  ) -> Result<TransactionArgs> {
    Ok(TransactionArgs {
      kind: ActionKind::Burn,
      to: self.addresses.swag_token(token),
      data: encode(&self.interfaces.erc20, "burn", amount)?,
      value: None,
      amount: Some(amount),
    })
  }

  /// # Errors
  /// - Gas estimation or submission failure
  pub async fn burn(
    &self,
    token: SwagToken,
    amount: U256,
  ) -> Result<PendingAction> {
    self.run(self.burn_args(token, amount)?).await
  }
}
