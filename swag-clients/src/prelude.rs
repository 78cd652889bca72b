pub use anyhow::Result;
pub use ethers::types::{Address, TxHash, U256};
pub use swag_core::amount::{format_amount, parse_amount};
pub use swag_core::tokens::{
  Asset, MigrationVersion, StakingGeneration, StakingToken, SwagToken,
};
pub use swag_core::trade::ReservePair;

pub use crate::block_notifier::{BlockNotifier, BlockSubscription};
pub use crate::chain_reader::{ChainReader, RpcChain};
pub use crate::config::{ClientConfig, ContractAddresses};
pub use crate::swag_client::SwagClient;
pub use crate::tracked::{Fetched, Tracked};
pub use crate::transaction::{
  ActionKind, PendingAction, TransactionArgs, TransactionSender,
};
pub use crate::watchers::{spawn_watcher, ChainWatchers, WatchHandle};
