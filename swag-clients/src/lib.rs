//! # Swag Clients
//!
//! Offchain Rust clients for the swag token contracts on xDai.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use ethers::providers::{Http, Provider};
//! use swag_clients::prelude::*;
//!
//! # async fn example() -> Result<()> {
//! let config = ClientConfig::from_env()?;
//! let provider = Provider::<Http>::try_from(config.rpc_url.as_str())?;
//! let chain = Arc::new(RpcChain::new(Arc::new(provider)));
//!
//! // Drive watchers from block polling
//! let notifier = BlockNotifier::new();
//! let _poller = notifier.poll(chain.clone(), config.block_poll_interval);
//! let watchers =
//!   ChainWatchers::new(chain, notifier, config.addresses.clone());
//! let alvin = config.addresses.swag_token(SwagToken::Alvin);
//! let reserves = watchers.pair_reserves(alvin);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`watchers`] - Block-driven, staleness-guarded chain reads
//! - [`swag_client`] - Approve/swap/stake/withdraw/claim/migrate/burn
//! - [`block_notifier`] - New-block fan-out with scoped subscriptions

pub mod block_notifier;
pub mod chain_reader;
pub mod config;
pub mod contracts;
pub mod prelude;
pub mod swag_client;
pub mod tracked;
pub mod transaction;
pub mod util;
pub mod watchers;
