//! Trade validation and quoting for the swag token markets.
//!
//! A [`TradeContext`] names the selection (swag token, payment asset,
//! slippage), a [`MarketSnapshot`] carries the chain state it is validated
//! against, and [`validate_buy`] / [`validate_sell`] size the trade.
//!
//! Snapshots come from a [`StateProvider`]:
//!
//! - **`RpcStateProvider`**: one round of chain reads per snapshot.
//! - **`MarketWatch`**: block-driven watchers, read without a round trip.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use ethers::providers::{Http, Provider};
//! use swag_clients::prelude::*;
//! use swag_quotes::prelude::*;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let addresses = ContractAddresses::xdai()?;
//! let provider = Provider::<Http>::try_from("https://rpc.gnosischain.com")?;
//! let chain = Arc::new(RpcChain::new(Arc::new(provider)));
//! let state = RpcStateProvider::new(chain, addresses.clone(), None);
//!
//! let context =
//!   TradeContext::new(SwagToken::Alvin, Asset::Native, addresses.wxdai);
//! let snapshot = state.fetch_snapshot(&context).await?;
//! let quote = validate_buy(&context, "1.5", &snapshot)?;
//! println!("pay at most {}", format_amount(quote.bound)?);
//! # Ok(())
//! # }
//! ```

pub mod dollar_price;
pub mod market_snapshot;
pub mod market_watch;
pub mod prelude;
pub mod quote;
pub mod trade_context;

pub use crate::market_snapshot::{
  MarketSnapshot, RpcStateProvider, StateProvider,
};
pub use crate::market_watch::MarketWatch;
pub use crate::quote::{validate_buy, validate_sell, QuoteResult};
pub use crate::trade_context::TradeContext;
