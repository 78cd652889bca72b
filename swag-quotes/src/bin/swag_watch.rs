//! Follows both swag markets and logs quotes as reserves move.
//!
//! Run with:
//! ```
//! RPC_URL=<your-rpc> RUST_LOG=info cargo run --bin swag-watch --package swag-quotes
//! ```
//!
//! `ACCOUNT_ADDRESS` adds balance and allowance checks to the quotes,
//! `QUOTE_AMOUNT` sets the quoted size (default `1`).

use std::sync::Arc;

use anyhow::Result;
use ethers::providers::{Http, Provider};
use futures::future::select_all;
use itertools::Itertools;
use log::{debug, info, warn};
use swag_clients::prelude::*;
use swag_core::exchange_rate::to_decimal;
use swag_quotes::prelude::*;

fn log_market(market: &MarketWatch, amount: &str) {
  let context = market.context();
  let snapshot = market.snapshot();
  if let Ok(json) = serde_json::to_string(&snapshot) {
    debug!("{} snapshot {json}", context.token);
  }
  let price = snapshot
    .swag_pool
    .as_ref()
    .and_then(swag_dollar_price)
    .and_then(|price| to_decimal(price).ok());
  match price {
    Some(price) => info!("{} = ${price}", context.token),
    None => info!("{} price unavailable", context.token),
  }

  let quotes = [
    ("buy", validate_buy(context, amount, &snapshot)),
    ("sell", validate_sell(context, amount, &snapshot)),
  ];
  for (side, quote) in quotes {
    match quote {
      Ok(quote) => {
        let flags = quote.error.iter().map(ToString::to_string).join("; ");
        info!(
          "{side} {amount} {}: in {} out {} bound {} {flags}",
          context.token,
          format_amount(quote.input_value).unwrap_or_default(),
          format_amount(quote.output_value).unwrap_or_default(),
          format_amount(quote.bound).unwrap_or_default(),
        );
      }
      Err(e) => warn!("{side} {amount} {}: {e}", context.token),
    }
  }
}

#[tokio::main]
async fn main() -> Result<()> {
  env_logger::init();
  let config = ClientConfig::from_env()?;
  let amount =
    std::env::var("QUOTE_AMOUNT").unwrap_or_else(|_| "1".to_string());

  info!("Starting up against {}", config.rpc_url);
  let provider = Provider::<Http>::try_from(config.rpc_url.as_str())?;
  let chain = Arc::new(RpcChain::new(Arc::new(provider)));
  let notifier = BlockNotifier::new();
  let poller = notifier.poll(chain.clone(), config.block_poll_interval);
  let watchers = ChainWatchers::new(chain, notifier, config.addresses.clone());

  let mut markets = SwagToken::ALL
    .iter()
    .map(|token| {
      let context =
        TradeContext::new(*token, Asset::Native, config.addresses.wxdai);
      MarketWatch::spawn(&watchers, context, config.account)
    })
    .collect::<Vec<_>>();
  info!(
    "Watching {} for {:?}",
    SwagToken::ALL.iter().join(", "),
    config.account
  );

  loop {
    let (changed, index, _) =
      select_all(markets.iter_mut().map(|market| Box::pin(market.changed())))
        .await;
    if let Err(e) = changed {
      warn!("{e:#}, stopping");
      break;
    }
    log_market(&markets[index], &amount);
  }
  poller.abort();
  Ok(())
}
