pub use swag_core::error::CoreError;

pub use crate::dollar_price::{
  payment_in_dollars, payment_usd_rate, swag_dollar_price,
};
pub use crate::market_snapshot::{
  MarketSnapshot, RpcStateProvider, StateProvider,
};
pub use crate::market_watch::MarketWatch;
pub use crate::quote::{validate_buy, validate_sell, QuoteResult};
pub use crate::trade_context::TradeContext;
