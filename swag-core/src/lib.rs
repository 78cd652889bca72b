#![allow(clippy::missing_errors_doc)]

pub mod amm_math;
pub mod amount;
pub mod error;
pub mod exchange_rate;
pub mod gas;
pub mod slippage;
pub mod tokens;
pub mod trade;
pub mod util;

pub use ethers::types::{Address, U256};
