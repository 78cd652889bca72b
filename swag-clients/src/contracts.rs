//! Bindings for the external contracts the SDK talks to.
//!
//! Read paths go through the `abigen!` generated contract types. Write paths
//! only need calldata, which is encoded from the same signatures with
//! [`ContractInterfaces`] so builders stay independent of a provider.

#![allow(clippy::too_many_arguments)]

use anyhow::Result;
use ethers::abi::parse_abi;
use ethers::contract::{abigen, BaseContract};

abigen!(
  Erc20,
  r#"[
    function balanceOf(address account) external view returns (uint256)
    function allowance(address owner, address spender) external view returns (uint256)
    function totalSupply() external view returns (uint256)
    function approve(address spender, uint256 amount) external returns (bool)
    function burn(uint256 amount) external
  ]"#
);

abigen!(
  PairFactory,
  r#"[
    function getPair(address tokenA, address tokenB) external view returns (address)
  ]"#
);

abigen!(
  StakingPool,
  r#"[
    function accountTokenStaked(address token, address account) external view returns (uint256)
    function accountLPStaked(address token, address account) external view returns (uint256)
    function totalStaked(address token) external view returns (uint256)
    function reward(address account, address token) external view returns (uint256)
    function getDripp(address token) external view returns (uint256 supply_, uint256 activeTime_)
  ]"#
);

pub const ERC20_WRITE_ABI: &[&str] = &[
  "function approve(address spender, uint256 amount) external returns (bool)",
  "function burn(uint256 amount) external",
];

pub const ROUTER_ABI: &[&str] = &[
  "function swapETHForExactTokens(uint256 amountOut, address[] path, address to, uint256 deadline) external payable returns (uint256[] amounts)",
  "function swapExactTokensForETH(uint256 amountIn, uint256 amountOutMin, address[] path, address to, uint256 deadline) external returns (uint256[] amounts)",
  "function swapExactTokensForTokens(uint256 amountIn, uint256 amountOutMin, address[] path, address to, uint256 deadline) external returns (uint256[] amounts)",
];

pub const STAKING_WRITE_ABI: &[&str] = &[
  "function stake(address token, uint256 amount) external",
  "function stakeLP(address token, uint256 amount) external",
  "function withdrawAllTokenStake(address token) external",
  "function withdrawAllLiquidityStake(address token) external",
  "function claim(address token) external",
];

pub const MIGRATION_ABI: &[&str] =
  &["function migrate(address account, uint256 amount) external"];

/// Calldata encoders for every write entry point.
#[derive(Debug, Clone)]
pub struct ContractInterfaces {
  pub erc20: BaseContract,
  pub router: BaseContract,
  pub staking: BaseContract,
  pub migration: BaseContract,
}

impl ContractInterfaces {
  /// Parses the human readable signatures.
  ///
  /// # Errors
  /// - Malformed signature
  pub fn load() -> Result<ContractInterfaces> {
    Ok(ContractInterfaces {
      erc20: parse_abi(ERC20_WRITE_ABI)?.into(),
      router: parse_abi(ROUTER_ABI)?.into(),
      staking: parse_abi(STAKING_WRITE_ABI)?.into(),
      migration: parse_abi(MIGRATION_ABI)?.into(),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use ethers::types::{Address, U256};
  use ethers::utils::id;

  #[test]
  fn interfaces_parse() {
    let interfaces = ContractInterfaces::load().unwrap();
    assert!(interfaces
      .router
      .abi()
      .function("swapETHForExactTokens")
      .is_ok());
    assert!(interfaces.staking.abi().function("stakeLP").is_ok());
  }

  #[test]
  fn approve_selector() {
    let interfaces = ContractInterfaces::load().unwrap();
    let data = interfaces
      .erc20
      .encode("approve", (Address::zero(), U256::MAX))
      .unwrap();
    assert_eq!(data[..4], id("approve(address,uint256)"));
    assert_eq!(data.len(), 4 + 32 * 2);
  }
}
