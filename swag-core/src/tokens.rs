use std::fmt;

use ethers::types::Address;
use serde::{Deserialize, Serialize};

use crate::util::TOKEN_DECIMALS;

/// ERC-20 token identified by its contract address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
  pub symbol: String,
  pub address: Address,
  pub decimals: u32,
}

impl Token {
  #[must_use]
  pub fn new(symbol: impl Into<String>, address: Address) -> Token {
    Token {
      symbol: symbol.into(),
      address,
      decimals: TOKEN_DECIMALS,
    }
  }
}

/// Something a balance can be held in: the chain's native coin or an
/// ERC-20 contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Asset {
  Native,
  Erc20(Address),
}

impl Asset {
  #[must_use]
  pub fn address(&self) -> Option<Address> {
    match self {
      Asset::Native => None,
      Asset::Erc20(address) => Some(*address),
    }
  }
}

/// The two swag tokens traded against the base pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwagToken {
  Shweatpants,
  Alvin,
}

impl SwagToken {
  pub const ALL: [SwagToken; 2] = [SwagToken::Shweatpants, SwagToken::Alvin];

  #[must_use]
  pub const fn symbol(&self) -> &'static str {
    match self {
      SwagToken::Shweatpants => "SHWEATPANTS",
      SwagToken::Alvin => "ALVIN",
    }
  }
}

impl fmt::Display for SwagToken {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.symbol())
  }
}

/// Tokens accepted by the staking contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StakingToken {
  Hny,
  Prtcle,
  /// HNY/PRTCLE liquidity pool share.
  HnyPrtcle,
}

impl StakingToken {
  pub const ALL: [StakingToken; 3] =
    [StakingToken::Hny, StakingToken::Prtcle, StakingToken::HnyPrtcle];

  #[must_use]
  pub const fn symbol(&self) -> &'static str {
    match self {
      StakingToken::Hny => "HNY",
      StakingToken::Prtcle => "PRTCLE",
      StakingToken::HnyPrtcle => "HNYPRTCLE",
    }
  }

  /// Liquidity tokens use the `*LP*` entry points of the staking contract.
  #[must_use]
  pub const fn is_liquidity(&self) -> bool {
    matches!(self, StakingToken::HnyPrtcle)
  }
}

impl fmt::Display for StakingToken {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.symbol())
  }
}

/// Which deployment of the staking contract to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StakingGeneration {
  Current,
  /// Previous deployment, still holding stakes that can be withdrawn and
  /// rewards that can be claimed.
  Legacy,
}

/// Swag token migration contracts, each moving balances one version up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MigrationVersion {
  /// v1 to v2
  V2,
  /// v2 to v3
  V3,
}
