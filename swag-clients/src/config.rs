//! Deployed contract addresses and runtime configuration.

use std::env;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use ethers::types::Address;
use serde::{Deserialize, Serialize};
use swag_core::tokens::{
  Asset, MigrationVersion, StakingGeneration, StakingToken, SwagToken,
};

pub const FACTORY: &str = "0xc35DADB65012eC5796536bD9864eD8773aBc74C4";
pub const ROUTER: &str = "0x1b02dA8Cb0d097eB8D57A175b88c7D8b47997506";
pub const STAKING: &str = "0x111C1BF2a6c3Dc8cDbBFc5A5FA3a01E3426e2C14";
pub const LEGACY_STAKING: &str = "0xb8432d4c985c1a17A50cE0676B97DBd157737c37";
pub const WXDAI: &str = "0x5B67676a984807a212b1c59eBFc9B3568a474F0a";

pub const SHWEATPANTS: &str = "0x1Dd8aF2B98a680EA167ccBE8A43a18395F9d7597";
pub const ALVIN: &str = "0x50DBde932A94b0c23D27cdd30Fbc6B987610c831";
pub const SHWEATPANTS_V2: &str = "0x73C6927063338170D794DC929253edb09f533B8d";
pub const ALVIN_V2: &str = "0xf9bb1049378A3462E61Bba502530e5Ed62469925";
pub const SHWEATPANTS_V1: &str = "0x898e8897437d7245a2d09a29b2cd06a2c1ca388b";
pub const ALVIN_V1: &str = "0x3008Ff3e688346350b0C07B8265d256dddD97215";

pub const HNY: &str = "0x71850b7e9ee3f13ab46d67167341e4bdc905eef9";
pub const PRTCLE: &str = "0xb5d592f85ab2d955c25720ebe6ff8d4d1e1be300";
pub const HNYPRTCLE: &str = "0xaaefc56e97624b57ce98374eb4a45b6fd5ffb982";

pub const SHWEATPANTS_MIGRATION_V2: &str =
  "0x4af7c1DFF088Ce058508178054Cef16757Cb4610";
pub const ALVIN_MIGRATION_V2: &str =
  "0xC41E160CD4FBA75950aD1c827Dea42A993c564A0";
pub const SHWEATPANTS_MIGRATION_V3: &str =
  "0x29f1C823Ca7ABb894D452796140eC80011cc5612";
pub const ALVIN_MIGRATION_V3: &str =
  "0x70520F7f6a4978952bA9AA33c5Ce09B9De30Ea5f";

pub const DEFAULT_BLOCK_POLL_INTERVAL: Duration = Duration::from_secs(5);

fn parse_address(name: &str, value: &str) -> Result<Address> {
  value
    .trim()
    .parse()
    .map_err(|e| anyhow!("{name} is not a valid address ({value}): {e}"))
}

/// Every contract the SDK reads from or writes to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractAddresses {
  pub factory: Address,
  pub router: Address,
  pub staking: Address,
  pub legacy_staking: Address,
  pub wxdai: Address,
  pub shweatpants: Address,
  pub alvin: Address,
  pub shweatpants_v2: Address,
  pub alvin_v2: Address,
  pub shweatpants_v1: Address,
  pub alvin_v1: Address,
  pub hny: Address,
  pub prtcle: Address,
  pub hnyprtcle: Address,
  pub shweatpants_migration_v2: Address,
  pub alvin_migration_v2: Address,
  pub shweatpants_migration_v3: Address,
  pub alvin_migration_v3: Address,
}

impl ContractAddresses {
  /// Mainnet deployment on xDai.
  ///
  /// # Errors
  /// - Malformed address constant
  pub fn xdai() -> Result<ContractAddresses> {
    Ok(ContractAddresses {
      factory: parse_address("FACTORY", FACTORY)?,
      router: parse_address("ROUTER", ROUTER)?,
      staking: parse_address("STAKING", STAKING)?,
      legacy_staking: parse_address("LEGACY_STAKING", LEGACY_STAKING)?,
      wxdai: parse_address("WXDAI", WXDAI)?,
      shweatpants: parse_address("SHWEATPANTS", SHWEATPANTS)?,
      alvin: parse_address("ALVIN", ALVIN)?,
      shweatpants_v2: parse_address("SHWEATPANTS_V2", SHWEATPANTS_V2)?,
      alvin_v2: parse_address("ALVIN_V2", ALVIN_V2)?,
      shweatpants_v1: parse_address("SHWEATPANTS_V1", SHWEATPANTS_V1)?,
      alvin_v1: parse_address("ALVIN_V1", ALVIN_V1)?,
      hny: parse_address("HNY", HNY)?,
      prtcle: parse_address("PRTCLE", PRTCLE)?,
      hnyprtcle: parse_address("HNYPRTCLE", HNYPRTCLE)?,
      shweatpants_migration_v2: parse_address(
        "SHWEATPANTS_MIGRATION_V2",
        SHWEATPANTS_MIGRATION_V2,
      )?,
      alvin_migration_v2: parse_address(
        "ALVIN_MIGRATION_V2",
        ALVIN_MIGRATION_V2,
      )?,
      shweatpants_migration_v3: parse_address(
        "SHWEATPANTS_MIGRATION_V3",
        SHWEATPANTS_MIGRATION_V3,
      )?,
      alvin_migration_v3: parse_address(
        "ALVIN_MIGRATION_V3",
        ALVIN_MIGRATION_V3,
      )?,
    })
  }

  #[must_use]
  pub fn swag_token(&self, token: SwagToken) -> Address {
    match token {
      SwagToken::Shweatpants => self.shweatpants,
      SwagToken::Alvin => self.alvin,
    }
  }

  #[must_use]
  pub fn staking_token(&self, token: StakingToken) -> Address {
    match token {
      StakingToken::Hny => self.hny,
      StakingToken::Prtcle => self.prtcle,
      StakingToken::HnyPrtcle => self.hnyprtcle,
    }
  }

  #[must_use]
  pub fn staking_contract(&self, generation: StakingGeneration) -> Address {
    match generation {
      StakingGeneration::Current => self.staking,
      StakingGeneration::Legacy => self.legacy_staking,
    }
  }

  /// Migration contract moving `token` into `version`.
  #[must_use]
  pub fn migration(
    &self,
    token: SwagToken,
    version: MigrationVersion,
  ) -> Address {
    match (token, version) {
      (SwagToken::Shweatpants, MigrationVersion::V2) => {
        self.shweatpants_migration_v2
      }
      (SwagToken::Alvin, MigrationVersion::V2) => self.alvin_migration_v2,
      (SwagToken::Shweatpants, MigrationVersion::V3) => {
        self.shweatpants_migration_v3
      }
      (SwagToken::Alvin, MigrationVersion::V3) => self.alvin_migration_v3,
    }
  }

  /// Token contract the migration to `version` pulls from.
  #[must_use]
  pub fn migration_source(
    &self,
    token: SwagToken,
    version: MigrationVersion,
  ) -> Address {
    match (token, version) {
      (SwagToken::Shweatpants, MigrationVersion::V2) => self.shweatpants_v1,
      (SwagToken::Alvin, MigrationVersion::V2) => self.alvin_v1,
      (SwagToken::Shweatpants, MigrationVersion::V3) => self.shweatpants_v2,
      (SwagToken::Alvin, MigrationVersion::V3) => self.alvin_v2,
    }
  }

  /// The ERC-20 behind a payment asset; the native coin trades through
  /// its wrapped form.
  #[must_use]
  pub fn routed_address(&self, asset: Asset) -> Address {
    asset.address().unwrap_or(self.wxdai)
  }

  /// Applies `*_ADDRESS` overrides, e.g. `ROUTER_ADDRESS`.
  fn apply_overrides<F>(&mut self, lookup: &F) -> Result<()>
  where
    F: Fn(&str) -> Option<String>,
  {
    let slots: [(&str, &mut Address); 5] = [
      ("FACTORY_ADDRESS", &mut self.factory),
      ("ROUTER_ADDRESS", &mut self.router),
      ("STAKING_ADDRESS", &mut self.staking),
      ("LEGACY_STAKING_ADDRESS", &mut self.legacy_staking),
      ("WXDAI_ADDRESS", &mut self.wxdai),
    ];
    for (name, slot) in slots {
      if let Some(value) = lookup(name) {
        *slot = parse_address(name, &value)?;
      }
    }
    Ok(())
  }
}

/// Settings for connecting the SDK to a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
  pub rpc_url: String,
  /// Wallet account the SDK reads balances for and sends from.
  pub account: Option<Address>,
  pub block_poll_interval: Duration,
  pub addresses: ContractAddresses,
}

impl ClientConfig {
  /// Loads `.env` if present, then reads the process environment.
  ///
  /// # Errors
  /// - `RPC_URL` missing
  /// - Malformed account, interval or address override
  pub fn from_env() -> Result<ClientConfig> {
    dotenv::dotenv().ok();
    ClientConfig::from_vars(|name| env::var(name).ok())
  }

  /// Builds the config from an arbitrary variable lookup.
  ///
  /// # Errors
  /// - `RPC_URL` missing
  /// - Malformed account, interval or address override
  pub fn from_vars<F>(lookup: F) -> Result<ClientConfig>
  where
    F: Fn(&str) -> Option<String>,
  {
    let rpc_url = lookup("RPC_URL").context("RPC_URL is not set")?;
    let account = lookup("ACCOUNT_ADDRESS")
      .map(|value| parse_address("ACCOUNT_ADDRESS", &value))
      .transpose()?;
    let block_poll_interval = lookup("BLOCK_POLL_INTERVAL_MS")
      .map(|value| {
        value
          .trim()
          .parse::<u64>()
          .map(Duration::from_millis)
          .with_context(|| format!("invalid BLOCK_POLL_INTERVAL_MS: {value}"))
      })
      .transpose()?
      .unwrap_or(DEFAULT_BLOCK_POLL_INTERVAL);
    let mut addresses = ContractAddresses::xdai()?;
    addresses.apply_overrides(&lookup)?;
    Ok(ClientConfig {
      rpc_url,
      account,
      block_poll_interval,
      addresses,
    })
  }
}
