use ethers::types::Address;
use serde::{Deserialize, Serialize};
use swag_core::slippage::ALLOWED_SLIPPAGE_BPS;
use swag_core::tokens::{Asset, SwagToken};

/// Selection a quote is computed for: which swag token, paid or paid out in
/// which asset, at what slippage tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TradeContext {
  pub token: SwagToken,
  pub payment: Asset,
  /// Wrapped native coin every swag pool is quoted against.
  pub base: Address,
  pub slippage_bps: u64,
}

impl TradeContext {
  #[must_use]
  pub fn new(token: SwagToken, payment: Asset, base: Address) -> TradeContext {
    TradeContext {
      token,
      payment,
      base,
      slippage_bps: ALLOWED_SLIPPAGE_BPS,
    }
  }

  #[must_use]
  pub fn with_slippage(self, slippage_bps: u64) -> TradeContext {
    TradeContext {
      slippage_bps,
      ..self
    }
  }

  /// Whether the payment side trades in one hop: the native coin or the
  /// base token itself.
  #[must_use]
  pub fn pays_with_base(&self) -> bool {
    match self.payment {
      Asset::Native => true,
      Asset::Erc20(token) => token == self.base,
    }
  }

  /// Payment token that needs router approval, if any.
  #[must_use]
  pub fn payment_token(&self) -> Option<Address> {
    self.payment.address()
  }
}
