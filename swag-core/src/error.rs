use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

/// Tagged failures shared by quote math and trade validation.
///
/// The first five variants carry stable numeric codes which callers use to
/// pick an error message or a disabled state.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CoreError {
  // `amount`
  #[error("Amount is not a non-negative decimal number.")]
  InvalidAmount,
  // `trade`
  #[error("Trade amount is zero or exceeds the representable range.")]
  InvalidTrade,
  // validation
  #[error("Native balance is too low to pay for gas.")]
  InsufficientGasBalance,
  #[error("Token balance is lower than the amount required by the trade.")]
  InsufficientTokenBalance,
  #[error("Allowance is lower than the amount required by the trade.")]
  InsufficientAllowance,
  // `amount::amount_formatter`
  #[error("Invalid combination of base decimals and display decimals.")]
  InvalidFormat,
  // `gas`, `slippage`, `exchange_rate`
  #[error("Over/underflow in fixed point arithmetic.")]
  Arithmetic,
}

impl CoreError {
  /// Numeric tag for the trade taxonomy, `None` for internal failures.
  #[must_use]
  pub const fn code(&self) -> Option<u8> {
    match self {
      CoreError::InvalidAmount => Some(0),
      CoreError::InvalidTrade => Some(1),
      CoreError::InsufficientGasBalance => Some(2),
      CoreError::InsufficientTokenBalance => Some(3),
      CoreError::InsufficientAllowance => Some(4),
      CoreError::InvalidFormat | CoreError::Arithmetic => None,
    }
  }

  /// Whether the error still lets a quote be shown to the user.
  #[must_use]
  pub const fn is_non_breaking(&self) -> bool {
    matches!(
      self,
      CoreError::InsufficientGasBalance
        | CoreError::InsufficientTokenBalance
        | CoreError::InsufficientAllowance
    )
  }
}

#[cfg(test)]
mod tests {
  use super::CoreError;

  #[test]
  fn codes_follow_taxonomy_order() {
    let codes = [
      CoreError::InvalidAmount,
      CoreError::InvalidTrade,
      CoreError::InsufficientGasBalance,
      CoreError::InsufficientTokenBalance,
      CoreError::InsufficientAllowance,
    ]
    .map(|e| e.code());
    assert_eq!(codes, [Some(0), Some(1), Some(2), Some(3), Some(4)]);
    assert_eq!(CoreError::Arithmetic.code(), None);
  }

  #[test]
  fn only_balance_checks_are_non_breaking() {
    assert!(!CoreError::InvalidAmount.is_non_breaking());
    assert!(!CoreError::InvalidTrade.is_non_breaking());
    assert!(CoreError::InsufficientAllowance.is_non_breaking());
  }
}
