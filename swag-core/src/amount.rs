//! Conversions between user-entered decimal strings, base units and
//! display strings.

use ethers::types::U256;
use ethers::utils::{parse_units, ParseUnits};

use crate::error::CoreError::{InvalidAmount, InvalidFormat};
use crate::error::Result;
use crate::util::TOKEN_DECIMALS;

/// Default number of fractional digits shown for an amount.
pub const DISPLAY_DECIMALS: u32 = 3;

/// Parses a non-negative decimal string into 18-decimal base units.
pub fn parse_amount(input: &str) -> Result<U256> {
  parse_amount_with_decimals(input, TOKEN_DECIMALS)
}

/// Parses a non-negative decimal string into base units of `decimals`.
pub fn parse_amount_with_decimals(input: &str, decimals: u32) -> Result<U256> {
  let trimmed = input.trim();
  if trimmed.is_empty() || trimmed == "." {
    return Err(InvalidAmount);
  }
  match parse_units(trimmed, decimals) {
    Ok(ParseUnits::U256(value)) => Ok(value),
    Ok(ParseUnits::I256(_)) | Err(_) => Err(InvalidAmount),
  }
}

/// Renders `amount` with every significant fractional digit, keeping at
/// least one (`"1.0"`, `"0.25"`).
#[must_use]
pub fn format_units_trimmed(amount: U256, decimals: u32) -> String {
  let base = U256::exp10(decimals as usize);
  let whole = amount / base;
  if decimals == 0 {
    return whole.to_string();
  }
  let fraction = (amount % base).to_string();
  let padded = format!("{fraction:0>width$}", width = decimals as usize);
  let significant = padded.trim_end_matches('0');
  if significant.is_empty() {
    format!("{whole}.0")
  } else {
    format!("{whole}.{significant}")
  }
}

/// Formats a base-unit amount for display.
///
/// * `None` stays `None`, zero becomes `"0"`.
/// * Amounts below one display unit become `"<0.001"` (for three display
///   decimals) when `use_less_than` is set, otherwise the exact value.
/// * Everything else is rounded half up to `display_decimals` with trailing
///   zeros removed.
pub fn amount_formatter(
  amount: Option<U256>,
  base_decimals: u32,
  display_decimals: u32,
  use_less_than: bool,
) -> Result<Option<String>> {
  if base_decimals > TOKEN_DECIMALS
    || display_decimals > TOKEN_DECIMALS
    || display_decimals > base_decimals
  {
    return Err(InvalidFormat);
  }
  let Some(amount) = amount else {
    return Ok(None);
  };
  if amount.is_zero() {
    return Ok(Some("0".to_string()));
  }

  let minimum_display =
    U256::exp10((base_decimals - display_decimals) as usize);
  if amount < minimum_display {
    let rendered = if use_less_than {
      format!("<{}", format_units_trimmed(minimum_display, base_decimals))
    } else {
      format_units_trimmed(amount, base_decimals)
    };
    return Ok(Some(rendered));
  }

  let units = amount.saturating_add(minimum_display / 2) / minimum_display;
  let display_base = U256::exp10(display_decimals as usize);
  let whole = units / display_base;
  let fraction = units % display_base;
  if fraction.is_zero() {
    Ok(Some(whole.to_string()))
  } else {
    let padded = format!(
      "{:0>width$}",
      fraction.to_string(),
      width = display_decimals as usize
    );
    Ok(Some(format!("{whole}.{}", padded.trim_end_matches('0'))))
  }
}

/// [`amount_formatter`] with 18 base decimals, three display decimals and
/// the less-than prefix.
pub fn format_amount(amount: U256) -> Result<String> {
  amount_formatter(Some(amount), TOKEN_DECIMALS, DISPLAY_DECIMALS, true)
    .map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
  use super::*;

  use crate::util::one_token;

  fn fmt(amount: U256, display: u32, less_than: bool) -> Option<String> {
    amount_formatter(Some(amount), 18, display, less_than).unwrap()
  }

  #[test]
  fn parses_whole_and_fraction() {
    assert_eq!(parse_amount("1"), Ok(one_token()));
    assert_eq!(parse_amount("0.5"), Ok(one_token() / 2));
    assert_eq!(parse_amount(" 2.25 "), Ok(one_token() * 9 / 4));
  }

  #[test]
  fn rejects_unparsable_amounts() {
    for input in ["", ".", "abc", "-1", "1.2.3", "1e18"] {
      assert_eq!(parse_amount(input), Err(InvalidAmount), "{input}");
    }
  }

  #[test]
  fn zero_formats_as_zero() {
    assert_eq!(fmt(U256::zero(), 3, true), Some("0".to_string()));
    assert_eq!(fmt(U256::zero(), 18, false), Some("0".to_string()));
  }

  #[test]
  fn missing_amount_is_none() {
    assert_eq!(amount_formatter(None, 18, 3, true), Ok(None));
  }

  #[test]
  fn below_minimum_display_unit() {
    let dust = U256::exp10(14);
    assert_eq!(fmt(dust, 3, true), Some("<0.001".to_string()));
    assert_eq!(fmt(dust, 3, false), Some("0.0001".to_string()));
  }

  #[test]
  fn rounds_half_up_and_trims() {
    let amount = one_token() + U256::exp10(17) * 2 + U256::exp10(15) * 5;
    assert_eq!(fmt(amount, 3, true), Some("1.205".to_string()));
    assert_eq!(fmt(amount, 2, true), Some("1.21".to_string()));
    assert_eq!(fmt(amount, 1, true), Some("1.2".to_string()));
  }

  #[test]
  fn whole_amounts_drop_fraction() {
    assert_eq!(fmt(one_token() * 42, 3, true), Some("42".to_string()));
  }

  #[test]
  fn rounding_carries_into_whole_part() {
    let amount = one_token() - U256::exp10(14) * 4;
    assert_eq!(fmt(amount, 3, true), Some("1".to_string()));
  }

  #[test]
  fn invalid_decimal_combinations() {
    assert_eq!(amount_formatter(None, 19, 3, true), Err(InvalidFormat));
    assert_eq!(amount_formatter(None, 6, 8, true), Err(InvalidFormat));
  }

  #[test]
  fn trimmed_units() {
    assert_eq!(format_units_trimmed(one_token(), 18), "1.0");
    assert_eq!(format_units_trimmed(one_token() / 4, 18), "0.25");
  }
}
