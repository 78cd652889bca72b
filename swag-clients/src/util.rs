use std::time::{Duration, SystemTime};

use anyhow::{anyhow, Result};
use ethers::types::U256;

/// How long a submitted swap stays executable.
pub const SWAP_DEADLINE: Duration = Duration::from_secs(15 * 60);

/// Unix timestamp `ttl` from now, as a router deadline.
///
/// # Errors
/// - System clock before the Unix epoch
pub fn deadline_from_now(ttl: Duration) -> Result<U256> {
  let deadline = (SystemTime::now() + ttl)
    .duration_since(SystemTime::UNIX_EPOCH)
    .map_err(|e| anyhow!("System clock before Unix epoch: {e}"))?;
  Ok(U256::from(deadline.as_secs()))
}

/// [`deadline_from_now`] with [`SWAP_DEADLINE`].
///
/// # Errors
/// - System clock before the Unix epoch
pub fn swap_deadline() -> Result<U256> {
  deadline_from_now(SWAP_DEADLINE)
}
