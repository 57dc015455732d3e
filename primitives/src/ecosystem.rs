//! Ecosystem Constants
//!
//! Pallet IDs and economic parameters shared by the runtime configuration and the pallets.

/// Balance type alias for consistency across ecosystem
pub type Balance = u128;

/// Unix timestamp / duration in seconds
pub type Moment = u64;

/// Pallet identifiers for deriving pallet-owned accounts.
///
/// Used with `PalletId::into_sub_account_truncating()` to derive deterministic accounts.
pub mod pallet_ids {
  /// Yield Vault pallet ID (vault sovereign accounts are sub-accounts of it)
  pub const YIELD_VAULT_PALLET_ID: &[u8; 8] = b"py/yvlt0";
}

/// Ecosystem parameters
pub mod params {
  use super::{Balance, Moment};

  /// Precision scalar of one whole token (10^12).
  pub const PRECISION: Balance = 1_000_000_000_000;

  /// Seconds in a day.
  pub const DAY: Moment = 86_400;

  /// Seconds in a week.
  pub const WEEK: Moment = 7 * DAY;

  /// Seconds in a year (365.2425 days).
  pub const YEAR: Moment = 31_556_952;

  /// Upper bound for a vault's profit unlocking period.
  pub const MAX_PROFIT_UNLOCK_TIME: Moment = YEAR;

  /// Deposit limit given to newly created vaults (unbounded).
  pub const DEFAULT_DEPOSIT_LIMIT: Balance = Balance::MAX;
}
