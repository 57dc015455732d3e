//! Adapter traits for the yield vault
//!
//! Strategies and accountants live outside the pallet. The runtime wires them in through
//! these two traits, so the vault never assumes how a strategy earns yield or how fees
//! are assessed.

use frame::prelude::*;
use primitives::{AssetKind, Balance};

/// A yield strategy as seen by a vault.
///
/// `vault` is always the vault's sovereign account. A strategy may serve several vaults and
/// must answer per vault.
pub trait StrategyOps<AccountId> {
  /// Asset the strategy accepts. `None` if `strategy` is not a strategy at all.
  fn asset(strategy: &AccountId) -> Option<AssetKind>;

  /// Value the strategy currently holds on behalf of `vault`.
  fn total_assets(strategy: &AccountId, vault: &AccountId) -> Balance;

  /// How much more the strategy accepts from `vault` right now.
  fn max_deposit(strategy: &AccountId, vault: &AccountId) -> Balance;

  /// How much the strategy can hand back to `vault` right now.
  fn max_withdraw(strategy: &AccountId, vault: &AccountId) -> Balance;

  /// Pull exactly `amount` of the strategy asset out of `vault`.
  fn deposit(strategy: &AccountId, vault: &AccountId, amount: Balance)
  -> Result<(), DispatchError>;

  /// Send up to `amount` back to `vault`. Returning less than asked is not an error; the
  /// vault measures what actually arrived.
  fn withdraw(
    strategy: &AccountId,
    vault: &AccountId,
    amount: Balance,
  ) -> Result<(), DispatchError>;
}

/// Fee assessment hook called on every strategy report.
pub trait Accountant<AccountId> {
  /// Fees owed to `accountant`, in vault assets. The vault caps the result at `gain`.
  fn report(
    accountant: &AccountId,
    strategy: &AccountId,
    gain: Balance,
    loss: Balance,
  ) -> Result<Balance, DispatchError>;
}

/// No strategies: nothing can be added to a vault.
impl<AccountId> StrategyOps<AccountId> for () {
  fn asset(_: &AccountId) -> Option<AssetKind> {
    None
  }

  fn total_assets(_: &AccountId, _: &AccountId) -> Balance {
    0
  }

  fn max_deposit(_: &AccountId, _: &AccountId) -> Balance {
    0
  }

  fn max_withdraw(_: &AccountId, _: &AccountId) -> Balance {
    0
  }

  fn deposit(_: &AccountId, _: &AccountId, _: Balance) -> Result<(), DispatchError> {
    Err(DispatchError::Other("StrategyOps not configured"))
  }

  fn withdraw(_: &AccountId, _: &AccountId, _: Balance) -> Result<(), DispatchError> {
    Err(DispatchError::Other("StrategyOps not configured"))
  }
}

/// Fee-free accountant.
impl<AccountId> Accountant<AccountId> for () {
  fn report(_: &AccountId, _: &AccountId, _: Balance, _: Balance) -> Result<Balance, DispatchError> {
    Ok(0)
  }
}
