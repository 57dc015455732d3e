//! Vault domain types: capability bits, strategy records, vault state and the profit lock.

use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use core::ops::{BitOr, BitOrAssign};
use frame::deps::sp_core::U256;
use primitives::{AssetKind, Balance, Moment};
use scale_info::TypeInfo;

/// A single capability bit. The numeric values are part of the public interface and are
/// what clients combine when calling `set_role`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u16)]
pub enum Role {
  AddStrategyManager = 1,
  RevokeStrategyManager = 2,
  ForceRevokeManager = 4,
  AccountantManager = 8,
  QueueManager = 16,
  ReportingManager = 32,
  DebtManager = 64,
  MaxDebtManager = 128,
  DepositLimitManager = 256,
  MinimumIdleManager = 512,
  ProfitUnlockManager = 1024,
  Sweeper = 2048,
  EmergencyManager = 4096,
}

impl Role {
  pub const ALL: [Role; 13] = [
    Role::AddStrategyManager,
    Role::RevokeStrategyManager,
    Role::ForceRevokeManager,
    Role::AccountantManager,
    Role::QueueManager,
    Role::ReportingManager,
    Role::DebtManager,
    Role::MaxDebtManager,
    Role::DepositLimitManager,
    Role::MinimumIdleManager,
    Role::ProfitUnlockManager,
    Role::Sweeper,
    Role::EmergencyManager,
  ];

  pub const fn bit(self) -> u16 {
    self as u16
  }
}

/// Set of [`Role`] bits held by one account on one vault.
#[derive(
  Clone,
  Copy,
  Debug,
  Decode,
  DecodeWithMemTracking,
  Default,
  Encode,
  Eq,
  MaxEncodedLen,
  PartialEq,
  TypeInfo,
)]
pub struct Roles(u16);

impl Roles {
  /// Every defined bit set
  pub const ALL_BITS: u16 = 0x1FFF;

  /// `SWEEPER | REPORTING_MANAGER`
  pub const ACCOUNTING_MANAGER: Roles =
    Roles(Role::Sweeper.bit() | Role::ReportingManager.bit());

  pub const fn empty() -> Self {
    Roles(0)
  }

  pub const fn all() -> Self {
    Roles(Self::ALL_BITS)
  }

  /// Keeps only the defined bits of `bits`.
  pub const fn from_bits_truncate(bits: u16) -> Self {
    Roles(bits & Self::ALL_BITS)
  }

  pub const fn bits(self) -> u16 {
    self.0
  }

  pub const fn is_empty(self) -> bool {
    self.0 == 0
  }

  pub const fn contains(self, role: Role) -> bool {
    self.0 & role.bit() != 0
  }

  pub fn insert(&mut self, role: Role) {
    self.0 |= role.bit();
  }

  pub fn iter(self) -> impl Iterator<Item = Role> {
    Role::ALL.into_iter().filter(move |role| self.contains(*role))
  }
}

impl From<Role> for Roles {
  fn from(role: Role) -> Self {
    Roles(role.bit())
  }
}

impl BitOr for Role {
  type Output = Roles;

  fn bitor(self, rhs: Role) -> Roles {
    Roles(self.bit() | rhs.bit())
  }
}

impl BitOr<Role> for Roles {
  type Output = Roles;

  fn bitor(self, rhs: Role) -> Roles {
    Roles(self.0 | rhs.bit())
  }
}

impl BitOr for Roles {
  type Output = Roles;

  fn bitor(self, rhs: Roles) -> Roles {
    Roles(self.0 | rhs.0)
  }
}

impl BitOrAssign<Role> for Roles {
  fn bitor_assign(&mut self, rhs: Role) {
    self.insert(rhs);
  }
}

#[derive(
  Clone,
  Copy,
  Debug,
  Decode,
  DecodeWithMemTracking,
  Encode,
  Eq,
  MaxEncodedLen,
  PartialEq,
  TypeInfo,
)]
pub enum StrategyStatus {
  Active,
  Revoked,
}

/// Kind of registry change carried by `StrategyChanged`
#[derive(
  Clone,
  Copy,
  Debug,
  Decode,
  DecodeWithMemTracking,
  Encode,
  Eq,
  MaxEncodedLen,
  PartialEq,
  TypeInfo,
)]
pub enum StrategyChangeType {
  Added,
  Revoked,
}

/// Registry record of one strategy attached to a vault
#[derive(
  Clone,
  Copy,
  Debug,
  Decode,
  DecodeWithMemTracking,
  Encode,
  Eq,
  MaxEncodedLen,
  PartialEq,
  TypeInfo,
)]
pub struct StrategyParams {
  pub status: StrategyStatus,
  /// Time the strategy was (last) added
  pub activation: Moment,
  /// Time of the last processed report
  pub last_report: Moment,
  /// Assets the vault currently accounts as lent to the strategy
  pub current_debt: Balance,
  /// Cap on `current_debt` enforced when debt is raised
  pub max_debt: Balance,
}

impl StrategyParams {
  pub fn new(now: Moment) -> Self {
    Self {
      status: StrategyStatus::Active,
      activation: now,
      last_report: now,
      current_debt: 0,
      max_debt: 0,
    }
  }

  pub fn is_active(&self) -> bool {
    self.status == StrategyStatus::Active
  }
}

/// Reported gains that are released to share holders linearly over time.
///
/// `locked` is the amount still locked as of `last_update`; it decays to zero at
/// `full_unlock_at`.
#[derive(
  Clone,
  Copy,
  Debug,
  Decode,
  DecodeWithMemTracking,
  Default,
  Encode,
  Eq,
  MaxEncodedLen,
  PartialEq,
  TypeInfo,
)]
pub struct ProfitLock {
  pub locked: Balance,
  pub last_update: Moment,
  pub full_unlock_at: Moment,
}

impl ProfitLock {
  /// Amount still locked at `now`.
  pub fn still_locked(&self, now: Moment) -> Balance {
    if self.locked == 0 || now >= self.full_unlock_at {
      return 0;
    }
    if now <= self.last_update {
      return self.locked;
    }
    let remaining = (self.full_unlock_at - now) as Balance;
    let span = (self.full_unlock_at - self.last_update) as Balance;
    mul_div(self.locked, remaining, span).unwrap_or(self.locked)
  }

  /// Amount released between `last_update` and `now`.
  pub fn unlocked(&self, now: Moment) -> Balance {
    self.locked.saturating_sub(self.still_locked(now))
  }

  fn settle(&mut self, now: Moment) {
    self.locked = self.still_locked(now);
    self.last_update = now;
    if self.locked == 0 {
      self.full_unlock_at = now;
    }
  }

  /// Adds `amount` to the lock. The unlock horizon becomes the amount-weighted average of the
  /// remaining horizon and `unlock_time`. With `unlock_time == 0` the profit is released
  /// immediately.
  pub fn lock(&mut self, now: Moment, amount: Balance, unlock_time: Moment) {
    self.settle(now);
    if amount == 0 || unlock_time == 0 {
      return;
    }
    let remaining = self.full_unlock_at.saturating_sub(now);
    let total = self.locked.saturating_add(amount);
    let weighted = U256::from(self.locked) * U256::from(remaining)
      + U256::from(amount) * U256::from(unlock_time);
    let horizon = (weighted / U256::from(total)).low_u64();
    self.locked = total;
    self.full_unlock_at = now.saturating_add(horizon);
  }

  /// Burns up to `loss` of the locked profit and returns the part left uncovered.
  pub fn absorb_loss(&mut self, now: Moment, loss: Balance) -> Balance {
    self.settle(now);
    let absorbed = self.locked.min(loss);
    self.locked -= absorbed;
    if self.locked == 0 {
      self.full_unlock_at = now;
    }
    loss - absorbed
  }

  /// Releases everything at once.
  pub fn release(&mut self, now: Moment) {
    *self = ProfitLock { locked: 0, last_update: now, full_unlock_at: now };
  }
}

/// State of one vault
#[derive(
  Clone,
  Debug,
  Decode,
  DecodeWithMemTracking,
  Encode,
  Eq,
  MaxEncodedLen,
  PartialEq,
  TypeInfo,
)]
pub struct VaultInfo<AccountId> {
  /// Underlying asset custodied by the vault
  pub asset: AssetKind,
  /// Sovereign account holding idle funds
  pub account: AccountId,
  /// Sole account allowed to assign roles; receives swept funds
  pub role_manager: AccountId,
  pub shutdown: bool,
  pub deposit_limit: Balance,
  pub minimum_total_idle: Balance,
  pub profit_max_unlock_time: Moment,
  pub accountant: Option<AccountId>,
  pub queue_manager: Option<AccountId>,
  pub total_idle: Balance,
  pub total_debt: Balance,
  pub total_supply: Balance,
  pub profit_lock: ProfitLock,
}

impl<AccountId> VaultInfo<AccountId> {
  pub fn new(
    asset: AssetKind,
    account: AccountId,
    role_manager: AccountId,
    deposit_limit: Balance,
    profit_max_unlock_time: Moment,
    now: Moment,
  ) -> Self {
    Self {
      asset,
      account,
      role_manager,
      shutdown: false,
      deposit_limit,
      minimum_total_idle: 0,
      profit_max_unlock_time,
      accountant: None,
      queue_manager: None,
      total_idle: 0,
      total_debt: 0,
      total_supply: 0,
      profit_lock: ProfitLock { locked: 0, last_update: now, full_unlock_at: now },
    }
  }

  /// Assets backing the shares at `now`: idle plus debt, minus profit still locked.
  pub fn total_assets(&self, now: Moment) -> Balance {
    self
      .total_idle
      .saturating_add(self.total_debt)
      .saturating_sub(self.profit_lock.still_locked(now))
  }

  /// Shares minted for `assets`, rounding down. 1:1 while the vault is empty; zero while
  /// outstanding shares are backed by nothing.
  pub fn convert_to_shares(&self, assets: Balance, now: Moment) -> Option<Balance> {
    if self.total_supply == 0 {
      return Some(assets);
    }
    let total_assets = self.total_assets(now);
    if total_assets == 0 {
      return Some(0);
    }
    mul_div(assets, self.total_supply, total_assets)
  }

  /// Assets redeemable for `shares`, rounding down.
  pub fn convert_to_assets(&self, shares: Balance, now: Moment) -> Option<Balance> {
    if self.total_supply == 0 {
      return Some(shares);
    }
    mul_div(shares, self.total_assets(now), self.total_supply)
  }
}

/// Coarse classification of dispatch errors.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
  /// Caller lacks the capability bit
  Forbidden,
  /// Operation is not valid in the current vault or strategy state
  InvalidState,
  /// Not enough idle funds or shares
  InsufficientFunds,
}

/// `a * b / c` without intermediate overflow; `None` when `c` is zero or the result does
/// not fit.
pub fn mul_div(a: Balance, b: Balance, c: Balance) -> Option<Balance> {
  if c == 0 {
    return None;
  }
  let result = U256::from(a) * U256::from(b) / U256::from(c);
  if result > U256::from(Balance::MAX) {
    return None;
  }
  Some(result.low_u128())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn role_bits_are_stable() {
    assert_eq!(Role::AddStrategyManager.bit(), 1);
    assert_eq!(Role::DebtManager.bit(), 64);
    assert_eq!(Role::EmergencyManager.bit(), 4096);
    let union = Role::ALL.iter().fold(0u16, |acc, role| acc | role.bit());
    assert_eq!(union, Roles::ALL_BITS);
    assert_eq!(Roles::ACCOUNTING_MANAGER.bits(), 2048 | 32);
  }

  #[test]
  fn roles_combine_and_truncate() {
    let roles = Role::EmergencyManager | Role::DebtManager;
    assert_eq!(roles.bits(), 4160);
    assert!(roles.contains(Role::DebtManager));
    assert!(!roles.contains(Role::Sweeper));
    assert_eq!(roles.iter().collect::<Vec<_>>(), vec![Role::DebtManager, Role::EmergencyManager]);

    assert_eq!(Roles::from_bits_truncate(u16::MAX), Roles::all());
    assert!(Roles::from_bits_truncate(0xE000).is_empty());

    let mut accounting = Roles::empty();
    accounting |= Role::Sweeper;
    assert_eq!(accounting | Role::ReportingManager, Roles::ACCOUNTING_MANAGER);
    assert_eq!(accounting | Roles::from(Role::ReportingManager), Roles::ACCOUNTING_MANAGER);
  }

  #[test]
  fn profit_unlocks_linearly() {
    let mut lock = ProfitLock::default();
    lock.lock(100, 1_000, 1_000);
    assert_eq!(lock.full_unlock_at, 1_100);
    assert_eq!(lock.still_locked(100), 1_000);
    assert_eq!(lock.still_locked(600), 500);
    assert_eq!(lock.unlocked(850), 750);
    assert_eq!(lock.still_locked(1_100), 0);
  }

  #[test]
  fn new_profit_extends_horizon_by_weight() {
    let mut lock = ProfitLock::default();
    lock.lock(0, 1_000, 1_000);
    // 500 still locked with 500s left, plus 500 over 1000s -> 750s average
    lock.lock(500, 500, 1_000);
    assert_eq!(lock.locked, 1_000);
    assert_eq!(lock.full_unlock_at, 1_250);
  }

  #[test]
  fn zero_unlock_time_releases_immediately() {
    let mut lock = ProfitLock::default();
    lock.lock(10, 1_000, 0);
    assert_eq!(lock.still_locked(10), 0);
  }

  #[test]
  fn loss_burns_locked_profit_first() {
    let mut lock = ProfitLock::default();
    lock.lock(0, 1_000, 100);
    assert_eq!(lock.absorb_loss(0, 400), 0);
    assert_eq!(lock.locked, 600);
    assert_eq!(lock.absorb_loss(0, 1_000), 400);
    assert_eq!(lock.locked, 0);
  }

  #[test]
  fn share_conversion_follows_price() {
    let mut vault = VaultInfo::new(AssetKind::Local(1), 0u64, 0u64, Balance::MAX, 0, 0);
    assert_eq!(vault.convert_to_shares(100, 0), Some(100));
    vault.total_idle = 200;
    vault.total_supply = 100;
    assert_eq!(vault.convert_to_shares(100, 0), Some(50));
    assert_eq!(vault.convert_to_assets(50, 0), Some(100));
    vault.total_idle = 0;
    assert_eq!(vault.convert_to_shares(100, 0), Some(0));
    assert_eq!(mul_div(1, 1, 0), None);
    assert_eq!(mul_div(Balance::MAX, 2, 1), None);
  }
}
