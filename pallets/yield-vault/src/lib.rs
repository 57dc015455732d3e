//! Yield Vault Pallet
//!
//! Custodial vaults that pool a single asset, lend it to yield strategies and keep the
//! books on every strategy's debt, gains and losses.
//!
//! Every privileged call is gated by a per-vault bitmask of capability bits ([`Role`]).
//! The vault's `role_manager` assigns the bitmasks; nobody else can. `shutdown_vault` is a
//! one-way latch: deposits stop, withdrawals keep working and the caller gains
//! [`Role::DebtManager`] so it can pull funds back from the strategies.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub use pallet::*;

pub mod adapters;
pub use adapters::{Accountant, StrategyOps};

pub mod types;
pub use types::{
  ErrorKind, ProfitLock, Role, Roles, StrategyChangeType, StrategyParams, StrategyStatus,
  VaultInfo,
};

pub mod weights;
pub use weights::WeightInfo;

#[cfg(test)]
mod mock;

#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

pub const LOG_TARGET: &str = "runtime::yield-vault";

/// Runtime-specific setup for benchmarks
#[cfg(feature = "runtime-benchmarks")]
pub trait BenchmarkHelper<AccountId> {
  /// A strategy accepting `asset` that the runtime's `StrategyOps` recognises.
  fn strategy(asset: primitives::AssetKind) -> AccountId;
  /// Credit `amount` of `asset` to `who`.
  fn fund(
    who: &AccountId,
    asset: primitives::AssetKind,
    amount: primitives::Balance,
  ) -> frame::deps::sp_runtime::DispatchResult;
}

#[frame::pallet]
pub mod pallet {
  use super::{Accountant, LOG_TARGET, StrategyOps, WeightInfo};
  use crate::types::*;
  use alloc::vec::Vec;
  use frame::deps::{
    frame_support::{
      PalletId,
      traits::{
        UnixTime,
        fungible::{Inspect as NativeInspect, Mutate as NativeMutate},
        fungibles::{Inspect as FungiblesInspect, Mutate as FungiblesMutate},
        tokens::Preservation,
      },
    },
    sp_runtime::traits::{AccountIdConversion, Zero},
  };
  use frame::prelude::*;
  use primitives::{AssetKind, Balance, Moment};

  pub type VaultId = u32;
  pub type VaultInfoOf<T> = VaultInfo<<T as frame_system::Config>::AccountId>;

  #[pallet::config]
  pub trait Config: frame_system::Config<RuntimeEvent: From<Event<Self>>> {
    /// Local and foreign assets (`AssetKind::Local` / `AssetKind::Foreign`)
    type Assets: FungiblesInspect<Self::AccountId, AssetId = u32, Balance = Balance>
      + FungiblesMutate<Self::AccountId, AssetId = u32, Balance = Balance>;

    /// Native currency (`AssetKind::Native`)
    type Currency: NativeInspect<Self::AccountId, Balance = Balance>
      + NativeMutate<Self::AccountId, Balance = Balance>;

    /// Strategies vaults can lend to
    type StrategyOps: StrategyOps<Self::AccountId>;

    /// Fee assessment on reports
    type Accountant: Accountant<Self::AccountId>;

    /// Wall clock for report timestamps and profit unlocking
    type UnixTime: UnixTime;

    /// Origin allowed to create vaults
    type AdminOrigin: EnsureOrigin<Self::RuntimeOrigin>;

    /// Seed of the vaults' sovereign accounts
    #[pallet::constant]
    type PalletId: Get<PalletId>;

    /// Deposit limit of a freshly created vault
    #[pallet::constant]
    type DefaultDepositLimit: Get<Balance>;

    /// Upper bound for `profit_max_unlock_time`, in seconds
    #[pallet::constant]
    type MaxProfitUnlockTime: Get<Moment>;

    /// How many strategies a single withdrawal may pull from
    #[pallet::constant]
    type MaxWithdrawStrategies: Get<u32>;

    type WeightInfo: WeightInfo;

    #[cfg(feature = "runtime-benchmarks")]
    type BenchmarkHelper: crate::BenchmarkHelper<Self::AccountId>;
  }

  #[pallet::pallet]
  pub struct Pallet<T>(PhantomData<T>);

  #[pallet::storage]
  pub type NextVaultId<T: Config> = StorageValue<_, VaultId, ValueQuery>;

  #[pallet::storage]
  #[pallet::getter(fn vaults)]
  pub type Vaults<T: Config> = StorageMap<_, Blake2_128Concat, VaultId, VaultInfoOf<T>>;

  /// Capability bits per account and vault
  #[pallet::storage]
  #[pallet::getter(fn roles)]
  pub type AccountRoles<T: Config> = StorageDoubleMap<
    _,
    Blake2_128Concat,
    VaultId,
    Blake2_128Concat,
    T::AccountId,
    Roles,
    ValueQuery,
  >;

  /// Strategy registry. A missing entry means the strategy was never added.
  #[pallet::storage]
  #[pallet::getter(fn strategies)]
  pub type Strategies<T: Config> = StorageDoubleMap<
    _,
    Blake2_128Concat,
    VaultId,
    Blake2_128Concat,
    T::AccountId,
    StrategyParams,
  >;

  #[pallet::storage]
  #[pallet::getter(fn balance_of)]
  pub type Shares<T: Config> = StorageDoubleMap<
    _,
    Blake2_128Concat,
    VaultId,
    Blake2_128Concat,
    T::AccountId,
    Balance,
    ValueQuery,
  >;

  #[pallet::event]
  #[pallet::generate_deposit(pub(super) fn deposit_event)]
  pub enum Event<T: Config> {
    VaultCreated {
      vault_id: VaultId,
      asset: AssetKind,
      account: T::AccountId,
      role_manager: T::AccountId,
    },
    RoleSet {
      vault_id: VaultId,
      account: T::AccountId,
      roles: Roles,
    },
    StrategyChanged {
      vault_id: VaultId,
      strategy: T::AccountId,
      change_type: StrategyChangeType,
    },
    UpdatedMaxDebtForStrategy {
      vault_id: VaultId,
      sender: T::AccountId,
      strategy: T::AccountId,
      new_debt: Balance,
    },
    DebtUpdated {
      vault_id: VaultId,
      strategy: T::AccountId,
      current_debt: Balance,
      new_debt: Balance,
    },
    StrategyReported {
      vault_id: VaultId,
      strategy: T::AccountId,
      gain: Balance,
      loss: Balance,
      current_debt: Balance,
      total_fees: Balance,
    },
    Shutdown {
      vault_id: VaultId,
    },
    Sweep {
      vault_id: VaultId,
      token: AssetKind,
      amount: Balance,
    },
    UpdateMinimumTotalIdle {
      vault_id: VaultId,
      minimum_total_idle: Balance,
    },
    UpdateDepositLimit {
      vault_id: VaultId,
      deposit_limit: Balance,
    },
    UpdateAccountant {
      vault_id: VaultId,
      accountant: T::AccountId,
    },
    UpdateQueueManager {
      vault_id: VaultId,
      queue_manager: T::AccountId,
    },
    UpdateProfitMaxUnlockTime {
      vault_id: VaultId,
      profit_max_unlock_time: Moment,
    },
    Deposit {
      vault_id: VaultId,
      who: T::AccountId,
      assets: Balance,
      shares: Balance,
    },
    Withdraw {
      vault_id: VaultId,
      who: T::AccountId,
      assets: Balance,
      shares: Balance,
    },
  }

  #[pallet::error]
  pub enum Error<T> {
    /// Caller lacks the capability bit for this call
    NotAllowed,
    VaultNotFound,
    /// Strategy is already active on this vault
    StrategyAlreadyActive,
    /// Strategy was never added to this vault
    StrategyNotFound,
    /// Strategy has been revoked
    InactiveStrategy,
    /// Strategy still carries debt; use force revoke to write it off
    StrategyHasDebt,
    /// Strategy asset differs from the vault asset
    InvalidAsset,
    /// Requested debt equals the current debt
    DebtUnchanged,
    /// Vault is shut down
    VaultShutdown,
    AlreadyShutdown,
    /// Not enough idle funds above the minimum idle reserve
    InsufficientIdle,
    /// Strategy accepts no further deposits
    StrategyAtCapacity,
    /// Strategy has nothing it can return right now
    NothingToWithdraw,
    /// Strategy did not take exactly the deposited amount
    DepositMismatch,
    /// Vault account would lose more than the paid amount (dust below the minimum balance)
    PayoutMismatch,
    NothingToSweep,
    ZeroAmount,
    ExceedsDepositLimit,
    InsufficientShares,
    ProfitUnlockTimeTooLong,
    Overflow,
  }

  impl<T> Error<T> {
    pub fn kind(&self) -> ErrorKind {
      match self {
        Error::NotAllowed => ErrorKind::Forbidden,
        Error::InsufficientIdle | Error::InsufficientShares => ErrorKind::InsufficientFunds,
        _ => ErrorKind::InvalidState,
      }
    }
  }

  #[pallet::hooks]
  impl<T: Config> Hooks<BlockNumberFor<T>> for Pallet<T> {
    fn integrity_test() {
      assert!(
        T::MaxWithdrawStrategies::get() > 0,
        "MaxWithdrawStrategies must allow at least one strategy"
      );
    }

    #[cfg(feature = "try-runtime")]
    fn try_state(_n: BlockNumberFor<T>) -> Result<(), frame::deps::sp_runtime::TryRuntimeError> {
      Self::do_try_state()
    }
  }

  #[pallet::call]
  impl<T: Config> Pallet<T> {
    /// Create a vault for `asset` administered by `role_manager`.
    #[pallet::call_index(0)]
    #[pallet::weight(T::WeightInfo::create_vault())]
    pub fn create_vault(
      origin: OriginFor<T>,
      asset: AssetKind,
      role_manager: T::AccountId,
      profit_max_unlock_time: Moment,
    ) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      Self::do_create_vault(asset, role_manager, profit_max_unlock_time)?;
      Ok(())
    }

    /// Overwrite the capability bits of `account`. Only the vault's role manager may call
    /// this; an empty set revokes everything.
    #[pallet::call_index(1)]
    #[pallet::weight(T::WeightInfo::set_role())]
    pub fn set_role(
      origin: OriginFor<T>,
      vault_id: VaultId,
      account: T::AccountId,
      roles: Roles,
    ) -> DispatchResult {
      let who = ensure_signed(origin)?;
      let vault = Self::get_vault(vault_id)?;
      ensure!(who == vault.role_manager, Error::<T>::NotAllowed);
      let roles = Roles::from_bits_truncate(roles.bits());
      AccountRoles::<T>::insert(vault_id, &account, roles);
      Self::deposit_event(Event::RoleSet {
        vault_id,
        account,
        roles,
      });
      Ok(())
    }

    #[pallet::call_index(2)]
    #[pallet::weight(T::WeightInfo::add_strategy())]
    pub fn add_strategy(
      origin: OriginFor<T>,
      vault_id: VaultId,
      strategy: T::AccountId,
    ) -> DispatchResult {
      let who = ensure_signed(origin)?;
      Self::ensure_role(vault_id, &who, Role::AddStrategyManager)?;
      let vault = Self::get_vault(vault_id)?;
      if let Some(existing) = Strategies::<T>::get(vault_id, &strategy) {
        ensure!(!existing.is_active(), Error::<T>::StrategyAlreadyActive);
      }
      ensure!(
        T::StrategyOps::asset(&strategy) == Some(vault.asset),
        Error::<T>::InvalidAsset
      );
      Strategies::<T>::insert(vault_id, &strategy, StrategyParams::new(Self::now()));
      Self::deposit_event(Event::StrategyChanged {
        vault_id,
        strategy,
        change_type: StrategyChangeType::Added,
      });
      Ok(())
    }

    /// Revoke a strategy that holds no debt.
    #[pallet::call_index(3)]
    #[pallet::weight(T::WeightInfo::revoke_strategy())]
    pub fn revoke_strategy(
      origin: OriginFor<T>,
      vault_id: VaultId,
      strategy: T::AccountId,
    ) -> DispatchResult {
      let who = ensure_signed(origin)?;
      Self::ensure_role(vault_id, &who, Role::RevokeStrategyManager)?;
      Self::do_revoke_strategy(vault_id, &strategy, false)
    }

    /// Revoke a strategy and write off whatever debt it still carries as a loss.
    #[pallet::call_index(4)]
    #[pallet::weight(T::WeightInfo::force_revoke_strategy())]
    pub fn force_revoke_strategy(
      origin: OriginFor<T>,
      vault_id: VaultId,
      strategy: T::AccountId,
    ) -> DispatchResult {
      let who = ensure_signed(origin)?;
      Self::ensure_role(vault_id, &who, Role::ForceRevokeManager)?;
      Self::do_revoke_strategy(vault_id, &strategy, true)
    }

    #[pallet::call_index(5)]
    #[pallet::weight(T::WeightInfo::update_max_debt_for_strategy())]
    pub fn update_max_debt_for_strategy(
      origin: OriginFor<T>,
      vault_id: VaultId,
      strategy: T::AccountId,
      new_max_debt: Balance,
    ) -> DispatchResult {
      let who = ensure_signed(origin)?;
      Self::ensure_role(vault_id, &who, Role::MaxDebtManager)?;
      Self::get_vault(vault_id)?;
      let mut params = Self::active_strategy(vault_id, &strategy)?;
      params.max_debt = new_max_debt;
      Strategies::<T>::insert(vault_id, &strategy, params);
      Self::deposit_event(Event::UpdatedMaxDebtForStrategy {
        vault_id,
        sender: who,
        strategy,
        new_debt: new_max_debt,
      });
      Ok(())
    }

    /// Move funds between the vault's idle balance and `strategy` so that its debt
    /// approaches `target_debt`.
    #[pallet::call_index(6)]
    #[pallet::weight(T::WeightInfo::update_debt())]
    pub fn update_debt(
      origin: OriginFor<T>,
      vault_id: VaultId,
      strategy: T::AccountId,
      target_debt: Balance,
    ) -> DispatchResult {
      let who = ensure_signed(origin)?;
      Self::ensure_role(vault_id, &who, Role::DebtManager)?;
      Self::do_update_debt(vault_id, &strategy, target_debt)?;
      Ok(())
    }

    /// Realise the gain or loss of `strategy` against its recorded debt.
    #[pallet::call_index(7)]
    #[pallet::weight(T::WeightInfo::process_report())]
    pub fn process_report(
      origin: OriginFor<T>,
      vault_id: VaultId,
      strategy: T::AccountId,
    ) -> DispatchResult {
      let who = ensure_signed(origin)?;
      Self::ensure_role(vault_id, &who, Role::ReportingManager)?;
      Self::do_process_report(vault_id, &strategy)?;
      Ok(())
    }

    /// Shut the vault down for good.
    #[pallet::call_index(8)]
    #[pallet::weight(T::WeightInfo::shutdown_vault())]
    pub fn shutdown_vault(origin: OriginFor<T>, vault_id: VaultId) -> DispatchResult {
      let who = ensure_signed(origin)?;
      Self::ensure_role(vault_id, &who, Role::EmergencyManager)?;
      let mut vault = Self::get_vault(vault_id)?;
      ensure!(!vault.shutdown, Error::<T>::AlreadyShutdown);
      vault.shutdown = true;
      Vaults::<T>::insert(vault_id, vault);
      AccountRoles::<T>::mutate(vault_id, &who, |roles| roles.insert(Role::DebtManager));
      log::info!(target: LOG_TARGET, "vault {vault_id} shut down by {who:?}");
      Self::deposit_event(Event::Shutdown { vault_id });
      Ok(())
    }

    /// Send tokens the vault holds but does not account for to the role manager.
    #[pallet::call_index(9)]
    #[pallet::weight(T::WeightInfo::sweep())]
    pub fn sweep(origin: OriginFor<T>, vault_id: VaultId, token: AssetKind) -> DispatchResult {
      let who = ensure_signed(origin)?;
      Self::ensure_role(vault_id, &who, Role::Sweeper)?;
      let vault = Self::get_vault(vault_id)?;
      let balance = Self::asset_balance(&vault.account, token);
      let amount = if token == vault.asset {
        balance.saturating_sub(vault.total_idle)
      } else {
        balance
      };
      ensure!(!amount.is_zero(), Error::<T>::NothingToSweep);
      Self::pay_out(&vault, &vault.role_manager, token, amount)?;
      Self::deposit_event(Event::Sweep {
        vault_id,
        token,
        amount,
      });
      Ok(())
    }

    #[pallet::call_index(10)]
    #[pallet::weight(T::WeightInfo::set_minimum_total_idle())]
    pub fn set_minimum_total_idle(
      origin: OriginFor<T>,
      vault_id: VaultId,
      minimum_total_idle: Balance,
    ) -> DispatchResult {
      let who = ensure_signed(origin)?;
      Self::ensure_role(vault_id, &who, Role::MinimumIdleManager)?;
      Self::mutate_vault(vault_id, |vault| {
        vault.minimum_total_idle = minimum_total_idle;
        Ok(())
      })?;
      Self::deposit_event(Event::UpdateMinimumTotalIdle {
        vault_id,
        minimum_total_idle,
      });
      Ok(())
    }

    #[pallet::call_index(11)]
    #[pallet::weight(T::WeightInfo::set_deposit_limit())]
    pub fn set_deposit_limit(
      origin: OriginFor<T>,
      vault_id: VaultId,
      deposit_limit: Balance,
    ) -> DispatchResult {
      let who = ensure_signed(origin)?;
      Self::ensure_role(vault_id, &who, Role::DepositLimitManager)?;
      Self::mutate_vault(vault_id, |vault| {
        vault.deposit_limit = deposit_limit;
        Ok(())
      })?;
      Self::deposit_event(Event::UpdateDepositLimit {
        vault_id,
        deposit_limit,
      });
      Ok(())
    }

    #[pallet::call_index(12)]
    #[pallet::weight(T::WeightInfo::set_accountant())]
    pub fn set_accountant(
      origin: OriginFor<T>,
      vault_id: VaultId,
      accountant: T::AccountId,
    ) -> DispatchResult {
      let who = ensure_signed(origin)?;
      Self::ensure_role(vault_id, &who, Role::AccountantManager)?;
      Self::mutate_vault(vault_id, |vault| {
        vault.accountant = Some(accountant.clone());
        Ok(())
      })?;
      Self::deposit_event(Event::UpdateAccountant {
        vault_id,
        accountant,
      });
      Ok(())
    }

    #[pallet::call_index(13)]
    #[pallet::weight(T::WeightInfo::set_queue_manager())]
    pub fn set_queue_manager(
      origin: OriginFor<T>,
      vault_id: VaultId,
      queue_manager: T::AccountId,
    ) -> DispatchResult {
      let who = ensure_signed(origin)?;
      Self::ensure_role(vault_id, &who, Role::QueueManager)?;
      Self::mutate_vault(vault_id, |vault| {
        vault.queue_manager = Some(queue_manager.clone());
        Ok(())
      })?;
      Self::deposit_event(Event::UpdateQueueManager {
        vault_id,
        queue_manager,
      });
      Ok(())
    }

    /// Set how long reported profit takes to unlock. Zero releases whatever is still
    /// locked.
    #[pallet::call_index(14)]
    #[pallet::weight(T::WeightInfo::set_profit_max_unlock_time())]
    pub fn set_profit_max_unlock_time(
      origin: OriginFor<T>,
      vault_id: VaultId,
      profit_max_unlock_time: Moment,
    ) -> DispatchResult {
      let who = ensure_signed(origin)?;
      Self::ensure_role(vault_id, &who, Role::ProfitUnlockManager)?;
      ensure!(
        profit_max_unlock_time <= T::MaxProfitUnlockTime::get(),
        Error::<T>::ProfitUnlockTimeTooLong
      );
      let now = Self::now();
      Self::mutate_vault(vault_id, |vault| {
        if profit_max_unlock_time.is_zero() {
          vault.profit_lock.release(now);
        }
        vault.profit_max_unlock_time = profit_max_unlock_time;
        Ok(())
      })?;
      Self::deposit_event(Event::UpdateProfitMaxUnlockTime {
        vault_id,
        profit_max_unlock_time,
      });
      Ok(())
    }

    /// Deposit `assets` and receive vault shares.
    #[pallet::call_index(15)]
    #[pallet::weight(T::WeightInfo::deposit())]
    pub fn deposit(origin: OriginFor<T>, vault_id: VaultId, assets: Balance) -> DispatchResult {
      let who = ensure_signed(origin)?;
      let mut vault = Self::get_vault(vault_id)?;
      ensure!(!vault.shutdown, Error::<T>::VaultShutdown);
      ensure!(!assets.is_zero(), Error::<T>::ZeroAmount);
      let total = vault
        .total_idle
        .checked_add(vault.total_debt)
        .and_then(|total| total.checked_add(assets))
        .ok_or(Error::<T>::Overflow)?;
      ensure!(total <= vault.deposit_limit, Error::<T>::ExceedsDepositLimit);

      let shares = vault
        .convert_to_shares(assets, Self::now())
        .ok_or(Error::<T>::Overflow)?;
      ensure!(!shares.is_zero(), Error::<T>::ZeroAmount);

      Self::transfer_asset(&who, &vault.account, vault.asset, assets)?;
      vault.total_idle = vault.total_idle.checked_add(assets).ok_or(Error::<T>::Overflow)?;
      vault.total_supply = vault.total_supply.checked_add(shares).ok_or(Error::<T>::Overflow)?;
      Shares::<T>::mutate(vault_id, &who, |balance| *balance = balance.saturating_add(shares));
      Vaults::<T>::insert(vault_id, vault);

      Self::deposit_event(Event::Deposit {
        vault_id,
        who,
        assets,
        shares,
      });
      Ok(())
    }

    /// Redeem `shares` for vault assets. When idle funds fall short, debt is pulled back
    /// from `strategies` in the given order.
    #[pallet::call_index(16)]
    #[pallet::weight(T::WeightInfo::withdraw(strategies.len() as u32))]
    pub fn withdraw(
      origin: OriginFor<T>,
      vault_id: VaultId,
      shares: Balance,
      strategies: BoundedVec<T::AccountId, T::MaxWithdrawStrategies>,
    ) -> DispatchResult {
      let who = ensure_signed(origin)?;
      let mut vault = Self::get_vault(vault_id)?;
      ensure!(!shares.is_zero(), Error::<T>::ZeroAmount);
      let owned = Shares::<T>::get(vault_id, &who);
      ensure!(shares <= owned, Error::<T>::InsufficientShares);

      let assets = vault
        .convert_to_assets(shares, Self::now())
        .ok_or(Error::<T>::Overflow)?;
      ensure!(!assets.is_zero(), Error::<T>::ZeroAmount);

      for strategy in strategies.iter() {
        if vault.total_idle >= assets {
          break;
        }
        let mut params = Self::active_strategy(vault_id, strategy)?;
        let request = (assets - vault.total_idle).min(params.current_debt);
        if request.is_zero() || T::StrategyOps::max_withdraw(strategy, &vault.account).is_zero() {
          continue;
        }
        let current_debt = params.current_debt;
        let withdrawn = Self::withdraw_from_strategy(&vault, strategy, request)?;
        params.current_debt = current_debt - withdrawn;
        vault.total_idle = vault.total_idle.saturating_add(withdrawn);
        vault.total_debt = vault.total_debt.saturating_sub(withdrawn);
        Strategies::<T>::insert(vault_id, strategy, params);
        Self::deposit_event(Event::DebtUpdated {
          vault_id,
          strategy: strategy.clone(),
          current_debt,
          new_debt: params.current_debt,
        });
      }
      ensure!(assets <= vault.total_idle, Error::<T>::InsufficientIdle);

      Self::pay_out(&vault, &who, vault.asset, assets)?;
      vault.total_idle -= assets;
      vault.total_supply = vault.total_supply.saturating_sub(shares);
      let remaining = owned - shares;
      if remaining.is_zero() {
        Shares::<T>::remove(vault_id, &who);
      } else {
        Shares::<T>::insert(vault_id, &who, remaining);
      }
      Vaults::<T>::insert(vault_id, vault);

      Self::deposit_event(Event::Withdraw {
        vault_id,
        who,
        assets,
        shares,
      });
      Ok(())
    }
  }

  impl<T: Config> Pallet<T> {
    /// Sovereign account of `vault_id`
    pub fn vault_account(vault_id: VaultId) -> T::AccountId {
      T::PalletId::get().into_sub_account_truncating(vault_id)
    }

    pub fn has_role(vault_id: VaultId, who: &T::AccountId, role: Role) -> bool {
      AccountRoles::<T>::get(vault_id, who).contains(role)
    }

    pub fn is_shutdown(vault_id: VaultId) -> bool {
      Vaults::<T>::get(vault_id).is_some_and(|vault| vault.shutdown)
    }

    pub fn deposit_limit(vault_id: VaultId) -> Balance {
      Self::vault_field(vault_id, |vault| vault.deposit_limit)
    }

    pub fn minimum_total_idle(vault_id: VaultId) -> Balance {
      Self::vault_field(vault_id, |vault| vault.minimum_total_idle)
    }

    pub fn profit_max_unlock_time(vault_id: VaultId) -> Moment {
      Self::vault_field(vault_id, |vault| vault.profit_max_unlock_time)
    }

    pub fn accountant(vault_id: VaultId) -> Option<T::AccountId> {
      Vaults::<T>::get(vault_id).and_then(|vault| vault.accountant)
    }

    pub fn queue_manager(vault_id: VaultId) -> Option<T::AccountId> {
      Vaults::<T>::get(vault_id).and_then(|vault| vault.queue_manager)
    }

    pub fn total_idle(vault_id: VaultId) -> Balance {
      Self::vault_field(vault_id, |vault| vault.total_idle)
    }

    pub fn total_debt(vault_id: VaultId) -> Balance {
      Self::vault_field(vault_id, |vault| vault.total_debt)
    }

    pub fn total_supply(vault_id: VaultId) -> Balance {
      Self::vault_field(vault_id, |vault| vault.total_supply)
    }

    /// Assets backing the shares right now (locked profit excluded)
    pub fn total_assets(vault_id: VaultId) -> Balance {
      let now = Self::now();
      Self::vault_field(vault_id, |vault| vault.total_assets(now))
    }

    /// Profit released since the last report
    pub fn unlocked_profit(vault_id: VaultId) -> Balance {
      let now = Self::now();
      Self::vault_field(vault_id, |vault| vault.profit_lock.unlocked(now))
    }

    pub fn convert_to_shares(vault_id: VaultId, assets: Balance) -> Option<Balance> {
      let now = Self::now();
      Vaults::<T>::get(vault_id).and_then(|vault| vault.convert_to_shares(assets, now))
    }

    pub fn convert_to_assets(vault_id: VaultId, shares: Balance) -> Option<Balance> {
      let now = Self::now();
      Vaults::<T>::get(vault_id).and_then(|vault| vault.convert_to_assets(shares, now))
    }

    pub fn do_create_vault(
      asset: AssetKind,
      role_manager: T::AccountId,
      profit_max_unlock_time: Moment,
    ) -> Result<VaultId, DispatchError> {
      ensure!(
        profit_max_unlock_time <= T::MaxProfitUnlockTime::get(),
        Error::<T>::ProfitUnlockTimeTooLong
      );
      let vault_id = NextVaultId::<T>::get();
      let next_id = vault_id.checked_add(1).ok_or(Error::<T>::Overflow)?;
      let account = Self::vault_account(vault_id);
      frame_system::Pallet::<T>::inc_providers(&account);

      let vault = VaultInfo::new(
        asset,
        account.clone(),
        role_manager.clone(),
        T::DefaultDepositLimit::get(),
        profit_max_unlock_time,
        Self::now(),
      );
      Vaults::<T>::insert(vault_id, vault);
      NextVaultId::<T>::put(next_id);

      log::info!(
        target: LOG_TARGET,
        "created vault {vault_id} for {asset:?} managed by {role_manager:?}"
      );
      Self::deposit_event(Event::VaultCreated {
        vault_id,
        asset,
        account,
        role_manager,
      });
      Ok(vault_id)
    }

    fn do_revoke_strategy(
      vault_id: VaultId,
      strategy: &T::AccountId,
      force: bool,
    ) -> DispatchResult {
      let mut vault = Self::get_vault(vault_id)?;
      let mut params = Self::active_strategy(vault_id, strategy)?;
      let loss = params.current_debt;
      ensure!(force || loss.is_zero(), Error::<T>::StrategyHasDebt);

      if !loss.is_zero() {
        vault.total_debt = vault.total_debt.saturating_sub(loss);
        vault.profit_lock.absorb_loss(Self::now(), loss);
        Vaults::<T>::insert(vault_id, vault);
        log::warn!(
          target: LOG_TARGET,
          "vault {vault_id}: force revoked {strategy:?}, wrote off {loss} of debt"
        );
        Self::deposit_event(Event::StrategyReported {
          vault_id,
          strategy: strategy.clone(),
          gain: Zero::zero(),
          loss,
          current_debt: Zero::zero(),
          total_fees: Zero::zero(),
        });
      }

      params.current_debt = Zero::zero();
      params.status = StrategyStatus::Revoked;
      Strategies::<T>::insert(vault_id, strategy, params);
      Self::deposit_event(Event::StrategyChanged {
        vault_id,
        strategy: strategy.clone(),
        change_type: StrategyChangeType::Revoked,
      });
      Ok(())
    }

    /// Returns the new debt of `strategy`.
    pub fn do_update_debt(
      vault_id: VaultId,
      strategy: &T::AccountId,
      target_debt: Balance,
    ) -> Result<Balance, DispatchError> {
      let mut vault = Self::get_vault(vault_id)?;
      let mut params = Self::active_strategy(vault_id, strategy)?;
      let current_debt = params.current_debt;

      let mut new_debt = target_debt;
      if vault.shutdown {
        ensure!(target_debt <= current_debt, Error::<T>::VaultShutdown);
        new_debt = Zero::zero();
      }
      if new_debt > current_debt {
        new_debt = new_debt.min(params.max_debt);
      }
      ensure!(new_debt != current_debt, Error::<T>::DebtUnchanged);

      if new_debt < current_debt {
        let mut to_withdraw = current_debt - new_debt;
        if vault.total_idle.saturating_add(to_withdraw) < vault.minimum_total_idle {
          to_withdraw = (vault.minimum_total_idle - vault.total_idle).min(current_debt);
        }
        let withdrawn = Self::withdraw_from_strategy(&vault, strategy, to_withdraw)?;
        new_debt = current_debt - withdrawn;
        vault.total_idle = vault.total_idle.saturating_add(withdrawn);
        vault.total_debt = vault.total_debt.saturating_sub(withdrawn);
      } else {
        let max_deposit = T::StrategyOps::max_deposit(strategy, &vault.account);
        ensure!(!max_deposit.is_zero(), Error::<T>::StrategyAtCapacity);
        let to_deposit = (new_debt - current_debt).min(max_deposit);
        let available = vault.total_idle.saturating_sub(vault.minimum_total_idle);
        ensure!(to_deposit <= available, Error::<T>::InsufficientIdle);
        Self::deposit_into_strategy(&vault, strategy, to_deposit)?;
        new_debt = current_debt + to_deposit;
        vault.total_idle -= to_deposit;
        vault.total_debt = vault.total_debt.checked_add(to_deposit).ok_or(Error::<T>::Overflow)?;
      }

      params.current_debt = new_debt;
      Strategies::<T>::insert(vault_id, strategy, params);
      Vaults::<T>::insert(vault_id, vault);

      log::debug!(
        target: LOG_TARGET,
        "vault {vault_id}: debt of {strategy:?} moved {current_debt} -> {new_debt}"
      );
      Self::deposit_event(Event::DebtUpdated {
        vault_id,
        strategy: strategy.clone(),
        current_debt,
        new_debt,
      });
      Ok(new_debt)
    }

    /// Returns `(gain, loss)`.
    pub fn do_process_report(
      vault_id: VaultId,
      strategy: &T::AccountId,
    ) -> Result<(Balance, Balance), DispatchError> {
      let mut vault = Self::get_vault(vault_id)?;
      let mut params = Self::active_strategy(vault_id, strategy)?;
      let now = Self::now();

      let held = T::StrategyOps::total_assets(strategy, &vault.account);
      let gain = held.saturating_sub(params.current_debt);
      let loss = params.current_debt.saturating_sub(held);

      let mut total_fees: Balance = Zero::zero();
      let mut fee_shares: Balance = Zero::zero();
      if let Some(accountant) = vault.accountant.as_ref() {
        total_fees = T::Accountant::report(accountant, strategy, gain, loss)?.min(gain);
        if !total_fees.is_zero() {
          // Priced before the gain lands, so the fee shares are worth exactly the fees.
          fee_shares = vault
            .convert_to_shares(total_fees, now)
            .ok_or(Error::<T>::Overflow)?;
        }
      }

      if !loss.is_zero() {
        vault.total_debt = vault.total_debt.saturating_sub(loss);
        vault.profit_lock.absorb_loss(now, loss);
      }
      if !gain.is_zero() {
        vault.total_debt = vault.total_debt.checked_add(gain).ok_or(Error::<T>::Overflow)?;
        vault
          .profit_lock
          .lock(now, gain - total_fees, vault.profit_max_unlock_time);
      }
      if !fee_shares.is_zero() {
        if let Some(accountant) = vault.accountant.as_ref() {
          Shares::<T>::mutate(vault_id, accountant, |balance| {
            *balance = balance.saturating_add(fee_shares)
          });
        }
        vault.total_supply = vault
          .total_supply
          .checked_add(fee_shares)
          .ok_or(Error::<T>::Overflow)?;
      }

      params.current_debt = held;
      params.last_report = now;
      Strategies::<T>::insert(vault_id, strategy, params);
      Vaults::<T>::insert(vault_id, vault);

      log::debug!(
        target: LOG_TARGET,
        "vault {vault_id}: {strategy:?} reported gain {gain} loss {loss} fees {total_fees}"
      );
      Self::deposit_event(Event::StrategyReported {
        vault_id,
        strategy: strategy.clone(),
        gain,
        loss,
        current_debt: held,
        total_fees,
      });
      Ok((gain, loss))
    }

    /// Asks `strategy` for up to `amount` and returns what actually arrived.
    fn withdraw_from_strategy(
      vault: &VaultInfoOf<T>,
      strategy: &T::AccountId,
      amount: Balance,
    ) -> Result<Balance, DispatchError> {
      let withdrawable = T::StrategyOps::max_withdraw(strategy, &vault.account);
      ensure!(!withdrawable.is_zero(), Error::<T>::NothingToWithdraw);
      let amount = amount.min(withdrawable);
      let before = Self::asset_balance(&vault.account, vault.asset);
      T::StrategyOps::withdraw(strategy, &vault.account, amount)?;
      let after = Self::asset_balance(&vault.account, vault.asset);
      Ok(after.saturating_sub(before).min(amount))
    }

    fn deposit_into_strategy(
      vault: &VaultInfoOf<T>,
      strategy: &T::AccountId,
      amount: Balance,
    ) -> DispatchResult {
      let before = Self::asset_balance(&vault.account, vault.asset);
      T::StrategyOps::deposit(strategy, &vault.account, amount)?;
      let after = Self::asset_balance(&vault.account, vault.asset);
      ensure!(before.saturating_sub(after) == amount, Error::<T>::DepositMismatch);
      Ok(())
    }

    /// Sends `amount` of `asset` out of the vault account, which must drop by exactly that.
    fn pay_out(
      vault: &VaultInfoOf<T>,
      to: &T::AccountId,
      asset: AssetKind,
      amount: Balance,
    ) -> DispatchResult {
      let before = Self::asset_balance(&vault.account, asset);
      Self::transfer_asset(&vault.account, to, asset, amount)?;
      let after = Self::asset_balance(&vault.account, asset);
      ensure!(before.saturating_sub(after) == amount, Error::<T>::PayoutMismatch);
      Ok(())
    }

    fn ensure_role(vault_id: VaultId, who: &T::AccountId, role: Role) -> DispatchResult {
      ensure!(Self::has_role(vault_id, who, role), Error::<T>::NotAllowed);
      Ok(())
    }

    fn get_vault(vault_id: VaultId) -> Result<VaultInfoOf<T>, DispatchError> {
      Vaults::<T>::get(vault_id).ok_or_else(|| Error::<T>::VaultNotFound.into())
    }

    fn mutate_vault(
      vault_id: VaultId,
      f: impl FnOnce(&mut VaultInfoOf<T>) -> DispatchResult,
    ) -> DispatchResult {
      Vaults::<T>::try_mutate(vault_id, |maybe_vault| {
        let vault = maybe_vault.as_mut().ok_or(Error::<T>::VaultNotFound)?;
        f(vault)
      })
    }

    fn vault_field<R: Default>(vault_id: VaultId, f: impl FnOnce(&VaultInfoOf<T>) -> R) -> R {
      Vaults::<T>::get(vault_id).map(|vault| f(&vault)).unwrap_or_default()
    }

    fn active_strategy(
      vault_id: VaultId,
      strategy: &T::AccountId,
    ) -> Result<StrategyParams, DispatchError> {
      let params = Strategies::<T>::get(vault_id, strategy).ok_or(Error::<T>::StrategyNotFound)?;
      ensure!(params.is_active(), Error::<T>::InactiveStrategy);
      Ok(params)
    }

    fn now() -> Moment {
      T::UnixTime::now().as_secs()
    }

    fn asset_balance(who: &T::AccountId, asset: AssetKind) -> Balance {
      match asset {
        AssetKind::Native => <T::Currency as NativeInspect<T::AccountId>>::balance(who),
        AssetKind::Local(id) | AssetKind::Foreign(id) => T::Assets::balance(id, who),
      }
    }

    fn transfer_asset(
      from: &T::AccountId,
      to: &T::AccountId,
      asset: AssetKind,
      amount: Balance,
    ) -> DispatchResult {
      if amount.is_zero() {
        return Ok(());
      }
      match asset {
        AssetKind::Native => <T::Currency as NativeMutate<T::AccountId>>::transfer(
          from,
          to,
          amount,
          Preservation::Expendable,
        )
        .map(|_| ()),
        AssetKind::Local(id) | AssetKind::Foreign(id) => {
          T::Assets::transfer(id, from, to, amount, Preservation::Expendable).map(|_| ())
        }
      }
    }

    /// Checks the ledger of every vault:
    /// - `total_debt` equals the summed debt of its active strategies
    /// - the sovereign account holds at least `total_idle`
    /// - `total_supply` equals the summed shares
    #[cfg(any(feature = "try-runtime", test))]
    pub fn do_try_state() -> Result<(), DispatchError> {
      for (vault_id, vault) in Vaults::<T>::iter() {
        let debt = Strategies::<T>::iter_prefix_values(vault_id)
          .filter(|params| params.is_active())
          .fold(Balance::zero(), |acc, params| acc.saturating_add(params.current_debt));
        ensure!(debt == vault.total_debt, "total_debt differs from strategy debts");
        ensure!(
          Self::asset_balance(&vault.account, vault.asset) >= vault.total_idle,
          "vault account holds less than total_idle"
        );
        let supply = Shares::<T>::iter_prefix_values(vault_id)
          .fold(Balance::zero(), |acc, shares| acc.saturating_add(shares));
        ensure!(supply == vault.total_supply, "total_supply differs from share balances");
      }
      Ok(())
    }
  }

  #[pallet::genesis_config]
  #[derive(frame::prelude::DefaultNoBound)]
  pub struct GenesisConfig<T: Config> {
    /// `(role_manager, asset, profit_max_unlock_time)` of each vault to create
    pub vaults: Vec<(T::AccountId, AssetKind, Moment)>,
  }

  #[pallet::genesis_build]
  impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
    fn build(&self) {
      for (role_manager, asset, profit_max_unlock_time) in &self.vaults {
        Pallet::<T>::do_create_vault(*asset, role_manager.clone(), *profit_max_unlock_time)
          .expect("invalid genesis vault");
      }
    }
  }
}
