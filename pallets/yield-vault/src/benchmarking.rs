use crate::*;
use frame::prelude::{BoundedVec, EnsureOrigin, Get};
use polkadot_sdk::frame_benchmarking::v2::*;
use polkadot_sdk::frame_system::RawOrigin;
use primitives::{AssetKind, Balance, ecosystem::params::PRECISION};

const AMOUNT: Balance = 100 * PRECISION;

/// Vault over the native asset with `caller` as role manager holding every role.
fn setup_vault<T: Config>(caller: &T::AccountId) -> VaultId {
  let vault_id =
    Pallet::<T>::do_create_vault(AssetKind::Native, caller.clone(), T::MaxProfitUnlockTime::get())
      .expect("vault creation failed");
  AccountRoles::<T>::insert(vault_id, caller, Roles::all());
  vault_id
}

fn new_strategy<T: Config>(caller: &T::AccountId, vault_id: VaultId) -> T::AccountId {
  let strategy = T::BenchmarkHelper::strategy(AssetKind::Native);
  Pallet::<T>::add_strategy(RawOrigin::Signed(caller.clone()).into(), vault_id, strategy.clone())
    .expect("add_strategy failed");
  Pallet::<T>::update_max_debt_for_strategy(
    RawOrigin::Signed(caller.clone()).into(),
    vault_id,
    strategy.clone(),
    Balance::MAX,
  )
  .expect("update_max_debt failed");
  strategy
}

fn fund_and_deposit<T: Config>(caller: &T::AccountId, vault_id: VaultId, amount: Balance) {
  T::BenchmarkHelper::fund(caller, AssetKind::Native, amount.saturating_mul(2))
    .expect("funding failed");
  Pallet::<T>::deposit(RawOrigin::Signed(caller.clone()).into(), vault_id, amount)
    .expect("deposit failed");
}

fn strategy_with_debt<T: Config>(caller: &T::AccountId, vault_id: VaultId) -> T::AccountId {
  let strategy = new_strategy::<T>(caller, vault_id);
  fund_and_deposit::<T>(caller, vault_id, AMOUNT);
  Pallet::<T>::do_update_debt(vault_id, &strategy, AMOUNT).expect("update_debt failed");
  strategy
}

#[benchmarks]
mod benches {
  use super::*;

  #[benchmark]
  fn create_vault() -> Result<(), BenchmarkError> {
    let origin = T::AdminOrigin::try_successful_origin().map_err(|_| BenchmarkError::Weightless)?;
    let role_manager: T::AccountId = account("manager", 0, 0);
    let vault_id = NextVaultId::<T>::get();

    #[extrinsic_call]
    _(origin as T::RuntimeOrigin, AssetKind::Native, role_manager, T::MaxProfitUnlockTime::get());

    assert!(Vaults::<T>::contains_key(vault_id));
    Ok(())
  }

  #[benchmark]
  fn set_role() {
    let caller: T::AccountId = whitelisted_caller();
    let vault_id = setup_vault::<T>(&caller);
    let target: T::AccountId = account("target", 0, 0);

    #[extrinsic_call]
    _(RawOrigin::Signed(caller), vault_id, target.clone(), Roles::all());

    assert_eq!(AccountRoles::<T>::get(vault_id, &target), Roles::all());
  }

  #[benchmark]
  fn add_strategy() {
    let caller: T::AccountId = whitelisted_caller();
    let vault_id = setup_vault::<T>(&caller);
    let strategy = T::BenchmarkHelper::strategy(AssetKind::Native);

    #[extrinsic_call]
    _(RawOrigin::Signed(caller), vault_id, strategy.clone());

    assert!(Strategies::<T>::get(vault_id, &strategy).is_some_and(|p| p.is_active()));
  }

  #[benchmark]
  fn revoke_strategy() {
    let caller: T::AccountId = whitelisted_caller();
    let vault_id = setup_vault::<T>(&caller);
    let strategy = new_strategy::<T>(&caller, vault_id);

    #[extrinsic_call]
    _(RawOrigin::Signed(caller), vault_id, strategy.clone());

    assert!(Strategies::<T>::get(vault_id, &strategy).is_some_and(|p| !p.is_active()));
  }

  #[benchmark]
  fn force_revoke_strategy() {
    let caller: T::AccountId = whitelisted_caller();
    let vault_id = setup_vault::<T>(&caller);
    let strategy = strategy_with_debt::<T>(&caller, vault_id);

    #[extrinsic_call]
    _(RawOrigin::Signed(caller), vault_id, strategy);

    assert_eq!(Pallet::<T>::total_debt(vault_id), 0);
  }

  #[benchmark]
  fn update_max_debt_for_strategy() {
    let caller: T::AccountId = whitelisted_caller();
    let vault_id = setup_vault::<T>(&caller);
    let strategy = new_strategy::<T>(&caller, vault_id);

    #[extrinsic_call]
    _(RawOrigin::Signed(caller), vault_id, strategy.clone(), AMOUNT);

    assert_eq!(Strategies::<T>::get(vault_id, &strategy).map(|p| p.max_debt), Some(AMOUNT));
  }

  #[benchmark]
  fn update_debt() {
    let caller: T::AccountId = whitelisted_caller();
    let vault_id = setup_vault::<T>(&caller);
    let strategy = new_strategy::<T>(&caller, vault_id);
    fund_and_deposit::<T>(&caller, vault_id, AMOUNT);

    #[extrinsic_call]
    _(RawOrigin::Signed(caller), vault_id, strategy, AMOUNT);

    assert_eq!(Pallet::<T>::total_debt(vault_id), AMOUNT);
  }

  #[benchmark]
  fn process_report() {
    let caller: T::AccountId = whitelisted_caller();
    let vault_id = setup_vault::<T>(&caller);
    let strategy = strategy_with_debt::<T>(&caller, vault_id);
    let accountant: T::AccountId = account("accountant", 0, 0);
    Pallet::<T>::set_accountant(RawOrigin::Signed(caller.clone()).into(), vault_id, accountant)
      .expect("set_accountant failed");
    T::BenchmarkHelper::fund(&strategy, AssetKind::Native, AMOUNT / 10).expect("funding failed");

    #[extrinsic_call]
    _(RawOrigin::Signed(caller), vault_id, strategy);
  }

  #[benchmark]
  fn shutdown_vault() {
    let caller: T::AccountId = whitelisted_caller();
    let vault_id = setup_vault::<T>(&caller);

    #[extrinsic_call]
    _(RawOrigin::Signed(caller), vault_id);

    assert!(Pallet::<T>::is_shutdown(vault_id));
  }

  #[benchmark]
  fn sweep() {
    let caller: T::AccountId = whitelisted_caller();
    let vault_id = setup_vault::<T>(&caller);
    fund_and_deposit::<T>(&caller, vault_id, AMOUNT);
    T::BenchmarkHelper::fund(&Pallet::<T>::vault_account(vault_id), AssetKind::Native, AMOUNT)
      .expect("funding failed");

    #[extrinsic_call]
    _(RawOrigin::Signed(caller), vault_id, AssetKind::Native);
  }

  #[benchmark]
  fn set_minimum_total_idle() {
    let caller: T::AccountId = whitelisted_caller();
    let vault_id = setup_vault::<T>(&caller);

    #[extrinsic_call]
    _(RawOrigin::Signed(caller), vault_id, AMOUNT);

    assert_eq!(Pallet::<T>::minimum_total_idle(vault_id), AMOUNT);
  }

  #[benchmark]
  fn set_deposit_limit() {
    let caller: T::AccountId = whitelisted_caller();
    let vault_id = setup_vault::<T>(&caller);

    #[extrinsic_call]
    _(RawOrigin::Signed(caller), vault_id, AMOUNT);

    assert_eq!(Pallet::<T>::deposit_limit(vault_id), AMOUNT);
  }

  #[benchmark]
  fn set_accountant() {
    let caller: T::AccountId = whitelisted_caller();
    let vault_id = setup_vault::<T>(&caller);
    let accountant: T::AccountId = account("accountant", 0, 0);

    #[extrinsic_call]
    _(RawOrigin::Signed(caller), vault_id, accountant.clone());

    assert_eq!(Pallet::<T>::accountant(vault_id), Some(accountant));
  }

  #[benchmark]
  fn set_queue_manager() {
    let caller: T::AccountId = whitelisted_caller();
    let vault_id = setup_vault::<T>(&caller);
    let queue_manager: T::AccountId = account("queue", 0, 0);

    #[extrinsic_call]
    _(RawOrigin::Signed(caller), vault_id, queue_manager.clone());

    assert_eq!(Pallet::<T>::queue_manager(vault_id), Some(queue_manager));
  }

  #[benchmark]
  fn set_profit_max_unlock_time() {
    let caller: T::AccountId = whitelisted_caller();
    let vault_id = setup_vault::<T>(&caller);

    // Zero walks the release path as well
    #[extrinsic_call]
    _(RawOrigin::Signed(caller), vault_id, 0);

    assert_eq!(Pallet::<T>::profit_max_unlock_time(vault_id), 0);
  }

  #[benchmark]
  fn deposit() {
    let caller: T::AccountId = whitelisted_caller();
    let vault_id = setup_vault::<T>(&caller);
    T::BenchmarkHelper::fund(&caller, AssetKind::Native, AMOUNT * 2).expect("funding failed");

    #[extrinsic_call]
    _(RawOrigin::Signed(caller.clone()), vault_id, AMOUNT);

    assert!(Shares::<T>::get(vault_id, &caller) > 0);
  }

  #[benchmark]
  fn withdraw(s: Linear<1, { T::MaxWithdrawStrategies::get() }>) {
    let caller: T::AccountId = whitelisted_caller();
    let vault_id = setup_vault::<T>(&caller);
    let mut queue = alloc::vec::Vec::new();
    for _ in 0..s {
      queue.push(strategy_with_debt::<T>(&caller, vault_id));
    }
    let queue: BoundedVec<T::AccountId, T::MaxWithdrawStrategies> =
      queue.try_into().expect("queue within bounds");
    let shares = Shares::<T>::get(vault_id, &caller);

    #[extrinsic_call]
    _(RawOrigin::Signed(caller.clone()), vault_id, shares, queue);

    assert_eq!(Shares::<T>::get(vault_id, &caller), 0);
  }

  impl_benchmark_test_suite!(Pallet, crate::mock::new_test_ext(), crate::mock::Test);
}
