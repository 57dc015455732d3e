extern crate alloc;

use crate as pallet_yield_vault;
use crate::{Accountant, StrategyOps};
use alloc::collections::BTreeMap;
use core::{cell::RefCell, time::Duration};
use polkadot_sdk::frame_support::{
  PalletId, construct_runtime, derive_impl,
  traits::{
    ConstU32, ConstU64, ConstU128, Get, UnixTime,
    fungible::{Inspect as NativeInspect, Mutate as NativeMutate},
    fungibles::{Inspect as FungiblesInspect, Mutate as FungiblesMutate},
    tokens::{Fortitude, Precision, Preservation},
  },
};
use polkadot_sdk::frame_system::{self, EnsureRoot};
use polkadot_sdk::sp_runtime::{
  BuildStorage, DispatchError, PerThing, Permill,
  testing::H256,
  traits::{BlakeTwo256, IdentityLookup},
};
use primitives::{
  AssetKind, Balance, Moment,
  ecosystem::{
    pallet_ids::YIELD_VAULT_PALLET_ID,
    params::{DEFAULT_DEPOSIT_LIMIT, MAX_PROFIT_UNLOCK_TIME, PRECISION, WEEK},
  },
};

pub type AccountId = u64;

type Block = frame_system::mocking::MockBlock<Test>;

/// Role manager of the genesis vault
pub const GOV: AccountId = 1;
pub const BUNNY: AccountId = 2;
pub const PANDA: AccountId = 3;
pub const ALICE: AccountId = 4;
pub const ACCOUNTANT: AccountId = 50;

pub const STRATEGY: AccountId = 100;
pub const SECOND_STRATEGY: AccountId = 101;
/// Accepts `OTHER_ASSET` only
pub const OTHER_STRATEGY: AccountId = 102;
/// Known to nobody
pub const NOT_A_STRATEGY: AccountId = 199;

pub const VAULT_ASSET_ID: u32 = 1;
pub const OTHER_ASSET_ID: u32 = 2;
pub const VAULT_ASSET: AssetKind = AssetKind::Local(VAULT_ASSET_ID);
pub const OTHER_ASSET: AssetKind = AssetKind::Local(OTHER_ASSET_ID);

/// Created at genesis, managed by `GOV`, unlocking profit over a week
pub const VAULT: u32 = 0;
pub const INITIAL_TIME: Moment = 1_700_000_000;
pub const INITIAL_BALANCE: Balance = 1_000 * PRECISION;

thread_local! {
  static NOW: RefCell<Moment> = const { RefCell::new(INITIAL_TIME) };

  // Strategy account -> accepted asset
  static STRATEGY_ASSETS: RefCell<BTreeMap<AccountId, AssetKind>> = const { RefCell::new(BTreeMap::new()) };

  // Strategy account -> remaining deposit capacity (unlimited when absent)
  static DEPOSIT_CAPS: RefCell<BTreeMap<AccountId, Balance>> = const { RefCell::new(BTreeMap::new()) };

  // Strategy account -> liquid funds it can return (everything when absent)
  static WITHDRAW_CAPS: RefCell<BTreeMap<AccountId, Balance>> = const { RefCell::new(BTreeMap::new()) };

  static FEE_RATE: RefCell<Permill> = const { RefCell::new(Permill::from_parts(0)) };

  // Charged on every report regardless of the outcome
  static FLAT_FEE: RefCell<Balance> = const { RefCell::new(0) };

  // (accountant, strategy, gain, loss) of every fee assessment
  static REPORTS: RefCell<Vec<(AccountId, AccountId, Balance, Balance)>> = const { RefCell::new(Vec::new()) };
}

pub fn now() -> Moment {
  NOW.with(|now| *now.borrow())
}

pub fn advance_time(seconds: Moment) {
  NOW.with(|now| *now.borrow_mut() += seconds);
}

pub fn register_strategy(strategy: AccountId, asset: AssetKind) {
  STRATEGY_ASSETS.with(|assets| assets.borrow_mut().insert(strategy, asset));
}

pub fn set_deposit_cap(strategy: AccountId, cap: Balance) {
  DEPOSIT_CAPS.with(|caps| caps.borrow_mut().insert(strategy, cap));
}

pub fn set_withdraw_cap(strategy: AccountId, cap: Balance) {
  WITHDRAW_CAPS.with(|caps| caps.borrow_mut().insert(strategy, cap));
}

pub fn set_fee_rate(rate: Permill) {
  FEE_RATE.with(|fee| *fee.borrow_mut() = rate);
}

pub fn set_flat_fee(fee: Balance) {
  FLAT_FEE.with(|flat| *flat.borrow_mut() = fee);
}

pub fn reports() -> Vec<(AccountId, AccountId, Balance, Balance)> {
  REPORTS.with(|reports| reports.borrow().clone())
}

fn reset_fakes() {
  NOW.with(|now| *now.borrow_mut() = INITIAL_TIME);
  STRATEGY_ASSETS.with(|assets| {
    let mut assets = assets.borrow_mut();
    assets.clear();
    assets.insert(STRATEGY, VAULT_ASSET);
    assets.insert(SECOND_STRATEGY, VAULT_ASSET);
    assets.insert(OTHER_STRATEGY, OTHER_ASSET);
  });
  DEPOSIT_CAPS.with(|caps| caps.borrow_mut().clear());
  WITHDRAW_CAPS.with(|caps| caps.borrow_mut().clear());
  set_fee_rate(Permill::from_parts(0));
  set_flat_fee(0);
  REPORTS.with(|reports| reports.borrow_mut().clear());
}

pub fn balance_of(who: AccountId, asset: AssetKind) -> Balance {
  match asset {
    AssetKind::Native => <Balances as NativeInspect<AccountId>>::balance(&who),
    AssetKind::Local(id) | AssetKind::Foreign(id) => {
      <Assets as FungiblesInspect<AccountId>>::balance(id, &who)
    }
  }
}

/// Credits `amount` out of thin air, e.g. a strategy's yield or an airdrop.
pub fn mint(who: AccountId, asset: AssetKind, amount: Balance) -> Result<(), DispatchError> {
  match asset {
    AssetKind::Native => <Balances as NativeMutate<AccountId>>::mint_into(&who, amount).map(|_| ()),
    AssetKind::Local(id) | AssetKind::Foreign(id) => {
      <Assets as FungiblesMutate<AccountId>>::mint_into(id, &who, amount).map(|_| ())
    }
  }
}

/// Destroys `amount` held by `who`, e.g. a strategy losing funds.
pub fn burn(who: AccountId, asset: AssetKind, amount: Balance) -> Result<(), DispatchError> {
  match asset {
    AssetKind::Native => <Balances as NativeMutate<AccountId>>::burn_from(
      &who,
      amount,
      Preservation::Expendable,
      Precision::Exact,
      Fortitude::Force,
    )
    .map(|_| ()),
    AssetKind::Local(id) | AssetKind::Foreign(id) => {
      <Assets as FungiblesMutate<AccountId>>::burn_from(
        id,
        &who,
        amount,
        Preservation::Expendable,
        Precision::Exact,
        Fortitude::Force,
      )
      .map(|_| ())
    }
  }
}

fn move_funds(
  asset: AssetKind,
  from: AccountId,
  to: AccountId,
  amount: Balance,
) -> Result<(), DispatchError> {
  if amount == 0 {
    return Ok(());
  }
  match asset {
    AssetKind::Native => {
      <Balances as NativeMutate<AccountId>>::transfer(&from, &to, amount, Preservation::Expendable)
        .map(|_| ())
    }
    AssetKind::Local(id) | AssetKind::Foreign(id) => {
      <Assets as FungiblesMutate<AccountId>>::transfer(
        id,
        &from,
        &to,
        amount,
        Preservation::Expendable,
      )
      .map(|_| ())
    }
  }
}

/// Strategies that keep the vault's funds on their own account. Whatever the account holds
/// counts as the strategy's assets, so minting into it is a gain and burning from it a loss.
pub struct MockStrategies;
impl StrategyOps<AccountId> for MockStrategies {
  fn asset(strategy: &AccountId) -> Option<AssetKind> {
    STRATEGY_ASSETS.with(|assets| assets.borrow().get(strategy).copied())
  }

  fn total_assets(strategy: &AccountId, _vault: &AccountId) -> Balance {
    Self::asset(strategy)
      .map(|asset| balance_of(*strategy, asset))
      .unwrap_or_default()
  }

  fn max_deposit(strategy: &AccountId, _vault: &AccountId) -> Balance {
    if Self::asset(strategy).is_none() {
      return 0;
    }
    DEPOSIT_CAPS
      .with(|caps| caps.borrow().get(strategy).copied())
      .unwrap_or(Balance::MAX)
  }

  fn max_withdraw(strategy: &AccountId, vault: &AccountId) -> Balance {
    let held = Self::total_assets(strategy, vault);
    WITHDRAW_CAPS
      .with(|caps| caps.borrow().get(strategy).copied())
      .map_or(held, |cap| cap.min(held))
  }

  fn deposit(strategy: &AccountId, vault: &AccountId, amount: Balance) -> Result<(), DispatchError> {
    let asset = Self::asset(strategy).ok_or(DispatchError::Other("unknown strategy"))?;
    move_funds(asset, *vault, *strategy, amount)
  }

  fn withdraw(strategy: &AccountId, vault: &AccountId, amount: Balance) -> Result<(), DispatchError> {
    let asset = Self::asset(strategy).ok_or(DispatchError::Other("unknown strategy"))?;
    let available = Self::max_withdraw(strategy, vault);
    move_funds(asset, *strategy, *vault, amount.min(available))
  }
}

/// Charges `FEE_RATE` of every gain plus `FLAT_FEE`.
pub struct MockAccountant;
impl Accountant<AccountId> for MockAccountant {
  fn report(
    accountant: &AccountId,
    strategy: &AccountId,
    gain: Balance,
    loss: Balance,
  ) -> Result<Balance, DispatchError> {
    REPORTS.with(|reports| reports.borrow_mut().push((*accountant, *strategy, gain, loss)));
    let fee = FEE_RATE.with(|fee| *fee.borrow()).mul_floor(gain);
    Ok(fee.saturating_add(FLAT_FEE.with(|flat| *flat.borrow())))
  }
}

pub struct MockTime;
impl UnixTime for MockTime {
  fn now() -> Duration {
    Duration::from_secs(now())
  }
}

construct_runtime!(
  pub struct Test {
    System: frame_system,
    Balances: polkadot_sdk::pallet_balances,
    Assets: polkadot_sdk::pallet_assets,
    YieldVault: pallet_yield_vault,
  }
);

#[derive_impl(frame_system::config_preludes::TestDefaultConfig)]
impl frame_system::Config for Test {
  type Block = Block;
  type AccountId = AccountId;
  type Lookup = IdentityLookup<Self::AccountId>;
  type Hash = H256;
  type Hashing = BlakeTwo256;
  type AccountData = polkadot_sdk::pallet_balances::AccountData<Balance>;
}

impl polkadot_sdk::pallet_balances::Config for Test {
  type MaxLocks = ();
  type MaxReserves = ();
  type ReserveIdentifier = [u8; 8];
  type Balance = Balance;
  type DustRemoval = ();
  type RuntimeEvent = RuntimeEvent;
  type ExistentialDeposit = ConstU128<1>;
  type AccountStore = System;
  type WeightInfo = ();
  type FreezeIdentifier = ();
  type MaxFreezes = ();
  type RuntimeHoldReason = ();
  type RuntimeFreezeReason = ();
  type DoneSlashHandler = ();
}

impl polkadot_sdk::pallet_assets::Config for Test {
  type RuntimeEvent = RuntimeEvent;
  type Balance = Balance;
  type AssetId = u32;
  type AssetIdParameter = u32;
  type Currency = Balances;
  type CreateOrigin = polkadot_sdk::frame_support::traits::AsEnsureOriginWithArg<
    frame_system::EnsureSigned<Self::AccountId>,
  >;
  type ForceOrigin = EnsureRoot<Self::AccountId>;
  type AssetDeposit = ConstU128<1>;
  type AssetAccountDeposit = ConstU128<1>;
  type MetadataDepositBase = ConstU128<1>;
  type MetadataDepositPerByte = ConstU128<1>;
  type ApprovalDeposit = ConstU128<1>;
  type StringLimit = ConstU32<50>;
  type Freezer = ();
  type Extra = ();
  type ReserveData = ();
  type CallbackHandle = ();
  type WeightInfo = ();
  type RemoveItemsLimit = ConstU32<5>;
  type Holder = ();
  #[cfg(feature = "runtime-benchmarks")]
  type BenchmarkHelper = AssetBenchmarkHelper;
}

#[cfg(feature = "runtime-benchmarks")]
pub struct AssetBenchmarkHelper;

#[cfg(feature = "runtime-benchmarks")]
impl polkadot_sdk::pallet_assets::BenchmarkHelper<u32, ()> for AssetBenchmarkHelper {
  fn create_asset_id_parameter(id: u32) -> u32 {
    id
  }
  fn create_reserve_id_parameter(_id: u32) -> () {
    ()
  }
}

#[cfg(feature = "runtime-benchmarks")]
pub struct VaultBenchmarkHelper;

#[cfg(feature = "runtime-benchmarks")]
impl crate::BenchmarkHelper<AccountId> for VaultBenchmarkHelper {
  fn strategy(asset: AssetKind) -> AccountId {
    let strategy = 1_000 + STRATEGY_ASSETS.with(|assets| assets.borrow().len() as AccountId);
    register_strategy(strategy, asset);
    strategy
  }

  fn fund(
    who: &AccountId,
    asset: AssetKind,
    amount: Balance,
  ) -> polkadot_sdk::sp_runtime::DispatchResult {
    mint(*who, asset, amount)
  }
}

pub struct VaultPalletId;
impl Get<PalletId> for VaultPalletId {
  fn get() -> PalletId {
    PalletId(*YIELD_VAULT_PALLET_ID)
  }
}

impl pallet_yield_vault::Config for Test {
  type Assets = Assets;
  type Currency = Balances;
  type StrategyOps = MockStrategies;
  type Accountant = MockAccountant;
  type UnixTime = MockTime;
  type AdminOrigin = EnsureRoot<AccountId>;
  type PalletId = VaultPalletId;
  type DefaultDepositLimit = ConstU128<{ DEFAULT_DEPOSIT_LIMIT }>;
  type MaxProfitUnlockTime = ConstU64<{ MAX_PROFIT_UNLOCK_TIME }>;
  type MaxWithdrawStrategies = ConstU32<4>;
  type WeightInfo = ();
  #[cfg(feature = "runtime-benchmarks")]
  type BenchmarkHelper = VaultBenchmarkHelper;
}

pub fn new_test_ext() -> polkadot_sdk::sp_io::TestExternalities {
  reset_fakes();

  let mut t = frame_system::GenesisConfig::<Test>::default()
    .build_storage()
    .unwrap();

  polkadot_sdk::pallet_balances::GenesisConfig::<Test> {
    balances: alloc::vec![
      (GOV, INITIAL_BALANCE),
      (BUNNY, INITIAL_BALANCE),
      (PANDA, INITIAL_BALANCE),
      (ALICE, INITIAL_BALANCE),
    ],
    dev_accounts: None,
  }
  .assimilate_storage(&mut t)
  .unwrap();

  polkadot_sdk::pallet_assets::GenesisConfig::<Test> {
    assets: alloc::vec![(VAULT_ASSET_ID, GOV, true, 1), (OTHER_ASSET_ID, GOV, true, 1)],
    metadata: alloc::vec![],
    accounts: alloc::vec![
      (VAULT_ASSET_ID, GOV, INITIAL_BALANCE),
      (VAULT_ASSET_ID, ALICE, INITIAL_BALANCE),
      (VAULT_ASSET_ID, BUNNY, INITIAL_BALANCE),
      (OTHER_ASSET_ID, GOV, INITIAL_BALANCE),
    ],
    reserves: alloc::vec![],
    next_asset_id: None,
  }
  .assimilate_storage(&mut t)
  .unwrap();

  pallet_yield_vault::GenesisConfig::<Test> {
    vaults: alloc::vec![(GOV, VAULT_ASSET, WEEK)],
  }
  .assimilate_storage(&mut t)
  .unwrap();

  let mut ext: polkadot_sdk::sp_io::TestExternalities = t.into();
  ext.execute_with(|| System::set_block_number(1));
  ext
}
