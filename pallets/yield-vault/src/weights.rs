#![cfg_attr(rustfmt, rustfmt_skip)]
#![allow(unused_parens)]
#![allow(unused_imports)]
#![allow(missing_docs)]

use polkadot_sdk::frame_support::{traits::Get, weights::{Weight, constants::RocksDbWeight}};
use core::marker::PhantomData;

pub trait WeightInfo {
	fn create_vault() -> Weight;
	fn set_role() -> Weight;
	fn add_strategy() -> Weight;
	fn revoke_strategy() -> Weight;
	fn force_revoke_strategy() -> Weight;
	fn update_max_debt_for_strategy() -> Weight;
	fn update_debt() -> Weight;
	fn process_report() -> Weight;
	fn shutdown_vault() -> Weight;
	fn sweep() -> Weight;
	fn set_minimum_total_idle() -> Weight;
	fn set_deposit_limit() -> Weight;
	fn set_accountant() -> Weight;
	fn set_queue_manager() -> Weight;
	fn set_profit_max_unlock_time() -> Weight;
	fn deposit() -> Weight;
	fn withdraw(s: u32, ) -> Weight;
}

pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: polkadot_sdk::frame_system::Config> WeightInfo for SubstrateWeight<T> {
	fn create_vault() -> Weight {
		Weight::from_parts(40_000_000, 3_500)
			.saturating_add(T::DbWeight::get().reads(2))
			.saturating_add(T::DbWeight::get().writes(3))
	}
	fn set_role() -> Weight {
		Weight::from_parts(18_000_000, 3_500)
			.saturating_add(T::DbWeight::get().reads(1))
			.saturating_add(T::DbWeight::get().writes(1))
	}
	fn add_strategy() -> Weight {
		Weight::from_parts(22_000_000, 3_600)
			.saturating_add(T::DbWeight::get().reads(3))
			.saturating_add(T::DbWeight::get().writes(1))
	}
	fn revoke_strategy() -> Weight {
		Weight::from_parts(22_000_000, 3_600)
			.saturating_add(T::DbWeight::get().reads(3))
			.saturating_add(T::DbWeight::get().writes(1))
	}
	fn force_revoke_strategy() -> Weight {
		Weight::from_parts(30_000_000, 3_600)
			.saturating_add(T::DbWeight::get().reads(3))
			.saturating_add(T::DbWeight::get().writes(2))
	}
	fn update_max_debt_for_strategy() -> Weight {
		Weight::from_parts(20_000_000, 3_600)
			.saturating_add(T::DbWeight::get().reads(3))
			.saturating_add(T::DbWeight::get().writes(1))
	}
	fn update_debt() -> Weight {
		Weight::from_parts(95_000_000, 6_200)
			.saturating_add(T::DbWeight::get().reads(7))
			.saturating_add(T::DbWeight::get().writes(6))
	}
	fn process_report() -> Weight {
		Weight::from_parts(80_000_000, 6_200)
			.saturating_add(T::DbWeight::get().reads(5))
			.saturating_add(T::DbWeight::get().writes(3))
	}
	fn shutdown_vault() -> Weight {
		Weight::from_parts(22_000_000, 3_500)
			.saturating_add(T::DbWeight::get().reads(2))
			.saturating_add(T::DbWeight::get().writes(2))
	}
	fn sweep() -> Weight {
		Weight::from_parts(65_000_000, 6_200)
			.saturating_add(T::DbWeight::get().reads(4))
			.saturating_add(T::DbWeight::get().writes(4))
	}
	fn set_minimum_total_idle() -> Weight {
		Weight::from_parts(18_000_000, 3_500)
			.saturating_add(T::DbWeight::get().reads(2))
			.saturating_add(T::DbWeight::get().writes(1))
	}
	fn set_deposit_limit() -> Weight {
		Weight::from_parts(18_000_000, 3_500)
			.saturating_add(T::DbWeight::get().reads(2))
			.saturating_add(T::DbWeight::get().writes(1))
	}
	fn set_accountant() -> Weight {
		Weight::from_parts(18_000_000, 3_500)
			.saturating_add(T::DbWeight::get().reads(2))
			.saturating_add(T::DbWeight::get().writes(1))
	}
	fn set_queue_manager() -> Weight {
		Weight::from_parts(18_000_000, 3_500)
			.saturating_add(T::DbWeight::get().reads(2))
			.saturating_add(T::DbWeight::get().writes(1))
	}
	fn set_profit_max_unlock_time() -> Weight {
		Weight::from_parts(19_000_000, 3_500)
			.saturating_add(T::DbWeight::get().reads(2))
			.saturating_add(T::DbWeight::get().writes(1))
	}
	fn deposit() -> Weight {
		Weight::from_parts(70_000_000, 6_200)
			.saturating_add(T::DbWeight::get().reads(4))
			.saturating_add(T::DbWeight::get().writes(5))
	}
	/// The range of component `s` is `[0, 8]`.
	fn withdraw(s: u32, ) -> Weight {
		Weight::from_parts(60_000_000, 6_200)
			.saturating_add(Weight::from_parts(45_000_000, 3_600).saturating_mul(s.into()))
			.saturating_add(T::DbWeight::get().reads(4))
			.saturating_add(T::DbWeight::get().reads((4_u64).saturating_mul(s.into())))
			.saturating_add(T::DbWeight::get().writes(5))
			.saturating_add(T::DbWeight::get().writes((3_u64).saturating_mul(s.into())))
	}
}

impl WeightInfo for () {
	fn create_vault() -> Weight {
		Weight::from_parts(40_000_000, 3_500)
			.saturating_add(RocksDbWeight::get().reads(2))
			.saturating_add(RocksDbWeight::get().writes(3))
	}
	fn set_role() -> Weight {
		Weight::from_parts(18_000_000, 3_500)
			.saturating_add(RocksDbWeight::get().reads(1))
			.saturating_add(RocksDbWeight::get().writes(1))
	}
	fn add_strategy() -> Weight {
		Weight::from_parts(22_000_000, 3_600)
			.saturating_add(RocksDbWeight::get().reads(3))
			.saturating_add(RocksDbWeight::get().writes(1))
	}
	fn revoke_strategy() -> Weight {
		Weight::from_parts(22_000_000, 3_600)
			.saturating_add(RocksDbWeight::get().reads(3))
			.saturating_add(RocksDbWeight::get().writes(1))
	}
	fn force_revoke_strategy() -> Weight {
		Weight::from_parts(30_000_000, 3_600)
			.saturating_add(RocksDbWeight::get().reads(3))
			.saturating_add(RocksDbWeight::get().writes(2))
	}
	fn update_max_debt_for_strategy() -> Weight {
		Weight::from_parts(20_000_000, 3_600)
			.saturating_add(RocksDbWeight::get().reads(3))
			.saturating_add(RocksDbWeight::get().writes(1))
	}
	fn update_debt() -> Weight {
		Weight::from_parts(95_000_000, 6_200)
			.saturating_add(RocksDbWeight::get().reads(7))
			.saturating_add(RocksDbWeight::get().writes(6))
	}
	fn process_report() -> Weight {
		Weight::from_parts(80_000_000, 6_200)
			.saturating_add(RocksDbWeight::get().reads(5))
			.saturating_add(RocksDbWeight::get().writes(3))
	}
	fn shutdown_vault() -> Weight {
		Weight::from_parts(22_000_000, 3_500)
			.saturating_add(RocksDbWeight::get().reads(2))
			.saturating_add(RocksDbWeight::get().writes(2))
	}
	fn sweep() -> Weight {
		Weight::from_parts(65_000_000, 6_200)
			.saturating_add(RocksDbWeight::get().reads(4))
			.saturating_add(RocksDbWeight::get().writes(4))
	}
	fn set_minimum_total_idle() -> Weight {
		Weight::from_parts(18_000_000, 3_500)
			.saturating_add(RocksDbWeight::get().reads(2))
			.saturating_add(RocksDbWeight::get().writes(1))
	}
	fn set_deposit_limit() -> Weight {
		Weight::from_parts(18_000_000, 3_500)
			.saturating_add(RocksDbWeight::get().reads(2))
			.saturating_add(RocksDbWeight::get().writes(1))
	}
	fn set_accountant() -> Weight {
		Weight::from_parts(18_000_000, 3_500)
			.saturating_add(RocksDbWeight::get().reads(2))
			.saturating_add(RocksDbWeight::get().writes(1))
	}
	fn set_queue_manager() -> Weight {
		Weight::from_parts(18_000_000, 3_500)
			.saturating_add(RocksDbWeight::get().reads(2))
			.saturating_add(RocksDbWeight::get().writes(1))
	}
	fn set_profit_max_unlock_time() -> Weight {
		Weight::from_parts(19_000_000, 3_500)
			.saturating_add(RocksDbWeight::get().reads(2))
			.saturating_add(RocksDbWeight::get().writes(1))
	}
	fn deposit() -> Weight {
		Weight::from_parts(70_000_000, 6_200)
			.saturating_add(RocksDbWeight::get().reads(4))
			.saturating_add(RocksDbWeight::get().writes(5))
	}
	fn withdraw(s: u32, ) -> Weight {
		Weight::from_parts(60_000_000, 6_200)
			.saturating_add(Weight::from_parts(45_000_000, 3_600).saturating_mul(s.into()))
			.saturating_add(RocksDbWeight::get().reads(4))
			.saturating_add(RocksDbWeight::get().reads((4_u64).saturating_mul(s.into())))
			.saturating_add(RocksDbWeight::get().writes(5))
			.saturating_add(RocksDbWeight::get().writes((3_u64).saturating_mul(s.into())))
	}
}
