#![cfg_attr(rustfmt, rustfmt_skip)]
#![allow(unused_parens)]
#![allow(unused_imports)]
#![allow(missing_docs)]

use polkadot_sdk::frame_support::{traits::Get, weights::{Weight, constants::RocksDbWeight}};
use core::marker::PhantomData;

pub trait WeightInfo {
	fn initialize() -> Weight;
	fn deposit(v: u32, ) -> Weight;
	fn mint(v: u32, ) -> Weight;
	fn withdraw(v: u32, ) -> Weight;
	fn redeem(v: u32, ) -> Weight;
	fn allocate() -> Weight;
	fn allocate_shares() -> Weight;
	fn deallocate() -> Weight;
	fn deallocate_shares() -> Weight;
	fn approve_vault() -> Weight;
	fn remove_vault() -> Weight;
	fn set_withdrawal_fee() -> Weight;
	fn set_entry_fee() -> Weight;
	fn set_fee_recipients() -> Weight;
	fn reveal() -> Weight;
	fn set_withdrawable() -> Weight;
	fn pause() -> Weight;
	fn unpause() -> Weight;
}

pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: polkadot_sdk::frame_system::Config> WeightInfo for SubstrateWeight<T> {
	fn initialize() -> Weight {
		Weight::from_parts(38_000_000, 3600)
			.saturating_add(T::DbWeight::get().reads(3))
			.saturating_add(T::DbWeight::get().writes(4))
	}
	// Every approved child is valued once: share balance plus totals
	fn deposit(v: u32, ) -> Weight {
		Weight::from_parts(95_000_000, 8400)
			.saturating_add(Weight::from_parts(9_000_000, 2600).saturating_mul(v.into()))
			.saturating_add(T::DbWeight::get().reads(10))
			.saturating_add(T::DbWeight::get().reads((2_u64).saturating_mul(v.into())))
			.saturating_add(T::DbWeight::get().writes(9))
	}
	fn mint(v: u32, ) -> Weight {
		Weight::from_parts(95_000_000, 8400)
			.saturating_add(Weight::from_parts(9_000_000, 2600).saturating_mul(v.into()))
			.saturating_add(T::DbWeight::get().reads(10))
			.saturating_add(T::DbWeight::get().reads((2_u64).saturating_mul(v.into())))
			.saturating_add(T::DbWeight::get().writes(9))
	}
	// Worst case: every child is drawn on to source liquidity
	fn withdraw(v: u32, ) -> Weight {
		Weight::from_parts(120_000_000, 9000)
			.saturating_add(Weight::from_parts(85_000_000, 6400).saturating_mul(v.into()))
			.saturating_add(T::DbWeight::get().reads(10))
			.saturating_add(T::DbWeight::get().reads((9_u64).saturating_mul(v.into())))
			.saturating_add(T::DbWeight::get().writes(8))
			.saturating_add(T::DbWeight::get().writes((7_u64).saturating_mul(v.into())))
	}
	fn redeem(v: u32, ) -> Weight {
		Weight::from_parts(120_000_000, 9000)
			.saturating_add(Weight::from_parts(85_000_000, 6400).saturating_mul(v.into()))
			.saturating_add(T::DbWeight::get().reads(10))
			.saturating_add(T::DbWeight::get().reads((9_u64).saturating_mul(v.into())))
			.saturating_add(T::DbWeight::get().writes(8))
			.saturating_add(T::DbWeight::get().writes((7_u64).saturating_mul(v.into())))
	}
	fn allocate() -> Weight {
		Weight::from_parts(70_000_000, 6200)
			.saturating_add(T::DbWeight::get().reads(8))
			.saturating_add(T::DbWeight::get().writes(6))
	}
	fn allocate_shares() -> Weight {
		Weight::from_parts(70_000_000, 6200)
			.saturating_add(T::DbWeight::get().reads(8))
			.saturating_add(T::DbWeight::get().writes(6))
	}
	fn deallocate() -> Weight {
		Weight::from_parts(90_000_000, 8800)
			.saturating_add(T::DbWeight::get().reads(10))
			.saturating_add(T::DbWeight::get().writes(9))
	}
	fn deallocate_shares() -> Weight {
		Weight::from_parts(90_000_000, 8800)
			.saturating_add(T::DbWeight::get().reads(10))
			.saturating_add(T::DbWeight::get().writes(9))
	}
	fn approve_vault() -> Weight {
		Weight::from_parts(15_000_000, 2000)
			.saturating_add(T::DbWeight::get().reads(3))
			.saturating_add(T::DbWeight::get().writes(1))
	}
	fn remove_vault() -> Weight {
		Weight::from_parts(15_000_000, 2000)
			.saturating_add(T::DbWeight::get().reads(3))
			.saturating_add(T::DbWeight::get().writes(1))
	}
	fn set_withdrawal_fee() -> Weight {
		Weight::from_parts(12_000_000, 1600)
			.saturating_add(T::DbWeight::get().reads(1))
			.saturating_add(T::DbWeight::get().writes(1))
	}
	fn set_entry_fee() -> Weight {
		Weight::from_parts(12_000_000, 1600)
			.saturating_add(T::DbWeight::get().reads(1))
			.saturating_add(T::DbWeight::get().writes(1))
	}
	fn set_fee_recipients() -> Weight {
		Weight::from_parts(12_000_000, 1600)
			.saturating_add(T::DbWeight::get().reads(1))
			.saturating_add(T::DbWeight::get().writes(1))
	}
	fn reveal() -> Weight {
		Weight::from_parts(9_000_000, 1500)
			.saturating_add(T::DbWeight::get().reads(1))
			.saturating_add(T::DbWeight::get().writes(1))
	}
	fn set_withdrawable() -> Weight {
		Weight::from_parts(8_000_000, 0)
			.saturating_add(T::DbWeight::get().writes(1))
	}
	fn pause() -> Weight {
		Weight::from_parts(9_000_000, 1500)
			.saturating_add(T::DbWeight::get().reads(1))
			.saturating_add(T::DbWeight::get().writes(1))
	}
	fn unpause() -> Weight {
		Weight::from_parts(9_000_000, 1500)
			.saturating_add(T::DbWeight::get().reads(1))
			.saturating_add(T::DbWeight::get().writes(1))
	}
}

impl WeightInfo for () {
	fn initialize() -> Weight {
		Weight::from_parts(38_000_000, 3600)
			.saturating_add(RocksDbWeight::get().reads(3))
			.saturating_add(RocksDbWeight::get().writes(4))
	}
	fn deposit(v: u32, ) -> Weight {
		Weight::from_parts(95_000_000, 8400)
			.saturating_add(Weight::from_parts(9_000_000, 2600).saturating_mul(v.into()))
			.saturating_add(RocksDbWeight::get().reads(10))
			.saturating_add(RocksDbWeight::get().reads((2_u64).saturating_mul(v.into())))
			.saturating_add(RocksDbWeight::get().writes(9))
	}
	fn mint(v: u32, ) -> Weight {
		Weight::from_parts(95_000_000, 8400)
			.saturating_add(Weight::from_parts(9_000_000, 2600).saturating_mul(v.into()))
			.saturating_add(RocksDbWeight::get().reads(10))
			.saturating_add(RocksDbWeight::get().reads((2_u64).saturating_mul(v.into())))
			.saturating_add(RocksDbWeight::get().writes(9))
	}
	fn withdraw(v: u32, ) -> Weight {
		Weight::from_parts(120_000_000, 9000)
			.saturating_add(Weight::from_parts(85_000_000, 6400).saturating_mul(v.into()))
			.saturating_add(RocksDbWeight::get().reads(10))
			.saturating_add(RocksDbWeight::get().reads((9_u64).saturating_mul(v.into())))
			.saturating_add(RocksDbWeight::get().writes(8))
			.saturating_add(RocksDbWeight::get().writes((7_u64).saturating_mul(v.into())))
	}
	fn redeem(v: u32, ) -> Weight {
		Weight::from_parts(120_000_000, 9000)
			.saturating_add(Weight::from_parts(85_000_000, 6400).saturating_mul(v.into()))
			.saturating_add(RocksDbWeight::get().reads(10))
			.saturating_add(RocksDbWeight::get().reads((9_u64).saturating_mul(v.into())))
			.saturating_add(RocksDbWeight::get().writes(8))
			.saturating_add(RocksDbWeight::get().writes((7_u64).saturating_mul(v.into())))
	}
	fn allocate() -> Weight {
		Weight::from_parts(70_000_000, 6200)
			.saturating_add(RocksDbWeight::get().reads(8))
			.saturating_add(RocksDbWeight::get().writes(6))
	}
	fn allocate_shares() -> Weight {
		Weight::from_parts(70_000_000, 6200)
			.saturating_add(RocksDbWeight::get().reads(8))
			.saturating_add(RocksDbWeight::get().writes(6))
	}
	fn deallocate() -> Weight {
		Weight::from_parts(90_000_000, 8800)
			.saturating_add(RocksDbWeight::get().reads(10))
			.saturating_add(RocksDbWeight::get().writes(9))
	}
	fn deallocate_shares() -> Weight {
		Weight::from_parts(90_000_000, 8800)
			.saturating_add(RocksDbWeight::get().reads(10))
			.saturating_add(RocksDbWeight::get().writes(9))
	}
	fn approve_vault() -> Weight {
		Weight::from_parts(15_000_000, 2000)
	}
	fn remove_vault() -> Weight {
		Weight::from_parts(15_000_000, 2000)
	}
	fn set_withdrawal_fee() -> Weight {
		Weight::from_parts(12_000_000, 1600)
	}
	fn set_entry_fee() -> Weight {
		Weight::from_parts(12_000_000, 1600)
	}
	fn set_fee_recipients() -> Weight {
		Weight::from_parts(12_000_000, 1600)
	}
	fn reveal() -> Weight {
		Weight::from_parts(9_000_000, 1500)
	}
	fn set_withdrawable() -> Weight {
		Weight::from_parts(8_000_000, 0)
	}
	fn pause() -> Weight {
		Weight::from_parts(9_000_000, 1500)
	}
	fn unpause() -> Weight {
		Weight::from_parts(9_000_000, 1500)
	}
}
