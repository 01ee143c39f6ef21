extern crate alloc;

use crate::*;
use alloc::vec::Vec;
use polkadot_sdk::frame_benchmarking::v2::*;
use polkadot_sdk::frame_support::traits::{
  EnsureOrigin,
  fungibles::{Create, Mutate},
};
use polkadot_sdk::frame_system::RawOrigin;
use primitives::{AssetId, Balance, BasisPoints, PositionId, VaultId};

const BENCH_ASSET: AssetId = 9_100;
const BENCH_SHARE_ASSET: AssetId = 9_101;
const FUNDS: Balance = 1_000_000_000;

fn admin<T: Config>() -> T::RuntimeOrigin {
  T::AdminOrigin::try_successful_origin().expect("AdminOrigin must have a successful origin")
}

fn strategist<T: Config>() -> T::RuntimeOrigin {
  T::StrategistOrigin::try_successful_origin()
    .expect("StrategistOrigin must have a successful origin")
}

fn setup_pool<T: Config>(withdrawal_fee_bps: BasisPoints) -> T::AccountId {
  let caller: T::AccountId = whitelisted_caller();
  T::Assets::create(BENCH_ASSET, caller.clone(), true, 1).expect("Failed to create asset");
  T::Assets::mint_into(BENCH_ASSET, &caller, FUNDS).expect("Failed to fund caller");
  Pallet::<T>::initialize(
    admin::<T>(),
    BENCH_ASSET,
    BENCH_SHARE_ASSET,
    withdrawal_fee_bps,
    1_000,
    account("primary", 0, 0),
    account("secondary", 1, 0),
  )
  .expect("Failed to initialize");
  caller
}

fn add_children<T: Config>(count: u32) -> Vec<VaultId> {
  let pool = Pallet::<T>::account_id();
  (0..count)
    .map(|_| {
      let vault_id = T::BenchmarkHelper::create_child_vault(BENCH_ASSET, &pool);
      Pallet::<T>::approve_vault(admin::<T>(), vault_id).expect("Failed to approve child");
      vault_id
    })
    .collect()
}

/// Pool with an open position of `FUNDS / 2`, spread evenly over `v` children.
fn setup_allocated_pool<T: Config>(v: u32) -> (T::AccountId, PositionId) {
  let caller = setup_pool::<T>(700);
  let children = add_children::<T>(v);
  let (position_id, _) =
    Pallet::<T>::do_deposit(&caller, 0, FUNDS / 2).expect("Failed to deposit");
  if !children.is_empty() {
    let share = FUNDS / 2 / Balance::from(v);
    for vault_id in children {
      Pallet::<T>::allocate(strategist::<T>(), vault_id, share, 0).expect("Failed to allocate");
    }
  }
  Pallet::<T>::reveal(admin::<T>()).expect("Failed to reveal");
  Pallet::<T>::set_withdrawable(admin::<T>(), true).expect("Failed to open withdrawals");
  (caller, position_id)
}

fn setup_child<T: Config>() -> VaultId {
  let caller = setup_pool::<T>(700);
  let vault_id = add_children::<T>(1)[0];
  Pallet::<T>::do_deposit(&caller, 0, FUNDS / 2).expect("Failed to deposit");
  vault_id
}

#[benchmarks]
mod benches {
  use super::*;

  #[benchmark]
  fn initialize() {
    let caller: T::AccountId = whitelisted_caller();
    T::Assets::create(BENCH_ASSET, caller, true, 1).expect("Failed to create asset");
    let origin = admin::<T>();

    #[extrinsic_call]
    initialize(
      origin,
      BENCH_ASSET,
      BENCH_SHARE_ASSET,
      700,
      1_000,
      account("primary", 0, 0),
      account("secondary", 1, 0),
    );

    assert!(Settings::<T>::exists());
  }

  #[benchmark]
  fn deposit(v: Linear<0, { T::MaxChildVaults::get() }>) {
    let caller = setup_pool::<T>(700);
    add_children::<T>(v);

    #[extrinsic_call]
    deposit(RawOrigin::Signed(caller), 0, FUNDS / 2);

    assert_eq!(TotalSupply::<T>::get(), FUNDS / 2);
  }

  #[benchmark]
  fn mint(v: Linear<0, { T::MaxChildVaults::get() }>) {
    let caller = setup_pool::<T>(700);
    add_children::<T>(v);

    #[extrinsic_call]
    mint(RawOrigin::Signed(caller), 0, FUNDS / 2);

    assert_eq!(TotalSupply::<T>::get(), FUNDS / 2);
  }

  // Net amount large enough to draw on every child
  #[benchmark]
  fn withdraw(v: Linear<0, { T::MaxChildVaults::get() }>) {
    let (caller, position_id) = setup_allocated_pool::<T>(v);

    #[extrinsic_call]
    withdraw(
      RawOrigin::Signed(caller.clone()),
      position_id,
      FUNDS / 2 * 9 / 10,
      caller.clone(),
    );
  }

  #[benchmark]
  fn redeem(v: Linear<0, { T::MaxChildVaults::get() }>) {
    let (caller, position_id) = setup_allocated_pool::<T>(v);

    #[extrinsic_call]
    redeem(
      RawOrigin::Signed(caller.clone()),
      position_id,
      FUNDS / 2,
      caller.clone(),
    );

    assert_eq!(TotalSupply::<T>::get(), 0);
  }

  #[benchmark]
  fn allocate() {
    let vault_id = setup_child::<T>();
    let origin = strategist::<T>();

    #[extrinsic_call]
    allocate(origin, vault_id, FUNDS / 4, 0);
  }

  #[benchmark]
  fn allocate_shares() {
    let vault_id = setup_child::<T>();
    let origin = strategist::<T>();

    #[extrinsic_call]
    allocate_shares(origin, vault_id, FUNDS / 4, FUNDS / 2);
  }

  #[benchmark]
  fn deallocate() {
    let vault_id = setup_child::<T>();
    Pallet::<T>::allocate(strategist::<T>(), vault_id, FUNDS / 4, 0).expect("Failed to allocate");
    let origin = strategist::<T>();

    #[extrinsic_call]
    deallocate(origin, vault_id, FUNDS / 8, FUNDS / 4);
  }

  #[benchmark]
  fn deallocate_shares() {
    let vault_id = setup_child::<T>();
    Pallet::<T>::allocate(strategist::<T>(), vault_id, FUNDS / 4, 0).expect("Failed to allocate");
    let origin = strategist::<T>();

    #[extrinsic_call]
    deallocate_shares(origin, vault_id, FUNDS / 8, 0);
  }

  #[benchmark]
  fn approve_vault() {
    setup_pool::<T>(700);
    let vault_id = T::BenchmarkHelper::create_child_vault(BENCH_ASSET, &Pallet::<T>::account_id());
    let origin = admin::<T>();

    #[extrinsic_call]
    approve_vault(origin, vault_id);

    assert!(ApprovedVaults::<T>::get().contains(&vault_id));
  }

  #[benchmark]
  fn remove_vault() {
    setup_pool::<T>(700);
    let vault_id = add_children::<T>(1)[0];
    let origin = admin::<T>();

    #[extrinsic_call]
    remove_vault(origin, vault_id);

    assert!(ApprovedVaults::<T>::get().is_empty());
  }

  #[benchmark]
  fn set_withdrawal_fee() {
    setup_pool::<T>(700);
    let origin = admin::<T>();

    #[extrinsic_call]
    set_withdrawal_fee(origin, 250);
  }

  #[benchmark]
  fn set_entry_fee() {
    setup_pool::<T>(700);
    let origin = admin::<T>();

    #[extrinsic_call]
    set_entry_fee(origin, 2_000);
  }

  #[benchmark]
  fn set_fee_recipients() {
    setup_pool::<T>(700);
    let origin = admin::<T>();
    let primary: T::AccountId = account("primary", 2, 0);
    let secondary: T::AccountId = account("secondary", 3, 0);

    #[extrinsic_call]
    set_fee_recipients(origin, primary, secondary);
  }

  #[benchmark]
  fn reveal() {
    let origin = admin::<T>();

    #[extrinsic_call]
    reveal(origin);

    assert!(IsRevealed::<T>::get());
  }

  #[benchmark]
  fn set_withdrawable() {
    let origin = admin::<T>();

    #[extrinsic_call]
    set_withdrawable(origin, true);
  }

  #[benchmark]
  fn pause() {
    let origin = admin::<T>();

    #[extrinsic_call]
    pause(origin);

    assert!(IsPaused::<T>::get());
  }

  #[benchmark]
  fn unpause() {
    let origin = admin::<T>();
    Pallet::<T>::pause(origin.clone()).expect("Failed to pause");

    #[extrinsic_call]
    unpause(origin);
  }

  #[cfg(test)]
  use crate::mock::{Test, new_test_ext};
  #[cfg(test)]
  impl_benchmark_test_suite!(Pallet, new_test_ext(), Test);
}
