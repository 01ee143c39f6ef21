use crate::*;
use polkadot_sdk::frame_benchmarking::v2::*;
use polkadot_sdk::frame_support::traits::{
  EnsureOrigin,
  fungibles::{Create, Mutate},
};
use polkadot_sdk::frame_system::RawOrigin;
use primitives::{AssetId, Balance, BasisPoints, VaultId};

const BENCH_ASSET: AssetId = 9_000;
const BENCH_SHARE_ASSET: AssetId = 9_001;
const FUNDS: Balance = 1_000_000_000;

fn fund_caller<T: Config>() -> T::AccountId {
  let caller: T::AccountId = whitelisted_caller();
  T::Assets::create(BENCH_ASSET, caller.clone(), true, 1).expect("Failed to create asset");
  T::Assets::mint_into(BENCH_ASSET, &caller, FUNDS).expect("Failed to fund caller");
  caller
}

fn setup_vault<T: Config>(fee_bps: BasisPoints) -> (VaultId, T::AccountId) {
  let caller = fund_caller::<T>();
  let origin =
    T::AdminOrigin::try_successful_origin().expect("AdminOrigin must have a successful origin");
  let vault_id = NextVaultId::<T>::get();
  Pallet::<T>::create_vault(
    origin,
    BENCH_ASSET,
    BENCH_SHARE_ASSET,
    fee_bps,
    account("primary", 0, 0),
    account("secondary", 1, 0),
  )
  .expect("Failed to create vault");
  T::BenchmarkHelper::whitelist(vault_id, &caller);
  (vault_id, caller)
}

fn setup_funded_vault<T: Config>() -> (VaultId, T::AccountId) {
  let (vault_id, caller) = setup_vault::<T>(700);
  Pallet::<T>::do_deposit(vault_id, &caller, FUNDS / 2, &caller).expect("Failed to deposit");
  (vault_id, caller)
}

#[benchmarks]
mod benches {
  use super::*;

  #[benchmark]
  fn create_vault() {
    fund_caller::<T>();
    let origin =
      T::AdminOrigin::try_successful_origin().expect("AdminOrigin must have a successful origin");
    let primary: T::AccountId = account("primary", 0, 0);
    let secondary: T::AccountId = account("secondary", 1, 0);

    #[extrinsic_call]
    create_vault(
      origin,
      BENCH_ASSET,
      BENCH_SHARE_ASSET,
      700,
      primary,
      secondary,
    );

    assert!(Vaults::<T>::contains_key(0));
  }

  #[benchmark]
  fn deposit() {
    let (vault_id, caller) = setup_vault::<T>(700);

    #[extrinsic_call]
    deposit(RawOrigin::Signed(caller.clone()), vault_id, FUNDS / 2, caller.clone());

    assert_eq!(Totals::<T>::get(vault_id).total_assets, FUNDS / 2);
  }

  #[benchmark]
  fn mint() {
    let (vault_id, caller) = setup_vault::<T>(700);

    #[extrinsic_call]
    mint(RawOrigin::Signed(caller.clone()), vault_id, FUNDS / 2, caller.clone());

    assert_eq!(Totals::<T>::get(vault_id).total_supply, FUNDS / 2);
  }

  #[benchmark]
  fn withdraw() {
    let (vault_id, caller) = setup_funded_vault::<T>();

    #[extrinsic_call]
    withdraw(
      RawOrigin::Signed(caller.clone()),
      vault_id,
      FUNDS / 4,
      caller.clone(),
      caller.clone(),
    );
  }

  #[benchmark]
  fn redeem() {
    let (vault_id, caller) = setup_funded_vault::<T>();

    #[extrinsic_call]
    redeem(
      RawOrigin::Signed(caller.clone()),
      vault_id,
      FUNDS / 4,
      caller.clone(),
      caller.clone(),
    );
  }

  #[benchmark]
  fn set_withdrawal_fee() {
    let (vault_id, _) = setup_vault::<T>(700);
    let origin =
      T::AdminOrigin::try_successful_origin().expect("AdminOrigin must have a successful origin");

    #[extrinsic_call]
    set_withdrawal_fee(origin, vault_id, 250);
  }

  #[benchmark]
  fn set_fee_recipients() {
    let (vault_id, _) = setup_vault::<T>(700);
    let origin =
      T::AdminOrigin::try_successful_origin().expect("AdminOrigin must have a successful origin");
    let primary: T::AccountId = account("primary", 2, 0);
    let secondary: T::AccountId = account("secondary", 3, 0);

    #[extrinsic_call]
    set_fee_recipients(origin, vault_id, primary, secondary);
  }

  #[benchmark]
  fn set_total_assets() {
    let (vault_id, _) = setup_funded_vault::<T>();
    let origin =
      T::AdminOrigin::try_successful_origin().expect("AdminOrigin must have a successful origin");

    #[extrinsic_call]
    set_total_assets(origin, vault_id, FUNDS);
  }

  #[benchmark]
  fn pause() {
    let (vault_id, _) = setup_vault::<T>(700);
    let origin =
      T::AdminOrigin::try_successful_origin().expect("AdminOrigin must have a successful origin");

    #[extrinsic_call]
    pause(origin, vault_id);

    assert!(PausedVaults::<T>::get(vault_id));
  }

  #[benchmark]
  fn unpause() {
    let (vault_id, _) = setup_vault::<T>(700);
    let origin =
      T::AdminOrigin::try_successful_origin().expect("AdminOrigin must have a successful origin");
    Pallet::<T>::pause(origin.clone(), vault_id).expect("Failed to pause");

    #[extrinsic_call]
    unpause(origin, vault_id);
  }

  #[cfg(test)]
  use crate::mock::{Test, new_test_ext};
  #[cfg(test)]
  impl_benchmark_test_suite!(Pallet, new_test_ext(), Test);
}
