use crate as pallet_share_vault;
use polkadot_sdk::frame_support::{
  PalletId, construct_runtime, derive_impl, parameter_types,
  traits::{ConstU32, ConstU128, ContainsPair},
};
use polkadot_sdk::frame_system;
use polkadot_sdk::sp_runtime::{
  BuildStorage, Rounding,
  testing::H256,
  traits::{BlakeTwo256, IdentityLookup},
};
use primitives::{AssetId, Balance, BasisPoints, VaultId, pallet_ids};
use std::cell::RefCell;
use std::collections::BTreeSet;

pub type AccountId = u64;

pub const NULL: AccountId = 0;
pub const ALICE: AccountId = 1;
pub const BOB: AccountId = 2;
pub const CHARLIE: AccountId = 3;
pub const PRIMARY: AccountId = 10;
pub const SECONDARY: AccountId = 11;
pub const ASSET_OWNER: AccountId = 99;

pub const ASSET: AssetId = 1;
/// Asset whose accounts need a balance of at least [`DUST_MIN_BALANCE`]
pub const DUST_ASSET: AssetId = 2;
pub const DUST_MIN_BALANCE: Balance = 10;
pub const SHARE_ASSET: AssetId = 100;
pub const DUST_SHARE_ASSET: AssetId = 101;
pub const INITIAL_ASSETS: Balance = 1_000_000;

thread_local! {
  // (vault, account) pairs refused by the whitelist; everyone else may deposit
  static DENIED: RefCell<BTreeSet<(VaultId, AccountId)>> = const { RefCell::new(BTreeSet::new()) };
}

pub fn deny(vault_id: VaultId, who: AccountId) {
  DENIED.with(|d| d.borrow_mut().insert((vault_id, who)));
}

pub struct MockWhitelist;
impl ContainsPair<VaultId, AccountId> for MockWhitelist {
  fn contains(vault_id: &VaultId, who: &AccountId) -> bool {
    !DENIED.with(|d| d.borrow().contains(&(*vault_id, *who)))
  }
}

type Block = frame_system::mocking::MockBlock<Test>;

construct_runtime!(
  pub struct Test {
    System: frame_system,
    Balances: polkadot_sdk::pallet_balances,
    Assets: polkadot_sdk::pallet_assets,
    ShareVaults: pallet_share_vault,
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
  type AssetId = AssetId;
  type AssetIdParameter = AssetId;
  type Currency = Balances;
  type CreateOrigin = polkadot_sdk::frame_support::traits::AsEnsureOriginWithArg<
    frame_system::EnsureSigned<Self::AccountId>,
  >;
  type ForceOrigin = frame_system::EnsureRoot<Self::AccountId>;
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
impl polkadot_sdk::pallet_assets::BenchmarkHelper<AssetId, ()> for AssetBenchmarkHelper {
  fn create_asset_id_parameter(id: u32) -> AssetId {
    id
  }
  fn create_reserve_id_parameter(_id: u32) -> () {
    ()
  }
}

#[cfg(feature = "runtime-benchmarks")]
pub struct VaultBenchmarkHelper;

#[cfg(feature = "runtime-benchmarks")]
impl pallet_share_vault::BenchmarkHelper<AccountId> for VaultBenchmarkHelper {
  fn whitelist(vault_id: VaultId, who: &AccountId) {
    DENIED.with(|d| d.borrow_mut().remove(&(vault_id, *who)));
  }
}

parameter_types! {
  pub const ShareVaultPalletId: PalletId = PalletId(*pallet_ids::SHARE_VAULT_PALLET_ID);
  pub const WithdrawalRounding: Rounding = Rounding::Down;
}

impl pallet_share_vault::Config for Test {
  type Assets = Assets;
  type AdminOrigin = frame_system::EnsureRoot<AccountId>;
  type Whitelist = MockWhitelist;
  type PalletId = ShareVaultPalletId;
  type WithdrawalRounding = WithdrawalRounding;
  type WeightInfo = ();
  #[cfg(feature = "runtime-benchmarks")]
  type BenchmarkHelper = VaultBenchmarkHelper;
}

/// Create the default vault over [`ASSET`] with the given fee and return its id.
pub fn create_vault(withdrawal_fee_bps: BasisPoints) -> VaultId {
  let vault_id = pallet_share_vault::NextVaultId::<Test>::get();
  ShareVaults::create_vault(
    RuntimeOrigin::root(),
    ASSET,
    SHARE_ASSET,
    withdrawal_fee_bps,
    PRIMARY,
    SECONDARY,
  )
  .expect("vault creation succeeds");
  vault_id
}

/// Create a vault over [`DUST_ASSET`]; its fee recipients start without a balance.
pub fn create_dust_vault(withdrawal_fee_bps: BasisPoints) -> VaultId {
  let vault_id = pallet_share_vault::NextVaultId::<Test>::get();
  ShareVaults::create_vault(
    RuntimeOrigin::root(),
    DUST_ASSET,
    DUST_SHARE_ASSET,
    withdrawal_fee_bps,
    PRIMARY,
    SECONDARY,
  )
  .expect("vault creation succeeds");
  vault_id
}

pub fn asset_balance(who: AccountId) -> Balance {
  use polkadot_sdk::frame_support::traits::fungibles::Inspect;
  <Assets as Inspect<AccountId>>::balance(ASSET, &who)
}

pub fn dust_balance(who: AccountId) -> Balance {
  use polkadot_sdk::frame_support::traits::fungibles::Inspect;
  <Assets as Inspect<AccountId>>::balance(DUST_ASSET, &who)
}

pub fn new_test_ext() -> polkadot_sdk::sp_io::TestExternalities {
  let mut t = frame_system::GenesisConfig::<Test>::default()
    .build_storage()
    .unwrap();

  polkadot_sdk::pallet_balances::GenesisConfig::<Test> {
    balances: vec![(ALICE, 1_000), (BOB, 1_000), (CHARLIE, 1_000)],
    dev_accounts: None,
  }
  .assimilate_storage(&mut t)
  .unwrap();

  polkadot_sdk::pallet_assets::GenesisConfig::<Test> {
    assets: vec![
      (ASSET, ASSET_OWNER, true, 1),
      (DUST_ASSET, ASSET_OWNER, true, DUST_MIN_BALANCE),
    ],
    metadata: vec![],
    accounts: vec![
      (ASSET, ALICE, INITIAL_ASSETS),
      (ASSET, BOB, INITIAL_ASSETS),
      (DUST_ASSET, ALICE, INITIAL_ASSETS),
    ],
    reserves: vec![],
    next_asset_id: None,
  }
  .assimilate_storage(&mut t)
  .unwrap();

  DENIED.with(|d| d.borrow_mut().clear());

  let mut ext: polkadot_sdk::sp_io::TestExternalities = t.into();
  ext.execute_with(|| System::set_block_number(1));
  ext
}
