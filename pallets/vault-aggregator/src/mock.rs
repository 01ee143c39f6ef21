use crate as pallet_vault_aggregator;
use crate::PositionRegistry;
use codec::Encode;
use polkadot_sdk::frame_support::{
  PalletId, construct_runtime, derive_impl, ord_parameter_types, parameter_types,
  storage::unhashed,
  traits::{ConstU32, ConstU128, Everything},
};
use polkadot_sdk::frame_system::{self, EnsureSignedBy};
use polkadot_sdk::sp_runtime::{
  BuildStorage, DispatchError, Rounding,
  testing::H256,
  traits::{BlakeTwo256, IdentityLookup},
};
use primitives::{AssetId, Balance, BasisPoints, PositionId, VaultId, pallet_ids};

pub type AccountId = u64;

pub const NULL: AccountId = 0;
pub const ALICE: AccountId = 1;
pub const BOB: AccountId = 2;
pub const CHARLIE: AccountId = 3;
pub const DAVE: AccountId = 4;
pub const EVE: AccountId = 5;
pub const PRIMARY: AccountId = 10;
pub const SECONDARY: AccountId = 11;
pub const CHILD_PRIMARY: AccountId = 20;
pub const CHILD_SECONDARY: AccountId = 21;
pub const STRATEGIST: AccountId = 30;
pub const ASSET_OWNER: AccountId = 99;

pub const ASSET: AssetId = 1;
pub const OTHER_ASSET: AssetId = 2;
/// Asset whose accounts need a balance of at least [`DUST_MIN_BALANCE`]
pub const DUST_ASSET: AssetId = 3;
pub const DUST_MIN_BALANCE: Balance = 10;
pub const SHARE_ASSET: AssetId = 100;
pub const CHILD_SHARE_ASSET_BASE: AssetId = 200;
pub const INITIAL_ASSETS: Balance = 1_000_000;

type Block = frame_system::mocking::MockBlock<Test>;

construct_runtime!(
  pub struct Test {
    System: frame_system,
    Balances: polkadot_sdk::pallet_balances,
    Assets: polkadot_sdk::pallet_assets,
    ShareVaults: pallet_share_vault,
    Aggregator: pallet_vault_aggregator,
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
pub struct ChildVaultBenchmarkHelper;

#[cfg(feature = "runtime-benchmarks")]
impl pallet_share_vault::BenchmarkHelper<AccountId> for ChildVaultBenchmarkHelper {
  fn whitelist(_vault_id: VaultId, _who: &AccountId) {}
}

#[cfg(feature = "runtime-benchmarks")]
impl pallet_vault_aggregator::BenchmarkHelper<AccountId> for ChildVaultBenchmarkHelper {
  fn create_child_vault(asset: AssetId, _depositor: &AccountId) -> VaultId {
    let vault_id = pallet_share_vault::NextVaultId::<Test>::get();
    ShareVaults::create_vault(
      RuntimeOrigin::root(),
      asset,
      CHILD_SHARE_ASSET_BASE + vault_id,
      0,
      CHILD_PRIMARY,
      CHILD_SECONDARY,
    )
    .expect("child vault creation succeeds");
    vault_id
  }
}

parameter_types! {
  pub const ShareVaultPalletId: PalletId = PalletId(*pallet_ids::SHARE_VAULT_PALLET_ID);
  pub const AggregatorPalletId: PalletId = PalletId(*pallet_ids::VAULT_AGGREGATOR_PALLET_ID);
  pub const WithdrawalRounding: Rounding = Rounding::Down;
}

ord_parameter_types! {
  pub const Strategist: AccountId = STRATEGIST;
}

impl pallet_share_vault::Config for Test {
  type Assets = Assets;
  type AdminOrigin = frame_system::EnsureRoot<AccountId>;
  type Whitelist = Everything;
  type PalletId = ShareVaultPalletId;
  type WithdrawalRounding = WithdrawalRounding;
  type WeightInfo = ();
  #[cfg(feature = "runtime-benchmarks")]
  type BenchmarkHelper = ChildVaultBenchmarkHelper;
}

const NEXT_POSITION_KEY: &[u8] = b":mock:positions:next";
const OWNER_PREFIX: &[u8] = b":mock:positions:owner";
const HOLDER_PREFIX: &[u8] = b":mock:positions:holder";

/// Position registry kept in raw storage so failed dispatches roll it back
pub struct MockPositions;

impl PositionRegistry<AccountId> for MockPositions {
  fn issue(to: &AccountId) -> Result<PositionId, DispatchError> {
    let position_id = Self::issued() + 1;
    unhashed::put(NEXT_POSITION_KEY, &position_id);
    unhashed::put(&(OWNER_PREFIX, position_id).encode(), to);
    unhashed::put(&(HOLDER_PREFIX, *to).encode(), &position_id);
    Ok(position_id)
  }

  fn owner_of(position: PositionId) -> Option<AccountId> {
    unhashed::get(&(OWNER_PREFIX, position).encode())
  }

  fn position_of(who: &AccountId) -> Option<PositionId> {
    unhashed::get(&(HOLDER_PREFIX, *who).encode())
  }

  fn issued() -> u32 {
    unhashed::get_or_default(NEXT_POSITION_KEY)
  }
}

impl MockPositions {
  /// Hand `position` over to `to`, as a transfer of the underlying token would.
  pub fn transfer(position: PositionId, to: AccountId) {
    if let Some(from) = Self::owner_of(position) {
      unhashed::kill(&(HOLDER_PREFIX, from).encode());
    }
    unhashed::put(&(OWNER_PREFIX, position).encode(), &to);
    unhashed::put(&(HOLDER_PREFIX, to).encode(), &position);
  }
}

impl pallet_vault_aggregator::Config for Test {
  type Assets = Assets;
  type Vaults = ShareVaults;
  type Positions = MockPositions;
  type AdminOrigin = frame_system::EnsureRoot<AccountId>;
  type StrategistOrigin = EnsureSignedBy<Strategist, AccountId>;
  type PalletId = AggregatorPalletId;
  type MaxPositions = ConstU32<3>;
  type MaxChildVaults = ConstU32<3>;
  type WithdrawalRounding = WithdrawalRounding;
  type WeightInfo = ();
  #[cfg(feature = "runtime-benchmarks")]
  type BenchmarkHelper = ChildVaultBenchmarkHelper;
}

/// Initialize the aggregator over [`ASSET`] with the given fees.
pub fn initialize(withdrawal_fee_bps: BasisPoints, entry_fee: Balance) {
  Aggregator::initialize(
    RuntimeOrigin::root(),
    ASSET,
    SHARE_ASSET,
    withdrawal_fee_bps,
    entry_fee,
    PRIMARY,
    SECONDARY,
  )
  .expect("initialization succeeds");
}

/// Create a child share vault over `asset` without approving it.
pub fn create_child(asset: AssetId, withdrawal_fee_bps: BasisPoints) -> VaultId {
  let vault_id = pallet_share_vault::NextVaultId::<Test>::get();
  ShareVaults::create_vault(
    RuntimeOrigin::root(),
    asset,
    CHILD_SHARE_ASSET_BASE + vault_id,
    withdrawal_fee_bps,
    CHILD_PRIMARY,
    CHILD_SECONDARY,
  )
  .expect("child vault creation succeeds");
  vault_id
}

/// Create and approve a child vault over [`ASSET`].
pub fn add_child(withdrawal_fee_bps: BasisPoints) -> VaultId {
  let vault_id = create_child(ASSET, withdrawal_fee_bps);
  Aggregator::approve_vault(RuntimeOrigin::root(), vault_id).expect("approval succeeds");
  vault_id
}

pub fn open_withdrawals() {
  Aggregator::reveal(RuntimeOrigin::root()).expect("reveal succeeds");
  Aggregator::set_withdrawable(RuntimeOrigin::root(), true).expect("gate opens");
}

/// Credit `amount` of `asset` to the pool as if earned outside any deposit.
pub fn accrue_interest(asset: AssetId, amount: Balance) {
  use polkadot_sdk::frame_support::traits::fungibles::Mutate;
  <Assets as Mutate<AccountId>>::mint_into(asset, &pool_account(), amount)
    .expect("interest is minted");
}

pub fn strategist() -> RuntimeOrigin {
  RuntimeOrigin::signed(STRATEGIST)
}

pub fn pool_account() -> AccountId {
  Aggregator::account_id()
}

pub fn asset_balance(who: AccountId) -> Balance {
  use polkadot_sdk::frame_support::traits::fungibles::Inspect;
  <Assets as Inspect<AccountId>>::balance(ASSET, &who)
}

pub fn dust_balance(who: AccountId) -> Balance {
  use polkadot_sdk::frame_support::traits::fungibles::Inspect;
  <Assets as Inspect<AccountId>>::balance(DUST_ASSET, &who)
}

pub fn share_balance(who: AccountId) -> Balance {
  use polkadot_sdk::frame_support::traits::fungibles::Inspect;
  <Assets as Inspect<AccountId>>::balance(SHARE_ASSET, &who)
}

pub fn new_test_ext() -> polkadot_sdk::sp_io::TestExternalities {
  let mut t = frame_system::GenesisConfig::<Test>::default()
    .build_storage()
    .unwrap();

  polkadot_sdk::pallet_balances::GenesisConfig::<Test> {
    balances: vec![
      (ALICE, 1_000),
      (BOB, 1_000),
      (CHARLIE, 1_000),
      (DAVE, 1_000),
      (EVE, 1_000),
    ],
    dev_accounts: None,
  }
  .assimilate_storage(&mut t)
  .unwrap();

  polkadot_sdk::pallet_assets::GenesisConfig::<Test> {
    assets: vec![
      (ASSET, ASSET_OWNER, true, 1),
      (OTHER_ASSET, ASSET_OWNER, true, 1),
      (DUST_ASSET, ASSET_OWNER, true, DUST_MIN_BALANCE),
    ],
    metadata: vec![],
    accounts: vec![
      (ASSET, ALICE, INITIAL_ASSETS),
      (DUST_ASSET, ALICE, INITIAL_ASSETS),
      (ASSET, BOB, INITIAL_ASSETS),
      (ASSET, CHARLIE, INITIAL_ASSETS),
      (ASSET, DAVE, INITIAL_ASSETS),
    ],
    reserves: vec![],
    next_asset_id: None,
  }
  .assimilate_storage(&mut t)
  .unwrap();

  let mut ext: polkadot_sdk::sp_io::TestExternalities = t.into();
  ext.execute_with(|| System::set_block_number(1));
  ext
}
