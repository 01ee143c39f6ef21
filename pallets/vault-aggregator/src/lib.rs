//! Vault Aggregator Pallet
//!
//! A single pooled vault whose depositors are identified by non-fungible
//! positions. Holders enter through a position (paying a flat entry fee on
//! creation) and receive aggregator shares; a strategist moves the idle pool
//! into approved child share vaults and back under slippage bounds.
//!
//! The aggregator values itself as its idle balance plus the asset value of
//! every child share it holds, less the withdrawal fee accrued on the gain
//! over deposited principal. Every exit pays that accrued fee out to the fee
//! recipients. Exits that outrun the idle balance pull the shortfall from
//! children in approval order.
//!
//! Withdrawals are gated twice: the pool has to be revealed once, and
//! withdrawals must be switched on.

#![cfg_attr(not(feature = "std"), no_std)]

pub use pallet::*;

pub mod adapters;
pub use adapters::PositionRegistry;

#[cfg(test)]
mod mock;

#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

pub mod weights;
pub use weights::WeightInfo;

pub const LOG_TARGET: &str = "runtime::vault-aggregator";

/// Helper for benchmarking
#[cfg(feature = "runtime-benchmarks")]
pub trait BenchmarkHelper<AccountId> {
  /// Create a child vault over `asset` that accepts deposits from `depositor`.
  fn create_child_vault(asset: primitives::AssetId, depositor: &AccountId) -> primitives::VaultId;
}

#[frame::pallet]
pub mod pallet {
  use super::{LOG_TARGET, PositionRegistry, WeightInfo};
  use frame::deps::{
    frame_support::{
      PalletId,
      traits::{
        fungibles::{Create, Inspect, Mutate},
        tokens::{Fortitude, Precision, Preservation, Provenance},
      },
    },
    sp_runtime::{ArithmeticError, DispatchError, Rounding, traits::AccountIdConversion},
  };
  use frame::prelude::*;
  use pallet_share_vault::{ShareVault, is_null_account};
  use primitives::{
    AssetId, Balance, BasisPoints, FeeSplit, PoolTotals, PositionId, VaultId, params::NEW_POSITION,
    route_fee, shares,
  };

  #[pallet::config]
  pub trait Config: frame_system::Config<RuntimeEvent: From<Event<Self>>> {
    /// Fungible ledger holding the underlying asset and the aggregator share token
    type Assets: Inspect<Self::AccountId, AssetId = AssetId, Balance = Balance>
      + Mutate<Self::AccountId>
      + Create<Self::AccountId>;

    /// Child vaults the pool is allocated into
    type Vaults: ShareVault<Self::AccountId>;

    /// Issuer of depositor positions
    type Positions: PositionRegistry<Self::AccountId>;

    /// Origin that initializes the pool and manages fees, gates and child approvals
    type AdminOrigin: EnsureOrigin<Self::RuntimeOrigin>;

    /// Origin allowed to move funds between the pool and child vaults
    type StrategistOrigin: EnsureOrigin<Self::RuntimeOrigin>;

    /// Pallet ID, used to derive the pool account
    #[pallet::constant]
    type PalletId: Get<PalletId>;

    /// Cap on positions ever issued
    #[pallet::constant]
    type MaxPositions: Get<u32>;

    /// Cap on simultaneously approved child vaults
    #[pallet::constant]
    type MaxChildVaults: Get<u32>;

    /// Rounding of the shares burned by a withdrawal
    type WithdrawalRounding: Get<Rounding>;

    /// Weight information for extrinsics
    type WeightInfo: WeightInfo;

    /// Helper for benchmarking
    #[cfg(feature = "runtime-benchmarks")]
    type BenchmarkHelper: crate::BenchmarkHelper<Self::AccountId>;
  }

  #[pallet::pallet]
  pub struct Pallet<T>(_);

  #[derive(
    Clone,
    Encode,
    Decode,
    DecodeWithMemTracking,
    Eq,
    PartialEq,
    RuntimeDebug,
    TypeInfo,
    MaxEncodedLen,
  )]
  pub struct AggregatorSettings<AccountId> {
    /// Underlying asset pooled by the aggregator
    pub asset: AssetId,
    /// Aggregator share token
    pub share_asset: AssetId,
    /// Fee in basis points, `0..=10_000`, on the gain over principal
    pub withdrawal_fee_bps: BasisPoints,
    /// Flat amount charged on top of the first deposit of a new position
    pub entry_fee: Balance,
    pub primary_fee_recipient: AccountId,
    pub secondary_fee_recipient: AccountId,
  }

  #[pallet::storage]
  #[pallet::getter(fn settings)]
  pub type Settings<T: Config> = StorageValue<_, AggregatorSettings<T::AccountId>>;

  /// Aggregator shares in circulation
  #[pallet::storage]
  #[pallet::getter(fn total_supply)]
  pub type TotalSupply<T: Config> = StorageValue<_, Balance, ValueQuery>;

  /// Assets depositors put in and have not taken out; value above it is interest
  #[pallet::storage]
  #[pallet::getter(fn principal)]
  pub type Principal<T: Config> = StorageValue<_, Balance, ValueQuery>;

  /// Child vaults in approval order; liquidity is sourced in this order
  #[pallet::storage]
  #[pallet::getter(fn approved_vaults)]
  pub type ApprovedVaults<T: Config> =
    StorageValue<_, BoundedVec<VaultId, T::MaxChildVaults>, ValueQuery>;

  #[pallet::storage]
  #[pallet::getter(fn is_revealed)]
  pub type IsRevealed<T: Config> = StorageValue<_, bool, ValueQuery>;

  #[pallet::storage]
  #[pallet::getter(fn is_withdrawable)]
  pub type IsWithdrawable<T: Config> = StorageValue<_, bool, ValueQuery>;

  #[pallet::storage]
  #[pallet::getter(fn is_paused)]
  pub type IsPaused<T: Config> = StorageValue<_, bool, ValueQuery>;

  #[pallet::event]
  #[pallet::generate_deposit(pub(super) fn deposit_event)]
  pub enum Event<T: Config> {
    Initialized {
      asset: AssetId,
      share_asset: AssetId,
    },
    /// A new position was issued; `entry_fee` was charged on top of the deposit
    PositionCreated {
      position_id: PositionId,
      owner: T::AccountId,
      entry_fee: Balance,
    },
    Deposited {
      position_id: PositionId,
      who: T::AccountId,
      assets: Balance,
      shares: Balance,
    },
    /// `assets` is the net amount paid to `receiver`
    Withdrawn {
      position_id: PositionId,
      who: T::AccountId,
      receiver: T::AccountId,
      assets: Balance,
      shares: Balance,
    },
    FeesDistributed {
      primary: T::AccountId,
      secondary: T::AccountId,
      split: FeeSplit,
    },
    Allocated {
      vault_id: VaultId,
      assets: Balance,
      shares: Balance,
    },
    Deallocated {
      vault_id: VaultId,
      assets: Balance,
      shares: Balance,
    },
    /// Assets pulled from a child vault to cover an exit
    LiquiditySourced {
      vault_id: VaultId,
      assets: Balance,
    },
    VaultApproved {
      vault_id: VaultId,
    },
    VaultRemoved {
      vault_id: VaultId,
    },
    WithdrawalFeeUpdated {
      old_fee_bps: BasisPoints,
      new_fee_bps: BasisPoints,
    },
    EntryFeeUpdated {
      old_fee: Balance,
      new_fee: Balance,
    },
    FeeRecipientsUpdated {
      primary: T::AccountId,
      secondary: T::AccountId,
    },
    Revealed,
    WithdrawableUpdated {
      withdrawable: bool,
    },
    Paused,
    Unpaused,
  }

  #[pallet::error]
  pub enum Error<T> {
    NotInitialized,
    AlreadyInitialized,
    /// The underlying asset does not exist
    UnknownAsset,
    /// The share token id is already taken
    ShareAssetInUse,
    /// A required account is the null account
    InvalidAddress,
    /// An amount is zero where a positive value is required, or a rate exceeds 100%
    ParameterOutOfBounds,
    AggregatorPaused,
    AlreadyPaused,
    NotPaused,
    /// The caller already holds a position
    MoreThanOne,
    /// The position cap has been reached
    OutOfSupply,
    /// The position does not exist or is held by someone else
    InvalidTokenId,
    WithdrawBeforeReveal,
    WithdrawDisabled,
    AlreadyRevealed,
    InsufficientShareBalance,
    /// Idle funds plus what children can release do not cover the exit
    InsufficientLiquidity,
    /// A child vault exchange fell outside the strategist's bound
    SlippageTooHigh,
    VaultNotApproved,
    VaultAlreadyApproved,
    /// No child vault exists under this id
    UnknownVault,
    /// The child vault pools a different asset
    AssetMismatch,
    TooManyVaults,
    /// The pool still holds shares of the child vault
    VaultNotEmpty,
  }

  #[pallet::call]
  impl<T: Config> Pallet<T> {
    /// Set the pool up over `asset` and create its share token `share_asset`.
    #[pallet::call_index(0)]
    #[pallet::weight(T::WeightInfo::initialize())]
    pub fn initialize(
      origin: OriginFor<T>,
      asset: AssetId,
      share_asset: AssetId,
      withdrawal_fee_bps: BasisPoints,
      entry_fee: Balance,
      primary_fee_recipient: T::AccountId,
      secondary_fee_recipient: T::AccountId,
    ) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      ensure!(!Settings::<T>::exists(), Error::<T>::AlreadyInitialized);
      ensure!(T::Assets::asset_exists(asset), Error::<T>::UnknownAsset);
      ensure!(
        !T::Assets::asset_exists(share_asset),
        Error::<T>::ShareAssetInUse
      );
      ensure!(
        shares::is_valid_fee(withdrawal_fee_bps),
        Error::<T>::ParameterOutOfBounds
      );
      ensure!(
        !is_null_account(&primary_fee_recipient) && !is_null_account(&secondary_fee_recipient),
        Error::<T>::InvalidAddress
      );

      let account = Self::account_id();
      T::Assets::create(share_asset, account.clone(), true, 1)?;
      frame_system::Pallet::<T>::inc_providers(&account);

      Settings::<T>::put(AggregatorSettings {
        asset,
        share_asset,
        withdrawal_fee_bps,
        entry_fee,
        primary_fee_recipient,
        secondary_fee_recipient,
      });

      log::info!(target: LOG_TARGET, "aggregator initialized over asset {asset}");
      Self::deposit_event(Event::Initialized { asset, share_asset });
      Ok(())
    }

    /// Deposit `assets` under `position_id`, or under a fresh position when it is `0`.
    #[pallet::call_index(1)]
    #[pallet::weight(T::WeightInfo::deposit(T::MaxChildVaults::get()))]
    pub fn deposit(origin: OriginFor<T>, position_id: PositionId, assets: Balance) -> DispatchResult {
      let who = ensure_signed(origin)?;
      Self::do_deposit(&who, position_id, assets).map(|_| ())
    }

    /// Mint exactly `shares` under `position_id`, or under a fresh position when it is `0`.
    #[pallet::call_index(2)]
    #[pallet::weight(T::WeightInfo::mint(T::MaxChildVaults::get()))]
    pub fn mint(origin: OriginFor<T>, position_id: PositionId, shares: Balance) -> DispatchResult {
      let who = ensure_signed(origin)?;
      Self::do_mint(&who, position_id, shares).map(|_| ())
    }

    /// Pay `assets` to `receiver`, burning the position holder's shares.
    #[pallet::call_index(3)]
    #[pallet::weight(T::WeightInfo::withdraw(T::MaxChildVaults::get()))]
    pub fn withdraw(
      origin: OriginFor<T>,
      position_id: PositionId,
      assets: Balance,
      receiver: T::AccountId,
    ) -> DispatchResult {
      let who = ensure_signed(origin)?;
      Self::do_withdraw(&who, position_id, assets, &receiver).map(|_| ())
    }

    #[pallet::call_index(4)]
    #[pallet::weight(T::WeightInfo::redeem(T::MaxChildVaults::get()))]
    pub fn redeem(
      origin: OriginFor<T>,
      position_id: PositionId,
      shares: Balance,
      receiver: T::AccountId,
    ) -> DispatchResult {
      let who = ensure_signed(origin)?;
      Self::do_redeem(&who, position_id, shares, &receiver).map(|_| ())
    }

    /// Deposit `assets` of idle funds into `vault_id`, receiving at least `min_shares_out`.
    #[pallet::call_index(5)]
    #[pallet::weight(T::WeightInfo::allocate())]
    pub fn allocate(
      origin: OriginFor<T>,
      vault_id: VaultId,
      assets: Balance,
      min_shares_out: Balance,
    ) -> DispatchResult {
      T::StrategistOrigin::ensure_origin(origin)?;
      Self::ensure_approved(vault_id)?;
      let account = Self::account_id();
      let shares = T::Vaults::deposit(vault_id, &account, assets, &account)?;
      ensure!(shares >= min_shares_out, Error::<T>::SlippageTooHigh);
      Self::deposit_event(Event::Allocated {
        vault_id,
        assets,
        shares,
      });
      Ok(())
    }

    /// Mint exactly `shares` of `vault_id`, paying at most `max_assets_in`.
    #[pallet::call_index(6)]
    #[pallet::weight(T::WeightInfo::allocate_shares())]
    pub fn allocate_shares(
      origin: OriginFor<T>,
      vault_id: VaultId,
      shares: Balance,
      max_assets_in: Balance,
    ) -> DispatchResult {
      T::StrategistOrigin::ensure_origin(origin)?;
      Self::ensure_approved(vault_id)?;
      let account = Self::account_id();
      let assets = T::Vaults::mint(vault_id, &account, shares, &account)?;
      ensure!(assets <= max_assets_in, Error::<T>::SlippageTooHigh);
      Self::deposit_event(Event::Allocated {
        vault_id,
        assets,
        shares,
      });
      Ok(())
    }

    /// Withdraw `assets` net from `vault_id`, burning at most `max_shares_in`.
    #[pallet::call_index(7)]
    #[pallet::weight(T::WeightInfo::deallocate())]
    pub fn deallocate(
      origin: OriginFor<T>,
      vault_id: VaultId,
      assets: Balance,
      max_shares_in: Balance,
    ) -> DispatchResult {
      T::StrategistOrigin::ensure_origin(origin)?;
      Self::ensure_approved(vault_id)?;
      let account = Self::account_id();
      let shares = T::Vaults::withdraw(vault_id, &account, assets, &account, &account)?;
      ensure!(shares <= max_shares_in, Error::<T>::SlippageTooHigh);
      Self::deposit_event(Event::Deallocated {
        vault_id,
        assets,
        shares,
      });
      Ok(())
    }

    /// Redeem `shares` of `vault_id`, receiving at least `min_assets_out` net.
    #[pallet::call_index(8)]
    #[pallet::weight(T::WeightInfo::deallocate_shares())]
    pub fn deallocate_shares(
      origin: OriginFor<T>,
      vault_id: VaultId,
      shares: Balance,
      min_assets_out: Balance,
    ) -> DispatchResult {
      T::StrategistOrigin::ensure_origin(origin)?;
      Self::ensure_approved(vault_id)?;
      let account = Self::account_id();
      let assets = T::Vaults::redeem(vault_id, &account, shares, &account, &account)?;
      ensure!(assets >= min_assets_out, Error::<T>::SlippageTooHigh);
      Self::deposit_event(Event::Deallocated {
        vault_id,
        assets,
        shares,
      });
      Ok(())
    }

    #[pallet::call_index(9)]
    #[pallet::weight(T::WeightInfo::approve_vault())]
    pub fn approve_vault(origin: OriginFor<T>, vault_id: VaultId) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      let settings = Self::current_settings()?;
      let asset = T::Vaults::asset(vault_id).ok_or(Error::<T>::UnknownVault)?;
      ensure!(asset == settings.asset, Error::<T>::AssetMismatch);
      ApprovedVaults::<T>::try_mutate(|vaults| {
        ensure!(
          !vaults.contains(&vault_id),
          Error::<T>::VaultAlreadyApproved
        );
        vaults
          .try_push(vault_id)
          .map_err(|_| Error::<T>::TooManyVaults)
      })?;
      log::info!(target: LOG_TARGET, "child vault {vault_id} approved");
      Self::deposit_event(Event::VaultApproved { vault_id });
      Ok(())
    }

    /// Revoke `vault_id`. The pool must hold none of its shares.
    #[pallet::call_index(10)]
    #[pallet::weight(T::WeightInfo::remove_vault())]
    pub fn remove_vault(origin: OriginFor<T>, vault_id: VaultId) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      ensure!(
        T::Vaults::share_balance(vault_id, &Self::account_id()) == 0,
        Error::<T>::VaultNotEmpty
      );
      ApprovedVaults::<T>::try_mutate(|vaults| {
        let index = vaults
          .iter()
          .position(|v| *v == vault_id)
          .ok_or(Error::<T>::VaultNotApproved)?;
        vaults.remove(index);
        Ok::<_, DispatchError>(())
      })?;
      log::info!(target: LOG_TARGET, "child vault {vault_id} removed");
      Self::deposit_event(Event::VaultRemoved { vault_id });
      Ok(())
    }

    #[pallet::call_index(11)]
    #[pallet::weight(T::WeightInfo::set_withdrawal_fee())]
    pub fn set_withdrawal_fee(origin: OriginFor<T>, fee_bps: BasisPoints) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      ensure!(
        shares::is_valid_fee(fee_bps),
        Error::<T>::ParameterOutOfBounds
      );
      let old_fee_bps = Self::update_settings(|settings| {
        core::mem::replace(&mut settings.withdrawal_fee_bps, fee_bps)
      })?;
      Self::deposit_event(Event::WithdrawalFeeUpdated {
        old_fee_bps,
        new_fee_bps: fee_bps,
      });
      Ok(())
    }

    #[pallet::call_index(12)]
    #[pallet::weight(T::WeightInfo::set_entry_fee())]
    pub fn set_entry_fee(origin: OriginFor<T>, entry_fee: Balance) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      let old_fee =
        Self::update_settings(|settings| core::mem::replace(&mut settings.entry_fee, entry_fee))?;
      Self::deposit_event(Event::EntryFeeUpdated {
        old_fee,
        new_fee: entry_fee,
      });
      Ok(())
    }

    #[pallet::call_index(13)]
    #[pallet::weight(T::WeightInfo::set_fee_recipients())]
    pub fn set_fee_recipients(
      origin: OriginFor<T>,
      primary: T::AccountId,
      secondary: T::AccountId,
    ) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      ensure!(
        !is_null_account(&primary) && !is_null_account(&secondary),
        Error::<T>::InvalidAddress
      );
      Self::update_settings(|settings| {
        settings.primary_fee_recipient = primary.clone();
        settings.secondary_fee_recipient = secondary.clone();
      })?;
      Self::deposit_event(Event::FeeRecipientsUpdated { primary, secondary });
      Ok(())
    }

    /// One-way switch that lifts the first withdrawal gate.
    #[pallet::call_index(14)]
    #[pallet::weight(T::WeightInfo::reveal())]
    pub fn reveal(origin: OriginFor<T>) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      ensure!(!IsRevealed::<T>::get(), Error::<T>::AlreadyRevealed);
      IsRevealed::<T>::put(true);
      Self::deposit_event(Event::Revealed);
      Ok(())
    }

    #[pallet::call_index(15)]
    #[pallet::weight(T::WeightInfo::set_withdrawable())]
    pub fn set_withdrawable(origin: OriginFor<T>, withdrawable: bool) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      IsWithdrawable::<T>::put(withdrawable);
      Self::deposit_event(Event::WithdrawableUpdated { withdrawable });
      Ok(())
    }

    #[pallet::call_index(16)]
    #[pallet::weight(T::WeightInfo::pause())]
    pub fn pause(origin: OriginFor<T>) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      ensure!(!IsPaused::<T>::get(), Error::<T>::AlreadyPaused);
      IsPaused::<T>::put(true);
      Self::deposit_event(Event::Paused);
      Ok(())
    }

    #[pallet::call_index(17)]
    #[pallet::weight(T::WeightInfo::unpause())]
    pub fn unpause(origin: OriginFor<T>) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      ensure!(IsPaused::<T>::get(), Error::<T>::NotPaused);
      IsPaused::<T>::kill();
      Self::deposit_event(Event::Unpaused);
      Ok(())
    }
  }

  impl<T: Config> Pallet<T> {
    /// Pool account holding idle funds and child vault shares
    pub fn account_id() -> T::AccountId {
      T::PalletId::get().into_account_truncating()
    }

    /// Idle balance plus the asset value of every child share held by the
    /// pool, less the accrued interest fee
    pub fn total_assets() -> Result<Balance, DispatchError> {
      Ok(Self::pool_totals(&Self::current_settings()?)?.total_assets)
    }

    /// Fee owed on the gain over principal, paid out by the next exit
    pub fn accrued_fee() -> Result<Balance, DispatchError> {
      Ok(Self::valuation(&Self::current_settings()?)?.1)
    }

    /// Shares held by the current holder of `position_id`
    pub fn position_shares(position_id: PositionId) -> Balance {
      match (Settings::<T>::get(), T::Positions::owner_of(position_id)) {
        (Some(settings), Some(owner)) => T::Assets::balance(settings.share_asset, &owner),
        _ => 0,
      }
    }

    pub fn convert_to_shares(assets: Balance) -> Result<Balance, DispatchError> {
      Ok(Self::pool_totals(&Self::current_settings()?)?.to_shares(assets)?)
    }

    pub fn convert_to_assets(shares: Balance) -> Result<Balance, DispatchError> {
      Ok(Self::pool_totals(&Self::current_settings()?)?.to_assets(shares)?)
    }

    pub fn preview_deposit(assets: Balance) -> Result<Balance, DispatchError> {
      Self::convert_to_shares(assets)
    }

    pub fn preview_mint(shares: Balance) -> Result<Balance, DispatchError> {
      Self::convert_to_assets(shares)
    }

    pub fn preview_withdraw(assets: Balance) -> Result<Balance, DispatchError> {
      Ok(Self::pool_totals(&Self::current_settings()?)?
        .to_shares_rounded(assets, T::WithdrawalRounding::get())?)
    }

    pub fn preview_redeem(shares: Balance) -> Result<Balance, DispatchError> {
      Self::convert_to_assets(shares)
    }

    pub fn max_deposit() -> Balance {
      if Settings::<T>::exists() && !IsPaused::<T>::get() {
        Balance::MAX
      } else {
        0
      }
    }

    pub fn max_mint() -> Balance {
      Self::max_deposit()
    }

    pub fn max_withdraw(who: &T::AccountId) -> Result<Balance, DispatchError> {
      let shares = Self::max_redeem(who);
      if shares == 0 {
        return Ok(0);
      }
      Self::preview_redeem(shares)
    }

    /// Zero while paused or while either withdrawal gate is closed
    pub fn max_redeem(who: &T::AccountId) -> Balance {
      let open = !IsPaused::<T>::get() && IsRevealed::<T>::get() && IsWithdrawable::<T>::get();
      match Settings::<T>::get() {
        Some(settings) if open => T::Assets::balance(settings.share_asset, who),
        _ => 0,
      }
    }

    pub fn do_deposit(
      who: &T::AccountId,
      position_id: PositionId,
      assets: Balance,
    ) -> Result<(PositionId, Balance), DispatchError> {
      let settings = Self::operational_settings()?;
      ensure!(assets > 0, Error::<T>::ParameterOutOfBounds);
      let shares = Self::pool_totals(&settings)?.to_shares(assets)?;
      ensure!(shares > 0, Error::<T>::ParameterOutOfBounds);
      let position_id = Self::enter_position(&settings, who, position_id)?;
      Self::settle_entry(&settings, who, position_id, assets, shares)?;
      Ok((position_id, shares))
    }

    pub fn do_mint(
      who: &T::AccountId,
      position_id: PositionId,
      shares: Balance,
    ) -> Result<(PositionId, Balance), DispatchError> {
      let settings = Self::operational_settings()?;
      ensure!(shares > 0, Error::<T>::ParameterOutOfBounds);
      let assets = Self::pool_totals(&settings)?.to_assets(shares)?;
      ensure!(assets > 0, Error::<T>::ParameterOutOfBounds);
      let position_id = Self::enter_position(&settings, who, position_id)?;
      Self::settle_entry(&settings, who, position_id, assets, shares)?;
      Ok((position_id, assets))
    }

    pub fn do_withdraw(
      who: &T::AccountId,
      position_id: PositionId,
      assets: Balance,
      receiver: &T::AccountId,
    ) -> Result<Balance, DispatchError> {
      let settings = Self::operational_settings()?;
      ensure!(assets > 0, Error::<T>::ParameterOutOfBounds);
      Self::ensure_exit_allowed(who, position_id, receiver)?;
      let (totals, fee) = Self::valuation(&settings)?;
      let shares = totals.to_shares_rounded(assets, T::WithdrawalRounding::get())?;
      ensure!(shares > 0, Error::<T>::ParameterOutOfBounds);
      Self::settle_exit(&settings, totals, fee, who, position_id, receiver, assets, shares)?;
      Ok(shares)
    }

    pub fn do_redeem(
      who: &T::AccountId,
      position_id: PositionId,
      shares: Balance,
      receiver: &T::AccountId,
    ) -> Result<Balance, DispatchError> {
      let settings = Self::operational_settings()?;
      ensure!(shares > 0, Error::<T>::ParameterOutOfBounds);
      Self::ensure_exit_allowed(who, position_id, receiver)?;
      let (totals, fee) = Self::valuation(&settings)?;
      let assets = totals.to_assets(shares)?;
      Self::settle_exit(&settings, totals, fee, who, position_id, receiver, assets, shares)?;
      Ok(assets)
    }

    fn current_settings() -> Result<AggregatorSettings<T::AccountId>, DispatchError> {
      Settings::<T>::get().ok_or_else(|| Error::<T>::NotInitialized.into())
    }

    fn operational_settings() -> Result<AggregatorSettings<T::AccountId>, DispatchError> {
      let settings = Self::current_settings()?;
      ensure!(!IsPaused::<T>::get(), Error::<T>::AggregatorPaused);
      Ok(settings)
    }

    fn update_settings<R>(
      f: impl FnOnce(&mut AggregatorSettings<T::AccountId>) -> R,
    ) -> Result<R, DispatchError> {
      Settings::<T>::try_mutate(|maybe_settings| {
        let settings = maybe_settings
          .as_mut()
          .ok_or(Error::<T>::NotInitialized)?;
        Ok(f(settings))
      })
    }

    fn ensure_approved(vault_id: VaultId) -> DispatchResult {
      ensure!(
        ApprovedVaults::<T>::get().contains(&vault_id),
        Error::<T>::VaultNotApproved
      );
      Ok(())
    }

    fn aggregate_assets(settings: &AggregatorSettings<T::AccountId>) -> Result<Balance, DispatchError> {
      let account = Self::account_id();
      let idle = T::Assets::balance(settings.asset, &account);
      ApprovedVaults::<T>::get()
        .iter()
        .try_fold(idle, |total, vault_id| -> Result<Balance, DispatchError> {
          let held = T::Vaults::share_balance(*vault_id, &account);
          if held == 0 {
            return Ok(total);
          }
          let value = T::Vaults::totals(*vault_id).to_assets(held)?;
          Ok(total.checked_add(value).ok_or(ArithmeticError::Overflow)?)
        })
    }

    /// Pool totals net of the accrued interest fee, and that fee
    fn valuation(
      settings: &AggregatorSettings<T::AccountId>,
    ) -> Result<(PoolTotals, Balance), DispatchError> {
      let gross = Self::aggregate_assets(settings)?;
      let fee = shares::interest_fee(gross, Principal::<T>::get(), settings.withdrawal_fee_bps)?;
      Ok((
        PoolTotals::new(gross.saturating_sub(fee), TotalSupply::<T>::get()),
        fee,
      ))
    }

    fn pool_totals(settings: &AggregatorSettings<T::AccountId>) -> Result<PoolTotals, DispatchError> {
      Ok(Self::valuation(settings)?.0)
    }

    /// Resolve the position an entry is credited to, issuing a new one for
    /// [`NEW_POSITION`] and charging the entry fee on top.
    fn enter_position(
      settings: &AggregatorSettings<T::AccountId>,
      who: &T::AccountId,
      position_id: PositionId,
    ) -> Result<PositionId, DispatchError> {
      if position_id != NEW_POSITION {
        ensure!(
          T::Positions::owner_of(position_id).as_ref() == Some(who),
          Error::<T>::InvalidTokenId
        );
        return Ok(position_id);
      }

      ensure!(
        T::Positions::position_of(who).is_none(),
        Error::<T>::MoreThanOne
      );
      ensure!(
        T::Positions::issued() < T::MaxPositions::get(),
        Error::<T>::OutOfSupply
      );
      let position_id = T::Positions::issue(who)?;
      let split = Self::distribute_fee(settings, who, settings.entry_fee)?;

      log::debug!(target: LOG_TARGET, "position {position_id} issued");
      Self::deposit_event(Event::PositionCreated {
        position_id,
        owner: who.clone(),
        entry_fee: split.total(),
      });
      Self::note_fees(settings, split);
      Ok(position_id)
    }

    fn ensure_exit_allowed(
      who: &T::AccountId,
      position_id: PositionId,
      receiver: &T::AccountId,
    ) -> DispatchResult {
      ensure!(
        position_id != NEW_POSITION,
        Error::<T>::ParameterOutOfBounds
      );
      ensure!(!is_null_account(receiver), Error::<T>::InvalidAddress);
      ensure!(IsRevealed::<T>::get(), Error::<T>::WithdrawBeforeReveal);
      ensure!(IsWithdrawable::<T>::get(), Error::<T>::WithdrawDisabled);
      ensure!(
        T::Positions::owner_of(position_id).as_ref() == Some(who),
        Error::<T>::InvalidTokenId
      );
      Ok(())
    }

    fn settle_entry(
      settings: &AggregatorSettings<T::AccountId>,
      who: &T::AccountId,
      position_id: PositionId,
      assets: Balance,
      shares: Balance,
    ) -> DispatchResult {
      T::Assets::transfer(
        settings.asset,
        who,
        &Self::account_id(),
        assets,
        Preservation::Expendable,
      )?;
      T::Assets::mint_into(settings.share_asset, who, shares)?;
      TotalSupply::<T>::try_mutate(|supply| {
        *supply = supply.checked_add(shares).ok_or(ArithmeticError::Overflow)?;
        Ok::<_, DispatchError>(())
      })?;
      Principal::<T>::try_mutate(|principal| {
        *principal = principal.checked_add(assets).ok_or(ArithmeticError::Overflow)?;
        Ok::<_, DispatchError>(())
      })?;

      log::debug!(target: LOG_TARGET, "position {position_id}: {assets} assets in, {shares} shares out");
      Self::deposit_event(Event::Deposited {
        position_id,
        who: who.clone(),
        assets,
        shares,
      });
      Ok(())
    }

    /// Burn `shares`, pay `assets` to `receiver` and the accrued `fee` to the
    /// fee recipients. What is left of the pool becomes the new principal.
    fn settle_exit(
      settings: &AggregatorSettings<T::AccountId>,
      totals: PoolTotals,
      fee: Balance,
      who: &T::AccountId,
      position_id: PositionId,
      receiver: &T::AccountId,
      assets: Balance,
      shares: Balance,
    ) -> DispatchResult {
      ensure!(
        T::Assets::balance(settings.share_asset, who) >= shares,
        Error::<T>::InsufficientShareBalance
      );
      let account = Self::account_id();
      Self::source_liquidity(settings, &account, assets.saturating_add(fee))?;

      T::Assets::burn_from(
        settings.share_asset,
        who,
        shares,
        Preservation::Expendable,
        Precision::Exact,
        Fortitude::Polite,
      )?;
      TotalSupply::<T>::try_mutate(|supply| {
        *supply = supply.checked_sub(shares).ok_or(ArithmeticError::Underflow)?;
        Ok::<_, DispatchError>(())
      })?;
      Self::pay(settings.asset, &account, receiver, assets)?;
      let split = Self::distribute_fee(settings, &account, fee)?;
      // Fee the recipients cannot receive stays with the depositors
      let retained = fee.saturating_sub(split.total());
      Principal::<T>::put(
        totals
          .total_assets
          .saturating_sub(assets)
          .saturating_add(retained),
      );

      log::debug!(
        target: LOG_TARGET,
        "position {position_id}: {shares} shares burned, {assets} assets out, fee {fee}"
      );
      Self::deposit_event(Event::Withdrawn {
        position_id,
        who: who.clone(),
        receiver: receiver.clone(),
        assets,
        shares,
      });
      Self::note_fees(settings, split);
      Ok(())
    }

    /// Top the idle balance up to `required` by withdrawing from children in
    /// approval order, each up to what it will release.
    fn source_liquidity(
      settings: &AggregatorSettings<T::AccountId>,
      account: &T::AccountId,
      required: Balance,
    ) -> DispatchResult {
      let idle = T::Assets::balance(settings.asset, account);
      let mut shortfall = required.saturating_sub(idle);
      for vault_id in ApprovedVaults::<T>::get() {
        if shortfall == 0 {
          break;
        }
        let take = shortfall.min(T::Vaults::max_withdraw(vault_id, account)?);
        if take == 0 {
          continue;
        }
        T::Vaults::withdraw(vault_id, account, take, account, account)?;
        shortfall -= take;
        log::trace!(target: LOG_TARGET, "sourced {take} from child vault {vault_id}");
        Self::deposit_event(Event::LiquiditySourced {
          vault_id,
          assets: take,
        });
      }
      ensure!(shortfall == 0, Error::<T>::InsufficientLiquidity);
      Ok(())
    }

    /// Pay `fee` from `from` to the fee recipients, rerouting or keeping back
    /// halves their accounts cannot receive. Returns what was paid.
    fn distribute_fee(
      settings: &AggregatorSettings<T::AccountId>,
      from: &T::AccountId,
      fee: Balance,
    ) -> Result<FeeSplit, DispatchError> {
      let split = route_fee(
        fee,
        |amount| Self::can_receive(settings.asset, &settings.primary_fee_recipient, amount),
        |amount| Self::can_receive(settings.asset, &settings.secondary_fee_recipient, amount),
      );
      Self::pay(
        settings.asset,
        from,
        &settings.primary_fee_recipient,
        split.primary,
      )?;
      Self::pay(
        settings.asset,
        from,
        &settings.secondary_fee_recipient,
        split.secondary,
      )?;
      Ok(split)
    }

    fn can_receive(asset: AssetId, who: &T::AccountId, amount: Balance) -> bool {
      T::Assets::can_deposit(asset, who, amount, Provenance::Extant)
        .into_result()
        .is_ok()
    }

    fn note_fees(settings: &AggregatorSettings<T::AccountId>, split: FeeSplit) {
      if !split.is_zero() {
        Self::deposit_event(Event::FeesDistributed {
          primary: settings.primary_fee_recipient.clone(),
          secondary: settings.secondary_fee_recipient.clone(),
          split,
        });
      }
    }

    fn pay(
      asset: AssetId,
      from: &T::AccountId,
      to: &T::AccountId,
      amount: Balance,
    ) -> DispatchResult {
      if amount > 0 {
        T::Assets::transfer(asset, from, to, amount, Preservation::Expendable)?;
      }
      Ok(())
    }
  }
}
