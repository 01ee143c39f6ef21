//! Share Vault Pallet
//!
//! Single-asset pooled vaults. Depositors receive a vault-specific share token in
//! proportion to the assets they bring; withdrawals burn shares marked up by a
//! basis-point fee, and the fee is skimmed from the pool to two fee recipients.
//!
//! Any number of vaults can live side by side, each keyed by a [`VaultId`] and
//! owning a derived sovereign account that holds its underlying balance.

#![cfg_attr(not(feature = "std"), no_std)]

pub use pallet::*;

pub mod adapters;
pub use adapters::ShareVault;

#[cfg(test)]
mod mock;

#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

pub mod weights;
pub use weights::WeightInfo;

use codec::Decode;
use frame::deps::sp_runtime::traits::TrailingZeroInput;
use primitives::VaultId;

pub const LOG_TARGET: &str = "runtime::share-vault";

/// Helper for benchmarking
#[cfg(feature = "runtime-benchmarks")]
pub trait BenchmarkHelper<AccountId> {
  /// Allow `who` to deposit into `vault`.
  fn whitelist(vault: VaultId, who: &AccountId);
}

/// Returns `true` if `who` decodes from all-zero bytes, i.e. it is the null account.
pub fn is_null_account<AccountId: Decode + PartialEq>(who: &AccountId) -> bool {
  AccountId::decode(&mut TrailingZeroInput::zeroes()).is_ok_and(|null| &null == who)
}

#[frame::pallet]
pub mod pallet {
  use super::{LOG_TARGET, WeightInfo, is_null_account};
  use frame::deps::{
    frame_support::{
      PalletId,
      traits::{
        ContainsPair,
        fungibles::{Create, Inspect, Mutate, approvals::Mutate as ApprovalMutate},
        tokens::{Fortitude, Precision, Preservation, Provenance},
      },
    },
    sp_runtime::{ArithmeticError, DispatchError, Rounding, traits::AccountIdConversion},
  };
  use frame::prelude::*;
  use primitives::{
    AssetId, Balance, BasisPoints, FeeSplit, PoolTotals, VaultId, route_fee, shares,
  };

  #[pallet::config]
  pub trait Config: frame_system::Config<RuntimeEvent: From<Event<Self>>> {
    /// Fungible ledger holding both the underlying assets and the share tokens
    type Assets: Inspect<Self::AccountId, AssetId = AssetId, Balance = Balance>
      + Mutate<Self::AccountId>
      + Create<Self::AccountId>
      + ApprovalMutate<Self::AccountId>;

    /// Origin that creates vaults and manages their configuration
    type AdminOrigin: EnsureOrigin<Self::RuntimeOrigin>;

    /// Depositor authorization, queried as `(vault, depositor)`
    type Whitelist: ContainsPair<VaultId, Self::AccountId>;

    /// Pallet ID; every vault account is a sub-account of it
    #[pallet::constant]
    type PalletId: Get<PalletId>;

    /// Rounding used when marking withdrawal shares up by the fee
    type WithdrawalRounding: Get<Rounding>;

    /// Weight information for extrinsics
    type WeightInfo: WeightInfo;

    /// Helper for benchmarking
    #[cfg(feature = "runtime-benchmarks")]
    type BenchmarkHelper: crate::BenchmarkHelper<Self::AccountId>;
  }

  #[pallet::pallet]
  pub struct Pallet<T>(_);

  /// Configuration snapshot of a vault. Replaced as a whole by privileged calls
  /// and read once at the start of every operation.
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
  pub struct VaultConfig<AccountId> {
    /// Underlying asset pooled by the vault
    pub asset: AssetId,
    /// Share token issued against deposits
    pub share_asset: AssetId,
    /// Withdrawal fee in basis points, `0..=10_000`
    pub withdrawal_fee_bps: BasisPoints,
    /// Receives the floor half of every fee
    pub primary_fee_recipient: AccountId,
    /// Receives the remainder of every fee
    pub secondary_fee_recipient: AccountId,
  }

  #[pallet::storage]
  #[pallet::getter(fn vaults)]
  pub type Vaults<T: Config> = StorageMap<_, Blake2_128Concat, VaultId, VaultConfig<T::AccountId>>;

  /// Accounting totals per vault
  #[pallet::storage]
  #[pallet::getter(fn totals)]
  pub type Totals<T: Config> = StorageMap<_, Blake2_128Concat, VaultId, PoolTotals, ValueQuery>;

  #[pallet::storage]
  #[pallet::getter(fn is_paused)]
  pub type PausedVaults<T: Config> = StorageMap<_, Blake2_128Concat, VaultId, bool, ValueQuery>;

  #[pallet::storage]
  pub type NextVaultId<T: Config> = StorageValue<_, VaultId, ValueQuery>;

  #[pallet::event]
  #[pallet::generate_deposit(pub(super) fn deposit_event)]
  pub enum Event<T: Config> {
    /// A vault was created together with its share token
    VaultCreated {
      vault_id: VaultId,
      asset: AssetId,
      share_asset: AssetId,
      withdrawal_fee_bps: BasisPoints,
    },
    /// Assets entered a vault
    Deposited {
      vault_id: VaultId,
      caller: T::AccountId,
      receiver: T::AccountId,
      assets: Balance,
      shares: Balance,
    },
    /// Assets left a vault; `assets` is the net amount paid to `receiver`
    Withdrawn {
      vault_id: VaultId,
      caller: T::AccountId,
      receiver: T::AccountId,
      owner: T::AccountId,
      assets: Balance,
      shares: Balance,
    },
    /// A withdrawal fee was paid out to the fee recipients
    FeesDistributed {
      vault_id: VaultId,
      primary: T::AccountId,
      secondary: T::AccountId,
      split: FeeSplit,
    },
    WithdrawalFeeUpdated {
      vault_id: VaultId,
      old_fee_bps: BasisPoints,
      new_fee_bps: BasisPoints,
    },
    FeeRecipientsUpdated {
      vault_id: VaultId,
      primary: T::AccountId,
      secondary: T::AccountId,
    },
    /// Total assets were overridden to account for externally accrued yield
    TotalAssetsUpdated {
      vault_id: VaultId,
      old_total: Balance,
      new_total: Balance,
    },
    Paused { vault_id: VaultId },
    Unpaused { vault_id: VaultId },
  }

  #[pallet::error]
  pub enum Error<T> {
    /// No vault exists under this id
    VaultNotFound,
    /// A required account is the null account
    InvalidAddress,
    /// An amount is zero where a positive value is required, or a rate exceeds 100%
    ParameterOutOfBounds,
    /// The caller may not deposit into this vault
    NotWhitelisted,
    /// The vault is paused
    VaultPaused,
    /// The owner holds fewer shares than the operation burns
    InsufficientShareBalance,
    /// The underlying asset does not exist
    UnknownAsset,
    /// The share token id is already taken
    ShareAssetInUse,
    AlreadyPaused,
    NotPaused,
  }

  #[pallet::call]
  impl<T: Config> Pallet<T> {
    /// Create a vault over `asset`, issuing shares as the new token `share_asset`.
    #[pallet::call_index(0)]
    #[pallet::weight(T::WeightInfo::create_vault())]
    pub fn create_vault(
      origin: OriginFor<T>,
      asset: AssetId,
      share_asset: AssetId,
      withdrawal_fee_bps: BasisPoints,
      primary_fee_recipient: T::AccountId,
      secondary_fee_recipient: T::AccountId,
    ) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
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

      let vault_id = NextVaultId::<T>::get();
      let account = Self::vault_account(vault_id);
      T::Assets::create(share_asset, account.clone(), true, 1)?;
      // Vault account survives a zero native balance via provider reference
      frame_system::Pallet::<T>::inc_providers(&account);

      Vaults::<T>::insert(
        vault_id,
        VaultConfig {
          asset,
          share_asset,
          withdrawal_fee_bps,
          primary_fee_recipient,
          secondary_fee_recipient,
        },
      );
      NextVaultId::<T>::put(vault_id.checked_add(1).ok_or(ArithmeticError::Overflow)?);

      log::info!(target: LOG_TARGET, "vault {vault_id} created over asset {asset}");
      Self::deposit_event(Event::VaultCreated {
        vault_id,
        asset,
        share_asset,
        withdrawal_fee_bps,
      });
      Ok(())
    }

    /// Deposit `assets` and credit the resulting shares to `receiver`.
    #[pallet::call_index(1)]
    #[pallet::weight(T::WeightInfo::deposit())]
    pub fn deposit(
      origin: OriginFor<T>,
      vault_id: VaultId,
      assets: Balance,
      receiver: T::AccountId,
    ) -> DispatchResult {
      let who = ensure_signed(origin)?;
      Self::do_deposit(vault_id, &who, assets, &receiver).map(|_| ())
    }

    /// Mint exactly `shares` to `receiver`, paying their asset value.
    #[pallet::call_index(2)]
    #[pallet::weight(T::WeightInfo::mint())]
    pub fn mint(
      origin: OriginFor<T>,
      vault_id: VaultId,
      shares: Balance,
      receiver: T::AccountId,
    ) -> DispatchResult {
      let who = ensure_signed(origin)?;
      Self::do_mint(vault_id, &who, shares, &receiver).map(|_| ())
    }

    /// Pay `assets` net of fee to `receiver`, burning the gross shares from `owner`.
    ///
    /// A caller other than `owner` spends its share allowance from `owner`.
    #[pallet::call_index(3)]
    #[pallet::weight(T::WeightInfo::withdraw())]
    pub fn withdraw(
      origin: OriginFor<T>,
      vault_id: VaultId,
      assets: Balance,
      receiver: T::AccountId,
      owner: T::AccountId,
    ) -> DispatchResult {
      let who = ensure_signed(origin)?;
      Self::do_withdraw(vault_id, &who, assets, &receiver, &owner).map(|_| ())
    }

    /// Burn `shares` from `owner` and pay their value net of fee to `receiver`.
    #[pallet::call_index(4)]
    #[pallet::weight(T::WeightInfo::redeem())]
    pub fn redeem(
      origin: OriginFor<T>,
      vault_id: VaultId,
      shares: Balance,
      receiver: T::AccountId,
      owner: T::AccountId,
    ) -> DispatchResult {
      let who = ensure_signed(origin)?;
      Self::do_redeem(vault_id, &who, shares, &receiver, &owner).map(|_| ())
    }

    #[pallet::call_index(5)]
    #[pallet::weight(T::WeightInfo::set_withdrawal_fee())]
    pub fn set_withdrawal_fee(
      origin: OriginFor<T>,
      vault_id: VaultId,
      fee_bps: BasisPoints,
    ) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      ensure!(
        shares::is_valid_fee(fee_bps),
        Error::<T>::ParameterOutOfBounds
      );
      let old_fee_bps = Vaults::<T>::try_mutate(vault_id, |maybe_config| {
        let config = maybe_config.as_mut().ok_or(Error::<T>::VaultNotFound)?;
        Ok::<_, DispatchError>(core::mem::replace(&mut config.withdrawal_fee_bps, fee_bps))
      })?;
      log::info!(target: LOG_TARGET, "vault {vault_id} fee {old_fee_bps} -> {fee_bps} bps");
      Self::deposit_event(Event::WithdrawalFeeUpdated {
        vault_id,
        old_fee_bps,
        new_fee_bps: fee_bps,
      });
      Ok(())
    }

    #[pallet::call_index(6)]
    #[pallet::weight(T::WeightInfo::set_fee_recipients())]
    pub fn set_fee_recipients(
      origin: OriginFor<T>,
      vault_id: VaultId,
      primary: T::AccountId,
      secondary: T::AccountId,
    ) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      ensure!(
        !is_null_account(&primary) && !is_null_account(&secondary),
        Error::<T>::InvalidAddress
      );
      Vaults::<T>::try_mutate(vault_id, |maybe_config| {
        let config = maybe_config.as_mut().ok_or(Error::<T>::VaultNotFound)?;
        config.primary_fee_recipient = primary.clone();
        config.secondary_fee_recipient = secondary.clone();
        Ok::<_, DispatchError>(())
      })?;
      Self::deposit_event(Event::FeeRecipientsUpdated {
        vault_id,
        primary,
        secondary,
      });
      Ok(())
    }

    /// Override the vault's total assets, e.g. to recognise yield accrued elsewhere.
    ///
    /// The value is not reconciled with the vault account's balance.
    #[pallet::call_index(7)]
    #[pallet::weight(T::WeightInfo::set_total_assets())]
    pub fn set_total_assets(
      origin: OriginFor<T>,
      vault_id: VaultId,
      total_assets: Balance,
    ) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      ensure!(
        Vaults::<T>::contains_key(vault_id),
        Error::<T>::VaultNotFound
      );
      let old_total = Totals::<T>::mutate(vault_id, |totals| {
        core::mem::replace(&mut totals.total_assets, total_assets)
      });
      log::info!(target: LOG_TARGET, "vault {vault_id} total assets {old_total} -> {total_assets}");
      Self::deposit_event(Event::TotalAssetsUpdated {
        vault_id,
        old_total,
        new_total: total_assets,
      });
      Ok(())
    }

    #[pallet::call_index(8)]
    #[pallet::weight(T::WeightInfo::pause())]
    pub fn pause(origin: OriginFor<T>, vault_id: VaultId) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      ensure!(
        Vaults::<T>::contains_key(vault_id),
        Error::<T>::VaultNotFound
      );
      ensure!(
        !PausedVaults::<T>::get(vault_id),
        Error::<T>::AlreadyPaused
      );
      PausedVaults::<T>::insert(vault_id, true);
      Self::deposit_event(Event::Paused { vault_id });
      Ok(())
    }

    #[pallet::call_index(9)]
    #[pallet::weight(T::WeightInfo::unpause())]
    pub fn unpause(origin: OriginFor<T>, vault_id: VaultId) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      ensure!(
        Vaults::<T>::contains_key(vault_id),
        Error::<T>::VaultNotFound
      );
      ensure!(PausedVaults::<T>::get(vault_id), Error::<T>::NotPaused);
      PausedVaults::<T>::remove(vault_id);
      Self::deposit_event(Event::Unpaused { vault_id });
      Ok(())
    }
  }

  impl<T: Config> Pallet<T> {
    /// Sovereign account holding the underlying balance of `vault_id`
    pub fn vault_account(vault_id: VaultId) -> T::AccountId {
      T::PalletId::get().into_sub_account_truncating(vault_id)
    }

    pub fn share_balance(vault_id: VaultId, who: &T::AccountId) -> Balance {
      Vaults::<T>::get(vault_id)
        .map(|config| T::Assets::balance(config.share_asset, who))
        .unwrap_or_default()
    }

    pub fn total_assets(vault_id: VaultId) -> Balance {
      Totals::<T>::get(vault_id).total_assets
    }

    pub fn total_supply(vault_id: VaultId) -> Balance {
      Totals::<T>::get(vault_id).total_supply
    }

    pub fn convert_to_shares(vault_id: VaultId, assets: Balance) -> Result<Balance, DispatchError> {
      Ok(Totals::<T>::get(vault_id).to_shares(assets)?)
    }

    pub fn convert_to_assets(vault_id: VaultId, shares: Balance) -> Result<Balance, DispatchError> {
      Ok(Totals::<T>::get(vault_id).to_assets(shares)?)
    }

    pub fn preview_deposit(vault_id: VaultId, assets: Balance) -> Result<Balance, DispatchError> {
      Self::convert_to_shares(vault_id, assets)
    }

    pub fn preview_mint(vault_id: VaultId, shares: Balance) -> Result<Balance, DispatchError> {
      Self::convert_to_assets(vault_id, shares)
    }

    /// Gross shares burned to net `assets` after the withdrawal fee
    pub fn preview_withdraw(vault_id: VaultId, assets: Balance) -> Result<Balance, DispatchError> {
      let config = Self::config(vault_id)?;
      Ok(Totals::<T>::get(vault_id).shares_for_net_withdrawal(
        assets,
        config.withdrawal_fee_bps,
        T::WithdrawalRounding::get(),
      )?)
    }

    /// Net assets paid for burning `shares`
    pub fn preview_redeem(vault_id: VaultId, shares: Balance) -> Result<Balance, DispatchError> {
      let config = Self::config(vault_id)?;
      Ok(Totals::<T>::get(vault_id).assets_for_gross_redeem(shares, config.withdrawal_fee_bps)?)
    }

    pub fn max_deposit(vault_id: VaultId) -> Balance {
      if Self::accepts_operations(vault_id) {
        Balance::MAX
      } else {
        0
      }
    }

    pub fn max_mint(vault_id: VaultId) -> Balance {
      Self::max_deposit(vault_id)
    }

    /// Net assets `who` can take out by redeeming every share it holds
    pub fn max_withdraw(vault_id: VaultId, who: &T::AccountId) -> Result<Balance, DispatchError> {
      let balance = Self::redeemable_balance(vault_id, who);
      if balance == 0 {
        return Ok(0);
      }
      Self::preview_redeem(vault_id, balance)
    }

    /// Share balance of `who` reduced by the withdrawal fee rate
    pub fn max_redeem(vault_id: VaultId, who: &T::AccountId) -> Result<Balance, DispatchError> {
      let balance = Self::redeemable_balance(vault_id, who);
      if balance == 0 {
        return Ok(0);
      }
      let config = Self::config(vault_id)?;
      Ok(shares::net_of_fee(balance, config.withdrawal_fee_bps)?)
    }

    pub fn do_deposit(
      vault_id: VaultId,
      who: &T::AccountId,
      assets: Balance,
      receiver: &T::AccountId,
    ) -> Result<Balance, DispatchError> {
      let config = Self::operational_config(vault_id)?;
      ensure!(assets > 0, Error::<T>::ParameterOutOfBounds);
      ensure!(
        T::Whitelist::contains(&vault_id, who),
        Error::<T>::NotWhitelisted
      );
      let totals = Totals::<T>::get(vault_id);
      let shares = totals.to_shares(assets)?;
      ensure!(shares > 0, Error::<T>::ParameterOutOfBounds);
      Self::settle_entry(vault_id, &config, totals, who, receiver, assets, shares)?;
      Ok(shares)
    }

    pub fn do_mint(
      vault_id: VaultId,
      who: &T::AccountId,
      shares: Balance,
      receiver: &T::AccountId,
    ) -> Result<Balance, DispatchError> {
      let config = Self::operational_config(vault_id)?;
      ensure!(shares > 0, Error::<T>::ParameterOutOfBounds);
      ensure!(
        T::Whitelist::contains(&vault_id, who),
        Error::<T>::NotWhitelisted
      );
      let totals = Totals::<T>::get(vault_id);
      let assets = totals.to_assets(shares)?;
      ensure!(assets > 0, Error::<T>::ParameterOutOfBounds);
      Self::settle_entry(vault_id, &config, totals, who, receiver, assets, shares)?;
      Ok(assets)
    }

    pub fn do_withdraw(
      vault_id: VaultId,
      who: &T::AccountId,
      assets: Balance,
      receiver: &T::AccountId,
      owner: &T::AccountId,
    ) -> Result<Balance, DispatchError> {
      let config = Self::operational_config(vault_id)?;
      ensure!(assets > 0, Error::<T>::ParameterOutOfBounds);
      ensure!(!is_null_account(receiver), Error::<T>::InvalidAddress);
      let totals = Totals::<T>::get(vault_id);
      let shares = totals.shares_for_net_withdrawal(
        assets,
        config.withdrawal_fee_bps,
        T::WithdrawalRounding::get(),
      )?;
      ensure!(shares > 0, Error::<T>::ParameterOutOfBounds);
      Self::settle_exit(
        vault_id, &config, totals, who, receiver, owner, assets, shares,
      )?;
      Ok(shares)
    }

    pub fn do_redeem(
      vault_id: VaultId,
      who: &T::AccountId,
      shares: Balance,
      receiver: &T::AccountId,
      owner: &T::AccountId,
    ) -> Result<Balance, DispatchError> {
      let config = Self::operational_config(vault_id)?;
      ensure!(shares > 0, Error::<T>::ParameterOutOfBounds);
      ensure!(!is_null_account(receiver), Error::<T>::InvalidAddress);
      let totals = Totals::<T>::get(vault_id);
      let assets = totals.assets_for_gross_redeem(shares, config.withdrawal_fee_bps)?;
      Self::settle_exit(
        vault_id, &config, totals, who, receiver, owner, assets, shares,
      )?;
      Ok(assets)
    }

    /// Pay `fee` out of `from` to the two recipients. Zero legs are skipped.
    ///
    /// A half the recipient's account cannot receive goes to the other
    /// recipient; a fee neither can receive stays with `from`. Returns what
    /// was actually paid.
    pub fn distribute_fee(
      asset: AssetId,
      from: &T::AccountId,
      primary: &T::AccountId,
      secondary: &T::AccountId,
      fee: Balance,
    ) -> Result<FeeSplit, DispatchError> {
      let split = route_fee(
        fee,
        |amount| Self::can_receive(asset, primary, amount),
        |amount| Self::can_receive(asset, secondary, amount),
      );
      Self::pay(asset, from, primary, split.primary)?;
      Self::pay(asset, from, secondary, split.secondary)?;
      Ok(split)
    }

    fn can_receive(asset: AssetId, who: &T::AccountId, amount: Balance) -> bool {
      T::Assets::can_deposit(asset, who, amount, Provenance::Extant)
        .into_result()
        .is_ok()
    }

    fn config(vault_id: VaultId) -> Result<VaultConfig<T::AccountId>, DispatchError> {
      Vaults::<T>::get(vault_id).ok_or_else(|| Error::<T>::VaultNotFound.into())
    }

    fn operational_config(vault_id: VaultId) -> Result<VaultConfig<T::AccountId>, DispatchError> {
      let config = Self::config(vault_id)?;
      ensure!(!PausedVaults::<T>::get(vault_id), Error::<T>::VaultPaused);
      Ok(config)
    }

    fn accepts_operations(vault_id: VaultId) -> bool {
      Vaults::<T>::contains_key(vault_id) && !PausedVaults::<T>::get(vault_id)
    }

    fn redeemable_balance(vault_id: VaultId, who: &T::AccountId) -> Balance {
      if Self::accepts_operations(vault_id) {
        Self::share_balance(vault_id, who)
      } else {
        0
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

    fn settle_entry(
      vault_id: VaultId,
      config: &VaultConfig<T::AccountId>,
      totals: PoolTotals,
      who: &T::AccountId,
      receiver: &T::AccountId,
      assets: Balance,
      shares: Balance,
    ) -> DispatchResult {
      let account = Self::vault_account(vault_id);
      T::Assets::transfer(config.asset, who, &account, assets, Preservation::Expendable)?;
      T::Assets::mint_into(config.share_asset, receiver, shares)?;
      Totals::<T>::insert(vault_id, totals.credit(assets, shares)?);

      log::debug!(target: LOG_TARGET, "vault {vault_id}: {assets} assets in, {shares} shares out");
      Self::deposit_event(Event::Deposited {
        vault_id,
        caller: who.clone(),
        receiver: receiver.clone(),
        assets,
        shares,
      });
      Ok(())
    }

    /// Burn `shares` from `owner`, pay `assets` to `receiver` and skim the fee,
    /// i.e. the difference between the burned shares' value and `assets`.
    /// Fee the recipients cannot receive stays in the pool.
    fn settle_exit(
      vault_id: VaultId,
      config: &VaultConfig<T::AccountId>,
      totals: PoolTotals,
      who: &T::AccountId,
      receiver: &T::AccountId,
      owner: &T::AccountId,
      assets: Balance,
      shares: Balance,
    ) -> DispatchResult {
      ensure!(
        T::Assets::balance(config.share_asset, owner) >= shares,
        Error::<T>::InsufficientShareBalance
      );
      let fee = shares::exit_fee(shares, assets, totals.total_assets, totals.total_supply)?;
      let account = Self::vault_account(vault_id);

      Self::burn_shares(config.share_asset, &account, who, owner, shares)?;
      Self::pay(config.asset, &account, receiver, assets)?;
      let split = Self::distribute_fee(
        config.asset,
        &account,
        &config.primary_fee_recipient,
        &config.secondary_fee_recipient,
        fee,
      )?;
      Totals::<T>::insert(
        vault_id,
        totals.debit(assets.saturating_add(split.total()), shares)?,
      );

      log::debug!(
        target: LOG_TARGET,
        "vault {vault_id}: {shares} shares burned, {assets} assets out, fee {fee}"
      );
      Self::deposit_event(Event::Withdrawn {
        vault_id,
        caller: who.clone(),
        receiver: receiver.clone(),
        owner: owner.clone(),
        assets,
        shares,
      });
      if !split.is_zero() {
        Self::deposit_event(Event::FeesDistributed {
          vault_id,
          primary: config.primary_fee_recipient.clone(),
          secondary: config.secondary_fee_recipient.clone(),
          split,
        });
      }
      Ok(())
    }

    fn burn_shares(
      share_asset: AssetId,
      escrow: &T::AccountId,
      who: &T::AccountId,
      owner: &T::AccountId,
      shares: Balance,
    ) -> DispatchResult {
      let burn_from = if who == owner {
        owner
      } else {
        // Spends the caller's allowance; fails if it does not cover `shares`
        T::Assets::transfer_from(share_asset, owner, who, escrow, shares)?;
        escrow
      };
      T::Assets::burn_from(
        share_asset,
        burn_from,
        shares,
        Preservation::Expendable,
        Precision::Exact,
        Fortitude::Polite,
      )?;
      Ok(())
    }
  }

  impl<T: Config> crate::ShareVault<T::AccountId> for Pallet<T> {
    fn asset(vault: VaultId) -> Option<AssetId> {
      Vaults::<T>::get(vault).map(|config| config.asset)
    }

    fn totals(vault: VaultId) -> PoolTotals {
      Totals::<T>::get(vault)
    }

    fn share_balance(vault: VaultId, who: &T::AccountId) -> Balance {
      Self::share_balance(vault, who)
    }

    fn preview_deposit(vault: VaultId, assets: Balance) -> Result<Balance, DispatchError> {
      Self::preview_deposit(vault, assets)
    }

    fn preview_mint(vault: VaultId, shares: Balance) -> Result<Balance, DispatchError> {
      Self::preview_mint(vault, shares)
    }

    fn preview_withdraw(vault: VaultId, assets: Balance) -> Result<Balance, DispatchError> {
      Self::preview_withdraw(vault, assets)
    }

    fn preview_redeem(vault: VaultId, shares: Balance) -> Result<Balance, DispatchError> {
      Self::preview_redeem(vault, shares)
    }

    fn max_withdraw(vault: VaultId, who: &T::AccountId) -> Result<Balance, DispatchError> {
      Self::max_withdraw(vault, who)
    }

    fn deposit(
      vault: VaultId,
      who: &T::AccountId,
      assets: Balance,
      receiver: &T::AccountId,
    ) -> Result<Balance, DispatchError> {
      Self::do_deposit(vault, who, assets, receiver)
    }

    fn mint(
      vault: VaultId,
      who: &T::AccountId,
      shares: Balance,
      receiver: &T::AccountId,
    ) -> Result<Balance, DispatchError> {
      Self::do_mint(vault, who, shares, receiver)
    }

    fn withdraw(
      vault: VaultId,
      who: &T::AccountId,
      assets: Balance,
      receiver: &T::AccountId,
      owner: &T::AccountId,
    ) -> Result<Balance, DispatchError> {
      Self::do_withdraw(vault, who, assets, receiver, owner)
    }

    fn redeem(
      vault: VaultId,
      who: &T::AccountId,
      shares: Balance,
      receiver: &T::AccountId,
      owner: &T::AccountId,
    ) -> Result<Balance, DispatchError> {
      Self::do_redeem(vault, who, shares, receiver, owner)
    }
  }
}
