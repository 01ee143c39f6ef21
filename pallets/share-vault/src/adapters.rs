//! Programmatic access to share vaults for other pallets.
//!
//! The aggregator drives its child vaults exclusively through this trait, so a
//! runtime can point it at any implementation that honours the same accounting.

use frame::deps::sp_runtime::DispatchError;
use primitives::{AssetId, Balance, PoolTotals, VaultId};

pub trait ShareVault<AccountId> {
  /// Underlying asset of `vault`, `None` if the vault does not exist.
  fn asset(vault: VaultId) -> Option<AssetId>;

  /// Current accounting totals of `vault`.
  fn totals(vault: VaultId) -> PoolTotals;

  /// Shares of `vault` held by `who`.
  fn share_balance(vault: VaultId, who: &AccountId) -> Balance;

  fn preview_deposit(vault: VaultId, assets: Balance) -> Result<Balance, DispatchError>;
  fn preview_mint(vault: VaultId, shares: Balance) -> Result<Balance, DispatchError>;
  fn preview_withdraw(vault: VaultId, assets: Balance) -> Result<Balance, DispatchError>;
  fn preview_redeem(vault: VaultId, shares: Balance) -> Result<Balance, DispatchError>;

  /// Net assets `who` could withdraw right now.
  fn max_withdraw(vault: VaultId, who: &AccountId) -> Result<Balance, DispatchError>;

  /// Deposit `assets` from `who`, crediting shares to `receiver`. Returns shares minted.
  fn deposit(
    vault: VaultId,
    who: &AccountId,
    assets: Balance,
    receiver: &AccountId,
  ) -> Result<Balance, DispatchError>;

  /// Mint exactly `shares` to `receiver`, paid by `who`. Returns assets pulled.
  fn mint(
    vault: VaultId,
    who: &AccountId,
    shares: Balance,
    receiver: &AccountId,
  ) -> Result<Balance, DispatchError>;

  /// Deliver `assets` net of fee to `receiver` out of `owner`'s shares. Returns shares burned.
  fn withdraw(
    vault: VaultId,
    who: &AccountId,
    assets: Balance,
    receiver: &AccountId,
    owner: &AccountId,
  ) -> Result<Balance, DispatchError>;

  /// Burn `shares` of `owner`, delivering the net assets to `receiver`. Returns assets paid.
  fn redeem(
    vault: VaultId,
    who: &AccountId,
    shares: Balance,
    receiver: &AccountId,
    owner: &AccountId,
  ) -> Result<Balance, DispatchError>;
}
