//! Ecosystem Constants for the Vault Engine
//!
//! Centralizes identifiers and fundamental accounting parameters shared by the
//! share-vault and vault-aggregator pallets and by runtime configurations.

/// Balance type alias for consistency across the workspace
pub type Balance = u128;

/// Identifier of a fungible asset managed by `pallet-assets`
pub type AssetId = u32;

/// Identifier of a single-asset vault inside the share-vault pallet
pub type VaultId = u32;

/// Identifier of a non-fungible aggregator position (1-based, `0` requests a new one)
pub type PositionId = u32;

/// Fee rate expressed in basis points (1/100th of a percent)
pub type BasisPoints = u16;

/// Pallet identifiers for deriving pallet-owned accounts.
///
/// Used with `PalletId::into_account_truncating()` and
/// `PalletId::into_sub_account_truncating()` so that every vault and the
/// aggregator get a deterministic sovereign account.
pub mod pallet_ids {
  /// Share Vault pallet ID (one sub-account per vault)
  pub const SHARE_VAULT_PALLET_ID: &[u8; 8] = b"py/shrvt";

  /// Vault Aggregator pallet ID (pooled position account)
  pub const VAULT_AGGREGATOR_PALLET_ID: &[u8; 8] = b"py/vagg0";
}

/// Accounting parameters.
pub mod params {
  use super::{BasisPoints, PositionId};

  /// Denominator of every basis-point rate (100%).
  pub const MAX_BASIS_POINTS: BasisPoints = 10_000;

  /// Sentinel position id asking the aggregator to issue a fresh position.
  pub const NEW_POSITION: PositionId = 0;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn pallet_ids_are_distinct() {
    assert_ne!(
      pallet_ids::SHARE_VAULT_PALLET_ID,
      pallet_ids::VAULT_AGGREGATOR_PALLET_ID
    );
  }

  #[test]
  fn basis_points_denominator_is_one_hundred_percent() {
    assert_eq!(params::MAX_BASIS_POINTS, 10_000);
    assert_eq!(params::NEW_POSITION, 0);
  }
}
