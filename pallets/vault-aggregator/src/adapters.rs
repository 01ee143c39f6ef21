use frame::deps::sp_runtime::DispatchError;
use primitives::PositionId;

/// Non-fungible position issuance, typically backed by an NFT collection.
///
/// The registry owns `position -> holder`; share balances stay on the share
/// token ledger and the two are only joined by the aggregator's dispatchables.
pub trait PositionRegistry<AccountId> {
  /// Issue the next position to `to` and return its id (ids start at 1).
  fn issue(to: &AccountId) -> Result<PositionId, DispatchError>;

  /// Current holder of `position`.
  fn owner_of(position: PositionId) -> Option<AccountId>;

  /// Position currently held by `who`, if any.
  fn position_of(who: &AccountId) -> Option<PositionId>;

  /// Number of positions ever issued.
  fn issued() -> u32;
}
