//! Share Accounting
//!
//! Conversion between asset and share amounts for a pool described by its
//! `(total_assets, total_supply)` pair, the basis-point withdrawal fee that
//! sits on top of it, and the fee taken from a pool's gain over its principal.
//!
//! Every product is taken before the division with a 256-bit intermediate, so
//! the only failures are a final value that does not fit in [`Balance`] and a
//! pool that has outstanding shares but no assets.

use crate::ecosystem::{BasisPoints, Balance, params::MAX_BASIS_POINTS};
use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};
use sp_arithmetic::{
  ArithmeticError, Rounding, helpers_128bit::multiply_by_rational_with_rounding,
};

/// Outstanding totals of a share pool.
#[derive(
  Clone,
  Copy,
  Debug,
  Decode,
  DecodeWithMemTracking,
  Default,
  Encode,
  Eq,
  MaxEncodedLen,
  PartialEq,
  TypeInfo,
  Serialize,
  Deserialize,
)]
pub struct PoolTotals {
  /// Assets the pool accounts for (may exceed its literal balance)
  pub total_assets: Balance,
  /// Shares in circulation
  pub total_supply: Balance,
}

impl PoolTotals {
  pub const fn new(total_assets: Balance, total_supply: Balance) -> Self {
    Self {
      total_assets,
      total_supply,
    }
  }

  pub fn to_shares(&self, assets: Balance) -> Result<Balance, ArithmeticError> {
    to_shares(assets, self.total_assets, self.total_supply)
  }

  pub fn to_shares_rounded(
    &self,
    assets: Balance,
    rounding: Rounding,
  ) -> Result<Balance, ArithmeticError> {
    to_shares_rounded(assets, self.total_assets, self.total_supply, rounding)
  }

  pub fn to_assets(&self, shares: Balance) -> Result<Balance, ArithmeticError> {
    to_assets(shares, self.total_assets, self.total_supply)
  }

  pub fn shares_for_net_withdrawal(
    &self,
    assets: Balance,
    fee_bps: BasisPoints,
    rounding: Rounding,
  ) -> Result<Balance, ArithmeticError> {
    shares_for_net_withdrawal(
      assets,
      fee_bps,
      self.total_assets,
      self.total_supply,
      rounding,
    )
  }

  pub fn assets_for_gross_redeem(
    &self,
    shares: Balance,
    fee_bps: BasisPoints,
  ) -> Result<Balance, ArithmeticError> {
    assets_for_gross_redeem(shares, fee_bps, self.total_assets, self.total_supply)
  }

  /// Totals after `assets` enter the pool against `shares` newly issued.
  pub fn credit(&self, assets: Balance, shares: Balance) -> Result<Self, ArithmeticError> {
    Ok(Self {
      total_assets: self
        .total_assets
        .checked_add(assets)
        .ok_or(ArithmeticError::Overflow)?,
      total_supply: self
        .total_supply
        .checked_add(shares)
        .ok_or(ArithmeticError::Overflow)?,
    })
  }

  /// Totals after `assets` leave the pool against `shares` burned.
  pub fn debit(&self, assets: Balance, shares: Balance) -> Result<Self, ArithmeticError> {
    Ok(Self {
      total_assets: self
        .total_assets
        .checked_sub(assets)
        .ok_or(ArithmeticError::Underflow)?,
      total_supply: self
        .total_supply
        .checked_sub(shares)
        .ok_or(ArithmeticError::Underflow)?,
    })
  }
}

fn mul_div(
  a: Balance,
  b: Balance,
  c: Balance,
  rounding: Rounding,
) -> Result<Balance, ArithmeticError> {
  if c == 0 {
    return Err(ArithmeticError::DivisionByZero);
  }
  multiply_by_rational_with_rounding(a, b, c, rounding).ok_or(ArithmeticError::Overflow)
}

/// Shares worth `assets`, rounded down. An empty pool converts 1:1.
pub fn to_shares(
  assets: Balance,
  total_assets: Balance,
  total_supply: Balance,
) -> Result<Balance, ArithmeticError> {
  to_shares_rounded(assets, total_assets, total_supply, Rounding::Down)
}

/// [`to_shares`] with an explicit rounding direction.
pub fn to_shares_rounded(
  assets: Balance,
  total_assets: Balance,
  total_supply: Balance,
  rounding: Rounding,
) -> Result<Balance, ArithmeticError> {
  if assets == 0 {
    return Ok(0);
  }
  if total_supply == 0 {
    return Ok(assets);
  }
  mul_div(assets, total_supply, total_assets, rounding)
}

/// Assets backing `shares`, rounded down. An empty pool converts 1:1.
pub fn to_assets(
  shares: Balance,
  total_assets: Balance,
  total_supply: Balance,
) -> Result<Balance, ArithmeticError> {
  if shares == 0 {
    return Ok(0);
  }
  if total_supply == 0 {
    return Ok(shares);
  }
  mul_div(shares, total_assets, total_supply, Rounding::Down)
}

/// Gross shares to burn so that `assets` reach the receiver after the fee.
///
/// `base * 10_000 / (10_000 - fee_bps)`, where both the share base and the
/// markup use the given rounding. A 100% fee can never net a positive
/// amount, so it yields `Balance::MAX` for any non-zero base.
pub fn shares_for_net_withdrawal(
  assets: Balance,
  fee_bps: BasisPoints,
  total_assets: Balance,
  total_supply: Balance,
  rounding: Rounding,
) -> Result<Balance, ArithmeticError> {
  let base = to_shares_rounded(assets, total_assets, total_supply, rounding)?;
  if base == 0 || fee_bps == 0 {
    return Ok(base);
  }
  let kept = MAX_BASIS_POINTS.saturating_sub(fee_bps);
  if kept == 0 {
    return Ok(Balance::MAX);
  }
  mul_div(
    base,
    Balance::from(MAX_BASIS_POINTS),
    Balance::from(kept),
    rounding,
  )
}

/// Net assets delivered for burning `shares`: `floor(base * (10_000 - fee_bps) / 10_000)`.
pub fn assets_for_gross_redeem(
  shares: Balance,
  fee_bps: BasisPoints,
  total_assets: Balance,
  total_supply: Balance,
) -> Result<Balance, ArithmeticError> {
  net_of_fee(to_assets(shares, total_assets, total_supply)?, fee_bps)
}

/// `floor(amount * (10_000 - fee_bps) / 10_000)`
pub fn net_of_fee(amount: Balance, fee_bps: BasisPoints) -> Result<Balance, ArithmeticError> {
  if fee_bps == 0 {
    return Ok(amount);
  }
  let kept = MAX_BASIS_POINTS.saturating_sub(fee_bps);
  mul_div(
    amount,
    Balance::from(kept),
    Balance::from(MAX_BASIS_POINTS),
    Rounding::Down,
  )
}

/// Fee owed on the gain of a pool over the principal its depositors put in:
/// `floor((total_assets - principal) * fee_bps / 10_000)`, zero while the pool
/// is at or below its principal.
pub fn interest_fee(
  total_assets: Balance,
  principal: Balance,
  fee_bps: BasisPoints,
) -> Result<Balance, ArithmeticError> {
  let interest = total_assets.saturating_sub(principal);
  if interest == 0 || fee_bps == 0 {
    return Ok(0);
  }
  mul_div(
    interest,
    Balance::from(fee_bps.min(MAX_BASIS_POINTS)),
    Balance::from(MAX_BASIS_POINTS),
    Rounding::Down,
  )
}

/// Fee retained when `shares` are burned and `net_assets` are paid out.
pub fn exit_fee(
  shares: Balance,
  net_assets: Balance,
  total_assets: Balance,
  total_supply: Balance,
) -> Result<Balance, ArithmeticError> {
  Ok(to_assets(shares, total_assets, total_supply)?.saturating_sub(net_assets))
}

/// Returns `true` if `fee_bps` is an acceptable withdrawal fee rate.
pub fn is_valid_fee(fee_bps: BasisPoints) -> bool {
  fee_bps <= MAX_BASIS_POINTS
}
