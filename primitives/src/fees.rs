//! Fee Split
//!
//! A fee is always shared between two recipients: the primary one takes the
//! floor half and the secondary one takes the remainder, so odd totals favour
//! the secondary recipient by exactly one unit.
//!
//! A ledger may refuse small credits (an existential minimum, say). [`route`]
//! then hands a refused half to the other recipient, and keeps the fee back
//! when neither recipient can take it whole.

use crate::ecosystem::Balance;
use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

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
pub struct FeeSplit {
  /// Share of the primary recipient (`total / 2`)
  pub primary: Balance,
  /// Share of the secondary recipient (`total - primary`)
  pub secondary: Balance,
}

impl FeeSplit {
  pub fn total(&self) -> Balance {
    self.primary.saturating_add(self.secondary)
  }

  pub fn is_zero(&self) -> bool {
    self.primary == 0 && self.secondary == 0
  }
}

/// Split `fee_total` between the two fee recipients.
pub fn split(fee_total: Balance) -> FeeSplit {
  let primary = fee_total / 2;
  FeeSplit {
    primary,
    secondary: fee_total - primary,
  }
}

/// Split `fee_total` and adjust the split to what the recipients accept.
///
/// The even split is used when both halves are accepted; otherwise the whole
/// fee goes to the primary, then to the secondary recipient. When neither can
/// take it the result is zero and the caller retains the fee.
pub fn route(
  fee_total: Balance,
  accepts_primary: impl Fn(Balance) -> bool,
  accepts_secondary: impl Fn(Balance) -> bool,
) -> FeeSplit {
  let even = split(fee_total);
  let candidates = [
    even,
    FeeSplit {
      primary: fee_total,
      secondary: 0,
    },
    FeeSplit {
      primary: 0,
      secondary: fee_total,
    },
  ];
  candidates
    .into_iter()
    .find(|candidate| {
      (candidate.primary == 0 || accepts_primary(candidate.primary))
        && (candidate.secondary == 0 || accepts_secondary(candidate.secondary))
    })
    .unwrap_or_default()
}
