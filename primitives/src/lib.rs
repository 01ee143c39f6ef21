#![cfg_attr(not(feature = "std"), no_std)]

pub mod ecosystem;
pub mod fees;
pub mod shares;

pub use ecosystem::*;
pub use fees::{FeeSplit, route as route_fee, split as split_fee};
pub use shares::PoolTotals;
