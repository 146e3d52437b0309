//! Pure accounting rules with no database access.
//!
//! Amounts are minor currency units (cents). Rates and multipliers are basis points,
//! where 10 000 bp is 100 % for a rate and 1.0x for a multiplier.

pub mod bank_details;
pub mod commission;
pub mod tier;
pub mod vendor_split;

pub use bank_details::*;
pub use commission::*;
pub use tier::*;
pub use vendor_split::*;

pub const BPS_SCALE: i64 = 10_000;
