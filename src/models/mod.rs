pub mod campaign;
pub mod commission;
pub mod common;
pub mod event;
pub mod ledger;
pub mod pagination;
pub mod partner;
pub mod payout;

pub use campaign::*;
pub use commission::*;
pub use common::*;
pub use event::*;
pub use ledger::*;
pub use pagination::*;
pub use partner::*;
pub use payout::*;
