pub mod admin;
pub mod commission;
pub mod events;
pub mod health;
pub mod ledger;
pub mod partner;
pub mod payout;

pub use admin::admin_config;
pub use commission::commission_config;
pub use events::events_config;
pub use health::health;
pub use ledger::ledger_config;
pub use partner::partner_config;
pub use payout::payout_config;
