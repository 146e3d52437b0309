pub mod attribution_service;
pub mod campaign_service;
pub mod commission_service;
pub mod ledger_service;
pub mod partner_service;
pub mod payout_service;
pub mod scheduled_service;
pub mod tier_service;

pub use attribution_service::AttributionService;
pub use campaign_service::CampaignService;
pub use commission_service::CommissionService;
pub use ledger_service::LedgerService;
pub use partner_service::PartnerService;
pub use payout_service::PayoutService;
pub use scheduled_service::ScheduledOperations;
pub use tier_service::TierService;
