pub mod click_records;
pub mod commission_records;
pub mod earnings_accounts;
pub mod partner_monthly_sales;
pub mod partners;
pub mod payout_requests;
pub mod seasonal_campaigns;
pub mod tier_history;

pub use click_records as click_record_entity;
pub use commission_records as commission_record_entity;
pub use earnings_accounts as earnings_account_entity;
pub use partner_monthly_sales as monthly_sales_entity;
pub use partners as partner_entity;
pub use payout_requests as payout_request_entity;
pub use seasonal_campaigns as campaign_entity;
pub use tier_history as tier_history_entity;

pub use commission_records::CommissionStatus;
pub use earnings_accounts::ActorType;
pub use partners::PartnerStatus;
pub use payout_requests::{BankAccountType, PayoutStatus};
