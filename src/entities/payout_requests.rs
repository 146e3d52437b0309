use super::ActorType;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "snake_case")]
pub enum PayoutStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "paid")]
    Paid,
}

impl PayoutStatus {
    /// 允许的状态流转:
    /// - pending -> approved / rejected
    /// - approved -> paid / rejected
    /// rejected 与 paid 为终态
    pub fn can_transition_to(self, next: PayoutStatus) -> bool {
        matches!(
            (self, next),
            (PayoutStatus::Pending, PayoutStatus::Approved)
                | (PayoutStatus::Pending, PayoutStatus::Rejected)
                | (PayoutStatus::Approved, PayoutStatus::Paid)
                | (PayoutStatus::Approved, PayoutStatus::Rejected)
        )
    }

    /// 仍占用可提现余额的状态
    pub fn is_outstanding(self) -> bool {
        matches!(self, PayoutStatus::Pending | PayoutStatus::Approved)
    }
}

impl std::fmt::Display for PayoutStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PayoutStatus::Pending => write!(f, "pending"),
            PayoutStatus::Approved => write!(f, "approved"),
            PayoutStatus::Rejected => write!(f, "rejected"),
            PayoutStatus::Paid => write!(f, "paid"),
        }
    }
}

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "snake_case")]
pub enum BankAccountType {
    #[sea_orm(string_value = "checking")]
    Checking,
    #[sea_orm(string_value = "savings")]
    Savings,
}

impl std::str::FromStr for BankAccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "checking" => Ok(BankAccountType::Checking),
            "savings" => Ok(BankAccountType::Savings),
            other => Err(format!("Unknown bank account type: {other}")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "payout_requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// 对外展示的申请编号 (uuid)
    pub reference: String,
    pub actor_type: ActorType,
    pub actor_id: i64,
    /// 申请金额 (美分)
    pub amount: i64,
    /// 打款时从账户扣减的金额；商家为 net_payout，其余等于 amount
    pub ledger_amount: i64,
    pub status: PayoutStatus,
    pub holder_name: String,
    pub bank_name: String,
    pub account_number: String,
    pub routing_code: String,
    pub account_type: BankAccountType,
    pub store_id: Option<String>,
    pub gross_amount: Option<i64>,
    pub commission_rate_bp: Option<i64>,
    pub store_cut: Option<i64>,
    pub net_payout: Option<i64>,
    pub review_note: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub processed_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
