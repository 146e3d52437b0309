use crate::entities::{ActorType, BankAccountType, PayoutStatus, payout_request_entity};
use crate::rules::BankDetails;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatePayoutRequest {
    pub actor_id: i64,
    pub actor_type: ActorType,
    /// 申请金额 (美分)；商家为拆分前总额
    #[schema(example = 50000)]
    pub amount: i64,
    pub bank_details: BankDetails,
    /// 仅商家
    pub store_id: Option<String>,
    /// 仅商家：门店抽成 (basis points)
    #[schema(example = 2500)]
    pub store_commission_rate_bp: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PayoutRequestResponse {
    pub id: i64,
    pub reference: String,
    pub actor_type: ActorType,
    pub actor_id: i64,
    pub amount: i64,
    pub ledger_amount: i64,
    pub status: PayoutStatus,
    pub holder_name: String,
    pub bank_name: String,
    /// 只展示后四位
    pub account_number_masked: String,
    pub account_type: BankAccountType,
    pub store_id: Option<String>,
    pub gross_amount: Option<i64>,
    pub commission_rate_bp: Option<i64>,
    pub store_cut: Option<i64>,
    pub net_payout: Option<i64>,
    pub review_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

pub fn mask_account_number(account_number: &str) -> String {
    let chars: Vec<char> = account_number.chars().collect();
    let visible = chars.len().min(4);
    let hidden = chars.len() - visible;
    let tail: String = chars[hidden..].iter().collect();
    format!("{}{}", "*".repeat(hidden), tail)
}

impl From<payout_request_entity::Model> for PayoutRequestResponse {
    fn from(m: payout_request_entity::Model) -> Self {
        Self {
            id: m.id,
            reference: m.reference,
            actor_type: m.actor_type,
            actor_id: m.actor_id,
            amount: m.amount,
            ledger_amount: m.ledger_amount,
            status: m.status,
            holder_name: m.holder_name,
            bank_name: m.bank_name,
            account_number_masked: mask_account_number(&m.account_number),
            account_type: m.account_type,
            store_id: m.store_id,
            gross_amount: m.gross_amount,
            commission_rate_bp: m.commission_rate_bp,
            store_cut: m.store_cut,
            net_payout: m.net_payout,
            review_note: m.review_note,
            created_at: m.created_at.unwrap_or_else(Utc::now),
            processed_at: m.processed_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdatePayoutStatusRequest {
    pub status: PayoutStatus,
    pub note: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PayoutListQuery {
    pub actor_type: ActorType,
    pub actor_id: i64,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_account_number() {
        assert_eq!(mask_account_number("000123456789"), "********6789");
        assert_eq!(mask_account_number("12"), "12");
        assert_eq!(mask_account_number(""), "");
    }
}
