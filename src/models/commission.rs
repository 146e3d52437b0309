use crate::entities::{CommissionStatus, commission_record_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommissionRecordResponse {
    pub id: i64,
    pub partner_id: i64,
    pub sale_id: String,
    pub sale_total: i64,
    pub base_rate_bp: i64,
    pub content_bonus_bp: i64,
    pub seasonal_bonus_bp: i64,
    pub campaign_id: Option<i64>,
    pub effective_rate_bp: i64,
    pub commission_amount: i64,
    pub status: CommissionStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub released_at: Option<DateTime<Utc>>,
}

impl From<commission_record_entity::Model> for CommissionRecordResponse {
    fn from(m: commission_record_entity::Model) -> Self {
        Self {
            id: m.id,
            partner_id: m.partner_id,
            sale_id: m.sale_id,
            sale_total: m.sale_total,
            base_rate_bp: m.base_rate_bp,
            content_bonus_bp: m.content_bonus_bp,
            seasonal_bonus_bp: m.seasonal_bonus_bp,
            campaign_id: m.campaign_id,
            effective_rate_bp: m.effective_rate_bp,
            commission_amount: m.commission_amount,
            status: m.status,
            created_at: m.created_at.unwrap_or_else(Utc::now),
            completed_at: m.completed_at,
            released_at: m.released_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FinalizeCommissionRequest {
    #[schema(example = "sale_8f2c1")]
    pub sale_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TierChange {
    pub previous_tier: String,
    pub new_tier: String,
    pub previous_rate_bp: i64,
    pub new_rate_bp: i64,
    pub period_sales: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FinalizeCommissionResponse {
    pub sale_id: String,
    pub partner_id: i64,
    pub commission_amount: i64,
    /// true 表示此前已完成，本次未重复入账
    pub already_completed: bool,
    pub tier_change: Option<TierChange>,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ReleaseEarningsResponse {
    pub released_count: i64,
    pub released_amount: i64,
}
