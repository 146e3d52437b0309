use crate::entities::{PartnerStatus, partner_entity, tier_history_entity};
use crate::models::LedgerAccountResponse;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatePartnerRequest {
    #[schema(example = "Jane's Picks")]
    pub display_name: String,
    /// 不填则自动生成
    #[schema(example = "JANE2026")]
    pub referral_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PartnerResponse {
    pub id: i64,
    pub user_id: i64,
    pub display_name: String,
    pub referral_code: String,
    pub status: PartnerStatus,
    pub tier: String,
    pub base_rate_bp: i64,
    pub video_bonus_bp: i64,
    pub community_bonus_bp: i64,
    pub total_revenue: i64,
    pub created_at: DateTime<Utc>,
}

impl From<partner_entity::Model> for PartnerResponse {
    fn from(m: partner_entity::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            display_name: m.display_name,
            referral_code: m.referral_code,
            status: m.status,
            tier: m.tier,
            base_rate_bp: m.base_rate_bp,
            video_bonus_bp: m.video_bonus_bp,
            community_bonus_bp: m.community_bonus_bp,
            total_revenue: m.total_revenue,
            created_at: m.created_at.unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PartnerStats {
    /// 已完成佣金总额 (美分)
    pub total_commissions: i64,
    pub completed_commission_count: i64,
    /// 待完成佣金总额 (美分)
    pub pending_commissions: i64,
    pub pending_commission_count: i64,
    pub total_clicks: i64,
    pub total_conversions: i64,
    /// 百分比，无点击时为 0
    pub conversion_rate: f64,
    pub current_tier: String,
    pub current_rate_bp: i64,
    pub current_month_sales: i64,
    pub ledger: LedgerAccountResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PartnerStatsResponse {
    pub partner: PartnerResponse,
    pub stats: PartnerStats,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateBonusesRequest {
    #[schema(example = 5000)]
    pub video_bonus_bp: Option<i64>,
    #[schema(example = 2000)]
    pub community_bonus_bp: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdatePartnerStatusRequest {
    pub status: PartnerStatus,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TierHistoryResponse {
    pub id: i64,
    pub previous_tier: String,
    pub new_tier: String,
    pub previous_rate_bp: i64,
    pub new_rate_bp: i64,
    pub period_sales: i64,
    pub created_at: DateTime<Utc>,
}

impl From<tier_history_entity::Model> for TierHistoryResponse {
    fn from(m: tier_history_entity::Model) -> Self {
        Self {
            id: m.id,
            previous_tier: m.previous_tier,
            new_tier: m.new_tier,
            previous_rate_bp: m.previous_rate_bp,
            new_rate_bp: m.new_rate_bp,
            period_sales: m.period_sales,
            created_at: m.created_at.unwrap_or_else(Utc::now),
        }
    }
}
