use crate::entities::campaign_entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateCampaignRequest {
    #[schema(example = "Holiday 2026")]
    pub name: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    /// 加成倍数 (10000 = 1.0x)
    #[schema(example = 2000)]
    pub bonus_bp: i64,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CampaignResponse {
    pub id: i64,
    pub name: String,
    pub is_active: bool,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub bonus_bp: i64,
}

impl From<campaign_entity::Model> for CampaignResponse {
    fn from(m: campaign_entity::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            is_active: m.is_active,
            starts_at: m.starts_at,
            ends_at: m.ends_at,
            bonus_bp: m.bonus_bp,
        }
    }
}
