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
pub enum PartnerStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    Inactive,
}

impl std::fmt::Display for PartnerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PartnerStatus::Active => write!(f, "active"),
            PartnerStatus::Inactive => write!(f, "inactive"),
        }
    }
}

/// 推广合作方
/// - base_rate_bp: 当前基础佣金率 (basis points, 500 = 5%)，由等级决定
/// - video_bonus_bp / community_bonus_bp: 内容加成倍数 (10000 = 1.0x)
/// - total_revenue: 归因的累计销售额 (销售创建时即累加)
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "partners")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub display_name: String,
    pub referral_code: String,
    pub status: PartnerStatus,
    pub base_rate_bp: i64,
    pub video_bonus_bp: i64,
    pub community_bonus_bp: i64,
    pub tier: String,
    pub total_revenue: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Model {
    pub fn is_active(&self) -> bool {
        self.status == PartnerStatus::Active
    }

    /// 内容加成之和
    pub fn content_bonus_bp(&self) -> i64 {
        self.video_bonus_bp + self.community_bonus_bp
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
