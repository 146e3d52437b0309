use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 收益账户持有者类型
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
    ToSchema,
    DeriveActiveEnum,
    EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "snake_case")]
pub enum ActorType {
    #[sea_orm(string_value = "partner")]
    Partner,
    #[sea_orm(string_value = "vendor")]
    Vendor,
    #[sea_orm(string_value = "staff")]
    Staff,
}

impl std::fmt::Display for ActorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActorType::Partner => write!(f, "partner"),
            ActorType::Vendor => write!(f, "vendor"),
            ActorType::Staff => write!(f, "staff"),
        }
    }
}

impl std::str::FromStr for ActorType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "partner" => Ok(ActorType::Partner),
            "vendor" => Ok(ActorType::Vendor),
            "staff" => Ok(ActorType::Staff),
            other => Err(format!("Unknown actor type: {other}")),
        }
    }
}

/// 每个 (actor_type, actor_id) 一行；所有余额变动都以增量 SQL 表达
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "earnings_accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub actor_type: ActorType,
    pub actor_id: i64,
    /// 已赚取但尚未可提现 (美分)
    pub pending_balance: i64,
    /// 可提现 (美分)
    pub available_balance: i64,
    pub total_earned: i64,
    pub total_withdrawn: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
