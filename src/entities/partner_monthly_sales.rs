use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// 合作方按月累计销售额，period 由 (period_year, period_month) 组成
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "partner_monthly_sales")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub partner_id: i64,
    pub period_year: i32,
    pub period_month: i16,
    pub sales_amount: i64,
    pub sale_count: i64,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
