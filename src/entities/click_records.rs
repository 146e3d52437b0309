use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// 推广链接点击，converted 只会从 false 变为 true
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "click_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub partner_id: i64,
    pub customer_id: String,
    pub converted: bool,
    pub sale_id: Option<String>,
    pub conversion_amount: Option<i64>,
    pub converted_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
