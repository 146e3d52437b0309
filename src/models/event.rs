use crate::models::CommissionRecordResponse;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 销售创建事件 (由订单系统推送)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SaleCreatedEvent {
    pub sale_id: String,
    pub referral_code: Option<String>,
    /// 订单总额 (美分)
    pub total_amount: i64,
    #[serde(default)]
    pub status: Option<String>,
    pub store_id: String,
    pub customer_id: String,
}

/// 配送确认事件
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeliveryConfirmedEvent {
    pub sale_id: String,
}

/// 推广链接点击
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClickEvent {
    pub referral_code: String,
    pub customer_id: String,
}

/// 销售事件处理结果
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SaleOutcome {
    /// 订单未带推荐码
    NoReferral,
    /// 推荐码没有对应的有效合作方
    UnknownReferral { referral_code: String },
    /// 该 sale 已有佣金记录 (重复事件)
    Duplicate { sale_id: String },
    Created { commission: CommissionRecordResponse },
}
