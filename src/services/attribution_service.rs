use crate::entities::{PartnerStatus, click_record_entity as clicks, partner_entity as partners};
use crate::error::{AppError, AppResult};
use crate::models::ClickEvent;
use crate::utils::normalize_referral_code;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};

/// 点击转化最多重试次数 (并发下最早的点击可能被其他 sale 抢先标记)
const CONVERT_ATTEMPTS: usize = 3;

#[derive(Clone)]
pub struct AttributionService {
    pool: DatabaseConnection,
}

impl AttributionService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 推荐码 -> 有效合作方；无码或无匹配返回 None
    pub async fn resolve_partner(
        &self,
        referral_code: Option<&str>,
    ) -> AppResult<Option<partners::Model>> {
        let Some(code) = referral_code
            .map(normalize_referral_code)
            .filter(|c| !c.is_empty())
        else {
            return Ok(None);
        };
        Ok(find_active_partner_by_code(&self.pool, &code).await?)
    }

    /// 记录一次推广点击
    pub async fn record_click(&self, event: &ClickEvent) -> AppResult<clicks::Model> {
        let customer_id = event.customer_id.trim();
        if customer_id.is_empty() {
            return Err(AppError::ValidationError(
                "customer_id is required".to_string(),
            ));
        }

        let partner = self
            .resolve_partner(Some(&event.referral_code))
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "No active partner for referral code {}",
                    event.referral_code
                ))
            })?;

        let click = clicks::ActiveModel {
            partner_id: Set(partner.id),
            customer_id: Set(customer_id.to_string()),
            converted: Set(false),
            created_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        Ok(click)
    }

    /// 将该合作方对该客户最早一条未转化点击标记为已转化
    ///
    /// 返回被标记的点击 id；没有可用点击或该 sale 已转化过时返回 None。
    pub async fn mark_click_converted(
        &self,
        partner_id: i64,
        customer_id: &str,
        sale_id: &str,
        amount: i64,
    ) -> AppResult<Option<i64>> {
        // 同一 sale 重复投递时不再消耗新的点击
        let already = clicks::Entity::find()
            .filter(clicks::Column::SaleId.eq(sale_id))
            .count(&self.pool)
            .await?;
        if already > 0 {
            return Ok(None);
        }

        for _ in 0..CONVERT_ATTEMPTS {
            let Some(candidate) = clicks::Entity::find()
                .filter(clicks::Column::PartnerId.eq(partner_id))
                .filter(clicks::Column::CustomerId.eq(customer_id))
                .filter(clicks::Column::Converted.eq(false))
                .order_by_asc(clicks::Column::CreatedAt)
                .order_by_asc(clicks::Column::Id)
                .one(&self.pool)
                .await?
            else {
                return Ok(None);
            };

            let res = clicks::Entity::update_many()
                .set(clicks::ActiveModel {
                    converted: Set(true),
                    sale_id: Set(Some(sale_id.to_string())),
                    conversion_amount: Set(Some(amount)),
                    converted_at: Set(Some(Utc::now())),
                    ..Default::default()
                })
                .filter(clicks::Column::Id.eq(candidate.id))
                .filter(clicks::Column::Converted.eq(false))
                .exec(&self.pool)
                .await?;

            if res.rows_affected == 1 {
                return Ok(Some(candidate.id));
            }
        }

        log::warn!(
            "Gave up converting click for partner {partner_id} / customer {customer_id} after {CONVERT_ATTEMPTS} attempts"
        );
        Ok(None)
    }
}

/// 按规范化后的推荐码查找有效合作方
pub async fn find_active_partner_by_code<C>(
    db: &C,
    normalized_code: &str,
) -> Result<Option<partners::Model>, DbErr>
where
    C: ConnectionTrait,
{
    partners::Entity::find()
        .filter(partners::Column::ReferralCode.eq(normalized_code))
        .filter(partners::Column::Status.eq(PartnerStatus::Active))
        .one(db)
        .await
}
