use crate::entities::{partner_entity as partners, tier_history_entity as tier_history};
use crate::error::{AppError, AppResult};
use crate::models::{TierChange, TierHistoryResponse};
use crate::rules::{SalesPeriod, Tier, TierSchedule};
use crate::services::commission_service::monthly_sales;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct TierService {
    pool: DatabaseConnection,
    schedule: Arc<TierSchedule>,
}

impl TierService {
    pub fn new(pool: DatabaseConnection, schedule: TierSchedule) -> Self {
        Self {
            pool,
            schedule: Arc::new(schedule),
        }
    }

    /// 所有等级 (从低到高)
    pub fn list_tiers(&self) -> Vec<Tier> {
        self.schedule.all().into_iter().cloned().collect()
    }

    /// 按当月销售额重新评估合作方等级
    ///
    /// 锁定合作方行后读取当月销售额；等级不同则更新等级与基础费率并追加一条历史。
    /// 同月内允许降级。
    pub async fn evaluate_partner(&self, partner_id: i64) -> AppResult<Option<TierChange>> {
        let txn = self.pool.begin().await?;

        let partner = partners::Entity::find_by_id(partner_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Partner {partner_id} not found")))?;

        let period = SalesPeriod::current();
        let sales = monthly_sales(&txn, partner_id, period).await?;
        let tier = self.schedule.evaluate(sales);

        if tier.name == partner.tier {
            txn.commit().await?;
            return Ok(None);
        }

        let now = Utc::now();
        let res = partners::Entity::update_many()
            .set(partners::ActiveModel {
                tier: Set(tier.name.clone()),
                base_rate_bp: Set(tier.rate_bp),
                updated_at: Set(Some(now)),
                ..Default::default()
            })
            .filter(partners::Column::Id.eq(partner_id))
            .filter(partners::Column::Tier.eq(partner.tier.as_str()))
            .exec(&txn)
            .await?;
        if res.rows_affected == 0 {
            // 并发评估已更新过等级
            txn.rollback().await?;
            return Ok(None);
        }

        tier_history::ActiveModel {
            partner_id: Set(partner_id),
            previous_tier: Set(partner.tier.clone()),
            new_tier: Set(tier.name.clone()),
            previous_rate_bp: Set(partner.base_rate_bp),
            new_rate_bp: Set(tier.rate_bp),
            period_sales: Set(sales),
            created_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        log::info!(
            "Partner {partner_id} tier {} -> {} ({period} sales {sales})",
            partner.tier,
            tier.name
        );

        Ok(Some(TierChange {
            previous_tier: partner.tier,
            new_tier: tier.name.clone(),
            previous_rate_bp: partner.base_rate_bp,
            new_rate_bp: tier.rate_bp,
            period_sales: sales,
        }))
    }

    pub async fn tier_history(&self, partner_id: i64) -> AppResult<Vec<TierHistoryResponse>> {
        let rows = tier_history::Entity::find()
            .filter(tier_history::Column::PartnerId.eq(partner_id))
            .order_by_desc(tier_history::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
