use crate::entities::{
    CommissionStatus, PartnerStatus, click_record_entity as clicks,
    commission_record_entity as commissions, partner_entity as partners,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    ActorRef, CreatePartnerRequest, LedgerAccountResponse, PartnerResponse, PartnerStats,
    PartnerStatsResponse, UpdateBonusesRequest,
};
use crate::rules::{SalesPeriod, TierSchedule};
use crate::services::commission_service::monthly_sales;
use crate::services::ledger_service;
use crate::utils::{generate_unique_referral_code, is_valid_referral_code, normalize_referral_code};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QuerySelect, Set, TransactionTrait,
};
use std::sync::Arc;

/// 单项内容加成上限 (5.0x)
const MAX_CONTENT_BONUS_BP: i64 = 50_000;

#[derive(Clone)]
pub struct PartnerService {
    pool: DatabaseConnection,
    schedule: Arc<TierSchedule>,
}

impl PartnerService {
    pub fn new(pool: DatabaseConnection, schedule: TierSchedule) -> Self {
        Self {
            pool,
            schedule: Arc::new(schedule),
        }
    }

    /// 注册合作方：分配推荐码，进入基础等级并开立收益账户
    pub async fn signup(&self, user_id: i64, req: CreatePartnerRequest) -> AppResult<PartnerResponse> {
        let display_name = req.display_name.trim();
        if display_name.is_empty() || display_name.chars().count() > 100 {
            return Err(AppError::ValidationError(
                "Display name must be 1-100 characters".to_string(),
            ));
        }

        let existing = partners::Entity::find()
            .filter(partners::Column::UserId.eq(user_id))
            .count(&self.pool)
            .await?;
        if existing > 0 {
            return Err(AppError::FailedPrecondition(
                "A partner profile already exists for this account".to_string(),
            ));
        }

        let requested_code = req
            .referral_code
            .as_deref()
            .map(normalize_referral_code)
            .filter(|c| !c.is_empty());
        if let Some(code) = &requested_code
            && !is_valid_referral_code(code)
        {
            return Err(AppError::ValidationError(
                "Referral code must be 4-32 letters, digits, '-' or '_'".to_string(),
            ));
        }

        let txn = self.pool.begin().await?;

        let referral_code = match requested_code {
            Some(code) => {
                let taken = partners::Entity::find()
                    .filter(partners::Column::ReferralCode.eq(code.as_str()))
                    .count(&txn)
                    .await?;
                if taken > 0 {
                    txn.rollback().await?;
                    return Err(AppError::FailedPrecondition(format!(
                        "Referral code {code} is already taken"
                    )));
                }
                code
            }
            None => generate_unique_referral_code(&txn).await?,
        };

        let base = self.schedule.base();
        let now = Utc::now();
        let partner = partners::ActiveModel {
            user_id: Set(user_id),
            display_name: Set(display_name.to_string()),
            referral_code: Set(referral_code),
            status: Set(PartnerStatus::Active),
            base_rate_bp: Set(base.rate_bp),
            video_bonus_bp: Set(0),
            community_bonus_bp: Set(0),
            tier: Set(base.name.clone()),
            total_revenue: Set(0),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        ledger_service::ensure_account(&txn, ActorRef::partner(partner.id)).await?;

        txn.commit().await?;

        log::info!(
            "Partner {} registered for user {} with code {}",
            partner.id,
            user_id,
            partner.referral_code
        );
        Ok(partner.into())
    }

    pub async fn get_partner(&self, partner_id: i64) -> AppResult<PartnerResponse> {
        Ok(self.load(partner_id).await?.into())
    }

    pub async fn get_partner_by_user(&self, user_id: i64) -> AppResult<PartnerResponse> {
        let partner = partners::Entity::find()
            .filter(partners::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("No partner profile for this account".to_string()))?;
        Ok(partner.into())
    }

    /// 合作方资料 + 汇总统计
    pub async fn get_partner_stats(&self, partner_id: i64) -> AppResult<PartnerStatsResponse> {
        if partner_id <= 0 {
            return Err(AppError::ValidationError(
                "partner id is required".to_string(),
            ));
        }
        let partner = self.load(partner_id).await?;

        let (total_commissions, completed_commission_count) =
            commission_totals(&self.pool, partner_id, CommissionStatus::Completed).await?;
        let (pending_commissions, pending_commission_count) =
            commission_totals(&self.pool, partner_id, CommissionStatus::Pending).await?;

        let total_clicks = clicks::Entity::find()
            .filter(clicks::Column::PartnerId.eq(partner_id))
            .count(&self.pool)
            .await? as i64;
        let total_conversions = clicks::Entity::find()
            .filter(clicks::Column::PartnerId.eq(partner_id))
            .filter(clicks::Column::Converted.eq(true))
            .count(&self.pool)
            .await? as i64;

        let current_month_sales =
            monthly_sales(&self.pool, partner_id, SalesPeriod::current()).await?;

        let actor = ActorRef::partner(partner_id);
        let ledger = ledger_service::find_account(&self.pool, actor)
            .await?
            .map(LedgerAccountResponse::from)
            .unwrap_or_else(|| LedgerAccountResponse::empty(actor));

        let stats = PartnerStats {
            total_commissions,
            completed_commission_count,
            pending_commissions,
            pending_commission_count,
            total_clicks,
            total_conversions,
            conversion_rate: conversion_rate(total_clicks, total_conversions),
            current_tier: partner.tier.clone(),
            current_rate_bp: partner.base_rate_bp,
            current_month_sales,
            ledger,
        };

        Ok(PartnerStatsResponse {
            partner: partner.into(),
            stats,
        })
    }

    pub async fn update_bonuses(
        &self,
        partner_id: i64,
        req: UpdateBonusesRequest,
    ) -> AppResult<PartnerResponse> {
        if req.video_bonus_bp.is_none() && req.community_bonus_bp.is_none() {
            return Err(AppError::ValidationError(
                "No bonus fields to update".to_string(),
            ));
        }
        for bonus in [req.video_bonus_bp, req.community_bonus_bp].into_iter().flatten() {
            if !(0..=MAX_CONTENT_BONUS_BP).contains(&bonus) {
                return Err(AppError::ValidationError(format!(
                    "Content bonus must be between 0 and {MAX_CONTENT_BONUS_BP} bp"
                )));
            }
        }

        let partner = self.load(partner_id).await?;
        let mut am = partner.into_active_model();
        if let Some(v) = req.video_bonus_bp {
            am.video_bonus_bp = Set(v);
        }
        if let Some(v) = req.community_bonus_bp {
            am.community_bonus_bp = Set(v);
        }
        am.updated_at = Set(Some(Utc::now()));
        let updated = am.update(&self.pool).await?;

        log::info!(
            "Partner {partner_id} bonuses set to video={}bp community={}bp",
            updated.video_bonus_bp,
            updated.community_bonus_bp
        );
        Ok(updated.into())
    }

    pub async fn update_status(
        &self,
        partner_id: i64,
        status: PartnerStatus,
    ) -> AppResult<PartnerResponse> {
        let partner = self.load(partner_id).await?;
        let mut am = partner.into_active_model();
        am.status = Set(status);
        am.updated_at = Set(Some(Utc::now()));
        let updated = am.update(&self.pool).await?;

        log::info!("Partner {partner_id} status set to {status}");
        Ok(updated.into())
    }

    async fn load(&self, partner_id: i64) -> AppResult<partners::Model> {
        partners::Entity::find_by_id(partner_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Partner {partner_id} not found")))
    }
}

/// (金额合计, 条数)
async fn commission_totals<C>(
    db: &C,
    partner_id: i64,
    status: CommissionStatus,
) -> AppResult<(i64, i64)>
where
    C: ConnectionTrait,
{
    let row: Option<(i64, i64)> = commissions::Entity::find()
        .select_only()
        .column_as(
            Expr::cust("CAST(COALESCE(SUM(commission_amount), 0) AS BIGINT)"),
            "total",
        )
        .column_as(Expr::cust("CAST(COUNT(*) AS BIGINT)"), "cnt")
        .filter(commissions::Column::PartnerId.eq(partner_id))
        .filter(commissions::Column::Status.eq(status))
        .into_tuple()
        .one(db)
        .await?;
    Ok(row.unwrap_or((0, 0)))
}

/// 转化率 (百分比，保留两位小数)；无点击时为 0
pub fn conversion_rate(clicks: i64, conversions: i64) -> f64 {
    if clicks <= 0 {
        return 0.0;
    }
    let rate = conversions as f64 / clicks as f64 * 100.0;
    (rate * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_rate() {
        assert_eq!(conversion_rate(0, 0), 0.0);
        assert_eq!(conversion_rate(4, 1), 25.0);
        assert_eq!(conversion_rate(3, 1), 33.33);
    }
}
