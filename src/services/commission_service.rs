use crate::entities::{
    CommissionStatus, commission_record_entity as commissions, monthly_sales_entity as monthly,
    partner_entity as partners,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    ActorRef, CommissionRecordResponse, FinalizeCommissionResponse, ListQuery, PaginatedResponse,
    PaginationParams, ReleaseEarningsResponse, SaleCreatedEvent, SaleOutcome,
};
use crate::rules::{CommissionQuote, SalesPeriod};
use crate::services::campaign_service::find_running_campaign;
use crate::services::ledger_service;
use crate::services::{AttributionService, TierService};
use crate::utils::normalize_referral_code;
use chrono::{Duration, Utc};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

/// 单次结算最多处理的佣金条数
const RELEASE_BATCH_SIZE: u64 = 500;

#[derive(Clone)]
pub struct CommissionService {
    pool: DatabaseConnection,
    attribution: AttributionService,
    tier_service: TierService,
    hold_days: i64,
}

impl CommissionService {
    pub fn new(
        pool: DatabaseConnection,
        attribution: AttributionService,
        tier_service: TierService,
        hold_days: i64,
    ) -> Self {
        Self {
            pool,
            attribution,
            tier_service,
            hold_days,
        }
    }

    /// 处理销售创建事件
    ///
    /// 1. 推荐码 -> 有效合作方 (无码 / 无匹配直接跳过)
    /// 2. 尽力标记点击转化 (失败只记录日志)
    /// 3. 读取当前生效的季节活动 (失败视为无活动)
    /// 4. 同一事务内: 按 sale_id 幂等插入佣金记录，成功时累加当月销售额与累计销售额
    pub async fn handle_sale_created(&self, sale: &SaleCreatedEvent) -> AppResult<SaleOutcome> {
        let sale_id = sale.sale_id.trim();
        if sale_id.is_empty() {
            return Err(AppError::ValidationError("sale_id is required".to_string()));
        }

        let Some(code) = sale
            .referral_code
            .as_deref()
            .map(normalize_referral_code)
            .filter(|c| !c.is_empty())
        else {
            return Ok(SaleOutcome::NoReferral);
        };

        let Some(partner) = self.attribution.resolve_partner(Some(&code)).await? else {
            log::info!("Sale {sale_id} carries unknown or inactive referral code {code}");
            return Ok(SaleOutcome::UnknownReferral {
                referral_code: code,
            });
        };

        if sale.total_amount <= 0 {
            return Err(AppError::ValidationError(format!(
                "Sale {sale_id} has a non-positive total"
            )));
        }

        match self
            .attribution
            .mark_click_converted(partner.id, &sale.customer_id, sale_id, sale.total_amount)
            .await
        {
            Ok(Some(click_id)) => log::debug!("Sale {sale_id} converted click {click_id}"),
            Ok(None) => {}
            Err(e) => log::warn!("Click conversion failed for sale {sale_id}: {e}"),
        }

        let now = Utc::now();
        let seasonal = match find_running_campaign(&self.pool, now).await {
            Ok(c) => c.map(|c| (c.id, c.bonus_bp)),
            Err(e) => {
                log::warn!("Seasonal campaign lookup failed for sale {sale_id}: {e}");
                None
            }
        };

        let quote = CommissionQuote::compute(
            sale.total_amount,
            partner.base_rate_bp,
            partner.content_bonus_bp(),
            seasonal,
        )?;

        let txn = self.pool.begin().await?;

        let inserted = commissions::Entity::insert(commissions::ActiveModel {
            partner_id: Set(partner.id),
            sale_id: Set(sale_id.to_string()),
            store_id: Set(sale.store_id.clone()),
            customer_id: Set(sale.customer_id.clone()),
            sale_total: Set(quote.sale_total),
            base_rate_bp: Set(quote.base_rate_bp),
            content_bonus_bp: Set(quote.content_bonus_bp),
            seasonal_bonus_bp: Set(quote.seasonal_bonus_bp),
            campaign_id: Set(quote.campaign_id),
            effective_rate_bp: Set(quote.effective_rate_bp),
            commission_amount: Set(quote.commission_amount),
            status: Set(CommissionStatus::Pending),
            created_at: Set(Some(now)),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::column(commissions::Column::SaleId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&txn)
        .await?;

        if inserted == 0 {
            // 重复投递：记录已存在，销售额不再累加
            txn.rollback().await?;
            log::info!("Duplicate sale-created event for sale {sale_id}, skipped");
            return Ok(SaleOutcome::Duplicate {
                sale_id: sale_id.to_string(),
            });
        }

        add_monthly_sales(&txn, partner.id, SalesPeriod::containing(now), quote.sale_total).await?;

        partners::Entity::update_many()
            .col_expr(
                partners::Column::TotalRevenue,
                Expr::col(partners::Column::TotalRevenue).add(quote.sale_total),
            )
            .col_expr(partners::Column::UpdatedAt, Expr::value(now))
            .filter(partners::Column::Id.eq(partner.id))
            .exec(&txn)
            .await?;

        let record = commissions::Entity::find()
            .filter(commissions::Column::SaleId.eq(sale_id))
            .one(&txn)
            .await?
            .ok_or_else(|| {
                AppError::InternalError(format!("Commission for sale {sale_id} vanished"))
            })?;

        txn.commit().await?;

        log::info!(
            "Created pending commission {} for partner {} on sale {}: {} @ {}bp",
            record.id,
            partner.id,
            sale_id,
            record.commission_amount,
            record.effective_rate_bp
        );

        Ok(SaleOutcome::Created {
            commission: record.into(),
        })
    }

    /// 配送确认后完成佣金并入账
    ///
    /// pending -> completed 为单向条件更新；已完成的佣金再次确认时不重复入账。
    /// 入账提交后同步重新评估等级，等级评估失败只记录日志。
    pub async fn finalize_commission(&self, sale_id: &str) -> AppResult<FinalizeCommissionResponse> {
        let sale_id = sale_id.trim();
        if sale_id.is_empty() {
            return Err(AppError::ValidationError("sale_id is required".to_string()));
        }

        let txn = self.pool.begin().await?;

        let res = commissions::Entity::update_many()
            .set(commissions::ActiveModel {
                status: Set(CommissionStatus::Completed),
                completed_at: Set(Some(Utc::now())),
                ..Default::default()
            })
            .filter(commissions::Column::SaleId.eq(sale_id))
            .filter(commissions::Column::Status.eq(CommissionStatus::Pending))
            .exec(&txn)
            .await?;

        let record = commissions::Entity::find()
            .filter(commissions::Column::SaleId.eq(sale_id))
            .one(&txn)
            .await?;

        if res.rows_affected == 0 {
            txn.rollback().await?;
            return match record {
                Some(r) if r.status == CommissionStatus::Completed => {
                    log::info!("Commission for sale {sale_id} already completed");
                    Ok(FinalizeCommissionResponse {
                        sale_id: sale_id.to_string(),
                        partner_id: r.partner_id,
                        commission_amount: r.commission_amount,
                        already_completed: true,
                        tier_change: None,
                    })
                }
                _ => Err(AppError::NotFound(format!(
                    "No pending commission for sale {sale_id}"
                ))),
            };
        }

        let record = record.ok_or_else(|| {
            AppError::InternalError(format!("Commission for sale {sale_id} vanished"))
        })?;

        ledger_service::credit_pending(
            &txn,
            ActorRef::partner(record.partner_id),
            record.commission_amount,
        )
        .await?;

        txn.commit().await?;

        log::info!(
            "Finalized commission {} for partner {}: {}",
            record.id,
            record.partner_id,
            record.commission_amount
        );

        let tier_change = match self.tier_service.evaluate_partner(record.partner_id).await {
            Ok(change) => change,
            Err(e) => {
                log::error!(
                    "Tier evaluation failed for partner {} after sale {sale_id}: {e}",
                    record.partner_id
                );
                None
            }
        };

        Ok(FinalizeCommissionResponse {
            sale_id: sale_id.to_string(),
            partner_id: record.partner_id,
            commission_amount: record.commission_amount,
            already_completed: false,
            tier_change,
        })
    }

    pub async fn list_commissions(
        &self,
        partner_id: i64,
        query: &ListQuery,
    ) -> AppResult<PaginatedResponse<CommissionRecordResponse>> {
        let params = PaginationParams::from(query);
        let base = commissions::Entity::find()
            .filter(commissions::Column::PartnerId.eq(partner_id));

        let total = base.clone().count(&self.pool).await? as i64;
        let items = base
            .order_by_desc(commissions::Column::CreatedAt)
            .order_by_desc(commissions::Column::Id)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;

        Ok(PaginatedResponse::new(
            items.into_iter().map(Into::into).collect(),
            &params,
            total,
        ))
    }

    /// 将完成超过 hold_days 的佣金从 pending 转入 available
    ///
    /// 每条佣金一个事务；单条失败不影响其余。
    pub async fn release_matured_earnings(&self) -> AppResult<ReleaseEarningsResponse> {
        let cutoff = Utc::now() - Duration::days(self.hold_days);

        let due = commissions::Entity::find()
            .filter(commissions::Column::Status.eq(CommissionStatus::Completed))
            .filter(commissions::Column::ReleasedAt.is_null())
            .filter(commissions::Column::CompletedAt.lte(cutoff))
            .order_by_asc(commissions::Column::Id)
            .limit(RELEASE_BATCH_SIZE)
            .all(&self.pool)
            .await?;

        let mut summary = ReleaseEarningsResponse::default();
        for record in due {
            match self.release_one(&record).await {
                Ok(true) => {
                    summary.released_count += 1;
                    summary.released_amount += record.commission_amount;
                }
                Ok(false) => {}
                Err(e) => log::error!("Failed to release commission {}: {e}", record.id),
            }
        }
        Ok(summary)
    }

    async fn release_one(&self, record: &commissions::Model) -> AppResult<bool> {
        let txn = self.pool.begin().await?;

        let res = commissions::Entity::update_many()
            .col_expr(commissions::Column::ReleasedAt, Expr::value(Utc::now()))
            .filter(commissions::Column::Id.eq(record.id))
            .filter(commissions::Column::ReleasedAt.is_null())
            .exec(&txn)
            .await?;
        if res.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(false);
        }

        ledger_service::release_pending(
            &txn,
            ActorRef::partner(record.partner_id),
            record.commission_amount,
        )
        .await?;

        txn.commit().await?;
        Ok(true)
    }
}

/// 当月销售额累加 (不存在则插入)
///
/// 先尝试增量更新；没有该月记录时插入，插入因并发冲突未生效则再更新一次。
pub async fn add_monthly_sales<C>(
    db: &C,
    partner_id: i64,
    period: SalesPeriod,
    amount: i64,
) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    for _ in 0..2 {
        let res = monthly::Entity::update_many()
            .col_expr(
                monthly::Column::SalesAmount,
                Expr::col(monthly::Column::SalesAmount).add(amount),
            )
            .col_expr(
                monthly::Column::SaleCount,
                Expr::col(monthly::Column::SaleCount).add(1),
            )
            .col_expr(monthly::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(monthly::Column::PartnerId.eq(partner_id))
            .filter(monthly::Column::PeriodYear.eq(period.year))
            .filter(monthly::Column::PeriodMonth.eq(period.month_i16()))
            .exec(db)
            .await?;
        if res.rows_affected > 0 {
            return Ok(());
        }

        let inserted = monthly::Entity::insert(monthly::ActiveModel {
            partner_id: Set(partner_id),
            period_year: Set(period.year),
            period_month: Set(period.month_i16()),
            sales_amount: Set(amount),
            sale_count: Set(1),
            updated_at: Set(Some(Utc::now())),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::columns([
                monthly::Column::PartnerId,
                monthly::Column::PeriodYear,
                monthly::Column::PeriodMonth,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
        if inserted > 0 {
            return Ok(());
        }
    }

    Err(DbErr::Custom(format!(
        "Could not record {period} sales for partner {partner_id}"
    )))
}

/// 合作方某月销售额，无记录为 0
pub async fn monthly_sales<C>(db: &C, partner_id: i64, period: SalesPeriod) -> Result<i64, DbErr>
where
    C: ConnectionTrait,
{
    let row = monthly::Entity::find()
        .filter(monthly::Column::PartnerId.eq(partner_id))
        .filter(monthly::Column::PeriodYear.eq(period.year))
        .filter(monthly::Column::PeriodMonth.eq(period.month_i16()))
        .one(db)
        .await?;
    Ok(row.map(|r| r.sales_amount).unwrap_or(0))
}
