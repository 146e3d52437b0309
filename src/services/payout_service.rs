use crate::config::PayoutConfig;
use crate::entities::{ActorType, PayoutStatus, payout_request_entity as payouts};
use crate::error::{AppError, AppResult};
use crate::middlewares::AuthContext;
use crate::models::{
    ActorRef, CreatePayoutRequest, PaginatedResponse, PaginationParams, PayoutListQuery,
    PayoutRequestResponse, UpdatePayoutStatusRequest,
};
use crate::rules::{VendorSplit, split_vendor_payout};
use crate::services::ledger_service;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

#[derive(Clone)]
pub struct PayoutService {
    pool: DatabaseConnection,
    config: PayoutConfig,
}

/// 通过金额校验后的申请
struct PayoutAmounts {
    /// 从账户扣减的金额 (商家为 net_payout)
    ledger_amount: i64,
    split: Option<(String, VendorSplit)>,
}

impl PayoutService {
    pub fn new(pool: DatabaseConnection, config: PayoutConfig) -> Self {
        Self { pool, config }
    }

    /// 提交提现申请
    ///
    /// 校验顺序:
    /// (a) 不低于该账户类型的最低提现金额
    /// (b) 不超过可提现余额 (扣除仍在审批中的申请)，在同一事务内锁定账户后读取
    /// (c) 银行信息完整
    /// 任一失败均不落库；成功后创建 pending 状态的申请，不动账户余额。
    pub async fn submit_payout(
        &self,
        caller: &AuthContext,
        req: CreatePayoutRequest,
    ) -> AppResult<PayoutRequestResponse> {
        if req.actor_id <= 0 {
            return Err(AppError::ValidationError("actor_id is required".to_string()));
        }
        if req.amount <= 0 {
            return Err(AppError::ValidationError(
                "Requested amount must be positive".to_string(),
            ));
        }

        let actor = ActorRef::new(req.actor_type, req.actor_id);
        ledger_service::authorize_actor(&self.pool, caller, actor).await?;

        let amounts = self.payout_amounts(&req)?;

        let txn = self.pool.begin().await?;
        match self.create_in_txn(&txn, actor, &req, amounts).await {
            Ok(model) => {
                txn.commit().await?;
                log::info!(
                    "Payout request {} created for {actor}: {} (ledger {})",
                    model.reference,
                    model.amount,
                    model.ledger_amount
                );
                Ok(model.into())
            }
            Err(e) => {
                txn.rollback().await?;
                Err(e)
            }
        }
    }

    /// 金额与商家拆分校验 (不访问数据库)
    fn payout_amounts(&self, req: &CreatePayoutRequest) -> AppResult<PayoutAmounts> {
        let (ledger_amount, split) = match req.actor_type {
            ActorType::Vendor => {
                let store_id = req
                    .store_id
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .ok_or_else(|| {
                        AppError::ValidationError(
                            "store_id is required for vendor payouts".to_string(),
                        )
                    })?;
                let rate_bp = req.store_commission_rate_bp.ok_or_else(|| {
                    AppError::ValidationError(
                        "store_commission_rate_bp is required for vendor payouts".to_string(),
                    )
                })?;
                let split = split_vendor_payout(req.amount, rate_bp)?;
                if split.net_payout == 0 {
                    return Err(AppError::FailedPrecondition(
                        "Net payout is zero after the store commission".to_string(),
                    ));
                }
                (split.net_payout, Some((store_id.to_string(), split)))
            }
            ActorType::Partner | ActorType::Staff => (req.amount, None),
        };

        let minimum = self.config.minimum_for(req.actor_type);
        if ledger_amount < minimum {
            return Err(AppError::FailedPrecondition(format!(
                "Requested amount {ledger_amount} is below the minimum payout of {minimum} for {}",
                req.actor_type
            )));
        }

        Ok(PayoutAmounts {
            ledger_amount,
            split,
        })
    }

    async fn create_in_txn(
        &self,
        txn: &DatabaseTransaction,
        actor: ActorRef,
        req: &CreatePayoutRequest,
        amounts: PayoutAmounts,
    ) -> AppResult<payouts::Model> {
        let available = ledger_service::lock_account(txn, actor)
            .await?
            .map(|a| a.available_balance)
            .unwrap_or(0);
        let reserved = outstanding_amount(txn, actor).await?;
        let spendable = available - reserved;
        if amounts.ledger_amount > spendable {
            return Err(AppError::FailedPrecondition(format!(
                "Requested amount {} exceeds available balance {}",
                amounts.ledger_amount,
                spendable.max(0)
            )));
        }

        let bank = req.bank_details.validate()?;

        let (store_id, split) = match amounts.split {
            Some((store_id, split)) => (Some(store_id), Some(split)),
            None => (None, None),
        };
        let now = Utc::now();

        let model = payouts::ActiveModel {
            reference: Set(uuid::Uuid::new_v4().to_string()),
            actor_type: Set(actor.actor_type),
            actor_id: Set(actor.actor_id),
            amount: Set(req.amount),
            ledger_amount: Set(amounts.ledger_amount),
            status: Set(PayoutStatus::Pending),
            holder_name: Set(bank.holder_name),
            bank_name: Set(bank.bank_name),
            account_number: Set(bank.account_number),
            routing_code: Set(bank.routing_code),
            account_type: Set(bank.account_type),
            store_id: Set(store_id),
            gross_amount: Set(split.as_ref().map(|s| s.gross_amount)),
            commission_rate_bp: Set(split.as_ref().map(|s| s.commission_rate_bp)),
            store_cut: Set(split.as_ref().map(|s| s.store_cut)),
            net_payout: Set(split.as_ref().map(|s| s.net_payout)),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(txn)
        .await?;

        Ok(model)
    }

    /// 审批流转 (管理员)
    ///
    /// paid 时在同一事务内扣减 available 并累加 total_withdrawn。
    pub async fn update_status(
        &self,
        payout_id: i64,
        req: UpdatePayoutStatusRequest,
    ) -> AppResult<PayoutRequestResponse> {
        let txn = self.pool.begin().await?;
        match self.transition_in_txn(&txn, payout_id, req).await {
            Ok(model) => {
                txn.commit().await?;
                log::info!(
                    "Payout request {} moved to {}",
                    model.reference,
                    model.status
                );
                Ok(model.into())
            }
            Err(e) => {
                txn.rollback().await?;
                Err(e)
            }
        }
    }

    async fn transition_in_txn(
        &self,
        txn: &DatabaseTransaction,
        payout_id: i64,
        req: UpdatePayoutStatusRequest,
    ) -> AppResult<payouts::Model> {
        let current = payouts::Entity::find_by_id(payout_id)
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Payout request {payout_id} not found")))?;

        let next = req.status;
        if !current.status.can_transition_to(next) {
            return Err(AppError::FailedPrecondition(format!(
                "Cannot move payout request from {} to {next}",
                current.status
            )));
        }

        if next == PayoutStatus::Paid {
            ledger_service::withdraw_available(
                txn,
                ActorRef::new(current.actor_type, current.actor_id),
                current.ledger_amount,
            )
            .await?;
        }

        let now = Utc::now();
        let mut update = payouts::ActiveModel {
            status: Set(next),
            updated_at: Set(Some(now)),
            ..Default::default()
        };
        if let Some(note) = req.note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()) {
            update.review_note = Set(Some(note));
        }
        if !next.is_outstanding() {
            update.processed_at = Set(Some(now));
        }

        let res = payouts::Entity::update_many()
            .set(update)
            .filter(payouts::Column::Id.eq(payout_id))
            .filter(payouts::Column::Status.eq(current.status))
            .exec(txn)
            .await?;
        if res.rows_affected != 1 {
            return Err(AppError::FailedPrecondition(format!(
                "Payout request {payout_id} was changed concurrently"
            )));
        }

        payouts::Entity::find_by_id(payout_id)
            .one(txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Payout request {payout_id} not found")))
    }

    pub async fn get_payout(
        &self,
        caller: &AuthContext,
        payout_id: i64,
    ) -> AppResult<PayoutRequestResponse> {
        let model = payouts::Entity::find_by_id(payout_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Payout request {payout_id} not found")))?;
        ledger_service::authorize_actor(
            &self.pool,
            caller,
            ActorRef::new(model.actor_type, model.actor_id),
        )
        .await?;
        Ok(model.into())
    }

    pub async fn list_payouts(
        &self,
        caller: &AuthContext,
        query: &PayoutListQuery,
    ) -> AppResult<PaginatedResponse<PayoutRequestResponse>> {
        let actor = ActorRef::new(query.actor_type, query.actor_id);
        ledger_service::authorize_actor(&self.pool, caller, actor).await?;

        let params = PaginationParams::new(query.page, query.per_page);
        let base = payouts::Entity::find()
            .filter(payouts::Column::ActorType.eq(actor.actor_type))
            .filter(payouts::Column::ActorId.eq(actor.actor_id));

        let total = base.clone().count(&self.pool).await? as i64;
        let items = base
            .order_by_desc(payouts::Column::Id)
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
}

/// 该账户仍在审批中 (pending / approved) 的申请所占用的金额
async fn outstanding_amount<C>(db: &C, actor: ActorRef) -> AppResult<i64>
where
    C: ConnectionTrait,
{
    let open = payouts::Entity::find()
        .filter(payouts::Column::ActorType.eq(actor.actor_type))
        .filter(payouts::Column::ActorId.eq(actor.actor_id))
        .filter(payouts::Column::Status.is_in([PayoutStatus::Pending, PayoutStatus::Approved]))
        .all(db)
        .await?;
    Ok(open.iter().map(|p| p.ledger_amount).sum())
}
