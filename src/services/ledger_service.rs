//! 收益账户 (pending / available / total_earned / total_withdrawn)
//!
//! 余额只通过增量 SQL 修改 (`col = col + delta`)，不做“读出-改-写回”。
//! 扣减类操作在 WHERE 中带余额下限条件，由 rows_affected 判断是否成功。

use crate::entities::{ActorType, earnings_account_entity as accounts, partner_entity as partners};
use crate::error::{AppError, AppResult};
use crate::middlewares::AuthContext;
use crate::models::{ActorRef, LedgerAccountResponse};
use chrono::Utc;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QuerySelect, Set, TransactionTrait,
};

#[derive(Clone)]
pub struct LedgerService {
    pool: DatabaseConnection,
}

impl LedgerService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 查询账户，尚未开户时返回全 0
    pub async fn get_account(&self, actor: ActorRef) -> AppResult<LedgerAccountResponse> {
        let account = find_account(&self.pool, actor).await?;
        Ok(account
            .map(Into::into)
            .unwrap_or_else(|| LedgerAccountResponse::empty(actor)))
    }

    /// 管理员为商家 / 员工记入待结算收益
    /// 合作方收益只能来自佣金完成
    pub async fn credit_pending_earnings(
        &self,
        actor: ActorRef,
        amount: i64,
    ) -> AppResult<LedgerAccountResponse> {
        if actor.actor_type == ActorType::Partner {
            return Err(AppError::ValidationError(
                "Partner earnings are credited by commission finalization only".to_string(),
            ));
        }
        if amount <= 0 {
            return Err(AppError::ValidationError(
                "Credit amount must be positive".to_string(),
            ));
        }

        let txn = self.pool.begin().await?;
        credit_pending(&txn, actor, amount).await?;
        txn.commit().await?;

        log::info!("Credited {amount} pending earnings to {actor}");
        self.get_account(actor).await
    }

    /// 管理员将商家 / 员工的待结算收益转为可提现
    pub async fn release_pending_earnings(
        &self,
        actor: ActorRef,
        amount: i64,
    ) -> AppResult<LedgerAccountResponse> {
        if actor.actor_type == ActorType::Partner {
            return Err(AppError::ValidationError(
                "Partner earnings are released by the settlement task".to_string(),
            ));
        }
        if amount <= 0 {
            return Err(AppError::ValidationError(
                "Release amount must be positive".to_string(),
            ));
        }

        let txn = self.pool.begin().await?;
        release_pending(&txn, actor, amount).await?;
        txn.commit().await?;

        log::info!("Released {amount} pending earnings for {actor}");
        self.get_account(actor).await
    }
}

// -----------------------------
// 事务内可复用的原子操作
// -----------------------------

pub async fn find_account<C>(db: &C, actor: ActorRef) -> Result<Option<accounts::Model>, DbErr>
where
    C: ConnectionTrait,
{
    accounts::Entity::find()
        .filter(accounts::Column::ActorType.eq(actor.actor_type))
        .filter(accounts::Column::ActorId.eq(actor.actor_id))
        .one(db)
        .await
}

/// 读取并锁定账户行 (PostgreSQL 下为 FOR UPDATE)
pub async fn lock_account<C>(db: &C, actor: ActorRef) -> Result<Option<accounts::Model>, DbErr>
where
    C: ConnectionTrait,
{
    accounts::Entity::find()
        .filter(accounts::Column::ActorType.eq(actor.actor_type))
        .filter(accounts::Column::ActorId.eq(actor.actor_id))
        .lock_exclusive()
        .one(db)
        .await
}

/// 账户不存在则创建 (并发创建时依赖唯一索引去重)
pub async fn ensure_account<C>(db: &C, actor: ActorRef) -> Result<accounts::Model, DbErr>
where
    C: ConnectionTrait,
{
    if let Some(existing) = find_account(db, actor).await? {
        return Ok(existing);
    }

    accounts::Entity::insert(accounts::ActiveModel {
        actor_type: Set(actor.actor_type),
        actor_id: Set(actor.actor_id),
        pending_balance: Set(0),
        available_balance: Set(0),
        total_earned: Set(0),
        total_withdrawn: Set(0),
        created_at: Set(Some(Utc::now())),
        updated_at: Set(Some(Utc::now())),
        ..Default::default()
    })
    .on_conflict(
        OnConflict::columns([accounts::Column::ActorType, accounts::Column::ActorId])
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(db)
    .await?;

    find_account(db, actor)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("earnings account {actor}")))
}

/// pending += amount, total_earned += amount
pub async fn credit_pending<C>(db: &C, actor: ActorRef, amount: i64) -> AppResult<()>
where
    C: ConnectionTrait,
{
    ensure_account(db, actor).await?;

    let res = accounts::Entity::update_many()
        .col_expr(
            accounts::Column::PendingBalance,
            Expr::col(accounts::Column::PendingBalance).add(amount),
        )
        .col_expr(
            accounts::Column::TotalEarned,
            Expr::col(accounts::Column::TotalEarned).add(amount),
        )
        .col_expr(accounts::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(accounts::Column::ActorType.eq(actor.actor_type))
        .filter(accounts::Column::ActorId.eq(actor.actor_id))
        .exec(db)
        .await?;

    if res.rows_affected != 1 {
        return Err(AppError::InternalError(format!(
            "Earnings account {actor} was not credited"
        )));
    }
    Ok(())
}

/// pending -= amount, available += amount (要求 pending >= amount)
pub async fn release_pending<C>(db: &C, actor: ActorRef, amount: i64) -> AppResult<()>
where
    C: ConnectionTrait,
{
    let res = accounts::Entity::update_many()
        .col_expr(
            accounts::Column::PendingBalance,
            Expr::col(accounts::Column::PendingBalance).sub(amount),
        )
        .col_expr(
            accounts::Column::AvailableBalance,
            Expr::col(accounts::Column::AvailableBalance).add(amount),
        )
        .col_expr(accounts::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(accounts::Column::ActorType.eq(actor.actor_type))
        .filter(accounts::Column::ActorId.eq(actor.actor_id))
        .filter(accounts::Column::PendingBalance.gte(amount))
        .exec(db)
        .await?;

    if res.rows_affected != 1 {
        return Err(AppError::FailedPrecondition(format!(
            "Pending balance of {actor} is lower than {amount}"
        )));
    }
    Ok(())
}

/// available -= amount, total_withdrawn += amount (要求 available >= amount)
pub async fn withdraw_available<C>(db: &C, actor: ActorRef, amount: i64) -> AppResult<()>
where
    C: ConnectionTrait,
{
    let res = accounts::Entity::update_many()
        .col_expr(
            accounts::Column::AvailableBalance,
            Expr::col(accounts::Column::AvailableBalance).sub(amount),
        )
        .col_expr(
            accounts::Column::TotalWithdrawn,
            Expr::col(accounts::Column::TotalWithdrawn).add(amount),
        )
        .col_expr(accounts::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(accounts::Column::ActorType.eq(actor.actor_type))
        .filter(accounts::Column::ActorId.eq(actor.actor_id))
        .filter(accounts::Column::AvailableBalance.gte(amount))
        .exec(db)
        .await?;

    if res.rows_affected != 1 {
        return Err(AppError::FailedPrecondition(
            "Insufficient available balance for payout".to_string(),
        ));
    }
    Ok(())
}

/// 调用方是否可以操作该账户：管理员不限；合作方账户需属于调用方；
/// 商家 / 员工账户 id 即调用方 id
pub async fn authorize_actor<C>(db: &C, caller: &AuthContext, actor: ActorRef) -> AppResult<()>
where
    C: ConnectionTrait,
{
    if caller.is_admin() {
        return Ok(());
    }
    let owned = match actor.actor_type {
        ActorType::Partner => partners::Entity::find_by_id(actor.actor_id)
            .one(db)
            .await?
            .is_some_and(|p| p.user_id == caller.caller_id),
        ActorType::Vendor | ActorType::Staff => actor.actor_id == caller.caller_id,
    };
    if !owned {
        return Err(AppError::PermissionDenied);
    }
    Ok(())
}
