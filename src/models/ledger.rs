use crate::entities::{ActorType, earnings_account_entity};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 账户的唯一标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct ActorRef {
    pub actor_type: ActorType,
    pub actor_id: i64,
}

impl ActorRef {
    pub fn new(actor_type: ActorType, actor_id: i64) -> Self {
        Self {
            actor_type,
            actor_id,
        }
    }

    pub fn partner(partner_id: i64) -> Self {
        Self::new(ActorType::Partner, partner_id)
    }
}

impl std::fmt::Display for ActorRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.actor_type, self.actor_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LedgerAccountResponse {
    pub actor_type: ActorType,
    pub actor_id: i64,
    pub pending_balance: i64,
    pub available_balance: i64,
    pub total_earned: i64,
    pub total_withdrawn: i64,
}

impl LedgerAccountResponse {
    /// 尚未产生任何收益的账户
    pub fn empty(actor: ActorRef) -> Self {
        Self {
            actor_type: actor.actor_type,
            actor_id: actor.actor_id,
            pending_balance: 0,
            available_balance: 0,
            total_earned: 0,
            total_withdrawn: 0,
        }
    }
}

impl From<earnings_account_entity::Model> for LedgerAccountResponse {
    fn from(m: earnings_account_entity::Model) -> Self {
        Self {
            actor_type: m.actor_type,
            actor_id: m.actor_id,
            pending_balance: m.pending_balance,
            available_balance: m.available_balance,
            total_earned: m.total_earned,
            total_withdrawn: m.total_withdrawn,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreditEarningsRequest {
    /// 入账金额 (美分)，进入 pending
    #[schema(example = 2500)]
    pub amount: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReleaseBalanceRequest {
    /// 从 pending 转入 available 的金额 (美分)
    #[schema(example = 2500)]
    pub amount: i64,
}
