use crate::entities::campaign_entity as campaigns;
use crate::error::{AppError, AppResult};
use crate::models::{
    CampaignResponse, CreateCampaignRequest, ListQuery, PaginatedResponse, PaginationParams,
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

#[derive(Clone)]
pub struct CampaignService {
    pool: DatabaseConnection,
}

impl CampaignService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn create_campaign(&self, req: CreateCampaignRequest) -> AppResult<CampaignResponse> {
        let name = req.name.trim();
        if name.is_empty() || name.len() > 100 {
            return Err(AppError::ValidationError(
                "Campaign name must be 1-100 characters".to_string(),
            ));
        }
        if req.ends_at <= req.starts_at {
            return Err(AppError::ValidationError(
                "Campaign must end after it starts".to_string(),
            ));
        }
        if req.bonus_bp < 0 {
            return Err(AppError::ValidationError(
                "Campaign bonus must not be negative".to_string(),
            ));
        }

        let model = campaigns::ActiveModel {
            name: Set(name.to_string()),
            is_active: Set(req.is_active.unwrap_or(true)),
            starts_at: Set(req.starts_at),
            ends_at: Set(req.ends_at),
            bonus_bp: Set(req.bonus_bp),
            created_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!(
            "Created seasonal campaign {} ({}bp, {} ~ {})",
            model.id,
            model.bonus_bp,
            model.starts_at,
            model.ends_at
        );
        Ok(model.into())
    }

    pub async fn list_campaigns(
        &self,
        query: &ListQuery,
    ) -> AppResult<PaginatedResponse<CampaignResponse>> {
        let params = PaginationParams::from(query);
        let total = campaigns::Entity::find().count(&self.pool).await? as i64;
        let items = campaigns::Entity::find()
            .order_by_desc(campaigns::Column::StartsAt)
            .order_by_desc(campaigns::Column::Id)
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

    /// 当前生效的活动 (多个同时生效时取加成最高者，相同加成取 id 最小)
    pub async fn running_campaign(&self, now: DateTime<Utc>) -> AppResult<Option<CampaignResponse>> {
        Ok(find_running_campaign(&self.pool, now).await?.map(Into::into))
    }
}

pub async fn find_running_campaign<C>(
    db: &C,
    now: DateTime<Utc>,
) -> Result<Option<campaigns::Model>, DbErr>
where
    C: ConnectionTrait,
{
    campaigns::Entity::find()
        .filter(campaigns::Column::IsActive.eq(true))
        .filter(campaigns::Column::StartsAt.lte(now))
        .filter(campaigns::Column::EndsAt.gte(now))
        .order_by_desc(campaigns::Column::BonusBp)
        .order_by_asc(campaigns::Column::Id)
        .one(db)
        .await
}
