use crate::middlewares::current_auth;
use crate::models::*;
use crate::services::{CommissionService, PartnerService, TierService};
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/partners",
    tag = "partner",
    request_body = CreatePartnerRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "注册成功", body = PartnerResponse),
        (status = 400, description = "请求参数错误"),
        (status = 422, description = "已注册或推荐码已被占用")
    )
)]
pub async fn signup(
    partner_service: web::Data<PartnerService>,
    req: HttpRequest,
    request: web::Json<CreatePartnerRequest>,
) -> Result<HttpResponse> {
    let ctx = match current_auth(&req) {
        Ok(ctx) => ctx,
        Err(e) => return Ok(e.error_response()),
    };

    match partner_service.signup(ctx.caller_id, request.into_inner()).await {
        Ok(partner) => Ok(HttpResponse::Ok().json(ApiResponse::success(partner))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/partners/me",
    tag = "partner",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "当前账号的合作方资料", body = PartnerResponse),
        (status = 404, description = "未注册合作方")
    )
)]
pub async fn get_my_partner(
    partner_service: web::Data<PartnerService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let ctx = match current_auth(&req) {
        Ok(ctx) => ctx,
        Err(e) => return Ok(e.error_response()),
    };

    match partner_service.get_partner_by_user(ctx.caller_id).await {
        Ok(partner) => Ok(HttpResponse::Ok().json(ApiResponse::success(partner))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/partners/{partner_id}/stats",
    tag = "partner",
    params(
        ("partner_id" = i64, Path, description = "合作方ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "合作方资料与统计", body = PartnerStatsResponse),
        (status = 401, description = "未授权"),
        (status = 404, description = "合作方不存在")
    )
)]
pub async fn get_partner_stats(
    partner_service: web::Data<PartnerService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    if let Err(e) = current_auth(&req) {
        return Ok(e.error_response());
    }

    match partner_service.get_partner_stats(path.into_inner()).await {
        Ok(stats) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": stats
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/partners/{partner_id}/commissions",
    tag = "partner",
    params(
        ("partner_id" = i64, Path, description = "合作方ID"),
        ("page" = Option<u32>, Query, description = "页码"),
        ("per_page" = Option<u32>, Query, description = "每页数量")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "佣金记录 (分页)"),
        (status = 401, description = "未授权")
    )
)]
pub async fn list_commissions(
    commission_service: web::Data<CommissionService>,
    req: HttpRequest,
    path: web::Path<i64>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse> {
    if let Err(e) = current_auth(&req) {
        return Ok(e.error_response());
    }

    match commission_service
        .list_commissions(path.into_inner(), &query)
        .await
    {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": page
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/partners/{partner_id}/tier-history",
    tag = "partner",
    params(
        ("partner_id" = i64, Path, description = "合作方ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "等级变更历史", body = [TierHistoryResponse]),
        (status = 401, description = "未授权")
    )
)]
pub async fn get_tier_history(
    tier_service: web::Data<TierService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    if let Err(e) = current_auth(&req) {
        return Ok(e.error_response());
    }

    match tier_service.tier_history(path.into_inner()).await {
        Ok(history) => Ok(HttpResponse::Ok().json(ApiResponse::success(history))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/tiers",
    tag = "partner",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "等级表 (从低到高)", body = [crate::rules::Tier])
    )
)]
pub async fn list_tiers(tier_service: web::Data<TierService>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::success(tier_service.list_tiers())))
}

pub fn partner_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/partners")
            .route("", web::post().to(signup))
            .route("/me", web::get().to(get_my_partner))
            .route("/{partner_id}/stats", web::get().to(get_partner_stats))
            .route("/{partner_id}/commissions", web::get().to(list_commissions))
            .route("/{partner_id}/tier-history", web::get().to(get_tier_history)),
    )
    .route("/tiers", web::get().to(list_tiers));
}
