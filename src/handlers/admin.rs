//! 管理员接口 (role = admin)

use crate::entities::ActorType;
use crate::middlewares::require_admin;
use crate::models::*;
use crate::services::{
    CampaignService, CommissionService, LedgerService, PartnerService, PayoutService,
    ScheduledOperations,
};
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/admin/campaigns",
    tag = "admin",
    request_body = CreateCampaignRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "活动已创建", body = CampaignResponse),
        (status = 400, description = "参数错误"),
        (status = 403, description = "非管理员")
    )
)]
pub async fn create_campaign(
    campaign_service: web::Data<CampaignService>,
    req: HttpRequest,
    request: web::Json<CreateCampaignRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = require_admin(&req) {
        return Ok(e.error_response());
    }

    match campaign_service.create_campaign(request.into_inner()).await {
        Ok(campaign) => Ok(HttpResponse::Ok().json(ApiResponse::success(campaign))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/campaigns",
    tag = "admin",
    params(
        ("page" = Option<u32>, Query, description = "页码"),
        ("per_page" = Option<u32>, Query, description = "每页数量")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "活动列表 (分页)"),
        (status = 403, description = "非管理员")
    )
)]
pub async fn list_campaigns(
    campaign_service: web::Data<CampaignService>,
    req: HttpRequest,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse> {
    if let Err(e) = require_admin(&req) {
        return Ok(e.error_response());
    }

    match campaign_service.list_campaigns(&query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": page
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/admin/partners/{partner_id}/bonuses",
    tag = "admin",
    request_body = UpdateBonusesRequest,
    params(
        ("partner_id" = i64, Path, description = "合作方ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "内容加成已更新", body = PartnerResponse),
        (status = 404, description = "合作方不存在")
    )
)]
pub async fn update_partner_bonuses(
    partner_service: web::Data<PartnerService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<UpdateBonusesRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = require_admin(&req) {
        return Ok(e.error_response());
    }

    match partner_service
        .update_bonuses(path.into_inner(), request.into_inner())
        .await
    {
        Ok(partner) => Ok(HttpResponse::Ok().json(ApiResponse::success(partner))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/admin/partners/{partner_id}/status",
    tag = "admin",
    request_body = UpdatePartnerStatusRequest,
    params(
        ("partner_id" = i64, Path, description = "合作方ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "状态已更新", body = PartnerResponse),
        (status = 404, description = "合作方不存在")
    )
)]
pub async fn update_partner_status(
    partner_service: web::Data<PartnerService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<UpdatePartnerStatusRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = require_admin(&req) {
        return Ok(e.error_response());
    }

    match partner_service
        .update_status(path.into_inner(), request.status)
        .await
    {
        Ok(partner) => Ok(HttpResponse::Ok().json(ApiResponse::success(partner))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/earnings/release",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "已结算的佣金数量与金额", body = ReleaseEarningsResponse),
        (status = 403, description = "非管理员")
    )
)]
pub async fn release_earnings(
    commission_service: web::Data<CommissionService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    if let Err(e) = require_admin(&req) {
        return Ok(e.error_response());
    }

    match commission_service.release_matured_earnings().await {
        Ok(summary) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": summary,
            "message": "结算完成"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/ledger/{actor_type}/{actor_id}/credit",
    tag = "admin",
    request_body = CreditEarningsRequest,
    params(
        ("actor_type" = String, Path, description = "vendor / staff"),
        ("actor_id" = i64, Path, description = "账户ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "已记入待结算收益", body = LedgerAccountResponse),
        (status = 400, description = "参数错误")
    )
)]
pub async fn credit_earnings(
    ledger_service: web::Data<LedgerService>,
    req: HttpRequest,
    path: web::Path<(ActorType, i64)>,
    request: web::Json<CreditEarningsRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = require_admin(&req) {
        return Ok(e.error_response());
    }

    let (actor_type, actor_id) = path.into_inner();
    match ledger_service
        .credit_pending_earnings(ActorRef::new(actor_type, actor_id), request.amount)
        .await
    {
        Ok(account) => Ok(HttpResponse::Ok().json(ApiResponse::success(account))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/ledger/{actor_type}/{actor_id}/release",
    tag = "admin",
    request_body = ReleaseBalanceRequest,
    params(
        ("actor_type" = String, Path, description = "vendor / staff"),
        ("actor_id" = i64, Path, description = "账户ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "已转为可提现", body = LedgerAccountResponse),
        (status = 422, description = "待结算余额不足")
    )
)]
pub async fn release_balance(
    ledger_service: web::Data<LedgerService>,
    req: HttpRequest,
    path: web::Path<(ActorType, i64)>,
    request: web::Json<ReleaseBalanceRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = require_admin(&req) {
        return Ok(e.error_response());
    }

    let (actor_type, actor_id) = path.into_inner();
    match ledger_service
        .release_pending_earnings(ActorRef::new(actor_type, actor_id), request.amount)
        .await
    {
        Ok(account) => Ok(HttpResponse::Ok().json(ApiResponse::success(account))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/admin/payouts/{payout_id}/status",
    tag = "admin",
    request_body = UpdatePayoutStatusRequest,
    params(
        ("payout_id" = i64, Path, description = "提现申请ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "状态已更新", body = PayoutRequestResponse),
        (status = 404, description = "不存在"),
        (status = 422, description = "不允许的状态流转或余额不足")
    )
)]
pub async fn update_payout_status(
    payout_service: web::Data<PayoutService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<UpdatePayoutStatusRequest>,
) -> Result<HttpResponse> {
    let admin = match require_admin(&req) {
        Ok(ctx) => ctx,
        Err(e) => return Ok(e.error_response()),
    };

    let payout_id = path.into_inner();
    log::info!(
        "Admin {} updating payout {payout_id} to {}",
        admin.caller_id,
        request.status
    );
    match payout_service
        .update_status(payout_id, request.into_inner())
        .await
    {
        Ok(payout) => Ok(HttpResponse::Ok().json(ApiResponse::success(payout))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/scheduled/reset-monthly-sales",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 501, description = "尚未实现")
    )
)]
pub async fn reset_monthly_sales(
    scheduled: web::Data<ScheduledOperations>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    if let Err(e) = require_admin(&req) {
        return Ok(e.error_response());
    }

    match scheduled.reset_monthly_sales().await {
        Ok(count) => Ok(HttpResponse::Ok().json(ApiResponse::success(count))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/scheduled/process-batch-payouts",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 501, description = "尚未实现")
    )
)]
pub async fn process_batch_payouts(
    scheduled: web::Data<ScheduledOperations>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    if let Err(e) = require_admin(&req) {
        return Ok(e.error_response());
    }

    match scheduled.process_batch_payouts().await {
        Ok(count) => Ok(HttpResponse::Ok().json(ApiResponse::success(count))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/campaigns", web::post().to(create_campaign))
            .route("/campaigns", web::get().to(list_campaigns))
            .route(
                "/partners/{partner_id}/bonuses",
                web::put().to(update_partner_bonuses),
            )
            .route(
                "/partners/{partner_id}/status",
                web::put().to(update_partner_status),
            )
            .route("/earnings/release", web::post().to(release_earnings))
            .route(
                "/ledger/{actor_type}/{actor_id}/credit",
                web::post().to(credit_earnings),
            )
            .route(
                "/ledger/{actor_type}/{actor_id}/release",
                web::post().to(release_balance),
            )
            .route(
                "/payouts/{payout_id}/status",
                web::put().to(update_payout_status),
            )
            .route(
                "/scheduled/reset-monthly-sales",
                web::post().to(reset_monthly_sales),
            )
            .route(
                "/scheduled/process-batch-payouts",
                web::post().to(process_batch_payouts),
            ),
    );
}
