use crate::middlewares::current_auth;
use crate::models::*;
use crate::services::PayoutService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/payouts",
    tag = "payout",
    request_body = CreatePayoutRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "提现申请已创建", body = PayoutRequestResponse),
        (status = 400, description = "参数错误或银行信息不完整"),
        (status = 403, description = "无权操作该账户"),
        (status = 422, description = "低于最低提现金额或超出可提现余额")
    )
)]
pub async fn create_payout(
    payout_service: web::Data<PayoutService>,
    req: HttpRequest,
    request: web::Json<CreatePayoutRequest>,
) -> Result<HttpResponse> {
    let ctx = match current_auth(&req) {
        Ok(ctx) => ctx,
        Err(e) => return Ok(e.error_response()),
    };

    match payout_service.submit_payout(&ctx, request.into_inner()).await {
        Ok(payout) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            payout,
            "Payout request submitted".to_string(),
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/payouts",
    tag = "payout",
    params(
        ("actor_type" = String, Query, description = "partner / vendor / staff"),
        ("actor_id" = i64, Query, description = "账户ID"),
        ("page" = Option<u32>, Query, description = "页码"),
        ("per_page" = Option<u32>, Query, description = "每页数量")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "提现申请列表 (分页)"),
        (status = 403, description = "无权查看该账户")
    )
)]
pub async fn list_payouts(
    payout_service: web::Data<PayoutService>,
    req: HttpRequest,
    query: web::Query<PayoutListQuery>,
) -> Result<HttpResponse> {
    let ctx = match current_auth(&req) {
        Ok(ctx) => ctx,
        Err(e) => return Ok(e.error_response()),
    };

    match payout_service.list_payouts(&ctx, &query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": page
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/payouts/{payout_id}",
    tag = "payout",
    params(
        ("payout_id" = i64, Path, description = "提现申请ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "提现申请详情", body = PayoutRequestResponse),
        (status = 404, description = "不存在")
    )
)]
pub async fn get_payout(
    payout_service: web::Data<PayoutService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let ctx = match current_auth(&req) {
        Ok(ctx) => ctx,
        Err(e) => return Ok(e.error_response()),
    };

    match payout_service.get_payout(&ctx, path.into_inner()).await {
        Ok(payout) => Ok(HttpResponse::Ok().json(ApiResponse::success(payout))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn payout_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/payouts")
            .route("", web::post().to(create_payout))
            .route("", web::get().to(list_payouts))
            .route("/{payout_id}", web::get().to(get_payout)),
    );
}
