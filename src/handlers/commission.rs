use crate::middlewares::current_auth;
use crate::models::*;
use crate::services::CommissionService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};

/// 完成佣金 (配送确认后由履约系统或运营调用)
#[utoipa::path(
    post,
    path = "/commissions/finalize",
    tag = "commission",
    request_body = FinalizeCommissionRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "佣金已完成 (或此前已完成)", body = FinalizeCommissionResponse),
        (status = 400, description = "缺少 sale_id"),
        (status = 401, description = "未授权"),
        (status = 404, description = "该订单没有待完成的佣金")
    )
)]
pub async fn finalize_commission(
    commission_service: web::Data<CommissionService>,
    req: HttpRequest,
    request: web::Json<FinalizeCommissionRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = current_auth(&req) {
        return Ok(e.error_response());
    }

    match commission_service.finalize_commission(&request.sale_id).await {
        Ok(result) => Ok(HttpResponse::Ok().json(ApiResponse::success(result))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn commission_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/commissions").route("/finalize", web::post().to(finalize_commission)),
    );
}
