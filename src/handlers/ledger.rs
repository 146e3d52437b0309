use crate::entities::ActorType;
use crate::middlewares::current_auth;
use crate::models::*;
use crate::services::LedgerService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/ledger/{actor_type}/{actor_id}",
    tag = "ledger",
    params(
        ("actor_type" = String, Path, description = "partner / vendor / staff"),
        ("actor_id" = i64, Path, description = "账户ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "收益账户余额", body = LedgerAccountResponse),
        (status = 401, description = "未授权")
    )
)]
pub async fn get_account(
    ledger_service: web::Data<LedgerService>,
    req: HttpRequest,
    path: web::Path<(ActorType, i64)>,
) -> Result<HttpResponse> {
    if let Err(e) = current_auth(&req) {
        return Ok(e.error_response());
    }

    let (actor_type, actor_id) = path.into_inner();
    match ledger_service
        .get_account(ActorRef::new(actor_type, actor_id))
        .await
    {
        Ok(account) => Ok(HttpResponse::Ok().json(ApiResponse::success(account))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn ledger_config(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/ledger/{actor_type}/{actor_id}",
        web::get().to(get_account),
    );
}
