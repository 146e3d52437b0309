//! 外部系统推送的事件入口
//!
//! 使用 `X-Event-Secret` 共享密钥认证。处理失败只记录日志，仍返回 200。

use crate::config::EventsConfig;
use crate::models::{
    ApiResponse, ClickEvent, DeliveryConfirmedEvent, SaleCreatedEvent, SaleOutcome,
};
use crate::services::{AttributionService, CommissionService};
use actix_web::{HttpRequest, HttpResponse, Result, web};
use log::{error, info, warn};
use serde_json::json;

const EVENT_SECRET_HEADER: &str = "X-Event-Secret";

fn verify_event_secret(req: &HttpRequest, config: &EventsConfig) -> bool {
    if config.secret.is_empty() {
        return false;
    }
    req.headers()
        .get(EVENT_SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == config.secret)
}

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::failure(
        "UNAUTHENTICATED",
        "Invalid event secret",
    ))
}

#[utoipa::path(
    post,
    path = "/events/sale-created",
    tag = "events",
    request_body = SaleCreatedEvent,
    params(
        ("X-Event-Secret" = String, Header, description = "事件共享密钥")
    ),
    responses(
        (status = 200, description = "事件已接收", body = SaleOutcome),
        (status = 401, description = "密钥错误")
    )
)]
pub async fn sale_created(
    req: HttpRequest,
    config: web::Data<EventsConfig>,
    commission_service: web::Data<CommissionService>,
    event: web::Json<SaleCreatedEvent>,
) -> Result<HttpResponse> {
    if !verify_event_secret(&req, &config) {
        warn!("Rejected sale-created event with invalid secret");
        return Ok(unauthorized());
    }

    let event = event.into_inner();
    match commission_service.handle_sale_created(&event).await {
        Ok(outcome) => {
            info!("Processed sale-created event for sale {}", event.sale_id);
            Ok(HttpResponse::Ok().json(json!({
                "received": true,
                "result": outcome
            })))
        }
        Err(e) => {
            error!(
                "Failed to process sale-created event for sale {}: {e}",
                event.sale_id
            );
            Ok(HttpResponse::Ok().json(json!({
                "received": true,
                "error": format!("Processing failed: {}", e)
            })))
        }
    }
}

#[utoipa::path(
    post,
    path = "/events/delivery-confirmed",
    tag = "events",
    request_body = DeliveryConfirmedEvent,
    params(
        ("X-Event-Secret" = String, Header, description = "事件共享密钥")
    ),
    responses(
        (status = 200, description = "事件已接收"),
        (status = 401, description = "密钥错误")
    )
)]
pub async fn delivery_confirmed(
    req: HttpRequest,
    config: web::Data<EventsConfig>,
    commission_service: web::Data<CommissionService>,
    event: web::Json<DeliveryConfirmedEvent>,
) -> Result<HttpResponse> {
    if !verify_event_secret(&req, &config) {
        warn!("Rejected delivery-confirmed event with invalid secret");
        return Ok(unauthorized());
    }

    match commission_service.finalize_commission(&event.sale_id).await {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({
            "received": true,
            "result": result
        }))),
        // 未经推荐的订单没有佣金，属于正常情况
        Err(crate::error::AppError::NotFound(msg)) => {
            info!("Delivery confirmed without commission: {msg}");
            Ok(HttpResponse::Ok().json(json!({
                "received": true,
                "result": null
            })))
        }
        Err(e) => {
            error!(
                "Failed to finalize commission for sale {}: {e}",
                event.sale_id
            );
            Ok(HttpResponse::Ok().json(json!({
                "received": true,
                "error": format!("Processing failed: {}", e)
            })))
        }
    }
}

#[utoipa::path(
    post,
    path = "/events/click",
    tag = "events",
    request_body = ClickEvent,
    params(
        ("X-Event-Secret" = String, Header, description = "事件共享密钥")
    ),
    responses(
        (status = 200, description = "事件已接收"),
        (status = 401, description = "密钥错误")
    )
)]
pub async fn click(
    req: HttpRequest,
    config: web::Data<EventsConfig>,
    attribution_service: web::Data<AttributionService>,
    event: web::Json<ClickEvent>,
) -> Result<HttpResponse> {
    if !verify_event_secret(&req, &config) {
        warn!("Rejected click event with invalid secret");
        return Ok(unauthorized());
    }

    match attribution_service.record_click(&event).await {
        Ok(click) => Ok(HttpResponse::Ok().json(json!({
            "received": true,
            "click_id": click.id
        }))),
        Err(e) => {
            warn!(
                "Failed to record click for code {}: {e}",
                event.referral_code
            );
            Ok(HttpResponse::Ok().json(json!({
                "received": true,
                "error": format!("Processing failed: {}", e)
            })))
        }
    }
}

pub fn events_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/events")
            .route("/sale-created", web::post().to(sale_created))
            .route("/delivery-confirmed", web::post().to(delivery_confirmed))
            .route("/click", web::post().to(click)),
    );
}
