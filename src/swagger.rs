use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{ActorType, BankAccountType, CommissionStatus, PartnerStatus, PayoutStatus};
use crate::handlers;
use crate::models::*;
use crate::rules::{BankDetails, Tier, VendorSplit};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::events::sale_created,
        handlers::events::delivery_confirmed,
        handlers::events::click,
        handlers::partner::signup,
        handlers::partner::get_my_partner,
        handlers::partner::get_partner_stats,
        handlers::partner::list_commissions,
        handlers::partner::get_tier_history,
        handlers::partner::list_tiers,
        handlers::commission::finalize_commission,
        handlers::payout::create_payout,
        handlers::payout::list_payouts,
        handlers::payout::get_payout,
        handlers::ledger::get_account,
        handlers::admin::create_campaign,
        handlers::admin::list_campaigns,
        handlers::admin::update_partner_bonuses,
        handlers::admin::update_partner_status,
        handlers::admin::release_earnings,
        handlers::admin::credit_earnings,
        handlers::admin::release_balance,
        handlers::admin::update_payout_status,
        handlers::admin::reset_monthly_sales,
        handlers::admin::process_batch_payouts,
    ),
    components(
        schemas(
            ActorType,
            PartnerStatus,
            CommissionStatus,
            PayoutStatus,
            BankAccountType,
            BankDetails,
            Tier,
            VendorSplit,
            SaleCreatedEvent,
            DeliveryConfirmedEvent,
            ClickEvent,
            SaleOutcome,
            CreatePartnerRequest,
            PartnerResponse,
            PartnerStats,
            PartnerStatsResponse,
            UpdateBonusesRequest,
            UpdatePartnerStatusRequest,
            TierHistoryResponse,
            CommissionRecordResponse,
            FinalizeCommissionRequest,
            FinalizeCommissionResponse,
            TierChange,
            ReleaseEarningsResponse,
            CreateCampaignRequest,
            CampaignResponse,
            ActorRef,
            LedgerAccountResponse,
            CreditEarningsRequest,
            ReleaseBalanceRequest,
            CreatePayoutRequest,
            PayoutRequestResponse,
            UpdatePayoutStatusRequest,
            PayoutListQuery,
            ListQuery,
            ApiError,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "events", description = "Sale / delivery / click event triggers"),
        (name = "partner", description = "Referral partner API"),
        (name = "commission", description = "Commission finalization API"),
        (name = "payout", description = "Payout request API"),
        (name = "ledger", description = "Earnings ledger API"),
        (name = "admin", description = "Administration API"),
    ),
    info(
        title = "Ledger Backend API",
        version = "1.0.0",
        description = "Earnings ledger & payout engine REST API documentation"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
