#![allow(dead_code)]

use ledger_backend::config::{CommissionConfig, PayoutConfig};
use ledger_backend::middlewares::AuthContext;
use ledger_backend::models::{CreatePartnerRequest, PartnerResponse, SaleCreatedEvent};
use ledger_backend::rules::{BankDetails, TierSchedule};
use ledger_backend::services::*;
use ledger_backend::utils::Role;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

pub struct TestApp {
    pub db: DatabaseConnection,
    pub ledger: LedgerService,
    pub attribution: AttributionService,
    pub campaigns: CampaignService,
    pub tiers: TierService,
    pub partners: PartnerService,
    pub commissions: CommissionService,
    pub payouts: PayoutService,
}

/// 单连接的内存 SQLite，已执行全部迁移
pub async fn setup_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:".to_string());
    opts.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(opts).await.expect("connect sqlite");
    Migrator::up(&db, None).await.expect("run migrations");
    db
}

/// hold_days = 0，完成的佣金可立即结算
pub async fn test_app() -> TestApp {
    let db = setup_db().await;
    let commission_config = CommissionConfig {
        hold_days: 0,
        ..CommissionConfig::default()
    };
    let schedule = TierSchedule::from_config(&commission_config);

    let ledger = LedgerService::new(db.clone());
    let attribution = AttributionService::new(db.clone());
    let campaigns = CampaignService::new(db.clone());
    let tiers = TierService::new(db.clone(), schedule.clone());
    let partners = PartnerService::new(db.clone(), schedule);
    let commissions = CommissionService::new(
        db.clone(),
        attribution.clone(),
        tiers.clone(),
        commission_config.hold_days,
    );
    let payouts = PayoutService::new(db.clone(), PayoutConfig::default());

    TestApp {
        db,
        ledger,
        attribution,
        campaigns,
        tiers,
        partners,
        commissions,
        payouts,
    }
}

pub fn admin() -> AuthContext {
    AuthContext {
        caller_id: 1,
        role: Role::Admin,
    }
}

pub fn user(caller_id: i64) -> AuthContext {
    AuthContext {
        caller_id,
        role: Role::User,
    }
}

pub async fn signup_partner(app: &TestApp, user_id: i64, code: &str) -> PartnerResponse {
    app.partners
        .signup(
            user_id,
            CreatePartnerRequest {
                display_name: format!("Partner {user_id}"),
                referral_code: Some(code.to_string()),
            },
        )
        .await
        .expect("partner signup")
}

pub fn sale(sale_id: &str, code: Option<&str>, total: i64, customer: &str) -> SaleCreatedEvent {
    SaleCreatedEvent {
        sale_id: sale_id.to_string(),
        referral_code: code.map(str::to_string),
        total_amount: total,
        status: Some("placed".to_string()),
        store_id: "store-1".to_string(),
        customer_id: customer.to_string(),
    }
}

pub fn bank_details() -> BankDetails {
    BankDetails {
        holder_name: "Jane Doe".to_string(),
        bank_name: "First National Bank".to_string(),
        account_number: "0001-2345-6789".to_string(),
        routing_code: "021000021".to_string(),
        account_type: "Checking".to_string(),
    }
}
