use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter

use ledger_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    handlers,
    middlewares::{AuthMiddleware, create_cors},
    rules::TierSchedule,
    services::*,
    swagger::swagger_config,
    tasks,
    utils::JwtService,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    // 加载配置
    let config = Config::from_toml().map_err(|e| {
        log::error!("Failed to load configuration: {e}");
        std::io::Error::other(e.to_string())
    })?;

    // 创建数据库连接池
    let pool = create_pool(&config.database).await.map_err(|e| {
        log::error!("Failed to create database connection pool: {e}");
        std::io::Error::other(e.to_string())
    })?;

    // 运行数据库迁移
    run_migrations(&pool).await.map_err(|e| {
        log::error!("Failed to run database migrations: {e}");
        std::io::Error::other(e.to_string())
    })?;

    let jwt_service = JwtService::new(&config.jwt.secret, config.jwt.access_token_expires_in);

    // 创建服务
    let schedule = TierSchedule::from_config(&config.commission);
    let ledger_service = LedgerService::new(pool.clone());
    let attribution_service = AttributionService::new(pool.clone());
    let campaign_service = CampaignService::new(pool.clone());
    let tier_service = TierService::new(pool.clone(), schedule.clone());
    let partner_service = PartnerService::new(pool.clone(), schedule);
    let commission_service = CommissionService::new(
        pool.clone(),
        attribution_service.clone(),
        tier_service.clone(),
        config.commission.hold_days,
    );
    let payout_service = PayoutService::new(pool.clone(), config.payout.clone());
    let scheduled = ScheduledOperations::new();

    // 启动后台任务
    tasks::spawn_all(
        commission_service.clone(),
        config.commission.release_interval_secs,
    );

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    let events_config = config.events.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(AuthMiddleware::new(jwt_service.clone()))
            .wrap(create_cors())
            .wrap(Logger::default())
            .app_data(web::Data::new(events_config.clone()))
            .app_data(web::Data::new(ledger_service.clone()))
            .app_data(web::Data::new(attribution_service.clone()))
            .app_data(web::Data::new(campaign_service.clone()))
            .app_data(web::Data::new(tier_service.clone()))
            .app_data(web::Data::new(partner_service.clone()))
            .app_data(web::Data::new(commission_service.clone()))
            .app_data(web::Data::new(payout_service.clone()))
            .app_data(web::Data::new(scheduled.clone()))
            .configure(swagger_config)
            .configure(handlers::events_config)
            .route("/health", web::get().to(handlers::health))
            .service(
                web::scope("/api/v1")
                    .configure(handlers::partner_config)
                    .configure(handlers::commission_config)
                    .configure(handlers::payout_config)
                    .configure(handlers::ledger_config)
                    .configure(handlers::admin_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
