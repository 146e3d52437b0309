mod common;

use chrono::{Duration, Utc};
use common::*;
use ledger_backend::entities::{
    CommissionStatus, click_record_entity as clicks, commission_record_entity as commissions,
    monthly_sales_entity as monthly, partner_entity as partners,
};
use ledger_backend::error::AppError;
use ledger_backend::models::{
    ActorRef, ClickEvent, CreateCampaignRequest, SaleOutcome, UpdateBonusesRequest,
};
use ledger_backend::entities::PartnerStatus;
use ledger_backend::rules::SalesPeriod;
use ledger_backend::services::commission_service::monthly_sales;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};

#[tokio::test]
async fn test_sale_creates_pending_commission_with_content_bonus() {
    let app = test_app().await;
    let partner = signup_partner(&app, 10, "jane2026").await;
    assert_eq!(partner.referral_code, "JANE2026");
    assert_eq!(partner.tier, "Bronze");
    assert_eq!(partner.base_rate_bp, 500);

    app.partners
        .update_bonuses(
            partner.id,
            UpdateBonusesRequest {
                video_bonus_bp: Some(5_000),
                community_bonus_bp: None,
            },
        )
        .await
        .unwrap();

    // 1000.00 × 5% × (1 + 0.5) = 75.00
    let outcome = app
        .commissions
        .handle_sale_created(&sale("sale-1", Some("JANE2026"), 100_000, "cust-1"))
        .await
        .unwrap();

    let SaleOutcome::Created { commission } = outcome else {
        panic!("expected a created commission, got {outcome:?}");
    };
    assert_eq!(commission.effective_rate_bp, 750);
    assert_eq!(commission.commission_amount, 7_500);
    assert_eq!(commission.content_bonus_bp, 5_000);
    assert_eq!(commission.seasonal_bonus_bp, 0);
    assert_eq!(commission.status, CommissionStatus::Pending);

    let sales = monthly_sales(&app.db, partner.id, SalesPeriod::current())
        .await
        .unwrap();
    assert_eq!(sales, 100_000);
}

#[tokio::test]
async fn test_duplicate_sale_event_is_counted_once() {
    let app = test_app().await;
    let partner = signup_partner(&app, 11, "DUPE01").await;
    let event = sale("sale-dup", Some("DUPE01"), 40_000, "cust-1");

    let first = app.commissions.handle_sale_created(&event).await.unwrap();
    assert!(matches!(first, SaleOutcome::Created { .. }));
    let second = app.commissions.handle_sale_created(&event).await.unwrap();
    assert!(matches!(second, SaleOutcome::Duplicate { .. }));

    let count = commissions::Entity::find()
        .filter(commissions::Column::SaleId.eq("sale-dup"))
        .count(&app.db)
        .await
        .unwrap();
    assert_eq!(count, 1);

    let sales = monthly_sales(&app.db, partner.id, SalesPeriod::current())
        .await
        .unwrap();
    assert_eq!(sales, 40_000);

    let stored = partners::Entity::find_by_id(partner.id)
        .one(&app.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.total_revenue, 40_000);
}

#[tokio::test]
async fn test_sales_without_matching_partner_are_skipped() {
    let app = test_app().await;
    let partner = signup_partner(&app, 12, "ACTIVE01").await;

    let none = app
        .commissions
        .handle_sale_created(&sale("s-none", None, 10_000, "c"))
        .await
        .unwrap();
    assert!(matches!(none, SaleOutcome::NoReferral));

    let blank = app
        .commissions
        .handle_sale_created(&sale("s-blank", Some("   "), 10_000, "c"))
        .await
        .unwrap();
    assert!(matches!(blank, SaleOutcome::NoReferral));

    let unknown = app
        .commissions
        .handle_sale_created(&sale("s-unknown", Some("NOPE99"), 10_000, "c"))
        .await
        .unwrap();
    assert!(matches!(unknown, SaleOutcome::UnknownReferral { .. }));

    app.partners
        .update_status(partner.id, PartnerStatus::Inactive)
        .await
        .unwrap();
    let inactive = app
        .commissions
        .handle_sale_created(&sale("s-inactive", Some("active01"), 10_000, "c"))
        .await
        .unwrap();
    assert!(matches!(inactive, SaleOutcome::UnknownReferral { .. }));

    let count = commissions::Entity::find().count(&app.db).await.unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_referral_code_match_is_case_insensitive() {
    let app = test_app().await;
    signup_partner(&app, 13, "MiXeD42").await;

    let outcome = app
        .commissions
        .handle_sale_created(&sale("s-case", Some(" mixed42 "), 10_000, "c"))
        .await
        .unwrap();
    assert!(matches!(outcome, SaleOutcome::Created { .. }));
}

#[tokio::test]
async fn test_oldest_unconverted_click_is_converted() {
    let app = test_app().await;
    let partner = signup_partner(&app, 14, "CLICKS1").await;

    let click = ClickEvent {
        referral_code: "clicks1".to_string(),
        customer_id: "cust-9".to_string(),
    };
    let first = app.attribution.record_click(&click).await.unwrap();
    let second = app.attribution.record_click(&click).await.unwrap();

    let event = sale("s-click", Some("CLICKS1"), 25_000, "cust-9");
    app.commissions.handle_sale_created(&event).await.unwrap();
    // 重复投递不会再消耗点击
    app.commissions.handle_sale_created(&event).await.unwrap();

    let rows = clicks::Entity::find()
        .filter(clicks::Column::PartnerId.eq(partner.id))
        .order_by_asc(clicks::Column::Id)
        .all(&app.db)
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, first.id);
    assert!(rows[0].converted);
    assert_eq!(rows[0].sale_id.as_deref(), Some("s-click"));
    assert_eq!(rows[0].conversion_amount, Some(25_000));
    assert_eq!(rows[1].id, second.id);
    assert!(!rows[1].converted);
}

#[tokio::test]
async fn test_sale_without_click_still_creates_commission() {
    let app = test_app().await;
    signup_partner(&app, 15, "NOCLICK").await;

    let outcome = app
        .commissions
        .handle_sale_created(&sale("s-noclick", Some("NOCLICK"), 10_000, "cust-x"))
        .await
        .unwrap();
    assert!(matches!(outcome, SaleOutcome::Created { .. }));
}

#[tokio::test]
async fn test_highest_running_campaign_bonus_applies() {
    let app = test_app().await;
    signup_partner(&app, 16, "SEASON1").await;
    let now = Utc::now();

    for (name, bonus, active) in [("Small", 1_000, true), ("Big", 3_000, true), ("Off", 9_000, false)] {
        app.campaigns
            .create_campaign(CreateCampaignRequest {
                name: name.to_string(),
                starts_at: now - Duration::days(1),
                ends_at: now + Duration::days(1),
                bonus_bp: bonus,
                is_active: Some(active),
            })
            .await
            .unwrap();
    }
    // 已结束的活动不参与
    app.campaigns
        .create_campaign(CreateCampaignRequest {
            name: "Expired".to_string(),
            starts_at: now - Duration::days(10),
            ends_at: now - Duration::days(5),
            bonus_bp: 8_000,
            is_active: Some(true),
        })
        .await
        .unwrap();

    let running = app.campaigns.running_campaign(Utc::now()).await.unwrap();
    assert_eq!(running.map(|c| c.name), Some("Big".to_string()));

    let outcome = app
        .commissions
        .handle_sale_created(&sale("s-season", Some("SEASON1"), 100_000, "c"))
        .await
        .unwrap();
    let SaleOutcome::Created { commission } = outcome else {
        panic!("expected a created commission");
    };
    // 5% × (1 + 0.3) = 6.5%
    assert_eq!(commission.seasonal_bonus_bp, 3_000);
    assert_eq!(commission.effective_rate_bp, 650);
    assert_eq!(commission.commission_amount, 6_500);
    assert!(commission.campaign_id.is_some());
}

#[tokio::test]
async fn test_finalize_twice_credits_once() {
    let app = test_app().await;
    let partner = signup_partner(&app, 17, "FINAL01").await;
    app.commissions
        .handle_sale_created(&sale("s-final", Some("FINAL01"), 100_000, "c"))
        .await
        .unwrap();

    let first = app.commissions.finalize_commission("s-final").await.unwrap();
    assert!(!first.already_completed);
    assert_eq!(first.partner_id, partner.id);
    assert_eq!(first.commission_amount, 5_000);

    let second = app.commissions.finalize_commission("s-final").await.unwrap();
    assert!(second.already_completed);
    assert_eq!(second.commission_amount, 5_000);

    let account = app
        .ledger
        .get_account(ActorRef::partner(partner.id))
        .await
        .unwrap();
    assert_eq!(account.pending_balance, 5_000);
    assert_eq!(account.total_earned, 5_000);
    assert_eq!(account.available_balance, 0);

    let record = commissions::Entity::find()
        .filter(commissions::Column::SaleId.eq("s-final"))
        .one(&app.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.status, CommissionStatus::Completed);
    assert!(record.completed_at.is_some());
}

#[tokio::test]
async fn test_finalize_unknown_sale_is_not_found() {
    let app = test_app().await;
    let err = app
        .commissions
        .finalize_commission("missing-sale")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = app.commissions.finalize_commission("  ").await.unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}

#[tokio::test]
async fn test_finalize_upgrades_tier_to_gold() {
    let app = test_app().await;
    let partner = signup_partner(&app, 18, "GOLDIE").await;

    // 当月销售额 16000.00，高于 Gold (15000.00)、低于 Platinum (30000.00)
    app.commissions
        .handle_sale_created(&sale("s-gold", Some("GOLDIE"), 1_600_000, "c"))
        .await
        .unwrap();
    let result = app.commissions.finalize_commission("s-gold").await.unwrap();

    let change = result.tier_change.expect("tier should change");
    assert_eq!(change.previous_tier, "Bronze");
    assert_eq!(change.new_tier, "Gold");
    assert_eq!(change.new_rate_bp, 750);
    assert_eq!(change.period_sales, 1_600_000);

    let stored = app.partners.get_partner(partner.id).await.unwrap();
    assert_eq!(stored.tier, "Gold");
    assert_eq!(stored.base_rate_bp, 750);

    let history = app.tiers.tier_history(partner.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].new_tier, "Gold");

    // 再次评估等级不变，不追加历史
    assert!(app.tiers.evaluate_partner(partner.id).await.unwrap().is_none());
    assert_eq!(app.tiers.tier_history(partner.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_tier_downgrades_when_month_sales_drop() {
    let app = test_app().await;
    let partner = signup_partner(&app, 25, "DOWN01").await;

    app.commissions
        .handle_sale_created(&sale("s-down", Some("DOWN01"), 1_600_000, "c"))
        .await
        .unwrap();
    app.commissions.finalize_commission("s-down").await.unwrap();
    assert_eq!(app.partners.get_partner(partner.id).await.unwrap().tier, "Gold");

    // 当月销售额回落 (例如退款冲销) 到所有门槛以下
    let period = SalesPeriod::current();
    monthly::Entity::update_many()
        .col_expr(monthly::Column::SalesAmount, Expr::value(100_000i64))
        .filter(monthly::Column::PartnerId.eq(partner.id))
        .filter(monthly::Column::PeriodYear.eq(period.year))
        .filter(monthly::Column::PeriodMonth.eq(period.month_i16()))
        .exec(&app.db)
        .await
        .unwrap();

    let change = app
        .tiers
        .evaluate_partner(partner.id)
        .await
        .unwrap()
        .expect("tier should drop");
    assert_eq!(change.previous_tier, "Gold");
    assert_eq!(change.new_tier, "Bronze");
    assert_eq!(change.new_rate_bp, 500);
    assert_eq!(change.period_sales, 100_000);

    let stored = app.partners.get_partner(partner.id).await.unwrap();
    assert_eq!(stored.tier, "Bronze");
    assert_eq!(stored.base_rate_bp, 500);

    let history = app.tiers.tier_history(partner.id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].previous_tier, "Gold");
    assert_eq!(history[0].new_tier, "Bronze");
    assert_eq!(history[1].new_tier, "Gold");
}

#[tokio::test]
async fn test_commission_keeps_rate_snapshot_after_tier_change() {
    let app = test_app().await;
    signup_partner(&app, 19, "SNAP01").await;

    app.commissions
        .handle_sale_created(&sale("s-big", Some("SNAP01"), 1_600_000, "c"))
        .await
        .unwrap();
    app.commissions
        .handle_sale_created(&sale("s-small", Some("SNAP01"), 10_000, "c"))
        .await
        .unwrap();
    app.commissions.finalize_commission("s-big").await.unwrap();

    let small = commissions::Entity::find()
        .filter(commissions::Column::SaleId.eq("s-small"))
        .one(&app.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(small.base_rate_bp, 500);
    assert_eq!(small.commission_amount, 500);
}

#[tokio::test]
async fn test_release_moves_pending_to_available_once() {
    let app = test_app().await;
    let partner = signup_partner(&app, 20, "RELEASE").await;
    app.commissions
        .handle_sale_created(&sale("s-rel", Some("RELEASE"), 100_000, "c"))
        .await
        .unwrap();
    // 未完成的佣金不结算
    let summary = app.commissions.release_matured_earnings().await.unwrap();
    assert_eq!(summary.released_count, 0);

    app.commissions.finalize_commission("s-rel").await.unwrap();

    let summary = app.commissions.release_matured_earnings().await.unwrap();
    assert_eq!(summary.released_count, 1);
    assert_eq!(summary.released_amount, 5_000);

    let again = app.commissions.release_matured_earnings().await.unwrap();
    assert_eq!(again.released_count, 0);

    let account = app
        .ledger
        .get_account(ActorRef::partner(partner.id))
        .await
        .unwrap();
    assert_eq!(account.pending_balance, 0);
    assert_eq!(account.available_balance, 5_000);
    assert_eq!(account.total_earned, 5_000);
}

#[tokio::test]
async fn test_partner_stats_aggregate() {
    let app = test_app().await;
    let partner = signup_partner(&app, 21, "STATS01").await;

    let click = ClickEvent {
        referral_code: "STATS01".to_string(),
        customer_id: "c1".to_string(),
    };
    for _ in 0..4 {
        app.attribution.record_click(&click).await.unwrap();
    }
    app.commissions
        .handle_sale_created(&sale("st-1", Some("STATS01"), 100_000, "c1"))
        .await
        .unwrap();
    app.commissions
        .handle_sale_created(&sale("st-2", Some("STATS01"), 20_000, "c2"))
        .await
        .unwrap();
    app.commissions.finalize_commission("st-1").await.unwrap();

    let resp = app.partners.get_partner_stats(partner.id).await.unwrap();
    let stats = resp.stats;
    assert_eq!(stats.total_commissions, 5_000);
    assert_eq!(stats.completed_commission_count, 1);
    assert_eq!(stats.pending_commissions, 1_000);
    assert_eq!(stats.pending_commission_count, 1);
    assert_eq!(stats.total_clicks, 4);
    assert_eq!(stats.total_conversions, 1);
    assert_eq!(stats.conversion_rate, 25.0);
    assert_eq!(stats.current_tier, "Bronze");
    assert_eq!(stats.current_month_sales, 120_000);
    assert_eq!(stats.ledger.pending_balance, 5_000);

    let err = app.partners.get_partner_stats(9_999).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    let err = app.partners.get_partner_stats(0).await.unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}

#[tokio::test]
async fn test_signup_rules() {
    let app = test_app().await;
    signup_partner(&app, 22, "TAKEN1").await;

    let generated = app
        .partners
        .signup(
            23,
            ledger_backend::models::CreatePartnerRequest {
                display_name: "Generated".to_string(),
                referral_code: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(generated.referral_code.len(), 8);

    let taken = app
        .partners
        .signup(
            24,
            ledger_backend::models::CreatePartnerRequest {
                display_name: "Copycat".to_string(),
                referral_code: Some("taken1".to_string()),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(taken, AppError::FailedPrecondition(_)));

    let twice = app
        .partners
        .signup(
            22,
            ledger_backend::models::CreatePartnerRequest {
                display_name: "Again".to_string(),
                referral_code: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(twice, AppError::FailedPrecondition(_)));

    // 注册时即开立收益账户
    let account = app
        .ledger
        .get_account(ActorRef::partner(generated.id))
        .await
        .unwrap();
    assert_eq!(account.total_earned, 0);
}
