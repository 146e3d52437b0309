mod common;

use common::*;
use ledger_backend::entities::{ActorType, PayoutStatus, payout_request_entity as payouts};
use ledger_backend::error::AppError;
use ledger_backend::models::{
    ActorRef, CreatePayoutRequest, PayoutListQuery, UpdatePayoutStatusRequest,
};
use ledger_backend::rules::BankDetails;
use sea_orm::{EntityTrait, PaginatorTrait};

fn request(actor: ActorRef, amount: i64) -> CreatePayoutRequest {
    CreatePayoutRequest {
        actor_id: actor.actor_id,
        actor_type: actor.actor_type,
        amount,
        bank_details: bank_details(),
        store_id: None,
        store_commission_rate_bp: None,
    }
}

fn status(status: PayoutStatus) -> UpdatePayoutStatusRequest {
    UpdatePayoutStatusRequest { status, note: None }
}

/// 为商家 / 员工准备可提现余额
async fn fund(app: &TestApp, actor: ActorRef, amount: i64) {
    app.ledger.credit_pending_earnings(actor, amount).await.unwrap();
    app.ledger.release_pending_earnings(actor, amount).await.unwrap();
}

async fn payout_count(app: &TestApp) -> u64 {
    payouts::Entity::find().count(&app.db).await.unwrap()
}

#[tokio::test]
async fn test_below_minimum_is_rejected_without_persisting() {
    let app = test_app().await;
    let staff = ActorRef::new(ActorType::Staff, 7);
    fund(&app, staff, 10_000).await;

    let err = app
        .payouts
        .submit_payout(&admin(), request(staff, 1_000))
        .await
        .unwrap_err();
    match err {
        AppError::FailedPrecondition(msg) => assert!(msg.contains("minimum payout of 2000")),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(payout_count(&app).await, 0);
}

#[tokio::test]
async fn test_over_balance_is_rejected_without_persisting() {
    let app = test_app().await;
    let staff = ActorRef::new(ActorType::Staff, 7);
    fund(&app, staff, 10_000).await;

    let err = app
        .payouts
        .submit_payout(&admin(), request(staff, 20_000))
        .await
        .unwrap_err();
    match err {
        AppError::FailedPrecondition(msg) => assert!(msg.contains("exceeds available balance")),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(payout_count(&app).await, 0);

    // 从未开户的账户余额视为 0
    let nobody = ActorRef::new(ActorType::Staff, 404);
    let err = app
        .payouts
        .submit_payout(&admin(), request(nobody, 5_000))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::FailedPrecondition(_)));
}

#[tokio::test]
async fn test_incomplete_bank_details_name_the_missing_field() {
    let app = test_app().await;
    let staff = ActorRef::new(ActorType::Staff, 7);
    fund(&app, staff, 10_000).await;

    let mut req = request(staff, 5_000);
    req.bank_details = BankDetails {
        bank_name: "  ".to_string(),
        ..bank_details()
    };
    let err = app.payouts.submit_payout(&admin(), req).await.unwrap_err();
    match err {
        AppError::ValidationError(msg) => assert!(msg.contains("bank name")),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(payout_count(&app).await, 0);
}

#[tokio::test]
async fn test_outstanding_requests_reserve_balance() {
    let app = test_app().await;
    let staff = ActorRef::new(ActorType::Staff, 8);
    fund(&app, staff, 10_000).await;

    let first = app
        .payouts
        .submit_payout(&admin(), request(staff, 6_000))
        .await
        .unwrap();
    assert_eq!(first.status, PayoutStatus::Pending);
    assert_eq!(first.account_number_masked, "********6789");

    // 申请本身不动余额
    let account = app.ledger.get_account(staff).await.unwrap();
    assert_eq!(account.available_balance, 10_000);

    let err = app
        .payouts
        .submit_payout(&admin(), request(staff, 6_000))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::FailedPrecondition(_)));

    // 拒绝后额度释放
    app.payouts
        .update_status(first.id, status(PayoutStatus::Rejected))
        .await
        .unwrap();
    app.payouts
        .submit_payout(&admin(), request(staff, 6_000))
        .await
        .unwrap();
    assert_eq!(payout_count(&app).await, 2);
}

#[tokio::test]
async fn test_vendor_payout_is_split() {
    let app = test_app().await;
    let vendor = ActorRef::new(ActorType::Vendor, 9);
    fund(&app, vendor, 50_000).await;

    let mut req = request(vendor, 50_000);
    req.store_id = Some("store-42".to_string());
    req.store_commission_rate_bp = Some(2_500);
    let created = app.payouts.submit_payout(&admin(), req).await.unwrap();

    assert_eq!(created.amount, 50_000);
    assert_eq!(created.gross_amount, Some(50_000));
    assert_eq!(created.store_cut, Some(12_500));
    assert_eq!(created.net_payout, Some(37_500));
    assert_eq!(created.ledger_amount, 37_500);
    assert_eq!(created.store_id.as_deref(), Some("store-42"));

    app.payouts
        .update_status(created.id, status(PayoutStatus::Approved))
        .await
        .unwrap();
    let paid = app
        .payouts
        .update_status(created.id, status(PayoutStatus::Paid))
        .await
        .unwrap();
    assert_eq!(paid.status, PayoutStatus::Paid);
    assert!(paid.processed_at.is_some());

    let account = app.ledger.get_account(vendor).await.unwrap();
    assert_eq!(account.available_balance, 12_500);
    assert_eq!(account.total_withdrawn, 37_500);
}

#[tokio::test]
async fn test_vendor_payout_requires_store_details() {
    let app = test_app().await;
    let vendor = ActorRef::new(ActorType::Vendor, 9);
    fund(&app, vendor, 50_000).await;

    let err = app
        .payouts
        .submit_payout(&admin(), request(vendor, 20_000))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));

    // 12000 扣 25% 后净额 9000，低于商家最低额度
    let mut req = request(vendor, 12_000);
    req.store_id = Some("store-42".to_string());
    req.store_commission_rate_bp = Some(2_500);
    let err = app.payouts.submit_payout(&admin(), req).await.unwrap_err();
    assert!(matches!(err, AppError::FailedPrecondition(_)));
    assert_eq!(payout_count(&app).await, 0);
}

#[tokio::test]
async fn test_status_transitions_are_enforced() {
    let app = test_app().await;
    let staff = ActorRef::new(ActorType::Staff, 10);
    fund(&app, staff, 10_000).await;

    let created = app
        .payouts
        .submit_payout(&admin(), request(staff, 4_000))
        .await
        .unwrap();

    // pending 不能直接 paid
    let err = app
        .payouts
        .update_status(created.id, status(PayoutStatus::Paid))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::FailedPrecondition(_)));

    app.payouts
        .update_status(created.id, status(PayoutStatus::Approved))
        .await
        .unwrap();
    app.payouts
        .update_status(
            created.id,
            UpdatePayoutStatusRequest {
                status: PayoutStatus::Paid,
                note: Some("wire sent".to_string()),
            },
        )
        .await
        .unwrap();

    // 终态不可回退
    let err = app
        .payouts
        .update_status(created.id, status(PayoutStatus::Approved))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::FailedPrecondition(_)));

    let stored = app.payouts.get_payout(&admin(), created.id).await.unwrap();
    assert_eq!(stored.status, PayoutStatus::Paid);
    assert_eq!(stored.review_note.as_deref(), Some("wire sent"));

    let account = app.ledger.get_account(staff).await.unwrap();
    assert_eq!(account.available_balance, 6_000);
    assert_eq!(account.total_withdrawn, 4_000);

    let err = app
        .payouts
        .update_status(9_999, status(PayoutStatus::Approved))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_callers_only_see_their_own_payouts() {
    let app = test_app().await;
    let staff = ActorRef::new(ActorType::Staff, 30);
    fund(&app, staff, 10_000).await;

    let created = app
        .payouts
        .submit_payout(&user(30), request(staff, 3_000))
        .await
        .unwrap();

    let err = app
        .payouts
        .submit_payout(&user(31), request(staff, 3_000))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::PermissionDenied));

    let err = app
        .payouts
        .get_payout(&user(31), created.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::PermissionDenied));

    let page = app
        .payouts
        .list_payouts(
            &user(30),
            &PayoutListQuery {
                actor_type: ActorType::Staff,
                actor_id: 30,
                page: None,
                per_page: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.data[0].id, created.id);
}

#[tokio::test]
async fn test_partner_payout_from_released_commission() {
    let app = test_app().await;
    let partner = signup_partner(&app, 40, "PAYME01").await;
    let actor = ActorRef::partner(partner.id);

    app.commissions
        .handle_sale_created(&sale("pay-1", Some("PAYME01"), 100_000, "c"))
        .await
        .unwrap();
    app.commissions.finalize_commission("pay-1").await.unwrap();

    // 仍在 pending，不可提现
    let err = app
        .payouts
        .submit_payout(&user(40), request(actor, 5_000))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::FailedPrecondition(_)));

    app.commissions.release_matured_earnings().await.unwrap();

    let created = app
        .payouts
        .submit_payout(&user(40), request(actor, 5_000))
        .await
        .unwrap();
    assert_eq!(created.ledger_amount, 5_000);

    // 其他用户不能替该合作方申请
    let err = app
        .payouts
        .submit_payout(&user(41), request(actor, 5_000))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::PermissionDenied));

    // 合作方收益不可由管理员手工记账
    let err = app
        .ledger
        .credit_pending_earnings(actor, 1_000)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}
