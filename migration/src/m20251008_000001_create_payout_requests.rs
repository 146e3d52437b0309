use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum PayoutRequests {
    Table,
    Id,
    Reference,
    ActorType,
    ActorId,
    Amount,
    LedgerAmount,
    Status,
    HolderName,
    BankName,
    AccountNumber,
    RoutingCode,
    AccountType,
    StoreId,
    GrossAmount,
    CommissionRateBp,
    StoreCut,
    NetPayout,
    ReviewNote,
    CreatedAt,
    UpdatedAt,
    ProcessedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

/// 提现申请
/// - amount: 申请金额
/// - ledger_amount: 实际从账户扣减的金额 (商家为扣除门店抽成后的 net_payout)
/// - gross_amount / commission_rate_bp / store_cut / net_payout 仅商家类型填写
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PayoutRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PayoutRequests::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PayoutRequests::Reference)
                            .string_len(36)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PayoutRequests::ActorType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PayoutRequests::ActorId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PayoutRequests::Amount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PayoutRequests::LedgerAmount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PayoutRequests::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(PayoutRequests::HolderName)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PayoutRequests::BankName)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PayoutRequests::AccountNumber)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PayoutRequests::RoutingCode)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PayoutRequests::AccountType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(PayoutRequests::StoreId).string_len(64).null())
                    .col(
                        ColumnDef::new(PayoutRequests::GrossAmount)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PayoutRequests::CommissionRateBp)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(PayoutRequests::StoreCut).big_integer().null())
                    .col(
                        ColumnDef::new(PayoutRequests::NetPayout)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(PayoutRequests::ReviewNote).text().null())
                    .col(
                        ColumnDef::new(PayoutRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp())
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PayoutRequests::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp())
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PayoutRequests::ProcessedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_payout_requests_reference")
                    .table(PayoutRequests::Table)
                    .col(PayoutRequests::Reference)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 按账户 + 状态查询未完成申请
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_payout_requests_actor_status")
                    .table(PayoutRequests::Table)
                    .col(PayoutRequests::ActorType)
                    .col(PayoutRequests::ActorId)
                    .col(PayoutRequests::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(PayoutRequests::Table)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}
