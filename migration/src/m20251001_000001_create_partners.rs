use sea_orm_migration::prelude::*;

/// 推广合作方 (referral / influencer)
#[derive(DeriveIden)]
enum Partners {
    Table,
    Id,
    UserId,
    DisplayName,
    ReferralCode,
    Status,
    BaseRateBp,
    VideoBonusBp,
    CommunityBonusBp,
    Tier,
    TotalRevenue,
    CreatedAt,
    UpdatedAt,
}

/// 合作方按月销售额 (partner_id, 年, 月) -> 累计金额
#[derive(DeriveIden)]
enum PartnerMonthlySales {
    Table,
    Id,
    PartnerId,
    PeriodYear,
    PeriodMonth,
    SalesAmount,
    SaleCount,
    UpdatedAt,
}

/// 收益账户 (合作方 / 商家 / 门店员工共用)
#[derive(DeriveIden)]
enum EarningsAccounts {
    Table,
    Id,
    ActorType,
    ActorId,
    PendingBalance,
    AvailableBalance,
    TotalEarned,
    TotalWithdrawn,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

/// 金额均为最小货币单位 (美分)，费率为 basis points (1% = 100bp)
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Partners::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Partners::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Partners::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Partners::DisplayName)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Partners::ReferralCode)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Partners::Status)
                            .string_len(16)
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(Partners::BaseRateBp).big_integer().not_null())
                    .col(
                        ColumnDef::new(Partners::VideoBonusBp)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Partners::CommunityBonusBp)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Partners::Tier).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Partners::TotalRevenue)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Partners::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp())
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Partners::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp())
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 推荐码唯一（统一存大写，查询时不区分大小写）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_partners_referral_code")
                    .table(Partners::Table)
                    .col(Partners::ReferralCode)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 一个账号只能注册一个合作方
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_partners_user")
                    .table(Partners::Table)
                    .col(Partners::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PartnerMonthlySales::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PartnerMonthlySales::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PartnerMonthlySales::PartnerId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PartnerMonthlySales::PeriodYear)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PartnerMonthlySales::PeriodMonth)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PartnerMonthlySales::SalesAmount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PartnerMonthlySales::SaleCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PartnerMonthlySales::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp())
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // unique (partner_id, period_year, period_month)
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_partner_monthly_sales_period")
                    .table(PartnerMonthlySales::Table)
                    .col(PartnerMonthlySales::PartnerId)
                    .col(PartnerMonthlySales::PeriodYear)
                    .col(PartnerMonthlySales::PeriodMonth)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EarningsAccounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EarningsAccounts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EarningsAccounts::ActorType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EarningsAccounts::ActorId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EarningsAccounts::PendingBalance)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(EarningsAccounts::AvailableBalance)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(EarningsAccounts::TotalEarned)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(EarningsAccounts::TotalWithdrawn)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(EarningsAccounts::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp())
                            .null(),
                    )
                    .col(
                        ColumnDef::new(EarningsAccounts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp())
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // unique (actor_type, actor_id)
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_earnings_accounts_actor")
                    .table(EarningsAccounts::Table)
                    .col(EarningsAccounts::ActorType)
                    .col(EarningsAccounts::ActorId)
                    .unique()
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
                    .table(EarningsAccounts::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(PartnerMonthlySales::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Partners::Table).to_owned())
            .await?;
        Ok(())
    }
}
