use sea_orm_migration::prelude::*;

/// 季节性活动 (额外佣金加成)
#[derive(DeriveIden)]
enum SeasonalCampaigns {
    Table,
    Id,
    Name,
    IsActive,
    StartsAt,
    EndsAt,
    BonusBp,
    CreatedAt,
}

/// 佣金记录，每个 sale_id 最多一条
#[derive(DeriveIden)]
enum CommissionRecords {
    Table,
    Id,
    PartnerId,
    SaleId,
    StoreId,
    CustomerId,
    SaleTotal,
    BaseRateBp,
    ContentBonusBp,
    SeasonalBonusBp,
    CampaignId,
    EffectiveRateBp,
    CommissionAmount,
    Status,
    CreatedAt,
    CompletedAt,
    ReleasedAt,
}

/// 推广点击 / 转化记录
#[derive(DeriveIden)]
enum ClickRecords {
    Table,
    Id,
    PartnerId,
    CustomerId,
    Converted,
    SaleId,
    ConversionAmount,
    ConvertedAt,
    CreatedAt,
}

/// 等级变更历史 (只追加)
#[derive(DeriveIden)]
enum TierHistory {
    Table,
    Id,
    PartnerId,
    PreviousTier,
    NewTier,
    PreviousRateBp,
    NewRateBp,
    PeriodSales,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SeasonalCampaigns::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SeasonalCampaigns::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SeasonalCampaigns::Name)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SeasonalCampaigns::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(SeasonalCampaigns::StartsAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SeasonalCampaigns::EndsAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SeasonalCampaigns::BonusBp)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SeasonalCampaigns::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp())
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CommissionRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CommissionRecords::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CommissionRecords::PartnerId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CommissionRecords::SaleId)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CommissionRecords::StoreId)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CommissionRecords::CustomerId)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CommissionRecords::SaleTotal)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CommissionRecords::BaseRateBp)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CommissionRecords::ContentBonusBp)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CommissionRecords::SeasonalBonusBp)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CommissionRecords::CampaignId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CommissionRecords::EffectiveRateBp)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CommissionRecords::CommissionAmount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CommissionRecords::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(CommissionRecords::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp())
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CommissionRecords::CompletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CommissionRecords::ReleasedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 幂等保证：同一 sale 只能有一条佣金
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_commission_records_sale")
                    .table(CommissionRecords::Table)
                    .col(CommissionRecords::SaleId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_commission_records_partner_status")
                    .table(CommissionRecords::Table)
                    .col(CommissionRecords::PartnerId)
                    .col(CommissionRecords::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ClickRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClickRecords::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ClickRecords::PartnerId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClickRecords::CustomerId)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClickRecords::Converted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(ClickRecords::SaleId).string_len(64).null())
                    .col(
                        ColumnDef::new(ClickRecords::ConversionAmount)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ClickRecords::ConvertedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ClickRecords::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp())
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_click_records_partner_customer")
                    .table(ClickRecords::Table)
                    .col(ClickRecords::PartnerId)
                    .col(ClickRecords::CustomerId)
                    .col(ClickRecords::Converted)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TierHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TierHistory::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TierHistory::PartnerId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TierHistory::PreviousTier)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TierHistory::NewTier)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TierHistory::PreviousRateBp)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TierHistory::NewRateBp)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TierHistory::PeriodSales)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TierHistory::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp())
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_tier_history_partner")
                    .table(TierHistory::Table)
                    .col(TierHistory::PartnerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 删除顺序：历史 -> 点击 -> 佣金 -> 活动
        manager
            .drop_table(Table::drop().if_exists().table(TierHistory::Table).to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(ClickRecords::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(CommissionRecords::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(SeasonalCampaigns::Table)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}
