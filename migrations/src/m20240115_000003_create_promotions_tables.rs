use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240115_000003_create_promotions_tables"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Promotions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Promotions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Promotions::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Promotions::OldSaleId).integer().null())
                    .col(
                        ColumnDef::new(Promotions::StartDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Promotions::EndDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Promotions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Promotions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // One promotion per migrated sale; re-runs rely on this staying unique.
        manager
            .create_index(
                Index::create()
                    .name("idx_promotions_old_sale_id")
                    .table(Promotions::Table)
                    .col(Promotions::OldSaleId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PromotionRules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PromotionRules::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PromotionRules::PromotionId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PromotionRules::Name)
                            .string_len(255)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(PromotionRules::CataloguePredicate)
                            .json()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PromotionRules::RewardValueType)
                            .string_len(32)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PromotionRules::RewardValue)
                            .decimal()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_promotion_rules_promotion")
                            .from(PromotionRules::Table, PromotionRules::PromotionId)
                            .to(Promotions::Table, Promotions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PromotionRuleChannels::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PromotionRuleChannels::RuleId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PromotionRuleChannels::ChannelId)
                            .integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(PromotionRuleChannels::RuleId)
                            .col(PromotionRuleChannels::ChannelId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_promotion_rule_channels_rule")
                            .from(
                                PromotionRuleChannels::Table,
                                PromotionRuleChannels::RuleId,
                            )
                            .to(PromotionRules::Table, PromotionRules::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PromotionTranslations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PromotionTranslations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PromotionTranslations::PromotionId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PromotionTranslations::LanguageCode)
                            .string_len(35)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PromotionTranslations::Name)
                            .string_len(255)
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_promotion_translations_promotion")
                            .from(
                                PromotionTranslations::Table,
                                PromotionTranslations::PromotionId,
                            )
                            .to(Promotions::Table, Promotions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PromotionTranslations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PromotionRuleChannels::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PromotionRules::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Promotions::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Promotions {
    Table,
    Id,
    Name,
    OldSaleId,
    StartDate,
    EndDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PromotionRules {
    Table,
    Id,
    PromotionId,
    Name,
    CataloguePredicate,
    RewardValueType,
    RewardValue,
}

#[derive(DeriveIden)]
enum PromotionRuleChannels {
    Table,
    RuleId,
    ChannelId,
}

#[derive(DeriveIden)]
enum PromotionTranslations {
    Table,
    Id,
    PromotionId,
    LanguageCode,
    Name,
}
