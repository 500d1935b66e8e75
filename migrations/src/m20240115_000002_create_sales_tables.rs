use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240115_000002_create_sales_tables"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Sales::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sales::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sales::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Sales::Type)
                            .string_len(32)
                            .not_null()
                            .default("fixed"),
                    )
                    .col(
                        ColumnDef::new(Sales::StartDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Sales::EndDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Sales::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Sales::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Sales::NotificationSentDatetime)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SaleChannelListings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SaleChannelListings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SaleChannelListings::SaleId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SaleChannelListings::ChannelId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SaleChannelListings::DiscountValue)
                            .decimal()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sale_channel_listings_sale")
                            .from(SaleChannelListings::Table, SaleChannelListings::SaleId)
                            .to(Sales::Table, Sales::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sale_channel_listings_sale_channel")
                    .table(SaleChannelListings::Table)
                    .col(SaleChannelListings::SaleId)
                    .col(SaleChannelListings::ChannelId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        for (table, entity_col) in [
            (SaleCatalogue::SaleCollections, SaleCatalogue::CollectionId),
            (SaleCatalogue::SaleCategories, SaleCatalogue::CategoryId),
            (SaleCatalogue::SaleProducts, SaleCatalogue::ProductId),
            (SaleCatalogue::SaleVariants, SaleCatalogue::ProductVariantId),
        ] {
            manager
                .create_table(
                    Table::create()
                        .table(table)
                        .if_not_exists()
                        .col(ColumnDef::new(SaleCatalogue::SaleId).integer().not_null())
                        .col(ColumnDef::new(entity_col).integer().not_null())
                        .primary_key(
                            Index::create().col(SaleCatalogue::SaleId).col(entity_col),
                        )
                        .to_owned(),
                )
                .await?;
        }

        manager
            .create_table(
                Table::create()
                    .table(SaleTranslations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SaleTranslations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SaleTranslations::SaleId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SaleTranslations::LanguageCode)
                            .string_len(35)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SaleTranslations::Name)
                            .string_len(255)
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sale_translations_sale")
                            .from(SaleTranslations::Table, SaleTranslations::SaleId)
                            .to(Sales::Table, Sales::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SaleTranslations::Table).to_owned())
            .await?;
        for table in [
            SaleCatalogue::SaleVariants,
            SaleCatalogue::SaleProducts,
            SaleCatalogue::SaleCategories,
            SaleCatalogue::SaleCollections,
        ] {
            manager
                .drop_table(Table::drop().table(table).to_owned())
                .await?;
        }
        manager
            .drop_table(Table::drop().table(SaleChannelListings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sales::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Sales {
    Table,
    Id,
    Name,
    Type,
    StartDate,
    EndDate,
    CreatedAt,
    UpdatedAt,
    NotificationSentDatetime,
}

#[derive(DeriveIden)]
enum SaleChannelListings {
    Table,
    Id,
    SaleId,
    ChannelId,
    DiscountValue,
}

#[derive(DeriveIden, Clone, Copy)]
enum SaleCatalogue {
    SaleCollections,
    SaleCategories,
    SaleProducts,
    SaleVariants,
    SaleId,
    CollectionId,
    CategoryId,
    ProductId,
    ProductVariantId,
}

#[derive(DeriveIden)]
enum SaleTranslations {
    Table,
    Id,
    SaleId,
    LanguageCode,
    Name,
}
