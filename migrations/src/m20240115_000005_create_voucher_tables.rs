use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240115_000005_create_voucher_tables"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Vouchers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Vouchers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Vouchers::Name).string_len(255).null())
                    .col(
                        ColumnDef::new(Vouchers::Code)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Vouchers::Type)
                            .string_len(32)
                            .not_null()
                            .default("fixed"),
                    )
                    .col(
                        ColumnDef::new(Vouchers::StartDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Vouchers::EndDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(VoucherChannelListings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VoucherChannelListings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(VoucherChannelListings::VoucherId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VoucherChannelListings::ChannelId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VoucherChannelListings::DiscountValue)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VoucherChannelListings::MinSpent)
                            .decimal()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_voucher_channel_listings_voucher")
                            .from(
                                VoucherChannelListings::Table,
                                VoucherChannelListings::VoucherId,
                            )
                            .to(Vouchers::Table, Vouchers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_voucher_channel_listings_voucher_channel")
                    .table(VoucherChannelListings::Table)
                    .col(VoucherChannelListings::VoucherId)
                    .col(VoucherChannelListings::ChannelId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VoucherChannelListings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Vouchers::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Vouchers {
    Table,
    Id,
    Name,
    Code,
    Type,
    StartDate,
    EndDate,
}

#[derive(DeriveIden)]
enum VoucherChannelListings {
    Table,
    Id,
    VoucherId,
    ChannelId,
    DiscountValue,
    MinSpent,
}
