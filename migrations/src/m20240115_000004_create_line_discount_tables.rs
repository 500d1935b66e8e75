use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240115_000004_create_line_discount_tables"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [LineDiscounts::OrderLineDiscounts, LineDiscounts::CheckoutLineDiscounts] {
            manager
                .create_table(
                    Table::create()
                        .table(table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(LineDiscounts::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(LineDiscounts::SaleId).integer().null())
                        .col(
                            ColumnDef::new(LineDiscounts::PromotionRuleId)
                                .integer()
                                .null(),
                        )
                        .col(ColumnDef::new(LineDiscounts::ChannelId).integer().not_null())
                        .col(
                            ColumnDef::new(LineDiscounts::Amount)
                                .decimal()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [LineDiscounts::CheckoutLineDiscounts, LineDiscounts::OrderLineDiscounts] {
            manager
                .drop_table(Table::drop().table(table).to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden, Clone, Copy)]
enum LineDiscounts {
    OrderLineDiscounts,
    CheckoutLineDiscounts,
    Id,
    SaleId,
    PromotionRuleId,
    ChannelId,
    Amount,
}
