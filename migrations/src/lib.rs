pub use sea_orm_migration::prelude::*;

mod m20240115_000001_create_catalogue_tables;
mod m20240115_000002_create_sales_tables;
mod m20240115_000003_create_promotions_tables;
mod m20240115_000004_create_line_discount_tables;
mod m20240115_000005_create_voucher_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240115_000001_create_catalogue_tables::Migration),
            Box::new(m20240115_000002_create_sales_tables::Migration),
            Box::new(m20240115_000003_create_promotions_tables::Migration),
            Box::new(m20240115_000004_create_line_discount_tables::Migration),
            Box::new(m20240115_000005_create_voucher_tables::Migration),
        ]
    }
}
