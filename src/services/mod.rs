pub mod catalogue;
pub mod promotions;
pub mod sale_migration;
pub mod sale_toggle;
pub mod sales;
pub mod vouchers;
