pub mod common;
pub mod promotions;
pub mod sales;
pub mod vouchers;
