//! sea-orm entities for the discount subsystem.
//!
//! The legacy model (sales with catalogue associations and per-channel
//! listings) and the new model (promotions owning channel/predicate/value
//! scoped rules) coexist: the migrator reads the former and writes the
//! latter.

pub mod category;
pub mod channel;
pub mod checkout_line_discount;
pub mod collection;
pub mod order_line_discount;
pub mod product;
pub mod product_variant;
pub mod promotion;
pub mod promotion_rule;
pub mod promotion_rule_channel;
pub mod promotion_translation;
pub mod sale;
pub mod sale_category;
pub mod sale_channel_listing;
pub mod sale_collection;
pub mod sale_product;
pub mod sale_translation;
pub mod sale_variant;
pub mod voucher;
pub mod voucher_channel_listing;
