//! Voucher read resolvers.

use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::Serialize;
use utoipa::ToSchema;

use crate::entities::{channel, sale::DiscountValueType, voucher, voucher_channel_listing};
use crate::errors::ServiceError;
use crate::global_id;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VoucherChannelListingView {
    pub channel_slug: String,
    pub discount_value: Decimal,
    pub currency: String,
    pub min_spent: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VoucherView {
    pub id: String,
    pub name: Option<String>,
    pub code: String,
    #[serde(rename = "type")]
    pub voucher_type: DiscountValueType,
    pub start_date: chrono::DateTime<chrono::Utc>,
    pub end_date: Option<chrono::DateTime<chrono::Utc>>,
    pub channel_listings: Vec<VoucherChannelListingView>,
}

#[derive(Clone)]
pub struct VoucherReadService {
    db: DatabaseConnection,
}

impl VoucherReadService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_voucher(&self, id: i32) -> Result<Option<VoucherView>, ServiceError> {
        let voucher = voucher::Entity::find_by_id(id).one(&self.db).await?;
        match voucher {
            Some(voucher) => Ok(Some(self.build_view(voucher).await?)),
            None => Ok(None),
        }
    }

    /// List vouchers, optionally restricted to a channel and a name/code
    /// search term.
    pub async fn list_vouchers(
        &self,
        channel_slug: Option<&str>,
        query: Option<&str>,
    ) -> Result<Vec<VoucherView>, ServiceError> {
        let mut select = voucher::Entity::find().order_by_asc(voucher::Column::Id);

        if let Some(slug) = channel_slug {
            let Some(channel) = channel::Entity::find()
                .filter(channel::Column::Slug.eq(slug))
                .one(&self.db)
                .await?
            else {
                return Ok(Vec::new());
            };
            let voucher_ids: Vec<i32> = voucher_channel_listing::Entity::find()
                .filter(voucher_channel_listing::Column::ChannelId.eq(channel.id))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|row| row.voucher_id)
                .collect();
            select = select.filter(voucher::Column::Id.is_in(voucher_ids));
        }
        if let Some(query) = query {
            select = select.filter(
                Condition::any()
                    .add(voucher::Column::Name.contains(query))
                    .add(voucher::Column::Code.contains(query)),
            );
        }

        let vouchers = select.all(&self.db).await?;
        let mut views = Vec::with_capacity(vouchers.len());
        for voucher in vouchers {
            views.push(self.build_view(voucher).await?);
        }
        Ok(views)
    }

    async fn build_view(&self, voucher: voucher::Model) -> Result<VoucherView, ServiceError> {
        let listings = voucher_channel_listing::Entity::find()
            .filter(voucher_channel_listing::Column::VoucherId.eq(voucher.id))
            .order_by_asc(voucher_channel_listing::Column::ChannelId)
            .all(&self.db)
            .await?;

        let mut listing_views = Vec::with_capacity(listings.len());
        for listing in listings {
            let Some(channel) = channel::Entity::find_by_id(listing.channel_id)
                .one(&self.db)
                .await?
            else {
                continue;
            };
            listing_views.push(VoucherChannelListingView {
                channel_slug: channel.slug,
                discount_value: listing.discount_value,
                currency: channel.currency_code,
                min_spent: listing.min_spent,
            });
        }

        Ok(VoucherView {
            id: global_id::encode("Voucher", voucher.id),
            name: voucher.name,
            code: voucher.code,
            voucher_type: voucher.voucher_type,
            start_date: voucher.start_date,
            end_date: voucher.end_date,
            channel_listings: listing_views,
        })
    }
}
