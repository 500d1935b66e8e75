//! Periodic task notifying plugins when sales start or end.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};
use tokio::time::sleep;
use tracing::{error, info};

use crate::entities::sale;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::plugins::PluginManager;
use crate::services::catalogue;

/// Sales whose start or end date has passed and which were not yet
/// notified about it: the notification stamp is null or predates the
/// boundary that passed.
pub async fn sales_to_notify(
    db: &DatabaseConnection,
    now: DateTime<Utc>,
) -> Result<Vec<sale::Model>, ServiceError> {
    let due = |boundary: sale::Column| {
        Condition::all()
            .add(
                Condition::any()
                    .add(sale::Column::NotificationSentDatetime.is_null())
                    .add(
                        Expr::col(sale::Column::NotificationSentDatetime)
                            .lt(Expr::col(boundary)),
                    ),
            )
            .add(boundary.lte(now))
    };

    let sales = sale::Entity::find()
        .filter(
            Condition::any()
                .add(due(sale::Column::StartDate))
                .add(due(sale::Column::EndDate)),
        )
        .order_by_asc(sale::Column::Id)
        .all(db)
        .await?;
    Ok(sales)
}

/// Notify plugins about due sales and request price recalculation.
///
/// The notification stamp is written only after every hook invocation ran;
/// a plugin error leaves all stamps untouched so the next run retries the
/// whole set.
pub async fn handle_sale_toggle(
    db: &DatabaseConnection,
    plugins: &PluginManager,
    events: &EventSender,
    now: DateTime<Utc>,
) -> Result<usize, ServiceError> {
    let sales = sales_to_notify(db, now).await?;
    if sales.is_empty() {
        return Ok(0);
    }
    let sale_ids: Vec<i32> = sales.iter().map(|s| s.id).collect();
    let (catalogues, union) = catalogue::fetch_catalogue_infos(db, &sale_ids).await?;

    for sale in &sales {
        let info = catalogues.get(&sale.id).cloned().unwrap_or_default();
        plugins.sale_toggle(sale, &info).await?;
        events.send(Event::SaleToggled { sale_id: sale.id }).await?;
    }

    if !union.is_empty() {
        events
            .send(Event::RecalculateDiscountedPrices {
                product_ids: union.product_ids.iter().copied().collect(),
                category_ids: union.category_ids.iter().copied().collect(),
                collection_ids: union.collection_ids.iter().copied().collect(),
                variant_ids: union.variant_ids.iter().copied().collect(),
            })
            .await?;
    }

    sale::Entity::update_many()
        .col_expr(sale::Column::NotificationSentDatetime, Expr::value(now))
        .filter(sale::Column::Id.is_in(sale_ids.clone()))
        .exec(db)
        .await?;

    let ids = sale_ids
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    info!("sale toggle notifications sent for sales: {ids}");
    Ok(sales.len())
}

/// Spawn the periodic toggle loop. Each tick runs one notification pass;
/// errors are logged and the loop keeps going.
pub fn start_worker(
    db: Arc<DatabaseConnection>,
    plugins: PluginManager,
    events: EventSender,
    interval: Duration,
) {
    tokio::spawn(async move {
        loop {
            if let Err(e) = handle_sale_toggle(&db, &plugins, &events, Utc::now()).await {
                error!("sale toggle task failed: {e}");
            }
            sleep(interval).await;
        }
    });
}
