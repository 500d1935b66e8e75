//! In-process event channel.
//!
//! Services emit events through an [`EventSender`]; a background consumer
//! logs them and is the hand-off point to downstream workers (the price
//! recalculation job consumes `RecalculateDiscountedPrices`).

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::errors::ServiceError;

/// Events emitted by the discount subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// A sale crossed its start or end boundary and plugins were notified.
    SaleToggled { sale_id: i32 },

    /// Recalculate discounted prices for everything the given catalogue
    /// entities cover. ID lists are deduplicated before emission.
    RecalculateDiscountedPrices {
        product_ids: Vec<i32>,
        category_ids: Vec<i32>,
        collection_ids: Vec<i32>,
        variant_ids: Vec<i32>,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    pub async fn send(&self, event: Event) -> Result<(), ServiceError> {
        self.sender
            .send(event)
            .await
            .map_err(|e| ServiceError::EventError(format!("failed to send event: {e}")))
    }
}

/// Drains the event channel, logging each event. Runs until every sender
/// is dropped.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        match &event {
            Event::SaleToggled { sale_id } => {
                info!(sale_id, "sale toggled");
            }
            Event::RecalculateDiscountedPrices {
                product_ids,
                category_ids,
                collection_ids,
                variant_ids,
            } => {
                info!(
                    products = product_ids.len(),
                    categories = category_ids.len(),
                    collections = collection_ids.len(),
                    variants = variant_ids.len(),
                    "discounted price recalculation requested"
                );
            }
        }
    }
    warn!("event channel closed; consumer exiting");
}
