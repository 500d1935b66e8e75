//! Plugin hook surface for discount lifecycle events.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::entities::sale;
use crate::errors::ServiceError;
use crate::services::catalogue::CatalogueInfo;

/// Hooks invoked when a sale starts or ends.
#[async_trait]
pub trait DiscountPlugin: Send + Sync {
    fn name(&self) -> &str;

    /// Called once per sale whose start or end date has passed. `catalogue`
    /// carries the sale's current catalogue scope.
    async fn sale_toggle(
        &self,
        sale: &sale::Model,
        catalogue: &CatalogueInfo,
    ) -> Result<(), ServiceError>;
}

/// Fans a hook invocation out to every registered plugin. A plugin error
/// aborts the fan-out and propagates to the caller.
#[derive(Clone, Default)]
pub struct PluginManager {
    plugins: Vec<Arc<dyn DiscountPlugin>>,
}

impl PluginManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, plugin: Arc<dyn DiscountPlugin>) {
        self.plugins.push(plugin);
    }

    pub async fn sale_toggle(
        &self,
        sale: &sale::Model,
        catalogue: &CatalogueInfo,
    ) -> Result<(), ServiceError> {
        for plugin in &self.plugins {
            plugin.sale_toggle(sale, catalogue).await.map_err(|e| {
                ServiceError::PluginError(format!("{}: {e}", plugin.name()))
            })?;
        }
        Ok(())
    }
}

/// Default plugin that only logs the toggle.
pub struct LoggingPlugin;

#[async_trait]
impl DiscountPlugin for LoggingPlugin {
    fn name(&self) -> &str {
        "logging"
    }

    async fn sale_toggle(
        &self,
        sale: &sale::Model,
        catalogue: &CatalogueInfo,
    ) -> Result<(), ServiceError> {
        info!(
            sale_id = sale.id,
            sale_name = %sale.name,
            catalogue_empty = catalogue.is_empty(),
            "sale_toggle hook"
        );
        Ok(())
    }
}
