// # Data Source Trait
//
// Read-only counterpart of `Resource`: metadata, schema, configure, read.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::error::Result;
use crate::schema::Schema;
use crate::traits::AdminApi;

/// A read-only view of server data
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Suffix appended to the provider type name (e.g. `"sites"`)
    fn type_suffix(&self) -> &'static str;

    /// Full type name as seen by the host
    fn type_name(&self, provider_type_name: &str) -> String {
        format!("{}_{}", provider_type_name, self.type_suffix())
    }

    /// State schema
    fn schema(&self) -> Schema;

    /// Receive the API client
    fn configure(&mut self, api: Option<Arc<dyn AdminApi>>);

    /// Fetch the current state
    async fn read(&self) -> Result<Value>;
}

/// Constructs unconfigured [`DataSource`] instances
pub trait DataSourceFactory: Send + Sync {
    fn create(&self) -> Box<dyn DataSource>;
}

impl<F> DataSourceFactory for F
where
    F: Fn() -> Box<dyn DataSource> + Send + Sync,
{
    fn create(&self) -> Box<dyn DataSource> {
        self()
    }
}
