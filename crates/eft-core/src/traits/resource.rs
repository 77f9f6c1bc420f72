// # Resource Trait
//
// Host-facing lifecycle of a managed object: metadata, schema, configure and
// create/read/update/delete, plus optional import.
//
// State crosses this boundary as JSON objects. Each implementation converts to
// and from its own typed model internally.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::schema::Schema;
use crate::traits::AdminApi;

/// A managed resource type
///
/// # Lifecycle
///
/// Instances are created by a [`ResourceFactory`], then handed the API client
/// through [`configure`](Resource::configure). Calling a CRUD method before
/// that fails with [`Error::Unconfigured`].
#[async_trait]
pub trait Resource: Send + Sync {
    /// Suffix appended to the provider type name (e.g. `"site_user"`)
    fn type_suffix(&self) -> &'static str;

    /// Full type name as seen by the host
    fn type_name(&self, provider_type_name: &str) -> String {
        format!("{}_{}", provider_type_name, self.type_suffix())
    }

    /// State schema
    fn schema(&self) -> Schema;

    /// Receive the API client
    ///
    /// `None` means the provider has not been configured yet; implementations
    /// keep whatever they had.
    fn configure(&mut self, api: Option<Arc<dyn AdminApi>>);

    /// Create the object described by `plan` and return the new state
    async fn create(&self, plan: Value) -> Result<Value>;

    /// Refresh `state` from the server
    async fn read(&self, state: Value) -> Result<Value>;

    /// Apply `plan` to the existing object and return the new state
    async fn update(&self, plan: Value) -> Result<Value>;

    /// Remove the object described by `state`
    async fn delete(&self, state: Value) -> Result<()>;

    /// Build a minimal state from an import identifier
    ///
    /// The host follows up with [`read`](Resource::read).
    fn import_state(&self, id: &str) -> Result<Value> {
        Err(Error::validation(format!(
            "{} does not support import (got {:?})",
            self.type_suffix(),
            id
        )))
    }
}

/// Constructs unconfigured [`Resource`] instances
pub trait ResourceFactory: Send + Sync {
    fn create(&self) -> Box<dyn Resource>;
}

impl<F> ResourceFactory for F
where
    F: Fn() -> Box<dyn Resource> + Send + Sync,
{
    fn create(&self) -> Box<dyn Resource> {
        self()
    }
}
