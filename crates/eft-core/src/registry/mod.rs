//! Type-name registry for resources and data sources
//!
//! The registry maps the full type names the host uses
//! (`globalscapeeft_site_user`, ...) to factories, so instances are created
//! on demand instead of through a hard-coded match.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use eft_core::registry::ProviderRegistry;
//!
//! let registry = ProviderRegistry::new("globalscapeeft");
//! registry.register_resource(Box::new(SiteUserResource::boxed));
//!
//! let resource = registry.create_resource("globalscapeeft_site_user", Some(api))?;
//! ```

use crate::error::{Error, Result};
use crate::traits::{AdminApi, DataSource, DataSourceFactory, Resource, ResourceFactory};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Registry of resource and data source factories
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
pub struct ProviderRegistry {
    /// Provider type name, the prefix of every registered type name
    provider_type_name: String,

    /// Registered resource factories, keyed by full type name
    resources: RwLock<HashMap<String, Box<dyn ResourceFactory>>>,

    /// Registered data source factories, keyed by full type name
    data_sources: RwLock<HashMap<String, Box<dyn DataSourceFactory>>>,
}

impl ProviderRegistry {
    /// Create a new empty registry for the given provider type name
    pub fn new(provider_type_name: impl Into<String>) -> Self {
        Self {
            provider_type_name: provider_type_name.into(),
            resources: RwLock::new(HashMap::new()),
            data_sources: RwLock::new(HashMap::new()),
        }
    }

    /// Provider type name
    pub fn provider_type_name(&self) -> &str {
        &self.provider_type_name
    }

    /// Register a resource factory
    ///
    /// The full type name is derived from a probe instance. Returns it.
    pub fn register_resource(&self, factory: Box<dyn ResourceFactory>) -> String {
        let name = factory.create().type_name(&self.provider_type_name);
        tracing::debug!("Registering resource {}", name);
        let mut resources = self.resources.write().unwrap_or_else(|e| e.into_inner());
        resources.insert(name.clone(), factory);
        name
    }

    /// Register a data source factory
    ///
    /// The full type name is derived from a probe instance. Returns it.
    pub fn register_data_source(&self, factory: Box<dyn DataSourceFactory>) -> String {
        let name = factory.create().type_name(&self.provider_type_name);
        tracing::debug!("Registering data source {}", name);
        let mut sources = self.data_sources.write().unwrap_or_else(|e| e.into_inner());
        sources.insert(name.clone(), factory);
        name
    }

    /// Create a resource by full type name, configured with `api`
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if the type is not registered.
    pub fn create_resource(
        &self,
        type_name: &str,
        api: Option<Arc<dyn AdminApi>>,
    ) -> Result<Box<dyn Resource>> {
        let resources = self.resources.read().unwrap_or_else(|e| e.into_inner());

        let factory = resources
            .get(type_name)
            .ok_or_else(|| Error::not_found(format!("Unknown resource type: {}", type_name)))?;

        let mut resource = factory.create();
        resource.configure(api);
        Ok(resource)
    }

    /// Create a data source by full type name, configured with `api`
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if the type is not registered.
    pub fn create_data_source(
        &self,
        type_name: &str,
        api: Option<Arc<dyn AdminApi>>,
    ) -> Result<Box<dyn DataSource>> {
        let sources = self.data_sources.read().unwrap_or_else(|e| e.into_inner());

        let factory = sources
            .get(type_name)
            .ok_or_else(|| Error::not_found(format!("Unknown data source type: {}", type_name)))?;

        let mut source = factory.create();
        source.configure(api);
        Ok(source)
    }

    /// List all registered resource type names, sorted
    pub fn list_resources(&self) -> Vec<String> {
        let resources = self.resources.read().unwrap_or_else(|e| e.into_inner());
        let mut names: Vec<String> = resources.keys().cloned().collect();
        names.sort();
        names
    }

    /// List all registered data source type names, sorted
    pub fn list_data_sources(&self) -> Vec<String> {
        let sources = self.data_sources.read().unwrap_or_else(|e| e.into_inner());
        let mut names: Vec<String> = sources.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a resource type is registered
    pub fn has_resource(&self, type_name: &str) -> bool {
        let resources = self.resources.read().unwrap_or_else(|e| e.into_inner());
        resources.contains_key(type_name)
    }

    /// Check if a data source type is registered
    pub fn has_data_source(&self, type_name: &str) -> bool {
        let sources = self.data_sources.read().unwrap_or_else(|e| e.into_inner());
        sources.contains_key(type_name)
    }
}
