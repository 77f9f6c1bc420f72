// # Globalscape EFT Provider
//
// Declarative management of a Globalscape EFT server through its admin REST
// API.
//
// ## Type names
//
// | Kind | Type name |
// |---|---|
// | Resource | `globalscapeeft_server_smtp` |
// | Resource | `globalscapeeft_site_user` |
// | Resource | `globalscapeeft_event_rule` |
// | Data source | `globalscapeeft_server` |
// | Data source | `globalscapeeft_sites` |
//
// ## Lifecycle
//
// 1. The host builds an [`EftProvider`] and calls [`EftProvider::configure`]
//    with a [`ProviderConfig`]
// 2. The configuration is validated before any network call, then a
//    [`Session`] logs in
// 3. Resources and data sources are created through the registry and receive
//    the session as an `Arc<dyn AdminApi>`
//
// Nothing here is process-global: two providers configured against two
// servers never share a session.

pub mod data_sources;
pub mod resources;

use eft_client::Session;
use eft_core::schema::{Attribute, AttributeKind, Schema};
use eft_core::{
    AdminApi, DataSource, DataSourceFactory, ProviderConfig, ProviderRegistry, Resource,
    ResourceFactory, Result,
};
use std::sync::Arc;

use data_sources::{ServerDataSource, SitesDataSource};
use resources::{EventRuleResource, ServerSmtpResource, SiteUserResource};

/// Type name prefix of every resource and data source
pub const PROVIDER_TYPE_NAME: &str = "globalscapeeft";

/// Provider version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Provider metadata reported to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderMetadata {
    pub type_name: &'static str,
    pub version: &'static str,
}

/// The EFT provider
///
/// Holds the configured API client and hands it to every resource and data
/// source it creates.
pub struct EftProvider {
    api: Option<Arc<dyn AdminApi>>,
    registry: ProviderRegistry,
}

impl Default for EftProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EftProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EftProvider")
            .field("configured", &self.api.is_some())
            .field("resources", &self.registry.list_resources())
            .field("data_sources", &self.registry.list_data_sources())
            .finish()
    }
}

impl EftProvider {
    /// Unconfigured provider with every resource and data source registered
    pub fn new() -> Self {
        let registry = ProviderRegistry::new(PROVIDER_TYPE_NAME);
        register(&registry);
        Self { api: None, registry }
    }

    pub fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            type_name: PROVIDER_TYPE_NAME,
            version: VERSION,
        }
    }

    /// Provider configuration schema
    pub fn schema(&self) -> Schema {
        Schema::new("Interact with the Globalscape EFT administrative REST API.")
            .with_attribute(
                "host",
                Attribute::required(AttributeKind::String).describe(
                    "Base URL for the EFT admin API, e.g. https://eft.example.com:4450/admin",
                ),
            )
            .with_attribute(
                "username",
                Attribute::required(AttributeKind::String)
                    .describe("Admin username with access to the REST API."),
            )
            .with_attribute(
                "password",
                Attribute::required(AttributeKind::String)
                    .describe("Admin password.")
                    .sensitive(),
            )
            .with_attribute(
                "auth_type",
                Attribute::optional(AttributeKind::String)
                    .describe("Authentication type accepted by EFT (`EFT` or `AD`). Defaults to `EFT`."),
            )
            .with_attribute(
                "insecure_skip_verify",
                Attribute::optional(AttributeKind::Bool)
                    .describe("Skip TLS certificate verification (useful for lab systems)."),
            )
    }

    /// Validate `config`, log in, and keep the session
    ///
    /// # Errors
    ///
    /// - [`eft_core::Error::Validation`] for bad configuration (no request is made)
    /// - [`eft_core::Error::Authentication`] if the login fails
    pub async fn configure(&mut self, config: &ProviderConfig) -> Result<()> {
        config.validate()?;

        let session = Session::connect(config).await?;
        tracing::info!("configured Globalscape EFT provider (host: {})", config.host());

        self.api = Some(Arc::new(session));
        Ok(())
    }

    /// Use an already-built API client
    pub fn configure_with(&mut self, api: Arc<dyn AdminApi>) {
        self.api = Some(api);
    }

    pub fn is_configured(&self) -> bool {
        self.api.is_some()
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Configured resource instance by full type name
    pub fn resource(&self, type_name: &str) -> Result<Box<dyn Resource>> {
        self.registry.create_resource(type_name, self.api.clone())
    }

    /// Configured data source instance by full type name
    pub fn data_source(&self, type_name: &str) -> Result<Box<dyn DataSource>> {
        self.registry.create_data_source(type_name, self.api.clone())
    }
}

/// Resource factories
pub fn resources() -> Vec<Box<dyn ResourceFactory>> {
    vec![
        Box::new(ServerSmtpResource::boxed),
        Box::new(SiteUserResource::boxed),
        Box::new(EventRuleResource::boxed),
    ]
}

/// Data source factories
pub fn data_sources() -> Vec<Box<dyn DataSourceFactory>> {
    vec![
        Box::new(ServerDataSource::boxed),
        Box::new(SitesDataSource::boxed),
    ]
}

/// Register every resource and data source with `registry`
pub fn register(registry: &ProviderRegistry) {
    for factory in resources() {
        registry.register_resource(factory);
    }
    for factory in data_sources() {
        registry.register_data_source(factory);
    }
}
