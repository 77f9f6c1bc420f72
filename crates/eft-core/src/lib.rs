// # eft-core
//
// Core library for the Globalscape EFT administrative provider.
//
// ## Architecture Overview
//
// - **AdminApi**: Trait for the typed admin REST operations (implemented by
//   the HTTP session in `eft-client`)
// - **Resource / DataSource**: Host-facing lifecycle traits, implemented per
//   resource type in `eft-provider`
// - **ProviderRegistry**: Maps host type names to factories
// - **sanitize**: Strips secrets from open-schema JSON and renders it in
//   canonical form
// - **models**: JSON:API shapes exchanged with the server
//
// ## Design Principles
//
// 1. **Capability injection**: resources receive an `Arc<dyn AdminApi>`; they
//    never own HTTP plumbing
// 2. **Opaque passthrough**: event rule payloads stay raw JSON text
// 3. **No process-wide state**: factories return owned instances

pub mod config;
pub mod error;
pub mod import;
pub mod models;
pub mod registry;
pub mod sanitize;
pub mod schema;
pub mod timeouts;
pub mod traits;

// Re-export core types for convenience
pub use config::{DEFAULT_AUTH_TYPE, ProviderConfig};
pub use error::{Error, Result};
pub use import::ImportId;
pub use registry::ProviderRegistry;
pub use schema::{Attribute, AttributeKind, Schema};
pub use timeouts::{Operation, Timeouts};
pub use traits::{AdminApi, DataSource, DataSourceFactory, Resource, ResourceFactory};
