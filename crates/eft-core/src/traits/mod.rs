//! Core traits for the EFT provider
//!
//! This module defines the abstract interfaces between the host-facing glue
//! and the admin API client.
//!
//! - [`AdminApi`]: Typed operations against an EFT server
//! - [`Resource`]: Lifecycle of a managed object
//! - [`DataSource`]: Read-only views

pub mod admin_api;
pub mod data_source;
pub mod resource;

pub use admin_api::AdminApi;
pub use data_source::{DataSource, DataSourceFactory};
pub use resource::{Resource, ResourceFactory};
