//! Managed resources
//!
//! Each resource converts host JSON into a typed model, calls the
//! [`AdminApi`], and maps the response back into state.

mod event_rule;
mod server_smtp;
mod site_user;

pub use event_rule::EventRuleResource;
pub use server_smtp::ServerSmtpResource;
pub use site_user::SiteUserResource;

use eft_core::schema::Schema;
use eft_core::{AdminApi, Error, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Permitted values of the tri-state user flags
pub(crate) const YES_NO_INHERIT: &[&str] = &["inherit", "yes", "no"];

/// The configured API client, or `Error::Unconfigured`
pub(crate) fn require_api(api: &Option<Arc<dyn AdminApi>>) -> Result<&Arc<dyn AdminApi>> {
    api.as_ref()
        .ok_or_else(|| Error::unconfigured("the provider client was not initialized"))
}

/// Fill defaults, validate against `schema`, and decode into a typed model
pub(crate) fn decode_plan<T: DeserializeOwned>(schema: &Schema, mut plan: Value) -> Result<T> {
    schema.apply_defaults(&mut plan);
    schema.validate(&plan)?;
    Ok(serde_json::from_value(plan)?)
}

/// Decode prior state without validation (imported state is partial)
pub(crate) fn decode_state<T: DeserializeOwned>(state: Value) -> Result<T> {
    Ok(serde_json::from_value(state)?)
}

/// `Some(s)` unless `s` is empty
pub(crate) fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
