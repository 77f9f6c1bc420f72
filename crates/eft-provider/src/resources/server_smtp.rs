//! `globalscapeeft_server_smtp`: the server's outgoing mail settings
//!
//! There is exactly one SMTP configuration per server, so create and update
//! are the same PATCH and delete only forgets the state.

use async_trait::async_trait;
use eft_core::models::{Server, SmtpSettings};
use eft_core::schema::{Attribute, AttributeKind, Schema};
use eft_core::{AdminApi, Resource, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use super::{decode_plan, require_api};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct SmtpModel {
    pub id: Option<String>,
    pub login: Option<String>,
    pub password: Option<String>,
    pub port: i64,
    pub sender_address: String,
    pub sender_name: String,
    pub server: String,
    pub use_authentication: Option<bool>,
    pub use_implicit_tls: Option<bool>,
}

impl SmtpModel {
    /// Whole SMTP object; unset optional values go out as zero values
    fn to_api(&self) -> SmtpSettings {
        SmtpSettings {
            login: self.login.clone().unwrap_or_default(),
            password: self.password.clone().unwrap_or_default(),
            port: self.port,
            sender_address: self.sender_address.clone(),
            sender_name: self.sender_name.clone(),
            server: self.server.clone(),
            use_authentication: self.use_authentication.unwrap_or(false),
            use_implicit_tls: self.use_implicit_tls.unwrap_or(false),
        }
    }

    fn from_server(server: Server) -> Self {
        let smtp = server.attributes.smtp;
        Self {
            id: Some(server.id),
            login: Some(smtp.login),
            password: Some(smtp.password),
            port: smtp.port,
            sender_address: smtp.sender_address,
            sender_name: smtp.sender_name,
            server: smtp.server,
            use_authentication: Some(smtp.use_authentication),
            use_implicit_tls: Some(smtp.use_implicit_tls),
        }
    }
}

/// SMTP settings resource
#[derive(Default)]
pub struct ServerSmtpResource {
    api: Option<Arc<dyn AdminApi>>,
}

impl ServerSmtpResource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn boxed() -> Box<dyn Resource> {
        Box::new(Self::new())
    }

    async fn apply(&self, plan: Value) -> Result<Value> {
        let api = require_api(&self.api)?;
        let plan: SmtpModel = decode_plan(&self.schema(), plan)?;

        tracing::info!("Replacing SMTP settings (server {})", plan.server);
        let server = api.update_server_smtp(&plan.to_api()).await?;

        Ok(serde_json::to_value(SmtpModel::from_server(server))?)
    }
}

#[async_trait]
impl Resource for ServerSmtpResource {
    fn type_suffix(&self) -> &'static str {
        "server_smtp"
    }

    fn schema(&self) -> Schema {
        Schema::new("Manages Globalscape EFT SMTP configuration.")
            .with_attribute(
                "id",
                Attribute::computed(AttributeKind::String).describe("Server identifier."),
            )
            .with_attribute("login", Attribute::optional(AttributeKind::String))
            .with_attribute("password", Attribute::optional(AttributeKind::String).sensitive())
            .with_attribute("port", Attribute::required(AttributeKind::Int64))
            .with_attribute("sender_address", Attribute::required(AttributeKind::String))
            .with_attribute("sender_name", Attribute::required(AttributeKind::String))
            .with_attribute("server", Attribute::required(AttributeKind::String))
            .with_attribute("use_authentication", Attribute::optional(AttributeKind::Bool))
            .with_attribute("use_implicit_tls", Attribute::optional(AttributeKind::Bool))
    }

    fn configure(&mut self, api: Option<Arc<dyn AdminApi>>) {
        if api.is_some() {
            self.api = api;
        }
    }

    async fn create(&self, plan: Value) -> Result<Value> {
        self.apply(plan).await
    }

    async fn read(&self, _state: Value) -> Result<Value> {
        let api = require_api(&self.api)?;
        let server = api.get_server().await?;
        Ok(serde_json::to_value(SmtpModel::from_server(server))?)
    }

    async fn update(&self, plan: Value) -> Result<Value> {
        self.apply(plan).await
    }

    async fn delete(&self, _state: Value) -> Result<()> {
        // Nothing to remove remotely; the settings stay on the server
        tracing::debug!("Forgetting SMTP settings state");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_optionals_become_zero_values() {
        let model = SmtpModel {
            port: 25,
            server: "smtp.example.com".into(),
            ..Default::default()
        };
        let smtp = model.to_api();
        assert_eq!(smtp.login, "");
        assert_eq!(smtp.password, "");
        assert!(!smtp.use_authentication);
        assert!(!smtp.use_implicit_tls);
    }

    #[test]
    fn plan_without_server_is_rejected() {
        let resource = ServerSmtpResource::new();
        let err = decode_plan::<SmtpModel>(
            &resource.schema(),
            serde_json::json!({"port": 25, "sender_address": "a@b", "sender_name": "EFT"}),
        )
        .unwrap_err();
        assert!(err.to_string().contains("server"));
    }
}
