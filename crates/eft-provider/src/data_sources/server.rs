//! `globalscapeeft_server`: current server settings

use async_trait::async_trait;
use eft_core::models::Server;
use eft_core::schema::{Attribute, AttributeKind, Schema};
use eft_core::{AdminApi, DataSource, Result};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::resources::require_api;

/// Server settings data source
#[derive(Default)]
pub struct ServerDataSource {
    api: Option<Arc<dyn AdminApi>>,
}

impl ServerDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn boxed() -> Box<dyn DataSource> {
        Box::new(Self::new())
    }
}

fn computed(kind: AttributeKind) -> Attribute {
    Attribute::computed(kind)
}

/// State object for a server response
fn server_state(server: &Server) -> Value {
    let attrs = &server.attributes;
    let general = &attrs.general;
    let listener = &attrs.listener_settings;
    let smtp = &attrs.smtp;

    json!({
        "id": server.id,
        "version": attrs.version,
        "general": {
            "config_file_path": general.config_file_path,
            "enable_utc_in_listings": general.enable_utc_in_listings,
            "last_modified_by": general.last_modified_by,
            "last_modified_time": general.last_modified_unix_time,
            "last_modified_at": general.last_modified_at().map(|t| t.to_rfc3339()),
        },
        "listener_settings": {
            "admin_port": listener.admin_port,
            "enable_remote_administration": listener.enable_remote_administration,
            "listen_ips": listener.listen_ips,
        },
        "smtp": {
            "login": smtp.login,
            "password": smtp.password,
            "port": smtp.port,
            "sender_address": smtp.sender_address,
            "sender_name": smtp.sender_name,
            "server": smtp.server,
            "use_authentication": smtp.use_authentication,
            "use_implicit_tls": smtp.use_implicit_tls,
        },
    })
}

#[async_trait]
impl DataSource for ServerDataSource {
    fn type_suffix(&self) -> &'static str {
        "server"
    }

    fn schema(&self) -> Schema {
        let general = BTreeMap::from([
            ("config_file_path", computed(AttributeKind::String)),
            ("enable_utc_in_listings", computed(AttributeKind::Bool)),
            ("last_modified_by", computed(AttributeKind::String)),
            ("last_modified_time", computed(AttributeKind::Int64)),
            ("last_modified_at", computed(AttributeKind::String)),
        ]);
        let listener = BTreeMap::from([
            ("admin_port", computed(AttributeKind::Int64)),
            ("enable_remote_administration", computed(AttributeKind::Bool)),
            ("listen_ips", computed(AttributeKind::StringList)),
        ]);
        let smtp = BTreeMap::from([
            ("login", computed(AttributeKind::String)),
            ("password", computed(AttributeKind::String).sensitive()),
            ("port", computed(AttributeKind::Int64)),
            ("sender_address", computed(AttributeKind::String)),
            ("sender_name", computed(AttributeKind::String)),
            ("server", computed(AttributeKind::String)),
            ("use_authentication", computed(AttributeKind::Bool)),
            ("use_implicit_tls", computed(AttributeKind::Bool)),
        ]);

        Schema::new("Fetch current Globalscape EFT server settings.")
            .with_attribute(
                "id",
                computed(AttributeKind::String).describe("Server identifier provided by the API."),
            )
            .with_attribute(
                "version",
                computed(AttributeKind::String).describe("Server version string."),
            )
            .with_attribute(
                "general",
                computed(AttributeKind::Object(general)).describe("General configuration details."),
            )
            .with_attribute(
                "listener_settings",
                computed(AttributeKind::Object(listener))
                    .describe("Administrative listener configuration."),
            )
            .with_attribute(
                "smtp",
                computed(AttributeKind::Object(smtp)).describe("Outgoing SMTP settings."),
            )
    }

    fn configure(&mut self, api: Option<Arc<dyn AdminApi>>) {
        if api.is_some() {
            self.api = api;
        }
    }

    async fn read(&self) -> Result<Value> {
        let api = require_api(&self.api)?;
        let server = api.get_server().await?;
        tracing::debug!("Read server {} (version {})", server.id, server.attributes.version);
        Ok(server_state(&server))
    }
}
