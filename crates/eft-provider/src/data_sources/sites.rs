//! `globalscapeeft_sites`: sites configured on the server

use async_trait::async_trait;
use eft_core::schema::{Attribute, AttributeKind, Schema};
use eft_core::{AdminApi, DataSource, Result};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::resources::require_api;

/// Site listing data source
#[derive(Default)]
pub struct SitesDataSource {
    api: Option<Arc<dyn AdminApi>>,
}

impl SitesDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn boxed() -> Box<dyn DataSource> {
        Box::new(Self::new())
    }
}

#[async_trait]
impl DataSource for SitesDataSource {
    fn type_suffix(&self) -> &'static str {
        "sites"
    }

    fn schema(&self) -> Schema {
        let site = BTreeMap::from([
            ("id", Attribute::computed(AttributeKind::String)),
            ("name", Attribute::computed(AttributeKind::String)),
        ]);

        Schema::new("List Globalscape EFT sites configured on the server.").with_attribute(
            "sites",
            Attribute::computed(AttributeKind::ObjectList(site)).describe("Configured sites."),
        )
    }

    fn configure(&mut self, api: Option<Arc<dyn AdminApi>>) {
        if api.is_some() {
            self.api = api;
        }
    }

    async fn read(&self) -> Result<Value> {
        let api = require_api(&self.api)?;
        let sites = api.list_sites().await?;

        let sites: Vec<Value> = sites
            .into_iter()
            .map(|site| json!({"id": site.id, "name": site.attributes.name}))
            .collect();

        Ok(json!({ "sites": sites }))
    }
}
