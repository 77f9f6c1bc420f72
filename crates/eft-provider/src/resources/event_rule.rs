//! `globalscapeeft_event_rule`: an event rule with an open-ended payload
//!
//! Attributes and relationships are JSON strings in the plan. They are
//! validated as JSON, stripped of secrets and sent as-is; what comes back is
//! stripped again and stored in canonical form, so formatting and key order
//! in the configuration never register as drift.
//!
//! Every operation runs under its deadline from the `timeouts` block
//! (5 minutes when unset).

use async_trait::async_trait;
use eft_core::models::{EventRule, EventRuleRequestData};
use eft_core::sanitize::{sanitize, sanitize_canonical};
use eft_core::schema::{Attribute, AttributeKind, Schema};
use eft_core::{AdminApi, Error, ImportId, Operation, Resource, Result, Timeouts};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::{decode_plan, decode_state, require_api};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct EventRuleModel {
    pub id: Option<String>,
    pub site_id: String,
    pub attributes_json: Option<String>,
    pub relationships_json: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeouts: Option<Timeouts>,
}

impl EventRuleModel {
    fn timeouts(&self) -> Timeouts {
        self.timeouts.clone().unwrap_or_default()
    }

    fn require_id(&self) -> Result<&str> {
        match self.id.as_deref() {
            Some(id) if !id.is_empty() => Ok(id),
            _ => Err(Error::validation("event rule state has no id")),
        }
    }

    /// Sanitized request body from the plan
    fn to_request(&self) -> Result<EventRuleRequestData> {
        let attributes = match self.attributes_json.as_deref() {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => return Err(Error::validation("attributes_json: value must be provided")),
        };
        let attributes = sanitized_raw(attributes, "attributes_json")?;

        let relationships = match self.relationships_json.as_deref() {
            Some(raw) if !raw.trim().is_empty() => Some(sanitized_raw(raw, "relationships_json")?),
            _ => None,
        };

        Ok(EventRuleRequestData::new(attributes).with_relationships(relationships))
    }

    /// Overwrite id and payloads from a response
    fn merge_api(&mut self, rule: &EventRule) -> Result<()> {
        self.id = Some(rule.id.clone());
        // Missing or null attributes are stored as the JSON literal `null`
        self.attributes_json = match rule.attributes_raw() {
            "" => Some("null".to_string()),
            raw => Some(sanitize_canonical(raw)?),
        };
        self.relationships_json = match rule.relationships_raw() {
            "" => None,
            raw => Some(sanitize_canonical(raw)?),
        };
        Ok(())
    }
}

/// Parse `raw` as JSON, strip secrets, and hand back the raw text
fn sanitized_raw(raw: &str, attribute: &str) -> Result<Box<RawValue>> {
    let clean = sanitize(raw)
        .map_err(|e| Error::validation(format!("{}: invalid JSON: {}", attribute, e)))?;
    Ok(RawValue::from_string(clean)?)
}

/// Event rule resource
#[derive(Default)]
pub struct EventRuleResource {
    api: Option<Arc<dyn AdminApi>>,
}

impl EventRuleResource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn boxed() -> Box<dyn Resource> {
        Box::new(Self::new())
    }
}

#[async_trait]
impl Resource for EventRuleResource {
    fn type_suffix(&self) -> &'static str {
        "event_rule"
    }

    fn schema(&self) -> Schema {
        let mut timeouts = BTreeMap::new();
        for op in ["create", "read", "update", "delete"] {
            timeouts.insert(op, Attribute::optional(AttributeKind::String));
        }

        Schema::new("Manages Globalscape EFT event rules using raw JSON:API payloads.")
            .with_attribute(
                "id",
                Attribute::computed(AttributeKind::String).describe("Event rule identifier."),
            )
            .with_attribute(
                "site_id",
                Attribute::required(AttributeKind::String)
                    .describe("Site identifier that owns the rule.")
                    .requires_replace(),
            )
            .with_attribute(
                "attributes_json",
                Attribute::required(AttributeKind::String)
                    .describe("JSON document for the event rule attributes."),
            )
            .with_attribute(
                "relationships_json",
                Attribute::optional(AttributeKind::String)
                    .describe("Optional JSON document for event rule relationships."),
            )
            .with_block("timeouts", Attribute::optional(AttributeKind::Object(timeouts)))
    }

    fn configure(&mut self, api: Option<Arc<dyn AdminApi>>) {
        if api.is_some() {
            self.api = api;
        }
    }

    async fn create(&self, plan: Value) -> Result<Value> {
        let api = require_api(&self.api)?;
        let mut model: EventRuleModel = decode_plan(&self.schema(), plan)?;
        let request = model.to_request()?;

        let rule = model
            .timeouts()
            .run(Operation::Create, api.create_event_rule(&model.site_id, &request))
            .await?;
        tracing::info!("Created event rule {} in site {}", rule.id, model.site_id);

        model.merge_api(&rule)?;
        Ok(serde_json::to_value(model)?)
    }

    async fn read(&self, state: Value) -> Result<Value> {
        let api = require_api(&self.api)?;
        let mut model: EventRuleModel = decode_state(state)?;
        let id = model.require_id()?.to_string();

        let rule = model
            .timeouts()
            .run(Operation::Read, api.get_event_rule(&model.site_id, &id))
            .await?;

        model.merge_api(&rule)?;
        Ok(serde_json::to_value(model)?)
    }

    async fn update(&self, plan: Value) -> Result<Value> {
        let api = require_api(&self.api)?;
        let mut model: EventRuleModel = decode_plan(&self.schema(), plan)?;
        let id = model.require_id()?.to_string();
        let request = model.to_request()?.with_id(id.clone());

        let rule = model
            .timeouts()
            .run(Operation::Update, api.update_event_rule(&model.site_id, &id, &request))
            .await?;
        tracing::info!("Updated event rule {} in site {}", id, model.site_id);

        model.merge_api(&rule)?;
        Ok(serde_json::to_value(model)?)
    }

    async fn delete(&self, state: Value) -> Result<()> {
        let api = require_api(&self.api)?;
        let model: EventRuleModel = decode_state(state)?;
        let id = model.require_id()?;

        model
            .timeouts()
            .run(Operation::Delete, api.delete_event_rule(&model.site_id, id))
            .await?;
        tracing::info!("Deleted event rule {} from site {}", id, model.site_id);
        Ok(())
    }

    fn import_state(&self, id: &str) -> Result<Value> {
        let import = ImportId::parse(id, "rule_id")?;
        Ok(json!({
            "site_id": import.site_id,
            "id": import.resource_id,
        }))
    }
}
