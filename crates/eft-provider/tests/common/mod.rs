//! Test doubles for provider contract tests
//!
//! `RecordingApi` is an in-memory `AdminApi` that records every call and
//! serves canned responses, so resources can be exercised without HTTP.

#![allow(dead_code)]

use async_trait::async_trait;
use eft_core::models::{
    EventRule, EventRuleRequestData, Server, Site, SiteAttributes, SmtpSettings, User,
    UserAttributes,
};
use eft_core::{AdminApi, Error, Result};
use eft_provider::EftProvider;
use serde_json::value::RawValue;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One recorded API call
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    GetServer,
    UpdateSmtp(SmtpSettings),
    ListSites,
    GetUser(String, String),
    CreateUser(String, UserAttributes),
    UpdateUser(String, String, UserAttributes),
    DeleteUser(String, String),
    GetRule(String, String),
    /// Site and the request body as sent on the wire
    CreateRule(String, String),
    UpdateRule(String, String, String),
    DeleteRule(String, String),
}

/// In-memory admin API
#[derive(Default)]
pub struct RecordingApi {
    calls: Mutex<Vec<Call>>,
    /// Server returned by server calls (SMTP updates are applied to it)
    pub server: Mutex<Server>,
    pub sites: Vec<(String, String)>,
    /// Raw attributes / relationships text the rule endpoints answer with
    pub rule_attributes: Mutex<String>,
    pub rule_relationships: Mutex<Option<String>>,
    /// Extra latency on every event rule call
    pub rule_delay: Option<Duration>,
}

impl RecordingApi {
    pub fn new() -> Self {
        Self {
            rule_attributes: Mutex::new("{}".to_string()),
            ..Default::default()
        }
    }

    /// Sites served by `list_sites`, as `(id, name)`
    pub fn with_sites(mut self, sites: &[(&str, &str)]) -> Self {
        self.sites = sites
            .iter()
            .map(|(id, name)| (id.to_string(), name.to_string()))
            .collect();
        self
    }

    /// Delay every event rule call by `delay`
    pub fn with_rule_delay(mut self, delay: Duration) -> Self {
        self.rule_delay = Some(delay);
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    async fn rule_latency(&self) {
        if let Some(delay) = self.rule_delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn rule(&self, id: &str) -> EventRule {
        let attributes = self.rule_attributes.lock().unwrap().clone();
        let relationships = self.rule_relationships.lock().unwrap().clone();
        EventRule {
            kind: "eventRule".into(),
            id: id.into(),
            attributes: Some(RawValue::from_string(attributes).unwrap()),
            relationships: relationships.map(|r| RawValue::from_string(r).unwrap()),
        }
    }
}

/// Provider wired to `api`
pub fn provider_with(api: Arc<RecordingApi>) -> EftProvider {
    let mut provider = EftProvider::new();
    provider.configure_with(api);
    provider
}

#[async_trait]
impl AdminApi for RecordingApi {
    async fn get_server(&self) -> Result<Server> {
        self.record(Call::GetServer);
        Ok(self.server.lock().unwrap().clone())
    }

    async fn update_server_smtp(&self, smtp: &SmtpSettings) -> Result<Server> {
        self.record(Call::UpdateSmtp(smtp.clone()));
        let mut server = self.server.lock().unwrap();
        server.attributes.smtp = smtp.clone();
        Ok(server.clone())
    }

    async fn list_sites(&self) -> Result<Vec<Site>> {
        self.record(Call::ListSites);
        Ok(self
            .sites
            .iter()
            .map(|(id, name)| Site {
                kind: "site".into(),
                id: id.clone(),
                attributes: SiteAttributes { name: name.clone() },
            })
            .collect())
    }

    async fn get_site_user(&self, site_id: &str, user_id: &str) -> Result<User> {
        self.record(Call::GetUser(site_id.into(), user_id.into()));
        if user_id == "missing" {
            return Err(Error::request("GET", "/admin/v2/sites/x/users/missing", 404, "not found"));
        }
        Ok(User {
            kind: "user".into(),
            id: user_id.into(),
            attributes: UserAttributes {
                login_name: "remote-login".into(),
                account_enabled: "yes".into(),
                ..Default::default()
            },
        })
    }

    async fn create_site_user(&self, site_id: &str, attrs: &UserAttributes) -> Result<User> {
        self.record(Call::CreateUser(site_id.into(), attrs.clone()));
        let mut echoed = attrs.clone();
        echoed.password = None;
        Ok(User {
            kind: "user".into(),
            id: "u-new".into(),
            attributes: echoed,
        })
    }

    async fn update_site_user(
        &self,
        site_id: &str,
        user_id: &str,
        attrs: &UserAttributes,
    ) -> Result<User> {
        self.record(Call::UpdateUser(site_id.into(), user_id.into(), attrs.clone()));
        let mut echoed = attrs.clone();
        echoed.password = None;
        Ok(User {
            kind: "user".into(),
            id: user_id.into(),
            attributes: echoed,
        })
    }

    async fn delete_site_user(&self, site_id: &str, user_id: &str) -> Result<()> {
        self.record(Call::DeleteUser(site_id.into(), user_id.into()));
        Ok(())
    }

    async fn get_event_rule(&self, site_id: &str, rule_id: &str) -> Result<EventRule> {
        self.rule_latency().await;
        self.record(Call::GetRule(site_id.into(), rule_id.into()));
        Ok(self.rule(rule_id))
    }

    async fn create_event_rule(
        &self,
        site_id: &str,
        data: &EventRuleRequestData,
    ) -> Result<EventRule> {
        self.rule_latency().await;
        let body = serde_json::to_string(data).unwrap();
        self.record(Call::CreateRule(site_id.into(), body));
        Ok(self.rule("r-new"))
    }

    async fn update_event_rule(
        &self,
        site_id: &str,
        rule_id: &str,
        data: &EventRuleRequestData,
    ) -> Result<EventRule> {
        self.rule_latency().await;
        let body = serde_json::to_string(data).unwrap();
        self.record(Call::UpdateRule(site_id.into(), rule_id.into(), body));
        Ok(self.rule(rule_id))
    }

    async fn delete_event_rule(&self, site_id: &str, rule_id: &str) -> Result<()> {
        self.rule_latency().await;
        self.record(Call::DeleteRule(site_id.into(), rule_id.into()));
        Ok(())
    }
}
