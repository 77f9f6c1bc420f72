//! Admin API models
//!
//! Plain data shapes mirroring the JSON:API `{type, id, attributes}` objects
//! the EFT admin API exchanges. Only the fields the provider surfaces are
//! modelled; unknown fields are ignored on decode.
//!
//! Event rules are the exception: their attributes and relationships stay
//! opaque [`RawValue`] text so remote schema changes pass straight through.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

/// Server object returned by `GET /admin/v2/server`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Server {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    pub attributes: ServerAttributes,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServerAttributes {
    pub version: String,
    pub general: ServerGeneral,
    pub listener_settings: ListenerSettings,
    pub smtp: SmtpSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServerGeneral {
    pub config_file_path: String,
    pub enable_utc_in_listings: bool,
    pub last_modified_by: String,
    /// Unix seconds
    #[serde(rename = "lastModifiedTime")]
    pub last_modified_unix_time: i64,
}

impl ServerGeneral {
    /// Last modification time, if the server reported a representable one
    pub fn last_modified_at(&self) -> Option<DateTime<Utc>> {
        if self.last_modified_unix_time == 0 {
            return None;
        }
        DateTime::from_timestamp(self.last_modified_unix_time, 0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListenerSettings {
    pub admin_port: i64,
    pub enable_remote_administration: bool,
    #[serde(rename = "listenIps")]
    pub listen_ips: Vec<String>,
}

/// Outgoing mail settings
///
/// Always sent as a whole object: fields the caller leaves at their zero
/// value overwrite whatever the server had.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SmtpSettings {
    pub login: String,
    pub password: String,
    pub port: i64,
    #[serde(rename = "senderAddr")]
    pub sender_address: String,
    pub sender_name: String,
    pub server: String,
    pub use_authentication: bool,
    #[serde(rename = "useImplicitTLS")]
    pub use_implicit_tls: bool,
}

impl std::fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("login", &self.login)
            .field("password", &"<REDACTED>")
            .field("port", &self.port)
            .field("sender_address", &self.sender_address)
            .field("sender_name", &self.sender_name)
            .field("server", &self.server)
            .field("use_authentication", &self.use_authentication)
            .field("use_implicit_tls", &self.use_implicit_tls)
            .finish()
    }
}

/// Site object returned by `GET /admin/v2/sites`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Site {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    pub attributes: SiteAttributes,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteAttributes {
    pub name: String,
}

/// Site user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    pub attributes: UserAttributes,
}

/// User attributes, as sent on create/update and returned on read
///
/// Empty strings and absent blocks are omitted from the request body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserAttributes {
    pub login_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub account_enabled: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<UserPassword>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal: Option<UserPersonal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_folder: Option<UserHomeFolder>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub has_home_folder_as_root: String,
    #[serde(rename = "agreementToTermsOfService", skip_serializing_if = "String::is_empty")]
    pub agreement_to_terms: String,
    #[serde(rename = "consentToPrivacyPolicy", skip_serializing_if = "String::is_empty")]
    pub consent_to_privacy: String,
    #[serde(rename = "isEuDataSubject", skip_serializing_if = "String::is_empty")]
    pub is_eu_data_subject: String,
    #[serde(rename = "externalAuthentication", skip_serializing_if = "String::is_empty")]
    pub external_auth: String,
    #[serde(rename = "changePassword", skip_serializing_if = "Option::is_none")]
    pub change_password_policy: Option<ChangePasswordSet>,
}

#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPassword {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

impl std::fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserPassword")
            .field("kind", &self.kind)
            .field("value", &"<REDACTED>")
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPersonal {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserHomeFolder {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub enabled: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<UserHomeFolderValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserHomeFolderValue {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangePasswordSet {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub enabled: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<ChangePasswordSetValues>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChangePasswordSetValues {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub must_change_password: bool,
}

/// JSON:API type of event rule objects
pub const EVENT_RULE_TYPE: &str = "eventRule";

/// Event rule as returned by the API
///
/// `attributes` and `relationships` are kept as the raw JSON text the server
/// sent. Either may be absent (or `null`) in a response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRule {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub attributes: Option<Box<RawValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationships: Option<Box<RawValue>>,
}

impl EventRule {
    /// Raw attributes text, empty when the server sent none
    pub fn attributes_raw(&self) -> &str {
        self.attributes.as_deref().map(RawValue::get).unwrap_or("")
    }

    /// Raw relationships text, empty when the server sent none
    pub fn relationships_raw(&self) -> &str {
        self.relationships.as_deref().map(RawValue::get).unwrap_or("")
    }
}

/// Event rule body sent on create/update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRuleRequestData {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub attributes: Box<RawValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationships: Option<Box<RawValue>>,
}

impl EventRuleRequestData {
    /// A create request for the given attributes
    pub fn new(attributes: Box<RawValue>) -> Self {
        Self {
            kind: EVENT_RULE_TYPE.to_string(),
            id: String::new(),
            attributes,
            relationships: None,
        }
    }

    /// Address an existing rule (update requests)
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Attach relationships
    pub fn with_relationships(mut self, relationships: Option<Box<RawValue>>) -> Self {
        self.relationships = relationships;
        self
    }
}
