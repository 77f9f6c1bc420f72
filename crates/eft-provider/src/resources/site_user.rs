//! `globalscapeeft_site_user`: a user account within one site

use async_trait::async_trait;
use eft_core::models::{
    User, UserAttributes, UserHomeFolder, UserHomeFolderValue, UserPassword, UserPersonal,
};
use eft_core::schema::{Attribute, AttributeKind, Schema};
use eft_core::{AdminApi, Error, ImportId, Resource, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;

use super::{YES_NO_INHERIT, decode_plan, decode_state, non_empty, require_api};

const DEFAULT_PASSWORD_TYPE: &str = "Default";
const INHERIT: &str = "inherit";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct SiteUserModel {
    pub id: Option<String>,
    pub site_id: String,
    pub login_name: String,
    pub password: Option<String>,
    pub password_type: Option<String>,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub account_enabled: Option<String>,
    pub home_folder_path: Option<String>,
    pub home_folder_enabled: Option<String>,
    pub home_folder_root: Option<String>,
}

fn value_or_empty(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

impl SiteUserModel {
    /// Request attributes
    ///
    /// Blocks are only sent when at least one of their fields is set.
    fn to_api(&self) -> UserAttributes {
        let mut attrs = UserAttributes {
            login_name: self.login_name.clone(),
            account_enabled: value_or_empty(&self.account_enabled).to_string(),
            has_home_folder_as_root: value_or_empty(&self.home_folder_root).to_string(),
            ..Default::default()
        };

        let name = value_or_empty(&self.display_name);
        let email = value_or_empty(&self.email);
        if !name.is_empty() || !email.is_empty() {
            attrs.personal = Some(UserPersonal {
                name: name.to_string(),
                email: email.to_string(),
                ..Default::default()
            });
        }

        let password = value_or_empty(&self.password);
        if !password.is_empty() {
            attrs.password = Some(UserPassword {
                kind: value_or_empty(&self.password_type).to_string(),
                value: password.to_string(),
            });
        }

        let enabled = value_or_empty(&self.home_folder_enabled);
        let path = value_or_empty(&self.home_folder_path);
        if !enabled.is_empty() || !path.is_empty() {
            attrs.home_folder = Some(UserHomeFolder {
                enabled: enabled.to_string(),
                value: non_empty(path).map(|path| UserHomeFolderValue { path }),
            });
        }

        attrs
    }

    /// Overwrite the server-owned fields from a response
    fn merge_api(&mut self, user: User) {
        let attrs = user.attributes;
        self.id = Some(user.id);
        self.login_name = attrs.login_name;

        match attrs.personal {
            Some(personal) => {
                self.display_name = Some(personal.name);
                self.email = Some(personal.email);
            }
            None => {
                self.display_name = None;
                self.email = None;
            }
        }

        self.account_enabled = non_empty(&attrs.account_enabled);

        match attrs.home_folder {
            Some(folder) => {
                self.home_folder_enabled = Some(folder.enabled);
                self.home_folder_path = folder.value.map(|v| v.path);
            }
            None => {
                self.home_folder_enabled = None;
                self.home_folder_path = None;
            }
        }

        self.home_folder_root = non_empty(&attrs.has_home_folder_as_root);

        // Write-only
        self.password = None;
    }
}

/// Site user resource
#[derive(Default)]
pub struct SiteUserResource {
    api: Option<Arc<dyn AdminApi>>,
}

impl SiteUserResource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn boxed() -> Box<dyn Resource> {
        Box::new(Self::new())
    }
}

fn require_id(model: &SiteUserModel) -> Result<&str> {
    match model.id.as_deref() {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(Error::validation("site user state has no id")),
    }
}

#[async_trait]
impl Resource for SiteUserResource {
    fn type_suffix(&self) -> &'static str {
        "site_user"
    }

    fn schema(&self) -> Schema {
        Schema::new("Manages Globalscape EFT users for a specific site.")
            .with_attribute(
                "id",
                Attribute::computed(AttributeKind::String).describe("User identifier assigned by EFT."),
            )
            .with_attribute(
                "site_id",
                Attribute::required(AttributeKind::String)
                    .describe("Site identifier that owns the user.")
                    .requires_replace(),
            )
            .with_attribute(
                "login_name",
                Attribute::required(AttributeKind::String)
                    .describe("Unique login name for the user.")
                    .requires_replace(),
            )
            .with_attribute(
                "password",
                Attribute::optional(AttributeKind::String)
                    .describe("Password for EFT local accounts.")
                    .sensitive(),
            )
            .with_attribute(
                "password_type",
                Attribute::optional_computed(AttributeKind::String)
                    .describe("Password type as expected by EFT (for example `Default` or `Disabled`).")
                    .with_default(DEFAULT_PASSWORD_TYPE),
            )
            .with_attribute(
                "display_name",
                Attribute::optional(AttributeKind::String).describe("Friendly display name."),
            )
            .with_attribute(
                "email",
                Attribute::optional(AttributeKind::String).describe("User email address."),
            )
            .with_attribute(
                "account_enabled",
                Attribute::optional_computed(AttributeKind::String)
                    .describe("Account enablement flag (`yes`, `no`, or `inherit`).")
                    .with_default(INHERIT)
                    .one_of(YES_NO_INHERIT),
            )
            .with_attribute(
                "home_folder_path",
                Attribute::optional(AttributeKind::String).describe("Path for the user's home folder."),
            )
            .with_attribute(
                "home_folder_enabled",
                Attribute::optional_computed(AttributeKind::String)
                    .describe("Whether the home folder is enabled (`yes`, `no`, or `inherit`).")
                    .with_default(INHERIT)
                    .one_of(YES_NO_INHERIT),
            )
            .with_attribute(
                "home_folder_root",
                Attribute::optional_computed(AttributeKind::String)
                    .describe("Controls if the home folder is treated as root (`yes`, `no`, or `inherit`).")
                    .with_default(INHERIT)
                    .one_of(YES_NO_INHERIT),
            )
    }

    fn configure(&mut self, api: Option<Arc<dyn AdminApi>>) {
        if api.is_some() {
            self.api = api;
        }
    }

    async fn create(&self, plan: Value) -> Result<Value> {
        let api = require_api(&self.api)?;
        let mut model: SiteUserModel = decode_plan(&self.schema(), plan)?;

        let user = api.create_site_user(&model.site_id, &model.to_api()).await?;
        tracing::info!("Created user {} ({}) in site {}", model.login_name, user.id, model.site_id);

        model.merge_api(user);
        Ok(serde_json::to_value(model)?)
    }

    async fn read(&self, state: Value) -> Result<Value> {
        let api = require_api(&self.api)?;
        let mut model: SiteUserModel = decode_state(state)?;
        let id = require_id(&model)?.to_string();

        let user = api.get_site_user(&model.site_id, &id).await?;
        model.merge_api(user);
        Ok(serde_json::to_value(model)?)
    }

    async fn update(&self, plan: Value) -> Result<Value> {
        let api = require_api(&self.api)?;
        let mut model: SiteUserModel = decode_plan(&self.schema(), plan)?;
        let id = require_id(&model)?.to_string();

        let user = api.update_site_user(&model.site_id, &id, &model.to_api()).await?;
        tracing::info!("Updated user {} in site {}", id, model.site_id);

        model.merge_api(user);
        Ok(serde_json::to_value(model)?)
    }

    async fn delete(&self, state: Value) -> Result<()> {
        let api = require_api(&self.api)?;
        let model: SiteUserModel = decode_state(state)?;
        let id = require_id(&model)?;

        api.delete_site_user(&model.site_id, id).await?;
        tracing::info!("Deleted user {} from site {}", id, model.site_id);
        Ok(())
    }

    fn import_state(&self, id: &str) -> Result<Value> {
        let import = ImportId::parse(id, "user_id")?;
        Ok(json!({
            "site_id": import.site_id,
            "id": import.resource_id,
            "password_type": DEFAULT_PASSWORD_TYPE,
        }))
    }
}
