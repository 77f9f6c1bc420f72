// # Admin API Trait
//
// The typed operations the provider needs from an EFT server.
//
// ## Implementations
//
// - HTTP session: `eft-client` crate (`Session`)
// - Tests: in-memory fakes
//
// ## Usage
//
// ```rust,ignore
// use eft_core::AdminApi;
//
// async fn site_names(api: &dyn AdminApi) -> eft_core::Result<Vec<String>> {
//     let sites = api.list_sites().await?;
//     Ok(sites.into_iter().map(|s| s.attributes.name).collect())
// }
// ```

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{EventRule, EventRuleRequestData, Server, Site, SmtpSettings, User, UserAttributes};

/// Typed access to the EFT admin REST API
///
/// Resources and data sources receive an `Arc<dyn AdminApi>` when the
/// provider is configured; they never build HTTP requests themselves.
///
/// # Thread Safety
///
/// Implementations must be usable from concurrent tasks. The HTTP session
/// serialises token refreshes internally.
///
/// # Errors
///
/// Every method surfaces API failures unmodified: authentication problems as
/// [`Error::Authentication`](crate::Error::Authentication), status >= 400 as
/// [`Error::Request`](crate::Error::Request) and undecodable bodies as
/// [`Error::Parse`](crate::Error::Parse).
#[async_trait]
pub trait AdminApi: Send + Sync {
    /// `GET /admin/v2/server`
    async fn get_server(&self) -> Result<Server>;

    /// `PATCH /admin/v2/server` replacing the whole SMTP block
    async fn update_server_smtp(&self, smtp: &SmtpSettings) -> Result<Server>;

    /// `GET /admin/v2/sites`
    async fn list_sites(&self) -> Result<Vec<Site>>;

    /// `GET /admin/v2/sites/{site_id}/users/{user_id}`
    async fn get_site_user(&self, site_id: &str, user_id: &str) -> Result<User>;

    /// `POST /admin/v2/sites/{site_id}/users`
    async fn create_site_user(&self, site_id: &str, attrs: &UserAttributes) -> Result<User>;

    /// `PATCH /admin/v2/sites/{site_id}/users/{user_id}`
    async fn update_site_user(
        &self,
        site_id: &str,
        user_id: &str,
        attrs: &UserAttributes,
    ) -> Result<User>;

    /// `DELETE /admin/v2/sites/{site_id}/users/{user_id}`
    async fn delete_site_user(&self, site_id: &str, user_id: &str) -> Result<()>;

    /// `GET /admin/v2/sites/{site_id}/event-rules/{rule_id}`
    async fn get_event_rule(&self, site_id: &str, rule_id: &str) -> Result<EventRule>;

    /// `POST /admin/v2/sites/{site_id}/event-rules`
    async fn create_event_rule(
        &self,
        site_id: &str,
        data: &EventRuleRequestData,
    ) -> Result<EventRule>;

    /// `PATCH /admin/v2/sites/{site_id}/event-rules/{rule_id}`
    async fn update_event_rule(
        &self,
        site_id: &str,
        rule_id: &str,
        data: &EventRuleRequestData,
    ) -> Result<EventRule>;

    /// `DELETE /admin/v2/sites/{site_id}/event-rules/{rule_id}`
    async fn delete_event_rule(&self, site_id: &str, rule_id: &str) -> Result<()>;
}
