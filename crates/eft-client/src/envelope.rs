//! JSON:API envelopes
//!
//! Every body the admin API exchanges is wrapped as `{"data": ...}`.

use eft_core::models::{SmtpSettings, UserAttributes};
use serde::{Deserialize, Serialize};

/// `{"data": T}`
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }

    pub fn into_inner(self) -> T {
        self.data
    }
}

/// `{"type": ..., "attributes": ...}` without an id
#[derive(Debug, Serialize)]
pub(crate) struct Typed<A> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub attributes: A,
}

/// Attributes of the server PATCH used to replace SMTP settings
#[derive(Debug, Serialize)]
pub(crate) struct ServerSmtpPatch<'a> {
    pub smtp: &'a SmtpSettings,
}

/// `{"data":{"type":"server","attributes":{"smtp":...}}}`
pub(crate) fn server_smtp_patch(smtp: &SmtpSettings) -> Envelope<Typed<ServerSmtpPatch<'_>>> {
    Envelope::new(Typed {
        kind: "server",
        attributes: ServerSmtpPatch { smtp },
    })
}

/// `{"data":{"type":"user","attributes":...}}`
pub(crate) fn user_body(attrs: &UserAttributes) -> Envelope<Typed<&UserAttributes>> {
    Envelope::new(Typed {
        kind: "user",
        attributes: attrs,
    })
}

/// Login request body
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuthRequest<'a> {
    pub user_name: &'a str,
    pub password: &'a str,
    pub auth_type: &'a str,
}

/// Login response body
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuthResponse {
    pub auth_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn smtp_patch_is_wrapped_as_server() {
        let smtp = SmtpSettings {
            server: "smtp.example.com".into(),
            port: 25,
            ..Default::default()
        };

        let value = serde_json::to_value(server_smtp_patch(&smtp)).unwrap();
        assert_eq!(value["data"]["type"], "server");
        assert_eq!(value["data"]["attributes"]["smtp"]["server"], "smtp.example.com");
        // Full replacement: unset fields still go over the wire
        assert_eq!(value["data"]["attributes"]["smtp"]["login"], "");
        assert_eq!(value["data"]["attributes"]["smtp"]["useImplicitTLS"], false);
    }

    #[test]
    fn user_body_is_wrapped_as_user() {
        let attrs = UserAttributes {
            login_name: "bob".into(),
            ..Default::default()
        };
        let value = serde_json::to_value(user_body(&attrs)).unwrap();
        assert_eq!(value, json!({"data": {"type": "user", "attributes": {"loginName": "bob"}}}));
    }

    #[test]
    fn auth_request_uses_wire_names() {
        let body = AuthRequest {
            user_name: "admin",
            password: "pw",
            auth_type: "EFT",
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value, json!({"userName": "admin", "password": "pw", "authType": "EFT"}));
    }
}
