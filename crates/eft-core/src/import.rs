//! Import identifiers
//!
//! Existing remote objects are re-attached to local state with an identifier
//! of the form `<site_id>/<resource_id>`.

use crate::error::{Error, Result};

/// A parsed `<site_id>/<resource_id>` identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportId {
    /// Site that owns the object
    pub site_id: String,
    /// Identifier of the object within the site
    pub resource_id: String,
}

impl ImportId {
    /// Parse an import identifier
    ///
    /// `resource` names the object kind in the error message
    /// (e.g. `"rule_id"`).
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] unless `raw` is exactly two `/`-separated parts.
    pub fn parse(raw: &str, resource: &str) -> Result<Self> {
        let parts: Vec<&str> = raw.split('/').collect();
        match parts.as_slice() {
            [site_id, resource_id] => Ok(Self {
                site_id: (*site_id).to_string(),
                resource_id: (*resource_id).to_string(),
            }),
            _ => Err(Error::validation(format!(
                "Invalid import identifier {:?}: expected identifier in the form <site_id>/<{}>",
                raw, resource
            ))),
        }
    }
}

impl std::fmt::Display for ImportId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.site_id, self.resource_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_site_and_resource() {
        let id = ImportId::parse("site42/rule7", "rule_id").unwrap();
        assert_eq!(id.site_id, "site42");
        assert_eq!(id.resource_id, "rule7");
        assert_eq!(id.to_string(), "site42/rule7");
    }

    #[test]
    fn rejects_other_shapes() {
        for raw in ["badformat", "a/b/c", ""] {
            let err = ImportId::parse(raw, "rule_id").unwrap_err();
            assert!(matches!(err, Error::Validation(_)), "{raw}: {err:?}");
        }

        let err = ImportId::parse("badformat", "user_id").unwrap_err();
        assert!(err.to_string().contains("<site_id>/<user_id>"));
    }
}
