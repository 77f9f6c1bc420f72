// # Schema Declarations
//
// Resources, data sources and the provider itself describe their state shape
// with a `Schema`. The host renders these however its protocol needs; the
// provider uses them to fill defaults into plans and to reject plan values
// before any network call.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// Value kind of an attribute
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeKind {
    String,
    Bool,
    Int64,
    /// List of strings
    StringList,
    /// Single nested object
    Object(BTreeMap<&'static str, Attribute>),
    /// List of nested objects
    ObjectList(BTreeMap<&'static str, Attribute>),
}

/// How an attribute's value is sourced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Must be set in configuration
    Required,
    /// May be set in configuration
    Optional,
    /// May be set; filled in by the provider otherwise
    OptionalComputed,
    /// Set by the provider only
    Computed,
}

/// One attribute of a schema
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub kind: AttributeKind,
    pub presence: Presence,
    pub description: &'static str,
    /// Never shown by the host
    pub sensitive: bool,
    /// Changing the value forces a new object
    pub requires_replace: bool,
    /// Value used when the plan leaves the attribute unset
    pub default: Option<Value>,
    /// Permitted values (string attributes only)
    pub one_of: Option<&'static [&'static str]>,
}

impl Attribute {
    fn new(kind: AttributeKind, presence: Presence) -> Self {
        Self {
            kind,
            presence,
            description: "",
            sensitive: false,
            requires_replace: false,
            default: None,
            one_of: None,
        }
    }

    pub fn required(kind: AttributeKind) -> Self {
        Self::new(kind, Presence::Required)
    }

    pub fn optional(kind: AttributeKind) -> Self {
        Self::new(kind, Presence::Optional)
    }

    pub fn optional_computed(kind: AttributeKind) -> Self {
        Self::new(kind, Presence::OptionalComputed)
    }

    pub fn computed(kind: AttributeKind) -> Self {
        Self::new(kind, Presence::Computed)
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn requires_replace(mut self) -> Self {
        self.requires_replace = true;
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn one_of(mut self, allowed: &'static [&'static str]) -> Self {
        self.one_of = Some(allowed);
        self
    }

    fn matches_kind(&self, value: &Value) -> bool {
        match (&self.kind, value) {
            (_, Value::Null) => true,
            (AttributeKind::String, Value::String(_)) => true,
            (AttributeKind::Bool, Value::Bool(_)) => true,
            (AttributeKind::Int64, Value::Number(n)) => n.is_i64(),
            (AttributeKind::StringList, Value::Array(items)) => items.iter().all(Value::is_string),
            (AttributeKind::Object(_), Value::Object(_)) => true,
            (AttributeKind::ObjectList(_), Value::Array(items)) => items.iter().all(Value::is_object),
            _ => false,
        }
    }
}

/// Schema of a resource, data source or provider configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    pub description: &'static str,
    pub attributes: BTreeMap<&'static str, Attribute>,
    /// Nested configuration blocks (e.g. `timeouts`)
    pub blocks: BTreeMap<&'static str, Attribute>,
}

impl Schema {
    pub fn new(description: &'static str) -> Self {
        Self {
            description,
            ..Default::default()
        }
    }

    pub fn with_attribute(mut self, name: &'static str, attribute: Attribute) -> Self {
        self.attributes.insert(name, attribute);
        self
    }

    pub fn with_block(mut self, name: &'static str, block: Attribute) -> Self {
        self.blocks.insert(name, block);
        self
    }

    /// Names of attributes whose change forces replacement
    pub fn replace_triggers(&self) -> Vec<&'static str> {
        self.attributes
            .iter()
            .filter(|(_, attr)| attr.requires_replace)
            .map(|(name, _)| *name)
            .collect()
    }

    /// Fill defaults for attributes the plan leaves unset or null
    pub fn apply_defaults(&self, plan: &mut Value) {
        let Some(map) = plan.as_object_mut() else {
            return;
        };

        for (name, attr) in &self.attributes {
            if let Some(default) = &attr.default {
                let slot = map.entry(name.to_string()).or_insert(Value::Null);
                if slot.is_null() {
                    *slot = default.clone();
                }
            }
        }
    }

    /// Check a plan against the schema
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] naming the first offending attribute when a
    /// required attribute is missing, a value has the wrong kind, or a string
    /// falls outside its permitted set.
    pub fn validate(&self, plan: &Value) -> Result<()> {
        let empty = Map::new();
        let map = match plan {
            Value::Object(map) => map,
            Value::Null => &empty,
            _ => return Err(Error::validation("plan must be a JSON object")),
        };

        for (name, attr) in &self.attributes {
            let value = map.get(*name).unwrap_or(&Value::Null);

            if attr.presence == Presence::Required && value.is_null() {
                return Err(Error::validation(format!(
                    "attribute {:?} is required",
                    name
                )));
            }

            if !attr.matches_kind(value) {
                return Err(Error::validation(format!(
                    "attribute {:?} has the wrong type: {}",
                    name, value
                )));
            }

            if let (Some(allowed), Some(s)) = (attr.one_of, value.as_str())
                && !allowed.contains(&s)
            {
                return Err(Error::validation(format!(
                    "attribute {:?} must be one of {:?}, got {:?}",
                    name, allowed, s
                )));
            }
        }

        Ok(())
    }
}
