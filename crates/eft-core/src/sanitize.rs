// # Payload Sanitizer
//
// Event rules carry open-ended JSON that the provider does not model. Before
// such a payload reaches durable state, every object key naming a secret is
// dropped, at any depth. Canonical rendering gives a stable string form so
// that whitespace or key order in the host configuration never shows up as
// drift.
//
// Canonical form is whatever `serde_json` emits for a parsed `Value`: compact,
// object keys sorted (the default map is ordered).

use serde_json::Value;

use crate::error::Result;

/// Object keys removed from sanitized payloads, compared case-insensitively
pub const SENSITIVE_KEYS: &[&str] = &["password", "passphrase"];

/// Whether `key` names a secret
pub fn is_sensitive_key(key: &str) -> bool {
    let lower = key.to_lowercase();
    SENSITIVE_KEYS.iter().any(|sensitive| lower == *sensitive)
}

/// Strip sensitive keys from a raw JSON document
///
/// Empty input passes through unchanged. Sensitive keys disappear together
/// with their whole value; they are not replaced by `null`.
///
/// # Errors
///
/// [`Error::Parse`](crate::Error::Parse) if `raw` is not valid JSON.
pub fn sanitize(raw: &str) -> Result<String> {
    if raw.is_empty() {
        return Ok(String::new());
    }

    let mut value: Value = serde_json::from_str(raw)?;
    sanitize_value(&mut value);
    Ok(serde_json::to_string(&value)?)
}

/// Strip sensitive keys from an already-parsed value, in place
pub fn sanitize_value(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|key, _| !is_sensitive_key(key));
            for child in map.values_mut() {
                sanitize_value(child);
            }
        }
        Value::Array(items) => {
            for item in items {
                sanitize_value(item);
            }
        }
        _ => {}
    }
}

/// Render raw JSON in canonical form
///
/// Empty input maps to an empty string.
pub fn canonicalize(raw: &str) -> Result<String> {
    if raw.is_empty() {
        return Ok(String::new());
    }

    let value: Value = serde_json::from_str(raw)?;
    Ok(serde_json::to_string(&value)?)
}

/// Sanitize, then canonicalize
///
/// This is the form open-schema payloads are stored in.
pub fn sanitize_canonical(raw: &str) -> Result<String> {
    canonicalize(&sanitize(raw)?)
}
