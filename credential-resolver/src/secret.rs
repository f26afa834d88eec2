//! Secret envelope parsing and credential field extraction
//!
//! A read returns an envelope whose `data` object holds the secret fields,
//! either directly (KV v1 and most other engines) or one level deeper under
//! another `data` key (KV v2). Extraction normalises either shape into a
//! [`CredentialMap`] keyed by the host's output names.

use log::info;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::error::{ResolverError, Result};

/// User name
pub const VAL_USER: &str = "user";
/// Password
pub const VAL_PSWD: &str = "pswd";
/// Private key
pub const VAL_PKEY: &str = "pkey";
/// Private key passphrase
pub const VAL_PASSPHRASE: &str = "passphrase";
/// SNMPv3 authentication protocol
pub const VAL_AUTHPROTO: &str = "authprotocol";
/// SNMPv3 authentication key
pub const VAL_AUTHKEY: &str = "authkey";
/// SNMPv3 privacy protocol
pub const VAL_PRIVPROTO: &str = "privprotocol";
/// SNMPv3 privacy key
pub const VAL_PRIVKEY: &str = "privkey";

/// Output key and the secret fields that may populate it, first match wins
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub output: &'static str,
    pub candidates: &'static [&'static str],
}

/// Field precedence used for every extraction
pub const FIELD_RULES: &[FieldRule] = &[
    // access_key comes from the AWS secrets engine
    FieldRule {
        output: VAL_USER,
        candidates: &["access_key", "username"],
    },
    // secret_key from AWS, current_password from the AD engine
    FieldRule {
        output: VAL_PSWD,
        candidates: &["secret_key", "current_password", "password"],
    },
    FieldRule {
        output: VAL_PKEY,
        candidates: &["private_key"],
    },
    FieldRule {
        output: VAL_PASSPHRASE,
        candidates: &["passphrase"],
    },
    FieldRule {
        output: VAL_AUTHPROTO,
        candidates: &["authprotocol"],
    },
    FieldRule {
        output: VAL_AUTHKEY,
        candidates: &["authkey"],
    },
    FieldRule {
        output: VAL_PRIVPROTO,
        candidates: &["privprotocol"],
    },
    FieldRule {
        output: VAL_PRIVKEY,
        candidates: &["privkey"],
    },
];

/// Outputs reported in the field-source summary line
const SUMMARY_OUTPUTS: &[&str] = &[VAL_USER, VAL_PSWD, VAL_PKEY, VAL_PASSPHRASE];

/// Top-level document returned by a secret read.
///
/// Only `data` is interpreted. Lease metadata and warnings are accepted in
/// any JSON shape.
#[derive(Debug, Deserialize)]
pub struct SecretEnvelope {
    #[serde(default)]
    pub request_id: Option<Value>,
    #[serde(default)]
    pub lease_id: Option<Value>,
    #[serde(default)]
    pub lease_duration: Option<Value>,
    #[serde(default)]
    pub renewable: Option<Value>,
    #[serde(default)]
    pub data: Option<Map<String, Value>>,
    #[serde(default)]
    pub warnings: Option<Value>,
}

impl SecretEnvelope {
    /// Parse a response body.
    ///
    /// # Errors
    ///
    /// Returns [`ResolverError::Parse`] if the body is not a JSON object of
    /// the expected shape.
    pub fn parse(body: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(body).map_err(ResolverError::Parse)?;
        if !value.is_object() {
            return Err(ResolverError::Parse(serde::de::Error::custom(
                "expected a JSON object at the top level",
            )));
        }
        serde_json::from_value(value).map_err(ResolverError::Parse)
    }

    /// The effective secret fields, unwrapping the KV v2 nesting level.
    ///
    /// # Errors
    ///
    /// Returns [`ResolverError::NoData`] when the envelope has no `data`.
    pub fn secret_data(&self) -> Result<&Map<String, Value>> {
        let data = self.data.as_ref().ok_or(ResolverError::NoData)?;
        Ok(unwrap_versioned(data))
    }
}

/// KV v2 nests the fields under `data.data`. A `data` field that is not an
/// object belongs to a flat secret, so the outer map is used as-is.
#[must_use]
pub fn unwrap_versioned(data: &Map<String, Value>) -> &Map<String, Value> {
    match data.get("data") {
        Some(Value::Object(inner)) => inner,
        _ => data,
    }
}

/// Render a scalar secret value as text; `None` for null, arrays and objects
fn coerce_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// First candidate field with a usable value, with the field it came from
fn first_match(
    data: &Map<String, Value>,
    candidates: &'static [&'static str],
) -> Option<(&'static str, String)> {
    candidates.iter().find_map(|&field| {
        data.get(field)
            .and_then(coerce_to_string)
            .map(|value| (field, value))
    })
}

/// Flat credential mapping returned to the host.
///
/// Values are held as [`SecretString`] so `Debug` output never shows them.
#[derive(Debug, Default)]
pub struct CredentialMap(HashMap<String, SecretString>);

impl CredentialMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let value: String = value.into();
        self.0
            .insert(key.into(), SecretString::new(value.into_boxed_str()));
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&SecretString> {
        self.0.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Copy the mapping out as plain strings for the host
    #[must_use]
    pub fn expose(&self) -> HashMap<String, String> {
        self.0
            .iter()
            .map(|(k, v)| (k.clone(), v.expose_secret().to_string()))
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for CredentialMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = CredentialMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

/// Apply [`FIELD_RULES`] to already-unwrapped secret fields
#[must_use]
pub fn extract_fields(data: &Map<String, Value>) -> CredentialMap {
    let mut result = CredentialMap::new();
    let mut sources: Vec<(&'static str, Option<&'static str>)> =
        Vec::with_capacity(SUMMARY_OUTPUTS.len());

    for rule in FIELD_RULES {
        let matched = first_match(data, rule.candidates);
        if SUMMARY_OUTPUTS.contains(&rule.output) {
            sources.push((rule.output, matched.as_ref().map(|(field, _)| *field)));
        }
        if let Some((_, value)) = matched {
            result.insert(rule.output, value);
        }
    }

    let summary = sources
        .iter()
        .map(|(output, source)| format!("{output}={}", source.unwrap_or("null")))
        .collect::<Vec<_>>()
        .join(", ");
    info!("Setting values from fields {summary}");

    result
}

/// Parse a response body and extract the credential fields it carries.
///
/// # Errors
///
/// Returns [`ResolverError::Parse`] for a malformed body and
/// [`ResolverError::NoData`] when the envelope has no `data` object.
pub fn extract(body: &str) -> Result<CredentialMap> {
    let envelope = SecretEnvelope::parse(body)?;
    let data = envelope.secret_data()?;
    Ok(extract_fields(data))
}
