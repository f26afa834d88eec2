//! Configuration lookup for the resolver
//!
//! The host supplies configuration as named string properties. Everything the
//! resolver needs goes through [`PropertySource`], so the core can be driven
//! by a plain map in tests and by the process environment in the CLI.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

use crate::error::{ResolverError, Result};

/// Base address of the secret store (required)
pub const PROP_ADDRESS: &str = "mid.external_credentials.vault.address";
/// PEM encoded CA certificate(s) to trust when talking to the store
pub const PROP_CA: &str = "mid.external_credentials.vault.ca";
/// Disable TLS certificate and hostname verification
pub const PROP_TLS_SKIP_VERIFY: &str = "mid.external_credentials.vault.tls_skip_verify";

/// Capability to look up a configured property by name
pub trait PropertySource: Send + Sync {
    /// Return the configured value, or `None` when the property is not set
    fn property(&self, name: &str) -> Option<String>;
}

impl PropertySource for HashMap<String, String> {
    fn property(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl<T: PropertySource + ?Sized> PropertySource for &T {
    fn property(&self, name: &str) -> Option<String> {
        (**self).property(name)
    }
}

impl<T: PropertySource + ?Sized> PropertySource for Box<T> {
    fn property(&self, name: &str) -> Option<String> {
        (**self).property(name)
    }
}

/// Property source backed by a closure
pub struct FnProperties<F>(F);

/// Wrap a lookup closure as a [`PropertySource`]
pub fn from_fn<F>(lookup: F) -> FnProperties<F>
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    FnProperties(lookup)
}

impl<F> PropertySource for FnProperties<F>
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn property(&self, name: &str) -> Option<String> {
        (self.0)(name)
    }
}

/// Reads properties from environment variables.
///
/// `mid.external_credentials.vault.address` is looked up as
/// `MID_EXTERNAL_CREDENTIALS_VAULT_ADDRESS`.
#[derive(Debug, Clone, Default)]
pub struct EnvProperties;

impl EnvProperties {
    #[must_use]
    pub fn env_var_name(property: &str) -> String {
        property
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect()
    }
}

impl PropertySource for EnvProperties {
    fn property(&self, name: &str) -> Option<String> {
        std::env::var(Self::env_var_name(name)).ok()
    }
}

/// Ordered stack of property sources; the first source that knows a
/// property wins.
#[derive(Default)]
pub struct LayeredProperties {
    layers: Vec<Box<dyn PropertySource>>,
}

impl LayeredProperties {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_layer(mut self, layer: impl PropertySource + 'static) -> Self {
        self.layers.push(Box::new(layer));
        self
    }
}

impl PropertySource for LayeredProperties {
    fn property(&self, name: &str) -> Option<String> {
        self.layers.iter().find_map(|layer| layer.property(name))
    }
}

/// HTTP timeout configuration for the store transport
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// TLS trust settings for the store transport
#[derive(Clone, Default, PartialEq, Eq)]
pub struct TlsSettings {
    pub ca_pem: Option<String>,
    pub skip_verify: bool,
}

impl std::fmt::Debug for TlsSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsSettings")
            .field("ca_pem", &self.ca_pem.as_ref().map(|pem| pem.len()))
            .field("skip_verify", &self.skip_verify)
            .finish()
    }
}

impl TlsSettings {
    /// Read the CA and skip-verify properties. Both are optional.
    pub fn from_properties(properties: &impl PropertySource) -> Self {
        let ca_pem = properties
            .property(PROP_CA)
            .filter(|pem| !pem.trim().is_empty());
        let skip_verify = properties
            .property(PROP_TLS_SKIP_VERIFY)
            .is_some_and(|value| parse_flag(&value));

        debug!(
            "TLS settings: custom CA {}, skip verify {skip_verify}",
            if ca_pem.is_some() { "present" } else { "absent" }
        );

        Self {
            ca_pem,
            skip_verify,
        }
    }
}

/// Resolve the store base address, failing when it is absent or empty.
///
/// A trailing `/` is dropped so the request path can be appended directly.
pub fn vault_address(properties: &impl PropertySource) -> Result<String> {
    let address = properties
        .property(PROP_ADDRESS)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            ResolverError::configuration(format!(
                "MID server property {PROP_ADDRESS} is empty but required"
            ))
        })?;

    validate_vault_address(&address)?;
    Ok(address.trim_end_matches('/').to_string())
}

fn validate_vault_address(address: &str) -> Result<()> {
    match Url::parse(address) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.host().is_some() => Ok(()),
        Ok(url) => Err(ResolverError::configuration(format!(
            "MID server property {PROP_ADDRESS} must be an http or https URL, got scheme '{}'",
            url.scheme()
        ))),
        Err(e) => Err(ResolverError::configuration(format!(
            "MID server property {PROP_ADDRESS} is not a valid URL: {e}"
        ))),
    }
}

/// Boolean property parsing: only `true`, in any case, is true
fn parse_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}
