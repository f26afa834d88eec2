//! Credential resolution: fetch, extract, validate
//!
//! [`CredentialResolver`] is the entry point a host calls once per credential
//! lookup. Each call reads the store address from the property source,
//! performs a single fetch, and returns the validated [`CredentialMap`].

use log::debug;
use std::collections::HashMap;

use crate::config::{HttpTimeouts, PropertySource, TlsSettings, vault_address};
use crate::credential_type::CredentialType;
use crate::error::{ResolverError, Result};
use crate::fetcher::{SecretFetcher, VaultHttpFetcher};
use crate::secret::{CredentialMap, extract};
use crate::validation::validate_result;

/// Secret identifier as configured on the instance
pub const ARG_ID: &str = "id";
/// IPv4 address of the target system
pub const ARG_IP: &str = "ip";
/// Credential type (ssh_password, windows, ...)
pub const ARG_TYPE: &str = "type";
/// MID server making the request
pub const ARG_MID: &str = "mid";

/// API version reported to the host
pub const API_VERSION: &str = "1.0";

/// One credential lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveRequest {
    pub id: String,
    pub credential_type: Option<String>,
    pub ip: Option<String>,
    pub mid: Option<String>,
}

impl ResolveRequest {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            credential_type: None,
            ip: None,
            mid: None,
        }
    }

    #[must_use]
    pub fn with_type(mut self, credential_type: impl Into<String>) -> Self {
        self.credential_type = Some(credential_type.into());
        self
    }

    #[must_use]
    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    #[must_use]
    pub fn with_mid(mut self, mid: impl Into<String>) -> Self {
        self.mid = Some(mid.into());
        self
    }

    /// Build a request from the host's argument map.
    ///
    /// # Errors
    ///
    /// Returns [`ResolverError::InvalidRequest`] when `id` is missing or empty.
    pub fn from_args(args: &HashMap<String, String>) -> Result<Self> {
        let id = args
            .get(ARG_ID)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                ResolverError::invalid_request(format!("'{ARG_ID}' argument is required"))
            })?;

        Ok(Self {
            id: id.clone(),
            credential_type: args.get(ARG_TYPE).cloned(),
            ip: args.get(ARG_IP).cloned(),
            mid: args.get(ARG_MID).cloned(),
        })
    }

    /// Catalog entry for the requested type; unknown names mean no type
    #[must_use]
    pub fn resolved_type(&self) -> Option<CredentialType> {
        let name = self.credential_type.as_deref()?;
        let resolved = CredentialType::from_name(name);
        if resolved.is_none() {
            debug!("Credential type '{name}' is not in the catalog, skipping type validation");
        }
        resolved
    }
}

/// Resolves credentials from the secret store.
///
/// Holds no per-call state, so one instance can serve concurrent lookups.
pub struct CredentialResolver<P, F = VaultHttpFetcher> {
    properties: P,
    fetcher: F,
}

impl<P: PropertySource> CredentialResolver<P, VaultHttpFetcher> {
    /// Create a resolver using the HTTP fetcher and default timeouts.
    ///
    /// TLS settings are read from `properties` here; the store address is
    /// read on every resolve call.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the CA material is unusable.
    pub fn new(properties: P) -> Result<Self> {
        Self::with_timeouts(properties, &HttpTimeouts::default())
    }

    /// Create a resolver using the HTTP fetcher with explicit timeouts.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the CA material is unusable.
    pub fn with_timeouts(properties: P, timeouts: &HttpTimeouts) -> Result<Self> {
        let tls = TlsSettings::from_properties(&properties);
        let fetcher = VaultHttpFetcher::new(&tls, timeouts)?;
        Ok(Self {
            properties,
            fetcher,
        })
    }
}

impl<P: PropertySource, F: SecretFetcher> CredentialResolver<P, F> {
    /// Create a resolver around a custom fetcher
    pub fn with_fetcher(properties: P, fetcher: F) -> Self {
        Self {
            properties,
            fetcher,
        }
    }

    /// API version this resolver implements
    #[must_use]
    pub fn version(&self) -> &'static str {
        API_VERSION
    }

    /// Resolve a credential.
    ///
    /// # Errors
    ///
    /// Fails with the error of the first stage that fails: configuration,
    /// request, transport, fetch, parse, missing data or validation.
    pub async fn resolve(&self, request: &ResolveRequest) -> Result<CredentialMap> {
        let address = vault_address(&self.properties)?;
        if request.id.is_empty() {
            return Err(ResolverError::invalid_request(format!(
                "'{ARG_ID}' argument is required"
            )));
        }

        debug!(
            "Resolving credential id {} (type: {}, ip: {}, mid: {})",
            request.id,
            request.credential_type.as_deref().unwrap_or("-"),
            request.ip.as_deref().unwrap_or("-"),
            request.mid.as_deref().unwrap_or("-"),
        );

        let body = self.fetcher.fetch(&address, &request.id).await?;
        let result = extract(&body)?;
        validate_result(&result, request.resolved_type())?;
        Ok(result)
    }

    /// Resolve from the host's argument map.
    ///
    /// The address is checked before the arguments, so a missing address is
    /// reported even for an empty map.
    ///
    /// # Errors
    ///
    /// Same as [`CredentialResolver::resolve`].
    pub async fn resolve_args(&self, args: &HashMap<String, String>) -> Result<CredentialMap> {
        vault_address(&self.properties)?;
        let request = ResolveRequest::from_args(args)?;
        self.resolve(&request).await
    }
}
