//! Secret fetcher: one GET against the store's read endpoint
//!
//! The fetcher knows nothing about credential semantics. It turns a base
//! address and a secret id into `GET {address}/v1/{id}` and hands back the raw
//! body, or a [`ResolverError`] describing why it could not.

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::{
    Client,
    header::{ACCEPT, HeaderMap, HeaderName, HeaderValue},
};
use serde::Deserialize;

use crate::config::{HttpTimeouts, TlsSettings};
use crate::error::{ResolverError, Result};

/// Marker header that vault agents and proxies use to recognise client requests
pub const VAULT_REQUEST_HEADER: &str = "X-Vault-Request";

/// Fixed API path segment between the base address and the secret id
const API_PREFIX: &str = "v1";

/// Retrieves raw secret documents from the store
#[async_trait]
pub trait SecretFetcher: Send + Sync {
    /// Fetch the secret at `id`, returning the response body on a 2xx status
    async fn fetch(&self, base_address: &str, id: &str) -> Result<String>;
}

/// Error document returned by the store alongside a non-2xx status
#[derive(Debug, Default, Deserialize)]
pub struct VaultErrorResponse {
    #[serde(default)]
    pub errors: Option<Vec<String>>,
    #[serde(default)]
    pub warnings: Option<Vec<String>>,
}

/// Build the read URL. The id is appended as given.
#[must_use]
pub fn secret_url(base_address: &str, id: &str) -> String {
    let mut url = String::with_capacity(
        base_address
            .len()
            .saturating_add(API_PREFIX.len())
            .saturating_add(id.len())
            .saturating_add(2),
    );
    url.push_str(base_address);
    url.push('/');
    url.push_str(API_PREFIX);
    url.push('/');
    url.push_str(id);
    url
}

/// Describe a failed read, folding in any errors and warnings the store sent
#[must_use]
pub fn failure_message(url: &str, body: &str) -> String {
    let mut message = format!("Failed to query Vault URL: {url}.");

    // Anything that is not the error document leaves the base message alone
    if let Ok(response) = serde_json::from_str::<VaultErrorResponse>(body) {
        if let Some(errors) = response.errors.filter(|e| !e.is_empty()) {
            message.push_str(&format!(" Errors: {}.", bracketed(&errors)));
        }
        if let Some(warnings) = response.warnings.filter(|w| !w.is_empty()) {
            message.push_str(&format!(" Warnings: {}.", bracketed(&warnings)));
        }
    }

    message
}

fn bracketed(items: &[String]) -> String {
    format!("[{}]", items.join(", "))
}

/// HTTP implementation of [`SecretFetcher`] over a shared `reqwest` client
#[derive(Clone, Debug)]
pub struct VaultHttpFetcher {
    client: Client,
}

impl VaultHttpFetcher {
    /// Build the fetcher and its pooled HTTP client.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the CA material cannot be parsed or
    /// the HTTP client cannot be built.
    pub fn new(tls: &TlsSettings, timeouts: &HttpTimeouts) -> Result<Self> {
        let mut client_builder = Client::builder()
            .default_headers(default_headers())
            .connect_timeout(timeouts.connect_timeout)
            .timeout(timeouts.request_timeout);

        if let Some(pem) = &tls.ca_pem {
            let certificates = reqwest::Certificate::from_pem_bundle(pem.as_bytes())
                .map_err(|e| ResolverError::configuration(format!("Invalid CA certificate: {e}")))?;
            if certificates.is_empty() {
                return Err(ResolverError::configuration(
                    "Invalid CA certificate: no PEM certificates found",
                ));
            }
            debug!("Trusting {} additional CA certificate(s)", certificates.len());
            for certificate in certificates {
                client_builder = client_builder.add_root_certificate(certificate);
            }
        }

        if tls.skip_verify {
            warn!("TLS certificate verification is disabled for Vault requests");
            client_builder = client_builder
                .danger_accept_invalid_certs(true)
                .danger_accept_invalid_hostnames(true);
        }

        let client = client_builder.build().map_err(|e| {
            ResolverError::configuration(format!("Failed to build HTTP client: {e}"))
        })?;

        Ok(Self { client })
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        HeaderName::from_static("x-vault-request"),
        HeaderValue::from_static("true"),
    );
    headers
}

#[async_trait]
impl SecretFetcher for VaultHttpFetcher {
    async fn fetch(&self, base_address: &str, id: &str) -> Result<String> {
        let url = secret_url(base_address, id);
        debug!("GET {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ResolverError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            // An unreadable error body still reports the status
            let body = response.text().await.unwrap_or_else(|e| {
                debug!("Failed to read error body from {url}: {e}");
                String::new()
            });
            return Err(ResolverError::Fetch {
                status: status.as_u16(),
                message: failure_message(&url, &body),
            });
        }

        let body = response.text().await.map_err(ResolverError::Transport)?;
        info!("Successfully queried Vault for credential id: {id}");
        Ok(body)
    }
}
