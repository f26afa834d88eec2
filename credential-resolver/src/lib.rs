//! # Vault Credential Resolver
//!
//! Resolves MID server external credentials from a HashiCorp Vault
//! compatible key/value store.
//!
//! A resolve call takes a secret id and an optional credential type, reads
//! `GET {address}/v1/{id}` from the store, normalises the returned secret into
//! a flat map of credential attributes, and checks that the attributes the
//! credential type needs are present.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::collections::HashMap;
//! use vault_credential_resolver::{CredentialResolver, PROP_ADDRESS, ResolveRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let properties = HashMap::from([(
//!         PROP_ADDRESS.to_string(),
//!         "http://127.0.0.1:8200".to_string(),
//!     )]);
//!
//!     let resolver = CredentialResolver::new(properties)?;
//!     let request = ResolveRequest::new("secret/data/ssh").with_type("ssh_private_key");
//!     let credential = resolver.resolve(&request).await?;
//!
//!     for key in credential.keys() {
//!         println!("resolved {key}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Secret shapes
//!
//! Both flat secrets (`{"data": {"username": ...}}`) and KV v2 secrets
//! (`{"data": {"data": {"username": ...}, "metadata": {...}}}`) are accepted.
//! A nested `data` value is only unwrapped when it is a JSON object, so a flat
//! secret with a scalar `data` field still resolves. A flat secret whose
//! `data` field holds an object is indistinguishable from KV v2 and will be
//! unwrapped.
//!
//! ## Output keys
//!
//! | Key | Source fields, first present wins |
//! |---|---|
//! | `user` | `access_key`, `username` |
//! | `pswd` | `secret_key`, `current_password`, `password` |
//! | `pkey` | `private_key` |
//! | `passphrase` | `passphrase` |
//! | `authprotocol`, `authkey`, `privprotocol`, `privkey` | field of the same name |

pub mod config;
pub mod credential_type;
pub mod error;
pub mod fetcher;
pub mod resolver;
pub mod secret;
pub mod validation;

pub use config::{
    EnvProperties, FnProperties, HttpTimeouts, LayeredProperties, PROP_ADDRESS, PROP_CA,
    PROP_TLS_SKIP_VERIFY, PropertySource, TlsSettings, from_fn, vault_address,
};
pub use credential_type::CredentialType;
pub use error::{ErrorKind, ResolverError, Result};
pub use fetcher::{SecretFetcher, VAULT_REQUEST_HEADER, VaultErrorResponse, VaultHttpFetcher};
pub use resolver::{
    API_VERSION, ARG_ID, ARG_IP, ARG_MID, ARG_TYPE, CredentialResolver, ResolveRequest,
};
pub use secret::{
    CredentialMap, FIELD_RULES, FieldRule, SecretEnvelope, VAL_AUTHKEY, VAL_AUTHPROTO,
    VAL_PASSPHRASE, VAL_PKEY, VAL_PRIVKEY, VAL_PRIVPROTO, VAL_PSWD, VAL_USER, extract,
};
pub use validation::validate_result;

// Re-exported so callers can read resolved values without a direct dependency
pub use secrecy::{ExposeSecret, SecretString};
