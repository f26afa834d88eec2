//! Property assembly for the CLI host
//!
//! Command-line flags form the top layer, the process environment the one
//! below it.

use log::debug;
use std::collections::HashMap;
use std::path::Path;
use vault_credential_resolver::{
    EnvProperties, LayeredProperties, PROP_ADDRESS, PROP_CA, PROP_TLS_SKIP_VERIFY,
};

use crate::AppError;
use crate::cli::Args;

/// Collect the properties given on the command line.
///
/// The CA file is read here so the resolver sees PEM text, the same shape it
/// gets from the environment.
pub fn cli_overrides(args: &Args) -> Result<HashMap<String, String>, AppError> {
    let mut overrides = HashMap::new();

    if let Some(address) = &args.address {
        overrides.insert(PROP_ADDRESS.to_string(), address.clone());
    }
    if let Some(path) = &args.ca_file {
        overrides.insert(PROP_CA.to_string(), read_ca_file(path)?);
    }
    if args.tls_skip_verify {
        overrides.insert(PROP_TLS_SKIP_VERIFY.to_string(), "true".to_string());
    }

    debug!("{} propert(ies) overridden on the command line", overrides.len());
    Ok(overrides)
}

/// Command-line overrides on top of `MID_EXTERNAL_CREDENTIALS_VAULT_*`
/// environment variables
pub fn build_properties(args: &Args) -> Result<LayeredProperties, AppError> {
    Ok(LayeredProperties::new()
        .with_layer(cli_overrides(args)?)
        .with_layer(EnvProperties))
}

fn read_ca_file(path: &Path) -> Result<String, AppError> {
    std::fs::read_to_string(path).map_err(|source| AppError::CaFile {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use vault_credential_resolver::PropertySource;

    const PEM: &str = "-----BEGIN CERTIFICATE-----\nMIIB\n-----END CERTIFICATE-----\n";

    #[test]
    fn test_no_flags_no_overrides() {
        let args = Args::try_parse_from(["credresolve", "version"]).unwrap();
        assert!(cli_overrides(&args).unwrap().is_empty());
    }

    #[test]
    fn test_ca_file_contents_become_property() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(PEM.as_bytes()).unwrap();

        let args = Args::try_parse_from([
            "credresolve",
            "--ca-file",
            file.path().to_str().unwrap(),
            "--address",
            "https://vault.example.com",
            "--tls-skip-verify",
            "types",
        ])
        .unwrap();

        let properties = build_properties(&args).unwrap();
        assert_eq!(properties.property(PROP_CA).as_deref(), Some(PEM));
        assert_eq!(
            properties.property(PROP_ADDRESS).as_deref(),
            Some("https://vault.example.com")
        );
        assert_eq!(
            properties.property(PROP_TLS_SKIP_VERIFY).as_deref(),
            Some("true")
        );
    }

    #[test]
    fn test_missing_ca_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.pem");
        let args = Args::try_parse_from([
            "credresolve",
            "--ca-file",
            missing.to_str().unwrap(),
            "types",
        ])
        .unwrap();

        let err = cli_overrides(&args).unwrap_err();
        assert!(matches!(err, AppError::CaFile { .. }));
        assert!(err.to_string().contains("absent.pem"));
    }
}
