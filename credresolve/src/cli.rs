use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Resolve MID server credentials from a Vault compatible secret store
#[derive(Parser, Debug)]
#[command(name = "credresolve")]
#[command(about = "Resolve MID server external credentials from a Vault compatible secret store")]
#[command(version)]
pub struct Args {
    /// Set the log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// Secret store base address (overrides MID_EXTERNAL_CREDENTIALS_VAULT_ADDRESS)
    #[arg(long, global = true)]
    pub address: Option<String>,

    /// PEM file with CA certificates to trust (overrides MID_EXTERNAL_CREDENTIALS_VAULT_CA)
    #[arg(long = "ca-file", global = true)]
    pub ca_file: Option<PathBuf>,

    /// Disable TLS certificate and hostname verification (development only)
    #[arg(long = "tls-skip-verify", global = true)]
    pub tls_skip_verify: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve one credential and print its attributes
    Resolve {
        /// Secret identifier, e.g. 'secret/data/ssh'
        #[arg(long)]
        id: String,

        /// Credential type (ssh_password, windows, ssh_private_key, ...)
        #[arg(long = "type")]
        credential_type: Option<String>,

        /// IPv4 address of the target system
        #[arg(long)]
        ip: Option<String>,

        /// MID server making the request
        #[arg(long)]
        mid: Option<String>,

        /// Output format (json, table)
        #[arg(long, default_value = "json")]
        output: OutputFormat,

        /// Print values in table output instead of masking them
        #[arg(long)]
        show_secrets: bool,
    },
    /// List supported credential types and their required attributes
    Types,
    /// Print the resolver API version
    Version,
    /// Display environment variables used for configuration
    HelpEnv,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Table,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "table" => Ok(OutputFormat::Table),
            _ => Err(format!("Invalid output format: {s}")),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Table => write!(f, "table"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resolve_defaults() {
        let args = Args::try_parse_from(["credresolve", "resolve", "--id", "kv/user"]).unwrap();
        assert_eq!(args.log_level, "info");
        assert!(!args.tls_skip_verify);
        match args.command {
            Commands::Resolve {
                id,
                credential_type,
                output,
                show_secrets,
                ..
            } => {
                assert_eq!(id, "kv/user");
                assert_eq!(credential_type, None);
                assert_eq!(output, OutputFormat::Json);
                assert!(!show_secrets);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_global_overrides_after_subcommand() {
        let args = Args::try_parse_from([
            "credresolve",
            "resolve",
            "--id",
            "kv/user",
            "--type",
            "windows",
            "--output",
            "TABLE",
            "--address",
            "https://vault:8200",
            "--tls-skip-verify",
        ])
        .unwrap();

        assert_eq!(args.address.as_deref(), Some("https://vault:8200"));
        assert!(args.tls_skip_verify);
        assert!(matches!(
            args.command,
            Commands::Resolve {
                output: OutputFormat::Table,
                ..
            }
        ));
    }

    #[test]
    fn test_resolve_requires_id() {
        assert!(Args::try_parse_from(["credresolve", "resolve"]).is_err());
    }

    #[test]
    fn test_type_help_lists_catalog_names() {
        use clap::CommandFactory;
        use vault_credential_resolver::CredentialType;

        let command = Args::command();
        let resolve = command.find_subcommand("resolve").unwrap();
        let help = resolve
            .get_arguments()
            .find(|arg| arg.get_id() == "credential_type")
            .and_then(|arg| arg.get_help())
            .unwrap()
            .to_string();

        let (_, listed) = help.split_once('(').unwrap();
        let (listed, _) = listed.split_once(')').unwrap();
        for name in listed.split(", ").filter(|name| *name != "...") {
            assert!(CredentialType::from_name(name).is_some(), "{name} is not a catalog type");
        }
    }

    #[test]
    fn test_invalid_output_format() {
        let err = "xml".parse::<OutputFormat>().unwrap_err();
        assert_eq!(err, "Invalid output format: xml");
    }
}
