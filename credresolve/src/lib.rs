//! # credresolve
//!
//! Command-line host for [`vault_credential_resolver`]. Builds the property
//! layers from flags and environment, runs one command and reports failures
//! through the process exit status.

pub mod cli;
pub mod output;
pub mod properties;

use log::info;
use vault_credential_resolver::{
    API_VERSION, CredentialResolver, EnvProperties, ErrorKind, PROP_ADDRESS, PROP_CA,
    PROP_TLS_SKIP_VERIFY, PropertySource, ResolveRequest, ResolverError,
};

pub use cli::{Args, Commands, OutputFormat};
pub use properties::{build_properties, cli_overrides};

/// Exit status for configuration and request errors
pub const EXIT_CONFIG: i32 = 2;
/// Exit status for transport and store errors
pub const EXIT_FETCH: i32 = 3;
/// Exit status for unusable secrets
pub const EXIT_SECRET: i32 = 4;

/// CLI error types
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Resolver(#[from] ResolverError),

    #[error("Failed to read CA file {path}: {source}")]
    CaFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON rendering error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Process exit status for this error
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Resolver(e) => match e.kind() {
                ErrorKind::Configuration | ErrorKind::InvalidRequest => EXIT_CONFIG,
                ErrorKind::Transport | ErrorKind::Fetch => EXIT_FETCH,
                ErrorKind::Parse | ErrorKind::NoData | ErrorKind::Validation => EXIT_SECRET,
            },
            AppError::CaFile { .. } => EXIT_CONFIG,
            AppError::Json(_) => EXIT_SECRET,
        }
    }
}

/// Run `command` and return the text to print on stdout
pub async fn execute_command(
    command: &Commands,
    properties: impl PropertySource,
) -> Result<String, AppError> {
    match command {
        Commands::Resolve {
            id,
            credential_type,
            ip,
            mid,
            output: format,
            show_secrets,
        } => {
            let mut request = ResolveRequest::new(id.clone());
            request.credential_type = credential_type.clone();
            request.ip = ip.clone();
            request.mid = mid.clone();

            let resolver = CredentialResolver::new(properties)?;
            let credential = resolver.resolve(&request).await?;
            info!(
                "Resolved credential id {id} with {} attribute(s)",
                credential.len()
            );

            match format {
                OutputFormat::Json => Ok(output::render_json(&credential)?),
                OutputFormat::Table => Ok(output::render_table(&credential, *show_secrets)),
            }
        }
        Commands::Types => Ok(output::render_types()),
        Commands::Version => Ok(API_VERSION.to_string()),
        Commands::HelpEnv => Ok(environment_help()),
    }
}

/// Environment variables read by the CLI
pub fn environment_help() -> String {
    let store = [
        (PROP_ADDRESS, "Store base address, http or https (required)"),
        (PROP_CA, "PEM encoded CA certificate(s) to trust"),
        (PROP_TLS_SKIP_VERIFY, "Set to 'true' to disable TLS verification"),
    ];
    let store: Vec<(String, &str)> = store
        .into_iter()
        .map(|(property, text)| (EnvProperties::env_var_name(property), text))
        .collect();
    let width = store.iter().map(|(name, _)| name.len()).max().unwrap_or(0);

    let mut help = String::from("credresolve environment variables\n\n");
    help.push_str("Secret store:\n");
    for (name, text) in &store {
        help.push_str(&format!("   {name:<width$} - {text}\n"));
    }
    help.push_str("\nLogging:\n");
    help.push_str(&format!(
        "   {:<width$} - Log filter, --log-level takes precedence\n\n",
        "RUST_LOG"
    ));
    help.push_str(
        "Command-line flags --address, --ca-file and --tls-skip-verify \
         override the variables above.\n",
    );
    help
}
