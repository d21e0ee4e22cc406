//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use fqroute_core::CoreError;

/// Exit codes for scripting.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const FIRMWARE: i32 = 4;
    pub const SOURCES: i32 = 5;
    pub const PARTIAL: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Invocation ───────────────────────────────────────────────────
    #[error("No router URL configured")]
    #[diagnostic(
        code(fqroute::no_router),
        help("Pass --router http://192.168.1.1 or set FQROUTE_ROUTER.")
    )]
    NoRouter,

    #[error("No credentials configured")]
    #[diagnostic(
        code(fqroute::no_credentials),
        help("Pass --login and --password, or set FQROUTE_LOGIN / FQROUTE_PASSWORD.")
    )]
    NoCredentials,

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(fqroute::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Could not read groups file {path}")]
    #[diagnostic(
        code(fqroute::config_read),
        help("Pass --config or set FQROUTE_CONFIG to point at your groups file.")
    )]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Groups file {path} is not valid YAML")]
    #[diagnostic(code(fqroute::config_parse))]
    ConfigParse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    // ── Device ───────────────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(fqroute::auth_failed),
        help("Verify the router login and password.")
    )]
    AuthFailed { message: String },

    #[error("Router firmware {current} is too old (requires {required} or newer)")]
    #[diagnostic(
        code(fqroute::firmware),
        help("Update the router firmware, then retry.")
    )]
    Firmware { current: String, required: String },

    #[error("Domain sources failed to load:\n{report}")]
    #[diagnostic(
        code(fqroute::sources),
        help("Nothing was applied. Fix the listed sources and retry.")
    )]
    SourcesFailed { report: String },

    #[error("Batch partially applied: {failed} of {total} command(s) failed")]
    #[diagnostic(
        code(fqroute::partial_apply),
        help(
            "The router has no transaction: commands before the failure stayed applied.\n\
             Re-running apply converges the remaining difference."
        )
    )]
    PartialApply {
        failed: usize,
        total: usize,
        detail: String,
    },

    #[error("Could not reach the router: {message}")]
    #[diagnostic(
        code(fqroute::connection),
        help("Check the router URL and that its web interface is up. \
              Use --insecure (-k) for self-signed certificates.")
    )]
    Connection { message: String },

    #[error("Router error: {message}")]
    #[diagnostic(code(fqroute::device))]
    Device { message: String },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoRouter | Self::NoCredentials | Self::Validation { .. } => exit_code::USAGE,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::Firmware { .. } => exit_code::FIRMWARE,
            Self::SourcesFailed { .. } => exit_code::SOURCES,
            Self::PartialApply { .. } => exit_code::PARTIAL,
            Self::Connection { .. } => exit_code::CONNECTION,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Config { message } => CliError::Validation {
                field: "groups".into(),
                reason: message,
            },

            CoreError::UnsupportedFirmware { current, required } => {
                CliError::Firmware { current, required }
            }

            CoreError::NotAuthenticated => CliError::AuthFailed {
                message: "no session established".into(),
            },

            CoreError::LoadFailed { report } => CliError::SourcesFailed {
                report: report.to_string(),
            },

            CoreError::StateFetch { message } => CliError::Connection { message },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::PartialApply {
                failed,
                total,
                commands,
                outcomes,
            } => {
                let detail = commands
                    .iter()
                    .zip(&outcomes)
                    .filter(|(_, outcome)| !outcome.is_ok())
                    .map(|(command, outcome)| format!("  {command}: {}", outcome.message))
                    .collect::<Vec<_>>()
                    .join("\n");
                CliError::PartialApply {
                    failed,
                    total,
                    detail,
                }
            }

            CoreError::Api { message } => CliError::Device { message },

            CoreError::Cache(e) => CliError::Io(e),
        }
    }
}

impl From<fqroute_api::Error> for CliError {
    fn from(err: fqroute_api::Error) -> Self {
        match err {
            fqroute_api::Error::Authentication { message } => CliError::AuthFailed { message },
            fqroute_api::Error::SessionExpired => CliError::AuthFailed {
                message: "session expired".into(),
            },
            fqroute_api::Error::Transport(e) => CliError::Connection {
                message: e.to_string(),
            },
            fqroute_api::Error::InvalidUrl(e) => CliError::Validation {
                field: "router".into(),
                reason: e.to_string(),
            },
            fqroute_api::Error::Tls(message) => CliError::Connection { message },
            fqroute_api::Error::Device { status, message } => CliError::Device {
                message: format!("HTTP {status}: {message}"),
            },
            fqroute_api::Error::Deserialization { message, .. } => CliError::Device { message },
        }
    }
}
