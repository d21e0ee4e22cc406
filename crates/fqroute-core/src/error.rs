// ── Core error types ──
//
// User-facing errors from fqroute-core. These are NOT API-specific --
// consumers never see HTTP status codes or JSON parse failures directly.
// The `From<fqroute_api::Error>` impl translates transport-layer errors
// into domain-appropriate variants.

use std::fmt;

use thiserror::Error;

use fqroute_api::types::CommandOutcome;

/// One non-fatal finding collected while loading and assembling groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub group: String,
    pub kind: FindingKind,
    pub detail: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindingKind {
    /// A local list file could not be read.
    FileUnreadable,
    /// A remote list could not be fetched (non-200, timeout, transport).
    FetchFailed,
    /// A group's deduplicated set exceeds the per-group domain limit.
    GroupTooLarge,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            FindingKind::FileUnreadable => "unreadable file",
            FindingKind::FetchFailed => "fetch failed",
            FindingKind::GroupTooLarge => "group too large",
        };
        write!(f, "group '{}': {kind}: {}", self.group, self.detail)
    }
}

/// Accumulated non-fatal findings, reported together after the whole
/// pipeline has run -- never short-circuited at the first failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub findings: Vec<Finding>,
}

impl LoadReport {
    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// Findings that fail the run (load errors, as opposed to limit
    /// exclusions that only drop the offending group).
    pub fn has_load_errors(&self) -> bool {
        self.findings
            .iter()
            .any(|f| f.kind != FindingKind::GroupTooLarge)
    }
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} finding(s):", self.findings.len())?;
        for finding in &self.findings {
            writeln!(f, "  - {finding}")?;
        }
        Ok(())
    }
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Pre-flight errors (no device I/O performed) ──────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Firmware {current} does not support domain routing (requires {required} or newer)")]
    UnsupportedFirmware { current: String, required: String },

    #[error("No firmware version cached -- authenticate before applying")]
    NotAuthenticated,

    // ── Pipeline errors ──────────────────────────────────────────────
    /// One or more sources failed to load; the combined report lists
    /// every finding across all groups.
    #[error("Domain sources failed to load -- {report}")]
    LoadFailed { report: LoadReport },

    // ── Device errors ────────────────────────────────────────────────
    #[error("Failed to read router state: {message}")]
    StateFetch { message: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// The device rejected at least one command in the batch. Commands
    /// accepted before the failure stay applied -- the device offers no
    /// multi-command transaction, so this carries the full per-command
    /// report instead of implying atomicity.
    #[error("Batch partially applied: {failed} of {total} command(s) failed")]
    PartialApply {
        failed: usize,
        total: usize,
        commands: Vec<String>,
        outcomes: Vec<CommandOutcome>,
    },

    #[error("Device API error: {message}")]
    Api { message: String },

    // ── Local state ──────────────────────────────────────────────────
    #[error("Cache error: {0}")]
    Cache(#[from] std::io::Error),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<fqroute_api::Error> for CoreError {
    fn from(err: fqroute_api::Error) -> Self {
        match err {
            fqroute_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            fqroute_api::Error::SessionExpired => CoreError::AuthenticationFailed {
                message: "session expired -- re-authentication required".into(),
            },
            fqroute_api::Error::Transport(e) => CoreError::Api {
                message: e.to_string(),
            },
            fqroute_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid URL: {e}"),
            },
            fqroute_api::Error::Tls(message) => CoreError::Api { message },
            fqroute_api::Error::Device { status, message } => CoreError::Api {
                message: format!("HTTP {status}: {message}"),
            },
            fqroute_api::Error::Deserialization { message, .. } => CoreError::Api {
                message: format!("unexpected device response: {message}"),
            },
        }
    }
}
