//! Async client for the router's RCI-style HTTP configuration interface.
//!
//! This crate owns everything that touches the device:
//!
//! - **[`RciClient`]** -- session-authenticated JSON client. Reads
//!   (`show version`, `show object-group fqdn`, `show dns-proxy route`)
//!   and the single batched write (`parse`).
//! - **[`TransportConfig`]** -- shared reqwest builder settings (timeout,
//!   self-signed TLS acceptance, cookie jar for the session).
//! - **Challenge-response auth** -- the device answers an unauthenticated
//!   request with a realm + challenge; [`RciClient::login`] computes the
//!   digest, establishes the session cookie, and caches the firmware
//!   version for the caller's version gate.
//!
//! `fqroute-core` maps [`Error`] into its own user-facing diagnostics;
//! consumers of that crate never see raw transport errors.

pub mod auth;
pub mod error;
pub mod rci;
pub mod transport;
pub mod types;

pub use error::Error;
pub use rci::RciClient;
pub use transport::TransportConfig;
pub use types::{CommandOutcome, CommandStatus, DnsProxyRoute, FqdnObjectGroup, VersionInfo};
