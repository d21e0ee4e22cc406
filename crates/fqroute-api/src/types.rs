// Wire types for the RCI JSON endpoints.

use serde::{Deserialize, Serialize};

/// Response of `show version`.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionInfo {
    /// Firmware release string, e.g. `"5.1.0"`.
    pub release: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub arch: Option<String>,
}

/// One device-resident FQDN object-group, as reported by
/// `show object-group fqdn`.
#[derive(Debug, Clone, Deserialize)]
pub struct FqdnObjectGroup {
    pub name: String,
    /// Domains currently included in the group.
    #[serde(default)]
    pub include: Vec<String>,
}

/// One dns-proxy route binding an object-group to an interface,
/// as reported by `show dns-proxy route`.
#[derive(Debug, Clone, Deserialize)]
pub struct DnsProxyRoute {
    #[serde(rename = "object-group")]
    pub object_group: String,
    pub interface: String,
}

/// Per-command status in a batch response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandStatus {
    Ok,
    Error,
}

/// Result of one command in a `parse` batch, in submission order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandOutcome {
    pub status: CommandStatus,
    #[serde(default)]
    pub message: String,
}

impl CommandOutcome {
    pub fn is_ok(&self) -> bool {
        self.status == CommandStatus::Ok
    }
}
