// Canonical domain types: desired groups from configuration and the
// actual state read back from the device.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::CoreError;

/// One desired domain-routing group, as declared in configuration.
///
/// Identity is the group name. Immutable for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSpec {
    pub name: String,
    /// Local list files, in declaration order.
    #[serde(default)]
    pub domain_files: Vec<PathBuf>,
    /// Remote list URLs, in declaration order.
    #[serde(default)]
    pub domain_urls: Vec<Url>,
    /// Target interface the group's traffic is routed through.
    pub interface_id: String,
}

impl GroupSpec {
    /// Structural validation, performed before any I/O.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::Config {
                message: "group name must not be empty or whitespace".into(),
            });
        }
        if self.domain_files.is_empty() && self.domain_urls.is_empty() {
            return Err(CoreError::Config {
                message: format!("group '{}' references no domain sources", self.name),
            });
        }
        if self.interface_id.trim().is_empty() {
            return Err(CoreError::Config {
                message: format!("group '{}' has an empty interface", self.name),
            });
        }
        Ok(())
    }
}

/// Validate a full configuration: every group structurally sound and
/// no duplicate group names.
pub fn validate_groups(groups: &[GroupSpec]) -> Result<(), CoreError> {
    let mut seen = BTreeSet::new();
    for group in groups {
        group.validate()?;
        if !seen.insert(group.name.as_str()) {
            return Err(CoreError::Config {
                message: format!("duplicate group name '{}'", group.name),
            });
        }
    }
    Ok(())
}

/// A group whose sources have been loaded, validated, and deduplicated.
///
/// Rebuilt on every run, never persisted. The set is ordered only to
/// make dedup and diffing deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedGroup {
    pub name: String,
    pub interface_id: String,
    pub domains: BTreeSet<String>,
}

/// Actual device state, fetched fresh (uncached) once per run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouterState {
    /// Object-group name → domains currently included.
    pub groups: BTreeMap<String, BTreeSet<String>>,
    /// Object-group name → interface of its dns-proxy route.
    pub routes: BTreeMap<String, String>,
}
