// Reconciliation planning: diff desired groups against fetched device
// state into a minimal, correctly-ordered, idempotent command batch.
//
// Ordering rules:
//   1. object-groups exist before any route references them;
//   2. stale domains are removed before new ones are added, so a group
//      never transiently exceeds the per-group limit;
//   3. routes come last as the visible activation step;
//   4. a save closes every non-empty batch.
//
// This module is pure: deterministic over its inputs, no side effects,
// testable without a live device.

use serde::Serialize;

use crate::model::{ResolvedGroup, RouterState};

/// One device mutation, renderable to the device command syntax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum DeviceCommand {
    CreateGroup {
        group: String,
    },
    AddDomain {
        group: String,
        domain: String,
    },
    RemoveDomain {
        group: String,
        domain: String,
    },
    RemoveGroup {
        group: String,
    },
    /// Single command shape covering both route creation and interface
    /// update -- interface drift is never delete+recreate.
    SetRoute {
        group: String,
        interface: String,
    },
    RemoveRoute {
        group: String,
        interface: String,
    },
    SaveConfiguration,
}

impl DeviceCommand {
    /// Render to the device's command grammar.
    pub fn render(&self) -> String {
        match self {
            Self::CreateGroup { group } => format!("object-group fqdn {group}"),
            Self::AddDomain { group, domain } => {
                format!("object-group fqdn {group} include {domain}")
            }
            Self::RemoveDomain { group, domain } => {
                format!("no object-group fqdn {group} include {domain}")
            }
            Self::RemoveGroup { group } => format!("no object-group fqdn {group}"),
            Self::SetRoute { group, interface } => {
                format!("dns-proxy route object-group {group} {interface} auto")
            }
            Self::RemoveRoute { group, interface } => {
                format!("no dns-proxy route object-group {group} {interface}")
            }
            Self::SaveConfiguration => "system configuration save".into(),
        }
    }
}

/// Render a whole batch in order.
pub fn render_batch(commands: &[DeviceCommand]) -> Vec<String> {
    commands.iter().map(DeviceCommand::render).collect()
}

/// Diff desired groups against actual state into an ordered batch.
///
/// An empty batch means the device already converged; the caller
/// performs a no-op.
pub fn plan(desired: &[ResolvedGroup], state: &RouterState) -> Vec<DeviceCommand> {
    let mut commands = Vec::new();

    for group in desired {
        match state.groups.get(&group.name) {
            None => {
                commands.push(DeviceCommand::CreateGroup {
                    group: group.name.clone(),
                });
                for domain in &group.domains {
                    commands.push(DeviceCommand::AddDomain {
                        group: group.name.clone(),
                        domain: domain.clone(),
                    });
                }
            }
            Some(current) => {
                // Drift cleanup before additions.
                for stale in current.difference(&group.domains) {
                    commands.push(DeviceCommand::RemoveDomain {
                        group: group.name.clone(),
                        domain: stale.clone(),
                    });
                }
                for missing in group.domains.difference(current) {
                    commands.push(DeviceCommand::AddDomain {
                        group: group.name.clone(),
                        domain: missing.clone(),
                    });
                }
            }
        }
    }

    // Routes after all group/domain commands: a route may only
    // reference an object-group that already exists.
    for group in desired {
        let current_interface = state.routes.get(&group.name);
        if current_interface != Some(&group.interface_id) {
            commands.push(DeviceCommand::SetRoute {
                group: group.name.clone(),
                interface: group.interface_id.clone(),
            });
        }
    }

    seal(commands)
}

/// Removal plan for the caller-supplied group names. No domain pipeline
/// involved; groups absent from the device are skipped silently.
pub fn plan_delete(names: &[String], state: &RouterState) -> Vec<DeviceCommand> {
    let mut commands = Vec::new();

    for name in names {
        // Route first -- it references the group.
        if let Some(interface) = state.routes.get(name) {
            commands.push(DeviceCommand::RemoveRoute {
                group: name.clone(),
                interface: interface.clone(),
            });
        }
        if state.groups.contains_key(name) {
            commands.push(DeviceCommand::RemoveGroup {
                group: name.clone(),
            });
        }
    }

    seal(commands)
}

fn seal(mut commands: Vec<DeviceCommand>) -> Vec<DeviceCommand> {
    if !commands.is_empty() {
        commands.push(DeviceCommand::SaveConfiguration);
    }
    commands
}
