// Group assembly: merge per-source tokens into one deduplicated,
// limit-checked set per group, then check cross-group invariants.

use std::collections::{BTreeMap, BTreeSet};

use tracing::info;

use crate::error::{Finding, FindingKind};
use crate::model::ResolvedGroup;

/// Device-imposed cap on domains per object-group.
pub const GROUP_DOMAIN_LIMIT: usize = 300;

/// Merge a group's accepted tokens (already concatenated in source
/// declaration order) into a deduplicated set.
///
/// Returns `None` for groups that produce nothing (skipped, not an
/// error) or exceed the limit (excluded via a finding; siblings are
/// unaffected either way).
pub fn assemble_group(
    name: &str,
    interface_id: &str,
    tokens: Vec<String>,
    findings: &mut Vec<Finding>,
) -> Option<ResolvedGroup> {
    // Sorting is not semantically significant past this point; it only
    // makes dedup and diffing deterministic.
    let domains: BTreeSet<String> = tokens.into_iter().collect();

    if domains.is_empty() {
        info!(group = name, "no domains loaded, skipping group");
        return None;
    }

    if domains.len() > GROUP_DOMAIN_LIMIT {
        findings.push(Finding {
            group: name.to_owned(),
            kind: FindingKind::GroupTooLarge,
            detail: format!(
                "{} unique domains exceed the limit of {GROUP_DOMAIN_LIMIT}",
                domains.len()
            ),
        });
        return None;
    }

    Some(ResolvedGroup {
        name: name.to_owned(),
        interface_id: interface_id.to_owned(),
        domains,
    })
}

/// Cross-group invariant: a domain claimed by more than one group is a
/// warning, never a failure -- nothing is removed or auto-resolved.
pub fn cross_group_warnings(groups: &[ResolvedGroup]) -> Vec<String> {
    let mut by_domain: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for group in groups {
        for domain in &group.domains {
            by_domain.entry(domain).or_default().push(&group.name);
        }
    }

    by_domain
        .into_iter()
        .filter(|(_, owners)| owners.len() > 1)
        .map(|(domain, owners)| {
            format!("domain '{domain}' appears in multiple groups: {}", owners.join(", "))
        })
        .collect()
}
