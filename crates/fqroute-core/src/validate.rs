// Domain line validation.
//
// Raw list lines arrive in several dialects (hosts-style lists,
// v2ray-style `full:`/`domain:` prefixes, per-line attributes like
// `@cn`). Validation is an ordered sequence of small pure rules, each
// independently testable, followed by structural acceptance as either
// a dotted-decimal IPv4 literal or a syntactically valid domain name.
//
// Rejection is not an error: rejected lines are counted and skipped.

use std::net::Ipv4Addr;

use crate::cache::ValidationCache;

/// List-notation prefixes whose match semantics are handled downstream;
/// only literal membership matters here, so the prefix is stripped.
const KNOWN_PREFIXES: [&str; 5] = ["full", "regexp", "domain", "keyword", "include"];

/// Hard upper bound on a domain name, per RFC 1035.
const MAX_DOMAIN_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

// ── Parsing rules (ordered) ─────────────────────────────────────────

/// Rule 1: trim; drop empty and `#`-comment lines silently.
pub fn strip_comment(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    Some(trimmed)
}

/// Rule 2: keep only the first whitespace-separated field, dropping
/// list-attribute suffixes like `@cn`.
pub fn first_field(token: &str) -> &str {
    token.split_whitespace().next().unwrap_or("")
}

/// Rule 3: strip a known list-notation prefix (`full:`, `domain:`, …).
/// Unknown colon-prefixed tokens pass through unchanged and will
/// typically fail domain validation.
pub fn strip_known_prefix(token: &str) -> &str {
    if let Some((prefix, rest)) = token.split_once(':') {
        if KNOWN_PREFIXES.contains(&prefix) {
            return rest;
        }
    }
    token
}

// ── Acceptance ──────────────────────────────────────────────────────

/// Dotted-decimal IPv4 literal.
pub fn is_ipv4(token: &str) -> bool {
    token.parse::<Ipv4Addr>().is_ok()
}

/// Structural domain validity: at least one dot, length bounds, label
/// alphabet, and a clean IDNA ToASCII transform. Never resolves DNS.
pub fn is_valid_domain(token: &str) -> bool {
    if !token.contains('.') || token.len() > MAX_DOMAIN_LEN {
        return false;
    }
    let labels_ok = token.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= MAX_LABEL_LEN
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_alphanumeric() || c == '-')
    });
    if !labels_ok {
        return false;
    }
    // RFC 3696: the top-level label must not be all-numeric, otherwise
    // malformed IP literals would slip through as "domains".
    if token
        .rsplit('.')
        .next()
        .is_some_and(|tld| tld.chars().all(|c| c.is_ascii_digit()))
    {
        return false;
    }
    idna::domain_to_ascii(token).is_ok()
}

fn accept(token: &str) -> bool {
    is_ipv4(token) || is_valid_domain(token)
}

// ── Validator ───────────────────────────────────────────────────────

/// Accepted tokens in input order plus the rejected-line count.
/// Duplicates are preserved; deduplication happens in the assembler.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ValidatedLines {
    pub tokens: Vec<String>,
    pub rejected: usize,
}

/// Run the rule chain over raw lines, memoizing verdicts per
/// post-prefix-stripped token in the given cache.
pub fn validate_lines(lines: &[String], cache: &mut ValidationCache) -> ValidatedLines {
    let mut result = ValidatedLines::default();

    for line in lines {
        let Some(content) = strip_comment(line) else {
            continue;
        };
        let token = strip_known_prefix(first_field(content));
        if token.is_empty() {
            result.rejected += 1;
            continue;
        }

        let accepted = match cache.get(token) {
            Some(verdict) => verdict,
            None => {
                let verdict = accept(token);
                cache.insert(token, verdict);
                verdict
            }
        };

        if accepted {
            result.tokens.push(token.to_owned());
        } else {
            result.rejected += 1;
        }
    }

    result
}
