// Domain source loading.
//
// Turns a group's file paths and URLs into labeled raw-line sequences.
// Failures are accumulated as findings, never short-circuited: one bad
// source must not hide problems in the others, and the engine decides
// afterwards whether the run may proceed.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info, warn};
use url::Url;

use crate::cache::UrlCache;
use crate::error::{CoreError, Finding, FindingKind};
use crate::model::GroupSpec;

/// Fixed remote-fetch timeout so one unreachable list cannot stall the
/// whole run.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Identifies where a batch of raw lines came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceId {
    File(PathBuf),
    Url(Url),
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "file {}", path.display()),
            Self::Url(url) => write!(f, "url {url}"),
        }
    }
}

/// Raw lines from one source, in file order.
#[derive(Debug, Clone)]
pub struct RawSource {
    pub id: SourceId,
    pub lines: Vec<String>,
}

/// Loads a group's sources, consulting the URL cache for remote lists.
pub struct SourceLoader<'a> {
    http: reqwest::Client,
    cache: &'a UrlCache,
}

impl<'a> SourceLoader<'a> {
    pub fn new(cache: &'a UrlCache) -> Result<Self, CoreError> {
        let http = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| CoreError::Api {
                message: format!("failed to build list fetcher: {e}"),
            })?;
        Ok(Self { http, cache })
    }

    /// Load every source of `spec` in declaration order (files, then
    /// URLs). Sources that fail land in `findings`; the group continues
    /// with whatever loaded.
    pub async fn load_group(&self, spec: &GroupSpec, findings: &mut Vec<Finding>) -> Vec<RawSource> {
        let mut sources = Vec::with_capacity(spec.domain_files.len() + spec.domain_urls.len());

        for path in &spec.domain_files {
            match read_file(path) {
                Ok(lines) => sources.push(RawSource {
                    id: SourceId::File(path.clone()),
                    lines,
                }),
                Err(e) => findings.push(Finding {
                    group: spec.name.clone(),
                    kind: FindingKind::FileUnreadable,
                    detail: format!("{}: {e}", path.display()),
                }),
            }
        }

        for url in &spec.domain_urls {
            match self.fetch_url(url).await {
                Ok(lines) => sources.push(RawSource {
                    id: SourceId::Url(url.clone()),
                    lines,
                }),
                Err(detail) => findings.push(Finding {
                    group: spec.name.clone(),
                    kind: FindingKind::FetchFailed,
                    detail: format!("{url}: {detail}"),
                }),
            }
        }

        sources
    }

    /// Resolve one remote list, preferring a fresh cache entry.
    ///
    /// On a real fetch, the new checksum is compared against the
    /// previous entry's -- even an expired one -- and a drift notice is
    /// logged on mismatch. The fresh content is then persisted with a
    /// new TTL.
    async fn fetch_url(&self, url: &Url) -> Result<Vec<String>, String> {
        let previous = self.cache.get(url.as_str());
        if let Some(ref entry) = previous {
            if entry.is_fresh() {
                debug!(%url, "using cached list");
                return Ok(split_lines(&entry.content));
            }
        }

        let resp = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| e.to_string())?;
        let status = resp.status();
        if !status.is_success() {
            return Err(format!("HTTP {}", status.as_u16()));
        }
        let content = resp.text().await.map_err(|e| e.to_string())?;

        match self.cache.put(url.as_str(), &content) {
            Ok(entry) => {
                if let Some(old) = previous {
                    if old.checksum != entry.checksum {
                        info!(%url, "remote list content changed since last fetch");
                    }
                }
            }
            Err(e) => warn!(%url, error = %e, "failed to persist cache entry"),
        }

        Ok(split_lines(&content))
    }
}

fn read_file(path: &Path) -> std::io::Result<Vec<String>> {
    Ok(split_lines(&fs::read_to_string(path)?))
}

fn split_lines(content: &str) -> Vec<String> {
    content.lines().map(str::to_owned).collect()
}
