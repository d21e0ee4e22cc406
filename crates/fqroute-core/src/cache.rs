// Explicit, injectable caches (no module-level singletons):
//
// - `UrlCache` -- on-disk cache of fetched remote lists, one JSON file
//   per URL under a per-installation data directory. Expiry gates
//   network I/O only; an expired entry still supports checksum
//   comparison to detect remote-list drift.
// - `ValidationCache` -- in-memory domain → verdict memoization with
//   process lifetime. Never affects correctness, only speed.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default time-to-live for cached remote lists.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

/// Hex checksum of list content (also used to key cache files by URL).
pub fn checksum(content: &str) -> String {
    blake3::hash(content.as_bytes()).to_hex().to_string()
}

/// One persisted cache record for a remote list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlCacheEntry {
    pub content: String,
    pub checksum: String,
    pub expires_at: DateTime<Utc>,
}

impl UrlCacheEntry {
    /// Whether the entry is still within its TTL.
    pub fn is_fresh(&self) -> bool {
        Utc::now() < self.expires_at
    }
}

/// On-disk URL cache. Entries are overwritten on every successful
/// fetch and never explicitly deleted (except via [`clear`](Self::clear)).
#[derive(Debug, Clone)]
pub struct UrlCache {
    dir: PathBuf,
    ttl: Duration,
}

impl UrlCache {
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            dir: dir.into(),
            ttl,
        }
    }

    pub fn with_default_ttl(dir: impl Into<PathBuf>) -> Self {
        Self::new(dir, DEFAULT_TTL)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, url: &str) -> PathBuf {
        self.dir.join(format!("{}.json", checksum(url)))
    }

    /// Read the cached entry for a URL, fresh or expired.
    ///
    /// Unreadable or corrupt entries are treated as absent -- the cache
    /// must never block progress.
    pub fn get(&self, url: &str) -> Option<UrlCacheEntry> {
        let path = self.entry_path(url);
        let raw = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "discarding corrupt cache entry");
                None
            }
        }
    }

    /// Persist freshly fetched content, stamping checksum and expiry.
    pub fn put(&self, url: &str, content: &str) -> io::Result<UrlCacheEntry> {
        let entry = UrlCacheEntry {
            content: content.to_owned(),
            checksum: checksum(content),
            expires_at: Utc::now()
                + chrono::Duration::from_std(self.ttl)
                    .unwrap_or_else(|_| chrono::Duration::seconds(60)),
        };
        fs::create_dir_all(&self.dir)?;
        let serialized = serde_json::to_string(&entry).map_err(io::Error::other)?;
        fs::write(self.entry_path(url), serialized)?;
        Ok(entry)
    }

    /// Drop every cached entry (test/maintenance hook).
    pub fn clear(&self) -> io::Result<()> {
        if self.dir.exists() {
            fs::remove_dir_all(&self.dir)?;
        }
        Ok(())
    }
}

/// Process-lifetime memoization of domain validation verdicts.
///
/// Keys are post-prefix-stripped tokens. Explicitly injectable so tests
/// can isolate instances, and manually invalidatable.
#[derive(Debug, Default)]
pub struct ValidationCache {
    verdicts: HashMap<String, bool>,
}

impl ValidationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, token: &str) -> Option<bool> {
        self.verdicts.get(token).copied()
    }

    pub fn insert(&mut self, token: &str, accepted: bool) {
        self.verdicts.insert(token.to_owned(), accepted);
    }

    pub fn len(&self) -> usize {
        self.verdicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }

    /// Manual invalidation hook.
    pub fn clear(&mut self) {
        self.verdicts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_is_stable_and_content_sensitive() {
        assert_eq!(checksum("a.com\nb.com"), checksum("a.com\nb.com"));
        assert_ne!(checksum("a.com"), checksum("b.com"));
    }

    #[test]
    fn put_then_get_roundtrip() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let cache = UrlCache::with_default_ttl(tmp.path().join("urls"));

        let written = cache
            .put("https://example.com/list.txt", "a.com\nb.com")
            .expect("put");
        let read = cache
            .get("https://example.com/list.txt")
            .expect("entry present");

        assert_eq!(read.content, "a.com\nb.com");
        assert_eq!(read.checksum, written.checksum);
        assert!(read.is_fresh());
    }

    #[test]
    fn missing_entry_is_none() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let cache = UrlCache::with_default_ttl(tmp.path());
        assert!(cache.get("https://example.com/none.txt").is_none());
    }

    #[test]
    fn corrupt_entry_is_treated_as_absent() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let cache = UrlCache::with_default_ttl(tmp.path());
        cache.put("https://example.com/l.txt", "a.com").expect("put");

        // Overwrite the entry file with garbage.
        let garbage_path = tmp.path().join(format!(
            "{}.json",
            checksum("https://example.com/l.txt")
        ));
        fs::write(garbage_path, "not json").expect("write garbage");

        assert!(cache.get("https://example.com/l.txt").is_none());
    }

    #[test]
    fn expired_entry_is_still_returned() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let cache = UrlCache::new(tmp.path(), Duration::ZERO);
        cache.put("https://example.com/l.txt", "a.com").expect("put");

        let entry = cache.get("https://example.com/l.txt").expect("present");
        assert!(!entry.is_fresh());
        assert_eq!(entry.checksum, checksum("a.com"));
    }

    #[test]
    fn clear_removes_all_entries() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let cache = UrlCache::with_default_ttl(tmp.path().join("urls"));
        cache.put("https://example.com/l.txt", "a.com").expect("put");
        cache.clear().expect("clear");
        assert!(cache.get("https://example.com/l.txt").is_none());
    }

    #[test]
    fn validation_cache_roundtrip_and_clear() {
        let mut cache = ValidationCache::new();
        assert!(cache.get("youtube.com").is_none());

        cache.insert("youtube.com", true);
        cache.insert("youtube", false);
        assert_eq!(cache.get("youtube.com"), Some(true));
        assert_eq!(cache.get("youtube"), Some(false));
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }
}
