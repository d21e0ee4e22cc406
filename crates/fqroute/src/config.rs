//! Groups file loading.
//!
//! The groups file is YAML. Each group declares its sources three ways:
//!
//! - `files` -- domain list files;
//! - `urls` -- remote domain lists;
//! - `lists` -- list-of-lists files. Each referenced file is a
//!   newline-separated set of paths/URLs, expanded exactly one level
//!   into the group's flat `files`/`urls` vectors. Lines are classified
//!   by shape (`http`/`https` URL vs. path); blank lines and `#`
//!   comments are skipped. A line naming yet another list file is NOT
//!   expanded further -- it is treated as a domain file.
//!
//! `files`, `urls`, and `lists` entries may each be a single string or
//! a list of strings; nested YAML lists are spliced in, which lets
//! shared anchors contribute whole blocks:
//!
//! ```yaml
//! groups:
//!   - name: social
//!     interface: Wireguard0
//!     files:
//!       - lists/social.txt
//!       - [lists/extra-a.txt, lists/extra-b.txt]
//!     lists:
//!       - bundles/streaming.list
//! ```
//!
//! Relative paths in the groups file resolve against its directory;
//! relative paths inside a list file resolve against that list file's
//! directory. Never the process working directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use url::Url;

use fqroute_core::GroupSpec;

use crate::error::CliError;

#[derive(Debug, Deserialize)]
struct ConfigFile {
    groups: Vec<GroupEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GroupEntry {
    name: String,
    interface: String,
    #[serde(default)]
    files: Vec<Entry>,
    #[serde(default)]
    urls: Vec<Entry>,
    #[serde(default)]
    lists: Vec<Entry>,
}

/// A source entry: one value or a list spliced in via an anchor.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Entry {
    One(String),
    Many(Vec<String>),
}

fn expand(entries: Vec<Entry>) -> Vec<String> {
    let mut out = Vec::new();
    for entry in entries {
        match entry {
            Entry::One(value) => out.push(value),
            Entry::Many(values) => out.extend(values),
        }
    }
    out
}

/// Load and resolve the groups file into engine inputs.
pub fn load_groups(path: &Path) -> Result<Vec<GroupSpec>, CliError> {
    let raw = fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
        path: path.display().to_string(),
        source,
    })?;
    let file: ConfigFile =
        serde_yaml::from_str(&raw).map_err(|source| CliError::ConfigParse {
            path: path.display().to_string(),
            source,
        })?;

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    file.groups
        .into_iter()
        .map(|entry| resolve_entry(entry, base))
        .collect()
}

fn resolve_path(raw: &str, base: &Path) -> PathBuf {
    let path = PathBuf::from(raw);
    if path.is_absolute() { path } else { base.join(path) }
}

fn resolve_entry(entry: GroupEntry, base: &Path) -> Result<GroupSpec, CliError> {
    let mut domain_files: Vec<PathBuf> = expand(entry.files)
        .iter()
        .map(|raw| resolve_path(raw, base))
        .collect();

    let mut domain_urls = expand(entry.urls)
        .into_iter()
        .map(|raw| {
            raw.parse::<Url>().map_err(|e| CliError::Validation {
                field: format!("groups.{}.urls", entry.name),
                reason: format!("{raw}: {e}"),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    for raw in expand(entry.lists) {
        let list_path = resolve_path(&raw, base);
        expand_list_file(&list_path, &mut domain_files, &mut domain_urls)?;
    }

    Ok(GroupSpec {
        name: entry.name,
        domain_files,
        domain_urls,
        interface_id: entry.interface,
    })
}

/// Expand one list-of-lists file: each non-comment line is a path or a
/// URL, appended to the flat source vectors. Exactly one level -- lines
/// are never treated as further list files.
fn expand_list_file(
    list_path: &Path,
    files: &mut Vec<PathBuf>,
    urls: &mut Vec<Url>,
) -> Result<(), CliError> {
    let content = fs::read_to_string(list_path).map_err(|source| CliError::ConfigRead {
        path: list_path.display().to_string(),
        source,
    })?;
    let list_base = list_path.parent().unwrap_or_else(|| Path::new("."));

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match line.parse::<Url>() {
            Ok(url) if matches!(url.scheme(), "http" | "https") => urls.push(url),
            _ => files.push(resolve_path(line, list_base)),
        }
    }
    Ok(())
}

/// Platform cache directory for remote lists.
pub fn default_cache_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "fqroute")
        .map(|dirs| dirs.cache_dir().to_owned())
        .unwrap_or_else(|| std::env::temp_dir().join("fqroute-cache"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("fqroute.yaml");
        fs::write(&path, content).expect("write config");
        (tmp, path)
    }

    #[test]
    fn loads_groups_with_files_and_urls() {
        let (tmp, path) = write_config(
            "groups:
  - name: social
    interface: Wireguard0
    files: [social.txt]
    urls: [\"https://example.com/social.txt\"]
",
        );

        let groups = load_groups(&path).expect("loads");
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "social");
        assert_eq!(groups[0].interface_id, "Wireguard0");
        assert_eq!(groups[0].domain_files, vec![tmp.path().join("social.txt")]);
        assert_eq!(
            groups[0].domain_urls[0].as_str(),
            "https://example.com/social.txt"
        );
    }

    #[test]
    fn nested_lists_expand_one_level() {
        let (tmp, path) = write_config(
            "groups:
  - name: g
    interface: ISP
    files:
      - a.txt
      - [b.txt, c.txt]
",
        );

        let groups = load_groups(&path).expect("loads");
        assert_eq!(
            groups[0].domain_files,
            vec![
                tmp.path().join("a.txt"),
                tmp.path().join("b.txt"),
                tmp.path().join("c.txt"),
            ]
        );
    }

    #[test]
    fn absolute_paths_are_kept() {
        let (_tmp, path) = write_config(
            "groups:
  - name: g
    interface: ISP
    files: [/etc/fqroute/list.txt]
",
        );

        let groups = load_groups(&path).expect("loads");
        assert_eq!(
            groups[0].domain_files,
            vec![PathBuf::from("/etc/fqroute/list.txt")]
        );
    }

    #[test]
    fn list_file_expands_into_paths_and_urls() {
        let tmp = tempfile::tempdir().expect("tempdir");
        fs::create_dir(tmp.path().join("bundles")).expect("mkdir");
        fs::write(
            tmp.path().join("bundles/streaming.list"),
            "# streaming bundle
video.txt

https://example.com/video.txt
/etc/fqroute/extra.txt
",
        )
        .expect("write list");

        let path = tmp.path().join("fqroute.yaml");
        fs::write(
            &path,
            "groups:
  - name: g
    interface: ISP
    files: [base.txt]
    lists: [bundles/streaming.list]
",
        )
        .expect("write config");

        let groups = load_groups(&path).expect("loads");
        assert_eq!(
            groups[0].domain_files,
            vec![
                tmp.path().join("base.txt"),
                // Relative to the list file's directory, not the groups file's.
                tmp.path().join("bundles/video.txt"),
                PathBuf::from("/etc/fqroute/extra.txt"),
            ]
        );
        assert_eq!(
            groups[0].domain_urls[0].as_str(),
            "https://example.com/video.txt"
        );
    }

    #[test]
    fn list_files_expand_exactly_one_level() {
        let tmp = tempfile::tempdir().expect("tempdir");
        fs::write(tmp.path().join("inner.list"), "a.txt\n").expect("write inner");
        fs::write(tmp.path().join("outer.list"), "inner.list\n").expect("write outer");

        let path = tmp.path().join("fqroute.yaml");
        fs::write(
            &path,
            "groups:
  - name: g
    interface: ISP
    lists: [outer.list]
",
        )
        .expect("write config");

        // The line naming inner.list is a domain file, not a further list.
        let groups = load_groups(&path).expect("loads");
        assert_eq!(groups[0].domain_files, vec![tmp.path().join("inner.list")]);
    }

    #[test]
    fn unreadable_list_file_is_a_read_error() {
        let (_tmp, path) = write_config(
            "groups:
  - name: g
    interface: ISP
    lists: [missing.list]
",
        );

        match load_groups(&path) {
            Err(CliError::ConfigRead { path, .. }) => {
                assert!(path.ends_with("missing.list"), "got: {path}");
            }
            other => panic!("expected ConfigRead error, got: {other:?}"),
        }
    }

    #[test]
    fn invalid_url_is_a_validation_error() {
        let (_tmp, path) = write_config(
            "groups:
  - name: g
    interface: ISP
    urls: [\"not a url\"]
",
        );

        match load_groups(&path) {
            Err(CliError::Validation { field, .. }) => assert_eq!(field, "groups.g.urls"),
            other => panic!("expected Validation error, got: {other:?}"),
        }
    }

    #[test]
    fn unknown_field_is_a_parse_error() {
        let (_tmp, path) = write_config(
            "groups:
  - name: g
    interface: ISP
    fils: [a.txt]
",
        );

        assert!(matches!(
            load_groups(&path),
            Err(CliError::ConfigParse { .. })
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let result = load_groups(Path::new("/nonexistent/fqroute.yaml"));
        assert!(matches!(result, Err(CliError::ConfigRead { .. })));
    }
}
