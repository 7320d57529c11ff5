//! Point-in-time capture of a project tree's text content.
//!
//! Snapshots exist to detect the side effects of opaque external commands:
//! capture before, capture after, diff. A partial snapshot is acceptable
//! since it is never a source of truth, only a basis for comparison.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use walkdir::WalkDir;

/// Directory names never included in a snapshot: VCS metadata, caches,
/// dependency installs, and report output.
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &[
    ".git",
    ".qfix",
    ".quality-reports",
    "_quality-action",
    "__pycache__",
    "node_modules",
    "target",
    ".venv",
];

pub fn default_excluded_dirs() -> Vec<String> {
    DEFAULT_EXCLUDED_DIRS.iter().map(|s| s.to_string()).collect()
}

/// Relative file path -> full text content, lossy UTF-8.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub files: BTreeMap<String, String>,
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Capture every regular file under `root`, skipping excluded directory
/// segments. Files that cannot be read are omitted.
pub fn capture(root: &Path, exclude_dirs: &[String]) -> Snapshot {
    let mut files = BTreeMap::new();

    // Exclusion is about path segments under the root; the root itself is
    // always walked, whatever its directory happens to be called.
    let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
        entry.depth() == 0
            || !(entry.file_type().is_dir()
                && entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| exclude_dirs.iter().any(|d| d == name)))
    });

    for entry in walker.flatten() {
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        let Some(key) = rel_key(rel) else {
            continue;
        };
        match std::fs::read(entry.path()) {
            Ok(bytes) => {
                files.insert(key, String::from_utf8_lossy(&bytes).into_owned());
            }
            Err(e) => {
                tracing::debug!(path = %entry.path().display(), error = %e, "omitting unreadable file from snapshot");
            }
        }
    }

    Snapshot { files }
}

/// Paths whose content differs between the two snapshots, lexicographically
/// sorted. Presence on only one side (created or deleted) counts as changed.
pub fn diff(before: &Snapshot, after: &Snapshot) -> Vec<String> {
    let keys: BTreeSet<&String> = before.files.keys().chain(after.files.keys()).collect();
    keys.into_iter()
        .filter(|key| before.files.get(*key) != after.files.get(*key))
        .cloned()
        .collect()
}

fn rel_key(rel: &Path) -> Option<String> {
    let parts: Vec<&str> = rel
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}
