//! Direct on-disk patching of dependency-manifest files.

use std::path::Path;

use tracing::warn;

use qfix_core::manifest::{self, ManifestKind};

/// Rewrite the version for `dep` in every recognized manifest under `root`:
/// the fixed root-level list plus one-level-deep `*/requirements*.txt`
/// files. Returns the relative paths that were actually modified, in
/// attempt order. Per-file I/O failures are logged and skipped.
pub fn update_dependency_files(root: &Path, dep: &str, new_version: &str) -> Vec<String> {
    if dep.is_empty() || new_version.is_empty() {
        return Vec::new();
    }

    let mut modified = Vec::new();

    for (name, kind) in manifest::KNOWN_MANIFESTS {
        let path = root.join(name);
        if !path.exists() {
            continue;
        }
        if patch_file(&path, *kind, dep, new_version) {
            println!("  Updated {name}: {dep} -> {new_version}");
            modified.push(name.to_string());
        }
    }

    let mut nested = Vec::new();
    if let Ok(entries) = std::fs::read_dir(root) {
        for entry in entries.flatten() {
            let subdir = entry.path();
            if !subdir.is_dir() {
                continue;
            }
            let Some(dir_name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            // Hidden and control directories (.venv, .git) are not project
            // manifests; only plain subdirectories are scanned.
            if dir_name.starts_with('.') {
                continue;
            }
            let Ok(children) = std::fs::read_dir(&subdir) else {
                continue;
            };
            for child in children.flatten() {
                let Some(file_name) = child.file_name().to_str().map(str::to_string) else {
                    continue;
                };
                if !(file_name.starts_with("requirements") && file_name.ends_with(".txt")) {
                    continue;
                }
                if patch_file(&child.path(), ManifestKind::Requirements, dep, new_version) {
                    let rel = format!("{dir_name}/{file_name}");
                    println!("  Updated {rel}: {dep} -> {new_version}");
                    nested.push(rel);
                }
            }
        }
    }
    // read_dir order is platform-dependent; keep the reported list stable
    nested.sort();
    modified.extend(nested);

    modified
}

fn patch_file(path: &Path, kind: ManifestKind, dep: &str, new_version: &str) -> bool {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "skipping unreadable manifest");
            return false;
        }
    };
    let Some(updated) = manifest::rewrite_version(kind, &content, dep, new_version) else {
        return false;
    };
    match std::fs::write(path, updated) {
        Ok(()) => true,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to write manifest");
            false
        }
    }
}
