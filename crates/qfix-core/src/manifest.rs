//! Version rewriting for dependency-manifest files.
//!
//! These are pure text transformations: given a manifest's content and one
//! dependency bump, produce the rewritten content only when something
//! actually changed. The dependency name is matched case-insensitively and
//! anchored so that `requests` never touches a `requests-mock` line; the
//! constraint operator is preserved and only the trailing version token is
//! replaced. Regex over structured formats (TOML, INI) is a deliberate
//! simplification; multi-line specifiers and extras syntax are out of scope.

use regex::{Captures, Regex};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ManifestKind {
    /// `requirements.txt`-style line-per-dependency files.
    Requirements,
    /// Dependency specs as quoted strings inside `pyproject.toml` lists.
    PyprojectToml,
    /// Indented `install_requires` entries in `setup.cfg`.
    SetupCfg,
}

/// Root-level manifest files recognized for direct patching, in the order
/// they are attempted.
pub const KNOWN_MANIFESTS: &[(&str, ManifestKind)] = &[
    ("requirements.txt", ManifestKind::Requirements),
    ("pyproject.toml", ManifestKind::PyprojectToml),
    ("setup.cfg", ManifestKind::SetupCfg),
];

/// Rewrite the version constraint for `dep` to `new_version`.
///
/// Returns `Some` only when the content changed, so a manifest already at
/// the recommended version yields `None` (idempotence).
pub fn rewrite_version(
    kind: ManifestKind,
    content: &str,
    dep: &str,
    new_version: &str,
) -> Option<String> {
    if dep.is_empty() || new_version.is_empty() {
        return None;
    }
    match kind {
        ManifestKind::Requirements => rewrite_requirements(content, dep, new_version),
        ManifestKind::PyprojectToml => rewrite_pyproject(content, dep, new_version),
        ManifestKind::SetupCfg => rewrite_setup_cfg(content, dep, new_version),
    }
}

// Matches `dep==1.0`, `dep >= 1.0, <2`, `dep~=1.0` at line start.
fn rewrite_requirements(content: &str, dep: &str, new_version: &str) -> Option<String> {
    let pattern = format!(r"(?im)^({})\s*([><=~!]+)\s*\d[^\r\n]*", regex::escape(dep));
    let re = Regex::new(&pattern).ok()?;
    let updated = re.replace_all(content, |caps: &Captures| {
        format!("{}{}{}", &caps[1], &caps[2], new_version)
    });
    if updated == content {
        None
    } else {
        Some(updated.into_owned())
    }
}

// Matches `"dep>=1.0"`, `"dep>=1.0,<2"` inside dependency lists.
fn rewrite_pyproject(content: &str, dep: &str, new_version: &str) -> Option<String> {
    let pattern = format!(r#"(?i)("{}\s*[><=~!]+)\s*\d[^"]*""#, regex::escape(dep));
    let re = Regex::new(&pattern).ok()?;
    let updated = re.replace_all(content, |caps: &Captures| {
        format!("{}{}\"", &caps[1], new_version)
    });
    if updated == content {
        None
    } else {
        Some(updated.into_owned())
    }
}

// Matches indented `dep >= 1.0` lines under install_requires.
fn rewrite_setup_cfg(content: &str, dep: &str, new_version: &str) -> Option<String> {
    let pattern = format!(r"(?im)^(\s*{}\s*[><=~!]+)\s*\d[^\r\n]*", regex::escape(dep));
    let re = Regex::new(&pattern).ok()?;
    let updated = re.replace_all(content, |caps: &Captures| {
        format!("{}{}", &caps[1], new_version)
    });
    if updated == content {
        None
    } else {
        Some(updated.into_owned())
    }
}
