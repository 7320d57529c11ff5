//! Safety gates applied on top of the producer's `auto_mergeable` claim.
//!
//! The report producer is an external collaborator; its safety claims are
//! never solely trusted. Every upgrade command must match a fixed allowlist
//! of package-manager invocations before it is ever spawned, and strategic
//! findings are gated to a small set of non-semantic categories. This is a
//! best-effort guardrail, not a sandbox.

use std::path::{Component, Path, PathBuf};

use thiserror::Error;

/// Package-manager invocation prefixes an upgrade command may start with.
pub const ALLOWED_COMMAND_PREFIXES: &[&str] = &[
    "pip install",
    "python -m pip install",
    "npm install",
    "cargo update",
    "poetry add",
];

/// Strategic categories safe to auto-apply.
pub const SAFE_CATEGORIES: &[&str] = &["code_quality", "testing"];

pub fn command_is_allowed(command: &str) -> bool {
    let command = command.trim();
    ALLOWED_COMMAND_PREFIXES
        .iter()
        .any(|prefix| command.starts_with(prefix))
}

pub fn category_is_safe(category: &str) -> bool {
    SAFE_CATEGORIES.iter().any(|c| *c == category)
}

#[derive(Debug, Error)]
pub enum PathError {
    #[error("absolute paths are not allowed: {0}")]
    Absolute(String),
    #[error("path `{0}` escapes the project root")]
    Escape(String),
}

/// Resolve a report-supplied relative path under the project root.
///
/// Denies absolute paths and `..` traversal that would leave the root.
/// Normalization is lexical; no filesystem access.
pub fn resolve_under(root: &Path, rel: &str) -> Result<PathBuf, PathError> {
    let path = Path::new(rel);
    if path.is_absolute() {
        return Err(PathError::Absolute(rel.to_string()));
    }

    let mut stack: Vec<&std::ffi::OsStr> = Vec::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::Normal(segment) => stack.push(segment),
            Component::ParentDir => {
                if stack.pop().is_none() {
                    return Err(PathError::Escape(rel.to_string()));
                }
            }
            _ => return Err(PathError::Escape(rel.to_string())),
        }
    }

    let mut resolved = root.to_path_buf();
    for segment in stack {
        resolved.push(segment);
    }
    Ok(resolved)
}
