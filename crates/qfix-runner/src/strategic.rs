//! Application of a single strategic finding.
//!
//! Only one transformation is automated: creating missing `__init__.py`
//! marker files. Anything else a strategic finding suggests needs a human,
//! so it lands as a no-op rather than an error.

use std::path::Path;

use tracing::{info, warn};

use qfix_core::{safety, ApplyOutcome, StrategicFinding};

/// Marker filename recognized in `suggested_changes` and `affected_files`.
pub const MARKER_FILE: &str = "__init__.py";

pub fn apply_strategic(root: &Path, finding: &StrategicFinding) -> ApplyOutcome {
    if !safety::category_is_safe(&finding.category) {
        warn!(category = %finding.category, "strategic category rejected by allowlist");
        return ApplyOutcome::Rejected {
            reason: format!("category `{}` is not auto-applicable", finding.category),
        };
    }

    if !finding.suggested_changes.to_lowercase().contains(MARKER_FILE) {
        return ApplyOutcome::NoOp;
    }

    let mut created = Vec::new();
    for rel in &finding.affected_files {
        if !rel.ends_with(MARKER_FILE) {
            continue;
        }
        let full = match safety::resolve_under(root, rel) {
            Ok(path) => path,
            Err(e) => {
                warn!(path = rel, error = %e, "skipping affected file");
                continue;
            }
        };
        // Idempotent: an existing file is never recreated or truncated.
        if full.exists() {
            continue;
        }
        if let Some(parent) = full.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!(path = rel, error = %e, "failed to create parent directories");
                continue;
            }
        }
        match std::fs::write(&full, "") {
            Ok(()) => {
                info!(path = rel, "created marker file");
                println!("  Created: {rel}");
                created.push(rel.clone());
            }
            Err(e) => warn!(path = rel, error = %e, "failed to create marker file"),
        }
    }

    if created.is_empty() {
        ApplyOutcome::NoOp
    } else {
        ApplyOutcome::Applied(created)
    }
}
