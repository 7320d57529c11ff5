//! Application of a single upgrade finding.

use std::path::Path;
use std::time::Duration;

use tracing::{info, warn};

use qfix_core::{safety, snapshot, ApplyOutcome, UpgradeFinding};

use crate::{command, patcher, Config};

/// Apply one upgrade finding. Prefers a direct manifest patch; falls back
/// to the finding's own command, with before/after snapshots as the source
/// of truth for what actually changed.
pub fn apply_upgrade(root: &Path, finding: &UpgradeFinding, cfg: &Config) -> ApplyOutcome {
    let Some(cmd) = finding.upgrade_command.as_deref() else {
        return ApplyOutcome::NoOp;
    };

    if !safety::command_is_allowed(cmd) {
        warn!(command = cmd, "upgrade command rejected by allowlist");
        return ApplyOutcome::Rejected {
            reason: format!("unsafe command: {cmd}"),
        };
    }

    let modified =
        patcher::update_dependency_files(root, &finding.dependency, &finding.recommended_version);
    if !modified.is_empty() {
        return ApplyOutcome::Applied(modified);
    }

    // Nothing matched in any manifest; let the command do the work and
    // diff snapshots around it rather than trusting its exit code alone.
    let before = snapshot::capture(root, &cfg.exclude_dirs);
    info!(command = cmd, "running upgrade command");
    println!("  Running: {cmd}");
    match command::run_command(root, cmd, Duration::from_secs(cfg.command_timeout_secs)) {
        Ok(_) => {
            let after = snapshot::capture(root, &cfg.exclude_dirs);
            let changed = snapshot::diff(&before, &after);
            if changed.is_empty() {
                ApplyOutcome::NoOp
            } else {
                ApplyOutcome::Applied(changed)
            }
        }
        Err(e) => ApplyOutcome::Failed {
            reason: format!("{e:#}"),
        },
    }
}
