//! The run driver: one pass over a report, one finding at a time.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::Result;
use tracing::debug;

use qfix_core::{ApplyOutcome, Report};

use crate::{strategic, upgrade, Config};

/// Aggregate result of a run.
///
/// `applied` counts unique modified files; `skipped` counts findings that
/// produced no modification for any reason (no-op, rejected, or failed).
/// Logs distinguish the three, the counter deliberately does not.
#[derive(Clone, Debug, Default)]
pub struct RunSummary {
    pub modified_files: Vec<String>,
    pub applied: usize,
    pub skipped: usize,
}

impl RunSummary {
    /// Exit contract: failure is reserved for "changes were attempted and
    /// all were skipped".
    pub fn success(&self) -> bool {
        self.applied > 0 || self.skipped == 0
    }
}

pub struct Runner {
    pub repo_root: PathBuf,
    pub cfg: Config,
}

impl Runner {
    pub fn open(repo_root: PathBuf) -> Result<Self> {
        let cfg = Config::load_or_default(&repo_root)?;
        Ok(Self { repo_root, cfg })
    }

    /// Apply every auto-mergeable finding in the report, upgrade section
    /// first, then strategic. A failure in one finding never stops the run.
    pub fn apply_report(&self, report: &Report, dry_run: bool) -> RunSummary {
        let mut modified: BTreeSet<String> = BTreeSet::new();
        let mut skipped = 0usize;
        let mut dry_run_candidates = 0usize;

        for finding in report.upgrade_findings() {
            if !finding.auto_mergeable {
                debug!(finding = finding.display_title(), "not auto-mergeable, skipping");
                continue;
            }
            println!("\n[upgrade] {}", finding.display_title());
            if dry_run {
                println!("  (dry run, would apply)");
                dry_run_candidates += 1;
                continue;
            }
            let outcome = upgrade::apply_upgrade(&self.repo_root, finding, &self.cfg);
            record(outcome, &mut modified, &mut skipped);
        }

        for finding in report.strategic_findings() {
            if !finding.auto_mergeable {
                debug!(finding = finding.display_title(), "not auto-mergeable, skipping");
                continue;
            }
            println!("\n[strategic] {}", finding.display_title());
            if dry_run {
                println!("  (dry run, would apply)");
                dry_run_candidates += 1;
                continue;
            }
            let outcome = strategic::apply_strategic(&self.repo_root, finding);
            record(outcome, &mut modified, &mut skipped);
        }

        let modified_files: Vec<String> = modified.into_iter().collect();
        let applied = if dry_run {
            dry_run_candidates
        } else {
            modified_files.len()
        };

        RunSummary {
            modified_files,
            applied,
            skipped,
        }
    }
}

fn record(outcome: ApplyOutcome, modified: &mut BTreeSet<String>, skipped: &mut usize) {
    match outcome {
        ApplyOutcome::Applied(files) => {
            println!("  Modified files: {}", files.join(", "));
            modified.extend(files);
        }
        ApplyOutcome::NoOp => {
            println!("  No files changed, skipping");
            *skipped += 1;
        }
        ApplyOutcome::Rejected { reason } => {
            println!("  Skipping: {reason}");
            *skipped += 1;
        }
        ApplyOutcome::Failed { reason } => {
            println!("  Failed: {reason}");
            *skipped += 1;
        }
    }
}
