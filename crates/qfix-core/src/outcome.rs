//! Per-finding application outcome.
//!
//! Four-way where the source script coarsened to two: the run driver still
//! folds everything non-applied into a single skip counter for the emitted
//! summary, but logs can tell "nothing to do" apart from "refused" and
//! "tried and failed".

/// Result of applying a single finding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Files were confirmed modified; relative paths, in order.
    Applied(Vec<String>),
    /// Gates passed but no recognized transformation applied. Valid, not an error.
    NoOp,
    /// Refused by a safety gate; nothing was executed or written.
    Rejected { reason: String },
    /// Attempted but failed (command error, timeout).
    Failed { reason: String },
}

impl ApplyOutcome {
    pub fn modified_files(&self) -> &[String] {
        match self {
            ApplyOutcome::Applied(files) => files,
            _ => &[],
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, ApplyOutcome::Applied(_))
    }
}
