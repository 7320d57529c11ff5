//! Report document and finding types produced by the upstream analysis step.
//!
//! The producer emits a JSON mapping from analysis-type key (`upgrade`,
//! `strategic`) to a section of findings plus a summary. Only those two
//! sections are consumed here; unknown keys are ignored. A finding is
//! actionable only when `auto_mergeable` is true, and the applicator always
//! adds its own allowlist gate on top of that claim.

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to parse quality report: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One section of the report: findings for a single analysis type.
///
/// The producer emits `{"findings": [], "summary": {...}, "error": "..."}`
/// sections when its own analysis fails, so every field is defaulted.
#[derive(Clone, Debug, Deserialize)]
pub struct AnalysisSection<T> {
    #[serde(default)]
    pub findings: Vec<T>,
    #[serde(default)]
    pub summary: Option<Summary>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Summary {
    #[serde(default)]
    pub total_findings: usize,
}

/// The full quality report document.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Report {
    #[serde(default)]
    pub upgrade: Option<AnalysisSection<UpgradeFinding>>,
    #[serde(default)]
    pub strategic: Option<AnalysisSection<StrategicFinding>>,
}

impl Report {
    pub fn from_json(raw: &str) -> Result<Self, ReportError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn upgrade_findings(&self) -> &[UpgradeFinding] {
        self.upgrade.as_ref().map_or(&[], |s| s.findings.as_slice())
    }

    pub fn strategic_findings(&self) -> &[StrategicFinding] {
        self.strategic.as_ref().map_or(&[], |s| s.findings.as_slice())
    }
}

/// A proposed dependency version bump.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct UpgradeFinding {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub dependency: String,
    #[serde(default)]
    pub recommended_version: String,
    #[serde(default)]
    pub upgrade_command: Option<String>,
    #[serde(default)]
    pub auto_mergeable: bool,
}

impl UpgradeFinding {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.dependency)
    }
}

/// A proposed repo-level improvement (non-dependency).
#[derive(Clone, Debug, Default, Deserialize)]
pub struct StrategicFinding {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub suggested_changes: String,
    #[serde(default)]
    pub affected_files: Vec<String>,
    #[serde(default)]
    pub auto_mergeable: bool,
}

impl StrategicFinding {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.category)
    }
}
