use std::path::Path;

use qfix_core::{ApplyOutcome, Report, StrategicFinding, UpgradeFinding};
use qfix_runner::{patcher, strategic, upgrade, Config, Runner};

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn read(root: &Path, rel: &str) -> String {
    std::fs::read_to_string(root.join(rel)).unwrap()
}

fn upgrade_finding(dep: &str, version: &str, command: Option<&str>) -> UpgradeFinding {
    UpgradeFinding {
        title: None,
        dependency: dep.to_string(),
        recommended_version: version.to_string(),
        upgrade_command: command.map(str::to_string),
        auto_mergeable: true,
    }
}

#[test]
fn upgrade_patches_requirements_directly() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "requirements.txt", "flask==2.0.0\nrequests==2.28.0\n");

    let finding = upgrade_finding("requests", "2.31.0", Some("pip install requests==2.31.0"));
    let outcome = upgrade::apply_upgrade(tmp.path(), &finding, &Config::default());

    assert_eq!(
        outcome,
        ApplyOutcome::Applied(vec!["requirements.txt".to_string()])
    );
    assert_eq!(read(tmp.path(), "requirements.txt"), "flask==2.0.0\nrequests==2.31.0\n");
}

#[test]
fn upgrade_leaves_similarly_named_packages_alone() {
    let tmp = tempfile::tempdir().unwrap();
    write(
        tmp.path(),
        "requirements.txt",
        "requests-mock==1.0.0\nrequests==2.28.0\n",
    );

    let finding = upgrade_finding("requests", "2.31.0", Some("pip install requests==2.31.0"));
    let outcome = upgrade::apply_upgrade(tmp.path(), &finding, &Config::default());

    assert!(outcome.is_applied());
    assert_eq!(
        read(tmp.path(), "requirements.txt"),
        "requests-mock==1.0.0\nrequests==2.31.0\n"
    );
}

#[test]
fn upgrade_patches_every_matching_manifest() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "requirements.txt", "requests==2.28.0\n");
    write(
        tmp.path(),
        "pyproject.toml",
        "[project]\ndependencies = [\"requests>=2.28.0\"]\n",
    );
    write(tmp.path(), "docs/requirements-dev.txt", "requests==2.28.0\n");

    let finding = upgrade_finding("requests", "2.31.0", Some("pip install requests==2.31.0"));
    let outcome = upgrade::apply_upgrade(tmp.path(), &finding, &Config::default());

    assert_eq!(
        outcome.modified_files(),
        [
            "requirements.txt".to_string(),
            "pyproject.toml".to_string(),
            "docs/requirements-dev.txt".to_string(),
        ]
    );
    assert!(read(tmp.path(), "pyproject.toml").contains("\"requests>=2.31.0\""));
    assert_eq!(read(tmp.path(), "docs/requirements-dev.txt"), "requests==2.31.0\n");
}

#[test]
fn hidden_directories_are_not_scanned_for_requirements() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), ".venv/requirements.txt", "requests==2.28.0\n");
    write(tmp.path(), "docs/requirements.txt", "requests==2.28.0\n");

    let modified = patcher::update_dependency_files(tmp.path(), "requests", "2.31.0");

    assert_eq!(modified, ["docs/requirements.txt".to_string()]);
    assert_eq!(read(tmp.path(), ".venv/requirements.txt"), "requests==2.28.0\n");
}

#[test]
fn unsafe_command_is_rejected_without_touching_anything() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "requirements.txt", "requests==2.28.0\n");

    let finding = upgrade_finding("requests", "2.31.0", Some("rm -rf /"));
    let outcome = upgrade::apply_upgrade(tmp.path(), &finding, &Config::default());

    assert!(matches!(outcome, ApplyOutcome::Rejected { .. }));
    assert_eq!(read(tmp.path(), "requirements.txt"), "requests==2.28.0\n");
}

#[test]
fn missing_command_is_a_noop() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "requirements.txt", "requests==2.28.0\n");

    let finding = upgrade_finding("requests", "2.31.0", None);
    let outcome = upgrade::apply_upgrade(tmp.path(), &finding, &Config::default());

    assert_eq!(outcome, ApplyOutcome::NoOp);
    assert_eq!(read(tmp.path(), "requirements.txt"), "requests==2.28.0\n");
}

#[test]
fn failing_fallback_command_is_contained() {
    // No manifest mentions the dependency, so the finding falls through to
    // its command; `cargo update` in an empty directory fails either way
    // (no Cargo.toml, or cargo not installed).
    let tmp = tempfile::tempdir().unwrap();

    let finding = upgrade_finding("left-pad", "2.0.0", Some("cargo update left-pad"));
    let outcome = upgrade::apply_upgrade(tmp.path(), &finding, &Config::default());

    assert!(matches!(outcome, ApplyOutcome::Failed { .. }));
}

#[test]
fn direct_patch_is_idempotent() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "requirements.txt", "requests==2.28.0\n");

    let first = patcher::update_dependency_files(tmp.path(), "requests", "2.31.0");
    assert_eq!(first, ["requirements.txt".to_string()]);

    let second = patcher::update_dependency_files(tmp.path(), "requests", "2.31.0");
    assert!(second.is_empty());
    assert_eq!(read(tmp.path(), "requirements.txt"), "requests==2.31.0\n");
}

fn strategic_finding(category: &str, changes: &str, files: &[&str]) -> StrategicFinding {
    StrategicFinding {
        title: None,
        category: category.to_string(),
        suggested_changes: changes.to_string(),
        affected_files: files.iter().map(|s| s.to_string()).collect(),
        auto_mergeable: true,
    }
}

#[test]
fn creates_missing_marker_files() {
    let tmp = tempfile::tempdir().unwrap();

    let finding = strategic_finding(
        "code_quality",
        "add missing __init__.py",
        &["src/newpkg/__init__.py"],
    );
    let outcome = strategic::apply_strategic(tmp.path(), &finding);

    assert_eq!(
        outcome,
        ApplyOutcome::Applied(vec!["src/newpkg/__init__.py".to_string()])
    );
    assert_eq!(read(tmp.path(), "src/newpkg/__init__.py"), "");
}

#[test]
fn marker_creation_never_overwrites_existing_files() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "src/pkg/__init__.py", "# hand-edited\n");

    let finding = strategic_finding(
        "code_quality",
        "add missing __init__.py",
        &["src/pkg/__init__.py"],
    );
    let outcome = strategic::apply_strategic(tmp.path(), &finding);

    assert_eq!(outcome, ApplyOutcome::NoOp);
    assert_eq!(read(tmp.path(), "src/pkg/__init__.py"), "# hand-edited\n");
}

#[test]
fn unsafe_category_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();

    let finding = strategic_finding(
        "security",
        "add missing __init__.py",
        &["src/pkg/__init__.py"],
    );
    let outcome = strategic::apply_strategic(tmp.path(), &finding);

    assert!(matches!(outcome, ApplyOutcome::Rejected { .. }));
    assert!(!tmp.path().join("src/pkg/__init__.py").exists());
}

#[test]
fn unrecognized_suggestion_is_a_noop() {
    let tmp = tempfile::tempdir().unwrap();

    let finding = strategic_finding("testing", "add more unit tests", &["tests/test_api.py"]);
    assert_eq!(strategic::apply_strategic(tmp.path(), &finding), ApplyOutcome::NoOp);
    assert!(!tmp.path().join("tests/test_api.py").exists());
}

#[test]
fn escaping_affected_paths_are_skipped() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().join("project");
    std::fs::create_dir_all(&root).unwrap();

    let finding = strategic_finding(
        "code_quality",
        "add missing __init__.py",
        &["../outside/__init__.py"],
    );
    let outcome = strategic::apply_strategic(&root, &finding);

    assert_eq!(outcome, ApplyOutcome::NoOp);
    assert!(!tmp.path().join("outside/__init__.py").exists());
}

#[test]
fn non_auto_mergeable_findings_never_mutate() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "requirements.txt", "requests==2.28.0\n");

    let report = Report::from_json(
        r#"{
            "upgrade": {"findings": [{
                "dependency": "requests",
                "recommended_version": "2.31.0",
                "upgrade_command": "pip install requests==2.31.0",
                "auto_mergeable": false
            }]},
            "strategic": {"findings": [{
                "category": "code_quality",
                "suggested_changes": "add missing __init__.py",
                "affected_files": ["src/pkg/__init__.py"],
                "auto_mergeable": false
            }]}
        }"#,
    )
    .unwrap();

    let runner = Runner::open(tmp.path().to_path_buf()).unwrap();
    let summary = runner.apply_report(&report, false);

    assert_eq!(summary.applied, 0);
    assert_eq!(summary.skipped, 0);
    assert!(summary.success());
    assert_eq!(read(tmp.path(), "requirements.txt"), "requests==2.28.0\n");
    assert!(!tmp.path().join("src/pkg/__init__.py").exists());
}

#[test]
fn run_aggregates_outcomes_across_sections() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "requirements.txt", "requests==2.28.0\n");

    let report = Report::from_json(
        r#"{
            "upgrade": {"findings": [{
                "title": "Bump requests",
                "dependency": "requests",
                "recommended_version": "2.31.0",
                "upgrade_command": "pip install requests==2.31.0",
                "auto_mergeable": true
            }]},
            "strategic": {"findings": [
                {
                    "category": "architecture",
                    "suggested_changes": "split the service layer",
                    "affected_files": [],
                    "auto_mergeable": true
                },
                {
                    "category": "code_quality",
                    "suggested_changes": "add missing __init__.py",
                    "affected_files": ["src/api/__init__.py"],
                    "auto_mergeable": true
                }
            ]}
        }"#,
    )
    .unwrap();

    let runner = Runner::open(tmp.path().to_path_buf()).unwrap();
    let summary = runner.apply_report(&report, false);

    assert_eq!(
        summary.modified_files,
        vec!["requirements.txt".to_string(), "src/api/__init__.py".to_string()]
    );
    assert_eq!(summary.applied, 2);
    assert_eq!(summary.skipped, 1);
    assert!(summary.success());
}

#[test]
fn all_skipped_run_is_a_failure() {
    let tmp = tempfile::tempdir().unwrap();

    let report = Report::from_json(
        r#"{"upgrade": {"findings": [{
            "dependency": "requests",
            "recommended_version": "2.31.0",
            "upgrade_command": "rm -rf /",
            "auto_mergeable": true
        }]}}"#,
    )
    .unwrap();

    let runner = Runner::open(tmp.path().to_path_buf()).unwrap();
    let summary = runner.apply_report(&report, false);

    assert_eq!(summary.applied, 0);
    assert_eq!(summary.skipped, 1);
    assert!(!summary.success());
}

#[test]
fn dry_run_mutates_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "requirements.txt", "requests==2.28.0\n");

    let report = Report::from_json(
        r#"{"upgrade": {"findings": [{
            "dependency": "requests",
            "recommended_version": "2.31.0",
            "upgrade_command": "pip install requests==2.31.0",
            "auto_mergeable": true
        }]}}"#,
    )
    .unwrap();

    let runner = Runner::open(tmp.path().to_path_buf()).unwrap();
    let summary = runner.apply_report(&report, true);

    assert_eq!(summary.applied, 1);
    assert!(summary.modified_files.is_empty());
    assert!(summary.success());
    assert_eq!(read(tmp.path(), "requirements.txt"), "requests==2.28.0\n");
}
