use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use qfix_core::Report;
use qfix_runner::{Config, Runner};

#[derive(Parser)]
#[command(name = "qfix", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply auto-mergeable findings from a quality report
    Apply {
        /// Path to the project to modify
        #[arg(long)]
        repo_path: PathBuf,
        /// Path to the quality report JSON
        #[arg(long)]
        report: PathBuf,
        /// Print what would be done without applying
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },

    /// List the files a snapshot of the project would capture
    Snapshot {
        #[arg(long)]
        repo_path: PathBuf,
    },
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::Apply {
            repo_path,
            report,
            dry_run,
        } => {
            let repo_root = repo_path
                .canonicalize()
                .with_context(|| format!("resolve {}", repo_path.display()))?;
            let raw = std::fs::read_to_string(&report)
                .with_context(|| format!("read {}", report.display()))?;
            let report = Report::from_json(&raw)?;

            let runner = Runner::open(repo_root)?;
            let summary = runner.apply_report(&report, dry_run);

            println!(
                "\nDone: {} file(s) modified, {} skipped",
                summary.applied, summary.skipped
            );
            if !summary.modified_files.is_empty() {
                println!("Modified files: {}", summary.modified_files.join(", "));
            }

            append_github_output("changes_applied", &summary.applied.to_string())?;

            Ok(if summary.success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }

        Command::Snapshot { repo_path } => {
            let repo_root = repo_path
                .canonicalize()
                .with_context(|| format!("resolve {}", repo_path.display()))?;
            let cfg = Config::load_or_default(&repo_root)?;
            let snap = qfix_core::snapshot::capture(&repo_root, &cfg.exclude_dirs);
            for path in snap.files.keys() {
                println!("{path}");
            }
            println!("{} file(s)", snap.len());
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Append a key=value pair to the pipeline output file when running inside
/// an automation pipeline (GITHUB_OUTPUT); a no-op otherwise.
fn append_github_output(key: &str, value: &str) -> Result<()> {
    let Ok(path) = std::env::var("GITHUB_OUTPUT") else {
        return Ok(());
    };
    if path.is_empty() {
        return Ok(());
    }
    use std::io::Write;
    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(&path)
        .with_context(|| format!("open {path}"))?;
    writeln!(file, "{key}={value}")?;
    Ok(())
}
