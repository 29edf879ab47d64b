//! `conventest` — Reviews and approves convention baselines.
//!
//! Runs in approved-exceptions mode leave a `<key>.received.txt` next to the
//! baseline whenever the rendering differs from `<key>.approved.txt` or no
//! baseline exists yet. This tool lists, diffs, and approves those files.
//!
//! **Usage:**
//! ```text
//! conventest [--approvals <dir>] pending [--recursive]
//! conventest [--approvals <dir>] diff <KEY>
//! conventest [--approvals <dir>] approve <KEY>... | --all
//! ```
//!
//! `pending` exits non-zero when anything awaits review.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use conventest::approval::{line_diff, RECEIVED_SUFFIX};
use conventest::{ApprovalKey, ApprovalStore, FileApprovalStore};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

/// Review and approve convention baselines.
#[derive(Parser)]
#[command(
    name = "conventest",
    about = "Review and approve convention baselines"
)]
struct Args {
    /// Directory holding approved and received files (default: approvals/).
    #[arg(long, default_value = "approvals")]
    approvals: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List received files awaiting review.
    Pending {
        /// Search every directory below the approvals directory.
        #[arg(long)]
        recursive: bool,
    },
    /// Show how a received file differs from its baseline.
    Diff {
        /// Baseline key, e.g. `MustBeSealed.UserClasses`.
        key: String,
    },
    /// Promote received files to approved baselines.
    Approve {
        /// Keys to approve.
        keys: Vec<String>,
        /// Approve every pending key.
        #[arg(long, conflicts_with = "keys")]
        all: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    let mut store = FileApprovalStore::new(&args.approvals);

    match args.command {
        Command::Pending { recursive } => {
            let pending = if recursive {
                pending_recursive(&args.approvals)
            } else {
                store
                    .pending()
                    .with_context(|| format!("Failed to list {}", args.approvals.display()))?
                    .iter()
                    .map(|key| store.received_path(key))
                    .collect()
            };
            if pending.is_empty() {
                println!("Nothing awaiting review.");
                return Ok(());
            }
            for path in &pending {
                println!("{}", path.display());
            }
            eprintln!("{} received file(s) awaiting review.", pending.len());
            process::exit(1);
        }
        Command::Diff { key } => {
            let key = ApprovalKey::new(&key);
            let received_path = store.received_path(&key);
            let received = std::fs::read_to_string(&received_path)
                .with_context(|| format!("No received file at {}", received_path.display()))?;
            let approved = store.approved(&key)?.unwrap_or_default();
            print!("{}", line_diff(&approved, &received));
        }
        Command::Approve { keys, all } => {
            let keys: Vec<ApprovalKey> = if all {
                store.pending()?
            } else {
                keys.iter().map(|k| ApprovalKey::new(k)).collect()
            };
            if keys.is_empty() {
                bail!("Nothing to approve: pass one or more keys, or --all");
            }
            let mut missing = 0usize;
            for key in &keys {
                if store.approve_received(key)? {
                    println!("approved {key}");
                } else {
                    tracing::warn!(key = %key, "no received file to approve");
                    missing += 1;
                }
            }
            if missing > 0 {
                bail!("{missing} key(s) had no received file");
            }
        }
    }

    Ok(())
}

/// Every `*.received.txt` below `root`, sorted.
fn pending_recursive(root: &Path) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_type().is_file()
                && e.file_name()
                    .to_str()
                    .map(|n| n.ends_with(RECEIVED_SUFFIX))
                    .unwrap_or(false)
        })
        .map(|e| e.into_path())
        .collect();
    found.sort();
    found
}
