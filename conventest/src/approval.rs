//! Approved baselines: keyed storage of canonical report text and the
//! comparison that decides whether a rendering still matches it.
//!
//! A file-backed store keeps two files per key:
//!
//! ```text
//! approvals/
//!   MustBeSealed.UserClasses.approved.txt   ← last approved baseline
//!   MustBeSealed.UserClasses.received.txt   ← latest rendering awaiting review
//! ```
//!
//! The received file exists only while the latest rendering differs from the
//! baseline (or no baseline exists). Approving promotes it to the baseline.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::report::ConventionReport;
use crate::writer;

/// Suffix of approved baseline files.
pub const APPROVED_SUFFIX: &str = ".approved.txt";
/// Suffix of received (pending review) files.
pub const RECEIVED_SUFFIX: &str = ".received.txt";

/// Errors raised while verifying or storing baselines.
#[derive(Debug, Error)]
pub enum ApprovalError {
    /// No baseline has ever been approved for this key.
    #[error("'{key}' has not been approved yet; review and approve {location}")]
    NotYetApproved {
        /// Baseline key.
        key: String,
        /// Where the received text can be reviewed.
        location: String,
    },

    /// The rendering differs from the approved baseline.
    #[error("'{key}' differs from the approved baseline:\n{diff}")]
    Mismatch {
        /// Baseline key.
        key: String,
        /// Line diff, `-` for approved lines and `+` for received lines.
        diff: String,
    },

    /// Reading or writing a baseline file failed.
    #[error("approval store I/O on {}: {source}", .path.display())]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// A filesystem-safe baseline key derived from a report's title and scope.
///
/// Sanitizing is lossy: titles that differ only in characters outside
/// `[A-Za-z0-9.-]`, or in how many of them appear in a row, share a key
/// (`Must be sealed` and `Must_be_sealed` both become `Must_be_sealed`).
/// Conventions verified against one store need titles that stay distinct
/// after sanitizing. One-directional and symmetric conventions never share a
/// key, because a symmetric key also names the inverse title.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ApprovalKey(String);

impl ApprovalKey {
    /// Sanitizes `raw` into a key: anything outside `[A-Za-z0-9._-]` becomes
    /// `_`, runs of `_` collapse, and leading or trailing `_`/`.` are trimmed.
    pub fn new(raw: &str) -> Self {
        let mut key = String::with_capacity(raw.len());
        for ch in raw.chars() {
            let ch = if ch.is_ascii_alphanumeric() || ch == '.' || ch == '-' {
                ch
            } else {
                '_'
            };
            if ch == '_' && key.ends_with('_') {
                continue;
            }
            key.push(ch);
        }
        let trimmed = key.trim_matches(|c| c == '_' || c == '.');
        if trimmed.is_empty() {
            Self("convention".to_string())
        } else {
            Self(trimmed.to_string())
        }
    }

    /// Key for a report: `<title>.<data description>`.
    pub fn for_report(report: &ConventionReport) -> Self {
        Self::new(&format!("{}.{}", report.title(), report.data_description()))
    }

    /// Key for a symmetric pair: `<title>.<inverse title>.<data description>`.
    pub fn for_pair(forward: &ConventionReport, inverse: &ConventionReport) -> Self {
        Self::new(&format!(
            "{}.{}.{}",
            forward.title(),
            inverse.title(),
            forward.data_description()
        ))
    }

    /// The key text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ApprovalKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Keyed storage of approved baselines.
pub trait ApprovalStore {
    /// Reads the approved baseline, `None` if never approved.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::Io`] if the baseline exists but cannot be read.
    fn approved(&self, key: &ApprovalKey) -> Result<Option<String>, ApprovalError>;

    /// Stores `text` as the new baseline for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::Io`] if the baseline cannot be written.
    fn approve(&mut self, key: &ApprovalKey, text: &str) -> Result<(), ApprovalError>;

    /// Records a rendering that did not match, for human review.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::Io`] if the received text cannot be written.
    fn record_received(&mut self, key: &ApprovalKey, text: &str) -> Result<(), ApprovalError>;

    /// Discards any pending received text for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::Io`] if a stale received file cannot be removed.
    fn clear_received(&mut self, key: &ApprovalKey) -> Result<(), ApprovalError>;

    /// Where a reviewer finds the received text for `key`.
    fn received_location(&self, key: &ApprovalKey) -> String;

    /// Compares `received` against the baseline for `key`.
    ///
    /// Line endings are normalized to `\n` before comparison. On success any
    /// stale received text is cleared; on failure the received text is recorded.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::NotYetApproved`] when no baseline exists,
    /// [`ApprovalError::Mismatch`] when the texts differ, and
    /// [`ApprovalError::Io`] on storage failures.
    fn verify(&mut self, key: &ApprovalKey, received: &str) -> Result<(), ApprovalError> {
        let received = normalize(received);
        match self.approved(key)? {
            None => {
                self.record_received(key, &received)?;
                Err(ApprovalError::NotYetApproved {
                    key: key.to_string(),
                    location: self.received_location(key),
                })
            }
            Some(approved) => {
                let approved = normalize(&approved);
                if approved == received {
                    self.clear_received(key)
                } else {
                    self.record_received(key, &received)?;
                    Err(ApprovalError::Mismatch {
                        key: key.to_string(),
                        diff: line_diff(&approved, &received),
                    })
                }
            }
        }
    }
}

fn normalize(text: &str) -> String {
    text.replace("\r\n", "\n")
}

/// Baselines stored as text files under one directory.
#[derive(Debug, Clone)]
pub struct FileApprovalStore {
    dir: PathBuf,
}

impl FileApprovalStore {
    /// Creates a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the baseline files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the approved baseline for `key`.
    pub fn approved_path(&self, key: &ApprovalKey) -> PathBuf {
        self.dir.join(format!("{key}{APPROVED_SUFFIX}"))
    }

    /// Path of the received file for `key`.
    pub fn received_path(&self, key: &ApprovalKey) -> PathBuf {
        self.dir.join(format!("{key}{RECEIVED_SUFFIX}"))
    }

    /// Keys with a received file awaiting review, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::Io`] if the directory exists but cannot be listed.
    pub fn pending(&self) -> Result<Vec<ApprovalKey>, ApprovalError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let entries = fs::read_dir(&self.dir).map_err(|source| ApprovalError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let mut keys: Vec<ApprovalKey> = entries
            .filter_map(|e| e.ok())
            .filter_map(|e| {
                e.file_name()
                    .to_str()
                    .and_then(|name| name.strip_suffix(RECEIVED_SUFFIX))
                    .map(|stem| ApprovalKey(stem.to_string()))
            })
            .collect();
        keys.sort();
        Ok(keys)
    }

    /// Promotes the received file for `key` to the approved baseline.
    /// Returns false if there was nothing to approve.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::Io`] if either file cannot be read, written, or removed.
    pub fn approve_received(&mut self, key: &ApprovalKey) -> Result<bool, ApprovalError> {
        let received_path = self.received_path(key);
        if !received_path.exists() {
            return Ok(false);
        }
        let text = fs::read_to_string(&received_path).map_err(|source| ApprovalError::Io {
            path: received_path.clone(),
            source,
        })?;
        self.approve(key, &text)?;
        self.clear_received(key)?;
        Ok(true)
    }
}

impl ApprovalStore for FileApprovalStore {
    fn approved(&self, key: &ApprovalKey) -> Result<Option<String>, ApprovalError> {
        let path = self.approved_path(key);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(ApprovalError::Io { path, source }),
        }
    }

    fn approve(&mut self, key: &ApprovalKey, text: &str) -> Result<(), ApprovalError> {
        let path = self.approved_path(key);
        writer::replace_file(&path, text).map_err(|source| ApprovalError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::info!(target: "conventest", key = %key, path = %path.display(), "baseline approved");
        Ok(())
    }

    fn record_received(&mut self, key: &ApprovalKey, text: &str) -> Result<(), ApprovalError> {
        let path = self.received_path(key);
        writer::replace_file(&path, text).map_err(|source| ApprovalError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(target: "conventest", key = %key, path = %path.display(), "received text recorded");
        Ok(())
    }

    fn clear_received(&mut self, key: &ApprovalKey) -> Result<(), ApprovalError> {
        let path = self.received_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(ApprovalError::Io { path, source }),
        }
    }

    fn received_location(&self, key: &ApprovalKey) -> String {
        self.received_path(key).display().to_string()
    }
}

/// Baselines held in memory, keyed by [`ApprovalKey`].
#[derive(Debug, Default, Clone)]
pub struct MemoryApprovalStore {
    approved: BTreeMap<ApprovalKey, String>,
    received: BTreeMap<ApprovalKey, String>,
}

impl MemoryApprovalStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pending received text for `key`.
    pub fn received(&self, key: &ApprovalKey) -> Option<&str> {
        self.received.get(key).map(String::as_str)
    }
}

impl ApprovalStore for MemoryApprovalStore {
    fn approved(&self, key: &ApprovalKey) -> Result<Option<String>, ApprovalError> {
        Ok(self.approved.get(key).cloned())
    }

    fn approve(&mut self, key: &ApprovalKey, text: &str) -> Result<(), ApprovalError> {
        self.approved.insert(key.clone(), text.to_string());
        Ok(())
    }

    fn record_received(&mut self, key: &ApprovalKey, text: &str) -> Result<(), ApprovalError> {
        self.received.insert(key.clone(), text.to_string());
        Ok(())
    }

    fn clear_received(&mut self, key: &ApprovalKey) -> Result<(), ApprovalError> {
        self.received.remove(key);
        Ok(())
    }

    fn received_location(&self, key: &ApprovalKey) -> String {
        format!("memory:{key}")
    }
}

/// Largest LCS table [`line_diff`] builds, in cells.
const MAX_LCS_CELLS: usize = 4_000_000;

/// Line diff of `approved` against `received` via longest common subsequence.
///
/// Unchanged lines are prefixed with two spaces, removed lines with `- `,
/// added lines with `+ `. The common prefix and suffix are matched directly;
/// when the differing middle would need more than [`MAX_LCS_CELLS`] table
/// cells, it is shown as all of its removed lines followed by all of its
/// added lines.
pub fn line_diff(approved: &str, received: &str) -> String {
    let a: Vec<&str> = approved.lines().collect();
    let b: Vec<&str> = received.lines().collect();

    let prefix = a.iter().zip(&b).take_while(|(x, y)| x == y).count();
    let suffix = a[prefix..]
        .iter()
        .rev()
        .zip(b[prefix..].iter().rev())
        .take_while(|(x, y)| x == y)
        .count();
    let a_mid = &a[prefix..a.len() - suffix];
    let b_mid = &b[prefix..b.len() - suffix];

    let mut out = String::new();
    for line in &a[..prefix] {
        push_line(&mut out, "  ", line);
    }
    let cells = (a_mid.len() + 1).saturating_mul(b_mid.len() + 1);
    if cells > MAX_LCS_CELLS {
        for line in a_mid {
            push_line(&mut out, "- ", line);
        }
        for line in b_mid {
            push_line(&mut out, "+ ", line);
        }
    } else {
        lcs_diff(&mut out, a_mid, b_mid);
    }
    for line in &a[a.len() - suffix..] {
        push_line(&mut out, "  ", line);
    }
    out
}

fn lcs_diff(out: &mut String, a: &[&str], b: &[&str]) {
    let width = b.len() + 1;
    // lcs[i * width + j] = LCS length of a[i..] and b[j..]
    let mut lcs = vec![0u32; (a.len() + 1) * width];
    for i in (0..a.len()).rev() {
        for j in (0..b.len()).rev() {
            lcs[i * width + j] = if a[i] == b[j] {
                lcs[(i + 1) * width + j + 1] + 1
            } else {
                lcs[(i + 1) * width + j].max(lcs[i * width + j + 1])
            };
        }
    }

    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i] == b[j] {
            push_line(out, "  ", a[i]);
            i += 1;
            j += 1;
        } else if lcs[(i + 1) * width + j] >= lcs[i * width + j + 1] {
            push_line(out, "- ", a[i]);
            i += 1;
        } else {
            push_line(out, "+ ", b[j]);
            j += 1;
        }
    }
    for line in &a[i..] {
        push_line(out, "- ", line);
    }
    for line in &b[j..] {
        push_line(out, "+ ", line);
    }
}

fn push_line(out: &mut String, marker: &str, line: &str) {
    out.push_str(marker);
    out.push_str(line);
    out.push('\n');
}
