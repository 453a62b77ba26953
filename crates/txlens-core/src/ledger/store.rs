//! `DecisionLedger`: in-memory decision log with optional JSONL persistence.
//!
//! Entries are append-only. When a backing file is configured every
//! accepted decision is appended to it before it becomes visible, and the
//! file is replayed when the ledger is opened.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::CoreError;

use super::jsonl::{entry_to_line, parse_jsonl_entries};
use super::types::{
    DecisionLog, LedgerEntry, LedgerError, LedgerStats, RiskLevel, MAX_RECENT_DECISIONS,
};

#[derive(Debug, Default)]
pub struct DecisionLedger {
    entries: Vec<LedgerEntry>,
    stats: LedgerStats,
    path: Option<PathBuf>,
}

impl DecisionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a ledger backed by a JSONL file, replaying existing entries.
    /// A missing file is created on the first accepted decision.
    pub fn open(path: &Path) -> Result<Self, CoreError> {
        let entries = if path.exists() {
            parse_jsonl_entries(&std::fs::read_to_string(path)?)?
        } else {
            Vec::new()
        };

        let mut stats = LedgerStats::default();
        for entry in &entries {
            stats.record(entry);
        }
        info!(
            path = %path.display(),
            entries = entries.len(),
            "decision ledger opened"
        );

        Ok(Self {
            entries,
            stats,
            path: Some(path.to_path_buf()),
        })
    }

    /// Validate and append a decision.
    pub fn log_decision(&mut self, log: DecisionLog<'_>) -> Result<LedgerEntry, LedgerError> {
        let transaction_hash = log.transaction_hash.trim();
        if transaction_hash.is_empty() {
            return Err(LedgerError::EmptyTransactionHash);
        }
        let user_hash = log.user_hash.trim();
        if user_hash.is_empty() {
            return Err(LedgerError::EmptyUserHash);
        }
        let risk_level: RiskLevel = log.risk_level.parse()?;

        let entry = LedgerEntry {
            id: self.entries.last().map_or(1, |last| last.id + 1),
            transaction_hash: transaction_hash.to_owned(),
            user_hash: user_hash.to_owned(),
            approved: log.approved,
            risk_level,
            timestamp: log.timestamp,
            is_demo: log.is_demo,
        };

        if let Some(path) = &self.path {
            append_line(path, &entry_to_line(&entry)).map_err(CoreError::Io)?;
        }
        self.stats.record(&entry);
        self.entries.push(entry.clone());
        Ok(entry)
    }

    pub fn stats(&self) -> LedgerStats {
        self.stats
    }

    /// Newest-first entries, at most `limit` and never more than
    /// [`MAX_RECENT_DECISIONS`].
    pub fn recent(&self, limit: usize) -> Result<Vec<LedgerEntry>, LedgerError> {
        if limit == 0 {
            return Err(LedgerError::InvalidLimit);
        }
        Ok(self
            .entries
            .iter()
            .rev()
            .take(limit.min(MAX_RECENT_DECISIONS))
            .cloned()
            .collect())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn append_line(path: &Path, line: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(line.as_bytes())
}
