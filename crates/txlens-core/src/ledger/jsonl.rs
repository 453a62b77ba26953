//! JSONL encoding of ledger entries, one entry per line.

use crate::error::CoreError;

use super::types::LedgerEntry;

/// Parse JSONL content into entries in file order, skipping empty lines.
pub(super) fn parse_jsonl_entries(content: &str) -> Result<Vec<LedgerEntry>, CoreError> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(line_num, line)| {
            serde_json::from_str(line.trim()).map_err(|e| CoreError::RecordParse {
                line: line_num + 1,
                message: e.to_string(),
            })
        })
        .collect()
}

pub(super) fn entry_to_line(entry: &LedgerEntry) -> String {
    let json = serde_json::to_string(entry).expect("ledger entries always serialize");
    format!("{json}\n")
}
