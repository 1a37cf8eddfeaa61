use calltrie_protocol::StackTrace;
use thiserror::Error;

use crate::model::CallingContextTree;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("input is not UTF-8")]
    NotUtf8(#[from] std::str::Utf8Error),
}

/// Parse serialized sample records.
///
/// Accepts either a single JSON array of records or newline-delimited JSON
/// with one record per line (blank lines skipped); the two are told apart
/// by the first non-whitespace byte. Record order is preserved; the
/// timestamp ordering contract is the producer's to keep.
pub fn parse_records(data: &[u8]) -> Result<Vec<StackTrace>, IngestError> {
    let first = data.iter().copied().find(|b| !b.is_ascii_whitespace());
    if first == Some(b'[') {
        return Ok(serde_json::from_slice(data)?);
    }

    let text = std::str::from_utf8(data)?;
    let mut records = Vec::new();
    for (number, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(line).map_err(|source| IngestError::Line {
            line: number + 1,
            source,
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Build a tree from already-parsed records, ingesting them in order.
pub fn build_tree(records: &[StackTrace]) -> CallingContextTree {
    let mut tree = CallingContextTree::new();
    for record in records {
        tree.update_tree_with_stack_trace(record);
    }
    tree
}
