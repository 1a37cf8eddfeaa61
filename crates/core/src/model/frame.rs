use calltrie_protocol::CallFrame;

/// Identity key for a node in the calling-context trie.
///
/// `url` is intentionally not part of the key: two frames that agree on
/// `(name, sourceID, line, column)` but were recorded with different urls
/// merge into a single node, which keeps reporting the first url it saw.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FrameKey {
    pub source_id: i64,
    pub line: i64,
    pub column: i64,
    pub name: String,
}

impl From<&CallFrame> for FrameKey {
    fn from(frame: &CallFrame) -> Self {
        Self {
            source_id: frame.source_id,
            line: frame.line,
            column: frame.column,
            name: frame.name.clone(),
        }
    }
}
