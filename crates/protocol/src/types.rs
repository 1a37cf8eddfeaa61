use serde::{Deserialize, Serialize};

/// One call frame as reported by the sampling agent.
///
/// Field spellings match the agent's wire format (`sourceID`, not
/// `source_id`). `url` may be absent for frames with no script origin
/// (native code, eval without a source URL).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallFrame {
    #[serde(rename = "sourceID")]
    pub source_id: i64,
    pub line: i64,
    pub column: i64,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// One stack-trace sample: a timestamp plus the stack at that instant.
///
/// `stackFrames` is ordered leaf first: element 0 is the currently
/// executing frame, the last element is the outermost caller. Successive
/// records carry non-decreasing timestamps; the aggregator trusts this
/// ordering rather than re-sorting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackTrace {
    pub timestamp: f64,
    #[serde(rename = "stackFrames")]
    pub stack_frames: Vec<CallFrame>,
}
