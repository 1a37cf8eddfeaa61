use serde::{Deserialize, Serialize};

/// A windowed CPU-profile summary derived from a calling-context tree.
///
/// The tree's root is not part of the payload; its in-range children are
/// the profile's top-level roots. Downstream consumers expect exactly this
/// field layout (it is the common "CPU profile" JSON shape emitted by
/// browser profilers), so every spelling here is load-bearing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpuProfilePayload {
    #[serde(rename = "rootNodes")]
    pub root_nodes: Vec<CpuProfileNode>,
}

/// One node of the CPU-profile payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpuProfileNode {
    /// Stable node id, assigned at first observation of the call path.
    pub id: u64,
    #[serde(rename = "functionName")]
    pub function_name: String,
    pub url: Option<String>,
    #[serde(rename = "lineNumber")]
    pub line_number: i64,
    #[serde(rename = "columnNumber")]
    pub column_number: i64,
    /// In-range descendants only, in first-observation order.
    pub children: Vec<CpuProfileNode>,
    #[serde(rename = "callInfo")]
    pub call_info: CallInfo,
}

/// Per-node sample statistics for one query window.
///
/// `totalTime` is a fraction-of-window heuristic:
/// `(callCount / samples in window) * window length`. When the node has no
/// sample in the window, `startTime`/`endTime` hold their very-large /
/// very-small sentinels, so `startTime > endTime` marks an empty range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallInfo {
    #[serde(rename = "callCount")]
    pub call_count: u64,
    #[serde(rename = "startTime")]
    pub start_time: f64,
    #[serde(rename = "endTime")]
    pub end_time: f64,
    #[serde(rename = "totalTime")]
    pub total_time: f64,
}
