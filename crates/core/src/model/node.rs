use std::collections::HashMap;

use calltrie_protocol::{CallFrame, CallInfo, CpuProfileNode};

use crate::model::frame::FrameKey;

/// Sentinel identity for the synthetic root node.
const ROOT_SENTINEL: i64 = -1;
const ROOT_NAME: &str = "<root>";

/// One node of the calling-context trie.
///
/// A node is a call-frame identity plus every sample timestamp at which
/// this frame (or a frame below it) was executing. The root holds all
/// samples; a leaf holds exactly the samples taken while it was the
/// innermost frame. Timestamps stay in arrival order, which the ingestion
/// contract guarantees is non-decreasing, so range queries binary-search
/// the sequence directly.
#[derive(Debug, Clone)]
pub struct CctNode {
    uid: u64,
    source_id: i64,
    line: i64,
    column: i64,
    name: String,
    url: Option<String>,
    timestamps: Vec<f64>,
    /// Children in first-observation order, plus a key index for lookup.
    children: Vec<CctNode>,
    child_index: HashMap<FrameKey, usize>,
}

impl CctNode {
    pub(crate) fn new(frame: &CallFrame, uid: u64) -> Self {
        Self {
            uid,
            source_id: frame.source_id,
            line: frame.line,
            column: frame.column,
            name: frame.name.clone(),
            url: frame.url.clone(),
            timestamps: Vec::new(),
            children: Vec::new(),
            child_index: HashMap::new(),
        }
    }

    /// The synthetic root: sentinel identity, never emitted in payloads.
    pub(crate) fn root(uid: u64) -> Self {
        Self {
            uid,
            source_id: ROOT_SENTINEL,
            line: ROOT_SENTINEL,
            column: ROOT_SENTINEL,
            name: ROOT_NAME.into(),
            url: None,
            timestamps: Vec::new(),
            children: Vec::new(),
            child_index: HashMap::new(),
        }
    }

    pub fn uid(&self) -> u64 {
        self.uid
    }

    pub fn source_id(&self) -> i64 {
        self.source_id
    }

    pub fn line(&self) -> i64 {
        self.line
    }

    pub fn column(&self) -> i64 {
        self.column
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// This node's own sample timestamps, in arrival order.
    pub fn timestamps(&self) -> &[f64] {
        &self.timestamps
    }

    /// The child for `frame`, created on first observation.
    ///
    /// The sole topology mutation point. Idempotent per identity key: a
    /// repeated `(name, sourceID, line, column)` always lands on the same
    /// node, regardless of the frame's url.
    pub(crate) fn find_or_make_child(
        &mut self,
        frame: &CallFrame,
        next_uid: &mut u64,
    ) -> &mut CctNode {
        let key = FrameKey::from(frame);
        let index = match self.child_index.get(&key) {
            Some(&index) => index,
            None => {
                let index = self.children.len();
                let uid = *next_uid;
                *next_uid += 1;
                self.children.push(CctNode::new(frame, uid));
                self.child_index.insert(key, index);
                index
            }
        };
        &mut self.children[index]
    }

    /// Append a sample timestamp.
    ///
    /// Callers must deliver timestamps in non-decreasing order; this is
    /// asserted in debug builds but never enforced or corrected. Violating
    /// it silently breaks the binary-search range queries below.
    pub(crate) fn add_timestamp(&mut self, timestamp: f64) {
        debug_assert!(
            self.timestamps.last().is_none_or(|&last| last <= timestamp),
            "stack-trace timestamps must be non-decreasing"
        );
        self.timestamps.push(timestamp);
    }

    /// Index of the first timestamp >= `start`.
    fn lower_bound(&self, start: f64) -> usize {
        self.timestamps.partition_point(|&t| t < start)
    }

    /// Whether any sample at or below this frame landed in `[start, end]`.
    ///
    /// An inverted range answers `false` rather than erroring.
    pub fn has_stack_trace_in_time_range(&self, start: f64, end: f64) -> bool {
        if start > end {
            return false;
        }
        match self.timestamps.get(self.lower_bound(start)) {
            Some(&t) => t <= end,
            None => false,
        }
    }

    /// The contiguous run of this node's timestamps within `[start, end]`.
    pub fn filtered_timestamps(&self, start: f64, end: f64) -> &[f64] {
        if start > end {
            return &[];
        }
        let first = self.lower_bound(start);
        let mut past = first;
        while past < self.timestamps.len() && self.timestamps[past] <= end {
            past += 1;
        }
        &self.timestamps[first..past]
    }

    /// Direct children in first-observation order.
    pub fn children(&self) -> impl Iterator<Item = &CctNode> {
        self.children.iter()
    }

    /// Visit direct children in first-observation order.
    pub fn for_each_child<'a>(&'a self, mut visit: impl FnMut(&'a CctNode)) {
        for child in &self.children {
            visit(child);
        }
    }

    /// Pre-order visit of this node and every descendant.
    pub fn for_each_node<'a>(&'a self, mut visit: impl FnMut(&'a CctNode)) {
        self.visit_pre_order(&mut visit);
    }

    fn visit_pre_order<'a>(&'a self, visit: &mut impl FnMut(&'a CctNode)) {
        visit(self);
        for child in &self.children {
            child.visit_pre_order(visit);
        }
    }

    /// Project this subtree into a CPU-profile node for `[start, end]`.
    ///
    /// Children with no sample in the window are pruned recursively.
    /// `num_samples_in_range` is the profile-wide denominator (the root's
    /// filtered count), shared by every node so `totalTime` fractions are
    /// comparable across the payload. The `totalTime` formula is a
    /// fraction-of-window heuristic kept exactly as payload consumers
    /// expect it, not a wall-clock integration.
    pub fn to_cpu_profile_node(
        &self,
        num_samples_in_range: usize,
        start: f64,
        end: f64,
    ) -> CpuProfileNode {
        let mut children = Vec::new();
        self.for_each_child(|child| {
            if child.has_stack_trace_in_time_range(start, end) {
                children.push(child.to_cpu_profile_node(num_samples_in_range, start, end));
            }
        });

        let filtered = self.filtered_timestamps(start, end);
        // Sentinels leave startTime > endTime when nothing is in range.
        let (start_time, end_time) = match (filtered.first(), filtered.last()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => (f64::MAX, f64::MIN_POSITIVE),
        };

        CpuProfileNode {
            id: self.uid,
            function_name: self.name.clone(),
            url: self.url.clone(),
            line_number: self.line,
            column_number: self.column,
            children,
            call_info: CallInfo {
                call_count: filtered.len() as u64,
                start_time,
                end_time,
                total_time: (filtered.len() as f64 / num_samples_in_range as f64)
                    * (end - start),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(name: &str, line: i64, url: Option<&str>) -> CallFrame {
        CallFrame {
            source_id: 1,
            line,
            column: 0,
            name: name.into(),
            url: url.map(Into::into),
        }
    }

    fn node_with_timestamps(timestamps: &[f64]) -> CctNode {
        let mut node = CctNode::new(&frame("f", 1, None), 7);
        for &t in timestamps {
            node.add_timestamp(t);
        }
        node
    }

    #[test]
    fn find_or_make_child_is_idempotent() {
        let mut parent = CctNode::root(0);
        let mut next_uid = 1;
        let uid = parent
            .find_or_make_child(&frame("f", 1, Some("a.js")), &mut next_uid)
            .uid();
        let again = parent
            .find_or_make_child(&frame("f", 1, Some("a.js")), &mut next_uid)
            .uid();
        assert_eq!(uid, again);
        assert_eq!(parent.children().count(), 1);
        assert_eq!(next_uid, 2);
    }

    #[test]
    fn merges_frames_differing_only_in_url() {
        let mut parent = CctNode::root(0);
        let mut next_uid = 1;
        parent.find_or_make_child(&frame("f", 1, Some("a.js")), &mut next_uid);
        let merged = parent.find_or_make_child(&frame("f", 1, Some("b.js")), &mut next_uid);
        // First url seen wins.
        assert_eq!(merged.url(), Some("a.js"));
        assert_eq!(parent.children().count(), 1);
    }

    #[test]
    fn children_keep_first_observation_order() {
        let mut parent = CctNode::root(0);
        let mut next_uid = 1;
        for name in ["c", "a", "b"] {
            parent.find_or_make_child(&frame(name, 1, None), &mut next_uid);
        }
        let names: Vec<_> = parent.children().map(CctNode::name).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn range_queries_find_contained_samples() {
        let node = node_with_timestamps(&[1.0, 2.0, 5.0, 9.0]);
        assert!(node.has_stack_trace_in_time_range(2.0, 5.0));
        assert!(node.has_stack_trace_in_time_range(3.0, 6.0));
        assert!(!node.has_stack_trace_in_time_range(6.0, 8.0));
        assert!(!node.has_stack_trace_in_time_range(10.0, 20.0));
        assert_eq!(node.filtered_timestamps(2.0, 5.0), &[2.0, 5.0]);
        assert_eq!(node.filtered_timestamps(0.0, 100.0), &[1.0, 2.0, 5.0, 9.0]);
        assert!(node.filtered_timestamps(6.0, 8.0).is_empty());
    }

    #[test]
    fn inverted_range_is_empty_not_an_error() {
        let node = node_with_timestamps(&[1.0, 2.0]);
        assert!(!node.has_stack_trace_in_time_range(5.0, 1.0));
        assert!(node.filtered_timestamps(5.0, 1.0).is_empty());
    }

    #[test]
    fn empty_node_matches_nothing() {
        let node = node_with_timestamps(&[]);
        assert!(!node.has_stack_trace_in_time_range(0.0, f64::MAX));
    }

    #[test]
    fn profile_node_uses_sentinels_for_empty_window() {
        let node = node_with_timestamps(&[5.0]);
        let profile = node.to_cpu_profile_node(1, 10.0, 20.0);
        assert_eq!(profile.call_info.call_count, 0);
        assert_eq!(profile.call_info.start_time, f64::MAX);
        assert_eq!(profile.call_info.end_time, f64::MIN_POSITIVE);
        assert!(profile.call_info.start_time > profile.call_info.end_time);
        assert_eq!(profile.call_info.total_time, 0.0);
    }

    #[test]
    fn profile_node_call_info_formula() {
        let node = node_with_timestamps(&[1.0, 2.0, 3.0]);
        // 3 of 4 window samples over a window of length 8.
        let profile = node.to_cpu_profile_node(4, 0.0, 8.0);
        assert_eq!(profile.call_info.call_count, 3);
        assert_eq!(profile.call_info.start_time, 1.0);
        assert_eq!(profile.call_info.end_time, 3.0);
        assert!((profile.call_info.total_time - 6.0).abs() < f64::EPSILON);
    }

    #[test]
    fn pre_order_traversal() {
        let mut root = CctNode::root(0);
        let mut next_uid = 1;
        {
            let a = root.find_or_make_child(&frame("a", 1, None), &mut next_uid);
            a.find_or_make_child(&frame("a1", 2, None), &mut next_uid);
        }
        root.find_or_make_child(&frame("b", 3, None), &mut next_uid);

        let mut order = Vec::new();
        root.for_each_node(|node| order.push(node.name().to_string()));
        assert_eq!(order, vec!["<root>", "a", "a1", "b"]);
    }
}
