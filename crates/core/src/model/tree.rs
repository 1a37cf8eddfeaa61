use calltrie_protocol::{CpuProfilePayload, StackTrace};

use crate::model::node::CctNode;

/// A calling-context tree for one profiling session.
///
/// Starts empty; `update_tree_with_stack_trace` grows it one sample at a
/// time, creating nodes lazily on the first visit to a call path. Nodes
/// are never evicted (memory is bounded by the number of distinct call
/// paths, not by sample count) and the whole tree drops together when the
/// session ends. There is no reset: a new session is a new tree.
///
/// Node uids come from a counter owned by this tree, so they are unique
/// and stable within a session.
#[derive(Debug, Clone)]
pub struct CallingContextTree {
    root: CctNode,
    total_number_of_samples: u64,
    next_uid: u64,
}

impl CallingContextTree {
    pub fn new() -> Self {
        Self {
            root: CctNode::root(0),
            total_number_of_samples: 0,
            next_uid: 1,
        }
    }

    pub fn root(&self) -> &CctNode {
        &self.root
    }

    /// Count of stack traces ingested (not the sum of per-node timestamps).
    pub fn total_number_of_samples(&self) -> u64 {
        self.total_number_of_samples
    }

    /// Ingest one stack-trace sample.
    ///
    /// `stack_frames` is leaf first on the wire, so the walk below iterates
    /// it in reverse: the trie path from root to leaf mirrors the call
    /// stack from program entry down to the executing frame, and every node
    /// along the path is stamped with the sample's timestamp. Successive
    /// calls must carry non-decreasing timestamps; the tree trusts that
    /// ordering (no sort-on-ingest), and range queries degrade silently if
    /// it is broken.
    pub fn update_tree_with_stack_trace(&mut self, stack_trace: &StackTrace) {
        self.total_number_of_samples += 1;

        let timestamp = stack_trace.timestamp;
        let mut next_uid = self.next_uid;
        let mut node = &mut self.root;
        node.add_timestamp(timestamp);
        for frame in stack_trace.stack_frames.iter().rev() {
            node = node.find_or_make_child(frame, &mut next_uid);
            node.add_timestamp(timestamp);
        }
        self.next_uid = next_uid;
    }

    /// Project the tree into a CPU-profile payload for `[start, end]`.
    ///
    /// The root's filtered sample count is the single denominator shared by
    /// every node's `totalTime` fraction. The root itself is not emitted;
    /// its in-range children become the payload's top-level roots.
    pub fn to_cpu_profile_payload(&self, start_time: f64, end_time: f64) -> CpuProfilePayload {
        let num_samples_in_time_range =
            self.root.filtered_timestamps(start_time, end_time).len();

        let mut root_nodes = Vec::new();
        self.root.for_each_child(|child| {
            if child.has_stack_trace_in_time_range(start_time, end_time) {
                root_nodes.push(child.to_cpu_profile_node(
                    num_samples_in_time_range,
                    start_time,
                    end_time,
                ));
            }
        });

        CpuProfilePayload { root_nodes }
    }

    /// Pre-order visit of every node, root included.
    pub fn for_each_node<'a>(&'a self, visit: impl FnMut(&'a CctNode)) {
        self.root.for_each_node(visit);
    }
}

impl Default for CallingContextTree {
    fn default() -> Self {
        Self::new()
    }
}
