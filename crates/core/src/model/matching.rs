use crate::model::node::CctNode;
use crate::model::tree::CallingContextTree;

/// Expected shape of one frame when matching a tree against a stack trace.
///
/// `name` always participates in the match; `url`, `line`, and `column`
/// only when present. These are comparison predicates for test harnesses
/// and equality checks: a mismatch answers `false`, never an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameSpec {
    pub name: String,
    pub url: Option<String>,
    pub line: Option<i64>,
    pub column: Option<i64>,
}

impl FrameSpec {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    fn matches(&self, node: &CctNode) -> bool {
        if node.name() != self.name {
            return false;
        }
        if let Some(url) = &self.url
            && node.url() != Some(url.as_str())
        {
            return false;
        }
        if let Some(line) = self.line
            && node.line() != line
        {
            return false;
        }
        if let Some(column) = self.column
            && node.column() != column
        {
            return false;
        }
        true
    }
}

/// Whether the tree contains a root-to-leaf path matching `expected`.
///
/// `expected` is ordered leaf first, like wire records; the walk descends
/// from the root outermost-in. Extra children along the way are ignored:
/// this checks that the path exists, not that it is exclusive.
pub fn tree_matches_stack_trace(tree: &CallingContextTree, expected: &[FrameSpec]) -> bool {
    let mut node = tree.root();
    for spec in expected.iter().rev() {
        match node.children().find(|child| spec.matches(child)) {
            Some(child) => node = child,
            None => return false,
        }
    }
    true
}
