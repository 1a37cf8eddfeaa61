pub mod frame;
pub mod matching;
pub mod node;
pub mod tree;

pub use frame::FrameKey;
pub use matching::{tree_matches_stack_trace, FrameSpec};
pub use node::CctNode;
pub use tree::CallingContextTree;
