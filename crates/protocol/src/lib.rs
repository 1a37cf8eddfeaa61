pub mod payload;
pub mod types;

pub use payload::{CallInfo, CpuProfileNode, CpuProfilePayload};
pub use types::{CallFrame, StackTrace};
