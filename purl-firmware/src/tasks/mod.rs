//! Embassy tasks
//!
//! - `edge_capture`: clock edges, on the interrupt-priority executor
//! - `knitting`: the knitting loop, in thread mode
//! - `status`: periodic status log

mod edge_capture;
mod knitting;
mod status;

pub use edge_capture::edge_capture_task;
pub use knitting::{knitting_task, KnitterBoard};
pub use status::status_task;
