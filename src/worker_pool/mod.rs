//! The WorkerPool: a fixed-size pool draining one shared bounded queue,
//! used to offload blocking or CPU-heavy work off the reactors and off the
//! HTTP accept path.

#[allow(clippy::module_inception)]
pub mod pool;

pub use pool::{Job, WorkerPool};
