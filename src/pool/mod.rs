//! Worker pool construction and dispatch
//!
//! The pool resolves its configuration once (worker count, execution mode,
//! start strategy) and then maps argument batches across workers per call.

mod config;
mod engine;
mod mode;
mod worker;

pub use config::{PoolConfig, DEFAULT_WORKERS};
pub use engine::{Pool, PoolBuilder};
pub use mode::{parse_device_list, AcceleratorRuntime, ExecMode, HostCudaProbe, StartMethod};
