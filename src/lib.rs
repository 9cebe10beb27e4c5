//! # parmap - parallel map over a worker pool
//!
//! A generic parallel-map utility: give it a target function and parallel
//! sequences of positional/keyword arguments, and it invokes the function
//! once per index across a pool of workers, returning results in input order.
//!
//! ## Quick Start
//!
//! Add parmap to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! parmap = "0.8"
//! ```
//!
//! ### Basic Usage
//!
//! ```rust
//! use parmap::{Batch, Invocation, Pool};
//!
//! # fn main() -> parmap::Result<()> {
//! let pool = Pool::builder(|unit: Invocation<i64>| Ok(unit.args[0] + unit.args[1]))
//!     .workers(4)
//!     .build()?;
//!
//! let results = pool.call(
//!     Batch::new().arg(vec![1, 2, 3]).arg(vec![10, 20, 30]),
//! )?;
//! assert_eq!(results, vec![11, 22, 33]);
//! # Ok(())
//! # }
//! ```
//!
//! ### Keyword sequences
//!
//! Sequences can also be matched to the target by name:
//!
//! ```rust
//! use parmap::{Batch, Error, Pool};
//!
//! # fn main() -> parmap::Result<()> {
//! let pool = Pool::builder(|unit: parmap::Invocation<i64>| {
//!     let scale = unit.kwarg("scale").ok_or_else(|| Error::failure("missing scale"))?;
//!     Ok(unit.args[0] * scale)
//! })
//! .build()?;
//!
//! let results = pool.call(
//!     Batch::new().arg(vec![1, 2, 3]).kwarg("scale", vec![10, 10, 10]),
//! )?;
//! assert_eq!(results, vec![10, 20, 30]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Semantics
//!
//! - Every sequence in a batch must share one length; mismatches are rejected
//!   before anything runs.
//! - The worker pool is stood up fresh for each call and fully torn down
//!   before the call returns, on success and failure alike.
//! - Results are ordered by input index, never by completion order.
//! - The first failing invocation fails the whole call; there are no partial
//!   results.
//! - Accelerator mode (built with `.accelerator(true)`) requires an available
//!   accelerator runtime and runs every invocation on a freshly started
//!   worker, since accelerator handles are not safe to inherit across reused
//!   workers.
//!
//! ## Architecture
//!
//! ```text
//! Batch → align → Pool engine → per-worker invocation → ordered results
//! ```
//!
//! ### Main Components
//!
//! - [`Batch`] - Aligned positional/keyword argument sequences
//! - [`Invocation`] - The owned per-index argument tuple a worker receives
//! - [`Pool`] / [`PoolBuilder`] - Pool construction and dispatch
//! - [`ExecMode`] / [`StartMethod`] - Execution mode and worker start strategy
//! - [`AcceleratorRuntime`] - Probe trait for accelerator availability

/// Version of the parmap crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod batch;
pub mod error;
pub mod pool;

// Re-export main types
pub use batch::{Batch, Invocation};
pub use error::{Error, Result};
pub use pool::{
    parse_device_list, AcceleratorRuntime, ExecMode, HostCudaProbe, Pool, PoolBuilder,
    PoolConfig, StartMethod, DEFAULT_WORKERS,
};
