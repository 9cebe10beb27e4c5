//! Pool configuration
//!
//! Resolved once when the pool is built and read-only afterwards.

use crate::error::{Error, Result};
use crate::pool::mode::{ExecMode, StartMethod};
use serde::Serialize;

/// Default worker count when the caller does not specify one
pub const DEFAULT_WORKERS: usize = 4;

/// Immutable configuration for one pool instance.
#[derive(Debug, Clone, Serialize)]
pub struct PoolConfig {
    /// Diagnostic label for the target function; never load-bearing
    pub label: Option<String>,
    /// Worker count as requested by the caller
    pub requested_workers: usize,
    /// Effective worker count after clamping to host parallelism
    pub workers: usize,
    /// Execution mode, fixed for the pool's lifetime
    pub mode: ExecMode,
    /// Worker start strategy mandated by the mode
    pub start_method: StartMethod,
    /// Accelerator device identifiers; empty outside accelerator mode
    pub devices: Vec<String>,
    /// Whether to emit the config and per-call traces
    pub verbose: bool,
}

impl PoolConfig {
    /// Resolve a configuration from the requested worker count and mode.
    ///
    /// The effective worker count is `min(requested, host parallelism)`. A
    /// requested count of zero is a configuration error raised here, before
    /// any call is attempted.
    pub fn resolve(
        requested_workers: usize,
        mode: ExecMode,
        devices: Vec<String>,
        verbose: bool,
        label: Option<String>,
    ) -> Result<Self> {
        if requested_workers == 0 {
            return Err(Error::InvalidWorkerCount {
                requested: requested_workers,
            });
        }
        let workers = requested_workers.min(num_cpus::get());

        Ok(PoolConfig {
            label,
            requested_workers,
            workers,
            mode,
            start_method: mode.start_method(),
            devices,
            verbose,
        })
    }

    /// Emit the resolved configuration through the diagnostic trace.
    ///
    /// Rendered as JSON so the dump stays machine-readable. Only called on
    /// the verbose path.
    pub fn trace_dump(&self, stage: &str) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => tracing::info!(stage, config = %json, "pool configuration"),
            Err(err) => tracing::warn!(stage, error = %err, "failed to render pool configuration"),
        }
    }
}
