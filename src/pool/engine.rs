//! Worker pool engine
//!
//! Owns the target function and the resolved configuration, and runs one
//! fan-out/fan-in batch per call. The pool of workers is stood up fresh for
//! every call and torn down before the call returns, on success and on
//! failure alike.

use crate::batch::{Batch, Invocation};
use crate::error::{Error, Result};
use crate::pool::config::{PoolConfig, DEFAULT_WORKERS};
use crate::pool::mode::{
    parse_device_list, AcceleratorRuntime, ExecMode, HostCudaProbe, StartMethod,
};
use crate::pool::worker;
use rayon::prelude::*;
use std::sync::Arc;

/// Shared reference to the target function
type Target<T, R> = Arc<dyn Fn(Invocation<T>) -> Result<R> + Send + Sync>;

/// A parallel-map pool over a target function.
///
/// Construction resolves the execution mode and worker count once; calls then
/// map aligned argument batches across the workers and return results in
/// input order.
///
/// # Example
/// ```
/// use parmap::{Batch, Invocation, Pool};
///
/// # fn main() -> parmap::Result<()> {
/// let pool = Pool::builder(|unit: Invocation<i64>| Ok(unit.args[0] + unit.args[1]))
///     .workers(4)
///     .build()?;
///
/// let results = pool.call(
///     Batch::new().arg(vec![1, 2, 3]).arg(vec![10, 20, 30]),
/// )?;
/// assert_eq!(results, vec![11, 22, 33]);
/// # Ok(())
/// # }
/// ```
pub struct Pool<T, R> {
    func: Target<T, R>,
    config: PoolConfig,
}

impl<T, R> Pool<T, R>
where
    T: Clone + Send + Sync,
    R: Send,
{
    /// Start building a pool around `func`
    pub fn builder<F>(func: F) -> PoolBuilder<T, R>
    where
        F: Fn(Invocation<T>) -> Result<R> + Send + Sync + 'static,
    {
        PoolBuilder::new(func)
    }

    /// Build a standard-mode pool with the default worker count
    pub fn new<F>(func: F) -> Result<Self>
    where
        F: Fn(Invocation<T>) -> Result<R> + Send + Sync + 'static,
    {
        PoolBuilder::new(func).build()
    }

    /// Effective worker count after clamping to host parallelism
    pub fn workers(&self) -> usize {
        self.config.workers
    }

    /// The resolved configuration
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Run one batch across the pool.
    ///
    /// Validates alignment, fans the invocations out over at most
    /// `workers()` concurrent workers, and returns results indexed exactly
    /// like the batch. The first failing invocation fails the whole call; no
    /// partial results are returned.
    pub fn call(&self, batch: Batch<T>) -> Result<Vec<R>> {
        let len = batch.len()?;

        if self.config.verbose {
            self.config.trace_dump("call");
            tracing::info!(
                sequences = batch.sequences(),
                length = len,
                "batch aligned"
            );
        }

        // Aligned-but-empty batch: nothing to dispatch.
        if len == 0 {
            return Ok(Vec::new());
        }

        let results = match self.config.start_method {
            StartMethod::Inherit => self.call_pooled(&batch, len),
            StartMethod::Clean => {
                worker::run_clean(&*self.func, &batch, len, self.config.workers)
            }
        };

        if self.config.verbose {
            match &results {
                Ok(values) => tracing::info!(length = values.len(), "call completed"),
                Err(err) => tracing::info!(error = %err, "call failed"),
            }
        }
        results
    }

    /// Inherit-mode dispatch: one pooled set of workers for the whole call.
    fn call_pooled(&self, batch: &Batch<T>, len: usize) -> Result<Vec<R>> {
        let func = &*self.func;

        // Single invocation: no pool needed.
        if len == 1 {
            let result = worker::run_unit(func, batch.unit(0))?;
            return Ok(vec![result]);
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.workers.min(len))
            .thread_name(|i| format!("parmap-worker-{}", i))
            .build()
            .map_err(|e| Error::PoolBuild {
                reason: e.to_string(),
            })?;

        // The pool is dropped when this frame unwinds, so workers are joined
        // on the error path as well.
        pool.install(|| {
            (0..len)
                .into_par_iter()
                .map(|i| worker::run_unit(func, batch.unit(i)))
                .collect::<Result<Vec<R>>>()
        })
    }
}

/// Builder for [`Pool`].
///
/// Worker counts are `usize`, so a negative request is unrepresentable; zero
/// is rejected when the configuration is resolved.
pub struct PoolBuilder<T, R> {
    func: Target<T, R>,
    workers: usize,
    verbose: bool,
    accelerator: bool,
    device_list: Option<String>,
    label: Option<String>,
    probe: Box<dyn AcceleratorRuntime>,
}

impl<T, R> PoolBuilder<T, R>
where
    T: Clone + Send + Sync,
    R: Send,
{
    /// Start a builder around `func` with default settings
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(Invocation<T>) -> Result<R> + Send + Sync + 'static,
    {
        PoolBuilder {
            func: Arc::new(func),
            workers: DEFAULT_WORKERS,
            verbose: false,
            accelerator: false,
            device_list: None,
            label: None,
            probe: Box::new(HostCudaProbe),
        }
    }

    /// Requested worker count; clamped to host parallelism at build time
    pub fn workers(mut self, count: usize) -> Self {
        self.workers = count;
        self
    }

    /// Emit configuration and per-call traces
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Select accelerator mode
    pub fn accelerator(mut self, accelerator: bool) -> Self {
        self.accelerator = accelerator;
        self
    }

    /// Comma-separated accelerator device indices, e.g. `"0,1"`.
    ///
    /// Only meaningful in accelerator mode; defaults to device `0`.
    pub fn devices(mut self, list: impl Into<String>) -> Self {
        self.device_list = Some(list.into());
        self
    }

    /// Diagnostic label for the target function
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Override the accelerator runtime probe
    pub fn probe(mut self, probe: impl AcceleratorRuntime + 'static) -> Self {
        self.probe = Box::new(probe);
        self
    }

    /// Resolve the configuration and build the pool.
    ///
    /// Accelerator mode requires the probe to report an available runtime;
    /// construction fails here, before any call, if it does not.
    pub fn build(self) -> Result<Pool<T, R>> {
        let (mode, devices) = if self.accelerator {
            if !self.probe.is_available() {
                return Err(Error::AcceleratorUnavailable {
                    runtime: self.probe.name().to_string(),
                });
            }
            let list = self.device_list.as_deref().unwrap_or("0");
            (ExecMode::Accelerator, parse_device_list(list)?)
        } else {
            (ExecMode::Standard, Vec::new())
        };

        let config =
            PoolConfig::resolve(self.workers, mode, devices, self.verbose, self.label)?;
        if config.verbose {
            config.trace_dump("construct");
        }

        Ok(Pool {
            func: self.func,
            config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysOn;
    impl AcceleratorRuntime for AlwaysOn {
        fn is_available(&self) -> bool {
            true
        }
        fn name(&self) -> &str {
            "stub"
        }
    }

    struct AlwaysOff;
    impl AcceleratorRuntime for AlwaysOff {
        fn is_available(&self) -> bool {
            false
        }
        fn name(&self) -> &str {
            "stub"
        }
    }

    fn add(unit: Invocation<i64>) -> Result<i64> {
        Ok(unit.args.iter().sum())
    }

    #[test]
    fn test_basic_parallel_map() {
        let pool = Pool::new(add).unwrap();
        let results = pool
            .call(Batch::new().arg(vec![1, 2, 3]).arg(vec![10, 20, 30]))
            .unwrap();
        assert_eq!(results, vec![11, 22, 33]);
    }

    #[test]
    fn test_empty_batch_returns_empty() {
        let pool = Pool::new(add).unwrap();
        let results = pool.call(Batch::new().arg(vec![])).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_zero_workers_fails_build() {
        let result = Pool::builder(add).workers(0).build();
        assert!(matches!(result, Err(Error::InvalidWorkerCount { .. })));
    }

    #[test]
    fn test_accelerator_requires_runtime() {
        let result = Pool::builder(add).accelerator(true).probe(AlwaysOff).build();
        assert!(matches!(result, Err(Error::AcceleratorUnavailable { .. })));
    }

    #[test]
    fn test_accelerator_device_parsing() {
        let pool = Pool::builder(add)
            .accelerator(true)
            .probe(AlwaysOn)
            .devices("0,1")
            .build()
            .unwrap();
        assert_eq!(pool.config().devices, vec!["cuda:0", "cuda:1"]);
        assert_eq!(pool.config().start_method, StartMethod::Clean);
    }

    #[test]
    fn test_accelerator_default_device() {
        let pool = Pool::builder(add)
            .accelerator(true)
            .probe(AlwaysOn)
            .build()
            .unwrap();
        assert_eq!(pool.config().devices, vec!["cuda:0"]);
    }

    #[test]
    fn test_single_invocation_fast_path() {
        let pool = Pool::new(add).unwrap();
        let results = pool.call(Batch::new().arg(vec![7]).arg(vec![5])).unwrap();
        assert_eq!(results, vec![12]);
    }
}
