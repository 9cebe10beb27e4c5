//! Error types for the parmap worker pool

use thiserror::Error;

/// Worker pool errors
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    /// Worker count resolved to zero
    ///
    /// **Triggered by:** Requesting a pool with `workers(0)`
    /// **Prevention:** Request at least one worker; the count is clamped to
    /// host parallelism but must start positive
    #[error("The number of workers must be positive, however, workers={requested} received")]
    InvalidWorkerCount {
        /// Worker count as requested by the caller
        requested: usize,
    },

    /// Accelerator mode requested without an available accelerator runtime
    ///
    /// **Triggered by:** Building an accelerator pool when the runtime probe
    /// reports no usable devices
    #[error("Accelerator mode requested but runtime '{runtime}' reports no available devices")]
    AcceleratorUnavailable {
        /// Name of the probed runtime
        runtime: String,
    },

    /// Device-list string could not be parsed
    #[error("Invalid device list {list:?}: entry {entry:?} is not a device index")]
    InvalidDeviceList {
        /// The full comma-separated list as supplied
        list: String,
        /// The entry that failed to parse
        entry: String,
    },

    // Argument errors
    /// Call was made with no argument sequences at all
    #[error("At least one positional or keyword argument sequence is required")]
    EmptyBatch,

    /// Argument sequences disagree on length
    ///
    /// **Triggered by:** Supplying sequences of different lengths in one batch
    /// **Example:** positional `[1, 2, 3]` alongside keyword `y = [10, 20]`
    #[error("All argument sequences must share one length, got distinct lengths {lengths:?}")]
    LengthMismatch {
        /// The distinct lengths observed, ascending
        lengths: Vec<usize>,
    },

    // Invocation errors
    /// The target function failed at some index
    #[error("Invocation {index} failed: {source}")]
    Invocation {
        /// Batch index of the failing invocation
        index: usize,
        /// The target function's error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failure reported by the target function itself
    #[error("Target function failed: {0}")]
    TargetFailure(String),

    /// A worker panicked while executing an invocation
    #[error("Worker panicked while executing invocation {index}")]
    WorkerPanicked {
        /// Batch index of the invocation that was running
        index: usize,
    },

    // Infrastructure errors
    /// The underlying thread pool could not be created
    #[error("Failed to build worker pool: {reason}")]
    PoolBuild {
        /// Builder error description
        reason: String,
    },
}

impl Error {
    /// Wrap a target-function failure with its batch index
    pub fn invocation<E>(index: usize, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Invocation {
            index,
            source: Box::new(source),
        }
    }

    /// Create a target-function failure with a message
    pub fn failure(msg: impl Into<String>) -> Self {
        Error::TargetFailure(msg.into())
    }

    /// True for errors raised before any invocation was dispatched
    pub fn is_pre_dispatch(&self) -> bool {
        matches!(
            self,
            Error::InvalidWorkerCount { .. }
                | Error::AcceleratorUnavailable { .. }
                | Error::InvalidDeviceList { .. }
                | Error::EmptyBatch
                | Error::LengthMismatch { .. }
        )
    }
}

/// Result type for parmap operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_wraps_source() {
        let inner = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err = Error::invocation(3, inner);
        assert!(err.to_string().contains("Invocation 3"));
        assert!(!err.is_pre_dispatch());
    }

    #[test]
    fn test_pre_dispatch_classification() {
        assert!(Error::EmptyBatch.is_pre_dispatch());
        assert!(Error::LengthMismatch {
            lengths: vec![2, 3]
        }
        .is_pre_dispatch());
        assert!(Error::InvalidWorkerCount { requested: 0 }.is_pre_dispatch());
        assert!(!Error::WorkerPanicked { index: 0 }.is_pre_dispatch());
    }
}
