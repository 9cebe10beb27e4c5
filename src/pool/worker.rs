//! Per-worker invocation handling
//!
//! `run_unit` is the boundary between the engine and the target function: one
//! exclusively owned invocation unit goes in, a result or an index-tagged
//! error comes out. The clean-start path below runs units on freshly spawned
//! OS threads so nothing is inherited from one invocation to the next.

use crate::batch::{Batch, Invocation};
use crate::error::{Error, Result};
use std::thread;

/// Invoke the target function on one owned unit.
///
/// Stateless; failures are tagged with the unit's batch index so the caller
/// sees which invocation broke the call.
pub(crate) fn run_unit<T, R, F>(func: &F, unit: Invocation<T>) -> Result<R>
where
    F: Fn(Invocation<T>) -> Result<R> + ?Sized,
{
    let index = unit.index;
    func(unit).map_err(|err| Error::invocation(index, err))
}

/// Run a batch under the clean start method.
///
/// Invocations proceed in waves of at most `workers` threads; every thread is
/// brand new and executes exactly one unit. Joining in index order keeps the
/// result sequence aligned with the batch, and `thread::scope` joins every
/// spawned worker even when the call is aborting with an error.
pub(crate) fn run_clean<T, R, F>(
    func: &F,
    batch: &Batch<T>,
    len: usize,
    workers: usize,
) -> Result<Vec<R>>
where
    T: Clone + Send,
    R: Send,
    F: Fn(Invocation<T>) -> Result<R> + Sync + ?Sized,
{
    let mut results = Vec::with_capacity(len);
    let mut start = 0;

    while start < len {
        let end = (start + workers).min(len);
        tracing::debug!(start, end, "dispatching clean worker wave");

        // join() only fails when the worker panicked; carry the index out of
        // the scope so the panic maps to a WorkerPanicked error.
        let wave: Vec<std::result::Result<Result<R>, usize>> = thread::scope(|s| {
            let handles: Vec<_> = (start..end)
                .map(|i| {
                    let unit = batch.unit(i);
                    (i, s.spawn(move || run_unit(func, unit)))
                })
                .collect();

            handles
                .into_iter()
                .map(|(i, handle)| handle.join().map_err(|_| i))
                .collect()
        });

        for outcome in wave {
            match outcome {
                Ok(result) => results.push(result?),
                Err(index) => return Err(Error::WorkerPanicked { index }),
            }
        }
        start = end;
    }

    Ok(results)
}
