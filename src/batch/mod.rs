//! Argument batches for parallel-map calls
//!
//! A batch bundles parallel positional and keyword argument sequences that
//! must all share one length.

mod align;

pub use align::{Batch, Invocation};
