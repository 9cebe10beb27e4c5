//! Batch construction and argument alignment
//!
//! Validates that every supplied sequence shares one common length before any
//! work is dispatched, and extracts per-index invocation units.

use crate::error::{Error, Result};
use std::collections::BTreeMap;

/// One call's full set of aligned argument sequences.
///
/// Positional sequences are matched to the target function by position,
/// keyword sequences by name. All sequences must have the same length; that
/// shared length is the batch size.
///
/// # Example
/// ```
/// use parmap::Batch;
///
/// let batch = Batch::new()
///     .arg(vec![1, 2, 3])
///     .kwarg("offset", vec![10, 20, 30]);
/// assert_eq!(batch.len().unwrap(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct Batch<T> {
    positional: Vec<Vec<T>>,
    keyword: BTreeMap<String, Vec<T>>,
}

impl<T> Default for Batch<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Batch<T> {
    /// Create an empty batch
    pub fn new() -> Self {
        Batch {
            positional: Vec::new(),
            keyword: BTreeMap::new(),
        }
    }

    /// Append a positional argument sequence
    pub fn arg(mut self, seq: Vec<T>) -> Self {
        self.positional.push(seq);
        self
    }

    /// Add a keyword argument sequence under `name`
    pub fn kwarg(mut self, name: impl Into<String>, seq: Vec<T>) -> Self {
        self.keyword.insert(name.into(), seq);
        self
    }

    /// Number of argument sequences in the batch
    pub fn sequences(&self) -> usize {
        self.positional.len() + self.keyword.len()
    }

    /// Validate alignment and return the shared batch length.
    ///
    /// All sequences must agree on one length. A batch with no sequences at
    /// all is rejected; a shared length of zero is valid and yields an empty
    /// result.
    pub fn len(&self) -> Result<usize> {
        let mut lengths: Vec<usize> = self
            .positional
            .iter()
            .map(Vec::len)
            .chain(self.keyword.values().map(Vec::len))
            .collect();
        lengths.sort_unstable();
        lengths.dedup();

        match lengths.as_slice() {
            [] => Err(Error::EmptyBatch),
            [len] => Ok(*len),
            _ => Err(Error::LengthMismatch { lengths }),
        }
    }

    /// True when the batch aligns to length zero
    pub fn is_empty(&self) -> bool {
        matches!(self.len(), Ok(0))
    }
}

impl<T: Clone> Batch<T> {
    /// Extract the invocation unit for index `i`.
    ///
    /// Clones the i-th element of every sequence, so the unit is exclusively
    /// owned by whichever worker runs it. Callers must have validated the
    /// batch first; `i` must be below the shared length.
    pub fn unit(&self, i: usize) -> Invocation<T> {
        Invocation {
            index: i,
            args: self.positional.iter().map(|seq| seq[i].clone()).collect(),
            kwargs: self
                .keyword
                .iter()
                .map(|(name, seq)| (name.clone(), seq[i].clone()))
                .collect(),
        }
    }
}

/// The per-index argument tuple handed to one worker.
///
/// Owns its data outright; nothing is shared with other invocations.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation<T> {
    /// Index of this unit within its batch
    pub index: usize,
    /// Positional arguments, in declaration order
    pub args: Vec<T>,
    /// Keyword arguments by name
    pub kwargs: BTreeMap<String, T>,
}

impl<T> Invocation<T> {
    /// Look up a keyword argument by name
    pub fn kwarg(&self, name: &str) -> Option<&T> {
        self.kwargs.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_shared_length() {
        let batch = Batch::new().arg(vec![1, 2, 3]).arg(vec![4, 5, 6]);
        assert_eq!(batch.len().unwrap(), 3);
    }

    #[test]
    fn test_keyword_and_positional_agree() {
        let batch = Batch::new()
            .arg(vec!["a", "b"])
            .kwarg("suffix", vec!["x", "y"]);
        assert_eq!(batch.len().unwrap(), 2);
    }

    #[test]
    fn test_zero_length_is_valid() {
        let batch: Batch<i64> = Batch::new().arg(vec![]);
        assert_eq!(batch.len().unwrap(), 0);
        assert!(batch.is_empty());
    }

    #[test]
    fn test_no_sequences_rejected() {
        let batch: Batch<i64> = Batch::new();
        assert!(matches!(batch.len(), Err(Error::EmptyBatch)));
    }

    #[test]
    fn test_mismatched_lengths_rejected() {
        let batch = Batch::new().arg(vec![1, 2, 3]).kwarg("y", vec![10, 20]);
        match batch.len() {
            Err(Error::LengthMismatch { lengths }) => assert_eq!(lengths, vec![2, 3]),
            other => panic!("expected length mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_unit_extraction() {
        let batch = Batch::new()
            .arg(vec![1, 2, 3])
            .kwarg("offset", vec![10, 20, 30]);
        let unit = batch.unit(1);
        assert_eq!(unit.index, 1);
        assert_eq!(unit.args, vec![2]);
        assert_eq!(unit.kwarg("offset"), Some(&20));
    }

    #[test]
    fn test_units_are_independent() {
        let batch = Batch::new().arg(vec![String::from("a"), String::from("b")]);
        let first = batch.unit(0);
        let second = batch.unit(1);
        assert_ne!(first.args, second.args);
    }
}
