//! Execution modes and worker start strategy
//!
//! A pool runs in one of two modes, fixed at construction:
//!
//! - **Standard**: workers are pooled for the duration of a call and may run
//!   several invocations each.
//! - **Accelerator**: requires an available accelerator runtime and forces a
//!   clean start, because runtime handles inherited into a reused worker are
//!   not safe to share. Device indices come from a comma-separated list.

use crate::error::{Error, Result};
use serde::Serialize;

/// How the pool is driven, resolved once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecMode {
    /// Plain CPU execution with pooled workers
    Standard,
    /// Accelerator-backed execution with a clean worker start per invocation
    Accelerator,
}

impl ExecMode {
    /// The worker start strategy this mode mandates
    pub fn start_method(self) -> StartMethod {
        match self {
            ExecMode::Standard => StartMethod::Inherit,
            ExecMode::Accelerator => StartMethod::Clean,
        }
    }
}

/// Worker start strategy.
///
/// Scoped configuration on the pool, never a process-global switch, so
/// concurrent pools in one process cannot interfere with each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StartMethod {
    /// Workers are stood up once per call and reused across invocations
    Inherit,
    /// Every invocation gets a freshly started worker; nothing carries over
    Clean,
}

/// Probe for an accelerator runtime on the host.
///
/// The pool only asks two things of the runtime: whether it is usable at all,
/// and a name for diagnostics. Device-to-worker placement stays with the
/// runtime itself.
pub trait AcceleratorRuntime: Send + Sync {
    /// Whether the runtime has at least one usable device
    fn is_available(&self) -> bool;

    /// Runtime name for error messages and the verbose trace
    fn name(&self) -> &str;
}

/// Best-effort CUDA probe for the host environment.
///
/// Considers the runtime available when a device node is present or the
/// driver has advertised devices through `CUDA_VISIBLE_DEVICES`.
#[derive(Debug, Default)]
pub struct HostCudaProbe;

impl AcceleratorRuntime for HostCudaProbe {
    fn is_available(&self) -> bool {
        if std::path::Path::new("/dev/nvidia0").exists() {
            return true;
        }
        match std::env::var("CUDA_VISIBLE_DEVICES") {
            Ok(devices) => !devices.trim().is_empty(),
            Err(_) => false,
        }
    }

    fn name(&self) -> &str {
        "cuda"
    }
}

/// Parse a comma-separated device-index list into device identifiers.
///
/// `"0,2"` becomes `["cuda:0", "cuda:2"]`. Every entry must be a bare device
/// index; anything else rejects the whole list.
pub fn parse_device_list(list: &str) -> Result<Vec<String>> {
    list.split(',')
        .map(|entry| {
            let entry = entry.trim();
            entry
                .parse::<usize>()
                .map(|index| format!("cuda:{}", index))
                .map_err(|_| Error::InvalidDeviceList {
                    list: list.to_string(),
                    entry: entry.to_string(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_start_methods() {
        assert_eq!(ExecMode::Standard.start_method(), StartMethod::Inherit);
        assert_eq!(ExecMode::Accelerator.start_method(), StartMethod::Clean);
    }

    #[test]
    fn test_parse_device_list() {
        assert_eq!(parse_device_list("0").unwrap(), vec!["cuda:0"]);
        assert_eq!(
            parse_device_list("0, 1,3").unwrap(),
            vec!["cuda:0", "cuda:1", "cuda:3"]
        );
    }

    #[test]
    fn test_parse_device_list_rejects_junk() {
        match parse_device_list("0,gpu1") {
            Err(Error::InvalidDeviceList { entry, .. }) => assert_eq!(entry, "gpu1"),
            other => panic!("expected invalid device list, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_device_list_rejects_empty_entry() {
        assert!(parse_device_list("0,,1").is_err());
        assert!(parse_device_list("").is_err());
    }
}
