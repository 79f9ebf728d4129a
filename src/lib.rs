// Lib file exposing the detector for the binary and the integration tests.

/// Error type shared by every module.
pub mod error;

/// Hand-written prost model of compiled proto descriptors and the Google API
/// annotations the detector reads.
pub mod descriptor;

/// Findings, their categories and their JSON and text renderings.
pub mod findings;

/// Wrappers over the descriptors and the comparators that diff them.
/// This is where breaking changes are decided.
pub mod comparator;

/// Options, the protoc loader and the detector that ties a run together.
pub mod detector;

/// Command line flags and the entry point used by the binary.
pub mod cli;

/// Source line lookup and API version helpers.
pub mod utils;

pub use comparator::wrappers::FileSet;
pub use detector::{Detector, Options};
pub use error::{DetectorError, Result};
pub use findings::{ChangeType, Finding, FindingCategory, FindingContainer};
