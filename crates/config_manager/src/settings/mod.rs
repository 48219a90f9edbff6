//! Configuration setting types for the per-repository label policies.
//!
//! Each module covers one policy the label bot applies to pull requests.

pub mod clear_labels;
pub mod squash;

// Re-export all types for convenient access
pub use clear_labels::ClearLabelConfig;
pub use squash::SquashConfig;
