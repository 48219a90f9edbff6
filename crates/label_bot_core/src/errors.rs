//! Error types for the label bot.
//!
//! Sub-operations of one event (adding labels, removing labels, the squash label and
//! label clearing) are independent. Their failures are gathered with an
//! [`ErrorCollector`] and reported together as a single [`LabelBotError`].

use config_manager::ConfigurationError;
use github_client::LabelRemoval;
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors produced while handling a repository event.
#[derive(Error, Debug)]
pub enum LabelBotError {
    /// A call to the hosting platform failed.
    #[error("GitHub operation failed: {0}")]
    GitHub(#[from] github_client::Error),

    /// The repository configuration could not be used.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Several independent operations failed.
    #[error("{} operations failed: {}", .0.len(), join_errors(.0))]
    Multiple(Vec<LabelBotError>),
}

impl LabelBotError {
    /// Returns the individual failures, flattening nested [`LabelBotError::Multiple`] values.
    pub fn errors(&self) -> Vec<&LabelBotError> {
        match self {
            LabelBotError::Multiple(errors) => errors.iter().flat_map(|e| e.errors()).collect(),
            other => vec![other],
        }
    }
}

fn join_errors(errors: &[LabelBotError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for label bot operations.
pub type LabelBotResult<T> = Result<T, LabelBotError>;

/// Accumulates the errors of independent operations.
///
/// # Examples
///
/// ```
/// use label_bot_core::{ErrorCollector, LabelBotError};
///
/// let mut errors = ErrorCollector::new();
/// let value = errors.record(Ok::<_, LabelBotError>(5));
/// assert_eq!(value, Some(5));
/// assert!(errors.into_result().is_ok());
/// ```
#[derive(Debug, Default)]
pub struct ErrorCollector {
    errors: Vec<LabelBotError>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an error. Nested collections are flattened.
    pub fn push(&mut self, error: impl Into<LabelBotError>) {
        match error.into() {
            LabelBotError::Multiple(errors) => {
                for e in errors {
                    self.push(e);
                }
            }
            other => self.errors.push(other),
        }
    }

    /// Records the error of a result, if any, and returns the success value.
    pub fn record<T>(&mut self, result: LabelBotResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.push(e);
                None
            }
        }
    }

    /// Records the failures of a label removal and returns the labels that were removed.
    pub fn record_removal(&mut self, removal: LabelRemoval) -> Vec<String> {
        for (_, e) in removal.failures {
            self.push(e);
        }
        removal.removed
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Converts the collected errors into a result.
    ///
    /// No errors gives `Ok(())`, a single error is returned as is and more than one
    /// error is wrapped in [`LabelBotError::Multiple`].
    pub fn into_result(mut self) -> LabelBotResult<()> {
        match self.errors.len() {
            0 => Ok(()),
            1 => Err(self.errors.remove(0)),
            _ => Err(LabelBotError::Multiple(self.errors)),
        }
    }
}
