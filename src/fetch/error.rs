//! The single failure type surfaced by a fetch controller.

use std::any::Any;
use std::error::Error as StdError;
use std::fmt::Display;
use std::sync::Arc;

use thiserror::Error;

/// Normalized fetch failure.
///
/// Whatever the producer fails with, views see the same shape: a
/// human-readable message, plus the original error as `source` when
/// there was one.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct FetchError {
    message: String,
    #[source]
    source: Option<Arc<dyn StdError + Send + Sync + 'static>>,
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap a failure value that is not an error type by stringifying it.
    pub fn from_value(value: impl Display) -> Self {
        Self::new(value.to_string())
    }

    /// Normalize a panic payload from a producer task.
    pub(crate) fn from_panic(payload: Box<dyn Any + Send + 'static>) -> Self {
        let detail = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self::new(format!("producer panicked: {}", detail))
    }

    /// The attempt's driving task was dropped before the producer settled.
    pub(crate) fn aborted() -> Self {
        Self::new("attempt aborted before settling")
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<anyhow::Error> for FetchError {
    fn from(err: anyhow::Error) -> Self {
        let message = err.to_string();
        let source: Box<dyn StdError + Send + Sync + 'static> = err.into();
        Self {
            message,
            source: Some(Arc::from(source)),
        }
    }
}

impl PartialEq for FetchError {
    fn eq(&self, other: &Self) -> bool {
        self.message == other.message
    }
}
