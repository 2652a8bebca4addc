//! Base trait for intents.

/// Marker trait for intent objects.
///
/// An intent describes an event that a reducer folds into state: a caller
/// triggering work, asynchronous work settling, or a direct override.
/// Intents cross task boundaries, hence `Send + 'static`.
pub trait Intent: Send + 'static {}
