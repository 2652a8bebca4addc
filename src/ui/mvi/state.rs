/// Marker trait for view state snapshots.
///
/// States are cloned out to readers, compared to detect changes, and need
/// a well-defined empty value for a freshly mounted view.
pub trait UiState: Clone + PartialEq + Default + Send + Sync + 'static {}
