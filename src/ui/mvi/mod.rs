//! Model-View-Intent (MVI) primitives for view state.
//!
//! # Architecture
//!
//! ```text
//! Intent ──→ Reducer ──→ Store ──→ View (watch::Receiver)
//!    ↑                                 │
//!    └─────────────────────────────────┘
//! ```
//!
//! - **State**: snapshot a view renders from
//! - **Intent**: something that happened (attempt started, attempt settled)
//! - **Reducer**: pure `(State, Intent) -> State`
//! - **Store**: owns the current state and publishes every transition

mod intent;
mod reducer;
mod state;
mod store;

pub use intent::Intent;
pub use reducer::Reducer;
pub use state::UiState;
pub use store::Store;
