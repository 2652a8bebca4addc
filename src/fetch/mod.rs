//! Generic asynchronous data-fetch controller.
//!
//! A [`FetchController`] wraps a zero-argument async producer and tracks
//! the lifecycle of each attempt (trigger, pending, settled) as a
//! [`FetchState`] that views read or subscribe to.
//!
//! Every attempt gets a generation number. By default
//! ([`SettlementPolicy::LastSettled`]) overlapping attempts race and the
//! one that settles last decides `data`/`error`, even if it started first.
//! Opting into [`SettlementPolicy::LatestStarted`] discards settlements
//! from superseded attempts, so a slow older call cannot leave older data
//! on screen. In both modes only the newest attempt releases `loading`.

mod controller;
mod error;
mod intent;
mod options;
mod reducer;
mod state;

pub use controller::{Attempt, AttemptStatus, FetchController};
pub use error::FetchError;
pub use intent::FetchIntent;
pub use options::{FetchOptions, Retrigger, SettlementPolicy, TriggerKey};
pub use reducer::FetchReducer;
pub use state::FetchState;
