use crate::ui::mvi::Intent;

use super::error::FetchError;
use super::options::SettlementPolicy;

/// Events folded into a [`FetchState`](super::FetchState).
#[derive(Debug, Clone)]
pub enum FetchIntent<T> {
    /// A new attempt with this generation was triggered.
    Started { generation: u64 },

    /// The producer of attempt `generation` finished.
    Settled {
        generation: u64,
        outcome: Result<T, FetchError>,
        policy: SettlementPolicy,
    },

    /// Caller replaced `data` directly, bypassing the producer.
    DataReplaced(T),
}

impl<T: Send + 'static> Intent for FetchIntent<T> {}
