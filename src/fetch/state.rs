//! Snapshot of one fetch controller.

use crate::ui::mvi::UiState;

use super::error::FetchError;
use super::options::SettlementPolicy;

/// State a view renders from.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchState<T> {
    /// Last successfully retrieved result.
    pub data: Option<T>,
    /// True while the most recently started attempt is in flight.
    pub loading: bool,
    /// Last failure; cleared when a new attempt starts.
    pub error: Option<FetchError>,
    /// Generation of the most recently started attempt, 0 before the first.
    pub generation: u64,
}

/// What a settlement is allowed to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SettlementEffect {
    /// Settlement of the newest attempt: writes the outcome and releases `loading`.
    Current,
    /// Older attempt under `LastSettled`: writes the outcome, leaves `loading`.
    LateWrite,
    /// Older attempt under `LatestStarted`: ignored.
    Discard,
}

impl<T> FetchState<T> {
    /// True once at least one attempt has started and none is in flight.
    ///
    /// Data written through `set_data` alone does not count.
    pub fn is_settled(&self) -> bool {
        self.generation > 0 && !self.loading
    }

    pub(crate) fn settlement_effect(
        &self,
        generation: u64,
        policy: SettlementPolicy,
    ) -> SettlementEffect {
        if generation >= self.generation {
            return SettlementEffect::Current;
        }
        match policy {
            SettlementPolicy::LatestStarted => SettlementEffect::Discard,
            SettlementPolicy::LastSettled => SettlementEffect::LateWrite,
        }
    }
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
            generation: 0,
        }
    }
}

impl<T> UiState for FetchState<T> where T: Clone + PartialEq + Send + Sync + 'static {}
