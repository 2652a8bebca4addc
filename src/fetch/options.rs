use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::error::FetchError;

/// One auto-trigger key. Keys compare by value.
pub type TriggerKey = serde_json::Value;

pub(crate) type SuccessCallback<T> = Arc<dyn Fn(&T) + Send + Sync>;
pub(crate) type ErrorCallback = Arc<dyn Fn(&FetchError) + Send + Sync>;

/// When a change of the auto-trigger keys re-runs the producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Retrigger {
    /// Re-run on key change only if `immediate` is set.
    #[default]
    FollowImmediate,
    Always,
    Never,
}

impl Retrigger {
    pub fn enabled(self, immediate: bool) -> bool {
        match self {
            Retrigger::FollowImmediate => immediate,
            Retrigger::Always => true,
            Retrigger::Never => false,
        }
    }
}

/// Which settlement wins when attempts overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SettlementPolicy {
    /// Every settlement writes `data`/`error`, so whichever attempt
    /// settles last wins even if it was started first. Only the newest
    /// attempt releases `loading`.
    #[default]
    LastSettled,
    /// Only the most recently started attempt may write state; older
    /// settlements are discarded as stale.
    LatestStarted,
}

/// Construction options for a [`FetchController`](super::FetchController).
pub struct FetchOptions<T> {
    pub(crate) immediate: bool,
    pub(crate) retrigger: Retrigger,
    pub(crate) settlement: SettlementPolicy,
    pub(crate) keys: Vec<TriggerKey>,
    pub(crate) on_success: Option<SuccessCallback<T>>,
    pub(crate) on_error: Option<ErrorCallback>,
}

impl<T> FetchOptions<T> {
    pub fn new() -> Self {
        Self {
            immediate: true,
            retrigger: Retrigger::default(),
            settlement: SettlementPolicy::default(),
            keys: Vec::new(),
            on_success: None,
            on_error: None,
        }
    }

    /// Run the producer once at construction (default `true`).
    pub fn immediate(mut self, immediate: bool) -> Self {
        self.immediate = immediate;
        self
    }

    pub fn retrigger(mut self, retrigger: Retrigger) -> Self {
        self.retrigger = retrigger;
        self
    }

    pub fn settlement(mut self, settlement: SettlementPolicy) -> Self {
        self.settlement = settlement;
        self
    }

    /// Initial auto-trigger keys.
    pub fn keys<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<TriggerKey>,
    {
        self.keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn on_success(mut self, f: impl Fn(&T) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Arc::new(f));
        self
    }

    pub fn on_error(mut self, f: impl Fn(&FetchError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(f));
        self
    }
}

impl<T> Default for FetchOptions<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for FetchOptions<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchOptions")
            .field("immediate", &self.immediate)
            .field("retrigger", &self.retrigger)
            .field("settlement", &self.settlement)
            .field("keys", &self.keys)
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}
