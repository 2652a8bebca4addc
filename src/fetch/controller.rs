//! The fetch controller: one re-triggerable asynchronous operation.

use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use parking_lot::Mutex;
use scopeguard::ScopeGuard;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::ui::mvi::Store;

use super::error::FetchError;
use super::intent::FetchIntent;
use super::options::{
    ErrorCallback, FetchOptions, Retrigger, SettlementPolicy, SuccessCallback, TriggerKey,
};
use super::reducer::FetchReducer;
use super::state::{FetchState, SettlementEffect};

type ProducerFuture<T> = Pin<Box<dyn Future<Output = Result<T, FetchError>> + Send>>;
type Producer<T> = Arc<dyn Fn() -> ProducerFuture<T> + Send + Sync>;

/// How one attempt ended, as seen by whoever awaits its [`Attempt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptStatus {
    Succeeded,
    Failed,
    /// A newer attempt had started; the result was discarded.
    Stale,
}

/// Completion signal of one `execute()` call.
///
/// Awaiting it is optional: the attempt runs on its own task and settles
/// whether or not anyone waits. Failures never surface here as errors,
/// only as [`AttemptStatus::Failed`] and the controller's `error` state.
/// A panicking `on_success`/`on_error` callback does not change the status.
#[derive(Debug)]
pub struct Attempt {
    generation: u64,
    handle: JoinHandle<AttemptStatus>,
}

impl Attempt {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Future for Attempt {
    type Output = AttemptStatus;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.handle).poll(cx) {
            Poll::Ready(Ok(status)) => Poll::Ready(status),
            // Driving task was cancelled; its guard already recorded the failure.
            Poll::Ready(Err(_)) => Poll::Ready(AttemptStatus::Failed),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Tracks loading / error / data of a producer for one view.
///
/// Cloning yields another handle to the same controller. Must be created
/// and triggered inside a tokio runtime.
pub struct FetchController<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    inner: Arc<ControllerInner<T>>,
}

struct ControllerInner<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    producer: Producer<T>,
    store: Store<FetchState<T>>,
    keys: Mutex<Vec<TriggerKey>>,
    immediate: bool,
    retrigger: Retrigger,
    settlement: SettlementPolicy,
    on_success: Option<SuccessCallback<T>>,
    on_error: Option<ErrorCallback>,
}

impl<T> Clone for FetchController<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> FetchController<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Create a controller around `producer`.
    ///
    /// With `immediate` set (the default) the first attempt starts before
    /// this returns.
    pub fn new<P, Fut, E>(producer: P, options: FetchOptions<T>) -> Self
    where
        P: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Into<anyhow::Error>,
    {
        let producer: Producer<T> = Arc::new(move || -> ProducerFuture<T> {
            let fut = producer();
            Box::pin(async move {
                fut.await.map_err(|e| {
                    let err: anyhow::Error = e.into();
                    FetchError::from(err)
                })
            })
        });

        let controller = Self {
            inner: Arc::new(ControllerInner {
                producer,
                store: Store::new(FetchState::default()),
                keys: Mutex::new(options.keys),
                immediate: options.immediate,
                retrigger: options.retrigger,
                settlement: options.settlement,
                on_success: options.on_success,
                on_error: options.on_error,
            }),
        };

        if controller.inner.immediate {
            controller.execute();
        }
        controller
    }

    /// Start a new attempt.
    ///
    /// `loading` is set and `error` cleared before this returns; the
    /// producer then runs on a spawned task.
    pub fn execute(&self) -> Attempt {
        let generation = self
            .inner
            .store
            .dispatch_with::<FetchReducer<T>, _>(|state| {
                let generation = state.generation + 1;
                (FetchIntent::Started { generation }, generation)
            });
        debug!(generation, "fetch attempt started");

        let producer = Arc::clone(&self.inner.producer);
        let work = tokio::spawn(async move { producer().await });

        // Releases `loading` if the driving task is dropped before settling,
        // including before its first poll.
        let pending = scopeguard::guard(Arc::clone(&self.inner), move |inner| {
            warn!(generation, "fetch attempt dropped before settling");
            inner.settle(generation, Err(FetchError::aborted()));
        });
        let handle = tokio::spawn(async move {
            let outcome = match work.await {
                Ok(result) => result,
                Err(join_err) if join_err.is_panic() => {
                    let err = FetchError::from_panic(join_err.into_panic());
                    warn!(generation, error = %err, "fetch producer panicked");
                    Err(err)
                }
                Err(_) => Err(FetchError::aborted()),
            };

            let inner = ScopeGuard::into_inner(pending);
            inner.settle(generation, outcome)
        });

        Attempt { generation, handle }
    }

    /// Replace the auto-trigger keys.
    ///
    /// Keys are compared element by element against the previous ones. On
    /// a change, a new attempt starts if retriggering is enabled; with the
    /// default [`Retrigger::FollowImmediate`] that requires `immediate`.
    pub fn set_keys<I, K>(&self, keys: I) -> Option<Attempt>
    where
        I: IntoIterator<Item = K>,
        K: Into<TriggerKey>,
    {
        let keys: Vec<TriggerKey> = keys.into_iter().map(Into::into).collect();
        {
            let mut current = self.inner.keys.lock();
            if *current == keys {
                return None;
            }
            *current = keys;
        }

        if self.inner.retrigger.enabled(self.inner.immediate) {
            Some(self.execute())
        } else {
            debug!(
                retrigger = ?self.inner.retrigger,
                immediate = self.inner.immediate,
                "trigger keys changed but retrigger is disabled"
            );
            None
        }
    }

    /// Overwrite `data` without running the producer.
    ///
    /// An attempt that is still in flight settles later and wins.
    pub fn set_data(&self, data: T) {
        self.inner
            .store
            .dispatch::<FetchReducer<T>>(FetchIntent::DataReplaced(data));
    }

    /// Compute new `data` from the current value.
    ///
    /// `f` runs while the state lock is held and must not call back into
    /// this controller (or any clone of it); doing so deadlocks.
    pub fn update_data(&self, f: impl FnOnce(Option<&T>) -> T) {
        self.inner
            .store
            .dispatch_with::<FetchReducer<T>, _>(|state| {
                (FetchIntent::DataReplaced(f(state.data.as_ref())), ())
            });
    }

    pub fn snapshot(&self) -> FetchState<T> {
        self.inner.store.snapshot()
    }

    pub fn data(&self) -> Option<T> {
        self.inner.store.read(|s| s.data.clone())
    }

    pub fn loading(&self) -> bool {
        self.inner.store.read(|s| s.loading)
    }

    pub fn error(&self) -> Option<FetchError> {
        self.inner.store.read(|s| s.error.clone())
    }

    pub fn generation(&self) -> u64 {
        self.inner.store.read(|s| s.generation)
    }

    pub fn keys(&self) -> Vec<TriggerKey> {
        self.inner.keys.lock().clone()
    }

    /// Receiver notified on every state transition.
    pub fn subscribe(&self) -> watch::Receiver<FetchState<T>> {
        self.inner.store.subscribe()
    }

    /// Wait until no attempt is loading and return that state.
    pub async fn settled(&self) -> FetchState<T> {
        let mut rx = self.subscribe();
        let state = match rx.wait_for(|state| !state.loading).await {
            Ok(state) => state.clone(),
            Err(_) => self.snapshot(),
        };
        state
    }
}

impl<T> ControllerInner<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn settle(&self, generation: u64, outcome: Result<T, FetchError>) -> AttemptStatus {
        let policy = self.settlement;
        let succeeded = outcome.is_ok();
        let observed = match (&outcome, &self.on_success) {
            (Ok(data), Some(_)) => Some(Ok(data.clone())),
            (Ok(_), None) => None,
            (Err(err), _) => Some(Err(err.clone())),
        };

        let effect = self
            .store
            .dispatch_with::<FetchReducer<T>, _>(|state| {
                let effect = state.settlement_effect(generation, policy);
                let intent = FetchIntent::Settled {
                    generation,
                    outcome,
                    policy,
                };
                (intent, effect)
            });

        if effect == SettlementEffect::Discard {
            debug!(generation, "discarding stale fetch settlement");
            return AttemptStatus::Stale;
        }

        match observed {
            Some(Ok(data)) => {
                debug!(generation, ?effect, "fetch attempt succeeded");
                if let Some(on_success) = &self.on_success {
                    if catch_unwind(AssertUnwindSafe(|| on_success(&data))).is_err() {
                        warn!(generation, "on_success callback panicked");
                    }
                }
            }
            Some(Err(err)) => {
                debug!(generation, ?effect, error = %err, "fetch attempt failed");
                if let Some(on_error) = &self.on_error {
                    if catch_unwind(AssertUnwindSafe(|| on_error(&err))).is_err() {
                        warn!(generation, "on_error callback panicked");
                    }
                }
            }
            None => debug!(generation, ?effect, "fetch attempt succeeded"),
        }

        if succeeded {
            AttemptStatus::Succeeded
        } else {
            AttemptStatus::Failed
        }
    }
}
