//! State container that applies reducers and publishes snapshots.

use parking_lot::Mutex;
use tokio::sync::watch;

use super::reducer::Reducer;
use super::state::UiState;

/// Owns the current state of one view and publishes every transition.
///
/// Transitions are serialized by a mutex: reading the current state,
/// building the intent and reducing happen in one critical section, so an
/// intent can depend on the state it is applied to (e.g. allocating the
/// next attempt generation).
pub struct Store<S: UiState> {
    state: Mutex<S>,
    published: watch::Sender<S>,
}

impl<S: UiState> Store<S> {
    pub fn new(initial: S) -> Self {
        let (published, _) = watch::channel(initial.clone());
        Self {
            state: Mutex::new(initial),
            published,
        }
    }

    /// Apply one intent through reducer `R`.
    pub fn dispatch<R>(&self, intent: R::Intent)
    where
        R: Reducer<State = S>,
    {
        self.dispatch_with::<R, _>(|_| (intent, ()));
    }

    /// Build an intent from the current state and apply it atomically.
    ///
    /// `build` sees the state the intent will be reduced against and may
    /// return an extra value to the caller.
    pub fn dispatch_with<R, Out>(&self, build: impl FnOnce(&S) -> (R::Intent, Out)) -> Out
    where
        R: Reducer<State = S>,
    {
        let mut state = self.state.lock();
        let (intent, out) = build(&state);
        let next = R::reduce(std::mem::take(&mut *state), intent);
        *state = next.clone();
        self.published.send_replace(next);
        out
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> S {
        self.state.lock().clone()
    }

    /// Read a projection of the current state without cloning all of it.
    pub fn read<Out>(&self, f: impl FnOnce(&S) -> Out) -> Out {
        f(&self.state.lock())
    }

    /// Receiver that observes every published state.
    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.published.subscribe()
    }
}
