//! Reducer for fetch state transitions.

use std::marker::PhantomData;

use crate::ui::mvi::Reducer;

use super::intent::FetchIntent;
use super::state::{FetchState, SettlementEffect};

/// Pure state machine behind [`FetchController`](super::FetchController).
pub struct FetchReducer<T>(PhantomData<T>);

impl<T> Reducer for FetchReducer<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    type State = FetchState<T>;
    type Intent = FetchIntent<T>;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            FetchIntent::Started { generation } => FetchState {
                loading: true,
                error: None,
                generation: generation.max(state.generation),
                ..state
            },

            FetchIntent::Settled {
                generation,
                outcome,
                policy,
            } => {
                let effect = state.settlement_effect(generation, policy);
                if effect == SettlementEffect::Discard {
                    return state;
                }

                let loading = match effect {
                    SettlementEffect::Current => false,
                    _ => state.loading,
                };
                match outcome {
                    Ok(data) => FetchState {
                        data: Some(data),
                        loading,
                        error: None,
                        ..state
                    },
                    // Keep stale data on failure
                    Err(error) => FetchState {
                        loading,
                        error: Some(error),
                        ..state
                    },
                }
            }

            FetchIntent::DataReplaced(data) => FetchState {
                data: Some(data),
                ..state
            },
        }
    }
}
