use std::sync::Arc;

use futures::StreamExt;

use crate::api::Api;
use crate::knot::{concurrent, Epic, EventStream, StateReader};
use crate::logic::events::{AppEvent, DispatchableEvent};
use crate::logic::state::State;

/// Loads the API configuration at startup, and again on retry while it is
/// still missing.
pub fn configuration_epic(api: Arc<dyn Api>) -> impl Epic<State, AppEvent> {
    move |events: EventStream<AppEvent>, state: StateReader<State>| {
        let requests = events
            .filter_map(move |event| {
                let state = state.clone();
                async move {
                    match event {
                        AppEvent::Init => Some(()),
                        AppEvent::Dispatched(DispatchableEvent::Retry)
                            if state.get().config.is_none() =>
                        {
                            Some(())
                        }
                        _ => None,
                    }
                }
            })
            .boxed();

        let api = Arc::clone(&api);
        concurrent(requests, move |()| {
            let api = Arc::clone(&api);
            async move {
                match api.configuration().await {
                    Ok(config) => AppEvent::ConfigLoaded(config),
                    Err(err) => {
                        tracing::warn!(error = %err, "configuration request failed");
                        AppEvent::ConfigFailed {
                            reason: err.to_string(),
                        }
                    }
                }
            }
        })
    }
}
