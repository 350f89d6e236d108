use std::sync::Arc;

use futures::StreamExt;

use crate::api::{Api, MovieId};
use crate::knot::{concurrent, Epic, EventStream, StateReader};
use crate::logic::events::{AppEvent, DispatchableEvent};
use crate::logic::state::{ScreenState, State};

/// Loads details whenever a details screen is pushed or retried.
///
/// Requests run concurrently: results are keyed by movie id, so a late
/// answer for a screen that is gone is simply ignored by the reducer.
pub fn load_movie_details_epic(api: Arc<dyn Api>) -> impl Epic<State, AppEvent> {
    move |events: EventStream<AppEvent>, state: StateReader<State>| {
        let requests = events
            .filter_map(move |event| {
                let state = state.clone();
                async move { details_request(&event, &state.get()) }
            })
            .boxed();

        let api = Arc::clone(&api);
        concurrent(requests, move |id: MovieId| {
            let api = Arc::clone(&api);
            async move {
                match api.movie_details(id).await {
                    Ok(details) => AppEvent::DetailsLoaded { id, details },
                    Err(err) => {
                        tracing::warn!(movie_id = id, error = %err, "details request failed");
                        AppEvent::DetailsFailed {
                            id,
                            reason: err.to_string(),
                        }
                    }
                }
            }
        })
    }
}

fn details_request(event: &AppEvent, state: &State) -> Option<MovieId> {
    match event {
        AppEvent::Navigate(ScreenState::MovieDetails(screen)) => Some(screen.movie_id),
        AppEvent::Dispatched(DispatchableEvent::Retry) => match state.active_screen() {
            Some(ScreenState::MovieDetails(screen)) if screen.is_loading => Some(screen.movie_id),
            _ => None,
        },
        _ => None,
    }
}
