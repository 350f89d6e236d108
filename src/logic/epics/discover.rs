use std::sync::Arc;

use futures::StreamExt;

use crate::api::Api;
use crate::knot::{latest_wins, Epic, EventStream, StateReader};
use crate::logic::events::{AppEvent, DispatchableEvent};
use crate::logic::state::{ScreenState, State};

type DiscoverRequest = (u32, Option<u16>);

/// Loads discover pages.
///
/// Triggered by startup and by any intent that can leave the discover screen
/// waiting for a page. Latest-wins: a new request aborts the one in flight,
/// and the reducer drops any result that still slips through. An intent that
/// leaves the pending request unchanged does not restart it.
pub fn discover_movies_epic(api: Arc<dyn Api>) -> impl Epic<State, AppEvent> {
    move |events: EventStream<AppEvent>, state: StateReader<State>| {
        let mut issued = None;
        let requests = events
            .filter_map(move |event| {
                let request = next_request(&event, &state.get(), &mut issued);
                async move { request }
            })
            .boxed();

        let api = Arc::clone(&api);
        latest_wins(requests, move |(page, year)| {
            let api = Arc::clone(&api);
            async move {
                match api.discover_movies(page, year).await {
                    Ok(result) => AppEvent::DiscoverLoaded {
                        page,
                        year,
                        total_pages: result.total_pages,
                        movies: result.movies,
                    },
                    Err(err) => {
                        tracing::warn!(page, ?year, error = %err, "discover request failed");
                        AppEvent::DiscoverFailed {
                            page,
                            year,
                            reason: err.to_string(),
                        }
                    }
                }
            }
        })
    }
}

/// Decide whether `event` starts a new discover request.
///
/// `issued` is the request in flight, cleared once its result comes back.
fn next_request(
    event: &AppEvent,
    state: &State,
    issued: &mut Option<DiscoverRequest>,
) -> Option<DiscoverRequest> {
    match event {
        AppEvent::DiscoverLoaded { page, year, .. }
        | AppEvent::DiscoverFailed { page, year, .. } => {
            if *issued == Some((*page, *year)) {
                *issued = None;
            }
            return None;
        }
        _ if !triggers_discover(event) => return None,
        _ => {}
    }

    let Some(pending) = pending_discover(state) else {
        *issued = None;
        return None;
    };
    if *issued == Some(pending) {
        return None;
    }
    *issued = Some(pending);
    Some(pending)
}

/// The request of the discover screen waiting for a page, wherever it sits
/// in the backstack.
fn pending_discover(state: &State) -> Option<DiscoverRequest> {
    state.screens.iter().rev().find_map(|screen| match screen {
        ScreenState::Discover(discover) => discover.pending_request(),
        ScreenState::MovieDetails(_) => None,
    })
}

fn triggers_discover(event: &AppEvent) -> bool {
    matches!(
        event,
        AppEvent::Init
            | AppEvent::Dispatched(
                DispatchableEvent::LoadMore
                    | DispatchableEvent::SetYearFilter(_)
                    | DispatchableEvent::Retry
            )
    )
}
