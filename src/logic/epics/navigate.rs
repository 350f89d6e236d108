use futures::StreamExt;

use crate::knot::{Epic, EventStream, StateReader};
use crate::logic::events::{AppEvent, DispatchableEvent};
use crate::logic::screens::MovieDetailsState;
use crate::logic::state::{ScreenState, State};

/// Turns navigation intent into backstack changes.
///
/// Back pops the active screen, or finishes the app on the root screen. Both
/// outcomes are decided here from one snapshot so a single Back never does
/// both.
pub fn navigate_epic() -> impl Epic<State, AppEvent> {
    |events: EventStream<AppEvent>, state: StateReader<State>| {
        events
            .filter_map(move |event| {
                let state = state.clone();
                async move {
                    match event {
                        AppEvent::Dispatched(DispatchableEvent::OpenMovie(id)) => Some(
                            AppEvent::Navigate(ScreenState::MovieDetails(
                                MovieDetailsState::loading(id),
                            )),
                        ),
                        AppEvent::Dispatched(DispatchableEvent::Back) => {
                            Some(back_action(&state.get()))
                        }
                        _ => None,
                    }
                }
            })
            .boxed()
    }
}

fn back_action(state: &State) -> AppEvent {
    if state.screens.len() > 1 {
        AppEvent::PopScreen
    } else {
        AppEvent::FinishApp
    }
}
