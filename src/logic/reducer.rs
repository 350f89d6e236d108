//! Root reducer for the application store.

use crate::api::Configuration;
use crate::knot::Reducer;

use super::events::AppEvent;
use super::screens::screens_reducer;
use super::state::State;

pub struct AppReducer;

impl Reducer for AppReducer {
    type State = State;
    type Event = AppEvent;

    fn reduce(state: State, event: &AppEvent) -> State {
        State {
            config: config_reducer(state.config, event),
            screens: screens_reducer(state.screens, event),
        }
    }
}

pub fn config_reducer(config: Option<Configuration>, event: &AppEvent) -> Option<Configuration> {
    match event {
        AppEvent::ConfigLoaded(loaded) => Some(loaded.clone()),
        _ => config,
    }
}
