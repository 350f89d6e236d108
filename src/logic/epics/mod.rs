//! Side effects of the application store.

mod configuration;
mod details;
mod discover;
mod navigate;

use std::sync::Arc;

use crate::api::Api;
use crate::knot::RootEpic;

use super::events::AppEvent;
use super::state::State;

pub use configuration::configuration_epic;
pub use details::load_movie_details_epic;
pub use discover::discover_movies_epic;
pub use navigate::navigate_epic;

/// All application epics, composed.
pub fn root_epic(api: Arc<dyn Api>, capacity: usize) -> RootEpic<State, AppEvent> {
    RootEpic::new()
        .with_capacity(capacity)
        .with("discover", discover_movies_epic(Arc::clone(&api)))
        .with("configuration", configuration_epic(Arc::clone(&api)))
        .with("navigate", navigate_epic())
        .with("movie-details", load_movie_details_epic(Arc::clone(&api)))
}
