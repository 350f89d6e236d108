//! Events flowing through the application store.

use crate::api::{Configuration, Movie, MovieDetails, MovieId};
use crate::knot::Event;

use super::state::ScreenState;

/// User intent: the only events `dispatch` accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchableEvent {
    /// Request the next discover page.
    LoadMore,
    /// Restrict discover results to a release year, or clear the filter.
    SetYearFilter(Option<u16>),
    /// Retry whatever failed on the active screen.
    Retry,
    OpenMovie(MovieId),
    Back,
}

impl Event for DispatchableEvent {}

/// Every event the store's bus carries.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Injected once before any dispatch so epics can run startup work.
    Init,
    Dispatched(DispatchableEvent),
    ConfigLoaded(Configuration),
    ConfigFailed {
        reason: String,
    },
    DiscoverLoaded {
        page: u32,
        year: Option<u16>,
        total_pages: u32,
        movies: Vec<Movie>,
    },
    DiscoverFailed {
        page: u32,
        year: Option<u16>,
        reason: String,
    },
    /// Push a screen onto the backstack.
    Navigate(ScreenState),
    /// Pop the active screen; ignored when it is the last one.
    PopScreen,
    DetailsLoaded {
        id: MovieId,
        details: MovieDetails,
    },
    DetailsFailed {
        id: MovieId,
        reason: String,
    },
    /// Back was pressed on the root screen; the UI should close.
    FinishApp,
}

impl Event for AppEvent {}

impl From<DispatchableEvent> for AppEvent {
    fn from(event: DispatchableEvent) -> Self {
        AppEvent::Dispatched(event)
    }
}
