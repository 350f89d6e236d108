//! Discover screen: a paginated, optionally year-filtered movie list.

use crate::api::Movie;
use crate::logic::events::{AppEvent, DispatchableEvent};

#[derive(Debug, Clone, PartialEq)]
pub struct DiscoverScreenState {
    /// Page being loaded, or the last page loaded. Zero-based.
    pub page: u32,
    pub movies: Vec<Movie>,
    pub show_error: bool,
    pub is_loading: bool,
    pub year_filter: Option<u16>,
    /// Known once the first page of the current filter has arrived.
    pub total_pages: Option<u32>,
}

impl DiscoverScreenState {
    pub fn initial() -> Self {
        Self {
            page: 0,
            movies: Vec::new(),
            show_error: false,
            is_loading: true,
            year_filter: None,
            total_pages: None,
        }
    }

    pub fn has_more(&self) -> bool {
        self.total_pages.map_or(true, |total| self.page + 1 < total)
    }

    /// The (page, year) request this screen is waiting for, if any.
    pub fn pending_request(&self) -> Option<(u32, Option<u16>)> {
        self.is_loading.then_some((self.page, self.year_filter))
    }

    fn awaits(&self, page: u32, year: Option<u16>) -> bool {
        self.pending_request() == Some((page, year))
    }
}

/// User intents apply only when the screen is `active`. Results apply
/// wherever the screen sits in the backstack, but only if they answer the
/// request the screen is waiting for; anything else is stale.
pub fn reduce(state: DiscoverScreenState, event: &AppEvent, active: bool) -> DiscoverScreenState {
    match event {
        AppEvent::Dispatched(intent) if active => reduce_intent(state, intent),
        AppEvent::DiscoverLoaded {
            page,
            year,
            total_pages,
            movies,
        } if state.awaits(*page, *year) => {
            let mut loaded = if *page == 0 { Vec::new() } else { state.movies };
            loaded.extend(movies.iter().cloned());
            DiscoverScreenState {
                movies: loaded,
                total_pages: Some(*total_pages),
                is_loading: false,
                show_error: false,
                ..state
            }
        }
        AppEvent::DiscoverFailed { page, year, .. } if state.awaits(*page, *year) => {
            DiscoverScreenState {
                is_loading: false,
                show_error: true,
                ..state
            }
        }
        _ => state,
    }
}

fn reduce_intent(state: DiscoverScreenState, intent: &DispatchableEvent) -> DiscoverScreenState {
    match intent {
        DispatchableEvent::LoadMore
            if !state.is_loading && !state.show_error && state.has_more() =>
        {
            DiscoverScreenState {
                page: state.page + 1,
                is_loading: true,
                ..state
            }
        }
        DispatchableEvent::SetYearFilter(year) if *year != state.year_filter => {
            DiscoverScreenState {
                page: 0,
                movies: Vec::new(),
                show_error: false,
                is_loading: true,
                year_filter: *year,
                total_pages: None,
            }
        }
        DispatchableEvent::Retry if state.show_error => DiscoverScreenState {
            is_loading: true,
            show_error: false,
            ..state
        },
        _ => state,
    }
}
