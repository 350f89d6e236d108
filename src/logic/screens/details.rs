//! Movie details screen.

use crate::api::{MovieDetails, MovieId};
use crate::logic::events::{AppEvent, DispatchableEvent};

#[derive(Debug, Clone, PartialEq)]
pub struct MovieDetailsState {
    pub movie_id: MovieId,
    pub details: Option<MovieDetails>,
    pub is_loading: bool,
    pub show_error: bool,
}

impl MovieDetailsState {
    pub fn loading(movie_id: MovieId) -> Self {
        Self {
            movie_id,
            details: None,
            is_loading: true,
            show_error: false,
        }
    }

    fn awaits(&self, id: MovieId) -> bool {
        self.is_loading && self.movie_id == id
    }
}

pub fn reduce(state: MovieDetailsState, event: &AppEvent, active: bool) -> MovieDetailsState {
    match event {
        AppEvent::Dispatched(DispatchableEvent::Retry) if active && state.show_error => {
            MovieDetailsState {
                is_loading: true,
                show_error: false,
                ..state
            }
        }
        AppEvent::DetailsLoaded { id, details } if state.awaits(*id) => MovieDetailsState {
            details: Some(details.clone()),
            is_loading: false,
            show_error: false,
            ..state
        },
        AppEvent::DetailsFailed { id, .. } if state.awaits(*id) => MovieDetailsState {
            is_loading: false,
            show_error: true,
            ..state
        },
        _ => state,
    }
}
