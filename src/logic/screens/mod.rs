//! Screen states and the backstack reducer.

pub mod details;
pub mod discover;

pub use details::MovieDetailsState;
pub use discover::DiscoverScreenState;

use super::events::AppEvent;
use super::state::ScreenState;

impl ScreenState {
    fn reduce(self, event: &AppEvent, active: bool) -> Self {
        match self {
            ScreenState::Discover(state) => {
                ScreenState::Discover(discover::reduce(state, event, active))
            }
            ScreenState::MovieDetails(state) => {
                ScreenState::MovieDetails(details::reduce(state, event, active))
            }
        }
    }
}

/// Backstack reducer. Navigation events reshape the stack; everything else is
/// offered to each screen, with only the last one marked active.
pub fn screens_reducer(mut screens: Vec<ScreenState>, event: &AppEvent) -> Vec<ScreenState> {
    match event {
        AppEvent::Navigate(screen) => {
            screens.push(screen.clone());
            screens
        }
        AppEvent::PopScreen => {
            if screens.len() > 1 {
                screens.pop();
            }
            screens
        }
        _ => {
            let active = screens.len().saturating_sub(1);
            screens
                .into_iter()
                .enumerate()
                .map(|(index, screen)| screen.reduce(event, index == active))
                .collect()
        }
    }
}
