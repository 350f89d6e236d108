use crate::api::Configuration;
use crate::knot::KnotState;

use super::screens::{DiscoverScreenState, MovieDetailsState};

/// State of the app.
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    /// Configuration loaded from the API, once available.
    pub config: Option<Configuration>,
    /// Screens in the backstack; the last one is active. Never empty.
    pub screens: Vec<ScreenState>,
}

impl KnotState for State {}

impl State {
    /// A single discover screen already loading its first page.
    pub fn initial() -> Self {
        Self {
            config: None,
            screens: vec![ScreenState::Discover(DiscoverScreenState::initial())],
        }
    }

    pub fn active_screen(&self) -> Option<&ScreenState> {
        self.screens.last()
    }
}

impl Default for State {
    fn default() -> Self {
        Self::initial()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScreenState {
    Discover(DiscoverScreenState),
    MovieDetails(MovieDetailsState),
}
