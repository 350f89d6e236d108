//! Shared test utilities and a scriptable movie API.

#![allow(dead_code, unused_imports)]

use async_trait::async_trait;
use moviedb_knot::api::{Api, ApiError, Configuration, DiscoverPage, Movie, MovieDetails, MovieId};
use moviedb_knot::knot::{KnotError, Subscription};
use moviedb_knot::logic::{DiscoverScreenState, MovieDetailsState, ScreenState, State};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Upper bound for any single wait in these tests.
pub const WAIT: Duration = Duration::from_secs(5);

/// In-memory API with five movies and switchable failures.
///
/// Movies 2, 3 and 5 are from 2020; 1 and 4 are not.
pub struct StubApi {
    movies: Vec<MovieDetails>,
    page_size: usize,
    discover_delays: Mutex<HashMap<Option<u16>, Duration>>,
    fail_discover: AtomicBool,
    fail_configuration: AtomicBool,
    discover_calls: Mutex<Vec<(u32, Option<u16>)>>,
}

impl StubApi {
    pub fn new() -> Self {
        Self::with_page_size(5)
    }

    pub fn with_page_size(page_size: usize) -> Self {
        let years = [2019, 2020, 2020, 2018, 2020];
        let movies = years
            .iter()
            .enumerate()
            .map(|(index, year)| {
                let id = index as MovieId + 1;
                MovieDetails {
                    id,
                    title: format!("Movie {id}"),
                    overview: format!("Overview of movie {id}"),
                    release_year: Some(*year),
                    runtime_minutes: Some(90 + id as u32),
                    genres: vec!["Drama".to_string()],
                    poster_path: Some(format!("/poster{id}.jpg")),
                    vote_average: 6.5,
                }
            })
            .collect();
        Self {
            movies,
            page_size,
            discover_delays: Mutex::new(HashMap::new()),
            fail_discover: AtomicBool::new(false),
            fail_configuration: AtomicBool::new(false),
            discover_calls: Mutex::new(Vec::new()),
        }
    }

    /// Delay discover answers for `year` by `delay`.
    pub fn delay_discover(&self, year: Option<u16>, delay: Duration) {
        self.discover_delays.lock().insert(year, delay);
    }

    pub fn set_fail_discover(&self, fail: bool) {
        self.fail_discover.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_configuration(&self, fail: bool) {
        self.fail_configuration.store(fail, Ordering::SeqCst);
    }

    pub fn discover_calls(&self) -> Vec<(u32, Option<u16>)> {
        self.discover_calls.lock().clone()
    }
}

#[async_trait]
impl Api for StubApi {
    async fn configuration(&self) -> Result<Configuration, ApiError> {
        if self.fail_configuration.load(Ordering::SeqCst) {
            return Err(ApiError::Request("configuration unavailable".to_string()));
        }
        Ok(Configuration {
            image_base_url: "https://img.test/".to_string(),
            poster_sizes: vec!["w92".to_string()],
        })
    }

    async fn discover_movies(
        &self,
        page: u32,
        year: Option<u16>,
    ) -> Result<DiscoverPage, ApiError> {
        self.discover_calls.lock().push((page, year));
        let delay = self.discover_delays.lock().get(&year).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_discover.load(Ordering::SeqCst) {
            return Err(ApiError::Request("discover unavailable".to_string()));
        }
        let matching: Vec<Movie> = self
            .movies
            .iter()
            .filter(|movie| year.is_none() || movie.release_year == year)
            .map(Movie::from)
            .collect();
        let total_pages = matching.len().div_ceil(self.page_size).max(1) as u32;
        let movies = matching
            .into_iter()
            .skip((page as usize).saturating_mul(self.page_size))
            .take(self.page_size)
            .collect();
        Ok(DiscoverPage {
            page,
            total_pages,
            movies,
        })
    }

    async fn movie_details(&self, id: MovieId) -> Result<MovieDetails, ApiError> {
        self.movies
            .iter()
            .find(|movie| movie.id == id)
            .cloned()
            .ok_or(ApiError::NotFound { id })
    }
}

// -- State helpers ------------------------------------------------------------

/// Receive states until one matches `predicate`.
pub async fn wait_for_state<F>(states: &mut Subscription<State>, mut predicate: F) -> State
where
    F: FnMut(&State) -> bool,
{
    let found = tokio::time::timeout(WAIT, async {
        loop {
            match states.recv().await {
                Ok(state) if predicate(&state) => return state,
                Ok(_) | Err(KnotError::Lagged { .. }) => continue,
                Err(err) => panic!("state stream ended: {err}"),
            }
        }
    })
    .await;
    found.expect("timed out waiting for state")
}

/// Receive values until one matches `predicate`.
pub async fn wait_for<T, F>(subscription: &mut Subscription<T>, mut predicate: F) -> T
where
    T: Clone + Send + 'static,
    F: FnMut(&T) -> bool,
{
    let found = tokio::time::timeout(WAIT, async {
        loop {
            match subscription.recv().await {
                Ok(value) if predicate(&value) => return value,
                Ok(_) | Err(KnotError::Lagged { .. }) => continue,
                Err(err) => panic!("stream ended: {err}"),
            }
        }
    })
    .await;
    found.expect("timed out waiting for value")
}

/// The root discover screen.
pub fn discover(state: &State) -> &DiscoverScreenState {
    match state.screens.first() {
        Some(ScreenState::Discover(screen)) => screen,
        other => panic!("expected discover at the bottom of the stack, got {other:?}"),
    }
}

/// The active screen, which must be a details screen.
pub fn active_details(state: &State) -> Option<&MovieDetailsState> {
    match state.active_screen() {
        Some(ScreenState::MovieDetails(screen)) => Some(screen),
        _ => None,
    }
}

/// Discover finished loading and config has arrived.
pub fn is_ready(state: &State) -> bool {
    state.config.is_some() && !discover(state).is_loading
}
