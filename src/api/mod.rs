//! Movie API capability consumed by epics.
//!
//! The knot never talks to the network itself; epics call an [`Api`] and map
//! each result or error into an event.

mod fixture;
mod models;

use async_trait::async_trait;
use thiserror::Error;

pub use fixture::{FixtureApi, FixtureError};
pub use models::{Configuration, DiscoverPage, Movie, MovieDetails, MovieId};

/// Errors an [`Api`] call can end with.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Transport-level failure (connection, timeout, ...).
    #[error("request failed: {0}")]
    Request(String),

    /// The requested movie does not exist.
    #[error("movie {id} not found")]
    NotFound { id: MovieId },

    /// The API answered with something that could not be understood.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Asynchronous movie API.
#[async_trait]
pub trait Api: Send + Sync {
    async fn configuration(&self) -> Result<Configuration, ApiError>;

    /// Discover movies, optionally restricted to a release year.
    async fn discover_movies(&self, page: u32, year: Option<u16>)
        -> Result<DiscoverPage, ApiError>;

    async fn movie_details(&self, id: MovieId) -> Result<MovieDetails, ApiError>;
}
