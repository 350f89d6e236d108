//! [`Api`] implementation backed by a JSON document.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use super::models::{Configuration, DiscoverPage, Movie, MovieDetails, MovieId};
use super::{Api, ApiError};

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Failed to read fixture '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse fixture '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid fixture: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Deserialize)]
struct FixtureData {
    configuration: Configuration,
    #[serde(default = "default_page_size")]
    page_size: usize,
    movies: Vec<MovieDetails>,
}

fn default_page_size() -> usize {
    20
}

/// Serves configuration, discover pages and details from memory.
///
/// Discover pages are slices of the movie list after applying the year
/// filter against `release_year`.
#[derive(Debug, Clone)]
pub struct FixtureApi {
    configuration: Configuration,
    page_size: usize,
    movies: Vec<MovieDetails>,
    latency: Duration,
}

impl FixtureApi {
    pub fn new(configuration: Configuration, movies: Vec<MovieDetails>, page_size: usize) -> Self {
        Self {
            configuration,
            page_size: page_size.max(1),
            movies,
            latency: Duration::ZERO,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let data: FixtureData = serde_json::from_str(json)?;
        Ok(Self::new(data.configuration, data.movies, data.page_size))
    }

    pub fn from_path(path: &Path) -> Result<Self, FixtureError> {
        let content = fs::read_to_string(path).map_err(|e| FixtureError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let api = Self::from_json(&content).map_err(|e| FixtureError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
        if api.movies.is_empty() {
            return Err(FixtureError::ValidationError {
                message: format!("'{}' contains no movies", path.display()),
            });
        }
        Ok(api)
    }

    /// Delay every call by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl Api for FixtureApi {
    async fn configuration(&self) -> Result<Configuration, ApiError> {
        self.simulate_latency().await;
        Ok(self.configuration.clone())
    }

    async fn discover_movies(
        &self,
        page: u32,
        year: Option<u16>,
    ) -> Result<DiscoverPage, ApiError> {
        self.simulate_latency().await;
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
        self.simulate_latency().await;
        self.movies
            .iter()
            .find(|movie| movie.id == id)
            .cloned()
            .ok_or(ApiError::NotFound { id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "configuration": { "image_base_url": "https://img.example.com/", "poster_sizes": ["w92"] },
        "page_size": 2,
        "movies": [
            { "id": 1, "title": "Alpha", "release_year": 2019 },
            { "id": 2, "title": "Beta", "release_year": 2020 },
            { "id": 3, "title": "Gamma", "release_year": 2020 },
            { "id": 4, "title": "Delta", "release_year": 2020 }
        ]
    }"#;

    #[tokio::test]
    async fn discover_pages_through_filtered_movies() {
        let api = FixtureApi::from_json(FIXTURE).expect("fixture");
        let first = api.discover_movies(0, Some(2020)).await.expect("page 0");
        assert_eq!(first.total_pages, 2);
        assert_eq!(
            first.movies.iter().map(|m| m.id).collect::<Vec<_>>(),
            vec![2, 3]
        );

        let second = api.discover_movies(1, Some(2020)).await.expect("page 1");
        assert_eq!(second.movies.len(), 1);
        assert_eq!(second.movies[0].title, "Delta");
    }

    #[tokio::test]
    async fn discover_past_the_end_is_empty() {
        let api = FixtureApi::from_json(FIXTURE).expect("fixture");
        let page = api.discover_movies(5, None).await.expect("page");
        assert!(page.movies.is_empty());
        assert_eq!(page.total_pages, 2);
    }

    #[tokio::test]
    async fn huge_page_size_does_not_overflow_offset() {
        let fixture = FixtureApi::from_json(FIXTURE).expect("fixture");
        let api = FixtureApi::new(fixture.configuration, fixture.movies, usize::MAX);
        let first = api.discover_movies(0, None).await.expect("page 0");
        assert_eq!(first.total_pages, 1);
        assert_eq!(first.movies.len(), 4);
        let later = api.discover_movies(3, None).await.expect("page 3");
        assert!(later.movies.is_empty());
    }

    #[tokio::test]
    async fn unknown_movie_is_not_found() {
        let api = FixtureApi::from_json(FIXTURE).expect("fixture");
        assert_eq!(
            api.movie_details(42).await,
            Err(ApiError::NotFound { id: 42 })
        );
    }

    #[test]
    fn poster_url_joins_base_size_and_path() {
        let api = FixtureApi::from_json(FIXTURE).expect("fixture");
        assert_eq!(
            api.configuration.poster_url("/abc.jpg"),
            "https://img.example.com/w92/abc.jpg"
        );
    }
}
