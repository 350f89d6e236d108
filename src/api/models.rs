use serde::{Deserialize, Serialize};

pub type MovieId = u64;

/// Image configuration served by the API; loaded once per session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub image_base_url: String,
    #[serde(default)]
    pub poster_sizes: Vec<String>,
}

impl Configuration {
    /// Full poster URL for `poster_path` at the smallest advertised size.
    pub fn poster_url(&self, poster_path: &str) -> String {
        let size = self
            .poster_sizes
            .first()
            .map(String::as_str)
            .unwrap_or("original");
        format!(
            "{}/{}/{}",
            self.image_base_url.trim_end_matches('/'),
            size,
            poster_path.trim_start_matches('/')
        )
    }
}

/// A discover list entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    #[serde(default)]
    pub release_year: Option<u16>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: f32,
}

/// Full movie record shown on the details screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    pub id: MovieId,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub release_year: Option<u16>,
    #[serde(default)]
    pub runtime_minutes: Option<u32>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: f32,
}

impl From<&MovieDetails> for Movie {
    fn from(details: &MovieDetails) -> Self {
        Self {
            id: details.id,
            title: details.title.clone(),
            release_year: details.release_year,
            poster_path: details.poster_path.clone(),
            vote_average: details.vote_average,
        }
    }
}

/// One page of discover results. Pages are zero-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoverPage {
    pub page: u32,
    pub total_pages: u32,
    pub movies: Vec<Movie>,
}
