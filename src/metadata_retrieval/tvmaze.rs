/// TVMaze metadata provider implementation.
use super::tvmaze_types::{TvMazeEpisode, TvMazeShow};
use super::{Episode, EpisodeImage, MetadataProvider, MetadataRetrievalError};
use reqwest::blocking::Response;

/// Default location of the public TVMaze API.
pub const TVMAZE_BASE_URL: &str = "https://api.tvmaze.com";

/// Metadata provider for the TVMaze API.
///
/// This provider resolves show names through the singlesearch endpoint
/// and lists episodes through the per-show episodes endpoint.
pub struct TvMazeProvider {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl TvMazeProvider {
    /// Creates a new TVMaze provider talking to the public API.
    pub fn new() -> Self {
        Self::with_base_url(TVMAZE_BASE_URL)
    }

    /// Creates a provider talking to a different TVMaze compatible host.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Converts a TVMaze episode to our internal Episode structure.
    fn convert_episode(tvmaze_episode: TvMazeEpisode) -> Episode {
        Episode {
            id: tvmaze_episode.id,
            name: tvmaze_episode.name.unwrap_or_else(|| "Unknown".to_string()),
            season: tvmaze_episode.season,
            number: tvmaze_episode.number.unwrap_or(0),
            summary: tvmaze_episode.summary,
            airdate: tvmaze_episode.airdate.filter(|date| !date.is_empty()),
            image: tvmaze_episode.image.map(|image| EpisodeImage {
                medium: image.medium,
                original: image.original,
            }),
        }
    }

    /// Maps non-successful HTTP status codes to a request error.
    fn ensure_success(response: Response) -> Result<Response, MetadataRetrievalError> {
        if !response.status().is_success() {
            return Err(MetadataRetrievalError::RequestError(format!(
                "HTTP {} {}",
                response.status().as_u16(),
                response.status().canonical_reason().unwrap_or("Unknown")
            )));
        }

        Ok(response)
    }
}

impl Default for TvMazeProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataProvider for TvMazeProvider {
    fn resolve_show(&self, show_name: &str) -> Result<u64, MetadataRetrievalError> {
        let url = format!("{}/singlesearch/shows", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("q", show_name)])
            .send()
            .map_err(|e| MetadataRetrievalError::RequestError(e.to_string()))?;

        // TVMaze answers 404 when nothing matches the query
        if response.status() == 404 {
            return Err(MetadataRetrievalError::SeriesNotFound(
                show_name.to_string(),
            ));
        }

        let show: TvMazeShow = Self::ensure_success(response)?
            .json()
            .map_err(|e| MetadataRetrievalError::ParseError(e.to_string()))?;

        Ok(show.id)
    }

    fn fetch_episodes(&self, show_id: u64) -> Result<Vec<Episode>, MetadataRetrievalError> {
        let url = format!("{}/shows/{}/episodes", self.base_url, show_id);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| MetadataRetrievalError::RequestError(e.to_string()))?;

        let episodes: Vec<TvMazeEpisode> = Self::ensure_success(response)?
            .json()
            .map_err(|e| MetadataRetrievalError::ParseError(e.to_string()))?;

        Ok(episodes.into_iter().map(Self::convert_episode).collect())
    }
}
