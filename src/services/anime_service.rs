use std::sync::Arc;

use crate::client::{ApiClient, ApiRequest, ClientError};
use crate::models::{AnimeRecommendation, AnimeStats, FavoriteAnime, WatchedAnime};

/// The current user's anime lists.
#[derive(Clone)]
pub struct AnimeService {
    client: Arc<ApiClient>,
}

impl AnimeService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        AnimeService { client }
    }

    pub async fn favorites(&self) -> Result<Vec<FavoriteAnime>, ClientError> {
        self.client
            .send_json(ApiRequest::get("/anime/favorites"))
            .await
    }

    pub async fn add_favorite(&self, favorite: &FavoriteAnime) -> Result<FavoriteAnime, ClientError> {
        self.client
            .send_json(ApiRequest::post("/anime/favorites").json(favorite)?)
            .await
    }

    pub async fn watched(&self) -> Result<Vec<WatchedAnime>, ClientError> {
        self.client.send_json(ApiRequest::get("/anime/watched")).await
    }

    /// Record a watched title. Ratings outside 1–10 are rejected before sending.
    pub async fn add_watched(&self, watched: &WatchedAnime) -> Result<WatchedAnime, ClientError> {
        if let Some(rating) = watched.rating {
            if !(1..=10).contains(&rating) {
                return Err(ClientError::Validation(format!(
                    "Rating must be between 1 and 10, got {}",
                    rating
                )));
            }
        }
        self.client
            .send_json(ApiRequest::post("/anime/watched").json(watched)?)
            .await
    }

    pub async fn recommendations(
        &self,
        limit: u32,
    ) -> Result<Vec<AnimeRecommendation>, ClientError> {
        self.client
            .send_json(ApiRequest::get("/anime/recommendations").query("limit", limit))
            .await
    }

    pub async fn stats(&self) -> Result<AnimeStats, ClientError> {
        self.client.send_json(ApiRequest::get("/anime/stats")).await
    }
}
