use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::timestamp;

/// An anime the user marked as favorite.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FavoriteAnime {
    pub anime_id: i64,
    pub title: String,
    #[serde(default, with = "timestamp")]
    pub added_at: Option<NaiveDateTime>,
}

/// An anime the user watched, with an optional 1–10 rating.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WatchedAnime {
    pub anime_id: i64,
    pub title: String,
    #[serde(default, with = "timestamp")]
    pub watched_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub rating: Option<u8>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AnimeRecommendation {
    pub anime_id: i64,
    pub title: String,
    #[serde(default, with = "timestamp")]
    pub recommended_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub is_viewed: bool,
}

/// Per-user list statistics.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AnimeStats {
    pub favorites_count: u64,
    pub watched_count: u64,
    #[serde(default)]
    pub unviewed_recommendations: u64,
    #[serde(default)]
    pub average_rating: f64,
}
