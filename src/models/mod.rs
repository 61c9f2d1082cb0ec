pub mod admin;
pub mod anime;
pub mod timestamp;
pub mod token;
pub mod user;

pub use admin::{UserSearchResponse, UserStats};
pub use anime::{AnimeRecommendation, AnimeStats, FavoriteAnime, WatchedAnime};
pub use token::{TokenKind, TokenPair};
pub use user::{Credentials, NewUser, User, UserUpdate};
