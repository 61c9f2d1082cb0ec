use serde::{Deserialize, Serialize};

use super::User;

/// One page of an admin user search.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserSearchResponse {
    pub users: Vec<User>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

/// Service-wide user statistics shown on the admin dashboard.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserStats {
    pub total_users: u64,
    pub active_users: u64,
    pub average_age: f64,
    #[serde(default)]
    pub new_users_24h: Option<u64>,
}
