//! Shared application state.
//!
//! Everything the front end needs after startup: configuration, the session
//! container, the domain services and the route guard.

use std::sync::Arc;

use crate::config::ConfigV1;
use crate::guard::RouteGuard;
use crate::services::{AdminService, AnimeService};
use crate::session::Session;

/// Application state shared by every view.
///
/// Cloning is cheap; all services share one client and one token store.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded at startup.
    pub config: Arc<ConfigV1>,
    /// The session container, sole writer of the authentication state.
    pub session: Arc<Session>,
    pub anime: AnimeService,
    pub admin: AdminService,
    pub guard: RouteGuard,
}
