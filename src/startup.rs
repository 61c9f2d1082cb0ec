//! Application startup.
//!
//! Builds the token store, the session with its client, and the services
//! sharing that client.

use std::sync::Arc;
use tracing::info;

use crate::client::ClientError;
use crate::config::ConfigV1;
use crate::guard::RouteGuard;
use crate::services::{AdminService, AnimeService};
use crate::session::Session;
use crate::state::AppState;
use crate::store::create_store;

/// Wire up the application from its configuration.
///
/// No request is made here; call [`Session::initialize`] on the returned
/// session to restore a stored login.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built.
pub fn build(config: Arc<ConfigV1>) -> Result<AppState, ClientError> {
    let store = create_store(&config.store);
    let session = Arc::new(Session::new(&config.api, store)?);
    let client = session.client().clone();

    info!("Using backend at {}", config.api.base_url);

    Ok(AppState {
        anime: AnimeService::new(client.clone()),
        admin: AdminService::new(client),
        guard: RouteGuard::new(config.guard),
        session,
        config,
    })
}

/// Build the application and restore any stored session.
pub async fn run(config: Arc<ConfigV1>) -> Result<AppState, ClientError> {
    let state = build(config)?;
    let restored = state.session.initialize().await;
    info!(
        "Session ready (authenticated={}, admin={})",
        restored.is_authenticated(),
        restored.is_admin()
    );
    Ok(state)
}
