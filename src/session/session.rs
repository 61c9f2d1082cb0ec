use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{broadcast, watch, Mutex};
use tracing::{debug, info, warn};

use super::state::{SessionEvent, SessionState};
use crate::client::{ApiClient, ClientError, SessionListener};
use crate::config::ApiConfig;
use crate::models::{Credentials, NewUser, TokenKind, User, UserUpdate};
use crate::services::AuthService;
use crate::store::TokenStore;

const EVENT_CAPACITY: usize = 16;

/// Shared between the session and the client's termination hook.
struct SessionCore {
    store: Arc<dyn TokenStore>,
    state: watch::Sender<SessionState>,
    events: broadcast::Sender<SessionEvent>,
    init_lock: Mutex<()>,
}

impl SessionCore {
    fn set_user(&self, user: Option<User>) {
        self.state.send_replace(SessionState::settled(user));
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    /// Clear the token store and the state together.
    async fn reset(&self) {
        if let Err(e) = self.store.clear().await {
            warn!("Failed to clear token store: {}", e);
        }
        self.set_user(None);
    }
}

#[async_trait]
impl SessionListener for SessionCore {
    async fn session_terminated(&self, reason: &str) {
        info!("Session terminated: {}", reason);
        self.reset().await;
        self.emit(SessionEvent::Terminated {
            reason: reason.to_string(),
        });
    }
}

/// The session container: owns the current [`SessionState`] and is its only writer.
pub struct Session {
    core: Arc<SessionCore>,
    auth: AuthService,
}

impl Session {
    /// Build a session with its own client. The client reports failed
    /// refreshes back to this session.
    pub fn new(config: &ApiConfig, store: Arc<dyn TokenStore>) -> Result<Self, ClientError> {
        let (state, _) = watch::channel(SessionState::default());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let core = Arc::new(SessionCore {
            store: store.clone(),
            state,
            events,
            init_lock: Mutex::new(()),
        });

        let client = ApiClient::new(config, store)?.with_listener(core.clone());
        Ok(Session {
            core,
            auth: AuthService::new(Arc::new(client)),
        })
    }

    /// The client shared with this session, for building other services.
    pub fn client(&self) -> &Arc<ApiClient> {
        self.auth.client()
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    /// A snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.core.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.core.state.subscribe()
    }

    pub fn events(&self) -> broadcast::Receiver<SessionEvent> {
        self.core.events.subscribe()
    }

    /// Restore the session from a stored access token.
    ///
    /// Runs once; later calls return the current state. Without a stored
    /// token no request is made. Any failure clears the token store and
    /// settles on the empty state, it is never returned to the caller.
    pub async fn initialize(&self) -> SessionState {
        let _guard = self.core.init_lock.lock().await;
        if self.core.state.borrow().is_initialized() {
            debug!("Session already initialized");
            return self.state();
        }

        match self.core.store.get(TokenKind::Access).await {
            Ok(None) => {
                debug!("No stored access token, starting logged out");
                self.core.set_user(None);
            }
            Ok(Some(_)) => match self.auth.get_profile().await {
                Ok(user) => {
                    info!("Restored session for '{}'", user.email);
                    self.core.set_user(Some(user));
                }
                Err(e) => {
                    warn!("Could not restore session: {}", e);
                    self.core.reset().await;
                }
            },
            Err(e) => {
                warn!("Could not read token store: {}", e);
                self.core.reset().await;
            }
        }

        self.state()
    }

    /// Log in. On failure the state is left as it was and the error is returned.
    pub async fn login(&self, credentials: &Credentials) -> Result<User, ClientError> {
        let user = self.auth.login(credentials).await?;
        info!("Logged in as '{}'", user.email);
        self.core.set_user(Some(user.clone()));
        self.core.emit(SessionEvent::LoggedIn { user_id: user.id });
        Ok(user)
    }

    /// Create an account, then log in with the same credentials.
    pub async fn register_and_login(&self, new_user: &NewUser) -> Result<User, ClientError> {
        self.auth.register(new_user).await?;
        self.login(&new_user.credentials()).await
    }

    /// Update the profile; the returned user replaces the cached one.
    pub async fn update_profile(&self, update: &UserUpdate) -> Result<User, ClientError> {
        let user = self.auth.update_profile(update).await?;
        self.replace_user(user.clone());
        Ok(user)
    }

    /// Re-fetch the profile. A plain authentication failure means the
    /// session is gone, so it logs out before returning the error.
    pub async fn refresh_profile(&self) -> Result<User, ClientError> {
        match self.auth.get_profile().await {
            Ok(user) => {
                self.replace_user(user.clone());
                Ok(user)
            }
            Err(e) => {
                if e.is_authentication() {
                    self.logout().await;
                }
                Err(e)
            }
        }
    }

    /// Delete the account on the backend, then log out locally.
    pub async fn delete_account(&self) -> Result<(), ClientError> {
        self.auth.delete_account().await?;
        self.logout().await;
        Ok(())
    }

    /// Forget the tokens and the user. No request is made.
    pub async fn logout(&self) {
        if let Err(e) = self.auth.logout().await {
            warn!("Failed to clear token store: {}", e);
        }
        self.core.set_user(None);
        self.core.emit(SessionEvent::LoggedOut);
        info!("Logged out");
    }

    /// End the session without user action. Same effect as [`Session::logout`],
    /// but observers see [`SessionEvent::Terminated`].
    pub async fn terminate(&self, reason: &str) {
        self.core.session_terminated(reason).await;
    }

    fn replace_user(&self, user: User) {
        let user_id = user.id;
        self.core.set_user(Some(user));
        self.core.emit(SessionEvent::ProfileUpdated { user_id });
    }
}
