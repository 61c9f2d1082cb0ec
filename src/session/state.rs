use crate::models::User;

/// Snapshot of who is logged in.
///
/// The authenticated and admin flags are derived from `user` on every read;
/// there is nothing to keep in sync.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    user: Option<User>,
    initialized: bool,
}

impl SessionState {
    pub(crate) fn settled(user: Option<User>) -> Self {
        SessionState {
            user,
            initialized: true,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.is_admin)
    }

    /// False until the startup hydration has settled.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

/// Session transitions, for UI code that needs to react (e.g. redirect on `Terminated`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn { user_id: i64 },
    LoggedOut,
    /// The client could not refresh an expired token and ended the session.
    Terminated { reason: String },
    ProfileUpdated { user_id: i64 },
}
