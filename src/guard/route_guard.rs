use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::routes::{Access, Route};
use crate::session::SessionState;

/// What an admin sees when opening a user-facing page.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum AdminUserPages {
    #[default]
    Allow,
    RedirectToDashboard,
}

/// What a non-admin sees when opening an admin page.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum NonAdminAdminPages {
    #[default]
    RedirectHome,
    Deny,
}

/// Role segregation settings for the guard.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq, JsonSchema)]
pub struct GuardPolicy {
    #[serde(default)]
    pub admin_on_user_pages: AdminUserPages,
    #[serde(default)]
    pub non_admin_on_admin_pages: NonAdminAdminPages,
}

/// Outcome of one navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    Redirect(Route),
    /// Restricted-access fallback.
    Denied,
    /// The session has not settled yet; show a loading state.
    Pending,
}

/// Decides per navigation from the session state alone. Holds no state of
/// its own and never touches the network.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteGuard {
    policy: GuardPolicy,
}

impl RouteGuard {
    pub fn new(policy: GuardPolicy) -> Self {
        RouteGuard { policy }
    }

    pub fn policy(&self) -> GuardPolicy {
        self.policy
    }

    /// Where a user in `state` lands after login or when bounced from a guest page.
    pub fn landing(&self, state: &SessionState) -> Route {
        if state.is_admin()
            && self.policy.admin_on_user_pages == AdminUserPages::RedirectToDashboard
        {
            Route::Admin
        } else if state.is_authenticated() {
            Route::Home
        } else {
            Route::Login
        }
    }

    pub fn evaluate(&self, state: &SessionState, route: Route) -> GuardDecision {
        let decision = self.decide(state, route);
        debug!(
            "Guard: {} (authenticated={}, admin={}) -> {:?}",
            route,
            state.is_authenticated(),
            state.is_admin(),
            decision
        );
        decision
    }

    /// Evaluate a raw path. Unknown paths yield `None`.
    pub fn evaluate_path(&self, state: &SessionState, path: &str) -> Option<GuardDecision> {
        Route::from_path(path).map(|route| self.evaluate(state, route))
    }

    fn decide(&self, state: &SessionState, route: Route) -> GuardDecision {
        if !state.is_initialized() {
            return GuardDecision::Pending;
        }

        match (route.access(), state.is_authenticated(), state.is_admin()) {
            (Access::GuestOnly, false, _) => GuardDecision::Render,
            (Access::GuestOnly, true, _) => GuardDecision::Redirect(self.landing(state)),
            (_, false, _) => GuardDecision::Redirect(Route::Login),
            (Access::Protected, true, false) => GuardDecision::Render,
            (Access::Protected, true, true) => match self.policy.admin_on_user_pages {
                AdminUserPages::Allow => GuardDecision::Render,
                AdminUserPages::RedirectToDashboard => GuardDecision::Redirect(Route::Admin),
            },
            (Access::AdminOnly, true, true) => GuardDecision::Render,
            (Access::AdminOnly, true, false) => match self.policy.non_admin_on_admin_pages {
                NonAdminAdminPages::RedirectHome => GuardDecision::Redirect(Route::Home),
                NonAdminAdminPages::Deny => GuardDecision::Denied,
            },
        }
    }
}
