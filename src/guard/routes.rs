use std::fmt;

/// Who may see a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Only meaningful while logged out (login, register).
    GuestOnly,
    /// Any logged-in user.
    Protected,
    /// Logged-in admins only.
    AdminOnly,
}

/// The views of the web client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    Home,
    Favorites,
    Watched,
    Recommendations,
    Profile,
    Admin,
    AdminUsers,
    AdminStats,
}

impl Route {
    pub const ALL: [Route; 10] = [
        Route::Login,
        Route::Register,
        Route::Home,
        Route::Favorites,
        Route::Watched,
        Route::Recommendations,
        Route::Profile,
        Route::Admin,
        Route::AdminUsers,
        Route::AdminStats,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Home => "/",
            Route::Favorites => "/favorites",
            Route::Watched => "/watched",
            Route::Recommendations => "/recommendations",
            Route::Profile => "/profile",
            Route::Admin => "/admin",
            Route::AdminUsers => "/admin/users",
            Route::AdminStats => "/admin/stats",
        }
    }

    /// Resolve a location path. Query strings, fragments and a trailing slash are ignored.
    pub fn from_path(path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or("");
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        Route::ALL.into_iter().find(|route| route.path() == path)
    }

    pub fn access(self) -> Access {
        match self {
            Route::Login | Route::Register => Access::GuestOnly,
            Route::Home
            | Route::Favorites
            | Route::Watched
            | Route::Recommendations
            | Route::Profile => Access::Protected,
            Route::Admin | Route::AdminUsers | Route::AdminStats => Access::AdminOnly,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
