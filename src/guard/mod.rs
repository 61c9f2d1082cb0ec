//! Client-side route access control.

mod route_guard;
mod routes;

pub use route_guard::{AdminUserPages, GuardDecision, GuardPolicy, NonAdminAdminPages, RouteGuard};
pub use routes::{Access, Route};
